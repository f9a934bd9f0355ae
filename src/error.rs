//! Error types for the health assistant.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::models::Disease;

/// Failures while loading or running a classification model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced unexpected label {0}")]
    UnexpectedLabel(i64),
}

/// An assessment input outside its declared range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} has no option with code {code}")]
    UnknownCode { field: &'static str, code: u8 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("record count must not be negative, got {0}")]
    NegativeCount(i64),

    #[error("failed to write CSV export: {0}")]
    Export(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("{disease} assessment failed: {source}")]
    Assessment {
        disease: Disease,
        #[source]
        source: ModelError,
    },

    #[error("session state is unavailable")]
    SessionUnavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::History(HistoryError::NegativeCount(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Model and session details stay in the log, clients get a generic message.
        let message = match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::History(HistoryError::NegativeCount(_)) => self.to_string(),
            ApiError::Assessment { .. } => "Assessment failed, please try again".to_string(),
            _ => "Internal server error".to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}
