use std::sync::{Mutex, MutexGuard};

use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::charts::{self, DistributionSlice, PolarChart, TimelinePoint, Verdict};
use crate::classifier::ModelRegistry;
use crate::error::{ApiError, ModelError};
use crate::forms::{AssessmentForm, DiabetesForm, HeartDiseaseForm, ParkinsonsForm};
use crate::models::{Outcome, PredictionRecord};
use crate::risk::{self, RiskFlag};
use crate::session::Session;

pub const APP_TITLE: &str = "Advanced Health Assistant";
pub const DISCLAIMER: &str =
    "This is a screening tool and should not replace professional medical advice.";
pub const EXPORT_FILE_NAME: &str = "health_assistant_history.csv";

/// Shared state handed to every handler.
pub struct AppState {
    pub models: ModelRegistry,
    pub session: Mutex<Session>,
    pub recent_limit: usize,
}

impl AppState {
    pub fn new(models: ModelRegistry, recent_limit: usize) -> Self {
        Self {
            models,
            session: Mutex::new(Session::start()),
            recent_limit,
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session.lock().map_err(|_| {
            error!("Session lock poisoned");
            ApiError::SessionUnavailable
        })
    }
}

/// Dashboard pages, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    Home,
    DiabetesPrediction,
    HeartDiseasePrediction,
    ParkinsonsPrediction,
    PatientHistory,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::DiabetesPrediction,
        Page::HeartDiseasePrediction,
        Page::ParkinsonsPrediction,
        Page::PatientHistory,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::DiabetesPrediction => "Diabetes Prediction",
            Page::HeartDiseasePrediction => "Heart Disease Prediction",
            Page::ParkinsonsPrediction => "Parkinsons Prediction",
            Page::PatientHistory => "Patient History",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::DiabetesPrediction => "/predict/diabetes",
            Page::HeartDiseasePrediction => "/predict/heart-disease",
            Page::ParkinsonsPrediction => "/predict/parkinsons",
            Page::PatientHistory => "/history",
        }
    }

    fn register(self, cfg: &mut web::ServiceConfig) {
        let resource = web::resource(self.path());
        let resource = match self {
            Page::Home => resource.route(web::get().to(home)),
            Page::DiabetesPrediction => resource.route(web::post().to(assess::<DiabetesForm>)),
            Page::HeartDiseasePrediction => {
                resource.route(web::post().to(assess::<HeartDiseaseForm>))
            }
            Page::ParkinsonsPrediction => resource.route(web::post().to(assess::<ParkinsonsForm>)),
            Page::PatientHistory => resource
                .route(web::get().to(history))
                .route(web::delete().to(reset_history)),
        };
        cfg.service(resource);
    }
}

/// Registers every page plus the navigation and history sub-resources.
pub fn configure(cfg: &mut web::ServiceConfig) {
    for page in Page::ALL {
        page.register(cfg);
    }
    cfg.service(web::resource("/pages").route(web::get().to(pages)))
        .service(web::resource("/history/recent").route(web::get().to(recent)))
        .service(web::resource("/history/export").route(web::get().to(export_history)));
}

#[derive(Serialize)]
struct PageLink {
    page: Page,
    title: &'static str,
    path: &'static str,
}

pub async fn pages() -> HttpResponse {
    let links: Vec<_> = Page::ALL
        .iter()
        .map(|page| PageLink {
            page: *page,
            title: page.title(),
            path: page.path(),
        })
        .collect();
    HttpResponse::Ok().json(links)
}

#[derive(Serialize)]
struct HomeResponse {
    title: &'static str,
    total_predictions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    positive_cases: Option<usize>,
    models_available: usize,
    recent_activity: Vec<PredictionRecord>,
    distribution: Vec<DistributionSlice>,
    disclaimer: &'static str,
}

pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let session = state.session()?;
    let history = session.history();
    let recent_limit = i64::try_from(state.recent_limit).unwrap_or(i64::MAX);

    let body = HomeResponse {
        title: APP_TITLE,
        total_predictions: history.count(),
        positive_cases: (!history.is_empty()).then(|| history.count_by_result(Outcome::Positive)),
        models_available: state.models.available(),
        recent_activity: history.recent(recent_limit)?.to_vec(),
        distribution: history.distribution(),
        disclaimer: DISCLAIMER,
    };
    Ok(HttpResponse::Ok().json(body))
}

#[derive(Serialize)]
struct AssessmentResponse {
    record: PredictionRecord,
    verdict: Verdict,
    risk_factors: Vec<RiskFlag>,
    chart: Option<PolarChart>,
}

/// Validates a form, classifies it and records the outcome in the session.
pub async fn assess<F>(
    state: web::Data<AppState>,
    form: web::Json<F>,
) -> Result<HttpResponse, ApiError>
where
    F: AssessmentForm + DeserializeOwned + 'static,
{
    let form = form.into_inner();
    let disease = F::DISEASE;
    form.validate().map_err(|e| {
        warn!("Rejected {disease} input: {e}");
        e
    })?;

    let features = form.model_input();
    let models = state.clone();
    let label = web::block(move || models.models.classifier(disease).predict(&features))
        .await
        .map_err(|e| ModelError::Inference(e.to_string()))
        .and_then(|result| result)
        .map_err(|source| {
            error!("{disease} prediction failed: {source}");
            ApiError::Assessment { disease, source }
        })?;

    let outcome = Outcome::from(label);
    let record = PredictionRecord::new(disease, outcome, form.details());
    state.session()?.record(record.clone());
    info!("{disease} assessment recorded: {outcome}");

    let body = AssessmentResponse {
        record,
        verdict: charts::verdict(disease, outcome),
        risk_factors: risk::flags_for(&form),
        chart: form.chart(outcome),
    };
    Ok(HttpResponse::Ok().json(body))
}

#[derive(Serialize)]
struct HistoryResponse {
    total_assessments: usize,
    unique_diseases: usize,
    /// Percentage with one decimal place.
    positive_rate: f64,
    timeline: Vec<TimelinePoint>,
    distribution: Vec<DistributionSlice>,
    records: Vec<PredictionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

pub async fn history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let session = state.session()?;
    let history = session.history();

    let body = HistoryResponse {
        total_assessments: history.count(),
        unique_diseases: history.unique_diseases(),
        positive_rate: (history.positive_rate() * 1000.0).round() / 10.0,
        timeline: history.timeline(),
        distribution: history.distribution(),
        records: history.newest_first().into_iter().cloned().collect(),
        message: history.is_empty().then_some(
            "No patient history available yet. Make some predictions to see them here!",
        ),
    };
    Ok(HttpResponse::Ok().json(body))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub n: Option<i64>,
}

pub async fn recent(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session()?;
    let n = query
        .n
        .unwrap_or_else(|| i64::try_from(state.recent_limit).unwrap_or(i64::MAX));
    let records = session.history().recent(n)?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn export_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let csv = state.session()?.history().export_csv()?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ))
        .body(csv))
}

pub async fn reset_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    state.session()?.reset();
    Ok(HttpResponse::NoContent().finish())
}

