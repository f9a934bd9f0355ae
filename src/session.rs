use chrono::{DateTime, Local};
use log::info;
use uuid::Uuid;

use crate::history::PredictionHistory;
use crate::models::PredictionRecord;

/// The interactive session: owns the prediction history for its lifetime.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Local>,
    history: PredictionHistory,
}

impl Session {
    pub fn start() -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Local::now(),
            history: PredictionHistory::new(),
        };
        info!("Started session {}", session.id);
        session
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn record(&mut self, record: PredictionRecord) {
        self.history.append(record);
    }

    /// Ends the current session and begins a fresh one with an empty history.
    pub fn reset(&mut self) {
        info!(
            "Ending session {} with {} predictions",
            self.id,
            self.history.count()
        );
        *self = Session::start();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::start()
    }
}
