//! Application state management

use std::sync::Arc;

use crate::artifacts::InferenceContext;

/// Application state shared across handlers. Read-only after startup.
#[derive(Debug)]
pub struct AppState {
    pub context: Arc<InferenceContext>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(context: InferenceContext) -> Self {
        Self {
            context: Arc::new(context),
            started_at: chrono::Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}
