use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::api::JobState;

/// Board-level availability, rendered alongside the slot rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangerOverview {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_state: Option<JobState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
}

impl ChangerOverview {
    pub fn ok(state: JobState) -> Self {
        Self {
            available: true,
            last_state: Some(state),
            refreshed_at: Some(Utc::now()),
            errors: Vec::new(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            errors: vec![message],
            ..Default::default()
        }
    }
}
