use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest message fragment returned for list views.
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

/// One row of the procedure audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct AuditEntry {
    pub start_time: DateTime<Utc>,
    pub procedure_name: String,
    pub deal_id: Option<String>,
    pub status: String,
    pub duration_seconds: Option<f64>,
    pub rows_affected: Option<i64>,
    pub message: Option<String>,
    pub error_message: Option<String>,
}

impl AuditEntry {
    /// Cuts message columns down to the preview length, on a char boundary.
    pub fn truncated(mut self) -> Self {
        self.message = self.message.map(|m| preview(&m));
        self.error_message = self.error_message.map(|m| preview(&m));
        self
    }
}

pub fn preview(text: &str) -> String {
    text.chars().take(MESSAGE_PREVIEW_CHARS).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditFilterOptions {
    pub procedures: Vec<String>,
    pub deals: Vec<String>,
}
