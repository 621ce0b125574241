use super::TimeRange;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::fmt;

pub const MAX_AUDIT_ROWS: i64 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Error,
    Warning,
    Started,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Started => "STARTED",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body format of the audit log listing.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// `?format=` next to the audit filters.
#[derive(Debug, Deserialize, Default)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_limit() -> i64 {
    MAX_AUDIT_ROWS
}

/// Audit log viewer filters. Every field is bound as a query parameter.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuditFilter {
    #[serde(default)]
    pub range: TimeRange,
    pub status: Option<AuditStatus>,
    #[validate(max_length = 256)]
    pub procedure: Option<String>,
    #[validate(max_length = 256)]
    pub deal_id: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(minimum = 1)]
    #[validate(maximum = 1000)]
    pub limit: i64,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            range: TimeRange::default(),
            status: None,
            procedure: None,
            deal_id: None,
            limit: default_limit(),
        }
    }
}

impl AuditFilter {
    /// Blank text filters mean "All".
    pub fn normalized(mut self) -> Self {
        self.procedure = self.procedure.filter(|p| !p.trim().is_empty());
        self.deal_id = self.deal_id.filter(|d| !d.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filter: AuditFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.range, TimeRange::Last24Hours);
        assert_eq!(filter.limit, MAX_AUDIT_ROWS);
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_limit_is_bounded() {
        let filter = AuditFilter {
            limit: 5000,
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = AuditFilter {
            limit: 0,
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_status_uses_upper_case_names() {
        let filter: AuditFilter = serde_json::from_str(r#"{"status":"ERROR"}"#).unwrap();
        assert_eq!(filter.status, Some(AuditStatus::Error));
    }

    #[test]
    fn test_export_format_defaults_to_json() {
        let query: ExportQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.format, ExportFormat::Json);
        let query: ExportQuery = serde_json::from_str(r#"{"format":"csv"}"#).unwrap();
        assert_eq!(query.format, ExportFormat::Csv);
    }

    #[test]
    fn test_blank_text_filters_are_dropped() {
        let filter = AuditFilter {
            procedure: Some("  ".to_string()),
            deal_id: Some("DEAL-7".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filter.procedure, None);
        assert_eq!(filter.deal_id.as_deref(), Some("DEAL-7"));
    }
}
