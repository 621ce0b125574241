use crate::models::AuditEntry;

const AUDIT_CSV_COLUMNS: [&str; 8] = [
    "start_time",
    "procedure_name",
    "deal_id",
    "status",
    "duration_seconds",
    "rows_affected",
    "message",
    "error_message",
];

/// Renders audit rows as CSV with a header line, also when there are no rows.
pub(crate) fn audit_csv(entries: &[AuditEntry]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(AUDIT_CSV_COLUMNS)?;
    for entry in entries {
        writer.serialize(entry)?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// `audit_log_20240131_154500.csv`
pub(crate) fn audit_csv_file_name(at: chrono::DateTime<chrono::Utc>) -> String {
    format!("audit_log_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry() -> AuditEntry {
        AuditEntry {
            start_time: Utc.with_ymd_and_hms(2024, 1, 31, 15, 45, 0).unwrap(),
            procedure_name: "load_trial_balance".to_string(),
            deal_id: None,
            status: "ERROR".to_string(),
            duration_seconds: Some(1.5),
            rows_affected: None,
            message: Some("loaded, with \"quotes\"".to_string()),
            error_message: Some("bad row".to_string()),
        }
    }

    #[test]
    fn test_empty_export_keeps_header() {
        let csv = String::from_utf8(audit_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.trim_end(), AUDIT_CSV_COLUMNS.join(","));
    }

    #[test]
    fn test_rows_are_quoted_and_missing_values_empty() {
        let csv = String::from_utf8(audit_csv(&[entry()]).unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "2024-01-31T15:45:00Z,load_trial_balance,,ERROR,1.5,,\"loaded, with \"\"quotes\"\"\",bad row"
        );
    }

    #[test]
    fn test_file_name_carries_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 15, 45, 0).unwrap();
        assert_eq!(audit_csv_file_name(at), "audit_log_20240131_154500.csv");
    }
}
