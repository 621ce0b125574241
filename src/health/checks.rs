use super::models::{CheckSource, DiagnosticResult, HealthSnapshot};
use serde::{Deserialize, Serialize};

/// Object counts the schema must reach for the deployment to be considered complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectedMinimums {
    pub tables: i64,
    pub views: i64,
    pub procedures: i64,
}

impl Default for ExpectedMinimums {
    fn default() -> Self {
        Self {
            tables: 14,
            views: 5,
            procedures: 16,
        }
    }
}

/// Outcome of the "no recent errors" check when the error count could not be read.
///
/// `Pass` keeps the historical dashboard behaviour, where an error count that was
/// never computed counted as healthy. Product owners should confirm whether that is
/// intended; `Fail` treats the unknown the same way as every other check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingErrorCountPolicy {
    #[default]
    Pass,
    Fail,
}

impl MissingErrorCountPolicy {
    fn default_outcome(self) -> bool {
        matches!(self, Self::Pass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub source: CheckSource,
}

impl CheckOutcome {
    fn resolve<T>(value: Option<T>, default: bool, predicate: impl FnOnce(T) -> bool) -> Self {
        match value {
            Some(value) => Self {
                passed: predicate(value),
                source: CheckSource::Evaluated,
            },
            None => Self {
                passed: default,
                source: CheckSource::Defaulted,
            },
        }
    }

    fn into_result(self, name: &str) -> DiagnosticResult {
        DiagnosticResult {
            name: name.to_string(),
            passed: self.passed,
            source: self.source,
        }
    }
}

pub const CHECK_NAMES: [&str; 8] = [
    "tables_present",
    "views_present",
    "procedures_present",
    "fact_rows_loaded",
    "mappings_active",
    "schedule_view_rows",
    "pivot_view_rows",
    "no_recent_errors",
];

/// One field per diagnostic check, every field resolved before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticChecks {
    pub tables_present: CheckOutcome,
    pub views_present: CheckOutcome,
    pub procedures_present: CheckOutcome,
    pub fact_rows_loaded: CheckOutcome,
    pub mappings_active: CheckOutcome,
    pub schedule_view_rows: CheckOutcome,
    pub pivot_view_rows: CheckOutcome,
    pub no_recent_errors: CheckOutcome,
}

impl DiagnosticChecks {
    /// Applies the predicates to whatever the probes returned. Missing values fail,
    /// except the error count which follows `policy`.
    pub fn evaluate(
        snapshot: &HealthSnapshot,
        minimums: &ExpectedMinimums,
        policy: MissingErrorCountPolicy,
    ) -> Self {
        let no_recent_errors = CheckOutcome::resolve(
            snapshot.recent_errors,
            policy.default_outcome(),
            |errors| errors == 0,
        );
        if no_recent_errors.source == CheckSource::Defaulted {
            tracing::warn!(
                policy = ?policy,
                passed = no_recent_errors.passed,
                "Recent error count unavailable, applying default for no_recent_errors"
            );
        }

        Self {
            tables_present: CheckOutcome::resolve(snapshot.tables, false, |n| {
                n >= minimums.tables
            }),
            views_present: CheckOutcome::resolve(snapshot.views, false, |n| n >= minimums.views),
            procedures_present: CheckOutcome::resolve(snapshot.procedures, false, |n| {
                n >= minimums.procedures
            }),
            fact_rows_loaded: CheckOutcome::resolve(snapshot.fact_rows, false, |n| n > 0),
            mappings_active: CheckOutcome::resolve(snapshot.mappings, false, |m| {
                m.total > 0 && m.active == m.total
            }),
            schedule_view_rows: CheckOutcome::resolve(snapshot.schedule_view_rows, false, |n| {
                n > 0
            }),
            pivot_view_rows: CheckOutcome::resolve(snapshot.pivot_view_rows, false, |n| n > 0),
            no_recent_errors,
        }
    }

    pub fn outcomes(&self) -> [CheckOutcome; 8] {
        [
            self.tables_present,
            self.views_present,
            self.procedures_present,
            self.fact_rows_loaded,
            self.mappings_active,
            self.schedule_view_rows,
            self.pivot_view_rows,
            self.no_recent_errors,
        ]
    }

    pub fn results(&self) -> Vec<DiagnosticResult> {
        CHECK_NAMES
            .iter()
            .zip(self.outcomes())
            .map(|(name, outcome)| outcome.into_result(name))
            .collect()
    }
}
