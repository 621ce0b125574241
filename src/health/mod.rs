mod checker;
mod checks;
mod models;
mod scorer;

pub use checker::{HealthChecker, HealthTargets};
pub use checks::{
    CheckOutcome, DiagnosticChecks, ExpectedMinimums, MissingErrorCountPolicy, CHECK_NAMES,
};
pub use models::{
    CheckSource, DiagnosticResult, HealthCheckResponse, HealthReport, HealthSnapshot, HealthTier,
    MappingCounts, ReadinessReport,
};
pub use scorer::{HealthError, HealthScorer, EXCELLENT_THRESHOLD, GOOD_THRESHOLD};
