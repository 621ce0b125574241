use super::models::{DiagnosticResult, HealthReport, HealthTier};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

/// Lowest score (inclusive) rated EXCELLENT.
pub const EXCELLENT_THRESHOLD: f64 = 90.0;
/// Lowest score (inclusive) rated GOOD.
pub const GOOD_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResponseError for HealthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string(),
        }))
    }
}

/// Reduces resolved boolean checks to a percentage and a tier.
pub struct HealthScorer;

impl HealthScorer {
    /// Scores anonymous checks; they are named `check_1`, `check_2`, ... in the report.
    pub fn compute(checks: &[bool]) -> Result<HealthReport, HealthError> {
        let results = checks
            .iter()
            .enumerate()
            .map(|(idx, passed)| DiagnosticResult::evaluated(format!("check_{}", idx + 1), *passed))
            .collect();

        Self::compute_results(results)
    }

    pub fn compute_results(checks: Vec<DiagnosticResult>) -> Result<HealthReport, HealthError> {
        if checks.is_empty() {
            return Err(HealthError::InvalidInput(
                "at least one check is required to compute a health score".to_string(),
            ));
        }

        let passed = checks.iter().filter(|check| check.passed).count();
        // multiply before dividing so 9/10 lands on exactly 90.0
        let score = (passed as f64 * 100.0) / checks.len() as f64;

        Ok(HealthReport {
            checks,
            score,
            tier: Self::classify(score),
        })
    }

    pub fn classify(score: f64) -> HealthTier {
        if score >= EXCELLENT_THRESHOLD {
            HealthTier::Excellent
        } else if score >= GOOD_THRESHOLD {
            HealthTier::Good
        } else {
            HealthTier::NeedsAttention
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::models::CheckSource;

    fn report(checks: &[bool]) -> HealthReport {
        HealthScorer::compute(checks).unwrap()
    }

    #[test]
    fn test_all_passing_is_excellent() {
        let report = report(&[true; 8]);
        assert_eq!(report.score, 100.0);
        assert_eq!(report.tier, HealthTier::Excellent);
    }

    #[test]
    fn test_one_failure_of_eight_is_good() {
        let mut checks = [true; 8];
        checks[7] = false;
        let report = report(&checks);
        assert_eq!(report.score, 87.5);
        assert_eq!(report.tier, HealthTier::Good);
    }

    #[test]
    fn test_all_failing_needs_attention() {
        let report = report(&[false; 8]);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.tier, HealthTier::NeedsAttention);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = HealthScorer::compute(&[]).unwrap_err();
        assert!(matches!(err, HealthError::InvalidInput(_)));
    }

    #[test]
    fn test_boundaries_are_inclusive_on_lower_bound() {
        let mut nine_of_ten = [true; 10];
        nine_of_ten[0] = false;
        let excellent = report(&nine_of_ten);
        assert_eq!(excellent.score, 90.0);
        assert_eq!(excellent.tier, HealthTier::Excellent);

        let seven_of_ten = [true, true, true, true, true, true, true, false, false, false];
        let good = report(&seven_of_ten);
        assert_eq!(good.score, 70.0);
        assert_eq!(good.tier, HealthTier::Good);

        assert_eq!(HealthScorer::classify(69.999), HealthTier::NeedsAttention);
        assert_eq!(HealthScorer::classify(89.999), HealthTier::Good);
    }

    #[test]
    fn test_score_matches_ratio_for_every_mix() {
        for len in 1..=12usize {
            for passed in 0..=len {
                let checks: Vec<bool> = (0..len).map(|idx| idx < passed).collect();
                let report = report(&checks);
                let expected = 100.0 * passed as f64 / len as f64;
                assert!(
                    (report.score - expected).abs() < 1e-9,
                    "{passed}/{len}: got {}, expected {expected}",
                    report.score
                );
            }
        }
    }

    #[test]
    fn test_tier_depends_on_score_only() {
        let a = report(&[true, false, true, false]);
        let b = report(&[false, true, false, true, true, false, true, false]);
        assert_eq!(a.score, b.score);
        assert_eq!(a.tier, b.tier);
    }

    #[test]
    fn test_inputs_are_preserved_in_order() {
        let report = report(&[true, false, true]);
        let names: Vec<_> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["check_1", "check_2", "check_3"]);
        assert!(!report.checks[1].passed);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.passed_count(), 2);
    }

    #[test]
    fn test_named_results_keep_their_source() {
        let report = HealthScorer::compute_results(vec![
            DiagnosticResult::evaluated("tables_present", true),
            DiagnosticResult::defaulted("no_recent_errors", true),
        ])
        .unwrap();
        assert_eq!(report.checks[1].source, CheckSource::Defaulted);
        assert_eq!(report.tier, HealthTier::Excellent);
    }
}
