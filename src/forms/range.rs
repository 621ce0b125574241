use serde::{Deserialize, Serialize};

/// Trailing time window selectable on the monitoring and audit views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    LastHour,
    #[default]
    #[value(name = "last-24-hours")]
    #[serde(rename = "last_24_hours")]
    Last24Hours,
    #[value(name = "last-7-days")]
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[value(name = "last-30-days")]
    #[serde(rename = "last_30_days")]
    Last30Days,
    All,
}

impl TimeRange {
    /// Window length in hours, `None` for no lower bound.
    pub fn hours(self) -> Option<i64> {
        match self {
            Self::LastHour => Some(1),
            Self::Last24Hours => Some(24),
            Self::Last7Days => Some(168),
            Self::Last30Days => Some(720),
            Self::All => None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: TimeRange,
}
