use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_MAX_GROUPS;
use crate::error::{StatsError, StatsResult};

/// Dashboard-wide chart configuration.
///
/// Serializable so hosts can persist chart setup alongside course settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Requested bucket count for the grade distribution.
    #[serde(default = "default_grade_buckets")]
    pub grade_buckets: usize,
    /// Requested bucket count for attempts before success.
    #[serde(default = "default_attempt_buckets")]
    pub attempt_buckets: usize,
    /// Lower bound of the attempts histogram; the upper bound comes from data.
    #[serde(default)]
    pub attempts_min: u32,
    /// Display ceiling for per-value bar charts.
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            grade_buckets: default_grade_buckets(),
            attempt_buckets: default_attempt_buckets(),
            attempts_min: 0,
            max_groups: default_max_groups(),
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn with_grade_buckets(mut self, grade_buckets: usize) -> Self {
        self.grade_buckets = grade_buckets;
        self
    }

    #[must_use]
    pub fn with_attempt_buckets(mut self, attempt_buckets: usize) -> Self {
        self.attempt_buckets = attempt_buckets;
        self
    }

    #[must_use]
    pub fn with_attempts_min(mut self, attempts_min: u32) -> Self {
        self.attempts_min = attempts_min;
        self
    }

    #[must_use]
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    pub fn validate(self) -> StatsResult<Self> {
        for (name, value) in [
            ("grade_buckets", self.grade_buckets),
            ("attempt_buckets", self.attempt_buckets),
            ("max_groups", self.max_groups),
        ] {
            if value == 0 {
                return Err(StatsError::InvalidArgument(format!(
                    "dashboard config `{name}` must be > 0"
                )));
            }
        }
        Ok(self)
    }

    /// Parses and validates a JSON config; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> StatsResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            StatsError::InvalidData(format!("failed to parse dashboard config: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(self) -> StatsResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            StatsError::InvalidData(format!("failed to serialize dashboard config: {e}"))
        })
    }
}

fn default_grade_buckets() -> usize {
    20
}

fn default_attempt_buckets() -> usize {
    100
}

fn default_max_groups() -> usize {
    DEFAULT_MAX_GROUPS
}
