use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_WRITES_PER_TABLE: usize = 20;
pub const DEFAULT_MAX_MATCHES_PER_SELECT: usize = 20;
pub const DEFAULT_MAX_TOTAL_MATCHES: usize = 50_000;
pub const DEFAULT_SAMPLE_SIZE: usize = 1_000;
pub const DEFAULT_EXPLOSION_THRESHOLD: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Output caps. `max_writes_per_table` bounds the write index, the other two
/// bound what the matcher emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLimits {
    pub max_writes_per_table: usize,
    pub max_matches_per_select: usize,
    pub max_total_matches: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_writes_per_table: DEFAULT_MAX_WRITES_PER_TABLE,
            max_matches_per_select: DEFAULT_MAX_MATCHES_PER_SELECT,
            max_total_matches: DEFAULT_MAX_TOTAL_MATCHES,
        }
    }
}

impl MatchLimits {
    pub fn validate(&self) -> Result<(), LimitsError> {
        check_non_zero("max_writes_per_table", self.max_writes_per_table)?;
        check_non_zero("max_matches_per_select", self.max_matches_per_select)?;
        check_non_zero("max_total_matches", self.max_total_matches)
    }
}

/// Profiler knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub sample_size: usize,
    pub explosion_threshold: u64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            explosion_threshold: DEFAULT_EXPLOSION_THRESHOLD,
        }
    }
}

impl ProfileSettings {
    pub fn validate(&self) -> Result<(), LimitsError> {
        check_non_zero("sample_size", self.sample_size)?;
        if self.explosion_threshold == 0 {
            return Err(LimitsError::Zero {
                name: "explosion_threshold",
            });
        }
        Ok(())
    }
}

fn check_non_zero(name: &'static str, value: usize) -> Result<(), LimitsError> {
    if value == 0 {
        Err(LimitsError::Zero { name })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_limits_match_documented_values() {
        let limits = MatchLimits::default();

        assert_eq!(limits.max_writes_per_table, 20);
        assert_eq!(limits.max_matches_per_select, 20);
        assert_eq!(limits.max_total_matches, 50_000);
        assert!(limits.validate().is_ok());
    }

    #[rstest]
    #[case(0, 1, 1, "max_writes_per_table")]
    #[case(1, 0, 1, "max_matches_per_select")]
    #[case(1, 1, 0, "max_total_matches")]
    fn zero_limit_returns_error(
        #[case] per_table: usize,
        #[case] per_select: usize,
        #[case] total: usize,
        #[case] expected: &str,
    ) {
        let limits = MatchLimits {
            max_writes_per_table: per_table,
            max_matches_per_select: per_select,
            max_total_matches: total,
        };

        let err = limits.validate().unwrap_err();

        assert_eq!(err.to_string(), format!("{} must be greater than zero", expected));
    }

    #[test]
    fn zero_sample_size_returns_error() {
        let settings = ProfileSettings {
            sample_size: 0,
            ..ProfileSettings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(LimitsError::Zero {
                name: "sample_size"
            })
        );
    }

    #[test]
    fn limits_deserialize_from_json() {
        let json = r#"{"max_writes_per_table":2,"max_matches_per_select":3,"max_total_matches":4}"#;

        let limits: MatchLimits = serde_json::from_str(json).unwrap();

        assert_eq!(limits.max_writes_per_table, 2);
        assert_eq!(limits.max_total_matches, 4);
    }
}
