// 📋 Clinic Policy - Rules as Data
// Eligibility threshold, business hours, slot grid and collision strategy

use anyhow::{bail, Context as AnyhowContext, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::conflict::CollisionPolicy;

// ============================================================================
// CLINIC POLICY
// ============================================================================

/// Upper bound accepted for `minimum_age_years`
pub const MAX_MINIMUM_AGE_YEARS: u32 = 150;

/// Every tunable rule the desk enforces.
///
/// The defaults are the clinic's standing rules. A JSON file may override any
/// subset of them; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicPolicy {
    /// Patients younger than this need a guardian and cannot self-register
    pub minimum_age_years: u32,

    /// Minimum number of characters in a patient name
    pub minimum_name_length: usize,

    /// First bookable instant of the day (inclusive)
    pub opening_time: NaiveTime,

    /// End of the working day (exclusive); appointments must end by then
    pub closing_time: NaiveTime,

    /// Start and end minutes must be multiples of this
    pub slot_granularity_minutes: u32,

    /// How candidate slots are compared against booked ones
    pub collision: CollisionPolicy,
}

impl Default for ClinicPolicy {
    fn default() -> Self {
        ClinicPolicy {
            minimum_age_years: 13,
            minimum_name_length: 5,
            opening_time: NaiveTime::MIN + chrono::Duration::hours(8),
            closing_time: NaiveTime::MIN + chrono::Duration::hours(19),
            slot_granularity_minutes: 15,
            collision: CollisionPolicy::ExactStart,
        }
    }
}

impl ClinicPolicy {
    /// Load a policy from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read policy file: {:?}", path.as_ref()))?;

        let policy: ClinicPolicy =
            serde_json::from_str(&content).context("Failed to parse policy JSON")?;

        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.opening_time >= self.closing_time {
            bail!(
                "opening time {} must be before closing time {}",
                self.opening_time.format("%H:%M"),
                self.closing_time.format("%H:%M")
            );
        }

        let grid = self.slot_granularity_minutes;
        if grid == 0 || grid > 60 || 60 % grid != 0 {
            bail!("slot granularity must divide an hour, got {} minutes", grid);
        }

        if self.minimum_age_years > MAX_MINIMUM_AGE_YEARS {
            bail!(
                "minimum age must be at most {} years, got {}",
                MAX_MINIMUM_AGE_YEARS,
                self.minimum_age_years
            );
        }

        if self.minimum_name_length == 0 {
            bail!("minimum name length must be at least 1");
        }

        Ok(())
    }

    /// True when `[start, end)` fits inside business hours
    pub fn within_business_hours(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.opening_time && end <= self.closing_time
    }

    /// True when the minute component sits on the slot grid
    pub fn on_grid(&self, time: NaiveTime) -> bool {
        time.minute() % self.slot_granularity_minutes == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = ClinicPolicy::default();

        assert_eq!(policy.minimum_age_years, 13);
        assert_eq!(policy.minimum_name_length, 5);
        assert_eq!(policy.opening_time, hm(8, 0));
        assert_eq!(policy.closing_time, hm(19, 0));
        assert_eq!(policy.slot_granularity_minutes, 15);
        assert_eq!(policy.collision, CollisionPolicy::ExactStart);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_business_hours_are_half_open() {
        let policy = ClinicPolicy::default();

        assert!(policy.within_business_hours(hm(8, 0), hm(8, 30)));
        assert!(policy.within_business_hours(hm(18, 45), hm(19, 0)));
        assert!(!policy.within_business_hours(hm(7, 45), hm(8, 15)));
        assert!(!policy.within_business_hours(hm(18, 45), hm(19, 15)));
    }

    #[test]
    fn test_grid() {
        let policy = ClinicPolicy::default();

        assert!(policy.on_grid(hm(9, 0)));
        assert!(policy.on_grid(hm(9, 45)));
        assert!(!policy.on_grid(hm(9, 10)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: ClinicPolicy = serde_json::from_str(
            r#"{ "minimum_age_years": 18, "collision": "interval_overlap" }"#,
        )
        .unwrap();

        assert_eq!(policy.minimum_age_years, 18);
        assert_eq!(policy.collision, CollisionPolicy::IntervalOverlap);
        assert_eq!(policy.slot_granularity_minutes, 15);
        assert_eq!(policy.closing_time, hm(19, 0));
    }

    #[test]
    fn test_invalid_policies_rejected() {
        let inverted = ClinicPolicy {
            opening_time: hm(19, 0),
            closing_time: hm(8, 0),
            ..ClinicPolicy::default()
        };
        assert!(inverted.validate().is_err());

        let odd_grid = ClinicPolicy {
            slot_granularity_minutes: 7,
            ..ClinicPolicy::default()
        };
        assert!(odd_grid.validate().is_err());

        let no_grid = ClinicPolicy {
            slot_granularity_minutes: 0,
            ..ClinicPolicy::default()
        };
        assert!(no_grid.validate().is_err());

        let huge_age = ClinicPolicy {
            minimum_age_years: u32::MAX,
            ..ClinicPolicy::default()
        };
        assert!(huge_age.validate().is_err());

        let oldest_allowed = ClinicPolicy {
            minimum_age_years: MAX_MINIMUM_AGE_YEARS,
            ..ClinicPolicy::default()
        };
        assert!(oldest_allowed.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("clinic-policy-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "opening_time": "07:30:00" }"#).unwrap();

        let policy = ClinicPolicy::from_file(&path).unwrap();
        assert_eq!(policy.opening_time, hm(7, 30));

        fs::remove_file(&path).unwrap();
        assert!(ClinicPolicy::from_file(&path).is_err());
    }
}
