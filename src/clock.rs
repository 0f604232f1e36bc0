// 🕰️ Fixed Clock - a `mockable::Clock` frozen at one local instant
//
// The desk reads "now" through `Arc<dyn Clock>`; production uses
// `DefaultClock`, rehearsals and tests pin the instant with this one.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    local_now: DateTime<Local>,
}

impl FixedClock {
    /// Clock pinned to a wall-clock time in the local zone.
    ///
    /// None when that time does not exist locally (skipped by a DST change).
    pub fn at(local_now: NaiveDateTime) -> Option<Self> {
        let local_now = Local.from_local_datetime(&local_now).earliest()?;
        Some(FixedClock { local_now })
    }

    pub fn shared(self) -> Arc<dyn Clock> {
        Arc::new(self)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.local_now
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local_now.with_timezone(&Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_clock_reads_back_local_time() {
        let naive = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let clock = FixedClock::at(naive).unwrap();

        assert_eq!(clock.local().naive_local(), naive);
        assert_eq!(clock.utc(), clock.local().with_timezone(&Utc));
        assert_eq!(clock.shared().local().naive_local(), naive);
    }
}
