// ⏱️ Conflict Detector - does a candidate slot collide with the agenda?
//
// Two strategies:
// - ExactStart (default): same date, hour and minute of start
// - IntervalOverlap: half-open [start, end) ranges intersect on the same date

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::entities::{Appointment, AppointmentRegistry};

// ============================================================================
// SLOT
// ============================================================================

/// A candidate consultation not yet on the agenda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// ============================================================================
// COLLISION POLICY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Collide only when the start instants are identical.
    /// Back-to-back and partially overlapping slots are allowed.
    #[default]
    ExactStart,

    /// Collide whenever the two half-open intervals share any minute
    IntervalOverlap,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::ExactStart => "exact start",
            CollisionPolicy::IntervalOverlap => "interval overlap",
        }
    }

    /// The single predicate the booking pipeline relies on
    pub fn collides(&self, existing: &Appointment, candidate: &Slot) -> bool {
        if existing.date != candidate.date {
            return false;
        }

        match self {
            CollisionPolicy::ExactStart => {
                existing.start_time.hour() == candidate.start.hour()
                    && existing.start_time.minute() == candidate.start.minute()
            }
            CollisionPolicy::IntervalOverlap => {
                existing.start_time < candidate.end && candidate.start < existing.end_time()
            }
        }
    }

    /// First booked appointment the candidate collides with, if any
    pub fn find_collision<'a>(
        &self,
        agenda: &'a AppointmentRegistry,
        candidate: &Slot,
    ) -> Option<&'a Appointment> {
        agenda.iter().find(|existing| self.collides(existing, candidate))
    }
}

// ============================================================================
// TESTS
// ============================================================================
