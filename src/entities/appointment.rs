// 📅 Appointment Entity - one booked consultation
//
// An appointment references its patient by normalized identifier only.
// End time is derived from start + duration and never stored on its own.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use uuid::Uuid;

use crate::input::{format_clock, format_date};

// ============================================================================
// APPOINTMENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// Stable identity (UUID)
    pub id: String,

    /// Normalized identifier of the patient
    pub patient_id: String,

    pub date: NaiveDate,

    pub start_time: NaiveTime,

    /// Length in minutes
    pub duration_minutes: i64,
}

impl Appointment {
    pub fn new(patient_id: String, date: NaiveDate, start_time: NaiveTime, duration_minutes: i64) -> Self {
        Appointment {
            id: Uuid::new_v4().to_string(),
            patient_id,
            date,
            start_time,
            duration_minutes,
        }
    }

    pub fn end_time(&self) -> NaiveTime {
        self.start_time + Duration::minutes(self.duration_minutes)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + Duration::minutes(self.duration_minutes)
    }

    /// Starts strictly after `now`
    pub fn is_future(&self, now: NaiveDateTime) -> bool {
        self.starts_at() > now
    }

    /// Starts strictly before `now`
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.starts_at() < now
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Date: {} | Time: {} - {}",
            self.patient_id,
            format_date(self.date),
            format_clock(self.start_time),
            format_clock(self.end_time())
        )
    }
}

// ============================================================================
// AGENDA FILTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaFilter {
    /// Everything, ordered by date then start time
    All,

    /// Dates within `[from, to]`, both ends inclusive, in booking order
    DateRange { from: NaiveDate, to: NaiveDate },
}

impl AgendaFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            AgendaFilter::All => true,
            AgendaFilter::DateRange { from, to } => *from <= appointment.date && appointment.date <= *to,
        }
    }
}

// ============================================================================
// APPOINTMENT REGISTRY
// ============================================================================

/// Booked appointments, in booking order.
#[derive(Debug, Default)]
pub struct AppointmentRegistry {
    appointments: Vec<Appointment>,
}

impl AppointmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an appointment the validation pipeline has already admitted
    pub(crate) fn insert(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter()
    }

    pub fn for_patient<'a>(&'a self, patient_id: &'a str) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments.iter().filter(move |a| a.patient_id == patient_id)
    }

    pub fn list(&self, filter: AgendaFilter) -> Vec<Appointment> {
        let mut listed: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();

        if filter == AgendaFilter::All {
            listed.sort_by_key(|a| (a.date, a.start_time));
        }

        listed
    }

    /// Remove every appointment matching the predicate, returning them
    pub(crate) fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Appointment>
    where
        F: FnMut(&Appointment) -> bool,
    {
        let (removed, kept): (Vec<Appointment>, Vec<Appointment>) =
            self.appointments.drain(..).partition(|a| predicate(a));
        self.appointments = kept;
        removed
    }

    pub fn count(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
