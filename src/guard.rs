// 🛡️ Consistency Guard - keeps the two registries in step
//
// A patient with a future appointment cannot be removed. Removal and its
// cascade over past appointments are checked up front and then applied
// together, so callers never observe one without the other.
//
// "Now" itself is neither past nor future: an appointment starting exactly at
// `now` satisfies neither predicate.

use chrono::NaiveDateTime;

use crate::entities::{Appointment, AppointmentRegistry, Patient, PatientRegistry};
use crate::error::{DeskError, Result};
use crate::input::normalize_identifier;

// ============================================================================
// REMOVAL OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Patient deleted together with their past appointments
    Removed {
        patient: Patient,
        cancelled: Vec<Appointment>,
    },

    /// Patient still has a future appointment; nothing changed
    Blocked { pending: Appointment },
}

impl Removal {
    pub fn is_removed(&self) -> bool {
        matches!(self, Removal::Removed { .. })
    }
}

// ============================================================================
// READ-ONLY QUERIES
// ============================================================================

pub struct ConsistencyGuard<'a> {
    appointments: &'a AppointmentRegistry,
}

impl<'a> ConsistencyGuard<'a> {
    pub fn new(appointments: &'a AppointmentRegistry) -> Self {
        ConsistencyGuard { appointments }
    }

    /// The patient's appointment starting strictly after `now`, if any
    pub fn future_appointment(&self, patient_id: &str, now: NaiveDateTime) -> Option<&'a Appointment> {
        let appointments: &'a AppointmentRegistry = self.appointments;
        appointments
            .iter()
            .find(|a| a.patient_id == patient_id && a.is_future(now))
    }

    pub fn has_future_appointment(&self, patient_id: &str, now: NaiveDateTime) -> bool {
        self.future_appointment(patient_id, now).is_some()
    }

    pub fn has_past_appointment(&self, patient_id: &str, now: NaiveDateTime) -> bool {
        self.appointments.for_patient(patient_id).any(|a| a.is_past(now))
    }
}

// ============================================================================
// MUTATIONS
// ============================================================================

/// Remove every appointment of the patient, returning what was removed
pub fn cancel_all(appointments: &mut AppointmentRegistry, patient_id: &str) -> Vec<Appointment> {
    appointments.remove_where(|a| a.patient_id == patient_id)
}

/// Remove the patient's future appointment, if there is one
pub fn cancel_one(
    appointments: &mut AppointmentRegistry,
    patient_id: &str,
    now: NaiveDateTime,
) -> Option<Appointment> {
    let target = ConsistencyGuard::new(appointments)
        .future_appointment(patient_id, now)?
        .id
        .clone();

    appointments.remove_where(|a| a.id == target).into_iter().next()
}

/// Delete a patient unless a future appointment still references them
pub fn remove_patient(
    patients: &mut PatientRegistry,
    appointments: &mut AppointmentRegistry,
    raw_id: &str,
    now: NaiveDateTime,
) -> Result<Removal> {
    let patient_id = normalize_identifier(raw_id)?;

    if let Some(pending) = ConsistencyGuard::new(appointments).future_appointment(&patient_id, now) {
        return Ok(Removal::Blocked {
            pending: pending.clone(),
        });
    }

    if !patients.contains(&patient_id) {
        return Err(DeskError::PatientNotFound);
    }

    // Both steps below are infallible once the checks above passed
    let cancelled = cancel_all(appointments, &patient_id);
    let patient = patients.remove(&patient_id).ok_or(DeskError::PatientNotFound)?;

    Ok(Removal::Removed { patient, cancelled })
}

// ============================================================================
// TESTS
// ============================================================================
