// 🏥 Clinic Desk - the one service every operator surface talks to
//
// Owns both registries, the policy and the clock. Every mutating operation
// takes `&mut self`, so reading state, validating and committing happen
// inside one exclusive borrow of both registries together.

use chrono::NaiveDateTime;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::booking::{BookingPipeline, BookingRequest, Confirmation};
use crate::entities::{AgendaFilter, Appointment, AppointmentRegistry, Patient, PatientRegistry, SortKey};
use crate::error::{DeskError, Result};
use crate::guard::{self, ConsistencyGuard, Removal};
use crate::input::{normalize_identifier, parse_date};
use crate::logging::redact_value;
use crate::policy::ClinicPolicy;

/// Agenda listing request as typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaQuery {
    All,
    /// Both bounds as DD/MM/YYYY, inclusive
    DateRange { from: String, to: String },
}

pub struct ClinicDesk {
    patients: PatientRegistry,
    appointments: AppointmentRegistry,
    policy: ClinicPolicy,
    clock: Arc<dyn Clock>,
}

impl ClinicDesk {
    /// Empty desk with the given policy, reading the local system clock
    pub fn new(policy: ClinicPolicy) -> Self {
        Self::with_clock(policy, Arc::new(DefaultClock))
    }

    pub fn with_clock(policy: ClinicPolicy, clock: Arc<dyn Clock>) -> Self {
        ClinicDesk {
            patients: PatientRegistry::new(),
            appointments: AppointmentRegistry::new(),
            policy,
            clock,
        }
    }

    /// Read "now" once; callers thread it through a whole operation
    fn now(&self) -> NaiveDateTime {
        self.clock.local().naive_local()
    }

    pub fn policy(&self) -> &ClinicPolicy {
        &self.policy
    }

    pub fn patients(&self) -> &PatientRegistry {
        &self.patients
    }

    pub fn appointments(&self) -> &AppointmentRegistry {
        &self.appointments
    }

    // ========================================================================
    // PATIENTS
    // ========================================================================

    pub fn register_patient(&mut self, id: &str, name: &str, birth_date: &str) -> Result<Patient> {
        let today = self.now().date();

        match self.patients.register(id, name, birth_date, &self.policy, today) {
            Ok(patient) => {
                info!(patient = redact_value(&patient.id), "patient registered");
                Ok(patient)
            }
            Err(err) => {
                debug!(kind = err.kind().as_str(), error = err.label(), "registration rejected");
                Err(err)
            }
        }
    }

    pub fn remove_patient(&mut self, id: &str) -> Result<Removal> {
        let now = self.now();
        let outcome = guard::remove_patient(&mut self.patients, &mut self.appointments, id, now);

        match &outcome {
            Ok(Removal::Removed { patient, cancelled }) => info!(
                patient = redact_value(&patient.id),
                cancelled = cancelled.len(),
                "patient removed"
            ),
            Ok(Removal::Blocked { pending }) => warn!(
                patient = redact_value(&pending.patient_id),
                "removal blocked by future appointment"
            ),
            Err(err) => debug!(kind = err.kind().as_str(), error = err.label(), "removal rejected"),
        }

        outcome
    }

    pub fn find_patient(&self, id: &str) -> Option<&Patient> {
        let id = normalize_identifier(id).ok()?;
        self.patients.find(&id)
    }

    pub fn list_patients(&self, key: SortKey) -> Vec<Patient> {
        self.patients.sorted_by(key)
    }

    // ========================================================================
    // AGENDA
    // ========================================================================

    pub fn book_appointment(&mut self, patient_id: &str, date: &str, start: &str, end: &str) -> Result<Confirmation> {
        let now = self.now();
        let request = BookingRequest::new(patient_id, date, start, end);

        let admitted = BookingPipeline::new(&self.patients, &self.appointments, &self.policy)
            .validate(&request, now)
            .inspect_err(|err| {
                debug!(kind = err.kind().as_str(), error = err.label(), "booking rejected");
            })?;

        let appointment = admitted.into_appointment();
        self.appointments.insert(appointment.clone());

        info!(
            patient = redact_value(&appointment.patient_id),
            date = %appointment.date,
            start = %appointment.start_time,
            duration = appointment.duration_minutes,
            "appointment booked"
        );

        Ok(Confirmation::new(appointment))
    }

    /// Cancel the patient's future appointment. False when there is none.
    pub fn cancel_appointment(&mut self, patient_id: &str) -> bool {
        let now = self.now();
        let Ok(patient_id) = normalize_identifier(patient_id) else {
            debug!("cancellation with malformed identifier");
            return false;
        };

        match guard::cancel_one(&mut self.appointments, &patient_id, now) {
            Some(cancelled) => {
                info!(
                    patient = redact_value(&patient_id),
                    date = %cancelled.date,
                    start = %cancelled.start_time,
                    "appointment cancelled"
                );
                true
            }
            None => {
                debug!(patient = redact_value(&patient_id), "nothing to cancel");
                false
            }
        }
    }

    pub fn list_appointments(&self, query: &AgendaQuery) -> Result<Vec<Appointment>> {
        let filter = match query {
            AgendaQuery::All => AgendaFilter::All,
            AgendaQuery::DateRange { from, to } => AgendaFilter::DateRange {
                from: parse_date(from).ok_or(DeskError::InvalidDateFormat)?,
                to: parse_date(to).ok_or(DeskError::InvalidDateFormat)?,
            },
        };

        Ok(self.appointments.list(filter))
    }

    /// Every appointment of one patient, in booking order
    pub fn appointments_for(&self, patient_id: &str) -> Vec<Appointment> {
        match normalize_identifier(patient_id) {
            Ok(id) => self.appointments.for_patient(&id).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// The patient's pending appointment, if any
    pub fn future_appointment(&self, patient_id: &str) -> Option<Appointment> {
        let id = normalize_identifier(patient_id).ok()?;
        ConsistencyGuard::new(&self.appointments)
            .future_appointment(&id, self.now())
            .cloned()
    }
}

impl Default for ClinicDesk {
    fn default() -> Self {
        Self::new(ClinicPolicy::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
