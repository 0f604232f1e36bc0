// 🩺 Booking Pipeline - ordered admission checks for a consultation
//
// The order of the checks decides which error the operator sees first and is
// part of the contract. The pipeline only reads the registries; the desk
// commits the returned slot.

use chrono::NaiveDateTime;

use crate::conflict::Slot;
use crate::entities::{Appointment, AppointmentRegistry, PatientRegistry};
use crate::error::{DeskError, Result};
use crate::guard::ConsistencyGuard;
use crate::input::{format_clock, format_date, is_clock_shaped, normalize_identifier, parse_clock, parse_date};
use crate::policy::ClinicPolicy;

// ============================================================================
// REQUEST / CONFIRMATION
// ============================================================================

/// Raw operator input for one booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub patient_id: String,
    /// DD/MM/YYYY
    pub date: String,
    /// HHMM
    pub start: String,
    /// HHMM
    pub end: String,
}

impl BookingRequest {
    pub fn new(patient_id: &str, date: &str, start: &str, end: &str) -> Self {
        BookingRequest {
            patient_id: patient_id.to_string(),
            date: date.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// A slot that passed every check, bound to its normalized patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedSlot {
    pub patient_id: String,
    pub slot: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub appointment: Appointment,
    pub duration_minutes: i64,
    pub message: String,
}

impl Confirmation {
    pub fn new(appointment: Appointment) -> Self {
        let message = format!(
            "Appointment booked for {} on {} from {} to {} ({} min)",
            appointment.patient_id,
            format_date(appointment.date),
            format_clock(appointment.start_time),
            format_clock(appointment.end_time()),
            appointment.duration_minutes
        );

        Confirmation {
            duration_minutes: appointment.duration_minutes,
            appointment,
            message,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct BookingPipeline<'a> {
    patients: &'a PatientRegistry,
    appointments: &'a AppointmentRegistry,
    policy: &'a ClinicPolicy,
}

impl<'a> BookingPipeline<'a> {
    pub fn new(
        patients: &'a PatientRegistry,
        appointments: &'a AppointmentRegistry,
        policy: &'a ClinicPolicy,
    ) -> Self {
        BookingPipeline {
            patients,
            appointments,
            policy,
        }
    }

    /// Run every check in order against a single reading of `now`
    pub fn validate(&self, request: &BookingRequest, now: NaiveDateTime) -> Result<AdmittedSlot> {
        // 1. Shape of both clock times
        if !is_clock_shaped(&request.start) || !is_clock_shaped(&request.end) {
            return Err(DeskError::InvalidTimeFormat);
        }

        // 2. Patient exists (a malformed id cannot be registered)
        let patient_id = normalize_identifier(&request.patient_id)
            .ok()
            .filter(|id| self.patients.contains(id))
            .ok_or(DeskError::PatientNotFound)?;

        // 3. One future appointment per patient
        let guard = ConsistencyGuard::new(self.appointments);
        if guard.has_future_appointment(&patient_id, now) {
            return Err(DeskError::DuplicateFutureBooking);
        }

        // 4-6. Parse date and clock times
        let date = parse_date(&request.date).ok_or(DeskError::InvalidDateFormat)?;
        let start = parse_clock(&request.start).ok_or(DeskError::InvalidStartTime)?;
        let end = parse_clock(&request.end).ok_or(DeskError::InvalidEndTime)?;

        // 7. Strictly in the future
        if date.and_time(start) <= now {
            return Err(DeskError::AppointmentInPast);
        }

        // 8. Positive duration
        if end <= start {
            return Err(DeskError::EndBeforeStart);
        }

        // 9. Business hours
        if !self.policy.within_business_hours(start, end) {
            return Err(DeskError::OutsideBusinessHours);
        }

        // 10. Slot grid
        if !self.policy.on_grid(start) || !self.policy.on_grid(end) {
            return Err(DeskError::InvalidTimeGranularity {
                granularity: self.policy.slot_granularity_minutes,
            });
        }

        // 11. Agenda collision
        let slot = Slot { date, start, end };
        if self.policy.collision.find_collision(self.appointments, &slot).is_some() {
            return Err(DeskError::SlotAlreadyBooked);
        }

        Ok(AdmittedSlot { patient_id, slot })
    }
}

impl AdmittedSlot {
    pub fn into_appointment(self) -> Appointment {
        let duration = self.slot.duration_minutes();
        Appointment::new(self.patient_id, self.slot.date, self.slot.start, duration)
    }
}

// ============================================================================
// TESTS
// ============================================================================
