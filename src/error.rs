use thiserror::Error;

/// Why the desk rejected a request.
///
/// Every variant names exactly one failed precondition; a rejected request
/// never leaves either registry modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    #[error("invalid identifier: expected 11 digits, optionally as ###.###.###-##")]
    InvalidIdentifierFormat,

    #[error("invalid time format: use HHMM")]
    InvalidTimeFormat,

    #[error("invalid date: use DD/MM/YYYY")]
    InvalidDateFormat,

    #[error("invalid start time: use HHMM")]
    InvalidStartTime,

    #[error("invalid end time: use HHMM")]
    InvalidEndTime,

    #[error("name must have at least {minimum} characters")]
    InvalidName { minimum: usize },

    #[error("patient is younger than {minimum_age} and needs a guardian")]
    UnderageWithoutGuardian { minimum_age: u32 },

    #[error("a patient with identifier {0} is already registered")]
    DuplicateIdentifier(String),

    #[error("patient not found")]
    PatientNotFound,

    #[error("appointment must be in the future")]
    AppointmentInPast,

    #[error("end time must be after start time")]
    EndBeforeStart,

    #[error("appointment is outside business hours")]
    OutsideBusinessHours,

    #[error("start and end minutes must be multiples of {granularity}")]
    InvalidTimeGranularity { granularity: u32 },

    #[error("there is already an appointment at that time")]
    SlotAlreadyBooked,

    #[error("patient already has a future appointment")]
    DuplicateFutureBooking,
}

/// Coarse category of a [`DeskError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed operator input; re-prompting fixes it
    InputShape,
    /// The request is well-formed but the patient is not eligible
    Eligibility,
    /// The slot breaks a scheduling rule
    SchedulingPolicy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputShape => "input-shape",
            ErrorKind::Eligibility => "eligibility",
            ErrorKind::SchedulingPolicy => "scheduling-policy",
        }
    }
}

impl DeskError {
    /// Stable variant name; carries no patient data, so it is always safe to log
    pub fn label(&self) -> &'static str {
        match self {
            DeskError::InvalidIdentifierFormat => "invalid_identifier_format",
            DeskError::InvalidTimeFormat => "invalid_time_format",
            DeskError::InvalidDateFormat => "invalid_date_format",
            DeskError::InvalidStartTime => "invalid_start_time",
            DeskError::InvalidEndTime => "invalid_end_time",
            DeskError::InvalidName { .. } => "invalid_name",
            DeskError::UnderageWithoutGuardian { .. } => "underage_without_guardian",
            DeskError::DuplicateIdentifier(_) => "duplicate_identifier",
            DeskError::PatientNotFound => "patient_not_found",
            DeskError::AppointmentInPast => "appointment_in_past",
            DeskError::EndBeforeStart => "end_before_start",
            DeskError::OutsideBusinessHours => "outside_business_hours",
            DeskError::InvalidTimeGranularity { .. } => "invalid_time_granularity",
            DeskError::SlotAlreadyBooked => "slot_already_booked",
            DeskError::DuplicateFutureBooking => "duplicate_future_booking",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::InvalidIdentifierFormat
            | DeskError::InvalidTimeFormat
            | DeskError::InvalidDateFormat
            | DeskError::InvalidStartTime
            | DeskError::InvalidEndTime => ErrorKind::InputShape,

            DeskError::InvalidName { .. }
            | DeskError::UnderageWithoutGuardian { .. }
            | DeskError::DuplicateIdentifier(_)
            | DeskError::PatientNotFound => ErrorKind::Eligibility,

            DeskError::AppointmentInPast
            | DeskError::EndBeforeStart
            | DeskError::OutsideBusinessHours
            | DeskError::InvalidTimeGranularity { .. }
            | DeskError::SlotAlreadyBooked
            | DeskError::DuplicateFutureBooking => ErrorKind::SchedulingPolicy,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DeskError::InvalidTimeFormat.kind(), ErrorKind::InputShape);
        assert_eq!(DeskError::PatientNotFound.kind(), ErrorKind::Eligibility);
        assert_eq!(DeskError::SlotAlreadyBooked.kind(), ErrorKind::SchedulingPolicy);
        assert_eq!(
            DeskError::InvalidTimeGranularity { granularity: 15 }.kind(),
            ErrorKind::SchedulingPolicy
        );
    }

    #[test]
    fn test_messages_carry_policy_values() {
        assert_eq!(
            DeskError::InvalidName { minimum: 5 }.to_string(),
            "name must have at least 5 characters"
        );
        assert_eq!(
            DeskError::DuplicateIdentifier("123.456.789-01".to_string()).to_string(),
            "a patient with identifier 123.456.789-01 is already registered"
        );
    }

    #[test]
    fn test_labels_never_carry_identifiers() {
        let err = DeskError::DuplicateIdentifier("123.456.789-01".to_string());
        assert_eq!(err.label(), "duplicate_identifier");
        assert!(!err.label().contains("123"));
    }
}
