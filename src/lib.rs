// Clinic Desk - Core Library
// Exposes all modules for use in the TUI, the line shell, and tests

pub mod booking;
pub mod clock;
pub mod conflict;
pub mod desk;
pub mod entities;
pub mod error;
pub mod guard;
pub mod input;
pub mod logging;
pub mod policy;
pub mod shell;

// Re-export commonly used types
pub use booking::{AdmittedSlot, BookingPipeline, BookingRequest, Confirmation};
pub use clock::FixedClock;
pub use conflict::{CollisionPolicy, Slot};
pub use desk::{AgendaQuery, ClinicDesk};
pub use entities::{AgendaFilter, Appointment, AppointmentRegistry, Patient, PatientRegistry, SortKey};
pub use error::{DeskError, ErrorKind};
pub use guard::{ConsistencyGuard, Removal};
pub use policy::ClinicPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
