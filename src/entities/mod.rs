// Entity Models
//
// Each entity has:
// - Stable identity that NEVER changes
// - A registry owning every instance for the life of the process

pub mod appointment;
pub mod patient;

pub use appointment::{AgendaFilter, Appointment, AppointmentRegistry};
pub use patient::{Patient, PatientRegistry, SortKey};
