//! Common imports for working with the queue service

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::ClinicConfig;
pub use crate::database::{AppointmentDatabase, PatientLookup, SqlitePatientDirectory};
pub use crate::engine::QueueEngine;
pub use crate::error::{QueueError, Result};
pub use crate::server::{ClinicServer, ClinicServerBuilder};
pub use crate::types::{
    day_bounds, day_end, day_start, Appointment, AppointmentStatus, DayQueue, PatientSummary,
};
