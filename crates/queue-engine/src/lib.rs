//! # Clinic-Queue-Engine
//!
//! Daily walk-in queue engine and HTTP boundary for a single-clinic front
//! desk.
//!
//! The design core is the per-day appointment queue: an ordered, mutable
//! sequence of `queued` patients per calendar day, with tail insertion,
//! position reordering, promotion to `visited`, and mid-queue deletion,
//! correct while several staff terminals act on the same day's queue
//! concurrently. Everything around it is a thin boundary: route handlers,
//! the identity gate from `clinic-staff-core`, and a patient lookup
//! collaborator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ClinicServer                │
//! ├─────────────────────────────────────────┤
//! │   REST API  │  Role Policy (staff-core) │
//! ├─────────────────────────────────────────┤
//! │              QueueEngine                │
//! ├─────────────────────────────────────────┤
//! │   SQLite (appointments, patients)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The engine module documents the ordering model and concurrency rules; the
//! API module documents the authorization caller contract.

pub mod api;
pub mod clock;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod server;
pub mod types;

pub mod prelude;

pub use clock::{Clock, SystemClock};
pub use config::ClinicConfig;
pub use engine::QueueEngine;
pub use error::{QueueError, Result};
pub use server::{ClinicServer, ClinicServerBuilder};
pub use types::{Appointment, AppointmentStatus, DayQueue, PatientSummary};
