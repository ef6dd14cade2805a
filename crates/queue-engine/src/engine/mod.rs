//! # Walk-In Queue Engine
//!
//! This module owns the per-day ordering invariants of the walk-in queue and
//! implements every operation against the SQLite store: list, insert,
//! reorder, promote, remove.
//!
//! ## Ordering model
//!
//! Each calendar day holds an independent queue. Among a day's `queued`
//! entries, `queue_order` defines the walk-in sequence; a total order is
//! always recovered by sorting on (`queue_order`, `added_at`). Contiguity of
//! the order values (`0..n-1`) is re-established as a side effect of every
//! reorder, and only there: a promote or remove leaves a silent gap behind,
//! which is harmless because consumers sort by value, not by contiguity.
//!
//! ## Concurrency
//!
//! The engine holds no mutable in-process state. Multiple front-desk
//! terminals act on the same day's queue through independent requests, and
//! the database is the single source of truth. The read-and-renumber step of
//! a reorder runs inside one transaction so two concurrent reorders cannot
//! interleave their writes; insert computes its tail position the same way.
//! Promote is idempotent by construction and safe to retry; insert, reorder,
//! and remove are not, and retries belong to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clinic_queue_engine::clock::SystemClock;
//! use clinic_queue_engine::database::{self, AppointmentDatabase, SqlitePatientDirectory};
//! use clinic_queue_engine::engine::QueueEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = database::connect("sqlite://clinic.db?mode=rwc", 5).await?;
//! let engine = QueueEngine::new(
//!     AppointmentDatabase::with_pool(pool.clone()),
//!     Arc::new(SqlitePatientDirectory::with_pool(pool)),
//!     Arc::new(SystemClock),
//! );
//!
//! let day = chrono::Utc::now();
//! let entry = engine.insert(day, "patient-42", None).await?;
//! engine.reorder(&entry.id, 0).await?;
//! let queue = engine.list_day(day).await?;
//! println!("{} waiting", queue.queued.len());
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use core::QueueEngine;
