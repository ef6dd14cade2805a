//! SQLite-backed storage for the queue engine
//!
//! The pool is the single source of truth for queue state; nothing is cached
//! across requests, because stale order values under concurrent front-desk
//! use would break the ordering invariant. Conditional writes (`… WHERE
//! status = 'queued'`) reject records that no longer match their
//! precondition, and multi-record writes run inside explicit transactions.

pub mod appointments;
pub mod patients;

pub use appointments::AppointmentDatabase;
pub use patients::{PatientLookup, SqlitePatientDirectory};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL,
        day TEXT NOT NULL,
        queue_order INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'queued',
        added_at TEXT NOT NULL,
        added_by TEXT,
        visited_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_appointments_day_order ON appointments (day, queue_order)",
    r#"
    CREATE TABLE IF NOT EXISTS patients (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER,
        gender TEXT,
        phone TEXT
    )
    "#,
];

/// Open a pool and ensure the schema exists
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    // Every pooled connection to ":memory:" opens its own empty database, so
    // an in-memory URL must be pinned to a single connection.
    let max_connections = if database_url.contains(":memory:") {
        1
    } else {
        max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    info!("Queue database ready at {}", database_url);
    Ok(pool)
}
