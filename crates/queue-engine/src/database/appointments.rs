//! Appointment storage operations
//!
//! Plain-pool methods serve single-record reads and conditional writes. The
//! `_in` variants take a borrowed connection so the engine can compose them
//! inside one transaction: the read of a day's sequence and the renumbering
//! writes must not interleave with another writer's.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::Result;
use crate::types::Appointment;

/// Async appointment store over a shared pool
#[derive(Clone)]
pub struct AppointmentDatabase {
    pool: SqlitePool,
}

/// Appointment record that derives from database rows automatically
#[derive(sqlx::FromRow, Debug, Clone)]
struct AppointmentRow {
    id: String,
    patient_id: String,
    day: DateTime<Utc>,
    queue_order: i64,
    status: String,
    added_at: DateTime<Utc>,
    added_by: Option<String>,
    visited_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "id, patient_id, day, queue_order, status, added_at, added_by, visited_at";

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment> {
        Ok(Appointment {
            status: self.status.parse()?,
            id: self.id,
            patient_id: self.patient_id,
            day: self.day,
            queue_order: self.queue_order,
            added_at: self.added_at,
            added_by: self.added_by,
            visited_at: self.visited_at,
            patient: None,
        })
    }
}

fn rows_into_appointments(rows: Vec<AppointmentRow>) -> Result<Vec<Appointment>> {
    rows.into_iter()
        .map(AppointmentRow::into_appointment)
        .collect()
}

impl AppointmentDatabase {
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch a single appointment by ID
    pub async fn fetch(&self, id: &str) -> Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_appointment).transpose()
    }

    /// Queued entries for a day, ascending by (queue_order, added_at)
    ///
    /// `added_at` breaks ties so the sort stays total even if two entries
    /// ever share an order value.
    pub async fn queued_for_day(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let mut conn = self.pool.acquire().await?;
        Self::queued_for_day_in(&mut conn, start, end).await
    }

    /// Entries visited within a day, ascending by visited_at
    pub async fn visited_for_day(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE status = 'visited' AND visited_at >= $1 AND visited_at <= $2
             ORDER BY visited_at ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows_into_appointments(rows)
    }

    /// Promote to visited, only if still queued; returns affected row count
    pub async fn mark_visited_if_queued(
        &self,
        id: &str,
        visited_at: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE appointments SET status = 'visited', visited_at = $1
             WHERE id = $2 AND status = 'queued'",
        )
        .bind(visited_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete, only if still queued; returns affected row count
    pub async fn delete_if_queued(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1 AND status = 'queued'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Transaction-scoped: queued entries for a day, in queue order
    pub async fn queued_for_day_in(
        conn: &mut SqliteConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE status = 'queued' AND day >= $1 AND day <= $2
             ORDER BY queue_order ASC, added_at ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await?;

        rows_into_appointments(rows)
    }

    /// Transaction-scoped: highest order value among a day's entries
    ///
    /// Spans both statuses on purpose: a promoted entry's stale order must
    /// still push new insertions past it.
    pub async fn max_order_for_day_in(
        conn: &mut SqliteConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        let max = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(queue_order) FROM appointments WHERE day >= $1 AND day <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(conn)
        .await?;

        Ok(max)
    }

    /// Transaction-scoped: insert a freshly-created entry
    pub async fn insert_row_in(conn: &mut SqliteConnection, entry: &Appointment) -> Result<()> {
        sqlx::query(
            "INSERT INTO appointments (id, patient_id, day, queue_order, status, added_at, added_by, visited_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&entry.id)
        .bind(&entry.patient_id)
        .bind(entry.day)
        .bind(entry.queue_order)
        .bind(entry.status.as_str())
        .bind(entry.added_at)
        .bind(&entry.added_by)
        .bind(entry.visited_at)
        .execute(conn)
        .await?;

        debug!(
            "Inserted appointment {} at position {}",
            entry.id, entry.queue_order
        );
        Ok(())
    }

    /// Transaction-scoped: rewrite one entry's order value
    pub async fn set_order_in(conn: &mut SqliteConnection, id: &str, order: i64) -> Result<()> {
        sqlx::query("UPDATE appointments SET queue_order = $1 WHERE id = $2")
            .bind(order)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
