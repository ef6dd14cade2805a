//! Queue engine operations

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::database::{AppointmentDatabase, PatientLookup};
use crate::error::{QueueError, Result};
use crate::types::{day_bounds, day_start, Appointment, AppointmentStatus, DayQueue};

/// The daily walk-in queue engine
///
/// Holds a store handle, a patient lookup, and an injected clock; all queue
/// state lives in the store.
pub struct QueueEngine {
    db: AppointmentDatabase,
    patients: Arc<dyn PatientLookup>,
    clock: Arc<dyn Clock>,
}

impl QueueEngine {
    pub fn new(
        db: AppointmentDatabase,
        patients: Arc<dyn PatientLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, patients, clock }
    }

    pub fn db(&self) -> &AppointmentDatabase {
        &self.db
    }

    /// Both views of a day's queue
    ///
    /// `queued` is sorted ascending by (`queue_order`, `added_at`); the
    /// `added_at` tie-break keeps the sort total even if two entries ever
    /// share an order value. `visited` holds the entries whose `visited_at`
    /// falls within the day, ascending by `visited_at`. Pure read, safe to
    /// retry.
    pub async fn list_day(&self, day: DateTime<Utc>) -> Result<DayQueue> {
        let (start, end) = day_bounds(day);

        let queued = self.db.queued_for_day(start, end).await?;
        let visited = self.db.visited_for_day(start, end).await?;

        Ok(DayQueue {
            queued: self.attach_patients(queued).await?,
            visited: self.attach_patients(visited).await?,
        })
    }

    /// Append a walk-in at the tail of a day's queue
    ///
    /// The tail position is one past the day's highest order value, computed
    /// and written inside one transaction. Fails with `NotFound` if the
    /// patient reference does not resolve. Not idempotent; a blind retry adds
    /// a second entry.
    pub async fn insert(
        &self,
        day: DateTime<Utc>,
        patient_id: &str,
        added_by: Option<&str>,
    ) -> Result<Appointment> {
        let patient = self
            .patients
            .resolve(patient_id)
            .await?
            .ok_or_else(|| QueueError::NotFound("Patient".to_string()))?;

        let now = self.clock.now();
        let day = day_start(day);
        let (start, end) = day_bounds(day);

        let mut tx = self.db.pool().begin().await?;
        let max_order = AppointmentDatabase::max_order_for_day_in(&mut tx, start, end).await?;

        let entry = Appointment {
            id: Appointment::new_id(),
            patient_id: patient_id.to_string(),
            day,
            queue_order: max_order.unwrap_or(-1) + 1,
            status: AppointmentStatus::Queued,
            added_at: now,
            added_by: added_by.map(str::to_string),
            visited_at: None,
            patient: None,
        };
        AppointmentDatabase::insert_row_in(&mut tx, &entry).await?;
        tx.commit().await?;

        info!(
            "Queued patient {} for {} at position {}",
            patient.name,
            day.date_naive(),
            entry.queue_order
        );

        Ok(Appointment {
            patient: Some(patient),
            ..entry
        })
    }

    /// Move a queued entry to a target position in its day's sequence
    ///
    /// The current sequence is re-read inside the transaction that writes the
    /// renumbering; caller-supplied positions are never trusted, so two
    /// interleaved reorders still converge on a clean permutation. The target
    /// index is clamped to the end of the sequence. Renumbering assigns each
    /// entry its positional index, restoring contiguity `0..n-1`.
    ///
    /// No-op when the entry is not among its day's queued set (already
    /// visited) or already sits at the clamped target. Not safe to retry
    /// blindly: a second application may move the entry again relative to
    /// other writers.
    pub async fn reorder(&self, id: &str, target_index: usize) -> Result<Appointment> {
        let entry = self
            .db
            .fetch(id)
            .await?
            .ok_or_else(|| QueueError::NotFound("Appointment".to_string()))?;

        if entry.status != AppointmentStatus::Queued {
            return self.attach_patient(entry).await;
        }

        let (start, end) = day_bounds(entry.day);

        let mut tx = self.db.pool().begin().await?;
        let mut sequence = AppointmentDatabase::queued_for_day_in(&mut tx, start, end).await?;

        let Some(from) = sequence.iter().position(|a| a.id == id) else {
            // Promoted or removed between the fetch above and this read.
            drop(tx);
            return self.attach_patient(entry).await;
        };

        let to = target_index.min(sequence.len() - 1);
        if from == to {
            // Release the transaction's connection before reading again; a
            // single-connection pool would otherwise starve the fetch below.
            drop(tx);
            return self.attach_patient(entry).await;
        }

        let moved = sequence.remove(from);
        sequence.insert(to, moved);

        for (position, row) in sequence.iter().enumerate() {
            if row.queue_order != position as i64 {
                AppointmentDatabase::set_order_in(&mut tx, &row.id, position as i64).await?;
            }
        }
        tx.commit().await?;
        debug!("Reordered appointment {} from {} to {}", id, from, to);

        let fresh = self
            .db
            .fetch(id)
            .await?
            .ok_or_else(|| QueueError::NotFound("Appointment".to_string()))?;
        self.attach_patient(fresh).await
    }

    /// Mark a queued entry as visited
    ///
    /// Idempotent: promoting an already-visited entry returns it unchanged
    /// and never re-stamps `visited_at`, so retried client requests are
    /// harmless. The remaining queued entries keep their order values: the
    /// vacated slot stays until the next reorder, and the sort-by-value
    /// listing never shows it.
    pub async fn promote(&self, id: &str) -> Result<Appointment> {
        let entry = self
            .db
            .fetch(id)
            .await?
            .ok_or_else(|| QueueError::NotFound("Appointment".to_string()))?;

        if entry.status == AppointmentStatus::Visited {
            return self.attach_patient(entry).await;
        }

        let now = self.clock.now();
        let updated = self.db.mark_visited_if_queued(id, now).await?;
        if updated > 0 {
            info!("Appointment {} promoted to visited", id);
        }
        // Zero rows means a concurrent promote won; the fresh read below
        // returns its timestamp either way.

        let fresh = self
            .db
            .fetch(id)
            .await?
            .ok_or_else(|| QueueError::NotFound("Appointment".to_string()))?;
        self.attach_patient(fresh).await
    }

    /// Delete a queued entry outright
    ///
    /// A visited entry is immutable history: deleting one fails with
    /// `Conflict` and leaves the record in place. Remaining entries keep
    /// their order values (same lazy compaction as promote). Not idempotent.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let deleted = self.db.delete_if_queued(id).await?;
        if deleted > 0 {
            info!("Appointment {} removed from queue", id);
            return Ok(());
        }

        match self.db.fetch(id).await? {
            Some(_) => Err(QueueError::Conflict(
                "appointment already visited".to_string(),
            )),
            None => Err(QueueError::NotFound("Appointment".to_string())),
        }
    }

    async fn attach_patient(&self, mut entry: Appointment) -> Result<Appointment> {
        entry.patient = self.patients.resolve(&entry.patient_id).await?;
        Ok(entry)
    }

    // Walk-in queues are small; resolving summaries row by row keeps the
    // patient subsystem behind its one seam.
    async fn attach_patients(&self, entries: Vec<Appointment>) -> Result<Vec<Appointment>> {
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(self.attach_patient(entry).await?);
        }
        Ok(out)
    }
}
