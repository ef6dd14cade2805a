//! Core types for the queue engine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QueueError;

/// Lifecycle state of a queue entry
///
/// The transition is monotonic: `Queued → Visited`, never back. A visited
/// entry is history and leaves the active ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Queued,
    Visited,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Queued => "queued",
            AppointmentStatus::Visited => "visited",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(AppointmentStatus::Queued),
            "visited" => Ok(AppointmentStatus::Visited),
            other => Err(QueueError::Invalid(format!(
                "unknown appointment status {other}"
            ))),
        }
    }
}

/// One entry in a day's walk-in queue
///
/// `queue_order` positions the entry among the same day's `queued` rows. It
/// is a sparse total order: a promote or remove leaves the remaining values
/// untouched, and the next reorder re-establishes contiguity. Consumers must
/// sort by value and never read `queue_order` off a visited entry.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    /// UTC start-of-day instant of the appointment's calendar day
    pub day: DateTime<Utc>,
    pub queue_order: i64,
    pub status: AppointmentStatus,
    pub added_at: DateTime<Utc>,
    pub added_by: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
    /// Resolved patient summary, attached by `list_day` and the mutations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}

impl Appointment {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// The shape a patient record takes at this boundary
///
/// The queue engine only reads patients; the fields here are what the
/// front-desk views display next to a queue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

/// A day's queue as returned by `list_day`
#[derive(Debug, Clone, Serialize)]
pub struct DayQueue {
    /// Active entries, ascending by (`queue_order`, `added_at`)
    pub queued: Vec<Appointment>,
    /// Entries seen today, ascending by `visited_at`
    pub visited: Vec<Appointment>,
}

/// UTC start-of-day for the calendar day containing `ts`
pub fn day_start(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// UTC end-of-day (23:59:59.999) for the calendar day containing `ts`
pub fn day_end(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time"))
        .and_utc()
}

/// Inclusive day bounds for range queries
pub fn day_bounds(ts: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start(ts), day_end(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 12).unwrap();
        let (start, end) = day_bounds(ts);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(start <= ts && ts <= end);
        assert_eq!(end.date_naive(), ts.date_naive());

        // Midnight belongs to its own day
        assert_eq!(day_start(start), start);
    }

    #[test]
    fn different_times_same_day_share_bounds() {
        let morning = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 6, 1, 22, 45, 0).unwrap();
        assert_eq!(day_bounds(morning), day_bounds(evening));
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [AppointmentStatus::Queued, AppointmentStatus::Visited] {
            assert_eq!(
                status.as_str().parse::<AppointmentStatus>().unwrap(),
                status
            );
        }
        assert!("cancelled".parse::<AppointmentStatus>().is_err());
    }
}
