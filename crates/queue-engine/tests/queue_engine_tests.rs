//! Tests for the walk-in queue engine
//!
//! Each test drives the engine against a real SQLite database; the clock is
//! injected and only moves when a test advances it.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use clinic_queue_engine::clock::FixedClock;
use clinic_queue_engine::Clock;
use clinic_queue_engine::database::{
    self, AppointmentDatabase, PatientLookup, SqlitePatientDirectory,
};
use clinic_queue_engine::engine::QueueEngine;
use clinic_queue_engine::error::QueueError;
use clinic_queue_engine::types::PatientSummary;
use tempfile::TempDir;

struct TestContext {
    engine: QueueEngine,
    clock: Arc<FixedClock>,
    patients: SqlitePatientDirectory,
    _temp_dir: TempDir,
}

/// Helper to create an engine over a fresh database with a few patients
async fn create_test_engine() -> TestContext {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = database::connect(&db_url, 5)
        .await
        .expect("Failed to create test database");

    let patients = SqlitePatientDirectory::with_pool(pool.clone());
    for (id, name) in [
        ("p-alice", "Alice Example"),
        ("p-bob", "Bob Example"),
        ("p-carol", "Carol Example"),
        ("p-dan", "Dan Example"),
    ] {
        patients
            .register(&PatientSummary {
                id: id.to_string(),
                name: name.to_string(),
                age: Some(40),
                gender: Some("other".to_string()),
                phone: Some("555-0100".to_string()),
            })
            .await
            .unwrap();
    }

    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
    let engine = QueueEngine::new(
        AppointmentDatabase::with_pool(pool),
        Arc::new(patients.clone()),
        clock.clone(),
    );

    TestContext {
        engine,
        clock,
        patients,
        _temp_dir: temp_dir,
    }
}

fn queued_orders(queue: &clinic_queue_engine::types::DayQueue) -> Vec<i64> {
    queue.queued.iter().map(|a| a.queue_order).collect()
}

fn queued_patients(queue: &clinic_queue_engine::types::DayQueue) -> Vec<&str> {
    queue.queued.iter().map(|a| a.patient_id.as_str()).collect()
}

#[tokio::test]
async fn test_insert_on_empty_day_starts_at_zero() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let first = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    assert_eq!(first.queue_order, 0);

    ctx.clock.advance(Duration::minutes(1));
    let second = ctx.engine.insert(day, "p-bob", None).await.unwrap();
    assert_eq!(second.queue_order, 1);

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-alice", "p-bob"]);
    assert!(queue.visited.is_empty());
}

#[tokio::test]
async fn test_insert_lands_at_the_tail() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    for patient in ["p-alice", "p-bob", "p-carol"] {
        ctx.engine.insert(day, patient, None).await.unwrap();
        ctx.clock.advance(Duration::minutes(1));
    }

    let entry = ctx.engine.insert(day, "p-dan", None).await.unwrap();
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queue.queued.last().unwrap().id, entry.id);
}

#[tokio::test]
async fn test_insert_resolves_patient_summary() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let entry = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    assert_eq!(entry.patient.as_ref().unwrap().name, "Alice Example");

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(
        queue.queued[0].patient.as_ref().unwrap().name,
        "Alice Example"
    );
}

#[tokio::test]
async fn test_insert_unknown_patient_fails() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let result = ctx.engine.insert(day, "p-ghost", None).await;
    assert!(matches!(result, Err(QueueError::NotFound(_))));

    // A failed insert leaves the day untouched
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert!(queue.queued.is_empty());
}

#[tokio::test]
async fn test_reorder_renumbers_contiguously() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let mut ids = Vec::new();
    for patient in ["p-alice", "p-bob", "p-carol", "p-dan"] {
        ids.push(ctx.engine.insert(day, patient, None).await.unwrap().id);
        ctx.clock.advance(Duration::minutes(1));
    }

    // Move the tail to the front, then the front into the middle
    ctx.engine.reorder(&ids[3], 0).await.unwrap();
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_orders(&queue), vec![0, 1, 2, 3]);
    assert_eq!(
        queued_patients(&queue),
        vec!["p-dan", "p-alice", "p-bob", "p-carol"]
    );

    ctx.engine.reorder(&ids[3], 2).await.unwrap();
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_orders(&queue), vec![0, 1, 2, 3]);
    assert_eq!(
        queued_patients(&queue),
        vec!["p-alice", "p-bob", "p-dan", "p-carol"]
    );
}

#[tokio::test]
async fn test_reorder_clamps_out_of_range_target() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let mut ids = Vec::new();
    for patient in ["p-alice", "p-bob", "p-carol"] {
        ids.push(ctx.engine.insert(day, patient, None).await.unwrap().id);
        ctx.clock.advance(Duration::minutes(1));
    }

    let moved = ctx.engine.reorder(&ids[0], 9999).await.unwrap();
    assert_eq!(moved.queue_order, 2);

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-bob", "p-carol", "p-alice"]);
    assert_eq!(queued_orders(&queue), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_reorder_to_current_position_is_a_noop() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let mut ids = Vec::new();
    for patient in ["p-alice", "p-bob", "p-carol"] {
        ids.push(ctx.engine.insert(day, patient, None).await.unwrap().id);
        ctx.clock.advance(Duration::minutes(1));
    }

    let before = ctx.engine.list_day(day).await.unwrap();
    ctx.engine.reorder(&ids[1], 1).await.unwrap();
    let after = ctx.engine.list_day(day).await.unwrap();

    assert_eq!(queued_orders(&before), queued_orders(&after));
    assert_eq!(queued_patients(&before), queued_patients(&after));
}

#[tokio::test]
async fn test_reorder_missing_appointment_fails() {
    let ctx = create_test_engine().await;
    let result = ctx.engine.reorder("no-such-id", 0).await;
    assert!(matches!(result, Err(QueueError::NotFound(_))));
}

#[tokio::test]
async fn test_reorder_on_visited_entry_is_a_noop() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let a = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    ctx.clock.advance(Duration::minutes(1));
    ctx.engine.insert(day, "p-bob", None).await.unwrap();

    ctx.engine.promote(&a.id).await.unwrap();

    let result = ctx.engine.reorder(&a.id, 0).await.unwrap();
    assert_eq!(
        result.status,
        clinic_queue_engine::types::AppointmentStatus::Visited
    );

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-bob"]);
}

#[tokio::test]
async fn test_promote_is_idempotent() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let entry = ctx.engine.insert(day, "p-alice", None).await.unwrap();

    ctx.clock.advance(Duration::minutes(30));
    let first = ctx.engine.promote(&entry.id).await.unwrap();
    let visited_at = first.visited_at.expect("visited_at set on promotion");

    // A retried promote must not re-stamp the timestamp
    ctx.clock.advance(Duration::minutes(30));
    let second = ctx.engine.promote(&entry.id).await.unwrap();
    assert_eq!(second.visited_at, Some(visited_at));
    assert_eq!(
        second.status,
        clinic_queue_engine::types::AppointmentStatus::Visited
    );
}

#[tokio::test]
async fn test_promote_leaves_remaining_orders_untouched() {
    // Walk-in scenario: A(0) B(1) C(2), move C to the front, then see A.
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let a = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    ctx.clock.advance(Duration::minutes(1));
    let _b = ctx.engine.insert(day, "p-bob", None).await.unwrap();
    ctx.clock.advance(Duration::minutes(1));
    let c = ctx.engine.insert(day, "p-carol", None).await.unwrap();

    ctx.engine.reorder(&c.id, 0).await.unwrap();
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-carol", "p-alice", "p-bob"]);
    assert_eq!(queued_orders(&queue), vec![0, 1, 2]);

    ctx.clock.advance(Duration::minutes(5));
    ctx.engine.promote(&a.id).await.unwrap();

    // The vacated slot is not compacted; ordering still reads correctly
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-carol", "p-bob"]);
    assert_eq!(queued_orders(&queue), vec![0, 2]);

    assert_eq!(queue.visited.len(), 1);
    assert_eq!(queue.visited[0].patient_id, "p-alice");
}

#[tokio::test]
async fn test_visited_view_sorts_by_visit_time() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let a = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    ctx.clock.advance(Duration::minutes(1));
    let b = ctx.engine.insert(day, "p-bob", None).await.unwrap();

    // B is seen before A
    ctx.clock.advance(Duration::minutes(10));
    ctx.engine.promote(&b.id).await.unwrap();
    ctx.clock.advance(Duration::minutes(10));
    ctx.engine.promote(&a.id).await.unwrap();

    let queue = ctx.engine.list_day(day).await.unwrap();
    let visited: Vec<_> = queue.visited.iter().map(|v| v.patient_id.as_str()).collect();
    assert_eq!(visited, vec!["p-bob", "p-alice"]);
}

#[tokio::test]
async fn test_remove_deletes_queued_entry_without_renumbering() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let mut ids = Vec::new();
    for patient in ["p-alice", "p-bob", "p-carol"] {
        ids.push(ctx.engine.insert(day, patient, None).await.unwrap().id);
        ctx.clock.advance(Duration::minutes(1));
    }

    ctx.engine.remove(&ids[1]).await.unwrap();

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-alice", "p-carol"]);
    assert_eq!(queued_orders(&queue), vec![0, 2]);

    // The next reorder restores contiguity as a side effect
    ctx.engine.reorder(&ids[2], 0).await.unwrap();
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_orders(&queue), vec![0, 1]);
}

#[tokio::test]
async fn test_remove_visited_entry_is_rejected() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let entry = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    ctx.engine.promote(&entry.id).await.unwrap();

    let result = ctx.engine.remove(&entry.id).await;
    assert!(matches!(result, Err(QueueError::Conflict(_))));

    // The record survives as history
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queue.visited.len(), 1);
}

#[tokio::test]
async fn test_remove_missing_appointment_fails() {
    let ctx = create_test_engine().await;
    let result = ctx.engine.remove("no-such-id").await;
    assert!(matches!(result, Err(QueueError::NotFound(_))));
}

#[tokio::test]
async fn test_insert_after_promote_stays_behind_the_tail() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    for patient in ["p-alice", "p-bob", "p-carol"] {
        ctx.engine.insert(day, patient, None).await.unwrap();
        ctx.clock.advance(Duration::minutes(1));
    }

    // Promote the tail; its stale order value (2) must still push the next
    // insertion past it.
    let queue = ctx.engine.list_day(day).await.unwrap();
    let tail_id = queue.queued.last().unwrap().id.clone();
    ctx.engine.promote(&tail_id).await.unwrap();

    let entry = ctx.engine.insert(day, "p-dan", None).await.unwrap();
    assert_eq!(entry.queue_order, 3);

    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-alice", "p-bob", "p-dan"]);
}

#[tokio::test]
async fn test_days_are_partitioned() {
    let ctx = create_test_engine().await;
    let monday = ctx.clock.now();
    let tuesday = monday + Duration::days(1);

    ctx.engine.insert(monday, "p-alice", None).await.unwrap();
    let entry = ctx.engine.insert(tuesday, "p-bob", None).await.unwrap();

    // Each day's sequence starts at zero
    assert_eq!(entry.queue_order, 0);

    let monday_queue = ctx.engine.list_day(monday).await.unwrap();
    let tuesday_queue = ctx.engine.list_day(tuesday).await.unwrap();
    assert_eq!(queued_patients(&monday_queue), vec!["p-alice"]);
    assert_eq!(queued_patients(&tuesday_queue), vec!["p-bob"]);
}

#[tokio::test]
async fn test_listing_tie_breaks_on_added_at() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    let first = ctx.engine.insert(day, "p-alice", None).await.unwrap();
    ctx.clock.advance(Duration::minutes(1));
    let second = ctx.engine.insert(day, "p-bob", None).await.unwrap();

    // Force a duplicate order value, as two racing inserts could
    let mut conn = ctx.engine.db().pool().acquire().await.unwrap();
    AppointmentDatabase::set_order_in(&mut conn, &second.id, first.queue_order)
        .await
        .unwrap();

    // The sort stays total and deterministic: earlier added_at wins
    let queue = ctx.engine.list_day(day).await.unwrap();
    assert_eq!(queued_patients(&queue), vec!["p-alice", "p-bob"]);
}

#[tokio::test]
async fn test_patient_lookup_is_read_only_for_the_engine() {
    let ctx = create_test_engine().await;
    let day = ctx.clock.now();

    ctx.engine.insert(day, "p-alice", None).await.unwrap();

    // The patient record is untouched by queue mutations
    let patient = ctx.patients.resolve("p-alice").await.unwrap().unwrap();
    assert_eq!(patient.name, "Alice Example");
}
