//! Patient lookup collaborator
//!
//! The queue engine validates insertions against patient records and
//! decorates listings with patient summaries, nothing more. Record ownership
//! stays with the patient subsystem; this boundary is read-only apart from a
//! registration helper used by seeding and tests.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::types::PatientSummary;

/// Read-only patient resolution
#[async_trait]
pub trait PatientLookup: Send + Sync {
    /// Resolve a patient reference to its summary, `None` if unknown
    async fn resolve(&self, patient_id: &str) -> Result<Option<PatientSummary>>;
}

/// SQLite-backed patient directory
#[derive(Clone)]
pub struct SqlitePatientDirectory {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow, Debug, Clone)]
struct PatientRow {
    id: String,
    name: String,
    age: Option<i64>,
    gender: Option<String>,
    phone: Option<String>,
}

impl SqlitePatientDirectory {
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a patient record; seeding and test support
    pub async fn register(&self, summary: &PatientSummary) -> Result<()> {
        sqlx::query(
            "INSERT INTO patients (id, name, age, gender, phone) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&summary.id)
        .bind(&summary.name)
        .bind(summary.age)
        .bind(&summary.gender)
        .bind(&summary.phone)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PatientLookup for SqlitePatientDirectory {
    async fn resolve(&self, patient_id: &str) -> Result<Option<PatientSummary>> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, age, gender, phone FROM patients WHERE id = $1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|p| PatientSummary {
            id: p.id,
            name: p.name,
            age: p.age,
            gender: p.gender,
            phone: p.phone,
        }))
    }
}
