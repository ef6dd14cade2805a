//! Staff account storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{CreateStaffRequest, Staff};

/// Storage interface for staff accounts
///
/// Only what the identity gate needs: seeding accounts and authenticating
/// them. Staff management screens live outside this service.
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Create a staff account from a request and an already-hashed password
    async fn create_staff(&self, request: CreateStaffRequest, password_hash: String)
        -> Result<Staff>;

    /// Fetch a staff account by ID
    async fn get_staff(&self, id: &str) -> Result<Option<Staff>>;

    /// Fetch a staff account by email
    async fn get_staff_by_email(&self, email: &str) -> Result<Option<Staff>>;

    /// Record a successful login
    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// SQLite-backed staff store
#[derive(Clone)]
pub struct SqliteStaffStore {
    pool: SqlitePool,
}

/// Staff record that derives from database rows automatically
#[derive(sqlx::FromRow, Debug, Clone)]
struct StaffRow {
    id: String,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl StaffRow {
    fn into_staff(self) -> Result<Staff> {
        Ok(Staff {
            role: self.role.parse()?,
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login: self.last_login,
        })
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS staff (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_login TEXT
)
"#;

impl SqliteStaffStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool; the caller is responsible for schema setup
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StaffStore for SqliteStaffStore {
    async fn create_staff(
        &self,
        request: CreateStaffRequest,
        password_hash: String,
    ) -> Result<Staff> {
        let now = Utc::now();
        let id = Staff::new_id();

        let result = sqlx::query(
            "INSERT INTO staff (id, email, name, role, password_hash, active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, 1, $6, $7)",
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.name)
        .bind(request.role.as_str())
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(Error::StaffAlreadyExists(request.email));
            }
            Err(e) => return Err(e.into()),
        }

        debug!("Created staff account {} ({})", request.email, request.role);

        Ok(Staff {
            id,
            email: request.email,
            name: request.name,
            role: request.role,
            password_hash,
            active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        })
    }

    async fn get_staff(&self, id: &str) -> Result<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, email, name, role, password_hash, active, created_at, updated_at, last_login
             FROM staff WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StaffRow::into_staff).transpose()
    }

    async fn get_staff_by_email(&self, email: &str) -> Result<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, email, name, role, password_hash, active, created_at, updated_at, last_login
             FROM staff WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StaffRow::into_staff).transpose()
    }

    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE staff SET last_login = $1, updated_at = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
