//! # Clinic Queue Server Manager
//!
//! High-level lifecycle for the queue service: opens the database, wires the
//! engine, identity gate, and REST router together, and runs the HTTP
//! listener until shutdown. Front-desk terminals and the dashboard are plain
//! HTTP clients of this server.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clinic_queue_engine::config::ClinicConfig;
//! use clinic_queue_engine::server::ClinicServerBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ClinicServerBuilder::new()
//!     .with_config(ClinicConfig::default())
//!     .with_in_memory_database()
//!     .build()
//!     .await?;
//!
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use clinic_staff_core::{
    AuthenticationService, CreateStaffRequest, Role, SqliteStaffStore, TokenIssuer,
};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{self, AppState};
use crate::clock::{Clock, SystemClock};
use crate::config::ClinicConfig;
use crate::database::{self, AppointmentDatabase, SqlitePatientDirectory};
use crate::engine::QueueEngine;
use crate::error::{QueueError, Result};

/// A complete queue server: storage, engine, identity gate, and router
pub struct ClinicServer {
    config: ClinicConfig,
    pool: SqlitePool,
    state: AppState,
}

impl ClinicServer {
    /// Create a server with the given configuration
    pub async fn new(config: ClinicConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Create a server with an injected clock (used by tests)
    pub async fn with_clock(config: ClinicConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let pool = database::connect(
            &config.database.database_url,
            config.database.max_connections,
        )
        .await?;

        // Staff accounts share the queue pool; one database file per clinic.
        let staff_store = SqliteStaffStore::with_pool(pool.clone())
            .await
            .map_err(internal)?;
        let issuer = TokenIssuer::new(config.jwt.clone()).map_err(internal)?;
        let auth = Arc::new(AuthenticationService::new(Arc::new(staff_store), issuer));

        let engine = Arc::new(QueueEngine::new(
            AppointmentDatabase::with_pool(pool.clone()),
            Arc::new(SqlitePatientDirectory::with_pool(pool.clone())),
            clock.clone(),
        ));

        Ok(Self {
            config,
            pool,
            state: AppState {
                engine,
                auth,
                clock,
            },
        })
    }

    /// Create a server backed by an in-memory database
    pub async fn new_in_memory(mut config: ClinicConfig) -> Result<Self> {
        config.database.database_url = "sqlite::memory:".to_string();
        Self::new(config).await
    }

    /// The REST router; tests drive this directly without a listener
    pub fn router(&self) -> axum::Router {
        api::create_router(self.state.clone())
    }

    /// Serve HTTP until ctrl-c
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.general.bind_addr;
        let listener = TcpListener::bind(addr).await.map_err(internal)?;

        info!("✅ Clinic queue server listening on {}", addr);
        info!("📋 Queue endpoints under /api/appointments");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(internal)?;

        info!("🛑 Clinic queue server stopped");
        Ok(())
    }

    pub fn engine(&self) -> &Arc<QueueEngine> {
        &self.state.engine
    }

    pub fn auth(&self) -> &Arc<AuthenticationService> {
        &self.state.auth
    }

    pub fn patients(&self) -> SqlitePatientDirectory {
        SqlitePatientDirectory::with_pool(self.pool.clone())
    }

    /// Helper to create staff accounts (for seeding and tests)
    pub async fn seed_staff(&self, accounts: Vec<(&str, &str, &str, Role)>) -> Result<()> {
        for (email, password, name, role) in accounts {
            self.state
                .auth
                .create_staff(CreateStaffRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: name.to_string(),
                    role,
                })
                .await
                .map_err(internal)?;
            info!("Created staff account: {} ({})", email, role);
        }
        Ok(())
    }
}

fn internal<E: std::fmt::Display>(e: E) -> QueueError {
    QueueError::Internal(e.to_string())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Builder for ClinicServer with fluent API
pub struct ClinicServerBuilder {
    config: Option<ClinicConfig>,
    database_url: Option<String>,
    clock: Option<Arc<dyn Clock>>,
}

impl ClinicServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            database_url: None,
            clock: None,
        }
    }

    pub fn with_config(mut self, config: ClinicConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_in_memory_database(mut self) -> Self {
        self.database_url = Some("sqlite::memory:".to_string());
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub async fn build(self) -> Result<ClinicServer> {
        let mut config = self.config.unwrap_or_default();
        if let Some(url) = self.database_url {
            config.database.database_url = url;
        }
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        ClinicServer::with_clock(config, clock).await
    }
}

impl Default for ClinicServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
