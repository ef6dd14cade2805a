//! # Staff-Core
//!
//! Staff accounts and the role policy for the clinic queue service.
//!
//! This crate provides:
//! - Staff account storage in SQLite
//! - Password authentication with Argon2
//! - JWT session token issuance and verification
//! - The role policy consumed by every mutating queue endpoint
//!
//! ## Architecture
//!
//! Staff-Core authenticates a caller (email + password in, bearer token out)
//! and turns a presented token back into a [`Principal`]. What a principal is
//! allowed to do is decided by the pure predicates in [`rbac`]; the HTTP
//! boundary checks those before invoking any queue mutation. The queue engine
//! itself never re-checks roles; enforcement at the boundary is a caller
//! contract, not an engine assertion.

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod rbac;
pub mod staff_store;
pub mod types;

pub use auth::AuthenticationService;
pub use config::{JwtConfig, StaffConfig};
pub use error::{Error, Result};
pub use jwt::{SessionClaims, TokenIssuer};
pub use staff_store::{SqliteStaffStore, StaffStore};
pub use types::{CreateStaffRequest, Principal, Role, Staff};

/// Initialize the staff-core service
pub async fn init(config: StaffConfig) -> Result<AuthenticationService> {
    let store = SqliteStaffStore::new(&config.database_url).await?;
    let issuer = TokenIssuer::new(config.jwt)?;
    Ok(AuthenticationService::new(
        std::sync::Arc::new(store),
        issuer,
    ))
}
