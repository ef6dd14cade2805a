//! Error types for staff operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Staff account not found: {0}")]
    StaffNotFound(String),

    #[error("A staff account with email {0} already exists")]
    StaffAlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
