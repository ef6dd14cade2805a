//! Configuration for staff-core

use serde::Deserialize;

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StaffConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

/// JWT session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub issuer: String,
    pub ttl_seconds: u64,
    pub secret: String,
}

impl StaffConfig {
    /// Load configuration, letting environment variables override defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CLINIC_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(secret) = std::env::var("CLINIC_JWT_SECRET") {
            config.jwt.secret = secret;
        }
        config
    }
}

impl Default for StaffConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://clinic.db?mode=rwc".to_string(),
            jwt: JwtConfig::default(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "clinic-staff-core".to_string(),
            // Front-desk shifts run a working day; tokens match.
            ttl_seconds: 8 * 60 * 60,
            secret: "dev-secret-change-in-production".to_string(),
        }
    }
}
