//! Configuration for the clinic queue service

use std::net::SocketAddr;

use clinic_staff_core::JwtConfig;
use serde::Deserialize;

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClinicConfig {
    pub general: GeneralConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl ClinicConfig {
    /// Load configuration, letting environment variables override defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CLINIC_DATABASE_URL") {
            config.database.database_url = url;
        }
        if let Ok(secret) = std::env::var("CLINIC_JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(addr) = std::env::var("CLINIC_BIND_ADDR") {
            if let Ok(addr) = addr.parse() {
                config.general.bind_addr = addr;
            }
        }
        config
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("valid default address"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://clinic.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}
