//! Core types for staff-core

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Staff role
///
/// The observed configuration grants queue mutation to admins and doctors
/// only; nurses hold read access. Policy decisions live in [`crate::rbac`],
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "nurse" => Ok(Role::Nurse),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// Staff account
#[derive(Debug, Clone, Serialize)]
pub struct Staff {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Staff {
    /// Create a new staff account ID
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Request to create a new staff account
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// An authenticated caller
///
/// Produced by token verification and consumed by the role policy. Absence of
/// a principal always denies; no operation ever runs under a default role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub staff_id: String,
    pub email: String,
    pub role: Role,
}
