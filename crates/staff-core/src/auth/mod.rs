//! Authentication service

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::jwt::TokenIssuer;
use crate::staff_store::StaffStore;
use crate::types::{CreateStaffRequest, Principal, Staff};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub staff: Staff,
    pub token: String,
}

/// Authentication service
///
/// Verifies email + password against the staff store and issues session
/// tokens; verifies presented tokens back into a [`Principal`].
pub struct AuthenticationService {
    store: Arc<dyn StaffStore>,
    issuer: TokenIssuer,
}

impl AuthenticationService {
    pub fn new(store: Arc<dyn StaffStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// Create a staff account, hashing the password with Argon2
    pub async fn create_staff(&self, request: CreateStaffRequest) -> Result<Staff> {
        let password_hash = hash_password(&request.password)?;
        self.store.create_staff(request, password_hash).await
    }

    /// Authenticate a staff member and issue a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult> {
        let staff = self
            .store
            .get_staff_by_email(email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &staff.password_hash)? {
            warn!("Failed login attempt for {}", email);
            return Err(Error::InvalidCredentials);
        }

        if !staff.active {
            return Err(Error::AccountDisabled);
        }

        self.store.record_login(&staff.id, Utc::now()).await?;
        let token = self.issuer.create_session_token(&staff)?;
        debug!("Issued session token for {} ({})", staff.email, staff.role);

        Ok(LoginResult { staff, token })
    }

    /// Verify a presented bearer token into a principal
    pub fn verify_token(&self, token: &str) -> Result<Principal> {
        self.issuer.verify(token)
    }

    /// Fetch the staff record behind a principal
    pub async fn staff_for(&self, principal: &Principal) -> Result<Staff> {
        self.store
            .get_staff(&principal.staff_id)
            .await?
            .ok_or_else(|| Error::StaffNotFound(principal.staff_id.clone()))
    }

    pub fn store(&self) -> &Arc<dyn StaffStore> {
        &self.store
    }
}

/// Hash a password with Argon2id and a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("incorrect horse", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
