//! JWT session token issuance and verification

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{Error, Result};
use crate::types::{Principal, Role, Staff};

/// Issues and verifies HS256 session tokens
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    // Standard claims
    pub iss: String,
    pub sub: String, // Staff ID
    pub exp: u64,
    pub iat: u64,
    pub jti: String,

    // Custom claims
    pub email: String,
    pub role: String,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(Error::Config("JWT secret must not be empty".to_string()));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            header: Header::new(Algorithm::HS256),
        })
    }

    /// Issue a session token for a staff account
    pub fn create_session_token(&self, staff: &Staff) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.ttl_seconds as i64);

        let claims = SessionClaims {
            iss: self.config.issuer.clone(),
            sub: staff.id.clone(),
            exp: exp.timestamp() as u64,
            iat: now.timestamp() as u64,
            jti: Uuid::new_v4().to_string(),
            email: staff.email.clone(),
            role: staff.role.as_str().to_string(),
        };

        encode(&self.header, &claims, &self.encoding_key).map_err(Error::Jwt)
    }

    /// Verify a presented token into a principal
    ///
    /// An expired, malformed, or mis-signed token is an error, never a
    /// degraded principal.
    pub fn verify(&self, token: &str) -> Result<Principal> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| Error::InvalidToken(e.to_string()))?;

        let role: Role = data
            .claims
            .role
            .parse()
            .map_err(|_| Error::InvalidToken(format!("unknown role {}", data.claims.role)))?;

        Ok(Principal {
            staff_id: data.claims.sub,
            email: data.claims.email,
            role,
        })
    }

    /// Issuer configuration, used by tests to mint edge-case tokens
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }
}
