//! Staff login and session tokens.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::types::LoginResponse;

const STAFF_ROLE: &str = "staff";

/// How long an issued staff session stays valid.
pub const SESSION_HOURS: i64 = 8;

/// Errors from staff authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token does not grant staff access")]
    NotStaff,
}

/// Claims carried by a staff session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// The single shared staff credential and the key that signs sessions.
#[derive(Clone)]
pub struct StaffAuth {
    username: String,
    password: String,
    secret: String,
}

impl fmt::Debug for StaffAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl StaffAuth {
    /// Without a configured secret a random one is used, so sessions end on restart.
    pub fn new(username: String, password: String, secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty()).unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, staff sessions will not survive a restart");
            format!("{}{}", ulid::Ulid::new(), ulid::Ulid::new())
        });

        Self {
            username,
            password,
            secret,
        }
    }

    /// Check the staff credential and issue a session token.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if username != self.username || password != self.password {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: STAFF_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_HOURS)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(LoginResponse {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate a session token, with or without a `Bearer ` prefix.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token = token.trim_start();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        if data.claims.role != STAFF_ROLE {
            return Err(AuthError::NotStaff);
        }

        Ok(data.claims)
    }
}
