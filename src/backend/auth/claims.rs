/**
 * Token Claims
 *
 * The payload embedded in every signed token, and the access/refresh pair
 * handed to clients after a successful login or registration.
 *
 * Expiry is stored as an absolute instant (`exp`, Unix seconds). Building
 * claims never reads the clock; callers compute `issued_at + window`.
 */

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID
    #[serde(rename = "sub")]
    pub principal_id: Uuid,
    /// Display name at issue time
    pub name: String,
    /// Email at issue time
    pub email: String,
    /// Issuing service
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Absolute expiry
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Build the canonical claim set for a principal.
    ///
    /// `expires_at` is truncated to whole seconds, the resolution of `exp`.
    pub fn new(
        principal_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        issuer: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            principal_id,
            name: name.into(),
            email: email.into(),
            issuer: issuer.into(),
            expires_at: expires_at.trunc_subsecs(0),
        }
    }

    /// Same identity with a different expiry
    pub fn with_expiry(&self, expires_at: DateTime<Utc>) -> Self {
        Self {
            expires_at: expires_at.trunc_subsecs(0),
            ..self.clone()
        }
    }

    /// Whether the expiry is at or before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived token exchanged for a new pair
    pub refresh_token: String,
}
