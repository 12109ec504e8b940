// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff access tokens.
//!
//! Signed HS256 JWTs carrying a store id and a staff role. Tokens are
//! stateless: there is no revocation list, expiry is the only exit. The
//! default TTL is 30 days.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pedai_core::types::StaffRole;
use pedai_core::PedaiError;
use serde::{Deserialize, Serialize};

/// Claims embedded in a staff access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    /// The store this token grants access to.
    pub store_id: String,
    /// Staff role, serialized as "waiter" or "counter-attendant".
    #[serde(rename = "type")]
    pub role: StaffRole,
    /// Issuance instant, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: usize,
}

/// An issued token plus its expiry for display.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: String,
}

/// Issues and verifies staff access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_days: i64,
    frontend_base_url: String,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64, frontend_base_url: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_days,
            frontend_base_url: frontend_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue a token granting `role` access to `store_id`.
    pub fn issue(&self, store_id: &str, role: StaffRole) -> Result<IssuedToken, PedaiError> {
        let now = Utc::now();
        let expires = now + Duration::days(self.ttl_days);

        let claims = StaffClaims {
            store_id: store_id.to_string(),
            role,
            timestamp: now.timestamp_millis(),
            exp: expires.timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PedaiError::Internal(format!("token encoding failed: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at: expires.to_rfc3339(),
        })
    }

    /// Verify a token's signature and expiry.
    ///
    /// All failure modes collapse into one generic message so callers
    /// cannot distinguish a bad signature from an expired token.
    pub fn verify(&self, token: &str) -> Result<StaffClaims, PedaiError> {
        decode::<StaffClaims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| PedaiError::Auth("invalid or expired access token".to_string()))
    }

    /// Build the frontend deep link a staff member opens to start a session.
    pub fn access_link(&self, store_id: &str, role: StaffRole) -> Result<IssuedToken, PedaiError> {
        let issued = self.issue(store_id, role)?;
        let path = match role {
            StaffRole::Waiter => "waiter",
            StaffRole::CounterAttendant => "counter",
        };
        Ok(IssuedToken {
            token: format!(
                "{}/{}/{}?token={}",
                self.frontend_base_url, path, store_id, issued.token
            ),
            expires_at: issued.expires_at,
        })
    }
}
