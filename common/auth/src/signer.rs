use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;

use crate::claims::TokenClaims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Issues HS256 bearer tokens with the shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: EncodingKey,
    ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub token_type: &'static str,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret()),
            ttl_seconds: config.ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn issue(&self, username: &str, role: Role, user_id: i64) -> AuthResult<IssuedToken> {
        self.issue_at(username, role, user_id, Utc::now())
    }

    /// Sign a token as if issued at `now`. Timestamps are truncated to seconds.
    pub fn issue_at(
        &self,
        username: &str,
        role: Role,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let iat = now.timestamp();
        let exp = iat + self.ttl_seconds;

        let claims = TokenClaims {
            sub: username,
            role,
            user_id,
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        let issued_at = to_datetime(iat)?;
        let expires_at = to_datetime(exp)?;
        debug!(username, %role, user_id, exp, "issued access token");

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
            expires_in: self.ttl_seconds,
            token_type: "Bearer",
        })
    }
}

fn to_datetime(seconds: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| AuthError::Signing(format!("timestamp {seconds} out of range")))
}
