use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Identity attached to a request after its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub username: String,
    pub role: Role,
    pub user_id: i64,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role, user_id: i64) -> Self {
        Self {
            username: username.into(),
            role,
            user_id,
        }
    }
}

/// Payload written by the signer.
#[derive(Debug, Serialize)]
pub(crate) struct TokenClaims<'a> {
    pub sub: &'a str,
    pub role: Role,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Verified claim set.
#[derive(Debug, Clone)]
pub struct Claims {
    pub principal: Principal,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Value> for Claims {
    type Error = AuthError;

    fn try_from(value: Value) -> AuthResult<Self> {
        let username = match value.get("sub") {
            Some(Value::String(sub)) if !sub.trim().is_empty() => sub.clone(),
            other => return Err(AuthError::InvalidClaim("sub", render(other))),
        };

        let role = match value.get("role") {
            Some(Value::String(raw)) => raw
                .parse::<Role>()
                .map_err(|_| AuthError::InvalidClaim("role", raw.clone()))?,
            other => return Err(AuthError::InvalidClaim("role", render(other))),
        };

        let user_id = user_id_claim(value.get("userId"))?;

        let exp = timestamp_claim(&value, "exp")?
            .ok_or_else(|| AuthError::InvalidClaim("exp", "missing".to_string()))?;
        let issued_at = timestamp_claim(&value, "iat")?;

        Ok(Self {
            principal: Principal {
                username,
                role,
                user_id,
            },
            issued_at,
            expires_at: exp,
        })
    }
}

/// `userId` may arrive as a JSON integer or as a string holding one.
fn user_id_claim(value: Option<&Value>) -> AuthResult<i64> {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| AuthError::InvalidClaim("userId", number.to_string())),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidClaim("userId", text.clone())),
        other => Err(AuthError::InvalidClaim("userId", render(other))),
    }
}

fn timestamp_claim(value: &Value, name: &'static str) -> AuthResult<Option<DateTime<Utc>>> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            let seconds = number
                .as_i64()
                .ok_or_else(|| AuthError::InvalidClaim(name, number.to_string()))?;
            Utc.timestamp_opt(seconds, 0)
                .single()
                .map(Some)
                .ok_or_else(|| AuthError::InvalidClaim(name, seconds.to_string()))
        }
        other => Err(AuthError::InvalidClaim(name, render(other))),
    }
}

/// Raw `exp` of a payload that has not been authenticated yet.
pub(crate) fn unverified_expiry(payload: &Value) -> Option<i64> {
    payload.get("exp").and_then(Value::as_i64)
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "missing".to_string(),
    }
}
