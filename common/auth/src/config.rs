use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Access tokens live for ten hours.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 10 * 60 * 60;

/// HS256 secrets shorter than the digest size are rejected at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Runtime configuration shared by the token signer and verifier.
///
/// Loaded once at process start and handed out behind an `Arc`; nothing
/// mutates it afterwards.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    /// Lifetime of issued tokens in seconds.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when checking `exp`.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with the fixed ten hour lifetime and no leeway.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            leeway_seconds: 0,
        }
    }

    /// Read `JWT_SECRET`, `JWT_TTL_SECONDS` and `JWT_LEEWAY_SECONDS`.
    pub fn from_env() -> AuthResult<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET must be set".to_string()))?;

        let mut config = Self::new(secret.into_bytes());
        if let Ok(value) = env::var("JWT_TTL_SECONDS") {
            config = config.with_ttl(parse_setting("JWT_TTL_SECONDS", &value)?);
        }
        if let Ok(value) = env::var("JWT_LEEWAY_SECONDS") {
            config = config.with_leeway(parse_setting("JWT_LEEWAY_SECONDS", &value)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_ttl(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.ttl_seconds <= 0 {
            return Err(AuthError::Config(
                "token lifetime must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_setting<T: FromStr>(name: &str, value: &str) -> AuthResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AuthError::Config(format!("invalid {name} '{value}'")))
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let err = JwtConfig::new("too-short").validate().expect_err("short secret");
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn defaults_to_ten_hours_without_leeway() {
        let config = JwtConfig::new(vec![7u8; MIN_SECRET_LEN]);
        assert_eq!(config.ttl_seconds, 36_000);
        assert_eq!(config.leeway_seconds, 0);
        config.validate().expect("valid config");
    }

    #[test]
    fn numeric_settings_must_parse() {
        assert_eq!(parse_setting::<u32>("JWT_LEEWAY_SECONDS", " 30 ").unwrap(), 30);
        assert_eq!(parse_setting::<i64>("JWT_TTL_SECONDS", "3600").unwrap(), 3600);
        for bad in ["", "abc", "-5", "1.5"] {
            let err = parse_setting::<u32>("JWT_LEEWAY_SECONDS", bad).expect_err("malformed leeway");
            assert!(matches!(err, AuthError::Config(ref msg) if msg.contains("JWT_LEEWAY_SECONDS")));
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = JwtConfig::new("s3cr3t-s3cr3t-s3cr3t-s3cr3t-s3cr3t");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }
}
