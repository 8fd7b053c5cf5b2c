use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::{unverified_expiry, Claims, Principal};
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Verifies HS256 bearer tokens against the shared secret.
///
/// Pure computation over immutable key material; safe to share across tasks.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    leeway_seconds: u32,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        // Expiry is checked by hand so callers can supply the clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(config.secret()),
            validation,
            leeway_seconds: config.leeway_seconds,
        }
    }

    pub fn verify(&self, token: &str) -> AuthResult<Principal> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Principal> {
        self.decode_at(token, now).map(|claims| claims.principal)
    }

    /// Checks run in order: structure, expiry, signature, claim types.
    /// An expired token is reported as expired whatever its signature.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let payload = unverified_payload(token)?;
        if let Some(exp) = unverified_expiry(&payload) {
            if now.timestamp() > exp.saturating_add(i64::from(self.leeway_seconds)) {
                return Err(AuthError::Expired);
            }
        }

        let data = decode::<Value>(token, &self.key, &self.validation)?;
        let claims = Claims::try_from(data.claims)?;
        debug!(
            username = %claims.principal.username,
            user_id = claims.principal.user_id,
            "verified JWT successfully"
        );
        Ok(claims)
    }
}

fn unverified_payload(token: &str) -> AuthResult<Value> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return Err(AuthError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    }

    let header = decode_segment(segments[0], "header")?;
    match header.get("alg").and_then(Value::as_str) {
        Some("HS256") => {}
        other => {
            return Err(AuthError::MalformedToken(format!(
                "unsupported alg {}",
                other.unwrap_or("<missing>")
            )))
        }
    }

    decode_segment(segments[1], "payload")
}

fn decode_segment(segment: &str, name: &str) -> AuthResult<Value> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| AuthError::MalformedToken(format!("{name} is not base64url: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| AuthError::MalformedToken(format!("{name} is not JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use crate::signer::TokenSigner;
    use chrono::{Duration, TimeZone};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret-unit-test-secret-0123";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET)
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn sign_raw(payload: &Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("sign token")
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let signer = TokenSigner::new(&config());
        let verifier = JwtVerifier::new(&config());

        for (username, role, user_id) in [
            ("alice", Role::Client, 42),
            ("bob@example.com", Role::Freelancer, 1),
            ("carol", Role::Teacher, i64::MAX),
        ] {
            let issued = signer
                .issue_at(username, role, user_id, issued_at())
                .expect("issue");
            let principal = verifier
                .verify_at(&issued.token, issued_at() + Duration::seconds(1))
                .expect("verify");
            assert_eq!(principal, Principal::new(username, role, user_id));
        }
    }

    #[test]
    fn expiry_is_ten_hours_after_issue() {
        let signer = TokenSigner::new(&config());
        let issued = signer.issue_at("alice", Role::Client, 42, issued_at()).unwrap();
        assert_eq!(issued.expires_at - issued.issued_at, Duration::hours(10));

        let verifier = JwtVerifier::new(&config());
        let claims = verifier.decode_at(&issued.token, issued_at()).unwrap();
        assert_eq!(claims.expires_at, issued.expires_at);
        assert_eq!(claims.issued_at, Some(issued.issued_at));
    }

    #[test]
    fn token_is_valid_at_exp_and_expired_one_second_later() {
        let signer = TokenSigner::new(&config());
        let verifier = JwtVerifier::new(&config());
        let issued = signer.issue_at("alice", Role::Client, 42, issued_at()).unwrap();

        verifier
            .verify_at(&issued.token, issued.expires_at)
            .expect("still valid at exp");
        let err = verifier
            .verify_at(&issued.token, issued.expires_at + Duration::seconds(1))
            .expect_err("expired");
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn leeway_extends_acceptance_window() {
        let signer = TokenSigner::new(&config());
        let verifier = JwtVerifier::new(&config().with_leeway(30));
        let issued = signer.issue_at("alice", Role::Client, 42, issued_at()).unwrap();

        verifier
            .verify_at(&issued.token, issued.expires_at + Duration::seconds(30))
            .expect("inside leeway");
        assert!(matches!(
            verifier.verify_at(&issued.token, issued.expires_at + Duration::seconds(31)),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn expired_wins_over_bad_signature() {
        let other = TokenSigner::new(&JwtConfig::new("a-completely-different-secret-value!!"));
        let verifier = JwtVerifier::new(&config());
        let issued = other.issue_at("alice", Role::Client, 42, issued_at()).unwrap();

        let err = verifier
            .verify_at(&issued.token, issued.expires_at + Duration::minutes(5))
            .expect_err("expired");
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn flipping_any_signature_bit_invalidates_token() {
        let signer = TokenSigner::new(&config());
        let verifier = JwtVerifier::new(&config());
        let issued = signer.issue_at("alice", Role::Client, 42, issued_at()).unwrap();

        let (message, signature) = issued.token.rsplit_once('.').unwrap();
        let raw = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for bit in 0..raw.len() * 8 {
            let mut tampered = raw.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let token = format!("{message}.{}", URL_SAFE_NO_PAD.encode(&tampered));
            let err = verifier
                .verify_at(&token, issued_at() + Duration::seconds(1))
                .expect_err("tampered signature must fail");
            assert!(
                matches!(err, AuthError::InvalidSignature),
                "bit {bit}: unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn token_from_other_secret_has_invalid_signature() {
        let other = TokenSigner::new(&JwtConfig::new("a-completely-different-secret-value!!"));
        let verifier = JwtVerifier::new(&config());
        let issued = other.issue_at("alice", Role::Client, 42, issued_at()).unwrap();

        let err = verifier
            .verify_at(&issued.token, issued_at())
            .expect_err("wrong key");
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let verifier = JwtVerifier::new(&config());
        for token in ["", "abc", "abc.def", "a.b.c.d", "..", "abc..ghi", "!!!.???.***"] {
            let err = verifier
                .verify_at(token, issued_at())
                .expect_err("malformed");
            assert!(
                matches!(err, AuthError::MalformedToken(_)),
                "{token:?}: unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn other_algorithms_are_malformed() {
        let verifier = JwtVerifier::new(&config());
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "alice", "role": "CLIENT", "userId": 42, "exp": 4_000_000_000i64}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verifier.verify_at(&token, issued_at()).expect_err("alg");
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn string_user_id_claim_verifies_to_same_principal() {
        let verifier = JwtVerifier::new(&config());
        let iat = issued_at().timestamp();
        let numeric = sign_raw(&json!({
            "sub": "alice", "role": "ROLE_CLIENT", "userId": 42, "iat": iat, "exp": iat + 60
        }));
        let text = sign_raw(&json!({
            "sub": "alice", "role": "ROLE_CLIENT", "userId": "42", "iat": iat, "exp": iat + 60
        }));

        let a = verifier.verify_at(&numeric, issued_at()).unwrap();
        let b = verifier.verify_at(&text, issued_at()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Principal::new("alice", Role::Client, 42));
    }

    #[test]
    fn non_numeric_user_id_claim_is_invalid() {
        let verifier = JwtVerifier::new(&config());
        let iat = issued_at().timestamp();
        let token = sign_raw(&json!({
            "sub": "alice", "role": "CLIENT", "userId": "abc", "iat": iat, "exp": iat + 60
        }));

        let err = verifier.verify_at(&token, issued_at()).expect_err("invalid claim");
        assert!(matches!(err, AuthError::InvalidClaim("userId", _)));
    }
}
