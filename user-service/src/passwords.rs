use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use rand_core::OsRng;

/// Hash checked when the username is unknown, so both failed-login paths
/// pay for one argon2 verification.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("no-such-user-placeholder").unwrap_or_default());

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| format!("Failed to hash password: {err}"))
}

/// False for a wrong password and for a stored hash that cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Run a full verification that always fails.
pub fn verify_against_dummy(password: &str) -> bool {
    verify_password(password, &DUMMY_HASH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &first));
        assert!(!verify_password("battery staple", &first));
    }

    #[test]
    fn dummy_hash_is_real_and_never_matches() {
        assert!(DUMMY_HASH.starts_with("$argon2id$"));
        assert!(!verify_against_dummy("no-such-user-placeholder-x"));
        assert!(!verify_against_dummy(""));
    }

    #[test]
    fn unparseable_hash_never_verifies() {
        assert!(!verify_password("plain", "plain"));
    }
}
