use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Well-formed hash that never verifies. Checked against when the e-mail is
/// unknown so both sign-in failure paths do the same work.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg";

/// Hashes a plain-text password into an argon2 PHC string.
pub fn hash_password(plain_text: &str) -> AppResult<String> {
    if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hash failed: {e}"))?;
    Ok(hash.to_string())
}

/// Returns `true` when `plain_text` matches the stored hash.
/// Malformed hashes never verify.
pub fn verify_password(plain_text: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Burns a verification against `DUMMY_HASH`; always `false`.
pub fn verify_dummy(plain_text: &str) -> bool {
    verify_password(plain_text, DUMMY_HASH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("SecurePassword123!").unwrap();
        assert!(verify_password("SecurePassword123!", &hash));
        assert!(!verify_password("WrongPassword123", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("SamePassword123").unwrap();
        let b = hash_password("SamePassword123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("SamePassword123", &a));
        assert!(verify_password("SamePassword123", &b));
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(
            hash_password("short"),
            Err(AppError::Validation(_))
        ));
        assert!(hash_password("12345678").is_ok());
    }

    #[test]
    fn test_dummy_and_garbage_hashes_never_verify() {
        assert!(!verify_dummy("anything at all"));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
