use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

/// Hashes a plaintext password into an Argon2 PHC string with a fresh salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hashed.to_string())
}

/// Constant-time check of `plain` against a stored PHC string. An
/// unparseable stored hash counts as a mismatch rather than an error.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hashed = hash_password("p").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify_password("p", &hashed));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(!verify_password("battery staple", &hashed));
    }

    #[test]
    fn two_hashes_of_the_same_password_differ() {
        let first = hash_password("p").unwrap();
        let second = hash_password("p").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch() {
        assert!(!verify_password("p", "not-a-phc-string"));
    }
}
