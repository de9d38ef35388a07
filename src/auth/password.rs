/// Password Hashing and Verification
///
/// bcrypt with a fixed work factor. Verification never tells the caller why
/// it failed: a wrong password, a corrupt stored hash and an unknown account
/// all come back as `CredentialMismatch` after a full bcrypt round.

use bcrypt::{hash, verify};
use lazy_static::lazy_static;

use crate::error::AuthError;

/// bcrypt work factor.
pub const HASH_COST: u32 = 10;

lazy_static! {
    // Verified against when there is no usable stored hash, so that path
    // costs the same as a real comparison.
    static ref DUMMY_HASH: Option<String> = hash("chirpy-dummy-password", HASH_COST).ok();
}

/// Compute the dummy hash now so the first unknown-account login does not
/// pay for it. Called once from `startup::run`; later calls are free.
pub fn init_dummy_hash() {
    lazy_static::initialize(&DUMMY_HASH);
    if DUMMY_HASH.is_none() {
        tracing::error!("Dummy password hash could not be computed");
    }
}

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `HashingFailed` if bcrypt cannot produce a hash
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, HASH_COST).map_err(|e| {
        tracing::error!("bcrypt hashing failed: {}", e);
        AuthError::HashingFailed(e.to_string())
    })
}

/// Verify a password against its stored hash
///
/// # Errors
/// Returns `CredentialMismatch` on a wrong password or an unusable hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    match verify(password, stored_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::CredentialMismatch),
        Err(e) => {
            tracing::error!("Stored password hash could not be used: {}", e);
            burn_verification(password);
            Err(AuthError::CredentialMismatch)
        }
    }
}

/// Verify a password for an account that may not exist.
///
/// With no stored hash the dummy hash is checked instead and the result is
/// always `CredentialMismatch`.
pub fn verify_credentials(password: &str, stored_hash: Option<&str>) -> Result<(), AuthError> {
    match stored_hash {
        Some(stored_hash) => verify_password(password, stored_hash),
        None => {
            burn_verification(password);
            Err(AuthError::CredentialMismatch)
        }
    }
}

fn burn_verification(password: &str) {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(password, dummy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "04234";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let password = "correct horse battery staple";
        let hash = hash_password(password).expect("Failed to hash password");

        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct horse battery staple").expect("Failed to hash password");

        assert_eq!(
            verify_password("correct horse battery stapler", &hash),
            Err(AuthError::CredentialMismatch)
        );
        assert_eq!(verify_password("", &hash), Err(AuthError::CredentialMismatch));
    }

    #[test]
    fn test_corrupt_hash_is_a_mismatch() {
        assert_eq!(
            verify_password("anything", "not-a-bcrypt-hash"),
            Err(AuthError::CredentialMismatch)
        );
        assert_eq!(verify_password("anything", ""), Err(AuthError::CredentialMismatch));
    }

    #[test]
    fn test_dummy_hash_is_ready_after_init() {
        init_dummy_hash();
        let dummy = DUMMY_HASH.clone().expect("Dummy hash missing");
        assert!(dummy.starts_with("$2b$10$"));

        init_dummy_hash();
        assert_eq!(DUMMY_HASH.as_deref(), Some(dummy.as_str()));
    }

    #[test]
    fn test_unknown_account_is_a_mismatch() {
        assert_eq!(
            verify_credentials("anything", None),
            Err(AuthError::CredentialMismatch)
        );

        let hash = hash_password("anything").unwrap();
        assert!(verify_credentials("anything", Some(&hash)).is_ok());
    }
}
