//! Unlock-credential verification.
//!
//! The session only defines the lock/unlock transition contract; the
//! actual credential check lives behind [`UnlockVerifier`] so callers
//! choose the mechanism.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, VaultError};

/// Collaborator that decides whether an unlock attempt succeeds.
pub trait UnlockVerifier {
    /// Returns true when `candidate` matches the configured credential.
    fn verify(&self, candidate: &str) -> bool;
}

/// Verifier backed by an Argon2id hash of the unlock secret.
///
/// Only the PHC hash string is retained; the plaintext secret is not
/// stored here.
pub struct Argon2Verifier {
    hash: String,
}

impl Argon2Verifier {
    /// Hash `secret` for later verification.
    pub fn new(secret: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| VaultError::Other(format!("Credential hashing failed: {e}")))?
            .to_string();
        Ok(Self { hash })
    }

    /// Wrap an existing PHC hash string.
    pub fn from_phc_hash(hash: String) -> Self {
        Self { hash }
    }
}

impl UnlockVerifier for Argon2Verifier {
    fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Verifier for sessions with no unlock credential configured.
///
/// Every attempt is declined, so a locked session stays locked.
pub struct NoCredential;

impl UnlockVerifier for NoCredential {
    fn verify(&self, _candidate: &str) -> bool {
        false
    }
}
