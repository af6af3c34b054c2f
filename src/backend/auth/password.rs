/**
 * Password Hashing
 *
 * One-way salted hashing of stored credentials with bcrypt. The work factor
 * comes from configuration; hashing is deliberately slow, so async callers
 * run it on a blocking thread.
 *
 * Verification never errors: a stored hash that bcrypt cannot parse is just
 * a failed verification. bcrypt compares digests in constant time.
 */

use crate::backend::error::AuthError;

/// Salted one-way hasher for plaintext passwords.
///
/// Holds only its work factor, so clones are free and concurrent use needs
/// no locking.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!("Password hashing failed: {:?}", e);
            AuthError::internal(format!("password hashing failed: {}", e))
        })
    }

    /// Check a plaintext password against a stored hash
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        match bcrypt::verify(plaintext, hashed) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {:?}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
