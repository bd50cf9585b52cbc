//! Password hashing

use bcrypt::{hash, verify, BcryptError};

const DUMMY_PASSWORD: &str = "storefront-dummy-password";

/// bcrypt hasher with a fixed cost.
///
/// Holds a precomputed hash so a lookup for an unknown login still pays for
/// one full verification.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, BcryptError> {
        Ok(Self {
            cost,
            dummy_hash: hash(DUMMY_PASSWORD, cost)?,
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, BcryptError> {
        hash(password, self.cost)
    }

    /// Verify `password` against `stored`; a missing hash always fails
    pub fn verify(&self, password: &str, stored: Option<&str>) -> Result<bool, BcryptError> {
        match stored {
            Some(stored) => verify(password, stored),
            None => {
                verify(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }
}
