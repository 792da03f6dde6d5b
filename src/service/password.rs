//! Password hashing with Argon2id.
//!
//! Argon2id with one pass over 4 MiB and a random 16-byte salt.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;

use super::ServiceError;

const MEMORY_COST_KIB: u32 = 4096;
const TIME_COST: u32 = 1;
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, ServiceError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|error| ServiceError::Hashing(error.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Derives a PHC-formatted hash of `password` with a fresh random salt.
///
/// # Errors
///
/// Returns `ServiceError::Hashing` if the salt or the hash cannot be produced.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|error| ServiceError::Hashing(error.to_string()))?;

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|error| ServiceError::Hashing(error.to_string()))?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash.
///
/// The parameters are read from the hash itself, so hashes produced with
/// other settings still verify.
///
/// # Errors
///
/// Returns `ServiceError::Hashing` if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|error| ServiceError::Hashing(error.to_string()))?;

    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
