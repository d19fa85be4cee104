use anyhow::Result;
use argon2::{
    password_hash::{PasswordHasher as _, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

/// One-way, deterministic transform of a plaintext password into a storable digest
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;
}

/// Argon2id with a single process-wide salt.
///
/// The configured salt is stretched through SHA-256 so that any non-empty
/// string yields a valid argon2 salt. Identical passwords produce identical
/// digests, which is what allows sign-in to compare digests byte-for-byte,
/// and is weaker than per-user salting.
#[derive(Clone)]
pub struct SaltedArgon2Hasher {
    salt: SaltString,
}

impl SaltedArgon2Hasher {
    pub fn new(salt: &str) -> Result<Self> {
        let derived = Sha256::digest(salt.as_bytes());
        let salt = SaltString::encode_b64(&derived[..16])
            .map_err(|e| anyhow::anyhow!("Invalid password salt: {}", e))?;
        Ok(Self { salt })
    }
}

impl PasswordHasher for SaltedArgon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &self.salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }
}
