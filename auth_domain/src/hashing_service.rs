use crate::error::HashingError;
use rand::{thread_rng, RngCore};
use ring::{digest, pbkdf2};
use std::num::NonZeroU32;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const SCHEME: &str = "pbkdf2-sha256";
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
const SALT_LEN: usize = 16;
const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(iterations) => iterations,
    None => panic!("iteration count must be non-zero"),
};

/// One-way password hashing. Hashes are self-describing byte strings.
pub trait HashingService: Send + Sync {
    fn hash_password(&self, password: &str) -> Vec<u8>;

    /// `Ok(false)` on a wrong password, `Err` only when `pass_hash` cannot be parsed.
    fn verify(&self, pass_hash: &[u8], password: &str) -> Result<bool, HashingError>;
}

/// Salted PBKDF2-HMAC-SHA256, encoded as `pbkdf2-sha256$<iterations>$<salt>$<key>`
#[derive(Clone)]
pub struct Pbkdf2HashingService {
    iterations: NonZeroU32,
}

impl Default for Pbkdf2HashingService {
    fn default() -> Self {
        Pbkdf2HashingService {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl HashingService for Pbkdf2HashingService {
    fn hash_password(&self, password: &str) -> Vec<u8> {
        let mut salt = [0u8; SALT_LEN];
        thread_rng().fill_bytes(&mut salt);

        let mut key = [0u8; CREDENTIAL_LEN];
        pbkdf2::derive(PBKDF2_ALG, self.iterations, &salt, password.as_bytes(), &mut key);

        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(key)
        )
        .into_bytes()
    }

    fn verify(&self, pass_hash: &[u8], password: &str) -> Result<bool, HashingError> {
        let encoded = std::str::from_utf8(pass_hash).map_err(|_| HashingError::MalformedHash)?;

        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(key), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(HashingError::MalformedHash);
        };

        if scheme != SCHEME {
            return Err(HashingError::MalformedHash);
        }

        let iterations = iterations
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(HashingError::MalformedHash)?;
        let salt = hex::decode(salt).map_err(|_| HashingError::MalformedHash)?;
        let key = hex::decode(key).map_err(|_| HashingError::MalformedHash)?;
        if key.len() != CREDENTIAL_LEN {
            return Err(HashingError::MalformedHash);
        }

        // ring compares the derived key in constant time
        Ok(pbkdf2::verify(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &key).is_ok())
    }
}
