use crate::error::{LedgerError, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const STRETCH_ROUNDS: u32 = 10_000;

/// Salted one-way hash of a secret.
///
/// Each call to [`SecretHash::new`] draws a fresh random salt, so hashing the
/// same plaintext twice yields different values; [`SecretHash::matches`]
/// verifies against any of them. The plaintext is never stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretHash {
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl SecretHash {
    /// Hashes a secret with a fresh random salt.
    pub fn new(secret: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self {
            salt,
            digest: stretch(secret.as_bytes(), &salt),
        }
    }

    /// Whether `candidate` is the hashed secret.
    ///
    /// The digest comparison accumulates over all bytes instead of returning
    /// at the first mismatch, so timing reveals nothing about the prefix.
    pub fn matches(&self, candidate: &str) -> bool {
        let probe = stretch(candidate.as_bytes(), &self.salt);
        let mut diff = 0u8;
        for (a, b) in probe.iter().zip(self.digest.iter()) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

// Keep digests out of logs; the salt alone is harmless.
impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHash")
            .field("salt", &hex::encode(self.salt))
            .field("digest", &"<redacted>")
            .finish()
    }
}

/// Iterated salted SHA-256. The round count makes brute-forcing the tiny
/// PIN space cost something without noticeably slowing a single verify.
fn stretch(secret: &[u8], salt: &[u8]) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret);
    digest.copy_from_slice(&hasher.finalize());
    for _ in 1..STRETCH_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(digest);
        digest.copy_from_slice(&hasher.finalize());
    }
    digest
}

/// PIN policy layered over [`SecretHash`].
///
/// A well-formed PIN is exactly six decimal digits with no leading zero,
/// i.e. the value range 100000..=999999.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinVault;

impl PinVault {
    pub fn new() -> Self {
        Self
    }

    /// Validates the PIN shape and hashes it.
    ///
    /// Malformed input is rejected with `ValidationError` rather than
    /// silently hashed, so a typo at account creation cannot produce an
    /// account nobody can unlock.
    pub fn hash(&self, pin: &str) -> Result<SecretHash> {
        if !Self::well_formed(pin) {
            return Err(LedgerError::ValidationError(
                "pin must be six digits in 100000..=999999".to_string(),
            ));
        }
        Ok(SecretHash::new(pin))
    }

    /// Whether `pin` unlocks the stored hash. Malformed candidates simply
    /// never match.
    pub fn verify(&self, pin: &str, hash: &SecretHash) -> bool {
        hash.matches(pin)
    }

    // Explicit shape check instead of a numeric parse: `u32::from_str`
    // would wave through inputs like "+12345".
    fn well_formed(pin: &str) -> bool {
        pin.len() == 6 && pin.bytes().all(|b| b.is_ascii_digit()) && !pin.starts_with('0')
    }
}
