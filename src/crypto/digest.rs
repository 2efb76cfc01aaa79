//! SHA-256 digest of the plaintext payload.
//!
//! The digest is stored inside the encrypted body and recomputed after
//! decryption; a mismatch means the key was wrong or the file was
//! damaged.  It is not keyed, so it is an integrity check and not a MAC.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Size of the digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Hash `payload` with SHA-256.
pub fn digest(payload: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(payload).into()
}

/// `true` when `expected` is exactly the digest of `payload`.
pub fn verify(payload: &[u8], expected: &[u8]) -> bool {
    if expected.len() != DIGEST_LEN {
        return false;
    }
    digest(payload)[..].ct_eq(expected).into()
}
