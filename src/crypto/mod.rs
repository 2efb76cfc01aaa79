//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - bcrypt password-based key derivation and the key descriptor (`kdf`)
//! - SHA-256 payload digests (`digest`)
//! - AES-256-CFB8 encryption and decryption (`encryption`)
//! - The zeroizing `VaultKey` wrapper (`keys`)

pub mod digest;
pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use digest::{digest, verify, DIGEST_LEN};
pub use encryption::{decrypt, encrypt, IV_LEN};
pub use kdf::{derive_key, generate_salt, BcryptVariant, KeyDescriptor, DEFAULT_COST};
pub use keys::{VaultKey, KEY_LEN};
