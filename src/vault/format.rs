//! Envelope layout: the exact bytes of a vault file.
//!
//! ```text
//! [$<alg>$<cost>$<salt>: 28-29 bytes][IV: 16 bytes][AES-256-CFB8( SHA-256(payload) || payload )]
//! ```
//!
//! - **Header**: the key descriptor in bcrypt's textual form.  Public.
//! - **IV**: fresh random bytes for every encode.
//! - **Encrypted body**: a 32-byte digest of the payload followed by
//!   the payload itself.  After decryption the digest is recomputed;
//!   a mismatch is reported as `WrongPasswordOrCorruptFile` since the
//!   two causes cannot be told apart without a MAC.
//!
//! Nothing here touches the filesystem (see `storage`).

use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::digest::{self, DIGEST_LEN};
use crate::crypto::encryption::{self, IV_LEN};
use crate::crypto::kdf::KeyDescriptor;
use crate::crypto::keys::VaultKey;
use crate::errors::{PwVaultError, Result};

/// A decoded and verified envelope body.
pub struct Opened {
    pub digest: [u8; DIGEST_LEN],
    pub payload: Zeroizing<Vec<u8>>,
}

/// Read the key descriptor from the front of a vault file.
///
/// This is the only part of the file usable before the key is known.
pub fn read_descriptor(file_bytes: &[u8]) -> Result<KeyDescriptor> {
    let (descriptor, _) = KeyDescriptor::parse_header(file_bytes)?;
    Ok(descriptor)
}

/// Build the complete file bytes for `payload`.
///
/// `digest` is normally `digest::digest(payload)`; it is taken as an
/// argument so the encoded body is exactly what the caller asked for.
pub fn encode(
    key: &VaultKey,
    descriptor: &KeyDescriptor,
    digest: &[u8; DIGEST_LEN],
    payload: &[u8],
) -> Result<Vec<u8>> {
    let header = descriptor.to_header();

    let mut plaintext = Zeroizing::new(Vec::with_capacity(DIGEST_LEN + payload.len()));
    plaintext.extend_from_slice(digest);
    plaintext.extend_from_slice(payload);

    let body = encryption::encrypt(key, &plaintext)?;

    let mut buf = Vec::with_capacity(header.len() + body.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(&body);

    debug!(
        header_len = header.len(),
        payload_len = payload.len(),
        "encoded vault envelope"
    );
    Ok(buf)
}

/// Decrypt and verify a vault file.
///
/// The header is parsed only to find where the body starts; the caller
/// is expected to have derived `key` from that same header.
pub fn decode(key: &VaultKey, file_bytes: &[u8]) -> Result<Opened> {
    let (_, header_len) = KeyDescriptor::parse_header(file_bytes)?;
    let body = &file_bytes[header_len..];

    if body.len() < IV_LEN + DIGEST_LEN {
        return Err(PwVaultError::MalformedFile(format!(
            "body is {} bytes, need at least {}",
            body.len(),
            IV_LEN + DIGEST_LEN
        )));
    }

    let plaintext = encryption::decrypt(key, body)?;
    let (stored_digest, payload) = plaintext.split_at(DIGEST_LEN);

    if !digest::verify(payload, stored_digest) {
        debug!("vault digest mismatch after decryption");
        return Err(PwVaultError::WrongPasswordOrCorruptFile);
    }

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(stored_digest);
    let payload = Zeroizing::new(payload.to_vec());

    debug!(payload_len = payload.len(), "decoded vault envelope");
    Ok(Opened { digest, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{BcryptVariant, SALT_LEN};

    fn descriptor() -> KeyDescriptor {
        KeyDescriptor {
            variant: BcryptVariant::V2b,
            cost: 4,
            salt: [9u8; SALT_LEN],
        }
    }

    fn sealed(payload: &[u8]) -> (VaultKey, Vec<u8>) {
        let key = VaultKey::new([0x42; 32]);
        let bytes = encode(&key, &descriptor(), &digest::digest(payload), payload).unwrap();
        (key, bytes)
    }

    #[test]
    fn layout_is_header_iv_then_ciphertext() {
        let payload = b"{}";
        let (_, bytes) = sealed(payload);
        let header = descriptor().to_header();
        assert!(bytes.starts_with(header.as_bytes()));
        assert_eq!(
            bytes.len(),
            header.len() + IV_LEN + DIGEST_LEN + payload.len()
        );
    }

    #[test]
    fn decode_returns_digest_and_payload() {
        let payload = br#"{"a":{"b":{"pw":"c","note":""}}}"#;
        let (key, bytes) = sealed(payload);
        let opened = decode(&key, &bytes).unwrap();
        assert_eq!(opened.digest, digest::digest(payload));
        assert_eq!(&opened.payload[..], &payload[..]);
    }

    #[test]
    fn read_descriptor_recovers_header() {
        let (_, bytes) = sealed(b"{}");
        assert_eq!(read_descriptor(&bytes).unwrap(), descriptor());
    }

    #[test]
    fn mismatched_digest_is_rejected() {
        let key = VaultKey::new([0x42; 32]);
        let bytes = encode(&key, &descriptor(), &[0u8; DIGEST_LEN], b"{}").unwrap();
        assert!(matches!(
            decode(&key, &bytes),
            Err(PwVaultError::WrongPasswordOrCorruptFile)
        ));
    }

    #[test]
    fn truncated_body_is_malformed() {
        let (key, bytes) = sealed(b"");
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(
            decode(&key, cut),
            Err(PwVaultError::MalformedFile(_))
        ));
    }

    #[test]
    fn header_only_file_is_malformed() {
        let header = descriptor().to_header();
        let key = VaultKey::new([0x42; 32]);
        assert!(matches!(
            decode(&key, header.as_bytes()),
            Err(PwVaultError::MalformedFile(_))
        ));
    }

    #[test]
    fn empty_payload_round_trips() {
        let (key, bytes) = sealed(b"");
        assert!(decode(&key, &bytes).unwrap().payload.is_empty());
    }
}
