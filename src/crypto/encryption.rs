//! AES-256 in 8-bit cipher feedback mode (CFB-8).
//!
//! Each call to `encrypt` draws a fresh random 16-byte IV and prepends
//! it to the ciphertext.  `decrypt` splits the IV back out.
//!
//! Layout of the returned byte buffer:
//!   [ 16-byte IV | ciphertext (same length as plaintext) ]
//!
//! CFB-8 is unauthenticated: decrypting with the wrong key "succeeds"
//! and yields garbage, which is why the vault body carries a digest.

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::RngCore;
use zeroize::Zeroizing;

use super::keys::VaultKey;
use crate::errors::{PwVaultError, Result};

/// Size of the AES block, and therefore of the IV, in bytes.
pub const IV_LEN: usize = 16;

type Aes256Cfb8Enc = cfb8::Encryptor<aes::Aes256>;
type Aes256Cfb8Dec = cfb8::Decryptor<aes::Aes256>;

/// Encrypt `plaintext` under `key`.
///
/// Returns the IV prepended to the ciphertext (IV || ciphertext).
pub fn encrypt(key: &VaultKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);

    let cipher = Aes256Cfb8Enc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| PwVaultError::EncryptionFailed(format!("invalid key or IV length: {e}")))?;

    let mut output = Vec::with_capacity(IV_LEN + plaintext.len());
    output.extend_from_slice(&iv);
    output.extend_from_slice(plaintext);
    cipher.encrypt(&mut output[IV_LEN..]);
    Ok(output)
}

/// Decrypt data produced by `encrypt`.
///
/// Expects the first 16 bytes to be the IV.  The plaintext comes back
/// in a zeroizing buffer since it holds vault contents.
pub fn decrypt(key: &VaultKey, iv_and_ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if iv_and_ciphertext.len() < IV_LEN {
        return Err(PwVaultError::MalformedFile(
            "body is shorter than the IV".into(),
        ));
    }
    let (iv, ciphertext) = iv_and_ciphertext.split_at(IV_LEN);

    let cipher = Aes256Cfb8Dec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| PwVaultError::EncryptionFailed(format!("invalid key or IV length: {e}")))?;

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    cipher.decrypt(&mut plaintext);
    Ok(plaintext)
}
