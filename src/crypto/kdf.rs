//! Password-based key derivation using bcrypt.
//!
//! The vault key is taken from bcrypt's modular-crypt output
//! (`$2b$14$<22-char salt><31-char hash>`).  bcrypt only yields 31
//! encoded characters of hash, so the key is the last 32 characters of
//! the full string: the final salt character followed by the hash.
//! The key is therefore 32 ASCII bytes, which is what AES-256 receives.
//!
//! The descriptor (variant, cost, salt) is public and is written in
//! front of the ciphertext as `$<alg>$<cost>$<salt>`.

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{PwVaultError, Result};

/// Length of the raw salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the salt once encoded with the bcrypt alphabet.
pub const ENCODED_SALT_LEN: usize = 22;

/// Work factor used for new vaults unless configured otherwise.
pub const DEFAULT_COST: u32 = 14;

/// Smallest and largest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Shortest and longest possible header (`$2$..` vs `$2b$..`).
pub const MIN_HEADER_LEN: usize = 28;
pub const MAX_HEADER_LEN: usize = 29;

/// bcrypt's base64 dialect: `./A-Za-z0-9`, no padding.  The 22nd salt
/// character carries 2 spare bits that the encoder leaves at zero;
/// decoding tolerates files written by encoders that did not.
const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// The bcrypt revision named in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcryptVariant {
    /// `$2$`: first revision, recognised but not derivable.
    V2,
    /// `$2a$`
    V2a,
    /// `$2b$`: written for new vaults.
    V2b,
    /// `$2x$`: crypt_blowfish's buggy-compat mode, not derivable.
    V2x,
    /// `$2y$`
    V2y,
}

impl BcryptVariant {
    /// The identifier as it appears between the first two `$`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2",
            Self::V2a => "2a",
            Self::V2b => "2b",
            Self::V2x => "2x",
            Self::V2y => "2y",
        }
    }

    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"2" => Some(Self::V2),
            b"2a" => Some(Self::V2a),
            b"2b" => Some(Self::V2b),
            b"2x" => Some(Self::V2x),
            b"2y" => Some(Self::V2y),
            _ => None,
        }
    }

    /// Revisions whose hash output matches what the `bcrypt` crate computes.
    fn is_derivable(self) -> bool {
        matches!(self, Self::V2a | Self::V2b | Self::V2y)
    }
}

/// Public parameters needed to re-derive the vault key from a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub variant: BcryptVariant,
    pub cost: u32,
    pub salt: [u8; SALT_LEN],
}

impl KeyDescriptor {
    /// A fresh descriptor with a random salt.
    ///
    /// The cost is checked here so a bad setting fails before anything
    /// is written.
    pub fn generate(cost: u32) -> Result<Self> {
        validate_cost(cost)?;
        Ok(Self {
            variant: BcryptVariant::V2b,
            cost,
            salt: generate_salt(),
        })
    }

    /// The salt in bcrypt's 22-character encoding.
    pub fn encoded_salt(&self) -> String {
        BCRYPT_B64.encode(self.salt)
    }

    /// Textual header form: `$<alg>$<cost:02>$<salt>`.
    pub fn to_header(&self) -> String {
        format!(
            "${}${:02}${}",
            self.variant.as_str(),
            self.cost,
            self.encoded_salt()
        )
    }

    /// Parse a header from the start of `data`.
    ///
    /// Returns the descriptor and the number of header bytes consumed
    /// (28 or 29).  Anything that is not a well-formed header is a
    /// `MalformedFile`; range checks on the cost are left to
    /// [`derive_key`].
    pub fn parse_header(data: &[u8]) -> Result<(Self, usize)> {
        if data.first() != Some(&b'$') {
            return Err(malformed("header does not start with '$'"));
        }

        // The algorithm tag is one or two bytes, terminated by '$'.
        let tag_end = match data.iter().skip(1).take(3).position(|&b| b == b'$') {
            Some(pos) => pos + 1,
            None => return Err(malformed("unterminated algorithm tag")),
        };
        let variant = BcryptVariant::from_tag(&data[1..tag_end]).ok_or_else(|| {
            malformed(&format!(
                "unknown algorithm tag '{}'",
                String::from_utf8_lossy(&data[1..tag_end])
            ))
        })?;

        let header_len = tag_end + 4 + ENCODED_SALT_LEN;
        if data.len() < header_len {
            return Err(malformed("file too short to hold a header"));
        }

        let cost_digits = &data[tag_end + 1..tag_end + 3];
        if !cost_digits.iter().all(u8::is_ascii_digit) || data[tag_end + 3] != b'$' {
            return Err(malformed("cost must be two digits followed by '$'"));
        }
        let cost = u32::from(cost_digits[0] - b'0') * 10 + u32::from(cost_digits[1] - b'0');

        let salt_text = &data[tag_end + 4..header_len];
        let decoded = BCRYPT_B64
            .decode(salt_text)
            .map_err(|e| malformed(&format!("salt is not bcrypt base64: {e}")))?;
        let salt: [u8; SALT_LEN] = decoded
            .try_into()
            .map_err(|_| malformed("salt does not decode to 16 bytes"))?;

        Ok((
            Self {
                variant,
                cost,
                salt,
            },
            header_len,
        ))
    }
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header())
    }
}

/// Derive the 32-byte vault key from a password and descriptor.
///
/// Deliberately slow: every increment of `cost` doubles the work.
pub fn derive_key(password: &[u8], descriptor: &KeyDescriptor) -> Result<VaultKey> {
    if !descriptor.variant.is_derivable() {
        return Err(PwVaultError::InvalidDescriptor(format!(
            "bcrypt variant '{}' is not supported",
            descriptor.variant.as_str()
        )));
    }
    validate_cost(descriptor.cost)?;

    let parts = bcrypt::hash_with_salt(password, descriptor.cost, descriptor.salt)
        .map_err(|e| PwVaultError::InvalidDescriptor(format!("bcrypt failed: {e}")))?;
    let mut full = parts.format_for_version(bcrypt::Version::TwoB);

    let tail = full.len().checked_sub(KEY_LEN).ok_or_else(|| {
        PwVaultError::InvalidDescriptor("bcrypt output shorter than the key".into())
    })?;
    let key = VaultKey::from_slice(&full.as_bytes()[tail..]);
    full.zeroize();

    let key = key.ok_or_else(|| {
        PwVaultError::InvalidDescriptor("bcrypt output shorter than the key".into())
    })?;

    debug!(cost = descriptor.cost, "derived vault key");
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Check a cost against bcrypt's accepted range.
pub fn validate_cost(cost: u32) -> Result<()> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(PwVaultError::InvalidDescriptor(format!(
            "bcrypt cost must be between {MIN_COST} and {MAX_COST} (got {cost})"
        )));
    }
    Ok(())
}

fn malformed(reason: &str) -> PwVaultError {
    PwVaultError::MalformedFile(format!("header: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(cost: u32) -> KeyDescriptor {
        KeyDescriptor {
            variant: BcryptVariant::V2b,
            cost,
            salt: [0x5a; SALT_LEN],
        }
    }

    #[test]
    fn header_is_29_bytes_for_two_char_tags() {
        let header = descriptor(14).to_header();
        assert_eq!(header.len(), MAX_HEADER_LEN);
        assert!(header.starts_with("$2b$14$"));
    }

    #[test]
    fn header_is_28_bytes_for_one_char_tag() {
        let d = KeyDescriptor {
            variant: BcryptVariant::V2,
            ..descriptor(9)
        };
        let header = d.to_header();
        assert_eq!(header.len(), MIN_HEADER_LEN);
        assert!(header.starts_with("$2$09$"));

        let (parsed, len) = KeyDescriptor::parse_header(header.as_bytes()).unwrap();
        assert_eq!(len, MIN_HEADER_LEN);
        assert_eq!(parsed, d);
    }

    #[test]
    fn parse_header_ignores_trailing_body() {
        let d = descriptor(5);
        let mut data = d.to_header().into_bytes();
        data.extend_from_slice(&[0xff; 40]);

        let (parsed, len) = KeyDescriptor::parse_header(&data).unwrap();
        assert_eq!(len, MAX_HEADER_LEN);
        assert_eq!(parsed, d);
    }

    #[test]
    fn parse_header_accepts_known_salt() {
        let header = b"$2a$05$CCCCCCCCCCCCCCCCCCCCC.";
        let (parsed, len) = KeyDescriptor::parse_header(header).unwrap();
        assert_eq!(len, 29);
        assert_eq!(parsed.variant, BcryptVariant::V2a);
        assert_eq!(parsed.cost, 5);
        assert_eq!(parsed.encoded_salt(), "CCCCCCCCCCCCCCCCCCCCC.");
    }

    #[test]
    fn parse_header_rejects_unknown_tag() {
        let result = KeyDescriptor::parse_header(b"$3c$10$CCCCCCCCCCCCCCCCCCCCC.");
        assert!(matches!(result, Err(PwVaultError::MalformedFile(_))));
    }

    #[test]
    fn parse_header_rejects_bad_cost() {
        let result = KeyDescriptor::parse_header(b"$2b$1x$CCCCCCCCCCCCCCCCCCCCC.");
        assert!(matches!(result, Err(PwVaultError::MalformedFile(_))));
    }

    #[test]
    fn parse_header_rejects_bad_salt_alphabet() {
        let result = KeyDescriptor::parse_header(b"$2b$10$CCCCCCCCCC+CCCCCCCCCC.");
        assert!(matches!(result, Err(PwVaultError::MalformedFile(_))));
    }

    #[test]
    fn parse_header_rejects_truncated_input() {
        let result = KeyDescriptor::parse_header(b"$2b$10$CCCC");
        assert!(matches!(result, Err(PwVaultError::MalformedFile(_))));
        assert!(KeyDescriptor::parse_header(b"").is_err());
    }

    #[test]
    fn derive_rejects_out_of_range_cost() {
        let result = derive_key(b"pw", &descriptor(3));
        assert!(matches!(result, Err(PwVaultError::InvalidDescriptor(_))));
        let result = derive_key(b"pw", &descriptor(32));
        assert!(matches!(result, Err(PwVaultError::InvalidDescriptor(_))));
    }

    #[test]
    fn derive_rejects_unsupported_variant() {
        let d = KeyDescriptor {
            variant: BcryptVariant::V2x,
            ..descriptor(4)
        };
        assert!(matches!(
            derive_key(b"pw", &d),
            Err(PwVaultError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn derived_key_starts_with_last_salt_char() {
        let d = descriptor(4);
        let key = derive_key(b"hunter2", &d).unwrap();
        let salt = d.encoded_salt();
        assert_eq!(key.as_bytes()[0], *salt.as_bytes().last().unwrap());
    }

    #[test]
    fn generate_rejects_bad_cost() {
        assert!(KeyDescriptor::generate(2).is_err());
        assert!(KeyDescriptor::generate(MIN_COST).is_ok());
    }
}
