//! The `Credential` record stored for each (site, user) pair.
//!
//! Serialized as `{"pw": "...", "note": "..."}` inside the vault
//! payload.  Unknown fields are rejected so that a payload written by
//! a newer format is never silently truncated on re-save.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A password and free-form note for one user on one site.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// The stored password.
    #[serde(rename = "pw")]
    pub password: String,

    /// Free-form note, may be empty.
    pub note: String,
}

impl Credential {
    pub fn new(password: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            note: note.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never log the password itself
        f.debug_struct("Credential")
            .field("password", &"[REDACTED]")
            .field("note", &self.note)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_short_field_name() {
        let json = serde_json::to_string(&Credential::new("s3cr3t", "work")).unwrap();
        assert_eq!(json, r#"{"pw":"s3cr3t","note":"work"}"#);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<Credential, _> =
            serde_json::from_str(r#"{"pw":"a","note":"b","otp":"c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        let result: Result<Credential, _> = serde_json::from_str(r#"{"pw":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Credential::new("hunter2", "note"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("note"));
    }
}
