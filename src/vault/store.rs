//! The in-memory credential map and its payload encoding.
//!
//! `VaultStore` is a plain value: it knows nothing about keys, files or
//! encryption.  The session layer turns it into a payload with
//! `to_payload` before sealing and rebuilds it with `from_payload`
//! after a successful unseal.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::credential::Credential;
use crate::errors::{PwVaultError, Result};

/// site -> user -> credential.
type SiteMap = BTreeMap<String, BTreeMap<String, Credential>>;

/// All credentials held by an unlocked vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultStore {
    sites: SiteMap,
}

impl VaultStore {
    /// An empty store, as created on first run.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Look up the credential for `user` on `site`.
    pub fn get(&self, site: &str, user: &str) -> Result<&Credential> {
        let users = self
            .sites
            .get(site)
            .ok_or_else(|| PwVaultError::NotFound(format!("site '{site}'")))?;
        users
            .get(user)
            .ok_or_else(|| PwVaultError::NotFound(format!("user '{user}' on site '{site}'")))
    }

    /// Returns `true` if `site` has an entry for `user`.
    pub fn contains(&self, site: &str, user: &str) -> bool {
        self.sites
            .get(site)
            .is_some_and(|users| users.contains_key(user))
    }

    /// All site names, sorted.
    pub fn list_sites(&self) -> Vec<&str> {
        self.sites.keys().map(String::as_str).collect()
    }

    /// Every (site, user, credential) triple, sorted by site then user.
    pub fn list_all(&self) -> Vec<(&str, &str, &Credential)> {
        self.sites
            .iter()
            .flat_map(|(site, users)| {
                users
                    .iter()
                    .map(move |(user, cred)| (site.as_str(), user.as_str(), cred))
            })
            .collect()
    }

    /// Total number of stored credentials across all sites.
    pub fn len(&self) -> usize {
        self.sites.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if the vault holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.sites.values().all(BTreeMap::is_empty)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Insert or overwrite the credential for `user` on `site`.
    ///
    /// Both fields are replaced; returns `true` if an entry existed.
    pub fn set(&mut self, site: &str, user: &str, password: &str, note: &str) -> bool {
        self.sites
            .entry(site.to_string())
            .or_default()
            .insert(user.to_string(), Credential::new(password, note))
            .is_some()
    }

    /// Remove `user` from every site that has it.
    ///
    /// Sites left without users are dropped.  Returns how many entries
    /// were removed, or `NotFound` if the user was on no site.
    pub fn delete_user(&mut self, user: &str) -> Result<usize> {
        let mut removed = 0;
        self.sites.retain(|_, users| {
            if users.remove(user).is_some() {
                removed += 1;
            }
            !users.is_empty()
        });

        if removed == 0 {
            return Err(PwVaultError::NotFound(format!("user '{user}'")));
        }
        Ok(removed)
    }

    /// Remove `user` from `site` only, dropping the site if it empties.
    pub fn remove(&mut self, site: &str, user: &str) -> Result<Credential> {
        let users = self
            .sites
            .get_mut(site)
            .ok_or_else(|| PwVaultError::NotFound(format!("site '{site}'")))?;
        let cred = users
            .remove(user)
            .ok_or_else(|| PwVaultError::NotFound(format!("user '{user}' on site '{site}'")))?;

        if users.is_empty() {
            self.sites.remove(site);
        }
        Ok(cred)
    }

    // ------------------------------------------------------------------
    // Payload encoding
    // ------------------------------------------------------------------

    /// Serialize to the JSON payload that gets sealed into the envelope.
    ///
    /// The output is measured first and written into a buffer of exactly
    /// that size, so no partially filled copy of the plaintext is ever
    /// freed by a reallocation without being zeroed.
    pub fn to_payload(&self) -> Result<Zeroizing<Vec<u8>>> {
        let mut counter = ByteCounter(0);
        serde_json::to_writer(&mut counter, self).map_err(payload_error)?;

        let mut payload = Zeroizing::new(Vec::with_capacity(counter.0));
        serde_json::to_writer(&mut *payload, self).map_err(payload_error)?;
        Ok(payload)
    }

    /// Rebuild a store from a decrypted payload.
    ///
    /// An empty payload is an empty vault.  Anything other than an
    /// object of objects of `{"pw", "note"}` records is rejected.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_slice(payload).map_err(|e| PwVaultError::MalformedPayload(e.to_string()))
    }
}

fn payload_error(e: serde_json::Error) -> PwVaultError {
    PwVaultError::SerializationError(format!("payload: {e}"))
}

/// Sink that only counts the bytes written to it.
struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VaultStore {
        let mut store = VaultStore::new();
        store.set("example.com", "alice", "s3cr3t", "work account");
        store.set("example.com", "bob", "hunter2", "");
        store.set("mail.org", "alice", "pässwörd ✓", "ünïcödé");
        store
    }

    #[test]
    fn get_returns_credential() {
        let store = sample();
        let cred = store.get("example.com", "alice").unwrap();
        assert_eq!(cred.password, "s3cr3t");
        assert_eq!(cred.note, "work account");
    }

    #[test]
    fn get_missing_site_or_user_is_not_found() {
        let store = sample();
        assert!(matches!(
            store.get("nowhere.net", "alice"),
            Err(PwVaultError::NotFound(_))
        ));
        assert!(matches!(
            store.get("example.com", "carol"),
            Err(PwVaultError::NotFound(_))
        ));
    }

    #[test]
    fn set_overwrites_both_fields() {
        let mut store = sample();
        let existed = store.set("example.com", "alice", "new", "");
        assert!(existed);
        let cred = store.get("example.com", "alice").unwrap();
        assert_eq!(cred.password, "new");
        assert_eq!(cred.note, "");
        assert!(!store.set("example.com", "dave", "x", "y"));
    }

    #[test]
    fn list_sites_is_sorted() {
        let mut store = sample();
        store.set("aardvark.io", "z", "p", "n");
        assert_eq!(
            store.list_sites(),
            vec!["aardvark.io", "example.com", "mail.org"]
        );
    }

    #[test]
    fn list_all_is_sorted_by_site_then_user() {
        let store = sample();
        let all: Vec<(&str, &str)> = store.list_all().iter().map(|(s, u, _)| (*s, *u)).collect();
        assert_eq!(
            all,
            vec![
                ("example.com", "alice"),
                ("example.com", "bob"),
                ("mail.org", "alice"),
            ]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_user_spans_all_sites_and_prunes_empty_sites() {
        let mut store = sample();
        assert_eq!(store.delete_user("alice").unwrap(), 2);
        assert!(store.list_all().iter().all(|(_, user, _)| *user != "alice"));
        assert_eq!(store.list_sites(), vec!["example.com"]);
    }

    #[test]
    fn delete_unknown_user_is_not_found() {
        let mut store = sample();
        assert!(matches!(
            store.delete_user("mallory"),
            Err(PwVaultError::NotFound(_))
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_is_per_site() {
        let mut store = sample();
        store.remove("mail.org", "alice").unwrap();
        assert!(store.contains("example.com", "alice"));
        assert!(!store.list_sites().contains(&"mail.org"));
        assert!(store.remove("mail.org", "alice").is_err());
    }

    #[test]
    fn payload_round_trip_is_exact() {
        let store = sample();
        let payload = store.to_payload().unwrap();
        assert_eq!(VaultStore::from_payload(&payload).unwrap(), store);
    }

    #[test]
    fn payload_buffer_is_allocated_once_at_exact_size() {
        let mut store = sample();
        for i in 0..200 {
            store.set(&format!("site{i}.example"), "user", "a long enough password", "note");
        }
        let payload = store.to_payload().unwrap();
        assert_eq!(payload.capacity(), payload.len());
        assert_eq!(VaultStore::from_payload(&payload).unwrap(), store);
    }

    #[test]
    fn payload_uses_nested_objects() {
        let mut store = VaultStore::new();
        store.set("s", "u", "p", "n");
        let payload = store.to_payload().unwrap();
        assert_eq!(&payload[..], br#"{"s":{"u":{"pw":"p","note":"n"}}}"#);
    }

    #[test]
    fn empty_payload_is_empty_store() {
        assert!(VaultStore::from_payload(b"").unwrap().is_empty());
        assert!(VaultStore::from_payload(b"{}").unwrap().is_empty());
        assert!(VaultStore::from_payload(br#"{"s": {}}"#).unwrap().is_empty());
    }

    #[test]
    fn reads_ascii_escaped_unicode() {
        let payload = br#"{"caf\u00e9.fr": {"z\u00f6e": {"pw": "\u2713", "note": ""}}}"#;
        let store = VaultStore::from_payload(payload).unwrap();
        assert_eq!(store.get("café.fr", "zöe").unwrap().password, "✓");
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        let bad_payloads: [&[u8]; 5] = [
            br#"[]"#,
            br#"{"s": "flat"}"#,
            br#"{"s": {"u": {"pw": "p", "note": "n", "extra": 1}}}"#,
            br#"{"s": {"u": {"pw": 5, "note": "n"}}}"#,
            b"not json",
        ];
        for bad in bad_payloads {
            assert!(
                matches!(
                    VaultStore::from_payload(bad),
                    Err(PwVaultError::MalformedPayload(_))
                ),
                "accepted {}",
                String::from_utf8_lossy(bad)
            );
        }
    }
}
