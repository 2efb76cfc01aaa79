//! Unlocking, sealing and re-keying a vault.
//!
//! A `SessionKey` is the descriptor plus the key derived from it.  It
//! is created once per process (by `create_vault` or `open_vault`), held
//! by the caller for as long as the vault stays unlocked, and passed
//! explicitly to every save.  Dropping it zeroes the key.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use super::format;
use super::storage;
use super::store::VaultStore;
use crate::crypto::digest;
use crate::crypto::kdf::{derive_key, KeyDescriptor};
use crate::crypto::keys::VaultKey;
use crate::errors::{PwVaultError, Result};

/// The unlocked key material for one vault session.
#[derive(Clone)]
pub struct SessionKey {
    descriptor: KeyDescriptor,
    key: VaultKey,
}

impl SessionKey {
    /// Derive the key for `password` under an existing descriptor.
    pub fn derive(password: &[u8], descriptor: KeyDescriptor) -> Result<Self> {
        let key = derive_key(password, &descriptor)?;
        Ok(Self { descriptor, key })
    }

    /// Draw a fresh descriptor at `cost` and derive its key.
    pub fn generate(password: &[u8], cost: u32) -> Result<Self> {
        Self::derive(password, KeyDescriptor::generate(cost)?)
    }

    /// The public parameters this key was derived with.
    pub fn descriptor(&self) -> &KeyDescriptor {
        &self.descriptor
    }

    /// The derived key.
    pub fn key(&self) -> &VaultKey {
        &self.key
    }

    /// Returns `true` if `password` derives this same key.
    pub fn matches_password(&self, password: &[u8]) -> Result<bool> {
        let candidate = derive_key(password, &self.descriptor)?;
        Ok(candidate == self.key)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("descriptor", &self.descriptor.to_header())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// In-memory sealing
// ---------------------------------------------------------------------------

/// Encrypt `store` into complete vault file bytes.
pub fn seal(store: &VaultStore, session: &SessionKey) -> Result<Vec<u8>> {
    let payload = store.to_payload()?;
    let digest = digest::digest(&payload);
    format::encode(&session.key, &session.descriptor, &digest, &payload)
}

/// Unlock vault file bytes with `password`.
///
/// Either the whole store comes back or an error does; there is no
/// partially decoded result.
pub fn unseal(file_bytes: &[u8], password: &[u8]) -> Result<(VaultStore, SessionKey)> {
    let descriptor = format::read_descriptor(file_bytes)?;
    let session = SessionKey::derive(password, descriptor)?;
    let opened = format::decode(&session.key, file_bytes)?;
    let store = VaultStore::from_payload(&opened.payload)?;
    Ok((store, session))
}

// ---------------------------------------------------------------------------
// File-backed operations
// ---------------------------------------------------------------------------

/// Start a new, empty vault under `password`.
///
/// Nothing is written until `save_vault`.
pub fn create_vault(password: &[u8], cost: u32) -> Result<(VaultStore, SessionKey)> {
    let session = SessionKey::generate(password, cost)?;
    info!(cost, "created new vault key");
    Ok((VaultStore::new(), session))
}

/// Read and unlock the vault at `path`.
pub fn open_vault(path: &Path, password: &[u8]) -> Result<(VaultStore, SessionKey)> {
    let bytes = storage::read_envelope(path)?;
    let (store, session) = unseal(&bytes, password)?;
    info!(
        path = %path.display(),
        sites = store.list_sites().len(),
        "vault opened"
    );
    Ok((store, session))
}

/// Encrypt `store` with a fresh IV and atomically replace `path`.
pub fn save_vault(path: &Path, store: &VaultStore, session: &SessionKey) -> Result<()> {
    let bytes = seal(store, session)?;
    storage::write_envelope(path, &bytes)?;
    info!(path = %path.display(), credentials = store.len(), "vault saved");
    Ok(())
}

/// Re-encrypt `store` at `path` under a key derived from `new_password`.
///
/// A new salt is drawn at `cost`.  The caller must already hold the
/// vault unlocked; use [`change_master_password`] when the old password
/// still has to be checked.
pub fn rekey_vault(
    path: &Path,
    store: &VaultStore,
    new_password: &[u8],
    cost: u32,
) -> Result<SessionKey> {
    let next = SessionKey::generate(new_password, cost)?;
    save_vault(path, store, &next)?;
    info!(path = %path.display(), cost, "vault re-keyed");
    Ok(next)
}

/// Change the master password of the vault at `path`.
///
/// `old_password` must derive the `current` key.  The whole store is
/// then re-encrypted under a fresh descriptor and written atomically;
/// the returned key replaces `current` for later saves.
pub fn change_master_password(
    path: &Path,
    store: &VaultStore,
    current: &SessionKey,
    old_password: &[u8],
    new_password: &[u8],
    cost: u32,
) -> Result<SessionKey> {
    if !current.matches_password(old_password)? {
        debug!("old master password does not match the session key");
        return Err(PwVaultError::IncorrectPassword);
    }
    rekey_vault(path, store, new_password, cost)
}
