//! Vault module — the credential map and its encrypted envelope.
//!
//! This module provides:
//! - The `Credential` record (`credential`)
//! - The in-memory `VaultStore` and its JSON payload (`store`)
//! - The on-disk envelope layout (`format`)
//! - Atomic file persistence (`storage`)
//! - Session-level open/create/save/re-key operations (`session`)

pub mod credential;
pub mod format;
pub mod session;
pub mod storage;
pub mod store;

// Re-export the most commonly used items.
pub use credential::Credential;
pub use session::{
    change_master_password, create_vault, open_vault, rekey_vault, save_vault, seal, unseal,
    SessionKey,
};
pub use store::VaultStore;
