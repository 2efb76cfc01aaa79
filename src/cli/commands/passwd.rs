//! `pwvault passwd` — change the master password.
//!
//! Verifies the current password, draws a new salt, derives a new key
//! from the new password and re-encrypts the whole vault atomically.

use crate::cli::output;
use crate::cli::{
    load_settings, prompt_new_password, prompt_password, vault_path, Cli, NEW_PASSWORD_ENV,
};
use crate::errors::Result;
use crate::vault::{open_vault, rekey_vault};

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Open the vault; a successful unlock verifies the current password.
    let old_password = prompt_password("Current master password")?;
    let (store, _session) = open_vault(&path, old_password.as_bytes())?;

    // 2. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Derive a fresh descriptor and key, re-encrypt and save atomically.
    rekey_vault(&path, &store, new_password.as_bytes(), settings.bcrypt_cost)?;

    output::success(&format!(
        "Master password changed ({} password(s) re-encrypted)",
        store.len()
    ));

    Ok(())
}
