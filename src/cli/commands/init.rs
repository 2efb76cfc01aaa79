//! `pwvault init` — create a new, empty vault.

use std::fs;

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, vault_path, Cli, PASSWORD_ENV};
use crate::errors::{PwVaultError, Result};
use crate::vault::{create_vault, save_vault};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Refuse to overwrite an existing vault.
    if path.exists() {
        output::tip("Use `pwvault set` to add passwords to the existing vault.");
        return Err(PwVaultError::VaultAlreadyExists(path));
    }

    // 2. Create the parent directory if it doesn't exist.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }

    // 3. Prompt for a new master password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 4. Derive the key and write the empty vault.
    output::info("Deriving key (this is deliberately slow)...");
    let (store, session) = create_vault(password.as_bytes(), settings.bcrypt_cost)?;
    save_vault(&path, &store, &session)?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `pwvault set <SITE> <USER>` to add a password.");
    output::tip("Run `pwvault list` to see all passwords.");

    Ok(())
}
