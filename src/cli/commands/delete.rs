//! `pwvault delete` — remove a user from the vault.
//!
//! Without `--site` the user is removed from every site that has it;
//! with `--site` only that one entry goes.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, normalize_site, normalize_user, prompt_password, vault_path, Cli};
use crate::errors::{PwVaultError, Result};
use crate::vault::{open_vault, save_vault};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, user: &str, site: Option<&str>, force: bool) -> Result<()> {
    let user = normalize_user(user)?;
    let site = site.map(normalize_site).transpose()?;

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let prompt = match &site {
            Some(site) => format!("Delete user {user} from site {site}?"),
            None => format!("Delete user {user} from every site?"),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // Open the vault (requires password).
    let password = prompt_password("Master password")?;
    let (mut store, session) = open_vault(&path, password.as_bytes())?;

    let removed = match &site {
        Some(site) => store.remove(site, &user).map(|_| 1)?,
        None => store.delete_user(&user)?,
    };
    save_vault(&path, &store, &session)?;

    let noun = if removed == 1 { "entry" } else { "entries" };
    output::success(&format!("Deleted {user} ({removed} {noun})"));

    Ok(())
}
