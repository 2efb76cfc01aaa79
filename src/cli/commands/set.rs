//! `pwvault set` — add or update the password for a site/user.

use std::io::{self, IsTerminal, Read};

use dialoguer::Confirm;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, normalize_site, normalize_user, prompt_password, vault_path, Cli};
use crate::errors::{PwVaultError, Result};
use crate::vault::{open_vault, save_vault};

/// Execute the `set` command.
pub fn execute(cli: &Cli, site: &str, user: &str, note: Option<&str>, force: bool) -> Result<()> {
    let site = normalize_site(site)?;
    let user = normalize_user(user)?;

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    let interactive = io::stdin().is_terminal();

    // Determine the password from one of two sources.
    let secret = if interactive {
        // Source 1: Interactive secure prompt, entered twice.
        let pw = dialoguer::Password::new()
            .with_prompt(format!("Password for {user}@{site}"))
            .with_confirmation("Re-enter password", "Passwords don't match, try again")
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;
        Zeroizing::new(pw)
    } else {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    };

    let note = match note {
        Some(n) => n.to_string(),
        None if interactive => dialoguer::Input::<String>::new()
            .with_prompt("Note")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PwVaultError::CommandFailed(format!("note prompt: {e}")))?,
        None => String::new(),
    };

    // Open the vault, set the credential, and save.
    let master = prompt_password("Master password")?;
    let (mut store, session) = open_vault(&path, master.as_bytes())?;

    let existed = store.contains(&site, &user);
    if existed && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("{user} already exists for {site}. Update?"))
            .default(false)
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    store.set(&site, &user, &secret, &note);
    save_vault(&path, &store, &session)?;

    if existed {
        output::success(&format!("Updated {user} on {site}"));
    } else {
        output::success(&format!(
            "Added {user} on {site} ({} total)",
            store.len()
        ));
    }

    Ok(())
}
