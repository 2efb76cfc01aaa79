//! `pwvault get` — print the password and note for a site/user.

use crate::cli::output;
use crate::cli::{load_settings, normalize_site, normalize_user, prompt_password, vault_path, Cli};
use crate::errors::Result;
use crate::vault::open_vault;

/// Execute the `get` command.
pub fn execute(cli: &Cli, site: &str, user: &str) -> Result<()> {
    let site = normalize_site(site)?;
    let user = normalize_user(user)?;

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // Open the vault (requires password).
    let password = prompt_password("Master password")?;
    let (store, _session) = open_vault(&path, password.as_bytes())?;

    output::print_credential(store.get(&site, &user)?);

    Ok(())
}
