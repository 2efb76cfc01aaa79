//! `pwvault sites` — list the sites that have stored passwords.

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, vault_path, Cli};
use crate::errors::Result;
use crate::vault::open_vault;

/// Execute the `sites` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    let password = prompt_password("Master password")?;
    let (store, _session) = open_vault(&path, password.as_bytes())?;

    output::print_sites(&store);

    Ok(())
}
