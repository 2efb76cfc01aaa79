//! `pwvault list` — display every stored credential in a table.

use crate::cli::output;
use crate::cli::{load_settings, prompt_password, vault_path, Cli};
use crate::errors::Result;
use crate::vault::open_vault;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    let password = prompt_password("Master password")?;
    let (store, _session) = open_vault(&path, password.as_bytes())?;

    output::info(&format!(
        "{} password(s) across {} site(s)",
        store.len(),
        store.list_sites().len()
    ));

    output::print_credentials_table(&store);

    Ok(())
}
