//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PwVaultError, Result};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

/// Environment variable consulted before prompting for a replacement
/// master password (`passwd`).
pub const NEW_PASSWORD_ENV: &str = "PWVAULT_NEW_PASSWORD";

/// pwvault CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "pwvault", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_file` from .pwvault.toml, or pw.vault)
    #[arg(long, env = "PWVAULT_FILE", global = true)]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Show the password and note for a site/user
    Get {
        /// Site name (e.g. example.com)
        site: String,
        /// User name on that site
        user: String,
    },

    /// Set the password for a site/user (add or update)
    Set {
        /// Site name (e.g. example.com)
        site: String,
        /// User name on that site
        user: String,
        /// Note stored alongside the password (omit for interactive prompt)
        #[arg(short, long)]
        note: Option<String>,
        /// Overwrite an existing entry without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a user from every site, or from one site with --site
    Delete {
        /// User name to delete
        user: String,
        /// Only delete the user from this site
        #[arg(short, long)]
        site: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List site names
    Sites,

    /// List every site, user, password and note
    List,

    /// Change the master password
    Passwd,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `PWVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` is checked first for scripted use.  Enforces a minimum
/// password length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.chars().count() < MIN_PASSWORD_LEN {
            return Err(PwVaultError::CommandFailed(format!(
                "master password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Load settings from the working directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the vault file: `--vault` wins, then the settings file.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault {
        Some(path) => cwd.join(path),
        None => settings.vault_path(&cwd),
    })
}

/// Canonical form of a site name: trimmed and lowercased.
pub fn normalize_site(site: &str) -> Result<String> {
    let site = site.trim().to_lowercase();
    if site.is_empty() {
        return Err(PwVaultError::CommandFailed(
            "site name cannot be empty".into(),
        ));
    }
    Ok(site)
}

/// Canonical form of a user name: trimmed, case preserved.
pub fn normalize_user(user: &str) -> Result<String> {
    let user = user.trim();
    if user.is_empty() {
        return Err(PwVaultError::CommandFailed(
            "user name cannot be empty".into(),
        ));
    }
    Ok(user.to_string())
}
