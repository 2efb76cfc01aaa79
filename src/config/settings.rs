use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{validate_cost, DEFAULT_COST};
use crate::errors::{PwVaultError, Result};

/// Configuration loaded from `.pwvault.toml`.
///
/// Every field has a sensible default so pwvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Vault file, relative to the directory the config lives in.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// bcrypt cost for newly generated key descriptors (default: 14).
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "pw.vault".to_string()
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_COST
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    const FILE_NAME: &'static str = ".pwvault.toml";

    /// Load settings from `<dir>/.pwvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed, or holds an unusable cost, an error is
    /// returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PwVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        validate_cost(settings.bcrypt_cost)
            .map_err(|e| PwVaultError::ConfigError(format!("{}: {e}", config_path.display())))?;

        Ok(settings)
    }

    /// Full path of the vault file relative to `dir`.
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
