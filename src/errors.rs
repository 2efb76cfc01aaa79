use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in pwvault.
#[derive(Debug, Error)]
pub enum PwVaultError {
    // --- Crypto errors ---
    #[error("Invalid key descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Incorrect password or corrupted file")]
    WrongPasswordOrCorruptFile,

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Malformed vault file: {0}")]
    MalformedFile(String),

    #[error("Malformed vault payload: {0}")]
    MalformedPayload(String),

    #[error("{0} not found")]
    NotFound(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Incorrect master password")]
    IncorrectPassword,
}

/// Convenience type alias for pwvault results.
pub type Result<T> = std::result::Result<T, PwVaultError>;
