//! Project configuration (`.pwvault.toml`).

pub mod settings;

pub use settings::Settings;
