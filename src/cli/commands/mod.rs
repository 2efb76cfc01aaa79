//! One module per subcommand; each exposes an `execute` function.

pub mod delete;
pub mod get;
pub mod init;
pub mod list;
pub mod passwd;
pub mod set;
pub mod sites;
