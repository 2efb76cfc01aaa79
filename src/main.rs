use clap::Parser;
use pwvault::cli::{Cli, Commands};
use pwvault::errors::PwVaultError;

fn main() {
    pwvault::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => pwvault::cli::commands::init::execute(&cli),
        Commands::Get { ref site, ref user } => {
            pwvault::cli::commands::get::execute(&cli, site, user)
        }
        Commands::Set {
            ref site,
            ref user,
            ref note,
            force,
        } => pwvault::cli::commands::set::execute(&cli, site, user, note.as_deref(), force),
        Commands::Delete {
            ref user,
            ref site,
            force,
        } => pwvault::cli::commands::delete::execute(&cli, user, site.as_deref(), force),
        Commands::Sites => pwvault::cli::commands::sites::execute(&cli),
        Commands::List => pwvault::cli::commands::list::execute(&cli),
        Commands::Passwd => pwvault::cli::commands::passwd::execute(&cli),
    };

    if let Err(e) = result {
        pwvault::cli::output::error(&e.to_string());
        if matches!(e, PwVaultError::FileNotFound(_)) {
            pwvault::cli::output::tip("Run `pwvault init` to create a vault.");
        }
        std::process::exit(1);
    }
}
