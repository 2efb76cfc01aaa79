//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Credential, VaultStore};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print one credential as `Pass:` / `Note:` lines.
pub fn print_credential(cred: &Credential) {
    println!("Pass: {}", cred.password);
    println!("Note: {}", cred.note);
}

/// Print site names, one per line.
pub fn print_sites(store: &VaultStore) {
    let sites = store.list_sites();
    if sites.is_empty() {
        info("No sites found.");
        return;
    }
    for site in sites {
        println!("{site}");
    }
}

/// Print every credential as a table (Site, User, Password, Note).
pub fn print_credentials_table(store: &VaultStore) {
    if store.is_empty() {
        info("No passwords found.");
        tip("Run `pwvault set <SITE> <USER>` to add your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Site", "User", "Password", "Note"]);

    for (site, user, cred) in store.list_all() {
        table.add_row(vec![site, user, cred.password.as_str(), cred.note.as_str()]);
    }

    println!("{table}");
}
