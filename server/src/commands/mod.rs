use std::path::PathBuf;

use clap::Subcommand;

use crate::Result;

pub(crate) mod hash_password;
pub(crate) mod transfer;

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the web server
    Serve,
    /// Print the ADMIN_PASSWORD_HASH value for a username and password
    HashPassword { username: String, password: String },
    /// Write the whole catalog to a JSON file
    Export { path: PathBuf },
    /// Replace the whole catalog with a JSON export
    Import { path: PathBuf },
    /// Wipe the catalog and load the starter recipes
    Reset,
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve
    }
}

impl Command {
    pub(crate) async fn run(&self) -> Result<()> {
        match &self {
            Command::Serve => crate::http_server::cmd::serve().await,
            Command::HashPassword { username, password } => {
                hash_password::print_hash(username, password)
            }
            Command::Export { path } => transfer::export_to_file(path).await,
            Command::Import { path } => transfer::import_from_file(path).await,
            Command::Reset => transfer::reset().await,
        }
    }
}
