//! Command dispatch: bridges CLI args -> directory operations -> output formatting.

pub mod categories;
pub mod config_cmd;
pub mod sites;
pub mod util;

use sitenav_core::Directory;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    directory: &Directory,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Categories(args) => categories::handle(directory, args, global).await,
        Command::Sites(args) => sites::handle(directory, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
