//! Command dispatch: bridges CLI args -> catalog operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod reviews;
pub mod status;
pub mod util;
pub mod wishlist;

use phonedeck_core::Catalog;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
///
/// Handlers connect on their own so that argument validation can fail
/// before any network traffic.
pub async fn dispatch(cmd: Command, catalog: &Catalog, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(catalog, args, global).await,
        Command::Wishlist(args) => wishlist::handle(catalog, args, global).await,
        Command::Reviews(args) => reviews::handle(catalog, args, global).await,
        Command::Status => status::handle(catalog, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
