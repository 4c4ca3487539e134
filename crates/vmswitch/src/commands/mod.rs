//! Command dispatch: bridges CLI args -> core client/reconciler -> output.

pub mod config_cmd;
pub mod domains;
pub mod power;
pub mod switch;
pub mod util;
pub mod watch;

use std::sync::Arc;

use vmswitch_core::ClientConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a daemon-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client_config: &ClientConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::new(client_config.build_client()?);

    match cmd {
        Command::Domains(args) => domains::handle(&client, args, global).await,
        Command::Switch { domain } => switch::handle(client, &domain, global).await,
        Command::Poweroff => power::handle(client, global).await,
        Command::Watch => watch::handle(client, client_config.timing, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
