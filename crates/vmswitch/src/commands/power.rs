//! `poweroff` handler.

use std::sync::Arc;

use tokio::sync::mpsc;
use vmswitch_core::{CommandDispatcher, DomainClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(client: Arc<DomainClient>, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(
        "Power off the host? Running domains will be shut down.",
        "poweroff",
        global.yes,
    )? {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = CommandDispatcher::new(client, tx);
    util::await_outcome(dispatcher.host_poweroff(), &mut rx, global.quiet).await
}
