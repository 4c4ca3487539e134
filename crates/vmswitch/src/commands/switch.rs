//! `switch` handler: start a domain through the command dispatcher.

use std::sync::Arc;

use tokio::sync::mpsc;
use vmswitch_core::{CommandDispatcher, DomainClient};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::{domains, util};

pub async fn handle(
    client: Arc<DomainClient>,
    domain: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Resolve first so an unknown name fails with a not-found exit code
    // and notifications can use the domain's title.
    let summary = client
        .get_domain(domain)
        .await
        .map_err(|e| domains::not_found_as(e, domain))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = CommandDispatcher::new(client, tx);

    tracing::debug!(domain = %summary.name, state = %summary.state, "dispatching switch");
    let handle = dispatcher.switch_to_domain(&summary);
    util::await_outcome(handle, &mut rx, global.quiet).await
}
