//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vmswitch_core::{Notification, NotificationLevel};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Wait for a dispatched command and turn its notification into a result.
///
/// Info notifications go to stderr (unless quiet); error notifications
/// become `CliError::CommandFailed`.
pub async fn await_outcome(
    handle: JoinHandle<()>,
    notifications: &mut mpsc::UnboundedReceiver<Notification>,
    quiet: bool,
) -> Result<(), CliError> {
    handle.await.map_err(|e| CliError::Internal {
        message: format!("command task failed: {e}"),
    })?;

    let Some(notification) = notifications.recv().await else {
        return Err(CliError::Internal {
            message: "command finished without reporting an outcome".into(),
        });
    };

    match notification.level {
        NotificationLevel::Info => {
            if !quiet {
                eprintln!("{}", notification.message);
            }
            Ok(())
        }
        NotificationLevel::Error => Err(CliError::CommandFailed {
            message: notification.message,
        }),
    }
}
