// ── Command dispatcher ──
//
// Fire-and-forget write path. Each command runs as its own task, sends
// exactly one request, and reports its outcome as a single notification.
// Errors never propagate back to the caller and are never retried; the
// next reconciler poll reflects whatever the daemon actually did.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vmswitch_api::{DomainState, DomainSummary};

use crate::api::DomainApi;
use crate::error::CoreError;

// ── Notifications ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// User-facing outcome of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: msg.into(),
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────

/// A state change the dispatcher can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start domain `name`. `label` is what the user sees (usually its title).
    SwitchTo { name: String, label: String },
    /// Power off the hypervisor host.
    HostPoweroff,
}

impl Command {
    fn success_message(&self) -> String {
        match self {
            Self::SwitchTo { label, .. } => format!("Switching to {label}"),
            Self::HostPoweroff => "Shutting off host".into(),
        }
    }

    fn failure_message(&self, err: &CoreError) -> String {
        match self {
            Self::SwitchTo { label, .. } => format!("Could not switch to {label}: {err}"),
            Self::HostPoweroff => format!("Could not shut off host: {err}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchTo { name, .. } => write!(f, "switch to {name}"),
            Self::HostPoweroff => f.write_str("host poweroff"),
        }
    }
}

// ── CommandDispatcher ────────────────────────────────────────────

/// Issues state-change commands against the daemon.
///
/// Commands are independent of the [`PollingReconciler`](crate::PollingReconciler)
/// and may run concurrently with a poll. Concurrent commands are not
/// de-duplicated.
pub struct CommandDispatcher<A: DomainApi> {
    api: Arc<A>,
    notify_tx: mpsc::UnboundedSender<Notification>,
}

impl<A: DomainApi> Clone for CommandDispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            notify_tx: self.notify_tx.clone(),
        }
    }
}

impl<A: DomainApi> CommandDispatcher<A> {
    pub fn new(api: Arc<A>, notify_tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { api, notify_tx }
    }

    /// Ask the daemon to start domain `name`.
    pub fn switch_to(&self, name: &str) -> JoinHandle<()> {
        self.execute(Command::SwitchTo {
            name: name.to_owned(),
            label: name.to_owned(),
        })
    }

    /// Like [`switch_to`](Self::switch_to), but notifications use the
    /// domain's title.
    pub fn switch_to_domain(&self, domain: &DomainSummary) -> JoinHandle<()> {
        self.execute(Command::SwitchTo {
            name: domain.name.clone(),
            label: domain.display_title().to_owned(),
        })
    }

    /// Ask the daemon to power off the host.
    pub fn host_poweroff(&self) -> JoinHandle<()> {
        self.execute(Command::HostPoweroff)
    }

    /// Spawn `cmd` and return immediately. The handle may be awaited or
    /// dropped; dropping it does not cancel the request.
    pub fn execute(&self, cmd: Command) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let tx = self.notify_tx.clone();

        tokio::spawn(async move {
            let result = match &cmd {
                Command::SwitchTo { name, .. } => {
                    api.set_domain_state(name, DomainState::Running).await
                }
                Command::HostPoweroff => api.set_host_state(DomainState::Shutoff).await,
            };

            let notification = match result {
                Ok(()) => {
                    info!(command = %cmd, "command accepted");
                    Notification::info(cmd.success_message())
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    warn!(command = %cmd, error = %err, "command failed");
                    Notification::error(cmd.failure_message(&err))
                }
            };
            if let Err(unsent) = tx.send(notification) {
                debug!(
                    command = %cmd,
                    message = %unsent.0.message,
                    "notification receiver gone, dropping notification"
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_label() {
        let cmd = Command::SwitchTo {
            name: "win10".into(),
            label: "Windows 10".into(),
        };
        assert_eq!(cmd.success_message(), "Switching to Windows 10");
        assert_eq!(cmd.to_string(), "switch to win10");

        let err = CoreError::Timeout;
        assert_eq!(
            cmd.failure_message(&err),
            "Could not switch to Windows 10: Request to switcher daemon timed out"
        );
    }

    #[test]
    fn host_poweroff_messages() {
        assert_eq!(Command::HostPoweroff.success_message(), "Shutting off host");
        assert_eq!(Command::HostPoweroff.to_string(), "host poweroff");
    }
}
