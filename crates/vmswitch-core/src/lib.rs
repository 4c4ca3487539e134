//! Client-side state synchronization for the VFIO VM switcher daemon.
//!
//! This crate sits between `vmswitch-api` and front-ends (CLI, panel
//! indicators, web views):
//!
//! - **[`PollingReconciler`]**: Polls the domain list on a fixed cadence,
//!   suppresses unchanged results, retries failed polls after a fixed delay,
//!   and hands each new snapshot to a render callback. Explicit
//!   `Idle → Polling ⇄ Fetching → Stopped` state machine driven by a
//!   cancellable timer.
//!
//! - **[`CommandDispatcher`]**: Fire-and-forget state changes ("switch to
//!   domain", "power off host"). Outcomes arrive as [`Notification`]s; errors
//!   are never propagated or retried.
//!
//! - **[`snapshots_equal`]**: Order-insensitive structural comparison used
//!   to decide whether a poll warrants a re-render.
//!
//! - **[`DomainApi`]**: The seam between this crate and the HTTP client.
//!   Implemented for [`DomainClient`]; tests substitute scripted fakes.

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod reconciler;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::DomainApi;
pub use config::{ClientConfig, PollTiming};
pub use dispatcher::{Command, CommandDispatcher, Notification, NotificationLevel};
pub use error::CoreError;
pub use reconciler::{PollingReconciler, ReconcilerState, Snapshot};
pub use snapshot::{snapshot_changed, snapshots_equal};

// Re-export wire types so consumers only need this crate.
pub use vmswitch_api::{DomainClient, DomainState, DomainSummary, Error as ApiError};
