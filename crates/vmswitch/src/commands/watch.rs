//! `watch` handler: live domain view driven by the polling reconciler.
//!
//! Each changed snapshot is printed once. Unchanged polls print nothing,
//! and failed polls are only logged; the last good view stays on screen.

use std::sync::Arc;

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use vmswitch_core::{DomainClient, DomainSummary, PollTiming, PollingReconciler};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::domains::DomainRow;

pub async fn handle(
    client: Arc<DomainClient>,
    timing: PollTiming,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output;
    let color = output::should_color(global.color);
    let quiet = global.quiet;

    let reconciler = PollingReconciler::new(client, timing);
    reconciler.start(move |snapshot| {
        match render_snapshot(&snapshot, format, color, Local::now()) {
            Ok(out) => output::print_output(&out, quiet),
            Err(e) => tracing::warn!(error = %e, "failed to render snapshot"),
        }
    })?;

    if !quiet {
        eprintln!("Watching domains, press Ctrl-C to stop");
    }
    let signal = tokio::signal::ctrl_c().await;
    reconciler.stop();
    signal?;
    Ok(())
}

/// Render one snapshot. Tables get a timestamp header; structured formats
/// emit one document per snapshot.
fn render_snapshot(
    domains: &[DomainSummary],
    format: OutputFormat,
    color: bool,
    at: DateTime<Local>,
) -> Result<String, CliError> {
    let body = output::render_list(
        format,
        domains,
        |d| DomainRow::new(d, color),
        |d| d.name.clone(),
    )?;

    if format != OutputFormat::Table {
        return Ok(body);
    }

    let stamp = format!("Updated {}", at.format("%H:%M:%S"));
    let header = if color {
        stamp.dimmed().to_string()
    } else {
        stamp
    };
    Ok(format!("{header}\n{body}"))
}
