//! Domain command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;
use vmswitch_core::{DomainClient, DomainSummary};

use crate::cli::{DomainsArgs, DomainsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DomainRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Autostart")]
    autostart: String,
}

impl DomainRow {
    /// Build a row, highlighting running domains when `color` is set.
    pub(crate) fn new(d: &DomainSummary, color: bool) -> Self {
        let state = if color && d.state.is_running() {
            d.state.green().bold().to_string()
        } else {
            d.state.to_string()
        };

        Self {
            name: d.name.clone(),
            title: d.display_title().to_owned(),
            state,
            // libvirt reports -1 for domains that aren't running.
            id: if d.id < 0 {
                "-".into()
            } else {
                d.id.to_string()
            },
            autostart: if d.autostart { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(d: &DomainSummary) -> String {
    [
        format!("Name:      {}", d.name),
        format!("Title:     {}", d.display_title()),
        format!("State:     {}", d.state),
        format!("ID:        {}", d.id),
        format!("UUID:      {}", d.uuid),
        format!("Autostart: {}", d.autostart),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DomainClient,
    args: DomainsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        DomainsCommand::List => {
            let domains = client.list_domains().await?;
            let out = output::render_list(
                global.output,
                &domains,
                |d| DomainRow::new(d, color),
                |d| d.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Get { domain } => {
            let summary = client.get_domain(&domain).await.map_err(|e| not_found_as(e, &domain))?;
            let out = output::render_single(global.output, &summary, detail, |d| d.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Xml { domain } => {
            let xml = client.domain_xml(&domain).await.map_err(|e| not_found_as(e, &domain))?;
            let out = output::render_single(global.output, &xml, Clone::clone, Clone::clone)?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}

/// The daemon's 404 body is generic; report the name that was asked for.
pub(crate) fn not_found_as(err: vmswitch_core::ApiError, name: &str) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: "domain".into(),
            identifier: name.into(),
            list_command: "domains list".into(),
        }
    } else {
        err.into()
    }
}
