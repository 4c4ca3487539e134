//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_API_URL, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-like text for the table view.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval_ms = {}", cfg.defaults.poll_interval_ms);
    let _ = writeln!(out, "retry_delay_ms = {}", cfg.defaults.retry_delay_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ms) = p.poll_interval_ms {
            let _ = writeln!(out, "poll_interval_ms = {ms}");
        }
        if let Some(ms) = p.retry_delay_ms {
            let _ = writeln!(out, "retry_delay_ms = {ms}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("vmswitch configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &Config::default()))
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Daemon URL
            let api_url: String = Input::new()
                .with_prompt("Switcher daemon URL")
                .default(
                    global
                        .api_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_API_URL.into()),
                )
                .interact_text()
                .map_err(prompt_err)?;
            vmswitch_config::parse_api_url(&api_url)?;

            // 3. Merge into any existing config
            let mut cfg = config::load_config_or_default();
            if cfg.profiles.contains_key(&profile_name)
                && !util::confirm(
                    &format!("Profile '{profile_name}' exists. Overwrite?"),
                    "overwrite profile",
                    global.yes,
                )?
            {
                return Ok(());
            }

            let profile = Profile {
                timeout: global.timeout,
                poll_interval_ms: global.poll_interval,
                retry_delay_ms: global.retry_delay,
                ..Profile::new(api_url)
            };
            // Catch bad overrides before they're persisted.
            config::profile_to_client_config(&profile, &cfg.defaults)?;

            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            // 4. Write config
            let written = config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: vmswitch domains list");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_profiles_sorted() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("zeta".into(), Profile::new("http://10.0.0.9:8000"));
        let mut alpha = Profile::new(DEFAULT_API_URL);
        alpha.poll_interval_ms = Some(500);
        cfg.profiles.insert("alpha".into(), alpha);

        let out = format_config(&cfg);
        let alpha_at = out.find("[profiles.alpha]").unwrap_or(usize::MAX);
        let zeta_at = out.find("[profiles.zeta]").unwrap_or(0);
        assert!(alpha_at < zeta_at, "profiles out of order:\n{out}");
        assert!(out.contains("poll_interval_ms = 500"));
        assert!(out.starts_with("default_profile = \"default\""));
    }
}
