//! CLI configuration: a thin wrapper around `vmswitch_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --timeout, etc.).

use vmswitch_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vmswitch_config::{
    Config, DEFAULT_API_URL, Profile, config_path, load_config_or_default,
    profile_to_client_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Pick the profile to use and layer CLI flag overrides on top of it.
///
/// An explicitly requested profile must exist. Otherwise a missing profile
/// falls back to the daemon's usual address on the libvirt bridge.
pub fn effective_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None => {
            tracing::debug!(profile = %name, "no profile configured, using default daemon URL");
            Profile::new(DEFAULT_API_URL)
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.poll_interval.is_some() {
        profile.poll_interval_ms = global.poll_interval;
    }
    if global.retry_delay.is_some() {
        profile.retry_delay_ms = global.retry_delay;
    }
    Ok(profile)
}

/// Build the runtime `ClientConfig` from config file, profile, and flags.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let config = load_config_or_default();
    let profile = effective_profile(global, &config)?;
    Ok(profile_to_client_config(&profile, &config.defaults)?)
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
