// Wire types for the domain API.
//
// Field names match the daemon's JSON exactly, so no renames are needed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Power/running state of a domain as reported by the daemon.
///
/// The daemon derives these names from libvirt's `virDomainState`. Any
/// name this client does not know about is kept verbatim in `Other`, so
/// a newer daemon never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainState {
    NoState,
    Running,
    Blocked,
    Paused,
    Shutdown,
    Shutoff,
    Crashed,
    PmSuspended,
    Other(String),
}

impl DomainState {
    /// The wire name, e.g. `"RUNNING"`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoState => "NOSTATE",
            Self::Running => "RUNNING",
            Self::Blocked => "BLOCKED",
            Self::Paused => "PAUSED",
            Self::Shutdown => "SHUTDOWN",
            Self::Shutoff => "SHUTOFF",
            Self::Crashed => "CRASHED",
            Self::PmSuspended => "PMSUSPENDED",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<&str> for DomainState {
    fn from(raw: &str) -> Self {
        match raw {
            "NOSTATE" => Self::NoState,
            "RUNNING" => Self::Running,
            "BLOCKED" => Self::Blocked,
            "PAUSED" => Self::Paused,
            "SHUTDOWN" => Self::Shutdown,
            "SHUTOFF" => Self::Shutoff,
            "CRASHED" => Self::Crashed,
            "PMSUSPENDED" => Self::PmSuspended,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for DomainState {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<DomainState> for String {
    fn from(state: DomainState) -> Self {
        match state {
            DomainState::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DomainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One virtual machine known to the host.
///
/// `GET /api/domain` returns these sorted by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DomainSummary {
    /// Server-assigned id. libvirt reports `-1` for inactive domains.
    pub id: i64,
    pub uuid: String,
    /// Machine-readable identifier used in API paths.
    pub name: String,
    /// Human-readable label; `null` on the wire decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub state: DomainState,
    #[serde(default)]
    pub autostart: bool,
}

impl DomainSummary {
    /// Label for display: the title, or the name when no title is set.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// Body of `PATCH /api/domain/{name}` and `PATCH /api/host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub state: DomainState,
}

impl StateChange {
    pub fn new(state: impl Into<DomainState>) -> Self {
        Self {
            state: state.into(),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_daemon_domain() {
        let raw = json!({
            "id": -1,
            "uuid": "4dea22b3-1d52-d8f3-2516-782e98ab3fa0",
            "autostart": false,
            "state": "SHUTOFF",
            "name": "win10",
            "title": "Windows 10"
        });
        let domain: DomainSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(domain.id, -1);
        assert_eq!(domain.state, DomainState::Shutoff);
        assert_eq!(domain.display_title(), "Windows 10");
    }

    #[test]
    fn null_title_falls_back_to_name() {
        let raw = json!({
            "id": 3,
            "uuid": "u",
            "state": "RUNNING",
            "name": "fedora",
            "title": null
        });
        let domain: DomainSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(domain.title, "");
        assert!(!domain.autostart);
        assert_eq!(domain.display_title(), "fedora");
    }

    #[test]
    fn unknown_state_is_preserved() {
        let state: DomainState = serde_json::from_value(json!("MIGRATING")).unwrap();
        assert_eq!(state, DomainState::Other("MIGRATING".into()));
        assert_eq!(serde_json::to_value(&state).unwrap(), json!("MIGRATING"));
    }

    #[test]
    fn state_change_serializes_wire_name() {
        let body = serde_json::to_value(StateChange::new(DomainState::Running)).unwrap();
        assert_eq!(body, json!({ "state": "RUNNING" }));
    }
}
