// Async HTTP client for the domain API.
//
// Base path: /api/
// Auth: none (the daemon listens on a host-only address)

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{DomainState, DomainSummary, StateChange};
use crate::transport::TransportConfig;

// ── Error response shape from the daemon ─────────────────────────────

/// FastAPI-style error body: `{"detail": "..."}`, or a list of
/// validation failures under the same key.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the domain API.
///
/// Stateless apart from the pooled `reqwest::Client`: no caching and no
/// retries. Callers decide what to do with failures.
#[derive(Debug, Clone)]
pub struct DomainClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DomainClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL (e.g. `http://192.168.122.1:8000`)
    /// and transport settings.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { http, base_url })
    }

    /// The daemon base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `api/{segments...}` to the base URL.
    ///
    /// Segments are percent-encoded individually, so a domain name can
    /// never escape its path position.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    // ── Domain endpoints ─────────────────────────────────────────────

    /// List all domains known to the host, sorted by name.
    ///
    /// `GET /api/domain`
    pub async fn list_domains(&self) -> Result<Vec<DomainSummary>, Error> {
        self.get(&["domain"]).await
    }

    /// Fetch a single domain.
    ///
    /// `GET /api/domain/{name}`
    pub async fn get_domain(&self, name: &str) -> Result<DomainSummary, Error> {
        self.get(&["domain", name]).await
    }

    /// Fetch the raw libvirt XML description of a domain.
    ///
    /// `GET /api/domain/{name}/xml`
    pub async fn domain_xml(&self, name: &str) -> Result<String, Error> {
        let url = self.url(&["domain", name, "xml"])?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::protocol_error(resp).await);
        }
        Ok(resp.text().await?)
    }

    /// Request a state change for one domain.
    ///
    /// `PATCH /api/domain/{name}` with `{"state": ...}`. The daemon only
    /// accepts `RUNNING` here and answers 409 if the domain is already up.
    pub async fn set_domain_state(&self, name: &str, state: DomainState) -> Result<(), Error> {
        self.patch_no_response(&["domain", name], &StateChange::new(state))
            .await
    }

    // ── Host endpoints ───────────────────────────────────────────────

    /// Request a state change for the host itself.
    ///
    /// `PATCH /api/host` with `{"state": ...}`. The daemon only accepts
    /// `SHUTOFF`.
    pub async fn set_host_state(&self, state: DomainState) -> Result<(), Error> {
        self.patch_no_response(&["host"], &StateChange::new(state))
            .await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn patch_no_response<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        if !resp.status().is_success() {
            return Err(Self::protocol_error(resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            message: e.to_string(),
            body,
        })
    }

    /// Success statuses need no body; the daemon's `{"message": "OK"}` is
    /// ignored.
    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::protocol_error(resp).await)
        }
    }

    async fn protocol_error(resp: reqwest::Response) -> Error {
        let status = resp.status();
        let raw = resp.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        let message = match detail {
            Some(d) => d,
            None if raw.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned(),
            None => raw,
        };

        Error::Protocol {
            status: status.as_u16(),
            message,
        }
    }
}
