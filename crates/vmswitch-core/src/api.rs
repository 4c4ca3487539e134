// ── Domain API seam ──
//
// The reconciler and dispatcher talk to the daemon through this trait
// rather than `DomainClient` directly, so each instance owns its client
// explicitly and tests can swap in scripted implementations.

use std::future::Future;

use vmswitch_api::{DomainClient, DomainState, DomainSummary, Error};

/// The three remote operations the core depends on.
///
/// Implementations must not retry or cache; retry policy lives in
/// [`PollingReconciler`](crate::PollingReconciler).
pub trait DomainApi: Send + Sync + 'static {
    /// `GET /api/domain`
    fn list_domains(&self) -> impl Future<Output = Result<Vec<DomainSummary>, Error>> + Send;

    /// `PATCH /api/domain/{name}`
    fn set_domain_state(
        &self,
        name: &str,
        state: DomainState,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// `PATCH /api/host`
    fn set_host_state(&self, state: DomainState) -> impl Future<Output = Result<(), Error>> + Send;
}

impl DomainApi for DomainClient {
    fn list_domains(&self) -> impl Future<Output = Result<Vec<DomainSummary>, Error>> + Send {
        DomainClient::list_domains(self)
    }

    fn set_domain_state(
        &self,
        name: &str,
        state: DomainState,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        DomainClient::set_domain_state(self, name, state)
    }

    fn set_host_state(&self, state: DomainState) -> impl Future<Output = Result<(), Error>> + Send {
        DomainClient::set_host_state(self, state)
    }
}
