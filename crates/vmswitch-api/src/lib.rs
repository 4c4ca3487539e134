// vmswitch-api: Async Rust client for the VFIO VM switcher domain API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DomainClient;
pub use error::Error;
pub use models::{DomainState, DomainSummary, StateChange};
pub use transport::TransportConfig;
