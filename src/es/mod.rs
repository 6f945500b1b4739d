//! Elasticsearch Service configuration API.
//!
//! A signed REST client for the three calls reconciliation needs, plus the
//! wire types they exchange.

mod api;
mod client;
mod types;

pub use api::DomainApi;
#[cfg(test)]
pub use api::MockDomainApi;
pub use client::EsClient;
pub use types::{
    ClusterConfig, CognitoOptions, ColdStorageOptions, CreateDomainRequest, DomainDescription,
    DomainStatus, EbsOptions, EncryptionAtRestOptions, SnapshotOptions, UpdateDomainConfigRequest,
    VpcDerivedInfo, VpcOptions, ZoneAwarenessConfig,
};
