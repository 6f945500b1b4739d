//! Domain API trait definition.
//!
//! This is the seam between the reconciler and the provider: the three
//! configuration API calls the reconciler needs, nothing more.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{CreateDomainRequest, DomainDescription, UpdateDomainConfigRequest};

/// The subset of the Elasticsearch Service configuration API used here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainApi: Send + Sync {
    /// Describes a domain by name.
    ///
    /// A missing domain surfaces as a provider error whose code is
    /// `ResourceNotFoundException`.
    async fn describe_domain(&self, name: &str) -> Result<DomainDescription>;

    /// Creates a domain. The response is opaque pass-through data.
    async fn create_domain(&self, request: &CreateDomainRequest) -> Result<serde_json::Value>;

    /// Updates a domain's configuration. The response is opaque pass-through data.
    async fn update_domain_config(
        &self,
        request: &UpdateDomainConfigRequest,
    ) -> Result<serde_json::Value>;
}
