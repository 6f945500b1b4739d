//! Elasticsearch Service configuration API types.
//!
//! Field names follow the 2015-01-01 configuration API exactly, so the same
//! structs serve as request bodies and as the typed view of a describe
//! response. Unknown response fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Cluster topology (`ElasticsearchClusterConfig`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterConfig {
    /// Data node instance type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    /// Number of data nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u32>,
    /// Whether dedicated master nodes are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_master_enabled: Option<bool>,
    /// Whether zone awareness is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_awareness_enabled: Option<bool>,
    /// Zone awareness settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_awareness_config: Option<ZoneAwarenessConfig>,
    /// Dedicated master instance type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_master_type: Option<String>,
    /// Number of dedicated master nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_master_count: Option<u32>,
    /// Whether UltraWarm storage is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_enabled: Option<bool>,
    /// Warm node instance type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_type: Option<String>,
    /// Number of warm nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_count: Option<u32>,
    /// Cold storage settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cold_storage_options: Option<ColdStorageOptions>,
}

/// Zone awareness settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneAwarenessConfig {
    /// Number of availability zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone_count: Option<u32>,
}

/// Cold storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ColdStorageOptions {
    /// Whether cold storage is enabled.
    pub enabled: bool,
}

/// EBS storage settings (`EBSOptions`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EbsOptions {
    /// Whether EBS storage is enabled.
    #[serde(rename = "EBSEnabled", default, skip_serializing_if = "Option::is_none")]
    pub ebs_enabled: Option<bool>,
    /// Volume type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    /// Volume size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_size: Option<u32>,
    /// Provisioned IOPS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
}

/// VPC endpoint settings as sent to the API (`VPCOptions`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VpcOptions {
    /// Subnet ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<String>,
    /// Security group ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
}

/// VPC endpoint settings as reported by the API (`VPCDerivedInfo`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VpcDerivedInfo {
    /// VPC id.
    #[serde(rename = "VPCId", default)]
    pub vpc_id: Option<String>,
    /// Subnet ids.
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    /// Availability zones of the subnets.
    #[serde(default)]
    pub availability_zones: Vec<String>,
    /// Security group ids.
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// Cognito authentication settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoOptions {
    /// Whether Cognito authentication is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// User pool id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_pool_id: Option<String>,
    /// Identity pool id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_pool_id: Option<String>,
    /// Role that lets the service configure Cognito.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
}

/// Automated snapshot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotOptions {
    /// Hour (UTC) of the daily automated snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automated_snapshot_start_hour: Option<u32>,
}

/// Encryption at rest settings. Immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionAtRestOptions {
    /// Whether encryption at rest is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// KMS key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

/// Body of `CreateElasticsearchDomain`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDomainRequest {
    /// Domain name.
    pub domain_name: String,
    /// Engine version, e.g. `7.10` or `OpenSearch_2.3`.
    pub elasticsearch_version: String,
    /// Cluster topology.
    pub elasticsearch_cluster_config: ClusterConfig,
    /// EBS settings.
    #[serde(rename = "EBSOptions")]
    pub ebs_options: EbsOptions,
    /// Snapshot settings.
    pub snapshot_options: SnapshotOptions,
    /// Access policy, serialized as a JSON string.
    pub access_policies: String,
    /// Cognito settings.
    pub cognito_options: CognitoOptions,
    /// VPC settings.
    #[serde(rename = "VPCOptions", skip_serializing_if = "Option::is_none")]
    pub vpc_options: Option<VpcOptions>,
    /// Encryption at rest settings.
    pub encryption_at_rest_options: EncryptionAtRestOptions,
}

/// Body of `UpdateElasticsearchDomainConfig`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateDomainConfigRequest {
    /// Domain name; travels in the request path.
    #[serde(skip)]
    pub domain_name: String,
    /// Cluster topology.
    pub elasticsearch_cluster_config: ClusterConfig,
    /// EBS settings.
    #[serde(rename = "EBSOptions")]
    pub ebs_options: EbsOptions,
    /// Snapshot settings.
    pub snapshot_options: SnapshotOptions,
    /// Access policy, serialized as a JSON string.
    pub access_policies: String,
    /// Cognito settings.
    pub cognito_options: CognitoOptions,
    /// VPC settings.
    #[serde(rename = "VPCOptions", skip_serializing_if = "Option::is_none")]
    pub vpc_options: Option<VpcOptions>,
}

/// Typed view of `DomainStatus` in a describe response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DomainStatus {
    /// Domain ARN.
    #[serde(rename = "ARN")]
    pub arn: String,
    /// Domain id (`account/name`).
    #[serde(default)]
    pub domain_id: String,
    /// Domain name.
    pub domain_name: String,
    /// Whether the domain has been created.
    #[serde(default)]
    pub created: bool,
    /// Whether the domain is being deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Whether a configuration change is in progress.
    #[serde(default)]
    pub processing: bool,
    /// Public endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Engine version.
    #[serde(default)]
    pub elasticsearch_version: Option<String>,
    /// Cluster topology.
    #[serde(default)]
    pub elasticsearch_cluster_config: Option<ClusterConfig>,
    /// EBS settings.
    #[serde(rename = "EBSOptions", default)]
    pub ebs_options: Option<EbsOptions>,
    /// Access policy, as a JSON string.
    #[serde(default)]
    pub access_policies: Option<String>,
    /// Snapshot settings.
    #[serde(default)]
    pub snapshot_options: Option<SnapshotOptions>,
    /// VPC settings; absent for public domains.
    #[serde(rename = "VPCOptions", default)]
    pub vpc_options: Option<VpcDerivedInfo>,
    /// Cognito settings.
    #[serde(default)]
    pub cognito_options: Option<CognitoOptions>,
    /// Encryption at rest settings.
    #[serde(default)]
    pub encryption_at_rest_options: Option<EncryptionAtRestOptions>,
}

/// A describe response: the typed status plus the raw document.
///
/// The raw document is what gets reported back; the typed status is only
/// used for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainDescription {
    /// Typed view of `DomainStatus`.
    pub status: DomainStatus,
    /// The full describe response, untouched.
    pub raw: serde_json::Value,
}

impl DomainDescription {
    /// Builds a description from a raw describe response.
    ///
    /// # Errors
    ///
    /// Returns an error if the response has no usable `DomainStatus`.
    pub fn from_response(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let status = DomainStatus::deserialize(
            raw.get("DomainStatus").unwrap_or(&serde_json::Value::Null),
        )?;
        Ok(Self { status, raw })
    }
}
