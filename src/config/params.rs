//! Declaration types for a domain.
//!
//! `DomainParams` maps one-to-one to the `esdomain.yaml` file. It is the flat
//! parameter set; the nested provider shape is assembled from it by
//! [`crate::planner::DesiredDomain`].

use serde::{Deserialize, Deserializer, Serialize};

/// The flat, declarative description of a single domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DomainParams {
    /// Domain name, unique per account and region.
    pub name: String,
    /// AWS region; falls back to the AWS environment when absent.
    #[serde(default, alias = "aws_region", alias = "ec2_region")]
    pub region: Option<String>,
    /// Named profile from the AWS shared configuration.
    #[serde(default)]
    pub profile: Option<String>,
    /// Override for the configuration API endpoint.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Search engine flavour.
    #[serde(default)]
    pub engine_type: EngineType,
    /// Engine version to deploy.
    #[serde(default = "default_version")]
    pub elasticsearch_version: String,

    /// Data node instance type.
    pub instance_type: String,
    /// Number of data nodes.
    pub instance_count: u32,

    /// Whether dedicated master nodes are enabled.
    pub dedicated_master: bool,
    /// Instance type of the dedicated master nodes.
    #[serde(default)]
    pub dedicated_master_instance_type: Option<String>,
    /// Number of dedicated master nodes.
    #[serde(default)]
    pub dedicated_master_instance_count: Option<u32>,

    /// Whether zone awareness is enabled.
    pub zone_awareness: bool,
    /// Number of availability zones when zone awareness is enabled.
    #[serde(default)]
    pub availability_zone_count: Option<u32>,

    /// Whether UltraWarm storage is enabled.
    #[serde(default)]
    pub warm_enabled: bool,
    /// Instance type of the warm nodes.
    #[serde(default)]
    pub warm_type: Option<String>,
    /// Number of warm nodes.
    #[serde(default)]
    pub warm_count: Option<u32>,
    /// Whether cold storage is enabled.
    #[serde(default)]
    pub cold_storage_enabled: bool,

    /// Whether EBS-based storage is enabled.
    pub ebs: bool,
    /// EBS volume type (`standard`, `gp2`, `gp3`, `io1`).
    #[serde(default)]
    pub volume_type: Option<String>,
    /// EBS volume size in GiB.
    #[serde(default)]
    pub volume_size: Option<u32>,
    /// Provisioned IOPS.
    #[serde(default)]
    pub iops: Option<u32>,

    /// Subnets for the VPC endpoint.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub vpc_subnets: Vec<String>,
    /// Security groups for the VPC endpoint.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub vpc_security_groups: Vec<String>,

    /// Hour (UTC) of the daily automated snapshot.
    #[serde(default)]
    pub snapshot_hour: u32,

    /// IAM access policy, as a mapping or as a JSON string.
    pub access_policies: serde_json::Value,

    /// Whether data is encrypted at rest. Only honoured at creation.
    #[serde(default)]
    pub encryption_at_rest_enabled: bool,
    /// KMS key used when encryption at rest is enabled.
    #[serde(default)]
    pub encryption_at_rest_kms_key_id: Option<String>,

    /// Whether Cognito authentication is enabled for Dashboards/Kibana.
    #[serde(default)]
    pub cognito_enabled: bool,
    /// Cognito user pool id.
    #[serde(default)]
    pub cognito_user_pool_id: Option<String>,
    /// Cognito identity pool id.
    #[serde(default)]
    pub cognito_identity_pool_id: Option<String>,
    /// Role that lets the service configure Cognito.
    #[serde(default)]
    pub cognito_role_arn: Option<String>,
}

/// Search engine flavour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EngineType {
    /// Elasticsearch.
    #[default]
    #[serde(rename = "ElasticSearch", alias = "Elasticsearch", alias = "elasticsearch")]
    ElasticSearch,
    /// OpenSearch.
    #[serde(rename = "OpenSearch", alias = "opensearch")]
    OpenSearch,
}

fn default_version() -> String {
    String::from("2.3")
}

/// Accepts either a YAML list or a comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdListInput {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = match Option::<IdListInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(IdListInput::List(ids)) => ids,
        Some(IdListInput::Csv(csv)) => csv.split(',').map(String::from).collect(),
    };

    Ok(ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

impl EngineType {
    /// Version string as understood by the configuration API.
    #[must_use]
    pub fn version_string(self, version: &str) -> String {
        match self {
            Self::ElasticSearch => version.to_string(),
            Self::OpenSearch => format!("OpenSearch_{version}"),
        }
    }
}

impl std::fmt::Display for EngineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElasticSearch => write!(f, "ElasticSearch"),
            Self::OpenSearch => write!(f, "OpenSearch"),
        }
    }
}

impl DomainParams {
    /// Returns true if a VPC endpoint is requested.
    #[must_use]
    pub fn uses_vpc(&self) -> bool {
        !self.vpc_subnets.is_empty() || !self.vpc_security_groups.is_empty()
    }
}
