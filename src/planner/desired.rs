//! Desired-state builder.
//!
//! Turns the flat [`DomainParams`] into the nested shape of the
//! configuration API. Optional sub-fields are only set when the feature that
//! owns them is switched on, so the comparison never looks at a field the
//! declaration did not ask for.

use tracing::debug;

use crate::config::DomainParams;
use crate::error::Result;
use crate::es::{
    ClusterConfig, CognitoOptions, ColdStorageOptions, CreateDomainRequest, EbsOptions,
    EncryptionAtRestOptions, SnapshotOptions, UpdateDomainConfigRequest, VpcOptions,
    ZoneAwarenessConfig,
};

use super::policy::AccessPolicy;

/// The nested configuration a domain should converge to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredDomain {
    /// Domain name.
    pub name: String,
    /// Engine version as sent on creation.
    pub engine_version: String,
    /// Cluster topology.
    pub cluster_config: ClusterConfig,
    /// EBS settings.
    pub ebs_options: EbsOptions,
    /// VPC settings, when a VPC endpoint is requested.
    pub vpc_options: Option<VpcOptions>,
    /// Cognito settings.
    pub cognito_options: CognitoOptions,
    /// Snapshot settings.
    pub snapshot_options: SnapshotOptions,
    /// Encryption at rest, only honoured on creation.
    pub encryption_at_rest_options: EncryptionAtRestOptions,
    /// Access policy as declared.
    pub access_policy: AccessPolicy,
}

impl DesiredDomain {
    /// Builds the desired configuration from a declaration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the access policy is not a valid
    /// JSON object.
    pub fn from_params(params: &DomainParams) -> Result<Self> {
        let access_policy = AccessPolicy::from_param(&params.access_policies)?;

        let desired = Self {
            name: params.name.clone(),
            engine_version: params
                .engine_type
                .version_string(&params.elasticsearch_version),
            cluster_config: build_cluster_config(params),
            ebs_options: build_ebs_options(params),
            vpc_options: build_vpc_options(params),
            cognito_options: build_cognito_options(params),
            snapshot_options: SnapshotOptions {
                automated_snapshot_start_hour: Some(params.snapshot_hour),
            },
            encryption_at_rest_options: build_encryption_options(params),
            access_policy,
        };

        debug!("Built desired configuration for domain {}", desired.name);
        Ok(desired)
    }

    /// Request for creating the domain, carrying the policy as declared.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot be serialized.
    pub fn create_request(&self) -> Result<CreateDomainRequest> {
        Ok(CreateDomainRequest {
            domain_name: self.name.clone(),
            elasticsearch_version: self.engine_version.clone(),
            elasticsearch_cluster_config: self.cluster_config.clone(),
            ebs_options: self.ebs_options.clone(),
            snapshot_options: self.snapshot_options.clone(),
            access_policies: self.access_policy.to_document()?,
            cognito_options: self.cognito_options.clone(),
            vpc_options: self.vpc_options.clone(),
            encryption_at_rest_options: self.encryption_at_rest_options.clone(),
        })
    }

    /// Request for updating the domain with the full desired configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot be serialized.
    pub fn update_request(&self, policy: &AccessPolicy) -> Result<UpdateDomainConfigRequest> {
        Ok(UpdateDomainConfigRequest {
            domain_name: self.name.clone(),
            elasticsearch_cluster_config: self.cluster_config.clone(),
            ebs_options: self.ebs_options.clone(),
            snapshot_options: self.snapshot_options.clone(),
            access_policies: policy.to_document()?,
            cognito_options: self.cognito_options.clone(),
            vpc_options: self.vpc_options.clone(),
        })
    }
}

fn build_cluster_config(params: &DomainParams) -> ClusterConfig {
    let mut config = ClusterConfig {
        instance_type: Some(params.instance_type.clone()),
        instance_count: Some(params.instance_count),
        dedicated_master_enabled: Some(params.dedicated_master),
        zone_awareness_enabled: Some(params.zone_awareness),
        warm_enabled: Some(params.warm_enabled),
        cold_storage_options: Some(ColdStorageOptions {
            enabled: params.cold_storage_enabled,
        }),
        ..ClusterConfig::default()
    };

    if params.zone_awareness {
        config.zone_awareness_config = Some(ZoneAwarenessConfig {
            availability_zone_count: params.availability_zone_count,
        });
    }

    if params.dedicated_master {
        config.dedicated_master_type = params.dedicated_master_instance_type.clone();
        config.dedicated_master_count = params.dedicated_master_instance_count;
    }

    if params.warm_enabled {
        config.warm_type = params.warm_type.clone();
        config.warm_count = params.warm_count;
    }

    config
}

fn build_ebs_options(params: &DomainParams) -> EbsOptions {
    let mut options = EbsOptions {
        ebs_enabled: Some(params.ebs),
        iops: params.iops,
        ..EbsOptions::default()
    };

    if params.ebs {
        options.volume_type = params.volume_type.clone();
        options.volume_size = params.volume_size;
    }

    options
}

fn build_vpc_options(params: &DomainParams) -> Option<VpcOptions> {
    params.uses_vpc().then(|| VpcOptions {
        subnet_ids: params.vpc_subnets.clone(),
        security_group_ids: params.vpc_security_groups.clone(),
    })
}

fn build_cognito_options(params: &DomainParams) -> CognitoOptions {
    if params.cognito_enabled {
        CognitoOptions {
            enabled: true,
            user_pool_id: params.cognito_user_pool_id.clone(),
            identity_pool_id: params.cognito_identity_pool_id.clone(),
            role_arn: params.cognito_role_arn.clone(),
        }
    } else {
        CognitoOptions::default()
    }
}

fn build_encryption_options(params: &DomainParams) -> EncryptionAtRestOptions {
    EncryptionAtRestOptions {
        enabled: params.encryption_at_rest_enabled,
        kms_key_id: params
            .encryption_at_rest_kms_key_id
            .clone()
            .filter(|_| params.encryption_at_rest_enabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigParser, EngineType};
    use crate::error::{ConfigError, EsDomainError};
    use serde_json::json;

    fn params(extra: &str) -> DomainParams {
        let yaml = format!(
            r#"
name: my-cluster
instance_type: m3.medium.elasticsearch
instance_count: 2
dedicated_master: false
dedicated_master_instance_type: t2.micro.elasticsearch
dedicated_master_instance_count: 2
zone_awareness: false
ebs: true
volume_type: standard
volume_size: 10
snapshot_hour: 13
access_policies: {{"Statement": [{{"Effect": "Allow", "Action": "es:*"}}]}}
{extra}"#
        );
        ConfigParser::new().parse_yaml(&yaml, None).unwrap()
    }

    #[test]
    fn test_minimal_cluster_config() {
        let desired = DesiredDomain::from_params(&params("")).unwrap();

        assert_eq!(
            serde_json::to_value(&desired.cluster_config).unwrap(),
            json!({
                "InstanceType": "m3.medium.elasticsearch",
                "InstanceCount": 2,
                "DedicatedMasterEnabled": false,
                "ZoneAwarenessEnabled": false,
                "WarmEnabled": false,
                "ColdStorageOptions": {"Enabled": false}
            })
        );
        assert_eq!(
            serde_json::to_value(&desired.ebs_options).unwrap(),
            json!({"EBSEnabled": true, "VolumeType": "standard", "VolumeSize": 10})
        );
        assert_eq!(desired.snapshot_options.automated_snapshot_start_hour, Some(13));
        assert_eq!(desired.engine_version, "2.3");
        assert!(desired.vpc_options.is_none());
        assert!(!desired.cognito_options.enabled);
    }

    #[test]
    fn test_feature_fields_only_when_enabled() {
        let mut p = params("availability_zone_count: 2\nwarm_enabled: true\nwarm_type: ultrawarm1.medium.search\nwarm_count: 1\n");
        p.dedicated_master = true;
        p.zone_awareness = true;
        let desired = DesiredDomain::from_params(&p).unwrap();
        let config = &desired.cluster_config;

        assert_eq!(config.dedicated_master_type.as_deref(), Some("t2.micro.elasticsearch"));
        assert_eq!(config.dedicated_master_count, Some(2));
        assert_eq!(
            config.zone_awareness_config,
            Some(ZoneAwarenessConfig { availability_zone_count: Some(2) })
        );
        assert_eq!(config.warm_type.as_deref(), Some("ultrawarm1.medium.search"));
        assert_eq!(config.warm_count, Some(1));
    }

    #[test]
    fn test_dedicated_master_fields_dropped_when_disabled() {
        let desired = DesiredDomain::from_params(&params("")).unwrap();
        assert!(desired.cluster_config.dedicated_master_type.is_none());
        assert!(desired.cluster_config.dedicated_master_count.is_none());
    }

    #[test]
    fn test_ebs_disabled_keeps_only_flag() {
        let mut p = params("");
        p.ebs = false;
        let desired = DesiredDomain::from_params(&p).unwrap();
        assert_eq!(
            serde_json::to_value(&desired.ebs_options).unwrap(),
            json!({"EBSEnabled": false})
        );
    }

    #[test]
    fn test_vpc_and_cognito() {
        let p = params(
            "vpc_subnets: subnet-a,subnet-b\ncognito_enabled: true\ncognito_user_pool_id: up\ncognito_identity_pool_id: ip\ncognito_role_arn: arn:role\n",
        );
        let desired = DesiredDomain::from_params(&p).unwrap();

        let vpc = desired.vpc_options.unwrap();
        assert_eq!(vpc.subnet_ids, vec!["subnet-a", "subnet-b"]);
        assert!(vpc.security_group_ids.is_empty());
        assert_eq!(
            serde_json::to_value(&desired.cognito_options).unwrap(),
            json!({"Enabled": true, "UserPoolId": "up", "IdentityPoolId": "ip", "RoleArn": "arn:role"})
        );
    }

    #[test]
    fn test_encryption_key_only_when_enabled() {
        let p = params("encryption_at_rest_kms_key_id: key-1\n");
        let desired = DesiredDomain::from_params(&p).unwrap();
        assert!(!desired.encryption_at_rest_options.enabled);
        assert!(desired.encryption_at_rest_options.kms_key_id.is_none());

        let p = params("encryption_at_rest_enabled: true\nencryption_at_rest_kms_key_id: key-1\n");
        let desired = DesiredDomain::from_params(&p).unwrap();
        assert_eq!(desired.encryption_at_rest_options.kms_key_id.as_deref(), Some("key-1"));
    }

    #[test]
    fn test_create_request_carries_create_only_fields() {
        let mut p = params("encryption_at_rest_enabled: true\n");
        p.engine_type = EngineType::OpenSearch;
        let desired = DesiredDomain::from_params(&p).unwrap();
        let request = serde_json::to_value(desired.create_request().unwrap()).unwrap();

        assert_eq!(request["DomainName"], "my-cluster");
        assert_eq!(request["ElasticsearchVersion"], "OpenSearch_2.3");
        assert_eq!(request["EncryptionAtRestOptions"], json!({"Enabled": true}));
        // Declared policy is sent untouched on creation.
        let policy: serde_json::Value =
            serde_json::from_str(request["AccessPolicies"].as_str().unwrap()).unwrap();
        assert!(policy["Statement"][0].get("Resource").is_none());
    }

    #[test]
    fn test_update_request_has_no_create_only_fields() {
        let desired = DesiredDomain::from_params(&params("")).unwrap();
        let policy = desired.access_policy.qualified("arn:aws:es:eu-west-1:1:domain/my-cluster");
        let request = serde_json::to_value(desired.update_request(&policy).unwrap()).unwrap();

        assert!(request.get("EncryptionAtRestOptions").is_none());
        assert!(request.get("ElasticsearchVersion").is_none());
        assert!(request.get("VPCOptions").is_none());
        assert!(request["AccessPolicies"].as_str().unwrap().contains("domain/my-cluster/*"));
    }

    #[test]
    fn test_malformed_policy_is_fatal() {
        let mut p = params("");
        p.access_policies = json!("{\"Statement\": [");
        assert!(matches!(
            DesiredDomain::from_params(&p),
            Err(EsDomainError::Config(ConfigError::InvalidPolicy { .. }))
        ));
    }
}
