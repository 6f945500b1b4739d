//! Reconciler for converging a domain to its declaration.
//!
//! One pass is: describe, diff, at most one write (create or update), then
//! describe again so the caller sees the provider's view after the write.
//! Nothing waits for the domain to finish processing.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::es::DomainApi;
use crate::planner::{DesiredDomain, DiffEngine, DomainPlan, FieldChange, PlanAction};

/// Reconciler for a single domain.
pub struct Reconciler<'a, A: DomainApi> {
    /// Provider API.
    api: &'a A,
    /// Desired configuration.
    desired: &'a DesiredDomain,
    /// Diff engine.
    diff_engine: DiffEngine,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    /// Whether a write was issued.
    pub changed: bool,
    /// The action taken.
    pub action: PlanAction,
    /// Fields that differed before the write.
    pub changes: Vec<FieldChange>,
    /// The final describe response.
    pub response: Value,
}

impl<'a, A: DomainApi> Reconciler<'a, A> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(api: &'a A, desired: &'a DesiredDomain) -> Self {
        Self {
            api,
            desired,
            diff_engine: DiffEngine::new(),
        }
    }

    /// Computes what a reconciliation would do, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain cannot be described for any reason
    /// other than not existing, or if its stored policy is unreadable.
    pub async fn plan(&self) -> Result<DomainPlan> {
        let name = &self.desired.name;

        match self.api.describe_domain(name).await {
            Ok(current) => {
                debug!("Domain {} exists ({})", name, current.status.arn);
                let diff = self.diff_engine.compute_diff(self.desired, &current.status)?;
                Ok(DomainPlan::from_diff(self.desired, diff))
            }
            Err(err) if err.is_not_found() => {
                debug!("Domain {} does not exist", name);
                Ok(DomainPlan::create(self.desired))
            }
            Err(err) => Err(err),
        }
    }

    /// Performs a full reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if any provider call fails. A failed write is not
    /// retried and no final describe is attempted.
    pub async fn reconcile(&self) -> Result<ReconciliationResult> {
        info!("Starting reconciliation for domain {}", self.desired.name);

        let plan = self.plan().await?;
        self.apply(plan).await
    }

    /// Executes a previously computed plan, then re-reads the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or the final describe fails.
    pub async fn apply(&self, plan: DomainPlan) -> Result<ReconciliationResult> {
        match plan.action {
            PlanAction::Create => {
                info!("Creating domain {}", plan.domain_name);
                let request = self.desired.create_request()?;
                self.api.create_domain(&request).await?;
            }
            PlanAction::Update => {
                info!(
                    "Updating domain {} ({} field(s) differ)",
                    plan.domain_name,
                    plan.changes.len()
                );
                let request = self.desired.update_request(&plan.access_policy)?;
                self.api.update_domain_config(&request).await?;
            }
            PlanAction::NoOp => {
                info!("No changes required - domain {} is converged", plan.domain_name);
            }
        }

        let final_description = self.api.describe_domain(&self.desired.name).await?;

        Ok(ReconciliationResult {
            changed: plan.is_changing(),
            action: plan.action,
            changes: plan.changes,
            response: final_description.raw,
        })
    }
}

impl std::fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.changed { "changed" } else { "unchanged" };
        writeln!(f, "Reconciliation {status} ({}):", self.action)?;
        for change in &self.changes {
            writeln!(f, "  ~ {change}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParser;
    use crate::error::{EsDomainError, ProviderError, RESOURCE_NOT_FOUND};
    use crate::es::{DomainDescription, MockDomainApi};
    use mockall::Sequence;
    use serde_json::json;

    const ARN: &str = "arn:aws:es:us-east-1:123456789012:domain/my-cluster";

    fn desired() -> DesiredDomain {
        let yaml = r#"
name: my-cluster
region: us-east-1
instance_type: m3.medium.elasticsearch
instance_count: 2
dedicated_master: false
zone_awareness: false
ebs: true
volume_type: standard
volume_size: 10
snapshot_hour: 13
access_policies: |
  {"Version": "2012-10-17", "Statement": [{"Effect": "Allow", "Principal": {"AWS": "*"}, "Action": "es:*"}]}
"#;
        let params = ConfigParser::new().parse_yaml(yaml, None).unwrap();
        DesiredDomain::from_params(&params).unwrap()
    }

    fn described(instance_count: u32, volume_size: u32) -> DomainDescription {
        DomainDescription::from_response(json!({
            "DomainStatus": {
                "ARN": ARN,
                "DomainId": "123456789012/my-cluster",
                "DomainName": "my-cluster",
                "Created": true,
                "Processing": false,
                "ElasticsearchClusterConfig": {
                    "InstanceType": "m3.medium.elasticsearch",
                    "InstanceCount": instance_count,
                    "DedicatedMasterEnabled": false,
                    "ZoneAwarenessEnabled": false
                },
                "EBSOptions": {"EBSEnabled": true, "VolumeType": "standard", "VolumeSize": volume_size},
                "SnapshotOptions": {"AutomatedSnapshotStartHour": 13},
                "CognitoOptions": {"Enabled": false},
                "AccessPolicies": format!(
                    r#"{{"Version":"2012-10-17","Statement":[{{"Effect":"Allow","Principal":{{"AWS":"*"}},"Action":"es:*","Resource":"{ARN}/*"}}]}}"#
                )
            }
        }))
        .unwrap()
    }

    fn not_found() -> EsDomainError {
        EsDomainError::Provider(ProviderError::api(
            409,
            RESOURCE_NOT_FOUND,
            "Domain not found: my-cluster",
        ))
    }

    #[tokio::test]
    async fn test_missing_domain_is_created_once() {
        let desired = desired();
        let mut api = MockDomainApi::new();
        let mut seq = Sequence::new();

        api.expect_describe_domain()
            .withf(|name| name == "my-cluster")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(not_found()));
        api.expect_create_domain()
            .withf(|request| {
                request.domain_name == "my-cluster"
                    && request.elasticsearch_version == "2.3"
                    && !request.access_policies.contains("Resource")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({"DomainStatus": {}})));
        api.expect_describe_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(described(2, 10)));
        api.expect_update_domain_config().times(0);

        let result = Reconciler::new(&api, &desired).reconcile().await.unwrap();

        assert!(result.changed);
        assert_eq!(result.action, PlanAction::Create);
        assert_eq!(result.response["DomainStatus"]["ARN"], ARN);
    }

    #[tokio::test]
    async fn test_matching_domain_is_left_alone() {
        let desired = desired();
        let mut api = MockDomainApi::new();

        api.expect_describe_domain()
            .times(2)
            .returning(|_| Ok(described(2, 10)));
        api.expect_create_domain().times(0);
        api.expect_update_domain_config().times(0);

        let result = Reconciler::new(&api, &desired).reconcile().await.unwrap();

        assert!(!result.changed);
        assert_eq!(result.action, PlanAction::NoOp);
        assert!(result.changes.is_empty());
    }

    #[tokio::test]
    async fn test_instance_count_drift_triggers_single_update() {
        let desired = desired();
        let mut api = MockDomainApi::new();
        let mut seq = Sequence::new();

        api.expect_describe_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(described(3, 10)));
        let expected = desired.clone();
        api.expect_update_domain_config()
            .withf(move |request| {
                request.domain_name == "my-cluster"
                    && request.elasticsearch_cluster_config.instance_count == Some(2)
                    && request.elasticsearch_cluster_config == expected.cluster_config
                    && request.ebs_options == expected.ebs_options
                    && request.snapshot_options == expected.snapshot_options
                    && request.cognito_options == expected.cognito_options
                    && request.vpc_options == expected.vpc_options
                    && request.access_policies.contains(&format!("{ARN}/*"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({"DomainConfig": {}})));
        api.expect_describe_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(described(2, 10)));
        api.expect_create_domain().times(0);

        let result = Reconciler::new(&api, &desired).reconcile().await.unwrap();

        assert!(result.changed);
        assert_eq!(result.action, PlanAction::Update);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].field, "ElasticsearchClusterConfig.InstanceCount");
    }

    #[tokio::test]
    async fn test_provider_error_is_fatal_without_writes() {
        let desired = desired();
        let mut api = MockDomainApi::new();

        api.expect_describe_domain().times(1).returning(|_| {
            Err(EsDomainError::Provider(ProviderError::api(
                403,
                "AccessDeniedException",
                "User is not authorized",
            )))
        });
        api.expect_create_domain().times(0);
        api.expect_update_domain_config().times(0);

        let err = Reconciler::new(&api, &desired).reconcile().await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(err.to_string().contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn test_failed_write_skips_final_describe() {
        let desired = desired();
        let mut api = MockDomainApi::new();

        api.expect_describe_domain()
            .times(1)
            .returning(|_| Ok(described(3, 10)));
        api.expect_update_domain_config().times(1).returning(|_| {
            Err(EsDomainError::Provider(ProviderError::api(
                400,
                "ValidationException",
                "Invalid instance count",
            )))
        });

        assert!(Reconciler::new(&api, &desired).reconcile().await.is_err());
    }

    #[tokio::test]
    async fn test_plan_does_not_write() {
        let desired = desired();
        let mut api = MockDomainApi::new();

        api.expect_describe_domain()
            .times(1)
            .returning(|_| Ok(described(2, 20)));
        api.expect_create_domain().times(0);
        api.expect_update_domain_config().times(0);

        let plan = Reconciler::new(&api, &desired).plan().await.unwrap();

        assert_eq!(plan.action, PlanAction::Update);
        assert_eq!(plan.changes[0].field, "EBSOptions.VolumeSize");
        assert_eq!(plan.changes[0].current.as_deref(), Some("20"));
        assert_eq!(plan.changes[0].desired.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_plan_for_missing_domain() {
        let desired = desired();
        let mut api = MockDomainApi::new();

        api.expect_describe_domain()
            .times(1)
            .returning(|_| Err(not_found()));

        let plan = Reconciler::new(&api, &desired).plan().await.unwrap();
        assert_eq!(plan.action, PlanAction::Create);
    }

    #[test]
    fn test_result_json_shape() {
        let result = ReconciliationResult {
            changed: false,
            action: PlanAction::NoOp,
            changes: Vec::new(),
            response: json!({"DomainStatus": {"DomainName": "my-cluster"}}),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["changed"], false);
        assert_eq!(value["action"], "no-op");
        assert_eq!(value["response"]["DomainStatus"]["DomainName"], "my-cluster");
    }
}
