//! Diff engine for comparing desired vs current domain configuration.
//!
//! Comparison runs over the keys the desired shape sets. Anything the
//! provider reports beyond that (defaults, options added to the API later)
//! is ignored, so drift in fields the declaration does not manage goes
//! unnoticed.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{EsDomainError, Result};
use crate::es::DomainStatus;

use super::desired::DesiredDomain;
use super::policy::{parse_current_policy, AccessPolicy};

/// Engine for computing diffs between desired and current configuration.
#[derive(Debug, Default)]
pub struct DiffEngine;

/// A single differing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Dotted path of the field, e.g. `EBSOptions.VolumeSize`.
    pub field: String,
    /// Current value as compact JSON, if any.
    pub current: Option<String>,
    /// Desired value as compact JSON, if any.
    pub desired: Option<String>,
}

/// Result of comparing a desired configuration against a domain.
#[derive(Debug, Clone)]
pub struct DomainDiff {
    /// Differing fields, in comparison order.
    pub changes: Vec<FieldChange>,
    /// The declared policy, qualified with the domain ARN.
    pub access_policy: AccessPolicy,
}

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compares the desired configuration with the current domain status.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored access policy cannot be parsed.
    pub fn compute_diff(&self, desired: &DesiredDomain, current: &DomainStatus) -> Result<DomainDiff> {
        let mut changes = Vec::new();

        compare_section(
            "ElasticsearchClusterConfig",
            &desired.cluster_config,
            current.elasticsearch_cluster_config.as_ref(),
            &mut changes,
        )?;
        compare_section("EBSOptions", &desired.ebs_options, current.ebs_options.as_ref(), &mut changes)?;
        compare_section(
            "CognitoOptions",
            &desired.cognito_options,
            current.cognito_options.as_ref(),
            &mut changes,
        )?;

        // Network options are only compared for domains that already live in a VPC.
        if let (Some(wanted), Some(actual)) = (&desired.vpc_options, &current.vpc_options) {
            compare_ids("VPCOptions.SubnetIds", &wanted.subnet_ids, &actual.subnet_ids, &mut changes);
            compare_ids(
                "VPCOptions.SecurityGroupIds",
                &wanted.security_group_ids,
                &actual.security_group_ids,
                &mut changes,
            );
        }

        compare_section(
            "SnapshotOptions",
            &desired.snapshot_options,
            current.snapshot_options.as_ref(),
            &mut changes,
        )?;

        let access_policy = desired.access_policy.qualified(&current.arn);
        let current_policy = parse_current_policy(current.access_policies.as_deref())?;
        if current_policy.as_ref() != Some(access_policy.as_value()) {
            changes.push(FieldChange::new(
                "AccessPolicies",
                current_policy.as_ref().unwrap_or(&Value::Null),
                access_policy.as_value(),
            ));
        }

        for change in &changes {
            debug!("{} differs on {}", desired.name, change);
        }

        Ok(DomainDiff {
            changes,
            access_policy,
        })
    }
}

/// Serializes both sides of a section and compares them.
fn compare_section<T: Serialize>(
    name: &str,
    desired: &T,
    current: Option<&T>,
    changes: &mut Vec<FieldChange>,
) -> Result<()> {
    let desired = to_value(desired)?;
    let current = current.map(to_value).transpose()?.unwrap_or(Value::Null);
    compare_subset(name, &desired, &current, changes);
    Ok(())
}

fn to_value<T: Serialize>(section: &T) -> Result<Value> {
    serde_json::to_value(section)
        .map_err(|e| EsDomainError::internal(format!("Failed to serialize configuration: {e}")))
}

/// Walks the keys present in `desired` and records each mismatch.
///
/// A desired `false` matches an absent current value: the provider omits
/// disabled flags on some engine versions.
fn compare_subset(path: &str, desired: &Value, current: &Value, changes: &mut Vec<FieldChange>) {
    match desired {
        Value::Object(fields) => {
            for (key, wanted) in fields {
                let actual = current.get(key).unwrap_or(&Value::Null);
                compare_subset(&format!("{path}.{key}"), wanted, actual, changes);
            }
        }
        Value::Null | Value::Bool(false) if current.is_null() => {}
        _ if desired == current => {}
        _ => changes.push(FieldChange::new(path, current, desired)),
    }
}

/// Compares id lists as sets. An empty desired list is left to the provider.
fn compare_ids(field: &str, desired: &[String], current: &[String], changes: &mut Vec<FieldChange>) {
    if desired.is_empty() {
        return;
    }

    let wanted: BTreeSet<&str> = desired.iter().map(String::as_str).collect();
    let actual: BTreeSet<&str> = current.iter().map(String::as_str).collect();

    if wanted != actual {
        changes.push(FieldChange::new(
            field,
            &Value::from(current.to_vec()),
            &Value::from(desired.to_vec()),
        ));
    }
}

impl FieldChange {
    /// Creates a change record; JSON nulls become `None`.
    #[must_use]
    pub fn new(field: impl Into<String>, current: &Value, desired: &Value) -> Self {
        let render = |value: &Value| (!value.is_null()).then(|| value.to_string());
        Self {
            field: field.into(),
            current: render(current),
            desired: render(desired),
        }
    }
}

impl DomainDiff {
    /// Returns true if there are any changes.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field,
            self.current.as_deref().unwrap_or("(none)"),
            self.desired.as_deref().unwrap_or("(none)")
        )
    }
}
