//! Reconciliation plan types.
//!
//! A plan is the outcome of describing and diffing a domain, before anything
//! is written. Dry runs stop here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::desired::DesiredDomain;
use super::diff::{DomainDiff, FieldChange};
use super::policy::AccessPolicy;

/// The single write a reconciliation performs, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    /// The domain does not exist and will be created.
    Create,
    /// The domain exists and differs from the declaration.
    Update,
    /// The domain already matches.
    #[serde(rename = "no-op")]
    NoOp,
}

/// A planned reconciliation of one domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainPlan {
    /// When the plan was computed.
    pub created_at: DateTime<Utc>,
    /// Domain name.
    pub domain_name: String,
    /// What will be done.
    pub action: PlanAction,
    /// Fields that differ.
    pub changes: Vec<FieldChange>,
    /// Policy document the write call will carry.
    #[serde(skip)]
    pub access_policy: AccessPolicy,
}

impl DomainPlan {
    /// Plan for a domain that does not exist yet.
    #[must_use]
    pub fn create(desired: &DesiredDomain) -> Self {
        Self {
            created_at: Utc::now(),
            domain_name: desired.name.clone(),
            action: PlanAction::Create,
            changes: vec![FieldChange {
                field: String::from("DomainName"),
                current: None,
                desired: Some(desired.name.clone()),
            }],
            access_policy: desired.access_policy.clone(),
        }
    }

    /// Plan for an existing domain, from its diff.
    #[must_use]
    pub fn from_diff(desired: &DesiredDomain, diff: DomainDiff) -> Self {
        let action = if diff.has_changes() {
            PlanAction::Update
        } else {
            PlanAction::NoOp
        };

        Self {
            created_at: Utc::now(),
            domain_name: desired.name.clone(),
            action,
            changes: diff.changes,
            access_policy: diff.access_policy,
        }
    }

    /// Returns true if applying the plan writes to the provider.
    #[must_use]
    pub fn is_changing(&self) -> bool {
        self.action != PlanAction::NoOp
    }

    /// Returns a human-readable description of the action.
    #[must_use]
    pub fn description(&self) -> String {
        match self.action {
            PlanAction::Create => format!("Create domain '{}'", self.domain_name),
            PlanAction::Update => format!(
                "Update domain '{}' ({} field(s))",
                self.domain_name,
                self.changes.len()
            ),
            PlanAction::NoOp => format!("No change for '{}'", self.domain_name),
        }
    }
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::NoOp => "no-op",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for DomainPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_changing() {
            return write!(f, "No changes required");
        }

        writeln!(f, "{}:", self.description())?;
        for change in &self.changes {
            writeln!(f, "  ~ {change}")?;
        }
        Ok(())
    }
}
