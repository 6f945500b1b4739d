//! Planning module for domain reconciliation.
//!
//! This module builds the desired domain shape from a declaration, compares
//! it with what the provider reports and turns the result into a plan.

mod desired;
mod diff;
mod plan;
mod policy;

pub use desired::DesiredDomain;
pub use diff::{DiffEngine, DomainDiff, FieldChange};
pub use plan::{DomainPlan, PlanAction};
pub use policy::{parse_current_policy, AccessPolicy};
