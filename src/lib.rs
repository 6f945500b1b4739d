// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # esdomain
//!
//! Declarative, idempotent reconciliation of AWS Elasticsearch Service and
//! `OpenSearch` domains.
//!
//! ## Overview
//!
//! A domain is declared once in a YAML file. Each run brings the live domain
//! in line with that declaration:
//!
//! - If the domain does not exist, it is created
//! - If it exists and differs, its configuration is updated in one call
//! - If it already matches, nothing is written
//!
//! Every run ends by describing the domain again and reporting whether
//! anything changed.
//!
//! ## Modules
//!
//! - [`config`]: Declaration parsing and validation
//! - [`es`]: Signed client for the configuration API
//! - [`planner`]: Desired shape, diff computation and planning
//! - [`reconciler`]: Describe, diff, write, describe
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! name: logs
//! region: eu-west-1
//! instance_type: m5.large.elasticsearch
//! instance_count: 2
//! dedicated_master: false
//! zone_awareness: false
//! ebs: true
//! volume_type: gp2
//! volume_size: 20
//! snapshot_hour: 3
//! access_policies:
//!   Version: "2012-10-17"
//!   Statement:
//!     - Effect: Allow
//!       Principal: { AWS: "arn:aws:iam::123456789012:root" }
//!       Action: "es:*"
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod es;
pub mod planner;
pub mod reconciler;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, LogFormat, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DomainParams};
pub use error::{EsDomainError, Result};
pub use es::{DomainApi, EsClient};
pub use planner::{DesiredDomain, DiffEngine, DomainPlan, PlanAction};
pub use reconciler::{ReconciliationResult, Reconciler};
