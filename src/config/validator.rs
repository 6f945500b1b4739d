//! Configuration validation for domain declarations.
//!
//! Enforces the inter-field requirements of a declaration (for instance,
//! zone awareness needs an availability zone count) before anything is sent
//! to the provider.

use crate::error::{ConfigError, EsDomainError, Result};
use tracing::debug;

use super::params::DomainParams;

/// Volume types that accept a provisioned IOPS value.
const PROVISIONED_VOLUME_TYPES: &[&str] = &["io1", "gp3"];

/// Volume types known to the service.
const KNOWN_VOLUME_TYPES: &[&str] = &["standard", "gp2", "gp3", "io1"];

/// Validator for domain declarations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a domain declaration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any rule fails.
    pub fn validate(&self, params: &DomainParams) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_name(params, &mut result);
        Self::validate_required_if(params, &mut result);
        Self::validate_ranges(params, &mut result);
        Self::collect_warnings(params, &mut result);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(EsDomainError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }

    /// Validates the domain name against the service's naming rules.
    fn validate_name(params: &DomainParams, result: &mut ValidationResult) {
        if !is_valid_domain_name(&params.name) {
            result.push(
                "name",
                format!(
                    "Domain name '{}' is invalid. Must be 3-28 characters, start with a lowercase letter and contain only a-z, 0-9 and hyphens.",
                    params.name
                ),
            );
        }
    }

    /// Fields that become mandatory once a feature is switched on.
    fn validate_required_if(params: &DomainParams, result: &mut ValidationResult) {
        if params.warm_enabled {
            require(result, "warm_enabled", "warm_type", params.warm_type.is_some());
            require(result, "warm_enabled", "warm_count", params.warm_count.is_some());
        }

        if params.zone_awareness {
            require(
                result,
                "zone_awareness",
                "availability_zone_count",
                params.availability_zone_count.is_some(),
            );
        }

        if params.dedicated_master {
            require(
                result,
                "dedicated_master",
                "dedicated_master_instance_type",
                params.dedicated_master_instance_type.is_some(),
            );
            require(
                result,
                "dedicated_master",
                "dedicated_master_instance_count",
                params.dedicated_master_instance_count.is_some(),
            );
        }

        if params.ebs {
            require(result, "ebs", "volume_type", params.volume_type.is_some());
            require(result, "ebs", "volume_size", params.volume_size.is_some());
        }

        if params.cognito_enabled {
            require(
                result,
                "cognito_enabled",
                "cognito_user_pool_id",
                params.cognito_user_pool_id.is_some(),
            );
            require(
                result,
                "cognito_enabled",
                "cognito_identity_pool_id",
                params.cognito_identity_pool_id.is_some(),
            );
            require(
                result,
                "cognito_enabled",
                "cognito_role_arn",
                params.cognito_role_arn.is_some(),
            );
        }
    }

    /// Validates numeric ranges and enumerations.
    fn validate_ranges(params: &DomainParams, result: &mut ValidationResult) {
        if params.instance_count == 0 {
            result.push("instance_count", "Instance count must be at least 1");
        }

        if params.snapshot_hour > 23 {
            result.push(
                "snapshot_hour",
                format!("Snapshot hour must be between 0 and 23, got {}", params.snapshot_hour),
            );
        }

        if params.zone_awareness
            && let Some(count) = params.availability_zone_count
            && !(2..=3).contains(&count)
        {
            result.push(
                "availability_zone_count",
                format!("Availability zone count must be 2 or 3, got {count}"),
            );
        }

        if params.ebs
            && let Some(volume_type) = &params.volume_type
            && !KNOWN_VOLUME_TYPES.contains(&volume_type.as_str())
        {
            result.push(
                "volume_type",
                format!(
                    "Unknown volume type '{volume_type}'. Expected one of: {}",
                    KNOWN_VOLUME_TYPES.join(", ")
                ),
            );
        }

        if params.ebs && params.volume_size == Some(0) {
            result.push("volume_size", "Volume size must be at least 1 GiB");
        }
    }

    /// Non-fatal inconsistencies.
    fn collect_warnings(params: &DomainParams, result: &mut ValidationResult) {
        if !params.encryption_at_rest_enabled && params.encryption_at_rest_kms_key_id.is_some() {
            result.warnings.push(String::from(
                "encryption_at_rest_kms_key_id is ignored because encryption_at_rest_enabled is false",
            ));
        }

        if params.iops.is_some()
            && !params
                .volume_type
                .as_deref()
                .is_some_and(|t| PROVISIONED_VOLUME_TYPES.contains(&t))
        {
            result.warnings.push(String::from(
                "iops is set but volume_type does not support provisioned IOPS",
            ));
        }

        if params.zone_awareness
            && !params.vpc_subnets.is_empty()
            && let Some(count) = params.availability_zone_count
            && usize::try_from(count).ok() != Some(params.vpc_subnets.len())
        {
            result.warnings.push(format!(
                "availability_zone_count ({count}) differs from the number of vpc_subnets ({})",
                params.vpc_subnets.len()
            ));
        }

        if params.encryption_at_rest_enabled {
            result.warnings.push(String::from(
                "encryption at rest is only applied when the domain is created",
            ));
        }
    }
}

/// Records a missing field required by an enabled feature.
fn require(result: &mut ValidationResult, flag: &str, field: &str, present: bool) {
    if !present {
        result.push(field, format!("{flag} is true but {field} is missing"));
    }
}

/// Validates a domain name: 3-28 characters, lowercase letter first,
/// then lowercase letters, digits and hyphens.
fn is_valid_domain_name(name: &str) -> bool {
    if !(3..=28).contains(&name.len()) {
        return false;
    }

    let mut chars = name.chars();

    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }

    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl ValidationResult {
    /// Records a validation error.
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
