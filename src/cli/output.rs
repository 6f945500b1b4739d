//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde_json::Value;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{DomainParams, ValidationResult};
use crate::es::DomainDescription;
use crate::planner::{DomainPlan, FieldChange, PlanAction};
use crate::reconciler::ReconciliationResult;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Field change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Desired")]
    desired: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a plan for display.
    #[must_use]
    pub fn format_plan(&self, plan: &DomainPlan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(plan).unwrap_or_default(),
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &DomainPlan) -> String {
        if !plan.is_changing() {
            return format!(
                "{} No changes required - domain '{}' is up to date.\n",
                "✓".green(),
                plan.domain_name
            );
        }

        let mut output = String::new();
        let _ = write!(
            output,
            "\nPlan: {} {}\n\n",
            Self::format_action(plan.action),
            plan.domain_name
        );
        output.push_str(&Self::changes_table(&plan.changes));
        output
    }

    /// Formats a reconciliation result.
    #[must_use]
    pub fn format_reconciliation(&self, result: &ReconciliationResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = if result.changed {
                    format!("{} Domain {}\n", "✓".green(), Self::past_tense(result.action))
                } else {
                    format!("{} Domain already up to date\n", "✓".green())
                };

                if result.changed {
                    output.push('\n');
                    output.push_str(&Self::changes_table(&result.changes));
                }

                output.push('\n');
                output.push_str(&Self::status_summary(&result.response));
                output
            }
        }
    }

    /// Formats a describe response.
    #[must_use]
    pub fn format_domain(&self, description: &DomainDescription) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&description.raw).unwrap_or_default()
            }
            OutputFormat::Text => Self::status_summary(&description.raw),
        }
    }

    /// Formats a validation outcome.
    #[must_use]
    pub fn format_validation(
        &self,
        params: &DomainParams,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "valid": result.is_valid(),
                "domain": params.name,
                "warnings": result.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!("{} Configuration is valid!\n", "✓".green());

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                let _ = write!(output, "\nConfiguration summary:\n");
                let _ = writeln!(output, "   Domain: {}", params.name);
                let _ = writeln!(
                    output,
                    "   Engine: {}",
                    params.engine_type.version_string(&params.elasticsearch_version)
                );
                let _ = writeln!(
                    output,
                    "   Instances: {}x {}",
                    params.instance_count, params.instance_type
                );
                let _ = writeln!(output, "   VPC: {}", if params.uses_vpc() { "yes" } else { "no" });
                output
            }
        }
    }

    /// Renders field changes as a table.
    fn changes_table(changes: &[FieldChange]) -> String {
        let rows: Vec<ChangeRow> = changes
            .iter()
            .map(|c| ChangeRow {
                field: c.field.clone(),
                current: Self::truncate(c.current.as_deref().unwrap_or("-"), 40),
                desired: Self::truncate(c.desired.as_deref().unwrap_or("-"), 40),
            })
            .collect();

        let mut table = Table::new(rows).to_string();
        table.push('\n');
        table
    }

    /// One-line summary of a describe response.
    fn status_summary(raw: &Value) -> String {
        let status = &raw["DomainStatus"];
        let state = if status["Deleted"].as_bool() == Some(true) {
            "deleted".red().to_string()
        } else if status["Processing"].as_bool() == Some(true) {
            "processing".yellow().to_string()
        } else {
            "active".green().to_string()
        };

        let mut output = String::new();
        let _ = writeln!(
            output,
            "Domain: {} ({state})",
            status["DomainName"].as_str().unwrap_or("unknown")
        );
        if let Some(arn) = status["ARN"].as_str() {
            let _ = writeln!(output, "   ARN: {arn}");
        }
        if let Some(version) = status["ElasticsearchVersion"].as_str() {
            let _ = writeln!(output, "   Version: {version}");
        }
        let endpoint = status["Endpoint"]
            .as_str()
            .or_else(|| status["Endpoints"]["vpc"].as_str());
        if let Some(endpoint) = endpoint {
            let _ = writeln!(output, "   Endpoint: {endpoint}");
        }
        output
    }

    /// Formats an action with color.
    fn format_action(action: PlanAction) -> String {
        match action {
            PlanAction::Create => "+create".green().to_string(),
            PlanAction::Update => "~update".yellow().to_string(),
            PlanAction::NoOp => "no-op".dimmed().to_string(),
        }
    }

    const fn past_tense(action: PlanAction) -> &'static str {
        match action {
            PlanAction::Create => "created",
            PlanAction::Update => "updated",
            PlanAction::NoOp => "unchanged",
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{head}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(changed: bool) -> ReconciliationResult {
        ReconciliationResult {
            changed,
            action: if changed { PlanAction::Update } else { PlanAction::NoOp },
            changes: if changed {
                vec![FieldChange {
                    field: String::from("EBSOptions.VolumeSize"),
                    current: Some(String::from("20")),
                    desired: Some(String::from("10")),
                }]
            } else {
                Vec::new()
            },
            response: json!({"DomainStatus": {"DomainName": "logs", "Processing": true}}),
        }
    }

    #[test]
    fn test_json_reconciliation_shape() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_reconciliation(&result(true));
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["changed"], true);
        assert_eq!(value["action"], "update");
        assert_eq!(value["changes"][0]["field"], "EBSOptions.VolumeSize");
        assert_eq!(value["response"]["DomainStatus"]["DomainName"], "logs");
    }

    #[test]
    fn test_text_reconciliation_lists_changes() {
        colored::control::set_override(false);
        let formatter = OutputFormatter::new(OutputFormat::Text);

        let output = formatter.format_reconciliation(&result(true));
        assert!(output.contains("Domain updated"));
        assert!(output.contains("EBSOptions.VolumeSize"));
        assert!(output.contains("processing"));

        let output = formatter.format_reconciliation(&result(false));
        assert!(output.contains("already up to date"));
        assert!(!output.contains("EBSOptions"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("abcdefghijkl", 8), "abcde...");
    }
}
