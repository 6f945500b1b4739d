//! CLI module for the esdomain tool.
//!
//! This module provides the command-line interface for reconciling
//! Elasticsearch Service domains.

mod commands;
mod output;

pub use commands::{Cli, Commands, LogFormat, OutputFormat};
pub use output::OutputFormatter;
