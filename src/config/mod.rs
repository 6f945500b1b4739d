//! Configuration module for esdomain.
//!
//! This module handles everything that happens before the provider is
//! contacted:
//! - Parsing and deserializing `esdomain.yaml`
//! - Environment overrides and `.env` loading
//! - Validation of inter-field requirements

mod params;
mod parser;
mod validator;

pub use params::{DomainParams, EngineType};
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
