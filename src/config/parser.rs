//! Configuration parser for loading domain declarations.
//!
//! This module handles loading the declaration from YAML files and
//! environment variables, with proper precedence and error handling.

use crate::error::{ConfigError, EsDomainError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::params::DomainParams;

/// Configuration parser for loading domain declarations.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a declaration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DomainParams> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(EsDomainError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            EsDomainError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses a declaration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<DomainParams> {
        debug!("Parsing YAML configuration");

        let params: DomainParams = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            EsDomainError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Successfully parsed configuration for domain: {}", params.name);
        Ok(params)
    }

    /// Loads a declaration with environment variable overrides.
    ///
    /// Recognised variables: `ESDOMAIN_NAME`, `ESDOMAIN_REGION`,
    /// `ESDOMAIN_PROFILE` and `ESDOMAIN_ENDPOINT_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<DomainParams> {
        let mut params = self.load_file(path)?;
        Self::apply_env_overrides(&mut params);
        Ok(params)
    }

    /// Applies environment variable overrides to the declaration.
    fn apply_env_overrides(params: &mut DomainParams) {
        if let Ok(name) = std::env::var("ESDOMAIN_NAME") {
            debug!("Overriding name from environment");
            params.name = name;
        }

        if let Ok(region) = std::env::var("ESDOMAIN_REGION") {
            debug!("Overriding region from environment");
            params.region = Some(region);
        }

        if let Ok(profile) = std::env::var("ESDOMAIN_PROFILE") {
            debug!("Overriding profile from environment");
            params.profile = Some(profile);
        }

        if let Ok(endpoint) = std::env::var("ESDOMAIN_ENDPOINT_URL") {
            debug!("Overriding endpoint_url from environment");
            params.endpoint_url = Some(endpoint);
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                EsDomainError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "esdomain.yaml",
    "esdomain.yml",
    "domain.yaml",
    "domain.yml",
];

/// Finds the configuration file in the given directory or its parents.
///
/// A relative start directory is resolved against the working directory
/// first, so `"."` still walks up to the filesystem root.
///
/// # Errors
///
/// Returns an error if no configuration file is found or the working
/// directory cannot be determined.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let start = std::path::absolute(start_dir.as_ref())?;
    let mut current = start.clone();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(EsDomainError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
