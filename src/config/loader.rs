//! Configuration Loader
//!
//! Layered configuration loading: built-in defaults, then an optional YAML
//! file, then `FLOWMAP__*` environment variables.

use config::{Config, Environment, File, FileFormat};
use std::path::PathBuf;
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::ImportConfig;
use crate::constants::operations;

const ENV_PREFIX: &str = "FLOWMAP";

/// Builds an [`ImportConfig`] from layered sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    required: bool,
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            required: false,
            use_environment: true,
        }
    }

    /// Layer an optional YAML file over the defaults.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.required = false;
        self
    }

    /// Layer a YAML file that must exist.
    pub fn with_required_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.required = true;
        self
    }

    /// Skip environment overrides. Useful in tests.
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    pub fn load(&self) -> ConfigResult<ImportConfig> {
        let defaults = Config::try_from(&ImportConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = &self.file {
            if self.required && !path.is_file() {
                return Err(ConfigurationError::ConfigFileNotFound { path: path.clone() });
            }
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Yaml)
                    .required(self.required),
            );
        }

        if self.use_environment {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("predecessor_delimiters")
                    .try_parsing(true),
            );
        }

        let config: ImportConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            operation = operations::CONFIG_LOADED,
            environment = %config.environment,
            file = ?self.file,
            "Import configuration loaded"
        );
        Ok(config)
    }
}
