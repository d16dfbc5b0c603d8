//! Configuration loading and validation.

mod validation;

use crate::{Error, Result, SourceInfo};

use serde::Deserialize;
use std::path::Path;

/// Sources and schema settings, usually read from YAML:
///
/// ```yaml
/// sources:
///   - name: Default
///     connection: "sqlite::memory:"
///     provider: sqlite
/// schema:
///   sync_on_build: true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<SourceInfo>,

    #[serde(default)]
    pub schema: SchemaSettings,
}

/// How the schema generator treats each source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSettings {
    /// Synchronize every source when the `Db` is built.
    #[serde(default)]
    pub sync_on_build: bool,

    /// Drop unmapped columns and tables.
    #[serde(default)]
    pub destructive: bool,

    /// Create missing databases instead of failing inspection.
    #[serde(default)]
    pub create_sources: bool,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_configuration(format!("cannot read `{}`: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| Error::invalid_configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}
