//! Loading agent definitions from YAML.

use std::path::Path;

use crate::definition::AgentDefinition;
use crate::ConfigError;

impl AgentDefinition {
    /// Parse a definition from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a definition from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;
        Self::from_yaml_str(&content)
    }
}
