//! Configuration for wrapping a library.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WrapError};

/// Settings shared by the live and source emission paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    /// Name the server announces; defaults to the library name.
    pub server_name: Option<String>,

    /// Instructions sent to clients by the live server.
    pub instructions: Option<String>,

    /// Overrides the host runtime version recorded in generated headers.
    pub host_runtime_version: Option<String>,
}

impl WrapConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Set the live server instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Override the host runtime version.
    pub fn with_host_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.host_runtime_version = Some(version.into());
        self
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| WrapError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WrapError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }
}
