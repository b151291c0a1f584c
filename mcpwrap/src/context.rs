//! Per-generation metadata rendered into the source header.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::library::Library;

/// Name stamped into generated headers.
pub const GENERATOR_NAME: &str = "mcpwrap";

/// Version stamped into generated headers.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder for libraries that publish no version.
pub const UNKNOWN_LIBRARY_VERSION: &str = "built-in (no __version__)";

/// Immutable metadata describing one `dump` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub generator_version: String,
    pub target_sdk_version: String,
    pub library_name: String,
    pub library_version: Option<String>,
    pub host_runtime_version: String,
    pub generated_at: DateTime<Utc>,
}

impl GenerationContext {
    /// Capture the context for a library at the current time.
    pub fn capture(library: &dyn Library, target_sdk_version: &str) -> Self {
        Self {
            generator_version: GENERATOR_VERSION.to_string(),
            target_sdk_version: target_sdk_version.to_string(),
            library_name: library.name().to_string(),
            library_version: library.version().map(str::to_string),
            host_runtime_version: library.runtime_version().to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Replace the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Replace the host runtime version.
    pub fn with_host_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.host_runtime_version = version.into();
        self
    }

    /// Header lines, without comment markers, in their fixed order.
    pub fn header_fields(&self) -> Vec<String> {
        vec![
            format!("AUTO-GENERATED BY {GENERATOR_NAME} — DO NOT EDIT"),
            format!("{GENERATOR_NAME} version: {}", self.generator_version),
            format!("mcp sdk version: {}", self.target_sdk_version),
            format!("library: {}", self.library_name),
            format!(
                "library version: {}",
                self.library_version
                    .as_deref()
                    .unwrap_or(UNKNOWN_LIBRARY_VERSION)
            ),
            format!("python version: {}", self.host_runtime_version),
            format!(
                "generated: {}",
                self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
        ]
    }

    /// The header as a comment block, one field per line.
    pub fn header(&self) -> String {
        self.header_fields()
            .iter()
            .map(|line| format!("# {line}\n"))
            .collect()
    }
}
