//! The `McpWrap` entry point.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::WrapConfig;
use crate::context::{GENERATOR_VERSION, GenerationContext};
use crate::error::Result;
use crate::library::{Library, LibraryHandle};
use crate::live::{LiveRegistration, LiveServer, ServerIdentity};
use crate::output::Destination;
use crate::registry::CommandRegistry;
use crate::sink::emit;
use crate::source::SourceText;
use crate::version::SdkVersionPolicy;

/// Wraps a library as an MCP command server.
///
/// The command registry is rebuilt on every call, so changes in the library's
/// members are picked up by the next `serve` or `dump`.
#[derive(Clone)]
pub struct McpWrap {
    library: LibraryHandle,
    config: WrapConfig,
}

impl McpWrap {
    /// Wrap a shared library handle.
    pub fn new(library: LibraryHandle) -> Self {
        Self {
            library,
            config: WrapConfig::default(),
        }
    }

    /// Wrap an owned library.
    pub fn from_library<L: Library + 'static>(library: L) -> Self {
        Self::new(Arc::new(library))
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: WrapConfig) -> Self {
        self.config = config;
        self
    }

    /// The wrapped library.
    pub fn library(&self) -> &dyn Library {
        self.library.as_ref()
    }

    /// The active configuration.
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// Build the command registry for the wrapped library.
    pub fn commands(&self) -> Result<CommandRegistry> {
        CommandRegistry::build(self.library.as_ref())
    }

    /// Build a live server without starting a transport.
    pub fn live_server(&self) -> Result<LiveServer> {
        let registry = self.commands()?;
        let identity = ServerIdentity {
            name: self.server_name().to_string(),
            version: self
                .library
                .version()
                .unwrap_or(GENERATOR_VERSION)
                .to_string(),
            instructions: self.config.instructions.clone(),
        };
        emit(
            &registry,
            LiveRegistration::new(Arc::clone(&self.library), identity),
        )
    }

    /// Register every command live and serve over stdio.
    pub async fn serve(&self) -> Result<()> {
        let server = self.live_server()?;
        server.serve_stdio().await
    }

    /// Header metadata for a render targeting `target_sdk_version`.
    pub fn generation_context(&self, target_sdk_version: &str) -> GenerationContext {
        let context = GenerationContext::capture(self.library.as_ref(), target_sdk_version);
        match &self.config.host_runtime_version {
            Some(version) => context.with_host_runtime_version(version.clone()),
            None => context,
        }
    }

    /// Render server source pinned to `target_sdk_version`.
    pub fn render(&self, target_sdk_version: &str) -> Result<String> {
        let context = self.generation_context(target_sdk_version);
        self.render_with_context(&context)
    }

    /// Render server source with caller-supplied header metadata.
    ///
    /// The target version is read from the context and checked before any
    /// discovery happens.
    pub fn render_with_context(&self, context: &GenerationContext) -> Result<String> {
        let contract = SdkVersionPolicy::builtin().select(&context.target_sdk_version)?;
        let registry = self.commands()?;
        emit(
            &registry,
            SourceText::new(
                contract,
                context,
                self.library.import_path(),
                self.server_name(),
            ),
        )
    }

    /// Write server source pinned to `target_sdk_version`.
    ///
    /// The text is rendered completely before the destination is touched, so
    /// a failed render writes nothing.
    pub fn dump<'a>(
        &self,
        destination: impl Into<Destination<'a>>,
        target_sdk_version: &str,
    ) -> Result<()> {
        let text = self.render(target_sdk_version)?;
        let destination = destination.into();
        info!(
            "dumping {} for mcp {target_sdk_version} to {}",
            self.library.name(),
            destination.describe()
        );
        destination.write_all(&text)
    }

    fn server_name(&self) -> &str {
        self.config
            .server_name
            .as_deref()
            .unwrap_or_else(|| self.library.name())
    }
}

impl fmt::Debug for McpWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpWrap")
            .field("library", &self.library.name())
            .field("config", &self.config)
            .finish()
    }
}
