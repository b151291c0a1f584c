//! Live registration.
//!
//! Registers commands with the `rmcp` server runtime and dispatches calls to
//! the wrapped library by keyword.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, WrapError};
use crate::library::LibraryHandle;
use crate::sink::CommandSink;
use crate::spec::CommandSpec;

/// Identity the live server reports during initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    /// Server name.
    pub name: String,

    /// Server version.
    pub version: String,

    /// Usage instructions for clients.
    pub instructions: Option<String>,
}

/// Sink that turns commands into registered MCP tools.
pub struct LiveRegistration {
    library: LibraryHandle,
    identity: ServerIdentity,
    tools: Vec<Tool>,
}

impl LiveRegistration {
    /// Create a sink bound to a library.
    pub fn new(library: LibraryHandle, identity: ServerIdentity) -> Self {
        Self {
            library,
            identity,
            tools: Vec::new(),
        }
    }
}

impl fmt::Debug for LiveRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveRegistration")
            .field("library", &self.library.name())
            .field("identity", &self.identity)
            .field("tools", &self.tools.len())
            .finish()
    }
}

impl CommandSink for LiveRegistration {
    type Output = LiveServer;

    fn accept(&mut self, command: &CommandSpec) -> Result<()> {
        debug!("registering live command {}", command.name);
        self.tools.push(Tool::new(
            command.name.clone(),
            command.description.clone(),
            Arc::new(command.input_schema()),
        ));
        Ok(())
    }

    fn finish(self) -> Result<LiveServer> {
        let names = self.tools.iter().map(|t| t.name.to_string()).collect();
        Ok(LiveServer {
            library: self.library,
            identity: Arc::new(self.identity),
            tools: Arc::new(self.tools),
            names: Arc::new(names),
        })
    }
}

/// MCP server exposing a library's commands.
#[derive(Clone)]
pub struct LiveServer {
    library: LibraryHandle,
    identity: Arc<ServerIdentity>,
    tools: Arc<Vec<Tool>>,
    names: Arc<HashSet<String>>,
}

impl LiveServer {
    /// Registered tools, in registry order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Server identity.
    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Call a registered command, forwarding arguments by keyword.
    ///
    /// Unknown names and failures raised by the callable are both reported
    /// as error results, matching the generated server.
    pub fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        if !self.names.contains(name) {
            warn!("call to unknown tool {name}");
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "unknown tool: {name}"
            ))]));
        }

        let arguments = arguments.unwrap_or_default();
        match self.library.invoke(name, &arguments) {
            Ok(value) => Ok(CallToolResult::success(vec![Content::text(render_value(
                &value,
            ))])),
            Err(err) => {
                warn!("command {name} failed: {err:#}");
                Ok(CallToolResult::error(vec![Content::text(format!("{err:#}"))]))
            }
        }
    }

    /// Serve over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        info!(
            "serving {} commands as {} (stdio transport)",
            self.tools.len(),
            self.identity.name
        );
        let service = self
            .serve(rmcp::transport::io::stdio())
            .await
            .map_err(|e| WrapError::Serve(e.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|e| WrapError::Serve(e.to_string()))?;
        Ok(())
    }
}

impl fmt::Debug for LiveServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveServer")
            .field("library", &self.library.name())
            .field("identity", &self.identity)
            .field("tools", &self.tools.len())
            .finish()
    }
}

impl ServerHandler for LiveServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.identity.name.clone(),
                title: None,
                version: self.identity.version.clone(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: self.identity.instructions.clone(),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments)
    }
}

/// Text form of a return value: strings verbatim, everything else as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
