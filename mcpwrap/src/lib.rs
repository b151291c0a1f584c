//! # mcpwrap
//!
//! Exposes a library's public callables as MCP commands.
//!
//! A library is inspected once per operation and turned into a
//! [`CommandRegistry`]: one [`CommandSpec`] per public top-level function,
//! with a name, a description and a JSON schema for its parameters. The
//! registry is then realized in one of two ways:
//!
//! - **Live**: commands are registered with the `rmcp` server runtime and
//!   served over stdio, forwarding each call to the library by keyword.
//! - **Source**: commands are rendered into a standalone server module
//!   pinned to one release of the `mcp` SDK, preceded by a metadata header.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             McpWrap                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  Library ──► discover ──► analyze ──► synthesize ──► Registry    │
//! │                                                         │        │
//! │                                          ┌──────────────┤        │
//! │                                          ▼              ▼        │
//! │                            LiveRegistration      SourceText      │
//! │                                   │                 │    ▲       │
//! │                                   ▼                 ▼    │       │
//! │                              stdio serve     Destination │       │
//! │                                            SdkVersionPolicy      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use mcpwrap::{FunctionDef, McpWrap, RawParameter, StaticLibrary};
//! use serde_json::Value;
//!
//! # fn main() -> mcpwrap::Result<()> {
//! let library = StaticLibrary::builder("calc")
//!     .function(
//!         FunctionDef::new("add", |args| {
//!             let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
//!             let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
//!             Ok(Value::from(a + b))
//!         })
//!         .param(RawParameter::new("a").typed("int"))
//!         .param(RawParameter::new("b").typed("int"))
//!         .doc("Add two integers."),
//!     )
//!     .build();
//!
//! McpWrap::from_library(library).dump("calc_server.py", "1.6.0")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod library;
pub mod live;
pub mod manifest;
pub mod output;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod sink;
pub mod source;
pub mod spec;
pub mod version;
pub mod wrapper;

pub use config::WrapConfig;
pub use context::GenerationContext;
pub use discovery::{CallableInfo, CallableOrigin, discover};
pub use error::{Result, WrapError};
pub use library::{
    Arguments, FunctionDef, FunctionMeta, Library, LibraryHandle, Member, MemberKind,
    ParameterKind, RawParameter, StaticLibrary,
};
pub use live::{LiveRegistration, LiveServer, ServerIdentity};
pub use manifest::{LibraryManifest, ManifestMember, ManifestMemberKind};
pub use output::Destination;
pub use registry::CommandRegistry;
pub use signature::{ParameterInfo, analyze};
pub use sink::{CommandSink, emit};
pub use source::SourceText;
pub use spec::{CommandSpec, SchemaEntry, SchemaTag};
pub use version::{SdkContract, SdkVersionPolicy};
pub use wrapper::McpWrap;
