//! Library metadata providers.
//!
//! A [`Library`] describes the members of a wrapped library: which of them are
//! callable, what their declared signatures look like, and how to invoke them
//! by keyword. The pipeline never inspects anything beyond this interface.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keyword arguments forwarded to a library callable.
pub type Arguments = serde_json::Map<String, Value>;

/// Shared, read-only reference to a wrapped library.
pub type LibraryHandle = Arc<dyn Library>;

/// Handler invoked when a live command is called.
pub type Handler = Arc<dyn Fn(&Arguments) -> anyhow::Result<Value> + Send + Sync>;

/// Metadata provider for a wrapped library.
pub trait Library: Send + Sync {
    /// Name the library is known by (also its import path by default).
    fn name(&self) -> &str;

    /// Declared library version, if the library publishes one.
    fn version(&self) -> Option<&str>;

    /// Version of the runtime hosting the library.
    fn runtime_version(&self) -> &str;

    /// Module path used to import the library from generated source.
    fn import_path(&self) -> &str {
        self.name()
    }

    /// All top-level members, in the provider's enumeration order.
    fn members(&self) -> Vec<Member>;

    /// Invoke the named callable with keyword arguments.
    fn invoke(&self, name: &str, arguments: &Arguments) -> anyhow::Result<Value>;
}

/// A top-level member of a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Exposed name.
    pub name: String,

    /// What kind of member this is.
    pub kind: MemberKind,
}

impl Member {
    /// Create a function member.
    pub fn function(name: impl Into<String>, meta: FunctionMeta) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Function(meta),
        }
    }

    /// Create a non-callable member of the given kind.
    pub fn other(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether the member can be called directly.
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, MemberKind::Function(_))
    }
}

/// Kind of library member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// A top-level function.
    Function(FunctionMeta),

    /// A class; its methods are never traversed.
    Class,

    /// A submodule; its members are never traversed.
    Module,

    /// Any other attribute (constants, instances).
    Value,
}

/// Static description of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMeta {
    /// Declared parameters in signature order, or `None` when the callable
    /// cannot be introspected.
    pub signature: Option<Vec<RawParameter>>,

    /// Documentation text.
    pub doc: Option<String>,
}

impl FunctionMeta {
    /// Metadata for a function with an empty parameter list.
    pub fn new() -> Self {
        Self {
            signature: Some(Vec::new()),
            doc: None,
        }
    }

    /// Metadata for a callable whose signature is unavailable.
    pub fn opaque() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: RawParameter) -> Self {
        self.signature.get_or_insert_with(Vec::new).push(param);
        self
    }

    /// Set the documentation text.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A parameter exactly as the callable declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Parameter name.
    pub name: String,

    /// How the parameter binds arguments.
    #[serde(default)]
    pub kind: ParameterKind,

    /// Verbatim type annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    /// Verbatim rendering of the default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl RawParameter {
    /// Create an unannotated positional-or-keyword parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::PositionalOrKeyword,
            annotation: None,
            default: None,
        }
    }

    /// Set the type annotation.
    pub fn typed(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Set the default value rendering.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the parameter kind.
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for a keyword-only parameter.
    pub fn keyword_only(self) -> Self {
        self.with_kind(ParameterKind::KeywordOnly)
    }
}

/// How a parameter binds call arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    #[default]
    PositionalOrKeyword,
    KeywordOnly,
    PositionalOnly,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
}

impl ParameterKind {
    /// Whether the parameter collects an arbitrary number of arguments.
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }
}

/// A function registered on a [`StaticLibrary`].
#[derive(Clone)]
pub struct FunctionDef {
    name: String,
    meta: FunctionMeta,
    handler: Handler,
}

impl FunctionDef {
    /// Create a function with the given handler and no parameters.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            meta: FunctionMeta::new(),
            handler: Arc::new(handler),
        }
    }

    /// Append a parameter.
    pub fn param(mut self, param: RawParameter) -> Self {
        self.meta = self.meta.with_param(param);
        self
    }

    /// Set the documentation text.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.meta = self.meta.with_doc(doc);
        self
    }

    /// Mark the signature as unavailable.
    pub fn opaque(mut self) -> Self {
        self.meta.signature = None;
        self
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Function(FunctionDef),
    Other(Member),
}

/// A library described and implemented in Rust.
///
/// Members keep their insertion order; functions carry handlers so the
/// library can be served live.
#[derive(Debug, Clone)]
pub struct StaticLibrary {
    name: String,
    version: Option<String>,
    runtime_version: String,
    import_path: Option<String>,
    entries: Vec<Entry>,
}

impl StaticLibrary {
    /// Start describing a library.
    pub fn builder(name: impl Into<String>) -> StaticLibraryBuilder {
        StaticLibraryBuilder {
            library: Self {
                name: name.into(),
                version: None,
                runtime_version: "unknown".to_string(),
                import_path: None,
                entries: Vec::new(),
            },
        }
    }

    fn handler(&self, name: &str) -> Option<&Handler> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Function(def) if def.name == name => Some(&def.handler),
            _ => None,
        })
    }
}

impl Library for StaticLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    fn import_path(&self) -> &str {
        self.import_path.as_deref().unwrap_or(&self.name)
    }

    fn members(&self) -> Vec<Member> {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Function(def) => Member::function(def.name.clone(), def.meta.clone()),
                Entry::Other(member) => member.clone(),
            })
            .collect()
    }

    fn invoke(&self, name: &str, arguments: &Arguments) -> anyhow::Result<Value> {
        let handler = self
            .handler(name)
            .ok_or_else(|| anyhow::anyhow!("{} has no callable named `{name}`", self.name))?;
        handler(arguments)
    }
}

/// Builder for [`StaticLibrary`].
#[derive(Debug)]
pub struct StaticLibraryBuilder {
    library: StaticLibrary,
}

impl StaticLibraryBuilder {
    /// Set the library version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.library.version = Some(version.into());
        self
    }

    /// Set the host runtime version reported in generated headers.
    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.library.runtime_version = version.into();
        self
    }

    /// Set the import path used by generated source.
    pub fn import_path(mut self, path: impl Into<String>) -> Self {
        self.library.import_path = Some(path.into());
        self
    }

    /// Add a function.
    pub fn function(mut self, def: FunctionDef) -> Self {
        self.library.entries.push(Entry::Function(def));
        self
    }

    /// Add a class member.
    pub fn class(self, name: impl Into<String>) -> Self {
        self.other(name, MemberKind::Class)
    }

    /// Add a submodule member.
    pub fn module(self, name: impl Into<String>) -> Self {
        self.other(name, MemberKind::Module)
    }

    /// Add a plain value member.
    pub fn value(self, name: impl Into<String>) -> Self {
        self.other(name, MemberKind::Value)
    }

    fn other(mut self, name: impl Into<String>, kind: MemberKind) -> Self {
        self.library.entries.push(Entry::Other(Member::other(name, kind)));
        self
    }

    /// Finish the library.
    pub fn build(self) -> StaticLibrary {
        self.library
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> StaticLibrary {
        StaticLibrary::builder("calc")
            .version("2.1.0")
            .function(
                FunctionDef::new("add", |args| {
                    let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
                    let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
                    Ok(Value::from(a + b))
                })
                .param(RawParameter::new("a").typed("int"))
                .param(RawParameter::new("b").typed("int").with_default("0")),
            )
            .value("PI")
            .class("Calculator")
            .build()
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let names: Vec<_> = sample().members().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["add", "PI", "Calculator"]);
    }

    #[test]
    fn test_invoke_forwards_keywords() {
        let mut args = Arguments::new();
        args.insert("a".to_string(), Value::from(2));
        args.insert("b".to_string(), Value::from(3));
        assert_eq!(sample().invoke("add", &args).unwrap(), Value::from(5));
    }

    #[test]
    fn test_invoke_unknown_callable() {
        let err = sample().invoke("PI", &Arguments::new()).unwrap_err();
        assert!(err.to_string().contains("no callable named `PI`"));
    }

    #[test]
    fn test_import_path_defaults_to_name() {
        let library = sample();
        assert_eq!(library.import_path(), "calc");
        assert_eq!(library.runtime_version(), "unknown");
    }
}
