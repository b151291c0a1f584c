//! Metadata-only libraries described by a manifest file.
//!
//! A manifest records what a library looks like without linking its code, so
//! it can drive source generation but not live serving.
//!
//! ```toml
//! name = "random"
//! runtime_version = "3.12.4"
//!
//! [[members]]
//! name = "randint"
//! doc = "Return a random integer N such that a <= N <= b."
//! parameters = [
//!     { name = "a", annotation = "int" },
//!     { name = "b", annotation = "int" },
//! ]
//!
//! [[members]]
//! name = "Random"
//! kind = "class"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, WrapError};
use crate::library::{Arguments, FunctionMeta, Library, Member, MemberKind, RawParameter};

/// Library description loaded from TOML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryManifest {
    /// Library name.
    pub name: String,

    /// Published library version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Host runtime version.
    #[serde(default = "unknown_runtime")]
    pub runtime_version: String,

    /// Import path, when it differs from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,

    /// Top-level members in enumeration order.
    #[serde(default)]
    pub members: Vec<ManifestMember>,
}

fn unknown_runtime() -> String {
    "unknown".to_string()
}

fn introspectable_default() -> bool {
    true
}

/// One member entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMember {
    pub name: String,

    #[serde(default)]
    pub kind: ManifestMemberKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RawParameter>,

    /// `false` when the function's signature could not be recorded.
    #[serde(default = "introspectable_default")]
    pub introspectable: bool,
}

/// Member kinds a manifest can declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestMemberKind {
    #[default]
    Function,
    Class,
    Module,
    Value,
}

impl LibraryManifest {
    /// Parse a TOML manifest.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse a JSON manifest.
    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a manifest, choosing the format by extension (`.json` or TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| WrapError::Manifest {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let manifest = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content).map_err(|e| invalid(e.to_string()))?
        } else {
            Self::from_toml_str(&content).map_err(|e| invalid(e.to_string()))?
        };

        debug!(
            "loaded manifest for {} ({} members)",
            manifest.name,
            manifest.members.len()
        );
        Ok(manifest)
    }
}

impl Library for LibraryManifest {
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
        self.members
            .iter()
            .map(|member| {
                let kind = match member.kind {
                    ManifestMemberKind::Function => MemberKind::Function(FunctionMeta {
                        signature: member.introspectable.then(|| member.parameters.clone()),
                        doc: member.doc.clone(),
                    }),
                    ManifestMemberKind::Class => MemberKind::Class,
                    ManifestMemberKind::Module => MemberKind::Module,
                    ManifestMemberKind::Value => MemberKind::Value,
                };
                Member::other(member.name.clone(), kind)
            })
            .collect()
    }

    fn invoke(&self, name: &str, _arguments: &Arguments) -> anyhow::Result<Value> {
        anyhow::bail!(
            "{} is described by a manifest only; `{name}` cannot be invoked",
            self.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ParameterKind;
    use crate::registry::CommandRegistry;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const RANDOM: &str = r#"
name = "random"
runtime_version = "3.12.4"

[[members]]
name = "randint"
doc = "Return a random integer N such that a <= N <= b."
parameters = [
    { name = "a", annotation = "int" },
    { name = "b", annotation = "int" },
]

[[members]]
name = "sample"
parameters = [
    { name = "population" },
    { name = "k" },
    { name = "counts", kind = "keyword_only", default = "None" },
]

[[members]]
name = "Random"
kind = "class"

[[members]]
name = "_inst"
kind = "value"
"#;

    #[test]
    fn test_toml_manifest_builds_registry() {
        let manifest = LibraryManifest::from_toml_str(RANDOM).unwrap();
        let registry = CommandRegistry::build(&manifest).unwrap();

        assert_eq!(registry.names(), vec!["randint", "sample"]);
        assert_eq!(
            registry.get("sample").unwrap().description,
            "sample(population, k, *, counts=None)"
        );
        assert_eq!(manifest.version(), None);
    }

    #[test]
    fn test_parameter_kinds_parse() {
        let manifest = LibraryManifest::from_toml_str(RANDOM).unwrap();
        assert_eq!(
            manifest.members[1].parameters[2].kind,
            ParameterKind::KeywordOnly
        );
    }

    #[test]
    fn test_opaque_member() {
        let manifest = LibraryManifest::from_json_str(
            r#"{"name": "m", "members": [{"name": "f", "introspectable": false}]}"#,
        )
        .unwrap();
        assert!(matches!(
            CommandRegistry::build(&manifest),
            Err(WrapError::UnsignaturableCallable { ref callable, .. }) if callable == "f"
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lib.json");
        std::fs::write(&path, r#"{"name": "m", "version": "1.0"}"#).unwrap();

        let manifest = LibraryManifest::load(&path).unwrap();
        assert_eq!(manifest.version(), Some("1.0"));
        assert_eq!(manifest.runtime_version(), "unknown");
    }

    #[test]
    fn test_load_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "name = ").unwrap();

        let err = LibraryManifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_invoke_is_refused() {
        let manifest = LibraryManifest::from_toml_str(RANDOM).unwrap();
        assert!(manifest.invoke("randint", &Arguments::new()).is_err());
    }
}
