//! Command registry.
//!
//! The `CommandRegistry` is the ordered, deduplicated set of commands derived
//! from one library snapshot. Both emission strategies read from it.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::discovery::discover;
use crate::error::{Result, WrapError};
use crate::library::Library;
use crate::schema::synthesize;
use crate::signature::analyze;
use crate::spec::CommandSpec;

/// Ordered collection of command specifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    /// Commands in discovery order.
    commands: Vec<CommandSpec>,

    /// Position of each command by name.
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Run discovery, analysis and synthesis against a library.
    pub fn build(library: &dyn Library) -> Result<Self> {
        let specs = discover(library)
            .into_iter()
            .map(|callable| {
                let parameters = analyze(&callable)?;
                let spec = synthesize(&callable, &parameters);
                debug!(
                    "synthesized command {} ({} parameters)",
                    spec.name,
                    spec.parameters.len()
                );
                Ok(spec)
            })
            .collect::<Result<Vec<_>>>()?;

        let registry = Self::from_specs(specs)?;
        info!(
            "built {} commands for library {}",
            registry.len(),
            library.name()
        );
        Ok(registry)
    }

    /// Collect specifications, failing on empty or repeated names.
    pub fn from_specs(specs: impl IntoIterator<Item = CommandSpec>) -> Result<Self> {
        let mut registry = Self::default();

        for spec in specs {
            if spec.name.is_empty() {
                return Err(WrapError::unsignaturable(
                    "<unnamed>",
                    "callable has an empty name",
                ));
            }
            if registry.index.contains_key(&spec.name) {
                return Err(WrapError::DuplicateCommandName(spec.name));
            }
            registry
                .index
                .insert(spec.name.clone(), registry.commands.len());
            registry.commands.push(spec);
        }

        Ok(registry)
    }

    /// Get a command by name.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    /// Iterate over commands in order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Command names in order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SHA-256 of the registry's canonical JSON form, hex encoded.
    ///
    /// Equal digests mean byte-identical ordering and content.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_vec(&self.commands)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl<'a> IntoIterator for &'a CommandRegistry {
    type Item = &'a CommandSpec;
    type IntoIter = std::slice::Iter<'a, CommandSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
