//! Source-text emission.
//!
//! Renders a command registry as a standalone server module for a pinned
//! `mcp` SDK release. The module only imports the SDK and the wrapped
//! library; it carries one registration statement per command.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::context::GenerationContext;
use crate::error::Result;
use crate::sink::CommandSink;
use crate::spec::CommandSpec;
use crate::version::SdkContract;

/// Literals for one registration statement.
#[derive(Debug, Clone, Serialize)]
struct RegistrationLiterals {
    name: String,
    description: String,
    schema: String,
    positional: Option<String>,
}

/// Sink that renders commands into server source text.
#[derive(Debug)]
pub struct SourceText<'a> {
    contract: &'a SdkContract,
    context: &'a GenerationContext,
    import_path: String,
    server_name: String,
    registrations: Vec<RegistrationLiterals>,
}

impl<'a> SourceText<'a> {
    /// Create a sink rendering with the given contract and header context.
    pub fn new(
        contract: &'a SdkContract,
        context: &'a GenerationContext,
        import_path: impl Into<String>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            contract,
            context,
            import_path: import_path.into(),
            server_name: server_name.into(),
            registrations: Vec::new(),
        }
    }
}

impl CommandSink for SourceText<'_> {
    type Output = String;

    fn accept(&mut self, command: &CommandSpec) -> Result<()> {
        self.registrations.push(RegistrationLiterals {
            name: string_literal(&command.name)?,
            description: string_literal(&command.description)?,
            schema: serde_json::to_string(&command.input_schema())?,
            positional: if command.positional_only.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&command.positional_only)?)
            },
        });
        Ok(())
    }

    fn finish(self) -> Result<String> {
        let mut tera = Tera::default();
        tera.add_raw_template(self.contract.template_name(), self.contract.template())?;

        let mut context = Context::new();
        context.insert("sdk_version", self.contract.version());
        context.insert("import_path", &self.import_path);
        context.insert("server_name", &string_literal(&self.server_name)?);
        context.insert("commands", &self.registrations);

        let body = tera.render(self.contract.template_name(), &context)?;
        debug!(
            "rendered {} registrations for mcp {}",
            self.registrations.len(),
            self.contract.version()
        );

        let mut text = self.context.header();
        text.push('\n');
        text.push_str(&body);
        Ok(text)
    }
}

/// Quote a string as a source literal.
///
/// JSON string syntax is a subset of the target language's string literal
/// syntax, so the JSON encoding is used verbatim.
fn string_literal(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
