//! Signature analysis.

use std::collections::HashSet;

use crate::discovery::CallableInfo;
use crate::error::{Result, WrapError};
use crate::library::ParameterKind;

/// A parameter as seen by the schema synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Parameter name.
    pub name: String,

    /// Declared type annotation, verbatim.
    pub declared_type: Option<String>,

    /// Declared default, verbatim.
    pub default: Option<String>,

    /// How the parameter binds arguments.
    pub kind: ParameterKind,
}

impl ParameterInfo {
    /// Whether the signature declares a default for this parameter.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Extract the ordered parameters of a callable from its declared signature.
///
/// Fails for callables whose parameters cannot be described: missing
/// signatures, variadic parameters, and empty or repeated parameter names.
pub fn analyze(callable: &CallableInfo) -> Result<Vec<ParameterInfo>> {
    let raw = callable
        .parameters
        .as_ref()
        .ok_or_else(|| WrapError::unsignaturable(&callable.name, "signature is not available"))?;

    let mut seen = HashSet::new();
    let mut parameters = Vec::with_capacity(raw.len());

    for param in raw {
        match param.kind {
            ParameterKind::VarPositional => {
                return Err(WrapError::unsignaturable(
                    &callable.name,
                    format!("variadic positional parameter `*{}`", param.name),
                ));
            }
            ParameterKind::VarKeyword => {
                return Err(WrapError::unsignaturable(
                    &callable.name,
                    format!("variadic keyword parameter `**{}`", param.name),
                ));
            }
            ParameterKind::PositionalOnly
            | ParameterKind::PositionalOrKeyword
            | ParameterKind::KeywordOnly => {}
        }

        if param.name.is_empty() {
            return Err(WrapError::unsignaturable(
                &callable.name,
                "parameter with an empty name",
            ));
        }
        if !seen.insert(param.name.as_str()) {
            return Err(WrapError::unsignaturable(
                &callable.name,
                format!("parameter `{}` is declared twice", param.name),
            ));
        }

        parameters.push(ParameterInfo {
            name: param.name.clone(),
            declared_type: param.annotation.clone(),
            default: param.default.clone(),
            kind: param.kind,
        });
    }

    Ok(parameters)
}
