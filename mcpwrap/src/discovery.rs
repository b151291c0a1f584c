//! Callable discovery.
//!
//! Selects the public top-level functions of a library.

use tracing::{debug, trace};

use crate::library::{Library, MemberKind, RawParameter};

/// Where a discovered callable lives in its library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableOrigin {
    TopLevelFunction,
}

/// A function selected for wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableInfo {
    /// Exposed name.
    pub name: String,

    /// Declared parameters, or `None` if the signature is unavailable.
    pub parameters: Option<Vec<RawParameter>>,

    /// Raw documentation text.
    pub doc: Option<String>,

    /// Where the callable was found.
    pub origin: CallableOrigin,
}

/// Enumerate the eligible callables of a library, sorted by name.
///
/// Non-callable members and underscore-prefixed names are skipped. Callables
/// are never invoked.
pub fn discover(library: &dyn Library) -> Vec<CallableInfo> {
    let mut callables: Vec<CallableInfo> = library
        .members()
        .into_iter()
        .filter_map(|member| {
            if member.name.starts_with('_') {
                trace!("skipping private member {}", member.name);
                return None;
            }
            match member.kind {
                MemberKind::Function(meta) => Some(CallableInfo {
                    name: member.name,
                    parameters: meta.signature,
                    doc: meta.doc,
                    origin: CallableOrigin::TopLevelFunction,
                }),
                _ => {
                    trace!("skipping non-callable member {}", member.name);
                    None
                }
            }
        })
        .collect();

    callables.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(
        "discovered {} callables in {}",
        callables.len(),
        library.name()
    );
    callables
}
