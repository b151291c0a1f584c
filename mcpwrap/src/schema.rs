//! Schema synthesis.
//!
//! Maps analyzed parameters onto [`CommandSpec`]s. Everything here is a pure
//! function of its input.

use indexmap::IndexMap;

use crate::discovery::CallableInfo;
use crate::library::ParameterKind;
use crate::signature::ParameterInfo;
use crate::spec::{CommandSpec, SchemaEntry, SchemaTag};

const ANNOTATION_PREFIXES: &[&str] = &["typing.", "collections.abc.", "builtins."];

const ARRAY_TYPES: &[&str] = &[
    "list",
    "List",
    "tuple",
    "Tuple",
    "set",
    "Set",
    "frozenset",
    "FrozenSet",
    "Sequence",
    "MutableSequence",
    "Iterable",
    "Collection",
];

const OBJECT_TYPES: &[&str] = &["dict", "Dict", "Mapping", "MutableMapping"];

/// Build the command specification for an analyzed callable.
pub fn synthesize(callable: &CallableInfo, parameters: &[ParameterInfo]) -> CommandSpec {
    let schema: IndexMap<String, SchemaEntry> = parameters
        .iter()
        .map(|param| {
            (
                param.name.clone(),
                SchemaEntry {
                    tag: schema_tag(param.declared_type.as_deref()),
                    required: !param.has_default(),
                },
            )
        })
        .collect();

    CommandSpec {
        name: callable.name.clone(),
        description: describe(callable, parameters),
        parameters: schema,
        positional_only: parameters
            .iter()
            .filter(|param| param.kind == ParameterKind::PositionalOnly)
            .map(|param| param.name.clone())
            .collect(),
    }
}

/// Map a declared annotation to a schema tag.
///
/// Unknown or missing annotations map to [`SchemaTag::String`].
pub fn schema_tag(declared: Option<&str>) -> SchemaTag {
    let Some(annotation) = declared else {
        return SchemaTag::String;
    };

    let mut name = annotation.trim();
    for prefix in ANNOTATION_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
            break;
        }
    }

    match name {
        "int" => return SchemaTag::Integer,
        "float" => return SchemaTag::Number,
        "str" => return SchemaTag::String,
        "bool" => return SchemaTag::Boolean,
        _ => {}
    }

    let base = name.split_once('[').map_or(name, |(base, _)| base).trim();
    if ARRAY_TYPES.contains(&base) {
        SchemaTag::Array
    } else if OBJECT_TYPES.contains(&base) {
        SchemaTag::Object
    } else {
        SchemaTag::String
    }
}

/// Resolve the description of a command.
///
/// Uses the cleaned documentation text when present, otherwise
/// `name(signature)`.
pub fn describe(callable: &CallableInfo, parameters: &[ParameterInfo]) -> String {
    callable
        .doc
        .as_deref()
        .and_then(clean_doc)
        .unwrap_or_else(|| format!("{}({})", callable.name, format_signature(parameters)))
}

/// Render a parameter list with ordinary call-signature punctuation.
///
/// A `/` follows the last positional-only parameter and a bare `*` precedes
/// the first keyword-only one.
pub fn format_signature(parameters: &[ParameterInfo]) -> String {
    let mut parts = Vec::with_capacity(parameters.len() + 2);
    let mut keyword_marker = false;

    for (i, param) in parameters.iter().enumerate() {
        if param.kind == ParameterKind::KeywordOnly && !keyword_marker {
            parts.push("*".to_string());
            keyword_marker = true;
        }

        let part = match (&param.declared_type, &param.default) {
            (Some(ty), Some(default)) => format!("{}: {ty} = {default}", param.name),
            (Some(ty), None) => format!("{}: {ty}", param.name),
            (None, Some(default)) => format!("{}={default}", param.name),
            (None, None) => param.name.clone(),
        };
        parts.push(part);

        let closes_positional = param.kind == ParameterKind::PositionalOnly
            && parameters
                .get(i + 1)
                .is_none_or(|next| next.kind != ParameterKind::PositionalOnly);
        if closes_positional {
            parts.push("/".to_string());
        }
    }

    parts.join(", ")
}

/// Strip documentation text of its common leading indentation.
///
/// Tabs are expanded to 8-column stops first. The first line then loses its
/// leading whitespace, later lines lose the indentation they all share, and
/// blank lines at either end are dropped. Returns `None` for blank text.
pub fn clean_doc(doc: &str) -> Option<String> {
    let expanded: Vec<String> = doc.lines().map(expand_tabs).collect();
    let lines: Vec<&str> = expanded.iter().map(String::as_str).collect();
    let (first, rest) = lines.split_first()?;

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    cleaned.push(first.trim_start());
    for line in rest {
        if line.trim().is_empty() {
            cleaned.push(line.trim_start());
        } else {
            cleaned.push(line.get(margin..).unwrap_or_else(|| line.trim_start()));
        }
    }

    let start = cleaned.iter().position(|line| !line.trim().is_empty())?;
    let end = cleaned
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);

    Some(cleaned[start..=end].join("\n"))
}

fn expand_tabs(line: &str) -> String {
    const TAB_SIZE: usize = 8;

    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::CallableOrigin;
    use pretty_assertions::assert_eq;

    fn param(name: &str, declared: Option<&str>, default: Option<&str>) -> ParameterInfo {
        ParameterInfo {
            name: name.to_string(),
            declared_type: declared.map(str::to_string),
            default: default.map(str::to_string),
            kind: ParameterKind::PositionalOrKeyword,
        }
    }

    fn callable(name: &str, doc: Option<&str>) -> CallableInfo {
        CallableInfo {
            name: name.to_string(),
            parameters: Some(Vec::new()),
            doc: doc.map(str::to_string),
            origin: CallableOrigin::TopLevelFunction,
        }
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(schema_tag(Some("int")), SchemaTag::Integer);
        assert_eq!(schema_tag(Some("float")), SchemaTag::Number);
        assert_eq!(schema_tag(Some("str")), SchemaTag::String);
        assert_eq!(schema_tag(Some("bool")), SchemaTag::Boolean);
        assert_eq!(schema_tag(None), SchemaTag::String);
    }

    #[test]
    fn test_container_tags() {
        assert_eq!(schema_tag(Some("list")), SchemaTag::Array);
        assert_eq!(schema_tag(Some("list[int]")), SchemaTag::Array);
        assert_eq!(schema_tag(Some("typing.Sequence[str]")), SchemaTag::Array);
        assert_eq!(schema_tag(Some("tuple[int, ...]")), SchemaTag::Array);
        assert_eq!(schema_tag(Some("dict[str, int]")), SchemaTag::Object);
        assert_eq!(
            schema_tag(Some("collections.abc.Mapping")),
            SchemaTag::Object
        );
    }

    #[test]
    fn test_unmapped_annotation_falls_back_to_string() {
        assert_eq!(schema_tag(Some("Optional[int]")), SchemaTag::String);
        assert_eq!(schema_tag(Some("random.Random")), SchemaTag::String);
        assert_eq!(schema_tag(Some("complex")), SchemaTag::String);
    }

    #[test]
    fn test_required_mirrors_default() {
        let spec = synthesize(
            &callable("sample", None),
            &[
                param("population", Some("list"), None),
                param("k", Some("int"), Some("1")),
            ],
        );
        assert!(spec.parameters["population"].required);
        assert!(!spec.parameters["k"].required);
    }

    #[test]
    fn test_fallback_description_uses_signature() {
        let params = [
            param("a", Some("int"), None),
            param("b", None, Some("2")),
            param("c", Some("str"), Some("'x'")),
            ParameterInfo {
                kind: ParameterKind::KeywordOnly,
                ..param("d", None, None)
            },
        ];
        assert_eq!(
            describe(&callable("mix", None), &params),
            "mix(a: int, b=2, c: str = 'x', *, d)"
        );
    }

    #[test]
    fn test_fallback_description_marks_positional_only() {
        let positional = |name| ParameterInfo {
            kind: ParameterKind::PositionalOnly,
            ..param(name, None, None)
        };
        assert_eq!(
            describe(&callable("pow", None), &[positional("x"), positional("y")]),
            "pow(x, y, /)"
        );

        let params = [
            positional("x"),
            param("base", Some("int"), Some("10")),
            ParameterInfo {
                kind: ParameterKind::KeywordOnly,
                ..param("strict", None, Some("False"))
            },
        ];
        assert_eq!(
            describe(&callable("parse", None), &params),
            "parse(x, /, base: int = 10, *, strict=False)"
        );
    }

    #[test]
    fn test_positional_only_names_are_recorded() {
        let spec = synthesize(
            &callable("pow", None),
            &[
                ParameterInfo {
                    kind: ParameterKind::PositionalOnly,
                    ..param("x", Some("float"), None)
                },
                param("y", Some("float"), None),
            ],
        );
        assert_eq!(spec.positional_only, vec!["x"]);
        assert!(spec.parameters["x"].required);
    }

    #[test]
    fn test_fallback_for_blank_doc() {
        assert_eq!(describe(&callable("foo", Some("   \n\t")), &[]), "foo()");
    }

    #[test]
    fn test_doc_is_dedented() {
        let doc = "Choose a random element.\n\n        If the sequence is empty, raises IndexError.\n          Indented.\n    ";
        assert_eq!(
            clean_doc(doc).unwrap(),
            "Choose a random element.\n\nIf the sequence is empty, raises IndexError.\n  Indented."
        );
    }

    #[test]
    fn test_doc_tabs_expand_before_dedent() {
        assert_eq!(
            clean_doc("Summary.\n\tTab line.\n        Space line.").unwrap(),
            "Summary.\nTab line.\nSpace line."
        );
        assert_eq!(
            clean_doc("Summary.\n    \tNested.\n        Flat.").unwrap(),
            "Summary.\nNested.\nFlat."
        );
    }

    #[test]
    fn test_doc_leading_blank_lines_dropped() {
        assert_eq!(
            clean_doc("\n    Summary line.\n    Detail.\n").unwrap(),
            "Summary line.\nDetail."
        );
    }
}
