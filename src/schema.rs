//! Declarative shape validation for loosely-typed documents.
//!
//! Configuration exports and `action.yml` arrive as untyped trees. A [`Shape`]
//! describes what the tree must look like; [`validate`] walks the whole tree and
//! reports every violation with a dotted path, and [`decode`] produces a typed
//! value once the tree is known to be well-formed.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Expected shape of a value.
#[derive(Debug)]
pub enum Shape {
    /// Any string.
    String,
    /// A boolean.
    Bool,
    /// A string, number or boolean.
    Scalar,
    /// Exactly this string.
    Literal(&'static str),
    /// One string out of a closed set.
    OneOf(&'static [&'static str]),
    /// A string matching a pattern; the label describes the expected format.
    Pattern(&'static LazyLock<Regex>, &'static str),
    /// A list whose items all have the given shape.
    Array(&'static Shape),
    /// A mapping from arbitrary keys to values of the given shape.
    Record(&'static Shape),
    /// A mapping with known fields. Unknown keys are tolerated.
    Struct(&'static [Field]),
}

/// A named field of a [`Shape::Struct`].
#[derive(Debug)]
pub struct Field {
    /// Key in the mapping
    pub name: &'static str,
    /// Shape of the value
    pub shape: Shape,
    /// Whether the key must be present (and not null)
    pub required: bool,
}

impl Field {
    /// A field that must be present.
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// A field that may be absent or null.
    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// Dotted path to the offending value (empty for the root)
    pub path: String,
    /// What is wrong with it
    pub message: String,
}

impl SchemaIssue {
    /// Creates an issue at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validates `value` against `shape`, collecting every violation.
pub fn validate(shape: &Shape, value: &Value) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    check(shape, value, "", &mut issues);
    issues
}

/// Validates `value` and deserializes it into `T`.
///
/// The shape decides validity; deserialization only runs on a clean tree.
pub fn decode<T: DeserializeOwned>(shape: &Shape, value: Value) -> Result<T, Vec<SchemaIssue>> {
    let issues = validate(shape, &value);
    if !issues.is_empty() {
        return Err(issues);
    }
    serde_json::from_value(value).map_err(|e| vec![SchemaIssue::new("", e.to_string())])
}

/// Short human-readable name of a value's type.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn mismatch(expected: &str, value: &Value, path: &str, issues: &mut Vec<SchemaIssue>) {
    issues.push(SchemaIssue::new(
        path,
        format!("expected {expected}, got {}", kind_of(value)),
    ));
}

fn check(shape: &Shape, value: &Value, path: &str, issues: &mut Vec<SchemaIssue>) {
    match shape {
        Shape::String => {
            if !value.is_string() {
                mismatch("string", value, path, issues);
            }
        }
        Shape::Bool => {
            if !value.is_boolean() {
                mismatch("boolean", value, path, issues);
            }
        }
        Shape::Scalar => {
            if !(value.is_string() || value.is_number() || value.is_boolean()) {
                mismatch("string, number or boolean", value, path, issues);
            }
        }
        Shape::Literal(expected) => match value.as_str() {
            Some(actual) if actual == *expected => {}
            Some(actual) => issues.push(SchemaIssue::new(
                path,
                format!("expected \"{expected}\", got \"{actual}\""),
            )),
            None => mismatch(&format!("\"{expected}\""), value, path, issues),
        },
        Shape::OneOf(allowed) => match value.as_str() {
            Some(actual) if allowed.contains(&actual) => {}
            Some(actual) if allowed.len() <= 12 => issues.push(SchemaIssue::new(
                path,
                format!("\"{actual}\" is not one of: {}", allowed.join(", ")),
            )),
            Some(actual) => issues.push(SchemaIssue::new(
                path,
                format!("\"{actual}\" is not an allowed value"),
            )),
            None => mismatch("string", value, path, issues),
        },
        Shape::Pattern(regex, label) => match value.as_str() {
            Some(actual) if regex.is_match(actual) => {}
            Some(actual) => issues.push(SchemaIssue::new(
                path,
                format!("\"{actual}\" is not a valid {label}"),
            )),
            None => mismatch("string", value, path, issues),
        },
        Shape::Array(item) => match value.as_array() {
            Some(items) => {
                for (index, element) in items.iter().enumerate() {
                    check(item, element, &format!("{path}[{index}]"), issues);
                }
            }
            None => mismatch("array", value, path, issues),
        },
        Shape::Record(item) => match value.as_object() {
            Some(map) => {
                for (key, element) in map {
                    check(item, element, &child_path(path, key), issues);
                }
            }
            None => mismatch("mapping", value, path, issues),
        },
        Shape::Struct(fields) => match value.as_object() {
            Some(map) => {
                for field in fields.iter() {
                    let field_path = child_path(path, field.name);
                    match map.get(field.name) {
                        None | Some(Value::Null) => {
                            if field.required {
                                issues.push(SchemaIssue::new(field_path, "is required"));
                            }
                        }
                        Some(element) => check(&field.shape, element, &field_path, issues),
                    }
                }
            }
            None => mismatch("mapping", value, path, issues),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    static TAG: Shape = Shape::Struct(&[
        Field::required("label", Shape::String),
        Field::optional("weight", Shape::Scalar),
    ]);

    static DOC: Shape = Shape::Struct(&[
        Field::required("kind", Shape::Literal("doc")),
        Field::required("title", Shape::String),
        Field::optional("draft", Shape::Bool),
        Field::optional("color", Shape::OneOf(&["red", "blue"])),
        Field::optional("tags", Shape::Array(&TAG)),
        Field::optional("meta", Shape::Record(&Shape::String)),
    ]);

    #[derive(Debug, Deserialize)]
    struct Doc {
        title: String,
        draft: Option<bool>,
    }

    #[test]
    fn valid_document_has_no_issues() {
        let value = json!({
            "kind": "doc",
            "title": "Hello",
            "draft": false,
            "color": "red",
            "tags": [{"label": "a", "weight": 2}],
            "meta": {"owner": "me"},
            "extra": 42
        });
        assert!(validate(&DOC, &value).is_empty());
    }

    #[test]
    fn collects_every_violation() {
        let value = json!({
            "kind": "note",
            "draft": "yes",
            "color": "green",
            "tags": [{"weight": [1]}],
            "meta": {"owner": 3}
        });
        let issues = validate(&DOC, &value);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "kind",
                "title",
                "draft",
                "color",
                "tags[0].label",
                "tags[0].weight",
                "meta.owner"
            ]
        );
        assert_eq!(issues[0].message, "expected \"doc\", got \"note\"");
        assert_eq!(issues[1].message, "is required");
        assert_eq!(issues[3].message, "\"green\" is not one of: red, blue");
    }

    #[test]
    fn null_counts_as_absent() {
        let value = json!({"kind": "doc", "title": null, "draft": null});
        let issues = validate(&DOC, &value);
        assert_eq!(issues, vec![SchemaIssue::new("title", "is required")]);
    }

    #[test]
    fn root_type_mismatch() {
        let issues = validate(&DOC, &json!([1, 2]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "expected mapping, got array");
    }

    #[test]
    fn decode_returns_typed_value() {
        let doc: Doc = decode(&DOC, json!({"kind": "doc", "title": "T"})).expect("valid doc");
        assert_eq!(doc.title, "T");
        assert_eq!(doc.draft, None);

        let err = decode::<Doc>(&DOC, json!({"kind": "doc"})).expect_err("missing title");
        assert_eq!(err.len(), 1);
    }
}
