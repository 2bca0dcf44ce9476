//! Typed `action.yml` model and its validation shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::branding::{BRANDING_COLORS, BRANDING_ICONS};
use crate::schema::{Field, Shape};

/// The only `runs.using` value this tool bundles for.
pub const SUPPORTED_RUNTIME: &str = "node24";

/// Parsed `action.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionManifest {
    /// Action name
    pub name: String,
    /// Action description
    pub description: String,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Declared inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<BTreeMap<String, ActionInput>>,
    /// Declared outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BTreeMap<String, ActionOutput>>,
    /// Runtime and entry points
    pub runs: ActionRuns,
    /// Marketplace branding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// An `inputs.<name>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Default value; numbers and booleans are kept in their YAML spelling
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    #[serde(
        rename = "deprecationMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub deprecation_message: Option<String>,
}

/// An `outputs.<name>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `runs` section of a JavaScript action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRuns {
    /// Runtime, always [`SUPPORTED_RUNTIME`] once validated
    pub using: String,
    /// Main script
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
    #[serde(rename = "pre-if", default, skip_serializing_if = "Option::is_none")]
    pub pre_if: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
    #[serde(rename = "post-if", default, skip_serializing_if = "Option::is_none")]
    pub post_if: Option<String>,
}

/// Marketplace badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Validation shape for `action.yml`.
///
/// Input and output descriptions are optional here; their absence is reported
/// as an advisory warning instead.
pub static MANIFEST_SHAPE: Shape = Shape::Struct(&[
    Field::required("name", Shape::String),
    Field::required("description", Shape::String),
    Field::optional("author", Shape::String),
    Field::optional(
        "inputs",
        Shape::Record(&Shape::Struct(&[
            Field::optional("description", Shape::String),
            Field::optional("required", Shape::Bool),
            Field::optional("default", Shape::Scalar),
            Field::optional("deprecationMessage", Shape::String),
        ])),
    ),
    Field::optional(
        "outputs",
        Shape::Record(&Shape::Struct(&[Field::optional(
            "description",
            Shape::String,
        )])),
    ),
    Field::required(
        "runs",
        Shape::Struct(&[
            Field::required("using", Shape::Literal(SUPPORTED_RUNTIME)),
            Field::required("main", Shape::String),
            Field::optional("pre", Shape::String),
            Field::optional("pre-if", Shape::String),
            Field::optional("post", Shape::String),
            Field::optional("post-if", Shape::String),
        ]),
    ),
    Field::optional(
        "branding",
        Shape::Struct(&[
            Field::optional("icon", Shape::OneOf(BRANDING_ICONS)),
            Field::optional("color", Shape::OneOf(BRANDING_COLORS)),
        ]),
    ),
]);
