use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};

/// Server supplied explanation of a failure.
///
/// The server either sends a list of field-level problems (the shape
/// produced by request validation) or a single value describing the error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Items(Vec<DetailEntry>),
    Message(String),
    Other(serde_json::Value),
}

impl Detail {
    /// Whether this detail carries anything worth showing.
    ///
    /// Empty strings, `null`, `false` and `0` count as absent.
    /// A list is always present, even when empty.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Detail::Items(_) => true,
            Detail::Message(message) => !message.is_empty(),
            Detail::Other(value) => is_truthy(value),
        }
    }
}

impl Display for Detail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Items(entries) => write!(f, "{}", entries.iter().join("; ")),
            Detail::Message(message) => f.write_str(message),
            Detail::Other(value) => f.write_str(&value_to_text(value)),
        }
    }
}

/// Member of a [`Detail::Items`] list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailEntry {
    Item(ValidationItem),
    Other(serde_json::Value),
}

impl Display for DetailEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailEntry::Item(item) => item.fmt(f),
            DetailEntry::Other(value) => f.write_str(&value_to_text(value)),
        }
    }
}

/// A single field-level validation problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationItem {
    /// Path to the offending field, outermost segment first.
    /// List indices are kept as their decimal text.
    #[serde(rename = "loc", deserialize_with = "deserialize_location")]
    pub location: Vec<String>,
    /// Human-readable description of the problem. Never empty: an entry
    /// with an empty `msg` decodes as [`DetailEntry::Other`].
    #[serde(rename = "msg", deserialize_with = "deserialize_message")]
    pub message: String,
}

impl ValidationItem {
    #[must_use]
    pub fn new(
        location: impl IntoIterator<Item = impl Into<String>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

impl Display for ValidationItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location.join("."), self.message)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationSegment {
    Field(String),
    Index(i64),
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let segments = Vec::<LocationSegment>::deserialize(deserializer)?;
    Ok(segments
        .into_iter()
        .map(|segment| match segment {
            LocationSegment::Field(field) => field,
            LocationSegment::Index(index) => index.to_string(),
        })
        .collect())
}

fn deserialize_message<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let message = String::deserialize(deserializer)?;
    if message.is_empty() {
        return Err(serde::de::Error::custom("validation message is empty"));
    }
    Ok(message)
}

#[allow(clippy::float_cmp)]
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

// Strings are shown verbatim, everything else as JSON text.
fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
