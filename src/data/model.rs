use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a parsed row
// ---------------------------------------------------------------------------

/// A coerced cell value.
///
/// Numeric fields that were empty or unparsable hold `Number(f64::NAN)`.
/// That NaN means "absent", never zero: use [`FieldValue::as_f64`] which
/// maps it to `None`.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

// -- Manual PartialEq so two absent numbers compare equal --

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (FieldValue::List(a), FieldValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl FieldValue {
    /// Numeric value, or `None` when absent (NaN) or not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for a numeric cell that was missing in the source.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Number(v) if v.is_nan())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(v) if v.is_nan() => write!(f, "<absent>"),
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of a delimited file
// ---------------------------------------------------------------------------

/// One parsed row: column name → coerced value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Pass-through text column.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Numeric column; `None` when the cell was empty.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    /// Split column such as `genres`; empty slice when the column is missing.
    pub fn list(&self, name: &str) -> &[String] {
        self.get(name).and_then(FieldValue::as_list).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Dataset – a fully loaded delimited file
// ---------------------------------------------------------------------------

/// All rows of one delimited file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Header columns in file order.
    pub column_names: Vec<String>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Graph – nodes/links document consumed by the network views
// ---------------------------------------------------------------------------

/// `{ nodes, links }` as stored in the JSON graph files.
///
/// Node and link objects are kept verbatim; the files produced by the
/// preprocessing scripts use `id`/`type` on nodes and `source`/`target`
/// on links, which the helpers below rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<JsonValue>,
    pub links: Vec<JsonValue>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Nodes whose `type` field equals `kind` (e.g. `"movie"`, `"person"`).
    pub fn nodes_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a JsonValue> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.get("type").and_then(JsonValue::as_str) == Some(kind))
    }

    /// Look up a node by its `id`.
    pub fn node(&self, id: &str) -> Option<&JsonValue> {
        self.nodes
            .iter()
            .find(|n| n.get("id").and_then(JsonValue::as_str) == Some(id))
    }

    /// Links with `id` as either endpoint.
    pub fn links_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a JsonValue> + 'a {
        self.links.iter().filter(move |l| {
            let end = |key: &str| l.get(key).and_then(JsonValue::as_str) == Some(id);
            end("source") || end("target")
        })
    }
}
