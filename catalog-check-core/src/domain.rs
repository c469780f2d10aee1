use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub type RuleId = String;
pub type SourceId = String;

/// A product as returned by the catalog endpoint.
///
/// The raw JSON object is kept as-is: rules need to tell an absent field
/// apart from one with the wrong type, which a typed struct would hide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord(Value);

impl ProductRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Record identifier, `null` when the record carries none.
    pub fn id(&self) -> Value {
        self.field("id").cloned().unwrap_or(Value::Null)
    }

    pub fn title(&self) -> Option<&Value> {
        self.field("title")
    }

    pub fn price(&self) -> Option<&Value> {
        self.field("price")
    }

    pub fn rate(&self) -> Option<&Value> {
        self.field("rating").and_then(|r| r.get("rate"))
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|o| o.get(name))
    }
}

/// Ordered snapshot of the products fetched in one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Builds a catalog from a decoded response body. Only a top-level JSON
    /// array is accepted.
    pub fn from_json(body: Value) -> Option<Self> {
        match body {
            Value::Array(items) => Some(Self::new(
                items.into_iter().map(ProductRecord::new).collect(),
            )),
            _ => None,
        }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchResult {
    pub source_id: SourceId,
    pub location: String,
    pub status: u16,
    pub catalog: Catalog,
    pub latency: Duration,
    pub fetched_at: DateTime<Utc>,
}

/// One defective record and what is wrong with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: Value,
    pub defects: Vec<String>,
}

impl Violation {
    pub fn new(id: Value, defect: impl Into<String>) -> Self {
        Self {
            id,
            defects: vec![defect.into()],
        }
    }
}

/// Renders a JSON value the way defect descriptions show it. Absent values
/// render as `null`.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => Value::Null.to_string(),
    }
}
