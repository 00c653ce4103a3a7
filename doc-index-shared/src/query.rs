//! Query and sort descriptors.
//!
//! The client never interprets a query; it forwards the JSON verbatim as the
//! `query` section of a search body. `BoolQuery` is a convenience for composing the
//! common must / must_not / should / filter shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Field used for the default ordering when the caller gives no sort.
pub const DEFAULT_SORT_FIELD: &str = "_id";

/// An opaque query clause, sent as-is to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDescriptor(Value);

impl QueryDescriptor {
    /// Wrap an arbitrary query clause.
    pub fn new(query: Value) -> Self {
        Self(query)
    }

    /// A query matching every document.
    pub fn match_all() -> Self {
        Self(json!({ "match_all": {} }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for QueryDescriptor {
    fn from(query: Value) -> Self {
        Self(query)
    }
}

/// Builder for a `bool` compound query.
///
/// Clauses are opaque; empty sections are omitted from the output.
#[derive(Debug, Clone, Default)]
pub struct BoolQuery {
    must: Vec<Value>,
    must_not: Vec<Value>,
    should: Vec<Value>,
    filter: Vec<Value>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, clause: Value) -> Self {
        self.must.push(clause);
        self
    }

    pub fn must_not(mut self, clause: Value) -> Self {
        self.must_not.push(clause);
        self
    }

    pub fn should(mut self, clause: Value) -> Self {
        self.should.push(clause);
        self
    }

    pub fn filter(mut self, clause: Value) -> Self {
        self.filter.push(clause);
        self
    }

    /// Finish the builder into a query descriptor.
    pub fn build(self) -> QueryDescriptor {
        let mut body = serde_json::Map::new();
        for (name, clauses) in [
            ("must", self.must),
            ("must_not", self.must_not),
            ("should", self.should),
            ("filter", self.filter),
        ] {
            if !clauses.is_empty() {
                body.insert(name.to_string(), Value::Array(clauses));
            }
        }
        QueryDescriptor(json!({ "bool": body }))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A single-field sort clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: String,
    pub order: SortOrder,
}

impl SortDescriptor {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Descending by internal document id: a total, stable tiebreak.
    pub fn default_order() -> Self {
        Self::desc(DEFAULT_SORT_FIELD)
    }

    /// Render as an engine sort clause, e.g. `{"_id": {"order": "desc"}}`.
    pub fn to_value(&self) -> Value {
        json!({ self.field.as_str(): { "order": self.order.as_str() } })
    }
}
