//! Collection query: conjunctive filters plus ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::filter::FilterField;
use super::sorting::{SortDirection, SortField};

/// A query over one collection. All filters must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Conditions that every returned document satisfies.
    pub filters: Vec<FilterField>,
    /// Ordering applied to the result set, first key most significant.
    pub order: Vec<SortField>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// An unfiltered, unordered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a sort key.
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.order.push(sort);
        self
    }

    /// Cap the result size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document's fields satisfy every filter.
    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Compare two documents by this query's sort keys.
    pub fn compare(&self, a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        for sort in &self.order {
            let left = a.get(&sort.field).unwrap_or(&Value::Null);
            let right = b.get(&sort.field).unwrap_or(&Value::Null);
            let ord = compare_values(left, right);
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Total order over JSON scalars: null < bool < number < string.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
