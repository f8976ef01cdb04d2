//! The canonical five-key query specification passed from the translator to
//! the executor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ChatError, Result};

pub const FILTER: &str = "filter";
pub const PROJECTION: &str = "projection";
pub const SORT: &str = "sort";
pub const LIMIT: &str = "limit";
pub const SKIP: &str = "skip";

/// Fully populated query specification.
///
/// `limit = 0` means "use the system default cap". An empty `sort` means no
/// explicit order. Serializes with all five keys present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    pub filter:     Map<String, Value>,
    pub projection: Map<String, Value>,
    pub sort:       Map<String, Value>,
    pub limit:      u64,
    pub skip:       u64,
}

impl QuerySpec {
    /// Match everything, default page.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// The "all documents" page: empty filter and projection, fixed limit.
    pub fn all_documents(limit: u64) -> Self {
        Self { limit, ..Self::default() }
    }

    /// Build a spec from an untrusted JSON value, injecting defaults for
    /// missing keys. A key present with the wrong type is defaulted too.
    /// Only a non-object top level is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut obj) = value else {
            return Err(ChatError::Query("query specification must be a JSON object".into()));
        };

        Ok(Self {
            filter:     take_map(&mut obj, FILTER),
            projection: take_map(&mut obj, PROJECTION),
            sort:       take_map(&mut obj, SORT),
            limit:      take_count(&mut obj, LIMIT),
            skip:       take_count(&mut obj, SKIP),
        })
    }

    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn has_projection(&self) -> bool {
        !self.projection.is_empty()
    }

    pub fn has_sort(&self) -> bool {
        !self.sort.is_empty()
    }

    /// Whether the projection names the identifier field explicitly.
    pub fn projects_id(&self) -> bool {
        self.projection.contains_key(crate::document::ID_FIELD)
    }
}

fn take_map(obj: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match obj.remove(key) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!(target: "query_spec", "Ignoring non-object '{}': {}", key, other);
            Map::new()
        }
    }
}

/// Non-negative integer; floats are truncated, negatives and junk become 0.
fn take_count(obj: &mut Map<String, Value>, key: &str) -> u64 {
    match obj.remove(key) {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && *f > 0.0) {
                f.trunc() as u64
            } else {
                warn!(target: "query_spec", "Ignoring negative '{}': {}", key, n);
                0
            }
        }
        Some(Value::String(s)) => match s.trim().parse::<u64>() {
            Ok(u) => u,
            Err(_) => {
                warn!(target: "query_spec", "Ignoring non-numeric '{}': {:?}", key, s);
                0
            }
        },
        Some(other) => {
            warn!(target: "query_spec", "Ignoring non-numeric '{}': {}", key, other);
            0
        }
    }
}
