//! Schema inspection from one sampled document.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, warn};

use crate::document::{to_json_document, type_name, JsonDocument, ID_FIELD};
use crate::store::DocumentStore;

/// Field name → type name, in the order the sample lists them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaSummary {
    pub collection: String,
    pub fields:     Vec<(String, String)>,
}

/// What inspection found. Every variant is a successful answer; a failed
/// read is carried as text rather than raised.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaReport {
    Fields(SchemaSummary),
    Empty,
    Unavailable(String),
}

impl SchemaReport {
    /// Markdown summary shown to the user.
    pub fn to_markdown(&self) -> String {
        match self {
            SchemaReport::Fields(summary) => {
                let mut text = format!("\nCollection: {}\n\n Sample record:\n", summary.collection);
                for (field, kind) in &summary.fields {
                    let _ = writeln!(text, "- `{field}`: `{kind}`");
                }
                text
            }
            SchemaReport::Empty => "Collection is empty.".to_string(),
            SchemaReport::Unavailable(cause) => format!("Error getting schema: {cause}"),
        }
    }
}

/// Schema report plus the documents it was derived from.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub report: SchemaReport,
    pub sample: Vec<JsonDocument>,
}

/// Sample at most one document and derive its field → type map.
pub async fn inspect(store: &dyn DocumentStore, collection_name: &str) -> Inspection {
    let docs = match store.sample(1).await {
        Ok(docs) => docs,
        Err(e) => {
            warn!(target: "schema", "Schema sampling failed for {}: {}", collection_name, e);
            return Inspection { report: SchemaReport::Unavailable(e.to_string()), sample: Vec::new() };
        }
    };

    if docs.is_empty() {
        info!(target: "schema", "Collection {} is empty", collection_name);
        return Inspection { report: SchemaReport::Empty, sample: Vec::new() };
    }

    // union of keys across the sample, first occurrence wins
    let mut fields: Vec<(String, String)> = Vec::new();
    for doc in &docs {
        for (key, value) in doc {
            if key == ID_FIELD || fields.iter().any(|(k, _)| k == key) {
                continue;
            }
            fields.push((key.clone(), type_name(value).to_string()));
        }
    }

    info!(target: "schema", "Inspected {}: {} field(s)", collection_name, fields.len());
    Inspection {
        report: SchemaReport::Fields(SchemaSummary { collection: collection_name.to_string(), fields }),
        sample: docs.into_iter().map(to_json_document).collect(),
    }
}
