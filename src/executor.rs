//! executor.rs: runs a canonical [`QuerySpec`] against a [`DocumentStore`].
//!
//! Faults never reach the caller: they are reported to an [`ErrorReporter`]
//! and the result is an empty list.

use tracing::{error, info};

use crate::config::QueryConfig;
use crate::document::{to_bson_document, to_json_document, JsonDocument};
use crate::error::Result;
use crate::query_spec::QuerySpec;
use crate::store::{DocumentStore, FindPlan};

/// Human-facing error channel the executor reports into.
pub trait ErrorReporter {
    fn report(&self, message: &str);
}

/// Reporter that only logs.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, message: &str) {
        error!(target: "executor", "{}", message);
    }
}

#[derive(Debug, Clone)]
pub struct QueryExecutor {
    default_limit: u64,
    max_limit:     Option<u64>,
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

impl QueryExecutor {
    pub fn new(cfg: &QueryConfig) -> Self {
        Self { default_limit: cfg.default_limit, max_limit: cfg.max_limit }
    }

    /// Limit actually sent to the store.
    pub fn effective_limit(&self, requested: u64) -> u64 {
        match (requested, self.max_limit) {
            (0, _) => self.default_limit,
            (n, Some(ceiling)) => n.min(ceiling),
            (n, None) => n,
        }
    }

    /// Translate a spec into the store-facing call shape. Empty sort and
    /// projection and a zero skip are left out entirely.
    pub fn plan(&self, spec: &QuerySpec) -> Result<FindPlan> {
        Ok(FindPlan {
            filter:     to_bson_document(&spec.filter)?,
            projection: if spec.has_projection() { Some(to_bson_document(&spec.projection)?) } else { None },
            sort:       if spec.has_sort() { Some(to_bson_document(&spec.sort)?) } else { None },
            skip:       (spec.skip > 0).then_some(spec.skip),
            limit:      i64::try_from(self.effective_limit(spec.limit)).unwrap_or(i64::MAX),
        })
    }

    /// Run `spec`; identifiers in the result are strings.
    pub async fn execute(
        &self,
        store: &dyn DocumentStore,
        spec: &QuerySpec,
        reporter: &dyn ErrorReporter,
    ) -> Vec<JsonDocument> {
        match self.try_execute(store, spec).await {
            Ok(docs) => {
                info!(target: "executor", "Query returned {} document(s)", docs.len());
                docs
            }
            Err(e) => {
                reporter.report(&format!("Error querying MongoDB: {e}"));
                Vec::new()
            }
        }
    }

    async fn try_execute(&self, store: &dyn DocumentStore, spec: &QuerySpec) -> Result<Vec<JsonDocument>> {
        let plan = self.plan(spec)?;
        let docs = store.find(plan).await?;
        Ok(docs.into_iter().map(to_json_document).collect())
    }
}
