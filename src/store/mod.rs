//! Document store seam.
//!
//! The query layer talks to a collection only through [`DocumentStore`]:
//!
//! - [`MongoStore`]: a live MongoDB collection
//! - [`MemoryStore`]: an in-process collection for tests and demos

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::Result;

/// Store-facing shape of one filtered read.
///
/// `None` means the step is not issued at all: an absent `sort` is never
/// sent as an empty sort document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FindPlan {
    pub filter:     Document,
    pub projection: Option<Document>,
    pub sort:       Option<Document>,
    pub skip:       Option<u64>,
    pub limit:      i64,
}

/// Trait for the four read shapes the pipeline needs from a collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Up to `limit` documents in natural order.
    async fn sample(&self, limit: i64) -> Result<Vec<Document>>;

    /// Filtered, projected, sorted, paged read.
    async fn find(&self, plan: FindPlan) -> Result<Vec<Document>>;

    /// Number of documents matching `filter`.
    async fn count(&self, filter: Document) -> Result<u64>;

    /// Connectivity probe.
    async fn server_info(&self) -> Result<Document>;
}
