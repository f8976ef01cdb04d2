use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};
use tracing::{debug, info};

use super::{DocumentStore, FindPlan};
use crate::config::MongoConfig;
use crate::error::Result;

/// A live MongoDB collection.
pub struct MongoStore {
    client:     Client,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and probe the server before handing the collection out.
    pub async fn connect(cfg: &MongoConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&cfg.uri).await?;
        options.server_selection_timeout = Some(Duration::from_millis(cfg.server_selection_timeout_ms));
        options.app_name = Some("mongo-chat".into());

        let client = Client::with_options(options)?;
        let collection = client.database(&cfg.database).collection::<Document>(&cfg.collection);
        let store = Self { client, collection };

        let info = store.server_info().await?;
        info!(
            target: "store",
            "Connected to MongoDB {} ({}.{})",
            info.get_str("version").unwrap_or("?"),
            cfg.database,
            cfg.collection
        );
        Ok(store)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn sample(&self, limit: i64) -> Result<Vec<Document>> {
        let options = FindOptions::builder().limit(limit).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find(&self, plan: FindPlan) -> Result<Vec<Document>> {
        debug!(target: "store", "find {:?}", plan);
        let options = FindOptions::builder()
            .projection(plan.projection)
            .sort(plan.sort)
            .skip(plan.skip)
            .limit(plan.limit)
            .build();
        let cursor = self.collection.find(plan.filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: Document) -> Result<u64> {
        Ok(self.collection.count_documents(filter, None).await?)
    }

    async fn server_info(&self) -> Result<Document> {
        Ok(self
            .client
            .database("admin")
            .run_command(doc! { "buildInfo": 1 }, None)
            .await?)
    }
}
