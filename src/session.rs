//! Session context: one connection, its cached schema and the conversation.
//!
//! A session is created on connect and dropped on reconnect; nothing about
//! it lives in globals. Turns are handled one at a time through
//! [`Session::ask`], which never fails: every fault ends up either as a
//! degraded result or as an `error` envelope.

use std::sync::Mutex;

use mongodb::bson::Document;
use tracing::{info, warn};

use crate::config::{AppConfig, QueryConfig};
use crate::document::JsonDocument;
use crate::envelope::{ChatMessage, ResultEnvelope};
use crate::error::Result;
use crate::executor::{ErrorReporter, QueryExecutor};
use crate::llm::{ChatModel, OpenAiCompatClient};
use crate::query_spec::QuerySpec;
use crate::routing::{detect_route, Route};
use crate::schema::{inspect, Inspection, SchemaReport};
use crate::store::{DocumentStore, MongoStore};
use crate::translator::translate;

/// User-facing error messages raised during a turn, drained by the host.
#[derive(Default)]
struct Notices(Mutex<Vec<String>>);

impl ErrorReporter for Notices {
    fn report(&self, message: &str) {
        warn!(target: "session", "{}", message);
        if let Ok(mut notices) = self.0.lock() {
            notices.push(message.to_string());
        }
    }
}

pub struct Session {
    collection_name:     String,
    store:               Box<dyn DocumentStore>,
    model:               Box<dyn ChatModel>,
    executor:            QueryExecutor,
    all_documents_limit: u64,
    inspection:          Inspection,
    history:             Vec<ChatMessage>,
    notices:             Notices,
}

impl Session {
    /// Validate config, connect to MongoDB, build the model client and
    /// inspect the collection once.
    pub async fn connect(cfg: &AppConfig) -> Result<Self> {
        cfg.validate()?;
        let store = MongoStore::connect(&cfg.mongo).await?;
        let model = OpenAiCompatClient::from_config(&cfg.llm)?;
        Ok(Self::new(&cfg.mongo.collection, Box::new(store), Box::new(model), &cfg.query).await)
    }

    /// Assemble a session from already-built parts.
    pub async fn new(
        collection_name: &str,
        store: Box<dyn DocumentStore>,
        model: Box<dyn ChatModel>,
        query: &QueryConfig,
    ) -> Self {
        let inspection = inspect(store.as_ref(), collection_name).await;
        info!(
            target: "session",
            "Session ready for {} (model: {})",
            collection_name,
            model.label()
        );
        Self {
            collection_name: collection_name.to_string(),
            store,
            model,
            executor: QueryExecutor::new(query),
            all_documents_limit: query.all_documents_limit,
            inspection,
            history: vec![ChatMessage::assistant_text(format!(
                "Connected to **{collection_name}**. Ask me anything about it!"
            ))],
            notices: Notices::default(),
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Schema report cached at connect time.
    pub fn schema(&self) -> &SchemaReport {
        &self.inspection.report
    }

    pub fn sample(&self) -> &[JsonDocument] {
        &self.inspection.sample
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Drain the error messages reported since the last call.
    pub fn take_notices(&self) -> Vec<String> {
        self.notices.0.lock().map(|mut n| std::mem::take(&mut *n)).unwrap_or_default()
    }

    /// Handle one user turn and record it in history.
    pub async fn ask(&mut self, user_input: &str) -> ResultEnvelope {
        self.history.push(ChatMessage::user(user_input));

        let envelope = match self.respond(user_input).await {
            Ok(envelope) => envelope,
            Err(e) => ResultEnvelope::error(format!("Error: {e}")),
        };

        self.history.push(ChatMessage::assistant(envelope.clone()));
        envelope
    }

    async fn respond(&self, user_input: &str) -> Result<ResultEnvelope> {
        let route = detect_route(user_input);
        info!(target: "session", "Route: {}", route.label());

        match route {
            Route::Schema => Ok(ResultEnvelope::Schema { data: self.inspection.report.to_markdown() }),
            Route::AllDocuments => {
                let spec = QuerySpec::all_documents(self.all_documents_limit);
                let results = self.executor.execute(self.store.as_ref(), &spec, &self.notices).await;
                Ok(ResultEnvelope::AllDocuments { query_dict: spec, results })
            }
            Route::Count => {
                let data = self.store.count(Document::new()).await?;
                Ok(ResultEnvelope::Count { data })
            }
            Route::Translate => {
                let spec = translate(self.model.as_ref(), user_input).await.into_spec();
                let results = self.executor.execute(self.store.as_ref(), &spec, &self.notices).await;
                Ok(ResultEnvelope::QueryResults { query_dict: spec, results })
            }
        }
    }
}
