use serde::Deserialize;

use crate::error::{ChatError, Result};

/// Groq's OpenAI-compatible endpoint root.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub mongo: MongoConfig,
    pub llm:   LlmConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string; prefer env MONGODB_CONNECTION_STRING
    pub uri:        String,
    pub database:   String,
    pub collection: String,
    /// How long the driver waits for a reachable server before giving up
    pub server_selection_timeout_ms: u64,
}
impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: String::new(),
            collection: String::new(),
            server_selection_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// API key: prefer env GROQ_KEY or LLM_API_KEY
    pub api_key:      Option<String>,
    /// OpenAI-compatible base URL (Groq, OpenRouter, a local Ollama /v1, ...)
    pub base_url:     String,
    pub model:        String,
    pub max_tokens:   u32,
    pub temperature:  f32,
    pub timeout_secs: u64,
}
impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key:      None,
            base_url:     DEFAULT_LLM_BASE_URL.into(),
            model:        DEFAULT_LLM_MODEL.into(),
            max_tokens:   512,
            temperature:  0.0,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QueryConfig {
    /// Cap applied when a query spec asks for `limit = 0`
    pub default_limit:       u64,
    /// Page size of the "all documents" shortcut
    pub all_documents_limit: u64,
    /// Optional hard ceiling on caller-supplied limits; `None` passes them through
    pub max_limit:           Option<u64>,
}
impl Default for QueryConfig {
    fn default() -> Self {
        Self { default_limit: 100, all_documents_limit: 50, max_limit: None }
    }
}

impl AppConfig {
    /// Reject a session that is missing any of the connection inputs.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.mongo.uri.trim().is_empty()        { missing.push("mongo.uri"); }
        if self.mongo.database.trim().is_empty()   { missing.push("mongo.database"); }
        if self.mongo.collection.trim().is_empty() { missing.push("mongo.collection"); }
        if self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            missing.push("llm.api_key");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChatError::Config(format!("please fill in: {}", missing.join(", "))))
        }
    }
}

/// Load configuration from `.env`, an optional `mongo-chat.*` file and
/// `MONGO_CHAT__*` environment variables.
pub fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    load_config_from("mongo-chat")
}

/// Same as [`load_config`] without touching `.env`, reading the file stem given.
pub fn load_config_from(file_stem: &str) -> Result<AppConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_stem).required(false))
        .add_source(config::Environment::with_prefix("MONGO_CHAT").separator("__"))
        .build()?;
    let mut app: AppConfig = cfg.try_deserialize()?;

    // Convenience: the plain variable names the seeding scripts also use
    if app.mongo.uri.is_empty() {
        if let Ok(uri) = std::env::var("MONGODB_CONNECTION_STRING") {
            app.mongo.uri = uri;
        }
    }
    if app.llm.api_key.is_none() {
        app.llm.api_key = std::env::var("GROQ_KEY")
            .or_else(|_| std::env::var("LLM_API_KEY"))
            .ok();
    }

    Ok(app)
}
