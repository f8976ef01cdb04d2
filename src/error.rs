//! Error types for Mongo Chat.

use thiserror::Error;

/// Main error type for Mongo Chat operations.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Missing or invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// Configuration source could not be read or deserialized
    #[error("config error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// MongoDB driver failure (connection, auth, server-side query error)
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// HTTP transport failure talking to the language model
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The language model answered with something unusable
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON value could not be turned into BSON
    #[error("BSON conversion error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    /// The query shape is not something the store can evaluate
    #[error("invalid query: {0}")]
    Query(String),

    /// Store-level failure that is not a driver error
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
