//! Result envelopes: the tagged payload one turn produces, as shown to the
//! user and kept in conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::JsonDocument;
use crate::query_spec::QuerySpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultEnvelope {
    Schema {
        data: String,
    },
    Count {
        data: u64,
    },
    QueryResults {
        query_dict: QuerySpec,
        results:    Vec<JsonDocument>,
    },
    AllDocuments {
        query_dict: QuerySpec,
        results:    Vec<JsonDocument>,
    },
    Error {
        data: String,
    },
}

impl ResultEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        ResultEnvelope::Error { data: message.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResultEnvelope::Schema { .. } => "schema",
            ResultEnvelope::Count { .. } => "count",
            ResultEnvelope::QueryResults { .. } => "query_results",
            ResultEnvelope::AllDocuments { .. } => "all_documents",
            ResultEnvelope::Error { .. } => "error",
        }
    }

    /// Documents carried by the envelope, if it carries any.
    pub fn results(&self) -> Option<&[JsonDocument]> {
        match self {
            ResultEnvelope::QueryResults { results, .. } | ResultEnvelope::AllDocuments { results, .. } => {
                Some(results)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Envelope(ResultEnvelope),
}

/// One entry of conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role:    Role,
    pub content: MessageContent,
    pub at:      DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, content: MessageContent::Text(text.into()), at: Utc::now() }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: MessageContent::Text(text.into()), at: Utc::now() }
    }

    pub fn assistant(envelope: ResultEnvelope) -> Self {
        Self { role: Role::Assistant, content: MessageContent::Envelope(envelope), at: Utc::now() }
    }
}
