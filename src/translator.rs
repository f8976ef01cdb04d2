//! translator.rs: natural language → canonical [`QuerySpec`].
//!
//! The model is untrusted: it may wrap JSON in prose or code fences, drop
//! keys, or fail outright. Every failure degrades to the match-all spec, so
//! translation itself never errors.

use tracing::{info, warn};

use crate::error::{ChatError, Result};
use crate::llm::ChatModel;
use crate::prompt::QUERY_SYSTEM_PROMPT;
use crate::query_spec::QuerySpec;

/// Outcome of one translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// The model produced a usable object; missing keys were defaulted.
    Parsed(QuerySpec),
    /// Model call, extraction or parsing failed.
    Fallback { reason: String },
}

impl Translation {
    /// The spec to execute: the parsed one, or match-all with default paging.
    pub fn into_spec(self) -> QuerySpec {
        match self {
            Translation::Parsed(spec) => spec,
            Translation::Fallback { .. } => QuerySpec::match_all(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Translation::Fallback { .. })
    }
}

/// Ask the model once and turn its answer into a query specification.
pub async fn translate(model: &dyn ChatModel, user_input: &str) -> Translation {
    info!(target: "translator", "Translating: {}", user_input);

    let response = match model.complete(QUERY_SYSTEM_PROMPT, user_input).await {
        Ok(text) => text,
        Err(e) => {
            warn!(target: "translator", "Model call failed, using match-all: {}", e);
            return Translation::Fallback { reason: e.to_string() };
        }
    };

    let translation = parse_response(&response);
    match &translation {
        Translation::Parsed(spec) => info!(
            target: "translator",
            "Query spec: {}",
            serde_json::to_string(spec).unwrap_or_default()
        ),
        Translation::Fallback { reason } => {
            warn!(target: "translator", "Unusable model output ({}), using match-all", reason)
        }
    }
    translation
}

/// Parse raw model text into a translation.
pub fn parse_response(response: &str) -> Translation {
    match parse_spec(response) {
        Ok(spec) => Translation::Parsed(spec),
        Err(e) => Translation::Fallback { reason: e.to_string() },
    }
}

fn parse_spec(response: &str) -> Result<QuerySpec> {
    let json = extract_json_object(response)
        .ok_or_else(|| ChatError::Llm("no JSON object in model response".into()))?;
    let value: serde_json::Value = serde_json::from_str(json)?;
    QuerySpec::from_value(value)
}

/// The span from the first `{` to the last `}`, if there is one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
