//! Mongo Chat: ask a MongoDB collection questions in plain language.
//!
//! A turn flows through [`routing`] (lexical shortcuts), the
//! [`translator`] (language model → [`QuerySpec`]), the [`executor`]
//! (spec → documents) and the [`presenter`]. [`session::Session`] ties the
//! pieces to one connection and keeps the conversation.

pub mod config;
pub mod document;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod llm;
pub mod logging;
pub mod presenter;
pub mod prompt;
pub mod query_spec;
pub mod routing;
pub mod schema;
pub mod session;
pub mod store;
pub mod translator;

pub use envelope::{ChatMessage, ResultEnvelope};
pub use error::{ChatError, Result};
pub use query_spec::QuerySpec;
pub use session::Session;
