//! Lexical shortcut routes checked before any model round-trip.
//!
//! Plain substring checks on the lower-cased input, first match wins, in the
//! order schema, all documents, count. Matching is unanchored, so
//! "how many students have schema violations" routes to the schema shortcut.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Return the cached schema summary.
    Schema,
    /// Fixed first page of the collection.
    AllDocuments,
    /// Count every document.
    Count,
    /// Full translate-then-execute pipeline.
    Translate,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Schema => "schema",
            Route::AllDocuments => "all_documents",
            Route::Count => "count",
            Route::Translate => "translate",
        }
    }
}

pub fn detect_route(question: &str) -> Route {
    let q = question.to_lowercase();

    if q.contains("schema") {
        return Route::Schema;
    }

    if q.contains("all documents") {
        return Route::AllDocuments;
    }

    if q.contains("count") || q.contains("how many") {
        return Route::Count;
    }

    Route::Translate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_schema() {
        assert_eq!(detect_route("show me schema"), Route::Schema);
        assert_eq!(detect_route("What is the SCHEMA?"), Route::Schema);
    }

    #[test]
    fn test_detect_all_documents() {
        assert_eq!(detect_route("list all documents"), Route::AllDocuments);
        assert_eq!(detect_route("Show me All Documents please"), Route::AllDocuments);
    }

    #[test]
    fn test_detect_count() {
        assert_eq!(detect_route("how many students"), Route::Count);
        assert_eq!(detect_route("Count the records"), Route::Count);
        // unanchored: "account" contains "count"
        assert_eq!(detect_route("which account is newest"), Route::Count);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(detect_route("how many students have schema violations"), Route::Schema);
        assert_eq!(detect_route("count all documents"), Route::AllDocuments);
    }

    #[test]
    fn test_default_translate() {
        assert_eq!(detect_route("find students with GPA above 3.5"), Route::Translate);
        assert_eq!(detect_route("get top 5 students by GPA"), Route::Translate);
    }
}
