//! Result presentation: maps envelopes onto a small closed set of views and
//! renders them for a terminal.

use std::fmt::Write as _;

use serde_json::Value;

use crate::document::{JsonDocument, ID_FIELD};
use crate::envelope::{ChatMessage, MessageContent, ResultEnvelope, Role};
use crate::query_spec::QuerySpec;

const MAX_CELL_CHARS: usize = 60;
const MAX_ROWS_SHOWN: usize = 50;

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Count(u64),
    Table(Table),
    /// Structured fallback when the documents do not tabulate.
    Raw(Value),
    /// Nothing to show, with the reason.
    Notice(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Limit(u64),
    Skip(u64),
    None,
}

/// One-line summary of what a query spec asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryAnalysis {
    pub filters: bool,
    pub fields:  bool,
    pub sorting: bool,
    pub paging:  Paging,
}

impl QueryAnalysis {
    pub fn of(spec: &QuerySpec) -> Self {
        let paging = if spec.limit > 0 {
            Paging::Limit(spec.limit)
        } else if spec.skip > 0 {
            Paging::Skip(spec.skip)
        } else {
            Paging::None
        };
        Self {
            filters: spec.has_filter(),
            fields:  spec.has_projection(),
            sorting: spec.has_sort(),
            paging,
        }
    }

    pub fn summary(&self) -> String {
        let paging = match self.paging {
            Paging::Limit(n) => format!("Limit: {n}"),
            Paging::Skip(n) => format!("Skip: {n}"),
            Paging::None => "Paging: None".to_string(),
        };
        format!(
            "Filters: {} │ Fields: {} │ Sorting: {} │ {}",
            if self.filters { "Applied" } else { "None" },
            if self.fields { "Selected" } else { "All" },
            if self.sorting { "Applied" } else { "None" },
            paging
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub role:     Role,
    pub title:    Option<String>,
    pub analysis: Option<QueryAnalysis>,
    pub body:     Body,
}

impl Presentation {
    fn assistant(title: Option<&str>, body: Body) -> Self {
        Self { role: Role::Assistant, title: title.map(str::to_string), analysis: None, body }
    }
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

pub fn present(envelope: &ResultEnvelope) -> Presentation {
    match envelope {
        ResultEnvelope::Schema { data } => Presentation::assistant(Some("Collection Schema"), Body::Text(data.clone())),
        ResultEnvelope::Count { data } => Presentation::assistant(Some("Total documents"), Body::Count(*data)),
        ResultEnvelope::QueryResults { query_dict, results } => Presentation {
            analysis: Some(QueryAnalysis::of(query_dict)),
            ..Presentation::assistant(None, documents_body(results, query_dict))
        },
        ResultEnvelope::AllDocuments { query_dict, results } => {
            Presentation::assistant(Some("All Documents"), documents_body(results, query_dict))
        }
        ResultEnvelope::Error { data } => Presentation::assistant(None, Body::Error(data.clone())),
    }
}

pub fn present_message(message: &ChatMessage) -> Presentation {
    match &message.content {
        MessageContent::Envelope(envelope) => Presentation { role: message.role, ..present(envelope) },
        MessageContent::Text(text) => Presentation {
            role:     message.role,
            title:    None,
            analysis: None,
            body:     Body::Text(text.clone()),
        },
    }
}

fn documents_body(results: &[JsonDocument], spec: &QuerySpec) -> Body {
    if results.is_empty() {
        return Body::Notice("No documents found matching your query.".to_string());
    }
    match tabulate(results, spec.projects_id()) {
        Some(table) => Body::Table(table),
        None => Body::Raw(Value::Array(results.iter().cloned().map(Value::Object).collect())),
    }
}

/// Columns are the union of keys in first-seen order; `_id` is dropped unless
/// asked for. `None` when nothing is left to show as columns.
pub fn tabulate(results: &[JsonDocument], show_id: bool) -> Option<Table> {
    let mut columns: Vec<String> = Vec::new();
    for doc in results {
        for key in doc.keys() {
            if (key != ID_FIELD || show_id) && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    if columns.is_empty() {
        return None;
    }

    let rows = results
        .iter()
        .map(|doc| columns.iter().map(|c| cell(doc.get(c))).collect())
        .collect();
    Some(Table { columns, rows })
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ─── Terminal rendering ──────────────────────────────────────────────────────

pub fn render_text(presentation: &Presentation) -> String {
    let mut out = String::new();
    if presentation.role == Role::User {
        let _ = writeln!(out, "❯ {}", body_text(&presentation.body));
        return out;
    }

    if let Some(title) = &presentation.title {
        let _ = writeln!(out, "### {title}");
    }
    if let Some(analysis) = &presentation.analysis {
        let _ = writeln!(out, "{}", analysis.summary());
    }

    match &presentation.body {
        Body::Count(n) => { let _ = writeln!(out, "**{n}**"); }
        Body::Table(table) => out.push_str(&render_table(table)),
        Body::Raw(value) => {
            let _ = writeln!(out, "Could not display as table. Showing raw data:");
            let _ = writeln!(out, "{}", serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
        }
        Body::Notice(text) | Body::Text(text) => { let _ = writeln!(out, "{text}"); }
        Body::Error(text) => { let _ = writeln!(out, "✗ {text}"); }
    }
    out
}

fn body_text(body: &Body) -> String {
    match body {
        Body::Text(text) | Body::Notice(text) | Body::Error(text) => text.clone(),
        Body::Count(n) => n.to_string(),
        Body::Table(table) => format!("{} row(s)", table.rows.len()),
        Body::Raw(value) => value.to_string(),
    }
}

fn truncate_cell(value: &str) -> String {
    if value.chars().count() > MAX_CELL_CHARS {
        let head: String = value.chars().take(MAX_CELL_CHARS - 1).collect();
        format!("{head}…")
    } else {
        value.to_string()
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
}

pub fn render_table(table: &Table) -> String {
    let mut out = String::new();

    let shown: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(MAX_ROWS_SHOWN)
        .map(|row| row.iter().map(|v| truncate_cell(v)).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &shown {
        for (i, val) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(val.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| pad(c, widths.get(i).copied().unwrap_or(10)))
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let header = line(&table.columns);
    let rule = "─".repeat(header.chars().count());
    let _ = writeln!(out, "┌─{rule}─┐");
    let _ = writeln!(out, "│ {header} │");
    let _ = writeln!(out, "├─{rule}─┤");
    for row in &shown {
        let _ = writeln!(out, "│ {} │", line(row));
    }
    let _ = writeln!(out, "└─{rule}─┘");

    if table.rows.len() > MAX_ROWS_SHOWN {
        let _ = writeln!(out, "  … {} more rows", table.rows.len() - MAX_ROWS_SHOWN);
    }
    let _ = writeln!(out, "  {} row(s)", table.rows.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(values: Vec<Value>) -> Vec<JsonDocument> {
        values.into_iter().map(|v| v.as_object().unwrap().clone()).collect()
    }

    #[test]
    fn test_table_drops_id_by_default() {
        let results = docs(vec![
            json!({ "_id": "a1", "name": "Alice Johnson", "gpa": 3.8 }),
            json!({ "_id": "b2", "name": "Bob Smith", "major": "Information Technology" }),
        ]);
        let table = tabulate(&results, false).unwrap();
        assert_eq!(table.columns, vec!["name", "gpa", "major"]);
        assert_eq!(table.rows[0], vec!["Alice Johnson", "3.8", ""]);
        assert_eq!(table.rows[1], vec!["Bob Smith", "", "Information Technology"]);
    }

    #[test]
    fn test_table_keeps_id_when_projected() {
        let results = docs(vec![json!({ "_id": "a1", "name": "Alice Johnson" })]);
        let spec = QuerySpec::from_value(json!({ "projection": { "_id": 1, "name": 1 } })).unwrap();
        let Body::Table(table) = documents_body(&results, &spec) else { panic!("expected table") };
        assert_eq!(table.columns, vec!["_id", "name"]);
    }

    #[test]
    fn test_nested_cells_are_compact_json() {
        let results = docs(vec![json!({ "courses": [ { "grade": "A" } ] })]);
        let table = tabulate(&results, false).unwrap();
        assert_eq!(table.rows[0][0], r#"[{"grade":"A"}]"#);
    }

    #[test]
    fn test_id_only_documents_fall_back_to_raw() {
        let results = docs(vec![json!({ "_id": "a1" })]);
        let body = documents_body(&results, &QuerySpec::match_all());
        assert_eq!(body, Body::Raw(json!([{ "_id": "a1" }])));
    }

    #[test]
    fn test_empty_results_notice() {
        let view = present(&ResultEnvelope::QueryResults { query_dict: QuerySpec::match_all(), results: vec![] });
        assert_eq!(view.body, Body::Notice("No documents found matching your query.".into()));
        assert_eq!(view.analysis.unwrap().summary(), "Filters: None │ Fields: All │ Sorting: None │ Paging: None");
    }

    #[test]
    fn test_analysis_reports_limit_before_skip() {
        let spec = QuerySpec::from_value(json!({ "filter": { "a": 1 }, "sort": { "gpa": -1 }, "limit": 5, "skip": 10 })).unwrap();
        let analysis = QueryAnalysis::of(&spec);
        assert_eq!(analysis.paging, Paging::Limit(5));
        assert!(analysis.filters && analysis.sorting && !analysis.fields);

        let spec = QuerySpec::from_value(json!({ "skip": 10 })).unwrap();
        assert_eq!(QueryAnalysis::of(&spec).paging, Paging::Skip(10));
    }

    #[test]
    fn test_closed_mapping() {
        assert_eq!(present(&ResultEnvelope::Count { data: 10 }).body, Body::Count(10));
        assert_eq!(present(&ResultEnvelope::error("Error: x")).body, Body::Error("Error: x".into()));
        let schema = present(&ResultEnvelope::Schema { data: "Collection: Student".into() });
        assert_eq!(schema.title.as_deref(), Some("Collection Schema"));
        let all = present(&ResultEnvelope::AllDocuments { query_dict: QuerySpec::all_documents(50), results: vec![] });
        assert_eq!(all.title.as_deref(), Some("All Documents"));
        assert!(all.analysis.is_none());
    }

    #[test]
    fn test_render_table_truncates_and_caps_rows() {
        let table = Table {
            columns: vec!["name".into()],
            rows: (0..55).map(|i| vec![format!("{}{}", "x".repeat(70), i)]).collect(),
        };
        let text = render_table(&table);
        assert!(text.contains('…'));
        assert!(text.contains("… 5 more rows"));
        assert!(text.contains("55 row(s)"));
        // header + 50 rows + 3 rules + 2 footers
        assert_eq!(text.lines().count(), 56);
    }

    #[test]
    fn test_render_count_and_user_text() {
        let text = render_text(&present(&ResultEnvelope::Count { data: 10 }));
        assert!(text.contains("### Total documents"));
        assert!(text.contains("**10**"));

        let user = present_message(&ChatMessage::user("how many students"));
        assert_eq!(render_text(&user), "❯ how many students\n");
    }
}
