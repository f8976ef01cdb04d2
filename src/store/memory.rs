//! In-process store for testing without a MongoDB server.
//!
//! [`MemoryStore`] keeps a collection in memory and evaluates the subset of
//! the MongoDB query language the pipeline produces: comparison, set,
//! element, regex and logical operators on dotted paths, inclusion and
//! exclusion projections, multi-key sort, skip and limit. It is not meant
//! to replace a server, only to make the query layer observable in tests.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use regex::RegexBuilder;
use tokio::sync::RwLock;

use super::{DocumentStore, FindPlan};
use crate::document::ID_FIELD;
use crate::error::{ChatError, Result};

/// In-memory collection in insertion (natural) order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `docs`; documents without `_id` get an ObjectId.
    pub fn from_documents(docs: Vec<Document>) -> Self {
        Self { docs: Arc::new(RwLock::new(docs.into_iter().map(with_id).collect())) }
    }

    pub async fn insert_many(&self, docs: Vec<Document>) {
        self.docs.write().await.extend(docs.into_iter().map(with_id));
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn with_id(mut doc: Document) -> Document {
    if doc.contains_key(ID_FIELD) {
        return doc;
    }
    let mut stamped = Document::new();
    stamped.insert(ID_FIELD, ObjectId::new());
    for (key, value) in std::mem::take(&mut doc) {
        stamped.insert(key, value);
    }
    stamped
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn sample(&self, limit: i64) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().take(page_size(limit).unwrap_or(usize::MAX)).cloned().collect())
    }

    async fn find(&self, plan: FindPlan) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;

        let mut selected = Vec::new();
        for doc in docs.iter() {
            if matches(doc, &plan.filter)? {
                selected.push(doc.clone());
            }
        }

        if let Some(sort) = &plan.sort {
            let keys = sort_keys(sort)?;
            // stable: ties keep natural order
            selected.sort_by(|a, b| compare_by_keys(a, b, &keys));
        }

        let skip = plan.skip.unwrap_or(0) as usize;
        let take = page_size(plan.limit).unwrap_or(usize::MAX);
        let page = selected.into_iter().skip(skip).take(take);

        match &plan.projection {
            Some(projection) => {
                let projection = Projection::parse(projection)?;
                Ok(page.map(|doc| projection.apply(&doc)).collect())
            }
            None => Ok(page.collect()),
        }
    }

    async fn count(&self, filter: Document) -> Result<u64> {
        let docs = self.docs.read().await;
        let mut n = 0;
        for doc in docs.iter() {
            if matches(doc, &filter)? {
                n += 1;
            }
        }
        Ok(n)
    }

    async fn server_info(&self) -> Result<Document> {
        Ok(doc! { "version": "memory", "ok": 1.0 })
    }
}

/// `0` means unbounded; a negative limit behaves like its absolute value.
fn page_size(limit: i64) -> Option<usize> {
    match limit.unsigned_abs() {
        0 => None,
        n => Some(n as usize),
    }
}

// ─── Filter evaluation ───────────────────────────────────────────────────────

fn matches(doc: &Document, filter: &Document) -> Result<bool> {
    for (key, cond) in filter {
        let ok = match key.as_str() {
            "$and" => {
                let mut all = true;
                for clause in clauses(key, cond)? {
                    if !matches(doc, clause)? { all = false; break; }
                }
                all
            }
            "$or" => {
                let mut any = false;
                for clause in clauses(key, cond)? {
                    if matches(doc, clause)? { any = true; break; }
                }
                any
            }
            "$nor" => {
                let mut none = true;
                for clause in clauses(key, cond)? {
                    if matches(doc, clause)? { none = false; break; }
                }
                none
            }
            op if op.starts_with('$') => {
                return Err(ChatError::Query(format!("unknown top level operator: {op}")));
            }
            path => matches_values(&lookup(doc, path), cond)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn clauses<'a>(op: &str, value: &'a Bson) -> Result<Vec<&'a Document>> {
    let Bson::Array(items) = value else {
        return Err(ChatError::Query(format!("{op} argument must be an array")));
    };
    if items.is_empty() {
        return Err(ChatError::Query(format!("{op} argument must be a non-empty array")));
    }
    items
        .iter()
        .map(|item| match item {
            Bson::Document(d) => Ok(d),
            _ => Err(ChatError::Query(format!("{op} entries must be objects"))),
        })
        .collect()
}

/// Resolve a dotted path. Arrays along the way fan out over their elements,
/// or index directly when the path segment is numeric.
fn lookup<'a>(doc: &'a Document, path: &str) -> Vec<&'a Bson> {
    let mut parts = path.split('.');
    let mut current: Vec<&Bson> = match parts.next().and_then(|first| doc.get(first)) {
        Some(value) => vec![value],
        None => return Vec::new(),
    };

    for part in parts {
        let mut next = Vec::new();
        for value in current {
            match value {
                Bson::Document(d) => next.extend(d.get(part)),
                Bson::Array(items) => match part.parse::<usize>() {
                    Ok(index) => next.extend(items.get(index)),
                    Err(_) => {
                        for item in items {
                            if let Bson::Document(d) = item {
                                next.extend(d.get(part));
                            }
                        }
                    }
                },
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// Values plus the elements of any array value.
fn candidates<'a>(values: &[&'a Bson]) -> Vec<&'a Bson> {
    let mut out = Vec::with_capacity(values.len());
    for &value in values {
        out.push(value);
        if let Bson::Array(items) = value {
            out.extend(items.iter());
        }
    }
    out
}

fn is_operator_doc(doc: &Document) -> Result<bool> {
    let dollar = doc.keys().filter(|k| k.starts_with('$')).count();
    match dollar {
        0 => Ok(false),
        n if n == doc.len() => Ok(true),
        _ => Err(ChatError::Query("cannot mix operators and fields in one condition".into())),
    }
}

fn matches_values(values: &[&Bson], cond: &Bson) -> Result<bool> {
    match cond {
        Bson::Document(ops) if is_operator_doc(ops)? => {
            for (op, arg) in ops {
                if !eval_operator(values, op, arg, ops)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Bson::RegularExpression(re) => {
            let regex = build_regex(&re.pattern, &re.options)?;
            Ok(candidates(values).iter().any(|v| matches!(v, Bson::String(s) if regex.is_match(s))))
        }
        literal => Ok(equals_any(values, literal)),
    }
}

fn equals_any(values: &[&Bson], literal: &Bson) -> bool {
    if values.is_empty() {
        return matches!(literal, Bson::Null);
    }
    candidates(values).iter().any(|v| bson_eq(v, literal))
}

fn eval_operator(values: &[&Bson], op: &str, arg: &Bson, siblings: &Document) -> Result<bool> {
    let compare = |wanted: fn(Ordering) -> bool| {
        candidates(values)
            .iter()
            .any(|v| compare_same_class(v, arg).is_some_and(wanted))
    };

    match op {
        "$eq" => Ok(equals_any(values, arg)),
        "$ne" => Ok(!equals_any(values, arg)),
        "$gt" => Ok(compare(|o| o == Ordering::Greater)),
        "$gte" => Ok(compare(|o| o != Ordering::Less)),
        "$lt" => Ok(compare(|o| o == Ordering::Less)),
        "$lte" => Ok(compare(|o| o != Ordering::Greater)),
        "$in" | "$nin" => {
            let Bson::Array(options) = arg else {
                return Err(ChatError::Query(format!("{op} needs an array")));
            };
            let mut found = false;
            for option in options {
                if matches_values(values, option)? {
                    found = true;
                    break;
                }
            }
            Ok(if op == "$in" { found } else { !found })
        }
        "$exists" => Ok(values.is_empty() != truthy(arg)),
        "$size" => {
            let wanted = as_f64(arg).ok_or_else(|| ChatError::Query("$size needs a number".into()))?;
            Ok(values.iter().any(|v| matches!(v, Bson::Array(items) if items.len() as f64 == wanted)))
        }
        "$regex" => {
            let options = siblings.get_str("$options").unwrap_or("");
            let regex = match arg {
                Bson::String(pattern) => build_regex(pattern, options)?,
                Bson::RegularExpression(re) => build_regex(&re.pattern, &format!("{}{}", re.options, options))?,
                _ => return Err(ChatError::Query("$regex needs a string".into())),
            };
            Ok(candidates(values).iter().any(|v| matches!(v, Bson::String(s) if regex.is_match(s))))
        }
        // consumed by $regex
        "$options" => Ok(true),
        "$not" => match arg {
            Bson::Document(_) | Bson::RegularExpression(_) => Ok(!matches_values(values, arg)?),
            _ => Err(ChatError::Query("$not needs an object or a regex".into())),
        },
        other => Err(ChatError::Query(format!("unsupported operator: {other}"))),
    }
}

fn build_regex(pattern: &str, options: &str) -> Result<regex::Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in options.chars() {
        match flag {
            'i' => { builder.case_insensitive(true); }
            'm' => { builder.multi_line(true); }
            's' => { builder.dot_matches_new_line(true); }
            'x' => { builder.ignore_whitespace(true); }
            other => return Err(ChatError::Query(format!("invalid regex flag: {other}"))),
        }
    }
    builder
        .build()
        .map_err(|e| ChatError::Query(format!("invalid regex /{pattern}/: {e}")))
}

fn truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Null | Bson::Undefined => false,
        other => as_f64(other).map_or(true, |n| n != 0.0),
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// Cross-type ordering bracket, lowest first.
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

/// Ordering within one type bracket; `None` across brackets.
fn compare_same_class(a: &Bson, b: &Bson) -> Option<Ordering> {
    if type_rank(a) != type_rank(b) {
        return None;
    }
    Some(compare_bson(a, b))
}

fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Bson::String(x) | Bson::Symbol(x), Bson::String(y) | Bson::Symbol(y)) => x.cmp(y),
        (Bson::Document(x), Bson::Document(y)) => {
            for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
                let ord = compare_bson(va, vb).then_with(|| ka.cmp(kb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Bson::Array(x), Bson::Array(y)) => {
            for (va, vb) in x.iter().zip(y.iter()) {
                let ord = compare_bson(va, vb);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.timestamp_millis().cmp(&y.timestamp_millis()),
        (Bson::Timestamp(x), Bson::Timestamp(y)) => (x.time, x.increment).cmp(&(y.time, y.increment)),
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn sort_keys(sort: &Document) -> Result<Vec<(String, bool)>> {
    sort.iter()
        .map(|(field, direction)| {
            let ascending = match direction {
                Bson::String(s) => match s.to_ascii_lowercase().as_str() {
                    "asc" | "ascending" => true,
                    "desc" | "descending" => false,
                    _ => return Err(ChatError::Query(format!("invalid sort direction for {field}: {s}"))),
                },
                other => match as_f64(other) {
                    Some(d) if d == 1.0 => true,
                    Some(d) if d == -1.0 => false,
                    _ => return Err(ChatError::Query(format!("invalid sort direction for {field}: {other}"))),
                },
            };
            Ok((field.clone(), ascending))
        })
        .collect()
}

/// Sort value of a field: arrays sort by their smallest element ascending
/// and their largest descending; a missing field sorts as null.
fn sort_value(doc: &Document, field: &str, ascending: bool) -> Bson {
    let values = lookup(doc, field);
    let flat: Vec<&Bson> = values
        .iter()
        .flat_map(|v| match v {
            Bson::Array(items) if !items.is_empty() => items.iter().collect::<Vec<_>>(),
            other => vec![*other],
        })
        .collect();
    let pick = if ascending {
        flat.into_iter().min_by(|a, b| compare_bson(a, b))
    } else {
        flat.into_iter().max_by(|a, b| compare_bson(a, b))
    };
    pick.cloned().unwrap_or(Bson::Null)
}

fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, bool)]) -> Ordering {
    for (field, ascending) in keys {
        let ord = compare_bson(&sort_value(a, field, *ascending), &sort_value(b, field, *ascending));
        let ord = if *ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// ─── Projection ──────────────────────────────────────────────────────────────

struct Projection {
    include_id: bool,
    /// Inclusion paths when `Some`, otherwise `excluded` applies.
    included: Option<Vec<String>>,
    excluded: Vec<String>,
}

impl Projection {
    fn parse(spec: &Document) -> Result<Self> {
        let mut include_id = true;
        let mut included = Vec::new();
        let mut excluded = Vec::new();

        for (field, flag) in spec {
            let keep = match flag {
                Bson::Boolean(b) => *b,
                other => as_f64(other)
                    .map(|n| n != 0.0)
                    .ok_or_else(|| ChatError::Query(format!("unsupported projection for {field}: {other}")))?,
            };
            if field == ID_FIELD {
                include_id = keep;
            } else if keep {
                included.push(field.clone());
            } else {
                excluded.push(field.clone());
            }
        }

        if !included.is_empty() && !excluded.is_empty() {
            return Err(ChatError::Query("cannot mix inclusion and exclusion in a projection".into()));
        }

        // `{_id: 1}` alone is an inclusion projection of just the id
        let inclusion = !included.is_empty() || (excluded.is_empty() && include_id && spec.contains_key(ID_FIELD));
        Ok(Self {
            include_id,
            included: inclusion.then_some(included),
            excluded,
        })
    }

    fn apply(&self, doc: &Document) -> Document {
        let mut out = match &self.included {
            Some(paths) => {
                let mut out = include_paths(doc, paths);
                if self.include_id {
                    if let Some(id) = doc.get(ID_FIELD) {
                        let mut with_id = Document::new();
                        with_id.insert(ID_FIELD, id.clone());
                        for (key, value) in out {
                            with_id.insert(key, value);
                        }
                        out = with_id;
                    }
                }
                out
            }
            None => exclude_paths(doc, &self.excluded),
        };
        if !self.include_id {
            out.remove(ID_FIELD);
        }
        out
    }
}

/// Child paths of `key` among `paths`: `Some(vec![])` when `key` itself is listed.
fn child_paths(paths: &[String], key: &str) -> Option<Vec<String>> {
    let mut children = Vec::new();
    let mut hit = false;
    for path in paths {
        if path == key {
            return Some(Vec::new());
        }
        if let Some(rest) = path.strip_prefix(key).and_then(|r| r.strip_prefix('.')) {
            children.push(rest.to_string());
            hit = true;
        }
    }
    hit.then_some(children)
}

fn include_paths(doc: &Document, paths: &[String]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc {
        if key == ID_FIELD {
            continue;
        }
        let Some(children) = child_paths(paths, key) else { continue };
        if children.is_empty() {
            out.insert(key.clone(), value.clone());
            continue;
        }
        match value {
            Bson::Document(inner) => {
                out.insert(key.clone(), include_paths(inner, &children));
            }
            Bson::Array(items) => {
                let projected: Vec<Bson> = items
                    .iter()
                    .filter_map(|item| match item {
                        Bson::Document(inner) => Some(Bson::Document(include_paths(inner, &children))),
                        _ => None,
                    })
                    .collect();
                out.insert(key.clone(), projected);
            }
            _ => {}
        }
    }
    out
}

fn exclude_paths(doc: &Document, paths: &[String]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc {
        match child_paths(paths, key) {
            Some(children) if children.is_empty() => {}
            Some(children) => {
                let projected = match value {
                    Bson::Document(inner) => Bson::Document(exclude_paths(inner, &children)),
                    Bson::Array(items) => Bson::Array(
                        items
                            .iter()
                            .map(|item| match item {
                                Bson::Document(inner) => Bson::Document(exclude_paths(inner, &children)),
                                other => other.clone(),
                            })
                            .collect(),
                    ),
                    other => other.clone(),
                };
                out.insert(key.clone(), projected);
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> MemoryStore {
        MemoryStore::from_documents(vec![
            doc! { "_id": 1, "name": "Ann", "age": 31, "tags": ["admin", "ops"], "address": { "city": "Oslo" } },
            doc! { "_id": 2, "name": "bob", "age": 25.5, "tags": ["ops"], "address": { "city": "Bergen" } },
            doc! { "_id": 3, "name": "Cid", "age": 40, "tags": [], "pets": [ { "kind": "cat" }, { "kind": "dog" } ] },
            doc! { "_id": 4, "name": "Dee", "age": Bson::Null },
        ])
    }

    async fn find_ids(store: &MemoryStore, plan: FindPlan) -> Vec<i32> {
        store
            .find(plan)
            .await
            .unwrap()
            .iter()
            .map(|d| d.get_i32("_id").unwrap())
            .collect()
    }

    fn filtered(filter: Document) -> FindPlan {
        FindPlan { filter, ..FindPlan::default() }
    }

    #[tokio::test]
    async fn test_missing_ids_are_assigned() {
        let store = MemoryStore::from_documents(vec![doc! { "name": "x" }]);
        let docs = store.sample(1).await.unwrap();
        assert!(matches!(docs[0].get(ID_FIELD), Some(Bson::ObjectId(_))));
        assert_eq!(docs[0].keys().next().map(String::as_str), Some(ID_FIELD));
    }

    #[tokio::test]
    async fn test_comparison_crosses_numeric_types() {
        let store = people();
        assert_eq!(find_ids(&store, filtered(doc! { "age": { "$gt": 30 } })).await, vec![1, 3]);
        assert_eq!(find_ids(&store, filtered(doc! { "age": { "$lte": 25.5 } })).await, vec![2]);
        assert_eq!(find_ids(&store, filtered(doc! { "age": { "$gte": 25, "$lt": 40 } })).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_equality_reaches_into_arrays_and_paths() {
        let store = people();
        assert_eq!(find_ids(&store, filtered(doc! { "tags": "ops" })).await, vec![1, 2]);
        assert_eq!(find_ids(&store, filtered(doc! { "address.city": "Oslo" })).await, vec![1]);
        assert_eq!(find_ids(&store, filtered(doc! { "pets.kind": "dog" })).await, vec![3]);
        assert_eq!(find_ids(&store, filtered(doc! { "pets.0.kind": "cat" })).await, vec![3]);
    }

    #[tokio::test]
    async fn test_null_matches_missing() {
        let store = people();
        assert_eq!(find_ids(&store, filtered(doc! { "address": Bson::Null })).await, vec![3, 4]);
        assert_eq!(find_ids(&store, filtered(doc! { "pets": { "$exists": true } })).await, vec![3]);
    }

    #[tokio::test]
    async fn test_set_and_logical_operators() {
        let store = people();
        assert_eq!(find_ids(&store, filtered(doc! { "name": { "$in": ["Ann", "Dee"] } })).await, vec![1, 4]);
        assert_eq!(find_ids(&store, filtered(doc! { "name": { "$nin": ["Ann", "Dee"] } })).await, vec![2, 3]);
        assert_eq!(
            find_ids(&store, filtered(doc! { "$or": [ { "age": { "$lt": 26 } }, { "name": "Cid" } ] })).await,
            vec![2, 3]
        );
        assert_eq!(
            find_ids(&store, filtered(doc! { "$and": [ { "tags": "ops" }, { "age": { "$gt": 30 } } ] })).await,
            vec![1]
        );
        assert_eq!(find_ids(&store, filtered(doc! { "$nor": [ { "tags": "ops" } ] })).await, vec![3, 4]);
        assert_eq!(find_ids(&store, filtered(doc! { "tags": { "$size": 0 } })).await, vec![3]);
    }

    #[tokio::test]
    async fn test_regex_with_options() {
        let store = people();
        assert_eq!(find_ids(&store, filtered(doc! { "name": { "$regex": "^b", "$options": "i" } })).await, vec![2]);
        assert_eq!(find_ids(&store, filtered(doc! { "name": { "$not": { "$regex": "^[A-C]" } } })).await, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_unknown_operator_is_an_error() {
        let store = people();
        let err = store.find(filtered(doc! { "age": { "$near": 3 } })).await.unwrap_err();
        assert!(err.to_string().contains("$near"));
        assert!(store.find(filtered(doc! { "$where": "1" })).await.is_err());
    }

    #[tokio::test]
    async fn test_sort_skip_limit() {
        let store = people();
        let plan = FindPlan {
            sort: Some(doc! { "age": -1 }),
            skip: Some(1),
            limit: 2,
            ..FindPlan::default()
        };
        // 40, 31, 25.5, null
        assert_eq!(find_ids(&store, plan).await, vec![1, 2]);

        let plan = FindPlan { sort: Some(doc! { "name": "asc" }), ..FindPlan::default() };
        // uppercase sorts before lowercase
        assert_eq!(find_ids(&store, plan).await, vec![1, 3, 4, 2]);

        let plan = FindPlan { sort: Some(doc! { "age": 2 }), ..FindPlan::default() };
        assert!(store.find(plan).await.is_err());
    }

    #[tokio::test]
    async fn test_inclusion_projection_keeps_id_first() {
        let store = people();
        let plan = FindPlan {
            filter: doc! { "_id": 1 },
            projection: Some(doc! { "name": 1, "address.city": 1 }),
            ..FindPlan::default()
        };
        let docs = store.find(plan).await.unwrap();
        assert_eq!(docs[0], doc! { "_id": 1, "name": "Ann", "address": { "city": "Oslo" } });
    }

    #[tokio::test]
    async fn test_exclusion_projection_and_id_suppression() {
        let store = people();
        let plan = FindPlan {
            filter: doc! { "_id": 2 },
            projection: Some(doc! { "_id": 0, "tags": 0, "address": 0 }),
            ..FindPlan::default()
        };
        let docs = store.find(plan).await.unwrap();
        assert_eq!(docs[0], doc! { "name": "bob", "age": 25.5 });

        let plan = FindPlan {
            filter: doc! { "_id": 2 },
            projection: Some(doc! { "_id": 0, "name": 1 }),
            ..FindPlan::default()
        };
        assert_eq!(store.find(plan).await.unwrap()[0], doc! { "name": "bob" });
    }

    #[tokio::test]
    async fn test_mixed_projection_is_an_error() {
        let store = people();
        let plan = FindPlan { projection: Some(doc! { "name": 1, "age": 0 }), ..FindPlan::default() };
        assert!(store.find(plan).await.is_err());
    }

    #[tokio::test]
    async fn test_count_and_sample() {
        let store = people();
        assert_eq!(store.count(Document::new()).await.unwrap(), 4);
        assert_eq!(store.count(doc! { "tags": "ops" }).await.unwrap(), 2);
        assert_eq!(store.sample(1).await.unwrap().len(), 1);
        assert!(MemoryStore::new().sample(1).await.unwrap().is_empty());
    }
}
