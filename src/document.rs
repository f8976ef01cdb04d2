//! Conversions between store-native BSON documents and the plain JSON
//! documents that leave the query layer.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::error::Result;

/// Name of the store-assigned identifier field.
pub const ID_FIELD: &str = "_id";

/// A result document: JSON-native values only, identifier already a string.
pub type JsonDocument = Map<String, Value>;

/// String form of an identifier value. ObjectIds become their hex string.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

/// Replace the identifier field, if present, with its string form.
pub fn stringify_id(doc: &mut Document) {
    if let Some(id) = doc.get(ID_FIELD) {
        let id = id_to_string(id);
        doc.insert(ID_FIELD, Bson::String(id));
    }
}

/// Convert a store document into a JSON-safe result document.
pub fn to_json_document(mut doc: Document) -> JsonDocument {
    stringify_id(&mut doc);
    doc.into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect()
}

/// Convert a JSON mapping (filter, projection, sort) into a BSON document.
pub fn to_bson_document(map: &Map<String, Value>) -> Result<Document> {
    Ok(mongodb::bson::to_document(map)?)
}

/// Runtime type name of a BSON value, as shown in schema summaries.
pub fn type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Double(_) => "double",
        Bson::String(_) => "string",
        Bson::Array(_) => "array",
        Bson::Document(_) => "object",
        Bson::Boolean(_) => "bool",
        Bson::Null | Bson::Undefined => "null",
        Bson::RegularExpression(_) => "regex",
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => "javascript",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binData",
        Bson::ObjectId(_) => "objectId",
        Bson::DateTime(_) => "date",
        Bson::Symbol(_) => "symbol",
        Bson::Decimal128(_) => "decimal",
        Bson::MaxKey => "maxKey",
        Bson::MinKey => "minKey",
        Bson::DbPointer(_) => "dbPointer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_object_id_becomes_hex_string() {
        let oid = ObjectId::new();
        let json = to_json_document(doc! { "_id": oid, "name": "Alice Johnson" });
        assert_eq!(json["_id"], json!(oid.to_hex()));
        assert_eq!(json["name"], json!("Alice Johnson"));
    }

    #[test]
    fn test_missing_id_is_left_alone() {
        let json = to_json_document(doc! { "gpa": 3.8 });
        assert!(!json.contains_key("_id"));
        assert_eq!(json["gpa"], json!(3.8));
    }

    #[test]
    fn test_non_object_id_identifiers() {
        assert_eq!(id_to_string(&Bson::String("S1001".into())), "S1001");
        assert_eq!(id_to_string(&Bson::Int32(7)), "7");
    }

    #[test]
    fn test_nested_values_stay_json_native() {
        let json = to_json_document(doc! {
            "courses_completed": [ { "course_id": "CSE 201", "grade": "A" } ],
            "enrollment_year": 2021,
        });
        assert_eq!(json["courses_completed"][0]["grade"], json!("A"));
        assert_eq!(json["enrollment_year"], json!(2021));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&Bson::String("x".into())), "string");
        assert_eq!(type_name(&Bson::Int32(1)), "int");
        assert_eq!(type_name(&Bson::Double(1.0)), "double");
        assert_eq!(type_name(&Bson::Array(vec![])), "array");
        assert_eq!(type_name(&Bson::Document(Document::new())), "object");
    }

    #[test]
    fn test_json_map_to_bson() {
        let map = json!({ "gpa": { "$gt": 3.5 } });
        let doc = to_bson_document(map.as_object().unwrap()).unwrap();
        assert_eq!(doc, doc! { "gpa": { "$gt": 3.5 } });
    }
}
