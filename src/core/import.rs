//! Import of external catalog documents
//!
//! Documents written by older versions use English enum values and omit the
//! element type tag. Every document is normalized into the current schema
//! before it is accepted; a document that cannot be read is rejected as a
//! whole.

use crate::core::data::{
    Auspiciousness, Category, ELEMENT_TYPE_TAG, Entry, Polarity, Store, new_record_id,
};
use crate::utils::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

type Fields = Map<String, Value>;

/// Parse `text` as a (possibly legacy) catalog document and convert it to
/// the current schema. Categories missing from the document come back empty.
pub fn import_str(text: &str) -> AppResult<Store> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| AppError::ImportParse(e.to_string()))?;

    let Value::Object(mut document) = document else {
        return Err(AppError::ImportParse(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let store = Store {
        stars: convert_category(&mut document, Category::Star, remap_star)?,
        gates: convert_category(&mut document, Category::Gate, stamp_element_type)?,
        spirits: convert_category(&mut document, Category::Spirit, stamp_element_type)?,
        formations: convert_category(&mut document, Category::Formation, remap_formation)?,
    };

    if !document.is_empty() {
        let ignored: Vec<&str> = document.keys().map(String::as_str).collect();
        debug!(?ignored, "ignoring unknown top-level keys in import document");
    }

    info!(
        stars = store.stars.len(),
        gates = store.gates.len(),
        spirits = store.spirits.len(),
        formations = store.formations.len(),
        "converted import document"
    );

    Ok(store)
}

/// Read an import file. Only `.json` files are accepted.
pub async fn read_import_file(path: &Path) -> AppResult<String> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(AppError::FileRead(format!(
            "{} is not a .json file",
            path.display()
        )));
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::FileRead(format!("{}: {}", path.display(), e)))
}

fn convert_category<T>(
    document: &mut Fields,
    category: Category,
    remap: fn(&mut Fields),
) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Entry,
{
    let items = match document.remove(category.key()) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::ImportParse(format!(
                "{} must be a list of records",
                category.key()
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(mut fields) = item else {
                return Err(AppError::ImportParse(format!(
                    "{} record #{} is not an object",
                    category.key(),
                    index + 1
                )));
            };

            normalize_text_fields(&mut fields);
            remap(&mut fields);

            let mut record: T = serde_json::from_value(Value::Object(fields)).map_err(|e| {
                AppError::ImportParse(format!("{} record #{}: {}", category.key(), index + 1, e))
            })?;
            if record.id().is_empty() {
                record.set_id(new_record_id());
            }
            Ok(record)
        })
        .collect()
}

const TEXT_FIELDS: [&str; 4] = ["id", "name", "element", "description"];

/// Older documents carry nulls and bare scalars in text fields.
/// Nulls are dropped so defaults apply; other values become their string form.
fn normalize_text_fields(fields: &mut Fields) {
    for key in TEXT_FIELDS {
        match fields.get(key) {
            Some(Value::Null) => {
                fields.remove(key);
            }
            Some(Value::String(_)) | None => {}
            Some(other) => {
                let text = other.to_string();
                fields.insert(key.to_string(), Value::String(text));
            }
        }
    }
}

fn stamp_element_type(fields: &mut Fields) {
    fields.insert(
        "elementType".to_string(),
        Value::String(ELEMENT_TYPE_TAG.to_string()),
    );
}

fn remap_star(fields: &mut Fields) {
    stamp_element_type(fields);
    let polarity = Polarity::from_legacy(fields.get("yinYang").and_then(Value::as_str));
    fields.insert(
        "yinYang".to_string(),
        Value::String(polarity.token().to_string()),
    );
}

fn remap_formation(fields: &mut Fields) {
    let auspiciousness =
        Auspiciousness::from_legacy(fields.get("auspiciousness").and_then(Value::as_str));
    fields.insert(
        "auspiciousness".to_string(),
        Value::String(auspiciousness.token().to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_yin_becomes_am() {
        let store = import_str(r#"{"CửuTinh":[{"id":"1","yinYang":"Yin"}]}"#).unwrap();
        assert_eq!(store.stars.len(), 1);
        assert_eq!(store.stars[0].element_type, ELEMENT_TYPE_TAG);
        assert_eq!(store.stars[0].yin_yang, Polarity::Am);
    }

    #[test]
    fn test_non_yin_polarity_becomes_duong() {
        for value in [r#""Unknown""#, r#""Yang""#, r#""Âm""#, "null", "3"] {
            let text = format!(r#"{{"CửuTinh":[{{"id":"1","yinYang":{}}}]}}"#, value);
            let store = import_str(&text).unwrap();
            assert_eq!(store.stars[0].yin_yang, Polarity::Duong, "input {}", value);
        }

        let store = import_str(r#"{"CửuTinh":[{"id":"1"}]}"#).unwrap();
        assert_eq!(store.stars[0].yin_yang, Polarity::Duong);
    }

    #[test]
    fn test_auspiciousness_remap() {
        let store = import_str(
            r#"{"CáchCục":[
                {"id":"1","auspiciousness":"Auspicious"},
                {"id":"2","auspiciousness":"Inauspicious"},
                {"id":"3","auspiciousness":"Weird"},
                {"id":"4","auspiciousness":"Cát"},
                {"id":"5"}
            ]}"#,
        )
        .unwrap();

        let values: Vec<Auspiciousness> =
            store.formations.iter().map(|f| f.auspiciousness).collect();
        assert_eq!(
            values,
            vec![
                Auspiciousness::Cat,
                Auspiciousness::Hung,
                Auspiciousness::TuyThuoc,
                Auspiciousness::TuyThuoc,
                Auspiciousness::TuyThuoc,
            ]
        );
    }

    #[test]
    fn test_element_type_stamped_on_gates_and_spirits() {
        let store = import_str(
            r#"{"BátMôn":[{"id":"g","elementType":"Other"}],"BátThần":[{"id":"s"}]}"#,
        )
        .unwrap();
        assert_eq!(store.gates[0].element_type, ELEMENT_TYPE_TAG);
        assert_eq!(store.spirits[0].element_type, ELEMENT_TYPE_TAG);
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let store = import_str("{}").unwrap();
        assert_eq!(store, Store::default());

        let store = import_str(r#"{"BátMôn":null}"#).unwrap();
        assert!(store.gates.is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = import_str("{not json").unwrap_err();
        assert!(matches!(err, AppError::ImportParse(ref msg) if msg.contains("line 1")));
    }

    #[test]
    fn test_wrong_shapes_are_parse_errors() {
        assert!(matches!(import_str("[1, 2]"), Err(AppError::ImportParse(_))));
        assert!(matches!(
            import_str(r#"{"CửuTinh": {"id": "1"}}"#),
            Err(AppError::ImportParse(_))
        ));
        assert!(matches!(
            import_str(r#"{"CửuTinh": ["star"]}"#),
            Err(AppError::ImportParse(_))
        ));
    }

    #[test]
    fn test_null_and_scalar_text_fields_are_tolerated() {
        let store = import_str(
            r#"{"CửuTinh":[{"id":"1","name":"Thiên Bồng","yinYang":"Yin","description":null}]}"#,
        )
        .unwrap();
        assert_eq!(store.stars[0].name, "Thiên Bồng");
        assert_eq!(store.stars[0].description, "");
        assert_eq!(store.stars[0].yin_yang, Polarity::Am);

        let store = import_str(r#"{"BátMôn":[{"id":null,"name":"Hưu Môn","element":5}]}"#).unwrap();
        assert!(!store.gates[0].id.is_empty());
        assert_eq!(store.gates[0].element, "5");

        let store = import_str(r#"{"CáchCục":[{"id":true,"name":42}]}"#).unwrap();
        assert_eq!(store.formations[0].id, "true");
        assert_eq!(store.formations[0].name, "42");
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let store =
            import_str(r#"{"BátThần":[{"id":"s","name":"Cửu Địa","direction":"Bắc"}]}"#).unwrap();
        assert_eq!(store.spirits[0].name, "Cửu Địa");
        assert_eq!(
            store.spirits[0].extra.get("direction"),
            Some(&Value::String("Bắc".to_string()))
        );
    }

    #[test]
    fn test_ids_are_normalized_or_generated() {
        let store = import_str(r#"{"BátMôn":[{"id":7},{"name":"Cảnh Môn"}]}"#).unwrap();
        assert_eq!(store.gates[0].id, "7");
        assert!(!store.gates[1].id.is_empty());
    }

    #[tokio::test]
    async fn test_read_import_file_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "{}").unwrap();

        let err = read_import_file(&path).await.unwrap_err();
        assert!(matches!(err, AppError::FileRead(_)));
    }

    #[tokio::test]
    async fn test_read_import_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_import_file(&dir.path().join("missing.JSON"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FileRead(ref msg) if msg.contains("missing.JSON")));
    }

    #[tokio::test]
    async fn test_read_import_file_returns_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, r#"{"CửuTinh":[]}"#).unwrap();

        assert_eq!(read_import_file(&path).await.unwrap(), r#"{"CửuTinh":[]}"#);
    }
}
