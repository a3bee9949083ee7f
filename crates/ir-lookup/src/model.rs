use crate::error::{LookupError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One file's worth of IR: its symbol → type map plus optional crf metadata.
///
/// Both maps keep the key order of the source document, which decides the
/// tie-break between several substring matches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IrEntry {
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Map<String, Value>,

    #[serde(default, deserialize_with = "falsy_as_empty")]
    pub crf: Map<String, Value>,
}

impl IrEntry {
    /// Metadata for `name`; an explicit `null` counts as absent.
    pub fn crf_for(&self, name: &str) -> Option<&Value> {
        self.crf.get(name).filter(|value| !value.is_null())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Generators emit `[]`, `""`, `0` or `false` for "no metadata" as well as `null`.
fn falsy_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        value if is_falsy(&value) => Ok(Map::new()),
        other => Err(D::Error::custom(format!(
            "expected crf to be an object, found {other}"
        ))),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// The whole IR artifact: a JSON array of entries, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IrDocument {
    entries: Vec<IrEntry>,
}

impl IrDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LookupError::NotFound(path.to_path_buf()));
        }
        log::debug!("Loading IR from {}", path.display());

        let raw = fs::read_to_string(path).map_err(|source| LookupError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_str(&raw).map_err(|source| LookupError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded {} IR entries from {}", doc.len(), path.display());
        Ok(doc)
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn entries(&self) -> &[IrEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_entries_and_keeps_key_order() {
        let doc = IrDocument::from_json_str(
            r#"[{"fileName":"a.ts","messages":{"Zeta":"Z","Alpha":"A","Mid":{"k":1}}}]"#,
        )
        .unwrap();

        assert_eq!(doc.len(), 1);
        let entry = &doc.entries()[0];
        assert_eq!(entry.file_name.as_deref(), Some("a.ts"));
        let keys: Vec<&str> = entry.messages.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(entry.messages["Mid"], json!({"k": 1}));
        assert!(entry.crf.is_empty());
    }

    #[test]
    fn missing_or_null_maps_are_empty() {
        let doc = IrDocument::from_json_str(
            r#"[{"fileName":"a.ts"},{"messages":null,"crf":null},{"extra":true}]"#,
        )
        .unwrap();

        assert_eq!(doc.len(), 3);
        for entry in doc.entries() {
            assert!(entry.messages.is_empty());
            assert!(entry.crf.is_empty());
        }
        assert_eq!(doc.entries()[1].file_name, None);
    }

    #[test]
    fn crf_null_counts_as_absent() {
        let doc = IrDocument::from_json_str(
            r#"[{"messages":{"A":"x","B":"y"},"crf":{"A":null,"B":{"tag":7}}}]"#,
        )
        .unwrap();
        let entry = &doc.entries()[0];

        assert_eq!(entry.crf_for("A"), None);
        assert_eq!(entry.crf_for("B"), Some(&json!({"tag": 7})));
        assert_eq!(entry.crf_for("C"), None);
    }

    #[test]
    fn falsy_crf_values_are_empty() {
        let doc = IrDocument::from_json_str(
            r#"[{"messages":{"A":1},"crf":[]},{"crf":""},{"crf":0},{"crf":false},{"crf":{}}]"#,
        )
        .unwrap();

        assert_eq!(doc.len(), 5);
        for entry in doc.entries() {
            assert!(entry.crf.is_empty());
        }
        assert_eq!(doc.entries()[0].crf_for("A"), None);
    }

    #[test]
    fn truthy_non_object_crf_is_rejected() {
        let err = IrDocument::from_json_str(r#"[{"crf":["A"]}]"#).unwrap_err();
        assert!(err.to_string().contains("expected crf to be an object"));
        assert!(IrDocument::from_json_str(r#"[{"crf":"meta"}]"#).is_err());
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(IrDocument::from_json_str(r#"{"messages":{}}"#).is_err());
        assert!(IrDocument::from_json_str(r#"[{"messages":["A"]}]"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bin/json/ir.json");

        let err = IrDocument::load(&path).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("ir json not found: {}", path.display()));
    }

    #[test]
    fn load_wraps_parse_errors_with_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("ir.json");
        fs::write(&path, "[{").unwrap();

        let err = IrDocument::load(&path).unwrap_err();
        assert!(matches!(err, LookupError::Parse { .. }));
        assert!(err.to_string().contains("ir.json"));
    }
}
