//! Catalog files

use serde_json::Value;
use shopmatch_core::{Error, Result};
use std::fs;
use std::path::Path;

/// Read raw catalog records from a JSON file.
///
/// Accepts either a top-level array of records or an object with a
/// `products` array. Records are not validated here; that is the catalog
/// load's job.
pub fn read_catalog(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    parse_catalog(&text)
}

pub fn parse_catalog(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => match object.remove("products") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(Error::Serialization(
                "expected an array of products or an object with a \"products\" array"
                    .to_string(),
            )),
        },
        _ => Err(Error::Serialization(
            "expected an array of products or an object with a \"products\" array".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_and_wrapped_forms() {
        assert_eq!(parse_catalog(r#"[{"id": 1}]"#).unwrap().len(), 1);
        assert_eq!(
            parse_catalog(r#"{"products": [{"id": 1}, {"id": 2}]}"#).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(matches!(parse_catalog("42"), Err(Error::Serialization(_))));
        assert!(matches!(parse_catalog(r#"{"items": []}"#), Err(Error::Serialization(_))));
        assert!(matches!(parse_catalog("not json"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = read_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
