use super::error::RecordError;
use super::plain_value::{PlainMap, PlainValue};
use smol_str::SmolStr;

// ─── IntoFields Trait ───────────────────────────────────────────────────────

/// Anything a record can be built from or merged with.
///
/// Conversion runs to completion before a record is touched, so a failed
/// `Record::new` or `Record::set` never leaves half-applied fields behind.
pub trait IntoFields {
    fn into_fields(self) -> Result<PlainMap, RecordError>;
}

impl IntoFields for PlainMap {
    #[inline]
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        Ok(self)
    }
}

impl IntoFields for PlainValue {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        match self {
            PlainValue::Object(map) => Ok(map),
            other => Err(RecordError::InvalidData(format!(
                "record data must be an object or a JSON string, {} given",
                other.kind()
            ))),
        }
    }
}

impl IntoFields for serde_json::Value {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        PlainValue::from(self).into_fields()
    }
}

impl IntoFields for serde_json::Map<String, serde_json::Value> {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        Ok(self
            .into_iter()
            .map(|(k, v)| (SmolStr::from(k), PlainValue::from(v)))
            .collect())
    }
}

impl IntoFields for &str {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        parse_json(self)?.into_fields()
    }
}

impl IntoFields for String {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        self.as_str().into_fields()
    }
}

impl IntoFields for &String {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        self.as_str().into_fields()
    }
}

impl<K: Into<SmolStr>, V: Into<PlainValue>, const N: usize> IntoFields for [(K, V); N] {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<SmolStr>, V: Into<PlainValue>> IntoFields for Vec<(K, V)> {
    fn into_fields(self) -> Result<PlainMap, RecordError> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse JSON text keeping object key order.
pub fn parse_json(text: &str) -> Result<PlainValue, RecordError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RecordError::InvalidData(format!("invalid JSON string: {}", e)))?;
    Ok(PlainValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_string() {
        let map = r#"{"b": 1, "a": {"c": null}}"#.into_fields().unwrap();
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(map["a"].get("c").unwrap().is_null());
    }

    #[test]
    fn test_malformed_json_is_invalid_data() {
        let err = "{not json".into_fields().unwrap_err();
        assert!(matches!(err, RecordError::InvalidData(_)));
    }

    #[test]
    fn test_non_object_root_is_invalid_data() {
        for text in ["[1, 2]", "42", "\"str\"", "null"] {
            let err = text.into_fields().unwrap_err();
            assert!(matches!(err, RecordError::InvalidData(_)), "{text}");
        }
        let err = PlainValue::from(true).into_fields().unwrap_err();
        assert!(err.to_string().contains("bool given"));
    }

    #[test]
    fn test_pairs() {
        let map = [("x", 1), ("y", 2)].into_fields().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["y"].as_i64(), Some(2));
    }
}
