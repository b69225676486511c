use super::error::RecordError;
use super::plain_value::{PlainMap, PlainValue};
use super::types::{EncodeConfig, Layout};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use smol_str::SmolStr;
use std::io;

// ─── Fallback text ──────────────────────────────────────────────────────────

/// Text form used for values JSON cannot spell: apostrophes dropped and every
/// `>` written as `/>`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' => {}
            '>' => out.push_str("/>"),
            c => out.push(c),
        }
    }
    out
}

/// Whether a value has a native JSON encoding. Containers qualify when every
/// element does.
pub fn is_json_representable(value: &PlainValue) -> bool {
    match value {
        PlainValue::Null | PlainValue::Bool(_) | PlainValue::Str(_) => true,
        PlainValue::Number(n) => n.is_finite(),
        PlainValue::Opaque(_) => false,
        PlainValue::Array(arr) => arr.iter().all(is_json_representable),
        PlainValue::Object(map) => map.values().all(is_json_representable),
    }
}

fn fallback(value: &PlainValue) -> PlainValue {
    let text = match value {
        PlainValue::Opaque(o) => o.render(),
        PlainValue::Number(n) => n.to_string(),
        other => format!("{:?}", other),
    };
    PlainValue::Str(SmolStr::from(sanitize(&text)))
}

// ─── Normalize ──────────────────────────────────────────────────────────────

fn normalize_value(value: PlainValue) -> PlainValue {
    match value {
        PlainValue::Object(map) => PlainValue::Object(normalize_map(map)),
        PlainValue::Array(arr) => PlainValue::Array(arr.into_iter().map(normalize_value).collect()),
        scalar if is_json_representable(&scalar) => scalar,
        scalar => fallback(&scalar),
    }
}

/// Replace every scalar without a JSON encoding by its sanitized text,
/// recursing through objects and arrays. Key order is kept.
pub fn normalize_map(map: PlainMap) -> PlainMap {
    map.into_iter()
        .map(|(k, v)| (k, normalize_value(v)))
        .collect()
}

// ─── Encode ─────────────────────────────────────────────────────────────────

fn encode_with<F: Formatter>(map: &PlainMap, formatter: F) -> Result<String, RecordError> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    PlainMapRef(map).serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| RecordError::Encoding(e.to_string()))
}

/// Single line with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Encode an already normalized map as JSON text.
pub fn encode(map: &PlainMap, config: &EncodeConfig) -> Result<String, RecordError> {
    match config.layout {
        Layout::Compact => encode_with(map, CompactFormatter),
        Layout::Spaced => encode_with(map, SpacedFormatter),
        Layout::Pretty(width) => {
            let indent = vec![b' '; width];
            encode_with(map, PrettyFormatter::with_indent(&indent))
        }
    }
}

struct PlainMapRef<'a>(&'a PlainMap);

impl Serialize for PlainMapRef<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut m = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plain;
    use crate::plain_value::{Blob, Opaque};

    #[derive(Debug)]
    struct Jar;

    impl std::fmt::Display for Jar {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "<CookieJar[<Cookie 'sid'=1>]>")
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("it's <b>"), "its <b/>");
        assert_eq!(sanitize("plain"), "plain");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_representable_predicate() {
        assert!(is_json_representable(&PlainValue::from("x")));
        assert!(is_json_representable(&PlainValue::from(1.5f64)));
        assert!(!is_json_representable(&PlainValue::from(f64::INFINITY)));
        assert!(!is_json_representable(&PlainValue::from(Blob(vec![0]))));
        assert!(!is_json_representable(&plain!([1, (Opaque::new(Jar))])));
    }

    #[test]
    fn test_normalize_replaces_nested_opaque() {
        let v = plain!({ "jar" => (Opaque::new(Jar)), "list" => [1, (Opaque::new(Jar))], "nan" => (f64::NAN) });
        let PlainValue::Object(map) = v else { unreachable!() };
        let out = normalize_map(map);
        let expected = "<CookieJar[<Cookie sid=1/>]/>";
        assert_eq!(out["jar"].as_str(), Some(expected));
        assert_eq!(out["list"].as_array().unwrap()[1].as_str(), Some(expected));
        assert_eq!(out["list"].as_array().unwrap()[0].as_i64(), Some(1));
        assert_eq!(out["nan"].as_str(), Some("NaN"));
    }

    #[test]
    fn test_encode_pretty_and_compact() {
        let PlainValue::Object(map) = plain!({ "id" => 7, "name" => "ari" }) else {
            unreachable!()
        };
        assert_eq!(
            encode(&map, &EncodeConfig::default()).unwrap(),
            r#"{"id": 7, "name": "ari"}"#
        );
        let compact = EncodeConfig { layout: Layout::Compact };
        assert_eq!(encode(&map, &compact).unwrap(), r#"{"id":7,"name":"ari"}"#);
        let pretty = encode(&map, &EncodeConfig { layout: Layout::Pretty(2) }).unwrap();
        assert_eq!(pretty, "{\n  \"id\": 7,\n  \"name\": \"ari\"\n}");
    }
}
