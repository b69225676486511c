use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::fmt;
use std::rc::Rc;

/// Insertion-ordered map used for every field table in the crate.
pub type FastMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type PlainMap = FastMap<SmolStr, PlainValue>;

// ─── PlainNumber ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
pub enum PlainNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for PlainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlainNumber::I64(i) => write!(f, "I64({})", i),
            PlainNumber::U64(u) => write!(f, "U64({})", u),
            PlainNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl fmt::Display for PlainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlainNumber::I64(i) => write!(f, "{}", i),
            PlainNumber::U64(u) => write!(f, "{}", u),
            PlainNumber::F64(v) => write!(f, "{}", v),
        }
    }
}

impl PlainNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            PlainNumber::I64(i) => i as f64,
            PlainNumber::U64(u) => u as f64,
            PlainNumber::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            PlainNumber::I64(i) => Some(i),
            PlainNumber::U64(u) => i64::try_from(u).ok(),
            PlainNumber::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            PlainNumber::U64(u) => Some(u),
            PlainNumber::I64(i) => u64::try_from(i).ok(),
            PlainNumber::F64(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    /// JSON has no spelling for NaN or the infinities.
    pub fn is_finite(self) -> bool {
        match self {
            PlainNumber::F64(f) => f.is_finite(),
            _ => true,
        }
    }
}

// ─── Opaque ─────────────────────────────────────────────────────────────────

/// Anything that can be stored in a record but has no JSON spelling.
/// The text form is what ends up in serialized output.
pub trait OpaqueScalar: fmt::Display + fmt::Debug {}

impl<T: fmt::Display + fmt::Debug + ?Sized> OpaqueScalar for T {}

/// Shared handle to a non-JSON scalar. Cloning shares the payload.
#[derive(Clone)]
pub struct Opaque(Rc<dyn OpaqueScalar>);

impl Opaque {
    pub fn new<T: OpaqueScalar + 'static>(value: T) -> Self {
        Opaque(Rc::new(value))
    }

    /// Raw text form, before any sanitizing.
    pub fn render(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:?})", self.0)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Raw bytes carried through a record untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<blob {} bytes>", self.0.len())
    }
}

// ─── PlainValue ─────────────────────────────────────────────────────────────

/// Record-unaware data tree: what goes into `Record::set` and what comes out
/// of `Record::flatten`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlainValue {
    #[default]
    Null,
    Bool(bool),
    Number(PlainNumber),
    Str(SmolStr),
    Opaque(Opaque),
    Array(Vec<PlainValue>),
    Object(PlainMap),
}

impl PlainValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlainValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PlainValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PlainValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PlainValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlainValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            PlainValue::Opaque(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PlainMap> {
        match self {
            PlainValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PlainValue>> {
        match self {
            PlainValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PlainValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PlainValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PlainValue::Null => "null",
            PlainValue::Bool(_) => "bool",
            PlainValue::Number(_) => "number",
            PlainValue::Str(_) => "string",
            PlainValue::Opaque(_) => "opaque",
            PlainValue::Array(_) => "array",
            PlainValue::Object(_) => "object",
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for PlainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlainValue::Null => serializer.serialize_none(),
            PlainValue::Bool(b) => serializer.serialize_bool(*b),
            PlainValue::Number(n) => match n {
                PlainNumber::I64(i) => serializer.serialize_i64(*i),
                PlainNumber::U64(u) => serializer.serialize_u64(*u),
                PlainNumber::F64(f) => serializer.serialize_f64(*f),
            },
            PlainValue::Str(s) => serializer.serialize_str(s.as_str()),
            PlainValue::Opaque(o) => {
                serializer.serialize_str(&crate::serialization::sanitize(&o.render()))
            }
            PlainValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            PlainValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for PlainValue {
    fn from(n: f64) -> Self {
        PlainValue::Number(PlainNumber::F64(n))
    }
}

impl From<i64> for PlainValue {
    fn from(n: i64) -> Self {
        PlainValue::Number(PlainNumber::I64(n))
    }
}

impl From<i32> for PlainValue {
    fn from(n: i32) -> Self {
        PlainValue::Number(PlainNumber::I64(n as i64))
    }
}

impl From<u64> for PlainValue {
    fn from(n: u64) -> Self {
        PlainValue::Number(PlainNumber::U64(n))
    }
}

impl From<bool> for PlainValue {
    fn from(b: bool) -> Self {
        PlainValue::Bool(b)
    }
}

impl From<&str> for PlainValue {
    fn from(s: &str) -> Self {
        PlainValue::Str(SmolStr::from(s))
    }
}

impl From<String> for PlainValue {
    fn from(s: String) -> Self {
        PlainValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for PlainValue {
    fn from(s: SmolStr) -> Self {
        PlainValue::Str(s)
    }
}

impl From<Opaque> for PlainValue {
    fn from(o: Opaque) -> Self {
        PlainValue::Opaque(o)
    }
}

impl From<Blob> for PlainValue {
    fn from(b: Blob) -> Self {
        PlainValue::Opaque(Opaque::new(b))
    }
}

impl From<Vec<PlainValue>> for PlainValue {
    fn from(arr: Vec<PlainValue>) -> Self {
        PlainValue::Array(arr)
    }
}

impl From<PlainMap> for PlainValue {
    fn from(map: PlainMap) -> Self {
        PlainValue::Object(map)
    }
}

impl<T: Into<PlainValue>> From<Option<T>> for PlainValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PlainValue::Null, Into::into)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for PlainValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => PlainValue::Null,
            serde_json::Value::Bool(b) => PlainValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PlainValue::Number(PlainNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    PlainValue::Number(PlainNumber::U64(u))
                } else {
                    PlainValue::Number(PlainNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => PlainValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                PlainValue::Array(arr.into_iter().map(PlainValue::from).collect())
            }
            serde_json::Value::Object(obj) => PlainValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), PlainValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<PlainValue> for serde_json::Value {
    fn from(val: PlainValue) -> Self {
        match val {
            PlainValue::Null => serde_json::Value::Null,
            PlainValue::Bool(b) => serde_json::Value::Bool(b),
            PlainValue::Number(n) => match n {
                PlainNumber::I64(i) => serde_json::json!(i),
                PlainNumber::U64(u) => serde_json::json!(u),
                PlainNumber::F64(f) => serde_json::json!(f),
            },
            PlainValue::Str(s) => serde_json::Value::String(s.to_string()),
            PlainValue::Opaque(o) => {
                serde_json::Value::String(crate::serialization::sanitize(&o.render()))
            }
            PlainValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            PlainValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Build an ordered [`PlainValue`] literal.
///
/// ```
/// use attr_record::plain;
/// let v = plain!({ "id" => 7, "tags" => ["a", "b"], "owner" => { "name" => "ari" } });
/// assert_eq!(v.get("id").and_then(|v| v.as_i64()), Some(7));
/// ```
#[macro_export]
macro_rules! plain {
    ({ $($key:expr => $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::plain_value::PlainMap::default();
        $(
            map.insert(
                $crate::SmolStr::from($key),
                $crate::plain!(@value $val),
            );
        )*
        $crate::plain_value::PlainValue::Object(map)
    }};

    ([ $($val:tt),* $(,)? ]) => {
        $crate::plain_value::PlainValue::Array(vec![ $( $crate::plain!(@value $val) ),* ])
    };

    (@value null) => {
        $crate::plain_value::PlainValue::Null
    };

    (@value { $($inner:tt)* }) => {
        $crate::plain!({ $($inner)* })
    };

    (@value [ $($inner:tt)* ]) => {
        $crate::plain!([ $($inner)* ])
    };

    (@value $val:expr) => {
        $crate::plain_value::PlainValue::from($val)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_macro_keeps_insertion_order() {
        let v = plain!({ "z" => 1, "a" => 2, "m" => null });
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert!(v.get("m").unwrap().is_null());
    }

    #[test]
    fn test_plain_macro_nested() {
        let v = plain!({ "outer" => { "inner" => [1, "two", { "x" => true }] } });
        let inner = v.get("outer").unwrap().get("inner").unwrap().as_array().unwrap();
        assert_eq!(inner.len(), 3);
        assert_eq!(inner[1].as_str(), Some("two"));
        assert_eq!(inner[2].get("x").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_number_conversions() {
        assert_eq!(PlainNumber::F64(3.0).as_i64(), Some(3));
        assert_eq!(PlainNumber::F64(3.5).as_i64(), None);
        assert_eq!(PlainNumber::I64(-1).as_u64(), None);
        assert_eq!(PlainNumber::U64(u64::MAX).as_i64(), None);
        assert!(!PlainNumber::F64(f64::NAN).is_finite());
        assert!(PlainNumber::U64(1).is_finite());
    }

    #[test]
    fn test_json_value_conversion_preserves_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"b": 1, "a": [true, null], "c": 1.5}"#).unwrap();
        let plain = PlainValue::from(json.clone());
        let keys: Vec<&str> = plain.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(serde_json::Value::from(plain), json);
    }

    #[test]
    fn test_opaque_identity_equality() {
        let a = Opaque::new(Blob(vec![1, 2, 3]));
        let b = a.clone();
        let c = Opaque::new(Blob(vec![1, 2, 3]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.render(), "<blob 3 bytes>");
    }
}
