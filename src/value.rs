use super::error::RecordError;
use super::plain_value::PlainValue;
use super::record::Record;
use super::types::RecordRef;
use smol_str::SmolStr;
use std::fmt;
use std::rc::Rc;

// ─── Value ──────────────────────────────────────────────────────────────────

/// What a record field holds once classified.
#[derive(Clone)]
pub enum Value {
    /// Anything that is neither an object nor a top-level array. An array
    /// nested inside a sequence also stays here, untouched.
    Scalar(PlainValue),
    /// Child record built from an object. Shared, so merges keep identity.
    Nested(RecordRef),
    /// Built from an array: object elements become parentless records,
    /// everything else stays a scalar.
    Sequence(Vec<Value>),
}

impl Value {
    /// Classify one element of an incoming array.
    pub(crate) fn from_element(item: PlainValue) -> Value {
        match item {
            PlainValue::Object(map) => Value::Nested(Record::from_map(map).into_shared()),
            other => Value::Scalar(other),
        }
    }

    pub fn as_scalar(&self) -> Option<&PlainValue> {
        match self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Nested(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar()?.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar()?.as_i64()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_scalar()?.as_u64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar()?.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar()?.as_bool()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(PlainValue::Null))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Nested(_))
    }

    /// True when both values point at the same nested record.
    pub fn same_record(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nested(a), Value::Nested(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Plain copy of this value, nested records flattened.
    ///
    /// Panics if a nested record is mutably borrowed, like
    /// [`RefCell::borrow`](std::cell::RefCell::borrow).
    pub fn to_plain(&self) -> PlainValue {
        match self {
            Value::Scalar(v) => v.clone(),
            Value::Nested(r) => PlainValue::Object(r.borrow().flatten()),
            Value::Sequence(items) => PlainValue::Array(items.iter().map(Value::to_plain).collect()),
        }
    }

    /// Like [`Value::to_plain`], but a mutably borrowed nested record gives
    /// `Busy(key)`. `key` names the field this value sits under.
    pub fn try_to_plain(&self, key: &SmolStr) -> Result<PlainValue, RecordError> {
        Ok(match self {
            Value::Scalar(v) => v.clone(),
            Value::Nested(r) => {
                let inner = r.try_borrow().map_err(|_| RecordError::Busy(key.clone()))?;
                PlainValue::Object(inner.try_flatten()?)
            }
            Value::Sequence(items) => PlainValue::Array(
                items
                    .iter()
                    .map(|item| item.try_to_plain(key))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "Scalar({:?})", v),
            Value::Nested(r) => match r.try_borrow() {
                Ok(inner) => write!(f, "Nested({:?})", inner.flatten()),
                Err(_) => f.write_str("Nested(<borrowed>)"),
            },
            Value::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

impl From<PlainValue> for Value {
    /// Same classification `Record::set` applies to a field.
    fn from(value: PlainValue) -> Self {
        match value {
            PlainValue::Object(map) => Value::Nested(Record::from_map(map).into_shared()),
            PlainValue::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_element).collect())
            }
            scalar => Value::Scalar(scalar),
        }
    }
}
