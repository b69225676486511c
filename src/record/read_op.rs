use super::record::Record;
use crate::error::RecordError;
use crate::plain_value::PlainValue;
use crate::types::Values;
use crate::value::Value;
use smol_str::SmolStr;
use std::ops::Range;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Keyed access
    // ════════════════════════════════════════════════════════════════════════

    /// Current attribute value for `key`, including values pushed in by a
    /// child record.
    #[inline]
    pub fn get(&self, key: &str) -> Result<&Value, RecordError> {
        self.attrs
            .get(key)
            .ok_or_else(|| RecordError::NotFound(SmolStr::from(key)))
    }

    /// Whether `key` resolves to an attribute. Falsy values still count.
    #[inline]
    pub fn isset(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Follow a dotted path through nested records, e.g.
    /// `"hd_profile_pic_url_info.url"`. A numeric segment indexes into a
    /// sequence; negative numbers count from the end.
    pub fn lookup(&self, path: &str) -> Result<Value, RecordError> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or(path);
        let mut current = self.get(head)?.clone();
        for segment in segments {
            current = step(&current, segment)?;
        }
        Ok(current)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Positional access (field order)
    // ════════════════════════════════════════════════════════════════════════

    /// Number of fields. Keys only pushed in by a child are not counted.
    #[inline]
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn key_at(&self, index: usize) -> Result<&SmolStr, RecordError> {
        self.fields
            .get_index(index)
            .map(|(k, _)| k)
            .ok_or(RecordError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    pub fn value_at(&self, index: usize) -> Result<&Value, RecordError> {
        let key = self.key_at(index)?;
        self.get(key)
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.keys().map(|k| k.as_str())
    }

    #[inline]
    pub fn indices(&self) -> Range<usize> {
        0..self.fields.len()
    }

    /// Raw value last assigned to `key`, before classification.
    pub fn raw(&self, key: &str) -> Option<&PlainValue> {
        self.fields.get(key)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Iteration
    // ════════════════════════════════════════════════════════════════════════

    /// Walk values in field order. Every call starts over.
    #[inline]
    pub fn values(&self) -> Values<'_> {
        Values {
            record: self,
            pos: 0,
        }
    }

    /// Walk values using the record's own cursor. The cursor is never
    /// rewound: once a pass has run to the end, later passes yield nothing
    /// unless fields are added. Use [`Record::values`] for repeatable walks.
    #[inline]
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor { record: self }
    }
}

/// Iterator backed by the record's shared cursor, see [`Record::cursor`].
pub struct Cursor<'a> {
    record: &'a mut Record,
}

impl Iterator for Cursor<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.record.cursor;
        if index >= self.record.count() {
            return None;
        }
        self.record.cursor += 1;
        self.record.value_at(index).ok().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.count().saturating_sub(self.record.cursor);
        (0, Some(remaining))
    }
}

fn step(value: &Value, segment: &str) -> Result<Value, RecordError> {
    let missing = || RecordError::NotFound(SmolStr::from(segment));
    match value {
        Value::Nested(record) => {
            let record = record
                .try_borrow()
                .map_err(|_| RecordError::Busy(SmolStr::from(segment)))?;
            record.get(segment).cloned()
        }
        Value::Sequence(items) => {
            let index = resolve_index(segment, items.len()).ok_or_else(missing)?;
            Ok(items[index].clone())
        }
        Value::Scalar(PlainValue::Array(items)) => {
            let index = resolve_index(segment, items.len()).ok_or_else(missing)?;
            Ok(Value::Scalar(items[index].clone()))
        }
        Value::Scalar(PlainValue::Object(map)) => map
            .get(segment)
            .map(|v| Value::Scalar(v.clone()))
            .ok_or_else(missing),
        Value::Scalar(_) => Err(missing()),
    }
}

fn resolve_index(segment: &str, len: usize) -> Option<usize> {
    let index: i64 = segment.parse().ok()?;
    let index = if index < 0 { len as i64 + index } else { index };
    (0..len as i64).contains(&index).then_some(index as usize)
}
