use crate::deserialization::IntoFields;
use crate::error::RecordError;
use crate::plain_value::{FastMap, PlainMap};
use crate::types::RecordRef;
use crate::value::Value;
use smol_str::SmolStr;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ─── Record ─────────────────────────────────────────────────────────────────
/// Ordered, mutable container over JSON-like data.
///
/// Two tables are kept side by side:
///
/// * `fields` holds the raw value last assigned to each key, in insertion
///   order. It drives `count`, `key_at` and iteration.
/// * `attrs` holds the classified view (nested records, sequences,
///   scalars). It drives `get`, `isset`, `flatten` and serialization, and is
///   the only table a child writes into when it propagates.
///
/// Not `Send`: records are meant for one request/response on one thread.
pub struct Record {
    pub(crate) fields: PlainMap,
    pub(crate) attrs: FastMap<SmolStr, Value>,
    /// Receives a shallow copy of `attrs` after every `set`. Never read from.
    pub(crate) parent: Option<Weak<RefCell<Record>>>,
    /// Position of the shared cursor, see [`Record::cursor`].
    pub(crate) cursor: usize,
}

impl Record {
    /// Build a record from an object or a JSON object string.
    pub fn new(data: impl IntoFields) -> Result<Self, RecordError> {
        Self::build(data, None)
    }

    /// Build a record whose fields are pushed into `parent` after every
    /// mutation. Only a weak link is kept.
    pub fn with_parent(data: impl IntoFields, parent: &RecordRef) -> Result<Self, RecordError> {
        Self::build(data, Some(Rc::downgrade(parent)))
    }

    /// Shorthand for `Record::new(data)?.into_shared()`.
    pub fn shared(data: impl IntoFields) -> Result<RecordRef, RecordError> {
        Ok(Self::new(data)?.into_shared())
    }

    fn build(data: impl IntoFields, parent: Option<Weak<RefCell<Record>>>) -> Result<Self, RecordError> {
        let map = data.into_fields()?;
        tracing::debug!(fields = map.len(), linked = parent.is_some(), "building record");
        let mut record = Self::empty(parent);
        record.set(map)?;
        Ok(record)
    }

    pub(crate) fn empty(parent: Option<Weak<RefCell<Record>>>) -> Self {
        Self {
            fields: PlainMap::default(),
            attrs: FastMap::default(),
            parent,
            cursor: 0,
        }
    }

    /// Parentless record from an already validated map. Cannot fail: the
    /// record starts empty, so nothing is merged into a shared child.
    pub(crate) fn from_map(map: PlainMap) -> Self {
        let mut record = Self::empty(None);
        for (key, value) in map {
            record.attrs.insert(key.clone(), Value::from(value.clone()));
            record.fields.insert(key, value);
        }
        record
    }

    #[inline]
    pub fn into_shared(self) -> RecordRef {
        Rc::new(RefCell::new(self))
    }

    /// The parent, if one was given and is still alive.
    pub fn parent(&self) -> Option<RecordRef> {
        self.parent.as_ref()?.upgrade()
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }
}

impl Clone for Record {
    /// Deep copy through [`Record::flatten`]. The copy has no parent and a
    /// fresh cursor.
    ///
    /// Panics if a nested record is mutably borrowed; see
    /// [`Record::try_flatten`].
    fn clone(&self) -> Self {
        Self::from_map(self.flatten())
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::empty(None)
    }
}
