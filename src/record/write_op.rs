use super::record::Record;
use crate::deserialization::IntoFields;
use crate::error::RecordError;
use crate::plain_value::{PlainMap, PlainValue};
use crate::types::RecordRef;
use crate::value::Value;
use smol_str::SmolStr;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Public mutation
    // ════════════════════════════════════════════════════════════════════════

    /// Merge `data` into the record, key by key, then push the result to the
    /// parent.
    ///
    /// * an object merges into an existing nested record (same instance
    ///   afterwards) or becomes a new parentless child;
    /// * an array replaces the old value wholesale;
    /// * anything else is stored as is.
    ///
    /// Fails before touching any field if `data` is not an object, if a
    /// nested record it would merge into is currently borrowed, or if the
    /// parent is. A parent that was dropped is skipped.
    pub fn set(&mut self, data: impl IntoFields) -> Result<(), RecordError> {
        let map = data.into_fields()?;
        self.ensure_mergeable(&map)?;
        let link = self.parent();
        let mut parent = match &link {
            Some(cell) => Some(cell.try_borrow_mut().map_err(|_| RecordError::ParentBusy)?),
            None => None,
        };
        tracing::trace!(fields = map.len(), "set");
        self.apply(map)?;
        if let Some(parent) = parent.as_deref_mut() {
            self.propagate_into(parent);
        }
        Ok(())
    }

    /// Assign a single key. Same rules as [`Record::set`].
    pub fn insert(
        &mut self,
        key: impl Into<SmolStr>,
        value: impl Into<PlainValue>,
    ) -> Result<(), RecordError> {
        let mut map = PlainMap::default();
        map.insert(key.into(), value.into());
        self.set(map)
    }

    /// Remove `key` from both tables. Absent keys are ignored.
    pub fn unset(&mut self, key: &str) {
        let had_field = self.fields.shift_remove(key).is_some();
        let had_attr = self.attrs.shift_remove(key).is_some();
        tracing::trace!(key, had_field, had_attr, "unset");
    }

    // ════════════════════════════════════════════════════════════════════════
    // Internal
    // ════════════════════════════════════════════════════════════════════════

    /// Every nested record an object in `map` would merge into must be free
    /// for a mutable borrow, all the way down.
    fn ensure_mergeable(&self, map: &PlainMap) -> Result<(), RecordError> {
        for (key, value) in map {
            let (PlainValue::Object(inner), Some(Value::Nested(child))) = (value, self.attrs.get(key))
            else {
                continue;
            };
            let child = child
                .try_borrow_mut()
                .map_err(|_| RecordError::Busy(key.clone()))?;
            child.ensure_mergeable(inner)?;
        }
        Ok(())
    }

    /// Callers run `ensure_mergeable` first, so the `Busy` path is only hit
    /// if a merge target is borrowed from inside the merge itself.
    fn apply(&mut self, map: PlainMap) -> Result<(), RecordError> {
        for (key, value) in map {
            let attr = match &value {
                PlainValue::Object(inner) => match self.attrs.get(&key) {
                    Some(Value::Nested(child)) => {
                        merge_into(child, inner.clone(), &key)?;
                        None
                    }
                    _ => Some(Value::Nested(Record::from_map(inner.clone()).into_shared())),
                },
                other => Some(Value::from(other.clone())),
            };
            if let Some(attr) = attr {
                self.attrs.insert(key.clone(), attr);
            }
            self.fields.insert(key, value);
        }
        Ok(())
    }

    /// Copy every attribute into the parent's attribute table. One level only;
    /// the parent's field table and its own parent are left alone.
    fn propagate_into(&self, parent: &mut Record) {
        for (key, value) in &self.attrs {
            parent.attrs.insert(key.clone(), value.clone());
        }
        tracing::trace!(keys = self.attrs.len(), "propagated to parent");
    }
}

fn merge_into(child: &RecordRef, map: PlainMap, key: &SmolStr) -> Result<(), RecordError> {
    child
        .try_borrow_mut()
        .map_err(|_| RecordError::Busy(key.clone()))?
        .set(map)
}
