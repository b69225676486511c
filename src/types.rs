use super::record::Record;
use super::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a record. Nested records and parent links go through it.
pub type RecordRef = Rc<RefCell<Record>>;

// ─── Encoding config ────────────────────────────────────────────────────────

/// Whitespace layout of serialized JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `{"id":7}`
    Compact,
    /// `{"id": 7, "name": "ari"}`
    Spaced,
    /// Multi-line, indented by the given number of spaces.
    Pretty(usize),
}

/// Configuration for [`Record::serialize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Default: [`Layout::Spaced`].
    pub layout: Layout,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Spaced,
        }
    }
}

impl EncodeConfig {
    pub fn pretty(indent: usize) -> Self {
        Self {
            layout: Layout::Pretty(indent),
        }
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Restartable walk over a record's values in field order.
/// Each call to [`Record::values`] starts from the first field.
pub struct Values<'a> {
    pub(crate) record: &'a Record,
    pub(crate) pos: usize,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.record.count() {
            return None;
        }
        let value = self.record.value_at(self.pos).ok()?;
        self.pos += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.count().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Values<'_> {}
