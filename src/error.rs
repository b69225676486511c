// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// Input could not be read as a field mapping (bad JSON, non-object root).
    #[error("invalid record data: {0}")]
    InvalidData(String),
    #[error("field not found: {0}")]
    NotFound(SmolStr),
    #[error("index {index} out of range for record with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },
    /// A nested record a merge or an export needs is already borrowed elsewhere.
    #[error("nested record at `{0}` is busy")]
    Busy(SmolStr),
    /// The parent a `set` would propagate to is already borrowed elsewhere.
    #[error("parent record is busy")]
    ParentBusy,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
}
