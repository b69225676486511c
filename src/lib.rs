//! Ordered, mutable records over JSON-like data.
//!
//! A [`Record`] wraps an object (or a JSON object string), classifies every
//! field into nested records, sequences and scalars, pushes its fields to an
//! optional parent after each mutation, and serializes back to JSON with a
//! text fallback for values JSON cannot encode.

pub mod deserialization;
pub mod error;
pub mod plain_value;
pub mod record;
pub mod serialization;
pub mod types;
pub mod value;

pub use deserialization::IntoFields;
pub use error::RecordError;
pub use plain_value::{Blob, FastMap, Opaque, PlainMap, PlainNumber, PlainValue};
pub use record::{Cursor, Record, RecordView};
pub use smol_str::SmolStr;
pub use types::{EncodeConfig, Layout, RecordRef, Values};
pub use value::Value;
