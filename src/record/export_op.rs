use super::record::Record;
use crate::error::RecordError;
use crate::plain_value::{PlainMap, PlainValue};
use crate::serialization::{encode, normalize_map};
use crate::types::EncodeConfig;
use std::fmt;

impl Record {
    /// Plain copy of the attribute view, nested records and sequences
    /// flattened recursively. Scalars, opaque ones included, pass through.
    ///
    /// Panics if a nested record is mutably borrowed; use
    /// [`Record::try_flatten`] where that can happen.
    pub fn flatten(&self) -> PlainMap {
        self.attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain()))
            .collect()
    }

    /// [`Record::flatten`] that reports a mutably borrowed nested record as
    /// `Busy` with the field it sits under.
    pub fn try_flatten(&self) -> Result<PlainMap, RecordError> {
        self.attrs
            .iter()
            .map(|(k, v)| Ok((k.clone(), v.try_to_plain(k)?)))
            .collect()
    }

    /// Replace every value JSON cannot encode by its sanitized text.
    /// Works on `data` when given, otherwise on [`Record::flatten`] (and
    /// panics like it).
    pub fn normalize(&self, data: Option<PlainMap>) -> PlainMap {
        normalize_map(data.unwrap_or_else(|| self.flatten()))
    }

    /// JSON text in the default layout (`{"id": 7, "name": "ari"}`).
    pub fn serialize(&self) -> Result<String, RecordError> {
        self.serialize_with(&EncodeConfig::default())
    }

    pub fn serialize_with(&self, config: &EncodeConfig) -> Result<String, RecordError> {
        encode(&normalize_map(self.try_flatten()?), config)
    }

    /// Debug rendering of the flattened data. Not JSON.
    pub fn dump(&self) -> String {
        format!("{:?}", self.flatten())
    }

    /// New parentless record holding only the listed keys that are set, in
    /// the order given.
    pub fn pick(&self, keys: &[&str]) -> Result<Record, RecordError> {
        let map = keys
            .iter()
            .filter_map(|key| self.attrs.get_key_value(*key))
            .map(|(k, v)| Ok((k.clone(), v.try_to_plain(k)?)))
            .collect::<Result<PlainMap, RecordError>>()?;
        Ok(Record::from_map(map))
    }

    /// Flattened record wrapped as a [`PlainValue::Object`].
    pub fn to_plain(&self) -> PlainValue {
        PlainValue::Object(self.flatten())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({})", self)
    }
}
