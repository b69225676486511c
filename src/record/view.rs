use super::record::Record;
use crate::error::RecordError;

/// Typed projection of a record over a fixed key list.
///
/// Usually generated with [`record_view!`](crate::record_view).
pub trait RecordView: Sized {
    /// Keys kept by the view, in display order.
    const KEYS: &'static [&'static str];

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;
}

impl Record {
    /// Project onto `V::KEYS`. Keys the record does not have are skipped.
    pub fn view<V: RecordView>(&self) -> Result<V, RecordError> {
        Ok(V::from_record(self.pick(V::KEYS)?))
    }
}

/// Declare a [`RecordView`] struct with one accessor per key.
///
/// ```
/// use attr_record::{record_view, Record, RecordView};
///
/// record_view! {
///     pub struct Friendship { following, followed_by }
/// }
///
/// let record = Record::new(r#"{"following": true, "muting": false}"#).unwrap();
/// let view: Friendship = record.view().unwrap();
/// assert_eq!(view.following().and_then(|v| v.as_bool()), Some(true));
/// assert!(view.followed_by().is_none());
/// assert!(!view.record().isset("muting"));
/// ```
#[macro_export]
macro_rules! record_view {
    ($(#[$meta:meta])* $vis:vis struct $name:ident { $($key:ident),* $(,)? }) => {
        $(#[$meta])*
        $vis struct $name {
            record: $crate::Record,
        }

        impl $crate::RecordView for $name {
            const KEYS: &'static [&'static str] = &[$(stringify!($key)),*];

            fn from_record(record: $crate::Record) -> Self {
                Self { record }
            }

            fn record(&self) -> &$crate::Record {
                &self.record
            }
        }

        impl $name {
            $(
                pub fn $key(&self) -> Option<&$crate::Value> {
                    self.record.get(stringify!($key)).ok()
                }
            )*
        }
    };
}
