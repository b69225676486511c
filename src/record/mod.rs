mod export_op;
mod read_op;
#[allow(clippy::module_inception)]
pub mod record;
pub mod view;
mod write_op;

pub use read_op::Cursor;
pub use record::Record;
pub use view::RecordView;
