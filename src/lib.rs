pub mod batch;
pub mod classify;
pub mod convert;
pub mod fields;
pub mod filedate;
pub mod fixture;
pub mod timestamp;

pub use batch::{process_all, BatchOptions, DateEntry, DateIndex};
pub use convert::convert_csv_file;
pub use fields::Record;
