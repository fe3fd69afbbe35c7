//! Storage layer for the student record file
//!
//! - Fixed-width record layout and field validation
//! - The flat-file record store

pub mod record;
pub mod store;

pub use record::{StudentRecord, RECORD_SIZE};
pub use store::{default_temp_path, Located, RecordStore, Scan};
