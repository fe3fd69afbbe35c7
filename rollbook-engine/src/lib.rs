//! Rollbook Engine - flat-file student record store
//!
//! This crate stores fixed-width student records back to back in a single
//! file and provides append, scan, update-in-place, delete-by-rebuild,
//! statistics and CSV export on top of it.

pub mod error;
pub mod operations;
pub mod storage;

pub use error::{StoreError, StoreResult, ValidationError};
pub use operations::{ChangedFields, FieldChanges, Statistics, UpdateOutcome};
pub use storage::{RecordStore, StudentRecord, RECORD_SIZE};
