//! Operations layered on top of the record store
//!
//! Update field changes, GPA statistics and CSV export.

pub mod changes;
pub mod export;
pub mod stats;

pub use changes::{ChangedFields, FieldChanges, UpdateOutcome};
pub use export::{export_csv, CSV_HEADER};
pub use stats::{aggregate, GpaBand, GpaSummary, Statistics};
