//! `csv2wp-import`: create-or-update reconciliation of CSV rows against a
//! WordPress collection.
//!
//! Reads source records, validates them before any network I/O, matches
//! them by case-insensitive name against a one-shot snapshot of the remote
//! collection, and writes each row. Per-row failures are captured as values
//! in the report; nothing here prints.

pub mod engine;
pub mod error;
pub mod mapping;
pub mod model;

pub use engine::{import_architects, import_buildings, load_source, reconcile, snapshot};
pub use error::ImportError;
pub use mapping::{ArchitectMapping, BuildingMapping, FieldMapping};
pub use model::{
    ArchitectPayload, ArchitectRecord, BuildingPayload, BuildingRecord, ImportReport,
    Education, ImportSummary, OfficeLocation, PlannedAction, Position, RowOutcome, RowResult,
};
