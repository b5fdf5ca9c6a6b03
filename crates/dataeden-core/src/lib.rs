//! Core contracts and helpers for DataEden.
//!
//! This crate defines the column model, the dialect table, the typed values
//! bound into insert statements and the error taxonomy shared by the database,
//! generation and population crates.

pub mod address;
pub mod column;
pub mod dialect;
pub mod error;
pub mod grid;
pub mod redaction;
pub mod value;
pub mod warning;

pub use address::{Target, current_schema_param, strip_jdbc_prefix};
pub use column::{ColumnDescriptor, TypeCategory, classify, generation_columns};
pub use dialect::{Dialect, DialectSpec, PlaceholderStyle};
pub use error::{Error, RemoteFailure, Result};
pub use grid::ValueGrid;
pub use redaction::{RedactedAddress, redact_address};
pub use value::SqlValue;
pub use warning::Warning;
