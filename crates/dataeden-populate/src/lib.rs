//! Insert planning, cell conversion and the DataEden service facade.

pub mod convert;
pub mod executor;
pub mod plan;
pub mod service;

pub use convert::{Conversion, convert_cell, convert_row};
pub use executor::{InsertReport, execute_plan, insert};
pub use plan::{InsertPlan, insert_sql, plan_insert};
pub use service::{DataEden, GenerationPreview, GenerationSummary};
