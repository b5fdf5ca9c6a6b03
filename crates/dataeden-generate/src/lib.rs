//! Synthetic row generation for DataEden.
//!
//! Engines turn a list of generation columns into a rectangular grid of
//! string values; [`engine_for`] maps an [`EngineKind`] to its engine.

pub mod ai;
pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod random;

pub use ai::{AiBulkEngine, AiSettings};
pub use engine::{Engine, engine_for};
pub use errors::GenerationError;
pub use model::{EngineKind, GenerationOutcome};
pub use random::RandomEngine;
