use tracing::{info, warn};

use dataeden_core::ColumnDescriptor;

use crate::ai::{AiBulkEngine, AiSettings};
use crate::errors::GenerationError;
use crate::model::{EngineKind, GenerationOutcome};
use crate::random::RandomEngine;

/// The closed set of generation engines.
#[derive(Debug, Clone)]
pub enum Engine {
    Random(RandomEngine),
    AiBulk(AiBulkEngine),
}

/// Build the engine for `kind`. AI settings are only read for the AI engine.
pub fn engine_for(kind: EngineKind, ai: &AiSettings) -> Result<Engine, GenerationError> {
    match kind {
        EngineKind::Random => Ok(Engine::Random(RandomEngine::new())),
        EngineKind::AiBulk => Ok(Engine::AiBulk(AiBulkEngine::new(ai.clone())?)),
    }
}

impl Engine {
    pub fn kind(&self) -> EngineKind {
        match self {
            Engine::Random(_) => EngineKind::Random,
            Engine::AiBulk(_) => EngineKind::AiBulk,
        }
    }

    /// Produce `rows` rows for `columns`, which must already be limited to
    /// the columns that need generated values.
    ///
    /// Every returned row has exactly `columns.len()` values.
    pub async fn generate(
        &self,
        table: &str,
        rows: usize,
        columns: &[ColumnDescriptor],
    ) -> Result<GenerationOutcome, GenerationError> {
        let outcome = match self {
            Engine::Random(engine) => engine.generate(rows, columns),
            Engine::AiBulk(engine) => engine.generate(table, rows, columns).await?,
        };

        if let Some(row) = outcome.grid.first_ragged_row(columns.len()) {
            let found = outcome.grid.rows()[row].len();
            return Err(GenerationError::RaggedGrid {
                row,
                found,
                expected: columns.len(),
            });
        }

        for warning in &outcome.warnings {
            warn!(table, code = warning.code(), "{warning}");
        }
        info!(
            table,
            engine = %self.kind(),
            requested = rows,
            produced = outcome.grid.len(),
            "generation finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn factory_maps_kinds_to_variants() {
        let settings = AiSettings::default();
        let random = engine_for(EngineKind::Random, &settings).expect("random");
        let ai = engine_for(EngineKind::AiBulk, &settings).expect("ai");
        assert_eq!(random.kind(), EngineKind::Random);
        assert_eq!(ai.kind(), EngineKind::AiBulk);
    }

    #[tokio::test]
    async fn random_rows_match_column_count() {
        let columns = vec![
            ColumnDescriptor::new("qty", "int"),
            ColumnDescriptor::new("label", "varchar").with_size(10, 0),
            ColumnDescriptor::new("active", "boolean"),
        ];
        let engine = Engine::Random(RandomEngine::seeded(3));
        let outcome = engine
            .generate("items", 4, &columns)
            .await
            .expect("generate");
        assert_eq!(outcome.grid.len(), 4);
        assert!(outcome.grid.rows().iter().all(|row| row.len() == 3));
    }

    #[tokio::test]
    async fn unconfigured_ai_fails_before_any_request() {
        let engine = engine_for(EngineKind::AiBulk, &AiSettings::default()).expect("engine");
        let err = engine
            .generate("items", 3, &[ColumnDescriptor::new("qty", "int")])
            .await
            .expect_err("no key configured");
        assert!(matches!(
            err,
            GenerationError::Remote {
                failure: dataeden_core::RemoteFailure::NotConfigured,
                ..
            }
        ));
    }
}
