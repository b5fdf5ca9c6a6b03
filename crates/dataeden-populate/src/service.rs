use serde::Serialize;
use tracing::{info, warn};

use dataeden_core::{ColumnDescriptor, Dialect, Error, Result, Target, ValueGrid, Warning};
use dataeden_db::{ConnectionPool, ConnectorRegistry, Handle, PoolSettings};
use dataeden_generate::{AiSettings, EngineKind, GenerationOutcome, engine_for};

use crate::executor::execute_plan;
use crate::plan::{InsertPlan, plan_insert};

/// Result of a generate-and-insert call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub table: String,
    pub engine: EngineKind,
    pub rows_requested: usize,
    pub rows_generated: usize,
    pub rows_inserted: u64,
    pub warnings: Vec<Warning>,
}

/// Generated data that was not inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPreview {
    pub table: String,
    pub engine: EngineKind,
    pub columns: Vec<ColumnDescriptor>,
    pub grid: ValueGrid,
    pub warnings: Vec<Warning>,
}

/// Entry point for callers: connection checks, schema listing and the
/// generate-and-insert pipeline over one shared connection pool.
#[derive(Debug)]
pub struct DataEden {
    pool: ConnectionPool,
    ai: AiSettings,
}

impl DataEden {
    pub fn new(pool: ConnectionPool, ai: AiSettings) -> Self {
        Self { pool, ai }
    }

    /// Service over the built-in PostgreSQL and MySQL connectors.
    pub fn with_defaults(settings: PoolSettings, ai: AiSettings) -> Self {
        Self::new(
            ConnectionPool::new(ConnectorRegistry::with_defaults(settings)),
            ai,
        )
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// `Ok(false)` when the database cannot be reached; an address naming no
    /// known dialect is still an error.
    pub async fn test_connection(&self, target: &Target) -> Result<bool> {
        Dialect::resolve(&target.address)?;
        let reachable = match self.pool.acquire(target).await {
            Ok(handle) => handle.source().ping().await,
            Err(err) => Err(err),
        };
        match reachable {
            Ok(()) => {
                info!(address = %target.redacted_address(), "connection ok");
                Ok(true)
            }
            Err(err) => {
                warn!(address = %target.redacted_address(), error = %err, "connection test failed");
                Ok(false)
            }
        }
    }

    pub async fn list_tables(&self, target: &Target) -> Result<Vec<String>> {
        let handle = self.pool.acquire(target).await?;
        dataeden_db::list_tables(&handle).await
    }

    pub async fn list_columns(&self, target: &Target, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let handle = self.pool.acquire(target).await?;
        dataeden_db::list_columns(&handle, table).await
    }

    /// Introspect `table`, generate `rows` rows with `engine` and insert them.
    pub async fn generate_and_insert(
        &self,
        target: &Target,
        table: &str,
        rows: usize,
        engine: EngineKind,
    ) -> Result<GenerationSummary> {
        let (handle, plan, outcome) = self.prepare(target, table, rows, engine).await?;
        let report = execute_plan(&handle, &plan, &outcome.grid).await?;

        let mut warnings = outcome.warnings;
        warnings.extend(report.warnings);
        let summary = GenerationSummary {
            table: table.to_string(),
            engine,
            rows_requested: rows,
            rows_generated: outcome.grid.len(),
            rows_inserted: report.rows_inserted,
            warnings,
        };
        info!(
            table,
            engine = %engine,
            requested = summary.rows_requested,
            inserted = summary.rows_inserted,
            warnings = summary.warnings.len(),
            "generate and insert finished"
        );
        Ok(summary)
    }

    /// Same pipeline as [`DataEden::generate_and_insert`] without the insert.
    pub async fn generate_preview(
        &self,
        target: &Target,
        table: &str,
        rows: usize,
        engine: EngineKind,
    ) -> Result<GenerationPreview> {
        let (_, plan, outcome) = self.prepare(target, table, rows, engine).await?;
        Ok(GenerationPreview {
            table: table.to_string(),
            engine,
            columns: plan.columns().to_vec(),
            grid: outcome.grid,
            warnings: outcome.warnings,
        })
    }

    /// Release every pooled connection.
    pub async fn shutdown(&self) -> usize {
        self.pool.release_all().await
    }

    async fn prepare(
        &self,
        target: &Target,
        table: &str,
        rows: usize,
        engine: EngineKind,
    ) -> Result<(Handle, InsertPlan, GenerationOutcome)> {
        let handle = self.pool.acquire(target).await?;
        let columns = dataeden_db::list_columns(&handle, table).await?;
        let plan = plan_insert(handle.dialect(), table, &columns)?;
        let outcome = engine_for(engine, &self.ai)
            .map_err(Error::from)?
            .generate(table, rows, plan.columns())
            .await?;
        Ok((handle, plan, outcome))
    }
}
