//! In-memory connector and data source used by tests.
//!
//! Tables are declared up front; batches are recorded instead of executed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dataeden_core::{Dialect, Error, Result, SqlValue, Target};

use crate::connector::Connector;
use crate::source::{DataSource, RawColumn};

const DEFAULT_SCHEMA: &str = "public";

/// A table served by [`MemorySource`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub schema: String,
    pub name: String,
    pub columns: Vec<RawColumn>,
    pub primary_keys: Vec<String>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>, columns: Vec<RawColumn>) -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            name: name.into(),
            columns,
            primary_keys: Vec::new(),
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_keys.push(column.into());
        self
    }
}

/// One `execute_batch` call as seen by the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub sql: String,
    pub rows: Vec<Vec<SqlValue>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryConfig {
    tables: Vec<MemoryTable>,
    catalog: Option<String>,
    schema: Option<String>,
    connect_delay: Option<Duration>,
    reject_batches: Option<String>,
    fail_close: bool,
}

#[derive(Debug, Default)]
struct MemoryCounters {
    constructions: AtomicUsize,
    failures_left: AtomicUsize,
    close_attempts: AtomicUsize,
    batches: Mutex<Vec<RecordedBatch>>,
}

/// Connector that hands out [`MemorySource`]s and counts constructions.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    dialect: Dialect,
    config: Arc<MemoryConfig>,
    counters: Arc<MemoryCounters>,
}

impl MemoryConnector {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            config: Arc::new(MemoryConfig::default()),
            counters: Arc::new(MemoryCounters::default()),
        }
    }

    pub fn with_table(mut self, table: MemoryTable) -> Self {
        Arc::make_mut(&mut self.config).tables.push(table);
        self
    }

    /// Catalog reported by the source (MySQL-style databases).
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).catalog = Some(catalog.into());
        self
    }

    /// Default schema reported by the source (PostgreSQL-style databases).
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).schema = Some(schema.into());
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        Arc::make_mut(&mut self.config).connect_delay = Some(delay);
        self
    }

    /// Fail the first `attempts` constructions with a connection error.
    pub fn failing_first(self, attempts: usize) -> Self {
        self.counters.failures_left.store(attempts, Ordering::SeqCst);
        self
    }

    /// Reject every batch with `message`.
    pub fn rejecting_batches(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).reject_batches = Some(message.into());
        self
    }

    pub fn failing_close(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_close = true;
        self
    }

    pub fn constructions(&self) -> usize {
        self.counters.constructions.load(Ordering::SeqCst)
    }

    pub fn close_attempts(&self) -> usize {
        self.counters.close_attempts.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.counters
            .batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn connect(&self, target: &Target) -> Result<Arc<dyn DataSource>> {
        self.counters.constructions.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.config.connect_delay {
            tokio::time::sleep(delay).await;
        }
        let failed = self
            .counters
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Error::Connection(format!(
                "{}: connection refused",
                target.redacted_address()
            )));
        }
        Ok(Arc::new(MemorySource {
            dialect: self.dialect,
            config: Arc::clone(&self.config),
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Data source backed by the connector's declared tables.
#[derive(Debug)]
pub struct MemorySource {
    dialect: Dialect,
    config: Arc<MemoryConfig>,
    counters: Arc<MemoryCounters>,
}

impl MemorySource {
    fn resolve_schema<'a>(&'a self, schema: Option<&'a str>) -> &'a str {
        schema
            .or(self.config.schema.as_deref())
            .or(self.config.catalog.as_deref())
            .unwrap_or(DEFAULT_SCHEMA)
    }

    fn table(&self, schema: Option<&str>, name: &str) -> Option<&MemoryTable> {
        let schema = self.resolve_schema(schema);
        self.config
            .tables
            .iter()
            .find(|table| table.schema == schema && table.name == name)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn current_catalog(&self) -> Result<Option<String>> {
        Ok(self.config.catalog.clone())
    }

    async fn current_schema(&self) -> Result<Option<String>> {
        Ok(self.config.schema.clone())
    }

    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = self.resolve_schema(schema);
        let mut names: Vec<String> = self
            .config
            .tables
            .iter()
            .filter(|table| table.schema == schema)
            .map(|table| table.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn primary_keys(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>> {
        Ok(self
            .table(schema, table)
            .map(|table| table.primary_keys.clone())
            .unwrap_or_default())
    }

    async fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<RawColumn>> {
        Ok(self
            .table(schema, table)
            .map(|table| table.columns.clone())
            .unwrap_or_default())
    }

    async fn execute_batch(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        if let Some(message) = &self.config.reject_batches {
            return Err(Error::Insertion(message.clone()));
        }
        let mut batches = self
            .counters
            .batches
            .lock()
            .map_err(|_| Error::Insertion("batch log poisoned".to_string()))?;
        batches.push(RecordedBatch {
            sql: sql.to_string(),
            rows: rows.to_vec(),
        });
        Ok(rows.len() as u64)
    }

    async fn close(&self) -> Result<()> {
        self.counters.close_attempts.fetch_add(1, Ordering::SeqCst);
        if self.config.fail_close {
            return Err(Error::Connection("close failed".to_string()));
        }
        Ok(())
    }
}
