use async_trait::async_trait;

use dataeden_core::{Dialect, Result, SqlValue};

/// Column metadata exactly as the catalog reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub type_name: String,
    pub size: u32,
    pub decimal_digits: u32,
    pub nullable: bool,
    pub auto_increment: bool,
    pub remarks: Option<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            size: 0,
            decimal_digits: 0,
            nullable: true,
            auto_increment: false,
            remarks: None,
        }
    }
}

/// A live, pooled connection to one database.
///
/// `schema` arguments of `None` mean the connection's own default schema.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Round-trip a trivial statement.
    async fn ping(&self) -> Result<()>;

    /// Catalog the connection is bound to, when the dialect uses catalogs as schemas.
    async fn current_catalog(&self) -> Result<Option<String>>;

    async fn current_schema(&self) -> Result<Option<String>>;

    /// Base tables of `schema`, in name order.
    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>>;

    async fn primary_keys(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>>;

    /// Columns of `table` in ordinal order; empty when the table does not exist.
    async fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<RawColumn>>;

    /// Execute `sql` once per row on a single connection and return the
    /// number of affected rows.
    async fn execute_batch(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64>;

    async fn close(&self) -> Result<()>;
}
