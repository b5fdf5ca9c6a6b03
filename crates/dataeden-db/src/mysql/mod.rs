use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use dataeden_core::{Dialect, Result, SqlValue, Target, current_schema_param};

use crate::connector::{Connector, PoolSettings, connection_error, native_url};
use crate::source::{DataSource, RawColumn};

mod queries;

/// Connector for MySQL and MariaDB addresses, backed by `sqlx::MySqlPool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector {
    settings: PoolSettings,
}

impl MySqlConnector {
    pub fn new(settings: PoolSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn connect(&self, target: &Target) -> Result<Arc<dyn DataSource>> {
        let url = native_url(&target.address).replacen("mariadb://", "mysql://", 1);
        let mut options =
            MySqlConnectOptions::from_str(&url).map_err(|err| connection_error(target, err))?;
        if !target.principal.is_empty() {
            options = options.username(&target.principal);
        }
        if !target.credential.is_empty() {
            options = options.password(&target.credential);
        }
        // Unqualified inserts must land in the schema that was introspected.
        if let Some(schema) = current_schema_param(&target.address) {
            options = options.database(&schema);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|err| connection_error(target, err))?;

        Ok(Arc::new(MySqlSource { pool }))
    }
}

/// Data source over one MySQL pool. The connected database is both the
/// catalog and the schema.
#[derive(Debug, Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataSource for MySqlSource {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn ping(&self) -> Result<()> {
        queries::ping(&self.pool).await
    }

    async fn current_catalog(&self) -> Result<Option<String>> {
        queries::current_database(&self.pool).await
    }

    async fn current_schema(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn list_tables(&self, schema: Option<&str>) -> Result<Vec<String>> {
        queries::list_tables(&self.pool, schema).await
    }

    async fn primary_keys(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>> {
        queries::primary_keys(&self.pool, schema, table).await
    }

    async fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<RawColumn>> {
        queries::list_columns(&self.pool, schema, table).await
    }

    async fn execute_batch(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        queries::execute_batch(&self.pool, sql, rows).await
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
