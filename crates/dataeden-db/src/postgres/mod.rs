use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use dataeden_core::{Dialect, Result, SqlValue, Target, current_schema_param};

use crate::connector::{Connector, PoolSettings, connection_error, native_url};
use crate::source::{DataSource, RawColumn};

mod queries;

/// Connector for PostgreSQL addresses, backed by `sqlx::PgPool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnector {
    settings: PoolSettings,
}

impl PostgresConnector {
    pub fn new(settings: PoolSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    async fn connect(&self, target: &Target) -> Result<Arc<dyn DataSource>> {
        let mut options = PgConnectOptions::from_str(&native_url(&target.address))
            .map_err(|err| connection_error(target, err))?;
        if !target.principal.is_empty() {
            options = options.username(&target.principal);
        }
        if !target.credential.is_empty() {
            options = options.password(&target.credential);
        }
        if let Some(search_path) = search_path(target) {
            options = options.options([("search_path", search_path)]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|err| connection_error(target, err))?;

        Ok(Arc::new(PostgresSource { pool }))
    }
}

/// Session `search_path` for the address's `currentSchema` parameter, so
/// unqualified statements resolve in the introspected schema.
fn search_path(target: &Target) -> Option<String> {
    current_schema_param(&target.address)
        .map(|schema| Dialect::PostgreSql.quote_identifier(&schema))
}

/// Data source over one PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Wrap a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataSource for PostgresSource {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    async fn ping(&self) -> Result<()> {
        queries::ping(&self.pool).await
    }

    // The catalog is the database itself; tables live in schemas.
    async fn current_catalog(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn current_schema(&self) -> Result<Option<String>> {
        queries::current_schema(&self.pool).await
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_schema_becomes_the_search_path() {
        let target = Target::new(
            "jdbc:postgresql://db:5432/shop?currentSchema=sales&sslmode=disable",
            "loader",
            "pw",
        );
        assert_eq!(search_path(&target).as_deref(), Some(r#""sales""#));

        let mixed = Target::new("postgres://db/shop?currentSchema=Sales", "", "");
        assert_eq!(search_path(&mixed).as_deref(), Some(r#""Sales""#));

        let plain = Target::new("postgres://db/shop", "", "");
        assert_eq!(search_path(&plain), None);
    }
}
