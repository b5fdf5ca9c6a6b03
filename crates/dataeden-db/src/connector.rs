use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use dataeden_core::{Dialect, Error, Result, Target, strip_jdbc_prefix};

use crate::mysql::MySqlConnector;
use crate::postgres::PostgresConnector;
use crate::source::DataSource;

/// Builds data sources for one dialect.
#[async_trait]
pub trait Connector: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Open a data source for `target`. Called at most once per pooled key.
    async fn connect(&self, target: &Target) -> Result<Arc<dyn DataSource>>;
}

/// Sizing for the driver-level pool behind each data source.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Dialect to connector mapping consulted by the connection pool.
#[derive(Clone, Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<Dialect, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// A registry with no connectors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the sqlx-backed PostgreSQL and MySQL connectors.
    pub fn with_defaults(settings: PoolSettings) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PostgresConnector::new(settings)));
        registry.register(Arc::new(MySqlConnector::new(settings)));
        registry
    }

    /// Register `connector`, replacing any connector for the same dialect.
    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        self.connectors.insert(connector.dialect(), connector);
    }

    pub fn get(&self, dialect: Dialect) -> Option<Arc<dyn Connector>> {
        self.connectors.get(&dialect).cloned()
    }

    pub fn connector_for(&self, dialect: Dialect) -> Result<Arc<dyn Connector>> {
        self.get(dialect).ok_or_else(|| {
            Error::Connection(format!("no connector registered for dialect {dialect}"))
        })
    }

    pub fn dialects(&self) -> Vec<Dialect> {
        let mut dialects: Vec<Dialect> = self.connectors.keys().copied().collect();
        dialects.sort_by_key(|dialect| dialect.name());
        dialects
    }
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("dialects", &self.dialects())
            .finish()
    }
}

/// Address in the form a native driver accepts: no `jdbc:` marker and no
/// `currentSchema` parameter.
pub(crate) fn native_url(address: &str) -> String {
    let stripped = strip_jdbc_prefix(address);
    let Some((base, query)) = stripped.split_once('?') else {
        return stripped.to_string();
    };
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or("");
            !pair.is_empty() && !key.eq_ignore_ascii_case("currentSchema")
        })
        .collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

pub(crate) fn connection_error(target: &Target, err: impl std::fmt::Display) -> Error {
    Error::Connection(format!("{}: {err}", target.redacted_address()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_url_drops_jdbc_markers() {
        assert_eq!(
            native_url("jdbc:postgresql://db:5432/app?currentSchema=sales&sslmode=disable"),
            "postgresql://db:5432/app?sslmode=disable"
        );
        assert_eq!(
            native_url("jdbc:mysql://db/app?currentSchema=app"),
            "mysql://db/app"
        );
        assert_eq!(native_url("postgres://db/app"), "postgres://db/app");
    }

    #[test]
    fn missing_connector_names_the_dialect() {
        let registry = ConnectorRegistry::with_defaults(PoolSettings::default());
        assert!(registry.get(Dialect::PostgreSql).is_some());
        assert!(registry.get(Dialect::MySql).is_some());
        let err = match registry.connector_for(Dialect::Oracle) {
            Err(err) => err,
            Ok(_) => panic!("oracle has no default connector"),
        };
        assert!(err.to_string().contains("oracle"));
    }
}
