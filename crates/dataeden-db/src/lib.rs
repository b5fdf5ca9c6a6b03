//! Database access for DataEden: connectors, the credential-keyed pool and
//! schema introspection.

pub mod connector;
pub mod introspect;
pub mod mysql;
pub mod pool;
pub mod postgres;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use connector::{Connector, ConnectorRegistry, PoolSettings};
pub use introspect::{effective_schema, list_columns, list_tables};
pub use mysql::MySqlConnector;
pub use pool::{ConnectionPool, Handle};
pub use postgres::PostgresConnector;
pub use source::{DataSource, RawColumn};
