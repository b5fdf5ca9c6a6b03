use std::sync::Arc;

use dataeden_core::{Dialect, Error, RemoteFailure, SqlValue, Target};
use dataeden_db::memory::{MemoryConnector, MemoryTable};
use dataeden_db::{ConnectionPool, ConnectorRegistry, RawColumn};
use dataeden_generate::{AiSettings, EngineKind};
use dataeden_populate::DataEden;

const ADDRESS: &str = "jdbc:postgresql://db.internal:5432/shop?currentSchema=sales";

fn widgets() -> MemoryTable {
    let mut id = RawColumn::new("id", "int4");
    id.auto_increment = true;
    let qty = RawColumn::new("qty", "INTEGER");
    let mut label = RawColumn::new("label", "VARCHAR");
    label.size = 10;
    let active = RawColumn::new("active", "BOOLEAN");
    MemoryTable::new("widgets", vec![id, qty, label, active])
        .in_schema("sales")
        .with_primary_key("id")
}

fn keys_only() -> MemoryTable {
    let mut id = RawColumn::new("id", "int4");
    id.auto_increment = true;
    MemoryTable::new("sequences", vec![id])
        .in_schema("sales")
        .with_primary_key("id")
}

fn service(connector: &MemoryConnector) -> DataEden {
    let mut registry = ConnectorRegistry::empty();
    registry.register(Arc::new(connector.clone()));
    DataEden::new(ConnectionPool::new(registry), AiSettings::default())
}

fn target() -> Target {
    Target::new(ADDRESS, "loader", "s3cret")
}

#[tokio::test]
async fn random_rows_round_trip_into_native_values() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).with_table(widgets());
    let eden = service(&connector);

    let summary = eden
        .generate_and_insert(&target(), "widgets", 5, EngineKind::Random)
        .await
        .expect("generate and insert");

    assert_eq!(summary.rows_requested, 5);
    assert_eq!(summary.rows_generated, 5);
    assert_eq!(summary.rows_inserted, 5);
    assert!(summary.warnings.is_empty());

    let batches = connector.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].sql,
        r#"INSERT INTO "widgets" ("qty", "label", "active") VALUES ($1, $2, $3)"#
    );
    for row in &batches[0].rows {
        assert!(matches!(row[0], SqlValue::Integer(value) if (0..10_000).contains(&value)));
        assert!(matches!(&row[1], SqlValue::Text(text) if text.len() == 10));
        assert!(matches!(row[2], SqlValue::Boolean(_)));
    }
}

#[tokio::test]
async fn preview_does_not_insert() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).with_table(widgets());
    let eden = service(&connector);

    let preview = eden
        .generate_preview(&target(), "widgets", 3, EngineKind::Random)
        .await
        .expect("preview");

    assert_eq!(preview.grid.len(), 3);
    let names: Vec<&str> = preview.columns.iter().map(|column| column.name()).collect();
    assert_eq!(names, ["qty", "label", "active"]);
    assert!(connector.batches().is_empty());

    let json = serde_json::to_value(&preview).expect("serialize");
    assert_eq!(json["engine"], "random");
}

#[tokio::test]
async fn tables_without_generation_columns_fail_before_generating() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).with_table(keys_only());
    let eden = service(&connector);

    let err = eden
        .generate_and_insert(&target(), "sequences", 5, EngineKind::Random)
        .await
        .expect_err("nothing to generate");
    assert!(matches!(err, Error::NothingToGenerate(ref table) if table == "sequences"));

    let err = eden
        .generate_and_insert(&target(), "missing", 5, EngineKind::Random)
        .await
        .expect_err("missing table");
    assert!(matches!(err, Error::NothingToGenerate(_)));
}

#[tokio::test]
async fn unconfigured_ai_engine_is_a_remote_service_error() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).with_table(widgets());
    let eden = service(&connector);

    let err = eden
        .generate_and_insert(&target(), "widgets", 5, EngineKind::AiBulk)
        .await
        .expect_err("no api key");
    assert!(matches!(
        err,
        Error::RemoteService {
            failure: RemoteFailure::NotConfigured,
            ..
        }
    ));
    assert!(connector.batches().is_empty());
}

#[tokio::test]
async fn test_connection_distinguishes_failures_from_bad_addresses() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).failing_first(1);
    let eden = service(&connector);

    assert!(!eden.test_connection(&target()).await.expect("first attempt"));
    assert!(eden.test_connection(&target()).await.expect("second attempt"));

    let err = eden
        .test_connection(&Target::new("jdbc:sqlite:file.db", "", ""))
        .await
        .expect_err("unsupported dialect");
    assert!(matches!(err, Error::UnsupportedDialect(_)));
}

#[tokio::test]
async fn listing_uses_the_schema_parameter_and_shutdown_releases() {
    let connector = MemoryConnector::new(Dialect::PostgreSql)
        .with_schema("public")
        .with_table(widgets())
        .with_table(keys_only());
    let eden = service(&connector);

    let tables = eden.list_tables(&target()).await.expect("tables");
    assert_eq!(tables, ["sequences", "widgets"]);

    let columns = eden
        .list_columns(&target(), "widgets")
        .await
        .expect("columns");
    assert_eq!(columns.len(), 4);
    assert!(columns[0].primary_key());

    assert_eq!(connector.constructions(), 1);
    assert_eq!(eden.shutdown().await, 1);
    assert_eq!(connector.close_attempts(), 1);
}
