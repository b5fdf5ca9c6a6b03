//! AI engine through the service facade, with a local chat-completion stand-in.

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::post};
use serde_json::json;
use tokio::net::TcpListener;

use dataeden_core::{Dialect, SqlValue, Target, Warning};
use dataeden_db::memory::{MemoryConnector, MemoryTable};
use dataeden_db::{ConnectionPool, ConnectorRegistry, RawColumn};
use dataeden_generate::{AiSettings, EngineKind};
use dataeden_populate::DataEden;

async fn short_reply() -> impl IntoResponse {
    Json(json!({
        "choices": [{
            "message": {"content": "```csv\n7,bolt,true\n8,nut\n```"}
        }]
    }))
}

async fn start_server() -> String {
    let app = Router::new().route("/v1/chat/completions", post(short_reply));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/v1/chat/completions")
}

fn parts() -> MemoryTable {
    let mut id = RawColumn::new("id", "int4");
    id.auto_increment = true;
    let mut label = RawColumn::new("label", "VARCHAR");
    label.size = 10;
    MemoryTable::new(
        "parts",
        vec![
            id,
            RawColumn::new("qty", "INTEGER"),
            label,
            RawColumn::new("active", "BOOLEAN"),
        ],
    )
    .with_primary_key("id")
}

#[tokio::test]
async fn short_ai_grid_inserts_only_produced_rows() {
    let connector = MemoryConnector::new(Dialect::PostgreSql).with_table(parts());
    let mut registry = ConnectorRegistry::empty();
    registry.register(Arc::new(connector.clone()));
    let ai = AiSettings {
        api_url: start_server().await,
        api_key: "test-key".to_string(),
        request_timeout_secs: 5,
        ..AiSettings::default()
    };
    let eden = DataEden::new(ConnectionPool::new(registry), ai);
    let target = Target::new("postgres://db/shop", "loader", "pw");

    let summary = eden
        .generate_and_insert(&target, "parts", 4, EngineKind::AiBulk)
        .await
        .expect("generate and insert");

    assert_eq!(summary.rows_requested, 4);
    assert_eq!(summary.rows_generated, 1);
    assert_eq!(summary.rows_inserted, 1);
    let codes: Vec<&str> = summary.warnings.iter().map(Warning::code).collect();
    assert_eq!(codes, ["row_dropped", "row_count_mismatch"]);
    assert!(summary.warnings.contains(&Warning::RowCountMismatch {
        requested: 4,
        produced: 1
    }));

    let batches = connector.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].rows,
        vec![vec![
            SqlValue::Integer(7),
            SqlValue::Text("bolt".to_string()),
            SqlValue::Boolean(true),
        ]]
    );
}
