use anyhow::{Context, Result};
use dataeden_core::Target;
use dataeden_db::PoolSettings;
use dataeden_generate::{AiSettings, EngineKind};
use dataeden_populate::DataEden;
use std::env;

fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL").ok()
}

const SETUP: &[&str] = &[
    "drop schema if exists dataeden_fill cascade",
    "create schema dataeden_fill",
    r#"create table dataeden_fill.widgets (
        id serial primary key,
        label varchar(12) not null,
        amount numeric(38,0),
        price numeric(12,4),
        active boolean,
        made_on date
    )"#,
];

#[tokio::test]
async fn generated_rows_land_in_the_current_schema() -> Result<()> {
    let Some(url) = database_url() else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return Ok(());
    };

    let setup = sqlx::PgPool::connect(&url)
        .await
        .context("connecting to Postgres")?;
    for statement in SETUP {
        sqlx::query(statement)
            .execute(&setup)
            .await
            .with_context(|| format!("executing {statement}"))?;
    }

    let eden = DataEden::with_defaults(PoolSettings::default(), AiSettings::default());
    let separator = if url.contains('?') { '&' } else { '?' };
    let target = Target::new(format!("{url}{separator}currentSchema=dataeden_fill"), "", "");

    let summary = eden
        .generate_and_insert(&target, "widgets", 5, EngineKind::Random)
        .await?;
    assert_eq!(summary.rows_inserted, 5);
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);

    let count: i64 = sqlx::query_scalar("select count(*) from dataeden_fill.widgets")
        .fetch_one(&setup)
        .await?;
    assert_eq!(count, 5);

    eden.shutdown().await;
    sqlx::query("drop schema dataeden_fill cascade")
        .execute(&setup)
        .await?;
    Ok(())
}
