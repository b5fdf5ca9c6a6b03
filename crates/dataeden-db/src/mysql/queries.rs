use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool, Row};

use chrono::NaiveDate;

use dataeden_core::{Error, Result, SqlValue, TypeCategory};

use crate::source::RawColumn;

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

pub async fn ping(pool: &MySqlPool) -> Result<()> {
    sqlx::query("select 1")
        .execute(pool)
        .await
        .map_err(db_error)?;
    Ok(())
}

pub async fn current_database(pool: &MySqlPool) -> Result<Option<String>> {
    sqlx::query_scalar::<_, Option<String>>("select cast(database() as char)")
        .fetch_one(pool)
        .await
        .map_err(db_error)
}

pub async fn list_tables(pool: &MySqlPool, schema: Option<&str>) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select cast(table_name as char)
        from information_schema.tables
        where table_schema = coalesce(?, database())
          and table_type = 'BASE TABLE'
        order by table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn primary_keys(
    pool: &MySqlPool,
    schema: Option<&str>,
    table: &str,
) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select cast(column_name as char)
        from information_schema.key_column_usage
        where constraint_name = 'PRIMARY'
          and table_schema = coalesce(?, database())
          and table_name = ?
        order by ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn list_columns(
    pool: &MySqlPool,
    schema: Option<&str>,
    table: &str,
) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select
          cast(column_name as char) as name,
          cast(data_type as char) as type_name,
          cast(coalesce(character_maximum_length, numeric_precision, 0) as signed) as size,
          cast(coalesce(numeric_scale, 0) as signed) as decimal_digits,
          cast(is_nullable = 'YES' as signed) as nullable,
          cast(extra like '%auto_increment%' as signed) as auto_increment,
          cast(column_comment as char) as remarks
        from information_schema.columns
        where table_schema = coalesce(?, database())
          and table_name = ?
        order by ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter()
        .map(|row| {
            Ok(RawColumn {
                name: row.try_get("name").map_err(db_error)?,
                type_name: row.try_get("type_name").map_err(db_error)?,
                size: clamp_u32(row.try_get::<i64, _>("size").map_err(db_error)?),
                decimal_digits: clamp_u32(
                    row.try_get::<i64, _>("decimal_digits").map_err(db_error)?,
                ),
                nullable: row.try_get::<i64, _>("nullable").map_err(db_error)? != 0,
                auto_increment: row.try_get::<i64, _>("auto_increment").map_err(db_error)? != 0,
                remarks: row.try_get("remarks").map_err(db_error)?,
            })
        })
        .collect()
}

// LONGTEXT reports 4294967295 characters.
fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

pub async fn execute_batch(pool: &MySqlPool, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|err| Error::Insertion(err.to_string()))?;
    let mut affected = 0;
    for row in rows {
        let query = row.iter().fold(sqlx::query(sql), bind_value);
        let result = query
            .execute(&mut *conn)
            .await
            .map_err(|err| Error::Insertion(err.to_string()))?;
        affected += result.rows_affected();
    }
    Ok(affected)
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null(category) => match category {
            TypeCategory::Integer => query.bind(None::<i64>),
            TypeCategory::Float => query.bind(None::<f64>),
            TypeCategory::Date => query.bind(None::<NaiveDate>),
            TypeCategory::Boolean => query.bind(None::<bool>),
            TypeCategory::Binary => query.bind(None::<Vec<u8>>),
            TypeCategory::String | TypeCategory::Unknown => query.bind(None::<String>),
        },
        SqlValue::Integer(value) => query.bind(*value),
        SqlValue::Float(value) => query.bind(*value),
        SqlValue::Decimal(value) => query.bind(*value),
        SqlValue::Date(value) => query.bind(*value),
        SqlValue::Boolean(value) => query.bind(*value),
        SqlValue::Text(value) => query.bind(value.clone()),
    }
}
