use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use chrono::NaiveDate;

use dataeden_core::{Error, Result, SqlValue, TypeCategory};

use crate::source::RawColumn;

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("select 1")
        .execute(pool)
        .await
        .map_err(db_error)?;
    Ok(())
}

pub async fn current_schema(pool: &PgPool) -> Result<Option<String>> {
    sqlx::query_scalar::<_, Option<String>>("select current_schema()::text")
        .fetch_one(pool)
        .await
        .map_err(db_error)
}

pub async fn list_tables(pool: &PgPool, schema: Option<&str>) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select table_name::text
        from information_schema.tables
        where table_schema::text = coalesce($1::text, current_schema()::text)
          and table_type = 'BASE TABLE'
        order by table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn primary_keys(pool: &PgPool, schema: Option<&str>, table: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select kcu.column_name::text
        from information_schema.table_constraints tc
        join information_schema.key_column_usage kcu
          on kcu.constraint_schema = tc.constraint_schema
         and kcu.constraint_name = tc.constraint_name
         and kcu.table_name = tc.table_name
        where tc.constraint_type = 'PRIMARY KEY'
          and tc.table_schema::text = coalesce($1::text, current_schema()::text)
          and tc.table_name::text = $2
        order by kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn list_columns(pool: &PgPool, schema: Option<&str>, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select
          c.column_name::text as name,
          c.udt_name::text as type_name,
          coalesce(c.character_maximum_length, c.numeric_precision, 0)::int4 as size,
          coalesce(c.numeric_scale, 0)::int4 as decimal_digits,
          (c.is_nullable = 'YES') as nullable,
          (c.is_identity = 'YES' or coalesce(c.column_default, '') like 'nextval(%') as auto_increment,
          pg_catalog.col_description(
            format('%I.%I', c.table_schema, c.table_name)::regclass::oid,
            c.ordinal_position::int4
          ) as remarks
        from information_schema.columns c
        where c.table_schema::text = coalesce($1::text, current_schema()::text)
          and c.table_name::text = $2
        order by c.ordinal_position
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
                size: non_negative(row.try_get::<i32, _>("size").map_err(db_error)?),
                decimal_digits: non_negative(
                    row.try_get::<i32, _>("decimal_digits").map_err(db_error)?,
                ),
                nullable: row.try_get("nullable").map_err(db_error)?,
                auto_increment: row.try_get("auto_increment").map_err(db_error)?,
                remarks: row.try_get("remarks").map_err(db_error)?,
            })
        })
        .collect()
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

pub async fn execute_batch(pool: &PgPool, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
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
    query: Query<'q, Postgres, PgArguments>,
    value: &SqlValue,
) -> Query<'q, Postgres, PgArguments> {
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
