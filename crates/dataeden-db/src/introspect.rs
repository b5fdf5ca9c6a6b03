use std::collections::HashSet;

use tracing::{debug, info};

use dataeden_core::{ColumnDescriptor, Result, current_schema_param};

use crate::pool::Handle;
use crate::source::RawColumn;

/// Schema to introspect: the address's `currentSchema` parameter, else the
/// connection's catalog, else its default schema.
pub async fn effective_schema(handle: &Handle) -> Result<Option<String>> {
    if let Some(schema) = current_schema_param(handle.address()) {
        return Ok(Some(schema));
    }
    let source = handle.source();
    if let Some(catalog) = source.current_catalog().await? {
        return Ok(Some(catalog));
    }
    source.current_schema().await
}

/// Base tables of the effective schema, in name order.
pub async fn list_tables(handle: &Handle) -> Result<Vec<String>> {
    let schema = effective_schema(handle).await?;
    let tables = handle.source().list_tables(schema.as_deref()).await?;
    info!(
        address = %handle.redacted_address(),
        schema = schema.as_deref().unwrap_or("<default>"),
        tables = tables.len(),
        "listed tables"
    );
    Ok(tables)
}

/// Columns of `table` in ordinal order. A missing table yields an empty list.
pub async fn list_columns(handle: &Handle, table: &str) -> Result<Vec<ColumnDescriptor>> {
    let schema = effective_schema(handle).await?;
    let source = handle.source();
    let keys: HashSet<String> = source
        .primary_keys(schema.as_deref(), table)
        .await?
        .into_iter()
        .collect();
    let raw = source.columns(schema.as_deref(), table).await?;
    if raw.is_empty() {
        debug!(table, "table not found or has no columns");
    }
    Ok(map_columns(raw, &keys))
}

fn map_columns(raw: Vec<RawColumn>, keys: &HashSet<String>) -> Vec<ColumnDescriptor> {
    raw.into_iter()
        .map(|column| {
            let primary_key = keys.contains(&column.name);
            ColumnDescriptor::new(column.name, column.type_name)
                .with_size(column.size, column.decimal_digits)
                .with_nullable(column.nullable)
                .with_auto_increment(column.auto_increment)
                .with_primary_key(primary_key)
                .with_remarks(column.remarks)
        })
        .collect()
}
