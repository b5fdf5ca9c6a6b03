use dataeden_core::{ColumnDescriptor, Dialect, Error, Result, generation_columns};

/// A parameterized INSERT for the generation columns of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    table: String,
    dialect: Dialect,
    columns: Vec<ColumnDescriptor>,
    sql: String,
}

impl InsertPlan {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Columns bound by the statement, in statement order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Plan the insert for `table`, keeping only columns that need generated values.
pub fn plan_insert(
    dialect: Dialect,
    table: &str,
    all_columns: &[ColumnDescriptor],
) -> Result<InsertPlan> {
    let columns = generation_columns(all_columns);
    if columns.is_empty() {
        return Err(Error::NothingToGenerate(table.to_string()));
    }
    let sql = insert_sql(dialect, table, &columns);
    Ok(InsertPlan {
        table: table.to_string(),
        dialect,
        columns,
        sql,
    })
}

/// `INSERT INTO <table> (<columns>) VALUES (<placeholders>)` with quoted identifiers.
pub fn insert_sql(dialect: Dialect, table: &str, columns: &[ColumnDescriptor]) -> String {
    let names: Vec<String> = columns
        .iter()
        .map(|column| dialect.quote_identifier(column.name()))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len())
        .map(|index| dialect.placeholder(index))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote_identifier(table),
        names.join(", "),
        placeholders.join(", ")
    )
}
