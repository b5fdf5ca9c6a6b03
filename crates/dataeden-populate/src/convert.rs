use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use dataeden_core::{ColumnDescriptor, SqlValue, TypeCategory, Warning};

/// Result of converting one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Native(SqlValue),
    /// The text did not parse as the column's type; it is bound as text.
    Fallback(String),
}

/// Convert `raw` to the native value for `column`. Blank cells become a
/// typed NULL.
pub fn convert_cell(column: &ColumnDescriptor, raw: &str) -> Conversion {
    let category = column.category();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Conversion::Native(SqlValue::Null(category));
    }

    let parsed = match category {
        TypeCategory::Integer => trimmed.parse::<i64>().ok().map(SqlValue::Integer),
        TypeCategory::Float if column.is_exact_numeric() => {
            parse_decimal(trimmed).map(SqlValue::Decimal)
        }
        TypeCategory::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(SqlValue::Float),
        TypeCategory::Date => parse_date(trimmed).map(SqlValue::Date),
        TypeCategory::Boolean => parse_bool(trimmed).map(SqlValue::Boolean),
        TypeCategory::String | TypeCategory::Binary | TypeCategory::Unknown => {
            Some(SqlValue::Text(raw.to_string()))
        }
    };

    match parsed {
        Some(value) => Conversion::Native(value),
        None => Conversion::Fallback(raw.to_string()),
    }
}

/// Convert one grid row, recording a warning for each fallback.
pub fn convert_row(
    columns: &[ColumnDescriptor],
    row: &[String],
    row_index: usize,
    warnings: &mut Vec<Warning>,
) -> Vec<SqlValue> {
    columns
        .iter()
        .zip(row)
        .map(|(column, raw)| match convert_cell(column, raw) {
            Conversion::Native(value) => value,
            Conversion::Fallback(raw) => {
                warnings.push(Warning::ConversionFallback {
                    row: row_index,
                    column: column.name().to_string(),
                    category: column.category(),
                    value: raw.clone(),
                });
                SqlValue::Text(raw)
            }
        })
        .collect()
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Strict `YYYY-MM-DD`.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(idx, byte)| idx == 4 || idx == 7 || byte.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, declared: &str) -> ColumnDescriptor {
        ColumnDescriptor::new(name, declared)
    }

    #[test]
    fn converts_each_category() {
        assert_eq!(
            convert_cell(&column("qty", "int"), "42"),
            Conversion::Native(SqlValue::Integer(42))
        );
        assert_eq!(
            convert_cell(&column("total", "numeric").with_size(6, 2), "12.50"),
            Conversion::Native(SqlValue::Decimal(Decimal::new(1250, 2)))
        );
        assert_eq!(
            convert_cell(&column("ratio", "float8"), "0.25"),
            Conversion::Native(SqlValue::Float(0.25))
        );
        assert_eq!(
            convert_cell(&column("due", "date"), "2026-02-28"),
            Conversion::Native(SqlValue::Date(
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap_or_default()
            ))
        );
        assert_eq!(
            convert_cell(&column("paid", "bool"), "TRUE"),
            Conversion::Native(SqlValue::Boolean(true))
        );
        assert_eq!(
            convert_cell(&column("note", "text"), " keep spaces "),
            Conversion::Native(SqlValue::Text(" keep spaces ".to_string()))
        );
    }

    #[test]
    fn exact_numerics_accept_scientific_notation() {
        assert_eq!(
            convert_cell(&column("total", "DECIMAL"), "1.5e2"),
            Conversion::Native(SqlValue::Decimal(Decimal::new(150, 0)))
        );
    }

    #[test]
    fn random_wide_numerics_convert_to_exact_decimals() {
        let columns = vec![
            column("amount", "numeric").with_size(38, 0),
            column("rate", "numeric").with_size(38, 12),
        ];
        let outcome = dataeden_generate::RandomEngine::seeded(1).generate(20, &columns);
        for row in outcome.grid.rows() {
            for (column, raw) in columns.iter().zip(row) {
                assert!(
                    matches!(convert_cell(column, raw), Conversion::Native(SqlValue::Decimal(_))),
                    "{raw} did not convert for {}",
                    column.name()
                );
            }
        }
    }

    #[test]
    fn blank_cells_are_typed_nulls() {
        assert_eq!(
            convert_cell(&column("due", "date"), "   "),
            Conversion::Native(SqlValue::Null(TypeCategory::Date))
        );
        assert_eq!(
            convert_cell(&column("note", "varchar"), ""),
            Conversion::Native(SqlValue::Null(TypeCategory::String))
        );
    }

    #[test]
    fn unparseable_values_fall_back_to_text() {
        assert_eq!(
            convert_cell(&column("due", "date"), "2026-2-28"),
            Conversion::Fallback("2026-2-28".to_string())
        );
        assert_eq!(
            convert_cell(&column("due", "date"), "2026-02-30"),
            Conversion::Fallback("2026-02-30".to_string())
        );
        assert_eq!(
            convert_cell(&column("paid", "bool"), "yes"),
            Conversion::Fallback("yes".to_string())
        );
        assert_eq!(
            convert_cell(&column("ratio", "real"), "NaN"),
            Conversion::Fallback("NaN".to_string())
        );
    }

    #[test]
    fn row_conversion_collects_warnings() {
        let columns = vec![column("qty", "int"), column("paid", "bool")];
        let mut warnings = Vec::new();
        let values = convert_row(
            &columns,
            &["many".to_string(), "false".to_string()],
            3,
            &mut warnings,
        );
        assert_eq!(
            values,
            vec![SqlValue::Text("many".to_string()), SqlValue::Boolean(false)]
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), "conversion_fallback");
        assert!(matches!(
            &warnings[0],
            Warning::ConversionFallback { row: 3, column, .. } if column == "qty"
        ));
    }
}
