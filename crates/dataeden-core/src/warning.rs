use serde::Serialize;

use crate::column::TypeCategory;

/// Recoverable event reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Warning {
    /// A generated row carried more values than columns; the extras were dropped.
    RowTruncated {
        line: usize,
        found: usize,
        expected: usize,
    },
    /// A generated row carried fewer values than columns and was skipped.
    RowDropped {
        line: usize,
        found: usize,
        expected: usize,
    },
    /// The engine produced a different number of rows than requested.
    RowCountMismatch { requested: usize, produced: usize },
    /// A cell could not be converted and is inserted as text.
    ConversionFallback {
        row: usize,
        column: String,
        category: TypeCategory,
        value: String,
    },
}

impl Warning {
    pub fn code(&self) -> &'static str {
        match self {
            Warning::RowTruncated { .. } => "row_truncated",
            Warning::RowDropped { .. } => "row_dropped",
            Warning::RowCountMismatch { .. } => "row_count_mismatch",
            Warning::ConversionFallback { .. } => "conversion_fallback",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::RowTruncated {
                line,
                found,
                expected,
            } => write!(
                f,
                "line {line} has {found} values, expected {expected}; extra values dropped"
            ),
            Warning::RowDropped {
                line,
                found,
                expected,
            } => write!(
                f,
                "line {line} has {found} values, expected {expected}; row skipped"
            ),
            Warning::RowCountMismatch {
                requested,
                produced,
            } => write!(f, "produced {produced} rows, requested {requested}"),
            Warning::ConversionFallback {
                row,
                column,
                category,
                value,
            } => write!(
                f,
                "row {row}: value '{value}' is not a valid {category} for column '{column}'; inserted as text"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_code_tag() {
        let warning = Warning::RowCountMismatch {
            requested: 10,
            produced: 8,
        };
        let json = serde_json::to_value(&warning).expect("serialize warning");
        assert_eq!(json["code"], "row_count_mismatch");
        assert_eq!(json["produced"], 8);
        assert_eq!(warning.code(), "row_count_mismatch");
    }
}
