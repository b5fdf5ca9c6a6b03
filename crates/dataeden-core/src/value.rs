use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::column::TypeCategory;

/// Native value bound to one statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL typed after the column category so drivers can pick a parameter type.
    Null(TypeCategory),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Boolean(bool),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null(_))
    }

    /// Category this value is bound as.
    pub fn category(&self) -> TypeCategory {
        match self {
            SqlValue::Null(category) => *category,
            SqlValue::Integer(_) => TypeCategory::Integer,
            SqlValue::Float(_) | SqlValue::Decimal(_) => TypeCategory::Float,
            SqlValue::Date(_) => TypeCategory::Date,
            SqlValue::Boolean(_) => TypeCategory::Boolean,
            SqlValue::Text(_) => TypeCategory::String,
        }
    }
}
