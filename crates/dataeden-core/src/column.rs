use serde::Serialize;

/// Semantic category derived from a column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeCategory {
    String,
    Integer,
    Float,
    Date,
    Boolean,
    Binary,
    Unknown,
}

impl TypeCategory {
    /// Categories that are generated and bound as plain text.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            TypeCategory::String | TypeCategory::Binary | TypeCategory::Unknown
        )
    }
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeCategory::String => "STRING",
            TypeCategory::Integer => "INTEGER",
            TypeCategory::Float => "FLOAT",
            TypeCategory::Date => "DATE",
            TypeCategory::Boolean => "BOOLEAN",
            TypeCategory::Binary => "BINARY",
            TypeCategory::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

const CATEGORY_TABLE: &[(&str, TypeCategory)] = &[
    ("VARCHAR", TypeCategory::String),
    ("CHAR", TypeCategory::String),
    ("TEXT", TypeCategory::String),
    ("NVARCHAR", TypeCategory::String),
    ("NCHAR", TypeCategory::String),
    ("STRING", TypeCategory::String),
    ("BPCHAR", TypeCategory::String),
    ("LONGTEXT", TypeCategory::String),
    ("MEDIUMTEXT", TypeCategory::String),
    ("TINYTEXT", TypeCategory::String),
    ("VARCHAR2", TypeCategory::String),
    ("NVARCHAR2", TypeCategory::String),
    ("CLOB", TypeCategory::String),
    ("INT", TypeCategory::Integer),
    ("INTEGER", TypeCategory::Integer),
    ("BIGINT", TypeCategory::Integer),
    ("SMALLINT", TypeCategory::Integer),
    ("TINYINT", TypeCategory::Integer),
    ("MEDIUMINT", TypeCategory::Integer),
    ("INT2", TypeCategory::Integer),
    ("INT4", TypeCategory::Integer),
    ("INT8", TypeCategory::Integer),
    ("SERIAL", TypeCategory::Integer),
    ("BIGSERIAL", TypeCategory::Integer),
    ("DECIMAL", TypeCategory::Float),
    ("NUMERIC", TypeCategory::Float),
    ("NUMBER", TypeCategory::Float),
    ("FLOAT", TypeCategory::Float),
    ("FLOAT4", TypeCategory::Float),
    ("FLOAT8", TypeCategory::Float),
    ("DOUBLE", TypeCategory::Float),
    ("DOUBLE PRECISION", TypeCategory::Float),
    ("REAL", TypeCategory::Float),
    ("MONEY", TypeCategory::Float),
    ("DATE", TypeCategory::Date),
    ("TIME", TypeCategory::Date),
    ("DATETIME", TypeCategory::Date),
    ("DATETIME2", TypeCategory::Date),
    ("TIMESTAMP", TypeCategory::Date),
    ("TIMESTAMPTZ", TypeCategory::Date),
    ("BIT", TypeCategory::Boolean),
    ("BOOLEAN", TypeCategory::Boolean),
    ("BOOL", TypeCategory::Boolean),
    ("BLOB", TypeCategory::Binary),
    ("BINARY", TypeCategory::Binary),
    ("VARBINARY", TypeCategory::Binary),
    ("BYTEA", TypeCategory::Binary),
];

/// Classify a declared type name. Matching is exact and case-insensitive;
/// anything outside the table is `Unknown`.
pub fn classify(declared_type: &str) -> TypeCategory {
    let upper = declared_type.trim().to_uppercase();
    CATEGORY_TABLE
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, category)| *category)
        .unwrap_or(TypeCategory::Unknown)
}

/// Metadata for one table column.
///
/// Built once by the introspector and never mutated afterwards; `category`
/// always reflects `declared_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    name: String,
    declared_type: String,
    size: u32,
    scale: u32,
    nullable: bool,
    auto_increment: bool,
    primary_key: bool,
    foreign_key: bool,
    remarks: Option<String>,
    category: TypeCategory,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        let category = classify(&declared_type);
        Self {
            name: name.into(),
            declared_type,
            size: 0,
            scale: 0,
            nullable: true,
            auto_increment: false,
            primary_key: false,
            foreign_key: false,
            remarks: None,
            category,
        }
    }

    pub fn with_size(mut self, size: u32, scale: u32) -> Self {
        self.size = size;
        self.scale = scale;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_remarks(mut self, remarks: Option<String>) -> Self {
        self.remarks = remarks.filter(|text| !text.trim().is_empty());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Length for strings and binaries, precision for numerics.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Decimal digits for numerics.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn primary_key(&self) -> bool {
        self.primary_key
    }

    /// Always false: foreign keys are not discovered.
    pub fn foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }

    /// Identity/serial columns and key columns are left to the database.
    pub fn requires_generation(&self) -> bool {
        !self.auto_increment && !self.primary_key
    }

    /// `NUMERIC` and `DECIMAL` carry an exact precision and scale.
    pub fn is_exact_numeric(&self) -> bool {
        let declared = self.declared_type.trim();
        declared.eq_ignore_ascii_case("NUMERIC") || declared.eq_ignore_ascii_case("DECIMAL")
    }

    /// Declared type with its size and scale, e.g. `NUMERIC(6,2)`.
    pub fn type_signature(&self) -> String {
        match (self.size, self.scale) {
            (0, _) => self.declared_type.clone(),
            (size, 0) => format!("{}({size})", self.declared_type),
            (size, scale) => format!("{}({size},{scale})", self.declared_type),
        }
    }
}

/// Keep only the columns whose values must be synthesized, preserving order.
pub fn generation_columns(columns: &[ColumnDescriptor]) -> Vec<ColumnDescriptor> {
    columns
        .iter()
        .filter(|column| column.requires_generation())
        .cloned()
        .collect()
}
