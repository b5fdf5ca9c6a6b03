use serde::Serialize;

use crate::error::{Error, Result};
use crate::redaction::redact_address;

/// Database family addressed by a connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    PostgreSql,
    Oracle,
    SqlServer,
}

/// Bind-parameter syntax used by a dialect's driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:1`, `:2`, ...
    Colon,
    /// `@P1`, `@P2`, ...
    AtP,
}

/// Conventions for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct DialectSpec {
    pub dialect: Dialect,
    pub name: &'static str,
    /// Substrings that identify the dialect inside an address.
    pub markers: &'static [&'static str],
    pub open_quote: char,
    pub close_quote: char,
    pub placeholder: PlaceholderStyle,
    /// Driver the connector registry uses for this dialect.
    pub driver: &'static str,
}

/// Dialects in resolution priority order.
const DIALECTS: &[DialectSpec] = &[
    DialectSpec {
        dialect: Dialect::MySql,
        name: "mysql",
        markers: &["mysql", "mariadb"],
        open_quote: '`',
        close_quote: '`',
        placeholder: PlaceholderStyle::Question,
        driver: "sqlx-mysql",
    },
    DialectSpec {
        dialect: Dialect::PostgreSql,
        name: "postgresql",
        markers: &["postgresql", "postgres"],
        open_quote: '"',
        close_quote: '"',
        placeholder: PlaceholderStyle::Dollar,
        driver: "sqlx-postgres",
    },
    DialectSpec {
        dialect: Dialect::Oracle,
        name: "oracle",
        markers: &["oracle"],
        open_quote: '"',
        close_quote: '"',
        placeholder: PlaceholderStyle::Colon,
        driver: "oracle",
    },
    DialectSpec {
        dialect: Dialect::SqlServer,
        name: "sqlserver",
        markers: &["sqlserver", "mssql"],
        open_quote: '[',
        close_quote: ']',
        placeholder: PlaceholderStyle::AtP,
        driver: "tds",
    },
];

impl Dialect {
    /// Resolve the dialect named by an address.
    pub fn resolve(address: &str) -> Result<Dialect> {
        let lowered = address.to_lowercase();
        DIALECTS
            .iter()
            .find(|spec| spec.markers.iter().any(|marker| lowered.contains(marker)))
            .map(|spec| spec.dialect)
            .ok_or_else(|| Error::UnsupportedDialect(redact_address(address).redacted))
    }

    pub fn all() -> impl Iterator<Item = Dialect> {
        DIALECTS.iter().map(|spec| spec.dialect)
    }

    pub fn spec(self) -> &'static DialectSpec {
        DIALECTS
            .iter()
            .find(|spec| spec.dialect == self)
            .unwrap_or(&DIALECTS[0])
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Quote an identifier, doubling any embedded closing quote.
    pub fn quote_identifier(self, identifier: &str) -> String {
        let spec = self.spec();
        let close = spec.close_quote.to_string();
        let escaped = identifier.replace(&close, &close.repeat(2));
        format!("{}{escaped}{}", spec.open_quote, spec.close_quote)
    }

    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self.spec().placeholder {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${index}"),
            PlaceholderStyle::Colon => format!(":{index}"),
            PlaceholderStyle::AtP => format!("@P{index}"),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
