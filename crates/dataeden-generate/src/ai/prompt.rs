use std::fmt::Write;

use dataeden_core::{ColumnDescriptor, TypeCategory};

/// Column-name fragments and the data they suggest, checked in order.
const NAME_HINTS: &[(&[&str], &str)] = &[
    (&["email"], "email address"),
    (&["phone", "tel"], "phone number"),
    (&["name"], "person name"),
    (&["address"], "street address"),
    (&["city"], "city name"),
    (&["country"], "country name"),
    (&["code", "id"], "unique identifier"),
    (&["date", "time"], "date/time"),
    (&["price", "cost", "amount"], "monetary amount"),
    (&["age"], "age in years"),
    (&["score", "rating"], "score or rating"),
    (&["description", "comment"], "descriptive text"),
    (&["url", "link"], "web URL"),
    (&["status"], "status flag"),
    (&["active", "enabled"], "boolean flag"),
];

const SHORT_TEXT_LIMIT: u32 = 50;

/// What a column most likely holds, from its name and then its category.
pub fn infer_purpose(column: &ColumnDescriptor) -> String {
    let name = column.name().to_lowercase();
    if let Some((_, purpose)) = NAME_HINTS
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|fragment| name.contains(fragment)))
    {
        return (*purpose).to_string();
    }

    match column.category() {
        TypeCategory::Integer => "integer".to_string(),
        TypeCategory::Float if column.is_exact_numeric() => format!(
            "decimal number, precision {},{}",
            column.size(),
            column.scale()
        ),
        TypeCategory::Float => "decimal number".to_string(),
        TypeCategory::Date => "date, format YYYY-MM-DD".to_string(),
        TypeCategory::Boolean => "boolean (true/false)".to_string(),
        TypeCategory::String => match column.size() {
            0 => "text".to_string(),
            size if size < SHORT_TEXT_LIMIT => "short text".to_string(),
            _ => "long text".to_string(),
        },
        TypeCategory::Binary | TypeCategory::Unknown => "realistic value".to_string(),
    }
}

/// Deterministic instructions for producing `rows` CSV rows of `columns`.
pub fn build_prompt(table: &str, rows: usize, columns: &[ColumnDescriptor]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Generate {rows} rows of realistic data for the table `{table}`. Do not add any other columns."
    );
    prompt.push_str("\nColumns:\n");
    for column in columns {
        let _ = write!(
            prompt,
            "- {}: {} - {}",
            column.name(),
            column.type_signature(),
            infer_purpose(column)
        );
        if let Some(remarks) = column.remarks() {
            let _ = write!(prompt, " (column comment: {})", remarks.trim());
        }
        prompt.push('\n');
    }

    let count = columns.len();
    prompt.push_str("\nStrict rules:\n");
    let _ = writeln!(prompt, "1. Produce exactly {rows} rows.");
    prompt.push_str("2. Return the data as CSV using a comma as the separator.\n");
    prompt.push_str("3. Do not include a header row or any other text; output the data only.\n");
    prompt.push_str("4. Wrap any value that contains a comma in double quotes.\n");
    let _ = writeln!(
        prompt,
        "5. The table has exactly {count} columns; never add columns, and make every value match its column type and size."
    );
    prompt.push_str(
        "6. Write dates as YYYY-MM-DD and booleans as true/false; numeric values must respect precision and scale.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_hints_take_precedence_over_categories() {
        let email = ColumnDescriptor::new("contact_email", "varchar").with_size(120, 0);
        let phone = ColumnDescriptor::new("mobile_tel", "varchar").with_size(20, 0);
        let paid = ColumnDescriptor::new("paid", "bool");
        assert_eq!(infer_purpose(&email), "email address");
        assert_eq!(infer_purpose(&phone), "phone number");
        assert_eq!(infer_purpose(&paid), "unique identifier");
    }

    #[test]
    fn categories_fill_in_without_hints() {
        let total = ColumnDescriptor::new("total", "NUMERIC").with_size(6, 2);
        let weight = ColumnDescriptor::new("weight", "float8");
        let memo = ColumnDescriptor::new("memo", "varchar").with_size(255, 0);
        let flag = ColumnDescriptor::new("flag", "varchar").with_size(8, 0);
        let blob = ColumnDescriptor::new("payload", "bytea");
        assert_eq!(infer_purpose(&total), "decimal number, precision 6,2");
        assert_eq!(infer_purpose(&weight), "decimal number");
        assert_eq!(infer_purpose(&memo), "long text");
        assert_eq!(infer_purpose(&flag), "short text");
        assert_eq!(infer_purpose(&blob), "realistic value");
    }

    #[test]
    fn prompt_lists_columns_and_rules() {
        let columns = vec![
            ColumnDescriptor::new("total", "numeric").with_size(6, 2),
            ColumnDescriptor::new("note", "varchar")
                .with_size(40, 0)
                .with_remarks(Some("delivery instructions".to_string())),
        ];
        let prompt = build_prompt("orders", 25, &columns);
        assert!(prompt.contains("Generate 25 rows of realistic data for the table `orders`"));
        assert!(prompt.contains("- total: numeric(6,2) - decimal number, precision 6,2\n"));
        assert!(prompt.contains("- note: varchar(40) - short text (column comment: delivery instructions)\n"));
        assert!(prompt.contains("1. Produce exactly 25 rows."));
        assert!(prompt.contains("exactly 2 columns"));
        assert_eq!(prompt, build_prompt("orders", 25, &columns));
    }
}
