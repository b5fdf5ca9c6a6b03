use dataeden_core::Warning;

const FENCE: &str = "```";

/// Language tags a model puts after an opening fence.
const INFO_TAGS: &[&str] = &["csv", "text", "txt", "plain", "plaintext", "tsv"];

/// Rows recovered from a model reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<Vec<String>>,
    pub warnings: Vec<Warning>,
}

/// Remove one surrounding code fence. A known language tag on the opening
/// fence (such as `csv`) is part of the delimiter; any other text there is
/// the first row.
pub fn strip_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };
    let body = match after_open.split_once('\n') {
        Some((info, rest)) if is_info_string(info) => rest,
        _ => after_open,
    };
    let body = body.rfind(FENCE).map_or(body, |end| &body[..end]);
    body.trim()
}

fn is_info_string(info: &str) -> bool {
    let info = info.trim();
    info.is_empty()
        || INFO_TAGS
            .iter()
            .any(|tag| info.eq_ignore_ascii_case(tag))
}

/// Split one line on commas outside double quotes, trimming each value.
///
/// A `"` only toggles quoting and is never part of a value.
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => values.push(std::mem::take(&mut current).trim().to_string()),
            other => current.push(other),
        }
    }
    values.push(current.trim().to_string());
    values
}

/// Parse a reply into rows of exactly `columns` values.
///
/// Long rows are truncated, short rows dropped and a row-count difference
/// reported; each case adds a warning.
pub fn parse_rows(reply: &str, expected_rows: usize, columns: usize) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    for (index, line) in strip_fence(reply).lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut values = split_line(line);
        let found = values.len();
        if found > columns {
            values.truncate(columns);
            parsed.warnings.push(Warning::RowTruncated {
                line: index + 1,
                found,
                expected: columns,
            });
        } else if found < columns {
            parsed.warnings.push(Warning::RowDropped {
                line: index + 1,
                found,
                expected: columns,
            });
            continue;
        }
        parsed.rows.push(values);
    }

    if parsed.rows.len() != expected_rows {
        parsed.warnings.push(Warning::RowCountMismatch {
            requested: expected_rows,
            produced: parsed.rows.len(),
        });
    }
    parsed
}
