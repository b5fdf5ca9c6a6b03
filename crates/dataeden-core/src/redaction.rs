use serde::Serialize;

use crate::address::strip_jdbc_prefix;

/// Address metadata with secrets redacted.
#[derive(Debug, Clone, Serialize)]
pub struct RedactedAddress {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub redacted: String,
}

/// Redact secrets from an address while extracting non-sensitive metadata.
///
/// Handles both native URLs (`postgres://user:pw@host/db`) and JDBC-style
/// addresses (`jdbc:mysql://host:3306/db?password=pw`).
pub fn redact_address(address: &str) -> RedactedAddress {
    let prefix_len = address.len() - strip_jdbc_prefix(address).len();
    let mut redacted = address.to_string();
    let mut scheme = None;
    let mut host = None;
    let mut port = None;
    let mut database = None;

    let body = &address[prefix_len..];
    if let Some(scheme_end) = body.find("://") {
        scheme = Some(body[..scheme_end].to_string());
        let authority_start = prefix_len + scheme_end + 3;
        let after_scheme = &address[authority_start..];
        let authority_end = authority_len(after_scheme);
        let authority = &after_scheme[..authority_end];

        let host_port = match authority.rfind('@') {
            Some(at_idx) => {
                let credentials = &authority[..at_idx];
                if let Some(colon_idx) = credentials.find(':') {
                    let start = authority_start + colon_idx + 1;
                    let end = authority_start + at_idx;
                    redacted.replace_range(start..end, "***");
                }
                &authority[at_idx + 1..]
            }
            None => authority,
        };

        if !host_port.is_empty() {
            match host_port.rfind(':') {
                Some(colon_idx) => {
                    host = Some(host_port[..colon_idx].to_string());
                    port = host_port[colon_idx + 1..].parse::<u16>().ok();
                }
                None => host = Some(host_port.to_string()),
            }
        }

        let rest = &after_scheme[authority_end..];
        if let Some(path) = rest.strip_prefix('/') {
            let name = path.split(['?', ';']).next().unwrap_or("");
            if !name.is_empty() {
                database = Some(name.to_string());
            }
        }
    }

    RedactedAddress {
        scheme,
        host,
        port,
        database,
        redacted: redact_parameters(&redacted),
    }
}

/// Length of the authority. User info ends at the last `@` before the path,
/// so a raw `?` or `;` inside a password stays within the authority.
fn authority_len(after_scheme: &str) -> usize {
    let head = &after_scheme[..after_scheme.find('/').unwrap_or(after_scheme.len())];
    let host_start = head.rfind('@').map_or(0, |at| at + 1);
    head[host_start..]
        .find(['?', ';'])
        .map_or(head.len(), |end| host_start + end)
}

fn redact_parameters(address: &str) -> String {
    let Some(query_start) = address.find(['?', ';']) else {
        return address.to_string();
    };

    let (base, query) = address.split_at(query_start + 1);
    let separator = if address.as_bytes()[query_start] == b';' {
        ';'
    } else {
        '&'
    };

    let params: Vec<String> = query
        .split(separator)
        .map(|pair| {
            let mut iter = pair.splitn(2, '=');
            let key = iter.next().unwrap_or("");
            match iter.next() {
                Some(_) if is_sensitive_key(key) => format!("{key}=***"),
                Some(value) => format!("{key}={value}"),
                None => key.to_string(),
            }
        })
        .collect();

    format!("{base}{}", params.join(&separator.to_string()))
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "pass" | "pwd" | "token" | "api_key" | "apikey"
    )
}
