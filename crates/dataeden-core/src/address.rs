use std::fmt;

use crate::redaction::redact_address;

/// Query-string key naming the schema to introspect.
const SCHEMA_PARAM: &str = "currentSchema";

/// Connection target: address plus credentials.
///
/// This tuple is the pool key. `Debug` never prints the credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub address: String,
    pub principal: String,
    pub credential: String,
}

impl Target {
    pub fn new(
        address: impl Into<String>,
        principal: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            principal: principal.into(),
            credential: credential.into(),
        }
    }

    /// Address with secrets masked, safe for logs and error messages.
    pub fn redacted_address(&self) -> String {
        redact_address(&self.address).redacted
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("address", &self.redacted_address())
            .field("principal", &self.principal)
            .field("credential", &"***")
            .finish()
    }
}

/// Remove a leading `jdbc:` marker (case-insensitive).
pub fn strip_jdbc_prefix(address: &str) -> &str {
    match address.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("jdbc:") => &address[5..],
        _ => address,
    }
}

/// Extract the `currentSchema` query parameter, URL-decoded.
pub fn current_schema_param(address: &str) -> Option<String> {
    let (_, query) = address.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.eq_ignore_ascii_case(SCHEMA_PARAM) && !value.is_empty() {
            Some(percent_decode(value))
        } else {
            None
        }
    })
}

/// Decode `%XX` escapes and `+`. Malformed escapes are kept literally.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'%' if idx + 2 < bytes.len() => {
                match (hex_value(bytes[idx + 1]), hex_value(bytes[idx + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high << 4 | low);
                        idx += 3;
                    }
                    _ => {
                        decoded.push(b'%');
                        idx += 1;
                    }
                }
            }
            b'+' => {
                decoded.push(b' ');
                idx += 1;
            }
            byte => {
                decoded.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
