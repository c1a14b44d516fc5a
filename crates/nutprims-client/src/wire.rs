//! Small helpers for the textual parts of upsd responses.

use crate::error::{ClientError, Result};

/// Quote a value for use in a command, escaping `"` and `\`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Undo [`quote`].
///
/// Input that does not start with `"` is returned unchanged. A missing
/// closing quote is tolerated: the rest of the input is the value.
pub fn unquote(text: &str) -> String {
    let Some(body) = text.strip_prefix('"') else {
        return text.to_string();
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => break,
            other => out.push(other),
        }
    }
    out
}

/// Strip the echoed `prefix` from a response line.
pub fn strip_echo<'a>(line: &'a str, prefix: &str) -> Result<&'a str> {
    line.strip_prefix(prefix).ok_or_else(|| {
        ClientError::protocol(format!("expected response starting with '{prefix}', got '{line}'"))
    })
}

/// Split `name "quoted value"` into its name and unquoted value.
pub fn split_name_value(rest: &str) -> Result<(&str, String)> {
    let quote_at = rest
        .find('"')
        .ok_or_else(|| ClientError::protocol(format!("missing quoted value in '{rest}'")))?;
    let name = rest[..quote_at].trim_end();
    Ok((name, unquote(&rest[quote_at..])))
}
