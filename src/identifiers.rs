//! Identifier escaping.
//!
//! BQL identifiers that contain whitespace or quotes have to be wrapped in double quotes:
//! ```text
//! order lines   ->  "order lines"
//! say "hi"      ->  "say \"hi\""
//! ```
//! Escaping is total, it never fails. The `Option` variants pass `None` straight through so
//! callers holding optional segments don't have to branch.

const QUOTE: char = '"';
const ESCAPED_QUOTE: &str = "\\\"";

/// Always quotes the value.
pub fn escape_identifier(value: &str) -> String {
    format!("{QUOTE}{}{QUOTE}", value.replace(QUOTE, ESCAPED_QUOTE))
}

/// Quotes the value only when it contains a space, a tab or a quote.
pub fn escape_identifier_if_required(value: &str) -> String {
    if requires_escaping(value) {
        escape_identifier(value)
    } else {
        value.to_owned()
    }
}

/// Exact inverse of [escape_identifier].
///
/// Only one layer of quotes is removed, and only when the value is quoted on both ends. Values
/// that aren't quoted are returned as they are.
pub fn un_escape_identifier(value: &str) -> String {
    let is_quoted = value.len() >= 2 && value.starts_with(QUOTE) && value.ends_with(QUOTE);

    if !is_quoted {
        return value.to_owned();
    }

    value[1..value.len() - 1].replace(ESCAPED_QUOTE, "\"")
}

pub fn requires_escaping(value: &str) -> bool {
    value.contains([' ', '\t', QUOTE])
}

pub fn escape_identifier_opt(value: Option<&str>) -> Option<String> {
    value.map(escape_identifier)
}

pub fn escape_identifier_if_required_opt(value: Option<&str>) -> Option<String> {
    value.map(escape_identifier_if_required)
}

pub fn un_escape_identifier_opt(value: Option<&str>) -> Option<String> {
    value.map(un_escape_identifier)
}
