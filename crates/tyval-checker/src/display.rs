//! Value/type rendering helpers shared by the diagnostic composer.

use serde_json::Value;
use tyval_schema::schema::type_to_string;
use tyval_schema::{Schema, TypeNode};

/// `<short-value>`: `value` alone when its textual repr is >= 40 chars,
/// else `value (aka. \`<repr>\`)`. Returns whether the full value should
/// be appended as a `value = <pretty-json>` trailer (i.e. the repr was
/// long enough to be elided).
pub(crate) fn short_value(value: &Value) -> (String, bool) {
    let repr = value_repr(value);
    if repr.chars().count() >= 40 {
        ("value".to_string(), true)
    } else {
        (format!("value (aka. `{repr}`)"), false)
    }
}

fn value_repr(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
        Value::String(s) => format!("'{s}'"),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// `<short-type>` for the top-level header: the declared name if any, else
/// a short `typeToString`; when that structural form is long and
/// substantially longer than the `_TYPE_` placeholder, the placeholder is
/// used instead (the message composer then appends a `_TYPE_ = ...`
/// trailer). Returns whether the placeholder was used.
pub(crate) const TYPE_PLACEHOLDER: &str = "_TYPE_";

pub(crate) fn short_type_header(schema: &Schema, node: &TypeNode) -> (String, bool) {
    if let Some(name) = node.name() {
        return (name.to_string(), false);
    }
    let structural = type_to_string(schema, node, true);
    if structural.chars().count() > 60 {
        (TYPE_PLACEHOLDER.to_string(), true)
    } else {
        (structural, false)
    }
}

/// The short type description threaded through recursive descent for
/// `While checking ... against type ...` breadcrumbs: the declared name if
/// any, else the short structural form (no placeholder substitution — that
/// is reserved for the top-level header).
pub(crate) fn short_type_path(schema: &Schema, node: &TypeNode) -> String {
    if let Some(name) = node.name() {
        name.to_string()
    } else {
        type_to_string(schema, node, true)
    }
}

/// JS `typeof`-style classification used by `JsTypeMismatch` messages.
pub(crate) fn js_type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "object",
        Value::Array(_) => "object",
        Value::Object(_) => "object",
    }
}

pub(crate) fn actual_repr(value: &Value) -> String {
    value_repr(value)
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, `12th`, `13th`, `21st`, ...
pub(crate) fn ordinal(n: usize) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub(crate) fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
    }

    #[test]
    fn short_value_elides_long_values() {
        let long_string = Value::String("x".repeat(50));
        let (display, trailer) = short_value(&long_string);
        assert_eq!(display, "value");
        assert!(trailer);
    }

    #[test]
    fn short_value_inlines_short_values() {
        let (display, trailer) = short_value(&Value::Bool(true));
        assert_eq!(display, "value (aka. `true`)");
        assert!(!trailer);
    }
}
