//! Type coercion engine.
//!
//! Converts a raw override string into a value matching the shape of a
//! reference default. The reference's shape is computed once as a [`ValueKind`]
//! tag and coercion is a total match over it, so no input can make this module
//! panic or error; every parse failure degrades to a documented fallback.
//!
//! The headline safety rule: textual defaults accept the raw string verbatim,
//! and sequence defaults never auto-split on commas or spaces. Connection
//! strings and prose survive untouched.

use serde_json::{Number, Value};

/// Strings accepted as `true` for boolean defaults (matched case-insensitively).
pub const TRUTHY: &[&str] = &["true", "1", "yes", "on", "enabled"];

/// Strings accepted as `false` for boolean defaults (matched case-insensitively).
pub const FALSY: &[&str] = &["false", "0", "no", "off", "disabled"];

/// The declared shape of a default value, used to drive coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Textual value; overrides are taken verbatim.
    Str,
    /// Integer value.
    Int,
    /// Floating-point value.
    Float,
    /// Boolean value.
    Bool,
    /// Ordered sequence of opaque elements.
    List,
    /// Anything else (null, nested subtree); overrides are kept as strings.
    Other,
}

/// Compute the shape tag for a value.
pub fn kind_of(value: &Value) -> ValueKind {
    match value {
        Value::String(_) => ValueKind::Str,
        Value::Bool(_) => ValueKind::Bool,
        Value::Number(n) if n.is_f64() => ValueKind::Float,
        Value::Number(_) => ValueKind::Int,
        Value::Array(_) => ValueKind::List,
        Value::Null | Value::Object(_) => ValueKind::Other,
    }
}

/// Coerce a raw string into a value preserving the reference's shape.
///
/// Rules, in order:
/// 1. Textual reference: return the raw string unchanged.
/// 2. Generic literal parse (numbers, booleans, arrays, quoted strings):
///    accepted only when the parsed shape exactly matches the reference's.
/// 3. Boolean reference: match against the truthy/falsy sets; any other
///    string returns the reference's own current value unchanged.
/// 4. Numeric reference: direct parse; on failure the raw string is returned
///    as-is, never zero.
/// 5. Sequence reference: empty string becomes an empty sequence; anything
///    else becomes a single-element sequence holding the exact string.
///    Bracketed array literals were already handled by rule 2.
/// 6. Any other reference shape: raw string unchanged.
pub fn coerce(raw: &str, reference: &Value) -> Value {
    let kind = kind_of(reference);
    if kind == ValueKind::Str {
        return Value::String(raw.to_string());
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
        if kind_of(&parsed) == kind {
            return parsed;
        }
    }

    match kind {
        ValueKind::Bool => coerce_bool(raw, reference),
        ValueKind::Int => coerce_int(raw),
        ValueKind::Float => coerce_float(raw),
        ValueKind::List => coerce_list(raw),
        ValueKind::Str | ValueKind::Other => Value::String(raw.to_string()),
    }
}

/// Ambiguous booleans never corrupt existing state: anything outside the
/// truthy/falsy sets returns the reference's current value, not `false`.
fn coerce_bool(raw: &str, reference: &Value) -> Value {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Value::Bool(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Value::Bool(false)
    } else {
        reference.clone()
    }
}

fn coerce_int(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(n) => Value::Number(n.into()),
        Err(_) => Value::String(raw.to_string()),
    }
}

fn coerce_float(raw: &str) -> Value {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Comma- and space-separated text is never auto-split; only an explicit
/// array literal (handled upstream) produces multiple elements.
fn coerce_list(raw: &str) -> Value {
    if raw.trim().is_empty() {
        Value::Array(Vec::new())
    } else {
        Value::Array(vec![Value::String(raw.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_reference_returns_raw() {
        assert_eq!(coerce("hello", &json!("default")), json!("hello"));
        // Safety rule: natural strings with commas pass through untouched.
        assert_eq!(
            coerce("Hello, welcome!", &json!("")),
            json!("Hello, welcome!")
        );
        // Even number-shaped strings stay strings for textual defaults.
        assert_eq!(coerce("42", &json!("x")), json!("42"));
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(coerce("42", &json!(0)), json!(42));
        assert_eq!(coerce("-123", &json!(0)), json!(-123));
        assert_eq!(coerce("3306", &json!(5432)), json!(3306));
        // Invalid ints stay strings, never become zero.
        assert_eq!(coerce("invalid", &json!(0)), json!("invalid"));
        assert_eq!(coerce("3.14", &json!(0)), json!("3.14"));
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(coerce("3.14", &json!(0.0)), json!(3.14));
        assert_eq!(coerce("-2.5", &json!(0.0)), json!(-2.5));
        // Integer-looking strings are accepted for float defaults.
        assert_eq!(coerce("42", &json!(0.0)), json!(42.0));
        assert_eq!(coerce("invalid", &json!(0.0)), json!("invalid"));
    }

    #[test]
    fn test_float_nan_falls_back_to_string() {
        assert_eq!(coerce("NaN", &json!(0.0)), json!("NaN"));
        assert_eq!(coerce("inf", &json!(0.0)), json!("inf"));
    }

    #[test]
    fn test_bool_truthy_set() {
        for raw in ["true", "True", "TRUE", "1", "yes", "on", "enabled"] {
            assert_eq!(coerce(raw, &json!(false)), json!(true), "raw={raw}");
        }
    }

    #[test]
    fn test_bool_falsy_set() {
        for raw in ["false", "False", "0", "no", "off", "disabled"] {
            assert_eq!(coerce(raw, &json!(true)), json!(false), "raw={raw}");
        }
    }

    #[test]
    fn test_ambiguous_bool_preserves_reference() {
        // Not a hardcoded false: the reference's current value survives.
        assert_eq!(coerce("maybe", &json!(true)), json!(true));
        assert_eq!(coerce("maybe", &json!(false)), json!(false));
    }

    #[test]
    fn test_list_from_array_literal() {
        assert_eq!(
            coerce(r#"["a", "b", "c"]"#, &json!([])),
            json!(["a", "b", "c"])
        );
        assert_eq!(
            coerce(r#"["gpt-4", "claude-3"]"#, &json!(["gpt-4"])),
            json!(["gpt-4", "claude-3"])
        );
    }

    #[test]
    fn test_list_never_splits_on_commas_or_spaces() {
        assert_eq!(coerce("a,b,c", &json!([])), json!(["a,b,c"]));
        assert_eq!(
            coerce("host1,host2,host3", &json!([])),
            json!(["host1,host2,host3"])
        );
        assert_eq!(coerce("hello world", &json!([])), json!(["hello world"]));
        assert_eq!(
            coerce("postgresql://host1,host2,host3/db", &json!([])),
            json!(["postgresql://host1,host2,host3/db"])
        );
    }

    #[test]
    fn test_list_single_item_and_empty() {
        assert_eq!(coerce("single-item", &json!([])), json!(["single-item"]));
        assert_eq!(coerce("", &json!([])), json!([]));
        assert_eq!(coerce("   ", &json!([])), json!([]));
    }

    #[test]
    fn test_malformed_array_literal_becomes_single_element() {
        assert_eq!(coerce("[1, 2", &json!([])), json!(["[1, 2"]));
    }

    #[test]
    fn test_other_reference_returns_raw() {
        assert_eq!(coerce("anything", &json!(null)), json!("anything"));
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&json!("s")), ValueKind::Str);
        assert_eq!(kind_of(&json!(1)), ValueKind::Int);
        assert_eq!(kind_of(&json!(1.5)), ValueKind::Float);
        assert_eq!(kind_of(&json!(true)), ValueKind::Bool);
        assert_eq!(kind_of(&json!([])), ValueKind::List);
        assert_eq!(kind_of(&json!(null)), ValueKind::Other);
        assert_eq!(kind_of(&json!({})), ValueKind::Other);
    }
}
