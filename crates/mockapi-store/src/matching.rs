//! Field value comparison for searches and foreign key checks.

use std::str::FromStr;

use serde_json::Value;

/// How a stored field value is compared with a wanted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldMatch {
    /// Coercive comparison: numeric strings equal numbers (`"325.00"` ==
    /// `325`), `null` equals `""`, `false` and `0` but no other string,
    /// booleans compare by truthiness.
    #[default]
    Loose,
    /// Exact JSON equality.
    Strict,
}

impl FieldMatch {
    /// Returns true if `stored` matches `wanted` under this mode.
    pub fn matches(self, stored: &Value, wanted: &Value) -> bool {
        match self {
            FieldMatch::Strict => stored == wanted,
            FieldMatch::Loose => loose_eq(stored, wanted),
        }
    }
}

impl FromStr for FieldMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loose" => Ok(FieldMatch::Loose),
            "strict" => Ok(FieldMatch::Strict),
            other => Err(format!("unknown field match mode: {}", other)),
        }
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        // null against a string compares as the empty string
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match numeric(s) {
                Some(parsed) => n.as_f64() == Some(parsed),
                None => n.to_string() == *s,
            }
        }
        (Value::String(x), Value::String(y)) => match (numeric(x), numeric(y)) {
            (Some(p), Some(q)) => p == q,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Parses a numeric string (`"42"`, `" 3.5"`, `"-1e3"`). Words such as
/// `"inf"` or `"nan"` are not numeric.
fn numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !well_formed {
        return None;
    }
    trimmed.parse().ok()
}

/// Renders a scalar value as a primary key lookup string.
///
/// Strings are used as-is and numbers in their JSON form; any other value
/// cannot reference a resource.
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_numeric_strings() {
        let m = FieldMatch::Loose;
        assert!(m.matches(&json!("325.00"), &json!("325.00")));
        assert!(m.matches(&json!("325.00"), &json!("325")));
        assert!(m.matches(&json!("325.00"), &json!(325)));
        assert!(m.matches(&json!(325.0), &json!("325")));
        assert!(!m.matches(&json!("325.00"), &json!("326")));
    }

    #[test]
    fn test_loose_plain_strings() {
        let m = FieldMatch::Loose;
        assert!(m.matches(&json!("John"), &json!("John")));
        assert!(!m.matches(&json!("John"), &json!("john")));
        assert!(!m.matches(&json!("abc"), &json!(0)));
    }

    #[test]
    fn test_loose_null_and_bool() {
        let m = FieldMatch::Loose;
        assert!(m.matches(&Value::Null, &json!("")));
        assert!(m.matches(&Value::Null, &json!(false)));
        assert!(!m.matches(&Value::Null, &json!("x")));
        assert!(!m.matches(&Value::Null, &json!("0")));
        assert!(!m.matches(&json!("0.0"), &Value::Null));
        assert!(m.matches(&Value::Null, &json!(0)));
        assert!(m.matches(&json!(true), &json!("yes")));
        assert!(m.matches(&json!(false), &json!("0")));
    }

    #[test]
    fn test_strict() {
        let m = FieldMatch::Strict;
        assert!(m.matches(&json!("325.00"), &json!("325.00")));
        assert!(!m.matches(&json!("325.00"), &json!("325")));
        assert!(!m.matches(&json!("325"), &json!(325)));
        assert!(!m.matches(&Value::Null, &json!("")));
    }

    #[test]
    fn test_numeric_rejects_words() {
        assert_eq!(numeric("inf"), None);
        assert_eq!(numeric("NaN"), None);
        assert_eq!(numeric(""), None);
        assert_eq!(numeric(" 12 "), Some(12.0));
        assert_eq!(numeric("-1e3"), Some(-1000.0));
    }

    #[test]
    fn test_parse_field_match() {
        assert_eq!("loose".parse::<FieldMatch>(), Ok(FieldMatch::Loose));
        assert_eq!("STRICT".parse::<FieldMatch>(), Ok(FieldMatch::Strict));
        assert!("fuzzy".parse::<FieldMatch>().is_err());
    }

    #[test]
    fn test_key_of() {
        assert_eq!(key_of(&json!("c1")), Some("c1".to_string()));
        assert_eq!(key_of(&json!(7)), Some("7".to_string()));
        assert_eq!(key_of(&json!("")), None);
        assert_eq!(key_of(&Value::Null), None);
    }
}
