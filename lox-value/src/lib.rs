//! Runtime values of the Lox language.
//!
//! The absence of a value (`nil`) is not a [`Value`]: it is represented by `None` wherever a value
//! may be missing, so functions that accept `nil` take an `Option<&Value>`.

use std::fmt;
use std::rc::Rc;

#[derive(Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// Immutable, cheap to clone.
    String(Rc<str>),
}

/// The canonical `true`.
pub const TRUE: Value = Value::Bool(true);
/// The canonical `false`.
pub const FALSE: Value = Value::Bool(false);

/// The kind of a value, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Number,
    Bool,
    String,
}

impl ValueKind {
    /// The kind of a possibly absent value.
    pub fn of(value: Option<&Value>) -> Self {
        value.map_or(ValueKind::Nil, Value::kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Nil => "Nil",
            ValueKind::Number => "Number",
            ValueKind::Bool => "Bool",
            ValueKind::String => "String",
        })
    }
}

impl Value {
    /// Returns [`TRUE`] or [`FALSE`].
    pub fn from_bool(value: bool) -> Self {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Attempts to cast the `Value` into a `f64` or `None` if wrong type.
    pub fn cast_to_number(&self) -> Option<f64> {
        match self {
            Value::Number(val) => Some(*val),
            _ => None,
        }
    }

    /// Attempts to cast the `Value` into a `&str` or `None` if wrong type.
    pub fn cast_to_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    /// `false` and `true` are themselves, numbers are falsey only when `0` and strings only when
    /// empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(val) => *val,
            Value::Number(val) => *val != 0.0,
            Value::String(string) => !string.is_empty(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::from_bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

/// Strings are quoted so that `"1"` and `1` print differently.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(val) => fmt_number(*val, f),
            Value::Bool(val) => write!(f, "{}", val),
            Value::String(val) => write!(f, "{:?}", val),
        }
    }
}

/// Shortest representation that reads back to `val`. Exponents below `-4` or from `6` up switch
/// to scientific notation with a signed, at least two digit exponent: `1e+06`, `2.5e-07`.
fn fmt_number(val: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if val.is_nan() {
        return f.write_str("NaN");
    }
    if val.is_infinite() {
        return f.write_str(if val > 0.0 { "+Inf" } else { "-Inf" });
    }

    // `{:e}` gives the shortest round-trip digits, e.g. `1.5e-7`
    let scientific = format!("{:e}", val);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => (mantissa, exponent),
            Err(_) => return write!(f, "{}", val),
        },
        None => return write!(f, "{}", val),
    };

    if (-4..6).contains(&exponent) {
        write!(f, "{}", val)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Truthiness of a possibly absent value. `nil` is falsey.
pub fn is_truthy(value: Option<&Value>) -> bool {
    value.map_or(false, Value::is_truthy)
}

/// Two values are equal if both are `nil`, or if they are of the same kind and print the same.
pub fn equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.kind() == b.kind() && a.to_string() == b.to_string(),
        _ => false,
    }
}

/// Renders a possibly absent value, `nil` included.
pub fn display(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "nil".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_display() {
        assert_snapshot!(Value::Number(5.0), @"5");
        assert_snapshot!(Value::Number(2.5), @"2.5");
        assert_snapshot!(Value::Number(-0.125), @"-0.125");
        assert_snapshot!(Value::Number(f64::INFINITY), @"+Inf");
        assert_snapshot!(Value::Number(f64::NEG_INFINITY), @"-Inf");
        assert_snapshot!(Value::Number(f64::NAN), @"NaN");
        assert_snapshot!(TRUE, @"true");
        assert_snapshot!(FALSE, @"false");
        assert_snapshot!(Value::from("hello"), @r###""hello""###);
        assert_snapshot!(Value::from("say \"hi\"\n"), @r###""say \"hi\"\n""###);
        assert_eq!(display(None), "nil");
        assert_eq!(display(Some(&Value::Number(1.0))), "1");
    }

    #[test]
    fn test_display_number_notation() {
        let number = |val: f64| Value::Number(val).to_string();
        assert_eq!(number(0.0), "0");
        assert_eq!(number(-0.0), "-0");
        assert_eq!(number(100000.0), "100000");
        assert_eq!(number(123456.5), "123456.5");
        assert_eq!(number(0.0001), "0.0001");
        assert_eq!(number(1e6), "1e+06");
        assert_eq!(number(1234567.0), "1.234567e+06");
        assert_eq!(number(1e21), "1e+21");
        assert_eq!(number(-2.5e100), "-2.5e+100");
        assert_eq!(number(1e-7), "1e-07");
        assert_eq!(number(0.00001234), "1.234e-05");
        assert_eq!(number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Number(1.0).kind(), ValueKind::Number);
        assert_eq!(TRUE.kind(), ValueKind::Bool);
        assert_eq!(Value::from("").kind(), ValueKind::String);
        assert_eq!(ValueKind::of(None), ValueKind::Nil);
        assert_eq!(ValueKind::of(Some(&FALSE)).to_string(), "Bool");
    }

    #[test]
    fn test_canonical_bools() {
        assert_eq!(Value::from_bool(true), TRUE);
        assert_eq!(Value::from_bool(false), FALSE);
        assert_eq!(Value::from(true), TRUE);
        assert_ne!(TRUE, FALSE);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(Some(&TRUE)));
        assert!(!is_truthy(Some(&FALSE)));
        assert!(is_truthy(Some(&Value::Number(1.0))));
        assert!(is_truthy(Some(&Value::Number(-0.5))));
        // zero and the empty string are falsey
        assert!(!is_truthy(Some(&Value::Number(0.0))));
        assert!(!is_truthy(Some(&Value::Number(-0.0))));
        assert!(is_truthy(Some(&Value::from("x"))));
        assert!(!is_truthy(Some(&Value::from(""))));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_equality() {
        assert!(equal(None, None));
        assert!(!equal(None, Some(&FALSE)));
        assert!(!equal(Some(&Value::Number(0.0)), None));
        assert!(equal(Some(&TRUE), Some(&TRUE)));
        assert!(!equal(Some(&TRUE), Some(&FALSE)));
        assert!(equal(Some(&Value::Number(2.0)), Some(&Value::Number(2.0))));
        assert!(equal(Some(&Value::from("a")), Some(&Value::from("a"))));
        // different kinds are never equal, even if they print alike
        assert!(!equal(Some(&Value::Number(1.0)), Some(&Value::from("1"))));
        assert!(!equal(Some(&TRUE), Some(&Value::from("true"))));
        assert!(!equal(Some(&Value::Number(1.0)), Some(&TRUE)));
    }

    #[test]
    fn test_casts() {
        assert_eq!(Value::Number(3.0).cast_to_number(), Some(3.0));
        assert_eq!(TRUE.cast_to_number(), None);
        assert_eq!(Value::from("s").cast_to_str(), Some("s"));
        assert_eq!(Value::Number(3.0).cast_to_str(), None);
    }
}
