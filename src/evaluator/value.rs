//! Runtime values for the mexl evaluator
//!
//! Values are the result of evaluating mexl expressions. Every operator is
//! total over this type: any combination of variants produces a value, with
//! [`Value::Unknown`] standing in for indeterminate outcomes.

use std::fmt;

use serde::ser::{Serialize, Serializer};

/// Canonical rendering of an indeterminate result
pub const UNKNOWN: &str = "unknown";

/// Formatting classification of a number.
///
/// The form records literal/operand provenance, not the runtime value's
/// integrality: a fractional result that happens to be a whole number still
/// renders with a decimal point (`9.0`), and arithmetic between two integral
/// operands stays integral (`9 / 3` renders `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberForm {
    Integral,
    Fractional,
}

impl NumberForm {
    /// Form of an arithmetic result: integral only when both operands are
    pub fn combine(self, other: NumberForm) -> NumberForm {
        match (self, other) {
            (NumberForm::Integral, NumberForm::Integral) => NumberForm::Integral,
            _ => NumberForm::Fractional,
        }
    }
}

/// A numeric value: an `f64` payload plus its formatting form.
///
/// All arithmetic is performed in `f64` space; the form only drives
/// stringification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number {
    value: f64,
    form: NumberForm,
}

impl Number {
    pub fn new(value: f64, form: NumberForm) -> Self {
        Self { value, form }
    }

    /// Number from an integer literal or integer-shaped JSON leaf
    pub fn integral(value: f64) -> Self {
        Self::new(value, NumberForm::Integral)
    }

    /// Number from a decimal literal or float-shaped JSON leaf
    pub fn fractional(value: f64) -> Self {
        Self::new(value, NumberForm::Fractional)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn form(&self) -> NumberForm {
        self.form
    }

    /// Negate, preserving the form
    pub fn neg(&self) -> Number {
        Number::new(-self.value, self.form)
    }

    /// The integer payload of an integral-form number.
    ///
    /// Truncates toward zero; only reachable with a non-integer payload
    /// through integer division (`10 / 4` renders `2`).
    fn integral_value(&self) -> f64 {
        let v = self.value.trunc();
        // normalize -0.0
        if v == 0.0 {
            0.0
        } else {
            v
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            NumberForm::Integral => write!(f, "{:.0}", self.integral_value()),
            NumberForm::Fractional => {
                let v = if self.value == 0.0 { 0.0 } else { self.value };
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{}.0", v)
                } else {
                    write!(f, "{}", v)
                }
            }
        }
    }
}

/// A runtime value in mexl
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit absence-of-value marker, distinct from `Unknown`
    Null,
    /// Boolean
    Bool(bool),
    /// Number with its formatting form
    Number(Number),
    /// String
    String(String),
    /// Opaque reference to a payload subtree (object or array)
    Node(serde_json::Value),
    /// Indeterminate result: type mismatch, unresolved path, undeclared
    /// variable. Not an error; propagates through operators.
    Unknown,
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Node(_) => "node",
            Value::Unknown => "unknown",
        }
    }

    /// Integral-form number value
    pub fn integral(value: f64) -> Value {
        Value::Number(Number::integral(value))
    }

    /// Fractional-form number value
    pub fn fractional(value: f64) -> Value {
        Value::Number(Number::fractional(value))
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is the Unknown sentinel
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON node to a Value.
    ///
    /// Scalars map to the matching variant (integer-shaped JSON numbers are
    /// integral, float-shaped fractional); objects and arrays become opaque
    /// [`Value::Node`]s; JSON null is [`Value::Null`].
    pub fn from_json(node: &serde_json::Value) -> Value {
        match node {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Value::Number(Number::integral(n.as_f64().unwrap_or(0.0)))
                } else {
                    Value::Number(Number::fractional(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Node(node.clone())
            }
        }
    }

    /// Canonical string rendering, the observable result of an evaluation
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Node(node) => match serde_json::to_string(node) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => Err(fmt::Error),
            },
            Value::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match n.form() {
                NumberForm::Integral => serializer.serialize_i64(n.integral_value() as i64),
                NumberForm::Fractional => serializer.serialize_f64(n.value()),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Node(node) => node.serialize(serializer),
            Value::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::integral(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::integral(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::fractional(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Deep structural equality over payload subtrees.
///
/// Arrays are order-sensitive, objects are order-insensitive, and numeric
/// leaves compare by mathematical value.
pub(crate) fn deep_equals(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value as Json;
    match (a, b) {
        (Json::Null, Json::Null) => true,
        (Json::Bool(x), Json::Bool(y)) => x == y,
        (Json::Number(x), Json::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        (Json::String(x), Json::String(y)) => x == y,
        (Json::Array(x), Json::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(v, w)| deep_equals(v, w))
        }
        (Json::Object(x), Json::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map(|w| deep_equals(v, w)).unwrap_or(false))
        }
        _ => false,
    }
}
