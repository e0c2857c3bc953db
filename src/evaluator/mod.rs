//! Evaluator for mexl expressions
//!
//! The evaluator takes a parsed AST and produces a single [`Value`].
//! Evaluation is total: it never fails. Type mismatches, unresolved paths,
//! and undeclared variables all evaluate to [`Value::Unknown`], which
//! propagates through every operator family. Each operator is an exhaustive
//! match over its operand variants with `Unknown` as the deliberate default
//! arm.

pub mod context;
pub mod resolver;
pub mod value;

pub use context::ExecutionContext;
pub use value::{Number, NumberForm, Value, UNKNOWN};

use crate::parser::ast::{BinaryExpr, BinaryOp, Expr, UnaryExpr, UnaryOp};

/// Evaluate an expression against a context.
///
/// Total over all inputs: every legal expression yields exactly one value.
pub fn eval(expr: &Expr, ctx: &ExecutionContext) -> Value {
    match expr {
        Expr::Null(_) => Value::Null,
        Expr::Bool(b, _) => Value::Bool(*b),
        Expr::Integer(n, _) => Value::Number(Number::integral(*n as f64)),
        Expr::Float(n, _) => Value::Number(Number::fractional(*n)),
        Expr::String(s, _) => Value::String(s.clone()),
        Expr::Path(path) => resolver::resolve(path, ctx),
        Expr::Unary(unary) => eval_unary(unary, ctx),
        Expr::Binary(bin) => eval_binary(bin, ctx),
        Expr::Paren(inner, _) => eval(inner, ctx),
    }
}

fn eval_unary(unary: &UnaryExpr, ctx: &ExecutionContext) -> Value {
    let operand = eval(&unary.operand, ctx);
    match (unary.op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Value::Number(n.neg()),
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        _ => Value::Unknown,
    }
}

fn eval_binary(bin: &BinaryExpr, ctx: &ExecutionContext) -> Value {
    // Both operands are always evaluated; there is no short-circuit.
    let left = eval(&bin.left, ctx);
    let right = eval(&bin.right, ctx);

    match bin.op {
        BinaryOp::And => eval_logical(&left, &right, |a, b| a && b),
        BinaryOp::Or => eval_logical(&left, &right, |a, b| a || b),
        BinaryOp::Eq => eval_equality(&left, &right),
        BinaryOp::NotEq => match eval_equality(&left, &right) {
            Value::Bool(b) => Value::Bool(!b),
            other => other,
        },
        BinaryOp::Lt => eval_relational(&left, &right, |a, b| a < b),
        BinaryOp::Gt => eval_relational(&left, &right, |a, b| a > b),
        BinaryOp::LtEq => eval_relational(&left, &right, |a, b| a <= b),
        BinaryOp::GtEq => eval_relational(&left, &right, |a, b| a >= b),
        BinaryOp::Add => eval_add(&left, &right),
        BinaryOp::Sub => eval_arithmetic(&left, &right, |a, b| a - b),
        BinaryOp::Mul => eval_arithmetic(&left, &right, |a, b| a * b),
        BinaryOp::Div => eval_arithmetic(&left, &right, |a, b| a / b),
        BinaryOp::Mod => eval_arithmetic(&left, &right, |a, b| a % b),
    }
}

/// Logical conjunction/disjunction: defined only between two booleans
fn eval_logical<F>(left: &Value, right: &Value, apply: F) -> Value
where
    F: Fn(bool, bool) -> bool,
{
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Value::Bool(apply(*a, *b)),
        _ => Value::Unknown,
    }
}

/// Equality semantics.
///
/// `null == null` holds; a determinate non-null value compared against null
/// is determinately unequal; operands of differing non-null variants are
/// indeterminate (a type mismatch is not reinterpreted as "not equal").
fn eval_equality(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Unknown, _) | (_, Value::Unknown) => Value::Unknown,
        (Value::Null, Value::Null) => Value::Bool(true),
        (Value::Null, _) | (_, Value::Null) => Value::Bool(false),
        (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
        // mathematical value, regardless of integral/fractional form
        (Value::Number(a), Value::Number(b)) => Value::Bool(a.value() == b.value()),
        (Value::String(a), Value::String(b)) => Value::Bool(a == b),
        (Value::Node(a), Value::Node(b)) => Value::Bool(value::deep_equals(a, b)),
        _ => Value::Unknown,
    }
}

/// Relational comparison: defined only between two numbers
fn eval_relational<F>(left: &Value, right: &Value, cmp: F) -> Value
where
    F: Fn(f64, f64) -> bool,
{
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::Bool(cmp(a.value(), b.value())),
        _ => Value::Unknown,
    }
}

/// Addition: numeric addition or string concatenation
fn eval_add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::String(a), Value::String(b)) => {
            let mut s = a.clone();
            s.push_str(b);
            Value::String(s)
        }
        _ => eval_arithmetic(left, right, |a, b| a + b),
    }
}

/// Numeric arithmetic with form propagation: the result is integral only
/// when both operands are
fn eval_arithmetic<F>(left: &Value, right: &Value, apply: F) -> Value
where
    F: Fn(f64, f64) -> f64,
{
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::Number(Number::new(
            apply(a.value(), b.value()),
            a.form().combine(b.form()),
        )),
        _ => Value::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn eval_str(source: &str, ctx: &ExecutionContext) -> Value {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        let expr = Parser::new(tokens, source).parse().unwrap();
        eval(&expr, ctx)
    }

    fn eval_plain(source: &str) -> Value {
        eval_str(source, &ExecutionContext::new())
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval_plain("null"), Value::Null);
        assert_eq!(eval_plain("true"), Value::Bool(true));
        assert_eq!(eval_plain("5"), Value::integral(5.0));
        assert_eq!(eval_plain("5.5"), Value::fractional(5.5));
        assert_eq!(eval_plain("\"abc\""), Value::String("abc".into()));
    }

    #[test]
    fn test_unary_minus_preserves_form() {
        assert_eq!(eval_plain("-5"), Value::integral(-5.0));
        assert_eq!(eval_plain("-5.3"), Value::fractional(-5.3));
        assert_eq!(eval_plain("--5"), Value::integral(5.0));
    }

    #[test]
    fn test_unary_on_wrong_type() {
        assert_eq!(eval_plain("-\"abc\""), Value::Unknown);
        assert_eq!(eval_plain("-null"), Value::Unknown);
        assert_eq!(eval_plain("!5"), Value::Unknown);
        assert_eq!(eval_plain("!true"), Value::Bool(false));
    }

    #[test]
    fn test_arithmetic_form_propagation() {
        assert_eq!(eval_plain("5 + 3"), Value::integral(8.0));
        assert_eq!(eval_plain("5.5 + 3"), Value::fractional(8.5));
        assert_eq!(eval_plain("5.5 + 3.5"), Value::fractional(9.0));
        assert_eq!(eval_plain("9 / 3"), Value::integral(3.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            eval_plain("\"abc\" + \"xyz\""),
            Value::String("abcxyz".into())
        );
        // only `+` touches strings
        assert_eq!(eval_plain("\"abc\" - \"xyz\""), Value::Unknown);
        assert_eq!(eval_plain("\"abc\" * 2"), Value::Unknown);
    }

    #[test]
    fn test_mixed_arithmetic_is_unknown() {
        assert_eq!(eval_plain("\"abc\" + 5"), Value::Unknown);
        assert_eq!(eval_plain("5 + null"), Value::Unknown);
        assert_eq!(eval_plain("true + 1"), Value::Unknown);
    }

    #[test]
    fn test_equality_same_variants() {
        assert_eq!(eval_plain("5 == 5"), Value::Bool(true));
        assert_eq!(eval_plain("5 == 5.0"), Value::Bool(true));
        assert_eq!(eval_plain("true == false"), Value::Bool(false));
        assert_eq!(eval_plain("\"abc\" == \"abc\""), Value::Bool(true));
        assert_eq!(eval_plain("null == null"), Value::Bool(true));
    }

    #[test]
    fn test_equality_mismatch_is_indeterminate() {
        assert_eq!(eval_plain("\"5\" == 5"), Value::Unknown);
        assert_eq!(eval_plain("\"5\" != 5"), Value::Unknown);
        assert_eq!(eval_plain("true == 1"), Value::Unknown);
    }

    #[test]
    fn test_null_vs_present_value() {
        assert_eq!(eval_plain("5 == null"), Value::Bool(false));
        assert_eq!(eval_plain("5 != null"), Value::Bool(true));
        assert_eq!(eval_plain("\"abc\" == null"), Value::Bool(false));
    }

    #[test]
    fn test_relational_numbers_only() {
        assert_eq!(eval_plain("5 > 3"), Value::Bool(true));
        assert_eq!(eval_plain("-5 > -3.4"), Value::Bool(false));
        assert_eq!(eval_plain("true >= false"), Value::Unknown);
        assert_eq!(eval_plain("5 > \"bla\""), Value::Unknown);
        assert_eq!(eval_plain("5 > null"), Value::Unknown);
    }

    #[test]
    fn test_logical_booleans_only() {
        assert_eq!(eval_plain("true and true"), Value::Bool(true));
        assert_eq!(eval_plain("true && true && false"), Value::Bool(false));
        assert_eq!(eval_plain("false or false"), Value::Bool(false));
        assert_eq!(eval_plain("5 and \"bla\""), Value::Unknown);
        assert_eq!(eval_plain("5 or \"bla\""), Value::Unknown);
        assert_eq!(eval_plain("5 and null"), Value::Unknown);
    }

    #[test]
    fn test_no_short_circuit() {
        // a boolean left side does not rescue a non-boolean right side
        assert_eq!(eval_plain("false and 5"), Value::Unknown);
        assert_eq!(eval_plain("true or 5"), Value::Unknown);
    }

    #[test]
    fn test_unknown_absorbs() {
        let ctx = ExecutionContext::new();
        assert_eq!(eval_str("var.num99 + 5", &ctx), Value::Unknown);
        assert_eq!(eval_str("var.num99 > 5", &ctx), Value::Unknown);
        assert_eq!(eval_str("var.num99 == 5", &ctx), Value::Unknown);
        assert_eq!(eval_str("var.num99 == null", &ctx), Value::Unknown);
    }

    #[test]
    fn test_stored_null_compares_as_null() {
        let ctx = ExecutionContext::new().with_payload(json!({"null": null}));
        assert_eq!(eval_str("payload[\"null\"] == null", &ctx), Value::Bool(true));
        // a present subtree is determinately not null
        let ctx = ExecutionContext::new().with_payload(json!({"book": [1]}));
        assert_eq!(eval_str("payload.book == null", &ctx), Value::Bool(false));
    }

    #[test]
    fn test_node_structural_equality() {
        let ctx = ExecutionContext::new().with_payload(json!({
            "a": {"x": 1, "y": [1, 2]},
            "b": {"y": [1, 2], "x": 1},
            "c": {"x": 2, "y": [1, 2]},
        }));
        assert_eq!(eval_str("payload.a == payload.b", &ctx), Value::Bool(true));
        assert_eq!(eval_str("payload.a == payload.c", &ctx), Value::Bool(false));
        assert_eq!(eval_str("payload.a != payload.c", &ctx), Value::Bool(true));
    }

    #[test]
    fn test_node_vs_scalar_is_indeterminate() {
        let ctx = ExecutionContext::new().with_payload(json!({"a": {"x": 1}}));
        assert_eq!(eval_str("payload.a == 5", &ctx), Value::Unknown);
        assert_eq!(eval_str("payload.a == \"x\"", &ctx), Value::Unknown);
    }
}
