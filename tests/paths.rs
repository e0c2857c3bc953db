//! Integration tests for path addressing and the execution context
//!
//! Covers both path surface forms, the payload/`$` synonymy, the stored-null
//! vs missing-key distinction, structured-node pass-through results, and
//! expression reuse across contexts.

use mexl::{evaluate, ExecutionContext, Expression, Value, UNKNOWN};
use pretty_assertions::assert_eq;
use serde_json::json;

fn order_ctx() -> ExecutionContext {
    ExecutionContext::new()
        .with_payload(json!({
            "id": "ord-181",
            "customer": {"name": "John", "tier": "gold"},
            "items": [
                {"sku": "A-1", "qty": 2},
                {"sku": "B-7", "qty": 1}
            ],
            "discount": null,
            "total": 120.5
        }))
        .with_variable("threshold", 100)
        .with_variable(
            "route",
            Value::Node(json!({"region": "emea", "hops": [1, 2, 3]})),
        )
}

fn eval(source: &str) -> String {
    evaluate(source, &order_ctx()).unwrap()
}

#[test]
fn test_dotted_and_bracket_forms_are_interchangeable() {
    assert_eq!(eval("payload.customer.name"), "John");
    assert_eq!(eval("payload[\"customer\"][\"name\"]"), "John");
    assert_eq!(eval("payload.customer[\"name\"]"), "John");
}

#[test]
fn test_dollar_and_payload_are_synonyms() {
    assert_eq!(eval("$.customer.tier"), eval("payload.customer.tier"));
    assert_eq!(eval("$.items[1].sku"), "B-7");
    assert_eq!(eval("payload.items[1].sku"), "B-7");
}

#[test]
fn test_scalar_leaves_take_their_variant() {
    assert_eq!(eval("payload.id"), "ord-181");
    assert_eq!(eval("payload.items[0].qty"), "2");
    assert_eq!(eval("payload.total"), "120.5");
}

#[test]
fn test_structured_leaf_passes_through_as_json() {
    assert_eq!(eval("payload.customer"), r#"{"name":"John","tier":"gold"}"#);
    assert_eq!(eval("$.items[0]"), r#"{"sku":"A-1","qty":2}"#);
}

#[test]
fn test_whole_payload_is_a_node() {
    let ctx = ExecutionContext::new().with_payload(json!({"a": 1}));
    assert_eq!(evaluate("payload", &ctx).unwrap(), r#"{"a":1}"#);
    assert_eq!(evaluate("$ == payload", &ctx).unwrap(), "true");
}

#[test]
fn test_stored_null_vs_missing_key() {
    // key present with a stored null renders as null and compares as null
    assert_eq!(eval("payload.discount"), "null");
    assert_eq!(eval("payload.discount == null"), "true");

    // genuinely absent key is indeterminate
    assert_eq!(eval("payload.rebate"), UNKNOWN);
    assert_eq!(eval("payload.rebate == null"), UNKNOWN);
}

#[test]
fn test_traversal_failures_resolve_to_unknown() {
    // field access on a scalar
    assert_eq!(eval("payload.id.sub"), UNKNOWN);
    // index access on an object
    assert_eq!(eval("payload.customer[0]"), UNKNOWN);
    // field access on an array
    assert_eq!(eval("payload.items.sku"), UNKNOWN);
    // out-of-range and negative indices
    assert_eq!(eval("payload.items[99]"), UNKNOWN);
    assert_eq!(eval("payload.items[-1]"), UNKNOWN);
}

#[test]
fn test_variable_addressing() {
    assert_eq!(eval("var.threshold"), "100");
    assert_eq!(eval("var[\"threshold\"]"), "100");
    assert_eq!(eval("var.undeclared"), UNKNOWN);
}

#[test]
fn test_structured_variable_traversal() {
    assert_eq!(eval("var.route.region"), "emea");
    assert_eq!(eval("var.route.hops[2]"), "3");
    assert_eq!(eval("var.route.hops[9]"), UNKNOWN);
    // trailing segments on a scalar variable
    assert_eq!(eval("var.threshold.sub"), UNKNOWN);
}

#[test]
fn test_paths_in_predicates() {
    assert_eq!(eval("payload.total > var.threshold"), "true");
    assert_eq!(
        eval("payload.customer.tier == \"gold\" && payload.total > var.threshold"),
        "true"
    );
    // any unresolved leg taints the predicate
    assert_eq!(eval("payload.total > var.missing"), UNKNOWN);
}

#[test]
fn test_empty_context_payload_is_null() {
    let ctx = ExecutionContext::new();
    // the root bottoms out at a null scalar
    assert_eq!(evaluate("payload", &ctx).unwrap(), "null");
    assert_eq!(evaluate("payload == null", &ctx).unwrap(), "true");
    // but any traversal into it is indeterminate
    assert_eq!(evaluate("payload.name", &ctx).unwrap(), UNKNOWN);
}

#[test]
fn test_parsed_expression_reused_across_contexts() {
    let expr = Expression::parse("payload.items[0].qty + var.bump").unwrap();

    let first = order_ctx().with_variable("bump", 1);
    let second = order_ctx().with_variable("bump", 2.5);

    assert_eq!(expr.evaluate(&first).render(), "3");
    assert_eq!(expr.evaluate(&second).render(), "4.5");
    // and without the variable, the same tree is indeterminate
    assert_eq!(expr.evaluate(&order_ctx()).render(), UNKNOWN);
}

#[test]
fn test_structural_equality_between_paths() {
    let ctx = ExecutionContext::new().with_payload(json!({
        "a": {"k": 1, "list": [1, 2]},
        "b": {"list": [1, 2], "k": 1},
        "c": {"k": 1, "list": [2, 1]}
    }));
    // object key order does not matter
    assert_eq!(evaluate("$.a == $.b", &ctx).unwrap(), "true");
    // array order does
    assert_eq!(evaluate("$.a == $.c", &ctx).unwrap(), "false");
}
