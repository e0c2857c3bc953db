//! Path resolution against the payload tree and variable namespace
//!
//! Resolution is total: any traversal failure (missing key, wrong container
//! shape, out-of-range index, undeclared variable) yields
//! [`Value::Unknown`]. A key that is literally present with a stored JSON
//! null yields [`Value::Null`] instead; the distinction carries through to
//! equality semantics.

use crate::parser::ast::{PathExpr, PathRoot, PathSegment};

use super::context::ExecutionContext;
use super::value::Value;

/// Resolve a path reference against the context
pub fn resolve(path: &PathExpr, ctx: &ExecutionContext) -> Value {
    match path.root {
        PathRoot::Payload => resolve_tree(ctx.payload(), &path.segments),
        PathRoot::Var => resolve_variable(ctx, &path.segments),
    }
}

/// Resolve a `var` path: the first segment names the variable, the rest
/// traverse into it when its value is a structured node
fn resolve_variable(ctx: &ExecutionContext, segments: &[PathSegment]) -> Value {
    let name = match segments.first() {
        Some(PathSegment::Field(name)) => name,
        // `var` alone or `var[0]` addresses nothing
        _ => return Value::Unknown,
    };

    let value = match ctx.variable(name) {
        Some(value) => value,
        None => return Value::Unknown,
    };

    let rest = &segments[1..];
    if rest.is_empty() {
        return value.clone();
    }

    match value {
        Value::Node(node) => resolve_tree(node, rest),
        // trailing segments on a scalar variable
        _ => Value::Unknown,
    }
}

/// Walk a JSON tree segment by segment
fn resolve_tree(root: &serde_json::Value, segments: &[PathSegment]) -> Value {
    use serde_json::Value as Json;

    let mut current = root;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Field(name), Json::Object(map)) => match map.get(name) {
                Some(child) => child,
                None => return Value::Unknown,
            },
            (PathSegment::Index(i), Json::Array(items)) => {
                let idx = match usize::try_from(*i) {
                    Ok(idx) => idx,
                    Err(_) => return Value::Unknown,
                };
                match items.get(idx) {
                    Some(child) => child,
                    None => return Value::Unknown,
                }
            }
            // field access on a non-object, index access on a non-array
            _ => return Value::Unknown,
        };
    }

    Value::from_json(current)
}
