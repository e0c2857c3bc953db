//! Per-evaluation execution context
//!
//! Bundles the payload tree and the variable namespace for a single
//! evaluation call. Both are supplied fully formed by the surrounding
//! mediation engine; the evaluator never mutates either.

use indexmap::IndexMap;

use super::value::Value;

/// Read-only inputs for one evaluation call
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Root of the message payload tree (`payload` / `$`)
    payload: serde_json::Value,
    /// Declared variables (`var`)
    variables: IndexMap<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context: null payload, no variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload tree
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Declare a variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// The payload tree root
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Look up a declared variable
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
