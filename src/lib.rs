// Rust 1.93+ triggers false positives on thiserror/miette derive macro fields
#![allow(unused_assignments)]

//! MEXL — Mediation Expression Language
//!
//! An embeddable expression evaluator for message-mediation and routing
//! pipelines. Expressions compute routing predicates and values against an
//! in-flight message's payload tree and declared variables:
//!
//! ```text
//! payload.amount > var.threshold && payload.currency == "EUR"
//! $.store.book[0].price * 1.21
//! ```
//!
//! Parsing can fail (malformed text is a [`MexlError`]); evaluation cannot.
//! Every legal expression produces exactly one [`Value`], with the
//! [`Value::Unknown`] sentinel standing in for indeterminate outcomes such
//! as type mismatches and unresolved paths.
//!
//! # Example
//!
//! ```
//! use mexl::{evaluate, ExecutionContext};
//! use serde_json::json;
//!
//! # fn main() -> mexl::MexlResult<()> {
//! let ctx = ExecutionContext::new()
//!     .with_payload(json!({"amount": 120, "currency": "EUR"}))
//!     .with_variable("threshold", 100);
//!
//! let verdict = evaluate(
//!     "payload.amount > var.threshold && payload.currency == \"EUR\"",
//!     &ctx,
//! )?;
//! assert_eq!(verdict, "true");
//!
//! // unresolved references are indeterminate, not errors
//! assert_eq!(evaluate("payload.missing > 5", &ctx)?, "unknown");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use errors::{MexlError, MexlResult};
pub use evaluator::{ExecutionContext, Number, NumberForm, Value, UNKNOWN};
pub use lexer::token::{SourceLocation, Token, TokenKind};
pub use lexer::Lexer;
pub use parser::ast;
pub use parser::Parser;

/// A parsed expression: parse once, evaluate any number of times.
///
/// The tree is immutable after parsing and can be shared across threads;
/// each evaluation call reads its own [`ExecutionContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: ast::Expr,
}

impl Expression {
    /// Parse expression text into a reusable expression
    pub fn parse(text: &str) -> MexlResult<Self> {
        let mut lexer = Lexer::new(text);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens, text);
        Ok(Self {
            root: parser.parse()?,
        })
    }

    /// Evaluate against a context.
    ///
    /// Total: every legal expression yields exactly one [`Value`].
    pub fn evaluate(&self, ctx: &ExecutionContext) -> Value {
        evaluator::eval(&self.root, ctx)
    }
}

/// Parse, evaluate, and render in one call.
///
/// The returned string is the canonical rendering of the result value;
/// parse failures surface as [`MexlError`].
pub fn evaluate(text: &str, ctx: &ExecutionContext) -> MexlResult<String> {
    Ok(Expression::parse(text)?.evaluate(ctx).render())
}
