//! Parser for mexl expressions
//!
//! This module implements a recursive descent parser that produces an AST
//! from a token stream. Operator precedence is encoded in the call ladder
//! (lowest binds loosest): `or` < `and` < equality < relational < additive
//! < multiplicative < unary < primary. All binary operators are
//! left-associative.

pub mod ast;

use crate::errors::{MexlError, MexlResult};
use crate::lexer::token::{SourceLocation, Token, TokenKind};
use ast::*;

/// Maximum expression nesting depth before the parser bails out
const MAX_PARSE_DEPTH: usize = 64;

/// Parser for mexl token streams
pub struct Parser {
    /// Tokens to parse (always ends with Eof)
    tokens: Vec<Token>,
    /// Current token index
    position: usize,
    /// Expression text (for error messages)
    source: String,
    /// Current recursion depth
    depth: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>, source: impl Into<String>) -> Self {
        Self {
            tokens,
            position: 0,
            source: source.into(),
            depth: 0,
        }
    }

    /// Parse a complete expression; all input must be consumed
    pub fn parse(&mut self) -> MexlResult<Expr> {
        let expr = self.parse_expr()?;

        if !self.check(&TokenKind::Eof) {
            return Err(self.error_unexpected("end of expression"));
        }

        Ok(expr)
    }

    fn parse_expr(&mut self) -> MexlResult<Expr> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            let loc = self.current_location();
            self.depth -= 1;
            return Err(MexlError::nesting_too_deep(
                self.source.clone(),
                &loc,
                MAX_PARSE_DEPTH,
            ));
        }
        let result = self.parse_or();
        self.depth -= 1;
        result
    }

    /// Parse OR expression: `a || b`, `a or b`
    fn parse_or(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            let start_loc = left.location().clone();
            self.advance();
            let right = self.parse_and()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::Or,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse AND expression: `a && b`, `a and b`
    fn parse_and(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_equality()?;

        while self.check(&TokenKind::And) {
            let start_loc = left.location().clone();
            self.advance();
            let right = self.parse_equality()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op: BinaryOp::And,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse equality expression: `a == b`, `a != b`
    fn parse_equality(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_relational()?;

        while matches!(self.current().kind, TokenKind::EqEq | TokenKind::NotEq) {
            let start_loc = left.location().clone();
            let op = match &self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_relational()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse relational expression: `a < b`, `a > b`, `a <= b`, `a >= b`
    fn parse_relational(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_additive()?;

        while matches!(
            self.current().kind,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq
        ) {
            let start_loc = left.location().clone();
            let op = match &self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_additive()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse additive expression: `a + b`, `a - b`
    fn parse_additive(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        while matches!(self.current().kind, TokenKind::Plus | TokenKind::Minus) {
            let start_loc = left.location().clone();
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse multiplicative expression: `a * b`, `a / b`, `a % b`
    fn parse_multiplicative(&mut self) -> MexlResult<Expr> {
        let mut left = self.parse_unary()?;

        while matches!(
            self.current().kind,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        ) {
            let start_loc = left.location().clone();
            let op = match &self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => unreachable!(),
            };
            self.advance();
            let right = self.parse_unary()?;
            let end_loc = right.location().clone();

            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
                location: start_loc.span_to(&end_loc),
            });
        }

        Ok(left)
    }

    /// Parse unary expression: `-a`, `!a`
    fn parse_unary(&mut self) -> MexlResult<Expr> {
        if matches!(self.current().kind, TokenKind::Minus | TokenKind::Not) {
            let start_loc = self.current_location();
            let op = match &self.current().kind {
                TokenKind::Minus => UnaryOp::Neg,
                TokenKind::Not => UnaryOp::Not,
                _ => unreachable!(),
            };
            self.advance();
            let operand = self.parse_unary()?;
            let end_loc = operand.location().clone();

            Ok(Expr::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
                location: start_loc.span_to(&end_loc),
            }))
        } else {
            self.parse_primary()
        }
    }

    /// Parse primary expression: literal, path reference, or parenthesized
    fn parse_primary(&mut self) -> MexlResult<Expr> {
        let start_loc = self.current_location();

        match &self.current().kind.clone() {
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Null(start_loc))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, start_loc))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, start_loc))
            }
            TokenKind::Integer(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Integer(n, start_loc))
            }
            TokenKind::Float(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Float(n, start_loc))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Expr::String(s, start_loc))
            }
            TokenKind::Dollar => {
                self.advance();
                self.parse_path(PathRoot::Payload, start_loc)
            }
            TokenKind::Ident(name) => match name.as_str() {
                "payload" => {
                    self.advance();
                    self.parse_path(PathRoot::Payload, start_loc)
                }
                "var" => {
                    self.advance();
                    self.parse_path(PathRoot::Var, start_loc)
                }
                _ => Err(MexlError::unexpected_token(
                    self.source.clone(),
                    &start_loc,
                    "expression",
                    name.clone(),
                    "paths must start with 'payload', '$', or 'var'",
                )),
            },
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RightParen)?;
                let end_loc = self.previous_location();
                Ok(Expr::Paren(Box::new(expr), start_loc.span_to(&end_loc)))
            }
            _ => Err(self.error_unexpected("expression")),
        }
    }

    /// Parse the segments of a path reference after its root
    fn parse_path(&mut self, root: PathRoot, start_loc: SourceLocation) -> MexlResult<Expr> {
        let mut segments = Vec::new();

        loop {
            match &self.current().kind.clone() {
                TokenKind::Dot => {
                    self.advance();
                    match &self.current().kind.clone() {
                        TokenKind::Ident(name) => {
                            segments.push(PathSegment::Field(name.clone()));
                            self.advance();
                        }
                        // keywords are not field names in dotted form
                        TokenKind::And
                        | TokenKind::Or
                        | TokenKind::True
                        | TokenKind::False
                        | TokenKind::Null => {
                            let found = self.current().kind.to_string();
                            return Err(MexlError::unexpected_token(
                                self.source.clone(),
                                &self.current_location(),
                                "field name",
                                found.clone(),
                                format!(
                                    "'{}' is a keyword; use bracket syntax: [\"{}\"]",
                                    found, found
                                ),
                            ));
                        }
                        _ => {
                            return Err(self.error_unexpected("field name"));
                        }
                    }
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    match &self.current().kind.clone() {
                        TokenKind::String(key) => {
                            segments.push(PathSegment::Field(key.clone()));
                            self.advance();
                        }
                        TokenKind::Integer(i) => {
                            segments.push(PathSegment::Index(*i));
                            self.advance();
                        }
                        // negative indices lex as Minus + Integer
                        TokenKind::Minus => {
                            self.advance();
                            match &self.current().kind.clone() {
                                TokenKind::Integer(i) => {
                                    segments.push(PathSegment::Index(-*i));
                                    self.advance();
                                }
                                _ => {
                                    return Err(
                                        self.error_unexpected("string key or array index")
                                    );
                                }
                            }
                        }
                        _ => {
                            return Err(self.error_unexpected("string key or array index"));
                        }
                    }
                    self.expect(&TokenKind::RightBracket)?;
                }
                _ => break,
            }
        }

        let end_loc = self.previous_location();
        Ok(Expr::Path(PathExpr {
            root,
            segments,
            location: start_loc.span_to(&end_loc),
        }))
    }

    /// Get the current token
    fn current(&self) -> &Token {
        // tokens always ends with Eof, so position is in range
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Get the current token's location
    fn current_location(&self) -> SourceLocation {
        self.current().location.clone()
    }

    /// Get the previous token's location
    fn previous_location(&self) -> SourceLocation {
        if self.position == 0 {
            self.current_location()
        } else {
            self.tokens[self.position - 1].location.clone()
        }
    }

    /// Advance to the next token
    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Check whether the current token matches the given kind
    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Consume a token of the given kind or fail
    fn expect(&mut self, kind: &TokenKind) -> MexlResult<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_unexpected(&kind.to_string()))
        }
    }

    /// Create an UnexpectedToken error at the current position
    fn error_unexpected(&self, expected: &str) -> MexlError {
        let found = self.current().kind.to_string();
        MexlError::unexpected_token(
            self.source.clone(),
            &self.current_location(),
            expected,
            found,
            format!("expected {} here", expected),
        )
    }
}
