//! Tag constraint matching.
//!
//! # Grammar
//! ```text
//! expr  := and ( "||" and )*
//! and   := unary ( "&&" unary )*
//! unary := "!" unary | "(" expr ")" | term
//! term  := "tag==" value | "tag!=" value | "Tag(`" value "`)"
//! ```
//!
//! # Design Decisions
//! - Empty expression matches every item
//! - Expression is parsed once; a malformed one makes every match fail
//!   with the parse error, which callers treat as a non-match

pub mod parser;

use thiserror::Error;

pub use parser::{parse, Expr};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("unexpected input at position {position}: {found:?}")]
    Unexpected { position: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("empty tag value at position {0}")]
    EmptyValue(usize),
}

/// Decides whether an item's tags satisfy the operator's constraints.
pub trait ConstraintMatcher: Send + Sync + std::fmt::Debug {
    fn matches(&self, tags: &[String]) -> Result<bool, ConstraintError>;

    /// Expression as written by the operator, for logging.
    fn expression(&self) -> &str;
}

/// Matcher for the tag expression language above.
#[derive(Debug, Clone)]
pub struct TagConstraints {
    raw: String,
    parsed: Result<Option<Expr>, ConstraintError>,
}

impl TagConstraints {
    pub fn new(expression: impl Into<String>) -> Self {
        let raw = expression.into();
        let parsed = parse(&raw);
        Self { raw, parsed }
    }
}

impl ConstraintMatcher for TagConstraints {
    fn matches(&self, tags: &[String]) -> Result<bool, ConstraintError> {
        match &self.parsed {
            Ok(None) => Ok(true),
            Ok(Some(expr)) => Ok(expr.eval(tags)),
            Err(e) => Err(e.clone()),
        }
    }

    fn expression(&self) -> &str {
        &self.raw
    }
}
