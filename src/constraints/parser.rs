//! Recursive-descent parser for tag expressions.

use crate::constraints::ConstraintError;

/// Parsed constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, tags: &[String]) -> bool {
        match self {
            Expr::Tag(value) => tags.iter().any(|t| t == value),
            Expr::Not(inner) => !inner.eval(tags),
            Expr::And(l, r) => l.eval(tags) && r.eval(tags),
            Expr::Or(l, r) => l.eval(tags) || r.eval(tags),
        }
    }
}

/// Parse an expression. Blank input yields `None`.
pub fn parse(input: &str) -> Result<Option<Expr>, ConstraintError> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let mut parser = Parser { input, pos: 0 };
    let expr = parser.parse_or()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.unexpected());
    }
    Ok(Some(expr))
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> ConstraintError {
        match self.rest().split_whitespace().next() {
            Some(found) => ConstraintError::Unexpected {
                position: self.pos,
                found: found.to_string(),
            },
            None => ConstraintError::UnexpectedEnd,
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ConstraintError> {
        let mut left = self.parse_and()?;
        while self.eat("||") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ConstraintError> {
        let mut left = self.parse_unary()?;
        while self.eat("&&") {
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ConstraintError> {
        if self.eat("!") {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        if self.eat("(") {
            let inner = self.parse_or()?;
            if !self.eat(")") {
                return Err(self.unexpected());
            }
            return Ok(inner);
        }
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Expr, ConstraintError> {
        if self.eat("tag==") {
            return Ok(Expr::Tag(self.value()?));
        }
        if self.eat("tag!=") {
            return Ok(Expr::Not(Box::new(Expr::Tag(self.value()?))));
        }
        if self.eat("Tag(`") {
            let start = self.pos;
            let Some(end) = self.rest().find('`') else {
                return Err(ConstraintError::UnexpectedEnd);
            };
            if end == 0 {
                return Err(ConstraintError::EmptyValue(start));
            }
            let value = self.rest()[..end].to_string();
            self.pos += end + 1;
            if !self.rest().starts_with(')') {
                return Err(self.unexpected());
            }
            self.pos += 1;
            return Ok(Expr::Tag(value));
        }
        Err(self.unexpected())
    }

    /// Reads a bare value up to whitespace, `)`, `&&` or `||`.
    fn value(&mut self) -> Result<String, ConstraintError> {
        let start = self.pos;
        let rest = self.rest();
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            let tail = &rest[i..];
            if c.is_whitespace() || c == ')' || tail.starts_with("&&") || tail.starts_with("||") {
                end = i;
                break;
            }
        }
        if end == 0 {
            return Err(ConstraintError::EmptyValue(start));
        }
        self.pos += end;
        Ok(rest[..end].to_string())
    }
}
