//! Recursive-descent evaluator for sanitized arithmetic.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | '(' expr ')'
//! ```
//!
//! Unlike element folding this uses ordinary precedence, which is what a
//! parenthesized line has always meant.

use super::error::EvalError;
use super::tokenize::Operator;

const MAX_DEPTH: usize = 64;

/// Value of an evaluated expression and the binary operators it applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub operators: Vec<Operator>,
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
    operators: Vec<Operator>,
}

impl Parser {
    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].1.is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(offset, _)| offset)
            .unwrap_or_else(|| self.chars.last().map(|&(o, c)| o + c.len_utf8()).unwrap_or(0))
    }

    fn unexpected(&self) -> EvalError {
        match self.chars.get(self.pos) {
            Some(&(offset, ch)) => EvalError::UnexpectedChar { ch, offset },
            None => EvalError::UnexpectedEnd,
        }
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            let op = match self.peek() {
                Some('+') => Operator::Add,
                Some('-') => Operator::Subtract,
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.term()?;
            self.operators.push(op);
            value = match op {
                Operator::Add => value + rhs,
                _ => value - rhs,
            };
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        loop {
            let op = match self.peek() {
                Some('*') => Operator::Multiply,
                Some('/') => Operator::Divide,
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.factor()?;
            self.operators.push(op);
            value = match op {
                Operator::Multiply => value * rhs,
                _ => {
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value / rhs
                }
            };
        }
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        let value = match self.peek() {
            Some('+') => {
                self.pos += 1;
                self.factor()?
            }
            Some('-') => {
                self.pos += 1;
                -self.factor()?
            }
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(self.unexpected());
                }
                self.pos += 1;
                inner
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number()?,
            _ => return Err(self.unexpected()),
        };
        self.depth -= 1;
        Ok(value)
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos].1;
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().map(|&(_, c)| c).collect();
        literal
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(literal))
    }
}

/// Evaluate `+ - * / ( )` arithmetic over decimal literals.
pub fn evaluate(expression: &str) -> Result<Evaluation, EvalError> {
    let mut parser = Parser {
        chars: expression.char_indices().collect(),
        pos: 0,
        depth: 0,
        operators: Vec::new(),
    };

    let value = parser.expr()?;
    if parser.peek().is_some() {
        return Err(EvalError::TrailingInput(parser.offset()));
    }

    Ok(Evaluation {
        value,
        operators: parser.operators,
    })
}
