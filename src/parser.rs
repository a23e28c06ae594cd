//! Parsing of the text form of polynomials.
//!
//! The grammar is
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary ('*' unary)*
//! unary := ('+' | '-') unary | power
//! power := atom ('^' integer)?
//! atom  := integer | variable | '(' expr ')'
//! ```
//! Whitespace between tokens is ignored. Exponents are non-negative integer
//! literals.
use std::fmt::Write;
use std::sync::Arc;

use crate::domains::integer::Integer;
use crate::error::{PolyError, Result};
use crate::poly::context::{Context, Variable};
use crate::poly::polynomial::MultivariatePolynomial;
use crate::poly::{Exponent, Exponents};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(Integer),
    Id(Variable),
    Add,
    Sub,
    Mul,
    Pow,
    Open,
    Close,
    End,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Id(v) => f.write_str(v),
            Token::Add => f.write_char('+'),
            Token::Sub => f.write_char('-'),
            Token::Mul => f.write_char('*'),
            Token::Pow => f.write_char('^'),
            Token::Open => f.write_char('('),
            Token::Close => f.write_char(')'),
            Token::End => f.write_str("end of input"),
        }
    }
}

/// Split the input into tokens, each paired with the byte position where it starts.
fn tokenize(input: &str) -> Result<Vec<(Token, usize)>> {
    let bytes = input.as_bytes();
    let mut tokens = vec![];
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let t = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Add,
            b'-' => Token::Sub,
            b'*' => Token::Mul,
            b'^' => Token::Pow,
            b'(' => Token::Open,
            b')' => Token::Close,
            b'0'..=b'9' => {
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }

                let n = Integer::from_str_radix(&input[start..pos], 10)
                    .map_err(|e| PolyError::parse(start, e.to_string()))?;
                tokens.push((Token::Number(n), start));
                continue;
            }
            _ if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }

                tokens.push((Token::Id(input[start..pos].into()), start));
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(PolyError::parse(
                    start,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        tokens.push((t, start));
        pos += 1;
    }

    tokens.push((Token::End, bytes.len()));
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    index: usize,
    ctx: &'a Arc<Context>,
}

impl<'a> Parser<'a> {
    #[inline]
    fn peek(&self) -> &Token {
        &self.tokens[self.index].0
    }

    #[inline]
    fn position(&self) -> usize {
        self.tokens[self.index].1
    }

    fn next(&mut self) -> Token {
        let t = self.tokens[self.index].0.clone();
        if t != Token::End {
            self.index += 1;
        }
        t
    }

    fn unexpected(&self, expected: &str) -> PolyError {
        PolyError::parse(
            self.position(),
            format!("expected {}, found {}", expected, self.peek()),
        )
    }

    fn expr(&mut self) -> Result<MultivariatePolynomial> {
        let mut res = self.term()?;
        loop {
            match self.peek() {
                Token::Add => {
                    self.next();
                    res = &res + &self.term()?;
                }
                Token::Sub => {
                    self.next();
                    res = &res - &self.term()?;
                }
                _ => return Ok(res),
            }
        }
    }

    fn term(&mut self) -> Result<MultivariatePolynomial> {
        let mut res = self.unary()?;
        while *self.peek() == Token::Mul {
            self.next();
            res = &res * &self.unary()?;
        }
        Ok(res)
    }

    fn unary(&mut self) -> Result<MultivariatePolynomial> {
        match self.peek() {
            Token::Add => {
                self.next();
                self.unary()
            }
            Token::Sub => {
                self.next();
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<MultivariatePolynomial> {
        let base = self.atom()?;
        if *self.peek() != Token::Pow {
            return Ok(base);
        }
        self.next();

        let pos = self.position();
        let Token::Number(n) = self.peek().clone() else {
            return Err(self.unexpected("a non-negative integer exponent"));
        };
        self.next();

        let Some(e) = n.to_u32() else {
            return Err(PolyError::parse(pos, format!("exponent {} is too large", n)));
        };

        if base
            .max_exponents()
            .iter()
            .any(|m| *m as u64 * e as u64 > Exponent::MAX as u64)
        {
            return Err(PolyError::parse(
                pos,
                format!("raising to the power {} overflows an exponent", e),
            ));
        }

        Ok(base.pow(e as usize))
    }

    fn atom(&mut self) -> Result<MultivariatePolynomial> {
        let pos = self.position();
        match self.peek().clone() {
            Token::Number(n) => {
                self.next();
                Ok(MultivariatePolynomial::new(self.ctx).constant(n))
            }
            Token::Id(name) => {
                let Some(var) = self.ctx.variable_index(&name) else {
                    return Err(PolyError::parse(pos, format!("unknown variable '{}'", name)));
                };
                self.next();

                let mut exps: Exponents = Exponents::from_elem(0, self.ctx.nvars());
                exps[var] = 1;
                MultivariatePolynomial::new(self.ctx).monomial(Integer::from(1), &exps)
            }
            Token::Open => {
                self.next();
                let res = self.expr()?;
                if *self.peek() != Token::Close {
                    return Err(self.unexpected("')'"));
                }
                self.next();
                Ok(res)
            }
            _ => Err(self.unexpected("a number, a variable or '('")),
        }
    }
}

impl MultivariatePolynomial {
    /// Parse a polynomial in the variables of `ctx`, for example `3*x1^2*x2-x2+5`.
    ///
    /// The result is canonical and packed with the narrowest field width.
    pub fn parse(input: &str, ctx: &Arc<Context>) -> Result<MultivariatePolynomial> {
        let mut parser = Parser {
            tokens: tokenize(input)?,
            index: 0,
            ctx,
        };

        let mut res = parser.expr()?;
        if *parser.peek() != Token::End {
            return Err(parser.unexpected("an operator or end of input"));
        }

        res.compact();
        Ok(res)
    }
}
