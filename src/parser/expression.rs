use chrono::NaiveDate;

use crate::ast::{BinaryOperator, Expr, Literal, Term, UnaryOperator, Variable};
use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind, TokenSource};

use super::Parser;

use log::debug;

/// Fixed calendar format of date literals.
const DATE_FORMAT: &str = "%d/%m/%Y";

impl<S: TokenSource> Parser<S> {
    // ─────────────────── expression rules (precedence climbing) ───────────

    /// One atom followed by any binary operators.  `Ok(None)` when no atom
    /// starts here; nothing has been consumed in that case.
    pub(crate) fn parse_expression(&mut self) -> Result<Option<Expr>> {
        match self.parse_atom()? {
            Some(left) => self.climb(left, 0).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn expect_expression(&mut self, message: &str) -> Result<Expr> {
        match self.parse_expression()? {
            Some(expr) => Ok(expr),
            None => Err(ParseError::syntax(message, self.cursor.peek(0)?.describe())),
        }
    }

    /// Fold operators of precedence `>= min_precedence` into `left`.
    ///
    /// A following operator that binds tighter, or equally tight and
    /// right‑associative, is absorbed into the right operand first.
    fn climb(&mut self, mut left: Expr, min_precedence: u8) -> Result<Expr> {
        while let Some(precedence) = self.next_precedence()? {
            if precedence < min_precedence {
                break;
            }

            let op: Token = self.cursor.consume()?;
            let mut right: Expr = match self.parse_atom()? {
                Some(right) => right,
                None => {
                    return Err(ParseError::syntax(
                        format!("Expected expression after '{}'", op.text),
                        self.cursor.peek(0)?.describe(),
                    ));
                }
            };

            loop {
                let next: &Token = self.cursor.peek(0)?;
                let right_associative: bool = next.is_right_associative();
                let Some(next_precedence) = next.precedence() else {
                    break;
                };

                if next_precedence > precedence {
                    right = self.climb(right, precedence + 1)?;
                } else if next_precedence == precedence && right_associative {
                    right = self.climb(right, precedence)?;
                } else {
                    break;
                }
            }

            left = Expr::binary(binary_operator(&op)?, left, right);
        }

        Ok(left)
    }

    fn next_precedence(&mut self) -> Result<Option<u8>> {
        Ok(self.cursor.peek(0)?.precedence())
    }

    // ──────────────────────────── atoms ────────────────────────────

    /// `"(" expression ")" | UNOP atom | Qualifier (call | index)? | literal`
    fn parse_atom(&mut self) -> Result<Option<Expr>> {
        if self.cursor.try_consume(TokenKind::OpenParen)? {
            let inner: Expr = self.expect_expression("Unparsable/invalid expression")?;
            self.cursor.expect(TokenKind::CloseParen, "Expected ')'")?;

            return Ok(Some(inner));
        }

        if self.cursor.peek_kind(0)?.is_unary_operator() {
            let op: Token = self.cursor.consume()?;
            let operand: Expr = match self.parse_atom()? {
                Some(operand) => operand,
                None => {
                    return Err(ParseError::syntax(
                        format!("Expected operand after '{}'", op.text),
                        self.cursor.peek(0)?.describe(),
                    ));
                }
            };

            return Ok(Some(Expr::unary(unary_operator(&op)?, operand)));
        }

        if let Some(variable) = self.parse_variable()? {
            let term: Term = if self.cursor.try_consume(TokenKind::OpenParen)? {
                self.call(variable)?
            } else if self.cursor.try_consume(TokenKind::OpenSquare)? {
                let index: Expr = self.expect_expression("Expected index expression")?;
                self.cursor.expect(TokenKind::CloseSquare, "Expected ']'")?;

                Term::ArrayAccess {
                    qualifier: variable,
                    index: Box::new(index),
                }
            } else {
                Term::Variable(variable)
            };

            return Ok(Some(Expr::Term(term)));
        }

        Ok(self.parse_literal()?.map(Expr::literal))
    }

    /// Arguments after `name(`, one or more, through the closing `)`.
    fn call(&mut self, function: Variable) -> Result<Term> {
        let mut arguments: Vec<Expr> = Vec::new();

        loop {
            arguments.push(self.expect_expression("Expected expression")?);

            if self.cursor.try_consume(TokenKind::CloseParen)? {
                break;
            }

            self.cursor
                .expect(TokenKind::Comma, "Expected ',' between arguments")?;
        }

        debug!("Call of '{}' with {} argument(s)", function, arguments.len());

        Ok(Term::Call {
            function,
            arguments,
        })
    }

    // ─────────────────────────── literals ──────────────────────────

    fn parse_literal(&mut self) -> Result<Option<Literal>> {
        let literal: Literal = match self.cursor.peek_kind(0)? {
            TokenKind::Empty => Literal::Empty,
            TokenKind::True => Literal::Boolean(true),
            TokenKind::False => Literal::Boolean(false),
            TokenKind::StringLiteral => Literal::Str(self.cursor.peek(0)?.text.clone()),
            TokenKind::NumberLiteral => number_literal(&self.cursor.peek(0)?.text)?,
            TokenKind::DateLiteral => date_literal(&self.cursor.peek(0)?.text)?,
            _ => return Ok(None),
        };

        self.cursor.consume()?;

        Ok(Some(literal))
    }
}

/// Integer when the text fits an `i64`, otherwise floating point.
fn number_literal(text: &str) -> Result<Literal> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Literal::Integer(n));
    }

    text.parse::<f64>()
        .map(Literal::Double)
        .map_err(|_| ParseError::literal_format(text, "a number"))
}

/// Strict `dd/MM/yyyy`; chrono alone would take `1/2/23`.
fn date_literal(text: &str) -> Result<Literal> {
    let shaped: bool = text.len() == 10
        && text.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });

    if !shaped {
        return Err(ParseError::literal_format(text, "a dd/MM/yyyy date"));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Literal::Date)
        .map_err(|_| ParseError::literal_format(text, "a dd/MM/yyyy date"))
}

fn binary_operator(op: &Token) -> Result<BinaryOperator> {
    let mapped: BinaryOperator = match op.kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Hyphen => BinaryOperator::Subtract,
        TokenKind::Asterisk => BinaryOperator::Multiply,
        TokenKind::ForwardSlash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulo,
        TokenKind::Caret => BinaryOperator::Exponent,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::NotEquals => BinaryOperator::NotEqual,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        _ => return Err(ParseError::unsupported(op.text.clone())),
    };

    Ok(mapped)
}

fn unary_operator(op: &Token) -> Result<UnaryOperator> {
    match op.kind {
        TokenKind::Hyphen => Ok(UnaryOperator::Negate),
        TokenKind::Tilde => Ok(UnaryOperator::Invert),
        TokenKind::Not | TokenKind::Exclaim => Ok(UnaryOperator::Not),
        _ => Err(ParseError::unsupported(op.text.clone())),
    }
}
