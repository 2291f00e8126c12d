use crate::ast::{Expr, Scope, Stmt, Variable};
use crate::error::{ParseError, Result};
use crate::token::{TokenKind, TokenSource};

use super::Parser;

use log::debug;

impl<S: TokenSource> Parser<S> {
    /// Parse one statement.  `Ok(None)` means the leading tokens form no
    /// statement at all; the scope parser reports that.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        debug!("Entering statement");

        if self.cursor.try_consume(TokenKind::Let)? {
            return self.declaration();
        }
        if self.cursor.try_consume(TokenKind::If)? {
            return self.if_statement().map(Some);
        }
        if self.cursor.try_consume(TokenKind::While)? {
            return self.while_statement().map(Some);
        }
        if self.cursor.try_consume(TokenKind::Define)? {
            return self.function_definition().map(Some);
        }
        if self.cursor.try_consume(TokenKind::Return)? {
            return self.return_statement().map(Some);
        }
        if self.cursor.try_consume(TokenKind::OpenCurly)? {
            let scope: Scope = self.parse_scope()?;
            self.cursor.expect(TokenKind::CloseCurly, "Expected '}'")?;

            return Ok(Some(Stmt::Scope(scope)));
        }

        if self.cursor.peek_kind(0)? == TokenKind::Qualifier {
            match self.cursor.peek_kind(1)? {
                TokenKind::EqualSign => return self.assignment(),
                TokenKind::OpenSquare if self.is_array_assignment()? => {
                    return self.array_assignment().map(Some);
                }
                _ => {}
            }
        }

        debug!("Falling back to bare expression");

        Ok(self.parse_expression()?.map(Stmt::Expression))
    }

    // ──────────────────────── declarations ────────────────────────

    /// `"let" Qualifier "=" ( "[" expression "]" | expression )`
    fn declaration(&mut self) -> Result<Option<Stmt>> {
        let variable: Variable = self.expect_variable("Expected qualifier")?;

        self.cursor.expect(TokenKind::EqualSign, "Expected '='")?;

        if self.cursor.try_consume(TokenKind::OpenSquare)? {
            let length: Expr = self.expect_expression("Expected array length expression")?;
            self.cursor.expect(TokenKind::CloseSquare, "Expected ']'")?;

            debug!("Array declaration of '{}'", variable);

            return Ok(Some(Stmt::ArrayDeclare { variable, length }));
        }

        Ok(self
            .parse_expression()?
            .map(|value| Stmt::Declare { variable, value }))
    }

    /// `Qualifier "=" expression`
    fn assignment(&mut self) -> Result<Option<Stmt>> {
        let variable: Variable = self.expect_variable("Expected qualifier")?;

        self.cursor.expect(TokenKind::EqualSign, "Expected '='")?;

        Ok(self
            .parse_expression()?
            .map(|value| Stmt::Assign { variable, value }))
    }

    /// With `Qualifier "["` buffered, scan to the matching `]` and report
    /// whether `=` follows it.  Stops at end of input.
    fn is_array_assignment(&mut self) -> Result<bool> {
        let mut ahead: usize = 2;
        let mut balance: usize = 1;

        while balance > 0 {
            match self.cursor.peek_kind(ahead)? {
                TokenKind::OpenSquare => balance += 1,
                TokenKind::CloseSquare => balance -= 1,
                TokenKind::Eot => return Ok(false),
                _ => {}
            }

            ahead += 1;
        }

        Ok(self.cursor.peek_kind(ahead)? == TokenKind::EqualSign)
    }

    /// `Qualifier "[" expression "]" "=" expression`
    fn array_assignment(&mut self) -> Result<Stmt> {
        let variable: Variable = self.expect_variable("Expected qualifier")?;

        self.cursor.expect(TokenKind::OpenSquare, "Expected '['")?;
        let index: Expr = self.expect_expression("Expected index expression")?;
        self.cursor.expect(TokenKind::CloseSquare, "Expected ']'")?;
        self.cursor.expect(TokenKind::EqualSign, "Expected '='")?;
        let value: Expr = self.expect_expression("Expected expression")?;

        Ok(Stmt::ArrayAssign {
            variable,
            index,
            value,
        })
    }

    // ───────────────────────── control flow ───────────────────────

    fn if_statement(&mut self) -> Result<Stmt> {
        let condition: Expr = self.expect_expression("Expected if statement expression")?;
        let then_scope: Scope = self.parse_block()?;

        // `else` may sit after any number of blank lines and comments.
        let mut ahead: usize = 0;
        loop {
            let kind: TokenKind = self.cursor.peek_kind(ahead)?;
            if kind == TokenKind::Newline || kind.is_comment() {
                ahead += 1;
            } else {
                break;
            }
        }

        let else_scope: Option<Scope> = if self.cursor.peek_kind(ahead)? == TokenKind::Else {
            for _ in 0..=ahead {
                self.cursor.consume()?;
            }

            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_scope,
            else_scope,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        let condition: Expr = self.expect_expression("Expected while statement expression")?;
        let body: Scope = self.parse_block()?;

        Ok(Stmt::While { condition, body })
    }

    /// `"def" Qualifier "(" Qualifier ( "," Qualifier )* ")" block`
    fn function_definition(&mut self) -> Result<Stmt> {
        let name: Variable = self.expect_variable("Expected function name")?;

        self.cursor.expect(TokenKind::OpenParen, "Expected '('")?;

        let mut params: Vec<Variable> = Vec::new();
        loop {
            params.push(self.expect_variable("Expected function parameter")?);

            if self.cursor.try_consume(TokenKind::CloseParen)? {
                break;
            }

            self.cursor.expect(TokenKind::Comma, "Expected ','")?;
        }

        let body: Scope = self.parse_block()?;

        debug!("Function '{}' with {} parameter(s)", name, params.len());

        Ok(Stmt::Function { name, params, body })
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let kind: TokenKind = self.cursor.peek_kind(0)?;

        if kind.is_statement_terminator() || kind.is_comment() || kind == TokenKind::Eot {
            return Ok(Stmt::Return(None));
        }

        let value: Expr = self.expect_expression("Expected expression")?;

        Ok(Stmt::Return(Some(value)))
    }

    // ─────────────────────────── helpers ──────────────────────────

    /// Qualifier token → [`Variable`], or `None` if the next token is not a
    /// qualifier.
    pub(crate) fn parse_variable(&mut self) -> Result<Option<Variable>> {
        if self.cursor.peek_kind(0)? != TokenKind::Qualifier {
            return Ok(None);
        }

        let token = self.cursor.consume()?;

        if !Variable::is_valid_name(&token.text) {
            return Err(ParseError::syntax("Invalid qualifier", token.describe()));
        }

        Ok(Some(Variable::new(token.text)))
    }

    fn expect_variable(&mut self, message: &str) -> Result<Variable> {
        match self.parse_variable()? {
            Some(variable) => Ok(variable),
            None => Err(ParseError::syntax(message, self.cursor.peek(0)?.describe())),
        }
    }
}
