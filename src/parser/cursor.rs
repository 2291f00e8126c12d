//! Demand‑driven lookahead over a [`TokenSource`].
//!
//! The cursor pulls from the source only when a caller looks further ahead
//! than what is already buffered, so on an early syntax error the rest of
//! the input is never tokenized.  Tokens pulled by `peek` stay in the
//! buffer and are handed out by later `consume` calls without touching the
//! source again.

use std::collections::VecDeque;

use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind, TokenSource};

use log::debug;

pub struct TokenCursor<S> {
    source: S,
    lookahead: VecDeque<Token>,
}

impl<S: TokenSource> TokenCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
        }
    }

    /// Rewind the source and drop everything buffered.
    pub fn reset(&mut self) {
        self.source.reset();
        self.lookahead.clear();
    }

    /// Number of tokens pulled from the source but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.lookahead.len()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// The token `offset` positions ahead, without consuming it.
    pub fn peek(&mut self, offset: usize) -> Result<&Token> {
        while self.lookahead.len() <= offset {
            let token: Token = self.source.next_token()?;

            debug!(
                "Cursor pulled {} (buffer now {})",
                token,
                self.lookahead.len() + 1
            );

            self.lookahead.push_back(token);
        }

        Ok(&self.lookahead[offset])
    }

    /// Kind of the token `offset` positions ahead.
    #[inline]
    pub fn peek_kind(&mut self, offset: usize) -> Result<TokenKind> {
        Ok(self.peek(offset)?.kind)
    }

    /// Remove and return the next token.
    pub fn consume(&mut self) -> Result<Token> {
        match self.lookahead.pop_front() {
            Some(token) => Ok(token),
            None => self.source.next_token(),
        }
    }

    /// Consume the next token iff it is of kind `expected`.
    pub fn try_consume(&mut self, expected: TokenKind) -> Result<bool> {
        if self.peek_kind(0)? == expected {
            self.consume()?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Consume the next token, failing with `message` unless it is of kind
    /// `expected`.
    pub fn expect(&mut self, expected: TokenKind, message: &str) -> Result<Token> {
        let next: &Token = self.peek(0)?;

        if next.kind != expected {
            return Err(ParseError::syntax(message, next.describe()));
        }

        self.consume()
    }
}
