/*!
Recursive‑descent parser for Scrawl
===================================

Statements are dispatched on their leading token; expressions use
**precedence climbing** over the operator table carried by the tokens.
All reads go through a [`TokenCursor`], which pulls tokens from the
[`TokenSource`] only as far ahead as a production asks for.

Grammar (condensed)
-------------------

```text
program     → scope EOT ;
scope       → ( TERM | COMMENT | statement ( TERM | COMMENT | EOT ) )* ;
statement   → "let" Qualifier "=" ( "[" expression "]" | expression )
            | "if" expression block ( ( NEWLINE | COMMENT )* "else" block )?
            | "while" expression block
            | "def" Qualifier "(" Qualifier ( "," Qualifier )* ")" block
            | "return" expression?
            | block
            | Qualifier "=" expression
            | Qualifier "[" expression "]" "=" expression
            | expression ;
block       → "{" scope "}" ;
expression  → atom ( BINOP atom )* ;           (precedence climbing)
atom        → "(" expression ")"
            | UNOP atom
            | Qualifier ( "(" expression ( "," expression )* ")"
                        | "[" expression "]" )?
            | literal ;
literal     → "empty" | "true" | "false" | STRING | NUMBER | DATE ;
TERM        → NEWLINE | ";" ;
```

### Complexity

Each token is pulled from the source once.  Two productions look further
than one token ahead: else‑detection skips blank lines and comments after
an `if` block, and array‑assignment detection balances brackets.  Both
scans are bounded by the input they skip.

Recursion depth grows with expression and block nesting; pathological
nesting can exhaust the call stack.

### Logging Policy

| Location               | Level   | Purpose                              |
|------------------------|---------|--------------------------------------|
| `Parser::new`, `parse` | `info`  | Lifecycle milestones.                |
| statement dispatch     | `debug` | Descent into grammar branches.       |
| cursor refills         | `debug` | Demand‑driven token pulls.           |
*/

pub mod cursor;
mod expression;
mod statement;

use crate::ast::{Scope, Stmt};
use crate::error::{ParseError, Result};
use crate::scanner::Tokeniser;
use crate::token::{TokenKind, TokenSource};

use log::{debug, info};

pub use cursor::TokenCursor;

/// Top‑level parser over an on‑demand token source.
///
/// A parser keeps private lookahead state and is not meant to be shared
/// between concurrent callers.
pub struct Parser<S> {
    cursor: TokenCursor<S>,
}

impl Parser<Tokeniser> {
    /// Parser over raw source text using the bundled [`Tokeniser`].
    pub fn from_source<T: Into<String>>(src: T) -> Self {
        Self::new(Tokeniser::new(src))
    }
}

impl<S: TokenSource> Parser<S> {
    /// Construct a new parser.
    pub fn new(source: S) -> Self {
        info!("Parser created");

        Self {
            cursor: TokenCursor::new(source),
        }
    }

    /// Give the token source back.
    pub fn into_source(self) -> S {
        self.cursor.into_source()
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse the whole input into its root scope.
    ///
    /// Every call rewinds the source and builds a fresh tree.  The first
    /// error aborts the parse.
    pub fn parse(&mut self) -> Result<Scope> {
        info!("Beginning parse phase");

        self.cursor.reset();

        let root: Scope = self.parse_scope()?;

        let next = self.cursor.peek(0)?;
        if !next.is(TokenKind::Eot) {
            return Err(ParseError::trailing(next.describe()));
        }

        info!("Parsed {} top-level statement(s)", root.len());

        Ok(root)
    }

    // ─────────────────────────── scopes ───────────────────────────

    /// Statements up to a closing `}` (left unconsumed) or end of input.
    pub(crate) fn parse_scope(&mut self) -> Result<Scope> {
        let mut statements: Vec<Stmt> = Vec::new();

        loop {
            let kind: TokenKind = self.cursor.peek_kind(0)?;

            if kind == TokenKind::Eot || kind.is_scope_terminator() {
                break;
            }

            if kind.is_statement_terminator() || kind.is_comment() {
                self.cursor.consume()?;
                continue;
            }

            let statement: Stmt = match self.parse_statement()? {
                Some(statement) => statement,
                None => {
                    return Err(ParseError::incomplete(self.cursor.peek(0)?.describe()));
                }
            };

            let after: TokenKind = self.cursor.peek_kind(0)?;
            if !(after.is_statement_terminator() || after.is_comment() || after == TokenKind::Eot)
            {
                return Err(ParseError::syntax(
                    "Statement must end in a newline, ';', a comment or end of input",
                    self.cursor.peek(0)?.describe(),
                ));
            }

            debug!("Statement complete: {:?}", statement);

            statements.push(statement);
        }

        Ok(Scope::new(statements))
    }

    /// `"{" scope "}"`
    pub(crate) fn parse_block(&mut self) -> Result<Scope> {
        self.cursor.expect(TokenKind::OpenCurly, "Expected '{'")?;
        let scope: Scope = self.parse_scope()?;
        self.cursor.expect(TokenKind::CloseCurly, "Expected '}'")?;

        Ok(scope)
    }
}
