//! Module `scanner` implements the reference token source: a one‑pass,
//! on‑demand lexer over UTF‑8 text.
//!
//! Unlike a whole‑file tokenizer it produces exactly one [`Token`] per
//! [`TokenSource::next_token`] call, so the parser never pays for tokens it
//! does not look at.  Newlines, `;` and `#` comments are real tokens because
//! the grammar uses them as statement terminators.
//!
//! # Token Recognition
//!
//! - Punctuators: `(`, `)`, `[`, `]`, `{`, `}`, `,`, `;`.
//! - Operators: `+ - * / % ^ ~`, `= ==`, `! !=`, `< <=`, `> >=`, `&& ||`.
//! - String literals: `"…"` or `'…'`, raw contents, no escapes.
//! - Numbers: digits with an optional fractional part.  Digit groups shaped
//!   exactly `dd/MM/yyyy` (`31/12/2023`) form a date literal instead; any
//!   other slash run is division.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a
//!   perfect‑hash `KEYWORDS` map.
//! - Errors: any unexpected character yields `ParseError::lex(line, message)`.
//!
//! Once the input is exhausted the tokeniser keeps returning `Eot`.

use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind, TokenSource};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenKind> = phf_map! {
    b"let"    => TokenKind::Let,
    b"if"     => TokenKind::If,
    b"else"   => TokenKind::Else,
    b"while"  => TokenKind::While,
    b"def"    => TokenKind::Define,
    b"return" => TokenKind::Return,
    b"empty"  => TokenKind::Empty,
    b"true"   => TokenKind::True,
    b"false"  => TokenKind::False,
    b"and"    => TokenKind::And,
    b"or"     => TokenKind::Or,
    b"not"    => TokenKind::Not,
};

/// Streaming lexer that owns its source text.
pub struct Tokeniser {
    src: String,                // entire source text
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenKind>, // recognised token kind waiting to be emitted
    text: Option<(usize, usize)>, // byte range of the token text when it differs from the lexeme
    done: bool,                 // iterator already yielded `Eot`
}

impl Tokeniser {
    /// Create a new lexer over `src`.
    pub fn new<S: Into<String>>(src: S) -> Self {
        let src: String = src.into();

        info!("Tokeniser created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
            text: None,
            done: false,
        }
    }

    /// Create a lexer over raw bytes, rejecting invalid UTF‑8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::new(String::from_utf8(bytes)?))
    }

    /// Current 1‑based line.
    pub fn line(&self) -> usize {
        self.line
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self.src.as_bytes()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes()[self.curr];
        self.curr += 1;
        b
    }

    /// Current byte, `0` past the end.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.bytes().get(self.curr).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.bytes().get(self.curr + 1).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  Whitespace leaves
    /// `pending` empty.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        let kind: TokenKind = match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'[' => TokenKind::OpenSquare,
            b']' => TokenKind::CloseSquare,
            b'{' => TokenKind::OpenCurly,
            b'}' => TokenKind::CloseCurly,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Hyphen,
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::ForwardSlash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'~' => TokenKind::Tilde,

            // ── one‑or‑two character operators ───────────────────────────
            b'!' if self.match_byte(b'=') => TokenKind::NotEquals,
            b'!' => TokenKind::Exclaim,
            b'=' if self.match_byte(b'=') => TokenKind::Equals,
            b'=' => TokenKind::EqualSign,
            b'<' if self.match_byte(b'=') => TokenKind::LessEqual,
            b'<' => TokenKind::Less,
            b'>' if self.match_byte(b'=') => TokenKind::GreaterEqual,
            b'>' => TokenKind::Greater,
            b'&' if self.match_byte(b'&') => TokenKind::And,
            b'|' if self.match_byte(b'|') => TokenKind::Or,

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => return Ok(()),

            b'\n' => {
                self.line += 1;
                TokenKind::Newline
            }

            // ── comments (# … until newline, newline not included) ───────
            b'#' => {
                let newline: Option<usize> = memchr(b'\n', &self.bytes()[self.curr..]);

                match newline {
                    Some(pos) => self.curr += pos,
                    None => self.curr = self.src.len(),
                }

                TokenKind::Comment
            }

            b'"' | b'\'' => return self.scan_string(b),

            b'0'..=b'9' => self.scan_number(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),

            _ => {
                let ch = self.src[self.start..].chars().next().unwrap_or('?');
                self.curr = self.start + ch.len_utf8();

                return Err(ParseError::lex(
                    self.line,
                    format!("Unexpected character: {}", ch),
                ));
            }
        };

        self.pending = Some(kind);

        Ok(())
    }

    /// Scan a quoted string literal.  `self.start` points at the opening
    /// quote; the token text excludes both quotes.
    fn scan_string(&mut self, quote: u8) -> Result<()> {
        let opened_on: usize = self.line;

        while !self.is_at_end() && self.peek() != quote {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(ParseError::lex(opened_on, "Unterminated string."));
        }

        self.advance(); // closing quote

        self.text = Some((self.start + 1, self.curr - 1));
        self.pending = Some(TokenKind::StringLiteral);

        Ok(())
    }

    /// Scan a number (`12`, `3.5`) or a date (`31/12/2023`).
    fn scan_number(&mut self) -> TokenKind {
        self.skip_digits();

        if self.curr - self.start == 2 && self.scan_date_tail() {
            return TokenKind::DateLiteral;
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // "."
            self.skip_digits();
        }

        TokenKind::NumberLiteral
    }

    /// Consume `/MM/yyyy` after a two digit day.  Any other shape rewinds so
    /// the slashes lex as division (`10/2/5`).
    fn scan_date_tail(&mut self) -> bool {
        let save: usize = self.curr;

        for width in [2, 4] {
            if self.peek() != b'/' {
                self.curr = save;
                return false;
            }

            self.advance(); // "/"
            let group: usize = self.curr;
            self.skip_digits();

            if self.curr - group != width {
                self.curr = save;
                return false;
            }
        }

        true
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    /// Scan an identifier and decide if it is a **keyword** or a
    /// `Qualifier`.
    fn scan_identifier(&mut self) -> TokenKind {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.bytes()[self.start..self.curr];

        KEYWORDS.get(slice).copied().unwrap_or(TokenKind::Qualifier)
    }
}

impl TokenSource for Tokeniser {
    fn reset(&mut self) {
        debug!("Tokeniser reset");

        self.start = 0;
        self.curr = 0;
        self.line = 1;
        self.pending = None;
        self.text = None;
        self.done = false;
    }

    fn next_token(&mut self) -> Result<Token> {
        loop {
            if self.is_at_end() {
                return Ok(Token::eot());
            }

            self.start = self.curr;
            self.pending = None;
            self.text = None;

            self.scan_token()?;

            if let Some(kind) = self.pending.take() {
                let (from, to) = self.text.take().unwrap_or((self.start, self.curr));
                debug!("Scanned token ({:?}) on line {}", kind, self.line);

                return Ok(Token::new(kind, &self.src[from..to]));
            }
            // Otherwise it was whitespace → continue loop.
        }
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

/// Yields every token including exactly one trailing `Eot`; a lexing error
/// is yielded once and ends the iteration.
impl Iterator for Tokeniser {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.next_token();

        match &item {
            Ok(token) if token.is(TokenKind::Eot) => self.done = true,
            Err(_) => self.done = true,
            Ok(_) => {}
        }

        Some(item)
    }
}

impl FusedIterator for Tokeniser {}
