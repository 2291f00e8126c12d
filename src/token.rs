use log::debug;
use serde::Serialize;
use std::fmt;

use crate::error::Result;

/// The different kinds of tokens the parser understands.
///
/// Literal kinds (`StringLiteral`, `NumberLiteral`, `DateLiteral`) carry their
/// raw text in [`Token::text`]; the parser decides the final value.
/// `Eot` is the end-of-tokens sentinel a source keeps returning once
/// exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── keywords ──────────────────────────────────────────────────────
    /// 'let'
    Let,

    /// 'if'
    If,

    /// 'else'
    Else,

    /// 'while'
    While,

    /// 'def'
    Define,

    /// 'return'
    Return,

    /// 'empty'
    Empty,

    /// 'true'
    True,

    /// 'false'
    False,

    // ── names and literals ────────────────────────────────────────────
    /// A user‑defined variable or function name
    Qualifier,

    /// A quoted string (contents without quotes)
    StringLiteral,

    /// Digits with an optional fractional part
    NumberLiteral,

    /// `dd/MM/yyyy`
    DateLiteral,

    // ── layout ────────────────────────────────────────────────────────
    /// '\n'
    Newline,

    /// ';'
    Semicolon,

    /// '#' up to the end of the line
    Comment,

    // ── punctuation ───────────────────────────────────────────────────
    /// '{'
    OpenCurly,

    /// '}'
    CloseCurly,

    /// '('
    OpenParen,

    /// ')'
    CloseParen,

    /// '['
    OpenSquare,

    /// ']'
    CloseSquare,

    /// ','
    Comma,

    /// '='
    EqualSign,

    // ── operators ─────────────────────────────────────────────────────
    /// '+'
    Plus,

    /// '-' (binary subtract and unary negate)
    Hyphen,

    /// '*'
    Asterisk,

    /// '/'
    ForwardSlash,

    /// '%'
    Percent,

    /// '^'
    Caret,

    /// '<'
    Less,

    /// '<='
    LessEqual,

    /// '>'
    Greater,

    /// '>='
    GreaterEqual,

    /// '=='
    Equals,

    /// '!='
    NotEquals,

    /// 'and' / '&&'
    And,

    /// 'or' / '||'
    Or,

    /// 'not'
    Not,

    /// '!'
    Exclaim,

    /// '~'
    Tilde,

    /// '<<' (reserved)
    ShiftLeft,

    /// '>>' (reserved)
    ShiftRight,

    /// '&' (reserved)
    Ampersand,

    /// '|' (reserved)
    Pipe,

    /// '^^' (reserved, bitwise xor; '^' is exponent)
    Xor,

    /// End‑of‑tokens sentinel
    Eot,
}

impl TokenKind {
    /// Binary‑operator precedence, `None` for tokens that are not binary
    /// operators.  Higher binds tighter.
    pub fn precedence(self) -> Option<u8> {
        match self {
            TokenKind::Caret => Some(8),
            TokenKind::Asterisk | TokenKind::ForwardSlash | TokenKind::Percent => Some(7),
            TokenKind::Plus | TokenKind::Hyphen => Some(6),
            TokenKind::ShiftLeft | TokenKind::ShiftRight => Some(5),
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => Some(4),
            TokenKind::Equals | TokenKind::NotEquals => Some(3),
            TokenKind::Ampersand | TokenKind::Pipe | TokenKind::Xor => Some(2),
            TokenKind::And | TokenKind::Or => Some(1),
            _ => None,
        }
    }

    /// Only exponentiation groups to the right.
    pub fn is_right_associative(self) -> bool {
        matches!(self, TokenKind::Caret)
    }

    pub fn is_binary_operator(self) -> bool {
        self.precedence().is_some()
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Hyphen | TokenKind::Tilde | TokenKind::Not | TokenKind::Exclaim
        )
    }

    pub fn is_statement_terminator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }

    pub fn is_scope_terminator(self) -> bool {
        matches!(self, TokenKind::CloseCurly)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::Comment)
    }

    /// Upper‑case name used by the `tokenize` listing.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Let => "LET",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Define => "DEF",
            TokenKind::Return => "RETURN",
            TokenKind::Empty => "EMPTY",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Qualifier => "QUALIFIER",
            TokenKind::StringLiteral => "STRING",
            TokenKind::NumberLiteral => "NUMBER",
            TokenKind::DateLiteral => "DATE",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comment => "COMMENT",
            TokenKind::OpenCurly => "OPEN_CURLY",
            TokenKind::CloseCurly => "CLOSE_CURLY",
            TokenKind::OpenParen => "OPEN_PAREN",
            TokenKind::CloseParen => "CLOSE_PAREN",
            TokenKind::OpenSquare => "OPEN_SQUARE",
            TokenKind::CloseSquare => "CLOSE_SQUARE",
            TokenKind::Comma => "COMMA",
            TokenKind::EqualSign => "EQUAL_SIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Hyphen => "HYPHEN",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::ForwardSlash => "FORWARD_SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Caret => "CARET",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Equals => "EQUALS",
            TokenKind::NotEquals => "NOT_EQUALS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Exclaim => "EXCLAIM",
            TokenKind::Tilde => "TILDE",
            TokenKind::ShiftLeft => "SHIFT_LEFT",
            TokenKind::ShiftRight => "SHIFT_RIGHT",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::Pipe => "PIPE",
            TokenKind::Xor => "XOR",
            TokenKind::Eot => "EOT",
        }
    }
}

/// A scanned token: its category and the literal text that produced it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub kind: TokenKind,

    /// Source text; string literals are stored without their quotes.
    pub text: String,
}

impl Token {
    /// Create a new Token with the given kind and text.
    pub fn new<S: Into<String>>(kind: TokenKind, text: S) -> Self {
        let text: String = text.into();

        debug!("Creating new token: kind={:?}, text={:?}", kind, text);

        Self { kind, text }
    }

    /// The end‑of‑tokens sentinel.
    pub fn eot() -> Self {
        Self::new(TokenKind::Eot, "")
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn precedence(&self) -> Option<u8> {
        self.kind.precedence()
    }

    #[inline]
    pub fn is_right_associative(&self) -> bool {
        self.kind.is_right_associative()
    }

    /// Human readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eot => "end of input".to_string(),
            TokenKind::Newline => "newline".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "{} \\n", self.kind.name()),
            _ => write!(f, "{} {}", self.kind.name(), self.text),
        }
    }
}

/// Producer of tokens consumed on demand by the parser.
///
/// Implementations must keep returning an `Eot` token once their input is
/// exhausted.
pub trait TokenSource {
    /// Rewind to the start of the input.
    fn reset(&mut self);

    /// Produce the next token.
    fn next_token(&mut self) -> Result<Token>;
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn next_token(&mut self) -> Result<Token> {
        (**self).next_token()
    }
}
