//! Syntactic front end of the **Scrawl** scripting language.
//!
//! A [`TokenSource`](token::TokenSource) feeds a demand‑driven
//! [`Parser`](parser::Parser), which builds the typed tree in [`ast`].
//! Consumers walk the tree by matching on it or through the visitor traits.

pub mod ast;
pub mod ast_printer;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;

/// Parse Scrawl source text into its root scope.
pub fn parse(source: &str) -> error::Result<ast::Scope> {
    parser::Parser::from_source(source).parse()
}
