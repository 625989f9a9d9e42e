// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

#![warn(missing_docs)]

//! # heex
//!
//! A parser and multi-format renderer for HEEx, Phoenix LiveView's
//! HTML-with-embedded-expressions templating dialect.
//!
//! The crate is a strict pipeline: source text goes through a hand-written
//! [`scanner`] into a token stream, the [`parser`] turns that token stream
//! directly into a [`Document`](ast::Document), and the [`render`] module
//! walks that document back into HTML, an indented debug dump, or JSON.
//! Every stage is a pure function — there is no shared state, no runtime,
//! and no evaluation of the expression code a template carries; expression
//! bodies are always treated as opaque text.
//!
//! ## Quick start
//!
//! ```
//! let document = heex::parse(r#"<div class="greeting">Hello {@name}!</div>"#).unwrap();
//! let html = heex::render_html(&document);
//! assert_eq!(html, r#"<div class="greeting">Hello {@name}!</div>"#);
//! ```
//!
//! ## Error handling
//!
//! Both tokenizing and parsing accumulate every diagnostic they find before
//! failing, rather than stopping at the first one. A failure is always a
//! single [`HeexError`] carrying the newline-joined list of messages; no
//! partial document is ever returned.

/// Abstract syntax tree types for parsed templates.
pub mod ast;
/// Error types shared by the scanner and parser.
pub mod error;
/// Recursive-descent tree builder: tokens to [`ast::Document`].
pub mod parser;
/// Renderers turning a document back into HTML, debug, or JSON text.
pub mod render;
/// Hand-written scanner: source text to tokens.
pub mod scanner;
/// Source locations and spans.
pub mod span;
/// The token vocabulary produced by the scanner.
pub mod token;

pub use ast::Document;
pub use error::{HeexError, Result};
pub use parser::parse;
pub use render::debug::render_debug;
pub use render::html::render_html;
pub use render::json::render_json;
pub use token::{Token, TokenKind};

/// Tokenizes `source`, without building a tree. Exposed for callers that
/// only need the lexical structure (e.g. syntax highlighting).
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    scanner::tokenize(source)
}

/// Parses `source` and immediately renders it back to HTML.
pub fn parse_and_render(source: &str) -> Result<String> {
    parse(source).map(|document| render_html(&document))
}

/// Parses `source` purely to validate it, discarding the resulting tree.
pub fn parse_and_validate(source: &str) -> Result<()> {
    parse(source).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render_round_trips_a_fragment() {
        let source = "<div><span>{@name}</span></div>";
        assert_eq!(parse_and_render(source).unwrap(), source);
    }

    #[test]
    fn parse_and_validate_surfaces_composite_errors() {
        let err = parse_and_validate("<div></span>").unwrap_err();
        assert!(err.to_string().contains("Mismatched"));
    }

    #[test]
    fn tokenize_exposes_token_stream_without_building_a_tree() {
        let tokens = tokenize("<br/>").unwrap();
        assert_eq!(tokens.first().unwrap().kind, TokenKind::TagOpen);
    }

    #[test]
    fn all_three_renderers_accept_the_same_document() {
        let document = parse("<.card><:header>Hi</:header></.card>").unwrap();
        assert!(!render_html(&document).is_empty());
        assert!(!render_debug(&document).is_empty());
        assert!(render_json(&document).starts_with('{'));
    }
}
