// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Token vocabulary produced by the [scanner](crate::scanner).

use crate::span::Span;

/// The kind of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of plain text between markup.
    Text,
    /// `<name` opening an ordinary HTML element.
    TagOpen,
    /// `</name>` closing an ordinary HTML element.
    TagClose,
    /// `/>` self-closing an element or component.
    TagSelfClose,
    /// `>` ending an opening tag.
    TagEnd,
    /// `<.name` or `<Name` opening a component.
    ComponentOpen,
    /// `</.name>` or `</Name>` closing a component.
    ComponentClose,
    /// `<:name` opening a named slot.
    SlotOpen,
    /// `</:name>` closing a named slot.
    SlotClose,
    /// An attribute name, including the leading `:` for special attributes.
    AttrName,
    /// The `=` between an attribute name and its value.
    AttrEquals,
    /// A quoted or unquoted attribute value.
    AttrValue,
    /// `{` opening a curly-brace expression.
    ExprOpen,
    /// The body of a curly-brace expression.
    ExprContent,
    /// `}` closing a curly-brace expression.
    ExprClose,
    /// `<%` opening an EEx execution tag.
    EExOpen,
    /// `<%=` opening an EEx output tag.
    EExOutput,
    /// `<%#` opening an EEx comment tag.
    EExComment,
    /// The body of an EEx tag, trimmed of surrounding whitespace.
    EExContent,
    /// `%>` closing an EEx tag.
    EExClose,
    /// `<!--` opening an HTML comment.
    CommentOpen,
    /// The literal body of an HTML comment.
    CommentContent,
    /// `-->` closing an HTML comment.
    CommentClose,
    /// End of input. Always the final token in a stream.
    Eof,
}

/// A single lexical token: a kind, its literal value, and its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's kind.
    pub kind: TokenKind,
    /// The token's literal value. Meaning depends on `kind` (see the table
    /// in the scanner's module documentation).
    pub value: String,
    /// The token's source span.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Location;

    #[test]
    fn token_new_stores_fields() {
        let span = Span::new(Location::start(), Location::new(1, 5, 4));
        let tok = Token::new(TokenKind::TagOpen, "div", span);
        assert_eq!(tok.kind, TokenKind::TagOpen);
        assert_eq!(tok.value, "div");
        assert_eq!(tok.span, span);
    }
}
