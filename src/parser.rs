// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Recursive-descent tree builder.
//!
//! Consumes the scanner's token stream directly into a [`Document`] — there
//! is no intermediate event-stream layer. Like the scanner, the builder
//! never stops at the first problem: it accumulates diagnostics and, if any
//! were recorded, raises a single composite [`HeexError::Parse`] instead of
//! returning a partial tree.

use tracing::trace;

use crate::ast::{
    is_void_element, Attribute, ComponentType, Document, EExClause, EExType, Expression, Node,
    Slot,
};
use crate::error::{HeexError, Result};
use crate::scanner;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Tokenizes and parses `source` into a [`Document`].
pub fn parse(source: &str) -> Result<Document> {
    let tokens = scanner::tokenize(source)?;
    let mut builder = Builder::new(tokens);
    let children = builder.parse_document();
    if builder.errors.is_empty() {
        Ok(Document::new(children))
    } else {
        Err(HeexError::parse(&builder.errors))
    }
}

struct Builder {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<String>,
}

impl Builder {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream always has Eof"))
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        trace!(kind = ?token.kind, value = %token.value, "consume token");
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let got = self.current().clone();
            self.error(format!("Expected {:?}, got {:?}", kind, got.kind));
            None
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let offset = self.current().span.start.byte_offset;
        self.errors.push(format!("{offset}: {}", message.into()));
    }

    fn is_closing_token(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::TagClose | TokenKind::ComponentClose | TokenKind::SlotClose
        )
    }

    /// Parses a sequence of sibling nodes owned by an enclosing element,
    /// component, or slot. Stops at a closing token (left for the caller to
    /// match), `Eof`, or (when inside an EEx block body) a clause boundary.
    fn parse_children(&mut self, stop_at_clause_boundary: Option<bool>) -> Vec<Node> {
        let stop_at_clause_boundary = stop_at_clause_boundary.unwrap_or(false);
        let mut nodes = Vec::new();
        loop {
            if self.check(TokenKind::Eof) || self.is_closing_token() {
                break;
            }
            if stop_at_clause_boundary && self.at_clause_boundary() {
                break;
            }
            self.dispatch_child(&mut nodes);
        }
        nodes
    }

    /// Parses the document's top-level nodes. Unlike [`Self::parse_children`]
    /// there is no enclosing tag to hand a closing token back to, so a
    /// stray `tag_close`/`component_close`/`slot_close` here is itself an
    /// error rather than a silent stop.
    fn parse_document(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            if self.check(TokenKind::Eof) {
                break;
            }
            if self.is_closing_token() {
                self.error(format!("Unexpected closing token {:?}", self.current().kind));
                self.advance();
                continue;
            }
            self.dispatch_child(&mut nodes);
        }
        nodes
    }

    fn dispatch_child(&mut self, nodes: &mut Vec<Node>) {
        match self.current().kind {
            TokenKind::Text => {
                let tok = self.advance();
                nodes.push(Node::Text {
                    content: tok.value,
                    span: tok.span,
                });
            }
            TokenKind::TagOpen => nodes.push(self.parse_element()),
            TokenKind::ComponentOpen => nodes.push(self.parse_component()),
            TokenKind::SlotOpen => nodes.push(Node::Slot(self.parse_slot())),
            TokenKind::ExprOpen => nodes.push(self.parse_expression_node()),
            TokenKind::EExOpen => nodes.push(self.parse_eex(EExType::Exec)),
            TokenKind::EExOutput => nodes.push(self.parse_eex(EExType::Output)),
            TokenKind::EExComment => nodes.push(self.parse_eex(EExType::Comment)),
            TokenKind::CommentOpen => nodes.push(self.parse_comment()),
            _ => {
                self.error(format!("Unexpected token {:?}", self.current().kind));
                self.advance();
            }
        }
    }

    fn parse_element(&mut self) -> Node {
        let open = self.expect(TokenKind::TagOpen).expect("checked by caller");
        let tag = open.value;
        let attributes = self.parse_attributes();

        if self.check(TokenKind::TagSelfClose) {
            let close = self.advance();
            return Node::Element {
                tag,
                attributes,
                children: Vec::new(),
                self_closing: true,
                span: Span::new(open.span.start, close.span.end),
            };
        }

        let end = self.expect(TokenKind::TagEnd);
        if is_void_element(&tag) {
            let close_end = end.map(|t| t.span.end).unwrap_or(open.span.end);
            return Node::Element {
                tag,
                attributes,
                children: Vec::new(),
                self_closing: true,
                span: Span::new(open.span.start, close_end),
            };
        }

        let children = self.parse_children(None);
        let close_span = self.expect_tag_close(&tag, TokenKind::TagClose);
        Node::Element {
            tag,
            attributes,
            children,
            self_closing: false,
            span: Span::new(open.span.start, close_span.unwrap_or(open.span.end)),
        }
    }

    fn expect_tag_close(
        &mut self,
        expected_name: &str,
        kind: TokenKind,
    ) -> Option<crate::span::Location> {
        if self.check(kind) {
            let close = self.advance();
            if close.value != expected_name {
                self.error(format!(
                    "Mismatched closing tag: expected </{expected_name}>, got </{}>",
                    close.value
                ));
            }
            Some(close.span.end)
        } else if self.check(TokenKind::Eof) {
            self.error(format!("Expected closing tag </{expected_name}>"));
            None
        } else {
            self.error(format!(
                "Mismatched closing tag: expected </{expected_name}>, got {:?}",
                self.current().kind
            ));
            None
        }
    }

    fn parse_component(&mut self) -> Node {
        let open = self
            .expect(TokenKind::ComponentOpen)
            .expect("checked by caller");
        let name = open.value;
        let component_type = if name.starts_with('.') {
            ComponentType::Local
        } else {
            ComponentType::Remote
        };
        let attributes = self.parse_attributes();

        if self.check(TokenKind::TagSelfClose) {
            let close = self.advance();
            return Node::Component {
                component_type,
                name,
                attributes,
                children: Vec::new(),
                slots: Vec::new(),
                span: Span::new(open.span.start, close.span.end),
            };
        }

        self.expect(TokenKind::TagEnd);

        let mut children = Vec::new();
        let mut slots = Vec::new();
        loop {
            if self.check(TokenKind::ComponentClose) || self.check(TokenKind::Eof) {
                break;
            }
            if self.check(TokenKind::SlotOpen) {
                slots.push(self.parse_slot());
            } else {
                match self.current().kind {
                    TokenKind::Text => {
                        let tok = self.advance();
                        children.push(Node::Text {
                            content: tok.value,
                            span: tok.span,
                        });
                    }
                    TokenKind::TagOpen => children.push(self.parse_element()),
                    TokenKind::ComponentOpen => children.push(self.parse_component()),
                    TokenKind::ExprOpen => children.push(self.parse_expression_node()),
                    TokenKind::EExOpen => children.push(self.parse_eex(EExType::Exec)),
                    TokenKind::EExOutput => children.push(self.parse_eex(EExType::Output)),
                    TokenKind::EExComment => children.push(self.parse_eex(EExType::Comment)),
                    TokenKind::CommentOpen => children.push(self.parse_comment()),
                    TokenKind::TagClose | TokenKind::SlotClose => {
                        self.error(format!("Unexpected token {:?}", self.current().kind));
                        self.advance();
                    }
                    _ => {
                        self.error(format!("Unexpected token {:?}", self.current().kind));
                        self.advance();
                    }
                }
            }
        }

        let close_span = self.expect_tag_close(&name, TokenKind::ComponentClose);
        Node::Component {
            component_type,
            name,
            attributes,
            children,
            slots,
            span: Span::new(open.span.start, close_span.unwrap_or(open.span.end)),
        }
    }

    fn parse_slot(&mut self) -> Slot {
        let open = self.expect(TokenKind::SlotOpen).expect("checked by caller");
        let name = open.value;
        let attributes = self.parse_attributes();
        let let_binding = attributes.iter().find_map(|attr| match attr {
            Attribute::Special { kind, expression } if kind == "let" => {
                Some(expression.code.clone())
            }
            _ => None,
        });

        if self.check(TokenKind::TagSelfClose) {
            let close = self.advance();
            return Slot {
                name,
                attributes,
                children: Vec::new(),
                let_binding,
                span: Span::new(open.span.start, close.span.end),
            };
        }

        self.expect(TokenKind::TagEnd);
        let children = self.parse_children(None);
        let close_span = self.expect_tag_close(&name, TokenKind::SlotClose);
        Slot {
            name,
            attributes,
            children,
            let_binding,
            span: Span::new(open.span.start, close_span.unwrap_or(open.span.end)),
        }
    }

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::TagEnd | TokenKind::TagSelfClose | TokenKind::Eof => break,
                TokenKind::ExprOpen => {
                    let expression = self.parse_expression_value();
                    attributes.push(Attribute::Spread { expression });
                }
                TokenKind::AttrName => {
                    let name_tok = self.advance();
                    let raw_name = name_tok.value;
                    let is_special = raw_name.starts_with(':');
                    let name = if is_special {
                        raw_name.trim_start_matches(':').to_string()
                    } else {
                        raw_name
                    };

                    if self.check(TokenKind::AttrEquals) {
                        self.advance();
                        match self.current().kind {
                            TokenKind::ExprOpen => {
                                let expression = self.parse_expression_value();
                                attributes.push(if is_special {
                                    Attribute::Special {
                                        kind: name,
                                        expression,
                                    }
                                } else {
                                    Attribute::Dynamic { name, expression }
                                });
                            }
                            TokenKind::AttrValue => {
                                let value_tok = self.advance();
                                attributes.push(Attribute::Static {
                                    name,
                                    value: value_tok.value,
                                });
                            }
                            _ => {
                                self.error("Expected attribute value");
                            }
                        }
                    } else {
                        attributes.push(Attribute::Static {
                            name,
                            value: "true".to_string(),
                        });
                    }
                }
                _ => break,
            }
        }
        attributes
    }

    fn parse_expression_value(&mut self) -> Expression {
        let open = self
            .expect(TokenKind::ExprOpen)
            .expect("checked by caller");
        let (code, content_end) = if self.check(TokenKind::ExprContent) {
            let tok = self.advance();
            (tok.value, tok.span.end)
        } else {
            (String::new(), open.span.end)
        };
        let close_end = self
            .expect(TokenKind::ExprClose)
            .map(|t| t.span.end)
            .unwrap_or(content_end);
        Expression::new(code, Span::new(open.span.start, close_end))
    }

    fn parse_expression_node(&mut self) -> Node {
        let start = self.current().span.start;
        let expression = self.parse_expression_value();
        Node::Expression {
            span: Span::new(start, expression.span.end),
            expression,
        }
    }

    fn parse_comment(&mut self) -> Node {
        let open = self
            .expect(TokenKind::CommentOpen)
            .expect("checked by caller");
        let (content, content_end) = if self.check(TokenKind::CommentContent) {
            let tok = self.advance();
            (tok.value, tok.span.end)
        } else {
            (String::new(), open.span.end)
        };
        let close_end = self
            .expect(TokenKind::CommentClose)
            .map(|t| t.span.end)
            .unwrap_or(content_end);
        Node::Comment {
            content,
            span: Span::new(open.span.start, close_end),
        }
    }

    fn parse_eex(&mut self, eex_type: EExType) -> Node {
        let open_kind = self.current().kind;
        let open = self.advance();
        let (code, content_end) = if self.check(TokenKind::EExContent) {
            let tok = self.advance();
            (tok.value, tok.span.end)
        } else {
            (String::new(), open.span.end)
        };
        let close_end = self
            .expect(TokenKind::EExClose)
            .map(|t| t.span.end)
            .unwrap_or(content_end);
        let span = Span::new(open.span.start, close_end);

        if matches!(open_kind, TokenKind::EExOutput) {
            if let Some((block_type, expression)) = split_block_head(&code) {
                return self.parse_eex_block(block_type, expression, span.start);
            }
        }

        Node::EEx {
            eex_type,
            code,
            span,
        }
    }

    /// Builds the clause sequence for an `<%= kind expr do %> ... <% end %>`
    /// block once the opening `do` clause's header has already been
    /// consumed as a single EEx token.
    fn parse_eex_block(
        &mut self,
        block_type: String,
        expression: String,
        start: crate::span::Location,
    ) -> Node {
        let mut clauses = Vec::new();
        let do_children = self.parse_children(Some(true));
        clauses.push(EExClause::new("do", None, do_children));

        let mut end_span = start;
        loop {
            match self.clause_boundary_kind() {
                Some(ClauseBoundary::End) => {
                    let tok = self.consume_clause_header();
                    end_span = tok.span.end;
                    clauses.push(EExClause::new("end", None, Vec::new()));
                    break;
                }
                Some(ClauseBoundary::Else) => {
                    self.consume_clause_header();
                    let body = self.parse_children(Some(true));
                    clauses.push(EExClause::new("else", None, body));
                }
                Some(ClauseBoundary::Arrow(code)) => {
                    let tok = self.consume_clause_header();
                    end_span = tok.span.end;
                    let body = self.parse_children(Some(true));
                    clauses.push(EExClause::new("->", Some(code), body));
                }
                None => {
                    // No terminal `end` clause found; the block closes
                    // silently at whatever boundary stopped `parse_children`
                    // (a sibling closing tag or end of input).
                    break;
                }
            }
        }

        Node::EExBlock {
            block_type,
            expression,
            clauses,
            span: Span::new(start, end_span),
        }
    }

    fn at_clause_boundary(&self) -> bool {
        self.clause_boundary_kind().is_some()
    }

    fn clause_boundary_kind(&self) -> Option<ClauseBoundary> {
        let opens_eex = matches!(self.current().kind, TokenKind::EExOpen | TokenKind::EExOutput);
        if !opens_eex {
            return None;
        }
        let content = match self.peek_kind(1) {
            TokenKind::EExContent => &self.tokens[self.pos + 1].value,
            _ => return None,
        };
        let trimmed = content.trim();
        if trimmed == "end" {
            Some(ClauseBoundary::End)
        } else if trimmed == "else" {
            Some(ClauseBoundary::Else)
        } else if trimmed.contains("->") {
            Some(ClauseBoundary::Arrow(trimmed.to_string()))
        } else {
            None
        }
    }

    /// Consumes the `eex_open`/`eex_content`/`eex_close` triple that forms a
    /// clause header (`<% else %>`, `<% end %>`, `<% pattern -> %>`).
    fn consume_clause_header(&mut self) -> Token {
        self.advance(); // eex_open / eex_output
        self.advance(); // eex_content
        self.advance() // eex_close
    }
}

enum ClauseBoundary {
    End,
    Else,
    Arrow(String),
}

/// Splits a trimmed EEx output body into `(block_type, expression)` if it
/// begins with one of the recognized block keywords followed by whitespace.
/// Strips a literal trailing `" do"` from the expression, if present.
fn split_block_head(code: &str) -> Option<(String, String)> {
    const KEYWORDS: &[&str] = &["if", "for", "case", "cond", "unless"];
    let trimmed = code.trim();
    for keyword in KEYWORDS {
        let prefix = format!("{keyword} ");
        if let Some(rest) = trimmed.strip_prefix(&prefix) {
            let mut expression = rest.trim().to_string();
            if let Some(stripped) = expression.strip_suffix(" do") {
                expression = stripped.to_string();
            }
            return Some((keyword.to_string(), expression));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComponentType;

    #[test]
    fn parses_plain_text() {
        let doc = parse("Hello world").unwrap();
        assert_eq!(doc.children.len(), 1);
        match &doc.children[0] {
            Node::Text { content, .. } => assert_eq!(content, "Hello world"),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_element_with_expression() {
        let doc =
            parse(r#"<div class="container"><span>{@name}</span></div>"#).unwrap();
        let Node::Element {
            tag,
            attributes,
            children,
            ..
        } = &doc.children[0]
        else {
            panic!("expected element");
        };
        assert_eq!(tag, "div");
        assert!(matches!(&attributes[0], Attribute::Static { name, value } if name == "class" && value == "container"));
        let Node::Element {
            tag: inner_tag,
            children: inner_children,
            ..
        } = &children[0]
        else {
            panic!("expected span element");
        };
        assert_eq!(inner_tag, "span");
        assert!(matches!(&inner_children[0], Node::Expression { expression, .. } if expression.code == "@name"));
    }

    #[test]
    fn void_element_has_no_children_and_self_closes() {
        let doc = parse("<img src=\"a.png\">").unwrap();
        match &doc.children[0] {
            Node::Element {
                tag,
                self_closing,
                children,
                ..
            } => {
                assert_eq!(tag, "img");
                assert!(self_closing);
                assert!(children.is_empty());
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn component_with_slots() {
        let doc =
            parse("<.card><:header>Title</:header><:body>B</:body></.card>").unwrap();
        match &doc.children[0] {
            Node::Component {
                component_type,
                name,
                children,
                slots,
                ..
            } => {
                assert_eq!(*component_type, ComponentType::Local);
                assert_eq!(name, ".card");
                assert!(children.is_empty());
                assert_eq!(slots.len(), 2);
                assert_eq!(slots[0].name, "header");
                assert_eq!(slots[1].name, "body");
            }
            other => panic!("expected Component, got {other:?}"),
        }
    }

    #[test]
    fn remote_component_discrimination() {
        let doc = parse("<MyApp.Button>Click</MyApp.Button>").unwrap();
        match &doc.children[0] {
            Node::Component {
                component_type,
                name,
                ..
            } => {
                assert_eq!(*component_type, ComponentType::Remote);
                assert_eq!(name, "MyApp.Button");
            }
            other => panic!("expected Component, got {other:?}"),
        }
    }

    #[test]
    fn special_attributes_and_boolean_attribute() {
        let doc = parse(r#"<li :for={item <- @items} :key={item.id} disabled>{item.name}</li>"#)
            .unwrap();
        let Node::Element { attributes, .. } = &doc.children[0] else {
            panic!("expected element");
        };
        assert!(matches!(&attributes[0], Attribute::Special { kind, expression } if kind == "for" && expression.code == "item <- @items"));
        assert!(matches!(&attributes[1], Attribute::Special { kind, expression } if kind == "key" && expression.code == "item.id"));
        assert!(matches!(&attributes[2], Attribute::Static { name, value } if name == "disabled" && value == "true"));
    }

    #[test]
    fn slot_let_binding() {
        let doc = parse("<.table><:col :let={value}>{value}</:col></.table>").unwrap();
        let Node::Component { slots, .. } = &doc.children[0] else {
            panic!("expected component");
        };
        assert_eq!(slots[0].let_binding.as_deref(), Some("value"));
    }

    #[test]
    fn eex_if_else_block() {
        let doc = parse("<%= if @show do %>yes<% else %>no<% end %>").unwrap();
        let Node::EExBlock {
            block_type,
            expression,
            clauses,
            ..
        } = &doc.children[0]
        else {
            panic!("expected EExBlock");
        };
        assert_eq!(block_type, "if");
        assert_eq!(expression, "@show");
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].clause_type, "do");
        assert_eq!(clauses[1].clause_type, "else");
        assert_eq!(clauses[2].clause_type, "end");
        assert!(matches!(&clauses[0].children[0], Node::Text { content, .. } if content == "yes"));
        assert!(matches!(&clauses[1].children[0], Node::Text { content, .. } if content == "no"));
    }

    #[test]
    fn eex_for_block() {
        let doc = parse("<%= for i <- @list do %>x<% end %>").unwrap();
        let Node::EExBlock {
            block_type,
            expression,
            ..
        } = &doc.children[0]
        else {
            panic!("expected EExBlock");
        };
        assert_eq!(block_type, "for");
        assert_eq!(expression, "i <- @list");
    }

    #[test]
    fn mismatched_closing_tag_is_an_error() {
        assert!(parse("<div></span>").is_err());
        assert!(parse("<div><span></div>").is_err());
        assert!(parse("<.button></.other>").is_err());
    }

    #[test]
    fn spread_attribute() {
        let doc = parse("<div {@extra}></div>").unwrap();
        let Node::Element { attributes, .. } = &doc.children[0] else {
            panic!("expected element");
        };
        assert!(matches!(&attributes[0], Attribute::Spread { expression } if expression.code == "@extra"));
    }
}
