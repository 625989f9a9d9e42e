// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Hand-written scanner for HEEx source text.
//!
//! The scanner makes a single left-to-right pass over the input and never
//! backtracks the cursor. At each position it dispatches, in order, on: an
//! EEx tag open (`<%`), an HTML comment open (`<!--`), a markup tag open
//! (`<`), a curly-brace expression open (`{`), or else a run of plain text.
//!
//! | Token | Emitted on | Value |
//! |---|---|---|
//! | `Text` | run of non-special chars | decoded run |
//! | `TagOpen` | `<name` | tag name |
//! | `TagClose` | `</name>` | tag name |
//! | `TagSelfClose` | `/>` | `"/>"` |
//! | `TagEnd` | `>` | `">"` |
//! | `ComponentOpen` | `<.name` or `<Name` | `.name` or `Name.Path` |
//! | `ComponentClose` | `</.name>` or `</Name.Path>` | same |
//! | `SlotOpen` | `<:name` | name |
//! | `SlotClose` | `</:name>` | name |
//! | `AttrName` | identifier before `=` or bool attr | name (with `:`) |
//! | `AttrEquals` | `=` | `"="` |
//! | `AttrValue` | quoted or unquoted RHS | decoded value |
//! | `ExprOpen`/`ExprContent`/`ExprClose` | `{...}` | `{`, body, `}` |
//! | `EExOpen`/`EExOutput`/`EExComment` | `<%`, `<%=`, `<%#` | literal prefix |
//! | `EExContent` | body up to `%>` | trimmed body |
//! | `EExClose` | `%>` | `"%>"` |
//! | `CommentOpen`/`CommentContent`/`CommentClose` | `<!--...-->` | literal parts |
//! | `Eof` | end of input | `""` |
//!
//! Errors never stop the scan: they are appended to an internal list and,
//! if non-empty once the input is exhausted, raised together as a single
//! [`HeexError::Scan`] with every message joined by newlines.

use tracing::trace;

use crate::error::{HeexError, Result};
use crate::span::{Location, Span};
use crate::token::{Token, TokenKind};

/// Tokenizes `source` into a token stream, always terminated by `Eof`.
///
/// Returns a composite [`HeexError::Scan`] if the scanner recorded any
/// errors; no partial token stream is returned on failure.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new(source);
    scanner.run();
    if scanner.errors.is_empty() {
        Ok(scanner.tokens)
    } else {
        Err(HeexError::scan(&scanner.errors))
    }
}

struct Scanner<'src> {
    source: &'src str,
    remaining: &'src str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<String>,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column, self.pos)
    }

    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.remaining = &self.remaining[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn advance_if_any(&mut self) {
        if self.peek().is_some() {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn push_token(&mut self, kind: TokenKind, value: impl Into<String>, start: Location) {
        let value = value.into();
        let span = Span::new(start, self.location());
        trace!(?kind, ?span, %value, "token");
        self.tokens.push(Token::new(kind, value, span));
    }

    fn error(&mut self, message: impl Into<String>, at: Location) {
        self.errors
            .push(format!("{}:{}: {}", at.line, at.column, message.into()));
    }

    fn run(&mut self) {
        loop {
            if self.remaining.is_empty() {
                let here = self.location();
                self.push_token(TokenKind::Eof, "", here);
                break;
            }
            self.scan_one();
        }
    }

    fn scan_one(&mut self) {
        if self.starts_with("<%") {
            self.scan_eex();
        } else if self.starts_with("<!--") {
            self.scan_comment();
        } else if self.peek() == Some('<') {
            self.scan_tag();
        } else if self.peek() == Some('{') {
            self.scan_expression();
        } else {
            self.scan_text();
        }
    }

    fn scan_text(&mut self) {
        let start = self.location();
        let mut buf = String::new();
        while let Some(c) = self.peek() {
            if c == '<' || c == '{' {
                break;
            }
            buf.push(c);
            self.advance();
        }
        if !buf.is_empty() {
            self.push_token(TokenKind::Text, buf, start);
        }
    }

    fn scan_eex(&mut self) {
        let start = self.location();
        self.advance_n(2); // "<%"
        let (kind, literal) = if self.peek() == Some('=') {
            self.advance();
            (TokenKind::EExOutput, "<%=")
        } else if self.peek() == Some('#') {
            self.advance();
            (TokenKind::EExComment, "<%#")
        } else {
            (TokenKind::EExOpen, "<%")
        };
        self.push_token(kind, literal, start);

        let content_start = self.location();
        let mut buf = String::new();
        let mut closed = false;
        while self.peek().is_some() {
            if self.starts_with("%>") {
                closed = true;
                break;
            }
            buf.push(self.advance().unwrap());
        }
        if !closed {
            self.error("Unterminated EEx expression", start);
            return;
        }
        self.push_token(TokenKind::EExContent, buf.trim().to_string(), content_start);
        let close_start = self.location();
        self.advance_n(2); // "%>"
        self.push_token(TokenKind::EExClose, "%>", close_start);
    }

    fn scan_comment(&mut self) {
        let start = self.location();
        self.advance_n(4); // "<!--"
        self.push_token(TokenKind::CommentOpen, "<!--", start);

        let content_start = self.location();
        let mut buf = String::new();
        let mut closed = false;
        while self.peek().is_some() {
            if self.starts_with("-->") {
                closed = true;
                break;
            }
            buf.push(self.advance().unwrap());
        }
        if !closed {
            self.error("Unterminated comment", start);
            return;
        }
        self.push_token(TokenKind::CommentContent, buf, content_start);
        let close_start = self.location();
        self.advance_n(3); // "-->"
        self.push_token(TokenKind::CommentClose, "-->", close_start);
    }

    fn scan_tag(&mut self) {
        let start = self.location();
        self.advance(); // '<'
        match self.peek() {
            Some('/') => self.scan_closing_tag(start),
            Some(':') => self.scan_slot_open(start),
            Some('.') => self.scan_component_open(start),
            _ => self.scan_opening_tag(start),
        }
    }

    fn expect_gt(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some('>') {
            self.advance();
        } else {
            let here = self.location();
            self.error("Expected >", here);
        }
    }

    fn scan_closing_tag(&mut self, start: Location) {
        self.advance(); // '/'
        match self.peek() {
            Some(':') => {
                self.advance();
                let name = self.read_name();
                self.expect_gt();
                self.push_token(TokenKind::SlotClose, name, start);
            }
            Some('.') => {
                self.advance();
                let name = self.read_name();
                self.expect_gt();
                self.push_token(TokenKind::ComponentClose, format!(".{name}"), start);
            }
            _ => {
                let name = self.read_name();
                self.expect_gt();
                let kind = if starts_uppercase(&name) {
                    TokenKind::ComponentClose
                } else {
                    TokenKind::TagClose
                };
                self.push_token(kind, name, start);
            }
        }
    }

    fn scan_slot_open(&mut self, start: Location) {
        self.advance(); // ':'
        let name = self.read_name();
        if name.is_empty() {
            self.error("Expected slot name after <:", start);
        }
        self.push_token(TokenKind::SlotOpen, name, start);
        self.scan_attributes();
        self.scan_tag_close();
    }

    fn scan_component_open(&mut self, start: Location) {
        self.advance(); // '.'
        let name = self.read_name();
        if name.is_empty() {
            self.error("Expected component name after <.", start);
        }
        self.push_token(TokenKind::ComponentOpen, format!(".{name}"), start);
        self.scan_attributes();
        self.scan_tag_close();
    }

    fn scan_opening_tag(&mut self, start: Location) {
        let name = self.read_name();
        if name.is_empty() {
            self.error("Expected tag name after <", start);
        }
        let kind = if starts_uppercase(&name) {
            TokenKind::ComponentOpen
        } else {
            TokenKind::TagOpen
        };
        self.push_token(kind, name, start);
        self.scan_attributes();
        self.scan_tag_close();
    }

    fn scan_tag_close(&mut self) {
        self.skip_whitespace();
        let start = self.location();
        if self.starts_with("/>") {
            self.advance_n(2);
            self.push_token(TokenKind::TagSelfClose, "/>", start);
        } else if self.peek() == Some('>') {
            self.advance();
            self.push_token(TokenKind::TagEnd, ">", start);
        } else if self.peek().is_none() {
            self.error("Unterminated tag", start);
        } else {
            self.error("Expected > or /> to close tag", start);
            self.advance_if_any();
        }
    }

    fn read_name(&mut self) -> String {
        let mut buf = String::new();
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                buf.push(c);
                self.advance();
            }
            _ => return buf,
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                buf.push(c);
                self.advance();
            } else {
                break;
            }
        }
        buf
    }

    fn scan_attributes(&mut self) {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some('>') | Some('/') => break,
                Some('{') => self.scan_expression(),
                Some(':') => {
                    let start = self.location();
                    self.advance();
                    let name = self.read_name();
                    if name.is_empty() {
                        self.error("Expected attribute name", start);
                        self.advance_if_any();
                        continue;
                    }
                    self.push_token(TokenKind::AttrName, format!(":{name}"), start);
                    self.scan_attr_value_if_present();
                }
                Some(_) => {
                    let start = self.location();
                    let name = self.read_name();
                    if name.is_empty() {
                        self.error("Expected attribute name", start);
                        self.advance_if_any();
                        continue;
                    }
                    self.push_token(TokenKind::AttrName, name, start);
                    self.scan_attr_value_if_present();
                }
            }
        }
    }

    fn scan_attr_value_if_present(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some('=') {
            let start = self.location();
            self.advance();
            self.push_token(TokenKind::AttrEquals, "=", start);
            self.skip_whitespace();
            self.scan_attr_value();
        }
    }

    fn scan_attr_value(&mut self) {
        match self.peek() {
            Some('{') => self.scan_expression(),
            Some(q) if q == '"' || q == '\'' => {
                let start = self.location();
                self.advance(); // opening quote
                let mut buf = String::new();
                let mut closed = false;
                while let Some(c) = self.peek() {
                    if c == q {
                        self.advance();
                        closed = true;
                        break;
                    }
                    buf.push(c);
                    self.advance();
                }
                if !closed {
                    self.error("Unterminated string", start);
                }
                self.push_token(TokenKind::AttrValue, buf, start);
            }
            _ => {
                let start = self.location();
                let mut buf = String::new();
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' || c == '/' {
                        break;
                    }
                    buf.push(c);
                    self.advance();
                }
                self.push_token(TokenKind::AttrValue, buf, start);
            }
        }
    }

    fn scan_expression(&mut self) {
        let open_start = self.location();
        self.advance(); // '{'
        self.push_token(TokenKind::ExprOpen, "{", open_start);

        let content_start = self.location();
        let mut buf = String::new();
        let mut depth: usize = 1;
        let mut close_start = None;

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    depth += 1;
                    buf.push(c);
                    self.advance();
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close_start = Some(self.location());
                        self.advance();
                        break;
                    }
                    buf.push(c);
                    self.advance();
                }
                '"' | '\'' => {
                    let quote = c;
                    buf.push(c);
                    self.advance();
                    self.scan_into_matching_quote(&mut buf, quote);
                }
                _ => {
                    buf.push(c);
                    self.advance();
                }
            }
        }

        let close_start = match close_start {
            Some(loc) => loc,
            None => {
                self.error("Unterminated expression", open_start);
                return;
            }
        };
        self.push_token(TokenKind::ExprContent, buf, content_start);
        self.push_token(TokenKind::ExprClose, "}", close_start);
    }

    /// Copies characters into `buf` up to and including the next `quote`,
    /// treating a single backslash as escaping the character after it.
    fn scan_into_matching_quote(&mut self, buf: &mut String, quote: char) {
        loop {
            match self.peek() {
                None => break,
                Some('\\') => {
                    buf.push('\\');
                    self.advance();
                    if let Some(next) = self.peek() {
                        buf.push(next);
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    buf.push(c);
                    self.advance();
                    break;
                }
                Some(c) => {
                    buf.push(c);
                    self.advance();
                }
            }
        }
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_element_open_close() {
        assert_eq!(
            kinds("<div>"),
            vec![TokenKind::TagOpen, TokenKind::TagEnd, TokenKind::Eof]
        );
        assert_eq!(kinds("</div>"), vec![TokenKind::TagClose, TokenKind::Eof]);
    }

    #[test]
    fn self_closing_void_element() {
        assert_eq!(
            kinds("<br/>"),
            vec![TokenKind::TagOpen, TokenKind::TagSelfClose, TokenKind::Eof]
        );
    }

    #[test]
    fn local_component_open() {
        let tokens = tokenize("<.button>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ComponentOpen);
        assert_eq!(tokens[0].value, ".button");
        assert_eq!(tokens[1].kind, TokenKind::TagEnd);
    }

    #[test]
    fn slot_open() {
        let tokens = tokenize("<:header>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::SlotOpen);
        assert_eq!(tokens[0].value, "header");
    }

    #[test]
    fn expression_tokens() {
        let tokens = tokenize("{@name}").unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::ExprOpen,
                TokenKind::ExprContent,
                TokenKind::ExprClose,
                TokenKind::Eof
            ]
        );
        assert_eq!(tokens[1].value, "@name");
    }

    #[test]
    fn eex_output_tokens() {
        let tokens = tokenize("<%= @name %>").unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::EExOutput,
                TokenKind::EExContent,
                TokenKind::EExClose,
                TokenKind::Eof
            ]
        );
        assert_eq!(tokens[1].value, "@name");
    }

    #[test]
    fn comment_tokens() {
        let tokens = tokenize("<!-- x -->").unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::CommentOpen,
                TokenKind::CommentContent,
                TokenKind::CommentClose,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn nested_braces_stay_one_expression() {
        let tokens = tokenize("{%{a: 1}}").unwrap();
        let contents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ExprContent)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(contents, vec!["%{a: 1}"]);
    }

    #[test]
    fn brace_inside_string_does_not_open_expression() {
        let tokens = tokenize(r#"{"hello {world}"}"#).unwrap();
        let contents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ExprContent)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(contents, vec![r#""hello {world}""#]);
    }

    #[test]
    fn remote_component_is_uppercase_led() {
        let tokens = tokenize("<MyApp.Button>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ComponentOpen);
        assert_eq!(tokens[0].value, "MyApp.Button");
    }

    #[test]
    fn unterminated_expression_is_an_error() {
        assert!(tokenize("{@name").is_err());
    }

    #[test]
    fn unterminated_eex_is_an_error() {
        assert!(tokenize("<%= @name").is_err());
    }

    #[test]
    fn attribute_classification_tokens() {
        let tokens = tokenize(r#"<div class="c" disabled :if={@x}></div>"#).unwrap();
        let names: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::AttrName)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(names, vec!["class", "disabled", ":if"]);
    }
}
