// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTML renderer: a round-trippable, depth-first pre-order walk.

use crate::ast::{Attribute, Document, EExType, Node, Slot};
use crate::render::Writer;

/// Renders `document` back to an HTML-like string.
pub fn render_html(document: &Document) -> String {
    let mut writer = Writer::new();
    for node in &document.children {
        render_node(&mut writer, node);
    }
    writer.finish()
}

fn render_node(w: &mut Writer, node: &Node) {
    match node {
        Node::Text { content, .. } => w.write(&escape_text(content)),
        Node::Element {
            tag,
            attributes,
            children,
            self_closing,
            ..
        } => {
            w.write("<");
            w.write(tag);
            render_attributes(w, attributes);
            if *self_closing {
                w.write(" />");
            } else {
                w.write(">");
                for child in children {
                    render_node(w, child);
                }
                w.write("</");
                w.write(tag);
                w.write(">");
            }
        }
        Node::Component {
            name,
            attributes,
            children,
            slots,
            ..
        } => {
            w.write("<");
            w.write(name);
            render_attributes(w, attributes);
            if children.is_empty() && slots.is_empty() {
                w.write(" />");
            } else {
                w.write(">");
                for child in children {
                    render_node(w, child);
                }
                for slot in slots {
                    render_slot(w, slot);
                }
                w.write("</");
                w.write(name);
                w.write(">");
            }
        }
        Node::Slot(slot) => render_slot(w, slot),
        Node::Expression { expression, .. } => {
            w.write("{");
            w.write(&expression.code);
            w.write("}");
        }
        Node::EEx { eex_type, code, .. } => {
            let prefix = match eex_type {
                EExType::Output => "<%=",
                EExType::Exec => "<%",
                EExType::Comment => "<%#",
            };
            w.write(prefix);
            w.write(" ");
            w.write(code);
            w.write(" %>");
        }
        Node::EExBlock {
            block_type,
            expression,
            clauses,
            ..
        } => {
            w.write("<%= ");
            w.write(block_type);
            w.write(" ");
            w.write(expression);
            w.write(" do %>");
            for clause in clauses {
                match clause.clause_type.as_str() {
                    "do" => {
                        for child in &clause.children {
                            render_node(w, child);
                        }
                    }
                    "else" => {
                        w.write("<% else %>");
                        for child in &clause.children {
                            render_node(w, child);
                        }
                    }
                    "end" => w.write("<% end %>"),
                    _ => {
                        w.write("<% ");
                        w.write(clause.expression.as_deref().unwrap_or(""));
                        w.write(" %>");
                        for child in &clause.children {
                            render_node(w, child);
                        }
                    }
                }
            }
        }
        Node::Comment { content, .. } => {
            w.write("<!--");
            w.write(content);
            w.write("-->");
        }
    }
}

fn render_slot(w: &mut Writer, slot: &Slot) {
    w.write("<:");
    w.write(&slot.name);
    render_attributes(w, &slot.attributes);
    if slot.children.is_empty() {
        w.write(" />");
    } else {
        w.write(">");
        for child in &slot.children {
            render_node(w, child);
        }
        w.write("</:");
        w.write(&slot.name);
        w.write(">");
    }
}

fn render_attributes(w: &mut Writer, attributes: &[Attribute]) {
    for attr in attributes {
        match attr {
            Attribute::Static { name, value } => {
                w.write(" ");
                w.write(name);
                w.write("=\"");
                w.write(&escape_attr_value(value));
                w.write("\"");
            }
            Attribute::Dynamic { name, expression } => {
                w.write(" ");
                w.write(name);
                w.write("={");
                w.write(&expression.code);
                w.write("}");
            }
            Attribute::Spread { expression } => {
                w.write(" {");
                w.write(&expression.code);
                w.write("}");
            }
            Attribute::Special { kind, expression } => {
                w.write(" :");
                w.write(kind);
                w.write("={");
                w.write(&expression.code);
                w.write("}");
            }
        }
    }
}

/// Escapes `&`, `<`, and `>` as named entities, in that order so entities
/// introduced by the first pass are never re-escaped.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `escape_text` plus `"` → `&quot;`, for static attribute values.
fn escape_attr_value(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(source: &str) -> String {
        render_html(&parse(source).unwrap())
    }

    #[test]
    fn plain_text_is_idempotent() {
        assert_eq!(roundtrip("Hello world"), "Hello world");
    }

    #[test]
    fn empty_element_is_idempotent() {
        assert_eq!(roundtrip("<div></div>"), "<div></div>");
    }

    #[test]
    fn text_with_expression_is_idempotent() {
        assert_eq!(roundtrip("Hello {@name}!"), "Hello {@name}!");
    }

    #[test]
    fn eex_output_is_idempotent() {
        assert_eq!(roundtrip("<%= @name %>"), "<%= @name %>");
    }

    #[test]
    fn component_with_slot_round_trips() {
        let source = "<.card><:header>Title</:header></.card>";
        let rendered = roundtrip(source);
        assert_eq!(rendered, source);
        // must parse again without error
        assert!(crate::parser::parse(&rendered).is_ok());
    }

    #[test]
    fn escapes_text_entities() {
        let html = render_html(&crate::parser::parse("a & b < c > d").unwrap());
        assert_eq!(html, "a &amp; b &lt; c &gt; d");
    }

    #[test]
    fn escapes_quote_in_static_attribute() {
        let html = render_html(&crate::parser::parse(r#"<div title='a " b'></div>"#).unwrap());
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn void_element_self_closes() {
        assert_eq!(roundtrip(r#"<img src="a.png" />"#), r#"<img src="a.png" />"#);
    }

    #[test]
    fn if_else_block_round_trips_and_reparses() {
        let source = "<%= if @show do %>yes<% else %>no<% end %>";
        let rendered = roundtrip(source);
        assert_eq!(rendered, source);
        assert!(crate::parser::parse(&rendered).is_ok());
    }
}
