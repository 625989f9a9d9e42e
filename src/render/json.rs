// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Compact JSON renderer.
//!
//! Hand-rolled rather than built on `serde_json`: the shape is small,
//! fixed, and compatibility-sensitive (exact key and variant names), so a
//! direct string builder keeps the contract explicit instead of hiding it
//! behind a derived `Serialize` impl.

use crate::ast::{Attribute, ComponentType, Document, EExClause, EExType, Node, Slot};
use crate::render::Writer;

/// Renders `document` as a compact JSON string.
pub fn render_json(document: &Document) -> String {
    let mut w = Writer::new();
    w.write("{\"type\":\"document\",\"children\":");
    write_node_array(&mut w, &document.children);
    w.write("}");
    w.finish()
}

fn write_node_array(w: &mut Writer, nodes: &[Node]) {
    w.write("[");
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            w.write(",");
        }
        write_node(w, node);
    }
    w.write("]");
}

fn write_node(w: &mut Writer, node: &Node) {
    match node {
        Node::Text { content, .. } => {
            w.write("{\"type\":\"text\",\"content\":");
            write_string(w, content);
            w.write("}");
        }
        Node::Element {
            tag,
            attributes,
            children,
            ..
        } => {
            w.write("{\"type\":\"element\",\"tag\":");
            write_string(w, tag);
            w.write(",\"attributes\":");
            write_attribute_array(w, attributes);
            w.write(",\"children\":");
            write_node_array(w, children);
            w.write("}");
        }
        Node::Component {
            component_type,
            name,
            attributes,
            children,
            slots,
            ..
        } => {
            w.write("{\"type\":\"component\",\"componentType\":\"");
            w.write(match component_type {
                ComponentType::Local => "local",
                ComponentType::Remote => "remote",
            });
            w.write("\",\"name\":");
            write_string(w, name);
            w.write(",\"attributes\":");
            write_attribute_array(w, attributes);
            w.write(",\"children\":");
            write_node_array(w, children);
            w.write(",\"slots\":[");
            for (i, slot) in slots.iter().enumerate() {
                if i > 0 {
                    w.write(",");
                }
                write_slot(w, slot);
            }
            w.write("]}");
        }
        Node::Slot(slot) => write_slot(w, slot),
        Node::Expression { expression, .. } => {
            w.write("{\"type\":\"expression\",\"code\":");
            write_string(w, &expression.code);
            w.write("}");
        }
        Node::EEx { eex_type, code, .. } => {
            w.write("{\"type\":\"eex\",\"eexType\":\"");
            w.write(match eex_type {
                EExType::Output => "output",
                EExType::Exec => "exec",
                EExType::Comment => "comment",
            });
            w.write("\",\"code\":");
            write_string(w, code);
            w.write("}");
        }
        Node::EExBlock {
            block_type,
            expression,
            clauses,
            ..
        } => {
            w.write("{\"type\":\"eex_block\",\"kind\":");
            write_string(w, block_type);
            w.write(",\"expression\":");
            write_string(w, expression);
            w.write(",\"clauses\":[");
            for (i, clause) in clauses.iter().enumerate() {
                if i > 0 {
                    w.write(",");
                }
                write_clause(w, clause);
            }
            w.write("]}");
        }
        Node::Comment { content, .. } => {
            w.write("{\"type\":\"comment\",\"content\":");
            write_string(w, content);
            w.write("}");
        }
    }
}

fn write_slot(w: &mut Writer, slot: &Slot) {
    w.write("{\"type\":\"slot\",\"name\":");
    write_string(w, &slot.name);
    w.write(",\"attributes\":");
    write_attribute_array(w, &slot.attributes);
    w.write(",\"children\":");
    write_node_array(w, &slot.children);
    w.write("}");
}

fn write_clause(w: &mut Writer, clause: &EExClause) {
    w.write("{\"type\":\"clause\",\"kind\":");
    write_string(w, &clause.clause_type);
    w.write(",\"expression\":");
    match &clause.expression {
        Some(expr) => write_string(w, expr),
        None => w.write("null"),
    }
    w.write(",\"children\":");
    write_node_array(w, &clause.children);
    w.write("}");
}

fn write_attribute_array(w: &mut Writer, attributes: &[Attribute]) {
    w.write("[");
    for (i, attr) in attributes.iter().enumerate() {
        if i > 0 {
            w.write(",");
        }
        write_attribute(w, attr);
    }
    w.write("]");
}

fn write_attribute(w: &mut Writer, attr: &Attribute) {
    match attr {
        Attribute::Static { name, value } => {
            w.write("{\"type\":\"static\",\"name\":");
            write_string(w, name);
            w.write(",\"value\":");
            write_string(w, value);
            w.write("}");
        }
        Attribute::Dynamic { name, expression } => {
            w.write("{\"type\":\"dynamic\",\"name\":");
            write_string(w, name);
            w.write(",\"code\":");
            write_string(w, &expression.code);
            w.write("}");
        }
        Attribute::Spread { expression } => {
            w.write("{\"type\":\"spread\",\"code\":");
            write_string(w, &expression.code);
            w.write("}");
        }
        Attribute::Special { kind, expression } => {
            w.write("{\"type\":\"special\",\"kind\":");
            write_string(w, kind);
            w.write(",\"code\":");
            write_string(w, &expression.code);
            w.write("}");
        }
    }
}

/// Writes `value` as a quoted, escaped JSON string.
fn write_string(w: &mut Writer, value: &str) {
    w.write("\"");
    for c in value.chars() {
        match c {
            '"' => w.write("\\\""),
            '\\' => w.write("\\\\"),
            '\n' => w.write("\\n"),
            '\r' => w.write("\\r"),
            '\t' => w.write("\\t"),
            c => {
                let mut buf = [0u8; 4];
                w.write(c.encode_utf8(&mut buf));
            }
        }
    }
    w.write("\"");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn envelope_is_a_document_object() {
        let json = render_json(&parse("Hello").unwrap());
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("\"type\":\"document\""));
    }

    #[test]
    fn local_component_type_is_reported() {
        let json = render_json(&parse("<.button>Click</.button>").unwrap());
        assert!(json.contains("\"componentType\":\"local\""));
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_strings() {
        let json = render_json(&parse(r#"say "hi" \ ok"#).unwrap());
        assert!(json.contains(r#"\"hi\""#));
        assert!(json.contains(r"\\"));
    }
}
