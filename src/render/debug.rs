// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Debug renderer: an indented, human-readable dump of a parsed document.

use crate::ast::{Document, Node, Slot};
use crate::render::Writer;

/// Renders `document` as an indented debug dump.
pub fn render_debug(document: &Document) -> String {
    let mut w = Writer::new();
    w.write_line("Document");
    w.indent();
    for node in &document.children {
        render_node(&mut w, node);
    }
    w.dedent();
    w.finish()
}

fn render_node(w: &mut Writer, node: &Node) {
    match node {
        Node::Text { content, .. } => {
            w.write_line(&format!("Text: \"{}\"", escape_debug(content)));
        }
        Node::Element { tag, children, .. } => {
            w.write_line(&format!("Element: <{tag}>"));
            w.indent();
            for child in children {
                render_node(w, child);
            }
            w.dedent();
        }
        Node::Component {
            name,
            children,
            slots,
            ..
        } => {
            w.write_line(&format!("Component: {name}"));
            w.indent();
            for child in children {
                render_node(w, child);
            }
            for slot in slots {
                render_slot(w, slot);
            }
            w.dedent();
        }
        Node::Slot(slot) => render_slot(w, slot),
        Node::Expression { expression, .. } => {
            w.write_line(&format!("Expression: {{{}}}", expression.code));
        }
        Node::EEx { eex_type, code, .. } => {
            w.write_line(&format!("EEx({eex_type:?}): {code}"));
        }
        Node::EExBlock {
            block_type,
            expression,
            clauses,
            ..
        } => {
            w.write_line(&format!("EExBlock({block_type}): {expression}"));
            w.indent();
            for clause in clauses {
                w.write_line(&format!("Clause: {}", clause.clause_type));
                w.indent();
                for child in &clause.children {
                    render_node(w, child);
                }
                w.dedent();
            }
            w.dedent();
        }
        Node::Comment { content, .. } => {
            w.write_line(&format!("Comment: {content}"));
        }
    }
}

fn render_slot(w: &mut Writer, slot: &Slot) {
    w.write_line(&format!("Slot: <:{}>", slot.name));
    w.indent();
    for child in &slot.children {
        render_node(w, child);
    }
    w.dedent();
}

/// Shows newline, carriage return, and tab as their backslash escapes so a
/// multi-line text node still prints on one dump line.
fn escape_debug(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn dumps_element_tree_with_indentation() {
        let doc = parse("<div><span>hi</span></div>").unwrap();
        let dump = render_debug(&doc);
        assert!(dump.starts_with("Document\n"));
        assert!(dump.contains("  Element: <div>\n"));
        assert!(dump.contains("    Element: <span>\n"));
        assert!(dump.contains("      Text: \"hi\"\n"));
    }

    #[test]
    fn escapes_control_characters_in_text() {
        let doc = parse("a\nb\tc").unwrap();
        let dump = render_debug(&doc);
        assert!(dump.contains(r#"Text: "a\nb\tc""#));
    }

    #[test]
    fn dumps_component_slots() {
        let doc = parse("<.card><:header>Title</:header></.card>").unwrap();
        let dump = render_debug(&doc);
        assert!(dump.contains("Component: .card"));
        assert!(dump.contains("Slot: <:header>"));
    }
}
