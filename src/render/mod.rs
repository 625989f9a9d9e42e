// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Renderers turning a parsed [`Document`](crate::ast::Document) back into
//! text, in three independent formats: [`html`], [`debug`], and [`json`].
//!
//! Each renderer is a single post-order tree walk that differs only in what
//! it pushes through the shared [`Writer`] accumulator — none of the three
//! hold state beyond the buffer and indent level.

pub mod debug;
pub mod html;
pub mod json;

/// An indent-tracking string accumulator shared by all three renderers.
///
/// Mirrors the output/indent-level bookkeeping of a hand-rolled code
/// generator: callers push literal text with [`Writer::write`], manage
/// newlines and indentation explicitly with [`Writer::write_line`],
/// [`Writer::indent`], and [`Writer::dedent`], and finally take the
/// accumulated buffer with [`Writer::finish`].
#[derive(Debug, Default)]
pub struct Writer {
    output: String,
    indent_level: usize,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` verbatim, with no indentation or trailing newline.
    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Appends the current indentation, `text`, and a trailing newline.
    pub fn write_line(&mut self, text: &str) {
        self.output.push_str(&"  ".repeat(self.indent_level));
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Increases the indentation level by one step.
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decreases the indentation level by one step.
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Consumes the writer, returning the accumulated output.
    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_line_respects_indent_level() {
        let mut w = Writer::new();
        w.write_line("a");
        w.indent();
        w.write_line("b");
        w.dedent();
        w.write_line("c");
        assert_eq!(w.finish(), "a\n  b\nc\n");
    }

    #[test]
    fn dedent_past_zero_stays_at_zero() {
        let mut w = Writer::new();
        w.dedent();
        w.write_line("x");
        assert_eq!(w.finish(), "x\n");
    }
}
