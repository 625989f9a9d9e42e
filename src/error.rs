// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the HEEx parser.
//!
//! Both the scanner and the tree builder accumulate diagnostics internally
//! and, rather than stopping at the first problem, run to completion. If
//! that internal list is non-empty at the end of a stage, a single
//! [`HeexError`] is raised carrying every message joined by newlines. No
//! partial tree is ever exposed to callers.

use thiserror::Error;

/// The error type for HEEx tokenizing and parsing.
///
/// Each variant carries a composite message: every diagnostic collected
/// during that stage, joined by newlines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeexError {
    /// The scanner collected one or more errors while tokenizing.
    #[error("failed to scan template:\n{0}")]
    Scan(String),

    /// The tree builder collected one or more errors while building the
    /// document.
    #[error("failed to parse template:\n{0}")]
    Parse(String),
}

impl HeexError {
    /// Builds a [`HeexError::Scan`] from a list of `line:column: message`
    /// diagnostics, joining them with newlines.
    pub fn scan(messages: &[String]) -> Self {
        Self::Scan(messages.join("\n"))
    }

    /// Builds a [`HeexError::Parse`] from a list of `offset: message`
    /// diagnostics, joining them with newlines.
    pub fn parse(messages: &[String]) -> Self {
        Self::Parse(messages.join("\n"))
    }
}

/// Convenience type alias for Results with [`HeexError`].
pub type Result<T> = std::result::Result<T, HeexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_joins_messages_with_newlines() {
        let err = HeexError::scan(&["1:1: Expected tag name".to_string(), "2:3: bad".to_string()]);
        match err {
            HeexError::Scan(msg) => assert_eq!(msg, "1:1: Expected tag name\n2:3: bad"),
            _ => panic!("expected Scan variant"),
        }
    }

    #[test]
    fn parse_joins_messages_with_newlines() {
        let err = HeexError::parse(&["5: Mismatched closing tag".to_string()]);
        match err {
            HeexError::Parse(msg) => assert_eq!(msg, "5: Mismatched closing tag"),
            _ => panic!("expected Parse variant"),
        }
    }

    #[test]
    fn display_includes_messages() {
        let err = HeexError::scan(&["boom".to_string()]);
        let text = err.to_string();
        assert!(text.contains("boom"));
    }
}
