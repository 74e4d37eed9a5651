//! Error taxonomy for the source side (lexer, parser, printer), following
//! the same hand-rolled `Cause` + wrapper shape as `classfile::errors`.

use std::fmt::Display;

use crate::source::token::{Position, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct LexError {
    pub position: Position,
    pub message: String,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lex error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for LexError {}

/// Not used to abort parsing (the parser embeds errors as `Error` nodes
/// instead, per the "error nodes, not exceptions" design), but kept as a
/// standalone type for callers that want a `Result`-shaped summary, e.g.
/// the standalone-expression entry point failing outright on an empty token
/// stream.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub expected: Vec<TokenKind>,
    pub found: Token,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {} (found {:?}, expected one of {:?})", self.message, self.found.kind, self.expected)
    }
}

impl std::error::Error for ParseError {}

/// Surfaced only when the input tree violates its own invariants (missing
/// mandatory children); the printer never tries to repair a malformed tree.
#[derive(Debug, Clone)]
pub struct PrintError {
    pub message: String,
}

impl Display for PrintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pretty-print error: {}", self.message)
    }
}

impl std::error::Error for PrintError {}
