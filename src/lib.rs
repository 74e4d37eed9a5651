//! `jcore`: a Java toolchain core — a JVM class-file decoder (via the
//! `classfile` crate), a hand-written Java source lexer and parser, and a
//! `Node`-tree pretty-printer, unified by a presentation-only `ClassModel`.
//!
//! Four public operations make up the contract this core exposes to CLI
//! and encoder collaborators (JSON/line-form/pseudo-source output, which
//! are not part of this crate):
//!
//! - [`classfile::parse_class`] — decode class-file bytes into a [`classfile::Class`].
//! - [`source::parse_source`] — parse Java source bytes into a [`source::Node`] tree plus comments.
//! - [`printer::pretty_print`] — re-render a `Node` tree as normalized Java source.
//! - [`model::ClassModel::from_class`] / [`model::ClassModel::from_node`] — lower either tree into a `ClassModel`.

pub mod errors;
pub mod model;
pub mod printer;
pub mod source;

pub use classfile::{parse_class, Class};
pub use model::ClassModel;
pub use printer::{pretty_print, PrintOptions};
pub use source::{parse_expression_standalone, parse_source, Node, NodeKind, ParseResult, ParserOptions};
