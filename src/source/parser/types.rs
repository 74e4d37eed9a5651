//! Type syntax: `Type`, `ArrayType`, type arguments, wildcards, and type
//! parameters. A type's own argument list (`List<String>`) is folded in as
//! a `TypeArguments` child of `Type` rather than a separate
//! `ParameterizedType` node; nothing here distinguishes the two shapes.

use super::Parser;
use crate::source::ast::{Node, NodeKind};
use crate::source::token::TokenKind;

fn primitive_kind(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Char
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Void
    )
}

/// Parses a type reference: a primitive or a possibly-qualified class name,
/// optionally followed by a type-argument list, optionally followed by one
/// or more `[]` array suffixes (or `...` for the last formal parameter,
/// handled by the caller).
pub fn parse_type(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut children = Vec::new();

    if primitive_kind(p.current().kind) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
    } else {
        children.push(parse_qualified_name(p));
        if p.at(TokenKind::Lt) {
            if let Some(type_args) = try_parse_type_arguments(p) {
                children.push(type_args);
            }
        }
    }

    let mut node = Node::branch(NodeKind::Type, p.span_from(&start), children);

    let mut array_dims = 0;
    while p.at(TokenKind::LBracket) && p.peek_kind(1) == TokenKind::RBracket {
        p.bump();
        p.bump();
        array_dims += 1;
    }
    if array_dims > 0 {
        let span = p.span_from(&start);
        node = Node::branch(NodeKind::ArrayType, span, vec![node]);
        for _ in 1..array_dims {
            let span = node.span.clone();
            node = Node::branch(NodeKind::ArrayType, span, vec![node]);
        }
    }
    node
}

fn parse_qualified_name(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut parts = vec![Node::leaf(NodeKind::Identifier, p.bump())];
    while p.at(TokenKind::Dot) && p.peek_kind(1) == TokenKind::Identifier {
        p.bump();
        parts.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    if parts.len() == 1 {
        parts.pop().unwrap()
    } else {
        Node::branch(NodeKind::QualifiedName, p.span_from(&start), parts)
    }
}

/// Speculatively parses `<Type, Type, ...>`. On any mismatch, rewinds and
/// returns `None` so the caller (expression parsing, generally) can fall
/// back to treating `<` as a comparison operator.
pub fn try_parse_type_arguments(p: &mut Parser) -> Option<Node> {
    let checkpoint = p.checkpoint();
    let start = p.current().span.start.clone();
    if !p.at(TokenKind::Lt) {
        return None;
    }
    p.bump();
    let mut args = Vec::new();
    if !p.at(TokenKind::Gt) {
        loop {
            match parse_type_argument(p) {
                Some(arg) => args.push(arg),
                None => {
                    p.reset(checkpoint);
                    return None;
                }
            }
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    if !close_angle_bracket(p) {
        p.reset(checkpoint);
        return None;
    }
    Some(Node::branch(NodeKind::TypeArguments, p.span_from(&start), args))
}

fn parse_type_argument(p: &mut Parser) -> Option<Node> {
    let start = p.current().span.start.clone();
    if p.at(TokenKind::Question) {
        let mut children = vec![Node::leaf(NodeKind::Identifier, p.bump())];
        if p.at(TokenKind::Extends) || p.at(TokenKind::Super) {
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            children.push(parse_type(p));
        }
        return Some(Node::branch(NodeKind::Wildcard, p.span_from(&start), children));
    }
    if primitive_kind(p.current().kind) {
        return None;
    }
    let ty = parse_type(p);
    Some(Node::branch(NodeKind::TypeArgument, p.span_from(&start), vec![ty]))
}

/// The lexer always emits `>` as a single token even in `>>`/`>>>` runs
/// so closing a type-argument list is just "consume one `>`".
/// Callers of nested generics (`Map<K, List<V>>`) therefore close one level
/// per `>` naturally, without any special-casing here.
fn close_angle_bracket(p: &mut Parser) -> bool {
    if p.at(TokenKind::Gt) {
        p.bump();
        true
    } else {
        false
    }
}

pub fn parse_type_parameters(p: &mut Parser) -> Option<Node> {
    if !p.at(TokenKind::Lt) {
        return None;
    }
    let start = p.current().span.start.clone();
    p.bump();
    let mut params = Vec::new();
    loop {
        let pstart = p.current().span.start.clone();
        let mut children = vec![Node::leaf(NodeKind::Identifier, p.bump())];
        if p.at(TokenKind::Extends) {
            p.bump();
            children.push(parse_type(p));
            while p.at(TokenKind::Amp) {
                p.bump();
                children.push(parse_type(p));
            }
        }
        params.push(Node::branch(NodeKind::TypeParameter, p.span_from(&pstart), children));
        if p.at(TokenKind::Comma) {
            p.bump();
            continue;
        }
        break;
    }
    close_angle_bracket(p);
    Some(Node::branch(NodeKind::TypeParameters, p.span_from(&start), params))
}
