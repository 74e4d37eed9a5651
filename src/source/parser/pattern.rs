//! Pattern syntax shared by `instanceof` and `switch`: type patterns,
//! record patterns, the match-all `_`, and guards.

use super::types::parse_type;
use super::Parser;
use crate::source::ast::{Node, NodeKind};
use crate::source::token::TokenKind;

/// Parses a type optionally followed either by a binding identifier
/// (`TypePattern`) or by a parenthesized, comma-separated pattern list
/// (`RecordPattern`). A lone `_` is a `MatchAllPattern`.
pub fn parse_pattern(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();

    if p.at(TokenKind::Identifier) && p.current().text == "_" {
        let tok = p.bump();
        return Node::leaf(NodeKind::MatchAllPattern, tok);
    }

    let modifiers = if p.at(TokenKind::Final) {
        let mstart = p.current().span.start.clone();
        let m = vec![Node::leaf(NodeKind::Identifier, p.bump())];
        Some(Node::branch(NodeKind::Modifiers, p.span_from(&mstart), m))
    } else {
        None
    };

    let ty = parse_type(p);

    if p.at(TokenKind::LParen) {
        p.bump();
        let mut children = Vec::new();
        children.extend(modifiers);
        children.push(ty);
        if !p.at(TokenKind::RParen) {
            loop {
                children.push(parse_pattern(p));
                if p.at(TokenKind::Comma) {
                    p.bump();
                    continue;
                }
                break;
            }
        }
        p.expect(TokenKind::RParen);
        return Node::branch(NodeKind::RecordPattern, p.span_from(&start), children);
    }

    let mut children = Vec::new();
    children.extend(modifiers);
    children.push(ty);
    if p.at(TokenKind::Identifier) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    Node::branch(NodeKind::TypePattern, p.span_from(&start), children)
}

/// `when` is a contextual keyword, lexed as a plain identifier; the parser
/// recognises it only right after a case pattern.
pub fn try_parse_guard(p: &mut Parser) -> Option<Node> {
    if p.at(TokenKind::Identifier) && p.current().text == "when" {
        let start = p.current().span.start.clone();
        p.bump();
        let cond = super::expr::parse_expr(p);
        Some(Node::branch(NodeKind::Guard, p.span_from(&start), vec![cond]))
    } else {
        None
    }
}
