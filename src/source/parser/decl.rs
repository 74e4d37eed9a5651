//! Top-level and member declarations: package/import, the five type
//! declarations, modules, fields, methods, constructors.

use super::types::{parse_type, parse_type_parameters};
use super::{stmt, Parser};
use crate::source::ast::{Node, NodeKind};
use crate::source::token::{Token, TokenKind};

pub fn parse_package_decl(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // package
    let mut children = vec![parse_qualified_name_flat(p)];
    let (_, err) = p.expect(TokenKind::Semi);
    if let Some(e) = err {
        children.push(e);
    }
    Node::branch(NodeKind::PackageDecl, p.span_from(&start), children)
}

pub fn parse_import_decl(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // import
    let mut children = Vec::new();
    if p.at(TokenKind::Static) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    children.push(parse_qualified_name_with_star(p));
    let (_, err) = p.expect(TokenKind::Semi);
    if let Some(e) = err {
        children.push(e);
    }
    Node::branch(NodeKind::ImportDecl, p.span_from(&start), children)
}

fn parse_qualified_name_flat(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut parts = vec![Node::leaf(NodeKind::Identifier, p.bump())];
    while p.at(TokenKind::Dot) {
        p.bump();
        parts.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    Node::branch(NodeKind::QualifiedName, p.span_from(&start), parts)
}

fn parse_qualified_name_with_star(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut parts = vec![Node::leaf(NodeKind::Identifier, p.bump())];
    while p.at(TokenKind::Dot) {
        p.bump();
        if p.at(TokenKind::Star) {
            parts.push(Node::leaf(NodeKind::Identifier, p.bump()));
            break;
        }
        parts.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    Node::branch(NodeKind::QualifiedName, p.span_from(&start), parts)
}

// --- module declarations -------------------------------------------

pub fn parse_module_decl(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    if p.at(TokenKind::Identifier) && p.current().text == "module" {
        p.bump();
    }
    let mut children = vec![parse_qualified_name_flat(p)];
    let (_, err) = p.expect(TokenKind::LBrace);
    if let Some(e) = err {
        children.push(e);
    }
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        children.push(parse_module_directive(p));
    }
    p.expect(TokenKind::RBrace);
    Node::branch(NodeKind::ModuleDecl, p.span_from(&start), children)
}

fn parse_module_directive(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let keyword = p.current().text.clone();
    let (kind, mut children) = match keyword.as_str() {
        "requires" => {
            p.bump();
            let mut children = Vec::new();
            while (p.at(TokenKind::Identifier) && (p.current().text == "transitive" || p.current().text == "static"))
                || p.at(TokenKind::Static)
            {
                children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            }
            children.push(parse_qualified_name_flat(p));
            (NodeKind::RequiresDirective, children)
        }
        "exports" => {
            p.bump();
            let mut children = vec![parse_qualified_name_flat(p)];
            if p.at(TokenKind::Identifier) && p.current().text == "to" {
                p.bump();
                children.push(parse_qualified_name_flat(p));
                while p.at(TokenKind::Comma) {
                    p.bump();
                    children.push(parse_qualified_name_flat(p));
                }
            }
            (NodeKind::ExportsDirective, children)
        }
        "opens" => {
            p.bump();
            let mut children = vec![parse_qualified_name_flat(p)];
            if p.at(TokenKind::Identifier) && p.current().text == "to" {
                p.bump();
                children.push(parse_qualified_name_flat(p));
                while p.at(TokenKind::Comma) {
                    p.bump();
                    children.push(parse_qualified_name_flat(p));
                }
            }
            (NodeKind::OpensDirective, children)
        }
        "uses" => {
            p.bump();
            (NodeKind::UsesDirective, vec![parse_qualified_name_flat(p)])
        }
        "provides" => {
            p.bump();
            let mut children = vec![parse_qualified_name_flat(p)];
            if p.at(TokenKind::Identifier) && p.current().text == "with" {
                p.bump();
                children.push(parse_qualified_name_flat(p));
                while p.at(TokenKind::Comma) {
                    p.bump();
                    children.push(parse_qualified_name_flat(p));
                }
            }
            (NodeKind::ProvidesDirective, children)
        }
        _ => {
            let found = p.bump();
            let err = Node::error(found.span.clone(), "expected a module directive", vec![], found);
            (NodeKind::Error, vec![err])
        }
    };
    let (_, err) = p.expect(TokenKind::Semi);
    if let Some(e) = err {
        children.push(e);
    }
    Node::branch(kind, p.span_from(&start), children)
}

// --- modifiers and annotations --------------------------------------

fn is_modifier_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Abstract
            | TokenKind::Static
            | TokenKind::Final
            | TokenKind::Transient
            | TokenKind::Volatile
            | TokenKind::Synchronized
            | TokenKind::Native
            | TokenKind::Strictfp
            | TokenKind::Default
    )
}

pub fn parse_modifiers(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut children = Vec::new();
    loop {
        if p.at(TokenKind::At) && p.peek_kind(1) != TokenKind::Identifier {
            break;
        }
        if p.at(TokenKind::At) {
            children.push(parse_annotation(p));
            continue;
        }
        if is_modifier_keyword(p.current().kind) {
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            continue;
        }
        if p.at(TokenKind::Identifier) && p.current().text == "sealed" {
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            continue;
        }
        if p.at(TokenKind::Identifier) && p.current().text == "non" && p.peek_kind(1) == TokenKind::Minus {
            // `non-sealed`: lexed as Identifier("non"), Minus, Identifier("sealed").
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            children.push(Node::leaf(NodeKind::Identifier, p.bump()));
            continue;
        }
        break;
    }
    Node::branch(NodeKind::Modifiers, p.span_from(&start), children)
}

pub fn parse_annotation(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // @
    let mut children = vec![parse_qualified_name_flat(p)];
    if p.at(TokenKind::LParen) {
        p.bump();
        if !p.at(TokenKind::RParen) {
            // Could be a single value, or name=value pairs.
            if p.at(TokenKind::Identifier) && p.peek_kind(1) == TokenKind::Eq {
                loop {
                    let el_start = p.current().span.start.clone();
                    let name = Node::leaf(NodeKind::Identifier, p.bump());
                    p.bump(); // =
                    let value = super::expr::parse_annotation_value(p);
                    children.push(Node::branch(NodeKind::AnnotationElement, p.span_from(&el_start), vec![name, value]));
                    if p.at(TokenKind::Comma) {
                        p.bump();
                        continue;
                    }
                    break;
                }
            } else {
                children.push(super::expr::parse_annotation_value(p));
            }
        }
        p.expect(TokenKind::RParen);
    }
    Node::branch(NodeKind::Annotation, p.span_from(&start), children)
}

// --- type declarations -----------------------------------------------

pub fn parse_type_decl(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let modifiers = parse_modifiers(p);
    let kind_token = p.current().clone();
    let mut children = vec![modifiers];

    let node_kind = if p.at(TokenKind::Class) {
        p.bump();
        NodeKind::ClassDecl
    } else if p.at(TokenKind::Interface) {
        p.bump();
        NodeKind::InterfaceDecl
    } else if p.at(TokenKind::Enum) {
        p.bump();
        NodeKind::EnumDecl
    } else if p.at(TokenKind::At) && p.peek_kind(1) == TokenKind::Interface {
        p.bump();
        p.bump();
        NodeKind::AnnotationDecl
    } else if p.at(TokenKind::Identifier) && p.current().text == "record" {
        p.bump();
        NodeKind::RecordDecl
    } else {
        let found = p.bump();
        let err = Node::error(found.span.clone(), "expected a type declaration", vec![], found);
        children.push(err);
        return Node::branch(NodeKind::Error, p.span_from(&start), children);
    };
    let _ = kind_token;

    let (name_tok, err) = p.expect(TokenKind::Identifier);
    children.push(Node::leaf(NodeKind::Identifier, name_tok));
    if let Some(e) = err {
        children.push(e);
    }

    if let Some(tp) = parse_type_parameters(p) {
        children.push(tp);
    }

    if node_kind == NodeKind::RecordDecl {
        children.push(parse_formal_parameters(p));
    }

    if p.at(TokenKind::Extends) {
        let ext_start = p.current().span.start.clone();
        p.bump();
        let mut types = vec![parse_type(p)];
        while p.at(TokenKind::Comma) {
            p.bump();
            types.push(parse_type(p));
        }
        children.push(Node::branch(NodeKind::ExtendsClause, p.span_from(&ext_start), types));
    }
    if p.at(TokenKind::Implements) {
        let impl_start = p.current().span.start.clone();
        p.bump();
        let mut types = vec![parse_type(p)];
        while p.at(TokenKind::Comma) {
            p.bump();
            types.push(parse_type(p));
        }
        children.push(Node::branch(NodeKind::ImplementsClause, p.span_from(&impl_start), types));
    }
    if p.at(TokenKind::Identifier) && p.current().text == "permits" {
        let perm_start = p.current().span.start.clone();
        p.bump();
        let mut types = vec![parse_type(p)];
        while p.at(TokenKind::Comma) {
            p.bump();
            types.push(parse_type(p));
        }
        children.push(Node::branch(NodeKind::PermitsClause, p.span_from(&perm_start), types));
    }

    p.expect(TokenKind::LBrace);
    if node_kind == NodeKind::EnumDecl {
        children.extend(parse_enum_constants(p));
    }
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        if p.at(TokenKind::Semi) {
            p.bump();
            continue;
        }
        children.push(parse_member(p, name_text_of(&children)));
    }
    p.expect(TokenKind::RBrace);

    Node::branch(node_kind, p.span_from(&start), children)
}

fn name_text_of(children: &[Node]) -> &str {
    children
        .iter()
        .find(|c| c.kind == NodeKind::Identifier)
        .and_then(|c| c.token.as_ref())
        .map(|t| t.text.as_str())
        .unwrap_or("")
}

fn parse_enum_constants(p: &mut Parser) -> Vec<Node> {
    let mut out = Vec::new();
    while p.at(TokenKind::Identifier) {
        let start = p.current().span.start.clone();
        let mut children = vec![Node::leaf(NodeKind::Identifier, p.bump())];
        if p.at(TokenKind::LParen) {
            children.push(super::expr::parse_argument_list(p));
        }
        if p.at(TokenKind::LBrace) {
            children.push(parse_class_body_as_block(p));
        }
        out.push(Node::branch(NodeKind::FieldDecl, p.span_from(&start), children));
        if p.at(TokenKind::Comma) {
            p.bump();
            continue;
        }
        break;
    }
    if p.at(TokenKind::Semi) {
        p.bump();
    }
    out
}

/// Body of an anonymous class created by `new Type(args) { ... }`.
pub fn parse_type_decl_anonymous_body(p: &mut Parser) -> Node {
    parse_class_body_as_block(p)
}

fn parse_class_body_as_block(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // {
    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        members.push(parse_member(p, ""));
    }
    p.expect(TokenKind::RBrace);
    Node::branch(NodeKind::Block, p.span_from(&start), members)
}

/// Parses one class/interface/enum/record/annotation body member: a nested
/// type declaration, a static/instance initializer block, a constructor,
/// or a field/method declaration (the latter two share a modifiers+type
/// prefix and are disambiguated by whether `(` follows the name).
fn parse_member(p: &mut Parser, owner_name: &str) -> Node {
    let start = p.current().span.start.clone();

    if p.at(TokenKind::Class)
        || p.at(TokenKind::Interface)
        || p.at(TokenKind::Enum)
        || (p.at(TokenKind::At) && p.peek_kind(1) == TokenKind::Interface)
        || (p.at(TokenKind::Identifier) && p.current().text == "record" && p.peek_kind(1) == TokenKind::Identifier)
    {
        return parse_type_decl(p);
    }

    if p.at(TokenKind::LBrace) {
        return parse_class_body_as_block(p);
    }

    let modifiers = parse_modifiers(p);

    if p.at(TokenKind::LBrace) {
        // instance/static initializer block, modifiers holds only `static`
        return parse_class_body_as_block(p);
    }

    let type_params = parse_type_parameters(p);

    if p.at(TokenKind::Identifier) && p.current().text == owner_name && p.peek_kind(1) == TokenKind::LParen && !owner_name.is_empty() {
        return parse_constructor(p, start, modifiers);
    }

    // Record compact constructor: `RecordName { ... }`, no parameter list.
    if p.at(TokenKind::Identifier) && p.current().text == owner_name && p.peek_kind(1) == TokenKind::LBrace && !owner_name.is_empty() {
        return parse_compact_constructor(p, start, modifiers);
    }

    let ty = parse_type(p);
    let (name_tok, name_err) = p.expect(TokenKind::Identifier);

    if p.at(TokenKind::LParen) {
        return parse_method(p, start, modifiers, type_params, ty, name_tok, name_err);
    }

    parse_field(p, start, modifiers, ty, name_tok, name_err)
}

fn parse_constructor(p: &mut Parser, start: crate::source::token::Position, modifiers: Node) -> Node {
    let name = Node::leaf(NodeKind::Identifier, p.bump());
    let mut children = vec![modifiers, name, parse_formal_parameters(p)];
    if p.at(TokenKind::Throws) {
        children.push(parse_throws(p));
    }
    children.push(stmt::parse_block(p));
    Node::branch(NodeKind::ConstructorDecl, p.span_from(&start), children)
}

/// A record's compact constructor (JLS 8.10.4): `RecordName { ... }`, with
/// an implicit parameter list matching the record header, so none is
/// written here. Modeled as a `ConstructorDecl` with an empty `Parameters`
/// node to keep the node shape uniform for printing and the round-trip
/// multiset check.
fn parse_compact_constructor(p: &mut Parser, start: crate::source::token::Position, modifiers: Node) -> Node {
    let name = Node::leaf(NodeKind::Identifier, p.bump());
    // Zero-width span (no `()` ever existed in source) lets the printer tell
    // this apart from an ordinary zero-parameter constructor.
    let empty_span = crate::source::token::Span { start: name.span.end.clone(), end: name.span.end.clone() };
    let params = Node::branch(NodeKind::Parameters, empty_span, Vec::new());
    let mut children = vec![modifiers, name, params];
    children.push(stmt::parse_block(p));
    Node::branch(NodeKind::ConstructorDecl, p.span_from(&start), children)
}

fn parse_method(
    p: &mut Parser,
    start: crate::source::token::Position,
    modifiers: Node,
    type_params: Option<Node>,
    ty: Node,
    name_tok: Token,
    name_err: Option<Node>,
) -> Node {
    let mut children = vec![modifiers];
    children.extend(type_params);
    children.push(ty);
    children.push(Node::leaf(NodeKind::Identifier, name_tok));
    children.extend(name_err);
    children.push(parse_formal_parameters(p));
    let mut dims = 0;
    while p.at(TokenKind::LBracket) && p.peek_kind(1) == TokenKind::RBracket {
        p.bump();
        p.bump();
        dims += 1;
    }
    let _ = dims;
    if p.at(TokenKind::Throws) {
        children.push(parse_throws(p));
    }
    if p.at(TokenKind::LBrace) {
        children.push(stmt::parse_block(p));
    } else {
        p.expect(TokenKind::Semi);
    }
    Node::branch(NodeKind::MethodDecl, p.span_from(&start), children)
}

fn parse_field(
    p: &mut Parser,
    start: crate::source::token::Position,
    modifiers: Node,
    ty: Node,
    name_tok: Token,
    name_err: Option<Node>,
) -> Node {
    let mut children = vec![modifiers, ty, Node::leaf(NodeKind::Identifier, name_tok)];
    children.extend(name_err);
    if p.at(TokenKind::Eq) {
        p.bump();
        children.push(super::expr::parse_variable_initializer(p));
    }
    while p.at(TokenKind::Comma) {
        p.bump();
        let (extra_name, extra_err) = p.expect(TokenKind::Identifier);
        children.push(Node::leaf(NodeKind::Identifier, extra_name));
        children.extend(extra_err);
        if p.at(TokenKind::Eq) {
            p.bump();
            children.push(super::expr::parse_variable_initializer(p));
        }
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::FieldDecl, p.span_from(&start), children)
}

pub fn parse_formal_parameters(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.expect(TokenKind::LParen);
    let mut params = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            params.push(parse_formal_parameter(p));
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen);
    Node::branch(NodeKind::Parameters, p.span_from(&start), params)
}

fn parse_formal_parameter(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let modifiers = parse_modifiers(p);
    let mut ty = parse_type(p);
    let is_varargs = p.at(TokenKind::Ellipsis);
    if is_varargs {
        p.bump();
        ty = Node::branch(NodeKind::ArrayType, ty.span.clone(), vec![ty]);
    }
    let name = if p.at(TokenKind::Identifier) {
        Node::leaf(NodeKind::Identifier, p.bump())
    } else {
        let (tok, _) = p.expect(TokenKind::Identifier);
        Node::leaf(NodeKind::Identifier, tok)
    };
    Node::branch(NodeKind::Parameter, p.span_from(&start), vec![modifiers, ty, name])
}

fn parse_throws(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // throws
    let mut types = vec![parse_type(p)];
    while p.at(TokenKind::Comma) {
        p.bump();
        types.push(parse_type(p));
    }
    Node::branch(NodeKind::ThrowsList, p.span_from(&start), types)
}
