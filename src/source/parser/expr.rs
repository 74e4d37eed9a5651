//! Expression grammar: precedence climbing plus the primary/postfix chain,
//! including two speculative disambiguations: generics-vs-comparison (lives
//! in `types.rs`) and lambda-vs-parenthesized-expr (here).

use super::pattern::parse_pattern;
use super::types::{parse_type, try_parse_type_arguments};
use super::Parser;
use crate::source::ast::{Node, NodeKind};
use crate::source::token::TokenKind;

/// Binding power table, assignment lowest (right-assoc) through
/// logical-or/and, bitwise, equality, relational (incl. `instanceof`),
/// shift, additive, multiplicative.
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::OrOr => 1,
        TokenKind::AndAnd => 2,
        TokenKind::Pipe => 3,
        TokenKind::Caret => 4,
        TokenKind::Amp => 5,
        TokenKind::EqEq | TokenKind::NotEq => 6,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq | TokenKind::Instanceof => 7,
        TokenKind::LShift | TokenKind::RShift | TokenKind::URShift => 8,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        _ => return None,
    })
}

/// The lexer always emits `>` singly (so a generics-closing run like
/// `List<List<Foo>>` can be split one level at a time); `>>`, `>>>`,
/// `>>=`, and `>>>=` therefore don't exist as lexer tokens at all and have
/// to be recombined here, where the expression grammar is the only place
/// that cares they're one operator rather than a run of comparisons.
/// Returns `None` unless the run is byte-adjacent, so a real `a < b > c`
/// typo'd as a comparison chain, or any case with a gap, is left alone.
fn match_right_shift_run(p: &Parser) -> Option<(TokenKind, usize)> {
    if p.peek_kind(0) != TokenKind::Gt || p.peek_kind(1) != TokenKind::Gt {
        return None;
    }
    let t0 = p.peek_token(0);
    let t1 = p.peek_token(1);
    if !adjacent(t0, t1) {
        return None;
    }
    if p.peek_kind(2) == TokenKind::Gt && adjacent(t1, p.peek_token(2)) {
        let t2 = p.peek_token(2);
        if p.peek_kind(3) == TokenKind::Eq && adjacent(t2, p.peek_token(3)) {
            return Some((TokenKind::URShiftEq, 4));
        }
        return Some((TokenKind::URShift, 3));
    }
    if p.peek_kind(2) == TokenKind::Eq && adjacent(t1, p.peek_token(2)) {
        return Some((TokenKind::RShiftEq, 3));
    }
    Some((TokenKind::RShift, 2))
}

fn adjacent(a: &crate::source::token::Token, b: &crate::source::token::Token) -> bool {
    a.span.end.offset == b.span.start.offset
}

/// Consumes `count` tokens (a run of `>` plus an optional trailing `=`) and
/// returns one synthetic token spanning all of them.
fn bump_merged(p: &mut Parser, kind: TokenKind, count: usize) -> crate::source::token::Token {
    let start = p.current().span.start.clone();
    let mut end = start.clone();
    for _ in 0..count {
        end = p.bump().span.end;
    }
    let text = match kind {
        TokenKind::RShift => ">>",
        TokenKind::URShift => ">>>",
        TokenKind::RShiftEq => ">>=",
        TokenKind::URShiftEq => ">>>=",
        _ => unreachable!(),
    };
    crate::source::token::Token { kind, text: text.to_string(), span: crate::source::token::Span { start, end } }
}

fn is_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::AmpEq
            | TokenKind::PipeEq
            | TokenKind::CaretEq
            | TokenKind::LShiftEq
            | TokenKind::RShiftEq
            | TokenKind::URShiftEq
    )
}

pub fn parse_expr(p: &mut Parser) -> Node {
    if p.enter().is_err() {
        let found = p.current().clone();
        return Node::error(found.span.clone(), "expression nested too deeply", vec![], found);
    }
    let result = parse_assignment(p);
    p.exit();
    result
}

fn parse_assignment(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let lhs = parse_ternary(p);
    if let Some((kind, count)) = match_right_shift_run(p) {
        if matches!(kind, TokenKind::RShiftEq | TokenKind::URShiftEq) {
            let op = bump_merged(p, kind, count);
            let rhs = parse_assignment(p);
            return Node::branch(NodeKind::AssignExpr, p.span_from(&start), vec![lhs, Node::leaf(NodeKind::Identifier, op), rhs]);
        }
    }
    if is_assign_op(p.peek_kind(0)) {
        let op = p.bump();
        let rhs = parse_assignment(p);
        return Node::branch(NodeKind::AssignExpr, p.span_from(&start), vec![lhs, Node::leaf(NodeKind::Identifier, op), rhs]);
    }
    lhs
}

fn parse_ternary(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let cond = parse_binary(p, 1);
    if p.at(TokenKind::Question) {
        p.bump();
        let then_branch = parse_assignment(p);
        p.expect(TokenKind::Colon);
        let else_branch = parse_assignment(p);
        return Node::branch(NodeKind::TernaryExpr, p.span_from(&start), vec![cond, then_branch, else_branch]);
    }
    cond
}

fn parse_binary(p: &mut Parser, min_prec: u8) -> Node {
    let start = p.current().span.start.clone();
    let mut lhs = parse_unary(p);
    loop {
        if let Some((shift_kind, count)) = match_right_shift_run(p) {
            if matches!(shift_kind, TokenKind::RShift | TokenKind::URShift) {
                let prec = binary_precedence(shift_kind).unwrap();
                if prec >= min_prec {
                    let op = bump_merged(p, shift_kind, count);
                    let rhs = parse_binary(p, prec + 1);
                    lhs = Node::branch(NodeKind::BinaryExpr, p.span_from(&start), vec![lhs, Node::leaf(NodeKind::Identifier, op), rhs]);
                    continue;
                }
            }
            // Either a `>>=`/`>>>=` compound assignment (the assignment layer's
            // job) or precedence too low for this level: stop here either way.
            break;
        }
        let kind = p.peek_kind(0);
        let Some(prec) = binary_precedence(kind) else { break };
        if prec < min_prec {
            break;
        }
        if kind == TokenKind::Instanceof {
            p.bump();
            let negated = false;
            let _ = negated;
            let modifiers_and_pattern = if looks_like_pattern_follows(p) {
                parse_pattern(p)
            } else {
                parse_type(p)
            };
            lhs = Node::branch(NodeKind::InstanceofExpr, p.span_from(&start), vec![lhs, modifiers_and_pattern]);
            continue;
        }
        let op = p.bump();
        let rhs = parse_binary(p, prec + 1);
        lhs = Node::branch(NodeKind::BinaryExpr, p.span_from(&start), vec![lhs, Node::leaf(NodeKind::Identifier, op), rhs]);
    }
    lhs
}

fn looks_like_pattern_follows(p: &Parser) -> bool {
    // `instanceof Type name` / `instanceof Type(...)`: a bare type has
    // nothing after it but the next binary operator or `;`/`)`.
    !matches!(p.peek_kind(1), TokenKind::Semi | TokenKind::RParen | TokenKind::Amp | TokenKind::AndAnd)
        || p.peek_kind(1) == TokenKind::Identifier
}

fn parse_unary(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    match p.peek_kind(0) {
        TokenKind::Plus | TokenKind::Minus | TokenKind::Bang | TokenKind::Tilde | TokenKind::PlusPlus | TokenKind::MinusMinus => {
            let op = p.bump();
            let operand = parse_unary(p);
            Node::branch(NodeKind::UnaryExpr, p.span_from(&start), vec![Node::leaf(NodeKind::Identifier, op), operand])
        }
        TokenKind::LParen => {
            if let Some(cast) = try_parse_cast(p, &start) {
                cast
            } else {
                parse_postfix(p)
            }
        }
        _ => parse_postfix(p),
    }
}

/// Speculatively parses `(Type) unary-expr`. Rewinds if what follows `)`
/// can't start a unary expression, since `(a)` alone could be a
/// parenthesized expression instead.
fn try_parse_cast(p: &mut Parser, start: &crate::source::token::Position) -> Option<Node> {
    let checkpoint = p.checkpoint();
    p.bump(); // (
    if matches!(
        p.peek_kind(0),
        TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Char
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Float
            | TokenKind::Double
    ) {
        let ty = parse_type(p);
        if p.at(TokenKind::RParen) {
            p.bump();
            let operand = parse_unary(p);
            return Some(Node::branch(NodeKind::CastExpr, p.span_from(start), vec![ty, operand]));
        }
        p.reset(checkpoint);
        return None;
    }
    if p.at(TokenKind::Identifier) {
        let ty = parse_type(p);
        let mut bounds = vec![ty];
        while p.at(TokenKind::Amp) {
            p.bump();
            bounds.push(parse_type(p));
        }
        if p.at(TokenKind::RParen) && starts_unary(p.peek_kind(1)) {
            p.bump();
            let operand = parse_unary(p);
            let mut children = bounds;
            children.push(operand);
            return Some(Node::branch(NodeKind::CastExpr, p.span_from(start), children));
        }
    }
    p.reset(checkpoint);
    None
}

fn starts_unary(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::LongLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::TextBlock
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Tilde
    )
}

fn parse_postfix(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut expr = parse_primary(p);
    loop {
        match p.peek_kind(0) {
            TokenKind::Dot => {
                p.bump();
                if p.at(TokenKind::New) {
                    // qualifier.new Inner(...) — treated as a NewExpr with the
                    // qualifier threaded in as its first child.
                    let inner = parse_new(p);
                    expr = Node::branch(NodeKind::NewExpr, p.span_from(&start), vec![expr, inner]);
                    continue;
                }
                if p.at(TokenKind::Class) {
                    p.bump();
                    expr = Node::branch(NodeKind::ClassLiteral, p.span_from(&start), vec![expr]);
                    continue;
                }
                if p.at(TokenKind::This) || p.at(TokenKind::Super) {
                    let tok = p.bump();
                    let kind = if tok.kind == TokenKind::This { NodeKind::This } else { NodeKind::Super };
                    expr = Node::branch(NodeKind::FieldAccess, p.span_from(&start), vec![expr, Node::leaf(kind, tok)]);
                    continue;
                }
                let _ = try_parse_type_arguments(p);
                let (name, err) = p.expect(TokenKind::Identifier);
                let name_node = Node::leaf(NodeKind::Identifier, name);
                if p.at(TokenKind::LParen) {
                    let args = parse_argument_list(p);
                    let mut children = vec![expr, name_node, args];
                    children.extend(err);
                    expr = Node::branch(NodeKind::CallExpr, p.span_from(&start), children);
                } else {
                    let mut children = vec![expr, name_node];
                    children.extend(err);
                    expr = Node::branch(NodeKind::FieldAccess, p.span_from(&start), children);
                }
            }
            TokenKind::LBracket => {
                p.bump();
                let index = parse_expr(p);
                p.expect(TokenKind::RBracket);
                expr = Node::branch(NodeKind::ArrayAccess, p.span_from(&start), vec![expr, index]);
            }
            TokenKind::DoubleColon => {
                p.bump();
                let _ = try_parse_type_arguments(p);
                let name = if p.at(TokenKind::New) {
                    Node::leaf(NodeKind::Identifier, p.bump())
                } else {
                    let (tok, _) = p.expect(TokenKind::Identifier);
                    Node::leaf(NodeKind::Identifier, tok)
                };
                expr = Node::branch(NodeKind::MethodRef, p.span_from(&start), vec![expr, name]);
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = p.bump();
                expr = Node::branch(NodeKind::PostfixExpr, p.span_from(&start), vec![expr, Node::leaf(NodeKind::Identifier, op)]);
            }
            _ => break,
        }
    }
    expr
}

fn parse_primary(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    match p.peek_kind(0) {
        TokenKind::IntLiteral
        | TokenKind::LongLiteral
        | TokenKind::FloatLiteral
        | TokenKind::DoubleLiteral
        | TokenKind::CharLiteral
        | TokenKind::StringLiteral
        | TokenKind::TextBlock
        | TokenKind::BooleanLiteral
        | TokenKind::NullLiteral => Node::leaf(NodeKind::Literal, p.bump()),
        TokenKind::This => Node::leaf(NodeKind::This, p.bump()),
        TokenKind::Super => {
            let tok = p.bump();
            if p.at(TokenKind::Dot) {
                let sup = Node::leaf(NodeKind::Super, tok);
                p.bump();
                let (name, err) = p.expect(TokenKind::Identifier);
                let name_node = Node::leaf(NodeKind::Identifier, name);
                if p.at(TokenKind::LParen) {
                    let args = parse_argument_list(p);
                    let mut children = vec![sup, name_node, args];
                    children.extend(err);
                    Node::branch(NodeKind::CallExpr, p.span_from(&start), children)
                } else {
                    let mut children = vec![sup, name_node];
                    children.extend(err);
                    Node::branch(NodeKind::FieldAccess, p.span_from(&start), children)
                }
            } else {
                Node::leaf(NodeKind::Super, tok)
            }
        }
        TokenKind::New => parse_new(p),
        TokenKind::Switch => parse_switch_expr(p),
        TokenKind::LParen => {
            if let Some(lambda) = try_parse_lambda(p, &start) {
                return lambda;
            }
            p.bump();
            let inner = parse_expr(p);
            p.expect(TokenKind::RParen);
            Node::branch(NodeKind::ParenExpr, p.span_from(&start), vec![inner])
        }
        TokenKind::Identifier if p.current().text == "_" && p.peek_kind(1) == TokenKind::Arrow => {
            try_parse_lambda(p, &start).unwrap_or_else(|| Node::leaf(NodeKind::Identifier, p.bump()))
        }
        TokenKind::Identifier if p.peek_kind(1) == TokenKind::Arrow => {
            let name = p.bump();
            p.bump(); // ->
            let body = parse_lambda_body(p);
            let param = Node::branch(NodeKind::Parameter, name.span.clone(), vec![Node::leaf(NodeKind::Identifier, name)]);
            let params = Node::branch(NodeKind::Parameters, param.span.clone(), vec![param]);
            Node::branch(NodeKind::LambdaExpr, p.span_from(&start), vec![params, body])
        }
        TokenKind::Identifier => {
            let name = Node::leaf(NodeKind::Identifier, p.bump());
            if p.at(TokenKind::LParen) {
                let args = parse_argument_list(p);
                Node::branch(NodeKind::CallExpr, p.span_from(&start), vec![name, args])
            } else if matches!(p.peek_kind(0), TokenKind::LBracket) && p.peek_kind(1) == TokenKind::RBracket {
                // bare `Type.class` / `Type[].class` style class literal
                let mut ty = Node::branch(NodeKind::Type, name.span.clone(), vec![name]);
                while p.at(TokenKind::LBracket) && p.peek_kind(1) == TokenKind::RBracket {
                    p.bump();
                    p.bump();
                    ty = Node::branch(NodeKind::ArrayType, p.span_from(&start), vec![ty]);
                }
                ty
            } else {
                name
            }
        }
        TokenKind::Boolean | TokenKind::Byte | TokenKind::Char | TokenKind::Short | TokenKind::Int | TokenKind::Long | TokenKind::Float
        | TokenKind::Double | TokenKind::Void => {
            let ty = parse_type(p);
            if p.at(TokenKind::Dot) {
                p.bump();
                p.expect(TokenKind::Class);
                Node::branch(NodeKind::ClassLiteral, p.span_from(&start), vec![ty])
            } else {
                ty
            }
        }
        _ => {
            let found = p.bump();
            Node::error(found.span.clone(), "expected an expression", vec![], found)
        }
    }
}

fn parse_new(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // new
    let _ = try_parse_type_arguments(p);
    let ty = parse_type(p);
    if p.at(TokenKind::LBracket) {
        let mut children = vec![ty];
        let mut has_expr_dim = false;
        while p.at(TokenKind::LBracket) {
            p.bump();
            if p.at(TokenKind::RBracket) {
                p.bump();
            } else {
                children.push(parse_expr(p));
                p.expect(TokenKind::RBracket);
                has_expr_dim = true;
            }
        }
        let _ = has_expr_dim;
        if p.at(TokenKind::LBrace) {
            children.push(parse_array_initializer(p));
        }
        return Node::branch(NodeKind::NewArrayExpr, p.span_from(&start), children);
    }
    if p.at(TokenKind::LBrace) {
        let init = parse_array_initializer(p);
        return Node::branch(NodeKind::NewArrayExpr, p.span_from(&start), vec![ty, init]);
    }
    let args = parse_argument_list(p);
    let mut children = vec![ty, args];
    if p.at(TokenKind::LBrace) {
        children.push(super::decl::parse_type_decl_anonymous_body(p));
    }
    Node::branch(NodeKind::NewExpr, p.span_from(&start), children)
}

fn parse_array_initializer(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump(); // {
    let mut elements = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        elements.push(parse_variable_initializer(p));
        if p.at(TokenKind::Comma) {
            p.bump();
            continue;
        }
        break;
    }
    p.expect(TokenKind::RBrace);
    Node::branch(NodeKind::ArrayInit, p.span_from(&start), elements)
}

pub fn parse_variable_initializer(p: &mut Parser) -> Node {
    if p.at(TokenKind::LBrace) {
        parse_array_initializer(p)
    } else {
        parse_expr(p)
    }
}

pub fn parse_argument_list(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.expect(TokenKind::LParen);
    let mut args = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            args.push(parse_expr(p));
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen);
    Node::branch(NodeKind::Parameters, p.span_from(&start), args)
}

/// Speculatively parses `(params) -> body`. Rewinds to a plain parenthesized
/// expression if `->` doesn't follow the closing `)`.
fn try_parse_lambda(p: &mut Parser, start: &crate::source::token::Position) -> Option<Node> {
    let checkpoint = p.checkpoint();
    p.bump(); // (
    let mut params = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            let pstart = p.current().span.start.clone();
            if p.at(TokenKind::Identifier) {
                // Untyped lambda parameter: bare name, possibly `var`.
                if p.peek_kind(1) == TokenKind::Comma || p.peek_kind(1) == TokenKind::RParen {
                    let name = Node::leaf(NodeKind::Identifier, p.bump());
                    params.push(Node::branch(NodeKind::Parameter, p.span_from(&pstart), vec![name]));
                    if p.at(TokenKind::Comma) {
                        p.bump();
                        continue;
                    }
                    break;
                }
            }
            // Typed parameter.
            let modifiers = super::decl::parse_modifiers(p);
            if !starts_unary(p.peek_kind(0)) && !matches!(p.peek_kind(0), TokenKind::Boolean | TokenKind::Byte | TokenKind::Char | TokenKind::Short | TokenKind::Int | TokenKind::Long | TokenKind::Float | TokenKind::Double) {
                p.reset(checkpoint);
                return None;
            }
            let ty = parse_type(p);
            if !p.at(TokenKind::Identifier) {
                p.reset(checkpoint);
                return None;
            }
            let name = Node::leaf(NodeKind::Identifier, p.bump());
            params.push(Node::branch(NodeKind::Parameter, p.span_from(&pstart), vec![modifiers, ty, name]));
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    if !p.at(TokenKind::RParen) {
        p.reset(checkpoint);
        return None;
    }
    p.bump();
    if !p.at(TokenKind::Arrow) {
        p.reset(checkpoint);
        return None;
    }
    p.bump();
    let params_node = Node::branch(NodeKind::Parameters, p.span_from(start), params);
    let body = parse_lambda_body(p);
    Some(Node::branch(NodeKind::LambdaExpr, p.span_from(start), vec![params_node, body]))
}

fn parse_lambda_body(p: &mut Parser) -> Node {
    if p.at(TokenKind::LBrace) {
        super::stmt::parse_block(p)
    } else {
        parse_expr(p)
    }
}

pub fn parse_switch_expr(p: &mut Parser) -> Node {
    // Syntactically identical to a switch statement; the parser doesn't
    // distinguish statement vs. expression context structurally, matching
    // how the pretty-printer later decides purely from where the node sits.
    let stmt = super::stmt::parse_switch_stmt(p);
    Node::branch(NodeKind::SwitchExpr, stmt.span.clone(), stmt.children)
}

/// Annotation element values: nested annotations, array initializers, or
/// plain expressions (the same three forms the binary `element_value`
/// structure distinguishes).
pub fn parse_annotation_value(p: &mut Parser) -> Node {
    if p.at(TokenKind::LBrace) {
        parse_array_initializer(p)
    } else if p.at(TokenKind::At) {
        super::decl::parse_annotation(p)
    } else {
        parse_expr(p)
    }
}
