//! Statement grammar.

use super::decl::{parse_formal_parameters, parse_modifiers};
use super::expr::{parse_argument_list, parse_expr, parse_variable_initializer};
use super::pattern::{parse_pattern, try_parse_guard};
use super::types::parse_type;
use super::Parser;
use crate::source::ast::{Node, NodeKind};
use crate::source::token::TokenKind;

pub fn parse_block(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.expect(TokenKind::LBrace);
    let mut stmts = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        stmts.push(parse_statement(p));
    }
    p.expect(TokenKind::RBrace);
    Node::branch(NodeKind::Block, p.span_from(&start), stmts)
}

fn looks_like_local_var_decl(p: &Parser) -> bool {
    // Heuristic shared by every hand-written Java parser: a statement that
    // starts with a type is a local variable declaration unless it's
    // actually a method call / field access expression statement. The
    // robust signal is "type followed by an identifier", which a bare
    // expression can't produce (`Foo.bar` has a `.` right after `Foo`, a
    // call has `(` right after the name).
    matches!(
        p.peek_kind(0),
        TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Char
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Final
    ) || (p.peek_kind(0) == TokenKind::Identifier && matches!(p.peek_kind(1), TokenKind::Identifier))
}

pub fn parse_statement(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    match p.peek_kind(0) {
        TokenKind::Semi => {
            p.bump();
            Node::branch(NodeKind::EmptyStmt, p.span_from(&start), vec![])
        }
        TokenKind::LBrace => parse_block(p),
        TokenKind::If => parse_if(p),
        TokenKind::For => parse_for(p),
        TokenKind::While => parse_while(p),
        TokenKind::Do => parse_do(p),
        TokenKind::Switch => parse_switch_stmt(p),
        TokenKind::Return => parse_return(p),
        TokenKind::Break => parse_break(p),
        TokenKind::Continue => parse_continue(p),
        TokenKind::Throw => parse_throw(p),
        TokenKind::Try => parse_try(p),
        TokenKind::Synchronized => parse_synchronized(p),
        TokenKind::Assert => parse_assert(p),
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum => {
            let decl = super::decl::parse_type_decl(p);
            Node::branch(NodeKind::LocalClassDecl, decl.span.clone(), vec![decl])
        }
        TokenKind::This | TokenKind::Super
            if matches!(p.peek_kind(1), TokenKind::LParen) || (p.peek_kind(1) == TokenKind::Dot) =>
        {
            if is_explicit_constructor_invocation(p) {
                parse_explicit_constructor_invocation(p)
            } else {
                parse_expr_stmt(p)
            }
        }
        TokenKind::Identifier if p.current().text == "yield" && !matches!(p.peek_kind(1), TokenKind::Semi | TokenKind::Dot | TokenKind::LParen) => {
            parse_yield(p)
        }
        TokenKind::Identifier if p.peek_kind(1) == TokenKind::Colon => parse_labeled(p),
        _ => {
            if looks_like_local_var_decl(p) {
                parse_local_var_decl(p)
            } else {
                parse_expr_stmt(p)
            }
        }
    }
}

fn is_explicit_constructor_invocation(p: &Parser) -> bool {
    p.peek_kind(1) == TokenKind::LParen || (p.peek_kind(1) == TokenKind::Dot)
}

fn parse_explicit_constructor_invocation(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut children = Vec::new();
    if p.at(TokenKind::Identifier) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
        p.expect(TokenKind::Dot);
    }
    children.push(Node::leaf(
        if p.at(TokenKind::This) { NodeKind::This } else { NodeKind::Super },
        p.bump(),
    ));
    children.push(parse_argument_list(p));
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::ExplicitConstructorInvocation, p.span_from(&start), children)
}

fn parse_local_var_decl(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let modifiers = parse_modifiers(p);
    let ty = parse_type(p);
    let mut children = vec![modifiers, ty];
    loop {
        let (name, err) = p.expect(TokenKind::Identifier);
        children.push(Node::leaf(NodeKind::Identifier, name));
        children.extend(err);
        if p.at(TokenKind::Eq) {
            p.bump();
            children.push(parse_variable_initializer(p));
        }
        if p.at(TokenKind::Comma) {
            p.bump();
            continue;
        }
        break;
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::LocalVarDecl, p.span_from(&start), children)
}

fn parse_expr_stmt(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let expr = parse_expr(p);
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::ExprStmt, p.span_from(&start), vec![expr])
}

fn parse_if(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);
    let cond = parse_expr(p);
    p.expect(TokenKind::RParen);
    let then_branch = parse_statement(p);
    let mut children = vec![cond, then_branch];
    if p.at(TokenKind::Else) {
        p.bump();
        children.push(parse_statement(p));
    }
    Node::branch(NodeKind::IfStmt, p.span_from(&start), children)
}

fn parse_for(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);

    // Enhanced for: `(` [modifiers] Type Identifier `:` Expr `)`.
    let checkpoint = p.checkpoint();
    if looks_like_enhanced_for(p) {
        let modifiers = parse_modifiers(p);
        let ty = parse_type(p);
        let (name, _) = p.expect(TokenKind::Identifier);
        if p.at(TokenKind::Colon) {
            p.bump();
            let iterable = parse_expr(p);
            p.expect(TokenKind::RParen);
            let body = parse_statement(p);
            return Node::branch(
                NodeKind::EnhancedForStmt,
                p.span_from(&start),
                vec![modifiers, ty, Node::leaf(NodeKind::Identifier, name), iterable, body],
            );
        }
        p.reset(checkpoint);
    }

    let mut children = Vec::new();
    if !p.at(TokenKind::Semi) {
        children.push(parse_for_init(p));
    } else {
        children.push(Node::branch(NodeKind::EmptyStmt, p.current().span.clone(), vec![]));
    }
    p.expect(TokenKind::Semi);
    if !p.at(TokenKind::Semi) {
        children.push(parse_expr(p));
    } else {
        children.push(Node::branch(NodeKind::EmptyStmt, p.current().span.clone(), vec![]));
    }
    p.expect(TokenKind::Semi);
    if !p.at(TokenKind::RParen) {
        children.push(parse_expr(p));
        while p.at(TokenKind::Comma) {
            p.bump();
            children.push(parse_expr(p));
        }
    }
    p.expect(TokenKind::RParen);
    children.push(parse_statement(p));
    Node::branch(NodeKind::ForStmt, p.span_from(&start), children)
}

fn looks_like_enhanced_for(p: &Parser) -> bool {
    // A conservative check: if a `:` appears before the matching `)` at
    // depth 0, it's an enhanced for. Cheap lookahead since for-loop headers
    // are short.
    let mut depth = 0i32;
    let mut i = 0usize;
    loop {
        match p.peek_kind(i) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            TokenKind::Colon if depth == 0 => return true,
            TokenKind::Semi if depth == 0 => return false,
            TokenKind::Eof => return false,
            _ => {}
        }
        i += 1;
        if i > 4096 {
            return false;
        }
    }
}

fn parse_for_init(p: &mut Parser) -> Node {
    if looks_like_local_var_decl(p) {
        let start = p.current().span.start.clone();
        let modifiers = parse_modifiers(p);
        let ty = parse_type(p);
        let mut children = vec![modifiers, ty];
        loop {
            let (name, err) = p.expect(TokenKind::Identifier);
            children.push(Node::leaf(NodeKind::Identifier, name));
            children.extend(err);
            if p.at(TokenKind::Eq) {
                p.bump();
                children.push(parse_variable_initializer(p));
            }
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
        return Node::branch(NodeKind::LocalVarDecl, p.span_from(&start), children);
    }
    let start = p.current().span.start.clone();
    let expr = parse_expr(p);
    Node::branch(NodeKind::ExprStmt, p.span_from(&start), vec![expr])
}

fn parse_while(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);
    let cond = parse_expr(p);
    p.expect(TokenKind::RParen);
    let body = parse_statement(p);
    Node::branch(NodeKind::WhileStmt, p.span_from(&start), vec![cond, body])
}

fn parse_do(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let body = parse_statement(p);
    p.expect(TokenKind::While);
    p.expect(TokenKind::LParen);
    let cond = parse_expr(p);
    p.expect(TokenKind::RParen);
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::DoStmt, p.span_from(&start), vec![body, cond])
}

fn parse_return(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let mut children = Vec::new();
    if !p.at(TokenKind::Semi) {
        children.push(parse_expr(p));
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::ReturnStmt, p.span_from(&start), children)
}

fn parse_break(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let mut children = Vec::new();
    if p.at(TokenKind::Identifier) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::BreakStmt, p.span_from(&start), children)
}

fn parse_continue(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let mut children = Vec::new();
    if p.at(TokenKind::Identifier) {
        children.push(Node::leaf(NodeKind::Identifier, p.bump()));
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::ContinueStmt, p.span_from(&start), children)
}

fn parse_throw(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let expr = parse_expr(p);
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::ThrowStmt, p.span_from(&start), vec![expr])
}

fn parse_yield(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let expr = parse_expr(p);
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::YieldStmt, p.span_from(&start), vec![expr])
}

fn parse_labeled(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let label = Node::leaf(NodeKind::Identifier, p.bump());
    p.bump(); // :
    let stmt = parse_statement(p);
    Node::branch(NodeKind::LabeledStmt, p.span_from(&start), vec![label, stmt])
}

fn parse_try(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let mut children = Vec::new();

    if p.at(TokenKind::LParen) {
        p.bump();
        let mut resources = Vec::new();
        while !p.at(TokenKind::RParen) {
            resources.push(parse_resource(p));
            if p.at(TokenKind::Semi) {
                p.bump();
                continue;
            }
            break;
        }
        p.expect(TokenKind::RParen);
        children.push(Node::branch(NodeKind::Parameters, p.current().span.clone(), resources));
    }

    children.push(parse_block(p));

    while p.at(TokenKind::Catch) {
        children.push(parse_catch(p));
    }
    if p.at(TokenKind::Finally) {
        let fstart = p.current().span.start.clone();
        p.bump();
        let block = parse_block(p);
        children.push(Node::branch(NodeKind::Block, p.span_from(&fstart), vec![block]));
    }
    Node::branch(NodeKind::TryStmt, p.span_from(&start), children)
}

fn parse_resource(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let modifiers = parse_modifiers(p);
    let ty = parse_type(p);
    let (name, _) = p.expect(TokenKind::Identifier);
    let mut children = vec![modifiers, ty, Node::leaf(NodeKind::Identifier, name)];
    if p.at(TokenKind::Eq) {
        p.bump();
        children.push(parse_expr(p));
    }
    Node::branch(NodeKind::LocalVarDecl, p.span_from(&start), children)
}

fn parse_catch(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);
    let modifiers = parse_modifiers(p);
    let mut types = vec![parse_type(p)];
    while p.at(TokenKind::Pipe) {
        p.bump();
        types.push(parse_type(p));
    }
    let (name, _) = p.expect(TokenKind::Identifier);
    p.expect(TokenKind::RParen);
    let body = parse_block(p);
    let mut children = vec![modifiers];
    children.extend(types);
    children.push(Node::leaf(NodeKind::Identifier, name));
    children.push(body);
    Node::branch(NodeKind::Block, p.span_from(&start), children)
}

fn parse_synchronized(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);
    let lock = parse_expr(p);
    p.expect(TokenKind::RParen);
    let body = parse_block(p);
    Node::branch(NodeKind::SynchronizedStmt, p.span_from(&start), vec![lock, body])
}

fn parse_assert(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    let mut children = vec![parse_expr(p)];
    if p.at(TokenKind::Colon) {
        p.bump();
        children.push(parse_expr(p));
    }
    p.expect(TokenKind::Semi);
    Node::branch(NodeKind::AssertStmt, p.span_from(&start), children)
}

pub fn parse_switch_stmt(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    p.bump();
    p.expect(TokenKind::LParen);
    let selector = parse_expr(p);
    p.expect(TokenKind::RParen);
    p.expect(TokenKind::LBrace);
    let mut cases = vec![selector];
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        cases.push(parse_switch_case(p));
    }
    p.expect(TokenKind::RBrace);
    Node::branch(NodeKind::SwitchStmt, p.span_from(&start), cases)
}

fn parse_switch_case(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    let mut children = vec![parse_switch_label(p)];
    while p.at(TokenKind::Comma) {
        p.bump();
        children.push(parse_switch_label(p));
    }
    let is_arrow = p.at(TokenKind::Arrow);
    if is_arrow {
        let arrow_pos = p.current().span.start.clone();
        // The last label gets a synthetic `->` marker child so the printer
        // (and anything else walking the tree) can tell arrow-style apart
        // from colon-style without re-deriving it from body shape.
        if let Some(last_label) = children.last_mut() {
            last_label.children.push(Node::leaf(NodeKind::Identifier, crate::source::token::Token::synthetic(TokenKind::Arrow, "->", arrow_pos)));
        }
        p.bump();
        if p.at(TokenKind::LBrace) {
            children.push(parse_block(p));
        } else if p.at(TokenKind::Identifier) && p.current().text == "yield" {
            children.push(parse_yield(p));
        } else if p.at(TokenKind::Throw) {
            children.push(parse_throw(p));
        } else {
            let estart = p.current().span.start.clone();
            let expr = parse_expr(p);
            p.expect(TokenKind::Semi);
            children.push(Node::branch(NodeKind::ExprStmt, p.span_from(&estart), vec![expr]));
        }
    } else {
        p.expect(TokenKind::Colon);
        while !matches!(p.peek_kind(0), TokenKind::RBrace)
            && !(p.at(TokenKind::Case) || p.at(TokenKind::Default))
            && !p.at_end()
        {
            children.push(parse_statement(p));
        }
    }
    Node::branch(NodeKind::SwitchCase, p.span_from(&start), children)
}

fn parse_switch_label(p: &mut Parser) -> Node {
    let start = p.current().span.start.clone();
    if p.at(TokenKind::Default) {
        let tok = p.bump();
        return Node::leaf(NodeKind::SwitchLabel, tok);
    }
    p.expect(TokenKind::Case);
    let mut children = Vec::new();
    if p.at(TokenKind::NullLiteral) {
        children.push(Node::leaf(NodeKind::Literal, p.bump()));
        if p.at(TokenKind::Comma) {
            p.bump();
            let (default_tok, err) = p.expect(TokenKind::Default);
            children.push(Node::leaf(NodeKind::Identifier, default_tok));
            children.extend(err);
        }
    } else {
        children.push(parse_pattern(p));
        if let Some(guard) = try_parse_guard(p) {
            children.push(guard);
        }
    }
    Node::branch(NodeKind::SwitchLabel, p.span_from(&start), children)
}
