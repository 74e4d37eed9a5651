//! The `Node` tree: a strict tree, no aliasing, no cycles.
//! A node either carries a terminal token (a leaf) or child nodes; mixed
//! terminals inside a non-terminal are modeled as `Identifier` children.

use crate::source::token::{Span, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    PackageDecl,
    ImportDecl,
    ModuleDecl,
    RequiresDirective,
    ExportsDirective,
    OpensDirective,
    UsesDirective,
    ProvidesDirective,

    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    RecordDecl,
    AnnotationDecl,

    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Parameters,
    Parameter,
    Modifiers,
    Annotation,
    AnnotationElement,

    Type,
    ParameterizedType,
    ArrayType,
    TypeArguments,
    TypeArgument,
    Wildcard,
    TypeParameters,
    TypeParameter,
    ExtendsClause,
    ImplementsClause,
    PermitsClause,
    ThrowsList,

    Block,

    // Statements
    EmptyStmt,
    ExprStmt,
    LocalVarDecl,
    LocalClassDecl,
    IfStmt,
    ForStmt,
    EnhancedForStmt,
    WhileStmt,
    DoStmt,
    SwitchStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    ThrowStmt,
    TryStmt,
    SynchronizedStmt,
    AssertStmt,
    YieldStmt,
    LabeledStmt,
    ExplicitConstructorInvocation,

    // Expressions
    Literal,
    Identifier,
    This,
    Super,
    QualifiedName,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    AssignExpr,
    TernaryExpr,
    CallExpr,
    NewExpr,
    NewArrayExpr,
    ArrayInit,
    FieldAccess,
    ArrayAccess,
    CastExpr,
    InstanceofExpr,
    ParenExpr,
    LambdaExpr,
    MethodRef,
    ClassLiteral,
    SwitchExpr,

    // Patterns
    TypePattern,
    RecordPattern,
    MatchAllPattern,
    SwitchCase,
    SwitchLabel,
    Guard,

    UnnamedVariable,
    Comment,
    LineComment,
    Error,
}

#[derive(Debug, Clone)]
pub struct NodeError {
    pub message: String,
    pub expected: Vec<TokenKind>,
    pub found: Token,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub token: Option<Token>,
    pub error: Option<NodeError>,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, token: Token) -> Node {
        Node { span: token.span.clone(), token: Some(token), error: None, kind, children: Vec::new() }
    }

    pub fn branch(kind: NodeKind, span: Span, children: Vec<Node>) -> Node {
        Node { kind, token: None, error: None, span, children }
    }

    pub fn error(span: Span, message: impl Into<String>, expected: Vec<TokenKind>, found: Token) -> Node {
        Node {
            kind: NodeKind::Error,
            token: None,
            error: Some(NodeError { message: message.into(), expected, found }),
            span,
            children: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NodeKind::Error
    }

    /// Depth-first walk counting every node kind, including this one.
    /// Used by the round-trip fidelity check: two trees with the same
    /// "CST-count multiset" are considered structurally equivalent — a cheap
    /// check that a rewritten tree didn't silently drop or duplicate nodes.
    pub fn kind_multiset(&self) -> std::collections::BTreeMap<&'static str, usize> {
        fn walk(node: &Node, counts: &mut std::collections::BTreeMap<&'static str, usize>) {
            if !matches!(node.kind, NodeKind::Comment | NodeKind::LineComment) {
                *counts.entry(kind_name(node.kind)).or_insert(0) += 1;
            }
            for child in &node.children {
                walk(child, counts);
            }
        }
        let mut counts = std::collections::BTreeMap::new();
        walk(self, &mut counts);
        counts
    }

    pub fn find_errors(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        fn walk<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
            if node.is_error() {
                out.push(node);
            }
            for child in &node.children {
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{parse_source, ParserOptions};

    /// Every child's span is contained in its parent's, and consecutive
    /// sibling spans never overlap.
    fn assert_span_monotone(node: &Node) {
        let mut prev_end: Option<&crate::source::token::Position> = None;
        for child in &node.children {
            assert!(
                child.span.start.offset >= node.span.start.offset && child.span.end.offset <= node.span.end.offset,
                "child span {:?} escapes parent span {:?} ({:?})",
                child.span,
                node.span,
                node.kind
            );
            if let Some(prev) = prev_end {
                assert!(
                    prev.offset <= child.span.start.offset,
                    "sibling spans overlap in {:?}: prev end {:?}, next start {:?}",
                    node.kind,
                    prev,
                    child.span.start
                );
            }
            prev_end = Some(&child.span.end);
            assert_span_monotone(child);
        }
    }

    #[test]
    fn span_monotonicity_holds_across_a_representative_tree() {
        let src = r#"
package com.example;

import java.util.List;

public sealed class Shape permits Circle, Square {
    private final List<Integer> sizes = new java.util.ArrayList<>();

    public int area(int x, int y) {
        int total = 0;
        for (int i = 0; i < x; i++) {
            total += i * y;
        }
        return total;
    }
}
"#;
        let result = parse_source(src.as_bytes(), Some("Shape.java"), ParserOptions::default());
        assert!(result.tree.find_errors().is_empty(), "unexpected errors: {:?}", result.tree.find_errors());
        assert_span_monotone(&result.tree);
    }

    #[test]
    fn minimal_empty_class_parses_to_a_single_class_decl() {
        // Scenario S1: `class A {}` -> one CompilationUnit with one ClassDecl
        // named `A` and nothing else underneath it but modifiers/identifier.
        let result = parse_source(b"class A {}", Some("A.java"), ParserOptions::default());
        assert!(result.tree.find_errors().is_empty());
        assert_eq!(result.tree.kind, NodeKind::CompilationUnit);
        assert_eq!(result.tree.children.len(), 1);
        let class_decl = &result.tree.children[0];
        assert_eq!(class_decl.kind, NodeKind::ClassDecl);
        let name = class_decl.children.iter().find(|c| c.kind == NodeKind::Identifier).expect("class name identifier");
        assert_eq!(name.token.as_ref().unwrap().text, "A");
    }

    #[test]
    fn bounds_safety_does_not_panic_on_adversarial_inputs() {
        // Invariant 7: no amount of truncated/garbage/deeply-nested source
        // causes a panic; worst case is an Error-bearing tree.
        let inputs: &[&[u8]] = &[
            b"",
            b"class",
            b"class A {",
            b"@",
            b"1 +",
            b"\"unterminated",
            b"'",
            b"/* unterminated block comment",
        ];
        for src in inputs {
            let result = parse_source(src, Some("Bad.java"), ParserOptions::default());
            assert_span_monotone(&result.tree);
        }
    }
}

fn kind_name(kind: NodeKind) -> &'static str {
    // A stable name per variant, independent of Debug formatting so that
    // renames of the enum's derive attributes never silently change what
    // the fidelity check compares.
    match kind {
        NodeKind::CompilationUnit => "CompilationUnit",
        NodeKind::PackageDecl => "PackageDecl",
        NodeKind::ImportDecl => "ImportDecl",
        NodeKind::ModuleDecl => "ModuleDecl",
        NodeKind::RequiresDirective => "RequiresDirective",
        NodeKind::ExportsDirective => "ExportsDirective",
        NodeKind::OpensDirective => "OpensDirective",
        NodeKind::UsesDirective => "UsesDirective",
        NodeKind::ProvidesDirective => "ProvidesDirective",
        NodeKind::ClassDecl => "ClassDecl",
        NodeKind::InterfaceDecl => "InterfaceDecl",
        NodeKind::EnumDecl => "EnumDecl",
        NodeKind::RecordDecl => "RecordDecl",
        NodeKind::AnnotationDecl => "AnnotationDecl",
        NodeKind::FieldDecl => "FieldDecl",
        NodeKind::MethodDecl => "MethodDecl",
        NodeKind::ConstructorDecl => "ConstructorDecl",
        NodeKind::Parameters => "Parameters",
        NodeKind::Parameter => "Parameter",
        NodeKind::Modifiers => "Modifiers",
        NodeKind::Annotation => "Annotation",
        NodeKind::AnnotationElement => "AnnotationElement",
        NodeKind::Type => "Type",
        NodeKind::ParameterizedType => "ParameterizedType",
        NodeKind::ArrayType => "ArrayType",
        NodeKind::TypeArguments => "TypeArguments",
        NodeKind::TypeArgument => "TypeArgument",
        NodeKind::Wildcard => "Wildcard",
        NodeKind::TypeParameters => "TypeParameters",
        NodeKind::TypeParameter => "TypeParameter",
        NodeKind::ExtendsClause => "ExtendsClause",
        NodeKind::ImplementsClause => "ImplementsClause",
        NodeKind::PermitsClause => "PermitsClause",
        NodeKind::ThrowsList => "ThrowsList",
        NodeKind::Block => "Block",
        NodeKind::EmptyStmt => "EmptyStmt",
        NodeKind::ExprStmt => "ExprStmt",
        NodeKind::LocalVarDecl => "LocalVarDecl",
        NodeKind::LocalClassDecl => "LocalClassDecl",
        NodeKind::IfStmt => "IfStmt",
        NodeKind::ForStmt => "ForStmt",
        NodeKind::EnhancedForStmt => "EnhancedForStmt",
        NodeKind::WhileStmt => "WhileStmt",
        NodeKind::DoStmt => "DoStmt",
        NodeKind::SwitchStmt => "SwitchStmt",
        NodeKind::ReturnStmt => "ReturnStmt",
        NodeKind::BreakStmt => "BreakStmt",
        NodeKind::ContinueStmt => "ContinueStmt",
        NodeKind::ThrowStmt => "ThrowStmt",
        NodeKind::TryStmt => "TryStmt",
        NodeKind::SynchronizedStmt => "SynchronizedStmt",
        NodeKind::AssertStmt => "AssertStmt",
        NodeKind::YieldStmt => "YieldStmt",
        NodeKind::LabeledStmt => "LabeledStmt",
        NodeKind::ExplicitConstructorInvocation => "ExplicitConstructorInvocation",
        NodeKind::Literal => "Literal",
        NodeKind::Identifier => "Identifier",
        NodeKind::This => "This",
        NodeKind::Super => "Super",
        NodeKind::QualifiedName => "QualifiedName",
        NodeKind::BinaryExpr => "BinaryExpr",
        NodeKind::UnaryExpr => "UnaryExpr",
        NodeKind::PostfixExpr => "PostfixExpr",
        NodeKind::AssignExpr => "AssignExpr",
        NodeKind::TernaryExpr => "TernaryExpr",
        NodeKind::CallExpr => "CallExpr",
        NodeKind::NewExpr => "NewExpr",
        NodeKind::NewArrayExpr => "NewArrayExpr",
        NodeKind::ArrayInit => "ArrayInit",
        NodeKind::FieldAccess => "FieldAccess",
        NodeKind::ArrayAccess => "ArrayAccess",
        NodeKind::CastExpr => "CastExpr",
        NodeKind::InstanceofExpr => "InstanceofExpr",
        NodeKind::ParenExpr => "ParenExpr",
        NodeKind::LambdaExpr => "LambdaExpr",
        NodeKind::MethodRef => "MethodRef",
        NodeKind::ClassLiteral => "ClassLiteral",
        NodeKind::SwitchExpr => "SwitchExpr",
        NodeKind::TypePattern => "TypePattern",
        NodeKind::RecordPattern => "RecordPattern",
        NodeKind::MatchAllPattern => "MatchAllPattern",
        NodeKind::SwitchCase => "SwitchCase",
        NodeKind::SwitchLabel => "SwitchLabel",
        NodeKind::Guard => "Guard",
        NodeKind::UnnamedVariable => "UnnamedVariable",
        NodeKind::Comment => "Comment",
        NodeKind::LineComment => "LineComment",
        NodeKind::Error => "Error",
    }
}
