//! Pretty-printer: walks a `Node` tree and emits normalized Java source.
//!
//! The load-bearing correctness property is that re-parsing the output
//! yields the same per-kind node multiset as the input (comments excluded);
//! nothing here tries to reproduce the original byte-for-byte layout.

use crate::errors::PrintError;
use crate::source::ast::{Node, NodeKind};
use crate::source::lexer::Comment;

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// When set, `tree` is expected to be a standalone expression wrapped in
    /// a `CompilationUnit` (as `parse_expression_standalone` produces) and
    /// only that expression is emitted, with no package/import/class frame.
    pub embedded_expression: bool,
}

const CANONICAL_MODIFIER_ORDER: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "sealed",
    "non-sealed",
    "transient",
    "volatile",
    "synchronized",
    "native",
    "strictfp",
    "default",
];

const CHAIN_BEGIN_METHODS: &[&str] = &["object", "array", "begin", "group", "block", "nest", "start"];
const CHAIN_END_METHODS: &[&str] = &["end", "done", "close", "finish", "complete"];
const CHAIN_STARTER_METHODS: &[&str] =
    &["stream", "parallelStream", "string", "builder", "of", "from", "create", "newBuilder", "values"];

fn is_arrow_marker(node: &Node) -> bool {
    node.kind == NodeKind::Identifier && node.token.as_ref().map(|t| t.text.as_str()) == Some("->")
}

pub fn pretty_print(tree: &Node, comments: &[Comment], source: &[u8], options: PrintOptions) -> Result<Vec<u8>, PrintError> {
    let mut printer = Printer::new(comments, source);
    if options.embedded_expression {
        if tree.children.len() != 1 {
            return Err(PrintError { message: "embedded-expression mode requires a single-expression tree".into() });
        }
        printer.emit_expr(&tree.children[0]);
        printer.newline();
        return Ok(printer.out.into_bytes());
    }
    if tree.kind != NodeKind::CompilationUnit {
        return Err(PrintError { message: format!("expected a CompilationUnit root, found {:?}", tree.kind) });
    }
    printer.emit_compilation_unit(tree)?;
    Ok(printer.out.into_bytes())
}

struct Printer<'a> {
    out: String,
    indent: usize,
    at_line_start: bool,
    last_line: usize,
    comments: &'a [Comment],
    comment_idx: usize,
    source: &'a [u8],
}

impl<'a> Printer<'a> {
    fn new(comments: &'a [Comment], source: &'a [u8]) -> Self {
        Printer { out: String::new(), indent: 0, at_line_start: true, last_line: 0, comments, comment_idx: 0, source }
    }

    fn write(&mut self, s: &str) {
        if self.at_line_start {
            for _ in 0..self.indent * 4 {
                self.out.push(' ');
            }
            self.at_line_start = false;
        }
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    fn push_indent(&mut self) {
        self.indent += 1;
    }

    fn pop_indent(&mut self) {
        self.indent -= 1;
    }

    /// Emits a blank line if the node's first source line is more than one
    /// line past the last thing this printer emitted.
    fn maybe_blank_line(&mut self, node: &Node) {
        let line = node.span.start.line;
        if self.last_line != 0 && line > self.last_line + 1 {
            self.newline();
        }
    }

    fn mark_emitted(&mut self, node: &Node) {
        self.last_line = node.span.end.line;
    }

    /// Emits every pending comment whose start line is before `line`, each on
    /// its own line at current indent.
    fn emit_comments_before(&mut self, line: usize) {
        while self.comment_idx < self.comments.len() && self.comments[self.comment_idx].span.start.line < line {
            let c = &self.comments[self.comment_idx];
            if !self.at_line_start {
                self.newline();
            }
            let text = c.text.clone();
            self.write(&text);
            self.newline();
            self.comment_idx += 1;
        }
    }

    /// A trailing line comment on the same source line as `line`, if any,
    /// held back from the pre-emit stream so the caller can append it after
    /// the node it trails.
    fn take_trailing_comment_on_line(&mut self, line: usize) -> Option<String> {
        if self.comment_idx < self.comments.len() && self.comments[self.comment_idx].span.start.line == line {
            let c = &self.comments[self.comment_idx];
            let text = c.text.clone();
            self.comment_idx += 1;
            Some(text)
        } else {
            None
        }
    }

    fn name_text<'n>(&self, node: &'n Node) -> &'n str {
        node.token.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// True if the source bytes between two sibling spans contain a `=`
    /// that is not part of `==`, `!=`, `<=`, `>=` — the printer's only
    /// source-byte peek, used to tell a local/field declarator's initializer
    /// apart from the next bare declarator name.
    fn has_bare_equals_between(&self, from: usize, to: usize) -> bool {
        if from >= to || to > self.source.len() {
            return false;
        }
        let gap = &self.source[from..to];
        for (i, &b) in gap.iter().enumerate() {
            if b != b'=' {
                continue;
            }
            let prev = if i == 0 { None } else { Some(gap[i - 1]) };
            let next = gap.get(i + 1).copied();
            if matches!(prev, Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>')) {
                continue;
            }
            if next == Some(b'=') {
                continue;
            }
            return true;
        }
        false
    }

    // --- top level ----------------------------------------------------

    fn emit_compilation_unit(&mut self, node: &Node) -> Result<(), PrintError> {
        let mut first = true;
        for child in &node.children {
            if !first {
                self.newline();
            }
            first = false;
            self.emit_comments_before(child.span.start.line);
            match child.kind {
                NodeKind::PackageDecl => self.emit_package_decl(child),
                NodeKind::ImportDecl => self.emit_import_decl(child),
                NodeKind::ModuleDecl => self.emit_module_decl(child),
                NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::EnumDecl | NodeKind::RecordDecl | NodeKind::AnnotationDecl => {
                    self.emit_type_decl(child)?
                }
                NodeKind::Modifiers => {
                    // `open module` prefix in module-info.java.
                    self.emit_modifiers_inline(child);
                    continue;
                }
                _ => return Err(PrintError { message: format!("unexpected top-level node {:?}", child.kind) }),
            }
            self.newline();
            self.mark_emitted(child);
        }
        Ok(())
    }

    fn emit_package_decl(&mut self, node: &Node) {
        self.write("package ");
        self.emit_qualified_name(&node.children[0]);
        self.write(";");
    }

    fn emit_import_decl(&mut self, node: &Node) {
        self.write("import ");
        let mut idx = 0;
        if self.name_text(&node.children[0]) == "static" {
            self.write("static ");
            idx = 1;
        }
        self.emit_qualified_name(&node.children[idx]);
        self.write(";");
    }

    fn emit_qualified_name(&mut self, node: &Node) {
        if node.kind == NodeKind::Identifier {
            self.write(self.name_text(node));
            return;
        }
        let mut first = true;
        for part in &node.children {
            if !first {
                self.write(".");
            }
            first = false;
            self.write(self.name_text(part));
        }
    }

    fn emit_module_decl(&mut self, node: &Node) {
        self.write("module ");
        self.emit_qualified_name(&node.children[0]);
        self.write(" {");
        self.newline();
        self.push_indent();
        for directive in &node.children[1..] {
            if directive.kind == NodeKind::Error {
                continue;
            }
            self.write_indented_directive(directive);
            self.newline();
        }
        self.pop_indent();
        self.write("}");
    }

    fn write_indented_directive(&mut self, node: &Node) {
        self.at_line_start = true;
        match node.kind {
            NodeKind::RequiresDirective => {
                self.write("requires ");
                let mut i = 0;
                while node.children[i].kind == NodeKind::Identifier && node.children.len() - i > 1 {
                    self.write(self.name_text(&node.children[i]));
                    self.write(" ");
                    i += 1;
                }
                self.emit_qualified_name(&node.children[i]);
                self.write(";");
            }
            NodeKind::ExportsDirective | NodeKind::OpensDirective => {
                self.write(if node.kind == NodeKind::ExportsDirective { "exports " } else { "opens " });
                self.emit_qualified_name(&node.children[0]);
                if node.children.len() > 1 {
                    self.write(" to ");
                    for (i, target) in node.children[1..].iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.emit_qualified_name(target);
                    }
                }
                self.write(";");
            }
            NodeKind::UsesDirective => {
                self.write("uses ");
                self.emit_qualified_name(&node.children[0]);
                self.write(";");
            }
            NodeKind::ProvidesDirective => {
                self.write("provides ");
                self.emit_qualified_name(&node.children[0]);
                if node.children.len() > 1 {
                    self.write(" with ");
                    for (i, target) in node.children[1..].iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.emit_qualified_name(target);
                    }
                }
                self.write(";");
            }
            _ => {}
        }
    }

    fn emit_modifiers_inline(&mut self, node: &Node) {
        for m in &node.children {
            self.write(self.name_text(m));
            self.write(" ");
        }
    }

    // --- type declarations ----------------------------------------------

    fn emit_type_decl(&mut self, node: &Node) -> Result<(), PrintError> {
        let mut idx = 0;
        self.emit_modifiers_block(&node.children[idx]);
        idx += 1;

        let keyword = match node.kind {
            NodeKind::ClassDecl => "class",
            NodeKind::InterfaceDecl => "interface",
            NodeKind::EnumDecl => "enum",
            NodeKind::RecordDecl => "record",
            NodeKind::AnnotationDecl => "@interface",
            _ => unreachable!(),
        };
        self.write(keyword);
        self.write(" ");
        self.write(self.name_text(&node.children[idx]));
        idx += 1;
        if idx < node.children.len() && node.children[idx].kind == NodeKind::Error {
            idx += 1;
        }

        if idx < node.children.len() && node.children[idx].kind == NodeKind::TypeParameters {
            self.emit_type_parameters(&node.children[idx]);
            idx += 1;
        }

        if node.kind == NodeKind::RecordDecl && idx < node.children.len() && node.children[idx].kind == NodeKind::Parameters {
            self.emit_formal_parameters(&node.children[idx]);
            idx += 1;
        }

        if idx < node.children.len() && node.children[idx].kind == NodeKind::ExtendsClause {
            self.write(" extends ");
            self.emit_type_list(&node.children[idx]);
            idx += 1;
        }
        if idx < node.children.len() && node.children[idx].kind == NodeKind::ImplementsClause {
            self.write(" implements ");
            self.emit_type_list(&node.children[idx]);
            idx += 1;
        }
        if idx < node.children.len() && node.children[idx].kind == NodeKind::PermitsClause {
            self.emit_permits_clause(&node.children[idx]);
            idx += 1;
        }

        self.write(" {");
        let members = &node.children[idx..];
        if members.is_empty() {
            self.write("}");
            return Ok(());
        }
        self.newline();
        self.push_indent();
        self.last_line = node.span.start.line;
        let mut first = true;
        for member in members {
            if member.kind == NodeKind::Error {
                continue;
            }
            self.emit_comments_before(member.span.start.line);
            if !first {
                self.newline();
            }
            first = false;
            self.maybe_blank_line(member);
            self.emit_member(member)?;
            self.newline();
            self.mark_emitted(member);
        }
        self.pop_indent();
        self.write("}");
        Ok(())
    }

    fn emit_type_list(&mut self, node: &Node) {
        for (i, ty) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_type(ty);
        }
    }

    fn emit_permits_clause(&mut self, node: &Node) {
        if node.children.len() <= 3 {
            self.write(" permits ");
            self.emit_type_list(node);
            return;
        }
        self.newline();
        self.push_indent();
        self.write("permits");
        self.newline();
        for chunk in node.children.chunks(3) {
            for (i, ty) in chunk.iter().enumerate() {
                if i == 0 {
                    self.write("");
                } else {
                    self.write(", ");
                }
                self.emit_type(ty);
            }
            self.write(",");
            self.newline();
        }
        // Drop the trailing comma+newline from the final chunk.
        if self.out.ends_with(",\n") {
            self.out.truncate(self.out.len() - 2);
            self.newline();
        }
        self.pop_indent();
    }

    fn emit_member(&mut self, node: &Node) -> Result<(), PrintError> {
        match node.kind {
            NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::EnumDecl | NodeKind::RecordDecl | NodeKind::AnnotationDecl => {
                self.emit_type_decl(node)
            }
            NodeKind::Block => {
                self.emit_block(node);
                Ok(())
            }
            NodeKind::FieldDecl => {
                self.emit_field_or_enum_constant(node);
                Ok(())
            }
            NodeKind::MethodDecl => {
                self.emit_method_decl(node);
                Ok(())
            }
            NodeKind::ConstructorDecl => {
                self.emit_constructor_decl(node);
                Ok(())
            }
            _ => Err(PrintError { message: format!("unexpected member node {:?}", node.kind) }),
        }
    }

    fn emit_field_or_enum_constant(&mut self, node: &Node) {
        if node.children[0].kind == NodeKind::Identifier {
            // Enum constant: Identifier [Parameters] [Block].
            self.write(self.name_text(&node.children[0]));
            for extra in &node.children[1..] {
                match extra.kind {
                    NodeKind::Parameters => self.emit_argument_list(extra),
                    NodeKind::Block => {
                        self.write(" {");
                        self.newline();
                        self.push_indent();
                        for m in &extra.children {
                            self.emit_member(m).ok();
                            self.newline();
                        }
                        self.pop_indent();
                        self.write("}");
                    }
                    _ => {}
                }
            }
            self.write(",");
            return;
        }
        self.emit_modifiers_block(&node.children[0]);
        self.emit_type(&node.children[1]);
        self.write(" ");
        self.emit_declarator_list(&node.children[2..]);
        self.write(";");
    }

    /// Shared by local variable declarations and field declarations: a flat
    /// child list of declarator names interleaved with optional initializer
    /// expressions, disambiguated by peeking the source bytes between each
    /// pair of sibling spans for a bare `=`.
    fn emit_declarator_list(&mut self, decls: &[Node]) {
        let mut i = 0;
        let mut first = true;
        while i < decls.len() {
            if decls[i].kind == NodeKind::Error {
                i += 1;
                continue;
            }
            if !first {
                self.write(", ");
            }
            first = false;
            let name = &decls[i];
            self.write(self.name_text(name));
            i += 1;
            if i < decls.len() && self.has_bare_equals_between(name.span.end.offset, decls[i].span.start.offset) {
                self.write(" = ");
                self.emit_variable_initializer(&decls[i]);
                i += 1;
            }
        }
    }

    fn emit_variable_initializer(&mut self, node: &Node) {
        if node.kind == NodeKind::ArrayInit {
            self.emit_array_init(node);
        } else {
            self.emit_expr(node);
        }
    }

    fn emit_array_init(&mut self, node: &Node) {
        self.write("{");
        for (i, el) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_variable_initializer(el);
        }
        self.write("}");
    }

    fn emit_method_decl(&mut self, node: &Node) {
        let mut idx = 0;
        self.emit_modifiers_block(&node.children[idx]);
        idx += 1;
        if node.children[idx].kind == NodeKind::TypeParameters {
            self.emit_type_parameters(&node.children[idx]);
            self.write(" ");
            idx += 1;
        }
        self.emit_type(&node.children[idx]);
        self.write(" ");
        idx += 1;
        self.write(self.name_text(&node.children[idx]));
        idx += 1;
        if node.children[idx].kind == NodeKind::Error {
            idx += 1;
        }
        self.emit_formal_parameters(&node.children[idx]);
        idx += 1;
        if idx < node.children.len() && node.children[idx].kind == NodeKind::ThrowsList {
            self.write(" throws ");
            self.emit_type_list(&node.children[idx]);
            idx += 1;
        }
        if idx < node.children.len() && node.children[idx].kind == NodeKind::Block {
            self.write(" ");
            self.emit_block(&node.children[idx]);
        } else {
            self.write(";");
        }
    }

    fn emit_constructor_decl(&mut self, node: &Node) {
        self.emit_modifiers_block(&node.children[0]);
        self.write(self.name_text(&node.children[1]));
        // A record's compact constructor carries a zero-width `Parameters`
        // span: no `()` ever existed in source, unlike an ordinary
        // zero-parameter constructor whose span covers the parens.
        let params = &node.children[2];
        if params.span.start.offset != params.span.end.offset {
            self.emit_formal_parameters(params);
        }
        let mut idx = 3;
        if idx < node.children.len() && node.children[idx].kind == NodeKind::ThrowsList {
            self.write(" throws ");
            self.emit_type_list(&node.children[idx]);
            idx += 1;
        }
        self.write(" ");
        self.emit_block(&node.children[idx]);
    }

    fn emit_modifiers_block(&mut self, node: &Node) {
        if node.children.is_empty() {
            return;
        }
        // Annotations on a declaration head go on their own line; keyword
        // modifiers are re-ordered into the canonical sequence.
        let mut keywords = Vec::new();
        for m in &node.children {
            if m.kind == NodeKind::Annotation {
                self.emit_comments_before(m.span.start.line);
                self.emit_annotation(m);
                if let Some(trailing) = self.take_trailing_comment_on_line(m.span.end.line) {
                    self.write(" ");
                    self.write(&trailing);
                }
                self.newline();
            } else {
                keywords.push(self.name_text(m));
            }
        }
        keywords.sort_by_key(|k| CANONICAL_MODIFIER_ORDER.iter().position(|c| c == k).unwrap_or(CANONICAL_MODIFIER_ORDER.len()));
        for k in keywords {
            self.write(k);
            self.write(" ");
        }
    }

    fn emit_annotation(&mut self, node: &Node) {
        self.write("@");
        self.emit_qualified_name(&node.children[0]);
        if node.children.len() > 1 {
            self.write("(");
            if node.children.len() == 2 && node.children[1].kind != NodeKind::AnnotationElement {
                self.emit_annotation_value(&node.children[1]);
            } else {
                for (i, el) in node.children[1..].iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(self.name_text(&el.children[0]));
                    self.write(" = ");
                    self.emit_annotation_value(&el.children[1]);
                }
            }
            self.write(")");
        }
    }

    fn emit_annotation_value(&mut self, node: &Node) {
        match node.kind {
            NodeKind::ArrayInit => self.emit_array_init(node),
            NodeKind::Annotation => self.emit_annotation(node),
            _ => self.emit_expr(node),
        }
    }

    fn emit_type_parameters(&mut self, node: &Node) {
        self.write("<");
        for (i, tp) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(self.name_text(&tp.children[0]));
            if tp.children.len() > 1 {
                self.write(" extends ");
                for (j, bound) in tp.children[1..].iter().enumerate() {
                    if j > 0 {
                        self.write(" & ");
                    }
                    self.emit_type(bound);
                }
            }
        }
        self.write(">");
    }

    fn emit_formal_parameters(&mut self, node: &Node) {
        self.write("(");
        for (i, p) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_modifiers_inline(&p.children[0]);
            self.emit_type(&p.children[1]);
            self.write(" ");
            self.write(self.name_text(&p.children[2]));
        }
        self.write(")");
    }

    // --- types ------------------------------------------------------

    fn emit_type(&mut self, node: &Node) {
        match node.kind {
            NodeKind::ArrayType => {
                self.emit_type(&node.children[0]);
                self.write("[]");
            }
            NodeKind::Type => {
                self.emit_qualified_name(&node.children[0]);
                if node.children.len() > 1 {
                    self.emit_type_arguments(&node.children[1]);
                }
            }
            NodeKind::Identifier => self.write(self.name_text(node)),
            _ => self.emit_qualified_name(node),
        }
    }

    fn emit_type_arguments(&mut self, node: &Node) {
        self.write("<");
        for (i, arg) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match arg.kind {
                NodeKind::Wildcard => {
                    self.write("?");
                    if arg.children.len() > 1 {
                        self.write(" ");
                        self.write(self.name_text(&arg.children[0]));
                        self.write(" ");
                        self.emit_type(&arg.children[1]);
                    }
                }
                NodeKind::TypeArgument => self.emit_type(&arg.children[0]),
                _ => self.emit_type(arg),
            }
        }
        self.write(">");
    }

    // --- statements ---------------------------------------------------

    fn emit_block(&mut self, node: &Node) {
        if node.children.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.newline();
        self.push_indent();
        self.last_line = node.span.start.line;
        for (i, stmt) in node.children.iter().enumerate() {
            self.emit_comments_before(stmt.span.start.line);
            if i > 0 {
                self.maybe_blank_line(stmt);
            }
            self.emit_statement(stmt);
            self.newline();
            self.mark_emitted(stmt);
        }
        self.pop_indent();
        self.write("}");
    }

    fn emit_statement(&mut self, node: &Node) {
        match node.kind {
            NodeKind::EmptyStmt => self.write(";"),
            NodeKind::Block => self.emit_block(node),
            NodeKind::ExprStmt => {
                self.emit_expr(&node.children[0]);
                self.write(";");
            }
            NodeKind::LocalVarDecl => {
                self.emit_modifiers_inline(&node.children[0]);
                self.emit_type(&node.children[1]);
                self.write(" ");
                self.emit_declarator_list(&node.children[2..]);
                self.write(";");
            }
            NodeKind::LocalClassDecl => {
                self.emit_type_decl(&node.children[0]).ok();
            }
            NodeKind::IfStmt => self.emit_if(node),
            NodeKind::ForStmt => self.emit_for(node),
            NodeKind::EnhancedForStmt => self.emit_enhanced_for(node),
            NodeKind::WhileStmt => {
                self.write("while (");
                self.emit_expr(&node.children[0]);
                self.write(") ");
                self.emit_statement(&node.children[1]);
            }
            NodeKind::DoStmt => {
                self.write("do ");
                self.emit_statement(&node.children[0]);
                self.write(" while (");
                self.emit_expr(&node.children[1]);
                self.write(");");
            }
            NodeKind::SwitchStmt | NodeKind::SwitchExpr => self.emit_switch(node),
            NodeKind::ReturnStmt => {
                self.write("return");
                if let Some(expr) = node.children.first() {
                    self.write(" ");
                    self.emit_expr(expr);
                }
                self.write(";");
            }
            NodeKind::BreakStmt => {
                self.write("break");
                if let Some(label) = node.children.first() {
                    self.write(" ");
                    self.write(self.name_text(label));
                }
                self.write(";");
            }
            NodeKind::ContinueStmt => {
                self.write("continue");
                if let Some(label) = node.children.first() {
                    self.write(" ");
                    self.write(self.name_text(label));
                }
                self.write(";");
            }
            NodeKind::ThrowStmt => {
                self.write("throw ");
                self.emit_expr(&node.children[0]);
                self.write(";");
            }
            NodeKind::YieldStmt => {
                self.write("yield ");
                self.emit_expr(&node.children[0]);
                self.write(";");
            }
            NodeKind::TryStmt => self.emit_try(node),
            NodeKind::SynchronizedStmt => {
                self.write("synchronized (");
                self.emit_expr(&node.children[0]);
                self.write(") ");
                self.emit_block(&node.children[1]);
            }
            NodeKind::AssertStmt => {
                self.write("assert ");
                self.emit_expr(&node.children[0]);
                if node.children.len() > 1 {
                    self.write(" : ");
                    self.emit_expr(&node.children[1]);
                }
                self.write(";");
            }
            NodeKind::LabeledStmt => {
                self.write(self.name_text(&node.children[0]));
                self.write(": ");
                self.emit_statement(&node.children[1]);
            }
            NodeKind::ExplicitConstructorInvocation => self.emit_explicit_ctor_invocation(node),
            _ => self.write(&format!("/* unsupported statement {:?} */", node.kind)),
        }
    }

    fn emit_explicit_ctor_invocation(&mut self, node: &Node) {
        let mut idx = 0;
        if node.children[0].kind == NodeKind::Identifier {
            self.write(self.name_text(&node.children[0]));
            self.write(".");
            idx = 1;
        }
        self.write(if node.children[idx].kind == NodeKind::This { "this" } else { "super" });
        idx += 1;
        self.emit_argument_list(&node.children[idx]);
        self.write(";");
    }

    fn emit_if(&mut self, node: &Node) {
        self.write("if (");
        self.emit_expr(&node.children[0]);
        self.write(") ");
        self.emit_statement(&node.children[1]);
        if let Some(else_branch) = node.children.get(2) {
            if node.children[1].kind == NodeKind::Block {
                self.write(" else ");
            } else {
                self.newline();
                self.write("else ");
            }
            self.emit_statement(else_branch);
        }
    }

    fn emit_for(&mut self, node: &Node) {
        self.write("for (");
        self.emit_for_clause(&node.children[0]);
        self.write("; ");
        self.emit_for_clause(&node.children[1]);
        self.write("; ");
        let update_end = node.children.len() - 1;
        for (i, upd) in node.children[2..update_end].iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(upd);
        }
        self.write(") ");
        self.emit_statement(&node.children[update_end]);
    }

    fn emit_for_clause(&mut self, node: &Node) {
        match node.kind {
            NodeKind::EmptyStmt => {}
            NodeKind::LocalVarDecl => {
                self.emit_modifiers_inline(&node.children[0]);
                self.emit_type(&node.children[1]);
                self.write(" ");
                self.emit_declarator_list(&node.children[2..]);
            }
            NodeKind::ExprStmt => self.emit_expr(&node.children[0]),
            _ => self.emit_expr(node),
        }
    }

    fn emit_enhanced_for(&mut self, node: &Node) {
        self.write("for (");
        self.emit_modifiers_inline(&node.children[0]);
        self.emit_type(&node.children[1]);
        self.write(" ");
        self.write(self.name_text(&node.children[2]));
        self.write(" : ");
        self.emit_expr(&node.children[3]);
        self.write(") ");
        self.emit_statement(&node.children[4]);
    }

    fn emit_try(&mut self, node: &Node) {
        self.write("try ");
        let mut idx = 0;
        if node.children[0].kind == NodeKind::Parameters {
            self.write("(");
            for (i, res) in node.children[0].children.iter().enumerate() {
                if i > 0 {
                    self.write("; ");
                }
                self.emit_modifiers_inline(&res.children[0]);
                self.emit_type(&res.children[1]);
                self.write(" ");
                self.write(self.name_text(&res.children[2]));
                if res.children.len() > 3 {
                    self.write(" = ");
                    self.emit_expr(&res.children[3]);
                }
            }
            self.write(") ");
            idx = 1;
        }
        self.emit_block(&node.children[idx]);
        idx += 1;
        while idx < node.children.len() && node.children[idx].kind == NodeKind::Block {
            let clause = &node.children[idx];
            // Distinguish catch (types + name + body) from finally (single body child).
            if clause.children.len() == 1 {
                self.write(" finally ");
                self.emit_block(&clause.children[0]);
            } else {
                self.write(" catch (");
                let body_idx = clause.children.len() - 1;
                let name_idx = body_idx - 1;
                self.emit_modifiers_inline(&clause.children[0]);
                for (i, ty) in clause.children[1..name_idx].iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.emit_type(ty);
                }
                self.write(" ");
                self.write(self.name_text(&clause.children[name_idx]));
                self.write(") ");
                self.emit_block(&clause.children[body_idx]);
            }
            idx += 1;
        }
    }

    // --- switch ---------------------------------------------------------

    fn emit_switch(&mut self, node: &Node) {
        self.write("switch (");
        self.emit_expr(&node.children[0]);
        self.write(") {");
        self.newline();
        self.push_indent();
        for case in &node.children[1..] {
            self.at_line_start = true;
            self.emit_switch_case(case);
            self.newline();
        }
        self.pop_indent();
        self.write("}");
    }

    fn emit_switch_case(&mut self, node: &Node) {
        let mut idx = 0;
        let mut labels = Vec::new();
        while idx < node.children.len() && node.children[idx].kind == NodeKind::SwitchLabel {
            labels.push(&node.children[idx]);
            idx += 1;
        }
        self.emit_switch_labels(&labels);
        let body = &node.children[idx..];
        // The parser marks the last label with a synthetic `->` child when
        // the case used arrow syntax; that's the only reliable signal,
        // since a colon-style case can have exactly one statement too.
        let is_arrow = labels.last().map(|l| l.children.iter().any(is_arrow_marker)).unwrap_or(false);
        if is_arrow {
            self.write(" -> ");
            match body.first() {
                Some(n) if n.kind == NodeKind::Block => self.emit_block(n),
                Some(n) if n.kind == NodeKind::YieldStmt || n.kind == NodeKind::ThrowStmt => {
                    self.emit_statement(n);
                }
                Some(n) if n.kind == NodeKind::ExprStmt => {
                    self.emit_expr(&n.children[0]);
                    self.write(";");
                }
                Some(n) => self.emit_statement(n),
                None => self.write(";"),
            }
        } else {
            self.write(":");
            if !body.is_empty() {
                self.newline();
                self.push_indent();
                for (i, stmt) in body.iter().enumerate() {
                    if i > 0 {
                        self.newline();
                    }
                    self.at_line_start = true;
                    self.emit_statement(stmt);
                }
                self.pop_indent();
            }
        }
    }

    /// Writes the `case`/`default` keyword exactly once for the whole group
    /// of labels preceding a case body, then a comma-joined pattern list —
    /// "Multiple labels may precede one case body" (spec.md §4.3/§4.4).
    fn emit_switch_labels(&mut self, labels: &[&Node]) {
        if labels.len() == 1 && labels[0].token.is_some() {
            self.write("default");
            return;
        }
        self.write("case ");
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_switch_label_pattern(label);
        }
        if let Some(guard) = labels.iter().find_map(|l| l.children.iter().find(|c| c.kind == NodeKind::Guard)) {
            self.write(" when ");
            self.emit_expr(&guard.children[0]);
        }
    }

    /// Renders one label's pattern content only — no `case`/`default`
    /// keyword and no guard, both of which `emit_switch_labels` owns since
    /// they apply once per label group rather than once per label.
    fn emit_switch_label_pattern(&mut self, node: &Node) {
        if node.token.is_some() {
            self.write("default");
            return;
        }
        let real: Vec<&Node> = node.children.iter().filter(|c| !is_arrow_marker(c) && c.kind != NodeKind::Guard).collect();
        if real.is_empty() {
            self.write("default");
            return;
        }
        if real[0].kind == NodeKind::Literal {
            self.write("null");
            if real.len() > 1 {
                self.write(", default");
            }
            return;
        }
        self.emit_pattern(real[0]);
    }

    fn emit_pattern(&mut self, node: &Node) {
        match node.kind {
            NodeKind::MatchAllPattern => self.write("_"),
            NodeKind::TypePattern => {
                let mut idx = 0;
                if node.children[idx].kind == NodeKind::Modifiers {
                    self.emit_modifiers_inline(&node.children[idx]);
                    idx += 1;
                }
                self.emit_type(&node.children[idx]);
                if let Some(name) = node.children.get(idx + 1) {
                    self.write(" ");
                    self.write(self.name_text(name));
                }
            }
            NodeKind::RecordPattern => {
                let mut idx = 0;
                if node.children[idx].kind == NodeKind::Modifiers {
                    idx += 1;
                }
                self.emit_type(&node.children[idx]);
                idx += 1;
                self.write("(");
                for (i, sub) in node.children[idx..].iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_pattern(sub);
                }
                self.write(")");
            }
            _ => {}
        }
    }

    // --- expressions ------------------------------------------------

    fn emit_expr(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Literal | NodeKind::Identifier => self.write(self.name_text(node)),
            NodeKind::This => self.write("this"),
            NodeKind::Super => self.write("super"),
            NodeKind::QualifiedName => self.emit_qualified_name(node),
            NodeKind::BinaryExpr => {
                self.emit_expr(&node.children[0]);
                self.write(" ");
                self.write(self.name_text(&node.children[1]));
                self.write(" ");
                self.emit_expr(&node.children[2]);
            }
            NodeKind::InstanceofExpr => {
                self.emit_expr(&node.children[0]);
                self.write(" instanceof ");
                if node.children[1].kind == NodeKind::Type {
                    self.emit_type(&node.children[1]);
                } else {
                    self.emit_pattern(&node.children[1]);
                }
            }
            NodeKind::UnaryExpr => {
                self.write(self.name_text(&node.children[0]));
                self.emit_expr(&node.children[1]);
            }
            NodeKind::PostfixExpr => {
                self.emit_expr(&node.children[0]);
                self.write(self.name_text(&node.children[1]));
            }
            NodeKind::AssignExpr => {
                self.emit_expr(&node.children[0]);
                self.write(" ");
                self.write(self.name_text(&node.children[1]));
                self.write(" ");
                self.emit_expr(&node.children[2]);
            }
            NodeKind::TernaryExpr => {
                self.emit_expr(&node.children[0]);
                self.write(" ? ");
                self.emit_expr(&node.children[1]);
                self.write(" : ");
                self.emit_expr(&node.children[2]);
            }
            NodeKind::CallExpr => self.emit_call_chain(node),
            NodeKind::FieldAccess => {
                self.emit_expr(&node.children[0]);
                self.write(".");
                self.write(self.name_text(&node.children[1]));
            }
            NodeKind::ArrayAccess => {
                self.emit_expr(&node.children[0]);
                self.write("[");
                self.emit_expr(&node.children[1]);
                self.write("]");
            }
            NodeKind::CastExpr => {
                self.write("(");
                self.emit_type(&node.children[0]);
                self.write(") ");
                self.emit_expr(node.children.last().unwrap());
            }
            NodeKind::ParenExpr => {
                self.write("(");
                self.emit_expr(&node.children[0]);
                self.write(")");
            }
            NodeKind::LambdaExpr => {
                let params = &node.children[0];
                if params.children.len() == 1 && params.children[0].children.len() == 1 {
                    self.write(self.name_text(&params.children[0].children[0]));
                } else {
                    self.write("(");
                    for (i, p) in params.children.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        if p.children.len() > 1 {
                            self.emit_type(&p.children[1]);
                            self.write(" ");
                        }
                        self.write(self.name_text(p.children.last().unwrap()));
                    }
                    self.write(")");
                }
                self.write(" -> ");
                if node.children[1].kind == NodeKind::Block {
                    self.emit_block(&node.children[1]);
                } else {
                    self.emit_expr(&node.children[1]);
                }
            }
            NodeKind::MethodRef => {
                self.emit_expr(&node.children[0]);
                self.write("::");
                self.write(self.name_text(&node.children[1]));
            }
            NodeKind::ClassLiteral => {
                if node.children[0].kind == NodeKind::Type || node.children[0].kind == NodeKind::ArrayType {
                    self.emit_type(&node.children[0]);
                } else {
                    self.emit_expr(&node.children[0]);
                }
                self.write(".class");
            }
            NodeKind::NewExpr => self.emit_new(node),
            NodeKind::NewArrayExpr => self.emit_new_array(node),
            NodeKind::ArrayInit => self.emit_array_init(node),
            NodeKind::SwitchExpr => self.emit_switch(node),
            NodeKind::Error => self.write("/* error */"),
            _ => self.write(&format!("/* unsupported expr {:?} */", node.kind)),
        }
    }

    fn emit_new(&mut self, node: &Node) {
        self.write("new ");
        self.emit_type(&node.children[0]);
        if let Some(args) = node.children.get(1) {
            if args.kind == NodeKind::Parameters {
                self.emit_argument_list(args);
            } else {
                // qualifier.new Inner(...)
                self.emit_expr(args);
                return;
            }
        }
        if let Some(body) = node.children.get(2) {
            self.write(" {");
            self.newline();
            self.push_indent();
            for m in &body.children {
                self.emit_member(m).ok();
                self.newline();
            }
            self.pop_indent();
            self.write("}");
        }
    }

    fn emit_new_array(&mut self, node: &Node) {
        self.write("new ");
        let mut idx = 0;
        self.emit_type(&node.children[idx]);
        idx += 1;
        let has_init = node.children.last().map(|n| n.kind == NodeKind::ArrayInit).unwrap_or(false);
        let dim_end = if has_init { node.children.len() - 1 } else { node.children.len() };
        let mut wrote_dim = false;
        for dim in &node.children[idx..dim_end] {
            self.write("[");
            self.emit_expr(dim);
            self.write("]");
            wrote_dim = true;
        }
        if !wrote_dim && !has_init {
            self.write("[]");
        }
        if has_init {
            self.write(" ");
            self.emit_array_init(node.children.last().unwrap());
        }
    }

    fn emit_argument_list(&mut self, node: &Node) {
        self.write("(");
        for (i, arg) in node.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(arg);
        }
        self.write(")");
    }

    /// Emits a `.method(args)` chain. Chains longer than two calls break
    /// onto one line per call, indented one level past the base.
    fn emit_call_chain(&mut self, node: &Node) {
        let mut links = Vec::new();
        let mut cur = node;
        while cur.kind == NodeKind::CallExpr {
            links.push(cur);
            cur = &cur.children[0];
        }
        links.reverse();
        let base = cur;

        if links.len() <= 2 {
            self.emit_expr(base);
            for link in &links {
                self.write(".");
                self.write(self.name_text(&link.children[1]));
                self.emit_argument_list(&link.children[2]);
            }
            return;
        }

        self.emit_expr(base);
        self.push_indent();
        let mut depth = 0i32;
        for link in &links {
            let name = self.name_text(&link.children[1]).to_string();
            if CHAIN_STARTER_METHODS.contains(&name.as_str()) {
                self.write(".");
                self.write(&name);
                self.emit_argument_list(&link.children[2]);
                continue;
            }
            self.newline();
            self.write(".");
            self.write(&name);
            self.emit_argument_list(&link.children[2]);
            if CHAIN_BEGIN_METHODS.contains(&name.as_str()) {
                depth += 1;
                self.push_indent();
            } else if CHAIN_END_METHODS.contains(&name.as_str()) && depth > 0 {
                depth -= 1;
                self.pop_indent();
            }
        }
        while depth > 0 {
            self.pop_indent();
            depth -= 1;
        }
        self.pop_indent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{parse_source, ParserOptions};

    fn round_trip(src: &str) -> String {
        let first = parse_source(src.as_bytes(), Some("Test.java"), ParserOptions::default());
        assert!(first.tree.find_errors().is_empty(), "unexpected parse errors in input: {:?}", first.tree.find_errors());
        let printed = pretty_print(&first.tree, &first.comments, src.as_bytes(), PrintOptions::default()).expect("print");
        let printed_src = String::from_utf8(printed).expect("utf8");
        let second = parse_source(printed_src.as_bytes(), Some("Test.java"), ParserOptions::default());
        assert!(second.tree.find_errors().is_empty(), "reparse errors in:\n{printed_src}\n{:?}", second.tree.find_errors());
        assert_eq!(first.tree.kind_multiset(), second.tree.kind_multiset(), "round-trip multiset mismatch for:\n{printed_src}");
        printed_src
    }

    #[test]
    fn switch_arrow_and_colon_cases_round_trip_without_mixing_syntax() {
        let src = r#"
class Example {
    int describe(int x) {
        switch (x) {
            case 1:
                return 5;
            case 2, 3:
                return 6;
            default:
                return 0;
        }
    }

    int arrowForm(int x) {
        switch (x) {
            case 1 -> 5;
            default -> 0;
        }
    }
}
"#;
        let printed = round_trip(src);
        // A single-statement colon case must never be rewritten with `->`,
        // since `return`/`throw`-as-statement isn't legal as an arrow body.
        assert!(!printed.contains("-> return"));
        assert!(printed.contains("case 1:"));
        assert!(printed.contains("case 1 -> 5;"));
        // Multiple labels share one `case` keyword, not one per label.
        assert!(printed.contains("case 2, 3:"));
        assert!(!printed.contains("case 2, case 3"));
    }

    #[test]
    fn switch_null_default_compound_label_round_trips() {
        let src = r#"
class Example {
    String describe(String s) {
        switch (s) {
            case null, default:
                return "other";
        }
    }
}
"#;
        let printed = round_trip(src);
        assert!(printed.contains("case null, default"));
    }

    #[test]
    fn record_compact_constructor_round_trips_without_parens() {
        let src = r#"
record Point(int x, int y) {
    Point {
        if (x < 0) throw new IllegalArgumentException();
    }
}
"#;
        let printed = round_trip(src);
        assert!(printed.contains("Point {"));
        assert!(!printed.contains("Point() {"));
        assert!(!printed.contains("Point () {"));
    }

    #[test]
    fn right_shift_operators_round_trip_distinctly_from_generics_closing() {
        let src = r#"
class Example {
    void m() {
        int a = 1 >> 2;
        int b = 1 >>> 2;
        a >>= 1;
        b >>>= 1;
        java.util.Map<String, java.util.List<Integer>> nested = new java.util.HashMap<>();
    }
}
"#;
        let printed = round_trip(src);
        assert!(printed.contains(">>="));
        assert!(printed.contains(">>>="));
        assert!(printed.contains("1 >> 2"));
        assert!(printed.contains("1 >>> 2"));
    }

    #[test]
    fn long_permits_clause_wraps_at_hanging_indent() {
        // Scenario S3: 7 entries must break across multiple lines.
        let src = "sealed interface S permits A, B, C, D, E, F, G {}";
        let printed = round_trip(src);
        assert!(printed.contains("permits"));
        let permits_line_idx = printed.lines().position(|l| l.trim_start().starts_with("permits")).expect("a permits line");
        assert!(permits_line_idx > 0, "permits should have broken onto its own line");

        let reparsed = parse_source(printed.as_bytes(), Some("Test.java"), ParserOptions::default());
        let iface = &reparsed.tree.children[0];
        let permits = iface.children.iter().find(|c| c.kind == NodeKind::PermitsClause).expect("PermitsClause");
        assert_eq!(permits.children.len(), 7);
        let names: Vec<&str> = permits
            .children
            .iter()
            .map(|ty| ty.children[0].token.as_ref().unwrap().text.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E", "F", "G"]);
    }

    #[test]
    fn long_method_chain_breaks_one_call_per_line() {
        // Scenario S5: more than 2 chained calls wrap, one `.call(...)` per
        // line, each indented one level past the base.
        let src = r#"
class Example {
    void m() {
        a.b().c().d().e().f();
    }
}
"#;
        let printed = round_trip(src);
        let dot_lines: Vec<&str> = printed.lines().filter(|l| l.trim_start().starts_with('.')).collect();
        assert_eq!(dot_lines.len(), 5, "expected five wrapped `.call()` lines, got:\n{printed}");
        for line in &dot_lines {
            assert!(line.starts_with("            ."), "expected one level past the statement's own indent: {line:?}");
        }

        let reparsed = parse_source(printed.as_bytes(), Some("Test.java"), ParserOptions::default());
        assert!(reparsed.tree.find_errors().is_empty());
        let call_count = reparsed.tree.kind_multiset().get("CallExpr").copied().unwrap_or(0);
        assert_eq!(call_count, 5);
    }

    #[test]
    fn record_pattern_with_guard_and_null_default_round_trips() {
        // Scenario S6.
        let src = r#"
class Example {
    int describe(Object o) {
        switch (o) {
            case Point(var x, var _) when x > 0 -> 1;
            case null, default -> 0;
        }
        return 0;
    }
}
"#;
        let printed = round_trip(src);
        let reparsed = parse_source(printed.as_bytes(), Some("Test.java"), ParserOptions::default());
        assert!(reparsed.tree.find_errors().is_empty());
        let counts = reparsed.tree.kind_multiset();
        assert_eq!(*counts.get("RecordPattern").unwrap_or(&0), 1);
        assert_eq!(*counts.get("MatchAllPattern").unwrap_or(&0), 1);
        assert_eq!(*counts.get("Guard").unwrap_or(&0), 1);
        assert!(printed.contains("case null, default"));
    }
}
