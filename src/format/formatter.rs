//! Core formatting logic for C# source
//!
//! Walks the AST and emits formatted source. Declarations and statements go one per line; expressions print on a
//! single line exactly as structured. Parenthesized expressions are explicit nodes, so the printer never adds or
//! drops parentheses and re-parsing the output yields the same tree.

use sharpen_core::lang::keywords;
use sharpen_syntax::ast::*;
use sharpen_syntax::lexer::keyword_id;

use super::config::FormatConfig;
use super::writer::FormatWriter;

/// Formatter that transforms an AST back to formatted source code
pub struct Formatter {
    writer: FormatWriter,
}

impl Formatter {
    /// Create a new formatter with the given config
    pub fn new(config: FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(config),
        }
    }

    /// Format a compilation unit and return the formatted source
    pub fn format(mut self, unit: &CompilationUnit) -> String {
        self.format_unit(unit);
        self.writer.finish()
    }

    // ========================================================================
    // Compilation unit and namespaces
    // ========================================================================

    fn format_unit(&mut self, unit: &CompilationUnit) {
        let mut first = true;
        self.format_prologue(&unit.externs, &unit.usings, &mut first);
        if !unit.attributes.is_empty() {
            self.section_break(&mut first);
            for section in &unit.attributes {
                self.format_attribute_section(&section.node);
                self.writer.newline();
            }
        }
        self.format_namespace_members(&unit.members, &mut first);
    }

    /// One blank line between groups (externs, usings, attributes, members), none before the first.
    fn section_break(&mut self, first: &mut bool) {
        if !*first {
            self.writer.newline();
        }
        *first = false;
    }

    fn format_prologue(&mut self, externs: &[Spanned<Ident>], usings: &[Spanned<UsingDirective>], first: &mut bool) {
        if !externs.is_empty() {
            self.section_break(first);
            for name in externs {
                self.writer.write("extern alias ");
                self.ident(&name.node);
                self.writer.writeln(";");
            }
        }
        if !usings.is_empty() {
            self.section_break(first);
            for using in usings {
                self.format_using(&using.node);
            }
        }
    }

    fn format_using(&mut self, using: &UsingDirective) {
        self.writer.write("using ");
        match using {
            UsingDirective::Namespace(name) => self.format_type_name(name),
            UsingDirective::Static(name) => {
                self.writer.write("static ");
                self.format_type_name(name);
            }
            UsingDirective::Alias { alias, target } => {
                self.ident(alias);
                self.writer.write(" = ");
                self.format_type(&target.node);
            }
        }
        self.writer.writeln(";");
    }

    fn format_namespace_members(&mut self, members: &[Spanned<NamespaceMember>], first: &mut bool) {
        let blank = self.writer.config().blank_lines_between_members;
        for (i, member) in members.iter().enumerate() {
            if i == 0 {
                self.section_break(first);
            } else {
                self.writer.blank_lines(blank);
            }
            match &member.node {
                NamespaceMember::Namespace(ns) => self.format_namespace(ns),
                NamespaceMember::Type(decl) => self.format_type_decl(decl),
                NamespaceMember::Error => self.writer.writeln("/* error */"),
            }
        }
    }

    fn format_namespace(&mut self, ns: &NamespaceDecl) {
        self.writer.write("namespace ");
        self.format_type_name(&ns.name);
        if ns.file_scoped {
            self.writer.writeln(";");
            let mut first = false;
            self.format_prologue(&ns.externs, &ns.usings, &mut first);
            self.format_namespace_members(&ns.members, &mut first);
            return;
        }
        self.writer.open_brace();
        let mut first = true;
        self.format_prologue(&ns.externs, &ns.usings, &mut first);
        self.format_namespace_members(&ns.members, &mut first);
        self.writer.close_brace();
        self.writer.newline();
    }

    // ========================================================================
    // Attributes and modifiers
    // ========================================================================

    fn format_attribute_section(&mut self, section: &AttributeSection) {
        self.writer.write("[");
        if let Some(target) = &section.target {
            self.writer.write(target);
            self.writer.write(": ");
        }
        for (i, attribute) in section.attributes.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.format_type_name(&attribute.node.name);
            if !attribute.node.args.is_empty() {
                self.format_args("(", &attribute.node.args, ")");
            }
        }
        self.writer.write("]");
    }

    fn format_attribute_lines(&mut self, sections: &[Spanned<AttributeSection>]) {
        for section in sections {
            self.format_attribute_section(&section.node);
            self.writer.newline();
        }
    }

    fn format_attributes_inline(&mut self, sections: &[Spanned<AttributeSection>]) {
        for section in sections {
            self.format_attribute_section(&section.node);
            self.writer.write(" ");
        }
    }

    fn format_modifiers(&mut self, modifiers: &[Spanned<Modifier>]) {
        for modifier in modifiers {
            self.writer.write(modifier.node.as_str());
            self.writer.write(" ");
        }
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    fn format_type_decl(&mut self, decl: &TypeDecl) {
        self.format_attribute_lines(&decl.attributes);
        self.format_modifiers(&decl.modifiers);
        match &decl.body {
            TypeBody::Class { kind, members } => {
                self.writer.write(kind.as_str());
                self.writer.write(" ");
                self.ident(&decl.name);
                self.format_type_params(&decl.type_params);
                self.format_base_list(&decl.base_list);
                self.format_constraints(&decl.constraints);
                self.writer.open_brace();
                self.format_members(members);
                self.writer.close_brace();
                self.writer.newline();
            }
            TypeBody::Enum(members) => {
                self.writer.write("enum ");
                self.ident(&decl.name);
                self.format_base_list(&decl.base_list);
                self.writer.open_brace();
                for (i, member) in members.iter().enumerate() {
                    self.format_attributes_inline(&member.node.attributes);
                    self.ident(&member.node.name);
                    if let Some(value) = &member.node.value {
                        self.writer.write(" = ");
                        self.format_expr(&value.node);
                    }
                    if i + 1 < members.len() {
                        self.writer.write(",");
                    }
                    self.writer.newline();
                }
                self.writer.close_brace();
                self.writer.newline();
            }
            TypeBody::Delegate { return_type, params } => {
                self.writer.write("delegate ");
                self.format_type(&return_type.node);
                self.writer.write(" ");
                self.ident(&decl.name);
                self.format_type_params(&decl.type_params);
                self.format_params("(", params, ")");
                self.format_constraints(&decl.constraints);
                self.writer.writeln(";");
            }
        }
    }

    fn format_type_params(&mut self, params: &[Spanned<TypeParam>]) {
        if params.is_empty() {
            return;
        }
        self.writer.write("<");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.format_attributes_inline(&param.node.attributes);
            match param.node.variance {
                Some(Variance::In) => self.writer.write("in "),
                Some(Variance::Out) => self.writer.write("out "),
                None => {}
            }
            self.ident(&param.node.name);
        }
        self.writer.write(">");
    }

    fn format_base_list(&mut self, bases: &[Spanned<Type>]) {
        for (i, base) in bases.iter().enumerate() {
            self.writer.write(if i == 0 { " : " } else { ", " });
            self.format_type(&base.node);
        }
    }

    fn format_constraints(&mut self, clauses: &[Spanned<ConstraintClause>]) {
        for clause in clauses {
            self.writer.write(" where ");
            self.ident(&clause.node.param);
            self.writer.write(" : ");
            for (i, constraint) in clause.node.constraints.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                match &constraint.node {
                    Constraint::Class => self.writer.write("class"),
                    Constraint::Struct => self.writer.write("struct"),
                    Constraint::Unmanaged => self.writer.write("unmanaged"),
                    Constraint::New => self.writer.write("new()"),
                    Constraint::Type(ty) => self.format_type(ty),
                }
            }
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn format_members(&mut self, members: &[Spanned<MemberDecl>]) {
        let blank = self.writer.config().blank_lines_between_members;
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.writer.blank_lines(blank);
            }
            self.format_member(&member.node);
        }
    }

    fn format_member(&mut self, member: &MemberDecl) {
        self.format_attribute_lines(&member.attributes);
        self.format_modifiers(&member.modifiers);
        match &member.kind {
            MemberKind::Field(field) => self.format_field(field),
            MemberKind::Constant(field) => {
                self.writer.write("const ");
                self.format_field(field);
            }
            MemberKind::Event(field) => {
                self.writer.write("event ");
                self.format_field(field);
            }
            MemberKind::EventWithAccessors(event) => {
                self.writer.write("event ");
                self.format_type(&event.ty.node);
                self.writer.write(" ");
                self.format_member_name(&event.name);
                self.format_accessors(&event.accessors);
                self.writer.newline();
            }
            MemberKind::Property(prop) => {
                self.format_type(&prop.ty.node);
                self.writer.write(" ");
                self.format_member_name(&prop.name);
                self.format_property_body(&prop.body);
                if let Some(init) = &prop.initializer {
                    self.writer.write(" = ");
                    self.format_expr(&init.node);
                    self.writer.write(";");
                }
                self.writer.newline();
            }
            MemberKind::Indexer(indexer) => {
                self.format_type(&indexer.ty.node);
                self.writer.write(" ");
                if let Some(interface) = &indexer.interface {
                    self.format_type_name(interface);
                    self.writer.write(".");
                }
                self.writer.write("this");
                self.format_params("[", &indexer.params, "]");
                self.format_property_body(&indexer.body);
                self.writer.newline();
            }
            MemberKind::Method(method) => self.format_method(method),
            MemberKind::Constructor(ctor) => {
                self.ident(&ctor.name);
                self.format_params("(", &ctor.params, ")");
                if let Some(init) = &ctor.initializer {
                    self.writer.write(match init.node.target {
                        InitializerTarget::Base => " : base",
                        InitializerTarget::This => " : this",
                    });
                    self.format_args("(", &init.node.args, ")");
                }
                self.format_method_body(&ctor.body);
            }
            MemberKind::Destructor(dtor) => {
                self.writer.write("~");
                self.ident(&dtor.name);
                self.writer.write("()");
                self.format_method_body(&dtor.body);
            }
            MemberKind::Operator(op) => {
                self.format_type(&op.return_type.node);
                self.writer.write(" operator ");
                self.writer.write(op.op.as_str());
                self.format_params("(", &op.params, ")");
                self.format_method_body(&op.body);
            }
            MemberKind::Conversion(conv) => {
                self.writer
                    .write(if conv.implicit { "implicit operator " } else { "explicit operator " });
                self.format_type(&conv.target.node);
                self.format_params("(", &conv.params, ")");
                self.format_method_body(&conv.body);
            }
            MemberKind::FixedBuffer(buffer) => {
                self.writer.write("fixed ");
                self.format_type(&buffer.ty.node);
                self.writer.write(" ");
                for (i, declarator) in buffer.declarators.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.ident(&declarator.node.name);
                    self.writer.write("[");
                    self.format_expr(&declarator.node.size.node);
                    self.writer.write("]");
                }
                self.writer.writeln(";");
            }
            MemberKind::NestedType(decl) => self.format_type_decl(decl),
            MemberKind::Error => self.writer.writeln("/* error */"),
        }
    }

    /// `T a = 1, b;`
    fn format_field(&mut self, field: &FieldDecl) {
        self.format_type(&field.ty.node);
        self.writer.write(" ");
        self.format_declarators(&field.declarators);
        self.writer.writeln(";");
    }

    fn format_declarators(&mut self, declarators: &[Spanned<VariableDeclarator>]) {
        for (i, declarator) in declarators.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.ident(&declarator.node.name);
            if let Some(init) = &declarator.node.initializer {
                self.writer.write(" = ");
                self.format_expr(&init.node);
            }
        }
    }

    fn format_member_name(&mut self, name: &MemberName) {
        if let Some(interface) = &name.interface {
            self.format_type_name(interface);
            self.writer.write(".");
        }
        self.ident(&name.name);
    }

    fn format_property_body(&mut self, body: &PropertyBody) {
        match body {
            PropertyBody::Accessors(accessors) => self.format_accessors(accessors),
            PropertyBody::Expr(expr) => {
                self.writer.write(" => ");
                self.format_expr(&expr.node);
                self.writer.write(";");
            }
        }
    }

    /// Auto accessors stay on the header line (`{ get; private set; }`); anything with a body gets a block.
    fn format_accessors(&mut self, accessors: &[Spanned<Accessor>]) {
        let auto = accessors
            .iter()
            .all(|a| matches!(a.node.body, MethodBody::None) && a.node.attributes.is_empty());
        if auto {
            self.writer.write(" {");
            for accessor in accessors {
                self.writer.write(" ");
                self.format_modifiers(&accessor.node.modifiers);
                self.writer.write(accessor.node.kind.as_str());
                self.writer.write(";");
            }
            self.writer.write(" }");
            return;
        }

        self.writer.open_brace();
        for accessor in accessors {
            self.format_attribute_lines(&accessor.node.attributes);
            self.format_modifiers(&accessor.node.modifiers);
            self.writer.write(accessor.node.kind.as_str());
            self.format_method_body(&accessor.node.body);
        }
        self.writer.close_brace();
    }

    fn format_method(&mut self, method: &MethodDecl) {
        self.format_type(&method.return_type.node);
        self.writer.write(" ");
        self.format_member_name(&method.name);
        self.format_type_params(&method.type_params);
        self.format_params("(", &method.params, ")");
        self.format_constraints(&method.constraints);
        self.format_method_body(&method.body);
    }

    /// Finishes the member's line(s), including the trailing newline.
    fn format_method_body(&mut self, body: &MethodBody) {
        match body {
            MethodBody::Block(block) => {
                self.format_block(&block.node);
                self.writer.newline();
            }
            MethodBody::Expr(expr) => {
                self.writer.write(" => ");
                self.format_expr(&expr.node);
                self.writer.writeln(";");
            }
            MethodBody::None => self.writer.writeln(";"),
        }
    }

    fn format_params(&mut self, open: &str, params: &[Spanned<Param>], close: &str) {
        self.writer.write(open);
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            let param = &param.node;
            self.format_attributes_inline(&param.attributes);
            if let Some(modifier) = param.modifier {
                self.writer.write(modifier.as_str());
                self.writer.write(" ");
            }
            self.format_type(&param.ty.node);
            self.writer.write(" ");
            self.ident(&param.name);
            if let Some(default) = &param.default {
                self.writer.write(" = ");
                self.format_expr(&default.node);
            }
        }
        self.writer.write(close);
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `{ ... }` with the closing brace left open for a continuation.
    fn format_block(&mut self, block: &Block) {
        self.writer.open_brace();
        for stmt in &block.statements {
            self.format_statement(stmt);
        }
        self.writer.close_brace();
    }

    /// Body of `if`/`while`/`for`/...: a block stays on the brace layout, anything else is indented on its own line.
    ///
    /// Returns `true` if the line is still open after a closing brace.
    fn format_embedded(&mut self, body: &Spanned<Statement>) -> bool {
        if let Statement::Block(block) = &body.node {
            self.format_block(block);
            return true;
        }
        self.writer.newline();
        self.writer.indent();
        self.format_statement(body);
        self.writer.dedent();
        false
    }

    fn finish_embedded(&mut self, open: bool) {
        if open {
            self.writer.newline();
        }
    }

    fn format_statement(&mut self, stmt: &Spanned<Statement>) {
        match &stmt.node {
            Statement::Block(block) => {
                self.format_block(block);
                self.writer.newline();
            }
            Statement::Empty => self.writer.writeln(";"),
            Statement::Expression(expr) => {
                self.format_expr(&expr.node);
                self.writer.writeln(";");
            }
            Statement::LocalDeclaration(decl) => {
                self.format_local_declaration(decl);
                self.writer.writeln(";");
            }
            Statement::LocalFunction(func) => {
                self.format_modifiers(&func.modifiers);
                self.format_method(&func.method);
            }
            Statement::Labeled { label, statement } => {
                self.ident(label);
                self.writer.writeln(":");
                self.format_statement(statement);
            }
            Statement::If { cond, then, otherwise } => {
                self.writer.write("if (");
                self.format_expr(&cond.node);
                self.writer.write(")");
                let open = self.format_embedded(then);
                match otherwise {
                    Some(otherwise) => {
                        if open {
                            self.writer.continue_after_brace();
                        }
                        self.writer.write("else");
                        if matches!(otherwise.node, Statement::If { .. }) {
                            self.writer.write(" ");
                            self.format_statement(otherwise);
                        } else {
                            let open = self.format_embedded(otherwise);
                            self.finish_embedded(open);
                        }
                    }
                    None => self.finish_embedded(open),
                }
            }
            Statement::While { cond, body } => {
                self.writer.write("while (");
                self.format_expr(&cond.node);
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::Do { body, cond } => {
                self.writer.write("do");
                if self.format_embedded(body) {
                    self.writer.continue_after_brace();
                }
                self.writer.write("while (");
                self.format_expr(&cond.node);
                self.writer.writeln(");");
            }
            Statement::For {
                init,
                cond,
                iterators,
                body,
            } => {
                self.writer.write("for (");
                match init {
                    Some(ForInit::Declaration(decl)) => self.format_local_declaration(decl),
                    Some(ForInit::Expressions(exprs)) => self.format_expr_list(exprs),
                    None => {}
                }
                self.writer.write(";");
                if let Some(cond) = cond {
                    self.writer.write(" ");
                    self.format_expr(&cond.node);
                }
                self.writer.write(";");
                if !iterators.is_empty() {
                    self.writer.write(" ");
                    self.format_expr_list(iterators);
                }
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::ForEach {
                is_await,
                ty,
                target,
                iterable,
                body,
            } => {
                if *is_await {
                    self.writer.write("await ");
                }
                self.writer.write("foreach (");
                self.format_type(&ty.node);
                self.writer.write(" ");
                self.format_designation(target);
                self.writer.write(" in ");
                self.format_expr(&iterable.node);
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::Switch { scrutinee, sections } => {
                if matches!(scrutinee.node, Expr::Tuple(_)) {
                    self.writer.write("switch ");
                    self.format_expr(&scrutinee.node);
                } else {
                    self.writer.write("switch (");
                    self.format_expr(&scrutinee.node);
                    self.writer.write(")");
                }
                self.writer.open_brace();
                for section in sections {
                    self.format_switch_section(&section.node);
                }
                self.writer.close_brace();
                self.writer.newline();
            }
            Statement::Try {
                block,
                catches,
                finally,
            } => {
                self.writer.write("try");
                self.format_block(&block.node);
                for catch in catches {
                    self.writer.continue_after_brace();
                    self.format_catch(&catch.node);
                }
                if let Some(finally) = finally {
                    self.writer.continue_after_brace();
                    self.writer.write("finally");
                    self.format_block(&finally.node);
                }
                self.writer.newline();
            }
            Statement::Using {
                is_await,
                resource,
                body,
            } => {
                if *is_await {
                    self.writer.write("await ");
                }
                self.writer.write("using (");
                match resource {
                    UsingResource::Declaration(decl) => self.format_local_declaration(decl),
                    UsingResource::Expr(expr) => self.format_expr(&expr.node),
                }
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::Lock { target, body } => {
                self.writer.write("lock (");
                self.format_expr(&target.node);
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::Fixed { declaration, body } => {
                self.writer.write("fixed (");
                self.format_local_declaration(declaration);
                self.writer.write(")");
                let open = self.format_embedded(body);
                self.finish_embedded(open);
            }
            Statement::Checked(block) => self.format_keyword_block("checked", &block.node),
            Statement::Unchecked(block) => self.format_keyword_block("unchecked", &block.node),
            Statement::Unsafe(block) => self.format_keyword_block("unsafe", &block.node),
            Statement::Return(expr) => self.format_jump("return", expr.as_ref()),
            Statement::Throw(expr) => self.format_jump("throw", expr.as_ref()),
            Statement::Break => self.writer.writeln("break;"),
            Statement::Continue => self.writer.writeln("continue;"),
            Statement::Goto(target) => {
                self.writer.write("goto ");
                match target {
                    GotoTarget::Label(label) => self.ident(label),
                    GotoTarget::Case(expr) => {
                        self.writer.write("case ");
                        self.format_expr(&expr.node);
                    }
                    GotoTarget::Default => self.writer.write("default"),
                }
                self.writer.writeln(";");
            }
            Statement::YieldReturn(expr) => {
                self.writer.write("yield return ");
                self.format_expr(&expr.node);
                self.writer.writeln(";");
            }
            Statement::YieldBreak => self.writer.writeln("yield break;"),
            Statement::Error => self.writer.writeln("/* error */"),
        }
    }

    fn format_keyword_block(&mut self, keyword: &str, block: &Block) {
        self.writer.write(keyword);
        self.format_block(block);
        self.writer.newline();
    }

    fn format_jump(&mut self, keyword: &str, expr: Option<&Spanned<Expr>>) {
        self.writer.write(keyword);
        if let Some(expr) = expr {
            self.writer.write(" ");
            self.format_expr(&expr.node);
        }
        self.writer.writeln(";");
    }

    fn format_local_declaration(&mut self, decl: &LocalDeclaration) {
        if decl.is_await {
            self.writer.write("await ");
        }
        if decl.is_using {
            self.writer.write("using ");
        }
        if decl.is_const {
            self.writer.write("const ");
        }
        self.format_type(&decl.ty.node);
        self.writer.write(" ");
        self.format_declarators(&decl.declarators);
    }

    fn format_switch_section(&mut self, section: &SwitchSection) {
        for label in &section.labels {
            match &label.node {
                SwitchLabel::Case { pattern, guard } => {
                    self.writer.write("case ");
                    self.format_pattern(&pattern.node);
                    if let Some(guard) = guard {
                        self.writer.write(" when ");
                        self.format_expr(&guard.node);
                    }
                    self.writer.writeln(":");
                }
                SwitchLabel::Default => self.writer.writeln("default:"),
            }
        }
        self.writer.indent();
        for stmt in &section.statements {
            self.format_statement(stmt);
        }
        self.writer.dedent();
    }

    fn format_catch(&mut self, catch: &CatchClause) {
        self.writer.write("catch");
        if let Some(ty) = &catch.ty {
            self.writer.write(" (");
            self.format_type(&ty.node);
            if let Some(name) = &catch.name {
                self.writer.write(" ");
                self.ident(name);
            }
            self.writer.write(")");
        }
        if let Some(filter) = &catch.filter {
            self.writer.write(" when (");
            self.format_expr(&filter.node);
            self.writer.write(")");
        }
        self.format_block(&catch.block.node);
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn format_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.format_literal(lit),
            Expr::Interpolated { verbatim, parts } => {
                self.writer.write(if *verbatim { "$@\"" } else { "$\"" });
                for part in parts {
                    match part {
                        InterpolatedPart::Text(text) => self.writer.write(text),
                        InterpolatedPart::Hole { expr, alignment, format } => {
                            self.writer.write("{");
                            self.format_expr(&expr.node);
                            if let Some(alignment) = alignment {
                                self.writer.write(",");
                                self.format_expr(&alignment.node);
                            }
                            if let Some(format) = format {
                                self.writer.write(":");
                                self.writer.write(format);
                            }
                            self.writer.write("}");
                        }
                    }
                }
                self.writer.write("\"");
            }
            Expr::Name { name, type_args } => {
                self.ident(name);
                self.format_type_args(type_args);
            }
            Expr::AliasQualified { alias, name, type_args } => {
                self.ident(alias);
                self.writer.write("::");
                self.ident(name);
                self.format_type_args(type_args);
            }
            Expr::PredefinedType(id) => self.writer.write(keywords::as_str(*id)),
            Expr::MemberAccess {
                target,
                kind,
                name,
                type_args,
            } => {
                self.format_expr(&target.node);
                self.writer.write(match kind {
                    AccessKind::Dot => ".",
                    AccessKind::NullConditional => "?.",
                    AccessKind::Pointer => "->",
                });
                self.ident(name);
                self.format_type_args(type_args);
            }
            Expr::Invocation { target, args } => {
                self.format_expr(&target.node);
                self.format_args("(", args, ")");
            }
            Expr::Indexing {
                target,
                args,
                conditional,
            } => {
                self.format_expr(&target.node);
                self.format_args(if *conditional { "?[" } else { "[" }, args, "]");
            }
            Expr::Unary { op, operand } => {
                self.writer.write(op.as_str());
                if *op == UnaryOp::Await || unary_needs_space(*op, &operand.node) {
                    self.writer.write(" ");
                }
                self.format_expr(&operand.node);
            }
            Expr::Postfix { op, operand } => {
                self.format_expr(&operand.node);
                self.writer.write(op.as_str());
            }
            Expr::Binary { op, left, right } => {
                self.format_expr(&left.node);
                self.writer.write(" ");
                self.writer.write(op.as_str());
                self.writer.write(" ");
                self.format_expr(&right.node);
            }
            Expr::Conditional { cond, then, otherwise } => {
                self.format_expr(&cond.node);
                self.writer.write(" ? ");
                self.format_expr(&then.node);
                self.writer.write(" : ");
                self.format_expr(&otherwise.node);
            }
            Expr::Assignment { target, op, value } => {
                self.format_expr(&target.node);
                self.writer.write(" ");
                self.writer.write(op.as_str());
                self.writer.write(" ");
                self.format_expr(&value.node);
            }
            Expr::Cast { ty, operand } => {
                self.writer.write("(");
                self.format_type(&ty.node);
                self.writer.write(")");
                self.format_expr(&operand.node);
            }
            Expr::Lambda(lambda) => self.format_lambda(lambda),
            Expr::AnonymousMethod { is_async, params, body } => {
                if *is_async {
                    self.writer.write("async ");
                }
                self.writer.write("delegate");
                if let Some(params) = params {
                    self.format_params(" (", params, ")");
                }
                self.format_expr_block(&body.node);
            }
            Expr::ObjectCreation { ty, args, initializer } => {
                self.writer.write("new");
                if let Some(ty) = ty {
                    self.writer.write(" ");
                    self.format_type(&ty.node);
                }
                if let Some(args) = args {
                    self.format_args("(", args, ")");
                }
                if let Some(init) = initializer {
                    self.writer.write(" ");
                    self.format_initializer(&init.node);
                }
            }
            Expr::ArrayCreation {
                element,
                sizes,
                ranks,
                initializer,
            } => {
                self.writer.write("new ");
                self.format_type(&element.node);
                if !sizes.is_empty() {
                    self.writer.write("[");
                    self.format_expr_list(sizes);
                    self.writer.write("]");
                }
                for rank in ranks {
                    self.format_rank(*rank);
                }
                if let Some(init) = initializer {
                    self.writer.write(" ");
                    self.format_initializer(&init.node);
                }
            }
            Expr::ImplicitArrayCreation { rank, initializer } => {
                self.writer.write("new");
                self.format_rank(*rank);
                self.writer.write(" ");
                self.format_initializer(&initializer.node);
            }
            Expr::AnonymousObject(members) => {
                self.writer.write("new ");
                if members.is_empty() {
                    self.writer.write("{ }");
                    return;
                }
                self.writer.write("{ ");
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    if let Some(name) = &member.node.name {
                        self.ident(name);
                        self.writer.write(" = ");
                    }
                    self.format_expr(&member.node.value.node);
                }
                self.writer.write(" }");
            }
            Expr::Initializer(init) => self.format_initializer(init),
            Expr::Query(query) => {
                for (i, clause) in query.clauses.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(" ");
                    }
                    self.format_query_clause(&clause.node);
                }
            }
            Expr::Switch { scrutinee, arms } => {
                self.format_expr(&scrutinee.node);
                if arms.is_empty() {
                    self.writer.write(" switch { }");
                    return;
                }
                self.writer.write(" switch { ");
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.format_pattern(&arm.node.pattern.node);
                    if let Some(guard) = &arm.node.guard {
                        self.writer.write(" when ");
                        self.format_expr(&guard.node);
                    }
                    self.writer.write(" => ");
                    self.format_expr(&arm.node.body.node);
                }
                self.writer.write(" }");
            }
            Expr::Is { operand, pattern } => {
                self.format_expr(&operand.node);
                self.writer.write(" is ");
                self.format_pattern(&pattern.node);
            }
            Expr::As { operand, ty } => {
                self.format_expr(&operand.node);
                self.writer.write(" as ");
                self.format_type(&ty.node);
            }
            Expr::Throw(inner) => {
                self.writer.write("throw ");
                self.format_expr(&inner.node);
            }
            Expr::Tuple(elements) => {
                self.writer.write("(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    if let Some(name) = &element.node.name {
                        self.ident(name);
                        self.writer.write(": ");
                    }
                    self.format_expr(&element.node.value.node);
                }
                self.writer.write(")");
            }
            Expr::Parenthesized(inner) => {
                self.writer.write("(");
                self.format_expr(&inner.node);
                self.writer.write(")");
            }
            Expr::This => self.writer.write("this"),
            Expr::Base => self.writer.write("base"),
            Expr::TypeOf(ty) => self.format_keyword_type("typeof", &ty.node),
            Expr::SizeOf(ty) => self.format_keyword_type("sizeof", &ty.node),
            Expr::Default(None) => self.writer.write("default"),
            Expr::Default(Some(ty)) => self.format_keyword_type("default", &ty.node),
            Expr::NameOf(inner) => self.format_keyword_call("nameof", &inner.node),
            Expr::Checked(inner) => self.format_keyword_call("checked", &inner.node),
            Expr::Unchecked(inner) => self.format_keyword_call("unchecked", &inner.node),
            Expr::StackAlloc {
                element,
                size,
                initializer,
            } => {
                self.writer.write("stackalloc");
                if element.node != Type::Omitted {
                    self.writer.write(" ");
                    self.format_type(&element.node);
                }
                self.writer.write("[");
                if let Some(size) = size {
                    self.format_expr(&size.node);
                }
                self.writer.write("]");
                if let Some(init) = initializer {
                    self.writer.write(" ");
                    self.format_initializer(&init.node);
                }
            }
            Expr::Range { start, end } => {
                if let Some(start) = start {
                    self.format_expr(&start.node);
                }
                self.writer.write("..");
                if let Some(end) = end {
                    self.format_expr(&end.node);
                }
            }
            Expr::Declaration { ty, designation } => {
                self.format_type(&ty.node);
                self.writer.write(" ");
                self.format_designation(designation);
            }
            Expr::Ref(inner) => {
                self.writer.write("ref ");
                self.format_expr(&inner.node);
            }
            Expr::Error => self.writer.write("/* error */"),
        }
    }

    fn format_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Int(raw)
            | Literal::Real(raw)
            | Literal::Char(raw)
            | Literal::String(raw)
            | Literal::VerbatimString(raw) => self.writer.write(raw),
            Literal::Bool(true) => self.writer.write("true"),
            Literal::Bool(false) => self.writer.write("false"),
            Literal::Null => self.writer.write("null"),
        }
    }

    fn format_keyword_type(&mut self, keyword: &str, ty: &Type) {
        self.writer.write(keyword);
        self.writer.write("(");
        self.format_type(ty);
        self.writer.write(")");
    }

    fn format_keyword_call(&mut self, keyword: &str, inner: &Expr) {
        self.writer.write(keyword);
        self.writer.write("(");
        self.format_expr(inner);
        self.writer.write(")");
    }

    fn format_expr_list(&mut self, exprs: &[Spanned<Expr>]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.format_expr(&expr.node);
        }
    }

    fn format_args(&mut self, open: &str, args: &[Spanned<Argument>], close: &str) {
        self.writer.write(open);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            if let Some(name) = &arg.node.name {
                self.ident(name);
                self.writer.write(": ");
            }
            if let Some(modifier) = arg.node.modifier {
                self.writer.write(modifier.as_str());
                self.writer.write(" ");
            }
            self.format_expr(&arg.node.value.node);
        }
        self.writer.write(close);
    }

    fn format_lambda(&mut self, lambda: &LambdaExpr) {
        if lambda.is_async {
            self.writer.write("async ");
        }
        match (lambda.parenthesized, lambda.params.as_slice()) {
            (false, [single]) => self.ident(&single.node.name),
            _ => {
                self.writer.write("(");
                for (i, param) in lambda.params.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    if let Some(modifier) = param.node.modifier {
                        self.writer.write(modifier.as_str());
                        self.writer.write(" ");
                    }
                    if let Some(ty) = &param.node.ty {
                        self.format_type(&ty.node);
                        self.writer.write(" ");
                    }
                    self.ident(&param.node.name);
                }
                self.writer.write(")");
            }
        }
        self.writer.write(" =>");
        match &lambda.body {
            LambdaBody::Expr(body) => {
                self.writer.write(" ");
                self.format_expr(&body.node);
            }
            LambdaBody::Block(block) => self.format_expr_block(&block.node),
        }
    }

    /// Block inside an expression (lambda, anonymous method): the brace always ends the line.
    fn format_expr_block(&mut self, block: &Block) {
        if block.statements.is_empty() {
            self.writer.write(" { }");
            return;
        }
        self.writer.writeln(" {");
        self.writer.indent();
        for stmt in &block.statements {
            self.format_statement(stmt);
        }
        self.writer.dedent();
        self.writer.write("}");
    }

    fn format_initializer(&mut self, init: &Initializer) {
        if init.entries.is_empty() {
            self.writer.write("{ }");
            return;
        }
        self.writer.write("{ ");
        for (i, entry) in init.entries.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            match &entry.node {
                InitializerEntry::Member { name, value } => {
                    self.ident(name);
                    self.writer.write(" = ");
                    self.format_expr(&value.node);
                }
                InitializerEntry::Indexer { args, value } => {
                    self.format_args("[", args, "]");
                    self.writer.write(" = ");
                    self.format_expr(&value.node);
                }
                InitializerEntry::Element(value) => self.format_expr(&value.node),
            }
        }
        self.writer.write(" }");
    }

    fn format_query_clause(&mut self, clause: &QueryClause) {
        match clause {
            QueryClause::From { ty, name, source } => {
                self.writer.write("from ");
                self.format_range_variable(ty.as_ref(), name);
                self.writer.write(" in ");
                self.format_expr(&source.node);
            }
            QueryClause::Let { name, value } => {
                self.writer.write("let ");
                self.ident(name);
                self.writer.write(" = ");
                self.format_expr(&value.node);
            }
            QueryClause::Where(cond) => {
                self.writer.write("where ");
                self.format_expr(&cond.node);
            }
            QueryClause::Join {
                ty,
                name,
                source,
                left,
                right,
                into,
            } => {
                self.writer.write("join ");
                self.format_range_variable(ty.as_ref(), name);
                self.writer.write(" in ");
                self.format_expr(&source.node);
                self.writer.write(" on ");
                self.format_expr(&left.node);
                self.writer.write(" equals ");
                self.format_expr(&right.node);
                if let Some(into) = into {
                    self.writer.write(" into ");
                    self.ident(into);
                }
            }
            QueryClause::OrderBy(orderings) => {
                self.writer.write("orderby ");
                for (i, ordering) in orderings.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.format_expr(&ordering.node.expr.node);
                    match ordering.node.direction {
                        Some(OrderDirection::Ascending) => self.writer.write(" ascending"),
                        Some(OrderDirection::Descending) => self.writer.write(" descending"),
                        None => {}
                    }
                }
            }
            QueryClause::Select(value) => {
                self.writer.write("select ");
                self.format_expr(&value.node);
            }
            QueryClause::Group { value, key } => {
                self.writer.write("group ");
                self.format_expr(&value.node);
                self.writer.write(" by ");
                self.format_expr(&key.node);
            }
            QueryClause::Into(name) => {
                self.writer.write("into ");
                self.ident(name);
            }
        }
    }

    fn format_range_variable(&mut self, ty: Option<&Spanned<Type>>, name: &str) {
        if let Some(ty) = ty {
            self.format_type(&ty.node);
            self.writer.write(" ");
        }
        self.ident(name);
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    fn format_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Discard => self.writer.write("_"),
            Pattern::Var(designation) => {
                self.writer.write("var ");
                self.format_designation(designation);
            }
            Pattern::Declaration { ty, designation } => {
                self.format_type(&ty.node);
                self.writer.write(" ");
                self.format_designation(designation);
            }
            Pattern::Type(ty) => self.format_type(&ty.node),
            Pattern::Constant(value) => self.format_expr(&value.node),
            Pattern::Relational { op, value } => {
                self.writer.write(op.as_str());
                self.writer.write(" ");
                self.format_expr(&value.node);
            }
            Pattern::Recursive {
                ty,
                positional,
                properties,
                designation,
            } => {
                if let Some(ty) = ty {
                    self.format_type(&ty.node);
                }
                if let Some(positional) = positional {
                    self.format_subpatterns("(", positional, ")");
                }
                if let Some(properties) = properties {
                    if ty.is_some() || positional.is_some() {
                        self.writer.write(" ");
                    }
                    if properties.is_empty() {
                        self.writer.write("{ }");
                    } else {
                        self.format_subpatterns("{ ", properties, " }");
                    }
                }
                if let Some(designation) = designation {
                    self.writer.write(" ");
                    self.format_designation(designation);
                }
            }
            Pattern::Not(inner) => {
                self.writer.write("not ");
                self.format_pattern(&inner.node);
            }
            Pattern::And(left, right) => {
                self.format_pattern(&left.node);
                self.writer.write(" and ");
                self.format_pattern(&right.node);
            }
            Pattern::Or(left, right) => {
                self.format_pattern(&left.node);
                self.writer.write(" or ");
                self.format_pattern(&right.node);
            }
            Pattern::Parenthesized(inner) => {
                self.writer.write("(");
                self.format_pattern(&inner.node);
                self.writer.write(")");
            }
        }
    }

    fn format_subpatterns(&mut self, open: &str, items: &[Spanned<Subpattern>], close: &str) {
        self.writer.write(open);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            if let Some(name) = &item.node.name {
                // Extended property names (`A.B`) are stored joined with dots.
                self.writer.write(name);
                self.writer.write(": ");
            }
            self.format_pattern(&item.node.pattern.node);
        }
        self.writer.write(close);
    }

    fn format_designation(&mut self, designation: &Designation) {
        match designation {
            Designation::Single(name) => self.ident(name),
            Designation::Discard => self.writer.write("_"),
            Designation::Parenthesized(parts) => {
                self.writer.write("(");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.format_designation(part);
                }
                self.writer.write(")");
            }
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn format_type(&mut self, ty: &Type) {
        match ty {
            Type::Predefined(id) => self.writer.write(keywords::as_str(*id)),
            Type::Named(name) => self.format_type_name(name),
            Type::Array { element, rank } => {
                self.format_type(&element.node);
                self.format_rank(*rank);
            }
            Type::Nullable(inner) => {
                self.format_type(&inner.node);
                self.writer.write("?");
            }
            Type::Pointer(inner) => {
                self.format_type(&inner.node);
                self.writer.write("*");
            }
            Type::Tuple(elements) => {
                self.writer.write("(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.format_type(&element.node.ty.node);
                    if let Some(name) = &element.node.name {
                        self.writer.write(" ");
                        self.ident(name);
                    }
                }
                self.writer.write(")");
            }
            Type::Omitted => {}
            Type::Ref { readonly, ty } => {
                self.writer.write(if *readonly { "ref readonly " } else { "ref " });
                self.format_type(&ty.node);
            }
        }
    }

    fn format_type_name(&mut self, name: &TypeName) {
        if let Some(alias) = &name.alias {
            self.ident(alias);
            self.writer.write("::");
        }
        for (i, segment) in name.segments.iter().enumerate() {
            if i > 0 {
                self.writer.write(".");
            }
            self.ident(&segment.name);
            self.format_type_args(&segment.type_args);
        }
    }

    /// `<int, string>`, or `<,>` for an unbound generic name.
    fn format_type_args(&mut self, args: &[Spanned<Type>]) {
        if args.is_empty() {
            return;
        }
        let unbound = args.iter().all(|a| a.node == Type::Omitted);
        self.writer.write("<");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write(if unbound { "," } else { ", " });
            }
            self.format_type(&arg.node);
        }
        self.writer.write(">");
    }

    fn format_rank(&mut self, rank: usize) {
        self.writer.write("[");
        for _ in 1..rank {
            self.writer.write(",");
        }
        self.writer.write("]");
    }

    /// Identifiers spelled like a reserved word were written `@word` in the source.
    fn ident(&mut self, name: &str) {
        if keyword_id(name).is_some() {
            self.writer.write("@");
        }
        self.writer.write(name);
    }
}

/// `- -x` must not print as `--x` (nor `+ +x`, `& &x`).
fn unary_needs_space(op: UnaryOp, operand: &Expr) -> bool {
    let Expr::Unary { op: inner, .. } = operand else {
        return false;
    };
    let last = op.as_str().chars().last();
    let first = inner.as_str().chars().next();
    match (last, first) {
        (Some(a), Some(b)) => a == b && matches!(a, '+' | '-' | '&'),
        _ => false,
    }
}
