//! Read-only traversal of the AST.
//!
//! Every `visit_*` hook defaults to the matching `walk_*` function, which visits the node's children in source
//! order. Override a hook to observe a node family; call the `walk_*` function from the override to keep descending.
//!
//! ## Examples
//! ```rust
//! use sharpen_syntax::ast::{Expr, Spanned};
//! use sharpen_syntax::visit::{self, Visitor};
//! use sharpen_syntax::{lexer, parser};
//!
//! struct CastCounter(usize);
//!
//! impl Visitor for CastCounter {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if matches!(expr.node, Expr::Cast { .. }) {
//!             self.0 += 1;
//!         }
//!         visit::walk_expr(self, expr);
//!     }
//! }
//!
//! let tokens = lexer::lex("class C { object M() => (object)(int)x; }").unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! let mut counter = CastCounter(0);
//! counter.visit_compilation_unit(&unit);
//! assert_eq!(counter.0, 2);
//! ```

use crate::ast::*;

pub trait Visitor: Sized {
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        walk_compilation_unit(self, unit);
    }

    fn visit_namespace_member(&mut self, member: &Spanned<NamespaceMember>) {
        walk_namespace_member(self, member);
    }

    fn visit_type_decl(&mut self, decl: &TypeDecl) {
        walk_type_decl(self, decl);
    }

    fn visit_member(&mut self, member: &Spanned<MemberDecl>) {
        walk_member(self, member);
    }

    fn visit_attribute(&mut self, attribute: &Spanned<Attribute>) {
        walk_attribute(self, attribute);
    }

    fn visit_statement(&mut self, stmt: &Spanned<Statement>) {
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &Spanned<Pattern>) {
        walk_pattern(self, pattern);
    }

    fn visit_type(&mut self, ty: &Spanned<Type>) {
        walk_type(self, ty);
    }

    fn visit_query_clause(&mut self, clause: &Spanned<QueryClause>) {
        walk_query_clause(self, clause);
    }
}

// ============================================================================
// Declarations
// ============================================================================

pub fn walk_compilation_unit<V: Visitor>(v: &mut V, unit: &CompilationUnit) {
    for using in &unit.usings {
        walk_using(v, &using.node);
    }
    walk_attribute_sections(v, &unit.attributes);
    for member in &unit.members {
        v.visit_namespace_member(member);
    }
}

fn walk_using<V: Visitor>(v: &mut V, using: &UsingDirective) {
    match using {
        UsingDirective::Namespace(name) | UsingDirective::Static(name) => walk_type_name(v, name),
        UsingDirective::Alias { target, .. } => v.visit_type(target),
    }
}

pub fn walk_namespace_member<V: Visitor>(v: &mut V, member: &Spanned<NamespaceMember>) {
    match &member.node {
        NamespaceMember::Namespace(ns) => {
            for using in &ns.usings {
                walk_using(v, &using.node);
            }
            for inner in &ns.members {
                v.visit_namespace_member(inner);
            }
        }
        NamespaceMember::Type(decl) => v.visit_type_decl(decl),
        NamespaceMember::Error => {}
    }
}

pub fn walk_type_decl<V: Visitor>(v: &mut V, decl: &TypeDecl) {
    walk_attribute_sections(v, &decl.attributes);
    // `delegate R D<T>(params) where T : ...;`
    if let TypeBody::Delegate { return_type, params } = &decl.body {
        v.visit_type(return_type);
        walk_type_params(v, &decl.type_params);
        walk_params(v, params);
        walk_constraints(v, &decl.constraints);
        return;
    }
    walk_type_params(v, &decl.type_params);
    for base in &decl.base_list {
        v.visit_type(base);
    }
    walk_constraints(v, &decl.constraints);
    match &decl.body {
        TypeBody::Class { members, .. } => {
            for member in members {
                v.visit_member(member);
            }
        }
        TypeBody::Enum(members) => {
            for member in members {
                walk_attribute_sections(v, &member.node.attributes);
                if let Some(value) = &member.node.value {
                    v.visit_expr(value);
                }
            }
        }
        TypeBody::Delegate { .. } => {}
    }
}

fn walk_type_params<V: Visitor>(v: &mut V, params: &[Spanned<TypeParam>]) {
    for param in params {
        walk_attribute_sections(v, &param.node.attributes);
    }
}

pub fn walk_member<V: Visitor>(v: &mut V, member: &Spanned<MemberDecl>) {
    walk_attribute_sections(v, &member.node.attributes);
    match &member.node.kind {
        MemberKind::Field(field) | MemberKind::Constant(field) | MemberKind::Event(field) => {
            v.visit_type(&field.ty);
            walk_declarators(v, &field.declarators);
        }
        MemberKind::EventWithAccessors(event) => {
            v.visit_type(&event.ty);
            walk_member_name(v, &event.name);
            walk_accessors(v, &event.accessors);
        }
        MemberKind::Property(prop) => {
            v.visit_type(&prop.ty);
            walk_member_name(v, &prop.name);
            walk_property_body(v, &prop.body);
            if let Some(init) = &prop.initializer {
                v.visit_expr(init);
            }
        }
        MemberKind::Indexer(indexer) => {
            v.visit_type(&indexer.ty);
            if let Some(interface) = &indexer.interface {
                walk_type_name(v, interface);
            }
            walk_params(v, &indexer.params);
            walk_property_body(v, &indexer.body);
        }
        MemberKind::Method(method) => walk_method(v, method),
        MemberKind::Constructor(ctor) => {
            walk_params(v, &ctor.params);
            if let Some(init) = &ctor.initializer {
                walk_arguments(v, &init.node.args);
            }
            walk_method_body(v, &ctor.body);
        }
        MemberKind::Destructor(dtor) => walk_method_body(v, &dtor.body),
        MemberKind::FixedBuffer(buffer) => {
            v.visit_type(&buffer.ty);
            for declarator in &buffer.declarators {
                v.visit_expr(&declarator.node.size);
            }
        }
        MemberKind::Operator(op) => {
            v.visit_type(&op.return_type);
            walk_params(v, &op.params);
            walk_method_body(v, &op.body);
        }
        MemberKind::Conversion(conv) => {
            v.visit_type(&conv.target);
            walk_params(v, &conv.params);
            walk_method_body(v, &conv.body);
        }
        MemberKind::NestedType(decl) => v.visit_type_decl(decl),
        MemberKind::Error => {}
    }
}

fn walk_method<V: Visitor>(v: &mut V, method: &MethodDecl) {
    v.visit_type(&method.return_type);
    walk_member_name(v, &method.name);
    walk_type_params(v, &method.type_params);
    walk_params(v, &method.params);
    walk_constraints(v, &method.constraints);
    walk_method_body(v, &method.body);
}

fn walk_member_name<V: Visitor>(v: &mut V, name: &MemberName) {
    if let Some(interface) = &name.interface {
        walk_type_name(v, interface);
    }
}

fn walk_property_body<V: Visitor>(v: &mut V, body: &PropertyBody) {
    match body {
        PropertyBody::Accessors(accessors) => walk_accessors(v, accessors),
        PropertyBody::Expr(expr) => v.visit_expr(expr),
    }
}

fn walk_accessors<V: Visitor>(v: &mut V, accessors: &[Spanned<Accessor>]) {
    for accessor in accessors {
        walk_attribute_sections(v, &accessor.node.attributes);
        walk_method_body(v, &accessor.node.body);
    }
}

fn walk_method_body<V: Visitor>(v: &mut V, body: &MethodBody) {
    match body {
        MethodBody::Block(block) => walk_block(v, &block.node),
        MethodBody::Expr(expr) => v.visit_expr(expr),
        MethodBody::None => {}
    }
}

fn walk_params<V: Visitor>(v: &mut V, params: &[Spanned<Param>]) {
    for param in params {
        walk_attribute_sections(v, &param.node.attributes);
        v.visit_type(&param.node.ty);
        if let Some(default) = &param.node.default {
            v.visit_expr(default);
        }
    }
}

fn walk_constraints<V: Visitor>(v: &mut V, clauses: &[Spanned<ConstraintClause>]) {
    for clause in clauses {
        for constraint in &clause.node.constraints {
            if let Constraint::Type(ty) = &constraint.node {
                v.visit_type(&Spanned::new(ty.clone(), constraint.span));
            }
        }
    }
}

fn walk_declarators<V: Visitor>(v: &mut V, declarators: &[Spanned<VariableDeclarator>]) {
    for declarator in declarators {
        if let Some(init) = &declarator.node.initializer {
            v.visit_expr(init);
        }
    }
}

fn walk_attribute_sections<V: Visitor>(v: &mut V, sections: &[Spanned<AttributeSection>]) {
    for section in sections {
        for attribute in &section.node.attributes {
            v.visit_attribute(attribute);
        }
    }
}

pub fn walk_attribute<V: Visitor>(v: &mut V, attribute: &Spanned<Attribute>) {
    walk_type_name(v, &attribute.node.name);
    walk_arguments(v, &attribute.node.args);
}

// ============================================================================
// Statements
// ============================================================================

fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.statements {
        v.visit_statement(stmt);
    }
}

fn walk_local_declaration<V: Visitor>(v: &mut V, decl: &LocalDeclaration) {
    v.visit_type(&decl.ty);
    walk_declarators(v, &decl.declarators);
}

pub fn walk_statement<V: Visitor>(v: &mut V, stmt: &Spanned<Statement>) {
    match &stmt.node {
        Statement::Block(block) => walk_block(v, block),
        Statement::Empty | Statement::Break | Statement::Continue | Statement::YieldBreak | Statement::Error => {}
        Statement::Expression(expr) | Statement::YieldReturn(expr) => v.visit_expr(expr),
        Statement::LocalDeclaration(decl) => walk_local_declaration(v, decl),
        Statement::LocalFunction(func) => walk_method(v, &func.method),
        Statement::Labeled { statement, .. } => v.visit_statement(statement),
        Statement::If { cond, then, otherwise } => {
            v.visit_expr(cond);
            v.visit_statement(then);
            if let Some(otherwise) = otherwise {
                v.visit_statement(otherwise);
            }
        }
        Statement::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_statement(body);
        }
        Statement::Do { body, cond } => {
            v.visit_statement(body);
            v.visit_expr(cond);
        }
        Statement::For {
            init,
            cond,
            iterators,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(decl)) => walk_local_declaration(v, decl),
                Some(ForInit::Expressions(exprs)) => exprs.iter().for_each(|e| v.visit_expr(e)),
                None => {}
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            for iterator in iterators {
                v.visit_expr(iterator);
            }
            v.visit_statement(body);
        }
        Statement::ForEach {
            ty, iterable, body, ..
        } => {
            v.visit_type(ty);
            v.visit_expr(iterable);
            v.visit_statement(body);
        }
        Statement::Switch { scrutinee, sections } => {
            v.visit_expr(scrutinee);
            for section in sections {
                for label in &section.node.labels {
                    if let SwitchLabel::Case { pattern, guard } = &label.node {
                        v.visit_pattern(pattern);
                        if let Some(guard) = guard {
                            v.visit_expr(guard);
                        }
                    }
                }
                for stmt in &section.node.statements {
                    v.visit_statement(stmt);
                }
            }
        }
        Statement::Try {
            block,
            catches,
            finally,
        } => {
            walk_block(v, &block.node);
            for catch in catches {
                if let Some(ty) = &catch.node.ty {
                    v.visit_type(ty);
                }
                if let Some(filter) = &catch.node.filter {
                    v.visit_expr(filter);
                }
                walk_block(v, &catch.node.block.node);
            }
            if let Some(finally) = finally {
                walk_block(v, &finally.node);
            }
        }
        Statement::Using { resource, body, .. } => {
            match resource {
                UsingResource::Declaration(decl) => walk_local_declaration(v, decl),
                UsingResource::Expr(expr) => v.visit_expr(expr),
            }
            v.visit_statement(body);
        }
        Statement::Lock { target, body } => {
            v.visit_expr(target);
            v.visit_statement(body);
        }
        Statement::Fixed { declaration, body } => {
            walk_local_declaration(v, declaration);
            v.visit_statement(body);
        }
        Statement::Checked(block) | Statement::Unchecked(block) | Statement::Unsafe(block) => {
            walk_block(v, &block.node)
        }
        Statement::Return(expr) | Statement::Throw(expr) => {
            if let Some(expr) = expr {
                v.visit_expr(expr);
            }
        }
        Statement::Goto(target) => {
            if let GotoTarget::Case(expr) = target {
                v.visit_expr(expr);
            }
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

fn walk_arguments<V: Visitor>(v: &mut V, args: &[Spanned<Argument>]) {
    for arg in args {
        v.visit_expr(&arg.node.value);
    }
}

fn walk_initializer<V: Visitor>(v: &mut V, init: &Initializer) {
    for entry in &init.entries {
        match &entry.node {
            InitializerEntry::Member { value, .. } | InitializerEntry::Element(value) => v.visit_expr(value),
            InitializerEntry::Indexer { args, value } => {
                walk_arguments(v, args);
                v.visit_expr(value);
            }
        }
    }
}

fn walk_type_args<V: Visitor>(v: &mut V, type_args: &[Spanned<Type>]) {
    for arg in type_args {
        v.visit_type(arg);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Literal(_) | Expr::PredefinedType(_) | Expr::This | Expr::Base | Expr::Error => {}
        Expr::Interpolated { parts, .. } => {
            for part in parts {
                if let InterpolatedPart::Hole { expr, alignment, .. } = part {
                    v.visit_expr(expr);
                    if let Some(alignment) = alignment {
                        v.visit_expr(alignment);
                    }
                }
            }
        }
        Expr::Name { type_args, .. } | Expr::AliasQualified { type_args, .. } => walk_type_args(v, type_args),
        Expr::MemberAccess { target, type_args, .. } => {
            v.visit_expr(target);
            walk_type_args(v, type_args);
        }
        Expr::Invocation { target, args } | Expr::Indexing { target, args, .. } => {
            v.visit_expr(target);
            walk_arguments(v, args);
        }
        Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => v.visit_expr(operand),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Conditional { cond, then, otherwise } => {
            v.visit_expr(cond);
            v.visit_expr(then);
            v.visit_expr(otherwise);
        }
        Expr::Assignment { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Cast { ty, operand } => {
            v.visit_type(ty);
            v.visit_expr(operand);
        }
        Expr::Lambda(lambda) => {
            for param in &lambda.params {
                if let Some(ty) = &param.node.ty {
                    v.visit_type(ty);
                }
            }
            match &lambda.body {
                LambdaBody::Expr(body) => v.visit_expr(body),
                LambdaBody::Block(block) => walk_block(v, &block.node),
            }
        }
        Expr::AnonymousMethod { params, body, .. } => {
            if let Some(params) = params {
                walk_params(v, params);
            }
            walk_block(v, &body.node);
        }
        Expr::ObjectCreation {
            ty,
            args,
            initializer,
        } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            if let Some(args) = args {
                walk_arguments(v, args);
            }
            if let Some(init) = initializer {
                walk_initializer(v, &init.node);
            }
        }
        Expr::ArrayCreation {
            element,
            sizes,
            initializer,
            ..
        } => {
            v.visit_type(element);
            for size in sizes {
                v.visit_expr(size);
            }
            if let Some(init) = initializer {
                walk_initializer(v, &init.node);
            }
        }
        Expr::ImplicitArrayCreation { initializer, .. } => walk_initializer(v, &initializer.node),
        Expr::AnonymousObject(members) => {
            for member in members {
                v.visit_expr(&member.node.value);
            }
        }
        Expr::Initializer(init) => walk_initializer(v, init),
        Expr::Query(query) => {
            for clause in &query.clauses {
                v.visit_query_clause(clause);
            }
        }
        Expr::Switch { scrutinee, arms } => {
            v.visit_expr(scrutinee);
            for arm in arms {
                v.visit_pattern(&arm.node.pattern);
                if let Some(guard) = &arm.node.guard {
                    v.visit_expr(guard);
                }
                v.visit_expr(&arm.node.body);
            }
        }
        Expr::Is { operand, pattern } => {
            v.visit_expr(operand);
            v.visit_pattern(pattern);
        }
        Expr::As { operand, ty } => {
            v.visit_expr(operand);
            v.visit_type(ty);
        }
        Expr::Throw(inner)
        | Expr::Parenthesized(inner)
        | Expr::NameOf(inner)
        | Expr::Checked(inner)
        | Expr::Unchecked(inner)
        | Expr::Ref(inner) => v.visit_expr(inner),
        Expr::Tuple(elements) => {
            for element in elements {
                v.visit_expr(&element.node.value);
            }
        }
        Expr::TypeOf(ty) | Expr::SizeOf(ty) => v.visit_type(ty),
        Expr::Default(ty) => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
        }
        Expr::StackAlloc {
            element,
            size,
            initializer,
        } => {
            v.visit_type(element);
            if let Some(size) = size {
                v.visit_expr(size);
            }
            if let Some(init) = initializer {
                walk_initializer(v, &init.node);
            }
        }
        Expr::Range { start, end } => {
            if let Some(start) = start {
                v.visit_expr(start);
            }
            if let Some(end) = end {
                v.visit_expr(end);
            }
        }
        Expr::Declaration { ty, .. } => v.visit_type(ty),
    }
}

pub fn walk_query_clause<V: Visitor>(v: &mut V, clause: &Spanned<QueryClause>) {
    match &clause.node {
        QueryClause::From { ty, source, .. } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            v.visit_expr(source);
        }
        QueryClause::Let { value, .. } => v.visit_expr(value),
        QueryClause::Where(expr) | QueryClause::Select(expr) => v.visit_expr(expr),
        QueryClause::Join {
            ty,
            source,
            left,
            right,
            ..
        } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            v.visit_expr(source);
            v.visit_expr(left);
            v.visit_expr(right);
        }
        QueryClause::OrderBy(orderings) => {
            for ordering in orderings {
                v.visit_expr(&ordering.node.expr);
            }
        }
        QueryClause::Group { value, key } => {
            v.visit_expr(value);
            v.visit_expr(key);
        }
        QueryClause::Into(_) => {}
    }
}

// ============================================================================
// Patterns and types
// ============================================================================

pub fn walk_pattern<V: Visitor>(v: &mut V, pattern: &Spanned<Pattern>) {
    match &pattern.node {
        Pattern::Discard | Pattern::Var(_) => {}
        Pattern::Declaration { ty, .. } | Pattern::Type(ty) => v.visit_type(ty),
        Pattern::Constant(expr) | Pattern::Relational { value: expr, .. } => v.visit_expr(expr),
        Pattern::Recursive {
            ty,
            positional,
            properties,
            ..
        } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            for sub in positional.iter().chain(properties.iter()).flatten() {
                v.visit_pattern(&sub.node.pattern);
            }
        }
        Pattern::Not(inner) | Pattern::Parenthesized(inner) => v.visit_pattern(inner),
        Pattern::And(left, right) | Pattern::Or(left, right) => {
            v.visit_pattern(left);
            v.visit_pattern(right);
        }
    }
}

fn walk_type_name<V: Visitor>(v: &mut V, name: &TypeName) {
    for segment in &name.segments {
        walk_type_args(v, &segment.type_args);
    }
}

pub fn walk_type<V: Visitor>(v: &mut V, ty: &Spanned<Type>) {
    match &ty.node {
        Type::Predefined(_) | Type::Omitted => {}
        Type::Named(name) => walk_type_name(v, name),
        Type::Array { element, .. } => v.visit_type(element),
        Type::Nullable(inner) | Type::Pointer(inner) | Type::Ref { ty: inner, .. } => v.visit_type(inner),
        Type::Tuple(elements) => {
            for element in elements {
                v.visit_type(&element.node.ty);
            }
        }
    }
}
