//! Golden cases for the ambiguous corners of the grammar.
//!
//! Each case parses a small fragment through the public API and checks which production won.

use sharpen::ast::*;
use sharpen::{lexer, parser};

fn expr(source: &str) -> Expr {
    let tokens = lexer::lex(source).unwrap();
    parser::parse_expression(&tokens)
        .unwrap_or_else(|errs| panic!("failed to parse {source:?}: {errs:?}"))
        .node
}

fn stmt(source: &str) -> Statement {
    let tokens = lexer::lex(source).unwrap();
    parser::parse_statement(&tokens)
        .unwrap_or_else(|errs| panic!("failed to parse {source:?}: {errs:?}"))
        .node
}

fn name_of(expr: &Expr) -> &str {
    match expr {
        Expr::Name { name, type_args } if type_args.is_empty() => name.as_str(),
        other => panic!("Expected simple name, got {other:?}"),
    }
}

fn invocation_args(expr: &Expr) -> &[Spanned<Argument>] {
    match expr {
        Expr::Invocation { args, .. } => args.as_slice(),
        other => panic!("Expected invocation, got {other:?}"),
    }
}

// ============================================================================
// Casts and parentheses
// ============================================================================

#[test]
fn parenthesized_name_is_not_a_cast() {
    match expr("(a)") {
        Expr::Parenthesized(inner) => assert_eq!(name_of(&inner.node), "a"),
        other => panic!("Expected parenthesized expression, got {other:?}"),
    }
}

#[test]
fn type_followed_by_operand_is_a_cast() {
    match expr("(Foo)x") {
        Expr::Cast { ty, operand } => {
            assert!(matches!(&ty.node, Type::Named(n) if n.last_name() == "Foo"));
            assert_eq!(name_of(&operand.node), "x");
        }
        other => panic!("Expected cast, got {other:?}"),
    }
}

#[test]
fn name_followed_by_binary_operator_is_a_subtraction() {
    match expr("(a) - b") {
        Expr::Binary { op: BinaryOp::Sub, left, .. } => {
            assert!(matches!(left.node, Expr::Parenthesized(_)));
        }
        other => panic!("Expected subtraction, got {other:?}"),
    }
}

#[test]
fn predefined_type_cast_accepts_unary_operand() {
    match expr("(int)-x") {
        Expr::Cast { ty, operand } => {
            assert!(matches!(ty.node, Type::Predefined(_)));
            assert!(matches!(operand.node, Expr::Unary { op: UnaryOp::Minus, .. }));
        }
        other => panic!("Expected cast, got {other:?}"),
    }
}

// ============================================================================
// Generic arguments vs. relational operators
// ============================================================================

#[test]
fn comparisons_in_argument_list_are_not_generics() {
    let call = expr("F(a < b, c > d)");
    let args = invocation_args(&call);
    assert_eq!(args.len(), 2);
    assert!(matches!(args[0].node.value.node, Expr::Binary { op: BinaryOp::Lt, .. }));
    assert!(matches!(args[1].node.value.node, Expr::Binary { op: BinaryOp::Gt, .. }));
}

#[test]
fn generic_name_followed_by_paren_is_a_generic_call() {
    let call = expr("F(a<b, c>(d))");
    let args = invocation_args(&call);
    assert_eq!(args.len(), 1);
    match &args[0].node.value.node {
        Expr::Invocation { target, .. } => {
            assert!(matches!(&target.node, Expr::Name { name, type_args } if name == "a" && type_args.len() == 2));
        }
        other => panic!("Expected generic invocation, got {other:?}"),
    }
}

#[test]
fn generic_type_name_in_member_access() {
    match expr("List<int>.Empty") {
        Expr::MemberAccess { target, name, .. } => {
            assert_eq!(name, "Empty");
            assert!(matches!(&target.node, Expr::Name { name, type_args } if name == "List" && type_args.len() == 1));
        }
        other => panic!("Expected member access, got {other:?}"),
    }
}

#[test]
fn nested_generic_closes_on_shift_token() {
    match stmt("Dictionary<string, List<int>> map;") {
        Statement::LocalDeclaration(decl) => match &decl.ty.node {
            Type::Named(name) => {
                let args = &name.segments[0].type_args;
                assert_eq!(args.len(), 2);
                assert!(matches!(&args[1].node, Type::Named(inner) if inner.is_generic()));
            }
            other => panic!("Expected named type, got {other:?}"),
        },
        other => panic!("Expected local declaration, got {other:?}"),
    }
}

#[test]
fn shift_right_is_still_an_operator() {
    assert!(matches!(expr("a >> 2"), Expr::Binary { op: BinaryOp::Shr, .. }));
    assert!(matches!(expr("a >>= 2"), Expr::Assignment { op: AssignOp::Shr, .. }));
}

// ============================================================================
// Lambdas and tuples
// ============================================================================

#[test]
fn parenthesized_parameter_with_arrow_is_a_lambda() {
    match expr("(x) => x + 1") {
        Expr::Lambda(lambda) => {
            assert!(lambda.parenthesized);
            assert_eq!(lambda.params.len(), 1);
            assert!(matches!(&lambda.body, LambdaBody::Expr(body) if matches!(body.node, Expr::Binary { .. })));
        }
        other => panic!("Expected lambda, got {other:?}"),
    }
}

#[test]
fn parenthesized_arithmetic_is_not_a_lambda() {
    match expr("(x + 1)") {
        Expr::Parenthesized(inner) => assert!(matches!(inner.node, Expr::Binary { op: BinaryOp::Add, .. })),
        other => panic!("Expected parenthesized expression, got {other:?}"),
    }
}

#[test]
fn parenthesized_pair_is_a_tuple() {
    match expr("(x, y)") {
        Expr::Tuple(elements) => assert_eq!(elements.len(), 2),
        other => panic!("Expected tuple, got {other:?}"),
    }
}

#[test]
fn typed_lambda_parameters() {
    match expr("(int a, ref string b) => a") {
        Expr::Lambda(lambda) => {
            assert!(lambda.params.iter().all(|p| p.node.ty.is_some()));
            assert_eq!(lambda.params[1].node.modifier, Some(ParamModifier::Ref));
        }
        other => panic!("Expected lambda, got {other:?}"),
    }
}

// ============================================================================
// Object and array creation
// ============================================================================

#[test]
fn array_creation_with_size() {
    match expr("new int[3]") {
        Expr::ArrayCreation { sizes, initializer, .. } => {
            assert_eq!(sizes.len(), 1);
            assert!(initializer.is_none());
        }
        other => panic!("Expected array creation, got {other:?}"),
    }
}

#[test]
fn array_creation_with_initializer() {
    match expr("new int[] {1,2,3}") {
        Expr::ArrayCreation {
            sizes,
            ranks,
            initializer,
            ..
        } => {
            assert!(sizes.is_empty());
            assert_eq!(ranks, vec![1]);
            assert_eq!(initializer.unwrap().node.entries.len(), 3);
        }
        other => panic!("Expected array creation, got {other:?}"),
    }
}

#[test]
fn object_creation_with_arguments_and_initializer() {
    match expr("new Foo(1,2) { X = 1 }") {
        Expr::ObjectCreation { ty, args, initializer } => {
            assert!(ty.is_some());
            assert_eq!(args.map(|a| a.len()), Some(2));
            let entries = initializer.unwrap().node.entries;
            assert!(matches!(&entries[0].node, InitializerEntry::Member { name, .. } if name == "X"));
        }
        other => panic!("Expected object creation, got {other:?}"),
    }
}

#[test]
fn anonymous_object_creation() {
    match expr("new { X = 1 }") {
        Expr::AnonymousObject(members) => {
            assert_eq!(members.len(), 1);
            assert_eq!(members[0].node.name.as_deref(), Some("X"));
        }
        other => panic!("Expected anonymous object, got {other:?}"),
    }
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn dangling_else_binds_to_inner_if() {
    match stmt("if(a) if(b) s1(); else s2();") {
        Statement::If { then, otherwise, .. } => {
            assert!(otherwise.is_none(), "outer if must not own the else");
            match &then.node {
                Statement::If { otherwise, .. } => assert!(otherwise.is_some()),
                other => panic!("Expected inner if, got {other:?}"),
            }
        }
        other => panic!("Expected if statement, got {other:?}"),
    }
}

#[test]
fn generic_local_declaration_vs_comparison_statement() {
    assert!(matches!(stmt("List<int> xs = null;"), Statement::LocalDeclaration(_)));
    assert!(matches!(stmt("a < b;"), Statement::Expression(_)));
}

#[test]
fn deconstruction_assignment() {
    match stmt("var (a, b) = pair;") {
        Statement::Expression(e) => match e.node {
            Expr::Assignment { target, .. } => assert!(matches!(target.node, Expr::Declaration { .. })),
            other => panic!("Expected assignment, got {other:?}"),
        },
        other => panic!("Expected expression statement, got {other:?}"),
    }
}

#[test]
fn is_pattern_nullable_vs_conditional() {
    assert!(matches!(expr("x is int ? a : b"), Expr::Conditional { .. }));
    match expr("x is int?") {
        Expr::Is { pattern, .. } => {
            assert!(matches!(&pattern.node, Pattern::Type(t) if matches!(t.node, Type::Nullable(_))));
        }
        other => panic!("Expected is-pattern, got {other:?}"),
    }
}
