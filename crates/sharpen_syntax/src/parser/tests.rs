#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the locally ambiguous forms (casts, generic arguments, lambdas, declarations) and on
/// error recovery staying local to the broken construct.
mod tests {
    use super::*;
    use crate::lexer;

    fn tokens(source: &str) -> Vec<Token> {
        lexer::lex(source).expect("source should lex")
    }

    fn parse_str(source: &str) -> Result<CompilationUnit, Vec<SyntaxError>> {
        parse(&tokens(source))
    }

    fn expr(source: &str) -> Spanned<Expr> {
        parse_expression(&tokens(source)).unwrap_or_else(|errs| panic!("{source:?} failed: {errs:?}"))
    }

    fn stmt(source: &str) -> Spanned<Statement> {
        parse_statement(&tokens(source)).unwrap_or_else(|errs| panic!("{source:?} failed: {errs:?}"))
    }

    fn class_members(source: &str) -> Vec<Spanned<MemberDecl>> {
        let unit = parse_str(source).unwrap_or_else(|errs| panic!("{source:?} failed: {errs:?}"));
        match unit.members.into_iter().next().map(|m| m.node) {
            Some(NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { members, .. },
                ..
            })) => members,
            other => panic!("Expected class, got {other:?}"),
        }
    }

    fn is_name(e: &Expr, expected: &str) -> bool {
        matches!(e, Expr::Name { name, type_args } if name == expected && type_args.is_empty())
    }

    // ========================================================================
    // Casts and parentheses
    // ========================================================================

    #[test]
    fn test_parenthesized_name_alone() {
        match &expr("(a)").node {
            Expr::Parenthesized(inner) => assert!(is_name(&inner.node, "a")),
            other => panic!("Expected parenthesized expression, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_of_identifier() {
        match &expr("(Foo)x").node {
            Expr::Cast { ty, operand } => {
                assert!(matches!(&ty.node, Type::Named(n) if n.last_name() == "Foo"));
                assert!(is_name(&operand.node, "x"));
            }
            other => panic!("Expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_name_before_binary_minus() {
        match &expr("(a) - b").node {
            Expr::Binary { op, left, .. } => {
                assert_eq!(*op, BinaryOp::Sub);
                assert!(matches!(left.node, Expr::Parenthesized(_)));
            }
            other => panic!("Expected subtraction, got {other:?}"),
        }
    }

    #[test]
    fn test_predefined_type_casts_unary_minus() {
        match &expr("(int)-x").node {
            Expr::Cast { ty, operand } => {
                assert_eq!(ty.node, Type::Predefined(KeywordId::Int));
                assert!(matches!(operand.node, Expr::Unary { op: UnaryOp::Minus, .. }));
            }
            other => panic!("Expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_cast_and_nullable_cast() {
        assert!(matches!(expr("(List<int>)items").node, Expr::Cast { .. }));
        match &expr("(int?)value").node {
            Expr::Cast { ty, .. } => assert!(matches!(ty.node, Type::Nullable(_))),
            other => panic!("Expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_of_parenthesized_operand() {
        match &expr("(T)(a + b)").node {
            Expr::Cast { operand, .. } => assert!(matches!(operand.node, Expr::Parenthesized(_))),
            other => panic!("Expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_inside_statement() {
        match &stmt("(Foo)x;").node {
            Statement::Expression(e) => assert!(matches!(e.node, Expr::Cast { .. })),
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    // ========================================================================
    // Generic arguments vs. relational operators
    // ========================================================================

    #[test]
    fn test_relational_pair_in_arguments() {
        match &expr("F(a < b, c > d)").node {
            Expr::Invocation { args, .. } => {
                assert_eq!(args.len(), 2);
                assert!(matches!(args[0].node.value.node, Expr::Binary { op: BinaryOp::Lt, .. }));
                assert!(matches!(args[1].node.value.node, Expr::Binary { op: BinaryOp::Gt, .. }));
            }
            other => panic!("Expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_name_before_member_access() {
        match &expr("List<int>.Empty").node {
            Expr::MemberAccess { target, name, .. } => {
                assert_eq!(name, "Empty");
                match &target.node {
                    Expr::Name { name, type_args } => {
                        assert_eq!(name, "List");
                        assert_eq!(type_args.len(), 1);
                    }
                    other => panic!("Expected generic name, got {other:?}"),
                }
            }
            other => panic!("Expected member access, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_method_call() {
        match &expr("x.Cast<IFoo>()").node {
            Expr::Invocation { target, args } => {
                assert!(args.is_empty());
                assert!(matches!(&target.node, Expr::MemberAccess { type_args, .. } if type_args.len() == 1));
            }
            other => panic!("Expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_generic_closes_with_split_shift() {
        let s = stmt("Dictionary<string, List<int>> map = null;");
        match &s.node {
            Statement::LocalDeclaration(decl) => match &decl.ty.node {
                Type::Named(name) => {
                    assert_eq!(name.segments[0].type_args.len(), 2);
                    assert!(name.segments[0].type_args[1].node != Type::Omitted);
                }
                other => panic!("Expected named type, got {other:?}"),
            },
            other => panic!("Expected local declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_shift_right_is_still_an_operator() {
        assert!(matches!(expr("a >> 2").node, Expr::Binary { op: BinaryOp::Shr, .. }));
        assert!(matches!(
            expr("a >>= 2").node,
            Expr::Assignment { op: AssignOp::Shr, .. }
        ));
    }

    #[test]
    fn test_spaced_greater_thans_are_two_comparisons() {
        // `a > > b` is not a shift; the second `>` has no left operand.
        let errs = parse_expression(&tokens("a > > b")).expect_err("separated `>` `>` is not a shift");
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_unbound_generic_in_typeof() {
        match &expr("typeof(Dictionary<,>)").node {
            Expr::TypeOf(ty) => match &ty.node {
                Type::Named(name) => {
                    assert_eq!(name.segments[0].type_args.len(), 2);
                    assert!(name.segments[0].type_args.iter().all(|a| a.node == Type::Omitted));
                }
                other => panic!("Expected named type, got {other:?}"),
            },
            other => panic!("Expected typeof, got {other:?}"),
        }
    }

    // ========================================================================
    // Lambdas and tuples
    // ========================================================================

    #[test]
    fn test_parenthesized_lambda() {
        match &expr("(x) => x + 1").node {
            Expr::Lambda(lambda) => {
                assert!(lambda.parenthesized);
                assert_eq!(lambda.params.len(), 1);
                assert!(matches!(&lambda.body, LambdaBody::Expr(body) if matches!(body.node, Expr::Binary { .. })));
            }
            other => panic!("Expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_sum_is_not_a_lambda() {
        assert!(matches!(expr("(x + 1)").node, Expr::Parenthesized(_)));
    }

    #[test]
    fn test_tuple_literal() {
        match &expr("(x, y)").node {
            Expr::Tuple(elements) => assert_eq!(elements.len(), 2),
            other => panic!("Expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn test_named_tuple_elements() {
        match &expr("(first: 1, second: 2)").node {
            Expr::Tuple(elements) => {
                assert_eq!(elements[0].node.name.as_deref(), Some("first"));
                assert_eq!(elements[1].node.name.as_deref(), Some("second"));
            }
            other => panic!("Expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_and_async_lambdas() {
        match &expr("(int a, ref string b) => a").node {
            Expr::Lambda(lambda) => {
                assert!(lambda.params.iter().all(|p| p.node.ty.is_some()));
                assert_eq!(lambda.params[1].node.modifier, Some(ParamModifier::Ref));
            }
            other => panic!("Expected lambda, got {other:?}"),
        }
        match &expr("async x => await x").node {
            Expr::Lambda(lambda) => {
                assert!(lambda.is_async);
                assert!(!lambda.parenthesized);
            }
            other => panic!("Expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn test_lambda_with_block_body() {
        match &expr("() => { return 1; }").node {
            Expr::Lambda(lambda) => assert!(matches!(lambda.body, LambdaBody::Block(_))),
            other => panic!("Expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn test_deconstruction_assignment() {
        match &expr("(int a, var b) = pair").node {
            Expr::Assignment { target, .. } => match &target.node {
                Expr::Tuple(elements) => {
                    assert!(elements.iter().all(|e| matches!(e.node.value.node, Expr::Declaration { .. })));
                }
                other => panic!("Expected tuple target, got {other:?}"),
            },
            other => panic!("Expected assignment, got {other:?}"),
        }
        match &expr("var (x, y) = point").node {
            Expr::Assignment { target, .. } => assert!(matches!(
                &target.node,
                Expr::Declaration { designation: Designation::Parenthesized(parts), .. } if parts.len() == 2
            )),
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    // ========================================================================
    // Creation
    // ========================================================================

    #[test]
    fn test_new_forms() {
        match &expr("new int[3]").node {
            Expr::ArrayCreation {
                sizes, initializer, ..
            } => {
                assert_eq!(sizes.len(), 1);
                assert!(initializer.is_none());
            }
            other => panic!("Expected sized array creation, got {other:?}"),
        }
        match &expr("new int[] {1,2,3}").node {
            Expr::ArrayCreation {
                sizes,
                ranks,
                initializer,
                ..
            } => {
                assert!(sizes.is_empty());
                assert_eq!(ranks, &vec![1]);
                assert_eq!(initializer.as_ref().map(|i| i.node.entries.len()), Some(3));
            }
            other => panic!("Expected array creation with initializer, got {other:?}"),
        }
        match &expr("new Foo(1,2) { X = 1 }").node {
            Expr::ObjectCreation {
                ty,
                args,
                initializer,
            } => {
                assert!(ty.is_some());
                assert_eq!(args.as_ref().map(Vec::len), Some(2));
                let init = initializer.as_ref().expect("initializer");
                assert!(matches!(&init.node.entries[0].node, InitializerEntry::Member { name, .. } if name == "X"));
            }
            other => panic!("Expected object creation, got {other:?}"),
        }
        match &expr("new { X = 1 }").node {
            Expr::AnonymousObject(members) => assert_eq!(members[0].node.name.as_deref(), Some("X")),
            other => panic!("Expected anonymous object, got {other:?}"),
        }
    }

    #[test]
    fn test_implicit_array_and_target_typed_new() {
        assert!(matches!(
            expr("new[] { 1, 2 }").node,
            Expr::ImplicitArrayCreation { rank: 1, .. }
        ));
        assert!(matches!(expr("new()").node, Expr::ObjectCreation { ty: None, .. }));
    }

    #[test]
    fn test_collection_initializer_with_indexers() {
        match &expr("new Dictionary<string, int> { [\"a\"] = 1, { \"b\", 2 } }").node {
            Expr::ObjectCreation { initializer, .. } => {
                let entries = &initializer.as_ref().expect("initializer").node.entries;
                assert!(matches!(entries[0].node, InitializerEntry::Indexer { .. }));
                assert!(matches!(
                    &entries[1].node,
                    InitializerEntry::Element(e) if matches!(e.node, Expr::Initializer(_))
                ));
            }
            other => panic!("Expected object creation, got {other:?}"),
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    #[test]
    fn test_precedence_ladder() {
        match &expr("a + b * c").node {
            Expr::Binary { op, right, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(right.node, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("Expected addition, got {other:?}"),
        }
        match &expr("a || b && c").node {
            Expr::Binary { op, right, .. } => {
                assert_eq!(*op, BinaryOp::Or);
                assert!(matches!(right.node, Expr::Binary { op: BinaryOp::And, .. }));
            }
            other => panic!("Expected logical or, got {other:?}"),
        }
    }

    #[test]
    fn test_coalesce_is_right_associative() {
        match &expr("a ?? b ?? c").node {
            Expr::Binary { op, left, right } => {
                assert_eq!(*op, BinaryOp::Coalesce);
                assert!(is_name(&left.node, "a"));
                assert!(matches!(right.node, Expr::Binary { op: BinaryOp::Coalesce, .. }));
            }
            other => panic!("Expected coalesce, got {other:?}"),
        }
    }

    #[test]
    fn test_throw_expression_after_coalesce() {
        match &expr("x ?? throw new Exception()").node {
            Expr::Binary { right, .. } => assert!(matches!(right.node, Expr::Throw(_))),
            other => panic!("Expected coalesce, got {other:?}"),
        }
    }

    #[test]
    fn test_conditional_and_compound_assignment() {
        match &expr("x ??= y ? 1 : 2").node {
            Expr::Assignment { op, value, .. } => {
                assert_eq!(*op, AssignOp::Coalesce);
                assert!(matches!(value.node, Expr::Conditional { .. }));
            }
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_postfix_chain() {
        match &expr("a?.b[0]!.c(1)++").node {
            Expr::Postfix { op, operand } => {
                assert_eq!(*op, PostfixOp::Increment);
                assert!(matches!(operand.node, Expr::Invocation { .. }));
            }
            other => panic!("Expected postfix increment, got {other:?}"),
        }
        assert!(matches!(
            expr("a?[0]").node,
            Expr::Indexing { conditional: true, .. }
        ));
    }

    #[test]
    fn test_ranges_and_index_from_end() {
        match &expr("a[1..^1]").node {
            Expr::Indexing { args, .. } => match &args[0].node.value.node {
                Expr::Range { start, end } => {
                    assert!(start.is_some());
                    assert!(matches!(
                        end.as_deref().map(|e| &e.node),
                        Some(Expr::Unary { op: UnaryOp::IndexFromEnd, .. })
                    ));
                }
                other => panic!("Expected range, got {other:?}"),
            },
            other => panic!("Expected indexing, got {other:?}"),
        }
        assert!(matches!(expr("..").node, Expr::Range { start: None, end: None }));
    }

    #[test]
    fn test_await_is_unary_only_before_an_operand() {
        assert!(matches!(expr("await task").node, Expr::Unary { op: UnaryOp::Await, .. }));
        assert!(is_name(&expr("await").node, "await"));
    }

    #[test]
    fn test_named_and_out_arguments() {
        match &expr("TryGet(key: k, out var value, out int count, ref x)").node {
            Expr::Invocation { args, .. } => {
                assert_eq!(args[0].node.name.as_deref(), Some("key"));
                assert_eq!(args[1].node.modifier, Some(ArgModifier::Out));
                assert!(matches!(args[1].node.value.node, Expr::Declaration { .. }));
                assert!(matches!(args[2].node.value.node, Expr::Declaration { .. }));
                assert_eq!(args[3].node.modifier, Some(ArgModifier::Ref));
                assert!(is_name(&args[3].node.value.node, "x"));
            }
            other => panic!("Expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_primaries() {
        assert!(matches!(expr("default").node, Expr::Default(None)));
        assert!(matches!(expr("default(int)").node, Expr::Default(Some(_))));
        assert!(matches!(expr("sizeof(int)").node, Expr::SizeOf(_)));
        assert!(matches!(expr("nameof(x.Y)").node, Expr::NameOf(_)));
        assert!(matches!(expr("checked(a + b)").node, Expr::Checked(_)));
        assert!(matches!(expr("global::System").node, Expr::AliasQualified { .. }));
        assert!(matches!(expr("stackalloc int[4]").node, Expr::StackAlloc { .. }));
        assert!(matches!(
            expr("delegate (int x) { return; }").node,
            Expr::AnonymousMethod { params: Some(_), .. }
        ));
    }

    #[test]
    fn test_interpolated_string_holes_are_parsed() {
        match &expr("$\"a{x + 1,5:N2}b\"").node {
            Expr::Interpolated { parts, .. } => {
                let hole = parts.iter().find_map(|p| match p {
                    InterpolatedPart::Hole { expr, alignment, format } => Some((expr, alignment, format)),
                    InterpolatedPart::Text(_) => None,
                });
                let (expr, alignment, format) = hole.expect("one hole");
                assert!(matches!(expr.node, Expr::Binary { op: BinaryOp::Add, .. }));
                assert!(alignment.is_some());
                assert_eq!(format.as_deref(), Some("N2"));
                // Spans point back into the original source.
                assert_eq!(expr.span.start, 4);
            }
            other => panic!("Expected interpolated string, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_interpolation_hole_is_reported() {
        let errs = parse_expression(&tokens("$\"{x +}\"")).expect_err("broken hole");
        assert_eq!(errs.len(), 1);
    }

    // ========================================================================
    // Patterns and switch expressions
    // ========================================================================

    #[test]
    fn test_is_patterns() {
        match &expr("o is int n").node {
            Expr::Is { pattern, .. } => assert!(matches!(pattern.node, Pattern::Declaration { .. })),
            other => panic!("Expected is, got {other:?}"),
        }
        match &expr("o is not null and not Foo").node {
            Expr::Is { pattern, .. } => assert!(matches!(pattern.node, Pattern::And(_, _))),
            other => panic!("Expected is, got {other:?}"),
        }
        match &expr("p is Point { X: > 0, Y: var y } pt").node {
            Expr::Is { pattern, .. } => match &pattern.node {
                Pattern::Recursive {
                    ty,
                    properties,
                    designation,
                    ..
                } => {
                    assert!(ty.is_some());
                    assert_eq!(properties.as_ref().map(Vec::len), Some(2));
                    assert_eq!(designation, &Some(Designation::Single("pt".to_string())));
                }
                other => panic!("Expected recursive pattern, got {other:?}"),
            },
            other => panic!("Expected is, got {other:?}"),
        }
    }

    #[test]
    fn test_is_nullable_type_vs_conditional() {
        match &expr("x is int ? a : b").node {
            Expr::Conditional { cond, .. } => assert!(matches!(cond.node, Expr::Is { .. })),
            other => panic!("Expected conditional, got {other:?}"),
        }
        match &expr("x is int?").node {
            Expr::Is { pattern, .. } => {
                assert!(matches!(&pattern.node, Pattern::Type(t) if matches!(t.node, Type::Nullable(_))))
            }
            other => panic!("Expected is, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_pattern_with_member_access() {
        match &expr("x is Color.Red + 1").node {
            Expr::Is { pattern, .. } => assert!(matches!(pattern.node, Pattern::Constant(_))),
            other => panic!("Expected is, got {other:?}"),
        }
    }

    #[test]
    fn test_switch_expression() {
        match &expr("x switch { 0 => \"zero\", < 0 => \"neg\", _ when y => \"other\", _ => \"pos\" }").node {
            Expr::Switch { arms, .. } => {
                assert_eq!(arms.len(), 4);
                assert!(matches!(arms[1].node.pattern.node, Pattern::Relational { op: BinaryOp::Lt, .. }));
                assert!(arms[2].node.guard.is_some());
                assert!(matches!(arms[3].node.pattern.node, Pattern::Discard));
            }
            other => panic!("Expected switch expression, got {other:?}"),
        }
    }

    #[test]
    fn test_positional_pattern() {
        match &expr("t is (1, _)").node {
            Expr::Is { pattern, .. } => assert!(matches!(
                &pattern.node,
                Pattern::Recursive { ty: None, positional: Some(items), .. } if items.len() == 2
            )),
            other => panic!("Expected is, got {other:?}"),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[test]
    fn test_query_expression() {
        let source = "from c in customers where c.Age > 18 orderby c.Name descending, c.Id select c.Name";
        match &expr(source).node {
            Expr::Query(query) => {
                assert_eq!(query.clauses.len(), 4);
                assert!(matches!(query.clauses[0].node, QueryClause::From { ty: None, .. }));
                match &query.clauses[2].node {
                    QueryClause::OrderBy(orderings) => {
                        assert_eq!(orderings[0].node.direction, Some(OrderDirection::Descending));
                        assert_eq!(orderings[1].node.direction, None);
                    }
                    other => panic!("Expected orderby, got {other:?}"),
                }
                assert!(matches!(query.clauses[3].node, QueryClause::Select(_)));
            }
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_query_with_join_group_and_continuation() {
        let source = "from int x in xs join y in ys on x equals y into g let n = g.Count() group x by n into h select h";
        match &expr(source).node {
            Expr::Query(query) => {
                assert!(matches!(query.clauses[0].node, QueryClause::From { ty: Some(_), .. }));
                assert!(matches!(&query.clauses[1].node, QueryClause::Join { into: Some(name), .. } if name == "g"));
                assert!(matches!(query.clauses[2].node, QueryClause::Let { .. }));
                assert!(matches!(query.clauses[3].node, QueryClause::Group { .. }));
                assert!(matches!(&query.clauses[4].node, QueryClause::Into(name) if name == "h"));
                assert!(matches!(query.clauses[5].node, QueryClause::Select(_)));
            }
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_cast_inside_query_stops_at_clause_keyword() {
        match &expr("from x in xs select (T)x").node {
            Expr::Query(query) => {
                assert!(matches!(&query.clauses[1].node, QueryClause::Select(e) if matches!(e.node, Expr::Cast { .. })))
            }
            other => panic!("Expected query, got {other:?}"),
        }
        match &expr("from x in (xs) where x select x").node {
            Expr::Query(query) => {
                assert!(matches!(&query.clauses[0].node, QueryClause::From { source, .. }
                    if matches!(source.node, Expr::Parenthesized(_))));
            }
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_from_as_plain_identifier() {
        assert!(matches!(expr("from + 1").node, Expr::Binary { .. }));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_dangling_else_binds_to_inner_if() {
        match &stmt("if(a) if(b) s1; else s2;").node {
            Statement::If { then, otherwise, .. } => {
                assert!(otherwise.is_none(), "outer if must not get the else");
                match &then.node {
                    Statement::If { otherwise, .. } => assert!(otherwise.is_some()),
                    other => panic!("Expected inner if, got {other:?}"),
                }
            }
            other => panic!("Expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_local_declarations() {
        match &stmt("int x = 1, y;").node {
            Statement::LocalDeclaration(decl) => {
                assert_eq!(decl.declarators.len(), 2);
                assert!(decl.declarators[1].node.initializer.is_none());
            }
            other => panic!("Expected local declaration, got {other:?}"),
        }
        match &stmt("var list = new List<int>();").node {
            Statement::LocalDeclaration(decl) => assert!(decl.ty.node.is_var()),
            other => panic!("Expected local declaration, got {other:?}"),
        }
        match &stmt("const int Max = 10;").node {
            Statement::LocalDeclaration(decl) => assert!(decl.is_const),
            other => panic!("Expected const declaration, got {other:?}"),
        }
        match &stmt("int[] a = { 1, 2 };").node {
            Statement::LocalDeclaration(decl) => assert!(matches!(
                decl.declarators[0].node.initializer.as_ref().map(|e| &e.node),
                Some(Expr::Initializer(_))
            )),
            other => panic!("Expected local declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_expression_statements_that_start_like_types() {
        assert!(matches!(stmt("x = 5;").node, Statement::Expression(_)));
        assert!(matches!(stmt("a.b.c();").node, Statement::Expression(_)));
        assert!(matches!(stmt("i++;").node, Statement::Expression(_)));
        assert!(matches!(stmt("await Foo();").node, Statement::Expression(_)));
        assert!(matches!(stmt("a < b;").node, Statement::Expression(_)));
    }

    #[test]
    fn test_pointer_declaration_wins_over_multiplication() {
        match &stmt("a * b;").node {
            Statement::LocalDeclaration(decl) => assert!(matches!(decl.ty.node, Type::Pointer(_))),
            other => panic!("Expected pointer declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_local_function() {
        match &stmt("static int Twice<T>(int x) where T : struct => x * 2;").node {
            Statement::LocalFunction(f) => {
                assert_eq!(f.modifiers.len(), 1);
                assert_eq!(f.method.name.name, "Twice");
                assert_eq!(f.method.type_params.len(), 1);
                assert_eq!(f.method.constraints.len(), 1);
                assert!(matches!(f.method.body, MethodBody::Expr(_)));
            }
            other => panic!("Expected local function, got {other:?}"),
        }
    }

    #[test]
    fn test_loops() {
        match &stmt("for (int i = 0, j = 1; i < n; i++, j--) { }").node {
            Statement::For {
                init,
                cond,
                iterators,
                ..
            } => {
                assert!(matches!(init, Some(ForInit::Declaration(d)) if d.declarators.len() == 2));
                assert!(cond.is_some());
                assert_eq!(iterators.len(), 2);
            }
            other => panic!("Expected for, got {other:?}"),
        }
        assert!(matches!(
            stmt("for (;;) ;").node,
            Statement::For { init: None, cond: None, .. }
        ));
        assert!(matches!(
            stmt("foreach (var (k, v) in map) { }").node,
            Statement::ForEach { target: Designation::Parenthesized(_), is_await: false, .. }
        ));
        assert!(matches!(
            stmt("await foreach (var item in stream) { }").node,
            Statement::ForEach { is_await: true, .. }
        ));
        assert!(matches!(stmt("do x++; while (x < 10);").node, Statement::Do { .. }));
    }

    #[test]
    fn test_switch_statement() {
        let source = "switch (x) { case 1: case 2 when y: a(); break; case int n: break; default: return; }";
        match &stmt(source).node {
            Statement::Switch { scrutinee, sections } => {
                assert!(is_name(&scrutinee.node, "x"));
                assert_eq!(sections.len(), 3);
                assert_eq!(sections[0].node.labels.len(), 2);
                assert_eq!(sections[0].node.statements.len(), 2);
                assert!(matches!(
                    &sections[0].node.labels[1].node,
                    SwitchLabel::Case { guard: Some(_), .. }
                ));
                assert!(matches!(sections[2].node.labels[0].node, SwitchLabel::Default));
            }
            other => panic!("Expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_switch_on_tuple() {
        match &stmt("switch (a, b) { default: break; }").node {
            Statement::Switch { scrutinee, .. } => assert!(matches!(scrutinee.node, Expr::Tuple(_))),
            other => panic!("Expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_try_catch_finally() {
        let source = "try { } catch (IOException e) when (e.HResult == 1) { } catch { } finally { }";
        match &stmt(source).node {
            Statement::Try { catches, finally, .. } => {
                assert_eq!(catches.len(), 2);
                assert_eq!(catches[0].node.name.as_deref(), Some("e"));
                assert!(catches[0].node.filter.is_some());
                assert!(catches[1].node.ty.is_none());
                assert!(finally.is_some());
            }
            other => panic!("Expected try, got {other:?}"),
        }
    }

    #[test]
    fn test_try_without_handlers_is_reported_but_kept() {
        let tokens = tokens("class C { void M() { try { } } }");
        let parse = parse_with_diagnostics(&tokens);
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("catch"));
    }

    #[test]
    fn test_using_forms() {
        assert!(matches!(
            stmt("using (var f = Open()) { }").node,
            Statement::Using { resource: UsingResource::Declaration(_), .. }
        ));
        assert!(matches!(
            stmt("using (lease) Work();").node,
            Statement::Using { resource: UsingResource::Expr(_), .. }
        ));
        assert!(matches!(
            stmt("using var f = Open();").node,
            Statement::LocalDeclaration(LocalDeclaration { is_using: true, is_await: false, .. })
        ));
        assert!(matches!(
            stmt("await using var f = Open();").node,
            Statement::LocalDeclaration(LocalDeclaration { is_using: true, is_await: true, .. })
        ));
    }

    #[test]
    fn test_jump_and_misc_statements() {
        assert!(matches!(stmt("goto case 1;").node, Statement::Goto(GotoTarget::Case(_))));
        assert!(matches!(stmt("goto default;").node, Statement::Goto(GotoTarget::Default)));
        assert!(matches!(stmt("goto done;").node, Statement::Goto(GotoTarget::Label(_))));
        assert!(matches!(stmt("yield return 1;").node, Statement::YieldReturn(_)));
        assert!(matches!(stmt("yield break;").node, Statement::YieldBreak));
        assert!(matches!(stmt("throw;").node, Statement::Throw(None)));
        assert!(matches!(stmt("return;").node, Statement::Return(None)));
        assert!(matches!(stmt("done: x++;").node, Statement::Labeled { .. }));
        assert!(matches!(stmt("lock (gate) { }").node, Statement::Lock { .. }));
        assert!(matches!(stmt("unsafe { }").node, Statement::Unsafe(_)));
        assert!(matches!(stmt("checked { }").node, Statement::Checked(_)));
        assert!(matches!(stmt("fixed (int* p = &x) { }").node, Statement::Fixed { .. }));
        assert!(matches!(stmt(";").node, Statement::Empty));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_compilation_unit_prologue() {
        let source = "extern alias Lib;\nusing System;\nusing static System.Math;\nusing IntList = System.Collections.Generic.List<int>;\n[assembly: Version(\"1.0\")]\nclass C { }";
        let unit = parse_str(source).unwrap();
        assert_eq!(unit.externs.len(), 1);
        assert_eq!(unit.usings.len(), 3);
        assert!(matches!(unit.usings[1].node, UsingDirective::Static(_)));
        assert!(matches!(unit.usings[2].node, UsingDirective::Alias { .. }));
        assert_eq!(unit.attributes[0].node.target.as_deref(), Some("assembly"));
        assert_eq!(unit.members.len(), 1);
    }

    #[test]
    fn test_namespaces() {
        let unit = parse_str("namespace A.B { using X; class C { } namespace D { } }").unwrap();
        match &unit.members[0].node {
            NamespaceMember::Namespace(ns) => {
                assert!(!ns.file_scoped);
                assert_eq!(ns.usings.len(), 1);
                assert_eq!(ns.members.len(), 2);
            }
            other => panic!("Expected namespace, got {other:?}"),
        }
        let unit = parse_str("namespace App;\nclass A { }\nclass B { }").unwrap();
        match &unit.members[0].node {
            NamespaceMember::Namespace(ns) => {
                assert!(ns.file_scoped);
                assert_eq!(ns.members.len(), 2);
            }
            other => panic!("Expected namespace, got {other:?}"),
        }
    }

    #[test]
    fn test_type_declaration_header() {
        let unit = parse_str("public sealed class Box<in T, out U> : Base, IBox where T : class, new() where U : unmanaged { }").unwrap();
        match &unit.members[0].node {
            NamespaceMember::Type(decl) => {
                assert_eq!(decl.modifiers.len(), 2);
                assert_eq!(decl.type_params[0].node.variance, Some(Variance::In));
                assert_eq!(decl.type_params[1].node.variance, Some(Variance::Out));
                assert_eq!(decl.base_list.len(), 2);
                assert_eq!(decl.constraints.len(), 2);
                assert_eq!(decl.constraints[0].node.constraints.len(), 2);
                assert!(matches!(decl.constraints[1].node.constraints[0].node, Constraint::Unmanaged));
            }
            other => panic!("Expected type, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_and_delegate() {
        let unit = parse_str("enum Color : byte { Red = 1, [Obsolete] Green, Blue, }\ndelegate void Handler(object sender);").unwrap();
        match &unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Enum(members),
                base_list,
                ..
            }) => {
                assert_eq!(members.len(), 3);
                assert!(members[0].node.value.is_some());
                assert_eq!(members[1].node.attributes.len(), 1);
                assert_eq!(base_list.len(), 1);
            }
            other => panic!("Expected enum, got {other:?}"),
        }
        assert!(matches!(
            &unit.members[1].node,
            NamespaceMember::Type(TypeDecl { body: TypeBody::Delegate { params, .. }, .. }) if params.len() == 1
        ));
    }

    #[test]
    fn test_member_kinds() {
        let source = r#"
class C {
    private const int Max = 3;
    public static readonly string Name = "c", Other;
    public int Count { get; private set; } = 0;
    public int Twice => Count * 2;
    public int this[int i] { get => i; set { } }
    public event EventHandler Changed;
    public event EventHandler Moved { add { } remove { } }
    public C(int x) : base(x) { }
    ~C() { }
    public static C operator +(C a, C b) => a;
    public static bool operator >>(C a, int b) => true;
    public static implicit operator int(C c) => 0;
    public async Task<int> RunAsync<T>(T input, params object[] rest) where T : class { return 0; }
    void IDisposable.Dispose() { }
    int IList<int>.this[int i] => i;
    public abstract void M();
    class Nested { }
}
"#;
        let members = class_members(source);
        let kinds: Vec<&str> = members.iter().map(|m| m.node.kind.describe()).collect();
        assert_eq!(
            kinds,
            vec![
                "constant",
                "field",
                "property",
                "property",
                "indexer",
                "event",
                "event",
                "constructor",
                "destructor",
                "operator",
                "operator",
                "conversion operator",
                "method",
                "method",
                "indexer",
                "method",
                "nested type",
            ]
        );

        match &members[1].node.kind {
            MemberKind::Field(field) => assert_eq!(field.declarators.len(), 2),
            other => panic!("Expected field, got {other:?}"),
        }
        match &members[2].node.kind {
            MemberKind::Property(prop) => {
                assert!(prop.initializer.is_some());
                assert!(matches!(&prop.body, PropertyBody::Accessors(a) if a[1].node.modifiers.len() == 1));
            }
            other => panic!("Expected property, got {other:?}"),
        }
        match &members[7].node.kind {
            MemberKind::Constructor(ctor) => assert!(matches!(
                ctor.initializer.as_ref().map(|i| i.node.target),
                Some(InitializerTarget::Base)
            )),
            other => panic!("Expected constructor, got {other:?}"),
        }
        assert!(matches!(
            &members[10].node.kind,
            MemberKind::Operator(OperatorDecl { op: OverloadableOp::Shr, .. })
        ));
        match &members[12].node.kind {
            MemberKind::Method(method) => {
                assert_eq!(method.type_params.len(), 1);
                assert_eq!(method.params[1].node.modifier, Some(ParamModifier::Params));
                assert!(members[12].node.modifiers.iter().any(|m| m.node == Modifier::Async));
            }
            other => panic!("Expected method, got {other:?}"),
        }
        match &members[13].node.kind {
            MemberKind::Method(method) => {
                assert_eq!(method.name.interface.as_ref().map(|i| i.last_name()), Some("IDisposable"));
            }
            other => panic!("Expected method, got {other:?}"),
        }
        match &members[14].node.kind {
            MemberKind::Indexer(indexer) => {
                let interface = indexer.interface.as_ref().expect("interface-qualified indexer");
                assert_eq!(interface.segments[0].type_args.len(), 1);
            }
            other => panic!("Expected indexer, got {other:?}"),
        }
        assert!(matches!(members[15].node.kind, MemberKind::Method(MethodDecl { body: MethodBody::None, .. })));
    }

    #[test]
    fn test_attributes_on_members_and_parameters() {
        let members = class_members("class C { [Test, Category(\"fast\")] [return: NotNull] string M([In] int x = 1) => null; }");
        let member = &members[0].node;
        assert_eq!(member.attributes.len(), 2);
        assert_eq!(member.attributes[0].node.attributes.len(), 2);
        assert_eq!(member.attributes[1].node.target.as_deref(), Some("return"));
        match &member.kind {
            MemberKind::Method(method) => {
                assert_eq!(method.params[0].node.attributes.len(), 1);
                assert!(method.params[0].node.default.is_some());
            }
            other => panic!("Expected method, got {other:?}"),
        }
    }

    #[test]
    fn test_interface_and_struct_body_validation() {
        let parse = parse_with_diagnostics(&tokens("interface I { int x; I() { } void M(); }"));
        assert_eq!(parse.diagnostics.len(), 2);
        match &parse.unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { members, .. },
                ..
            }) => assert_eq!(members.len(), 3, "rejected members stay in the tree"),
            other => panic!("Expected interface, got {other:?}"),
        }

        let parse = parse_with_diagnostics(&tokens("struct S { ~S() { } }"));
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("destructor"));
    }

    #[test]
    fn test_interface_qualifier_type_args_backtrack_cleanly() {
        let members = class_members("class C { void IFoo<int>.Bar() { } T Get<T>() => default; }");
        match &members[0].node.kind {
            MemberKind::Method(method) => {
                let interface = method.name.interface.as_ref().expect("interface-qualified method");
                assert_eq!(interface.last_name(), "IFoo");
                assert_eq!(interface.segments[0].type_args.len(), 1);
                assert_eq!(method.name.name, "Bar");
            }
            other => panic!("Expected method, got {other:?}"),
        }
        match &members[1].node.kind {
            MemberKind::Method(method) => {
                assert!(method.name.interface.is_none());
                assert_eq!(method.type_params.len(), 1);
            }
            other => panic!("Expected method, got {other:?}"),
        }
    }

    // ========================================================================
    // Reference locals, returns and fixed-size buffers
    // ========================================================================

    fn ref_operand(e: &Expr) -> &Expr {
        match e {
            Expr::Ref(inner) => &inner.node,
            other => panic!("Expected ref expression, got {other:?}"),
        }
    }

    #[test]
    fn test_ref_local_declarations() {
        match &stmt("ref int r = ref x;").node {
            Statement::LocalDeclaration(decl) => {
                assert!(matches!(
                    &decl.ty.node,
                    Type::Ref { readonly: false, ty } if ty.node == Type::Predefined(KeywordId::Int)
                ));
                let init = decl.declarators[0].node.initializer.as_ref().expect("initializer");
                assert!(is_name(ref_operand(&init.node), "x"));
            }
            other => panic!("Expected ref local, got {other:?}"),
        }
        match &stmt("ref readonly int r = ref x;").node {
            Statement::LocalDeclaration(decl) => {
                assert!(matches!(&decl.ty.node, Type::Ref { readonly: true, .. }));
            }
            other => panic!("Expected ref readonly local, got {other:?}"),
        }
        match &stmt("var y = ref x;").node {
            Statement::LocalDeclaration(decl) => {
                assert!(decl.ty.node.is_var());
                let init = decl.declarators[0].node.initializer.as_ref().expect("initializer");
                assert!(is_name(ref_operand(&init.node), "x"));
            }
            other => panic!("Expected local declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_ref_return_and_ref_conditional() {
        match &stmt("return ref x;").node {
            Statement::Return(Some(value)) => assert!(is_name(ref_operand(&value.node), "x")),
            other => panic!("Expected return, got {other:?}"),
        }
        match &expr("c ? ref a : ref b").node {
            Expr::Conditional { cond, then, otherwise } => {
                assert!(is_name(&cond.node, "c"));
                assert!(is_name(ref_operand(&then.node), "a"));
                assert!(is_name(ref_operand(&otherwise.node), "b"));
            }
            other => panic!("Expected conditional, got {other:?}"),
        }
        // The whole conditional is the referent.
        match &expr("ref c ? ref a : ref b").node {
            Expr::Ref(inner) => assert!(matches!(inner.node, Expr::Conditional { .. })),
            other => panic!("Expected ref expression, got {other:?}"),
        }
    }

    #[test]
    fn test_ref_arguments_are_still_argument_modifiers() {
        match &expr("F(ref x)").node {
            Expr::Invocation { args, .. } => {
                assert_eq!(args[0].node.modifier, Some(ArgModifier::Ref));
                assert!(is_name(&args[0].node.value.node, "x"));
            }
            other => panic!("Expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_ref_returning_members() {
        let members = class_members("class C { ref int F() => ref x; ref readonly int P => ref x; }");
        match &members[0].node.kind {
            MemberKind::Method(method) => {
                assert!(matches!(&method.return_type.node, Type::Ref { readonly: false, .. }));
                match &method.body {
                    MethodBody::Expr(body) => assert!(is_name(ref_operand(&body.node), "x")),
                    other => panic!("Expected expression body, got {other:?}"),
                }
            }
            other => panic!("Expected method, got {other:?}"),
        }
        assert!(members[0].node.modifiers.is_empty());
        match &members[1].node.kind {
            MemberKind::Property(prop) => {
                assert!(matches!(&prop.ty.node, Type::Ref { readonly: true, .. }));
                assert!(matches!(&prop.body, PropertyBody::Expr(_)));
            }
            other => panic!("Expected property, got {other:?}"),
        }
    }

    #[test]
    fn test_ref_struct_modifier() {
        let unit = parse_str("public ref struct Span { } ref partial struct P { }").expect("ref structs parse");
        for member in &unit.members {
            match &member.node {
                NamespaceMember::Type(decl) => {
                    assert!(decl.modifiers.iter().any(|m| m.node == Modifier::Ref), "{decl:?}");
                    assert!(matches!(decl.body, TypeBody::Class { kind: ClassKind::Struct, .. }));
                }
                other => panic!("Expected struct, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fixed_size_buffers() {
        let unit = parse_str("unsafe struct S { fixed int buf[10]; public fixed char a[4], b[N * 2]; }")
            .unwrap_or_else(|errs| panic!("fixed buffers failed: {errs:?}"));
        let members = match &unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { kind: ClassKind::Struct, members },
                ..
            }) => members,
            other => panic!("Expected struct, got {other:?}"),
        };
        assert_eq!(members.len(), 2);
        match &members[0].node.kind {
            MemberKind::FixedBuffer(buffer) => {
                assert_eq!(buffer.ty.node, Type::Predefined(KeywordId::Int));
                assert_eq!(buffer.declarators.len(), 1);
                assert_eq!(buffer.declarators[0].node.name, "buf");
                assert!(matches!(buffer.declarators[0].node.size.node, Expr::Literal(_)));
            }
            other => panic!("Expected fixed-size buffer, got {other:?}"),
        }
        match &members[1].node.kind {
            MemberKind::FixedBuffer(buffer) => {
                assert_eq!(buffer.declarators.len(), 2);
                assert!(matches!(buffer.declarators[1].node.size.node, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("Expected fixed-size buffer, got {other:?}"),
        }
        assert_eq!(members[1].node.modifiers.len(), 1);
    }

    #[test]
    fn test_fixed_size_buffer_outside_struct_is_reported() {
        let parse = parse_with_diagnostics(&tokens("class C { fixed int buf[10]; }"));
        assert_eq!(parse.diagnostics.len(), 1);
        assert!(parse.diagnostics[0].message.contains("fixed-size buffer"));
        assert!(!parse.diagnostics[0].hints.is_empty());
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    #[test]
    fn test_missing_semicolon_is_one_local_error() {
        let source = "class C { void M() { int x = 1 int y = 2; Foo(); } }";
        let parse = parse_with_diagnostics(&tokens(source));
        assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
        let err = &parse.diagnostics[0];
        assert_eq!(err.kind, ErrorKind::Syntax);
        // Anchored right after `1`.
        assert_eq!(err.span.start, source.find("1 int").unwrap() + 1);

        let members = match &parse.unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { members, .. },
                ..
            }) => members,
            other => panic!("Expected class, got {other:?}"),
        };
        match &members[0].node.kind {
            MemberKind::Method(MethodDecl {
                body: MethodBody::Block(block),
                ..
            }) => assert_eq!(block.node.statements.len(), 3),
            other => panic!("Expected method, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_statement_becomes_error_placeholder() {
        let source = "class C { void M() { a = ; b(); } }";
        let parse = parse_with_diagnostics(&tokens(source));
        assert_eq!(parse.diagnostics.len(), 1);
        let members = match &parse.unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { members, .. },
                ..
            }) => members,
            other => panic!("Expected class, got {other:?}"),
        };
        match &members[0].node.kind {
            MemberKind::Method(MethodDecl {
                body: MethodBody::Block(block),
                ..
            }) => {
                assert!(matches!(block.node.statements[0].node, Statement::Error));
                assert!(matches!(block.node.statements[1].node, Statement::Expression(_)));
            }
            other => panic!("Expected method, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_member_does_not_swallow_class() {
        let source = "class C { int P { foo; } void M() { } } class D { }";
        let parse = parse_with_diagnostics(&tokens(source));
        assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
        assert_eq!(parse.unit.members.len(), 2);
        match &parse.unit.members[0].node {
            NamespaceMember::Type(TypeDecl {
                body: TypeBody::Class { members, .. },
                ..
            }) => {
                assert!(matches!(members[0].node.kind, MemberKind::Error));
                assert!(matches!(members[1].node.kind, MemberKind::Method(_)));
            }
            other => panic!("Expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_closing_brace_at_top_level() {
        let parse = parse_with_diagnostics(&tokens("} class C { }"));
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.unit.members.len(), 1);
    }

    #[test]
    fn test_unexpected_eof_reported_once() {
        let parse = parse_with_diagnostics(&tokens("namespace N { class C { void M() { if (x) {"));
        let eofs = parse
            .diagnostics
            .iter()
            .filter(|d| d.kind == ErrorKind::UnexpectedEof)
            .count();
        assert_eq!(eofs, 1, "{:?}", parse.diagnostics);
        assert_eq!(parse.diagnostics.len(), 1);
    }

    #[test]
    fn test_speculation_diagnostics_are_discarded() {
        // Every one of these goes through at least one failed speculative attempt.
        let source = "class C { void M() { F(a < b, c > d); var r = (a) - b; x = y; } }";
        assert!(parse_str(source).is_ok());
    }

    #[test]
    fn test_nesting_limit_is_a_diagnostic() {
        let source = format!("class C {{ int x = {}1{}; }}", "(".repeat(40), ")".repeat(40));
        let parse = parse_with_options(&tokens(&source), ParseOptions::new().with_max_depth(16));
        assert!(
            parse
                .diagnostics
                .iter()
                .any(|d| d.kind == ErrorKind::NestingTooDeep),
            "{:?}",
            parse.diagnostics
        );
        assert_eq!(parse.unit.members.len(), 1);
    }

    #[test]
    fn test_diagnostics_cap() {
        let source = "class C { void M() { a = ; b = ; c = ; d = ; } }";
        let parse = parse_with_options(&tokens(source), ParseOptions::new().with_max_diagnostics(Some(2)));
        assert_eq!(parse.diagnostics.len(), 2);
    }

    #[test]
    fn test_fragment_must_consume_all_input() {
        let errs = parse_expression(&tokens("a b")).expect_err("trailing tokens");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("end of expression"));
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    #[test]
    fn test_peek_past_end_is_repeatable_eof() {
        let tokens = tokens("x");
        let mut parser = Parser::new(&tokens, ParseOptions::default());
        assert!(matches!(parser.peek_kind(5), TokenKind::Eof));
        parser.advance();
        parser.advance();
        parser.advance();
        assert!(parser.is_at_end());
        assert!(matches!(parser.peek_kind(0), TokenKind::Eof));
        assert!(matches!(parser.peek_kind(1), TokenKind::Eof));
    }

    #[test]
    fn test_mark_and_reset() {
        let tokens = tokens("a b c");
        let mut parser = Parser::new(&tokens, ParseOptions::default());
        let mark = parser.mark();
        parser.advance();
        parser.advance();
        assert_eq!(parser.peek().ident(), Some("c"));
        parser.reset(mark);
        assert_eq!(parser.peek().ident(), Some("a"));
    }

    #[test]
    fn test_shift_tokens_are_split_with_adjacent_spans() {
        let tokens = tokens("a >>= b");
        let parser = Parser::new(&tokens, ParseOptions::default());
        assert!(parser.peek_kind(1).is_operator(OperatorId::Gt));
        assert!(parser.peek_kind(2).is_operator(OperatorId::GtEq));
        assert!(parser.adjacent(1));
    }

    #[test]
    fn test_failed_speculation_is_memoised() {
        let tokens = tokens("(a) - b");
        let mut parser = Parser::new(&tokens, ParseOptions::default());
        let first = parser.speculate(Rule::Cast, |p| -> PResult<()> { Err(p.unexpected(&["cast"])) });
        assert!(first.is_none());
        assert!(parser.failed.contains(&(Rule::Cast, 0)));
        let mut ran = false;
        let second = parser.speculate(Rule::Cast, |_| -> PResult<()> {
            ran = true;
            Ok(())
        });
        assert!(second.is_none());
        assert!(!ran, "memoised failure must not re-run the attempt");
        assert!(parser.diagnostics.is_empty());
    }
}
