#[cfg(test)]
mod parser_tests {
    use chrono::NaiveDate;

    use scrawl::ast::*;
    use scrawl::error::{ParseError, Result};
    use scrawl::parser::Parser;
    use scrawl::token::{Token, TokenKind, TokenSource};

    // ───────────────────────────── helpers ─────────────────────────────

    fn int(n: i64) -> Expr {
        Expr::literal(Literal::Integer(n))
    }

    fn var(name: &str) -> Expr {
        Expr::variable(name)
    }

    fn bin(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(op, lhs, rhs)
    }

    fn statements(source: &str) -> Vec<Stmt> {
        match scrawl::parse(source) {
            Ok(scope) => scope.statements().to_vec(),
            Err(e) => panic!("Failed to parse {:?}: {}", source, e),
        }
    }

    fn single(source: &str) -> Stmt {
        let mut stmts = statements(source);
        assert_eq!(stmts.len(), 1, "expected one statement in {:?}", source);
        stmts.remove(0)
    }

    fn expression(source: &str) -> Expr {
        match single(source) {
            Stmt::Expression(expr) => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    fn error(source: &str) -> ParseError {
        match scrawl::parse(source) {
            Ok(scope) => panic!("Expected {:?} to fail, got {:?}", source, scope),
            Err(e) => e,
        }
    }

    /// Replays hand‑built tokens, for token kinds the tokeniser never emits.
    struct Replay(Vec<Token>, usize);

    impl Replay {
        fn new(tokens: &[(TokenKind, &str)]) -> Self {
            Self(tokens.iter().map(|(k, t)| Token::new(*k, *t)).collect(), 0)
        }
    }

    impl TokenSource for Replay {
        fn reset(&mut self) {
            self.1 = 0;
        }

        fn next_token(&mut self) -> Result<Token> {
            let token = self.0.get(self.1).cloned().unwrap_or_else(Token::eot);
            self.1 += 1;
            Ok(token)
        }
    }

    // ─────────────────────────── declarations ──────────────────────────

    #[test]
    fn test_declaration() {
        assert_eq!(
            single("let x = 1 + 2"),
            Stmt::Declare {
                variable: Variable::new("x"),
                value: bin(BinaryOperator::Add, int(1), int(2)),
            }
        );
    }

    #[test]
    fn test_array_declaration() {
        assert_eq!(
            single("let a = [n * 2]"),
            Stmt::ArrayDeclare {
                variable: Variable::new("a"),
                length: bin(BinaryOperator::Multiply, var("n"), int(2)),
            }
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            single("x = x + 1"),
            Stmt::Assign {
                variable: Variable::new("x"),
                value: bin(BinaryOperator::Add, var("x"), int(1)),
            }
        );
    }

    // ──────────────────────────── precedence ───────────────────────────

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expression("2 + 3 * 4"),
            bin(
                BinaryOperator::Add,
                int(2),
                bin(BinaryOperator::Multiply, int(3), int(4))
            )
        );
    }

    #[test]
    fn test_exponent_is_right_associative() {
        assert_eq!(
            expression("2 ^ 3 ^ 2"),
            bin(
                BinaryOperator::Exponent,
                int(2),
                bin(BinaryOperator::Exponent, int(3), int(2))
            )
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        assert_eq!(
            expression("2 - 3 - 4"),
            bin(
                BinaryOperator::Subtract,
                bin(BinaryOperator::Subtract, int(2), int(3)),
                int(4)
            )
        );
    }

    #[test]
    fn test_mixed_precedence_levels() {
        assert_eq!(
            expression("1 + 2 * 3 ^ 2 - 4"),
            bin(
                BinaryOperator::Subtract,
                bin(
                    BinaryOperator::Add,
                    int(1),
                    bin(
                        BinaryOperator::Multiply,
                        int(2),
                        bin(BinaryOperator::Exponent, int(3), int(2))
                    )
                ),
                int(4)
            )
        );
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_eq!(
            expression("a == 1 and b < 2 or not c"),
            bin(
                BinaryOperator::Or,
                bin(
                    BinaryOperator::And,
                    bin(BinaryOperator::Equal, var("a"), int(1)),
                    bin(BinaryOperator::Less, var("b"), int(2))
                ),
                Expr::unary(UnaryOperator::Not, var("c"))
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            expression("(1 + 2) * 3"),
            bin(
                BinaryOperator::Multiply,
                bin(BinaryOperator::Add, int(1), int(2)),
                int(3)
            )
        );
    }

    #[test]
    fn test_prefix_operators() {
        assert_eq!(
            expression("--x"),
            Expr::unary(
                UnaryOperator::Negate,
                Expr::unary(UnaryOperator::Negate, var("x"))
            )
        );

        // Prefix operators bind tighter than any binary operator.
        assert_eq!(
            expression("-2 ^ 2"),
            bin(
                BinaryOperator::Exponent,
                Expr::unary(UnaryOperator::Negate, int(2)),
                int(2)
            )
        );

        assert_eq!(expression("!a"), Expr::unary(UnaryOperator::Not, var("a")));
        assert_eq!(expression("~a"), Expr::unary(UnaryOperator::Invert, var("a")));
    }

    // ───────────────────────────── terms ───────────────────────────────

    #[test]
    fn test_call_with_nested_arguments() {
        assert_eq!(
            expression("f(1, g(x), a[2])"),
            Expr::Term(Term::Call {
                function: Variable::new("f"),
                arguments: vec![
                    int(1),
                    Expr::Term(Term::Call {
                        function: Variable::new("g"),
                        arguments: vec![var("x")],
                    }),
                    Expr::Term(Term::ArrayAccess {
                        qualifier: Variable::new("a"),
                        index: Box::new(int(2)),
                    }),
                ],
            })
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(expression("empty"), Expr::literal(Literal::Empty));
        assert_eq!(expression("true"), Expr::literal(Literal::Boolean(true)));
        assert_eq!(expression("false"), Expr::literal(Literal::Boolean(false)));
        assert_eq!(
            expression("'Kyle'"),
            Expr::literal(Literal::Str("Kyle".into()))
        );
        assert_eq!(
            expression("31/12/2023"),
            Expr::literal(Literal::Date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()))
        );
    }

    #[test]
    fn test_numeric_literal_fallback() {
        assert_eq!(expression("10"), int(10));
        assert_eq!(expression("10.5"), Expr::literal(Literal::Double(10.5)));
        assert_eq!(
            expression("9223372036854775808"),
            Expr::literal(Literal::Double(9223372036854775808.0))
        );
        assert_eq!(expression("9223372036854775807"), int(i64::MAX));
    }

    #[test]
    fn test_malformed_date() {
        assert!(matches!(
            error("let d = 31/02/2023"),
            ParseError::LiteralFormat { ref literal, .. } if literal == "31/02/2023"
        ));
        assert!(matches!(
            error("99/99/2023"),
            ParseError::LiteralFormat { .. }
        ));
    }

    #[test]
    fn test_unspaced_division_chain_is_not_a_date() {
        assert_eq!(
            single("x = 10/2/5"),
            Stmt::Assign {
                variable: Variable::new("x"),
                value: bin(
                    BinaryOperator::Divide,
                    bin(BinaryOperator::Divide, int(10), int(2)),
                    int(5)
                ),
            }
        );
    }

    #[test]
    fn test_date_token_with_wrong_widths() {
        for text in ["31/12/23", "1/2/2023", "31-12-2023", " 1/12/2023"] {
            let mut parser = Parser::new(Replay::new(&[
                (TokenKind::Qualifier, "x"),
                (TokenKind::EqualSign, "="),
                (TokenKind::DateLiteral, text),
            ]));

            assert!(
                matches!(
                    parser.parse(),
                    Err(ParseError::LiteralFormat { ref literal, .. }) if literal == text
                ),
                "{:?} should be rejected",
                text
            );
        }
    }

    // ────────────────── array assignment disambiguation ────────────────

    #[test]
    fn test_array_assignment() {
        assert_eq!(
            single("a[1] = 2"),
            Stmt::ArrayAssign {
                variable: Variable::new("a"),
                index: int(1),
                value: int(2),
            }
        );
    }

    #[test]
    fn test_array_assignment_with_nested_index() {
        assert_eq!(
            single("a[b[0]] = 3"),
            Stmt::ArrayAssign {
                variable: Variable::new("a"),
                index: Expr::Term(Term::ArrayAccess {
                    qualifier: Variable::new("b"),
                    index: Box::new(int(0)),
                }),
                value: int(3),
            }
        );
    }

    #[test]
    fn test_array_access_in_expression() {
        assert_eq!(
            single("a[1] + 1"),
            Stmt::Expression(bin(
                BinaryOperator::Add,
                Expr::Term(Term::ArrayAccess {
                    qualifier: Variable::new("a"),
                    index: Box::new(int(1)),
                }),
                int(1)
            ))
        );
    }

    #[test]
    fn test_unclosed_index_is_syntax_error() {
        assert!(matches!(error("a[1"), ParseError::Syntax { .. }));
    }

    // ─────────────────────────── control flow ──────────────────────────

    #[test]
    fn test_if_else_across_blank_lines_and_comments() {
        let stmt = single("if x > 1 {\n    y = 1\n}\n\n# otherwise\nelse {\n    y = 2\n}\n");

        assert_eq!(
            stmt,
            Stmt::If {
                condition: bin(BinaryOperator::Greater, var("x"), int(1)),
                then_scope: Scope::new(vec![Stmt::Assign {
                    variable: Variable::new("y"),
                    value: int(1),
                }]),
                else_scope: Some(Scope::new(vec![Stmt::Assign {
                    variable: Variable::new("y"),
                    value: int(2),
                }])),
            }
        );
    }

    #[test]
    fn test_else_on_closing_brace_line() {
        match single("if x {\n} else {\n    y = 2\n}") {
            Stmt::If { else_scope, .. } => assert_eq!(else_scope.map(|s| s.len()), Some(1)),
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        let stmts = statements("if x {\n    y = 1\n}\n\n# unrelated\n\nz = 2\n");

        assert_eq!(stmts.len(), 2);
        assert!(matches!(&stmts[0], Stmt::If { else_scope: None, .. }));
        assert!(matches!(&stmts[1], Stmt::Assign { .. }));

        assert!(matches!(single("if x {\n}"), Stmt::If { else_scope: None, .. }));
    }

    #[test]
    fn test_while() {
        assert_eq!(
            single("while i < 10 {\n    i = i + 1\n}"),
            Stmt::While {
                condition: bin(BinaryOperator::Less, var("i"), int(10)),
                body: Scope::new(vec![Stmt::Assign {
                    variable: Variable::new("i"),
                    value: bin(BinaryOperator::Add, var("i"), int(1)),
                }]),
            }
        );
    }

    #[test]
    fn test_function_definition() {
        assert_eq!(
            single("def add(a, b) {\n    return a + b\n}"),
            Stmt::Function {
                name: Variable::new("add"),
                params: vec![Variable::new("a"), Variable::new("b")],
                body: Scope::new(vec![Stmt::Return(Some(bin(
                    BinaryOperator::Add,
                    var("a"),
                    var("b")
                )))]),
            }
        );
    }

    #[test]
    fn test_function_parameter_list_errors() {
        // At least one parameter is required.
        assert!(matches!(error("def f() {\n}"), ParseError::Syntax { .. }));
        assert!(matches!(error("def f(a,) {\n}"), ParseError::Syntax { .. }));
        assert!(matches!(error("def f(, a) {\n}"), ParseError::Syntax { .. }));
        assert!(matches!(error("def f(a b) {\n}"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_bare_return() {
        let stmt = single("def f(a) {\n    return\n    return # early\n}");

        match stmt {
            Stmt::Function { body, .. } => {
                assert_eq!(body.statements(), &[Stmt::Return(None), Stmt::Return(None)]);
            }
            other => panic!("Expected function, got {:?}", other),
        }

        assert_eq!(single("return"), Stmt::Return(None));
    }

    #[test]
    fn test_standalone_scope() {
        assert_eq!(
            single("{\n    let x = 1\n}"),
            Stmt::Scope(Scope::new(vec![Stmt::Declare {
                variable: Variable::new("x"),
                value: int(1),
            }]))
        );
    }

    // ─────────────────────────── termination ───────────────────────────

    #[test]
    fn test_missing_terminator() {
        assert!(matches!(
            error("let x = 1 let y = 2"),
            ParseError::Syntax { ref found, .. } if found == "'let'"
        ));
    }

    #[test]
    fn test_closing_brace_does_not_terminate_statement() {
        assert!(matches!(error("{ x = 1 }"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_terminators() {
        assert_eq!(statements("let x = 1; let y = 2;").len(), 2);
        assert_eq!(statements("let x = 1 # one\nlet y = 2").len(), 2);
        assert_eq!(statements("let x = 1\n\n\nlet y = 2\n").len(), 2);
    }

    #[test]
    fn test_empty_program() {
        assert!(scrawl::parse("").unwrap().is_empty());
        assert!(scrawl::parse("\n\n# only comments\n;;\n").unwrap().is_empty());
    }

    // ───────────────────────────── errors ──────────────────────────────

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            error("(1 + 2"),
            ParseError::syntax("Expected ')'", "end of input")
        );
        assert_eq!(
            error("1 +"),
            ParseError::syntax("Expected expression after '+'", "end of input")
        );
        assert_eq!(error("let x 1"), ParseError::syntax("Expected '='", "'1'"));
        assert!(matches!(error("let = 1"), ParseError::Syntax { .. }));
        assert!(matches!(error("f()"), ParseError::Syntax { .. }));
        assert!(matches!(error("-"), ParseError::Syntax { .. }));
        assert!(matches!(error("if x y"), ParseError::Syntax { .. }));
        assert_eq!(
            error("while x {\n"),
            ParseError::syntax("Expected '}'", "end of input")
        );
    }

    #[test]
    fn test_incomplete_statements() {
        assert!(matches!(error(")"), ParseError::IncompleteStatement { .. }));
        assert!(matches!(error("else"), ParseError::IncompleteStatement { .. }));
        assert!(matches!(error("let x = )"), ParseError::IncompleteStatement { .. }));
        assert!(matches!(error("x ="), ParseError::IncompleteStatement { .. }));
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(error("}"), ParseError::trailing("'}'"));
        assert!(matches!(
            error("x = 1\n}\n"),
            ParseError::UnexpectedTrailingInput { .. }
        ));
    }

    #[test]
    fn test_lex_errors_propagate() {
        assert!(matches!(error("let x = $"), ParseError::Lex { line: 1, .. }));
    }

    #[test]
    fn test_reserved_operator_is_unsupported() {
        let mut parser = Parser::new(Replay::new(&[
            (TokenKind::Qualifier, "a"),
            (TokenKind::ShiftLeft, "<<"),
            (TokenKind::Qualifier, "b"),
        ]));

        assert_eq!(parser.parse(), Err(ParseError::unsupported("<<")));
    }

    #[test]
    fn test_reserved_xor_is_unsupported() {
        let mut parser = Parser::new(Replay::new(&[
            (TokenKind::Qualifier, "a"),
            (TokenKind::Xor, "^^"),
            (TokenKind::Qualifier, "b"),
        ]));

        assert_eq!(parser.parse(), Err(ParseError::unsupported("^^")));
    }

    #[test]
    fn test_qualifier_must_not_start_with_digit() {
        let mut parser = Parser::new(Replay::new(&[
            (TokenKind::Qualifier, "1abc"),
            (TokenKind::EqualSign, "="),
            (TokenKind::NumberLiteral, "1"),
        ]));

        assert!(matches!(parser.parse(), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_parse_twice_builds_equal_trees() {
        let mut parser = Parser::from_source("let x = 1\nwhile x < 3 {\n    x = x + 1\n}\n");

        let first = parser.parse().unwrap();
        let second = parser.parse().unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
