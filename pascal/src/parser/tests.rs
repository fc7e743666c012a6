//! Parser tests

use crate::ast::{BinOp, Decl, Expr, Number, Program, RelOp, Span, Stmt, UnOp, VarType};
use crate::error::ParseError;
use crate::parser::parse;

fn parse_ok(source: &str) -> Program {
    parse(source).expect("Parse should succeed")
}

/// Wrap statements in a minimal program and return the main compound's statements
fn parse_body(body: &str) -> Vec<Stmt> {
    let source = format!("PROGRAM Test; BEGIN {body} END.");
    parse_ok(&source)
        .block
        .compound
        .statements
        .into_iter()
        .map(|s| s.node)
        .collect()
}

/// Parse `x := <expr>` and return the expression
fn parse_expr(expr: &str) -> Expr {
    match parse_body(&format!("x := {expr}")).remove(0) {
        Stmt::Assign { value, .. } => value.node,
        other => panic!("expected assignment, got {other:?}"),
    }
}

fn int(n: i64) -> Expr {
    Expr::Number(Number::Integer(n))
}

// ============================================
// Program structure
// ============================================

#[test]
fn test_parse_minimal_program() {
    let prog = parse_ok("PROGRAM Empty; BEGIN END.");
    assert_eq!(prog.name.node, "Empty");
    assert!(prog.block.declarations.is_empty());
    assert_eq!(prog.block.compound.statements.len(), 1);
    assert_eq!(prog.block.compound.statements[0].node, Stmt::NoOp);
}

#[test]
fn test_parse_var_section_expands_ident_lists() {
    let prog = parse_ok(
        "PROGRAM Part10AST;
         VAR
            a, b : INTEGER;
            y    : REAL;
         BEGIN END.",
    );
    let vars: Vec<(String, VarType)> = prog
        .block
        .declarations
        .iter()
        .map(|d| match d {
            Decl::Var(v) => (v.name.node.clone(), v.ty),
            Decl::Routine(r) => panic!("unexpected routine {}", r.name.node),
        })
        .collect();
    assert_eq!(
        vars,
        vec![
            ("a".to_string(), VarType::Integer),
            ("b".to_string(), VarType::Integer),
            ("y".to_string(), VarType::Real),
        ]
    );
}

#[test]
fn test_parse_procedure_without_params() {
    let prog = parse_ok(
        "program Main;
         var x, y: real;
         procedure Alpha();
         var a: integer;
         begin
            a := 2;
            x := y + a;
         end;
         begin
            y := 5;
            Alpha();
         end.",
    );
    let routine = match &prog.block.declarations[2] {
        Decl::Routine(r) => r,
        other => panic!("expected routine, got {other:?}"),
    };
    assert_eq!(routine.name.node, "Alpha");
    assert!(routine.params.is_empty());
    assert!(!routine.is_function());
    assert_eq!(routine.block.declarations.len(), 1);
}

#[test]
fn test_parse_function_with_param_groups() {
    let prog = parse_ok(
        "program Main;
         function Mix(a, b: Integer; c: Real): Real;
         begin
            Mix := a + b + c
         end;
         begin end.",
    );
    let Decl::Routine(routine) = &prog.block.declarations[0] else {
        panic!("expected routine");
    };
    assert_eq!(routine.ret_ty, Some(VarType::Real));
    let params: Vec<_> = routine
        .params
        .iter()
        .map(|p| (p.name.node.as_str(), p.ty))
        .collect();
    assert_eq!(
        params,
        vec![("a", VarType::Integer), ("b", VarType::Integer), ("c", VarType::Real)]
    );
}

#[test]
fn test_parse_nested_routine() {
    let prog = parse_ok(
        "program Main;
         procedure Outer;
            procedure Inner; begin end;
         begin Inner end;
         begin Outer end.",
    );
    let Decl::Routine(outer) = &prog.block.declarations[0] else {
        panic!("expected routine");
    };
    assert!(matches!(&outer.block.declarations[0], Decl::Routine(inner) if inner.name.node == "Inner"));
}

#[test]
fn test_routine_span_covers_declaration() {
    let source = "program P; procedure A; begin end; begin end.";
    let prog = parse_ok(source);
    let Decl::Routine(routine) = &prog.block.declarations[0] else {
        panic!("expected routine");
    };
    assert_eq!(&source[routine.span.start..routine.span.end], "procedure A; begin end");
}

// ============================================
// Statements
// ============================================

#[test]
fn test_parse_trailing_semicolon_yields_noop() {
    let stmts = parse_body("x := 11;");
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], Stmt::Assign { .. }));
    assert_eq!(stmts[1], Stmt::NoOp);
}

#[test]
fn test_parse_nested_compound() {
    let stmts = parse_body("BEGIN a := 1; b := 2 END; c := 3");
    match &stmts[0] {
        Stmt::Compound(inner) => assert_eq!(inner.statements.len(), 2),
        other => panic!("expected compound, got {other:?}"),
    }
}

#[test]
fn test_parse_call_forms() {
    let stmts = parse_body("Alpha(); Beta(1, x + 2); Gamma");
    let calls: Vec<(&str, usize)> = stmts
        .iter()
        .map(|s| match s {
            Stmt::Call(call) => (call.name.node.as_str(), call.args.len()),
            other => panic!("expected call, got {other:?}"),
        })
        .collect();
    assert_eq!(calls, vec![("Alpha", 0), ("Beta", 2), ("Gamma", 0)]);
}

#[test]
fn test_parse_if_else() {
    let stmts = parse_body("if n > 1 then f := n else f := 1");
    match &stmts[0] {
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            assert!(matches!(cond.node, Expr::Relational { op: RelOp::Gt, .. }));
            assert!(matches!(then_branch.node, Stmt::Assign { .. }));
            assert!(else_branch.is_some());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_parse_dangling_else_binds_to_inner_if() {
    let stmts = parse_body("if a = 1 then if b = 2 then x := 1 else x := 2");
    let Stmt::If {
        then_branch,
        else_branch,
        ..
    } = &stmts[0]
    else {
        panic!("expected if");
    };
    assert!(else_branch.is_none());
    assert!(matches!(
        &then_branch.node,
        Stmt::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn test_parse_repeat_until() {
    let stmts = parse_body("repeat x := x + 1; y := x until x = 6");
    match &stmts[0] {
        Stmt::Repeat { body, cond } => {
            assert_eq!(body.statements.len(), 2);
            assert!(matches!(cond.node, Expr::Relational { op: RelOp::Eq, .. }));
        }
        other => panic!("expected repeat, got {other:?}"),
    }
}

// ============================================
// Expressions
// ============================================

#[test]
fn test_mul_binds_tighter_than_add() {
    // 10 * a + 10 * a DIV 4  ==  (10 * a) + ((10 * a) DIV 4)
    let expr = parse_expr("10 * a + 10 * a DIV 4");
    let Expr::Binary { left, op, right } = expr else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(left.node, Expr::Binary { op: BinOp::Mul, .. }));
    assert!(matches!(right.node, Expr::Binary { op: BinOp::IntDiv, .. }));
}

#[test]
fn test_binary_operators_are_left_associative() {
    let Expr::Binary { left, op, right } = parse_expr("8 - 4 - 2") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Sub);
    assert_eq!(right.node, int(2));
    assert!(matches!(left.node, Expr::Binary { op: BinOp::Sub, .. }));
}

#[test]
fn test_unary_minus_binds_tighter_than_mul() {
    let Expr::Binary { left, op, .. } = parse_expr("-a * 2") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(left.node, Expr::Unary { op: UnOp::Minus, .. }));
}

#[test]
fn test_double_negation() {
    // a - - b
    let Expr::Binary { op, right, .. } = parse_expr("a - - b") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Sub);
    assert!(matches!(right.node, Expr::Unary { op: UnOp::Minus, .. }));
}

#[test]
fn test_parentheses_override_precedence() {
    let Expr::Binary { left, op, .. } = parse_expr("(1 + 2) * 3") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(left.node, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn test_real_and_float_div() {
    let Expr::Binary { left, op, right } = parse_expr("20 / 7 + 3.14") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(left.node, Expr::Binary { op: BinOp::FloatDiv, .. }));
    assert_eq!(right.node, Expr::Number(Number::Real(3.14)));
}

#[test]
fn test_function_call_in_expression() {
    let Expr::Binary { right, .. } = parse_expr("number * Factorial(number - 1)") else {
        panic!("expected binary");
    };
    match right.node {
        Expr::Call(call) => {
            assert_eq!(call.name.node, "Factorial");
            assert_eq!(call.args.len(), 1);
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_string_literal_argument() {
    let stmts = parse_body("writeln('done')");
    let Stmt::Call(call) = &stmts[0] else {
        panic!("expected call");
    };
    assert_eq!(call.args[0].node, Expr::Str("done".to_string()));
}

// ============================================
// Errors
// ============================================

#[test]
fn test_missing_final_dot() {
    let source = "PROGRAM P; BEGIN END";
    let err = parse(source).unwrap_err();
    assert_eq!(
        err,
        ParseError::syntax("`.`", "end of input", Span::point(source.len()))
    );
}

#[test]
fn test_missing_semicolon_between_statements() {
    let err = parse("PROGRAM P; BEGIN a := 1 b := 2 END.").unwrap_err();
    match err {
        ParseError::Syntax {
            expected, found, ..
        } => {
            assert_eq!(expected, "`END`");
            assert_eq!(found, "identifier `b`");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_condition_requires_relational_operator() {
    let err = parse("PROGRAM P; BEGIN if a then x := 1 END.").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref expected, .. } if expected == "relational operator"));
}

#[test]
fn test_unknown_type_name() {
    let err = parse("PROGRAM P; VAR a: BOOLEAN; BEGIN END.").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref expected, .. } if expected == "type name"));
}

#[test]
fn test_function_requires_return_type() {
    assert!(parse("PROGRAM P; FUNCTION F; BEGIN END; BEGIN END.").is_err());
}

#[test]
fn test_trailing_tokens_after_program() {
    let err = parse("PROGRAM P; BEGIN END. x").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { ref expected, .. } if expected == "end of input"));
}

#[test]
fn test_lexical_error_surfaces_from_parse() {
    let err = parse("PROGRAM P; BEGIN x := 1 % 2 END.").unwrap_err();
    assert!(matches!(err, ParseError::Lexical { ch: '%', .. }));
}

#[test]
fn test_parse_is_deterministic() {
    let source = "PROGRAM P; VAR a: INTEGER; BEGIN a := 2 END.";
    assert_eq!(parse_ok(source), parse_ok(source));
}

// ============================================
// Deep nesting
// ============================================

#[test]
fn test_deeply_nested_parentheses() {
    let depth = 5000;
    let expr = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_expr(&expr), int(1));
}

#[test]
fn test_deeply_nested_begin_blocks() {
    let depth = 1000;
    let body = format!("{}x := 1{}", "BEGIN ".repeat(depth), " END".repeat(depth));
    let mut stmt = parse_body(&body).remove(0);
    let mut levels = 0;
    while let Stmt::Compound(mut inner) = stmt {
        levels += 1;
        stmt = inner.statements.remove(0).node;
    }
    assert_eq!(levels, depth);
    assert!(matches!(stmt, Stmt::Assign { .. }));
}

#[test]
fn test_deeply_nested_if_statements() {
    let depth = 1000;
    let body = format!("{}x := 1", "IF 1 < 2 THEN ".repeat(depth));
    let mut stmt = parse_body(&body).remove(0);
    let mut levels = 0;
    while let Stmt::If { then_branch, .. } = stmt {
        levels += 1;
        stmt = then_branch.node;
    }
    assert_eq!(levels, depth);
}
