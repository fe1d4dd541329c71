//! End-to-end pipeline scenarios, one file per scenario group. Assembling
//! and running the emitted code is out of scope here, so these assert
//! against the pipeline's structured output instead of an executed binary.
use exprc::ast::{ExprKind, Literal};
use exprc::ir::IrInstruction;
use exprc::CompileError;

fn compile(source: &str) -> exprc::CompileOutput {
    exprc::compile(source, "test.ez").expect("expected a successful compilation")
}

#[test]
fn scenario_1_integer_literal() {
    let output = compile("42");
    assert!(matches!(output.ast.kind, ExprKind::Literal(Literal::Int(42))));
    assert!(output.asm.contains("call print_int"));
}

#[test]
fn scenario_2_precedence() {
    let output = compile("1 + 2 * 3");
    match &output.ast.kind {
        ExprKind::BinaryOp { left, op, right } => {
            assert_eq!(op.to_string(), "+");
            assert!(matches!(left.kind, ExprKind::Literal(Literal::Int(1))));
            assert!(matches!(right.kind, ExprKind::BinaryOp { .. }));
        }
        other => panic!("expected a top-level '+', got {other:?}"),
    }
    // 1 + 2 * 3 is never folded to a single `7`; IR just carries two Call
    // instructions chained through fresh variables.
    let call_count = output
        .ir
        .iter()
        .filter(|i| matches!(i, IrInstruction::Call { .. }))
        .count();
    assert_eq!(call_count, 3); // *, +, print_int
}

#[test]
fn scenario_3_if_else() {
    let output = compile("if true then 1 else 2");
    match &output.ast.kind {
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            assert!(matches!(condition.kind, ExprKind::Literal(Literal::Bool(true))));
            assert!(matches!(then_branch.kind, ExprKind::Literal(Literal::Int(1))));
            assert!(matches!(
                else_branch.as_ref().unwrap().kind,
                ExprKind::Literal(Literal::Int(2))
            ));
        }
        other => panic!("expected an If, got {other:?}"),
    }
    assert!(output.asm.contains("call print_int"));
}

#[test]
fn scenario_4_var_declaration_and_reassignment() {
    let output = compile("{ var x = 10; x = x + 1; x }");
    match &output.ast.kind {
        ExprKind::Block {
            expressions,
            result_expression,
        } => {
            assert_eq!(expressions.len(), 2);
            assert!(matches!(expressions[0].kind, ExprKind::VarDeclaration { .. }));
            assert!(matches!(
                expressions[1].kind,
                ExprKind::BinaryOp { .. } // `x = x + 1`
            ));
            assert!(matches!(
                result_expression.as_ref().unwrap().kind,
                ExprKind::Identifier(_)
            ));
        }
        other => panic!("expected a Block, got {other:?}"),
    }
    assert!(output.asm.contains("call print_int"));
}

#[test]
fn scenario_5_while_loop() {
    let output = compile("{ var x = 0; while x < 3 do { x = x + 1 }; x }");
    let label_names: Vec<&str> = output
        .ir
        .iter()
        .filter_map(|i| match i {
            IrInstruction::Label { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(label_names, vec!["while_start1", "while_body1", "while_end1"]);
    assert!(output.asm.contains("call print_int"));
}

#[test]
fn scenario_6_double_negation() {
    let output = compile("not not true");
    match &output.ast.kind {
        ExprKind::UnaryOp { op, operand } => {
            assert_eq!(op.to_string(), "not");
            assert!(matches!(operand.kind, ExprKind::UnaryOp { .. }));
        }
        other => panic!("expected a UnaryOp, got {other:?}"),
    }
    assert!(output.asm.contains("call print_bool"));
}

#[test]
fn var_declaration_at_top_level_is_a_parse_error() {
    let err = exprc::compile("var x = 1", "test.ez").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
}

#[test]
fn mismatched_if_branch_types_is_a_type_error() {
    let err = exprc::compile("if true then 1 else false", "test.ez").unwrap_err();
    assert!(matches!(err, CompileError::Type(_)));
}

#[test]
fn arity_mismatch_on_a_builtin_is_a_type_error() {
    let err = exprc::compile("print_int(1, 2)", "test.ez").unwrap_err();
    assert!(matches!(err, CompileError::Type(_)));
}
