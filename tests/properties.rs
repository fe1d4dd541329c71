//! Universal properties from the testable-properties list, each checked as
//! its own integration test rather than folded into the scenario tests.
use exprc::ir::IrInstruction;

fn compile(source: &str) -> exprc::CompileOutput {
    exprc::compile(source, "test.ez").expect("expected a successful compilation")
}

#[test]
fn equal_precedence_operators_left_associate_except_assign() {
    let output = compile("10 - 3 - 2");
    // left-associative: (10 - 3) - 2, never 10 - (3 - 2)
    let subs = output
        .ir
        .iter()
        .filter(|i| matches!(i, IrInstruction::Call{ fun, .. } if fun.0 == "-"))
        .count();
    assert_eq!(subs, 2);

    let output = compile("a = b = c");
    assert!(output.ast.ty.is_some());
}

#[test]
fn ir_label_closure_every_jump_target_has_exactly_one_label() {
    let output = compile("{ if true then 1 else 2; if false then 3 else 4; while false do {}; 0 }");
    let defined: Vec<&str> = output
        .ir
        .iter()
        .filter_map(|i| match i {
            IrInstruction::Label { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let mut targets = Vec::new();
    for instruction in &output.ir {
        match instruction {
            IrInstruction::Jump { label, .. } => targets.push(label.as_str()),
            IrInstruction::CondJump {
                then_label,
                else_label,
                ..
            } => {
                targets.push(then_label.as_str());
                targets.push(else_label.as_str());
            }
            _ => {}
        }
    }
    for target in targets {
        assert_eq!(defined.iter().filter(|l| **l == target).count(), 1, "{target}");
    }
}

#[test]
fn assembler_preamble_and_epilogue_are_fixed() {
    let output = compile("1 + 2");
    assert!(output.asm.starts_with(".extern print_int"));
    assert!(output.asm.contains(".extern print_bool"));
    assert!(output.asm.contains(".extern read_int"));
    assert!(output.asm.contains(".global main"));
    assert!(output.asm.contains("main:"));
    assert!(output.asm.trim_end().ends_with("ret"));
}

#[test]
fn print_suffix_matches_root_type() {
    let int_output = compile("1 + 2");
    assert_eq!(int_output.asm.matches("call print_int").count(), 1);
    assert_eq!(int_output.asm.matches("call print_bool").count(), 0);

    let bool_output = compile("1 < 2");
    assert_eq!(bool_output.asm.matches("call print_bool").count(), 1);
    assert_eq!(bool_output.asm.matches("call print_int").count(), 0);

    let unit_output = compile("{ var x = 1; }");
    assert_eq!(unit_output.asm.matches("call print_int").count(), 0);
    assert_eq!(unit_output.asm.matches("call print_bool").count(), 0);
}

#[test]
fn stack_reservation_matches_unique_ir_variable_count() {
    let output = compile("1 + 2");
    let unique_vars: std::collections::HashSet<String> = output
        .ir
        .iter()
        .flat_map(|i| match i {
            IrInstruction::LoadIntConst { dest, .. } => vec![dest.0.clone()],
            IrInstruction::LoadBoolConst { dest, .. } => vec![dest.0.clone()],
            IrInstruction::Copy { source, dest, .. } => vec![source.0.clone(), dest.0.clone()],
            IrInstruction::Call {
                fun, args, dest, ..
            } => {
                let mut v = vec![fun.0.clone()];
                v.extend(args.iter().map(|a| a.0.clone()));
                v.push(dest.0.clone());
                v
            }
            _ => vec![],
        })
        .collect();
    let expected_bytes = unique_vars.len() * 8;
    assert!(output.asm.contains(&format!("subq ${expected_bytes}, %rsp")));
}
