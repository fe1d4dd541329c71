use std::collections::HashMap;

use crate::ast::{BinOp, Expr, ExprKind, Literal, Type, UnOp};
use crate::source_location::SourceLocation;
use crate::symtable::SymTable;

use super::builtins::{operator_return_type, predefined_bindings};
use super::error::{IrError, IrResult};
use super::{IrInstruction, IrVar};

type Scope = SymTable<IrVar>;

/// Walks a type-checked AST and produces a flat IR instruction list. Owns its
/// own counters rather than reaching for process-wide state, so independent
/// `compile()` calls never share mutable state.
struct IrGenerator {
    instructions: Vec<IrInstruction>,
    var_counter: usize,
    label_counters: HashMap<String, usize>,
    var_unit: IrVar,
    /// Result type of each allocated variable. A non-short-circuit binary
    /// operator's result variable carries the operator's own
    /// `FunType.return_type`, never the AST node's own resolved type.
    types: HashMap<IrVar, Type>,
}

/// Lower a type-checked AST to IR. `root` must already have every node's
/// `ty` populated by [`crate::typechecker::check`].
pub fn generate(root: &Expr) -> IrResult<Vec<IrInstruction>> {
    let mut gen = IrGenerator {
        instructions: Vec::new(),
        var_counter: 0,
        label_counters: HashMap::new(),
        var_unit: IrVar::new("unit"),
        types: HashMap::new(),
    };

    let scope = Scope::root();
    for (name, ty) in predefined_bindings() {
        scope.define(name, IrVar::new(name));
        gen.types.insert(IrVar::new(name), ty);
    }

    let result = gen.visit(root, &scope)?;
    match root.ty() {
        Type::Int => gen.emit_print("print_int", result, root.location.clone()),
        Type::Bool => gen.emit_print("print_bool", result, root.location.clone()),
        Type::Unit => {}
        other => unreachable!("program result type {other} cannot reach top level"),
    }
    Ok(gen.instructions)
}

impl IrGenerator {
    fn emit(&mut self, instruction: IrInstruction) {
        self.instructions.push(instruction);
    }

    fn emit_print(&mut self, builtin: &str, arg: IrVar, location: SourceLocation) {
        let fun = IrVar::new(builtin);
        let dest = self.new_var();
        self.emit(IrInstruction::Call {
            location,
            fun,
            args: vec![arg],
            dest,
        });
    }

    fn new_var(&mut self) -> IrVar {
        self.var_counter += 1;
        IrVar::new(format!("x{}", self.var_counter))
    }

    fn new_var_of(&mut self, ty: Type) -> IrVar {
        let var = self.new_var();
        self.types.insert(var.clone(), ty);
        var
    }

    fn new_label(&mut self, prefix: &str) -> String {
        let count = self.label_counters.entry(prefix.to_owned()).or_insert(0);
        *count += 1;
        format!("{prefix}{}", *count)
    }

    fn visit(&mut self, expr: &Expr, scope: &Scope) -> IrResult<IrVar> {
        let loc = expr.location.clone();
        match &expr.kind {
            ExprKind::Literal(Literal::Int(value)) => {
                let dest = self.new_var_of(Type::Int);
                self.emit(IrInstruction::LoadIntConst {
                    location: loc,
                    value: *value,
                    dest: dest.clone(),
                });
                Ok(dest)
            }
            ExprKind::Literal(Literal::Bool(value)) => {
                let dest = self.new_var_of(Type::Bool);
                self.emit(IrInstruction::LoadBoolConst {
                    location: loc,
                    value: *value,
                    dest: dest.clone(),
                });
                Ok(dest)
            }
            ExprKind::Literal(Literal::Unit) => Ok(self.var_unit.clone()),

            ExprKind::Identifier(name) => scope
                .lookup(name)
                .ok_or_else(|| IrError::new(format!("unresolved name '{name}'"), loc)),

            ExprKind::BinaryOp {
                left,
                op: BinOp::And,
                right,
            } => self.lower_short_circuit("and", left, right, scope, loc, true),
            ExprKind::BinaryOp {
                left,
                op: BinOp::Or,
                right,
            } => self.lower_short_circuit("or", left, right, scope, loc, false),

            ExprKind::BinaryOp {
                left,
                op: BinOp::Assign,
                right,
            } => {
                let name = match &left.kind {
                    ExprKind::Identifier(name) => name.clone(),
                    _ => {
                        return Err(IrError::new(
                            "assignment target must be an identifier",
                            loc,
                        ))
                    }
                };
                let lhs_var = scope
                    .lookup(&name)
                    .ok_or_else(|| IrError::new(format!("unresolved name '{name}'"), loc.clone()))?;
                let rhs_var = self.visit(right, scope)?;
                self.emit(IrInstruction::Copy {
                    location: loc,
                    source: rhs_var,
                    dest: lhs_var.clone(),
                });
                Ok(lhs_var)
            }

            ExprKind::BinaryOp { left, op, right } => {
                let op_name = op.to_string();
                let var_op = match op {
                    BinOp::Eq | BinOp::NotEq => IrVar::new(op_name.clone()),
                    _ => scope.lookup(&op_name).ok_or_else(|| {
                        IrError::new(format!("unresolved operator '{op_name}'"), loc.clone())
                    })?,
                };
                let var_left = self.visit(left, scope)?;
                let var_right = self.visit(right, scope)?;
                // Typed from the operator's own return type, not from
                // `expr.ty()`.
                let var_result = self.new_var_of(operator_return_type(&op_name));
                self.emit(IrInstruction::Call {
                    location: loc,
                    fun: var_op,
                    args: vec![var_left, var_right],
                    dest: var_result.clone(),
                });
                Ok(var_result)
            }

            ExprKind::UnaryOp { op, operand } => {
                let op_name = op.ir_name();
                let var_op = scope.lookup(op_name).ok_or_else(|| {
                    IrError::new(format!("unresolved operator '{op_name}'"), loc.clone())
                })?;
                let var_value = self.visit(operand, scope)?;
                let var_result = self.new_var_of(operator_return_type(op_name));
                self.emit(IrInstruction::Call {
                    location: loc,
                    fun: var_op,
                    args: vec![var_value],
                    dest: var_result.clone(),
                });
                Ok(var_result)
            }

            ExprKind::If {
                condition,
                then_branch,
                else_branch: None,
            } => {
                let l_then = self.new_label("then");
                let l_end = self.new_label("if_end");
                let var_cond = self.visit(condition, scope)?;
                self.emit(IrInstruction::CondJump {
                    location: loc.clone(),
                    cond: var_cond,
                    then_label: l_then.clone(),
                    else_label: l_end.clone(),
                });
                self.emit(IrInstruction::Label {
                    location: loc.clone(),
                    name: l_then,
                });
                self.visit(then_branch, scope)?;
                self.emit(IrInstruction::Label {
                    location: loc,
                    name: l_end,
                });
                Ok(self.var_unit.clone())
            }

            ExprKind::If {
                condition,
                then_branch,
                else_branch: Some(else_branch),
            } => {
                let l_then = self.new_label("then");
                let l_else = self.new_label("else");
                let l_end = self.new_label("if_end");
                let var_cond = self.visit(condition, scope)?;
                self.emit(IrInstruction::CondJump {
                    location: loc.clone(),
                    cond: var_cond,
                    then_label: l_then.clone(),
                    else_label: l_else.clone(),
                });
                self.emit(IrInstruction::Label {
                    location: loc.clone(),
                    name: l_then,
                });
                let var_then = self.visit(then_branch, scope)?;
                // Allocated after the then-branch has been visited, using the
                // shared branch type the type checker already proved equal,
                // rather than before visiting it.
                let var_result = self.new_var_of(expr.ty().clone());
                self.emit(IrInstruction::Copy {
                    location: loc.clone(),
                    source: var_then,
                    dest: var_result.clone(),
                });
                self.emit(IrInstruction::Jump {
                    location: loc.clone(),
                    label: l_end.clone(),
                });
                self.emit(IrInstruction::Label {
                    location: loc.clone(),
                    name: l_else,
                });
                let var_else = self.visit(else_branch, scope)?;
                self.emit(IrInstruction::Copy {
                    location: loc.clone(),
                    source: var_else,
                    dest: var_result.clone(),
                });
                self.emit(IrInstruction::Label {
                    location: loc,
                    name: l_end,
                });
                Ok(var_result)
            }

            ExprKind::Block {
                expressions,
                result_expression,
            } => {
                let mut last = self.var_unit.clone();
                for item in expressions {
                    last = self.visit(item, scope)?;
                }
                if let Some(result) = result_expression {
                    last = self.visit(result, scope)?;
                }
                Ok(last)
            }

            ExprKind::While { condition, body } => {
                let l_start = self.new_label("while_start");
                let l_body = self.new_label("while_body");
                let l_end = self.new_label("while_end");
                self.emit(IrInstruction::Label {
                    location: loc.clone(),
                    name: l_start.clone(),
                });
                let var_cond = self.visit(condition, scope)?;
                self.emit(IrInstruction::CondJump {
                    location: loc.clone(),
                    cond: var_cond,
                    then_label: l_body.clone(),
                    else_label: l_end.clone(),
                });
                self.emit(IrInstruction::Label {
                    location: loc.clone(),
                    name: l_body,
                });
                self.visit(body, scope)?;
                self.emit(IrInstruction::Jump {
                    location: loc.clone(),
                    label: l_start,
                });
                self.emit(IrInstruction::Label {
                    location: loc,
                    name: l_end,
                });
                Ok(self.var_unit.clone())
            }

            ExprKind::VarDeclaration { name, value } => {
                let var_init = self.visit(value, scope)?;
                let var_ir = self.new_var_of(value.ty().clone());
                scope.define(name.clone(), var_ir.clone());
                self.emit(IrInstruction::Copy {
                    location: loc,
                    source: var_init,
                    dest: var_ir.clone(),
                });
                Ok(var_ir)
            }

            ExprKind::FunctionCall { name, arguments } => {
                let mut arg_vars = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    arg_vars.push(self.visit(arg, scope)?);
                }
                let fun_var = scope
                    .lookup(name)
                    .ok_or_else(|| IrError::new(format!("unresolved function '{name}'"), loc.clone()))?;
                let var_result = self.new_var_of(expr.ty().clone());
                self.emit(IrInstruction::Call {
                    location: loc,
                    fun: fun_var,
                    args: arg_vars,
                    dest: var_result.clone(),
                });
                Ok(var_result)
            }
        }
    }

    /// Short-circuit lowering for `and`/`or`: evaluate the left operand,
    /// branch without evaluating the right operand unless needed, otherwise
    /// fall through to the short-circuit constant.
    #[allow(clippy::too_many_arguments)]
    fn lower_short_circuit(
        &mut self,
        op_text: &str,
        left: &Expr,
        right: &Expr,
        scope: &Scope,
        loc: SourceLocation,
        is_and: bool,
    ) -> IrResult<IrVar> {
        let l_right = self.new_label(&format!("{op_text}_right"));
        let l_skip = self.new_label(&format!("{op_text}_skip"));
        let l_end = self.new_label(&format!("{op_text}_end"));
        let var_result = self.new_var_of(Type::Bool);

        let var_left = self.visit(left, scope)?;
        if is_and {
            self.emit(IrInstruction::CondJump {
                location: loc.clone(),
                cond: var_left,
                then_label: l_right.clone(),
                else_label: l_skip.clone(),
            });
        } else {
            self.emit(IrInstruction::CondJump {
                location: loc.clone(),
                cond: var_left,
                then_label: l_skip.clone(),
                else_label: l_right.clone(),
            });
        }

        self.emit(IrInstruction::Label {
            location: loc.clone(),
            name: l_right,
        });
        let var_right = self.visit(right, scope)?;
        self.emit(IrInstruction::Copy {
            location: loc.clone(),
            source: var_right,
            dest: var_result.clone(),
        });
        self.emit(IrInstruction::Jump {
            location: loc.clone(),
            label: l_end.clone(),
        });

        self.emit(IrInstruction::Label {
            location: loc.clone(),
            name: l_skip,
        });
        self.emit(IrInstruction::LoadBoolConst {
            location: loc.clone(),
            value: !is_and,
            dest: var_result.clone(),
        });
        self.emit(IrInstruction::Jump {
            location: loc.clone(),
            label: l_end.clone(),
        });

        self.emit(IrInstruction::Label {
            location: loc,
            name: l_end,
        });
        Ok(var_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use crate::lexer::tokenize;
    use crate::typechecker::check;

    fn generate_str(source: &str) -> Vec<IrInstruction> {
        let mut expr = parse(tokenize(source, "t.ez"), "t.ez").unwrap();
        check(&mut expr).unwrap();
        generate(&expr).unwrap()
    }

    fn labels(ir: &[IrInstruction]) -> Vec<String> {
        ir.iter()
            .filter_map(|i| match i {
                IrInstruction::Label { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn jump_targets(ir: &[IrInstruction]) -> Vec<String> {
        ir.iter()
            .flat_map(|i| match i {
                IrInstruction::Jump { label, .. } => vec![label.clone()],
                IrInstruction::CondJump {
                    then_label,
                    else_label,
                    ..
                } => vec![then_label.clone(), else_label.clone()],
                _ => vec![],
            })
            .collect()
    }

    /// Every jump target must resolve to exactly one Label in the program.
    fn assert_label_closure(ir: &[IrInstruction]) {
        let defined = labels(ir);
        for target in jump_targets(ir) {
            let count = defined.iter().filter(|l| **l == target).count();
            assert_eq!(count, 1, "label '{target}' defined {count} times, expected 1");
        }
    }

    #[test]
    fn int_literal_lowers_to_load_and_print_int_call() {
        let ir = generate_str("42");
        assert!(matches!(ir[0], IrInstruction::LoadIntConst { value: 42, .. }));
        let last = ir.last().unwrap();
        match last {
            IrInstruction::Call { fun, args, .. } => {
                assert_eq!(fun.0, "print_int");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected trailing print_int call, got {other:?}"),
        }
    }

    #[test]
    fn bool_literal_lowers_to_print_bool_call() {
        let ir = generate_str("true");
        let last = ir.last().unwrap();
        match last {
            IrInstruction::Call { fun, .. } => assert_eq!(fun.0, "print_bool"),
            other => panic!("expected trailing print_bool call, got {other:?}"),
        }
    }

    #[test]
    fn unit_result_emits_no_trailing_print_call() {
        let ir = generate_str("{ var x = 1; }");
        assert!(!ir
            .iter()
            .any(|i| matches!(i, IrInstruction::Call { fun, .. } if fun.0.starts_with("print"))));
    }

    #[test]
    fn binary_op_lowers_to_two_arg_call() {
        let ir = generate_str("1 + 2");
        let call = ir
            .iter()
            .find(|i| matches!(i, IrInstruction::Call { fun, .. } if fun.0 == "+"))
            .unwrap();
        match call {
            IrInstruction::Call { args, .. } => assert_eq!(args.len(), 2),
            _ => unreachable!(),
        }
    }

    #[test]
    fn assignment_reuses_the_declared_variable_and_emits_copy() {
        let ir = generate_str("{ var x = 1; x = 2; x }");
        let declares = ir
            .iter()
            .filter(|i| matches!(i, IrInstruction::Copy { .. }))
            .count();
        // one Copy for `var x = 1`, one for `x = 2`
        assert_eq!(declares, 2);
    }

    #[test]
    fn if_else_labels_are_unique_and_well_formed() {
        let ir = generate_str("if true then 1 else 2");
        assert_label_closure(&ir);
        assert_eq!(labels(&ir), vec!["then1", "else1", "if_end1"]);
    }

    #[test]
    fn if_without_else_has_no_else_label() {
        let ir = generate_str("if true then print_int(1)");
        assert_label_closure(&ir);
        assert_eq!(labels(&ir), vec!["then1", "if_end1"]);
    }

    #[test]
    fn repeated_if_expressions_get_distinct_label_numbers() {
        let ir = generate_str("{ if true then 1 else 2; if false then 3 else 4; }");
        assert_label_closure(&ir);
        assert_eq!(
            labels(&ir),
            vec!["then1", "else1", "if_end1", "then2", "else2", "if_end2"]
        );
    }

    #[test]
    fn while_loop_emits_three_distinct_labels_in_order() {
        let ir = generate_str("{ var x = 0; while x < 3 do { x = x + 1 }; x }");
        assert_label_closure(&ir);
        assert_eq!(labels(&ir), vec!["while_start1", "while_body1", "while_end1"]);
    }

    #[test]
    fn and_short_circuits_without_evaluating_right_unconditionally() {
        let ir = generate_str("true and false");
        assert_label_closure(&ir);
        assert_eq!(labels(&ir), vec!["and_right1", "and_skip1", "and_end1"]);
        let has_false_default = ir
            .iter()
            .any(|i| matches!(i, IrInstruction::LoadBoolConst { value: false, .. }));
        assert!(has_false_default);
    }

    #[test]
    fn or_short_circuit_default_is_true() {
        let ir = generate_str("true or false");
        let has_true_default = ir
            .iter()
            .any(|i| matches!(i, IrInstruction::LoadBoolConst { value: true, .. }));
        assert!(has_true_default);
    }

    #[test]
    fn function_call_args_are_always_a_list_even_for_one_argument() {
        let ir = generate_str("print_int(5)");
        let call = ir
            .iter()
            .find(|i| matches!(i, IrInstruction::Call { fun, .. } if fun.0 == "print_int"))
            .unwrap();
        match call {
            IrInstruction::Call { args, .. } => assert_eq!(args.len(), 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn every_var_name_is_unique_across_the_program() {
        let ir = generate_str("{ var x = 1; var y = 2; x + y }");
        let mut dests: Vec<&str> = ir
            .iter()
            .filter_map(|i| match i {
                IrInstruction::LoadIntConst { dest, .. } => Some(dest.0.as_str()),
                _ => None,
            })
            .collect();
        dests.sort();
        dests.dedup();
        assert_eq!(dests.len(), 2);
    }
}
