use std::collections::HashMap;

use crate::ir::{IrInstruction, IrVar};

/// Assigns each distinct `IrVar` an 8-byte stack slot, in first-appearance
/// order over the instruction list. `referenced_vars` below walks every
/// `IrVar`-bearing field of each instruction (scalar and list) to collect
/// them.
pub struct Locals {
    offsets: HashMap<IrVar, usize>,
}

impl Locals {
    pub fn build(instructions: &[IrInstruction]) -> Self {
        let mut offsets = HashMap::new();
        let mut next_offset = 8;
        for instruction in instructions {
            for var in referenced_vars(instruction) {
                offsets.entry(var.clone()).or_insert_with(|| {
                    let offset = next_offset;
                    next_offset += 8;
                    offset
                });
            }
        }
        Locals { offsets }
    }

    /// The stack slot offset for `var`. Panics if `var` was never
    /// referenced by the instruction list `Locals` was built from; every
    /// `IrVar` the assembly generator looks up must appear in it.
    pub fn slot(&self, var: &IrVar) -> usize {
        *self
            .offsets
            .get(var)
            .unwrap_or_else(|| panic!("IR variable '{var}' has no assigned stack slot"))
    }

    pub fn total_bytes(&self) -> usize {
        self.offsets.len() * 8
    }
}

/// The `IrVar`s an instruction references, in field-declaration order.
fn referenced_vars(instruction: &IrInstruction) -> Vec<&IrVar> {
    match instruction {
        IrInstruction::Label { .. } => vec![],
        IrInstruction::LoadIntConst { dest, .. } => vec![dest],
        IrInstruction::LoadBoolConst { dest, .. } => vec![dest],
        IrInstruction::Copy { source, dest, .. } => vec![source, dest],
        IrInstruction::Call {
            fun, args, dest, ..
        } => {
            let mut vars = vec![fun];
            vars.extend(args.iter());
            vars.push(dest);
            vars
        }
        IrInstruction::Jump { .. } => vec![],
        IrInstruction::CondJump { cond, .. } => vec![cond],
    }
}
