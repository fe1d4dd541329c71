//! Three-address IR: flat instruction list with explicit control flow,
//! produced by walking the type-checked AST. Counters live on the walker
//! rather than as module globals.
mod builtins;
mod error;
mod generator;

pub use error::{IrError, IrResult};
pub use generator::generate;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::source_location::SourceLocation;

/// A symbolic IR variable, identified only by name. Two `IrVar`s with the
/// same name are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrVar(pub String);

impl IrVar {
    pub fn new(name: impl Into<String>) -> Self {
        IrVar(name.into())
    }
}

impl Display for IrVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One IR instruction. Every label referenced by a `Jump`/`CondJump` appears
/// exactly once as a `Label` within the same instruction list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IrInstruction {
    Label {
        location: SourceLocation,
        name: String,
    },
    LoadIntConst {
        location: SourceLocation,
        value: i64,
        dest: IrVar,
    },
    LoadBoolConst {
        location: SourceLocation,
        value: bool,
        dest: IrVar,
    },
    Copy {
        location: SourceLocation,
        source: IrVar,
        dest: IrVar,
    },
    Call {
        location: SourceLocation,
        fun: IrVar,
        args: Vec<IrVar>,
        dest: IrVar,
    },
    Jump {
        location: SourceLocation,
        label: String,
    },
    CondJump {
        location: SourceLocation,
        cond: IrVar,
        then_label: String,
        else_label: String,
    },
}

impl Display for IrInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrInstruction::Label { name, .. } => write!(f, "Label({name})"),
            IrInstruction::LoadIntConst { value, dest, .. } => {
                write!(f, "LoadIntConst({value}, {dest})")
            }
            IrInstruction::LoadBoolConst { value, dest, .. } => {
                write!(f, "LoadBoolConst({value}, {dest})")
            }
            IrInstruction::Copy { source, dest, .. } => write!(f, "Copy({source}, {dest})"),
            IrInstruction::Call {
                fun, args, dest, ..
            } => {
                let args = args
                    .iter()
                    .map(IrVar::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Call({fun}, [{args}], {dest})")
            }
            IrInstruction::Jump { label, .. } => write!(f, "Jump({label})"),
            IrInstruction::CondJump {
                cond,
                then_label,
                else_label,
                ..
            } => write!(f, "CondJump({cond}, {then_label}, {else_label})"),
        }
    }
}
