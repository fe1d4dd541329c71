use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The three value types plus the function type used internally for
/// operator/builtin bindings. `Int`, `Bool`, and `Unit` are plain unit-like
/// variants, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Int,
    Bool,
    Unit,
    Fun {
        arg_types: Vec<Type>,
        return_type: Box<Type>,
    },
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => f.write_str("Int"),
            Type::Bool => f.write_str("Bool"),
            Type::Unit => f.write_str("Unit"),
            Type::Fun {
                arg_types,
                return_type,
            } => {
                let args = arg_types
                    .iter()
                    .map(Type::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({args}) -> {return_type}")
            }
        }
    }
}

impl Type {
    pub fn function(arg_types: Vec<Type>, return_type: Type) -> Type {
        Type::Fun {
            arg_types,
            return_type: Box::new(return_type),
        }
    }
}
