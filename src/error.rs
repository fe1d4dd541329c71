use std::fmt::Display;

use crate::asm::AsmError;
use crate::ast::ParseError;
use crate::ir::IrError;
use crate::typechecker::TypeError;

/// Unites the four fatal error kinds from every pipeline stage. `compile`
/// returns this instead of a stage-specific error so callers have one type
/// to match on.
#[derive(Debug, Clone)]
pub enum CompileError {
    Parse(ParseError),
    Type(TypeError),
    Ir(IrError),
    Asm(AsmError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(err) => write!(f, "{err}"),
            CompileError::Type(err) => write!(f, "{err}"),
            CompileError::Ir(err) => write!(f, "{err}"),
            CompileError::Asm(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<TypeError> for CompileError {
    fn from(err: TypeError) -> Self {
        CompileError::Type(err)
    }
}

impl From<IrError> for CompileError {
    fn from(err: IrError) -> Self {
        CompileError::Ir(err)
    }
}

impl From<AsmError> for CompileError {
    fn from(err: AsmError) -> Self {
        CompileError::Asm(err)
    }
}
