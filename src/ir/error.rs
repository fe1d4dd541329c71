use std::fmt::Display;

use crate::source_location::SourceLocation;

/// Raised when the IR generator cannot lower a construct: an unsupported
/// literal shape, assignment to a non-identifier, an unsupported unary
/// operator, or an unresolved name. The type checker rejects almost all of
/// these earlier, so in practice this only fires on AST shapes that violate
/// an invariant the checker doesn't itself enforce (e.g. a malformed tree
/// built directly rather than through the parser).
#[derive(Debug, Clone)]
pub struct IrError {
    pub message: String,
    pub location: SourceLocation,
}

impl IrError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl Display for IrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for IrError {}

pub type IrResult<T> = Result<T, IrError>;
