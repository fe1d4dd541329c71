use std::fmt::Display;

use crate::source_location::SourceLocation;

/// Fatal type-checking failure: a message plus the source location it was
/// raised at.
#[derive(Debug, Clone)]
pub struct TypeError {
    pub message: String,
    pub location: SourceLocation,
}

impl TypeError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for TypeError {}

pub type TResult<T> = Result<T, TypeError>;
