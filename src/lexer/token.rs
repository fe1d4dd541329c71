use serde::{Deserialize, Serialize};

use crate::source_location::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Integer,
    Boolean,
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    End,
}

/// A single lexeme together with its source position.
///
/// Equality ignores location whenever either side carries
/// [`SourceLocation::any`] (see that type), which is what lets golden tests
/// assert on token streams without pinning down columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, location: SourceLocation) -> Self {
        Self {
            text: text.into(),
            kind,
            location,
        }
    }

    /// The synthetic token `peek` returns past the end of the stream.
    pub fn end(location: SourceLocation) -> Self {
        Self {
            text: String::new(),
            kind: TokenKind::End,
            location,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text && self.location == other.location
    }
}

impl Eq for Token {}
