//! Assembly generator: IR → AT&T-syntax x86-64 text.
mod error;
mod generator;
mod instruction;
mod locals;
mod operand;

pub use error::AsmError;
pub use generator::generate;
