//! Whole-pipeline compiler for a small, statically typed,
//! expression-oriented language: tokenizer → parser → type checker → IR
//! generator → x86-64 AT&T assembly generator.
//!
//! Each stage lives in its own sibling module under `src/` and owns its own
//! error type, with [`compile`] as the single composed entry point.
pub mod asm;
pub mod ast;
mod error;
pub mod ir;
pub mod lexer;
pub mod source_location;
pub mod symtable;
pub mod typechecker;

pub use error::CompileError;

use ast::Expr;
use ir::IrInstruction;
use lexer::Token;

use serde::{Deserialize, Serialize};

/// Everything the pipeline produced for one compilation. Every field is
/// `Serialize`/`Deserialize` so an out-of-process collaborator (an HTTP
/// surface, an LSP server) can hand this back as structured data without
/// this crate knowing anything about that transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileOutput {
    pub tokens: Vec<Token>,
    pub ast: Expr,
    pub ir: Vec<IrInstruction>,
    pub asm: String,
}

/// Run the whole pipeline over `source`. `file_name` is attached to every
/// token's and AST node's [`source_location::SourceLocation`]; pass the
/// path `source` was read from, or a synthetic name such as `"<stdin>"` for
/// a REPL-style caller.
///
/// No partial result is ever returned alongside an `Err`: each stage either
/// hands a fully valid value to the next stage or the whole call fails.
pub fn compile(source: &str, file_name: &str) -> Result<CompileOutput, CompileError> {
    let tokens = lexer::tokenize(source, file_name);

    let mut tree = ast::parse(tokens.clone(), file_name)?;
    typechecker::check(&mut tree)?;
    let ir = ir::generate(&tree)?;
    let asm = asm::generate(&ir);

    Ok(CompileOutput {
        tokens,
        ast: tree,
        ir,
        asm,
    })
}
