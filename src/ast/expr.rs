use serde::{Deserialize, Serialize};

use super::operators::{BinOp, UnOp};
use super::types::Type;
use crate::source_location::SourceLocation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Unit,
}

/// One AST node. Every node carries its source location; `ty` starts `None`
/// and is filled in place by the type checker. The IR generator only ever
/// sees nodes where it is `Some`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    BinaryOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Block {
        expressions: Vec<Expr>,
        result_expression: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    VarDeclaration {
        name: String,
        value: Box<Expr>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            ty: None,
        }
    }

    pub fn literal(value: Literal, location: SourceLocation) -> Self {
        Self::new(ExprKind::Literal(value), location)
    }

    /// The type checker's verdict for this node. Panics if called before
    /// type checking; every stage downstream of the checker relies on that
    /// invariant rather than threading `Option` through the IR generator.
    pub fn ty(&self) -> &Type {
        self.ty
            .as_ref()
            .expect("Expr::ty() called before type checking")
    }
}
