use std::fmt::Display;

/// An AT&T-syntax operand: a small tagged enum with a `Display` impl rather
/// than ad hoc string formatting scattered through the lowering code.
#[derive(Debug, Clone)]
pub enum Operand {
    Register(&'static str),
    /// A stack slot at `-offset(%rbp)`.
    Slot(usize),
    Immediate(i64),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(name) => write!(f, "%{name}"),
            Operand::Slot(offset) => write!(f, "-{offset}(%rbp)"),
            Operand::Immediate(value) => write!(f, "${value}"),
        }
    }
}
