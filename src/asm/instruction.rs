use std::fmt::Display;

use super::operand::Operand;

/// One line of emitted assembly. Each variant formats itself via `Display`,
/// so the generator builds a `Vec<Instruction>` and joins it rather than
/// string-building by hand at each call site.
#[derive(Debug, Clone)]
pub enum Instruction {
    Comment(String),
    /// A fixed, already-formatted line: externs, section/global directives,
    /// the `main:` symbol, and the prologue/epilogue moves. These aren't
    /// IR-derived, so they don't need their own mnemonic variants.
    Raw(String),
    /// An IR-derived label: `.L{name}:`.
    Label(String),
    Mov(Operand, Operand),
    Movabsq(i64, Operand),
    /// `movzbq %al, dest`
    Movzbq(Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Imul(Operand, Operand),
    Cqto,
    Idivq(Operand),
    Cmp(Operand, Operand),
    /// `set{cc} %al` for one of `sete, setne, setl, setle, setg, setge`.
    SetCc(&'static str),
    Neg(Operand),
    Xor(Operand, Operand),
    And(Operand, Operand),
    Or(Operand, Operand),
    Jmp(String),
    Jne(String),
    Call(String),
    Push(Operand),
    Pop(Operand),
    Ret,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "\t# {text}"),
            Instruction::Raw(line) => f.write_str(line),
            Instruction::Label(name) => write!(f, ".L{name}:"),
            Instruction::Mov(src, dst) => write!(f, "\tmovq {src}, {dst}"),
            Instruction::Movabsq(value, dst) => write!(f, "\tmovabsq ${value}, {dst}"),
            Instruction::Movzbq(dst) => write!(f, "\tmovzbq %al, {dst}"),
            Instruction::Add(src, dst) => write!(f, "\taddq {src}, {dst}"),
            Instruction::Sub(src, dst) => write!(f, "\tsubq {src}, {dst}"),
            Instruction::Imul(src, dst) => write!(f, "\timulq {src}, {dst}"),
            Instruction::Cqto => f.write_str("\tcqto"),
            Instruction::Idivq(src) => write!(f, "\tidivq {src}"),
            Instruction::Cmp(lhs, rhs) => write!(f, "\tcmpq {lhs}, {rhs}"),
            Instruction::SetCc(cc) => write!(f, "\t{cc} %al"),
            Instruction::Neg(dst) => write!(f, "\tnegq {dst}"),
            Instruction::Xor(src, dst) => write!(f, "\txorq {src}, {dst}"),
            Instruction::And(src, dst) => write!(f, "\tandq {src}, {dst}"),
            Instruction::Or(src, dst) => write!(f, "\torq {src}, {dst}"),
            Instruction::Jmp(label) => write!(f, "\tjmp .L{label}"),
            Instruction::Jne(label) => write!(f, "\tjne .L{label}"),
            Instruction::Call(name) => write!(f, "\tcall {name}"),
            Instruction::Push(op) => write!(f, "\tpushq {op}"),
            Instruction::Pop(op) => write!(f, "\tpopq {op}"),
            Instruction::Ret => f.write_str("\tret"),
        }
    }
}
