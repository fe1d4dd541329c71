use crate::ir::{IrInstruction, IrVar};

use super::instruction::Instruction;
use super::locals::Locals;
use super::operand::Operand;

const INTRINSICS: &[&str] = &[
    "+", "-", "*", "/", "%", "<", "<=", ">", ">=", "==", "!=", "and", "or", "unary_-", "unary_not",
];

const ARG_REGISTERS: [&str; 6] = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];

/// Lowers a flat IR instruction list to an AT&T-syntax assembly string:
/// fixed prologue, one `Instruction` (with preceding `# ` comment) per IR
/// instruction, fixed epilogue.
pub fn generate(instructions: &[IrInstruction]) -> String {
    let locals = Locals::build(instructions);
    let mut gen = AsmGenerator { lines: Vec::new() };

    gen.prologue(locals.total_bytes());
    for instruction in instructions {
        gen.lower(instruction, &locals);
    }
    gen.epilogue();

    gen.render()
}

struct AsmGenerator {
    lines: Vec<Instruction>,
}

impl AsmGenerator {
    fn push(&mut self, instruction: Instruction) {
        self.lines.push(instruction);
    }

    fn render(&self) -> String {
        self.lines
            .iter()
            .map(Instruction::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prologue(&mut self, stack_bytes: usize) {
        self.push(Instruction::Raw(".extern print_int".into()));
        self.push(Instruction::Raw(".extern print_bool".into()));
        self.push(Instruction::Raw(".extern read_int".into()));
        self.push(Instruction::Raw(".global main".into()));
        self.push(Instruction::Raw(".type main, @function".into()));
        self.push(Instruction::Raw(".section .text".into()));
        self.push(Instruction::Raw("main:".into()));
        self.push(Instruction::Push(Operand::Register("rbp")));
        self.push(Instruction::Mov(
            Operand::Register("rsp"),
            Operand::Register("rbp"),
        ));
        self.push(Instruction::Sub(
            Operand::Immediate(stack_bytes as i64),
            Operand::Register("rsp"),
        ));
    }

    fn epilogue(&mut self) {
        self.push(Instruction::Mov(
            Operand::Register("rbp"),
            Operand::Register("rsp"),
        ));
        self.push(Instruction::Pop(Operand::Register("rbp")));
        self.push(Instruction::Ret);
    }

    fn lower(&mut self, instruction: &IrInstruction, locals: &Locals) {
        self.push(Instruction::Comment(instruction.to_string()));
        match instruction {
            IrInstruction::Label { name, .. } => self.push(Instruction::Label(name.clone())),

            IrInstruction::LoadIntConst { value, dest, .. } => {
                if *value >= i32::MIN as i64 && *value <= i32::MAX as i64 {
                    self.push(Instruction::Mov(
                        Operand::Immediate(*value),
                        Operand::Slot(locals.slot(dest)),
                    ));
                } else {
                    self.push(Instruction::Movabsq(*value, Operand::Register("rax")));
                    self.push(Instruction::Mov(
                        Operand::Register("rax"),
                        Operand::Slot(locals.slot(dest)),
                    ));
                }
            }

            IrInstruction::LoadBoolConst { value, dest, .. } => {
                self.push(Instruction::Mov(
                    Operand::Immediate(if *value { 1 } else { 0 }),
                    Operand::Slot(locals.slot(dest)),
                ));
            }

            IrInstruction::Copy { source, dest, .. } => {
                self.push(Instruction::Mov(
                    Operand::Slot(locals.slot(source)),
                    Operand::Register("rax"),
                ));
                self.push(Instruction::Mov(
                    Operand::Register("rax"),
                    Operand::Slot(locals.slot(dest)),
                ));
            }

            IrInstruction::CondJump {
                cond,
                then_label,
                else_label,
                ..
            } => {
                self.push(Instruction::Cmp(
                    Operand::Immediate(0),
                    Operand::Slot(locals.slot(cond)),
                ));
                self.push(Instruction::Jne(then_label.clone()));
                self.push(Instruction::Jmp(else_label.clone()));
            }

            IrInstruction::Jump { label, .. } => self.push(Instruction::Jmp(label.clone())),

            IrInstruction::Call {
                fun, args, dest, ..
            } => {
                if INTRINSICS.contains(&fun.0.as_str()) {
                    self.emit_intrinsic(&fun.0, args, locals);
                } else {
                    self.emit_c_abi_call(&fun.0, args, locals);
                }
                self.push(Instruction::Mov(
                    Operand::Register("rax"),
                    Operand::Slot(locals.slot(dest)),
                ));
            }
        }
    }

    fn emit_intrinsic(&mut self, op: &str, args: &[IrVar], locals: &Locals) {
        match op {
            "+" => self.binary_op(Instruction::Add, args, locals),
            "-" => self.binary_op(Instruction::Sub, args, locals),
            "*" => self.binary_op(Instruction::Imul, args, locals),
            "and" => self.binary_op(Instruction::And, args, locals),
            "or" => self.binary_op(Instruction::Or, args, locals),
            "/" => self.division(args, locals, false),
            "%" => self.division(args, locals, true),
            "<" => self.comparison("setl", args, locals),
            "<=" => self.comparison("setle", args, locals),
            ">" => self.comparison("setg", args, locals),
            ">=" => self.comparison("setge", args, locals),
            "==" => self.comparison("sete", args, locals),
            "!=" => self.comparison("setne", args, locals),
            "unary_-" => {
                self.push(Instruction::Mov(
                    Operand::Slot(locals.slot(&args[0])),
                    Operand::Register("rax"),
                ));
                self.push(Instruction::Neg(Operand::Register("rax")));
            }
            "unary_not" => {
                self.push(Instruction::Mov(
                    Operand::Slot(locals.slot(&args[0])),
                    Operand::Register("rax"),
                ));
                self.push(Instruction::Xor(
                    Operand::Immediate(1),
                    Operand::Register("rax"),
                ));
            }
            other => unreachable!("'{other}' is not an intrinsic"),
        }
    }

    fn binary_op(&mut self, ctor: fn(Operand, Operand) -> Instruction, args: &[IrVar], locals: &Locals) {
        self.push(Instruction::Mov(
            Operand::Slot(locals.slot(&args[0])),
            Operand::Register("rax"),
        ));
        self.push(ctor(Operand::Slot(locals.slot(&args[1])), Operand::Register("rax")));
    }

    fn division(&mut self, args: &[IrVar], locals: &Locals, remainder: bool) {
        self.push(Instruction::Mov(
            Operand::Slot(locals.slot(&args[0])),
            Operand::Register("rax"),
        ));
        self.push(Instruction::Cqto);
        self.push(Instruction::Idivq(Operand::Slot(locals.slot(&args[1]))));
        if remainder {
            self.push(Instruction::Mov(
                Operand::Register("rdx"),
                Operand::Register("rax"),
            ));
        }
    }

    fn comparison(&mut self, cc: &'static str, args: &[IrVar], locals: &Locals) {
        self.push(Instruction::Mov(
            Operand::Slot(locals.slot(&args[0])),
            Operand::Register("rax"),
        ));
        self.push(Instruction::Cmp(
            Operand::Slot(locals.slot(&args[1])),
            Operand::Register("rax"),
        ));
        self.push(Instruction::SetCc(cc));
        self.push(Instruction::Movzbq(Operand::Register("rax")));
    }

    fn emit_c_abi_call(&mut self, name: &str, args: &[IrVar], locals: &Locals) {
        for (arg, reg) in args.iter().zip(ARG_REGISTERS) {
            self.push(Instruction::Mov(Operand::Slot(locals.slot(arg)), Operand::Register(reg)));
        }
        self.push(Instruction::Call(name.to_string()));
    }
}
