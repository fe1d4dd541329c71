//! Type checker: walks the AST, annotating `Expr::ty` in place.
//!
//! A `Block` pushes a child scope for its own items and pops it implicitly
//! by simply dropping the `SymTable` handle when the walk returns from that
//! branch.
mod error;

pub use error::{TResult, TypeError};

use log::debug;

use crate::ast::{BinOp, Expr, ExprKind, Literal, Type, UnOp};
use crate::symtable::SymTable;

type Scope = SymTable<Type>;

/// Type check `root`, annotating every node's `ty` field in place, and
/// return the root's type. Fails fatally at the first mismatch.
pub fn check(root: &mut Expr) -> TResult<Type> {
    let scope = Scope::root();
    check_expr(root, &scope)
}

fn check_expr(expr: &mut Expr, scope: &Scope) -> TResult<Type> {
    let location = expr.location.clone();
    let ty = check_kind(&mut expr.kind, &location, scope)?;
    expr.ty = Some(ty.clone());
    Ok(ty)
}

fn check_kind(kind: &mut ExprKind, location: &crate::source_location::SourceLocation, scope: &Scope) -> TResult<Type> {
    match kind {
        ExprKind::Literal(Literal::Bool(_)) => Ok(Type::Bool),
        ExprKind::Literal(Literal::Int(_)) => Ok(Type::Int),
        ExprKind::Literal(Literal::Unit) => Ok(Type::Unit),

        ExprKind::Identifier(name) => scope
            .lookup(name)
            .ok_or_else(|| TypeError::new(format!("Undefined variable: '{name}'"), location.clone())),

        ExprKind::BinaryOp { left, op: BinOp::Assign, right } => {
            let name = match &left.kind {
                ExprKind::Identifier(name) => name.clone(),
                other => {
                    return Err(TypeError::new(
                        format!("Assignment target must be a variable name, found {other:?}"),
                        location.clone(),
                    ))
                }
            };
            let right_ty = check_expr(right, scope)?;
            if let Some(existing) = scope.lookup(&name) {
                if existing != right_ty {
                    return Err(TypeError::new(
                        format!(
                            "Type mismatch in assignment to '{name}': expected {existing}, found {right_ty}"
                        ),
                        location.clone(),
                    ));
                }
            }
            scope.update_or_define(name, right_ty.clone());
            left.ty = Some(right_ty.clone());
            Ok(right_ty)
        }

        ExprKind::BinaryOp { left, op, right } => {
            let t1 = check_expr(left, scope)?;
            let t2 = check_expr(right, scope)?;
            match op {
                BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                    if t1 != Type::Int || t2 != Type::Int {
                        return Err(TypeError::new(
                            format!(
                                "Expected both operands to be Int for operation '{op}', found {t1} and {t2}"
                            ),
                            location.clone(),
                        ));
                    }
                    Ok(Type::Int)
                }
                BinOp::And | BinOp::Or => {
                    if t1 == Type::Bool && t2 == Type::Bool {
                        Ok(Type::Bool)
                    } else {
                        Err(TypeError::new(
                            format!("Logical '{op}' operations require Bool type operands"),
                            location.clone(),
                        ))
                    }
                }
                BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
                    if t1 == Type::Int && t2 == Type::Int {
                        Ok(Type::Bool)
                    } else {
                        Err(TypeError::new(
                            "Binary comparison operations require Int type operands",
                            location.clone(),
                        ))
                    }
                }
                BinOp::Assign => unreachable!("handled above"),
            }
        }

        ExprKind::UnaryOp { op, operand } => {
            let t = check_expr(operand, scope)?;
            match (op, &t) {
                (UnOp::Not, Type::Bool) => Ok(Type::Bool),
                (UnOp::Neg, Type::Int) => Ok(Type::Int),
                _ => Err(TypeError::new(
                    format!("Unsupported unary operator: {op} for type {t}"),
                    location.clone(),
                )),
            }
        }

        ExprKind::If { condition, then_branch, else_branch } => {
            let cond_ty = check_expr(condition, scope)?;
            if cond_ty != Type::Bool {
                return Err(TypeError::new("If condition must be of type Bool", location.clone()));
            }
            let then_ty = check_expr(then_branch, scope)?;
            let else_ty = match else_branch {
                Some(branch) => check_expr(branch, scope)?,
                None => Type::Unit,
            };
            if then_ty != else_ty {
                return Err(TypeError::new(
                    "The types of then and else branches must match",
                    location.clone(),
                ));
            }
            Ok(then_ty)
        }

        ExprKind::Block { expressions, result_expression } => {
            debug!("entering block scope at {location}");
            let child = scope.new_child();
            for item in expressions.iter_mut() {
                check_expr(item, &child)?;
            }
            let ty = match result_expression {
                Some(result) => check_expr(result, &child)?,
                None => Type::Unit,
            };
            debug!("leaving block scope at {location}");
            Ok(ty)
        }

        ExprKind::While { condition, body } => {
            let cond_ty = check_expr(condition, scope)?;
            if cond_ty != Type::Bool {
                return Err(TypeError::new("While condition must be of type Bool", location.clone()));
            }
            check_expr(body, scope)?;
            Ok(Type::Unit)
        }

        ExprKind::VarDeclaration { name, value } => {
            let ty = check_expr(value, scope)?;
            scope.define(name.clone(), ty);
            Ok(Type::Unit)
        }

        ExprKind::FunctionCall { name, arguments } => check_function_call(name, arguments, location, scope),
    }
}

fn check_function_call(
    name: &str,
    arguments: &mut [Expr],
    location: &crate::source_location::SourceLocation,
    scope: &Scope,
) -> TResult<Type> {
    let expected: &[Type] = match name {
        "print_int" => &[Type::Int],
        "print_bool" => &[Type::Bool],
        "read_int" => &[],
        _ => return Err(TypeError::new(format!("Undefined function: '{name}'"), location.clone())),
    };

    if arguments.len() != expected.len() {
        return Err(TypeError::new(
            format!(
                "Function '{name}' expects {} arguments, got {}",
                expected.len(),
                arguments.len()
            ),
            location.clone(),
        ));
    }

    for (arg, expected_ty) in arguments.iter_mut().zip(expected) {
        let arg_ty = check_expr(arg, scope)?;
        if arg_ty != *expected_ty {
            return Err(TypeError::new(
                format!("Function '{name}' expects arguments of type {expected_ty}, got {arg_ty}"),
                location.clone(),
            ));
        }
    }

    Ok(if name == "read_int" { Type::Int } else { Type::Unit })
}
