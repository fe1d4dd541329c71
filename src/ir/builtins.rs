//! Predefined operator/builtin bindings for the IR generator's root scope.
use crate::ast::Type;

/// `(name, type)` for everything the IR generator's root scope binds before
/// walking the program. `==`/`!=` are deliberately absent: they are
/// synthesized as one-off `IrVar`s at the call site instead (see
/// `generator.rs`), since structural equality is not a root-scope binding.
pub fn predefined_bindings() -> Vec<(&'static str, Type)> {
    vec![
        ("unary_-", Type::function(vec![Type::Int], Type::Int)),
        ("unary_not", Type::function(vec![Type::Bool], Type::Bool)),
        ("+", Type::function(vec![Type::Int, Type::Int], Type::Int)),
        ("-", Type::function(vec![Type::Int, Type::Int], Type::Int)),
        ("*", Type::function(vec![Type::Int, Type::Int], Type::Int)),
        ("/", Type::function(vec![Type::Int, Type::Int], Type::Int)),
        ("%", Type::function(vec![Type::Int, Type::Int], Type::Int)),
        ("<", Type::function(vec![Type::Int, Type::Int], Type::Bool)),
        (">", Type::function(vec![Type::Int, Type::Int], Type::Bool)),
        ("<=", Type::function(vec![Type::Int, Type::Int], Type::Bool)),
        (">=", Type::function(vec![Type::Int, Type::Int], Type::Bool)),
        ("and", Type::function(vec![Type::Bool, Type::Bool], Type::Bool)),
        ("or", Type::function(vec![Type::Bool, Type::Bool], Type::Bool)),
        ("print_int", Type::function(vec![Type::Int], Type::Unit)),
        ("print_bool", Type::function(vec![Type::Bool], Type::Unit)),
        ("read_int", Type::function(vec![], Type::Int)),
    ]
}

/// The result type of calling a binary/unary operator, read from its own
/// `FunType.return_type` rather than from the AST node's own resolved type.
pub fn operator_return_type(name: &str) -> Type {
    match name {
        "unary_-" => Type::Int,
        "unary_not" => Type::Bool,
        "+" | "-" | "*" | "/" | "%" => Type::Int,
        "<" | ">" | "<=" | ">=" | "==" | "!=" => Type::Bool,
        "and" | "or" => Type::Bool,
        other => unreachable!("no predefined operator binding for '{other}'"),
    }
}
