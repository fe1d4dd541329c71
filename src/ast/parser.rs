//! Precedence-climbing recursive-descent parser: tokens → one AST root.
//!
//! One `parse_*` method per grammar rule, a single `pos` cursor, and a
//! `peek`/`consume` pair doing all the bounds checking.
use super::expr::{Expr, ExprKind, Literal};
use super::operators::{BinOp, UnOp};
use super::parse_error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenKind};
use crate::source_location::SourceLocation;

/// Operator levels, lowest precedence first (unary prefix is handled by
/// [`Parser::parse_unary_expression`] once this table is exhausted).
const PRECEDENCE: [&[&str]; 7] = [
    &["="],
    &["or"],
    &["and"],
    &["==", "!="],
    &["<", "<=", ">", ">="],
    &["+", "-"],
    &["*", "/", "%"],
];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek_at(&self, offset: isize) -> Token {
        let index = self.pos as isize + offset;
        if index < 0 || index as usize >= self.tokens.len() {
            let location = self
                .tokens
                .last()
                .map(|t| t.location.clone())
                .unwrap_or_else(SourceLocation::any);
            return Token::end(location);
        }
        self.tokens[index as usize].clone()
    }

    fn peek(&self) -> Token {
        self.peek_at(0)
    }

    fn consume(&mut self, expected: Option<&str>) -> ParseResult<Token> {
        if self.pos >= self.tokens.len() {
            let location = self
                .tokens
                .last()
                .map(|t| t.location.clone())
                .unwrap_or_else(SourceLocation::any);
            let expected_str = expected.unwrap_or("end of statement");
            return Err(ParseError::new(
                format!("Unexpected end of input. Were you missing \"{expected_str}\"?"),
                location,
            ));
        }

        let token = self.tokens[self.pos].clone();
        if let Some(expected) = expected {
            if token.text != expected {
                return Err(ParseError::new(
                    format!("Expected \"{expected}\", but found \"{}\".", token.text),
                    token.location,
                ));
            }
        }
        self.pos += 1;
        Ok(token)
    }

    fn parse_int_literal(&mut self) -> ParseResult<Expr> {
        let token = self.consume(None)?;
        let value = token.text.parse::<i64>().map_err(|_| {
            ParseError::new(
                format!("Invalid integer literal '{}'", token.text),
                token.location.clone(),
            )
        })?;
        Ok(Expr::literal(Literal::Int(value), token.location))
    }

    fn parse_boolean_literal(&mut self) -> ParseResult<Expr> {
        let token = self.consume(None)?;
        Ok(Expr::literal(
            Literal::Bool(token.text == "true"),
            token.location,
        ))
    }

    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        let token = self.consume(None)?;
        Ok(Expr::new(
            ExprKind::Identifier(token.text),
            token.location,
        ))
    }

    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        self.consume(Some("("))?;
        let expr = self.parse_expression(0)?;
        self.consume(Some(")"))?;
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        match token.kind {
            TokenKind::Punctuation if token.text == "(" => self.parse_parenthesized(),
            TokenKind::Punctuation if token.text == "{" => self.parse_block(),
            TokenKind::Integer => self.parse_int_literal(),
            TokenKind::Boolean => self.parse_boolean_literal(),
            TokenKind::Identifier => {
                let ident = self.parse_identifier()?;
                if self.peek().text == "(" {
                    self.parse_function_call(ident)
                } else {
                    Ok(ident)
                }
            }
            TokenKind::Keyword if token.text == "if" => self.parse_if_expression(),
            TokenKind::Keyword if token.text == "while" => self.parse_while(),
            TokenKind::Keyword if token.text == "var" => Err(ParseError::new(
                "'var' declarations are only allowed inside blocks.",
                token.location,
            )),
            _ => Err(ParseError::new(
                format!(
                    "Unexpected token \"{}\". Expected an expression (e.g., a literal, \
                     identifier, \"if\", \"while\", function call, etc.).",
                    token.text
                ),
                token.location,
            )),
        }
    }

    fn parse_block(&mut self) -> ParseResult<Expr> {
        let open_brace = self.consume(Some("{"))?;
        let mut expressions = vec![];
        let mut result_expression: Option<Box<Expr>> = None;

        while self.peek().text != "}" {
            let expr = if self.peek().kind == TokenKind::Keyword && self.peek().text == "var" {
                self.parse_var_declaration()?
            } else {
                self.parse_expression(0)?
            };

            if self.peek().text == ";" || self.peek_at(-1).text == "}" {
                if self.peek().text == ";" {
                    self.consume(Some(";"))?;
                }
                expressions.push(expr);
            } else if self.peek().text == "}" {
                result_expression = Some(Box::new(expr));
            } else {
                return Err(ParseError::new(
                    format!("Expected ';' or '}}', found {}", self.peek().text),
                    self.peek().location,
                ));
            }
        }

        self.consume(Some("}"))?;

        if result_expression.is_none() && !expressions.is_empty() {
            result_expression = Some(Box::new(Expr::literal(
                Literal::Unit,
                open_brace.location.clone(),
            )));
        }

        Ok(Expr::new(
            ExprKind::Block {
                expressions,
                result_expression,
            },
            open_brace.location,
        ))
    }

    fn parse_while(&mut self) -> ParseResult<Expr> {
        let while_token = self.consume(Some("while"))?;
        let condition = self.parse_expression(0)?;
        self.consume(Some("do"))?;
        let body = self.parse_expression(0)?;
        Ok(Expr::new(
            ExprKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            while_token.location,
        ))
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Expr> {
        let var_token = self.consume(Some("var"))?;
        if self.peek().kind != TokenKind::Identifier {
            return Err(ParseError::new(
                format!("Expected variable name after 'var', found {}", self.peek().text),
                self.peek().location,
            ));
        }
        let name = self.consume(None)?.text;
        self.consume(Some("="))?;
        let value = self.parse_expression(0)?;
        Ok(Expr::new(
            ExprKind::VarDeclaration {
                name,
                value: Box::new(value),
            },
            var_token.location,
        ))
    }

    fn parse_function_call(&mut self, identifier: Expr) -> ParseResult<Expr> {
        let name = match identifier.kind {
            ExprKind::Identifier(name) => name,
            _ => unreachable!("parse_factor only calls this with an Identifier"),
        };
        let location = identifier.location;

        self.consume(Some("("))?;
        let mut arguments = vec![];
        if self.peek().text != ")" {
            loop {
                arguments.push(self.parse_expression(0)?);
                if self.peek().text == ")" {
                    break;
                }
                if self.peek().text != "," {
                    return Err(ParseError::new(
                        format!(
                            "Expected a ',' between function arguments or a ')' to close the \
                             function call, found '{}'.",
                            self.peek().text
                        ),
                        self.peek().location,
                    ));
                }
                self.consume(Some(","))?;
            }
        }
        self.consume(Some(")"))?;

        Ok(Expr::new(ExprKind::FunctionCall { name, arguments }, location))
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expr> {
        let if_token = self.consume(Some("if"))?;
        let condition = self.parse_expression(0)?;
        self.consume(Some("then"))?;
        let then_branch = self.parse_expression(0)?;
        let else_branch = if self.peek().text == "else" {
            self.consume(Some("else"))?;
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            if_token.location,
        ))
    }

    fn parse_expression(&mut self, precedence: usize) -> ParseResult<Expr> {
        if precedence == PRECEDENCE.len() {
            return self.parse_unary_expression();
        }

        let mut left = self.parse_expression(precedence + 1)?;

        while PRECEDENCE[precedence].contains(&self.peek().text.as_str()) {
            let op_token = self.consume(None)?;
            let op: BinOp = op_token.text.parse().map_err(|_| {
                ParseError::new(
                    format!("Unsupported operator '{}'", op_token.text),
                    op_token.location.clone(),
                )
            })?;
            // `=` right-associates; every other level left-associates.
            let next_precedence = if op_token.text == "=" {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expression(next_precedence)?;
            left = Expr::new(
                ExprKind::BinaryOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                op_token.location,
            );
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        if token.text == "not" || token.text == "-" {
            let op_token = self.consume(None)?;
            let op: UnOp = op_token.text.parse().expect("checked by the match above");
            let operand = self.parse_unary_expression()?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                op_token.location,
            ));
        }
        self.parse_factor()
    }

    fn parse_program(&mut self) -> ParseResult<Expr> {
        let mut expressions = vec![];

        while self.pos < self.tokens.len() {
            let expr = self.parse_expression(0)?;
            expressions.push(expr);
            if self.peek().kind == TokenKind::End || self.peek().text != ";" {
                break;
            }
            self.consume(Some(";"))?;
        }

        let first_location = expressions[0].location.clone();
        let result_expression = if !expressions.is_empty() && self.peek_at(-1).text != ";" {
            expressions.pop().expect("just checked non-empty")
        } else {
            Expr::literal(Literal::Unit, first_location)
        };

        if expressions.is_empty() {
            return Ok(result_expression);
        }

        let root_location = self.tokens[0].location.clone();
        Ok(Expr::new(
            ExprKind::Block {
                expressions,
                result_expression: Some(Box::new(result_expression)),
            },
            root_location,
        ))
    }
}

/// Parse a full token stream into a single AST root. Fails at the first
/// offending token; there is no error recovery.
pub fn parse(tokens: Vec<Token>, file: &str) -> ParseResult<Expr> {
    if tokens.is_empty() {
        return Err(ParseError::new(
            "Empty input provided",
            SourceLocation::new(file, 1, 1),
        ));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let result = parser.parse_program()?;

    if parser.pos < parser.tokens.len() {
        let trailing = &parser.tokens[parser.pos];
        return Err(ParseError::new(
            format!("Unexpected tokens at end of input: {}", trailing.text),
            trailing.location.clone(),
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(source: &str) -> ParseResult<Expr> {
        parse(tokenize(source, "t.ez"), "t.ez")
    }

    #[test]
    fn single_literal_is_the_root() {
        let expr = parse_str("42").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Literal(Literal::Int(42))
        ));
    }

    #[test]
    fn arithmetic_precedence_binds_multiplication_tighter() {
        let expr = parse_str("1 + 2 * 3").unwrap();
        match expr.kind {
            ExprKind::BinaryOp { op: BinOp::Add, right, .. } => {
                assert!(matches!(
                    right.kind,
                    ExprKind::BinaryOp { op: BinOp::Mul, .. }
                ));
            }
            other => panic!("expected a top-level '+', got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        // a = b = c  ==  a = (b = c)
        let expr = parse_str("a = b = c").unwrap();
        match expr.kind {
            ExprKind::BinaryOp { op: BinOp::Assign, right, .. } => {
                assert!(matches!(
                    right.kind,
                    ExprKind::BinaryOp { op: BinOp::Assign, .. }
                ));
            }
            other => panic!("expected top-level '=', got {other:?}"),
        }
    }

    #[test]
    fn addition_is_left_associative() {
        // a - b - c == (a - b) - c
        let expr = parse_str("a - b - c").unwrap();
        match expr.kind {
            ExprKind::BinaryOp { op: BinOp::Sub, left, .. } => {
                assert!(matches!(
                    left.kind,
                    ExprKind::BinaryOp { op: BinOp::Sub, .. }
                ));
            }
            other => panic!("expected top-level '-', got {other:?}"),
        }
    }

    #[test]
    fn if_then_else_parses() {
        let expr = parse_str("if true then 1 else 2").unwrap();
        assert!(matches!(expr.kind, ExprKind::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn if_without_else_parses() {
        let expr = parse_str("if true then 1").unwrap();
        assert!(matches!(expr.kind, ExprKind::If { else_branch: None, .. }));
    }

    #[test]
    fn double_not_nests_unary_ops() {
        let expr = parse_str("not not true").unwrap();
        match expr.kind {
            ExprKind::UnaryOp { op: UnOp::Not, operand } => {
                assert!(matches!(
                    operand.kind,
                    ExprKind::UnaryOp { op: UnOp::Not, .. }
                ));
            }
            other => panic!("expected a unary 'not', got {other:?}"),
        }
    }

    #[test]
    fn semicolon_elision_between_adjacent_blocks() {
        // { { 1 } { 2 } }: two block items, no ';' needed between them, plus
        // a synthesized Unit result since neither is in result position.
        let expr = parse_str("{ { 1 } { 2 } }").unwrap();
        match expr.kind {
            ExprKind::Block { expressions, result_expression } => {
                assert_eq!(expressions.len(), 2);
                assert!(matches!(
                    result_expression.as_ref().map(|e| &e.kind),
                    Some(ExprKind::Literal(Literal::Unit))
                ));
            }
            other => panic!("expected a Block, got {other:?}"),
        }
    }

    #[test]
    fn empty_block_has_no_items_and_no_result() {
        let expr = parse_str("{}").unwrap();
        match expr.kind {
            ExprKind::Block { expressions, result_expression } => {
                assert!(expressions.is_empty());
                assert!(result_expression.is_none());
            }
            other => panic!("expected an empty Block, got {other:?}"),
        }
    }

    #[test]
    fn var_at_top_level_is_an_error() {
        let err = parse_str("var x = 1").unwrap_err();
        assert!(err.message.contains("only allowed inside blocks"));
    }

    #[test]
    fn trailing_operator_is_unexpected_end_of_input() {
        let err = parse_str("3 +").unwrap_err();
        assert!(err.message.contains("Unexpected end of input"));
    }

    #[test]
    fn function_call_requires_comma_or_close_paren() {
        let err = parse_str("print_int(1 2)").unwrap_err();
        assert!(err.message.contains("Expected a ','"));
    }

    #[test]
    fn trailing_tokens_after_complete_parse_are_rejected() {
        let err = parse_str("1 2").unwrap_err();
        assert!(err.message.contains("Unexpected tokens"));
    }
}
