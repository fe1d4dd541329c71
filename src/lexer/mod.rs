//! Hand-rolled tokenizer.
//!
//! A `Peekable<Chars>` cursor tracks line/column by hand and each `lex_*`
//! helper consumes one token's worth of input. The tokenizer never fails;
//! a malformed stream is left for the parser to reject.
mod token;

pub use token::{Token, TokenKind};

use std::iter::Peekable;
use std::str::Chars;

use log::trace;

use crate::source_location::SourceLocation;

const KEYWORDS: &[&str] = &["var", "if", "then", "else", "while", "do", "Int", "Boolean"];
const WORD_OPERATORS: &[&str] = &["and", "or", "not"];
const PUNCTUATION: &[char] = &['(', ')', ',', ';', '{', '}', ':'];

struct Lexer<'a> {
    file: String,
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, file: &str) -> Self {
        Self {
            file: file.to_owned(),
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            tokens: vec![],
        }
    }

    fn here(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut clone = self.chars.clone();
        clone.next();
        clone.next()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.chars.next()?;
        if next == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(next)
    }

    fn emit(&mut self, text: String, kind: TokenKind, location: SourceLocation) {
        trace!("token {kind:?} {text:?} at {location}");
        self.tokens.push(Token::new(text, kind, location));
    }

    fn run(mut self) -> Vec<Token> {
        loop {
            let Some(next) = self.peek() else {
                break;
            };

            if next.is_whitespace() {
                self.advance();
                continue;
            }

            if self.try_lex_comment() {
                continue;
            }

            match next {
                '0'..='9' => self.lex_integer(),
                c if c.is_alphabetic() || c == '_' => self.lex_word(),
                c if PUNCTUATION.contains(&c) => self.lex_punctuation(),
                _ => self.lex_operator_or_unknown(),
            }
        }

        self.tokens
    }

    /// `//` to end of line, `#` to end of line, or non-nesting `/* ... */`.
    fn try_lex_comment(&mut self) -> bool {
        let next = self.peek();
        if next == Some('#') {
            while self.peek().is_some_and(|c| c != '\n') {
                self.advance();
            }
            return true;
        }

        if next == Some('/') {
            match self.peek2() {
                Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                    return true;
                }
                Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(), self.peek2()) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => {
                                self.advance();
                            }
                            (None, _) => break,
                        }
                    }
                    return true;
                }
                _ => {}
            }
        }

        false
    }

    fn lex_integer(&mut self) {
        let location = self.here();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }
        self.emit(text, TokenKind::Integer, location);
    }

    fn lex_word(&mut self) {
        let location = self.here();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.advance();
        }

        let kind = if text == "true" || text == "false" {
            TokenKind::Boolean
        } else if WORD_OPERATORS.contains(&text.as_str()) {
            TokenKind::Operator
        } else if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        self.emit(text, kind, location);
    }

    fn lex_punctuation(&mut self) {
        let location = self.here();
        let c = self.advance().expect("caller verified a char is present");
        self.emit(c.to_string(), TokenKind::Punctuation, location);
    }

    /// `**`, `<=`, `>=`, `==`, `!=`, then the single-char operators. Anything
    /// else is an unrecognized character and is discarded.
    fn lex_operator_or_unknown(&mut self) {
        let location = self.here();
        let first = self.peek().expect("caller verified a char is present");

        let two_char = self.peek2().map(|second| format!("{first}{second}"));
        if let Some(op) = two_char.as_deref() {
            if matches!(op, "**" | "<=" | ">=" | "==" | "!=") {
                self.advance();
                self.advance();
                self.emit(op.to_owned(), TokenKind::Operator, location);
                return;
            }
        }

        if matches!(first, '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=') {
            self.advance();
            self.emit(first.to_string(), TokenKind::Operator, location);
            return;
        }

        // Unknown character: discard.
        self.advance();
    }
}

/// Tokenize `source`. `file` is attached to every token's location and is
/// typically the path the caller read `source` from, or a synthetic name
/// such as `"<stdin>"`.
pub fn tokenize(source: &str, file: &str) -> Vec<Token> {
    Lexer::new(source, file).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens.iter().map(|t| (t.kind, t.text.as_str())).collect()
    }

    #[test]
    fn tokenizes_integer_literal() {
        let tokens = tokenize("42", "t.ez");
        assert_eq!(kinds_and_text(&tokens), vec![(TokenKind::Integer, "42")]);
    }

    #[test]
    fn tokenizes_arithmetic_expression() {
        let tokens = tokenize("1 + 2 * 3", "t.ez");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::Integer, "1"),
                (TokenKind::Operator, "+"),
                (TokenKind::Integer, "2"),
                (TokenKind::Operator, "*"),
                (TokenKind::Integer, "3"),
            ]
        );
    }

    #[test]
    fn recognizes_keywords_booleans_and_word_operators() {
        let tokens = tokenize("if true then 1 else 2", "t.ez");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::Keyword, "if"),
                (TokenKind::Boolean, "true"),
                (TokenKind::Keyword, "then"),
                (TokenKind::Integer, "1"),
                (TokenKind::Keyword, "else"),
                (TokenKind::Integer, "2"),
            ]
        );

        let tokens = tokenize("not x and y or z", "t.ez");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::Operator, "not"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Operator, "and"),
                (TokenKind::Identifier, "y"),
                (TokenKind::Operator, "or"),
                (TokenKind::Identifier, "z"),
            ]
        );
    }

    #[test]
    fn matches_multi_char_operators_greedily() {
        let tokens = tokenize("a <= b != c ** d", "t.ez");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Operator, "<="),
                (TokenKind::Identifier, "b"),
                (TokenKind::Operator, "!="),
                (TokenKind::Identifier, "c"),
                (TokenKind::Operator, "**"),
                (TokenKind::Identifier, "d"),
            ]
        );
    }

    #[test]
    fn drops_comments_and_whitespace() {
        let tokens = tokenize(
            "// leading\nvar x = 1; # trailing\n/* block\ncomment */ x",
            "t.ez",
        );
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::Keyword, "var"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Operator, "="),
                (TokenKind::Integer, "1"),
                (TokenKind::Punctuation, ";"),
                (TokenKind::Identifier, "x"),
            ]
        );
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let tokens = tokenize("1\n  22", "t.ez");
        assert_eq!(tokens[0].location, SourceLocation::new("t.ez", 1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new("t.ez", 2, 3));
    }

    #[test]
    fn drops_unknown_characters() {
        let tokens = tokenize("1 @ 2", "t.ez");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![(TokenKind::Integer, "1"), (TokenKind::Integer, "2")]
        );
    }
}
