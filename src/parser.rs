use crate::{
    ast::{ComparisonOperator, Expr, Token, operators::OPERATOR_WORDS},
    lexer::{LexError, Lexer, Position},
};
use std::mem;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Malformed expression text
    #[error("Syntax error at position {position}: {message}")]
    Syntax { message: String, position: Position },

    /// Operator text that is not in the operator table
    #[error("Unknown operator '{token}' at position {position}")]
    UnknownOperator { token: String, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Syntax { position, .. } | ParseError::UnknownOperator { position, .. } => {
                *position
            }
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Syntax {
            message: err.message,
            position: err.position,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn syntax_error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError::Syntax {
            message: message.into(),
            position: self.current_position,
        })
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return self.syntax_error(format!(
                "Expected {}, found {}",
                expected.describe(),
                self.current_token.describe()
            ));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.current_token) == std::mem::discriminant(token)
    }

    fn is_operator_word(&self) -> bool {
        matches!(&self.current_token, Token::Identifier(w) if OPERATOR_WORDS.contains(&w.as_str()))
    }

    /// Operands: literals, `[path]`, `name(args)` and bare property words.
    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::Null)
            }
            // Booleans compare in their text form, as boolean properties do
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Expr::String(b.to_string()))
            }
            Token::PropertyPath(path) => {
                self.advance()?;
                Ok(Expr::Property(path))
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.advance()?;
                    let args = self.parse_function_args()?;
                    Ok(Expr::Function { name, args })
                } else {
                    Ok(Expr::Property(name))
                }
            }
            token => {
                let message = format!("Expected a value or selector, found {}", token.describe());
                self.current_token = token;
                self.syntax_error(message)
            }
        }
    }

    /// Arguments after the opening parenthesis, up to and including `)`.
    fn parse_function_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![];
        if self.check(&Token::RParen) {
            self.advance()?;
            return Ok(args);
        }

        loop {
            args.push(self.parse_operand()?);
            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }

    /// Reads a symbolic operator or a run of operator words and resolves it.
    fn parse_operator(&mut self) -> Result<ComparisonOperator, ParseError> {
        let position = self.current_position;

        let token = match &self.current_token {
            Token::Operator(symbol) => {
                let symbol = symbol.clone();
                self.advance()?;
                symbol
            }
            Token::Identifier(first) if self.is_operator_word() => {
                let mut words = format!(" {}", first);
                self.advance()?;
                // a following word is only taken while it leads towards a
                // table entry, so `[a] is any` compares against `any`
                while let Token::Identifier(word) = &self.current_token {
                    let longer = format!("{} {}", words, word);
                    if !ComparisonOperator::starts_token(&longer) {
                        break;
                    }
                    words = longer;
                    self.advance()?;
                }
                words
            }
            other => {
                return self.syntax_error(format!(
                    "Expected comparison operator, found {}",
                    other.describe()
                ));
            }
        };

        ComparisonOperator::from_token(&token).ok_or_else(|| ParseError::UnknownOperator {
            token: token.trim_start().to_string(),
            position,
        })
    }

    /// Comparison := Operand Operator Argument (',' Argument)*
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_operand()?;
        let op = self.parse_operator()?;

        if matches!(
            self.current_token,
            Token::Eof | Token::RParen | Token::And | Token::Or | Token::Comma
        ) {
            return self.syntax_error(format!("Missing right-hand argument for '{}'", op));
        }

        let mut args = vec![self.parse_operand()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            args.push(self.parse_operand()?);
        }

        Ok(Expr::comparison(left, op, args))
    }

    /// Term := '(' Or ')' | Comparison
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::LParen) {
            self.advance()?;
            let expr = self.parse_or()?;
            self.expect(Token::RParen)?;
            return Ok(expr);
        }
        self.parse_comparison()
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut terms = vec![self.parse_term()?];

        while self.check(&Token::And) {
            self.advance()?;
            terms.push(self.parse_term()?);
        }

        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::And(terms)
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut terms = vec![self.parse_and()?];

        while self.check(&Token::Or) {
            self.advance()?;
            terms.push(self.parse_and()?);
        }

        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Or(terms)
        })
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parses a complete filter; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return self.syntax_error(format!(
                "Unexpected {} after end of expression",
                self.current_token.describe()
            ));
        }
        Ok(expr)
    }
}

/// Parses filter text into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let expr = Parser::new(Lexer::new(input))?.parse()?;
    log::debug!("parsed filter {:?} into {}", input, expr);
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_child_groups_collapse() {
        let expr = parse("([a] == 1)").unwrap();
        assert!(matches!(expr, Expr::Comparison { .. }));
    }

    #[test]
    fn unknown_worded_operator_reports_words() {
        let err = parse("[a] is like 'x'").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOperator {
                token: "is like".to_string(),
                position: Position::new(4),
            }
        );
    }
}
