use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Character offset into the expression text (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub offset: usize,
}

impl Position {
    pub fn new(offset: usize) -> Self {
        Position { offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        LexError {
            message: message.into(),
            position: Position::new(offset),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '=' | '!' | '<' | '>')
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | ':' | '/' | '.' | '-')
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Where the most recently returned token started.
    pub fn token_start(&self) -> Position {
        Position::new(self.token_start)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted string. Backslash escapes the quote character and the
    /// backslash itself; any other escape is kept verbatim so regular
    /// expressions such as `'a\.b'` survive intact.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some(c) if c == quote || c == '\\' => result.push(c),
                        Some(c) => {
                            result.push('\\');
                            result.push(c);
                        }
                        None => {
                            return Err(LexError::new(
                                "Unterminated string: unexpected end of input after backslash",
                                start,
                            ));
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::new(
            format!("Unterminated string: missing closing {}", quote),
            start,
        ))
    }

    fn read_property_path(&mut self) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // '['
        let mut path = String::new();

        while let Some(ch) = self.current_char() {
            if ch == ']' {
                self.advance();
                let trimmed = path.trim();
                if trimmed.is_empty() {
                    return Err(LexError::new("Empty property path", start));
                }
                return Ok(trimmed.to_string());
            }
            path.push(ch);
            self.advance();
        }

        Err(LexError::new("Unterminated property path: missing ']'", start))
    }

    fn read_digits(&mut self, into: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Number class: optional sign, digits, optional fraction, optional exponent.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();

        if let Some(sign @ ('-' | '+')) = self.current_char() {
            number.push(sign);
            self.advance();
        }

        let integral = self.read_digits(&mut number);

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
            number.push('.');
            self.advance();
            self.read_digits(&mut number);
        } else if integral == 0 {
            return Err(LexError::new("Expected digits in number", start));
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            let signed = matches!(self.peek_char(1), Some('-' | '+'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                number.push(e);
                self.advance();
                if signed {
                    if let Some(sign) = self.current_char() {
                        number.push(sign);
                    }
                    self.advance();
                }
                self.read_digits(&mut number);
            }
        }

        if self.current_char().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return Err(LexError::new(
                format!("Malformed number '{}{}'", number, self.read_word()),
                start,
            ));
        }

        Ok(Token::Number(number))
    }

    fn read_operator(&mut self) -> Token {
        let mut op = String::new();
        while let Some(ch) = self.current_char() {
            if is_operator_char(ch) {
                op.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::Operator(op)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('[') => self.read_property_path().map(Token::PropertyPath),
            Some(']') => Err(LexError::new("Unexpected ']' without matching '['", self.position)),
            Some('"') => self.read_string('"').map(Token::String),
            Some('\'') => self.read_string('\'').map(Token::String),
            Some(ch) if is_operator_char(ch) => Ok(self.read_operator()),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some('-' | '+')
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit() || c == '.') =>
            {
                self.read_number()
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let word = self.read_word();

                Ok(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "null" => Token::Null,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    _ => Token::Identifier(word),
                })
            }
            Some(ch) => Err(LexError::new(
                format!("Unexpected character '{}'", ch),
                self.position,
            )),
        }
    }

    /// Lexes the whole input, mostly useful for tests and diagnostics.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or null true false");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_comparison() {
    let mut lexer = Lexer::new("[jcr:content/title] >= 5");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::PropertyPath("jcr:content/title".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Operator(">=".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Number("5".to_string()));
    assert_eq!(lexer.token_start(), Position::new(23));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
