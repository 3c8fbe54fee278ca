#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, kept as written
    ///
    /// The lexer only classifies the text; whether it becomes an integer or a
    /// decimal is decided when the literal is resolved.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.5
    /// 1e3
    /// ```
    Number(String),

    /// Quoted string literal, quotes stripped and escapes resolved
    ///
    /// # Examples
    /// ```text
    /// 'English'
    /// "p.*"
    /// 'it\'s'
    /// ```
    String(String),

    /// Boolean keyword
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// The `null` keyword
    Null,

    // Selectors
    /// Bracketed property path, brackets stripped
    ///
    /// # Examples
    /// ```text
    /// [title]
    /// [jcr:content/jcr:title]
    /// ```
    PropertyPath(String),

    /// Bare word
    ///
    /// Either a function name (when followed by `(`), part of a worded
    /// comparison operator (`is`, `not`, `greater`, ...), or a bare property
    /// path.
    ///
    /// # Examples
    /// ```text
    /// name
    /// jcr:content/created
    /// contains
    /// ```
    Identifier(String),

    // Operators
    /// Run of symbolic operator characters
    ///
    /// The lexer does not judge the run; the parser resolves it against the
    /// operator table and reports unknown runs such as `=<`.
    ///
    /// # Examples
    /// ```text
    /// ==
    /// !=
    /// >=
    /// ```
    Operator(String),

    // Logical
    /// Logical AND (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// [a] == 'x' and [b] > 5
    /// ```
    And,

    /// Logical OR (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// [a] == 'x' or [a] == 'y'
    /// ```
    Or,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma separating arguments
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Short human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string '{}'", s),
            Token::Boolean(b) => format!("'{}'", b),
            Token::Null => "'null'".to_string(),
            Token::PropertyPath(p) => format!("property [{}]", p),
            Token::Identifier(name) => format!("'{}'", name),
            Token::Operator(op) => format!("operator '{}'", op),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
