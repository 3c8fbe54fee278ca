use std::fmt;

/// Comparison operators.
///
/// Worded aliases are stored with a leading space (`" is not"`), which is how
/// the parser canonicalises a run of operator words before looking it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equal (`==`, `is`)
    Equal,
    /// Not equal (`!=`, `is not`)
    NotEqual,
    /// Greater than (`>`, `greater than`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,
    /// Less than (`<`, `less than`)
    LessThan,
    /// Less than or equal (`<=`)
    LessThanOrEqual,
    /// Whole-string regular expression match (`like`)
    Like,
    /// Negated `like` (`like not`, `not like`)
    LikeNot,
    /// Left side holds every right-hand value (`contains`)
    Contains,
    /// Negated `contains` (`contains not`)
    ContainsNot,
    /// Left side holds at least one right-hand value (`contains any`)
    ContainsAny,
    /// Negated `contains any` (`contains not any`)
    ContainsNotAny,
    /// Every left-hand value appears on the right side (`in`)
    ///
    /// This is a subset test, not SQL-style single-value membership:
    /// `[tags] in 'a', 'b'` holds when *all* of `tags` are among `a`, `b`.
    In,
    /// Negated `in` (`not in`)
    NotIn,
}

/// Operator token table: every accepted spelling and the operator it denotes.
const TOKEN_TABLE: &[(&str, ComparisonOperator)] = &[
    ("==", ComparisonOperator::Equal),
    (" is", ComparisonOperator::Equal),
    ("!=", ComparisonOperator::NotEqual),
    (" is not", ComparisonOperator::NotEqual),
    (">", ComparisonOperator::GreaterThan),
    (" greater than", ComparisonOperator::GreaterThan),
    (">=", ComparisonOperator::GreaterThanOrEqual),
    ("<", ComparisonOperator::LessThan),
    (" less than", ComparisonOperator::LessThan),
    ("<=", ComparisonOperator::LessThanOrEqual),
    (" like", ComparisonOperator::Like),
    (" like not", ComparisonOperator::LikeNot),
    (" not like", ComparisonOperator::LikeNot),
    (" contains", ComparisonOperator::Contains),
    (" contains not", ComparisonOperator::ContainsNot),
    (" contains any", ComparisonOperator::ContainsAny),
    (" contains not any", ComparisonOperator::ContainsNotAny),
    (" in", ComparisonOperator::In),
    (" not in", ComparisonOperator::NotIn),
];

/// Words that may take part in a worded operator.
pub const OPERATOR_WORDS: &[&str] = &[
    "is", "not", "greater", "less", "than", "like", "contains", "any", "in",
];

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 14] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEqual,
        ComparisonOperator::Like,
        ComparisonOperator::LikeNot,
        ComparisonOperator::Contains,
        ComparisonOperator::ContainsNot,
        ComparisonOperator::ContainsAny,
        ComparisonOperator::ContainsNotAny,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
    ];

    /// Resolves a canonical operator token (`"=="`, `" not in"`).
    ///
    /// Returns `None` for anything outside the table; callers turn that into
    /// an unknown-operator error.
    pub fn from_token(token: &str) -> Option<Self> {
        TOKEN_TABLE
            .iter()
            .find(|(spelling, _)| *spelling == token)
            .map(|(_, op)| *op)
    }

    /// True when `words` is a worded spelling or the leading words of one.
    pub fn starts_token(words: &str) -> bool {
        TOKEN_TABLE.iter().any(|(spelling, _)| {
            spelling
                .strip_prefix(words)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        })
    }

    /// All spellings of this operator, canonical form first.
    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        TOKEN_TABLE
            .iter()
            .filter(move |(_, op)| *op == self)
            .map(|(spelling, _)| *spelling)
    }

    /// Spelling used when printing an expression back out.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Like => "like",
            ComparisonOperator::LikeNot => "like not",
            ComparisonOperator::Contains => "contains",
            ComparisonOperator::ContainsNot => "contains not",
            ComparisonOperator::ContainsAny => "contains any",
            ComparisonOperator::ContainsNotAny => "contains not any",
            ComparisonOperator::In => "in",
            ComparisonOperator::NotIn => "not in",
        }
    }

    /// True for operators that compare against a list of right-hand values.
    pub fn is_multi_valued(self) -> bool {
        matches!(
            self,
            ComparisonOperator::Contains
                | ComparisonOperator::ContainsNot
                | ComparisonOperator::ContainsAny
                | ComparisonOperator::ContainsNotAny
                | ComparisonOperator::In
                | ComparisonOperator::NotIn
        )
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_has_a_token() {
        for op in ComparisonOperator::ALL {
            let first = op.tokens().next();
            assert!(first.is_some(), "{:?} has no spelling", op);
            assert_eq!(ComparisonOperator::from_token(first.unwrap_or_default()), Some(op));
        }
    }

    #[test]
    fn unknown_tokens_do_not_resolve() {
        assert_eq!(ComparisonOperator::from_token("="), None);
        assert_eq!(ComparisonOperator::from_token("is"), None);
        assert_eq!(ComparisonOperator::from_token(" is like"), None);
    }

    #[test]
    fn word_prefixes() {
        assert!(ComparisonOperator::starts_token(" contains not"));
        assert!(ComparisonOperator::starts_token(" greater"));
        assert!(!ComparisonOperator::starts_token(" is any"));
        assert!(!ComparisonOperator::starts_token(" contain"));
    }
}
