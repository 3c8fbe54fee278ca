use std::fmt;

use crate::ast::ComparisonOperator;

/// Abstract Syntax Tree node representing a parsed filter.
///
/// Nodes are immutable once built. Replacing the children of a node goes
/// through [`Expr::with_children`], which returns a new node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Logic
    /// Conjunction of the children, left to right
    ///
    /// An empty `And` matches everything.
    And(Vec<Expr>),

    /// Disjunction of the children, left to right
    ///
    /// An empty `Or` matches nothing.
    Or(Vec<Expr>),

    /// A single comparison
    ///
    /// # Examples
    /// ```text
    /// [title] == 'x'
    /// [tags] contains any 'a', 'b'
    /// ```
    Comparison {
        left: Box<Expr>,
        op: ComparisonOperator,
        args: Vec<Expr>,
    },

    // Selectors
    /// Function call
    ///
    /// # Examples
    /// ```text
    /// name()
    /// date('2013-08-08', 'yyyy-MM-dd')
    /// ```
    Function { name: String, args: Vec<Expr> },

    /// Property path looked up on the node under test
    ///
    /// # Examples
    /// ```text
    /// [jcr:content/created]
    /// ```
    Property(String),

    // Literals
    /// String literal, already unescaped
    String(String),

    /// Numeric literal, kept as written
    Number(String),

    /// The `null` literal
    Null,
}

/// Discriminant of an [`Expr`], handy for assertions and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    And,
    Or,
    Comparison,
    Function,
    Property,
    String,
    Number,
    Null,
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::And(_) => ExprKind::And,
            Expr::Or(_) => ExprKind::Or,
            Expr::Comparison { .. } => ExprKind::Comparison,
            Expr::Function { .. } => ExprKind::Function,
            Expr::Property(_) => ExprKind::Property,
            Expr::String(_) => ExprKind::String,
            Expr::Number(_) => ExprKind::Number,
            Expr::Null => ExprKind::Null,
        }
    }

    /// Builds a comparison node.
    pub fn comparison(left: Expr, op: ComparisonOperator, args: Vec<Expr>) -> Self {
        Expr::Comparison {
            left: Box::new(left),
            op,
            args,
        }
    }

    /// Child list: operands of `And`/`Or`, right-hand arguments of a
    /// comparison, arguments of a function. Leaves have none.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::And(children) | Expr::Or(children) => children,
            Expr::Comparison { args, .. } | Expr::Function { args, .. } => args,
            Expr::Property(_) | Expr::String(_) | Expr::Number(_) | Expr::Null => &[],
        }
    }

    /// Returns a copy of this node with a new child list.
    ///
    /// Leaves have no children and are returned unchanged.
    pub fn with_children(&self, children: Vec<Expr>) -> Expr {
        match self {
            Expr::And(_) => Expr::And(children),
            Expr::Or(_) => Expr::Or(children),
            Expr::Comparison { left, op, .. } => Expr::Comparison {
                left: left.clone(),
                op: *op,
                args: children,
            },
            Expr::Function { name, .. } => Expr::Function {
                name: name.clone(),
                args: children,
            },
            leaf => leaf.clone(),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Prints the expression back in filter syntax. Parsing the output yields an
/// equal tree, except that empty groups have no surface syntax.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(children) => {
                f.write_str("(")?;
                write_list(f, children, " and ")?;
                f.write_str(")")
            }
            Expr::Or(children) => {
                f.write_str("(")?;
                write_list(f, children, " or ")?;
                f.write_str(")")
            }
            Expr::Comparison { left, op, args } => {
                write!(f, "{} {} ", left, op)?;
                write_list(f, args, ", ")
            }
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::Property(path) => write!(f, "[{}]", path),
            Expr::String(s) => {
                let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
                write!(f, "'{}'", escaped)
            }
            Expr::Number(n) => f.write_str(n),
            Expr::Null => f.write_str("null"),
        }
    }
}
