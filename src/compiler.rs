use crate::ast::Expr;
use crate::error::Result;
use crate::parser;
use crate::predicate::{self, Predicate};
use crate::provider::compile_value;

/// Compiles a parsed filter into a [`Predicate`].
///
/// `And`/`Or` short-circuit left to right; an empty `And` matches every node
/// and an empty `Or` matches none. A bare value in predicate position never
/// matches.
pub fn compile(expr: &Expr) -> Predicate {
    match expr {
        Expr::And(children) => Predicate::all(children.iter().map(compile).collect()),
        Expr::Or(children) => Predicate::any(children.iter().map(compile).collect()),
        Expr::Comparison { left, op, args } => predicate::comparison(
            compile_value(left),
            *op,
            args.iter().map(compile_value).collect(),
        ),
        other => {
            log::warn!("'{}' is not a condition; it matches nothing", other);
            Predicate::never()
        }
    }
}

/// Parses and compiles filter text.
///
/// ```
/// use arbor_query::{parse_filter, tree::MemoryNode};
///
/// let predicate = parse_filter("[title] == 'x' and name() like 'p.*'").unwrap();
/// let node = MemoryNode::builder("page").property("title", "x").build();
/// assert!(predicate.test(&node));
/// ```
pub fn parse_filter(text: &str) -> Result<Predicate> {
    let expr = parser::parse(text)?;
    let predicate = compile(&expr);
    log::debug!("compiled filter {}", expr);
    Ok(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryNode;

    #[test]
    fn and_binds_tighter_than_or() {
        let node = MemoryNode::builder("n")
            .property("a", 1)
            .property("b", 0)
            .property("c", 0)
            .build();
        assert!(parse_filter("[a] == 1 or [b] == 1 and [c] == 1").unwrap().test(&node));
        assert!(!parse_filter("([a] == 1 or [b] == 1) and [c] == 1").unwrap().test(&node));
    }

    #[test]
    fn compiling_twice_agrees() {
        let expr = parser::parse("[a] > 3 or name() == 'n'").unwrap();
        let first = compile(&expr);
        let second = compile(&expr);
        for a in [1, 3, 5] {
            let node = MemoryNode::builder("m").property("a", a).build();
            assert_eq!(first.test(&node), second.test(&node));
        }
    }
}
