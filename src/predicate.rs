//! Compiled predicates and the comparison rules behind each operator.
//!
//! Comparisons never fail. A value that cannot be coerced makes the
//! comparison false (or true for the negated operators), so one malformed
//! property only affects the node it belongs to.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::ast::ComparisonOperator;
use crate::provider::ValueProvider;
use crate::tree::Node;
use crate::value::Value;

/// Boolean test over a node. Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&dyn Node) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Node) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(f))
    }

    /// Matches every node.
    pub fn always() -> Self {
        Predicate::new(|_| true)
    }

    /// Matches no node.
    pub fn never() -> Self {
        Predicate::new(|_| false)
    }

    pub fn test(&self, node: &dyn Node) -> bool {
        (self.0)(node)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::new(move |node| self.test(node) && other.test(node))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::new(move |node| self.test(node) || other.test(node))
    }

    pub fn negate(self) -> Self {
        Predicate::new(move |node| !self.test(node))
    }

    /// Conjunction, short-circuiting left to right. Empty matches everything.
    pub fn all(predicates: Vec<Predicate>) -> Self {
        match predicates.len() {
            0 => Predicate::always(),
            1 => predicates.into_iter().next().unwrap_or_else(Predicate::always),
            _ => Predicate::new(move |node| predicates.iter().all(|p| p.test(node))),
        }
    }

    /// Disjunction, short-circuiting left to right. Empty matches nothing.
    pub fn any(predicates: Vec<Predicate>) -> Self {
        match predicates.len() {
            0 => Predicate::never(),
            1 => predicates.into_iter().next().unwrap_or_else(Predicate::never),
            _ => Predicate::new(move |node| predicates.iter().any(|p| p.test(node))),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Equality with null-marker rules.
///
/// | left        | right       | result |
/// |-------------|-------------|--------|
/// | null        | null/absent | true   |
/// | absent      | null        | true   |
/// | absent      | anything    | false  |
/// | null        | a value     | false  |
///
/// Two present values are compared as numbers (or instants) when both sides
/// coerce, as string sequences when either side is an array, and as text
/// otherwise.
pub fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Null), Some(Value::Null) | None) | (None, Some(Value::Null)) => true,
        (None, _) | (_, None) => false,
        (Some(Value::Null), _) | (_, Some(Value::Null)) => false,
        (Some(l), Some(r)) => {
            if matches!(l, Value::Array(_)) || matches!(r, Value::Array(_)) {
                return l.to_strings() == r.to_strings();
            }
            if let (Some(a), Some(b)) = (l.to_ordinal(), r.to_ordinal()) {
                return a.compare(&b) == Ordering::Equal;
            }
            l.as_string() == r.as_string()
        }
    }
}

/// Ordering for `>`/`<` and friends. `None` when either side is absent, the
/// null marker, or not numeric or temporal.
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    let left = left?.to_ordinal()?;
    let right = right?.to_ordinal()?;
    Some(left.compare(&right))
}

/// Compiles a whole-string regular expression.
pub fn whole_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

fn subject_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        other => Some(other.as_string()),
    }
}

/// Right-hand arguments concatenated into one string sequence.
fn argument_strings(args: &[ValueProvider], node: &dyn Node) -> Option<Vec<String>> {
    let mut out = Vec::new();
    for arg in args {
        out.extend(arg.resolve(node)?.to_strings()?);
    }
    Some(out)
}

fn left_strings(left: &ValueProvider, node: &dyn Node) -> Option<Vec<String>> {
    left.resolve(node)?.to_strings()
}

fn like_predicate(left: ValueProvider, pattern: ValueProvider) -> Predicate {
    if let Some(constant) = pattern.as_constant() {
        if constant.is_null() {
            return Predicate::never();
        }
        let text = constant.as_string();
        return match whole_match_regex(&text) {
            Ok(regex) => Predicate::new(move |node| {
                subject_text(left.resolve(node)).is_some_and(|s| regex.is_match(&s))
            }),
            Err(err) => {
                log::warn!("invalid like pattern '{}': {}", text, err);
                Predicate::never()
            }
        };
    }

    Predicate::new(move |node| {
        let Some(subject) = subject_text(left.resolve(node)) else {
            return false;
        };
        let Some(pattern) = subject_text(pattern.resolve(node)) else {
            return false;
        };
        match whole_match_regex(&pattern) {
            Ok(regex) => regex.is_match(&subject),
            Err(err) => {
                log::debug!("invalid like pattern '{}' on {}: {}", pattern, node.path(), err);
                false
            }
        }
    })
}

/// Builds the predicate for `left op args`.
///
/// Single-valued operators use the first argument and ignore the rest. An
/// empty argument list never matches (negated operators always match).
pub fn comparison(left: ValueProvider, op: ComparisonOperator, mut args: Vec<ValueProvider>) -> Predicate {
    use ComparisonOperator::*;

    if args.is_empty() {
        log::warn!("'{}' has no right-hand argument", op);
        return match op {
            NotEqual | LikeNot | ContainsNot | ContainsNotAny | NotIn => Predicate::always(),
            _ => Predicate::never(),
        };
    }

    if !op.is_multi_valued() && args.len() > 1 {
        log::warn!("'{}' takes one argument; ignoring {} extra", op, args.len() - 1);
        args.truncate(1);
    }

    let ordered = |left: ValueProvider, right: ValueProvider, accept: fn(Ordering) -> bool| {
        Predicate::new(move |node| {
            compare_values(left.resolve(node).as_ref(), right.resolve(node).as_ref())
                .is_some_and(accept)
        })
    };

    match op {
        Equal => {
            let right = args.remove(0);
            Predicate::new(move |node| {
                values_equal(left.resolve(node).as_ref(), right.resolve(node).as_ref())
            })
        }
        NotEqual => comparison(left, Equal, args).negate(),
        GreaterThan => ordered(left, args.remove(0), |o| o == Ordering::Greater),
        GreaterThanOrEqual => ordered(left, args.remove(0), |o| o != Ordering::Less),
        LessThan => ordered(left, args.remove(0), |o| o == Ordering::Less),
        LessThanOrEqual => ordered(left, args.remove(0), |o| o != Ordering::Greater),
        Like => like_predicate(left, args.remove(0)),
        LikeNot => like_predicate(left, args.remove(0)).negate(),
        Contains => Predicate::new(move |node| {
            match (left_strings(&left, node), argument_strings(&args, node)) {
                (Some(haystack), Some(needles)) => needles.iter().all(|n| haystack.contains(n)),
                _ => false,
            }
        }),
        ContainsNot => comparison(left, Contains, args).negate(),
        ContainsAny => Predicate::new(move |node| {
            match (left_strings(&left, node), argument_strings(&args, node)) {
                (Some(haystack), Some(needles)) => needles.iter().any(|n| haystack.contains(n)),
                _ => false,
            }
        }),
        ContainsNotAny => comparison(left, ContainsAny, args).negate(),
        // subset test: every left-hand value must be among the arguments
        In => Predicate::new(move |node| {
            match (left_strings(&left, node), argument_strings(&args, node)) {
                (Some(values), Some(allowed)) => values.iter().all(|v| allowed.contains(v)),
                _ => false,
            }
        }),
        NotIn => comparison(left, In, args).negate(),
    }
}
