//! Ready-made predicates for building filters in code.
//!
//! ```
//! use arbor_query::filters::{child, depth_is_less_than, property};
//!
//! let predicate = property("title")
//!     .is("English")
//!     .and(child("jcr:content").has(property("hidden").is_not(true)))
//!     .and(depth_is_less_than(4));
//! # let _ = predicate;
//! ```
//!
//! Values follow the same comparison rules as the filter language.

use chrono::{DateTime, Utc};

use crate::predicate::{Predicate, values_equal};
use crate::tree::Node;
use crate::value::{Ordinal, Value};

pub struct PropertyFilter {
    name: String,
}

/// Starts a predicate on the property `name`.
pub fn property(name: impl Into<String>) -> PropertyFilter {
    PropertyFilter { name: name.into() }
}

// booleans compare as text, the same way `[name]` surfaces them
fn comparable(value: Value) -> Value {
    match value {
        Value::Boolean(b) => Value::String(b.to_string()),
        other => other,
    }
}

fn lookup(node: &dyn Node, name: &str) -> Option<Value> {
    node.property(name).map(comparable)
}

impl PropertyFilter {
    pub fn is(&self, value: impl Into<Value>) -> Predicate {
        let name = self.name.clone();
        let expected = comparable(value.into());
        Predicate::new(move |node| values_equal(lookup(node, &name).as_ref(), Some(&expected)))
    }

    pub fn is_not(&self, value: impl Into<Value>) -> Predicate {
        self.is(value).negate()
    }

    /// The property equals one of `values`.
    pub fn is_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Predicate {
        let name = self.name.clone();
        let candidates: Vec<Value> = values.into_iter().map(|v| comparable(v.into())).collect();
        Predicate::new(move |node| {
            let actual = lookup(node, &name);
            candidates
                .iter()
                .any(|candidate| values_equal(actual.as_ref(), Some(candidate)))
        })
    }

    /// The (multi-valued) property holds every one of `values`.
    pub fn contains<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Predicate {
        let name = self.name.clone();
        let needles: Vec<String> = values
            .into_iter()
            .map(|v| comparable(v.into()).as_string())
            .collect();
        Predicate::new(move |node| {
            lookup(node, &name)
                .and_then(|value| value.to_strings())
                .is_some_and(|haystack| needles.iter().all(|n| haystack.contains(n)))
        })
    }

    pub fn is_before(&self, when: DateTime<Utc>) -> Predicate {
        self.instant_matches(move |then| then < when)
    }

    pub fn is_after(&self, when: DateTime<Utc>) -> Predicate {
        self.instant_matches(move |then| then > when)
    }

    /// Absent or non-temporal values never match.
    fn instant_matches<F>(&self, accept: F) -> Predicate
    where
        F: Fn(DateTime<Utc>) -> bool + Send + Sync + 'static,
    {
        let name = self.name.clone();
        Predicate::new(move |node| match node.property(&name).and_then(|v| v.to_ordinal()) {
            Some(Ordinal::Instant(then)) => accept(then),
            _ => false,
        })
    }
}

pub struct ChildFilter {
    name: String,
}

/// Starts a predicate on the child node `name`.
pub fn child(name: impl Into<String>) -> ChildFilter {
    ChildFilter { name: name.into() }
}

impl ChildFilter {
    /// The child exists and matches `predicate`.
    pub fn has(&self, predicate: Predicate) -> Predicate {
        let name = self.name.clone();
        Predicate::new(move |node| node.child(&name).is_some_and(|c| predicate.test(c.as_ref())))
    }

    pub fn exists(&self) -> Predicate {
        let name = self.name.clone();
        Predicate::new(move |node| node.child(&name).is_some())
    }
}

/// Number of non-empty segments in a node's path: `/` is 0, `/a/b` is 2.
pub fn depth(node: &dyn Node) -> usize {
    node.path().split('/').filter(|s| !s.is_empty()).count()
}

/// Matches nodes whose [`depth`] is below `max`; handy as traversal control.
pub fn depth_is_less_than(max: usize) -> Predicate {
    Predicate::new(move |node| depth(node) < max)
}
