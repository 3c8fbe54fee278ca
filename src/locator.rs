//! Tree traversal.
//!
//! A [`Locator`] walks the tree below a start node with an explicit stack.
//! Children are pushed in their natural order, so among siblings the last
//! child is visited first:
//!
//! ```text
//! A                 visit order: A, D, B, C
//! ├── B
//! │   └── C
//! └── D
//! ```
//!
//! The traversal-control predicate decides which children are pushed at all;
//! it is never applied to the start node.

use std::iter::FusedIterator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::compiler::parse_filter;
use crate::error::{Error, Result};
use crate::predicate::Predicate;
use crate::tree::TreeNode;

/// Shared stop flag, checked before each node is taken off the stack.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

fn non_negative(name: &str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(Error::InvalidArgument(format!(
            "{} may not be negative (got {})",
            name, value
        )));
    }
    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}

/// Traversal configuration. Reusable: every locate call starts afresh.
///
/// ```
/// use arbor_query::{Locator, tree::{MemoryNode, Node}};
/// use serde_json::json;
///
/// let root = MemoryNode::from_json("A", &json!({
///     "title": "x",
///     "B": { "title": "y" },
///     "C": { "title": "x" }
/// }));
///
/// let found = Locator::start_from(root).locate_expr("[title] == 'x'").unwrap();
/// let paths: Vec<&str> = found.iter().map(|n| n.path()).collect();
/// assert_eq!(paths, ["/A", "/A/C"]);
/// ```
#[derive(Clone)]
pub struct Locator<N: TreeNode> {
    start: N,
    traversal_control: Predicate,
    skip: usize,
    limit: usize,
    cancellation: Option<CancellationFlag>,
}

impl<N: TreeNode> Locator<N> {
    pub fn start_from(start: N) -> Self {
        Locator {
            start,
            traversal_control: Predicate::always(),
            skip: 0,
            limit: usize::MAX,
            cancellation: None,
        }
    }

    /// Only children accepted by `condition` are descended into.
    pub fn traversal_control(mut self, condition: Predicate) -> Self {
        self.traversal_control = condition;
        self
    }

    /// [`traversal_control`](Self::traversal_control) from filter text.
    pub fn traversal_control_expr(self, condition: &str) -> Result<Self> {
        let predicate = parse_filter(condition)?;
        Ok(self.traversal_control(predicate))
    }

    /// Returns at most `number` matches, starting with the first.
    pub fn limit(mut self, number: i64) -> Result<Self> {
        self.limit = non_negative("limit", number)?;
        self.skip = 0;
        Ok(self)
    }

    /// Skips `start` matches, then returns at most `number`.
    pub fn range(mut self, start: i64, number: i64) -> Result<Self> {
        self.skip = non_negative("start of range", start)?;
        self.limit = non_negative("limit", number)?;
        Ok(self)
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Collects every match in traversal order.
    pub fn locate(&self, condition: &Predicate) -> Vec<N> {
        self.iter(condition).collect()
    }

    /// Parses, compiles and runs `condition`.
    pub fn locate_expr(&self, condition: &str) -> Result<Vec<N>> {
        let predicate = parse_filter(condition)?;
        Ok(self.locate(&predicate))
    }

    /// Hands every match to `callback` instead of collecting.
    pub fn for_each<F>(&self, condition: &Predicate, callback: F)
    where
        F: FnMut(N),
    {
        self.iter(condition).for_each(callback);
    }

    /// Lazy matches. Work happens only as the iterator is advanced.
    pub fn iter(&self, condition: &Predicate) -> Matches<N> {
        Matches {
            state: State::Ready,
            start: Some(self.start.clone()),
            stack: Vec::new(),
            unexpanded: None,
            condition: condition.clone(),
            traversal_control: self.traversal_control.clone(),
            skip: self.skip,
            end: self.skip.saturating_add(self.limit),
            matched: 0,
            visited: 0,
            cancellation: self.cancellation.clone(),
        }
    }

    /// Every node reachable under traversal control, in traversal order.
    ///
    /// Skip and limit do not apply; use iterator adapters instead.
    pub fn stream(&self) -> Matches<N> {
        let mut all = self.iter(&Predicate::always());
        all.skip = 0;
        all.end = usize::MAX;
        all
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Traversing,
    Done,
}

/// Iterator over matches; see [`Locator::iter`].
pub struct Matches<N: TreeNode> {
    state: State,
    start: Option<N>,
    stack: Vec<N>,
    // emitted node whose children are pushed on the next pull
    unexpanded: Option<N>,
    condition: Predicate,
    traversal_control: Predicate,
    skip: usize,
    end: usize,
    matched: usize,
    visited: usize,
    cancellation: Option<CancellationFlag>,
}

impl<N: TreeNode> Matches<N> {
    fn expand(&mut self, node: &N) {
        for child in node.children() {
            if self.traversal_control.test(&child) {
                self.stack.push(child);
            }
        }
    }

    fn finish(&mut self, reason: &str) {
        self.state = State::Done;
        self.stack.clear();
        self.unexpanded = None;
        log::debug!(
            "traversal finished ({}): visited {}, matched {}",
            reason,
            self.visited,
            self.matched
        );
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }
}

impl<N: TreeNode> Iterator for Matches<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        match self.state {
            State::Done => return None,
            State::Ready => {
                self.state = State::Traversing;
                if let Some(start) = self.start.take() {
                    log::debug!(
                        "traversal from {} started (skip {}, end {})",
                        start.path(),
                        self.skip,
                        self.end
                    );
                    self.stack.push(start);
                }
            }
            State::Traversing => {}
        }

        if self.matched >= self.end {
            self.finish("limit reached");
            return None;
        }
        if let Some(node) = self.unexpanded.take() {
            self.expand(&node);
        }

        loop {
            if self.is_cancelled() {
                self.finish("cancelled");
                return None;
            }
            let Some(node) = self.stack.pop() else {
                self.finish("exhausted");
                return None;
            };
            self.visited += 1;

            if self.condition.test(&node) {
                self.matched += 1;
                if self.matched > self.skip {
                    log::trace!("match #{}: {}", self.matched, node.path());
                    self.unexpanded = Some(node.clone());
                    return Some(node);
                }
            }
            self.expand(&node);
        }
    }
}

impl<N: TreeNode> FusedIterator for Matches<N> {}
