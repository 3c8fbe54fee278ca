//! # Arbor Filter Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the arbor filter
//! language, a small read-only language for selecting nodes out of a
//! hierarchical, property-bearing tree (a page tree, a resource tree, a
//! directory of documents).
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (logic, comparisons, selectors, literals)
//! - **[operators]** - Comparison operators and their token table
//!
//! ## Quick Start
//!
//! ```text
//! [jcr:content/jcr:title] == 'English' and name() like 'test.*'
//! ```
//!
//! This filter keeps nodes whose `jcr:content/jcr:title` property is
//! `English` and whose own name starts with `test`.
//!
//! ## Core Concepts
//!
//! ### Precedence
//!
//! `or` binds loosest, then `and`, then parenthesised groups and single
//! comparisons:
//!
//! ```text
//! [a] == 1 or [b] == 2 and [c] == 3      // [a] == 1 or ([b] == 2 and [c] == 3)
//! ```
//!
//! ### Selectors
//!
//! - **Property** `[path/to/prop]` - value looked up on the node under test
//! - **Function** `name()`, `path()`, `date(...)` - computed values
//!
//! A bare word such as `title` in selector position is read as a property path.
//!
//! ### Operators
//!
//! Symbolic forms (`==`, `!=`, `>`, `>=`, `<`, `<=`) and worded forms
//! (`is`, `is not`, `greater than`, `less than`, `like`, `not like`,
//! `contains`, `contains not`, `contains any`, `contains not any`, `in`,
//! `not in`). See [`ComparisonOperator`].
//!
//! ## Examples
//!
//! ### Null checks
//!
//! ```text
//! [jcr:content/foo] == null
//! ```
//!
//! ### Dates
//!
//! ```text
//! [created] < date('2013-08-08T16:32:59.000+02:00')
//! [created] < date('2013-08-08', 'yyyy-MM-dd')
//! ```
//!
//! ### Multi-valued comparisons
//!
//! ```text
//! [tags] contains any 'news', 'blog'
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;

pub use tokens::Token;
pub use expressions::{Expr, ExprKind};
pub use operators::ComparisonOperator;
