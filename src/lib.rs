pub mod ast;
pub mod compiler;
pub mod error;
pub mod filters;
pub mod functions;
pub mod lexer;
pub mod locator;
pub mod parser;
pub mod predicate;
pub mod provider;
pub mod temporal;
pub mod tree;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ComparisonOperator, Expr, ExprKind, Token};
pub use compiler::{compile, parse_filter};
pub use error::{Error, Result};
pub use functions::{FunctionRegistry, register_function, unregister_function};
pub use lexer::{LexError, Lexer, Position};
pub use locator::{CancellationFlag, Locator, Matches};
pub use parser::{ParseError, Parser, parse};
pub use predicate::Predicate;
pub use provider::{ValueProvider, compile_value};
pub use tree::{MemoryNode, Node, TreeNode};
pub use value::Value;
