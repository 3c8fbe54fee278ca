use std::fmt;
use std::sync::Arc;

use crate::ast::Expr;
use crate::functions;
use crate::tree::Node;
use crate::value::{Value, parse_number};

pub type Resolver = Arc<dyn Fn(&dyn Node) -> Option<Value> + Send + Sync>;

/// A deferred value lookup against a node.
///
/// `None` from [`resolve`](Self::resolve) means the value is absent, which
/// is different from resolving to [`Value::Null`].
#[derive(Clone)]
pub enum ValueProvider {
    /// Same value for every node; literals and folded function calls
    Constant(Value),
    /// Computed per node
    Dynamic(Resolver),
}

impl ValueProvider {
    pub fn constant(value: impl Into<Value>) -> Self {
        ValueProvider::Constant(value.into())
    }

    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&dyn Node) -> Option<Value> + Send + Sync + 'static,
    {
        ValueProvider::Dynamic(Arc::new(f))
    }

    pub fn null() -> Self {
        ValueProvider::Constant(Value::Null)
    }

    pub fn resolve(&self, node: &dyn Node) -> Option<Value> {
        match self {
            ValueProvider::Constant(value) => Some(value.clone()),
            ValueProvider::Dynamic(f) => f(node),
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            ValueProvider::Constant(value) => Some(value),
            ValueProvider::Dynamic(_) => None,
        }
    }
}

impl fmt::Debug for ValueProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueProvider::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ValueProvider::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Booleans are compared in text form, including inside arrays.
fn surface(value: Value) -> Value {
    match value {
        Value::Boolean(b) => Value::String(b.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(surface).collect()),
        other => other,
    }
}

/// Compiles a selector or literal node into a [`ValueProvider`].
///
/// - `[path]` looks the property up on the node under test
/// - numbers become integers or decimals, or stay text if neither parses
/// - `null` is the null marker
/// - function calls go through [`functions::resolve_function`]
///
/// Logic and comparison nodes have no value and resolve to the null marker.
pub fn compile_value(expr: &Expr) -> ValueProvider {
    match expr {
        Expr::Property(path) => {
            let path = path.clone();
            ValueProvider::dynamic(move |node| node.property(&path).map(surface))
        }
        Expr::String(s) => ValueProvider::Constant(Value::String(s.clone())),
        Expr::Number(text) => ValueProvider::Constant(
            parse_number(text).unwrap_or_else(|| Value::String(text.clone())),
        ),
        Expr::Null => ValueProvider::null(),
        Expr::Function { name, args } => {
            let args = args.iter().map(compile_value).collect();
            functions::resolve_function(name, args)
        }
        Expr::And(_) | Expr::Or(_) | Expr::Comparison { .. } => {
            log::warn!("'{}' used where a value is expected; treating it as null", expr);
            ValueProvider::null()
        }
    }
}
