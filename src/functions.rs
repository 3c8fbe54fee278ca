//! Filter functions.
//!
//! `name()`, `path()`, `date()` and its alias `instant()` are built in and
//! cannot be overridden. Other names are looked up in a process-wide
//! registry when an expression is compiled; a name that is not registered
//! resolves to the null marker instead of failing the compile.
//!
//! The registry sits behind an `RwLock`. Registration is meant to happen
//! up front; compiles only take the read lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use once_cell::sync::Lazy;

use crate::provider::ValueProvider;
use crate::temporal;
use crate::value::Value;

/// Builds a provider from the compiled arguments of a call.
pub type FunctionFactory = Arc<dyn Fn(Vec<ValueProvider>) -> ValueProvider + Send + Sync>;

pub const BUILTIN_FUNCTIONS: &[&str] = &["name", "path", "date", "instant"];

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionFactory>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing any previous factory. Returns the old one.
    pub fn register(&mut self, name: &str, factory: FunctionFactory) -> Option<FunctionFactory> {
        self.functions.insert(name.to_string(), factory)
    }

    pub fn unregister(&mut self, name: &str) -> Option<FunctionFactory> {
        self.functions.remove(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<FunctionFactory> {
        self.functions.get(name).cloned()
    }

    pub fn call(&self, name: &str, args: Vec<ValueProvider>) -> Option<ValueProvider> {
        self.functions.get(name).map(|factory| factory(args))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }
}

static REGISTRY: Lazy<RwLock<FunctionRegistry>> = Lazy::new(|| RwLock::new(FunctionRegistry::new()));

/// Makes `name(...)` available to expressions compiled from now on.
///
/// Returns `false` for built-in names, which cannot be replaced.
pub fn register_function<F>(name: &str, factory: F) -> bool
where
    F: Fn(Vec<ValueProvider>) -> ValueProvider + Send + Sync + 'static,
{
    if BUILTIN_FUNCTIONS.contains(&name) {
        log::warn!("refusing to register built-in function '{}'", name);
        return false;
    }
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if registry.register(name, Arc::new(factory)).is_some() {
        log::debug!("replaced function '{}'", name);
    }
    true
}

/// Removes a registered function. Already compiled predicates keep working.
pub fn unregister_function(name: &str) -> bool {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.unregister(name).is_some()
}

pub fn is_registered(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
        || REGISTRY
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .has_function(name)
}

/// Resolves a call to a provider. Built-ins come first, then the registry.
pub fn resolve_function(name: &str, args: Vec<ValueProvider>) -> ValueProvider {
    match name {
        "name" => {
            warn_ignored(name, &args, 0);
            ValueProvider::dynamic(|node| Some(Value::String(node.name().to_string())))
        }
        "path" => {
            warn_ignored(name, &args, 0);
            ValueProvider::dynamic(|node| Some(Value::String(node.path().to_string())))
        }
        "date" | "instant" => instant_provider(name, args),
        _ => {
            // the guard is released before the factory runs
            let factory = REGISTRY.read().unwrap_or_else(|e| e.into_inner()).get(name);
            match factory {
                Some(factory) => factory(args),
                None => {
                    log::debug!("function '{}' is not registered; it resolves to null", name);
                    ValueProvider::null()
                }
            }
        }
    }
}

fn warn_ignored(name: &str, args: &[ValueProvider], accepted: usize) {
    if args.len() > accepted {
        log::warn!(
            "{}() takes at most {} argument(s); ignoring {} extra",
            name,
            accepted,
            args.len() - accepted
        );
    }
}

fn parse_instant(text: Option<Value>, format: Option<Option<Value>>) -> Value {
    let text = match text {
        Some(Value::Instant(t)) => return Value::Instant(t),
        Some(Value::Null) | None => return Value::Null,
        Some(value) => value.as_string(),
    };
    let parsed = match format {
        None => temporal::parse_offset_date_time(&text),
        Some(Some(format)) if !format.is_null() => {
            temporal::parse_with_format(&text, &format.as_string())
        }
        Some(_) => None,
    };
    parsed.map(Value::Instant).unwrap_or(Value::Null)
}

/// `date()`: now; `date(text)`: ISO-8601 offset date-time; `date(text, format)`.
///
/// Text that does not parse gives the null marker.
fn instant_provider(name: &str, mut args: Vec<ValueProvider>) -> ValueProvider {
    warn_ignored(name, &args, 2);
    args.truncate(2);

    match args.len() {
        0 => ValueProvider::dynamic(|_| Some(Value::Instant(Utc::now()))),
        1 => {
            let text = args.remove(0);
            if let Some(value) = text.as_constant() {
                return ValueProvider::Constant(parse_instant(Some(value.clone()), None));
            }
            ValueProvider::dynamic(move |node| Some(parse_instant(text.resolve(node), None)))
        }
        _ => {
            let format = args.remove(1);
            let text = args.remove(0);
            if let (Some(t), Some(f)) = (text.as_constant(), format.as_constant()) {
                return ValueProvider::Constant(parse_instant(
                    Some(t.clone()),
                    Some(Some(f.clone())),
                ));
            }
            ValueProvider::dynamic(move |node| {
                Some(parse_instant(text.resolve(node), Some(format.resolve(node))))
            })
        }
    }
}
