//! Run filter expressions against JSON input

use super::{CliError, json_to_tree, nodes_to_json};
use crate::{Locator, compile, parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression
    pub expression: String,
    /// JSON input string
    pub input: Option<String>,
    /// Path of the node to start from (default: the document root)
    pub start: Option<String>,
    /// Maximum number of matches
    pub limit: Option<i64>,
    /// Number of matches to skip
    pub offset: Option<i64>,
    /// Traversal-control expression
    pub traverse: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Paths of the matched nodes
    Success(serde_json::Value),
}

/// Execute an arbor check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = parser::parse(&options.expression)?;
    let traverse = options.traverse.as_deref().map(parser::parse).transpose()?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let root = json_to_tree(&json_value);

    let start = match &options.start {
        Some(path) => root
            .find(path)
            .ok_or_else(|| CliError::StartNotFound(path.clone()))?,
        None => root,
    };

    let mut locator = Locator::start_from(start);
    if let Some(control) = &traverse {
        locator = locator.traversal_control(compile(control));
    }
    if options.limit.is_some() || options.offset.is_some() {
        locator = locator.range(options.offset.unwrap_or(0), options.limit.unwrap_or(i64::MAX))?;
    }

    let matches = locator.locate(&compile(&expr));
    Ok(CheckResult::Success(nodes_to_json(&matches)))
}
