//! Evaluate expressions against a JSON context document

use super::{json_to_value, value_to_json, CliError};
use crate::{parse_expression, EvalContext, MapScope};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON object providing variable bindings
    pub context: Option<String>,
    /// Enable the whitespace-sensitive filter call form
    pub filter_mode: bool,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug)]
pub enum EvalOutcome {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Parse one expression, requiring it to consume the whole input. A filter
/// mode parse may stop at its `}}` close marker.
fn parse_whole(expression: &str, filter_mode: bool) -> Result<crate::Expr, CliError> {
    let (expr, rest) = parse_expression(expression, filter_mode)?;
    let rest = rest.trim();
    if !rest.is_empty() && !(filter_mode && rest == "}}") {
        return Err(CliError::TrailingInput(rest.to_string()));
    }
    Ok(expr)
}

/// Execute an eval operation
pub fn execute_eval(options: &EvalOptions) -> Result<EvalOutcome, CliError> {
    let expr = parse_whole(&options.expression, options.filter_mode)?;

    if options.syntax_only {
        return Ok(EvalOutcome::SyntaxValid);
    }

    let mut scope = MapScope::new();
    if let Some(context) = &options.context {
        let document: serde_json::Value = serde_json::from_str(context)?;
        match document {
            serde_json::Value::Object(entries) => {
                for (name, value) in entries {
                    scope.bind(name, json_to_value(value));
                }
            }
            other => {
                return Err(CliError::ContextNotObject(json_kind(&other).to_string()))
            }
        }
    }

    let ctx = EvalContext::new(&scope);
    let result = expr.evaluate(&ctx)?;
    Ok(EvalOutcome::Success(value_to_json(result)))
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
