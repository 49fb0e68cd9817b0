use crate::ast::{Expr, Property};
use crate::compare::{Comparisons, StandardComparisons};
use crate::num::{DecimalNumerics, Numerics};
use crate::scope::Scope;
use crate::value::Value;
use std::collections::HashMap;

/// Errors that can occur during expression evaluation.
///
/// Errors raised by [`Scope`], [`Numerics`], and [`Comparisons`]
/// implementations propagate through evaluation unchanged.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    TypeError(String),

    /// Invalid member access
    AccessError(String),

    /// Object key that is neither a literal nor an identifier
    InvalidKey(String),

    /// Call to a filter the scope does not know
    UndefinedFilter(String),

    /// Integer division or modulo by zero
    DivisionByZero,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::AccessError(msg) => write!(f, "Access error: {}", msg),
            EvalError::InvalidKey(msg) => write!(f, "Invalid object key: {}", msg),
            EvalError::UndefinedFilter(name) => write!(f, "Undefined filter: '{}'", name),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluation context: the variable scope plus the numeric and comparison
/// services the operators delegate to.
///
/// [`EvalContext::new`] wires in the default services; use
/// [`EvalContext::with_services`] to substitute either one.
pub struct EvalContext<'a> {
    pub scope: &'a dyn Scope,
    pub numerics: &'a dyn Numerics,
    pub compare: &'a dyn Comparisons,
}

impl<'a> EvalContext<'a> {
    pub fn new(scope: &'a dyn Scope) -> Self {
        EvalContext {
            scope,
            numerics: &DecimalNumerics,
            compare: &StandardComparisons,
        }
    }

    pub fn with_services(
        scope: &'a dyn Scope,
        numerics: &'a dyn Numerics,
        compare: &'a dyn Comparisons,
    ) -> Self {
        EvalContext {
            scope,
            numerics,
            compare,
        }
    }
}

/// The mapping key an object-literal property evaluates under.
///
/// Mirrors the parser's key restriction at evaluation time: anything other
/// than a literal or identifier is rejected here because [`Property`] values
/// can also be constructed directly.
pub fn object_key(expr: &Expr) -> Result<String, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.as_string()),
        Expr::Identifier(name) => Ok(name.clone()),
        other => Err(EvalError::InvalidKey(format!(
            "expected a literal or identifier but was '{}'",
            other
        ))),
    }
}

impl Expr {
    /// Computes the node's runtime value against the given context.
    ///
    /// Identifier resolution, member access, and call dispatch are delegated
    /// to the context's [`Scope`]; numeric and comparison work to its
    /// services. Operator nodes evaluate both operands before applying the
    /// operator, including `&&` and `||` (no short-circuiting).
    pub fn evaluate(&self, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Null => Ok(Value::Null),
            Expr::Identifier(name) => Ok(ctx.scope.lookup(name)),
            Expr::Array(elements) => {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(element.evaluate(ctx)?);
                }
                Ok(Value::Array(out))
            }
            Expr::Object(properties) => {
                let mut out = HashMap::with_capacity(properties.len());
                // declaration order; later duplicate keys win
                for Property { key, value, .. } in properties {
                    let key = object_key(key)?;
                    let value = value.evaluate(ctx)?;
                    out.insert(key, value);
                }
                Ok(Value::Object(out))
            }
            Expr::Member {
                object,
                property,
                computed,
            } => ctx.scope.resolve_member(object, property, *computed, ctx),
            Expr::Call { name, args } => ctx.scope.invoke_filter(name, args, ctx),
            Expr::Unary { op, operand } => {
                let value = operand.evaluate(ctx)?;
                op.apply(&value, ctx)
            }
            Expr::Binary { op, left, right } => {
                let lhs = left.evaluate(ctx)?;
                let rhs = right.evaluate(ctx)?;
                op.apply(&lhs, &rhs, ctx)
            }
        }
    }
}
