use crate::ast::Expr;
use crate::evaluator::{EvalContext, EvalError};
use crate::value::Value;
use std::collections::HashMap;

/// The external binding context an expression evaluates against.
///
/// The core hands this trait the *shapes* it parsed: names for identifier
/// lookups, (object, property, computed) triples for member expressions,
/// and (filter name, argument nodes) pairs for call expressions. How those
/// shapes resolve — including the policy for missing names — belongs to the
/// implementation, not to the evaluator.
pub trait Scope {
    /// Resolve a variable name.
    fn lookup(&self, name: &str) -> Value;

    /// Resolve a member-access shape. `computed` is false for dotted access
    /// (property is an identifier) and true for bracketed access (property
    /// is an arbitrary sub-expression).
    fn resolve_member(
        &self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError>;

    /// Dispatch a call shape to a named filter.
    fn invoke_filter(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &EvalContext,
    ) -> Result<Value, EvalError>;
}

/// HashMap-backed reference [`Scope`].
///
/// Missing names resolve to [`Value::Null`]. Member access follows the
/// data: object values by string key, arrays by integer index (negative
/// counts from the end), absent entries resolve to null. A small builtin
/// filter set (`upper`, `lower`, `trim`, `count`, `matches`) demonstrates
/// call dispatch; anything else is an [`EvalError::UndefinedFilter`].
#[derive(Debug, Clone, Default)]
pub struct MapScope {
    bindings: HashMap<String, Value>,
}

impl MapScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }
}

impl From<HashMap<String, Value>> for MapScope {
    fn from(bindings: HashMap<String, Value>) -> Self {
        MapScope { bindings }
    }
}

fn access(object: &Value, key: &Value) -> Result<Value, EvalError> {
    match (object, key) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Object(map), Value::String(k)) => Ok(map.get(k).cloned().unwrap_or(Value::Null)),
        // integer keys on objects read as string keys
        (Value::Object(map), Value::Integer(n)) => {
            Ok(map.get(&n.to_string()).cloned().unwrap_or(Value::Null))
        }
        (Value::Array(arr), Value::Integer(idx)) => {
            let len = arr.len();
            let index = if *idx < 0 {
                let back = idx.unsigned_abs() as usize;
                if back > len {
                    return Ok(Value::Null);
                }
                len - back
            } else {
                *idx as usize
            };
            Ok(arr.get(index).cloned().unwrap_or(Value::Null))
        }
        (Value::Array(_), k) => Err(EvalError::AccessError(format!(
            "Cannot index an array with {}; arrays take integer indices",
            k.type_name()
        ))),
        (obj, k) => Err(EvalError::AccessError(format!(
            "Cannot access {} with {} key",
            obj.type_name(),
            k.type_name()
        ))),
    }
}

fn expect_args(name: &str, args: &[Value], count: usize) -> Result<(), EvalError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(EvalError::TypeError(format!(
            "Filter '{}' takes {} argument{} but got {}",
            name,
            count,
            if count == 1 { "" } else { "s" },
            args.len()
        )))
    }
}

impl Scope for MapScope {
    fn lookup(&self, name: &str) -> Value {
        self.bindings.get(name).cloned().unwrap_or(Value::Null)
    }

    fn resolve_member(
        &self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        let object_value = object.evaluate(ctx)?;
        let key = if computed {
            property.evaluate(ctx)?
        } else {
            match property {
                Expr::Identifier(name) => Value::String(name.clone()),
                other => {
                    return Err(EvalError::AccessError(format!(
                        "Invalid member property: '{}'",
                        other
                    )))
                }
            }
        };
        access(&object_value, &key)
    }

    fn invoke_filter(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(arg.evaluate(ctx)?);
        }

        match name {
            "upper" => {
                expect_args(name, &values, 1)?;
                Ok(Value::String(values[0].as_string().to_uppercase()))
            }
            "lower" => {
                expect_args(name, &values, 1)?;
                Ok(Value::String(values[0].as_string().to_lowercase()))
            }
            "trim" => {
                expect_args(name, &values, 1)?;
                Ok(Value::String(values[0].as_string().trim().to_string()))
            }
            "count" => {
                expect_args(name, &values, 1)?;
                match &values[0] {
                    Value::Array(arr) => Ok(Value::Integer(arr.len() as i64)),
                    Value::Object(obj) => Ok(Value::Integer(obj.len() as i64)),
                    Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
                    other => Err(EvalError::TypeError(format!(
                        "Filter 'count' takes an array, object, or string, got {}",
                        other.type_name()
                    ))),
                }
            }
            "matches" => {
                expect_args(name, &values, 2)?;
                let text = values[0].as_string();
                let pattern = values[1].as_string();
                let re = regex::Regex::new(&pattern)
                    .map_err(|e| EvalError::TypeError(format!("invalid regex: {e}")))?;
                Ok(Value::Boolean(re.is_match(&text)))
            }
            _ => Err(EvalError::UndefinedFilter(name.to_string())),
        }
    }
}
