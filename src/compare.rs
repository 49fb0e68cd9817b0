use crate::evaluator::EvalError;
use crate::value::Value;

/// Comparison and truthiness service consumed by the relational, equality,
/// and logical operators.
///
/// The loose and strict equality operators both call [`equals`] /
/// [`not_equals`]; implementations that want type-sensitive strict variants
/// can diverge behind this trait without touching the evaluator.
///
/// [`equals`]: Comparisons::equals
/// [`not_equals`]: Comparisons::not_equals
pub trait Comparisons {
    fn greater_than(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;
    fn greater_than_equal(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;
    fn less_than(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;
    fn less_than_equal(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;
    fn equals(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;
    fn not_equals(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError>;

    /// Truthiness predicate used by `&&`, `||`, and unary `!`.
    fn is_true(&self, value: &Value) -> bool;
}

/// Default [`Comparisons`] implementation: relational operators require
/// numeric operands (integers compare exactly, mixed pairs through f64),
/// equality is structural, truthiness follows [`Value::is_truthy`].
pub struct StandardComparisons;

fn floats(lhs: &Value, rhs: &Value, token: &str) -> Result<(f64, f64), EvalError> {
    match (lhs.as_float(), rhs.as_float()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvalError::TypeError(format!(
            "Cannot compare {} {} {} (comparison requires numeric types)",
            lhs.type_name(),
            token,
            rhs.type_name()
        ))),
    }
}

impl Comparisons for StandardComparisons {
    fn greater_than(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
            return Ok(a > b);
        }
        let (a, b) = floats(lhs, rhs, ">")?;
        Ok(a > b)
    }

    fn greater_than_equal(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
            return Ok(a >= b);
        }
        let (a, b) = floats(lhs, rhs, ">=")?;
        Ok(a >= b)
    }

    fn less_than(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
            return Ok(a < b);
        }
        let (a, b) = floats(lhs, rhs, "<")?;
        Ok(a < b)
    }

    fn less_than_equal(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
            return Ok(a <= b);
        }
        let (a, b) = floats(lhs, rhs, "<=")?;
        Ok(a <= b)
    }

    fn equals(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        Ok(lhs == rhs)
    }

    fn not_equals(&self, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
        Ok(lhs != rhs)
    }

    fn is_true(&self, value: &Value) -> bool {
        value.is_truthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relational_comparisons() {
        let c = StandardComparisons;
        assert!(c.greater_than(&Value::Integer(3), &Value::Integer(2)).unwrap());
        assert!(c.less_than(&Value::Integer(2), &Value::Float(2.5)).unwrap());
        assert!(c.greater_than_equal(&Value::Float(2.0), &Value::Integer(2)).unwrap());
        assert!(c
            .greater_than(&Value::String("a".into()), &Value::Integer(1))
            .is_err());
    }

    #[test]
    fn equality_is_structural() {
        let c = StandardComparisons;
        assert!(c
            .equals(&Value::String("x".into()), &Value::String("x".into()))
            .unwrap());
        assert!(c.not_equals(&Value::Integer(1), &Value::Integer(2)).unwrap());
    }

    #[test]
    fn truthiness() {
        let c = StandardComparisons;
        assert!(!c.is_true(&Value::Null));
        assert!(!c.is_true(&Value::String(String::new())));
        assert!(c.is_true(&Value::Integer(1)));
        assert!(c.is_true(&Value::Boolean(true)));
    }
}
