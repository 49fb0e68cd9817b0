use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::evaluator::EvalError;
use crate::value::Value;

/// Numeric coercion service consumed by the arithmetic and bitwise
/// operators.
///
/// Given two dynamic operands, an implementation selects a common numeric
/// representation and applies the operation in it. The evaluator never does
/// numeric work itself; swapping this trait swaps the arithmetic rules.
pub trait Numerics {
    fn add(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn sub(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn mul(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn div(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn modulo(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn bit_and(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn bit_or(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn bit_xor(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn shift_left(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
    fn shift_right(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError>;
}

/// Default [`Numerics`] implementation.
///
/// Integer pairs stay integral. Mixed int/float pairs go through
/// [`rust_decimal::Decimal`] so that whole results collapse back to
/// `Integer` and fractional results become `Float` without accumulating
/// binary floating-point error. Bitwise operations narrow both operands to
/// `i64`; floats participate only when they hold integral values.
pub struct DecimalNumerics;

/// Mixed int/float arithmetic: exact in Decimal when both operands convert,
/// plain f64 otherwise.
fn mixed(a: f64, b: f64, dec_op: fn(Decimal, Decimal) -> Decimal, f_op: fn(f64, f64) -> f64) -> Value {
    if let (Some(ad), Some(bd)) = (Decimal::from_f64(a), Decimal::from_f64(b)) {
        let rd = dec_op(ad, bd);
        if rd.is_integer() {
            if let Some(r) = rd.to_i64() {
                return Value::Integer(r);
            }
        }
        if let Some(r) = rd.to_f64() {
            return Value::Float(r);
        }
    }
    Value::Float(f_op(a, b))
}

fn type_error(verb: &str, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeError(format!(
        "Cannot {} {} and {}",
        verb,
        lhs.type_name(),
        rhs.type_name()
    ))
}

/// Narrow a value to an i64 for the bitwise group.
fn to_bits(v: &Value) -> Result<i64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
        other => Err(EvalError::TypeError(format!(
            "Bitwise operations require integral operands, got {}",
            other.type_name()
        ))),
    }
}

impl Numerics for DecimalNumerics {
    fn add(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::Integer(a), Value::Float(b)) => Ok(mixed(*a as f64, *b, |x, y| x + y, |x, y| x + y)),
            (Value::Float(a), Value::Integer(b)) => Ok(mixed(*a, *b as f64, |x, y| x + y, |x, y| x + y)),
            (a, b) => Err(type_error("add", a, b)),
        }
    }

    fn sub(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            (Value::Integer(a), Value::Float(b)) => Ok(mixed(*a as f64, *b, |x, y| x - y, |x, y| x - y)),
            (Value::Float(a), Value::Integer(b)) => Ok(mixed(*a, *b as f64, |x, y| x - y, |x, y| x - y)),
            (a, b) => Err(type_error("subtract", a, b)),
        }
    }

    fn mul(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
            (Value::Integer(a), Value::Float(b)) => Ok(mixed(*a as f64, *b, |x, y| x * y, |x, y| x * y)),
            (Value::Float(a), Value::Integer(b)) => Ok(mixed(*a, *b as f64, |x, y| x * y, |x, y| x * y)),
            (a, b) => Err(type_error("multiply", a, b)),
        }
    }

    fn div(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Integer(_), Value::Integer(0)) => Err(EvalError::DivisionByZero),
            (Value::Integer(a), Value::Integer(b)) => {
                // exact division stays integral
                if a % b == 0 {
                    Ok(Value::Integer(a / b))
                } else {
                    Ok(Value::Float(*a as f64 / *b as f64))
                }
            }
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
            (Value::Integer(a), Value::Float(b)) => Ok(div_mixed(*a as f64, *b)),
            (Value::Float(a), Value::Integer(b)) => Ok(div_mixed(*a, *b as f64)),
            (a, b) => Err(type_error("divide", a, b)),
        }
    }

    fn modulo(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Integer(_), Value::Integer(0)) => Err(EvalError::DivisionByZero),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a % b)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a % b)),
            (Value::Integer(a), Value::Float(b)) => Ok(mod_mixed(*a as f64, *b)),
            (Value::Float(a), Value::Integer(b)) => Ok(mod_mixed(*a, *b as f64)),
            (a, b) => Err(type_error("take the modulo of", a, b)),
        }
    }

    fn bit_and(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        Ok(Value::Integer(to_bits(lhs)? & to_bits(rhs)?))
    }

    fn bit_or(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        Ok(Value::Integer(to_bits(lhs)? | to_bits(rhs)?))
    }

    fn bit_xor(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        Ok(Value::Integer(to_bits(lhs)? ^ to_bits(rhs)?))
    }

    fn shift_left(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        let shift = (to_bits(rhs)? & 63) as u32;
        Ok(Value::Integer(to_bits(lhs)?.wrapping_shl(shift)))
    }

    fn shift_right(&self, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
        let shift = (to_bits(rhs)? & 63) as u32;
        Ok(Value::Integer(to_bits(lhs)?.wrapping_shr(shift)))
    }
}

fn div_mixed(a: f64, b: f64) -> Value {
    // Decimal panics on a zero divisor; let f64 produce inf/nan instead
    if b == 0.0 {
        return Value::Float(a / b);
    }
    mixed(a, b, |x, y| x / y, |x, y| x / y)
}

fn mod_mixed(a: f64, b: f64) -> Value {
    if b == 0.0 {
        return Value::Float(a % b);
    }
    mixed(a, b, |x, y| x % y, |x, y| x % y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_pairs_stay_integral() {
        let n = DecimalNumerics;
        assert_eq!(n.add(&Value::Integer(2), &Value::Integer(3)).unwrap(), Value::Integer(5));
        assert_eq!(n.mul(&Value::Integer(4), &Value::Integer(5)).unwrap(), Value::Integer(20));
    }

    #[test]
    fn mixed_whole_results_collapse_to_integer() {
        let n = DecimalNumerics;
        assert_eq!(n.add(&Value::Integer(1), &Value::Float(2.0)).unwrap(), Value::Integer(3));
        assert_eq!(n.sub(&Value::Float(2.5), &Value::Float(0.5)).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn mixed_fractional_results_stay_float() {
        let n = DecimalNumerics;
        assert_eq!(n.add(&Value::Integer(1), &Value::Float(0.5)).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn exact_integer_division() {
        let n = DecimalNumerics;
        assert_eq!(n.div(&Value::Integer(10), &Value::Integer(2)).unwrap(), Value::Integer(5));
        assert_eq!(n.div(&Value::Integer(5), &Value::Integer(2)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn integer_division_by_zero() {
        let n = DecimalNumerics;
        assert!(matches!(
            n.div(&Value::Integer(1), &Value::Integer(0)),
            Err(EvalError::DivisionByZero)
        ));
        assert!(matches!(
            n.modulo(&Value::Integer(1), &Value::Integer(0)),
            Err(EvalError::DivisionByZero)
        ));
    }

    #[test]
    fn bitwise_narrows_to_integers() {
        let n = DecimalNumerics;
        assert_eq!(n.bit_and(&Value::Integer(6), &Value::Integer(3)).unwrap(), Value::Integer(2));
        assert_eq!(n.bit_or(&Value::Integer(6), &Value::Float(3.0)).unwrap(), Value::Integer(7));
        assert_eq!(n.shift_left(&Value::Integer(1), &Value::Integer(4)).unwrap(), Value::Integer(16));
        assert!(n.bit_xor(&Value::Float(1.5), &Value::Integer(1)).is_err());
    }

    #[test]
    fn non_numeric_operands_are_type_errors() {
        let n = DecimalNumerics;
        assert!(n.add(&Value::Boolean(true), &Value::Integer(1)).is_err());
        assert!(n.sub(&Value::String("a".into()), &Value::Integer(1)).is_err());
    }
}
