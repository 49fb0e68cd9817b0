use crate::evaluator::{EvalContext, EvalError};
use crate::value::Value;

/// Binary operators.
///
/// Each variant is stateless: it carries its source token, its binding
/// strength for precedence climbing, and a pure application function over
/// two already-evaluated operands. Numeric and comparison work is delegated
/// to the services carried by the [`EvalContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    /// Logical OR (`||`, word form `or`)
    Or,
    /// Logical AND (`&&`, word form `and`)
    And,

    // Bitwise
    /// Bitwise OR (`|`)
    BitOr,
    /// Bitwise XOR (`^`)
    BitXor,
    /// Bitwise AND (`&`)
    BitAnd,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Right shift (`>>`)
    ShiftRight,

    // Equality
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Strict equal (`===`); currently shares the loose comparison
    StrictEqual,
    /// Strict not equal (`!==`); currently shares the loose comparison
    StrictNotEqual,

    // Relational
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,

    /// Assignment (`=`), expression form only: evaluates to its right
    /// operand. Binds at precedence 0, so it never combines inside an
    /// expression.
    Assign,
}

impl BinOp {
    /// The source token for this operator.
    pub fn token(&self) -> &'static str {
        use BinOp::*;
        match self {
            Or => "||",
            And => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Equal => "==",
            NotEqual => "!=",
            StrictEqual => "===",
            StrictNotEqual => "!==",
            LessThan => "<",
            GreaterThan => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Assign => "=",
        }
    }

    /// Binding strength for precedence climbing. Expression terminators act
    /// as precedence 0, so any operator at 0 stops the combination loop.
    pub fn precedence(&self) -> u8 {
        use BinOp::*;
        match self {
            Assign => 0,
            Or => 1,
            And => 2,
            BitOr => 3,
            BitXor => 4,
            BitAnd => 5,
            Equal | NotEqual | StrictEqual | StrictNotEqual => 6,
            LessThan | GreaterThan | LessEqual | GreaterEqual => 7,
            ShiftLeft | ShiftRight => 8,
            Add | Subtract => 9,
            Multiply | Divide | Modulo => 11,
        }
    }

    /// Applies the operator to two already-evaluated operands.
    ///
    /// Both operands are always evaluated before this is called; `&&` and
    /// `||` do not short-circuit.
    pub fn apply(&self, lhs: &Value, rhs: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
        use BinOp::*;
        match self {
            Add => {
                if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
                    Ok(Value::String(format!(
                        "{}{}",
                        lhs.as_string(),
                        rhs.as_string()
                    )))
                } else {
                    ctx.numerics.add(lhs, rhs)
                }
            }
            Subtract => ctx.numerics.sub(lhs, rhs),
            Multiply => ctx.numerics.mul(lhs, rhs),
            Divide => ctx.numerics.div(lhs, rhs),
            Modulo => ctx.numerics.modulo(lhs, rhs),

            BitAnd => ctx.numerics.bit_and(lhs, rhs),
            BitOr => ctx.numerics.bit_or(lhs, rhs),
            BitXor => ctx.numerics.bit_xor(lhs, rhs),
            ShiftLeft => ctx.numerics.shift_left(lhs, rhs),
            ShiftRight => ctx.numerics.shift_right(lhs, rhs),

            GreaterThan => ctx.compare.greater_than(lhs, rhs).map(Value::Boolean),
            GreaterEqual => ctx.compare.greater_than_equal(lhs, rhs).map(Value::Boolean),
            LessThan => ctx.compare.less_than(lhs, rhs).map(Value::Boolean),
            LessEqual => ctx.compare.less_than_equal(lhs, rhs).map(Value::Boolean),

            // strict variants share the loose comparison for now
            Equal | StrictEqual => ctx.compare.equals(lhs, rhs).map(Value::Boolean),
            NotEqual | StrictNotEqual => ctx.compare.not_equals(lhs, rhs).map(Value::Boolean),

            And => Ok(Value::Boolean(
                ctx.compare.is_true(lhs) && ctx.compare.is_true(rhs),
            )),
            Or => Ok(Value::Boolean(
                ctx.compare.is_true(lhs) || ctx.compare.is_true(rhs),
            )),

            Assign => Ok(rhs.clone()),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Numeric negation (`-`); preserves the operand's concrete numeric
    /// representation, and `null` becomes integer 0
    Minus,
    /// Identity (`+`); `null` becomes integer 0
    Plus,
    /// Logical negation (`!`) via the truthiness predicate
    Not,
}

impl UnaryOp {
    pub fn token(&self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }

    /// Applies the operator to one already-evaluated operand.
    pub fn apply(&self, operand: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            UnaryOp::Not => Ok(Value::Boolean(!ctx.compare.is_true(operand))),
            UnaryOp::Plus => match operand {
                Value::Null => Ok(Value::Integer(0)),
                other => Ok(other.clone()),
            },
            UnaryOp::Minus => match operand {
                Value::Null => Ok(Value::Integer(0)),
                other => {
                    let product = ctx.numerics.mul(other, &Value::Integer(-1))?;
                    // convert back to the operand's concrete representation:
                    // int stays int, float stays float
                    Ok(match (other, product) {
                        (Value::Float(_), Value::Integer(n)) => Value::Float(n as f64),
                        (Value::Integer(_), Value::Float(f)) => Value::Integer(f as i64),
                        (_, p) => p,
                    })
                }
            },
        }
    }
}
