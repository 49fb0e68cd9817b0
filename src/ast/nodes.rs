use crate::ast::{BinOp, UnaryOp};
use crate::value::Value;
use std::fmt;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Nodes are immutable once constructed and own their children outright:
/// every subtree is reachable from exactly one parent. Structural equality
/// is deep and order-sensitive for arrays and property lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal scalar value
    ///
    /// # Example
    /// ```text
    /// 'hello'  42  3.14  true
    /// ```
    Literal(Value),

    /// The `null` literal
    Null,

    /// Named variable, resolved through the scope at evaluation time
    Identifier(String),

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [3, 1, 2]
    /// ```
    Array(Vec<Expr>),

    /// Object literal; later duplicate keys overwrite earlier ones
    ///
    /// # Example
    /// ```text
    /// {name: 'a', count}
    /// ```
    Object(Vec<Property>),

    /// Member access
    ///
    /// `computed` is false for dotted access (`a.b`, property is an
    /// identifier) and true for bracketed access (`a[expr]`, property is an
    /// arbitrary sub-expression).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },

    /// Filter invocation
    ///
    /// # Examples
    /// ```text
    /// upper(name)
    /// raw: some {text}
    /// ```
    ///
    /// Only the structured call is produced here; dispatch belongs to the
    /// surrounding engine.
    Call { name: String, args: Vec<Expr> },

    /// Unary operator application (`-x`, `!x`, `+x`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operator application
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// One entry of an object literal.
///
/// `shorthand` records that the source wrote only a key, in which case
/// `value` is the same identifier as `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
    pub shorthand: bool,
}

impl Property {
    pub fn new(key: Expr, value: Expr, shorthand: bool) -> Self {
        Property {
            key,
            value,
            shorthand,
        }
    }
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn member(object: Expr, property: Expr, computed: bool) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: Box::new(property),
            computed,
        }
    }

    /// Renders the node back to a canonical, re-parseable source form.
    ///
    /// Strings are JSON-escaped, `null` renders as `null`, arrays as
    /// `[e,e]`, and objects as `{k:v,...}` with shorthand properties
    /// rendered as their key alone.
    pub fn to_raw_string(&self) -> String {
        match self {
            Expr::Literal(value) => raw_literal(value),
            Expr::Null => "null".to_string(),
            Expr::Identifier(name) => name.clone(),
            Expr::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_raw_string()).collect();
                format!("[{}]", items.join(","))
            }
            Expr::Object(properties) => {
                let items: Vec<String> = properties
                    .iter()
                    .map(|prop| {
                        if prop.shorthand {
                            prop.key.to_raw_string()
                        } else {
                            format!("{}:{}", prop.key.to_raw_string(), prop.value.to_raw_string())
                        }
                    })
                    .collect();
                format!("{{{}}}", items.join(","))
            }
            Expr::Member {
                object,
                property,
                computed,
            } => {
                if *computed {
                    format!("{}[{}]", object.to_raw_string(), property.to_raw_string())
                } else {
                    format!("{}.{}", object.to_raw_string(), property.to_raw_string())
                }
            }
            Expr::Call { name, args } => {
                let items: Vec<String> = args.iter().map(|a| a.to_raw_string()).collect();
                format!("{}({})", name, items.join(","))
            }
            Expr::Unary { op, operand } => format!("{}{}", op.token(), operand.to_raw_string()),
            Expr::Binary { op, left, right } => format!(
                "{} {} {}",
                left.to_raw_string(),
                op.token(),
                right.to_raw_string()
            ),
        }
    }
}

fn raw_literal(value: &Value) -> String {
    match value {
        // serde_json's Display gives the quoted, escaped JSON form
        Value::String(s) => serde_json::Value::String(s.clone()).to_string(),
        // keep the decimal point so the text re-parses as a float
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{:.1}", f)
        }
        other => other.as_string(),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_literals() {
        assert_eq!(Expr::Literal(Value::Integer(10)).to_raw_string(), "10");
        assert_eq!(Expr::Literal(Value::Float(3.14)).to_raw_string(), "3.14");
        assert_eq!(Expr::Literal(Value::Float(1000.0)).to_raw_string(), "1000.0");
        assert_eq!(Expr::Literal(Value::Boolean(true)).to_raw_string(), "true");
        assert_eq!(Expr::Null.to_raw_string(), "null");
        assert_eq!(
            Expr::Literal(Value::String("a\"b".into())).to_raw_string(),
            r#""a\"b""#
        );
    }

    #[test]
    fn renders_shorthand_objects() {
        let obj = Expr::Object(vec![
            Property::new(
                Expr::Identifier("x".into()),
                Expr::Identifier("x".into()),
                true,
            ),
            Property::new(
                Expr::Identifier("y".into()),
                Expr::Literal(Value::Integer(2)),
                false,
            ),
        ]);
        assert_eq!(obj.to_raw_string(), "{x,y:2}");
    }

    #[test]
    fn renders_member_and_call() {
        let member = Expr::member(
            Expr::Identifier("a".into()),
            Expr::Identifier("b".into()),
            false,
        );
        assert_eq!(member.to_raw_string(), "a.b");

        let call = Expr::Call {
            name: "upper".into(),
            args: vec![Expr::Identifier("name".into())],
        };
        assert_eq!(call.to_raw_string(), "upper(name)");
    }
}
