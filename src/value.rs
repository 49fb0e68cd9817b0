use std::collections::HashMap;

/// A dynamic value produced by evaluating an expression.
///
/// The language preserves the distinction between integers and floats:
/// numeric literals without a decimal point or exponent evaluate to
/// [`Value::Integer`], everything else to [`Value::Float`], and arithmetic
/// keeps integer results integral whenever the mathematics allows it.
///
/// # Examples
///
/// ```
/// use stencil_expr::Value;
/// use std::collections::HashMap;
///
/// let scalar = Value::Integer(42);
/// let text = Value::String("hello".to_string());
/// let seq = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut map = HashMap::new();
/// map.insert("key".to_string(), Value::Boolean(true));
/// let object = Value::Object(map);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Mapping with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Default truthiness rule used by the logical operators.
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Integer(n) => *n > 0,
            Float(n) => *n > 0.0,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) => Some(n.round() as i64),
            _ => None,
        }
    }

    /// Textual form used by `+` string concatenation.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.as_string()).collect();
                format!("[{}]", items.join(","))
            }
            Value::Object(obj) => {
                let mut keys: Vec<_> = obj.keys().collect();
                keys.sort();
                let items: Vec<String> = keys
                    .iter()
                    .filter_map(|k| obj.get(*k).map(|v| format!("{}:{}", k, v.as_string())))
                    .collect();
                format!("{{{}}}", items.join(","))
            }
        }
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
