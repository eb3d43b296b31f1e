//! Host value representation.

use std::fmt;
use std::sync::Arc;

use crate::object::ObjectRef;

/// A value as seen by host code.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(Arc<str>),
    Object(ObjectRef),
    /// A value owned by a foreign caller, stored opaquely in host storage.
    Foreign(Arc<Value>),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::String(Arc::from(s))
    }

    pub fn foreign(value: Value) -> Self {
        Value::Foreign(Arc::new(value))
    }

    /// Integral value widened to `i64`, for `Int` and `Long`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.as_integer().is_some()
    }

    /// Strip any number of foreign wrappers.
    pub fn unwrap_foreign(self) -> Value {
        let mut value = self;
        while let Value::Foreign(inner) = value {
            value = Arc::unwrap_or_clone(inner);
        }
        value
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Foreign(_) => "foreign",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // Host objects compare by identity.
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Foreign(a), Value::Foreign(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}L"),
            Value::Double(d) => write!(f, "{d}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Object(obj) => write!(f, "{}@{}", obj.klass().name(), obj.klass().id()),
            Value::Foreign(inner) => write!(f, "foreign({inner})"),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
