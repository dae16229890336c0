//! Document tree produced by the loader and consumed by the dumper.

use yaml_rust2::Yaml;

use crate::ContextMapping;

/// A node of a loaded document.
///
/// Every mapping position holds a [`ContextMapping`], so each mapping knows
/// where it was parsed. Sequences and scalars carry no provenance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(ContextMapping),
}

/// A scalar value. Also the type of mapping keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Floating point number, kept in its original spelling.
    Real(String),
    String(String),
}

impl Scalar {
    /// The text a key is ordered by.
    pub fn sort_text(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Real(s) | Scalar::String(s) => s.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert from a yaml-rust2 scalar. Collections and aliases yield `None`.
    pub fn from_yaml(yaml: Yaml) -> Option<Self> {
        match yaml {
            Yaml::Null => Some(Scalar::Null),
            Yaml::Boolean(b) => Some(Scalar::Bool(b)),
            Yaml::Integer(i) => Some(Scalar::Integer(i)),
            Yaml::Real(s) => Some(Scalar::Real(s)),
            Yaml::String(s) => Some(Scalar::String(s)),
            _ => None,
        }
    }

    pub fn to_yaml(&self) -> Yaml {
        match self {
            Scalar::Null => Yaml::Null,
            Scalar::Bool(b) => Yaml::Boolean(*b),
            Scalar::Integer(i) => Yaml::Integer(*i),
            Scalar::Real(s) => Yaml::Real(s.clone()),
            Scalar::String(s) => Yaml::String(s.clone()),
        }
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ContextMapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<ContextMapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a string key when this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

macro_rules! value_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

value_from_scalar!(&str, String, i64, bool);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<ContextMapping> for Value {
    fn from(m: ContextMapping) -> Self {
        Value::Mapping(m)
    }
}
