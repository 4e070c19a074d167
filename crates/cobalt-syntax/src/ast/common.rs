use std::fmt;

use cobalt_source::Location;
use serde::{Deserialize, Serialize};

/// Handle to a statement block owned by the statement compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

/// Handle to an expression owned by the statement compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterModifier {
    #[default]
    None,
    Ref,
    Out,
    Params,
}

/// A formal parameter. `ty` is the unresolved type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifier: ParameterModifier,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifier: ParameterModifier::None,
        }
    }

    pub fn with_modifier(mut self, modifier: ParameterModifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn is_by_ref(&self) -> bool {
        matches!(self.modifier, ParameterModifier::Ref | ParameterModifier::Out)
    }
}

/// A literal attribute argument. Anything richer is the attribute
/// resolver's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    pub name: String,
    pub value: AttributeValue,
}

/// One attribute application, e.g. `[DllImport("libc")]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeUse {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<AttributeValue>,
    #[serde(default)]
    pub named: Vec<NamedArgument>,
    #[serde(default)]
    pub location: Location,
}

impl AttributeUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
            named: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_argument(mut self, value: AttributeValue) -> Self {
        self.arguments.push(value);
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.named.push(NamedArgument { name: name.into(), value });
        self
    }

    pub fn named_value(&self, name: &str) -> Option<&AttributeValue> {
        self.named.iter().find(|n| n.name == name).map(|n| &n.value)
    }

    /// The attribute name without a trailing `Attribute` suffix, which is how
    /// source usually spells it.
    pub fn short_name(&self) -> &str {
        let simple = self.name.rsplit('.').next().unwrap_or(&self.name);
        simple.strip_suffix("Attribute").filter(|s| !s.is_empty()).unwrap_or(simple)
    }
}
