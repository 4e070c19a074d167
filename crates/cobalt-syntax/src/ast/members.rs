use std::fmt;

use cobalt_source::Location;
use serde::{Deserialize, Serialize};

use super::common::{AttributeUse, BlockId, ExprId, Parameter};
use super::modifiers::Modifiers;
use super::types::TypeDecl;

/// A member declaration inside a type body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberDecl {
    Field(FieldDecl),
    Constant(ConstantDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Property(PropertyDecl),
    Event(EventDecl),
    Indexer(IndexerDecl),
    Operator(OperatorDecl),
    Type(TypeDecl),
}

impl MemberDecl {
    pub fn location(&self) -> Location {
        match self {
            MemberDecl::Field(d) => d.location,
            MemberDecl::Constant(d) => d.location,
            MemberDecl::Method(d) => d.location,
            MemberDecl::Constructor(d) => d.location,
            MemberDecl::Property(d) => d.location,
            MemberDecl::Event(d) => d.location,
            MemberDecl::Indexer(d) => d.location,
            MemberDecl::Operator(d) => d.location,
            MemberDecl::Type(d) => d.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub initializer: Option<ExprId>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub value: ExprId,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Simple name, or `Interface.Name` for an explicit implementation.
    pub name: String,
    #[serde(rename = "returns", default = "void_type")]
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub body: Option<BlockId>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

fn void_type() -> String {
    "void".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitializerTarget {
    Base,
    This,
}

/// `: base(...)` or `: this(...)` on a constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInitializerDecl {
    pub target: InitializerTarget,
    #[serde(default)]
    pub arguments: Vec<ExprId>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Must equal the enclosing type's name.
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub initializer: Option<ConstructorInitializerDecl>,
    #[serde(default)]
    pub body: Option<BlockId>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

/// A `get`/`set`/`add`/`remove` accessor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessorDecl {
    #[serde(default)]
    pub body: Option<BlockId>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
}

impl AccessorDecl {
    pub fn with_body(body: BlockId) -> Self {
        Self { body: Some(body), attributes: vec![] }
    }

    /// An accessor with no body, as written in interfaces and abstract
    /// properties.
    pub fn declared() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub get: Option<AccessorDecl>,
    #[serde(default)]
    pub set: Option<AccessorDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub initializer: Option<ExprId>,
    #[serde(default)]
    pub add: Option<AccessorDecl>,
    #[serde(default)]
    pub remove: Option<AccessorDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerDecl {
    #[serde(rename = "type")]
    pub ty: String,
    /// Set for `I.this[...]` explicit implementations.
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub get: Option<AccessorDecl>,
    #[serde(default)]
    pub set: Option<AccessorDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    // unary
    LogicalNot,
    OnesComplement,
    Increment,
    Decrement,
    True,
    False,

    // unary or binary
    Addition,
    Subtraction,

    UnaryPlus,
    UnaryNegation,

    // binary
    Multiply,
    Division,
    Modulus,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
    Equality,
    Inequality,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,

    Implicit,
    Explicit,
}

impl OperatorKind {
    pub fn is_conversion(self) -> bool {
        matches!(self, OperatorKind::Implicit | OperatorKind::Explicit)
    }

    /// Metadata name of the method implementing this operator.
    pub fn method_name(self) -> String {
        format!("op_{self}")
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDecl {
    pub operator: OperatorKind,
    #[serde(rename = "returns")]
    pub return_type: String,
    pub first: Parameter,
    #[serde(default)]
    pub second: Option<Parameter>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub body: Option<BlockId>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub location: Location,
}

impl OperatorDecl {
    pub fn parameters(&self) -> Vec<Parameter> {
        std::iter::once(self.first.clone()).chain(self.second.clone()).collect()
    }
}

macro_rules! into_member {
    ($($decl:ident => $variant:ident),* $(,)?) => {
        $(impl From<$decl> for MemberDecl {
            fn from(d: $decl) -> Self {
                MemberDecl::$variant(d)
            }
        })*
    };
}

into_member! {
    FieldDecl => Field,
    ConstantDecl => Constant,
    MethodDecl => Method,
    ConstructorDecl => Constructor,
    PropertyDecl => Property,
    EventDecl => Event,
    IndexerDecl => Indexer,
    OperatorDecl => Operator,
    TypeDecl => Type,
}

impl FieldDecl {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers,
            initializer: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_initializer(mut self, expr: ExprId) -> Self {
        self.initializer = Some(expr);
        self
    }
}

impl ConstantDecl {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, value: ExprId) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::PUBLIC,
            value,
            attributes: vec![],
            location: Location::NULL,
        }
    }
}

impl MethodDecl {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: vec![],
            modifiers,
            body: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_param(mut self, ty: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(ty, name));
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, body: BlockId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeUse) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

impl ConstructorDecl {
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            modifiers,
            initializer: None,
            body: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_param(mut self, ty: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(ty, name));
        self
    }

    pub fn with_initializer(mut self, target: InitializerTarget, arguments: Vec<ExprId>) -> Self {
        self.initializer = Some(ConstructorInitializerDecl {
            target,
            arguments,
            location: Location::NULL,
        });
        self
    }

    pub fn with_body(mut self, body: BlockId) -> Self {
        self.body = Some(body);
        self
    }
}

impl PropertyDecl {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers,
            get: None,
            set: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_get(mut self, accessor: AccessorDecl) -> Self {
        self.get = Some(accessor);
        self
    }

    pub fn with_set(mut self, accessor: AccessorDecl) -> Self {
        self.set = Some(accessor);
        self
    }
}

impl EventDecl {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers,
            initializer: None,
            add: None,
            remove: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_accessors(mut self, add: AccessorDecl, remove: AccessorDecl) -> Self {
        self.add = Some(add);
        self.remove = Some(remove);
        self
    }
}

impl IndexerDecl {
    pub fn new(ty: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            ty: ty.into(),
            interface: None,
            parameters: vec![],
            modifiers,
            get: None,
            set: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn with_param(mut self, ty: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(ty, name));
        self
    }

    pub fn with_get(mut self, accessor: AccessorDecl) -> Self {
        self.get = Some(accessor);
        self
    }

    pub fn with_set(mut self, accessor: AccessorDecl) -> Self {
        self.set = Some(accessor);
        self
    }
}

impl OperatorDecl {
    pub fn unary(operator: OperatorKind, return_type: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            operator,
            return_type: return_type.into(),
            first: Parameter::new(operand, "a"),
            second: None,
            modifiers: Modifiers::PUBLIC | Modifiers::STATIC,
            body: None,
            attributes: vec![],
            location: Location::NULL,
        }
    }

    pub fn binary(
        operator: OperatorKind,
        return_type: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        let mut decl = Self::unary(operator, return_type, left);
        decl.second = Some(Parameter::new(right, "b"));
        decl
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_body(mut self, body: BlockId) -> Self {
        self.body = Some(body);
        self
    }
}
