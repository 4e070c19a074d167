use std::fmt;

use cobalt_source::Location;
use serde::{Deserialize, Serialize};

use super::common::{AttributeUse, ExprId, Parameter};
use super::members::MemberDecl;
use super::modifiers::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl fmt::Display for TypeDeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeDeclKind::Class => "class",
            TypeDeclKind::Struct => "struct",
            TypeDeclKind::Interface => "interface",
            TypeDeclKind::Enum => "enum",
            TypeDeclKind::Delegate => "delegate",
        };
        f.write_str(s)
    }
}

/// A member of an enum declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    #[serde(default)]
    pub value: Option<ExprId>,
    #[serde(default)]
    pub location: Location,
}

/// A class, struct, interface, enum or delegate declaration.
///
/// Enum and delegate declarations use the kind-specific fields at the
/// bottom; other kinds leave them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Base class and interface names, unresolved, in source order.
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeUse>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    #[serde(default)]
    pub location: Location,

    /// Enum underlying type; `int` when absent.
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default)]
    pub enum_members: Vec<EnumMemberDecl>,

    /// Delegate signature.
    #[serde(default, rename = "returns")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// `using Alias = Some.Namespace.Or.Type;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsingAlias {
    pub alias: String,
    pub target: String,
}

/// A `namespace N { ... }` block. `name` is relative to the enclosing
/// namespace and may be dotted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    #[serde(default)]
    pub usings: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<UsingAlias>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDecl>,
}

/// Everything the parser produced for one source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// File name, for diagnostics.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub usings: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<UsingAlias>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDecl>,
}

impl TypeDecl {
    pub fn new(kind: TypeDeclKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Modifiers::empty(),
            bases: vec![],
            attributes: vec![],
            members: vec![],
            location: Location::NULL,
            underlying: None,
            enum_members: vec![],
            return_type: None,
            parameters: vec![],
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeDeclKind::Class, name)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(TypeDeclKind::Struct, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeDeclKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeDeclKind::Enum, name)
    }

    pub fn delegate(
        name: impl Into<String>,
        return_type: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        let mut decl = Self::new(TypeDeclKind::Delegate, name);
        decl.return_type = Some(return_type.into());
        decl.parameters = parameters;
        decl
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<MemberDecl>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeUse) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_enum_member(mut self, name: impl Into<String>) -> Self {
        self.enum_members.push(EnumMemberDecl {
            name: name.into(),
            value: None,
            location: Location::NULL,
        });
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

impl NamespaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push(UsingAlias { alias: alias.into(), target: target.into() });
        self
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    pub fn with_namespace(mut self, ns: NamespaceDecl) -> Self {
        self.namespaces.push(ns);
        self
    }
}

impl CompilationUnit {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into(), ..Default::default() }
    }

    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    pub fn with_namespace(mut self, ns: NamespaceDecl) -> Self {
        self.namespaces.push(ns);
        self
    }
}
