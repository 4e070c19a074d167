//! Handles and metadata records for resolved types and members.

use std::fmt;

use bitflags::bitflags;

use crate::metadata::MetadataToken;

/// Handle to a type in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Handle to a defined member in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Index of a source-level type declaration in the compilation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

impl ContainerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array { element: TypeId, rank: u32 },
    ByRef { element: TypeId },
}

bitflags! {
    /// Type-level metadata attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeAttributes: u32 {
        const PUBLIC             = 1 << 0;
        const NOT_PUBLIC         = 1 << 1;
        const NESTED_PUBLIC      = 1 << 2;
        const NESTED_PRIVATE     = 1 << 3;
        const NESTED_FAMILY      = 1 << 4;
        const NESTED_ASSEMBLY    = 1 << 5;
        const NESTED_FAM_OR_ASSEM = 1 << 6;
        const INTERFACE          = 1 << 7;
        const ABSTRACT           = 1 << 8;
        const SEALED             = 1 << 9;
        const SEQUENTIAL_LAYOUT  = 1 << 10;
        const BEFORE_FIELD_INIT  = 1 << 11;
        const SPECIAL_NAME       = 1 << 12;
    }
}

bitflags! {
    /// Member-level metadata attributes, shared by methods and fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberAttributes: u32 {
        const PUBLIC         = 1 << 0;
        const PRIVATE        = 1 << 1;
        const FAMILY         = 1 << 2;
        const ASSEMBLY       = 1 << 3;
        const FAM_OR_ASSEM   = 1 << 4;
        const STATIC         = 1 << 5;
        const FINAL          = 1 << 6;
        const VIRTUAL        = 1 << 7;
        const HIDE_BY_SIG    = 1 << 8;
        const NEW_SLOT       = 1 << 9;
        const ABSTRACT       = 1 << 10;
        const SPECIAL_NAME   = 1 << 11;
        const RT_SPECIAL_NAME = 1 << 12;
        const PINVOKE_IMPL   = 1 << 13;
        const INIT_ONLY      = 1 << 14;
        const LITERAL        = 1 << 15;
        const HAS_DEFAULT    = 1 << 16;
        /// Body supplied by the runtime (delegate members).
        const RUNTIME_MANAGED = 1 << 17;

        const ACCESS_MASK = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::FAMILY.bits()
            | Self::ASSEMBLY.bits()
            | Self::FAM_OR_ASSEM.bits();
    }
}

impl MemberAttributes {
    /// Visible to derived types.
    pub fn is_accessible_from_derived(self) -> bool {
        !self.contains(MemberAttributes::PRIVATE)
    }

    /// Virtual members that reuse an inherited slot.
    pub fn is_override(self) -> bool {
        self.contains(MemberAttributes::VIRTUAL) && !self.contains(MemberAttributes::NEW_SLOT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    Standard,
    HasThis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
    Property,
    Event,
}

/// Everything the registry records about one type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// Simple name, e.g. `Inner`.
    pub name: String,
    /// Lookup key, e.g. `N.Outer.Inner`.
    pub full_name: String,
    pub shape: TypeShape,
    pub attributes: TypeAttributes,
    pub base: Option<TypeId>,
    /// Every implemented interface, inherited ones included.
    pub interfaces: Vec<TypeId>,
    pub declaring_type: Option<TypeId>,
    /// Members in definition order.
    pub members: Vec<MemberId>,
    pub token: MetadataToken,
}

impl TypeEntry {
    pub fn is_interface(&self) -> bool {
        self.shape == TypeShape::Interface
    }

    pub fn is_class(&self) -> bool {
        matches!(self.shape, TypeShape::Class | TypeShape::Delegate | TypeShape::Array { .. })
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.shape, TypeShape::Struct | TypeShape::Enum)
    }

    pub fn is_sealed(&self) -> bool {
        self.attributes.contains(TypeAttributes::SEALED)
    }

    pub fn is_abstract(&self) -> bool {
        self.attributes.contains(TypeAttributes::ABSTRACT)
    }
}

/// Everything the registry records about one member.
#[derive(Debug, Clone)]
pub struct MemberEntry {
    /// Metadata name (interface-qualified for explicit implementations).
    pub name: String,
    pub kind: MemberKind,
    pub declaring_type: TypeId,
    pub attributes: MemberAttributes,
    /// Return type for methods, `void` for constructors, the declared type
    /// for fields, properties and events.
    pub member_type: TypeId,
    pub parameters: Vec<TypeId>,
    /// Accessor methods of a property or event, in get/set or add/remove
    /// order.
    pub accessors: Vec<MemberId>,
    pub token: MetadataToken,
}

impl MemberEntry {
    pub fn is_static(&self) -> bool {
        self.attributes.contains(MemberAttributes::STATIC)
    }

    pub fn is_virtual(&self) -> bool {
        self.attributes.contains(MemberAttributes::VIRTUAL)
    }

    pub fn is_abstract(&self) -> bool {
        self.attributes.contains(MemberAttributes::ABSTRACT)
    }
}

/// Name plus resolved return and parameter types. Two members of one type
/// may not share a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, return_type: TypeId, parameters: Vec<TypeId>) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
        }
    }
}
