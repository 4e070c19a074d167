//! The process-wide type registry.
//!
//! Every type the resolver can name lives here: the platform types
//! registered up front, user types as each one finishes `DefineType`, and
//! array and by-ref types interned on first use. Entries are only ever
//! appended.

use fxhash::FxHashMap;
use indexmap::IndexMap;

use crate::attributes::{AttributeTargets, AttributeUsage};
use crate::metadata::MetadataToken;
use crate::types::{
    ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, MethodSignature,
    TypeAttributes, TypeEntry, TypeId, TypeShape,
};

pub const OBJECT: &str = "System.Object";
pub const VALUE_TYPE: &str = "System.ValueType";
pub const ENUM: &str = "System.Enum";
pub const MULTICAST_DELEGATE: &str = "System.MulticastDelegate";
pub const DELEGATE: &str = "System.Delegate";
pub const ARRAY: &str = "System.Array";
pub const ATTRIBUTE: &str = "System.Attribute";
pub const VOID: &str = "System.Void";
pub const BOOLEAN: &str = "System.Boolean";
pub const INT32: &str = "System.Int32";
pub const INT_PTR: &str = "System.IntPtr";
pub const ATTRIBUTE_USAGE: &str = "System.AttributeUsageAttribute";
pub const DLL_IMPORT: &str = "System.Runtime.InteropServices.DllImportAttribute";
pub const DEFAULT_MEMBER: &str = "System.Reflection.DefaultMemberAttribute";

/// Maps a keyword type alias to the platform type it names.
pub fn keyword_type_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "object" => OBJECT,
        "string" => "System.String",
        "bool" => BOOLEAN,
        "byte" => "System.Byte",
        "sbyte" => "System.SByte",
        "short" => "System.Int16",
        "ushort" => "System.UInt16",
        "int" => INT32,
        "uint" => "System.UInt32",
        "long" => "System.Int64",
        "ulong" => "System.UInt64",
        "char" => "System.Char",
        "float" => "System.Single",
        "double" => "System.Double",
        "decimal" => "System.Decimal",
        "void" => VOID,
        _ => return None,
    })
}

/// Types an enum may use as its underlying type.
pub const INTEGRAL_TYPES: &[&str] = &[
    "System.Byte",
    "System.SByte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
];

/// Which members a search wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFilter<'a> {
    /// Methods whose name, return type and parameter types all match.
    Signature(&'a MethodSignature),
    /// Members of one kind with the given name.
    Name(MemberKind, &'a str),
}

impl MemberFilter<'_> {
    fn accepts(&self, member: &MemberEntry) -> bool {
        match self {
            MemberFilter::Signature(sig) => {
                member.kind == MemberKind::Method
                    && member.name == sig.name
                    && member.member_type == sig.return_type
                    && member.parameters == sig.parameters
            }
            MemberFilter::Name(kind, name) => member.kind == *kind && member.name == *name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Instance,
    Static,
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeEntry>,
    by_name: IndexMap<String, TypeId>,
    containers: FxHashMap<TypeId, ContainerId>,
    members: Vec<MemberEntry>,
    arrays: FxHashMap<(TypeId, u32), TypeId>,
    by_refs: FxHashMap<TypeId, TypeId>,
    attribute_usage: FxHashMap<TypeId, AttributeUsage>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the platform library.
    pub fn with_platform() -> Self {
        let mut registry = Self::new();
        registry.bootstrap_platform();
        registry
    }

    /// Records a type that finished `DefineType` and returns its handle.
    pub fn register_defined_type(&mut self, entry: TypeEntry, container: Option<ContainerId>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        log::trace!("Registering {} as {}", entry.full_name, id);
        self.by_name.insert(entry.full_name.clone(), id);
        self.types.push(entry);
        if let Some(c) = container {
            self.containers.insert(id, c);
        }
        id
    }

    pub fn lookup(&self, full_name: &str) -> Option<TypeId> {
        self.by_name.get(full_name).copied()
    }

    /// The source declaration behind a type, if it was compiled from source.
    pub fn lookup_container(&self, ty: TypeId) -> Option<ContainerId> {
        self.containers.get(&ty).copied()
    }

    pub fn get(&self, id: TypeId) -> &TypeEntry {
        &self.types[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeEntry {
        &mut self.types[id.0 as usize]
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.get(id).full_name
    }

    /// Type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn add_member(&mut self, entry: MemberEntry) -> MemberId {
        let id = MemberId(self.members.len() as u32);
        self.get_mut(entry.declaring_type).members.push(id);
        self.members.push(entry);
        id
    }

    pub fn member(&self, id: MemberId) -> &MemberEntry {
        &self.members[id.0 as usize]
    }

    pub fn member_mut(&mut self, id: MemberId) -> &mut MemberEntry {
        &mut self.members[id.0 as usize]
    }

    /// `Type.Member` for diagnostics.
    pub fn member_display(&self, id: MemberId) -> String {
        let m = self.member(id);
        format!("{}.{}", self.name(m.declaring_type), m.name)
    }

    pub fn attribute_usage(&self, ty: TypeId) -> Option<AttributeUsage> {
        self.attribute_usage.get(&ty).copied()
    }

    pub fn set_attribute_usage(&mut self, ty: TypeId, usage: AttributeUsage) {
        self.attribute_usage.insert(ty, usage);
    }

    pub fn object_type(&self) -> Option<TypeId> {
        self.lookup(OBJECT)
    }

    pub fn void_type(&self) -> Option<TypeId> {
        self.lookup(VOID)
    }

    pub fn bool_type(&self) -> Option<TypeId> {
        self.lookup(BOOLEAN)
    }

    /// Interns `element[]` (or `element[,]` and so on for higher ranks).
    pub fn array_of(&mut self, element: TypeId, rank: u32) -> TypeId {
        if let Some(id) = self.arrays.get(&(element, rank)) {
            return *id;
        }
        let commas = ",".repeat(rank.saturating_sub(1) as usize);
        let full_name = format!("{}[{}]", self.name(element), commas);
        let entry = TypeEntry {
            name: full_name.rsplit('.').next().unwrap_or(&full_name).to_string(),
            full_name,
            shape: TypeShape::Array { element, rank },
            attributes: TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            base: self.lookup(ARRAY),
            interfaces: vec![],
            declaring_type: None,
            members: vec![],
            token: MetadataToken::EXTERNAL,
        };
        let id = self.register_defined_type(entry, None);
        self.arrays.insert((element, rank), id);
        id
    }

    /// Interns the by-ref type used for `ref` and `out` parameters.
    pub fn by_ref(&mut self, element: TypeId) -> TypeId {
        if let Some(id) = self.by_refs.get(&element) {
            return *id;
        }
        let full_name = format!("{}&", self.name(element));
        let entry = TypeEntry {
            name: full_name.rsplit('.').next().unwrap_or(&full_name).to_string(),
            full_name,
            shape: TypeShape::ByRef { element },
            attributes: TypeAttributes::PUBLIC,
            base: None,
            interfaces: vec![],
            declaring_type: None,
            members: vec![],
            token: MetadataToken::EXTERNAL,
        };
        let id = self.register_defined_type(entry, None);
        self.by_refs.insert(element, id);
        id
    }

    /// Base types of `ty`, nearest first, not including `ty`.
    pub fn base_chain(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(self.get(ty).base, move |t| self.get(*t).base)
    }

    /// Whether `ty` derives, directly or not, from `ancestor`.
    pub fn is_subclass_of(&self, ty: TypeId, ancestor: TypeId) -> bool {
        self.base_chain(ty).any(|b| b == ancestor)
    }

    /// Whether a value of type `from` can be passed where `to` is expected.
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        from == to
            || self.is_subclass_of(from, to)
            || self.implements(from, to)
            || (Some(to) == self.object_type() && !self.get(from).is_interface())
    }

    /// Whether `ty` or one of its bases lists `interface`.
    pub fn implements(&self, ty: TypeId, interface: TypeId) -> bool {
        std::iter::once(ty)
            .chain(self.base_chain(ty))
            .any(|t| self.get(t).interfaces.contains(&interface))
    }

    /// Members of `ty` itself plus those inherited along its base chain,
    /// most-derived first. Inherited private members and constructors are
    /// never returned; `ty`'s own members are only returned when
    /// `include_self` is set.
    pub fn find_members(
        &self,
        ty: TypeId,
        filter: MemberFilter<'_>,
        binding: Binding,
        include_self: bool,
    ) -> Vec<MemberId> {
        let start: Box<dyn Iterator<Item = TypeId>> = if include_self {
            Box::new(std::iter::once(ty).chain(self.base_chain(ty)))
        } else {
            Box::new(self.base_chain(ty))
        };
        let mut found = vec![];
        for t in start {
            for &m in &self.get(t).members {
                let entry = self.member(m);
                if entry.kind == MemberKind::Constructor {
                    continue;
                }
                if t != ty && !entry.attributes.is_accessible_from_derived() {
                    continue;
                }
                let is_static = entry.is_static();
                if (binding == Binding::Static) != is_static {
                    continue;
                }
                if filter.accepts(entry) {
                    found.push(m);
                }
            }
        }
        found
    }

    /// Constructors declared on `ty` itself.
    pub fn constructors_of(&self, ty: TypeId) -> Vec<MemberId> {
        self.get(ty)
            .members
            .iter()
            .copied()
            .filter(|m| {
                let e = self.member(*m);
                e.kind == MemberKind::Constructor && !e.is_static()
            })
            .collect()
    }

    /// Registers the platform library the resolver needs to name: the root
    /// types, the primitive value types, a handful of interfaces and the
    /// attributes the resolver itself interprets.
    pub fn bootstrap_platform(&mut self) {
        log::debug!("Registering platform types");
        let abstract_class = TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT;
        let sealed_class = TypeAttributes::PUBLIC | TypeAttributes::SEALED;
        let sealed_struct = sealed_class | TypeAttributes::SEQUENTIAL_LAYOUT;
        let iface = TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;

        let object = self.platform_type(OBJECT, TypeShape::Class, TypeAttributes::PUBLIC, None);
        let value_type = self.platform_type(VALUE_TYPE, TypeShape::Class, abstract_class, Some(object));
        self.platform_type(ENUM, TypeShape::Class, abstract_class, Some(value_type));
        let delegate = self.platform_type(DELEGATE, TypeShape::Class, abstract_class, Some(object));
        self.platform_type(MULTICAST_DELEGATE, TypeShape::Class, abstract_class, Some(delegate));
        self.platform_type(ARRAY, TypeShape::Class, abstract_class, Some(object));
        let attribute = self.platform_type(ATTRIBUTE, TypeShape::Class, abstract_class, Some(object));
        let type_type = self.platform_type("System.Type", TypeShape::Class, abstract_class, Some(object));
        let string = self.platform_type("System.String", TypeShape::Class, sealed_class, Some(object));
        let exception = self.platform_type("System.Exception", TypeShape::Class, TypeAttributes::PUBLIC, Some(object));
        let event_args = self.platform_type("System.EventArgs", TypeShape::Class, TypeAttributes::PUBLIC, Some(object));

        for name in [
            VOID,
            BOOLEAN,
            "System.Char",
            "System.SByte",
            "System.Byte",
            "System.Int16",
            "System.UInt16",
            INT32,
            "System.UInt32",
            "System.Int64",
            "System.UInt64",
            "System.Single",
            "System.Double",
            "System.Decimal",
            INT_PTR,
        ] {
            self.platform_type(name, TypeShape::Struct, sealed_struct, Some(value_type));
        }

        let void = self.lookup(VOID).unwrap_or(object);
        let boolean = self.lookup(BOOLEAN).unwrap_or(object);
        let int32 = self.lookup(INT32).unwrap_or(object);
        let int_ptr = self.lookup(INT_PTR).unwrap_or(object);

        let public = MemberAttributes::PUBLIC | MemberAttributes::HIDE_BY_SIG;
        let public_virtual = public | MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT;
        let protected = MemberAttributes::FAMILY | MemberAttributes::HIDE_BY_SIG;
        let ctor = MemberAttributes::SPECIAL_NAME | MemberAttributes::RT_SPECIAL_NAME;
        let iface_method = public_virtual | MemberAttributes::ABSTRACT;

        self.platform_member(object, ".ctor", MemberKind::Constructor, public | ctor, void, vec![]);
        self.platform_member(object, "ToString", MemberKind::Method, public_virtual, string, vec![]);
        self.platform_member(object, "Equals", MemberKind::Method, public_virtual, boolean, vec![object]);
        self.platform_member(object, "GetHashCode", MemberKind::Method, public_virtual, int32, vec![]);
        self.platform_member(object, "GetType", MemberKind::Method, public, type_type, vec![]);
        self.platform_member(
            object,
            "Finalize",
            MemberKind::Method,
            protected | MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT,
            void,
            vec![],
        );
        self.platform_member(object, "MemberwiseClone", MemberKind::Method, protected, object, vec![]);
        self.platform_member(value_type, ".ctor", MemberKind::Constructor, protected | ctor, void, vec![]);
        self.platform_member(attribute, ".ctor", MemberKind::Constructor, protected | ctor, void, vec![]);
        self.platform_member(exception, ".ctor", MemberKind::Constructor, public | ctor, void, vec![]);
        self.platform_member(exception, ".ctor", MemberKind::Constructor, public | ctor, void, vec![string]);
        self.platform_member(event_args, ".ctor", MemberKind::Constructor, public | ctor, void, vec![]);

        let disposable = self.platform_type("System.IDisposable", TypeShape::Interface, iface, None);
        self.platform_member(disposable, "Dispose", MemberKind::Method, iface_method, void, vec![]);
        let cloneable = self.platform_type("System.ICloneable", TypeShape::Interface, iface, None);
        self.platform_member(cloneable, "Clone", MemberKind::Method, iface_method, object, vec![]);
        let comparable = self.platform_type("System.IComparable", TypeShape::Interface, iface, None);
        self.platform_member(comparable, "CompareTo", MemberKind::Method, iface_method, int32, vec![object]);
        let enumerator = self.platform_type("System.Collections.IEnumerator", TypeShape::Interface, iface, None);
        self.platform_member(enumerator, "MoveNext", MemberKind::Method, iface_method, boolean, vec![]);
        self.platform_member(enumerator, "get_Current", MemberKind::Method, iface_method, object, vec![]);
        self.platform_member(enumerator, "Reset", MemberKind::Method, iface_method, void, vec![]);
        let enumerable = self.platform_type("System.Collections.IEnumerable", TypeShape::Interface, iface, None);
        self.platform_member(enumerable, "GetEnumerator", MemberKind::Method, iface_method, enumerator, vec![]);

        let multicast = self.lookup(MULTICAST_DELEGATE).unwrap_or(object);
        let handler = self.platform_type("System.EventHandler", TypeShape::Delegate, sealed_class, Some(multicast));
        self.platform_member(handler, ".ctor", MemberKind::Constructor, public | ctor, void, vec![object, int_ptr]);
        self.platform_member(handler, "Invoke", MemberKind::Method, public_virtual, void, vec![object, event_args]);

        for (name, targets) in [
            (ATTRIBUTE_USAGE, AttributeTargets::CLASS),
            (DLL_IMPORT, AttributeTargets::METHOD),
            (DEFAULT_MEMBER, AttributeTargets::CLASS | AttributeTargets::STRUCT | AttributeTargets::INTERFACE),
            (
                "System.SerializableAttribute",
                AttributeTargets::CLASS | AttributeTargets::STRUCT | AttributeTargets::ENUM | AttributeTargets::DELEGATE,
            ),
            (
                "System.ObsoleteAttribute",
                AttributeTargets::ALL
                    - AttributeTargets::ASSEMBLY
                    - AttributeTargets::MODULE
                    - AttributeTargets::PARAMETER
                    - AttributeTargets::RETURN_VALUE,
            ),
        ] {
            let ty = self.platform_type(name, TypeShape::Class, sealed_class, Some(attribute));
            self.set_attribute_usage(ty, AttributeUsage::on(targets));
        }
    }

    fn platform_type(
        &mut self,
        full_name: &str,
        shape: TypeShape,
        mut attributes: TypeAttributes,
        base: Option<TypeId>,
    ) -> TypeId {
        if shape == TypeShape::Interface {
            attributes |= TypeAttributes::INTERFACE;
        }
        let entry = TypeEntry {
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            full_name: full_name.to_string(),
            shape,
            attributes,
            base,
            interfaces: vec![],
            declaring_type: None,
            members: vec![],
            token: MetadataToken::EXTERNAL,
        };
        self.register_defined_type(entry, None)
    }

    fn platform_member(
        &mut self,
        declaring_type: TypeId,
        name: &str,
        kind: MemberKind,
        attributes: MemberAttributes,
        member_type: TypeId,
        parameters: Vec<TypeId>,
    ) -> MemberId {
        self.add_member(MemberEntry {
            name: name.to_string(),
            kind,
            declaring_type,
            attributes,
            member_type,
            parameters,
            accessors: vec![],
            token: MetadataToken::EXTERNAL,
        })
    }
}
