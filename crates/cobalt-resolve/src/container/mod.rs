//! Type containers: the owning record of one declared type.
//!
//! A container is created by the declaration pass, filled through its
//! `add_*` methods, and then driven through `DefineType`, `Populate`,
//! `Emit` and `CloseType` by the phase driver.

mod bases;
pub(crate) mod declare;
pub(crate) mod define;
pub(crate) mod emit;
pub(crate) mod populate;

use fxhash::{FxHashMap, FxHashSet};

use cobalt_source::Location;
use cobalt_syntax::{
    AttributeUse, ConstantDecl, ConstructorDecl, EnumMemberDecl, EventDecl, FieldDecl, IndexerDecl,
    MethodDecl, Modifiers, OperatorDecl, Parameter, PropertyDecl,
};

use crate::attributes::AttributeTargets;
use crate::members::{
    ConstantMember, ConstructorMember, EventMember, FieldMember, IndexerMember, MethodMember,
    OperatorMember, PropertyMember,
};
use crate::namespace::NamespaceId;
use crate::pending::PendingImplementationTable;
use crate::types::{ContainerId, MethodSignature, TypeId};

/// The kind of declaration a container holds, with the data only that kind
/// carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerShape {
    /// The implicit container of all top-level types.
    Root,
    Class,
    Struct,
    Interface,
    Enum { underlying: String },
    Delegate { return_type: String, parameters: Vec<Parameter> },
}

impl ContainerShape {
    /// The word used for this kind of type in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            ContainerShape::Root => "namespace",
            ContainerShape::Class => "Class",
            ContainerShape::Struct => "Struct",
            ContainerShape::Interface => "Interface",
            ContainerShape::Enum { .. } => "Enum",
            ContainerShape::Delegate { .. } => "Delegate",
        }
    }

    pub fn attribute_target(&self) -> AttributeTargets {
        match self {
            ContainerShape::Root => AttributeTargets::MODULE,
            ContainerShape::Class => AttributeTargets::CLASS,
            ContainerShape::Struct => AttributeTargets::STRUCT,
            ContainerShape::Interface => AttributeTargets::INTERFACE,
            ContainerShape::Enum { .. } => AttributeTargets::ENUM,
            ContainerShape::Delegate { .. } => AttributeTargets::DELEGATE,
        }
    }
}

/// Outcome of an `add_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionResult {
    Success,
    /// Another member of an incompatible kind already uses the name.
    NameExists,
    /// The member is named like its enclosing type.
    EnclosingClass,
    /// A constructor whose name is not the type's name: really a method
    /// missing its return type.
    NotAConstructor,
}

/// What a name in the container's declaration space refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Type,
    Field,
    Method,
    Property,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PopulateState {
    Pending,
    InProgress,
    Done,
}

#[derive(Debug)]
pub struct TypeContainer {
    /// Simple name; empty for the root.
    pub name: String,
    pub full_name: String,
    pub shape: ContainerShape,
    pub modifiers: Modifiers,
    pub location: Location,
    pub namespace: NamespaceId,
    pub parent: Option<ContainerId>,
    pub attributes: Vec<AttributeUse>,
    /// The base list as written.
    pub base_names: Vec<String>,

    /// Nested classes and structs.
    pub types: Vec<ContainerId>,
    pub interfaces: Vec<ContainerId>,
    pub enums: Vec<ContainerId>,
    pub delegates: Vec<ContainerId>,
    pub enum_members: Vec<EnumMemberDecl>,
    pub constants: Vec<ConstantMember>,
    pub fields: Vec<FieldMember>,
    /// Indices into `fields` of instance fields with an initializer.
    pub initialized_fields: Vec<usize>,
    /// Indices into `fields` of static fields with an initializer.
    pub initialized_static_fields: Vec<usize>,
    pub constructors: Vec<ConstructorMember>,
    /// Index into `constructors` of the synthesized instance constructor.
    pub default_constructor: Option<usize>,
    /// Index into `constructors` of the synthesized static constructor.
    pub default_static_constructor: Option<usize>,
    pub methods: Vec<MethodMember>,
    pub properties: Vec<PropertyMember>,
    pub events: Vec<EventMember>,
    pub indexers: Vec<IndexerMember>,
    pub operators: Vec<OperatorMember>,

    defined_names: FxHashMap<String, NameKind>,

    /// Set once `DefineType` succeeds.
    pub type_id: Option<TypeId>,
    pub base: Option<TypeId>,
    /// The transitive interface set.
    pub interface_ids: Vec<TypeId>,
    /// Integral type of an enum.
    pub underlying_type: Option<TypeId>,
    pub(crate) pending: Option<PendingImplementationTable>,
    /// Method and operator signatures defined so far.
    pub(crate) signatures: FxHashSet<MethodSignature>,
    /// Indexer parameter lists defined so far.
    pub(crate) indexer_signatures: FxHashSet<Vec<TypeId>>,
    pub(crate) populate_state: PopulateState,
    /// Whether `Emit` completed without a type-level failure.
    pub emitted: bool,
}

impl TypeContainer {
    pub fn new(
        name: String,
        full_name: String,
        shape: ContainerShape,
        namespace: NamespaceId,
        parent: Option<ContainerId>,
        location: Location,
    ) -> Self {
        Self {
            name,
            full_name,
            shape,
            modifiers: Modifiers::empty(),
            location,
            namespace,
            parent,
            attributes: vec![],
            base_names: vec![],
            types: vec![],
            interfaces: vec![],
            enums: vec![],
            delegates: vec![],
            enum_members: vec![],
            constants: vec![],
            fields: vec![],
            initialized_fields: vec![],
            initialized_static_fields: vec![],
            constructors: vec![],
            default_constructor: None,
            default_static_constructor: None,
            methods: vec![],
            properties: vec![],
            events: vec![],
            indexers: vec![],
            operators: vec![],
            defined_names: FxHashMap::default(),
            type_id: None,
            base: None,
            interface_ids: vec![],
            underlying_type: None,
            pending: None,
            signatures: FxHashSet::default(),
            indexer_signatures: FxHashSet::default(),
            populate_state: PopulateState::Pending,
            emitted: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.shape == ContainerShape::Root
    }

    pub fn is_class(&self) -> bool {
        self.shape == ContainerShape::Class
    }

    pub fn is_struct(&self) -> bool {
        self.shape == ContainerShape::Struct
    }

    pub fn is_interface(&self) -> bool {
        self.shape == ContainerShape::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Nested declarations of every kind, in the order they are defined.
    pub fn nested(&self) -> Vec<ContainerId> {
        self.types
            .iter()
            .chain(&self.interfaces)
            .chain(&self.delegates)
            .chain(&self.enums)
            .copied()
            .collect()
    }

    pub fn has_static_constructor(&self) -> bool {
        self.constructors.iter().any(|c| c.is_static())
    }

    pub fn has_instance_constructor(&self) -> bool {
        self.constructors.iter().any(|c| !c.is_static())
    }

    /// Checks `name` against the declaration space and claims it for `kind`.
    fn claim(&mut self, name: &str, kind: NameKind) -> AdditionResult {
        if !self.is_root() && name == self.name {
            return AdditionResult::EnclosingClass;
        }
        match self.defined_names.get(name) {
            Some(NameKind::Method) if kind == NameKind::Method => AdditionResult::Success,
            Some(_) => AdditionResult::NameExists,
            None => {
                self.defined_names.insert(name.to_string(), kind);
                AdditionResult::Success
            }
        }
    }

    /// Nested types are keyed by simple name; the root keys them by full
    /// name, since it holds the top-level types of every namespace.
    fn add_type(&mut self, key: &str, id: ContainerId, bucket: fn(&mut Self) -> &mut Vec<ContainerId>) -> AdditionResult {
        let result = self.claim(key, NameKind::Type);
        if result == AdditionResult::Success {
            bucket(self).push(id);
        }
        result
    }

    pub fn add_class(&mut self, key: &str, id: ContainerId) -> AdditionResult {
        self.add_type(key, id, |c| &mut c.types)
    }

    pub fn add_struct(&mut self, key: &str, id: ContainerId) -> AdditionResult {
        self.add_type(key, id, |c| &mut c.types)
    }

    pub fn add_interface(&mut self, key: &str, id: ContainerId) -> AdditionResult {
        self.add_type(key, id, |c| &mut c.interfaces)
    }

    pub fn add_enum(&mut self, key: &str, id: ContainerId) -> AdditionResult {
        self.add_type(key, id, |c| &mut c.enums)
    }

    pub fn add_delegate(&mut self, key: &str, id: ContainerId) -> AdditionResult {
        self.add_type(key, id, |c| &mut c.delegates)
    }

    pub fn add_enum_member(&mut self, member: EnumMemberDecl) -> AdditionResult {
        let result = self.claim(&member.name, NameKind::Field);
        if result == AdditionResult::Success {
            self.enum_members.push(member);
        }
        result
    }

    pub fn add_field(&mut self, decl: FieldDecl) -> AdditionResult {
        let result = self.claim(&decl.name, NameKind::Field);
        if result != AdditionResult::Success {
            return result;
        }
        let index = self.fields.len();
        if decl.initializer.is_some() {
            if decl.modifiers.contains(Modifiers::STATIC) {
                self.initialized_static_fields.push(index);
            } else {
                self.initialized_fields.push(index);
            }
        }
        self.fields.push(FieldMember::new(decl));
        result
    }

    pub fn add_constant(&mut self, decl: ConstantDecl) -> AdditionResult {
        let result = self.claim(&decl.name, NameKind::Field);
        if result == AdditionResult::Success {
            self.constants.push(ConstantMember::new(decl));
        }
        result
    }

    pub fn add_method(&mut self, decl: MethodDecl) -> AdditionResult {
        let result = self.claim(&decl.name, NameKind::Method);
        if result == AdditionResult::Success {
            self.methods.push(MethodMember::new(decl));
        }
        result
    }

    pub fn add_constructor(&mut self, decl: ConstructorDecl) -> AdditionResult {
        if decl.name != self.name {
            return AdditionResult::NotAConstructor;
        }
        self.constructors.push(ConstructorMember::declared(decl));
        AdditionResult::Success
    }

    pub fn add_property(&mut self, decl: PropertyDecl) -> AdditionResult {
        let result = self.claim(&decl.name, NameKind::Property);
        if result == AdditionResult::Success {
            self.properties.push(PropertyMember::new(decl));
        }
        result
    }

    pub fn add_event(&mut self, decl: EventDecl) -> AdditionResult {
        let result = self.claim(&decl.name, NameKind::Event);
        if result == AdditionResult::Success {
            self.events.push(EventMember::new(decl));
        }
        result
    }

    /// Indexers overload on their parameters, so only the type name is
    /// checked here.
    pub fn add_indexer(&mut self, decl: IndexerDecl) -> AdditionResult {
        if self.name == crate::members::INDEXER_NAME {
            return AdditionResult::EnclosingClass;
        }
        self.indexers.push(IndexerMember::new(decl));
        AdditionResult::Success
    }

    /// Operators overload freely; signature clashes surface in `Populate`.
    pub fn add_operator(&mut self, decl: OperatorDecl) -> AdditionResult {
        self.operators.push(OperatorMember::new(decl));
        AdditionResult::Success
    }
}
