//! The metadata capability the resolver writes type skeletons through.
//!
//! `MetadataSink` is the only way the resolver produces output; it never
//! depends on a concrete file format. `InMemoryMetadata` records every call
//! and is what the command line driver and the tests use.

use fxhash::FxHashMap;

use crate::attributes::ResolvedAttribute;
use crate::types::{CallingConvention, MemberAttributes, MemberId, TypeAttributes, TypeId};

/// A row handle handed out by the metadata sink. The top byte is the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct MetadataToken(pub u32);

impl MetadataToken {
    /// Platform types and members live outside this module and have no row.
    pub const EXTERNAL: MetadataToken = MetadataToken(0);

    pub const TYPE_TABLE: u8 = 0x02;
    pub const FIELD_TABLE: u8 = 0x04;
    pub const METHOD_TABLE: u8 = 0x06;
    pub const EVENT_TABLE: u8 = 0x14;
    pub const PROPERTY_TABLE: u8 = 0x17;

    pub fn new(table: u8, row: u32) -> Self {
        Self(((table as u32) << 24) | (row & 0x00ff_ffff))
    }

    pub fn table(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn row(self) -> u32 {
        self.0 & 0x00ff_ffff
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub full_name: String,
    pub attributes: TypeAttributes,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Set for nested types.
    pub enclosing: Option<MetadataToken>,
    /// `.size` for value types with no fields.
    pub class_size: Option<u32>,
}

/// Extra data for methods imported from a native library.
#[derive(Debug, Clone, PartialEq)]
pub struct PInvokeInfo {
    pub library: String,
    pub entry_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    pub name: String,
    pub attributes: MemberAttributes,
    pub calling_convention: CallingConvention,
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
    pub parameter_names: Vec<String>,
    pub pinvoke: Option<PInvokeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub attributes: MemberAttributes,
    pub field_type: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    pub property_type: TypeId,
    pub parameters: Vec<TypeId>,
    pub getter: Option<MetadataToken>,
    pub setter: Option<MetadataToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDefinition {
    pub name: String,
    pub event_type: TypeId,
    pub add: Option<MetadataToken>,
    pub remove: Option<MetadataToken>,
}

/// Capability interface for building type and member metadata.
pub trait MetadataSink {
    fn define_type(&mut self, def: TypeDefinition) -> MetadataToken;
    fn define_method(&mut self, owner: MetadataToken, def: MethodDefinition) -> MetadataToken;
    fn define_constructor(&mut self, owner: MetadataToken, def: MethodDefinition) -> MetadataToken;
    fn define_field(&mut self, owner: MetadataToken, def: FieldDefinition) -> MetadataToken;
    fn define_property(&mut self, owner: MetadataToken, def: PropertyDefinition) -> MetadataToken;
    fn define_event(&mut self, owner: MetadataToken, def: EventDefinition) -> MetadataToken;
    /// Records that `body` implements the inherited slot `declaration`.
    fn define_method_override(&mut self, owner: MetadataToken, body: MetadataToken, declaration: MemberId);
    fn set_custom_attribute(&mut self, target: MetadataToken, attribute: ResolvedAttribute);
    fn close_type(&mut self, ty: MetadataToken);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedMember {
    Method(MethodDefinition),
    Constructor(MethodDefinition),
    Field(FieldDefinition),
    Property(PropertyDefinition),
    Event(EventDefinition),
}

impl RecordedMember {
    pub fn name(&self) -> &str {
        match self {
            RecordedMember::Method(m) | RecordedMember::Constructor(m) => &m.name,
            RecordedMember::Field(f) => &f.name,
            RecordedMember::Property(p) => &p.name,
            RecordedMember::Event(e) => &e.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedType {
    pub token: MetadataToken,
    pub definition: TypeDefinition,
    pub members: Vec<MetadataToken>,
    pub overrides: Vec<(MetadataToken, MemberId)>,
    pub closed: bool,
}

/// A `MetadataSink` that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetadata {
    types: Vec<RecordedType>,
    members: FxHashMap<MetadataToken, RecordedMember>,
    attributes: FxHashMap<MetadataToken, Vec<ResolvedAttribute>>,
    next_row: FxHashMap<u8, u32>,
    close_order: Vec<MetadataToken>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&mut self, table: u8) -> MetadataToken {
        let row = self.next_row.entry(table).or_insert(0);
        *row += 1;
        MetadataToken::new(table, *row)
    }

    fn add_member(&mut self, owner: MetadataToken, table: u8, member: RecordedMember) -> MetadataToken {
        let token = self.next_token(table);
        if let Some(ty) = self.type_mut(owner) {
            ty.members.push(token);
        } else {
            log::warn!("Member `{}` defined on unknown type {:?}", member.name(), owner);
        }
        self.members.insert(token, member);
        token
    }

    fn type_mut(&mut self, token: MetadataToken) -> Option<&mut RecordedType> {
        self.types
            .get_mut(token.row().wrapping_sub(1) as usize)
            .filter(|t| t.token == token)
    }

    pub fn types(&self) -> &[RecordedType] {
        &self.types
    }

    pub fn type_named(&self, full_name: &str) -> Option<&RecordedType> {
        self.types.iter().find(|t| t.definition.full_name == full_name)
    }

    pub fn member(&self, token: MetadataToken) -> Option<&RecordedMember> {
        self.members.get(&token)
    }

    /// Members of the named type, in definition order.
    pub fn members_of(&self, full_name: &str) -> Vec<&RecordedMember> {
        self.type_named(full_name)
            .map(|t| t.members.iter().filter_map(|m| self.members.get(m)).collect())
            .unwrap_or_default()
    }

    /// Methods of the named type with the given metadata name.
    pub fn methods_named(&self, full_name: &str, name: &str) -> Vec<&MethodDefinition> {
        self.members_of(full_name)
            .into_iter()
            .filter_map(|m| match m {
                RecordedMember::Method(d) | RecordedMember::Constructor(d) if d.name == name => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn attributes_on(&self, token: MetadataToken) -> &[ResolvedAttribute] {
        self.attributes.get(&token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Type tokens in the order they were closed.
    pub fn close_order(&self) -> &[MetadataToken] {
        &self.close_order
    }
}

impl MetadataSink for InMemoryMetadata {
    fn define_type(&mut self, definition: TypeDefinition) -> MetadataToken {
        let token = self.next_token(MetadataToken::TYPE_TABLE);
        log::trace!("define_type {} -> {:?}", definition.full_name, token);
        self.types.push(RecordedType {
            token,
            definition,
            members: vec![],
            overrides: vec![],
            closed: false,
        });
        token
    }

    fn define_method(&mut self, owner: MetadataToken, def: MethodDefinition) -> MetadataToken {
        self.add_member(owner, MetadataToken::METHOD_TABLE, RecordedMember::Method(def))
    }

    fn define_constructor(&mut self, owner: MetadataToken, def: MethodDefinition) -> MetadataToken {
        self.add_member(owner, MetadataToken::METHOD_TABLE, RecordedMember::Constructor(def))
    }

    fn define_field(&mut self, owner: MetadataToken, def: FieldDefinition) -> MetadataToken {
        self.add_member(owner, MetadataToken::FIELD_TABLE, RecordedMember::Field(def))
    }

    fn define_property(&mut self, owner: MetadataToken, def: PropertyDefinition) -> MetadataToken {
        self.add_member(owner, MetadataToken::PROPERTY_TABLE, RecordedMember::Property(def))
    }

    fn define_event(&mut self, owner: MetadataToken, def: EventDefinition) -> MetadataToken {
        self.add_member(owner, MetadataToken::EVENT_TABLE, RecordedMember::Event(def))
    }

    fn define_method_override(&mut self, owner: MetadataToken, body: MetadataToken, declaration: MemberId) {
        if let Some(ty) = self.type_mut(owner) {
            ty.overrides.push((body, declaration));
        }
    }

    fn set_custom_attribute(&mut self, target: MetadataToken, attribute: ResolvedAttribute) {
        self.attributes.entry(target).or_default().push(attribute);
    }

    fn close_type(&mut self, ty: MetadataToken) {
        if let Some(t) = self.type_mut(ty) {
            t.closed = true;
        }
        self.close_order.push(ty);
    }
}
