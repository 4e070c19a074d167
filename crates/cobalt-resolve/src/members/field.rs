use cobalt_syntax::{ConstantDecl, FieldDecl, Modifiers};

use crate::attributes::AttributeTargets;
use crate::container::define::type_token;
use crate::container::ContainerShape;
use crate::context::CompilationContext;
use crate::members::emit_attributes;
use crate::members::method::member_modifiers;
use crate::metadata::{FieldDefinition, MetadataToken, MethodDefinition};
use crate::modifiers::{self, member_access};
use crate::registry::{INT_PTR, OBJECT};
use crate::resolver::{resolve_parameters, resolve_type};
use crate::types::{CallingConvention, ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, TypeId};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMember {
    pub decl: FieldDecl,
    pub handle: Option<MemberId>,
}

impl FieldMember {
    pub fn new(decl: FieldDecl) -> Self {
        Self { decl, handle: None }
    }

    pub fn is_static(&self) -> bool {
        self.decl.modifiers.contains(Modifiers::STATIC)
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let container = ctx.container(owner);
        let (in_interface, in_struct) = (container.is_interface(), container.is_struct());
        let mods = member_modifiers(ctx, modifiers::FIELD, self.decl.modifiers, in_interface, in_struct, self.decl.location);
        let Ok(ty) = resolve_type(ctx, owner, &self.decl.ty, self.decl.location) else {
            return false;
        };
        let mut attributes = member_access(mods);
        if mods.contains(Modifiers::STATIC) {
            attributes |= MemberAttributes::STATIC;
        }
        if mods.contains(Modifiers::READONLY) {
            attributes |= MemberAttributes::INIT_ONLY;
        }
        self.handle = define_field(ctx, owner, &self.decl.name, attributes, ty);
        self.handle.is_some()
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        let token = ctx.registry.member(handle).token;
        emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::FIELD);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMember {
    pub decl: ConstantDecl,
    pub handle: Option<MemberId>,
}

impl ConstantMember {
    pub fn new(decl: ConstantDecl) -> Self {
        Self { decl, handle: None }
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let container = ctx.container(owner);
        let (in_interface, in_struct) = (container.is_interface(), container.is_struct());
        let mods = member_modifiers(ctx, modifiers::CONSTANT, self.decl.modifiers, in_interface, in_struct, self.decl.location);
        let Ok(ty) = resolve_type(ctx, owner, &self.decl.ty, self.decl.location) else {
            return false;
        };
        let attributes = member_access(mods) | MemberAttributes::STATIC | MemberAttributes::LITERAL | MemberAttributes::HAS_DEFAULT;
        self.handle = define_field(ctx, owner, &self.decl.name, attributes, ty);
        self.handle.is_some()
    }

    /// Evaluates the value into the field's default, then applies the
    /// attributes.
    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        let entry = ctx.registry.member(handle);
        let (token, ty) = (entry.token, entry.member_type);
        ctx.emitter.emit_constant(handle, ty, self.decl.value);
        emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::FIELD);
    }
}

fn define_field(ctx: &mut CompilationContext<'_>, owner: ContainerId, name: &str, attributes: MemberAttributes, field_type: TypeId) -> Option<MemberId> {
    let declaring_type = ctx.type_of(owner)?;
    let owner_token = type_token(ctx, owner);
    let token = ctx.metadata.define_field(
        owner_token,
        FieldDefinition { name: name.to_string(), attributes, field_type },
    );
    Some(ctx.registry.add_member(MemberEntry {
        name: name.to_string(),
        kind: MemberKind::Field,
        declaring_type,
        attributes,
        member_type: field_type,
        parameters: vec![],
        accessors: vec![],
        token,
    }))
}

/// Defines `value__` and one literal per enum member. Members with an
/// explicit value hand it to the code emitter.
pub(crate) fn define_enum_fields(ctx: &mut CompilationContext<'_>, owner: ContainerId) {
    let container = ctx.container(owner);
    let (Some(enum_type), Some(underlying)) = (container.type_id, container.underlying_type) else {
        return;
    };
    let members = container.enum_members.clone();
    let value_field = MemberAttributes::PUBLIC | MemberAttributes::SPECIAL_NAME | MemberAttributes::RT_SPECIAL_NAME;
    define_field(ctx, owner, "value__", value_field, underlying);

    let literal = MemberAttributes::PUBLIC | MemberAttributes::STATIC | MemberAttributes::LITERAL | MemberAttributes::HAS_DEFAULT;
    for member in members {
        if let Some(field) = define_field(ctx, owner, &member.name, literal, enum_type) {
            if let Some(value) = member.value {
                ctx.emitter.emit_constant(field, enum_type, value);
            }
        }
    }
}

/// Defines a delegate's runtime-managed constructor and `Invoke`.
pub(crate) fn define_delegate_members(ctx: &mut CompilationContext<'_>, owner: ContainerId) {
    let container = ctx.container(owner);
    let Some(delegate) = container.type_id else { return };
    let ContainerShape::Delegate { return_type, parameters } = container.shape.clone() else {
        return;
    };
    let location = container.location;
    let (Some(object), Some(int_ptr), Some(void)) = (
        ctx.registry.lookup(OBJECT),
        ctx.registry.lookup(INT_PTR),
        ctx.registry.void_type(),
    ) else {
        log::warn!("Delegate {} defined without the platform library", container.full_name);
        return;
    };
    let Ok(return_type) = resolve_type(ctx, owner, &return_type, location) else { return };
    let Ok(parameter_types) = resolve_parameters(ctx, owner, &parameters, location) else { return };

    let runtime = MemberAttributes::PUBLIC | MemberAttributes::HIDE_BY_SIG | MemberAttributes::RUNTIME_MANAGED;
    let ctor = runtime | MemberAttributes::SPECIAL_NAME | MemberAttributes::RT_SPECIAL_NAME;
    let invoke = runtime | MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT;
    let owner_token = type_token(ctx, owner);

    let ctor_def = MethodDefinition {
        name: ".ctor".into(),
        attributes: ctor,
        calling_convention: CallingConvention::HasThis,
        return_type: void,
        parameters: vec![object, int_ptr],
        parameter_names: vec!["object".into(), "method".into()],
        pinvoke: None,
    };
    let token = ctx.metadata.define_constructor(owner_token, ctor_def.clone());
    add_runtime_member(ctx, delegate, ctor_def, MemberKind::Constructor, token);

    let invoke_def = MethodDefinition {
        name: "Invoke".into(),
        attributes: invoke,
        calling_convention: CallingConvention::HasThis,
        return_type,
        parameters: parameter_types,
        parameter_names: parameters.iter().map(|p| p.name.clone()).collect(),
        pinvoke: None,
    };
    let token = ctx.metadata.define_method(owner_token, invoke_def.clone());
    add_runtime_member(ctx, delegate, invoke_def, MemberKind::Method, token);
}

fn add_runtime_member(ctx: &mut CompilationContext<'_>, declaring_type: TypeId, def: MethodDefinition, kind: MemberKind, token: MetadataToken) -> MemberId {
    ctx.registry.add_member(MemberEntry {
        name: def.name,
        kind,
        declaring_type,
        attributes: def.attributes,
        member_type: def.return_type,
        parameters: def.parameters,
        accessors: vec![],
        token,
    })
}
