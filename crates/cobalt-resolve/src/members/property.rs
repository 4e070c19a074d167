use cobalt_source::Location;
use cobalt_syntax::{AccessorDecl, AttributeUse, BlockId, Modifiers, PropertyDecl};

use crate::attributes::AttributeTargets;
use crate::container::define::type_token;
use crate::context::CompilationContext;
use crate::emitter::BodyKind;
use crate::error::ResolutionError;
use crate::members::method::{commit_method, find_inherited, member_modifiers, prepare_method, MethodData};
use crate::members::{check_base_relation, emit_attributes, emit_body, split_explicit_name};
use crate::metadata::PropertyDefinition;
use crate::modifiers::{self, method_modifier_errors};
use crate::registry::MemberFilter;
use crate::resolver::resolve_type;
use crate::types::{ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, TypeId};

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    pub decl: PropertyDecl,
    pub handle: Option<MemberId>,
    pub getter: Option<MemberId>,
    pub setter: Option<MemberId>,
}

impl PropertyMember {
    pub fn new(decl: PropertyDecl) -> Self {
        Self { decl, handle: None, getter: None, setter: None }
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let decl = &self.decl;
        let container = ctx.container(owner);
        let (in_interface, in_struct) = (container.is_interface(), container.is_struct());

        let (name, explicit) = match split_explicit_name(&decl.name) {
            Some((iface, short)) => {
                if decl.modifiers.intersects(Modifiers::PUBLIC | Modifiers::ABSTRACT) {
                    ctx.error(decl.location, ResolutionError::ExplicitInterfaceModifiers);
                    return false;
                }
                let Ok(iface) = resolve_type(ctx, owner, iface, decl.location) else { return false };
                (short.to_string(), Some(iface))
            }
            None => (decl.name.clone(), None),
        };
        let Ok(ty) = resolve_type(ctx, owner, &decl.ty, decl.location) else { return false };
        let mods = member_modifiers(ctx, modifiers::PROPERTY, decl.modifiers, in_interface, in_struct, decl.location);

        let shape = PropertyShape {
            name,
            explicit,
            ty,
            parameters: vec![],
            parameter_names: vec![],
            modifiers: mods,
            get: decl.get.as_ref(),
            set: decl.set.as_ref(),
            location: decl.location,
            kind: "property",
            check_base: true,
        };
        match define_property_like(ctx, owner, shape) {
            Some((handle, getter, setter)) => {
                self.handle = Some(handle);
                self.getter = getter;
                self.setter = setter;
                true
            }
            None => false,
        }
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        emit_property_like(ctx, owner, self.handle, &self.decl.attributes, [
            (self.getter, self.decl.get.as_ref()),
            (self.setter, self.decl.set.as_ref()),
        ]);
    }
}

/// A property or an indexer, with its types resolved.
pub(crate) struct PropertyShape<'d> {
    pub name: String,
    pub explicit: Option<TypeId>,
    pub ty: TypeId,
    /// Index parameters; empty for properties.
    pub parameters: Vec<TypeId>,
    pub parameter_names: Vec<String>,
    pub modifiers: Modifiers,
    pub get: Option<&'d AccessorDecl>,
    pub set: Option<&'d AccessorDecl>,
    pub location: Location,
    /// "property" or "indexer".
    pub kind: &'static str,
    pub check_base: bool,
}

/// Defines the accessors and then the property itself.
pub(crate) fn define_property_like(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    shape: PropertyShape<'_>,
) -> Option<(MemberId, Option<MemberId>, Option<MemberId>)> {
    let container = ctx.container(owner);
    let declaring_type = container.type_id?;
    let in_interface = container.is_interface();
    let container_abstract = container.is_abstract();
    let base = container.base;
    let display = ctx.make_name(owner, &shape.name);

    if shape.get.is_none() && shape.set.is_none() {
        let member = format!("{}.{}", ctx.container(owner).full_name, shape.name);
        ctx.error(shape.location, ResolutionError::NoAccessors { member });
        return None;
    }

    if !in_interface && shape.explicit.is_none() {
        let errors = method_modifier_errors(shape.modifiers, &display, container_abstract);
        if !errors.is_empty() {
            for e in errors {
                ctx.error(shape.location, e);
            }
            return None;
        }
        if let Some(base) = base.filter(|_| shape.check_base) {
            let hit = find_inherited(ctx, base, MemberFilter::Name(MemberKind::Property, &shape.name))
                .filter(|m| {
                    let e = ctx.registry.member(*m);
                    e.member_type == shape.ty && e.parameters == shape.parameters
                });
            if !check_base_relation(ctx, owner, &shape.name, shape.modifiers, hit, shape.location) {
                return None;
            }
        }
    }

    let getter = match shape.get {
        Some(get) => Some(prepare_method(
            ctx,
            owner,
            MethodData {
                name: format!("get_{}", shape.name),
                explicit_interface: shape.explicit,
                return_type: shape.ty,
                parameters: shape.parameters.clone(),
                parameter_names: shape.parameter_names.clone(),
                modifiers: shape.modifiers,
                has_body: get.body.is_some(),
                body_required: true,
                special_name: true,
                check_base: false,
                validate_modifiers: false,
                attributes: &get.attributes,
                location: shape.location,
                what: format!("the get method of {} `{}'", shape.kind, shape.name),
            },
        )?),
        None => None,
    };
    let setter = match shape.set {
        Some(set) => {
            let void = ctx.registry.void_type().unwrap_or(shape.ty);
            let mut parameters = shape.parameters.clone();
            parameters.push(shape.ty);
            let mut parameter_names = shape.parameter_names.clone();
            parameter_names.push("value".to_string());
            Some(prepare_method(
                ctx,
                owner,
                MethodData {
                    name: format!("set_{}", shape.name),
                    explicit_interface: shape.explicit,
                    return_type: void,
                    parameters,
                    parameter_names,
                    modifiers: shape.modifiers,
                    has_body: set.body.is_some(),
                    body_required: true,
                    special_name: true,
                    check_base: false,
                    validate_modifiers: false,
                    attributes: &set.attributes,
                    location: shape.location,
                    what: format!("the set method of {} `{}'", shape.kind, shape.name),
                },
            )?)
        }
        None => None,
    };
    // Neither accessor is registered until both passed their checks.
    let getter = getter.map(|g| commit_method(ctx, owner, g));
    let setter = setter.map(|s| commit_method(ctx, owner, s));

    let metadata_name = match shape.explicit {
        Some(iface) => format!("{}.{}", ctx.registry.name(iface), shape.name),
        None => shape.name.clone(),
    };
    let token_of = |ctx: &CompilationContext<'_>, m: Option<MemberId>| m.map(|m| ctx.registry.member(m).token);
    let (get_token, set_token) = (token_of(ctx, getter), token_of(ctx, setter));
    let owner_token = type_token(ctx, owner);
    let token = ctx.metadata.define_property(
        owner_token,
        PropertyDefinition {
            name: metadata_name.clone(),
            property_type: shape.ty,
            parameters: shape.parameters.clone(),
            getter: get_token,
            setter: set_token,
        },
    );
    let accessors: Vec<MemberId> = getter.into_iter().chain(setter).collect();
    let attributes = accessor_summary(ctx, &accessors);
    let handle = ctx.registry.add_member(MemberEntry {
        name: metadata_name,
        kind: MemberKind::Property,
        declaring_type,
        attributes,
        member_type: shape.ty,
        parameters: shape.parameters,
        accessors,
        token,
    });
    Some((handle, getter, setter))
}

/// The bits of the accessors' attributes a property or event reports as
/// its own, so base searches can tell whether it is overridable.
pub(crate) fn accessor_summary(ctx: &CompilationContext<'_>, accessors: &[MemberId]) -> MemberAttributes {
    let keep = MemberAttributes::ACCESS_MASK
        | MemberAttributes::STATIC
        | MemberAttributes::VIRTUAL
        | MemberAttributes::ABSTRACT
        | MemberAttributes::NEW_SLOT;
    accessors
        .iter()
        .fold(MemberAttributes::empty(), |acc, m| acc | (ctx.registry.member(*m).attributes & keep))
}

/// Applies a property's attributes, then each accessor's attributes and
/// body.
pub(crate) fn emit_property_like(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    handle: Option<MemberId>,
    attributes: &[AttributeUse],
    accessors: [(Option<MemberId>, Option<&AccessorDecl>); 2],
) {
    let Some(handle) = handle else { return };
    let token = ctx.registry.member(handle).token;
    if !emit_attributes(ctx, owner, token, attributes, AttributeTargets::PROPERTY) {
        return;
    }
    for (method, decl) in accessors {
        let (Some(method), Some(decl)) = (method, decl) else { continue };
        emit_accessor(ctx, owner, method, decl.body, &decl.attributes, false);
    }
}

/// Applies an accessor's attributes and hands its body on. Abstract and
/// external accessors have no body; synthesized ones get an empty block.
pub(crate) fn emit_accessor(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    method: MemberId,
    body: Option<BlockId>,
    attributes: &[AttributeUse],
    synthesized: bool,
) {
    let token = ctx.registry.member(method).token;
    if !emit_attributes(ctx, owner, token, attributes, AttributeTargets::METHOD) {
        return;
    }
    if ctx.registry.member(method).is_abstract() || (body.is_none() && !synthesized) {
        return;
    }
    emit_body(ctx, method, body, BodyKind::Accessor);
}
