//! `Populate`: define every member of a defined type.

use crate::container::{ContainerShape, PopulateState};
use crate::context::{CompilationContext, DefinitionStatus};
use crate::error::ResolutionError;
use crate::members::{
    define_delegate_members, define_enum_fields, record_attribute_usage, resolve_initializers, synthesize_constructors,
};
use crate::pending::PendingImplementationTable;
use crate::types::ContainerId;

/// Defines the members of container `id`, after those of its base and
/// interfaces when they are declared in this program.
///
/// Members that fail are dropped, so `Emit` only sees what was defined.
pub fn populate_type(ctx: &mut CompilationContext<'_>, id: ContainerId) {
    if ctx.status(id) != DefinitionStatus::Defined {
        return;
    }
    if ctx.container(id).populate_state != PopulateState::Pending {
        return;
    }
    ctx.container_mut(id).populate_state = PopulateState::InProgress;
    log::debug!("Populating {}", ctx.container(id).full_name);

    // Overrides and interface slots are matched against inherited members,
    // which must be registered first.
    let container = ctx.container(id);
    let supertypes: Vec<ContainerId> = container
        .base
        .into_iter()
        .chain(container.interface_ids.iter().copied())
        .filter_map(|t| ctx.registry.lookup_container(t))
        .collect();
    for supertype in supertypes {
        populate_type(ctx, supertype);
    }

    record_attribute_usage(ctx, id);

    match ctx.container(id).shape {
        ContainerShape::Enum { .. } => define_enum_fields(ctx, id),
        ContainerShape::Delegate { .. } => define_delegate_members(ctx, id),
        _ => populate_members(ctx, id),
    }

    for nested in ctx.container(id).nested() {
        populate_type(ctx, nested);
    }
    ctx.container_mut(id).populate_state = PopulateState::Done;
}

fn populate_members(ctx: &mut CompilationContext<'_>, id: ContainerId) {
    // --- Constants and fields ---
    let mut constants = std::mem::take(&mut ctx.container_mut(id).constants);
    for constant in constants.iter_mut() {
        constant.define(ctx, id);
    }
    ctx.container_mut(id).constants = constants;

    let mut fields = std::mem::take(&mut ctx.container_mut(id).fields);
    for field in fields.iter_mut() {
        field.define(ctx, id);
    }
    ctx.container_mut(id).fields = fields;

    // --- Implicit constructors ---
    synthesize_constructors(ctx, id);
    if ctx.container(id).is_struct() {
        // Struct instance initializers are rejected and never run.
        let rejected = std::mem::take(&mut ctx.container_mut(id).initialized_fields);
        let container = ctx.container(id);
        let offenders: Vec<_> = rejected
            .iter()
            .filter_map(|i| container.fields.get(*i))
            .map(|f| (format!("{}.{}", container.full_name, f.decl.name), f.decl.location))
            .collect();
        for (field, location) in offenders {
            ctx.error(location, ResolutionError::StructFieldInitializer { field });
        }
    }

    // --- Pending implementations ---
    let container = ctx.container(id);
    if container.is_class() || container.is_struct() {
        let table = PendingImplementationTable::build(
            &ctx.registry,
            &container.interface_ids,
            container.base,
            container.is_abstract(),
        );
        ctx.container_mut(id).pending = Some(table);
    }

    // --- Constructors ---
    let mut constructors = std::mem::take(&mut ctx.container_mut(id).constructors);
    constructors.retain_mut(|c| c.define(ctx, id));
    resolve_initializers(ctx, id, &mut constructors);
    let container = ctx.container_mut(id);
    container.default_constructor = constructors.iter().position(|c| c.synthesized && !c.is_static());
    container.default_static_constructor = constructors.iter().position(|c| c.synthesized && c.is_static());
    container.constructors = constructors;

    // --- Methods ---
    let mut methods = std::mem::take(&mut ctx.container_mut(id).methods);
    methods.retain_mut(|m| m.define(ctx, id));
    ctx.container_mut(id).methods = methods;

    // --- Properties, events, indexers, operators ---
    let mut properties = std::mem::take(&mut ctx.container_mut(id).properties);
    properties.retain_mut(|p| p.define(ctx, id));
    ctx.container_mut(id).properties = properties;

    let mut events = std::mem::take(&mut ctx.container_mut(id).events);
    events.retain_mut(|e| e.define(ctx, id));
    ctx.container_mut(id).events = events;

    let mut indexers = std::mem::take(&mut ctx.container_mut(id).indexers);
    indexers.retain_mut(|i| i.define(ctx, id));
    ctx.container_mut(id).indexers = indexers;

    let mut operators = std::mem::take(&mut ctx.container_mut(id).operators);
    operators.retain_mut(|o| o.define(ctx, id));
    ctx.container_mut(id).operators = operators;
}
