//! `Emit`: check a populated type for consistency and hand its attributes
//! and member bodies on.

use cobalt_syntax::AttributeValue;

use crate::attributes::ResolvedAttribute;
use crate::container::define::type_token;
use crate::container::PopulateState;
use crate::context::{CompilationContext, DefinitionStatus};
use crate::members::{emit_attributes, INDEXER_NAME};
use crate::registry::DEFAULT_MEMBER;
use crate::types::ContainerId;

/// Emits container `id`. Returns whether it was emitted; a type with
/// unimplemented interface or abstract members is not, and is never
/// closed.
pub fn emit_type(ctx: &mut CompilationContext<'_>, id: ContainerId) -> bool {
    if ctx.status(id) != DefinitionStatus::Defined || ctx.container(id).populate_state != PopulateState::Done {
        return false;
    }
    if ctx.container(id).emitted {
        return true;
    }
    log::debug!("Emitting {}", ctx.container(id).full_name);

    // Constant values first: other initializers may refer to them.
    let constants = std::mem::take(&mut ctx.container_mut(id).constants);
    for constant in &constants {
        constant.emit(ctx, id);
    }
    ctx.container_mut(id).constants = constants;

    let container = ctx.container(id);
    if let Some(pending) = &container.pending {
        let errors = pending.verify_all_satisfied(&ctx.registry, &container.full_name);
        if !errors.is_empty() {
            let location = container.location;
            for e in errors {
                ctx.error(location, e);
            }
            return false;
        }
    }

    let token = type_token(ctx, id);
    let attributes = ctx.container(id).attributes.clone();
    let target = ctx.container(id).shape.attribute_target();
    emit_attributes(ctx, id, token, &attributes, target);
    if !ctx.container(id).indexers.is_empty() {
        if let Some(default_member) = ctx.registry.lookup(DEFAULT_MEMBER) {
            let attribute = ResolvedAttribute {
                attribute_type: default_member,
                type_name: DEFAULT_MEMBER.to_string(),
                arguments: vec![AttributeValue::String(INDEXER_NAME.to_string())],
                named: vec![],
            };
            ctx.metadata.set_custom_attribute(token, attribute);
        }
    }

    let fields = std::mem::take(&mut ctx.container_mut(id).fields);
    for field in &fields {
        field.emit(ctx, id);
    }
    ctx.container_mut(id).fields = fields;

    let constructors = std::mem::take(&mut ctx.container_mut(id).constructors);
    for constructor in &constructors {
        constructor.emit(ctx, id);
    }
    ctx.container_mut(id).constructors = constructors;

    let methods = std::mem::take(&mut ctx.container_mut(id).methods);
    for method in &methods {
        method.emit(ctx, id);
    }
    ctx.container_mut(id).methods = methods;

    let properties = std::mem::take(&mut ctx.container_mut(id).properties);
    for property in &properties {
        property.emit(ctx, id);
    }
    ctx.container_mut(id).properties = properties;

    let events = std::mem::take(&mut ctx.container_mut(id).events);
    for event in &events {
        event.emit(ctx, id);
    }
    ctx.container_mut(id).events = events;

    let indexers = std::mem::take(&mut ctx.container_mut(id).indexers);
    for indexer in &indexers {
        indexer.emit(ctx, id);
    }
    ctx.container_mut(id).indexers = indexers;

    let operators = std::mem::take(&mut ctx.container_mut(id).operators);
    for operator in &operators {
        operator.emit(ctx, id);
    }
    ctx.container_mut(id).operators = operators;

    ctx.container_mut(id).emitted = true;
    true
}
