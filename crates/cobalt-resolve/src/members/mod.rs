//! Member definers, one per member kind.
//!
//! Each kind keeps its declaration next to the handle `Populate` gives it
//! and exposes `define` (resolve, validate, register) and `emit` (apply
//! attributes, hand the body to the code emitter).

mod constructor;
mod event;
mod field;
mod indexer;
mod method;
mod operator;
mod property;

pub use constructor::ConstructorMember;
pub use event::EventMember;
pub use field::{ConstantMember, FieldMember};
pub use indexer::{IndexerMember, INDEXER_NAME};
pub use method::MethodMember;
pub use operator::OperatorMember;
pub use property::PropertyMember;

pub(crate) use constructor::{resolve_initializers, synthesize_constructors};
pub(crate) use field::{define_delegate_members, define_enum_fields};

use fxhash::FxHashSet;

use cobalt_source::Location;
use cobalt_syntax::{AttributeUse, BlockId, Modifiers};

use crate::attributes::{AttributeSite, AttributeTargets, AttributeUsage};
use crate::context::CompilationContext;
use crate::emitter::{BodyKind, BodyRequest};
use crate::error::{ResolutionError, ResolverWarning};
use crate::metadata::MetadataToken;
use crate::registry::{ATTRIBUTE, DLL_IMPORT};
use crate::resolver::lookup_type;
use crate::types::{CallingConvention, ContainerId, MemberId, TypeId};

/// How a member relates to what its base type already declares, after the
/// override and hiding rules ran.
///
/// Returns `false` when the member must be dropped.
///
/// # Arguments
///
/// * `hit`: the inherited member with the same signature, if any.
/// * `modifiers`: the member's effective modifiers.
pub(crate) fn check_base_relation(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    name: &str,
    modifiers: Modifiers,
    hit: Option<MemberId>,
    location: Location,
) -> bool {
    let display = ctx.make_name(owner, name);
    match hit {
        Some(base_member) => {
            let entry = ctx.registry.member(base_member);
            let overridable = entry.is_virtual() || entry.is_abstract();
            let base = ctx.registry.member_display(base_member);
            if modifiers.contains(Modifiers::OVERRIDE) {
                if !overridable {
                    ctx.error(location, ResolutionError::OverrideNotVirtual { member: display, base });
                    return false;
                }
            } else if !modifiers.contains(Modifiers::NEW) {
                let warning = if overridable {
                    ResolverWarning::HidesInherited { member: display, base }
                } else {
                    ResolverWarning::NewRequired { member: display, base }
                };
                ctx.warning(location, warning);
            }
            true
        }
        None => {
            if modifiers.contains(Modifiers::OVERRIDE) {
                ctx.error(location, ResolutionError::NoSuitableOverride { member: display });
                return false;
            }
            if modifiers.contains(Modifiers::NEW) {
                let member = format!("{}.{}", ctx.container(owner).full_name, name);
                ctx.warning(location, ResolverWarning::NewNotRequired { member });
            }
            true
        }
    }
}

/// Resolves, validates and applies the custom attributes of one site.
///
/// Returns `false` if an attribute was used on a target it does not allow;
/// the member's emission stops there.
pub(crate) fn emit_attributes(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    target_token: MetadataToken,
    uses: &[AttributeUse],
    target: AttributeTargets,
) -> bool {
    let Some(declaring_type) = ctx.type_of(owner) else {
        return false;
    };
    let mut ok = true;
    let mut seen: FxHashSet<TypeId> = FxHashSet::default();
    for attribute in uses {
        let Some(attribute_type) = resolve_attribute_type(ctx, owner, attribute) else {
            continue;
        };
        let type_name = ctx.registry.name(attribute_type).to_string();
        // Applied through the method's metadata flags instead.
        if type_name == DLL_IMPORT {
            continue;
        }
        let usage = ctx.registry.attribute_usage(attribute_type).unwrap_or_default();
        if !usage.targets.intersects(target) {
            ctx.error(attribute.location, ResolutionError::AttributeNotValidOnTarget { name: attribute.short_name().to_string() });
            ok = false;
            continue;
        }
        if !seen.insert(attribute_type) && !usage.allow_multiple {
            ctx.error(attribute.location, ResolutionError::DuplicateAttribute { name: attribute.short_name().to_string() });
            continue;
        }
        let site = AttributeSite { target, declaring_type };
        if let Some(resolved) = ctx.attribute_resolver.resolve(attribute_type, &type_name, attribute, site) {
            ctx.metadata.set_custom_attribute(target_token, resolved);
        }
    }
    ok
}

/// Finds the class an attribute use names, trying `Name` then
/// `NameAttribute`. Reports 246 or 616 on failure.
pub(crate) fn resolve_attribute_type(ctx: &mut CompilationContext<'_>, owner: ContainerId, attribute: &AttributeUse) -> Option<TypeId> {
    let found = lookup_type(ctx, owner, &attribute.name)
        .or_else(|_| lookup_type(ctx, owner, &format!("{}Attribute", attribute.name)));
    let ty = match found {
        Ok(ty) => ty,
        Err(crate::error::Failure::NotFound) => {
            ctx.error(attribute.location, ResolutionError::TypeNotFound { name: attribute.name.clone() });
            return None;
        }
        Err(_) => return None,
    };
    let is_attribute = ctx
        .registry
        .lookup(ATTRIBUTE)
        .map_or(false, |attr| ctx.registry.is_subclass_of(ty, attr));
    if !is_attribute {
        ctx.error(attribute.location, ResolutionError::NotAnAttribute { name: ctx.registry.name(ty).to_string() });
        return None;
    }
    Some(ty)
}

/// Reads the `AttributeUsage` an attribute class declares, so that uses of
/// it anywhere in the program can be checked.
pub(crate) fn record_attribute_usage(ctx: &mut CompilationContext<'_>, owner: ContainerId) {
    let Some(ty) = ctx.type_of(owner) else { return };
    let is_attribute_class = ctx
        .registry
        .lookup(ATTRIBUTE)
        .map_or(false, |attr| ctx.registry.is_subclass_of(ty, attr));
    if !is_attribute_class {
        return;
    }
    let uses = ctx.container(owner).attributes.clone();
    for attribute in uses.iter().filter(|a| a.short_name() == "AttributeUsage") {
        let Some(usage_type) = resolve_attribute_type(ctx, owner, attribute) else {
            continue;
        };
        let site = AttributeSite { target: AttributeTargets::CLASS, declaring_type: ty };
        let type_name = ctx.registry.name(usage_type).to_string();
        if let Some(resolved) = ctx.attribute_resolver.resolve(usage_type, &type_name, attribute, site) {
            let usage = AttributeUsage::from_attribute(&resolved);
            log::debug!("{} is valid on {:?}", ctx.registry.name(ty), usage.targets);
            ctx.registry.set_attribute_usage(ty, usage);
        }
    }
}

/// Hands one body to the code emitter, with the signature the registry
/// recorded for `member`.
pub(crate) fn emit_body(ctx: &mut CompilationContext<'_>, member: MemberId, block: Option<BlockId>, kind: BodyKind) {
    let entry = ctx.registry.member(member);
    let is_static = entry.is_static();
    let request = BodyRequest {
        member,
        declaring_type: entry.declaring_type,
        return_type: entry.member_type,
        parameters: entry.parameters.clone(),
        calling_convention: if is_static { CallingConvention::Standard } else { CallingConvention::HasThis },
        this_type: (!is_static).then_some(entry.declaring_type),
        block,
        kind,
    };
    ctx.emitter.emit_body(request);
}

/// Splits `I.M` into the interface part and the member name.
pub(crate) fn split_explicit_name(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
}
