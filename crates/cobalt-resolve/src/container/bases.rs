//! Base list resolution for `DefineType`.

use crate::container::ContainerShape;
use crate::context::CompilationContext;
use crate::error::{Failure, ResolutionError, ResolveResult};
use crate::registry::{INTEGRAL_TYPES, MULTICAST_DELEGATE, OBJECT, VALUE_TYPE};
use crate::resolver::resolve_type;
use crate::types::{ContainerId, TypeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedBases {
    pub base: Option<TypeId>,
    /// Transitive, de-duplicated, in declaration order.
    pub interfaces: Vec<TypeId>,
    pub underlying: Option<TypeId>,
}

/// Resolves the base class and interface list of a container.
///
/// A class takes the first entry as its base class when it is not an
/// interface; everything after that, and everything a struct or an
/// interface lists, must be an interface. Sealed types cannot be derived
/// from.
pub(crate) fn resolve_bases(ctx: &mut CompilationContext<'_>, id: ContainerId) -> ResolveResult<ResolvedBases> {
    let container = ctx.container(id);
    let shape = container.shape.clone();
    let names = container.base_names.clone();
    let full_name = container.full_name.clone();
    let location = container.location;

    let mut resolved = ResolvedBases::default();
    let mut first_interface = 0;

    match &shape {
        ContainerShape::Root => return Err(Failure::Invalid),
        ContainerShape::Class => {
            if let Some(first) = names.first() {
                let ty = resolve_type(ctx, id, first, location)?;
                if !ctx.registry.get(ty).is_interface() {
                    check_not_sealed(ctx, &full_name, ty, location)?;
                    resolved.base = Some(ty);
                    first_interface = 1;
                }
            }
            if resolved.base.is_none() && full_name != OBJECT {
                resolved.base = ctx.registry.lookup(OBJECT);
            }
        }
        ContainerShape::Struct => resolved.base = ctx.registry.lookup(VALUE_TYPE),
        ContainerShape::Interface => {}
        ContainerShape::Enum { underlying } => {
            resolved.base = ctx.registry.lookup(crate::registry::ENUM);
            let ty = resolve_type(ctx, id, underlying, location)?;
            if !INTEGRAL_TYPES.contains(&ctx.registry.name(ty)) {
                ctx.error(location, ResolutionError::InvalidEnumUnderlyingType);
                return Err(Failure::Invalid);
            }
            resolved.underlying = Some(ty);
        }
        ContainerShape::Delegate { .. } => resolved.base = ctx.registry.lookup(MULTICAST_DELEGATE),
    }

    for name in names.iter().skip(first_interface) {
        let ty = resolve_type(ctx, id, name, location)?;
        if !ctx.registry.get(ty).is_interface() {
            ctx.error(
                location,
                ResolutionError::NotAnInterface {
                    kind: shape.keyword().to_string(),
                    name: full_name.clone(),
                    base: ctx.registry.name(ty).to_string(),
                },
            );
            return Err(Failure::Invalid);
        }
        let inherited = ctx.registry.get(ty).interfaces.clone();
        for iface in std::iter::once(ty).chain(inherited) {
            if !resolved.interfaces.contains(&iface) {
                resolved.interfaces.push(iface);
            }
        }
    }
    Ok(resolved)
}

fn check_not_sealed(ctx: &mut CompilationContext<'_>, full_name: &str, base: TypeId, location: cobalt_source::Location) -> ResolveResult<()> {
    let entry = ctx.registry.get(base);
    if !entry.is_sealed() {
        return Ok(());
    }
    let detail = if entry.is_value_type() { " (value types are implicitly sealed)" } else { "" };
    let error = ResolutionError::SealedBase {
        name: full_name.to_string(),
        base: entry.full_name.clone(),
        detail: detail.to_string(),
    };
    ctx.error(location, error);
    Err(Failure::Invalid)
}
