use crate::container::define::define_type;
use crate::context::{CompilationContext, DefinitionStatus};
use crate::error::{Failure, ResolveResult};
use crate::namespace::qualify;
use crate::registry::keyword_type_name;
use crate::types::{ContainerId, TypeId};

/// Finds `name` from inside `from` without reporting a miss.
///
/// Search order, first hit wins:
///
/// 1. keyword aliases such as `int`;
/// 2. nested types of `from` and of each enclosing type, innermost first;
/// 3. `name` qualified by the namespace `from` is declared in;
/// 4. `name` taken as fully qualified;
/// 5. for each namespace scope from the innermost outward: the scope's own
///    qualification (beyond the innermost), its `using` aliases, then its
///    imported namespaces in declaration order.
///
/// A lookup that hits a declared but undefined type defines it on the spot.
/// Any failure other than a miss ends the search: a type that depends on a
/// broken type must not go on to find something else under the same name.
pub fn lookup_type(ctx: &mut CompilationContext<'_>, from: ContainerId, name: &str) -> ResolveResult<TypeId> {
    if let Some(platform) = keyword_type_name(name) {
        if let Some(ty) = ctx.registry.lookup(platform) {
            return Ok(ty);
        }
    }

    let mut scope_owner = Some(from);
    while let Some(id) = scope_owner {
        let container = ctx.container(id);
        if container.is_root() {
            break;
        }
        let candidate = format!("{}.{}", container.full_name, name);
        scope_owner = container.parent;
        if let Some(ty) = lookup_full_name(ctx, &candidate)? {
            return Ok(ty);
        }
    }

    let namespace = ctx.container(from).namespace;
    let own = ctx.namespace(namespace).qualify(name);
    if let Some(ty) = lookup_full_name(ctx, &own)? {
        return Ok(ty);
    }
    if let Some(ty) = lookup_full_name(ctx, name)? {
        return Ok(ty);
    }

    let mut scope = Some(namespace);
    while let Some(ns) = scope {
        let (candidates, parent) = {
            let s = ctx.namespace(ns);
            let mut candidates = vec![];
            if ns != namespace && !s.name.is_empty() {
                candidates.push(s.qualify(name));
            }
            if let Some(expanded) = s.expand_alias(name) {
                candidates.push(expanded);
            }
            candidates.extend(s.usings.iter().map(|u| qualify(u, name)));
            (candidates, s.parent)
        };
        for candidate in candidates {
            if let Some(ty) = lookup_full_name(ctx, &candidate)? {
                return Ok(ty);
            }
        }
        scope = parent;
    }

    log::trace!("`{}` not found from {}", name, ctx.container(from).full_name);
    Err(Failure::NotFound)
}

/// Looks one fully qualified name up, defining a matching source type on
/// demand.
fn lookup_full_name(ctx: &mut CompilationContext<'_>, full_name: &str) -> ResolveResult<Option<TypeId>> {
    log::trace!("probing `{}`", full_name);
    if let Some(ty) = ctx.registry.lookup(full_name) {
        return Ok(Some(ty));
    }
    let Some(&id) = ctx.declarations.get(full_name) else {
        return Ok(None);
    };
    match ctx.status(id) {
        DefinitionStatus::Failed => Err(Failure::Dependency),
        // `InProgress` also goes through `define_type`, which reports the
        // cycle.
        _ => define_type(ctx, id).map(Some),
    }
}
