//! Name resolution: dotted type names to registry handles.

mod lookup;

pub use lookup::lookup_type;

use cobalt_source::Location;
use cobalt_syntax::Parameter;

use crate::context::CompilationContext;
use crate::error::{Failure, ResolutionError, ResolveResult};
use crate::types::{ContainerId, TypeId};

/// Resolves `name` as written inside container `from`.
///
/// Array suffixes are peeled off and re-applied to the element type. When
/// no tier finds the name, 246 is reported at `location`. Other failures
/// have already been reported by whoever caused them.
pub fn resolve_type(ctx: &mut CompilationContext<'_>, from: ContainerId, name: &str, location: Location) -> ResolveResult<TypeId> {
    let (element, ranks) = split_array_suffix(name);
    let mut ty = match lookup_type(ctx, from, element) {
        Err(Failure::NotFound) => {
            ctx.error(location, ResolutionError::TypeNotFound { name: element.to_string() });
            return Err(Failure::NotFound);
        }
        other => other?,
    };
    for rank in ranks {
        ty = ctx.registry.array_of(ty, rank);
    }
    Ok(ty)
}

/// Resolves a parameter's type; `ref` and `out` parameters get the by-ref
/// type.
pub fn resolve_parameter(ctx: &mut CompilationContext<'_>, from: ContainerId, parameter: &Parameter, location: Location) -> ResolveResult<TypeId> {
    let ty = resolve_type(ctx, from, &parameter.ty, location)?;
    Ok(if parameter.is_by_ref() { ctx.registry.by_ref(ty) } else { ty })
}

/// Resolves every parameter, stopping at the first failure.
pub fn resolve_parameters(ctx: &mut CompilationContext<'_>, from: ContainerId, parameters: &[Parameter], location: Location) -> ResolveResult<Vec<TypeId>> {
    parameters
        .iter()
        .map(|p| resolve_parameter(ctx, from, p, location))
        .collect()
}

/// `int[][,]` -> (`int`, [1, 2]).
fn split_array_suffix(name: &str) -> (&str, Vec<u32>) {
    let Some(start) = name.find('[') else {
        return (name.trim(), vec![]);
    };
    let ranks = name[start..]
        .split(']')
        .filter(|s| s.starts_with('['))
        .map(|s| s.matches(',').count() as u32 + 1)
        .collect();
    (name[..start].trim(), ranks)
}
