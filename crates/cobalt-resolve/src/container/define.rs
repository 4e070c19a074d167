//! `DefineType`: give a container its registry handle.

use cobalt_syntax::Modifiers;

use crate::container::bases::resolve_bases;
use crate::container::ContainerShape;
use crate::context::{CompilationContext, DefinitionStatus};
use crate::error::{Failure, ResolutionError, ResolveResult};
use crate::metadata::{MetadataToken, TypeDefinition};
use crate::types::{ContainerId, TypeAttributes, TypeEntry, TypeId, TypeShape};

/// Defines container `id`, resolving (and, on demand, defining) everything
/// its base list names.
///
/// The container is `InProgress` while its bases resolve, so reaching it
/// again through name resolution is a circular definition. It ends up
/// `Defined` or `Failed`, never `InProgress`. On success the nested
/// declarations are defined too; their failures stay theirs.
pub fn define_type(ctx: &mut CompilationContext<'_>, id: ContainerId) -> ResolveResult<TypeId> {
    match ctx.status(id) {
        DefinitionStatus::Defined => return ctx.type_of(id).ok_or(Failure::Invalid),
        DefinitionStatus::Failed => return Err(Failure::Dependency),
        DefinitionStatus::InProgress => {
            let name = ctx.container(id).full_name.clone();
            let location = ctx.container(id).location;
            ctx.error(location, ResolutionError::CircularDefinition { name });
            return Err(Failure::Circular);
        }
        DefinitionStatus::Undefined => {}
    }

    // A nested type needs its enclosing type's handle. Defining the parent
    // defines this type as one of its nested declarations.
    if let Some(parent) = ctx.container(id).parent.filter(|p| *p != ctx.root) {
        match ctx.status(parent) {
            DefinitionStatus::Undefined => {
                if define_type(ctx, parent).is_err() {
                    ctx.set_status(id, DefinitionStatus::Failed);
                    return Err(Failure::Dependency);
                }
                if ctx.status(id) != DefinitionStatus::Undefined {
                    return define_type(ctx, id);
                }
            }
            DefinitionStatus::InProgress => {
                let name = ctx.container(parent).full_name.clone();
                let location = ctx.container(id).location;
                ctx.error(location, ResolutionError::CircularDefinition { name });
                ctx.set_status(id, DefinitionStatus::Failed);
                return Err(Failure::Circular);
            }
            DefinitionStatus::Failed => {
                ctx.set_status(id, DefinitionStatus::Failed);
                return Err(Failure::Dependency);
            }
            DefinitionStatus::Defined => {}
        }
    }

    log::debug!("Defining type {}", ctx.container(id).full_name);
    ctx.set_status(id, DefinitionStatus::InProgress);
    let ty = match define_shape(ctx, id) {
        Ok(ty) => ty,
        Err(failure) => {
            log::debug!("Type {} failed: {}", ctx.container(id).full_name, failure);
            ctx.set_status(id, DefinitionStatus::Failed);
            return Err(failure);
        }
    };
    ctx.set_status(id, DefinitionStatus::Defined);

    for nested in ctx.container(id).nested() {
        if ctx.status(nested) == DefinitionStatus::Undefined {
            let _ = define_type(ctx, nested);
        }
    }
    Ok(ty)
}

fn define_shape(ctx: &mut CompilationContext<'_>, id: ContainerId) -> ResolveResult<TypeId> {
    let bases = resolve_bases(ctx, id)?;

    let container = ctx.container(id);
    let parent = container.parent.filter(|p| *p != ctx.root);
    let declaring_type = parent.and_then(|p| ctx.type_of(p));
    let enclosing = declaring_type.map(|t| ctx.registry.get(t).token);
    let attributes = type_attributes(container.modifiers, &container.shape, parent.is_some(), container.has_static_constructor());
    let has_instance_fields = container.fields.iter().any(|f| !f.is_static());
    let class_size = (container.is_struct() && !has_instance_fields).then_some(1);
    let shape = match container.shape {
        ContainerShape::Class | ContainerShape::Root => TypeShape::Class,
        ContainerShape::Struct => TypeShape::Struct,
        ContainerShape::Interface => TypeShape::Interface,
        ContainerShape::Enum { .. } => TypeShape::Enum,
        ContainerShape::Delegate { .. } => TypeShape::Delegate,
    };
    let name = container.name.clone();
    let full_name = container.full_name.clone();

    let token = ctx.metadata.define_type(TypeDefinition {
        full_name: full_name.clone(),
        attributes,
        base: bases.base,
        interfaces: bases.interfaces.clone(),
        enclosing,
        class_size,
    });
    let entry = TypeEntry {
        name,
        full_name,
        shape,
        attributes,
        base: bases.base,
        interfaces: bases.interfaces.clone(),
        declaring_type,
        members: vec![],
        token,
    };
    let ty = ctx.registry.register_defined_type(entry, Some(id));

    let container = ctx.container_mut(id);
    container.type_id = Some(ty);
    container.base = bases.base;
    container.interface_ids = bases.interfaces;
    container.underlying_type = bases.underlying;
    Ok(ty)
}

/// Metadata attributes from the declared modifiers, the kind and the
/// nesting of a type.
pub(crate) fn type_attributes(modifiers: Modifiers, shape: &ContainerShape, nested: bool, has_static_constructor: bool) -> TypeAttributes {
    let mut attrs = if nested {
        if modifiers.contains(Modifiers::PUBLIC) {
            TypeAttributes::NESTED_PUBLIC
        } else if modifiers.contains(Modifiers::PROTECTED | Modifiers::INTERNAL) {
            TypeAttributes::NESTED_FAM_OR_ASSEM
        } else if modifiers.contains(Modifiers::PROTECTED) {
            TypeAttributes::NESTED_FAMILY
        } else if modifiers.contains(Modifiers::INTERNAL) {
            TypeAttributes::NESTED_ASSEMBLY
        } else {
            TypeAttributes::NESTED_PRIVATE
        }
    } else if modifiers.contains(Modifiers::PUBLIC) {
        TypeAttributes::PUBLIC
    } else {
        TypeAttributes::NOT_PUBLIC
    };

    match shape {
        ContainerShape::Class | ContainerShape::Root => {
            if modifiers.contains(Modifiers::ABSTRACT) {
                attrs |= TypeAttributes::ABSTRACT;
            }
            if modifiers.contains(Modifiers::SEALED) {
                attrs |= TypeAttributes::SEALED;
            }
            if !has_static_constructor {
                attrs |= TypeAttributes::BEFORE_FIELD_INIT;
            }
        }
        ContainerShape::Struct => {
            attrs |= TypeAttributes::SEQUENTIAL_LAYOUT | TypeAttributes::SEALED | TypeAttributes::BEFORE_FIELD_INIT;
        }
        ContainerShape::Interface => attrs |= TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
        ContainerShape::Enum { .. } | ContainerShape::Delegate { .. } => attrs |= TypeAttributes::SEALED,
    }
    attrs
}

/// The token of a defined container, or `EXTERNAL` if it has none.
pub(crate) fn type_token(ctx: &CompilationContext<'_>, id: ContainerId) -> MetadataToken {
    ctx.type_of(id).map(|t| ctx.registry.get(t).token).unwrap_or(MetadataToken::EXTERNAL)
}
