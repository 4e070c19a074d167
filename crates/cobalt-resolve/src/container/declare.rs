//! The declaration pass: compilation units to containers.

use cobalt_source::Location;
use cobalt_syntax::{CompilationUnit, MemberDecl, Modifiers, NamespaceDecl, TypeDecl, TypeDeclKind};

use crate::container::{AdditionResult, ContainerShape, TypeContainer};
use crate::context::CompilationContext;
use crate::error::ResolutionError;
use crate::modifiers;
use crate::namespace::{qualify, NamespaceId, NamespaceScope};
use crate::types::ContainerId;

/// Declares every namespace and type of one compilation unit.
pub fn declare_unit(ctx: &mut CompilationContext<'_>, unit: CompilationUnit) {
    log::debug!("Declaring types of {}", if unit.file.is_empty() { "<unnamed unit>" } else { &unit.file });
    if ctx.program.is_empty() && !unit.file.is_empty() {
        ctx.program = unit.file.clone();
    }
    let scope = ctx.add_namespace(NamespaceScope {
        name: String::new(),
        parent: None,
        usings: unit.usings,
        aliases: unit.aliases,
    });
    let root = ctx.root;
    for decl in unit.types {
        declare_type(ctx, scope, root, decl);
    }
    for ns in unit.namespaces {
        declare_namespace(ctx, scope, ns);
    }
}

fn declare_namespace(ctx: &mut CompilationContext<'_>, parent: NamespaceId, decl: NamespaceDecl) {
    let name = qualify(&ctx.namespace(parent).name, &decl.name);
    let scope = ctx.add_namespace(NamespaceScope {
        name,
        parent: Some(parent),
        usings: decl.usings,
        aliases: decl.aliases,
    });
    let root = ctx.root;
    for ty in decl.types {
        declare_type(ctx, scope, root, ty);
    }
    for nested in decl.namespaces {
        declare_namespace(ctx, scope, nested);
    }
}

/// Creates the container for `decl`, adds it to `parent` and declares its
/// members and nested types. Returns `None` when the name was taken.
pub fn declare_type(ctx: &mut CompilationContext<'_>, namespace: NamespaceId, parent: ContainerId, decl: TypeDecl) -> Option<ContainerId> {
    let nested = !ctx.container(parent).is_root();
    let full_name = if nested {
        format!("{}.{}", ctx.container(parent).full_name, decl.name)
    } else {
        ctx.namespace(namespace).qualify(&decl.name)
    };

    let shape = match decl.kind {
        TypeDeclKind::Class => ContainerShape::Class,
        TypeDeclKind::Struct => ContainerShape::Struct,
        TypeDeclKind::Interface => ContainerShape::Interface,
        TypeDeclKind::Enum => ContainerShape::Enum {
            underlying: decl.underlying.clone().unwrap_or_else(|| "int".to_string()),
        },
        TypeDeclKind::Delegate => ContainerShape::Delegate {
            return_type: decl.return_type.clone().unwrap_or_else(|| "void".to_string()),
            parameters: decl.parameters.clone(),
        },
    };

    let allowed = modifiers::type_mask(nested, decl.kind == TypeDeclKind::Class);
    let default_access = if nested { Modifiers::PRIVATE } else { Modifiers::INTERNAL };
    let (effective, errors) = modifiers::check_modifiers(allowed, decl.modifiers, default_access);
    for e in errors {
        ctx.error(decl.location, e);
    }

    let mut container = TypeContainer::new(
        decl.name.clone(),
        full_name.clone(),
        shape,
        namespace,
        Some(parent),
        decl.location,
    );
    container.modifiers = effective;
    container.base_names = decl.bases;
    container.attributes = decl.attributes;
    let id = ctx.add_container(container);

    let key = if nested { decl.name.as_str() } else { full_name.as_str() };
    let parent_container = ctx.container_mut(parent);
    let result = match decl.kind {
        TypeDeclKind::Class => parent_container.add_class(key, id),
        TypeDeclKind::Struct => parent_container.add_struct(key, id),
        TypeDeclKind::Interface => parent_container.add_interface(key, id),
        TypeDeclKind::Enum => parent_container.add_enum(key, id),
        TypeDeclKind::Delegate => parent_container.add_delegate(key, id),
    };
    if result != AdditionResult::Success {
        report_addition(ctx, parent, result, key, decl.location);
        ctx.set_status(id, crate::context::DefinitionStatus::Failed);
        return None;
    }
    ctx.declarations.insert(full_name, id);

    for member in decl.enum_members {
        let (name, location) = (member.name.clone(), member.location);
        let result = ctx.container_mut(id).add_enum_member(member);
        report_addition(ctx, id, result, &name, location);
    }
    for member in decl.members {
        declare_member(ctx, namespace, id, member);
    }
    Some(id)
}

fn declare_member(ctx: &mut CompilationContext<'_>, namespace: NamespaceId, owner: ContainerId, member: MemberDecl) {
    let location = member.location();
    let member = match member {
        MemberDecl::Type(decl) => {
            declare_type(ctx, namespace, owner, decl);
            return;
        }
        other => other,
    };
    let container = ctx.container_mut(owner);
    let (result, name) = match member {
        MemberDecl::Type(_) => return,
        MemberDecl::Field(d) => {
            let name = d.name.clone();
            (container.add_field(d), name)
        }
        MemberDecl::Constant(d) => {
            let name = d.name.clone();
            (container.add_constant(d), name)
        }
        MemberDecl::Method(d) => {
            let name = d.name.clone();
            (container.add_method(d), name)
        }
        MemberDecl::Constructor(d) => {
            let name = d.name.clone();
            (container.add_constructor(d), name)
        }
        MemberDecl::Property(d) => {
            let name = d.name.clone();
            (container.add_property(d), name)
        }
        MemberDecl::Event(d) => {
            let name = d.name.clone();
            (container.add_event(d), name)
        }
        MemberDecl::Indexer(d) => (container.add_indexer(d), "Item".to_string()),
        MemberDecl::Operator(d) => {
            let name = d.operator.method_name();
            (container.add_operator(d), name)
        }
    };
    report_addition(ctx, owner, result, &name, location);
}

/// Reports a failed `add_*`.
pub fn report_addition(ctx: &mut CompilationContext<'_>, owner: ContainerId, result: AdditionResult, name: &str, location: Location) {
    let container = ctx.container(owner);
    let error = match result {
        AdditionResult::Success => return,
        AdditionResult::NameExists if container.is_root() => {
            let (namespace, simple) = name.rsplit_once('.').unwrap_or(("global namespace", name));
            ResolutionError::DuplicateType { namespace: namespace.to_string(), name: simple.to_string() }
        }
        AdditionResult::NameExists => ResolutionError::DuplicateName {
            container: container.full_name.clone(),
            name: name.to_string(),
        },
        AdditionResult::EnclosingClass => ResolutionError::MemberNamedAsEnclosingType { name: name.to_string() },
        AdditionResult::NotAConstructor => ResolutionError::NotAConstructor,
    };
    ctx.error(location, error);
}
