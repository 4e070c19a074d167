use cobalt_syntax::{IndexerDecl, Modifiers};

use crate::context::CompilationContext;
use crate::error::ResolutionError;
use crate::members::method::member_modifiers;
use crate::members::property::{define_property_like, emit_property_like, PropertyShape};
use crate::modifiers;
use crate::resolver::{resolve_parameters, resolve_type};
use crate::types::{ContainerId, MemberId};

/// Indexers are properties named `Item` with index parameters.
pub const INDEXER_NAME: &str = "Item";

#[derive(Debug, Clone, PartialEq)]
pub struct IndexerMember {
    pub decl: IndexerDecl,
    pub handle: Option<MemberId>,
    pub getter: Option<MemberId>,
    pub setter: Option<MemberId>,
}

impl IndexerMember {
    pub fn new(decl: IndexerDecl) -> Self {
        Self { decl, handle: None, getter: None, setter: None }
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let decl = &self.decl;
        let container = ctx.container(owner);
        let (in_interface, in_struct) = (container.is_interface(), container.is_struct());

        let explicit = match &decl.interface {
            Some(iface) => {
                if decl.modifiers.intersects(Modifiers::PUBLIC | Modifiers::ABSTRACT) {
                    ctx.error(decl.location, ResolutionError::ExplicitInterfaceModifiers);
                    return false;
                }
                let Ok(iface) = resolve_type(ctx, owner, iface, decl.location) else { return false };
                Some(iface)
            }
            None => None,
        };
        let Ok(ty) = resolve_type(ctx, owner, &decl.ty, decl.location) else { return false };
        let Ok(parameters) = resolve_parameters(ctx, owner, &decl.parameters, decl.location) else {
            return false;
        };
        let mods = member_modifiers(ctx, modifiers::INDEXER, decl.modifiers, in_interface, in_struct, decl.location);

        if explicit.is_none() && !ctx.container_mut(owner).indexer_signatures.insert(parameters.clone()) {
            let container = ctx.container(owner).full_name.clone();
            ctx.error(decl.location, ResolutionError::DuplicateProperty { container, name: "this".to_string() });
            return false;
        }

        let shape = PropertyShape {
            name: INDEXER_NAME.to_string(),
            explicit,
            ty,
            parameters,
            parameter_names: decl.parameters.iter().map(|p| p.name.clone()).collect(),
            modifiers: mods,
            get: decl.get.as_ref(),
            set: decl.set.as_ref(),
            location: decl.location,
            kind: "indexer",
            check_base: false,
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
