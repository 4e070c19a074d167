use cobalt_syntax::{Modifiers, OperatorDecl};

use crate::attributes::AttributeTargets;
use crate::context::CompilationContext;
use crate::emitter::BodyKind;
use crate::error::ResolutionError;
use crate::members::method::{define_method, MethodData};
use crate::members::{emit_attributes, emit_body};
use crate::modifiers::{self, check_modifiers};
use crate::operator_rules::check_operator;
use crate::resolver::{resolve_parameters, resolve_type};
use crate::types::{ContainerId, MemberId};

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorMember {
    pub decl: OperatorDecl,
    pub handle: Option<MemberId>,
}

impl OperatorMember {
    pub fn new(decl: OperatorDecl) -> Self {
        Self { decl, handle: None }
    }

    /// How the operator is named in diagnostics: `Money.operator Addition (Money, int)`.
    pub fn prototype(&self, container: &str) -> String {
        let parameters: Vec<String> = self.decl.parameters().into_iter().map(|p| p.ty).collect();
        format!("{}.operator {} ({})", container, self.decl.operator, parameters.join(", "))
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let decl = &self.decl;
        let Some(declaring) = ctx.container(owner).type_id else { return false };

        let (mods, errors) = check_modifiers(modifiers::OPERATOR, decl.modifiers, Modifiers::PRIVATE);
        let invalid = !errors.is_empty();
        for e in errors {
            ctx.error(decl.location, e);
        }
        if invalid {
            return false;
        }
        if !mods.contains(Modifiers::PUBLIC | Modifiers::STATIC) {
            let prototype = self.prototype(&ctx.container(owner).full_name);
            ctx.error(decl.location, ResolutionError::OperatorNotPublicStatic { prototype });
            return false;
        }

        let parameters = decl.parameters();
        let Ok(return_type) = resolve_type(ctx, owner, &decl.return_type, decl.location) else { return false };
        let Ok(types) = resolve_parameters(ctx, owner, &parameters, decl.location) else { return false };
        let Some(&first) = types.first() else { return false };
        let second = types.get(1).copied();
        if let Err(e) = check_operator(&ctx.registry, declaring, decl.operator, return_type, first, second) {
            ctx.error(decl.location, e);
            return false;
        }

        let name = decl.operator.method_name();
        self.handle = define_method(
            ctx,
            owner,
            MethodData {
                what: format!("operator `{}'", decl.operator),
                name,
                explicit_interface: None,
                return_type,
                parameters: types,
                parameter_names: parameters.iter().map(|p| p.name.clone()).collect(),
                modifiers: mods,
                has_body: decl.body.is_some(),
                body_required: true,
                special_name: true,
                check_base: false,
                validate_modifiers: true,
                attributes: &decl.attributes,
                location: decl.location,
            },
        );
        self.handle.is_some()
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        let token = ctx.registry.member(handle).token;
        if !emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::METHOD) {
            return;
        }
        if self.decl.modifiers.contains(Modifiers::EXTERN) {
            return;
        }
        emit_body(ctx, handle, self.decl.body, BodyKind::Method);
    }
}
