use cobalt_syntax::{AccessorDecl, EventDecl, Modifiers};

use crate::attributes::AttributeTargets;
use crate::container::define::type_token;
use crate::context::CompilationContext;
use crate::emitter::FieldInitializer;
use crate::error::ResolutionError;
use crate::members::method::{commit_method, member_modifiers, prepare_method, MethodData, PreparedMethod};
use crate::members::emit_attributes;
use crate::members::property::{accessor_summary, emit_accessor};
use crate::metadata::{EventDefinition, FieldDefinition};
use crate::modifiers::{self, method_modifier_errors};
use crate::registry::DELEGATE;
use crate::resolver::resolve_type;
use crate::types::{ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, TypeId, TypeShape};

#[derive(Debug, Clone, PartialEq)]
pub struct EventMember {
    pub decl: EventDecl,
    pub handle: Option<MemberId>,
    pub add: Option<MemberId>,
    pub remove: Option<MemberId>,
    /// Delegate field behind an event declared without accessors.
    pub backing_field: Option<MemberId>,
}

impl EventMember {
    pub fn new(decl: EventDecl) -> Self {
        Self { decl, handle: None, add: None, remove: None, backing_field: None }
    }

    pub fn is_static(&self) -> bool {
        self.decl.modifiers.contains(Modifiers::STATIC)
    }

    /// Field-like events store the delegate themselves and get compiler
    /// written accessors.
    pub fn is_field_like(&self) -> bool {
        self.decl.add.is_none() && self.decl.remove.is_none()
    }

    /// The initializer of a field-like event, for the constructors to run.
    pub fn field_initializer(&self) -> Option<FieldInitializer> {
        Some(FieldInitializer { field: self.backing_field?, value: self.decl.initializer? })
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        let decl = &self.decl;
        let container = ctx.container(owner);
        let Some(declaring_type) = container.type_id else { return false };
        let (in_interface, in_struct) = (container.is_interface(), container.is_struct());
        let container_abstract = container.is_abstract();
        let plain = format!("{}.{}", container.full_name, decl.name);

        let Ok(ty) = resolve_type(ctx, owner, &decl.ty, decl.location) else { return false };
        let mods = member_modifiers(ctx, modifiers::EVENT, decl.modifiers, in_interface, in_struct, decl.location);

        let is_delegate = ctx.registry.get(ty).shape == TypeShape::Delegate
            || ctx.registry.lookup(DELEGATE).map_or(false, |d| ctx.registry.is_subclass_of(ty, d));
        if !is_delegate {
            ctx.error(decl.location, ResolutionError::EventNotDelegate { member: plain });
            return false;
        }

        if !in_interface {
            let display = ctx.make_name(owner, &decl.name);
            let errors = method_modifier_errors(mods, &display, container_abstract);
            if !errors.is_empty() {
                for e in errors {
                    ctx.error(decl.location, e);
                }
                return false;
            }
        }

        let field_like = self.is_field_like();
        let owner_token = type_token(ctx, owner);
        if field_like && !in_interface && !mods.contains(Modifiers::ABSTRACT) {
            let mut attributes = MemberAttributes::PRIVATE;
            if mods.contains(Modifiers::STATIC) {
                attributes |= MemberAttributes::STATIC;
            }
            let token = ctx.metadata.define_field(
                owner_token,
                FieldDefinition { name: decl.name.clone(), attributes, field_type: ty },
            );
            self.backing_field = Some(ctx.registry.add_member(MemberEntry {
                name: decl.name.clone(),
                kind: MemberKind::Field,
                declaring_type,
                attributes,
                member_type: ty,
                parameters: vec![],
                accessors: vec![],
                token,
            }));
        }

        let decl = &self.decl;
        let add = prepare_event_accessor(ctx, owner, decl, "add", decl.add.as_ref(), ty, mods);
        let remove = prepare_event_accessor(ctx, owner, decl, "remove", decl.remove.as_ref(), ty, mods);
        let (Some(add), Some(remove)) = (add, remove) else { return false };
        let add = commit_method(ctx, owner, add);
        let remove = commit_method(ctx, owner, remove);

        let definition = EventDefinition {
            name: decl.name.clone(),
            event_type: ty,
            add: Some(ctx.registry.member(add).token),
            remove: Some(ctx.registry.member(remove).token),
        };
        let token = ctx.metadata.define_event(owner_token, definition);
        let attributes = accessor_summary(ctx, &[add, remove]);
        let handle = ctx.registry.add_member(MemberEntry {
            name: decl.name.clone(),
            kind: MemberKind::Event,
            declaring_type,
            attributes,
            member_type: ty,
            parameters: vec![],
            accessors: vec![add, remove],
            token,
        });
        self.handle = Some(handle);
        self.add = Some(add);
        self.remove = Some(remove);
        true
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        let token = ctx.registry.member(handle).token;
        if !emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::EVENT) {
            return;
        }
        let synthesized = self.is_field_like();
        for (method, decl) in [(self.add, self.decl.add.as_ref()), (self.remove, self.decl.remove.as_ref())] {
            let Some(method) = method else { continue };
            let (body, attributes) = match decl {
                Some(d) => (d.body, d.attributes.as_slice()),
                None => (None, &[][..]),
            };
            emit_accessor(ctx, owner, method, body, attributes, synthesized);
        }
    }
}

/// `add_E` or `remove_E`: takes the delegate, returns void. Accessors of a
/// field-like event are written by the compiler, so they need no body.
fn prepare_event_accessor<'d>(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    decl: &EventDecl,
    prefix: &str,
    accessor: Option<&'d AccessorDecl>,
    ty: TypeId,
    mods: Modifiers,
) -> Option<PreparedMethod<'d>> {
    let void = ctx.registry.void_type().unwrap_or(ty);
    prepare_method(
        ctx,
        owner,
        MethodData {
            name: format!("{}_{}", prefix, decl.name),
            explicit_interface: None,
            return_type: void,
            parameters: vec![ty],
            parameter_names: vec!["value".to_string()],
            modifiers: mods,
            has_body: accessor.map_or(false, |a| a.body.is_some()),
            body_required: accessor.is_some(),
            special_name: true,
            check_base: false,
            validate_modifiers: false,
            attributes: accessor.map(|a| a.attributes.as_slice()).unwrap_or(&[]),
            location: decl.location,
            what: format!("the {} method of event `{}'", prefix, decl.name),
        },
    )
}
