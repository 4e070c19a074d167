use cobalt_syntax::{ConstructorDecl, InitializerTarget, Modifiers};

use crate::attributes::AttributeTargets;
use crate::container::define::type_token;
use crate::context::CompilationContext;
use crate::emitter::{BodyKind, ConstructorCall, FieldInitializer};
use crate::error::ResolutionError;
use crate::members::method::member_modifiers;
use crate::members::{emit_attributes, emit_body};
use crate::metadata::MethodDefinition;
use crate::modifiers::{self, member_access};
use crate::resolver::resolve_parameters;
use crate::types::{
    CallingConvention, ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, MethodSignature, TypeId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorMember {
    pub decl: ConstructorDecl,
    pub handle: Option<MemberId>,
    /// Generated by `Populate` rather than declared.
    pub synthesized: bool,
    /// The resolved `base(...)` / `this(...)` call.
    pub initializer: Option<ConstructorCall>,
    /// Whether the instance field initializers run in this constructor,
    /// which is the case when it does not chain to a sibling.
    pub runs_field_initializers: bool,
    /// Cleared when the initializer could not be resolved.
    pub valid: bool,
}

impl ConstructorMember {
    pub fn declared(decl: ConstructorDecl) -> Self {
        Self {
            decl,
            handle: None,
            synthesized: false,
            initializer: None,
            runs_field_initializers: false,
            valid: true,
        }
    }

    pub fn synthesized(decl: ConstructorDecl) -> Self {
        Self { synthesized: true, ..Self::declared(decl) }
    }

    pub fn is_static(&self) -> bool {
        self.decl.modifiers.contains(Modifiers::STATIC)
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        self.handle = self.define_inner(ctx, owner);
        self.handle.is_some()
    }

    fn define_inner(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> Option<MemberId> {
        let decl = &self.decl;
        let container = ctx.container(owner);
        let declaring_type = container.type_id?;
        let in_struct = container.is_struct();
        let name = container.name.clone();
        let full_name = container.full_name.clone();
        let is_static = self.is_static();

        if is_static {
            if !decl.parameters.is_empty() {
                ctx.error(decl.location, ResolutionError::StaticConstructorParameters { name: full_name });
                return None;
            }
            if decl.modifiers.has_access() {
                ctx.error(decl.location, ResolutionError::StaticConstructorAccess { name: full_name });
                return None;
            }
        } else if in_struct && decl.parameters.is_empty() && !self.synthesized {
            ctx.error(decl.location, ResolutionError::StructParameterlessConstructor);
            return None;
        }

        let parameters = resolve_parameters(ctx, owner, &decl.parameters, decl.location).ok()?;
        let mods = member_modifiers(ctx, modifiers::CONSTRUCTOR, decl.modifiers, false, in_struct, decl.location);

        if mods.contains(Modifiers::EXTERN) && decl.body.is_some() {
            let member = format!("{}.{}", full_name, name);
            ctx.error(decl.location, ResolutionError::ExternWithBody { member });
            return None;
        }

        let metadata_name = if is_static { ".cctor" } else { ".ctor" };
        let void = ctx.registry.void_type().unwrap_or(declaring_type);
        let signature = MethodSignature::new(metadata_name, void, parameters.clone());
        if !ctx.container_mut(owner).signatures.insert(signature) {
            let what = format!("constructor `{}'", name);
            ctx.error(decl.location, ResolutionError::DuplicateSignature { container: full_name, what });
            return None;
        }

        let mut attributes = MemberAttributes::HIDE_BY_SIG | MemberAttributes::SPECIAL_NAME | MemberAttributes::RT_SPECIAL_NAME;
        if is_static {
            attributes |= MemberAttributes::PRIVATE | MemberAttributes::STATIC;
        } else {
            attributes |= member_access(mods);
        }

        let owner_token = type_token(ctx, owner);
        let token = ctx.metadata.define_constructor(
            owner_token,
            MethodDefinition {
                name: metadata_name.to_string(),
                attributes,
                calling_convention: if is_static { CallingConvention::Standard } else { CallingConvention::HasThis },
                return_type: void,
                parameters: parameters.clone(),
                parameter_names: decl.parameters.iter().map(|p| p.name.clone()).collect(),
                pinvoke: None,
            },
        );
        Some(ctx.registry.add_member(MemberEntry {
            name: metadata_name.to_string(),
            kind: MemberKind::Constructor,
            declaring_type,
            attributes,
            member_type: void,
            parameters,
            accessors: vec![],
            token,
        }))
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        if !self.valid {
            return;
        }
        let token = ctx.registry.member(handle).token;
        if !emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::CONSTRUCTOR) {
            return;
        }
        if self.decl.modifiers.contains(Modifiers::EXTERN) {
            return;
        }

        let container = ctx.container(owner);
        let indices = if self.is_static() {
            container.initialized_static_fields.as_slice()
        } else if self.runs_field_initializers {
            container.initialized_fields.as_slice()
        } else {
            &[]
        };
        let mut field_initializers: Vec<FieldInitializer> = indices
            .iter()
            .filter_map(|i| {
                let field = container.fields.get(*i)?;
                Some(FieldInitializer { field: field.handle?, value: field.decl.initializer? })
            })
            .collect();
        let is_static = self.is_static();
        field_initializers.extend(
            container
                .events
                .iter()
                .filter(|e| e.is_static() == is_static && (is_static || self.runs_field_initializers))
                .filter_map(|e| e.field_initializer()),
        );

        let initializer = self.initializer.clone();
        let kind = if self.synthesized {
            BodyKind::Synthesized { initializer, field_initializers }
        } else {
            BodyKind::Constructor { initializer, field_initializers }
        };
        emit_body(ctx, handle, self.decl.body, kind);
    }
}

/// Adds the constructors a type gets without declaring them: a default
/// instance constructor for classes that declare none, and a static
/// constructor when a static field has an initializer.
pub(crate) fn synthesize_constructors(ctx: &mut CompilationContext<'_>, owner: ContainerId) {
    let container = ctx.container_mut(owner);
    if container.is_class() && !container.has_instance_constructor() {
        let access = if container.is_abstract() { Modifiers::PROTECTED } else { Modifiers::PUBLIC };
        let decl = ConstructorDecl::new(container.name.clone(), access);
        container.default_constructor = Some(container.constructors.len());
        container.constructors.push(ConstructorMember::synthesized(decl));
    }
    let needs_static = !container.initialized_static_fields.is_empty()
        || container.events.iter().any(|e| e.is_static() && e.decl.initializer.is_some());
    if needs_static && !container.has_static_constructor() && (container.is_class() || container.is_struct()) {
        let decl = ConstructorDecl::new(container.name.clone(), Modifiers::STATIC);
        container.default_static_constructor = Some(container.constructors.len());
        container.constructors.push(ConstructorMember::synthesized(decl));
    }
}

/// Resolves every constructor initializer of `owner` once all its
/// constructors are defined.
///
/// Class constructors without one call `base()`; struct constructors and
/// static constructors call nothing.
pub(crate) fn resolve_initializers(ctx: &mut CompilationContext<'_>, owner: ContainerId, constructors: &mut [ConstructorMember]) {
    let container = ctx.container(owner);
    let (Some(own_type), is_class, base) = (container.type_id, container.is_class(), container.base) else {
        return;
    };
    let type_name = container.name.clone();

    for ctor in constructors.iter_mut().filter(|c| !c.is_static()) {
        let Some(handle) = ctor.handle else { continue };
        let (target, arguments, location) = match &ctor.decl.initializer {
            Some(init) => (init.target, init.arguments.clone(), init.location),
            None if is_class && base.is_some() => (InitializerTarget::Base, vec![], ctor.decl.location),
            None => {
                ctor.runs_field_initializers = true;
                continue;
            }
        };
        ctor.runs_field_initializers = target == InitializerTarget::Base;

        let search = match target {
            InitializerTarget::Base => match base {
                Some(b) => b,
                None => continue,
            },
            InitializerTarget::This => own_type,
        };
        let candidates: Vec<MemberId> = ctx
            .registry
            .constructors_of(search)
            .into_iter()
            .filter(|c| search == own_type || ctx.registry.member(*c).attributes.is_accessible_from_derived())
            .collect();
        let argument_types = ctx.emitter.argument_types(&ctx.registry, &arguments);

        match select_constructor(ctx, &candidates, &argument_types) {
            Some(target) if target == handle => {
                let parameters: Vec<_> = ctx.registry.member(handle).parameters.iter().map(|p| ctx.registry.name(*p).to_string()).collect();
                let name = format!("{}({})", type_name, parameters.join(", "));
                ctx.error(location, ResolutionError::ConstructorCallsItself { name });
                ctor.valid = false;
            }
            Some(target) => {
                log::trace!("{}: initializer calls {}", type_name, ctx.registry.member_display(target));
                ctor.initializer = Some(ConstructorCall { target, arguments });
            }
            None => {
                let count = arguments.len();
                ctx.error(location, ResolutionError::NoConstructorOverload { name: ".ctor".to_string(), count });
                ctor.valid = false;
            }
        }
    }
}

/// Picks the constructor whose parameters accept `arguments`, preferring an
/// exact match. Unknown argument types accept anything.
fn select_constructor(ctx: &CompilationContext<'_>, candidates: &[MemberId], arguments: &[Option<TypeId>]) -> Option<MemberId> {
    let applicable: Vec<MemberId> = candidates
        .iter()
        .copied()
        .filter(|c| {
            let parameters = &ctx.registry.member(*c).parameters;
            parameters.len() == arguments.len()
                && parameters
                    .iter()
                    .zip(arguments)
                    .all(|(p, a)| a.map_or(true, |a| ctx.registry.is_assignable(a, *p)))
        })
        .collect();
    applicable
        .iter()
        .copied()
        .find(|c| {
            ctx.registry
                .member(*c)
                .parameters
                .iter()
                .zip(arguments)
                .all(|(p, a)| a.map_or(false, |a| a == *p))
        })
        .or_else(|| applicable.first().copied())
}
