use cobalt_source::Location;
use cobalt_syntax::{AttributeUse, AttributeValue, MethodDecl, Modifiers};

use crate::attributes::AttributeTargets;
use crate::container::define::type_token;
use crate::context::CompilationContext;
use crate::emitter::BodyKind;
use crate::error::ResolutionError;
use crate::members::{check_base_relation, emit_attributes, emit_body, split_explicit_name};
use crate::metadata::{MethodDefinition, PInvokeInfo};
use crate::modifiers::{self, check_modifiers, method_attributes, method_modifier_errors};
use crate::pending::Candidate;
use crate::registry::{Binding, MemberFilter, OBJECT};
use crate::resolver::{resolve_parameters, resolve_type};
use crate::types::{
    CallingConvention, ContainerId, MemberAttributes, MemberEntry, MemberId, MemberKind, MethodSignature, TypeId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MethodMember {
    pub decl: MethodDecl,
    pub handle: Option<MemberId>,
}

impl MethodMember {
    pub fn new(decl: MethodDecl) -> Self {
        Self { decl, handle: None }
    }

    /// `void Finalize()` on an instance.
    pub fn is_finalizer(&self) -> bool {
        self.decl.name == "Finalize"
            && self.decl.parameters.is_empty()
            && matches!(self.decl.return_type.as_str(), "void" | "System.Void")
            && !self.decl.modifiers.contains(Modifiers::STATIC)
    }

    pub(crate) fn define(&mut self, ctx: &mut CompilationContext<'_>, owner: ContainerId) -> bool {
        self.handle = define_declared_method(ctx, owner, &self.decl);
        self.handle.is_some()
    }

    pub(crate) fn emit(&self, ctx: &mut CompilationContext<'_>, owner: ContainerId) {
        let Some(handle) = self.handle else { return };
        let token = ctx.registry.member(handle).token;
        if !emit_attributes(ctx, owner, token, &self.decl.attributes, AttributeTargets::METHOD) {
            return;
        }
        let attrs = ctx.registry.member(handle).attributes;
        if attrs.intersects(MemberAttributes::ABSTRACT | MemberAttributes::PINVOKE_IMPL)
            || self.decl.modifiers.contains(Modifiers::EXTERN)
        {
            return;
        }
        let kind = if self.is_finalizer() {
            BodyKind::Finalizer { chain_to: base_finalizer(ctx, owner) }
        } else {
            BodyKind::Method
        };
        emit_body(ctx, handle, self.decl.body, kind);
    }
}

/// The finalizer a `Finalize` body chains to, if chaining is enabled and
/// the nearest one is not `System.Object`'s.
fn base_finalizer(ctx: &CompilationContext<'_>, owner: ContainerId) -> Option<MemberId> {
    if !ctx.config.compiler.chain_base_finalizer {
        return None;
    }
    let base = ctx.container(owner).base?;
    let object = ctx.registry.lookup(OBJECT);
    ctx.registry
        .find_members(base, MemberFilter::Name(MemberKind::Method, "Finalize"), Binding::Instance, true)
        .into_iter()
        .find(|m| {
            let entry = ctx.registry.member(*m);
            entry.parameters.is_empty() && entry.attributes.is_accessible_from_derived()
        })
        .filter(|m| Some(ctx.registry.member(*m).declaring_type) != object)
}

fn define_declared_method(ctx: &mut CompilationContext<'_>, owner: ContainerId, decl: &MethodDecl) -> Option<MemberId> {
    let container = ctx.container(owner);
    let in_interface = container.is_interface();
    let in_struct = container.is_struct();

    let (name, explicit) = match split_explicit_name(&decl.name) {
        Some((iface, short)) => {
            if decl.modifiers.intersects(Modifiers::PUBLIC | Modifiers::ABSTRACT) {
                ctx.error(decl.location, ResolutionError::ExplicitInterfaceModifiers);
                return None;
            }
            let iface = resolve_type(ctx, owner, iface, decl.location).ok()?;
            (short.to_string(), Some(iface))
        }
        None => (decl.name.clone(), None),
    };

    let return_type = resolve_type(ctx, owner, &decl.return_type, decl.location).ok()?;
    let parameters = resolve_parameters(ctx, owner, &decl.parameters, decl.location).ok()?;

    let modifiers = member_modifiers(ctx, modifiers::METHOD, decl.modifiers, in_interface, in_struct, decl.location);

    define_method(
        ctx,
        owner,
        MethodData {
            what: format!("method `{}'", name),
            name,
            explicit_interface: explicit,
            return_type,
            parameters,
            parameter_names: decl.parameters.iter().map(|p| p.name.clone()).collect(),
            modifiers,
            has_body: decl.body.is_some(),
            body_required: true,
            special_name: false,
            check_base: true,
            validate_modifiers: true,
            attributes: &decl.attributes,
            location: decl.location,
        },
    )
}

/// Applies a kind's allowed-modifier mask and default access. Interface
/// members are always `public abstract`.
pub(crate) fn member_modifiers(
    ctx: &mut CompilationContext<'_>,
    allowed: Modifiers,
    given: Modifiers,
    in_interface: bool,
    in_struct: bool,
    location: Location,
) -> Modifiers {
    let allowed = if in_interface {
        modifiers::INTERFACE_MEMBER
    } else if in_struct {
        allowed.difference(modifiers::STRUCT_FORBIDDEN)
    } else {
        allowed
    };
    let (mut effective, errors) = check_modifiers(allowed, given, Modifiers::PRIVATE);
    for e in errors {
        ctx.error(location, e);
    }
    if in_interface {
        effective = effective.difference(Modifiers::ACCESSIBILITY) | Modifiers::PUBLIC | Modifiers::ABSTRACT;
    }
    effective
}

/// Everything `define_method` needs about a method, an accessor or an
/// operator, with its types already resolved.
pub(crate) struct MethodData<'d> {
    /// Name without any interface qualification: `M`, `get_P`, `op_Addition`.
    pub name: String,
    pub explicit_interface: Option<TypeId>,
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
    pub parameter_names: Vec<String>,
    pub modifiers: Modifiers,
    pub has_body: bool,
    /// Synthesized accessors have no block and need none.
    pub body_required: bool,
    pub special_name: bool,
    /// Run the override and hiding rules against the base type.
    pub check_base: bool,
    /// Run the modifier combination rules; properties check once for both
    /// accessors.
    pub validate_modifiers: bool,
    pub attributes: &'d [AttributeUse],
    pub location: Location,
    /// How a duplicate is described, e.g. "method `F'".
    pub what: String,
}

/// Defines one method on `owner`. `None` means the method was dropped;
/// the reason has been reported.
pub(crate) fn define_method(ctx: &mut CompilationContext<'_>, owner: ContainerId, data: MethodData<'_>) -> Option<MemberId> {
    let prepared = prepare_method(ctx, owner, data)?;
    Some(commit_method(ctx, owner, prepared))
}

/// A method that passed every check and has not been registered yet.
pub(crate) struct PreparedMethod<'d> {
    data: MethodData<'d>,
    owner_type: TypeId,
    metadata_name: String,
    plain: String,
    in_interface: bool,
}

/// Runs every check `define_method` runs, reporting what fails, without
/// registering anything. Accessor pairs prepare both halves before
/// committing either.
pub(crate) fn prepare_method<'d>(
    ctx: &mut CompilationContext<'_>,
    owner: ContainerId,
    data: MethodData<'d>,
) -> Option<PreparedMethod<'d>> {
    let container = ctx.container(owner);
    let owner_type = container.type_id?;
    let in_interface = container.is_interface();
    let container_abstract = container.is_abstract();
    let container_name = container.full_name.clone();
    let base = container.base;
    let mods = data.modifiers;
    let display = ctx.make_name(owner, &data.name);
    let plain = format!("{}.{}", container_name, data.name);

    let metadata_name = match data.explicit_interface {
        Some(iface) => format!("{}.{}", ctx.registry.name(iface), data.name),
        None => data.name.clone(),
    };

    if data.validate_modifiers && !in_interface && data.explicit_interface.is_none() {
        let errors = method_modifier_errors(mods, &display, container_abstract);
        if !errors.is_empty() {
            for e in errors {
                ctx.error(data.location, e);
            }
            return None;
        }
    }

    if !in_interface {
        let is_abstract = mods.contains(Modifiers::ABSTRACT);
        let is_extern = mods.contains(Modifiers::EXTERN);
        let error = if is_abstract && data.has_body {
            Some(ResolutionError::AbstractWithBody { member: plain.clone() })
        } else if is_extern && data.has_body {
            Some(ResolutionError::ExternWithBody { member: plain.clone() })
        } else if !is_abstract && !is_extern && !data.has_body && data.body_required {
            Some(ResolutionError::MissingBody { member: plain.clone() })
        } else {
            None
        };
        if let Some(error) = error {
            ctx.error(data.location, error);
            return None;
        }
    }

    let dll_import = data.attributes.iter().any(|a| a.short_name() == "DllImport");
    if dll_import && !mods.contains(Modifiers::STATIC | Modifiers::EXTERN) {
        ctx.error(data.location, ResolutionError::DllImportRequiresStaticExtern);
        return None;
    }

    let signature = MethodSignature::new(metadata_name.clone(), data.return_type, data.parameters.clone());
    if ctx.container(owner).signatures.contains(&signature) {
        ctx.error(data.location, ResolutionError::DuplicateSignature { container: container_name, what: data.what });
        return None;
    }

    if data.check_base && !in_interface && data.explicit_interface.is_none() {
        if let Some(base) = base {
            let lookup = MethodSignature::new(data.name.clone(), data.return_type, data.parameters.clone());
            let hit = find_inherited(ctx, base, MemberFilter::Signature(&lookup));
            if !check_base_relation(ctx, owner, &data.name, mods, hit, data.location) {
                return None;
            }
        }
    }

    if let Some(iface) = data.explicit_interface {
        if !ctx.container(owner).interface_ids.contains(&iface) {
            let interface = ctx.registry.name(iface).to_string();
            ctx.error(data.location, ResolutionError::InterfaceNotInBases { member: plain, interface });
            return None;
        }
        let candidate = candidate_of(&data);
        let open = ctx.container(owner).pending.as_ref().map_or(false, |t| t.has_slot(iface, candidate));
        if !open {
            let member = format!("{}.{}", ctx.registry.name(iface), data.name);
            ctx.error(data.location, ResolutionError::NotInterfaceMember { member });
            return None;
        }
    }

    Some(PreparedMethod { data, owner_type, metadata_name, plain, in_interface })
}

/// Registers a prepared method: signature, pending slot, metadata, registry
/// entry and entry point.
pub(crate) fn commit_method(ctx: &mut CompilationContext<'_>, owner: ContainerId, prepared: PreparedMethod<'_>) -> MemberId {
    let PreparedMethod { data, owner_type, metadata_name, plain, in_interface } = prepared;
    let mods = data.modifiers;

    let signature = MethodSignature::new(metadata_name.clone(), data.return_type, data.parameters.clone());
    ctx.container_mut(owner).signatures.insert(signature);

    let mut attributes = if in_interface {
        MemberAttributes::PUBLIC
            | MemberAttributes::ABSTRACT
            | MemberAttributes::VIRTUAL
            | MemberAttributes::NEW_SLOT
            | MemberAttributes::HIDE_BY_SIG
    } else if data.explicit_interface.is_some() {
        MemberAttributes::PRIVATE
            | MemberAttributes::VIRTUAL
            | MemberAttributes::NEW_SLOT
            | MemberAttributes::FINAL
            | MemberAttributes::HIDE_BY_SIG
    } else {
        method_attributes(mods)
    };
    if data.special_name {
        attributes |= MemberAttributes::SPECIAL_NAME;
    }
    let dll_import = data.attributes.iter().find(|a| a.short_name() == "DllImport");
    let pinvoke = dll_import.map(|a| {
        attributes |= MemberAttributes::PINVOKE_IMPL;
        PInvokeInfo {
            library: a.arguments.first().and_then(AttributeValue::as_str).unwrap_or_default().to_string(),
            entry_point: a.named_value("EntryPoint").and_then(AttributeValue::as_str).map(str::to_string),
        }
    });

    let implemented = match_pending(ctx, owner, &data);
    if let Some(slot) = implemented.filter(|s| s.from_interface) {
        log::trace!("{} implements {}", plain, ctx.registry.member_display(slot.declaration));
        attributes |= MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT | MemberAttributes::HIDE_BY_SIG;
        if !attributes.contains(MemberAttributes::ABSTRACT) {
            attributes |= MemberAttributes::FINAL;
        }
    }

    let calling_convention = if mods.contains(Modifiers::STATIC) {
        CallingConvention::Standard
    } else {
        CallingConvention::HasThis
    };
    let owner_token = type_token(ctx, owner);
    let token = ctx.metadata.define_method(
        owner_token,
        MethodDefinition {
            name: metadata_name.clone(),
            attributes,
            calling_convention,
            return_type: data.return_type,
            parameters: data.parameters.clone(),
            parameter_names: data.parameter_names,
            pinvoke,
        },
    );
    let member = ctx.registry.add_member(MemberEntry {
        name: metadata_name,
        kind: MemberKind::Method,
        declaring_type: owner_type,
        attributes,
        member_type: data.return_type,
        parameters: data.parameters,
        accessors: vec![],
        token,
    });
    if let Some(slot) = implemented.filter(|s| s.from_interface) {
        ctx.metadata.define_method_override(owner_token, token, slot.declaration);
    }

    if data.name == "Main" && mods.contains(Modifiers::STATIC) && !data.special_name {
        match ctx.entry_point {
            Some(_) => {
                let program = ctx.program.clone();
                ctx.error(data.location, ResolutionError::MultipleEntryPoints { program, method: plain });
            }
            None => {
                log::debug!("Entry point: {}", plain);
                ctx.entry_point = Some(member);
            }
        }
    }
    member
}

fn candidate_of<'c>(data: &'c MethodData<'_>) -> Candidate<'c> {
    Candidate {
        name: &data.name,
        return_type: data.return_type,
        parameters: &data.parameters,
        is_override: data.modifiers.contains(Modifiers::OVERRIDE),
    }
}

/// Matches a prepared method against the owner's pending table and clears
/// the slot it fills.
///
/// Explicit implementations were checked against their interface when
/// they were prepared, so they always match.
fn match_pending(ctx: &mut CompilationContext<'_>, owner: ContainerId, data: &MethodData<'_>) -> Option<crate::pending::PendingMatch> {
    let mut pending = ctx.container_mut(owner).pending.take();
    let candidate = candidate_of(data);
    let result = pending.as_mut().and_then(|table| match data.explicit_interface {
        Some(iface) => table.find(Some(iface), candidate, true),
        None => {
            let public = data.modifiers.contains(Modifiers::PUBLIC);
            let is_static = data.modifiers.contains(Modifiers::STATIC);
            if public && !is_static {
                table.find(None, candidate, true)
            } else {
                table.find(None, candidate, false);
                let overrides = candidate.is_override && !is_static;
                if overrides {
                    table.find_abstract(candidate)
                } else {
                    None
                }
            }
        }
    });
    ctx.container_mut(owner).pending = pending;
    result
}

/// The nearest inherited member matching `filter`: instance members first,
/// static members only if no instance member matches. Private members of
/// `base` are not inherited and never match.
pub(crate) fn find_inherited(ctx: &CompilationContext<'_>, base: TypeId, filter: MemberFilter<'_>) -> Option<MemberId> {
    let visible = |m: &MemberId| ctx.registry.member(*m).attributes.is_accessible_from_derived();
    ctx.registry
        .find_members(base, filter, Binding::Instance, true)
        .into_iter()
        .find(visible)
        .or_else(|| {
            ctx.registry
                .find_members(base, filter, Binding::Static, true)
                .into_iter()
                .find(visible)
        })
}
