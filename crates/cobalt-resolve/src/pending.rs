//! Interface and abstract-base obligations of one type.
//!
//! The table lists every method a type must supply: all methods of every
//! interface it implements, plus the abstract methods it inherits from an
//! abstract base. Member definers match against it as they go; whatever is
//! left when the type is emitted is reported as unimplemented.

use fxhash::FxHashSet;

use crate::error::ResolutionError;
use crate::registry::TypeRegistry;
use crate::types::{MemberId, MemberKind, TypeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSlot {
    /// The declaration still waiting for an implementation; `None` once
    /// matched.
    pub method: Option<MemberId>,
    pub name: String,
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
    /// A candidate with this signature was seen, even if it could not
    /// satisfy the slot.
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub source: TypeId,
    pub is_interface: bool,
    pub slots: Vec<PendingSlot>,
}

/// A slot a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMatch {
    pub declaration: MemberId,
    pub from_interface: bool,
}

/// A method being checked against the table.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub return_type: TypeId,
    pub parameters: &'a [TypeId],
    pub is_override: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingImplementationTable {
    entries: Vec<PendingEntry>,
}

impl PendingImplementationTable {
    /// Builds the table for a class or struct.
    ///
    /// # Arguments
    ///
    /// * `interfaces`: the type's transitive interface set.
    /// * `base`: the resolved base class, if any.
    /// * `is_abstract`: abstract types pass inherited abstract methods on
    ///   instead of owing them.
    pub fn build(registry: &TypeRegistry, interfaces: &[TypeId], base: Option<TypeId>, is_abstract: bool) -> Self {
        let mut entries = vec![];

        for &iface in interfaces {
            let slots = registry
                .get(iface)
                .members
                .iter()
                .map(|m| (*m, registry.member(*m)))
                .filter(|(_, e)| e.kind == MemberKind::Method)
                .map(|(id, e)| {
                    let inherited = base.map_or(false, |b| base_implements(registry, b, &e.name, e.member_type, &e.parameters));
                    PendingSlot {
                        method: if inherited { None } else { Some(id) },
                        name: e.name.clone(),
                        return_type: e.member_type,
                        parameters: e.parameters.clone(),
                        found: inherited,
                    }
                })
                .collect();
            entries.push(PendingEntry { source: iface, is_interface: true, slots });
        }

        if let Some(base) = base.filter(|b| registry.get(*b).is_abstract() && !is_abstract) {
            let slots: Vec<_> = effective_abstract_methods(registry, base)
                .into_iter()
                .map(|id| {
                    let e = registry.member(id);
                    PendingSlot {
                        method: Some(id),
                        name: e.name.clone(),
                        return_type: e.member_type,
                        parameters: e.parameters.clone(),
                        found: false,
                    }
                })
                .collect();
            if !slots.is_empty() {
                entries.push(PendingEntry { source: base, is_interface: false, slots });
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    /// Looks for an open slot matching `candidate`.
    ///
    /// With `source` set only that entry is searched. Matching slots get
    /// their `found` flag set; with `clear` the first match is also closed
    /// and returned. Abstract-base slots only accept overrides.
    pub fn find(&mut self, source: Option<TypeId>, candidate: Candidate<'_>, clear: bool) -> Option<PendingMatch> {
        for entry in self.entries.iter_mut() {
            if source.map_or(false, |s| s != entry.source) {
                continue;
            }
            if !entry.is_interface && !candidate.is_override {
                continue;
            }
            for slot in entry.slots.iter_mut() {
                let Some(declaration) = slot.method else { continue };
                let same_parameters = slot.parameters == candidate.parameters;
                if slot.name != candidate.name || slot.return_type != candidate.return_type || !same_parameters {
                    continue;
                }
                slot.found = true;
                if clear {
                    slot.method = None;
                    return Some(PendingMatch { declaration, from_interface: entry.is_interface });
                }
            }
            if source.is_some() {
                break;
            }
        }
        None
    }

    /// Whether `source` still has an open slot `candidate` would fill.
    pub fn has_slot(&self, source: TypeId, candidate: Candidate<'_>) -> bool {
        self.entries.iter().filter(|e| e.source == source).any(|e| {
            e.slots.iter().any(|slot| {
                slot.method.is_some()
                    && slot.name == candidate.name
                    && slot.return_type == candidate.return_type
                    && slot.parameters == candidate.parameters
            })
        })
    }

    /// Closes the abstract-base slot an override implements, whatever its
    /// access. Interface slots are left alone.
    pub fn find_abstract(&mut self, candidate: Candidate<'_>) -> Option<PendingMatch> {
        let sources: Vec<TypeId> = self.entries.iter().filter(|e| !e.is_interface).map(|e| e.source).collect();
        sources.into_iter().find_map(|s| self.find(Some(s), candidate, true))
    }

    /// Reports every slot nobody implemented.
    pub fn verify_all_satisfied(&self, registry: &TypeRegistry, type_name: &str) -> Vec<ResolutionError> {
        let mut errors = vec![];
        for entry in &self.entries {
            for slot in &entry.slots {
                let Some(method) = slot.method else { continue };
                let member = registry.member_display(method);
                if entry.is_interface {
                    let extra = if slot.found { ".  (method might be private or static)" } else { "" };
                    errors.push(ResolutionError::InterfaceMemberNotImplemented {
                        name: type_name.to_string(),
                        member,
                        extra: extra.to_string(),
                    });
                } else {
                    errors.push(ResolutionError::AbstractMemberNotImplemented {
                        name: type_name.to_string(),
                        member,
                    });
                }
            }
        }
        errors
    }
}

/// Whether `base` or one of its ancestors already has a public instance
/// method with this signature.
fn base_implements(registry: &TypeRegistry, base: TypeId, name: &str, return_type: TypeId, parameters: &[TypeId]) -> bool {
    std::iter::once(base).chain(registry.base_chain(base)).any(|t| {
        registry.get(t).members.iter().any(|m| {
            let e = registry.member(*m);
            e.kind == MemberKind::Method
                && e.attributes.contains(crate::types::MemberAttributes::PUBLIC)
                && !e.is_static()
                && !e.is_abstract()
                && e.name == name
                && e.member_type == return_type
                && e.parameters == parameters
        })
    })
}

/// Abstract methods still open at `base`: walking from `base` upward, a
/// signature is settled by the most derived declaration of it.
fn effective_abstract_methods(registry: &TypeRegistry, base: TypeId) -> Vec<MemberId> {
    let mut seen: FxHashSet<(&str, TypeId, &[TypeId])> = FxHashSet::default();
    let mut open = vec![];
    for t in std::iter::once(base).chain(registry.base_chain(base)) {
        for &m in &registry.get(t).members {
            let e = registry.member(m);
            if e.kind != MemberKind::Method || e.is_static() {
                continue;
            }
            if !seen.insert((e.name.as_str(), e.member_type, e.parameters.as_slice())) {
                continue;
            }
            if e.is_abstract() {
                open.push(m);
            }
        }
    }
    open
}
