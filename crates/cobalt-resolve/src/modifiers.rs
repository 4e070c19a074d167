//! Allowed-modifier masks and the structural modifier rules.

use cobalt_syntax::Modifiers;

use crate::error::ResolutionError;
use crate::types::MemberAttributes;

const ACCESS: Modifiers = Modifiers::ACCESSIBILITY;

pub const TOP_LEVEL_CLASS: Modifiers = Modifiers::PUBLIC
    .union(Modifiers::INTERNAL)
    .union(Modifiers::ABSTRACT)
    .union(Modifiers::SEALED)
    .union(Modifiers::UNSAFE);
pub const TOP_LEVEL_OTHER: Modifiers = Modifiers::PUBLIC.union(Modifiers::INTERNAL).union(Modifiers::UNSAFE);
pub const NESTED_EXTRA: Modifiers = Modifiers::NEW.union(Modifiers::PROTECTED).union(Modifiers::PRIVATE);

pub const FIELD: Modifiers = ACCESS
    .union(Modifiers::NEW)
    .union(Modifiers::STATIC)
    .union(Modifiers::READONLY)
    .union(Modifiers::VOLATILE)
    .union(Modifiers::UNSAFE);
pub const CONSTANT: Modifiers = ACCESS.union(Modifiers::NEW);
pub const METHOD: Modifiers = ACCESS
    .union(Modifiers::NEW)
    .union(Modifiers::STATIC)
    .union(Modifiers::VIRTUAL)
    .union(Modifiers::SEALED)
    .union(Modifiers::OVERRIDE)
    .union(Modifiers::ABSTRACT)
    .union(Modifiers::UNSAFE)
    .union(Modifiers::EXTERN);
pub const INTERFACE_MEMBER: Modifiers = Modifiers::NEW.union(Modifiers::UNSAFE);
pub const CONSTRUCTOR: Modifiers = ACCESS
    .union(Modifiers::STATIC)
    .union(Modifiers::UNSAFE)
    .union(Modifiers::EXTERN);
pub const PROPERTY: Modifiers = METHOD;
pub const EVENT: Modifiers = METHOD;
pub const INDEXER: Modifiers = METHOD.difference(Modifiers::STATIC);
pub const OPERATOR: Modifiers = Modifiers::PUBLIC
    .union(Modifiers::STATIC)
    .union(Modifiers::UNSAFE)
    .union(Modifiers::EXTERN);

/// Members of a struct cannot take part in inheritance.
pub const STRUCT_FORBIDDEN: Modifiers = Modifiers::PROTECTED.union(Modifiers::ABSTRACT).union(Modifiers::VIRTUAL);

/// Allowed modifiers for a type declaration.
pub fn type_mask(nested: bool, class: bool) -> Modifiers {
    let base = if class { TOP_LEVEL_CLASS } else { TOP_LEVEL_OTHER };
    if nested {
        base | NESTED_EXTRA
    } else {
        base
    }
}

/// Strips the modifiers `allowed` does not permit and fills in
/// `default_access` when no access modifier was written.
///
/// Returns the effective modifiers together with one error per rejected
/// modifier.
pub fn check_modifiers(allowed: Modifiers, given: Modifiers, default_access: Modifiers) -> (Modifiers, Vec<ResolutionError>) {
    let invalid = given.difference(allowed);
    let errors = invalid
        .keywords()
        .into_iter()
        .map(|m| ResolutionError::InvalidModifier { modifier: m.to_string() })
        .collect();
    let mut effective = given.intersection(allowed);
    if !effective.has_access() {
        effective |= default_access;
    }
    (effective, errors)
}

/// The combination rules for methods, properties and events.
///
/// `member` is the quoted display name, e.g. `` `Shape.Area' ``.
pub fn method_modifier_errors(flags: Modifiers, member: &str, container_abstract: bool) -> Vec<ResolutionError> {
    let mut errors = vec![];
    let member = member.to_string();

    if flags.contains(Modifiers::STATIC)
        && flags.intersects(Modifiers::VIRTUAL | Modifiers::ABSTRACT | Modifiers::OVERRIDE)
    {
        errors.push(ResolutionError::StaticNotVirtual { member: member.clone() });
    }
    if flags.contains(Modifiers::OVERRIDE) && flags.intersects(Modifiers::NEW | Modifiers::VIRTUAL) {
        errors.push(ResolutionError::OverrideNewOrVirtual { member: member.clone() });
    }
    if flags.contains(Modifiers::ABSTRACT) {
        if flags.contains(Modifiers::EXTERN) {
            errors.push(ResolutionError::AbstractAndExtern { member: member.clone() });
        }
        if flags.contains(Modifiers::VIRTUAL) {
            errors.push(ResolutionError::AbstractAndVirtual { member: member.clone() });
        }
        if !container_abstract {
            errors.push(ResolutionError::AbstractInConcreteClass { member: member.clone() });
        }
    }
    if flags.contains(Modifiers::PRIVATE)
        && flags.intersects(Modifiers::VIRTUAL | Modifiers::ABSTRACT | Modifiers::OVERRIDE)
    {
        errors.push(ResolutionError::PrivateVirtual { member: member.clone() });
    }
    if flags.contains(Modifiers::SEALED) && !flags.contains(Modifiers::OVERRIDE) {
        errors.push(ResolutionError::SealedWithoutOverride { member });
    }
    errors
}

/// Access bits for a member with the given (defaulted) modifiers.
pub fn member_access(flags: Modifiers) -> MemberAttributes {
    if flags.contains(Modifiers::PUBLIC) {
        MemberAttributes::PUBLIC
    } else if flags.contains(Modifiers::PROTECTED | Modifiers::INTERNAL) {
        MemberAttributes::FAM_OR_ASSEM
    } else if flags.contains(Modifiers::PROTECTED) {
        MemberAttributes::FAMILY
    } else if flags.contains(Modifiers::INTERNAL) {
        MemberAttributes::ASSEMBLY
    } else {
        MemberAttributes::PRIVATE
    }
}

/// Metadata attributes of a method, before interface matching adjusts them.
pub fn method_attributes(flags: Modifiers) -> MemberAttributes {
    let mut attrs = member_access(flags) | MemberAttributes::HIDE_BY_SIG;
    if flags.contains(Modifiers::STATIC) {
        attrs |= MemberAttributes::STATIC;
    }
    if flags.contains(Modifiers::ABSTRACT) {
        attrs |= MemberAttributes::ABSTRACT | MemberAttributes::VIRTUAL;
    }
    if flags.intersects(Modifiers::VIRTUAL | Modifiers::OVERRIDE) {
        attrs |= MemberAttributes::VIRTUAL;
    }
    if flags.contains(Modifiers::SEALED) {
        attrs |= MemberAttributes::FINAL;
    }
    if flags.intersects(Modifiers::VIRTUAL | Modifiers::ABSTRACT) && !flags.contains(Modifiers::OVERRIDE) {
        attrs |= MemberAttributes::NEW_SLOT;
    }
    attrs
}
