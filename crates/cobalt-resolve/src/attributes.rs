//! Attribute targets, usage constraints and the external attribute
//! resolver.

use bitflags::bitflags;
use cobalt_syntax::{AttributeUse, AttributeValue, NamedArgument};

use crate::types::TypeId;

bitflags! {
    /// Where an attribute may be applied. Values match the platform's
    /// `System.AttributeTargets`, so `AttributeUsage(4)` means classes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeTargets: u32 {
        const ASSEMBLY     = 1;
        const MODULE       = 2;
        const CLASS        = 4;
        const STRUCT       = 8;
        const ENUM         = 16;
        const CONSTRUCTOR  = 32;
        const METHOD       = 64;
        const PROPERTY     = 128;
        const FIELD        = 256;
        const EVENT        = 512;
        const INTERFACE    = 1024;
        const PARAMETER    = 2048;
        const DELEGATE     = 4096;
        const RETURN_VALUE = 8192;
        const ALL          = 16383;
    }
}

/// Constraints an attribute class declares through `AttributeUsage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUsage {
    pub targets: AttributeTargets,
    pub allow_multiple: bool,
    pub inherited: bool,
}

impl Default for AttributeUsage {
    fn default() -> Self {
        Self {
            targets: AttributeTargets::ALL,
            allow_multiple: false,
            inherited: true,
        }
    }
}

impl AttributeUsage {
    pub fn on(targets: AttributeTargets) -> Self {
        Self { targets, ..Default::default() }
    }

    /// Reads the usage out of an `AttributeUsage(...)` application.
    pub fn from_attribute(attr: &ResolvedAttribute) -> Self {
        let mut usage = Self::default();
        if let Some(bits) = attr.arguments.first().and_then(AttributeValue::as_int) {
            usage.targets = AttributeTargets::from_bits_truncate(bits as u32);
        }
        for named in &attr.named {
            match named.name.as_str() {
                "AllowMultiple" => usage.allow_multiple = named.value.as_bool().unwrap_or(false),
                "Inherited" => usage.inherited = named.value.as_bool().unwrap_or(true),
                _ => {}
            }
        }
        usage
    }
}

/// An attribute application whose type has been resolved and whose
/// arguments have been evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    pub attribute_type: TypeId,
    pub type_name: String,
    pub arguments: Vec<AttributeValue>,
    pub named: Vec<NamedArgument>,
}

impl ResolvedAttribute {
    pub fn named_value(&self, name: &str) -> Option<&AttributeValue> {
        self.named.iter().find(|n| n.name == name).map(|n| &n.value)
    }
}

/// The site an attribute is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSite {
    pub target: AttributeTargets,
    /// The type declaring the member, or the type itself.
    pub declaring_type: TypeId,
}

/// Evaluates attribute arguments. The resolver has already found the
/// attribute's type; a `None` result means the resolver reported why it could
/// not evaluate the application and the attribute is skipped.
pub trait AttributeResolver {
    fn resolve(
        &mut self,
        attribute_type: TypeId,
        type_name: &str,
        attribute: &AttributeUse,
        site: AttributeSite,
    ) -> Option<ResolvedAttribute>;
}

/// Resolver for declaration manifests, where every argument already is a
/// literal.
#[derive(Debug, Default)]
pub struct LiteralAttributeResolver;

impl AttributeResolver for LiteralAttributeResolver {
    fn resolve(
        &mut self,
        attribute_type: TypeId,
        type_name: &str,
        attribute: &AttributeUse,
        _site: AttributeSite,
    ) -> Option<ResolvedAttribute> {
        Some(ResolvedAttribute {
            attribute_type,
            type_name: type_name.to_string(),
            arguments: attribute.arguments.clone(),
            named: attribute.named.clone(),
        })
    }
}
