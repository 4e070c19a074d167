use miette::Diagnostic;
use thiserror::Error;

use cobalt_source::{CompilerDiagnostic, Location};

/// Why a lookup or definition step gave up.
///
/// The diagnostic explaining the failure has already been reported by the
/// time one of these is returned (or belongs to the type that failed first),
/// so callers only propagate it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    #[error("type not found")]
    NotFound,
    #[error("circular definition")]
    Circular,
    #[error("a type this one depends on failed")]
    Dependency,
    #[error("invalid declaration")]
    Invalid,
}

pub type ResolveResult<T> = Result<T, Failure>;

/// Hard errors reported while defining, populating and emitting types.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Program `{program}' has more than one entry point defined: `{method}'")]
    #[diagnostic(code(cobalt_resolve::multiple_entry_points))]
    MultipleEntryPoints { program: String, method: String },

    #[error("`{member}': event must be of a delegate type")]
    #[diagnostic(code(cobalt_resolve::event_not_delegate))]
    EventNotDelegate { member: String },

    #[error("The namespace `{namespace}' already contains a definition for `{name}'")]
    #[diagnostic(code(cobalt_resolve::duplicate_type))]
    DuplicateType { namespace: String, name: String },

    #[error("The container `{container}' already contains a definition for `{name}'")]
    #[diagnostic(code(cobalt_resolve::duplicate_name))]
    DuplicateName { container: String, name: String },

    #[error("the modifier `{modifier}' is not valid for this item")]
    #[diagnostic(code(cobalt_resolve::invalid_modifier))]
    InvalidModifier { modifier: String },

    #[error("`public' or `abstract' modifiers are not allowed in explicit interface declarations")]
    #[diagnostic(code(cobalt_resolve::explicit_interface_modifiers))]
    ExplicitInterfaceModifiers,

    /// `what` is e.g. "method `Foo'" or "the get method of property `P'".
    #[error("Class `{container}' already contains a definition with the same return value and parameter types for {what}")]
    #[diagnostic(code(cobalt_resolve::duplicate_signature))]
    DuplicateSignature { container: String, what: String },

    #[error("Class `{container}' already contains a definition for the property `{name}'")]
    #[diagnostic(code(cobalt_resolve::duplicate_property))]
    DuplicateProperty { container: String, name: String },

    #[error("static method {member}can not be marked as virtual, abstract or override")]
    #[diagnostic(code(cobalt_resolve::static_virtual))]
    StaticNotVirtual { member: String },

    #[error("{member} marked as override cannot be marked as new or virtual")]
    #[diagnostic(code(cobalt_resolve::override_new_virtual))]
    OverrideNewOrVirtual { member: String },

    #[error("{member} no suitable methods found to override")]
    #[diagnostic(code(cobalt_resolve::no_override_target))]
    NoSuitableOverride { member: String },

    #[error("`{name}': a static constructor must be parameterless")]
    #[diagnostic(code(cobalt_resolve::static_constructor_parameters))]
    StaticConstructorParameters { name: String },

    #[error("Class definition is circular: `{name}'")]
    #[diagnostic(
        code(cobalt_resolve::circular_definition),
        help("a type cannot derive, directly or indirectly, from itself")
    )]
    CircularDefinition { name: String },

    #[error("`{member}' cannot be extern and declare a body")]
    #[diagnostic(code(cobalt_resolve::extern_with_body))]
    ExternWithBody { member: String },

    #[error("{member} can not be both abstract and extern")]
    #[diagnostic(code(cobalt_resolve::abstract_extern))]
    AbstractAndExtern { member: String },

    #[error("The return type of operator True or False must be bool")]
    #[diagnostic(code(cobalt_resolve::true_false_return))]
    TrueFalseReturnType,

    #[error("{member} cannot be sealed because it is not an override")]
    #[diagnostic(code(cobalt_resolve::sealed_not_override))]
    SealedWithoutOverride { member: String },

    #[error("Can not find type `{name}'")]
    #[diagnostic(
        code(cobalt_resolve::type_not_found),
        help("Is a `using' directive for the type's namespace missing?")
    )]
    TypeNotFound { name: String },

    #[error("`{member}' cannot declare a body because it is marked abstract")]
    #[diagnostic(code(cobalt_resolve::abstract_with_body))]
    AbstractWithBody { member: String },

    #[error("`{member}' must declare a body because it is not marked abstract or extern")]
    #[diagnostic(code(cobalt_resolve::missing_body))]
    MissingBody { member: String },

    #[error("{member} can not be both abstract and virtual")]
    #[diagnostic(code(cobalt_resolve::abstract_virtual))]
    AbstractAndVirtual { member: String },

    #[error("{member}: cannot override inherited member `{base}' because it is not virtual, abstract or override")]
    #[diagnostic(code(cobalt_resolve::override_not_virtual))]
    OverrideNotVirtual { member: String, base: String },

    #[error("class `{name}': Cannot inherit from sealed class `{base}'{detail}")]
    #[diagnostic(code(cobalt_resolve::sealed_base))]
    SealedBase { name: String, base: String, detail: String },

    #[error("{member} is abstract but its container class is not")]
    #[diagnostic(code(cobalt_resolve::abstract_in_concrete))]
    AbstractInConcreteClass { member: String },

    #[error("`{name}': access modifiers are not allowed on static constructors")]
    #[diagnostic(code(cobalt_resolve::static_constructor_access))]
    StaticConstructorAccess { name: String },

    #[error("Constructor `{name}' can not call itself")]
    #[diagnostic(code(cobalt_resolve::recursive_constructor))]
    ConstructorCallsItself { name: String },

    #[error("In {kind} `{name}', type `{base}' is not an interface")]
    #[diagnostic(code(cobalt_resolve::not_an_interface))]
    NotAnInterface { kind: String, name: String, base: String },

    #[error("`{name}' does not implement inherited abstract member `{member}'")]
    #[diagnostic(code(cobalt_resolve::abstract_not_implemented))]
    AbstractMemberNotImplemented { name: String, member: String },

    #[error("`{name}' does not implement interface member `{member}'{extra}")]
    #[diagnostic(code(cobalt_resolve::interface_not_implemented))]
    InterfaceMemberNotImplemented { name: String, member: String, extra: String },

    #[error("`{member}' in explicit interface declaration is not a member of interface")]
    #[diagnostic(code(cobalt_resolve::not_interface_member))]
    NotInterfaceMember { member: String },

    #[error("`{member}': containing class does not implement interface `{interface}'")]
    #[diagnostic(code(cobalt_resolve::interface_not_in_bases))]
    InterfaceNotInBases { member: String, interface: String },

    #[error("`{name}': member names cannot be the same as their enclosing type")]
    #[diagnostic(code(cobalt_resolve::member_named_as_type))]
    MemberNamedAsEnclosingType { name: String },

    #[error("`{member}': property or indexer must have at least one accessor")]
    #[diagnostic(code(cobalt_resolve::no_accessors))]
    NoAccessors { member: String },

    #[error("User-defined conversion cannot convert to or from an interface type")]
    #[diagnostic(code(cobalt_resolve::conversion_interface))]
    ConversionInterface,

    #[error("User-defined conversion cannot take an object of the enclosing type and convert to an object of the enclosing type")]
    #[diagnostic(code(cobalt_resolve::conversion_same_type))]
    ConversionSameType,

    #[error("User-defined conversion must convert to or from the enclosing type")]
    #[diagnostic(code(cobalt_resolve::conversion_enclosing))]
    ConversionEnclosing,

    #[error("User-defined conversion cannot convert to or from object type")]
    #[diagnostic(code(cobalt_resolve::conversion_object))]
    ConversionObject,

    #[error("User-defined conversion cannot convert between types that derive from each other")]
    #[diagnostic(code(cobalt_resolve::conversion_derived))]
    ConversionDerived,

    #[error("User defined operators `{prototype}' must be declared static and public")]
    #[diagnostic(code(cobalt_resolve::operator_modifiers))]
    OperatorNotPublicStatic { prototype: String },

    #[error("The parameter and return type for ++ and -- must be the containing type")]
    #[diagnostic(code(cobalt_resolve::increment_type))]
    IncrementDecrementType,

    #[error("The parameter of a unary operator must be the containing type")]
    #[diagnostic(code(cobalt_resolve::unary_operand))]
    UnaryOperand,

    #[error("One of the parameters of a binary operator must be the containing type")]
    #[diagnostic(code(cobalt_resolve::binary_operand))]
    BinaryOperand,

    #[error("Structs can not contain explicit parameterless constructors")]
    #[diagnostic(code(cobalt_resolve::struct_parameterless_constructor))]
    StructParameterlessConstructor,

    #[error("`{field}': can not have instance field initializers in structs")]
    #[diagnostic(code(cobalt_resolve::struct_field_initializer))]
    StructFieldInitializer { field: String },

    #[error("Duplicate `{name}' attribute")]
    #[diagnostic(code(cobalt_resolve::duplicate_attribute))]
    DuplicateAttribute { name: String },

    #[error("Attribute `{name}' is not valid on this declaration type")]
    #[diagnostic(code(cobalt_resolve::attribute_target))]
    AttributeNotValidOnTarget { name: String },

    #[error("`{name}' is not an attribute class")]
    #[diagnostic(code(cobalt_resolve::not_an_attribute))]
    NotAnAttribute { name: String },

    #[error("The DllImport attribute must be specified on a method marked `static' and `extern'")]
    #[diagnostic(code(cobalt_resolve::dll_import_modifiers))]
    DllImportRequiresStaticExtern,

    #[error("{member}: virtual or abstract members can not be private")]
    #[diagnostic(code(cobalt_resolve::private_virtual))]
    PrivateVirtual { member: String },

    #[error("Type byte, sbyte, short, ushort, int, uint, long, or ulong expected")]
    #[diagnostic(code(cobalt_resolve::enum_underlying_type))]
    InvalidEnumUnderlyingType,

    #[error("No overload for method `{name}' takes `{count}' arguments")]
    #[diagnostic(code(cobalt_resolve::no_constructor_overload))]
    NoConstructorOverload { name: String, count: usize },

    #[error("Class, struct, or interface method must have a return type")]
    #[diagnostic(code(cobalt_resolve::missing_return_type))]
    NotAConstructor,
}

impl ResolutionError {
    /// The stable diagnostic number.
    pub fn code(&self) -> i32 {
        use ResolutionError::*;
        match self {
            MultipleEntryPoints { .. } => 17,
            EventNotDelegate { .. } => 66,
            DuplicateType { .. } => 101,
            DuplicateName { .. } => 102,
            InvalidModifier { .. } | ExplicitInterfaceModifiers => 106,
            DuplicateSignature { .. } | DuplicateProperty { .. } => 111,
            StaticNotVirtual { .. } => 112,
            OverrideNewOrVirtual { .. } => 113,
            NoSuitableOverride { .. } => 115,
            StaticConstructorParameters { .. } => 132,
            CircularDefinition { .. } => 146,
            ExternWithBody { .. } => 179,
            AbstractAndExtern { .. } => 180,
            TrueFalseReturnType => 215,
            SealedWithoutOverride { .. } => 238,
            TypeNotFound { .. } => 246,
            AbstractWithBody { .. } => 500,
            MissingBody { .. } => 501,
            AbstractAndVirtual { .. } => 503,
            OverrideNotVirtual { .. } => 506,
            SealedBase { .. } => 509,
            AbstractInConcreteClass { .. } => 513,
            StaticConstructorAccess { .. } => 515,
            ConstructorCallsItself { .. } => 516,
            NotAnInterface { .. } => 527,
            AbstractMemberNotImplemented { .. } => 534,
            InterfaceMemberNotImplemented { .. } => 536,
            NotInterfaceMember { .. } => 539,
            InterfaceNotInBases { .. } => 540,
            MemberNamedAsEnclosingType { .. } => 542,
            NoAccessors { .. } => 548,
            ConversionInterface => 552,
            ConversionSameType => 555,
            ConversionEnclosing => 556,
            OperatorNotPublicStatic { .. } => 558,
            IncrementDecrementType => 559,
            UnaryOperand => 562,
            BinaryOperand => 563,
            StructParameterlessConstructor => 568,
            StructFieldInitializer { .. } => 573,
            DuplicateAttribute { .. } => 579,
            AttributeNotValidOnTarget { .. } => 592,
            DllImportRequiresStaticExtern => 601,
            NotAnAttribute { .. } => 616,
            PrivateVirtual { .. } => 621,
            InvalidEnumUnderlyingType => 1008,
            NoConstructorOverload { .. } => 1501,
            NotAConstructor => 1520,
            ConversionObject => -8,
            ConversionDerived => -10,
        }
    }

    pub fn at(self, location: Location) -> CompilerDiagnostic {
        CompilerDiagnostic::error(self.code(), location, self.to_string())
    }
}

/// Advisory diagnostics. They never stop a phase.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolverWarning {
    #[error("The keyword new is required on {member} because it hides `{base}'")]
    #[diagnostic(code(cobalt_resolve::new_required), severity(Warning))]
    NewRequired { member: String, base: String },

    #[error("The member `{member}' does not hide an inherited member.  The keyword new is not required")]
    #[diagnostic(code(cobalt_resolve::new_not_required), severity(Warning))]
    NewNotRequired { member: String },

    #[error("{member} hides inherited member `{base}'.  To make the current member override that implementation, add the override keyword, otherwise use the new keyword")]
    #[diagnostic(code(cobalt_resolve::hides_inherited), severity(Warning))]
    HidesInherited { member: String, base: String },
}

impl ResolverWarning {
    pub fn code(&self) -> i32 {
        match self {
            ResolverWarning::NewRequired { .. } => 108,
            ResolverWarning::NewNotRequired { .. } => 109,
            ResolverWarning::HidesInherited { .. } => 114,
        }
    }

    /// Warning level the warning is reported at.
    pub fn level(&self) -> u8 {
        match self {
            ResolverWarning::NewRequired { .. } | ResolverWarning::HidesInherited { .. } => 2,
            ResolverWarning::NewNotRequired { .. } => 4,
        }
    }

    pub fn at(self, location: Location) -> CompilerDiagnostic {
        CompilerDiagnostic::warning(self.code(), self.level(), location, self.to_string())
    }
}
