pub mod common;
pub mod members;
pub mod modifiers;
pub mod types;

pub use common::{
    AttributeUse, AttributeValue, BlockId, ExprId, NamedArgument, Parameter, ParameterModifier,
};
pub use members::{
    AccessorDecl, ConstantDecl, ConstructorDecl, ConstructorInitializerDecl, EventDecl, FieldDecl,
    IndexerDecl, InitializerTarget, MemberDecl, MethodDecl, OperatorDecl, OperatorKind,
    PropertyDecl,
};
pub use modifiers::Modifiers;
pub use types::{CompilationUnit, EnumMemberDecl, NamespaceDecl, TypeDecl, TypeDeclKind, UsingAlias};
