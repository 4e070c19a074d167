//! The hand-off to the statement compiler.
//!
//! The resolver never looks inside a block. Once a member has been defined
//! it describes the body it wants compiled with a `BodyRequest`; what comes
//! back is none of its concern.

use cobalt_syntax::{BlockId, ExprId};

use crate::registry::TypeRegistry;
use crate::types::{CallingConvention, MemberId, TypeId};

/// A field initializer to run at the start of a constructor body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInitializer {
    pub field: MemberId,
    pub value: ExprId,
}

/// A constructor's resolved `base(...)` / `this(...)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorCall {
    pub target: MemberId,
    pub arguments: Vec<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyKind {
    Method,
    /// Property, indexer or event accessor.
    Accessor,
    Constructor {
        initializer: Option<ConstructorCall>,
        field_initializers: Vec<FieldInitializer>,
    },
    /// `Finalize`: the block goes in a `try`, the `finally` calls
    /// `chain_to` when set.
    Finalizer { chain_to: Option<MemberId> },
    /// Compiler-generated constructor with no source block.
    Synthesized {
        initializer: Option<ConstructorCall>,
        field_initializers: Vec<FieldInitializer>,
    },
}

/// Everything the statement compiler needs to compile one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRequest {
    pub member: MemberId,
    pub declaring_type: TypeId,
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
    pub calling_convention: CallingConvention,
    /// Type of `this` for instance members.
    pub this_type: Option<TypeId>,
    pub block: Option<BlockId>,
    pub kind: BodyKind,
}

/// The statement compiler as seen from the resolver.
pub trait CodeEmitter {
    /// Static types of constructor-initializer arguments, used to pick the
    /// target constructor. `None` entries are unknown and match any
    /// parameter.
    fn argument_types(&mut self, registry: &TypeRegistry, arguments: &[ExprId]) -> Vec<Option<TypeId>>;

    fn emit_body(&mut self, request: BodyRequest);

    /// Evaluates a constant's initializer into the field's default value.
    fn emit_constant(&mut self, field: MemberId, field_type: TypeId, value: ExprId);
}

/// A `CodeEmitter` that records requests instead of compiling them.
///
/// Argument types are looked up from a table keyed by expression, by type
/// name so the table can be filled in before any type exists.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    pub bodies: Vec<BodyRequest>,
    pub constants: Vec<(MemberId, TypeId, ExprId)>,
    expression_types: Vec<(ExprId, String)>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression_type(mut self, expr: ExprId, type_name: impl Into<String>) -> Self {
        self.expression_types.push((expr, type_name.into()));
        self
    }

    pub fn body_for(&self, member: MemberId) -> Option<&BodyRequest> {
        self.bodies.iter().find(|b| b.member == member)
    }
}

impl CodeEmitter for RecordingEmitter {
    fn argument_types(&mut self, registry: &TypeRegistry, arguments: &[ExprId]) -> Vec<Option<TypeId>> {
        arguments
            .iter()
            .map(|arg| {
                self.expression_types
                    .iter()
                    .find(|(e, _)| e == arg)
                    .and_then(|(_, name)| registry.lookup(name))
            })
            .collect()
    }

    fn emit_body(&mut self, request: BodyRequest) {
        log::trace!("emit_body {:?} ({:?})", request.member, request.block);
        self.bodies.push(request);
    }

    fn emit_constant(&mut self, field: MemberId, field_type: TypeId, value: ExprId) {
        self.constants.push((field, field_type, value));
    }
}
