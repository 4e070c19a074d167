//! Declaration space and member resolution for the Cobalt compiler.
//!
//! Given the declarations of a program (see `cobalt-syntax`), this crate
//! builds one `TypeContainer` per declared type, resolves base classes and
//! interfaces across the whole program, defines every member with its
//! modifier, override and interface-implementation rules, and hands the
//! results to three capability seams:
//! - `MetadataSink` receives type and member definitions
//! - `CodeEmitter` receives member bodies and constant values
//! - `AttributeResolver` turns attribute uses into values
//!
//! In-memory implementations of all three live next to their traits; the
//! tests and the command line driver use them.
//!
//! ## Phases
//!
//! `Resolver::run` executes `DefineType`, `Populate`, `Emit` and
//! `CloseType`, each over the whole program before the next begins.
//! Diagnostics are reported to a `cobalt_source::DiagnosticSink` and never
//! abort the run; a failure only stops the type or member it concerns.

pub mod attributes;
pub mod container;
pub mod context;
pub mod core;
pub mod emitter;
pub mod error;
pub mod members;
pub mod metadata;
pub mod modifiers;
pub mod namespace;
pub mod operator_rules;
pub mod pending;
pub mod registry;
pub mod resolver;
pub mod types;

pub use attributes::{AttributeResolver, AttributeTargets, AttributeUsage, LiteralAttributeResolver, ResolvedAttribute};
pub use container::{AdditionResult, ContainerShape, TypeContainer};
pub use context::{CompilationContext, DefinitionStatus};
pub use core::{ResolutionSummary, Resolver};
pub use emitter::{BodyKind, BodyRequest, CodeEmitter, RecordingEmitter};
pub use error::{ResolutionError, ResolverWarning};
pub use metadata::{InMemoryMetadata, MetadataSink, MetadataToken, RecordedMember};
pub use registry::TypeRegistry;
pub use types::{ContainerId, MemberAttributes, MemberId, TypeAttributes, TypeId};
