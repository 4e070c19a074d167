//! The compilation context: all mutable state of one resolution run.
//!
//! Nothing in the resolver is global. The registry, the namespace scopes,
//! every type container and its definition status live here, and every
//! pass takes the context by `&mut`.

use fxhash::FxHashMap;

use cobalt_source::{CompilerConfig, CompilerDiagnostic, DiagnosticSink, Location};

use crate::attributes::AttributeResolver;
use crate::container::{ContainerShape, TypeContainer};
use crate::emitter::CodeEmitter;
use crate::error::{ResolutionError, ResolverWarning};
use crate::metadata::MetadataSink;
use crate::namespace::{NamespaceId, NamespaceScope};
use crate::registry::TypeRegistry;
use crate::types::{ContainerId, MemberId, TypeId};

/// Where a container is in `DefineType`.
///
/// `InProgress` is the re-entrancy guard: reaching a type in this state
/// through name resolution means its base list refers back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionStatus {
    Undefined,
    InProgress,
    Defined,
    Failed,
}

pub struct CompilationContext<'a> {
    pub config: CompilerConfig,
    pub registry: TypeRegistry,
    pub(crate) namespaces: Vec<NamespaceScope>,
    pub(crate) containers: Vec<TypeContainer>,
    status: Vec<DefinitionStatus>,
    /// Source-level type declarations by full name, defined or not.
    pub(crate) declarations: FxHashMap<String, ContainerId>,
    /// The implicit container holding every top-level type.
    pub root: ContainerId,
    pub entry_point: Option<MemberId>,
    /// Name used for the program in diagnostics: the first unit's file.
    pub program: String,

    diagnostics: &'a mut dyn DiagnosticSink,
    pub(crate) metadata: &'a mut dyn MetadataSink,
    pub(crate) emitter: &'a mut dyn CodeEmitter,
    pub(crate) attribute_resolver: &'a mut dyn AttributeResolver,
}

impl<'a> CompilationContext<'a> {
    pub fn new(
        config: CompilerConfig,
        diagnostics: &'a mut dyn DiagnosticSink,
        metadata: &'a mut dyn MetadataSink,
        emitter: &'a mut dyn CodeEmitter,
        attribute_resolver: &'a mut dyn AttributeResolver,
    ) -> Self {
        let registry = if config.compiler.stdlib {
            TypeRegistry::with_platform()
        } else {
            TypeRegistry::new()
        };
        let global = NamespaceScope {
            name: String::new(),
            parent: None,
            usings: vec![],
            aliases: vec![],
        };
        let root = TypeContainer::new(
            String::new(),
            String::new(),
            ContainerShape::Root,
            NamespaceId(0),
            None,
            Location::NULL,
        );
        Self {
            config,
            registry,
            namespaces: vec![global],
            containers: vec![root],
            status: vec![DefinitionStatus::Defined],
            declarations: FxHashMap::default(),
            root: ContainerId(0),
            entry_point: None,
            program: String::new(),
            diagnostics,
            metadata,
            emitter,
            attribute_resolver,
        }
    }

    // --- Diagnostics ---

    pub fn error(&mut self, location: Location, error: ResolutionError) {
        self.diagnostics.report(error.at(location));
    }

    pub fn warning(&mut self, location: Location, warning: ResolverWarning) {
        self.diagnostics.report(warning.at(location));
    }

    pub fn report(&mut self, diagnostic: CompilerDiagnostic) {
        self.diagnostics.report(diagnostic);
    }

    // --- Containers ---

    pub(crate) fn add_container(&mut self, container: TypeContainer) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(container);
        self.status.push(DefinitionStatus::Undefined);
        id
    }

    pub fn container(&self, id: ContainerId) -> &TypeContainer {
        &self.containers[id.index()]
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> &mut TypeContainer {
        &mut self.containers[id.index()]
    }

    /// Every declared container except the implicit root, in declaration
    /// order.
    pub fn container_ids(&self) -> impl Iterator<Item = ContainerId> {
        (1..self.containers.len() as u32).map(ContainerId)
    }

    /// The container declared with this full name.
    pub fn container_named(&self, full_name: &str) -> Option<&TypeContainer> {
        self.declarations.get(full_name).map(|id| self.container(*id))
    }

    pub fn status(&self, id: ContainerId) -> DefinitionStatus {
        self.status[id.index()]
    }

    pub(crate) fn set_status(&mut self, id: ContainerId, status: DefinitionStatus) {
        self.status[id.index()] = status;
    }

    /// The registry handle of a defined container.
    pub fn type_of(&self, id: ContainerId) -> Option<TypeId> {
        self.container(id).type_id
    }

    // --- Namespaces ---

    pub(crate) fn add_namespace(&mut self, scope: NamespaceScope) -> NamespaceId {
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(scope);
        id
    }

    pub fn namespace(&self, id: NamespaceId) -> &NamespaceScope {
        &self.namespaces[id.0 as usize]
    }

    /// `` `Container.name' `` as used in member diagnostics.
    pub fn make_name(&self, owner: ContainerId, name: &str) -> String {
        format!("`{}.{}'", self.container(owner).full_name, name)
    }
}
