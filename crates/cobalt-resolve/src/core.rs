// Phase driver: runs DefineType, Populate, Emit and CloseType over every
// declared type.

use cobalt_syntax::CompilationUnit;

use crate::container::declare::declare_unit;
use crate::container::define::{define_type, type_token};
use crate::container::emit::emit_type;
use crate::container::populate::populate_type;
use crate::context::{CompilationContext, DefinitionStatus};
use crate::types::ContainerId;

/// What a resolution run did, by type full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub defined: Vec<String>,
    pub failed: Vec<String>,
    pub emitted: Vec<String>,
    pub closed: Vec<String>,
    /// `Type.Main` when an entry point was found.
    pub entry_point: Option<String>,
}

/// The resolver driving one compilation.
///
/// Holds the compilation context for the duration of the run. Declaring
/// units and running the phases are separate steps so callers can declare
/// any number of units first.
pub struct Resolver<'c, 'a> {
    ctx: &'c mut CompilationContext<'a>,
}

impl<'c, 'a> Resolver<'c, 'a> {
    pub fn new(ctx: &'c mut CompilationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Declares the types of `units`, in order.
    pub fn declare(&mut self, units: impl IntoIterator<Item = CompilationUnit>) -> &mut Self {
        for unit in units {
            declare_unit(self.ctx, unit);
        }
        self
    }

    /// Runs every phase over everything declared so far.
    ///
    /// Each phase finishes for the whole program before the next starts:
    /// 1. **DefineType:** every declared type gets its handle, in source
    ///    order. Name resolution defines referenced types on demand.
    /// 2. **Populate:** every defined type defines its members, after its
    ///    base and interfaces.
    /// 3. **Emit:** pending obligations are verified, attributes applied and
    ///    bodies handed to the code emitter.
    /// 4. **CloseType:** emitted types are finalized, parents before nested
    ///    types.
    ///
    /// # Returns
    ///
    /// A `ResolutionSummary`. Diagnostics went to the context's sink.
    pub fn run(self) -> ResolutionSummary {
        let ctx = self.ctx;
        let ids: Vec<ContainerId> = ctx.container_ids().collect();
        log::debug!("Resolving {} declared types", ids.len());

        // --- Pass 1: DefineType ---
        for &id in &ids {
            if ctx.status(id) == DefinitionStatus::Undefined {
                let _ = define_type(ctx, id);
            }
        }

        // --- Pass 2: Populate ---
        for &id in &ids {
            populate_type(ctx, id);
        }

        // --- Pass 3: Emit ---
        let mut emitted = vec![];
        for &id in &ids {
            if emit_type(ctx, id) {
                emitted.push(id);
            }
        }

        // --- Pass 4: CloseType ---
        // Ids are handed out in declaration order, so a parent always comes
        // before the types nested in it.
        for &id in &emitted {
            let token = type_token(ctx, id);
            log::debug!("Closing {}", ctx.container(id).full_name);
            ctx.metadata.close_type(token);
        }

        let name_of = |id: &ContainerId| ctx.container(*id).full_name.clone();
        let summary = ResolutionSummary {
            defined: ids.iter().filter(|id| ctx.status(**id) == DefinitionStatus::Defined).map(name_of).collect(),
            failed: ids.iter().filter(|id| ctx.status(**id) == DefinitionStatus::Failed).map(name_of).collect(),
            emitted: emitted.iter().map(name_of).collect(),
            closed: emitted.iter().map(name_of).collect(),
            entry_point: ctx.entry_point.map(|m| ctx.registry.member_display(m)),
        };
        log::debug!(
            "Resolution finished: {} defined, {} failed, {} emitted",
            summary.defined.len(),
            summary.failed.len(),
            summary.emitted.len()
        );
        summary
    }
}
