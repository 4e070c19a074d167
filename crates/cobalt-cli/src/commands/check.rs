use std::path::{Path, PathBuf};

use cobalt_resolve::{
    CompilationContext, InMemoryMetadata, LiteralAttributeResolver, RecordedMember, RecordingEmitter, ResolutionSummary,
    Resolver,
};
use cobalt_source::DiagnosticBag;
use cobalt_syntax::load_manifest;

use crate::error::CliError;
use crate::utils::load_config;

/// Resolves every declaration in `manifests` as one program.
///
/// Diagnostics go to stderr through miette; the summary goes to stdout.
/// Returns `CliError::ResolutionFailed` when any error was reported.
pub fn handle_check(manifests: &[PathBuf], config: Option<&Path>, show_members: bool) -> Result<(), CliError> {
    let first = manifests.first().ok_or(CliError::NoInput)?;
    let config = load_config(config, first)?;
    let units = manifests
        .iter()
        .map(|path| load_manifest(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut diagnostics = DiagnosticBag::from_config(&config);
    let mut metadata = InMemoryMetadata::new();
    let mut emitter = RecordingEmitter::new();
    let mut attributes = LiteralAttributeResolver;
    let summary = {
        let mut ctx = CompilationContext::new(config, &mut diagnostics, &mut metadata, &mut emitter, &mut attributes);
        let mut resolver = Resolver::new(&mut ctx);
        resolver.declare(units);
        resolver.run()
    };

    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{:?}", miette::Report::new(diagnostic.clone()));
    }

    print_summary(&summary, &emitter);
    if show_members {
        print_members(&metadata);
    }

    if diagnostics.has_errors() {
        return Err(CliError::ResolutionFailed {
            errors: diagnostics.error_count(),
            warnings: diagnostics.warning_count(),
        });
    }
    println!("Checked {} manifest(s), {} warning(s).", manifests.len(), diagnostics.warning_count());
    Ok(())
}

fn print_summary(summary: &ResolutionSummary, emitter: &RecordingEmitter) {
    println!(
        "Resolved {} type(s): {} defined, {} failed, {} emitted",
        summary.defined.len() + summary.failed.len(),
        summary.defined.len(),
        summary.failed.len(),
        summary.emitted.len()
    );
    for name in &summary.failed {
        println!("  failed: {name}");
    }
    println!("Body requests: {}, constants: {}", emitter.bodies.len(), emitter.constants.len());
    if let Some(entry) = &summary.entry_point {
        println!("Entry point: {entry}");
    }
}

fn print_members(metadata: &InMemoryMetadata) {
    for ty in metadata.types() {
        let state = if ty.closed { "" } else { " (open)" };
        println!("{} [{:?}]{}", ty.definition.full_name, ty.definition.attributes, state);
        for member in metadata.members_of(&ty.definition.full_name) {
            println!("    {}", describe(member));
        }
    }
}

fn describe(member: &RecordedMember) -> String {
    match member {
        RecordedMember::Method(m) => format!("method {}({} params) [{:?}]", m.name, m.parameters.len(), m.attributes),
        RecordedMember::Constructor(m) => format!("ctor {}({} params) [{:?}]", m.name, m.parameters.len(), m.attributes),
        RecordedMember::Field(f) => format!("field {} [{:?}]", f.name, f.attributes),
        RecordedMember::Property(p) => format!("property {}", p.name),
        RecordedMember::Event(e) => format!("event {}", e.name),
    }
}
