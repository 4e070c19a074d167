use cobalt_resolve::RecordingEmitter;
use cobalt_source::{CompilerConfig, Location};
use cobalt_syntax::{BlockId, CompilationUnit, MethodDecl, Modifiers, TypeDecl};
use expect_test::expect;

use crate::common::{resolve_types, resolve_with, Outcome};

/// A base class plus a derived class whose members hide, shadow and
/// needlessly `new` what the base declares.
fn hiding_program() -> Vec<TypeDecl> {
    let base = TypeDecl::class("Widget")
        .with_member(MethodDecl::new("void", "Draw", Modifiers::PUBLIC).with_body(BlockId(1)))
        .with_member(MethodDecl::new("void", "Layout", Modifiers::PUBLIC | Modifiers::VIRTUAL).with_body(BlockId(2)));
    let derived = TypeDecl::class("Button")
        .with_base("Widget")
        .with_member(MethodDecl::new("void", "Draw", Modifiers::PUBLIC).with_body(BlockId(3)).at(Location::at_line(10)))
        .with_member(MethodDecl::new("void", "Layout", Modifiers::PUBLIC).with_body(BlockId(4)).at(Location::at_line(11)))
        .with_member(MethodDecl::new("void", "Click", Modifiers::PUBLIC | Modifiers::NEW).with_body(BlockId(5)).at(Location::at_line(12)));
    vec![base, derived]
}

fn resolve_config(config: CompilerConfig, types: Vec<TypeDecl>) -> Outcome {
    let unit = types.into_iter().fold(CompilationUnit::new("widgets.cs"), |u, t| u.with_type(t));
    resolve_with(config, RecordingEmitter::new(), vec![unit])
}

fn with_level(level: u8) -> CompilerConfig {
    let mut config = CompilerConfig::default();
    config.diagnostics.warning_level = level;
    config
}

#[test]
fn hiding_warnings_at_the_default_level() {
    let outcome = resolve_types(hiding_program());

    assert_eq!(outcome.codes(), vec![108, 114, 109]);
    assert!(!outcome.diagnostics.has_errors());
    assert_eq!(outcome.diagnostics.warning_count(), 3);

    let rendered: Vec<String> = outcome.diagnostics.diagnostics().iter().map(ToString::to_string).collect();
    expect![[r#"
        (10) warning CS0108: The keyword new is required on `Button.Draw' because it hides `Widget.Draw'
        (11) warning CS0114: `Button.Layout' hides inherited member `Widget.Layout'.  To make the current member override that implementation, add the override keyword, otherwise use the new keyword
        (12) warning CS0109: The member `Button.Click' does not hide an inherited member.  The keyword new is not required"#]]
    .assert_eq(&rendered.join("\n"));

    // Hiding members are still defined.
    assert_eq!(outcome.metadata.methods_named("Button", "Draw").len(), 1);
    assert_eq!(outcome.summary.emitted, vec!["Widget".to_string(), "Button".to_string()]);
}

#[test]
fn warning_level_filters_by_severity() {
    let outcome = resolve_config(with_level(3), hiding_program());
    assert_eq!(outcome.codes(), vec![108, 114]);

    let outcome = resolve_config(with_level(1), hiding_program());
    assert!(outcome.codes().is_empty());
}

#[test]
fn warnings_can_be_promoted_to_errors() {
    let mut config = CompilerConfig::default();
    config.diagnostics.warnings_as_errors = true;
    let outcome = resolve_config(config, hiding_program());

    assert_eq!(outcome.diagnostics.error_count(), 3);
    assert!(outcome.diagnostics.diagnostics().iter().all(|d| d.is_error()));
}

#[test]
fn suppressed_warnings_are_dropped() {
    let config = CompilerConfig::from_toml_str(
        r#"
        [diagnostics]
        suppress = [108, 109]
        "#,
    )
    .unwrap();
    let outcome = resolve_config(config, hiding_program());
    assert_eq!(outcome.codes(), vec![114]);
}

#[test]
fn new_silences_hiding_warnings() {
    let base = TypeDecl::class("Widget").with_member(MethodDecl::new("void", "Draw", Modifiers::PUBLIC).with_body(BlockId(1)));
    let derived = TypeDecl::class("Label")
        .with_base("Widget")
        .with_member(MethodDecl::new("void", "Draw", Modifiers::PUBLIC | Modifiers::NEW).with_body(BlockId(2)));
    let outcome = resolve_types(vec![base, derived]);
    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
}

#[test]
fn errors_carry_their_declaration_location() {
    let outcome = resolve_types(vec![TypeDecl::class("Orphan").with_base("Missing").at(Location::at_line(7))]);

    let diagnostic = &outcome.diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.location.line, 7);
    expect![["(7) error CS0246: Can not find type `Missing'"]].assert_eq(&diagnostic.to_string());
}

#[test]
fn types_from_several_units_see_each_other() {
    let shapes = CompilationUnit::new("shapes.cs").with_type(TypeDecl::class("Square").with_base("Shape"));
    let base = CompilationUnit::new("base.cs").with_type(TypeDecl::class("Shape").with_modifiers(Modifiers::ABSTRACT));
    let program = CompilationUnit::new("main.cs").with_type(
        TypeDecl::class("Program")
            .with_member(MethodDecl::new("void", "Main", Modifiers::STATIC).with_body(BlockId(1)))
            .with_member(MethodDecl::new("int", "Main", Modifiers::STATIC).with_param("string[]", "args").with_body(BlockId(2))),
    );
    let outcome = resolve_with(CompilerConfig::default(), RecordingEmitter::new(), vec![shapes, base, program]);

    assert_eq!(outcome.codes(), vec![17]);
    expect![["Program `shapes.cs' has more than one entry point defined: `Program.Main'"]].assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.base_of("Square").as_deref(), Some("Shape"));

    let string_array = outcome.registry.lookup("System.String[]");
    assert!(string_array.is_some());
}

#[test]
fn a_clean_program_closes_every_type() {
    let outcome = resolve_types(vec![
        TypeDecl::interface("IRun").with_member(MethodDecl::new("void", "Run", Modifiers::empty())),
        TypeDecl::class("Runner")
            .with_base("IRun")
            .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC).with_body(BlockId(1)))
            .with_member(TypeDecl::structure("State")),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let expected = vec!["IRun".to_string(), "Runner".to_string(), "Runner.State".to_string()];
    assert_eq!(outcome.summary.closed, expected);
    let closed: Vec<bool> = outcome.metadata.types().iter().map(|t| t.closed).collect();
    assert_eq!(closed, vec![true; 3]);
    assert_eq!(outcome.metadata.close_order().len(), 3);
}
