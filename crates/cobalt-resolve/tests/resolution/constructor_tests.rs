use cobalt_resolve::emitter::{BodyKind, FieldInitializer};
use cobalt_resolve::{MemberAttributes, RecordingEmitter};
use cobalt_source::CompilerConfig;
use cobalt_syntax::{BlockId, CompilationUnit, ConstructorDecl, ExprId, FieldDecl, InitializerTarget, MethodDecl, Modifiers, TypeDecl};
use expect_test::expect;

use crate::common::{resolve_types, resolve_with, Outcome};

/// The body request emitted for the only instance constructor of `type_name`.
fn constructor_body(outcome: &Outcome, type_name: &str) -> BodyKind {
    let ty = outcome.type_id(type_name);
    let ctors = outcome.registry.constructors_of(ty);
    assert_eq!(ctors.len(), 1, "{type_name} constructors");
    outcome
        .emitter
        .body_for(ctors[0])
        .map(|b| b.kind.clone())
        .unwrap_or_else(|| panic!("no body emitted for {type_name}"))
}

#[test]
fn classes_without_constructors_get_a_default_one() {
    let outcome = resolve_types(vec![
        TypeDecl::class("Plain"),
        TypeDecl::class("Base").with_modifiers(Modifiers::ABSTRACT),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let plain = outcome.metadata.methods_named("Plain", ".ctor");
    assert!(plain[0].attributes.contains(MemberAttributes::PUBLIC | MemberAttributes::RT_SPECIAL_NAME));
    let base = outcome.metadata.methods_named("Base", ".ctor");
    assert!(base[0].attributes.contains(MemberAttributes::FAMILY));

    match constructor_body(&outcome, "Plain") {
        BodyKind::Synthesized { initializer: Some(call), field_initializers } => {
            assert_eq!(outcome.registry.member_display(call.target), "System.Object..ctor");
            assert!(field_initializers.is_empty());
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn structs_get_no_default_constructor() {
    let outcome = resolve_types(vec![TypeDecl::structure("Point").with_member(FieldDecl::new("int", "x", Modifiers::PUBLIC))]);
    assert!(outcome.metadata.methods_named("Point", ".ctor").is_empty());
}

#[test]
fn instance_field_initializers_run_in_base_calling_constructors() {
    let counter = TypeDecl::class("Counter")
        .with_member(FieldDecl::new("int", "count", Modifiers::PRIVATE).with_initializer(ExprId(1)))
        .with_member(ConstructorDecl::new("Counter", Modifiers::PUBLIC).with_body(BlockId(1)))
        .with_member(
            ConstructorDecl::new("Counter", Modifiers::PUBLIC)
                .with_param("int", "start")
                .with_initializer(InitializerTarget::This, vec![])
                .with_body(BlockId(2)),
        );
    let outcome = resolve_types(vec![counter]);
    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());

    let bodies: Vec<_> = outcome.emitter.bodies.iter().filter(|b| matches!(b.kind, BodyKind::Constructor { .. })).collect();
    assert_eq!(bodies.len(), 2);
    let BodyKind::Constructor { field_initializers, initializer } = &bodies[0].kind else { unreachable!() };
    assert_eq!(field_initializers.len(), 1);
    assert_eq!(field_initializers[0].value, ExprId(1));
    assert_eq!(initializer.as_ref().map(|c| outcome.registry.member_display(c.target)).as_deref(), Some("System.Object..ctor"));

    // `this()` chains to the first constructor, which runs the initializers.
    let BodyKind::Constructor { field_initializers, initializer } = &bodies[1].kind else { unreachable!() };
    assert!(field_initializers.is_empty());
    let target = initializer.as_ref().expect("chained").target;
    assert!(outcome.registry.member(target).parameters.is_empty());
    assert_eq!(outcome.registry.member(target).declaring_type, outcome.type_id("Counter"));
}

#[test]
fn static_field_initializers_get_a_static_constructor() {
    let cache = TypeDecl::class("Cache")
        .with_member(FieldDecl::new("int", "size", Modifiers::STATIC).with_initializer(ExprId(7)))
        .with_member(FieldDecl::new("int", "hits", Modifiers::PRIVATE));
    let outcome = resolve_types(vec![cache]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let cctor = outcome.metadata.methods_named("Cache", ".cctor");
    assert_eq!(cctor.len(), 1);
    assert!(cctor[0].attributes.contains(MemberAttributes::STATIC | MemberAttributes::PRIVATE));

    let synthesized_static = outcome.emitter.bodies.iter().find_map(|b| match &b.kind {
        BodyKind::Synthesized { initializer: None, field_initializers } if b.this_type.is_none() => Some(field_initializers.clone()),
        _ => None,
    });
    let initializers = synthesized_static.expect("static constructor body");
    let size = outcome.registry.member(initializers[0].field);
    assert_eq!(size.name, "size");
    assert_eq!(initializers, vec![FieldInitializer { field: initializers[0].field, value: ExprId(7) }]);
}

#[test]
fn struct_constructor_rules() {
    let point = TypeDecl::structure("Point")
        .with_member(FieldDecl::new("int", "x", Modifiers::PUBLIC).with_initializer(ExprId(1)))
        .with_member(ConstructorDecl::new("Point", Modifiers::PUBLIC).with_body(BlockId(1)));
    let outcome = resolve_types(vec![point]);

    assert_eq!(outcome.codes(), vec![573, 568]);
    expect![["`Point.x': can not have instance field initializers in structs"]].assert_eq(&outcome.messages()[0]);
    expect![["Structs can not contain explicit parameterless constructors"]].assert_eq(&outcome.messages()[1]);
}

#[test]
fn rejected_struct_initializers_never_run() {
    let pt = TypeDecl::structure("Pt")
        .with_member(FieldDecl::new("int", "x", Modifiers::PUBLIC).with_initializer(ExprId(7)))
        .with_member(ConstructorDecl::new("Pt", Modifiers::PUBLIC).with_param("int", "v").with_body(BlockId(1)));
    let outcome = resolve_types(vec![pt]);

    assert_eq!(outcome.codes(), vec![573]);
    match constructor_body(&outcome, "Pt") {
        BodyKind::Constructor { field_initializers, .. } => assert!(field_initializers.is_empty()),
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn static_constructor_rules() {
    let outcome = resolve_types(vec![
        TypeDecl::class("WithArgs").with_member(ConstructorDecl::new("WithArgs", Modifiers::STATIC).with_param("int", "x").with_body(BlockId(1))),
        TypeDecl::class("WithAccess").with_member(ConstructorDecl::new("WithAccess", Modifiers::STATIC | Modifiers::PUBLIC).with_body(BlockId(1))),
    ]);
    assert_eq!(outcome.codes(), vec![132, 515]);
}

#[test]
fn constructors_must_be_named_after_their_type() {
    let outcome = resolve_types(vec![TypeDecl::class("Right").with_member(ConstructorDecl::new("Wrong", Modifiers::PUBLIC).with_body(BlockId(1)))]);
    assert_eq!(outcome.codes(), vec![1520]);
}

#[test]
fn base_constructor_must_accept_the_arguments() {
    let base = TypeDecl::class("Account").with_member(ConstructorDecl::new("Account", Modifiers::PUBLIC).with_param("int", "id").with_body(BlockId(1)));
    let derived = TypeDecl::class("Savings").with_base("Account");
    let outcome = resolve_types(vec![base, derived]);

    assert_eq!(outcome.codes(), vec![1501]);
    expect![["No overload for method `.ctor' takes `0' arguments"]].assert_eq(&outcome.messages()[0]);
    // The type itself is still emitted; only the broken constructor is not.
    assert!(outcome.summary.emitted.contains(&"Savings".to_string()));
}

#[test]
fn base_initializers_pick_by_argument_type() {
    let error = TypeDecl::class("AppError").with_base("System.Exception").with_member(
        ConstructorDecl::new("AppError", Modifiers::PUBLIC)
            .with_param("string", "message")
            .with_initializer(InitializerTarget::Base, vec![ExprId(5)])
            .with_body(BlockId(1)),
    );
    let emitter = RecordingEmitter::new().with_expression_type(ExprId(5), "System.String");
    let unit = CompilationUnit::new("errors.cs").with_type(error);
    let outcome = resolve_with(CompilerConfig::default(), emitter, vec![unit]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let BodyKind::Constructor { initializer: Some(call), .. } = constructor_body(&outcome, "AppError") else {
        panic!("expected a constructor body with an initializer");
    };
    assert_eq!(outcome.registry.member(call.target).parameters, vec![outcome.type_id("System.String")]);
    assert_eq!(call.arguments, vec![ExprId(5)]);
}

#[test]
fn constructors_cannot_chain_to_themselves() {
    let outcome = resolve_types(vec![TypeDecl::class("Loop").with_member(
        ConstructorDecl::new("Loop", Modifiers::PUBLIC).with_initializer(InitializerTarget::This, vec![]).with_body(BlockId(1)),
    )]);

    assert_eq!(outcome.codes(), vec![516]);
    expect![["Constructor `Loop()' can not call itself"]].assert_eq(&outcome.messages()[0]);
    assert!(outcome.emitter.bodies.is_empty());
}

fn finalizers() -> Vec<TypeDecl> {
    let finalize = || MethodDecl::new("void", "Finalize", Modifiers::PROTECTED | Modifiers::OVERRIDE).with_body(BlockId(1));
    vec![
        TypeDecl::class("Resource").with_member(finalize()),
        TypeDecl::class("File").with_base("Resource").with_member(finalize()),
    ]
}

fn finalizer_chain(outcome: &Outcome, type_name: &str) -> Option<String> {
    let ty = outcome.type_id(type_name);
    outcome
        .emitter
        .bodies
        .iter()
        .filter(|b| b.declaring_type == ty)
        .find_map(|b| match b.kind {
            BodyKind::Finalizer { chain_to } => Some(chain_to.map(|m| outcome.registry.member_display(m))),
            _ => None,
        })
        .expect("finalizer body")
}

#[test]
fn finalizers_chain_to_the_base_finalizer() {
    let unit = finalizers().into_iter().fold(CompilationUnit::new("test.cs"), |u, t| u.with_type(t));
    let outcome = resolve_with(CompilerConfig::default(), RecordingEmitter::new(), vec![unit]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(finalizer_chain(&outcome, "Resource"), None);
    assert_eq!(finalizer_chain(&outcome, "File").as_deref(), Some("Resource.Finalize"));
}

#[test]
fn finalizer_chaining_can_be_turned_off() {
    let mut config = CompilerConfig::default();
    config.compiler.chain_base_finalizer = false;
    let unit = finalizers().into_iter().fold(CompilationUnit::new("test.cs"), |u, t| u.with_type(t));
    let outcome = resolve_with(config, RecordingEmitter::new(), vec![unit]);

    assert_eq!(finalizer_chain(&outcome, "File"), None);
}
