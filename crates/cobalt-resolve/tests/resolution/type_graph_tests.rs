use cobalt_syntax::{CompilationUnit, Modifiers, NamespaceDecl, Parameter, TypeDecl};
use expect_test::expect;

use crate::common::{resolve, resolve_types};

#[test]
fn implicit_bases_follow_the_kind_of_type() {
    let outcome = resolve_types(vec![
        TypeDecl::class("Shape"),
        TypeDecl::structure("Point"),
        TypeDecl::interface("IDrawable"),
        TypeDecl::enumeration("Color").with_enum_member("Red").with_enum_member("Green"),
        TypeDecl::delegate("Callback", "void", vec![Parameter::new("int", "code")]),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Shape").as_deref(), Some("System.Object"));
    assert_eq!(outcome.base_of("Point").as_deref(), Some("System.ValueType"));
    assert_eq!(outcome.base_of("IDrawable"), None);
    assert_eq!(outcome.base_of("Color").as_deref(), Some("System.Enum"));
    assert_eq!(outcome.base_of("Callback").as_deref(), Some("System.MulticastDelegate"));
    assert_eq!(outcome.summary.defined.len(), 5);
}

#[test]
fn enum_and_delegate_members_are_generated() {
    let outcome = resolve_types(vec![
        TypeDecl::enumeration("Color").with_enum_member("Red").with_enum_member("Green"),
        TypeDecl::delegate("Callback", "void", vec![Parameter::new("int", "code")]),
    ]);

    let names: Vec<&str> = outcome.metadata.members_of("Color").iter().map(|m| m.name()).collect();
    assert_eq!(names, ["value__", "Red", "Green"]);

    let invoke = outcome.metadata.methods_named("Callback", "Invoke");
    assert_eq!(invoke.len(), 1);
    assert_eq!(invoke[0].parameters, vec![outcome.type_id("System.Int32")]);
    assert_eq!(outcome.metadata.methods_named("Callback", ".ctor").len(), 1);
}

#[test]
fn enum_underlying_type_must_be_integral() {
    let mut decl = TypeDecl::enumeration("Flags").with_enum_member("None");
    decl.underlying = Some("string".to_string());
    let outcome = resolve_types(vec![decl]);

    assert_eq!(outcome.codes(), vec![1008]);
    assert_eq!(outcome.summary.failed, vec!["Flags".to_string()]);
}

#[test]
fn circular_base_lists_report_once() {
    let outcome = resolve_types(vec![
        TypeDecl::class("A").with_base("B"),
        TypeDecl::class("B").with_base("A"),
    ]);

    assert_eq!(outcome.codes(), vec![146]);
    expect![["Class definition is circular: `A'"]].assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.summary.failed, vec!["A".to_string(), "B".to_string()]);
    assert!(outcome.summary.emitted.is_empty());
}

#[test]
fn self_derivation_is_circular() {
    let outcome = resolve_types(vec![TypeDecl::class("Loop").with_base("Loop")]);
    assert_eq!(outcome.codes(), vec![146]);
}

#[test]
fn types_depending_on_a_failed_type_fail_silently() {
    let outcome = resolve_types(vec![
        TypeDecl::class("Derived").with_base("Middle"),
        TypeDecl::class("Middle").with_base("Missing"),
    ]);

    assert_eq!(outcome.codes(), vec![246]);
    expect![["Can not find type `Missing'"]].assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.summary.failed.len(), 2);
}

#[test]
fn bases_are_defined_on_demand() {
    // `Derived` comes first, so defining it has to define `Base` on the way.
    let outcome = resolve_types(vec![
        TypeDecl::class("Derived").with_base("Base"),
        TypeDecl::class("Base").with_modifiers(Modifiers::ABSTRACT),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Derived").as_deref(), Some("Base"));
    // The registry hands out handles in definition order.
    assert!(outcome.type_id("Base") < outcome.type_id("Derived"));
}

#[test]
fn sealed_and_value_types_cannot_be_derived_from() {
    let outcome = resolve_types(vec![
        TypeDecl::class("Text").with_base("string"),
        TypeDecl::class("Number").with_base("int"),
    ]);

    assert_eq!(outcome.codes(), vec![509, 509]);
    let messages = outcome.messages();
    expect![["class `Text': Cannot inherit from sealed class `System.String'"]].assert_eq(&messages[0]);
    expect![["class `Number': Cannot inherit from sealed class `System.Int32' (value types are implicitly sealed)"]]
        .assert_eq(&messages[1]);
}

#[test]
fn only_the_first_base_may_be_a_class() {
    let outcome = resolve_types(vec![
        TypeDecl::class("Error").with_base("object").with_base("System.Exception"),
        TypeDecl::structure("Pair").with_base("object"),
    ]);

    assert_eq!(outcome.codes(), vec![527, 527]);
    let messages = outcome.messages();
    expect![["In Class `Error', type `System.Exception' is not an interface"]].assert_eq(&messages[0]);
    expect![["In Struct `Pair', type `System.Object' is not an interface"]].assert_eq(&messages[1]);
}

#[test]
fn interfaces_are_collected_transitively() {
    let outcome = resolve_types(vec![
        TypeDecl::interface("IReadable"),
        TypeDecl::interface("IStream").with_base("IReadable"),
        TypeDecl::class("File").with_base("IStream"),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let file = outcome.type_id("File");
    let interfaces = &outcome.registry.get(file).interfaces;
    assert_eq!(interfaces, &vec![outcome.type_id("IStream"), outcome.type_id("IReadable")]);
    assert_eq!(outcome.base_of("File").as_deref(), Some("System.Object"));
}

#[test]
fn nested_types_may_derive_from_their_container() {
    let outer = TypeDecl::class("Outer").with_member(TypeDecl::class("Inner").with_base("Outer"));
    let outcome = resolve_types(vec![outer]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Outer.Inner").as_deref(), Some("Outer"));
    assert_eq!(outcome.summary.closed, vec!["Outer".to_string(), "Outer.Inner".to_string()]);

    let inner = outcome.metadata.type_named("Outer.Inner").unwrap();
    let outer = outcome.metadata.type_named("Outer").unwrap();
    assert_eq!(inner.definition.enclosing, Some(outer.token));
}

#[test]
fn nested_types_shadow_outer_names() {
    let outer = TypeDecl::class("Outer")
        .with_member(TypeDecl::class("Node"))
        .with_member(TypeDecl::class("Leaf").with_base("Node"));
    let outcome = resolve_types(vec![TypeDecl::class("Node"), outer]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Outer.Leaf").as_deref(), Some("Outer.Node"));
}

#[test]
fn names_resolve_through_namespace_then_global_then_usings() {
    let unit = CompilationUnit::new("shapes.cs")
        .with_type(TypeDecl::class("Widget"))
        .with_namespace(
            NamespaceDecl::new("Drawing")
                .with_type(TypeDecl::class("Widget"))
                .with_type(TypeDecl::class("Helper"))
                .with_type(TypeDecl::class("Button").with_base("Widget")),
        )
        .with_namespace(
            NamespaceDecl::new("App")
                .with_using("Drawing")
                .with_type(TypeDecl::class("Window").with_base("Widget"))
                .with_type(TypeDecl::class("Tool").with_base("Helper")),
        );
    let outcome = resolve(vec![unit]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Drawing.Button").as_deref(), Some("Drawing.Widget"));
    // The global `Widget` is found before anything a `using` brings in.
    assert_eq!(outcome.base_of("App.Window").as_deref(), Some("Widget"));
    assert_eq!(outcome.base_of("App.Tool").as_deref(), Some("Drawing.Helper"));
}

#[test]
fn enclosing_namespace_wins_over_global_and_usings() {
    let unit = CompilationUnit::new("layers.cs")
        .with_type(TypeDecl::class("Widget"))
        .with_namespace(NamespaceDecl::new("Extra").with_type(TypeDecl::class("Widget")))
        .with_namespace(
            NamespaceDecl::new("Drawing")
                .with_using("Extra")
                .with_type(TypeDecl::class("Widget"))
                .with_type(TypeDecl::class("Button").with_base("Widget")),
        );
    let outcome = resolve(vec![unit]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("Drawing.Button").as_deref(), Some("Drawing.Widget"));
}

#[test]
fn aliases_name_types_in_other_namespaces() {
    let unit = CompilationUnit::new("alias.cs").with_namespace(
        NamespaceDecl::new("App")
            .with_alias("Failure", "System.Exception")
            .with_type(TypeDecl::class("AppError").with_base("Failure")),
    );
    let outcome = resolve(vec![unit]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.base_of("App.AppError").as_deref(), Some("System.Exception"));
}

#[test]
fn duplicate_type_names_are_rejected() {
    let outcome = resolve_types(vec![TypeDecl::class("Twice"), TypeDecl::structure("Twice")]);
    assert_eq!(outcome.codes(), vec![101]);
}

#[test]
fn struct_without_instance_fields_gets_a_class_size() {
    let outcome = resolve_types(vec![TypeDecl::structure("Empty")]);
    let recorded = outcome.metadata.type_named("Empty").unwrap();
    assert_eq!(recorded.definition.class_size, Some(1));
}
