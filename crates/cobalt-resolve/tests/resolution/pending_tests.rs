use cobalt_resolve::MemberAttributes;
use cobalt_syntax::{AccessorDecl, BlockId, CompilationUnit, MethodDecl, Modifiers, PropertyDecl, TypeDecl};
use expect_test::expect;

use crate::common::{resolve, resolve_types};

fn area() -> MethodDecl {
    MethodDecl::new("double", "Area", Modifiers::empty())
}

fn shape_interface() -> TypeDecl {
    TypeDecl::interface("IShape").with_member(area())
}

#[test]
fn missing_interface_members_are_reported() {
    let outcome = resolve_types(vec![shape_interface(), TypeDecl::class("Circle").with_base("IShape")]);

    assert_eq!(outcome.codes(), vec![536]);
    expect![["`Circle' does not implement interface member `IShape.Area'"]].assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.summary.emitted, vec!["IShape".to_string()]);
    assert!(!outcome.summary.closed.contains(&"Circle".to_string()));
}

#[test]
fn private_implementations_get_a_hint() {
    let circle = TypeDecl::class("Circle")
        .with_base("IShape")
        .with_member(MethodDecl::new("double", "Area", Modifiers::empty()).with_body(BlockId(1)));
    let outcome = resolve_types(vec![shape_interface(), circle]);

    assert_eq!(outcome.codes(), vec![536]);
    expect![["`Circle' does not implement interface member `IShape.Area'.  (method might be private or static)"]]
        .assert_eq(&outcome.messages()[0]);
}

#[test]
fn public_methods_implement_interface_members() {
    let circle = TypeDecl::class("Circle")
        .with_base("IShape")
        .with_member(MethodDecl::new("double", "Area", Modifiers::PUBLIC).with_body(BlockId(1)));
    let outcome = resolve_types(vec![shape_interface(), circle]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let method = outcome.metadata.methods_named("Circle", "Area");
    let expected = MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT | MemberAttributes::FINAL;
    assert!(method[0].attributes.contains(expected));

    let circle = outcome.metadata.type_named("Circle").unwrap();
    assert_eq!(circle.overrides.len(), 1);
    assert_eq!(outcome.summary.closed, vec!["IShape".to_string(), "Circle".to_string()]);
}

#[test]
fn interface_implementations_get_final_slots_unless_abstract() {
    let circle = TypeDecl::class("Circle")
        .with_base("IShape")
        .with_member(MethodDecl::new("double", "Area", Modifiers::PUBLIC | Modifiers::VIRTUAL).with_body(BlockId(1)));
    let ring = TypeDecl::class("Ring")
        .with_base("Circle")
        .with_member(MethodDecl::new("double", "Area", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(BlockId(2)));
    let blob = TypeDecl::class("Blob")
        .with_modifiers(Modifiers::ABSTRACT)
        .with_base("IShape")
        .with_member(MethodDecl::new("double", "Area", Modifiers::PUBLIC | Modifiers::ABSTRACT));
    let outcome = resolve_types(vec![shape_interface(), circle, ring, blob]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let slot = MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT | MemberAttributes::HIDE_BY_SIG;
    let circle = outcome.metadata.methods_named("Circle", "Area");
    assert!(circle[0].attributes.contains(slot | MemberAttributes::FINAL));
    let blob = outcome.metadata.methods_named("Blob", "Area");
    assert!(blob[0].attributes.contains(slot | MemberAttributes::ABSTRACT));
    assert!(!blob[0].attributes.contains(MemberAttributes::FINAL));
}

#[test]
fn base_class_methods_satisfy_interfaces() {
    let base = TypeDecl::class("Figure")
        .with_member(MethodDecl::new("double", "Area", Modifiers::PUBLIC).with_body(BlockId(1)));
    let square = TypeDecl::class("Square").with_base("Figure").with_base("IShape");
    let outcome = resolve_types(vec![shape_interface(), base, square]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
}

#[test]
fn explicit_implementations_fill_their_own_interface() {
    let printer = TypeDecl::interface("IPrinter").with_member(MethodDecl::new("void", "Print", Modifiers::empty()));
    let logger = TypeDecl::interface("ILogger").with_member(MethodDecl::new("void", "Print", Modifiers::empty()));
    let device = TypeDecl::class("Device")
        .with_base("IPrinter")
        .with_base("ILogger")
        .with_member(MethodDecl::new("void", "IPrinter.Print", Modifiers::empty()).with_body(BlockId(1)))
        .with_member(MethodDecl::new("void", "Print", Modifiers::PUBLIC).with_body(BlockId(2)));
    let outcome = resolve_types(vec![printer, logger, device]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let explicit = outcome.metadata.methods_named("Device", "IPrinter.Print");
    assert_eq!(explicit.len(), 1);
    let expected = MemberAttributes::PRIVATE | MemberAttributes::VIRTUAL | MemberAttributes::NEW_SLOT | MemberAttributes::FINAL;
    assert!(explicit[0].attributes.contains(expected));
    assert_eq!(outcome.metadata.type_named("Device").unwrap().overrides.len(), 2);
}

#[test]
fn explicit_implementation_errors() {
    let printer = TypeDecl::interface("IPrinter").with_member(MethodDecl::new("void", "Print", Modifiers::empty()));
    let other = TypeDecl::interface("IOther");
    let device = TypeDecl::class("Device")
        .with_base("IPrinter")
        .with_member(MethodDecl::new("void", "IPrinter.Print", Modifiers::empty()).with_body(BlockId(1)))
        .with_member(MethodDecl::new("void", "IPrinter.Scan", Modifiers::empty()).with_body(BlockId(2)))
        .with_member(MethodDecl::new("void", "IOther.Print", Modifiers::empty()).with_body(BlockId(3)))
        .with_member(MethodDecl::new("void", "IPrinter.Reset", Modifiers::PUBLIC).with_body(BlockId(4)));
    let outcome = resolve_types(vec![printer, other, device]);

    assert_eq!(outcome.codes(), vec![539, 540, 106]);
    let messages = outcome.messages();
    expect![["`IPrinter.Scan' in explicit interface declaration is not a member of interface"]].assert_eq(&messages[0]);
    expect![["`Device.Print': containing class does not implement interface `IOther'"]].assert_eq(&messages[1]);
}

#[test]
fn interface_properties_are_implemented_through_accessors() {
    let sized = TypeDecl::interface("ISized").with_member(PropertyDecl::new("int", "Size", Modifiers::empty()).with_get(AccessorDecl::declared()));
    let good = TypeDecl::class("Good")
        .with_base("ISized")
        .with_member(PropertyDecl::new("int", "Size", Modifiers::PUBLIC).with_get(AccessorDecl::with_body(BlockId(1))));
    let bad = TypeDecl::class("Bad").with_base("ISized");
    let outcome = resolve_types(vec![sized, good, bad]);

    assert_eq!(outcome.codes(), vec![536]);
    expect![["`Bad' does not implement interface member `ISized.get_Size'"]].assert_eq(&outcome.messages()[0]);
}

#[test]
fn platform_interfaces_are_pending_too() {
    let unit = CompilationUnit::new("dispose.cs").with_using("System").with_type(
        TypeDecl::class("Handle")
            .with_base("IDisposable")
            .with_member(MethodDecl::new("void", "Dispose", Modifiers::PUBLIC).with_body(BlockId(1))),
    ).with_type(TypeDecl::class("Leak").with_base("IDisposable"));
    let outcome = resolve(vec![unit]);

    assert_eq!(outcome.codes(), vec![536]);
    expect![["`Leak' does not implement interface member `System.IDisposable.Dispose'"]].assert_eq(&outcome.messages()[0]);
}

fn abstract_base() -> TypeDecl {
    TypeDecl::class("Animal")
        .with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
        .with_member(MethodDecl::new("string", "Speak", Modifiers::PUBLIC | Modifiers::ABSTRACT))
}

#[test]
fn abstract_members_must_be_overridden() {
    let dog = TypeDecl::class("Dog")
        .with_base("Animal")
        .with_member(MethodDecl::new("string", "Speak", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(BlockId(1)));
    let rock = TypeDecl::class("Rock").with_base("Animal");
    let outcome = resolve_types(vec![abstract_base(), dog, rock]);

    assert_eq!(outcome.codes(), vec![534]);
    expect![["`Rock' does not implement inherited abstract member `Animal.Speak'"]].assert_eq(&outcome.messages()[0]);
}

#[test]
fn abstract_classes_may_leave_members_open() {
    let pet = TypeDecl::class("Pet").with_base("Animal").with_modifiers(Modifiers::ABSTRACT);
    let cat = TypeDecl::class("Cat")
        .with_base("Pet")
        .with_member(MethodDecl::new("string", "Speak", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(BlockId(1)));
    let fish = TypeDecl::class("Fish").with_base("Pet");
    let outcome = resolve_types(vec![abstract_base(), pet, cat, fish]);

    assert_eq!(outcome.codes(), vec![534]);
    expect![["`Fish' does not implement inherited abstract member `Animal.Speak'"]].assert_eq(&outcome.messages()[0]);
}

#[test]
fn non_public_overrides_still_close_abstract_members() {
    let base = TypeDecl::class("Job")
        .with_modifiers(Modifiers::ABSTRACT)
        .with_member(MethodDecl::new("void", "Step", Modifiers::PROTECTED | Modifiers::ABSTRACT));
    let job = TypeDecl::class("Backup")
        .with_base("Job")
        .with_member(MethodDecl::new("void", "Step", Modifiers::PROTECTED | Modifiers::OVERRIDE).with_body(BlockId(1)));
    let outcome = resolve_types(vec![base, job]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
}
