use cobalt_resolve::metadata::RecordedMember;
use cobalt_resolve::MemberAttributes;
use cobalt_syntax::{
    AccessorDecl, AttributeUse, AttributeValue, BlockId, CompilationUnit, ConstantDecl, EventDecl, ExprId, FieldDecl,
    IndexerDecl, MethodDecl, Modifiers, PropertyDecl, TypeDecl,
};
use expect_test::expect;

use crate::common::{resolve, resolve_types};

fn body() -> BlockId {
    BlockId(1)
}

#[test]
fn methods_are_defined_with_their_signatures() {
    let calc = TypeDecl::class("Calc")
        .with_modifiers(Modifiers::PUBLIC)
        .with_member(MethodDecl::new("int", "Add", Modifiers::PUBLIC).with_param("int", "a").with_param("int", "b").with_body(body()))
        .with_member(MethodDecl::new("void", "Reset", Modifiers::empty()).with_body(BlockId(2)));
    let outcome = resolve_types(vec![calc]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let int = outcome.type_id("System.Int32");
    let add = outcome.metadata.methods_named("Calc", "Add");
    assert_eq!(add[0].parameters, vec![int, int]);
    assert_eq!(add[0].return_type, int);
    assert!(add[0].attributes.contains(MemberAttributes::PUBLIC | MemberAttributes::HIDE_BY_SIG));

    let reset = outcome.metadata.methods_named("Calc", "Reset");
    assert!(reset[0].attributes.contains(MemberAttributes::PRIVATE));

    let blocks: Vec<Option<BlockId>> = outcome.emitter.bodies.iter().map(|b| b.block).collect();
    assert!(blocks.contains(&Some(BlockId(1))));
    assert!(blocks.contains(&Some(BlockId(2))));
}

#[test]
fn duplicate_signatures_are_rejected() {
    let outcome = resolve_types(vec![TypeDecl::class("Twice")
        .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC).with_body(body()))
        .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC).with_body(body()))
        .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC).with_param("int", "times").with_body(body()))]);

    assert_eq!(outcome.codes(), vec![111]);
    expect![["Class `Twice' already contains a definition with the same return value and parameter types for method `Run'"]]
        .assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.metadata.methods_named("Twice", "Run").len(), 2);
}

#[test]
fn member_names_must_be_unique_across_kinds() {
    let outcome = resolve_types(vec![TypeDecl::class("Box")
        .with_member(FieldDecl::new("int", "Size", Modifiers::PRIVATE))
        .with_member(MethodDecl::new("int", "Size", Modifiers::PUBLIC).with_body(body()))]);

    assert_eq!(outcome.codes(), vec![102]);
    expect![["The container `Box' already contains a definition for `Size'"]].assert_eq(&outcome.messages()[0]);
}

#[test]
fn body_rules_follow_abstract_and_extern() {
    let outcome = resolve_types(vec![TypeDecl::class("Rules")
        .with_modifiers(Modifiers::ABSTRACT)
        .with_member(MethodDecl::new("void", "Missing", Modifiers::PUBLIC))
        .with_member(MethodDecl::new("void", "Both", Modifiers::PUBLIC | Modifiers::ABSTRACT).with_body(body()))
        .with_member(MethodDecl::new("void", "Native", Modifiers::PUBLIC | Modifiers::EXTERN).with_body(body()))
        .with_member(MethodDecl::new("void", "Fine", Modifiers::PUBLIC | Modifiers::ABSTRACT))]);

    assert_eq!(outcome.codes(), vec![501, 500, 179]);
    assert_eq!(outcome.metadata.methods_named("Rules", "Fine").len(), 1);
}

#[test]
fn abstract_members_need_an_abstract_class() {
    let outcome = resolve_types(vec![TypeDecl::class("Concrete")
        .with_member(MethodDecl::new("void", "Draw", Modifiers::PUBLIC | Modifiers::ABSTRACT))]);

    assert_eq!(outcome.codes(), vec![513]);
    expect![["`Concrete.Draw' is abstract but its container class is not"]].assert_eq(&outcome.messages()[0]);
}

#[test]
fn virtual_members_cannot_be_private() {
    let outcome = resolve_types(vec![TypeDecl::class("Hidden")
        .with_member(MethodDecl::new("void", "Hook", Modifiers::VIRTUAL).with_body(body()))]);
    assert_eq!(outcome.codes(), vec![621]);
}

#[test]
fn static_members_cannot_be_virtual() {
    let outcome = resolve_types(vec![TypeDecl::class("Util")
        .with_member(MethodDecl::new("void", "Help", Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::VIRTUAL).with_body(body()))]);
    assert_eq!(outcome.codes(), vec![112]);
}

#[test]
fn override_needs_a_virtual_base_member() {
    let base = TypeDecl::class("Base")
        .with_member(MethodDecl::new("void", "Plain", Modifiers::PUBLIC).with_body(body()))
        .with_member(MethodDecl::new("void", "Hook", Modifiers::PUBLIC | Modifiers::VIRTUAL).with_body(body()));
    let derived = TypeDecl::class("Derived")
        .with_base("Base")
        .with_member(MethodDecl::new("void", "Plain", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(body()))
        .with_member(MethodDecl::new("void", "Hook", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(body()))
        .with_member(MethodDecl::new("void", "Nothing", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(body()));
    let outcome = resolve_types(vec![base, derived]);

    assert_eq!(outcome.codes(), vec![506, 115]);
    let messages = outcome.messages();
    expect![["`Derived.Plain': cannot override inherited member `Base.Plain' because it is not virtual, abstract or override"]]
        .assert_eq(&messages[0]);
    expect![["`Derived.Nothing' no suitable methods found to override"]].assert_eq(&messages[1]);

    let hook = outcome.metadata.methods_named("Derived", "Hook");
    assert!(hook[0].attributes.contains(MemberAttributes::VIRTUAL));
    assert!(!hook[0].attributes.contains(MemberAttributes::NEW_SLOT));
}

#[test]
fn private_base_members_are_not_hidden() {
    let base = TypeDecl::class("Base")
        .with_member(MethodDecl::new("void", "Helper", Modifiers::PRIVATE).with_body(body()));
    let derived = TypeDecl::class("Derived")
        .with_base("Base")
        .with_member(MethodDecl::new("void", "Helper", Modifiers::PUBLIC).with_body(body()));
    let outcome = resolve_types(vec![base, derived]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let helper = outcome.metadata.methods_named("Derived", "Helper");
    assert_eq!(helper.len(), 1);
}

#[test]
fn override_of_a_private_base_member_has_no_target() {
    let base = TypeDecl::class("Base")
        .with_member(MethodDecl::new("void", "Run", Modifiers::PRIVATE).with_body(body()));
    let derived = TypeDecl::class("Derived")
        .with_base("Base")
        .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(body()));
    let outcome = resolve_types(vec![base, derived]);

    assert_eq!(outcome.codes(), vec![115]);
    expect![["`Derived.Run' no suitable methods found to override"]].assert_eq(&outcome.messages()[0]);
    assert!(outcome.metadata.methods_named("Derived", "Run").is_empty());
}

#[test]
fn object_members_can_be_overridden() {
    let outcome = resolve_types(vec![TypeDecl::class("Named")
        .with_member(MethodDecl::new("string", "ToString", Modifiers::PUBLIC | Modifiers::OVERRIDE).with_body(body()))]);
    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
}

#[test]
fn fields_and_constants_are_defined() {
    let config = TypeDecl::class("Config")
        .with_member(FieldDecl::new("int", "count", Modifiers::PRIVATE).with_initializer(ExprId(1)))
        .with_member(FieldDecl::new("string", "name", Modifiers::PUBLIC | Modifiers::READONLY))
        .with_member(ConstantDecl::new("int", "Limit", ExprId(2)));
    let outcome = resolve_types(vec![config]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let fields: Vec<(&str, MemberAttributes)> = outcome
        .metadata
        .members_of("Config")
        .into_iter()
        .filter_map(|m| match m {
            RecordedMember::Field(f) => Some((f.name.as_str(), f.attributes)),
            _ => None,
        })
        .collect();
    let names: Vec<&str> = fields.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, ["Limit", "count", "name"]);
    assert!(fields[0].1.contains(MemberAttributes::LITERAL | MemberAttributes::STATIC));
    assert!(fields[2].1.contains(MemberAttributes::INIT_ONLY | MemberAttributes::PUBLIC));

    assert_eq!(outcome.emitter.constants.len(), 1);
    assert_eq!(outcome.emitter.constants[0].2, ExprId(2));
}

#[test]
fn properties_get_accessor_methods() {
    let shape = TypeDecl::class("Shape")
        .with_member(
            PropertyDecl::new("int", "Width", Modifiers::PUBLIC)
                .with_get(AccessorDecl::with_body(BlockId(1)))
                .with_set(AccessorDecl::with_body(BlockId(2))),
        )
        .with_member(PropertyDecl::new("int", "Broken", Modifiers::PUBLIC));
    let outcome = resolve_types(vec![shape]);

    assert_eq!(outcome.codes(), vec![548]);
    let int = outcome.type_id("System.Int32");
    let void = outcome.type_id("System.Void");

    let getter = outcome.metadata.methods_named("Shape", "get_Width");
    assert_eq!((getter[0].return_type, getter[0].parameters.clone()), (int, vec![]));
    assert!(getter[0].attributes.contains(MemberAttributes::SPECIAL_NAME));
    let setter = outcome.metadata.methods_named("Shape", "set_Width");
    assert_eq!((setter[0].return_type, setter[0].parameters.clone()), (void, vec![int]));

    let property = outcome.metadata.members_of("Shape").into_iter().find_map(|m| match m {
        RecordedMember::Property(p) => Some(p.clone()),
        _ => None,
    });
    let property = property.expect("property recorded");
    assert_eq!(property.name, "Width");
    assert!(property.getter.is_some() && property.setter.is_some());
}

#[test]
fn failed_setter_leaves_no_getter_behind() {
    let sized = TypeDecl::class("Sized")
        .with_member(MethodDecl::new("void", "set_Size", Modifiers::PUBLIC).with_param("int", "value").with_body(body()))
        .with_member(
            PropertyDecl::new("int", "Size", Modifiers::PUBLIC)
                .with_get(AccessorDecl::with_body(BlockId(1)))
                .with_set(AccessorDecl::with_body(BlockId(2))),
        );
    let outcome = resolve_types(vec![sized]);

    assert_eq!(outcome.codes(), vec![111]);
    expect![["Class `Sized' already contains a definition with the same return value and parameter types for the set method of property `Size'"]]
        .assert_eq(&outcome.messages()[0]);
    assert!(outcome.metadata.methods_named("Sized", "get_Size").is_empty());
    assert_eq!(outcome.metadata.methods_named("Sized", "set_Size").len(), 1);
    let properties = outcome
        .metadata
        .members_of("Sized")
        .into_iter()
        .filter(|m| matches!(m, RecordedMember::Property(_)))
        .count();
    assert_eq!(properties, 0);
}

#[test]
fn indexers_are_named_item_and_mark_the_default_member() {
    let list = TypeDecl::class("List").with_member(
        IndexerDecl::new("string", Modifiers::PUBLIC)
            .with_param("int", "index")
            .with_get(AccessorDecl::with_body(body())),
    );
    let outcome = resolve_types(vec![list]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let getter = outcome.metadata.methods_named("List", "get_Item");
    assert_eq!(getter[0].parameters, vec![outcome.type_id("System.Int32")]);

    let token = outcome.metadata.type_named("List").unwrap().token;
    let default_member = outcome
        .metadata
        .attributes_on(token)
        .iter()
        .find(|a| a.type_name == "System.Reflection.DefaultMemberAttribute")
        .expect("DefaultMember applied");
    assert_eq!(default_member.arguments, vec![AttributeValue::String("Item".to_string())]);
}

#[test]
fn indexers_with_the_same_parameters_collide() {
    let list = TypeDecl::class("Table")
        .with_member(IndexerDecl::new("int", Modifiers::PUBLIC).with_param("int", "row").with_get(AccessorDecl::with_body(body())))
        .with_member(IndexerDecl::new("string", Modifiers::PUBLIC).with_param("int", "column").with_get(AccessorDecl::with_body(body())));
    let outcome = resolve_types(vec![list]);
    assert_eq!(outcome.codes(), vec![111]);
}

#[test]
fn field_like_events_get_a_backing_field_and_accessors() {
    let unit = CompilationUnit::new("events.cs")
        .with_type(TypeDecl::delegate("Handler", "void", vec![]))
        .with_type(
            TypeDecl::class("Button")
                .with_member(EventDecl::new("Handler", "Click", Modifiers::PUBLIC))
                .with_member(EventDecl::new("int", "Broken", Modifiers::PUBLIC)),
        );
    let outcome = resolve(vec![unit]);

    assert_eq!(outcome.codes(), vec![66]);
    expect![["`Button.Broken': event must be of a delegate type"]].assert_eq(&outcome.messages()[0]);

    let handler = outcome.type_id("Handler");
    let add = outcome.metadata.methods_named("Button", "add_Click");
    assert_eq!(add[0].parameters, vec![handler]);
    assert_eq!(outcome.metadata.methods_named("Button", "remove_Click").len(), 1);

    let members = outcome.metadata.members_of("Button");
    let backing = members.iter().find_map(|m| match m {
        RecordedMember::Field(f) if f.name == "Click" => Some(f.attributes),
        _ => None,
    });
    assert_eq!(backing.map(|a| a.contains(MemberAttributes::PRIVATE)), Some(true));
    assert!(members.iter().any(|m| matches!(m, RecordedMember::Event(e) if e.name == "Click" && e.add.is_some())));
}

#[test]
fn platform_delegates_can_type_events() {
    let unit = CompilationUnit::new("events.cs").with_using("System").with_type(
        TypeDecl::class("Timer").with_member(EventDecl::new("EventHandler", "Tick", Modifiers::PUBLIC | Modifiers::STATIC)),
    );
    let outcome = resolve(vec![unit]);
    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    let add = outcome.metadata.methods_named("Timer", "add_Tick");
    assert!(add[0].attributes.contains(MemberAttributes::STATIC));
}

#[test]
fn main_becomes_the_entry_point() {
    let outcome = resolve_types(vec![TypeDecl::class("Program")
        .with_member(MethodDecl::new("void", "Main", Modifiers::STATIC).with_body(body()))
        .with_member(MethodDecl::new("void", "Main", Modifiers::PUBLIC).with_param("int", "unused").with_body(body()))]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    assert_eq!(outcome.summary.entry_point.as_deref(), Some("Program.Main"));
}

#[test]
fn a_second_static_main_is_rejected() {
    let outcome = resolve_types(vec![
        TypeDecl::class("First").with_member(MethodDecl::new("void", "Main", Modifiers::STATIC).with_body(body())),
        TypeDecl::class("Second").with_member(MethodDecl::new("int", "Main", Modifiers::STATIC).with_body(body())),
    ]);

    assert_eq!(outcome.codes(), vec![17]);
    expect![["Program `test.cs' has more than one entry point defined: `Second.Main'"]].assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.summary.entry_point.as_deref(), Some("First.Main"));
}

#[test]
fn attributes_are_checked_against_their_targets() {
    let unit = CompilationUnit::new("attrs.cs").with_using("System").with_type(
        TypeDecl::class("Legacy")
            .with_attribute(AttributeUse::new("Serializable"))
            .with_attribute(AttributeUse::new("Obsolete").with_argument(AttributeValue::String("use Modern".into())))
            .with_member(MethodDecl::new("void", "Run", Modifiers::PUBLIC).with_attribute(AttributeUse::new("Serializable")).with_body(body())),
    );
    let outcome = resolve(vec![unit]);

    assert_eq!(outcome.codes(), vec![592]);
    expect![["Attribute `Serializable' is not valid on this declaration type"]].assert_eq(&outcome.messages()[0]);

    let token = outcome.metadata.type_named("Legacy").unwrap().token;
    let applied: Vec<&str> = outcome.metadata.attributes_on(token).iter().map(|a| a.type_name.as_str()).collect();
    assert_eq!(applied, ["System.SerializableAttribute", "System.ObsoleteAttribute"]);
}

#[test]
fn unknown_attributes_and_non_attributes_are_reported() {
    let unit = CompilationUnit::new("attrs.cs").with_type(
        TypeDecl::class("Odd")
            .with_attribute(AttributeUse::new("Nowhere"))
            .with_attribute(AttributeUse::new("System.String")),
    );
    let outcome = resolve(vec![unit]);
    assert_eq!(outcome.codes(), vec![246, 616]);
}

#[test]
fn duplicate_single_use_attributes_are_reported() {
    let unit = CompilationUnit::new("attrs.cs").with_using("System").with_type(
        TypeDecl::class("Twice")
            .with_attribute(AttributeUse::new("Serializable"))
            .with_attribute(AttributeUse::new("SerializableAttribute")),
    );
    let outcome = resolve(vec![unit]);
    assert_eq!(outcome.codes(), vec![579]);
}

#[test]
fn dll_import_marks_a_pinvoke_method() {
    let native = MethodDecl::new("int", "GetTickCount", Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::EXTERN)
        .with_attribute(AttributeUse::new("DllImport").with_argument(AttributeValue::String("kernel32".into())));
    let bad = MethodDecl::new("int", "Managed", Modifiers::PUBLIC)
        .with_attribute(AttributeUse::new("DllImport").with_argument(AttributeValue::String("kernel32".into())))
        .with_body(body());
    let unit = CompilationUnit::new("native.cs")
        .with_using("System.Runtime.InteropServices")
        .with_type(TypeDecl::class("Native").with_member(native).with_member(bad));
    let outcome = resolve(vec![unit]);

    assert_eq!(outcome.codes(), vec![601]);
    let method = outcome.metadata.methods_named("Native", "GetTickCount");
    assert!(method[0].attributes.contains(MemberAttributes::PINVOKE_IMPL));
    assert_eq!(method[0].pinvoke.as_ref().map(|p| p.library.as_str()), Some("kernel32"));
    // Only the synthesized constructor has a body to compile.
    assert_eq!(outcome.emitter.bodies.len(), 1);
}
