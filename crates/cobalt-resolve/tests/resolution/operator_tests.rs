use cobalt_resolve::MemberAttributes;
use cobalt_syntax::{BlockId, Modifiers, OperatorDecl, OperatorKind, TypeDecl};
use expect_test::expect;

use crate::common::{resolve_types, Outcome};

fn money(operators: Vec<OperatorDecl>) -> TypeDecl {
    operators
        .into_iter()
        .fold(TypeDecl::structure("Money").with_modifiers(Modifiers::PUBLIC), |decl, op| {
            decl.with_member(op.with_body(BlockId(1)))
        })
}

fn resolve_money(operators: Vec<OperatorDecl>) -> Outcome {
    resolve_types(vec![
        TypeDecl::interface("IAmount"),
        TypeDecl::class("Coin"),
        TypeDecl::class("GoldCoin").with_base("Coin"),
        money(operators),
    ])
}

#[test]
fn operators_become_special_static_methods() {
    let outcome = resolve_money(vec![
        OperatorDecl::binary(OperatorKind::Addition, "Money", "Money", "Money"),
        OperatorDecl::binary(OperatorKind::Multiply, "Money", "Money", "int"),
        OperatorDecl::unary(OperatorKind::UnaryNegation, "Money", "Money"),
        OperatorDecl::unary(OperatorKind::True, "bool", "Money"),
        OperatorDecl::unary(OperatorKind::Implicit, "long", "Money"),
    ]);

    assert!(outcome.codes().is_empty(), "{:?}", outcome.messages());
    for name in ["op_Addition", "op_Multiply", "op_UnaryNegation", "op_True", "op_Implicit"] {
        let methods = outcome.metadata.methods_named("Money", name);
        assert_eq!(methods.len(), 1, "{name}");
        assert!(methods[0]
            .attributes
            .contains(MemberAttributes::PUBLIC | MemberAttributes::STATIC | MemberAttributes::SPECIAL_NAME));
    }
}

#[test]
fn binary_operators_need_the_declaring_type() {
    let outcome = resolve_money(vec![OperatorDecl::binary(OperatorKind::Addition, "Money", "int", "int")]);

    assert_eq!(outcome.codes(), vec![563]);
    expect![["One of the parameters of a binary operator must be the containing type"]].assert_eq(&outcome.messages()[0]);
    assert!(outcome.metadata.methods_named("Money", "op_Addition").is_empty());
}

#[test]
fn operators_must_be_public_and_static() {
    let outcome = resolve_money(vec![
        OperatorDecl::binary(OperatorKind::Subtraction, "Money", "Money", "int").with_modifiers(Modifiers::PUBLIC),
        OperatorDecl::unary(OperatorKind::LogicalNot, "bool", "Money").with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::VIRTUAL),
    ]);

    assert_eq!(outcome.codes(), vec![558, 106]);
    expect![["User defined operators `Money.operator Subtraction (Money, int)' must be declared static and public"]]
        .assert_eq(&outcome.messages()[0]);
}

#[test]
fn unary_operator_rules() {
    let outcome = resolve_money(vec![
        OperatorDecl::unary(OperatorKind::LogicalNot, "bool", "int"),
        OperatorDecl::unary(OperatorKind::Increment, "int", "Money"),
        OperatorDecl::unary(OperatorKind::False, "int", "Money"),
        OperatorDecl::unary(OperatorKind::Decrement, "Money", "Money"),
    ]);

    assert_eq!(outcome.codes(), vec![562, 559, 215]);
    assert_eq!(outcome.metadata.methods_named("Money", "op_Decrement").len(), 1);
}

#[test]
fn conversion_rules() {
    let outcome = resolve_money(vec![
        OperatorDecl::unary(OperatorKind::Implicit, "Money", "Money"),
        OperatorDecl::unary(OperatorKind::Explicit, "long", "int"),
        OperatorDecl::unary(OperatorKind::Implicit, "object", "Money"),
        OperatorDecl::unary(OperatorKind::Explicit, "IAmount", "Money"),
    ]);
    assert_eq!(outcome.codes(), vec![555, 556, -8, 552]);
}

#[test]
fn conversions_between_related_classes_are_rejected() {
    let coin = TypeDecl::class("GoldCoin").with_base("Coin").with_member(
        OperatorDecl::unary(OperatorKind::Explicit, "GoldCoin", "Coin").with_body(BlockId(1)),
    );
    let outcome = resolve_types(vec![TypeDecl::class("Coin"), coin]);

    assert_eq!(outcome.codes(), vec![-10]);
    expect![["User-defined conversion cannot convert between types that derive from each other"]]
        .assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.diagnostics.diagnostics()[0].code_string(), "-10");
}

#[test]
fn operator_overloads_collide_on_signature() {
    let outcome = resolve_money(vec![
        OperatorDecl::binary(OperatorKind::Addition, "Money", "Money", "Money"),
        OperatorDecl::binary(OperatorKind::Addition, "Money", "Money", "int"),
        OperatorDecl::binary(OperatorKind::Addition, "Money", "Money", "Money"),
    ]);

    assert_eq!(outcome.codes(), vec![111]);
    expect![["Class `Money' already contains a definition with the same return value and parameter types for operator `Addition'"]]
        .assert_eq(&outcome.messages()[0]);
    assert_eq!(outcome.metadata.methods_named("Money", "op_Addition").len(), 2);
}
