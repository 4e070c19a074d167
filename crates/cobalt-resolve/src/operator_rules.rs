//! Placement rules for user-defined operators.

use cobalt_syntax::OperatorKind;

use crate::error::ResolutionError;
use crate::registry::TypeRegistry;
use crate::types::TypeId;

/// Checks where an operator may appear relative to its declaring type.
///
/// `second` is `None` for unary operators and conversions. The first
/// violated rule is returned; an operator that breaks one is not defined.
pub fn check_operator(
    registry: &TypeRegistry,
    declaring: TypeId,
    operator: OperatorKind,
    return_type: TypeId,
    first: TypeId,
    second: Option<TypeId>,
) -> Result<(), ResolutionError> {
    if operator.is_conversion() {
        return check_conversion(registry, declaring, return_type, first);
    }
    match second {
        None => check_unary(registry, declaring, operator, return_type, first),
        Some(second) if first != declaring && second != declaring => Err(ResolutionError::BinaryOperand),
        Some(_) => Ok(()),
    }
}

fn check_conversion(registry: &TypeRegistry, declaring: TypeId, to: TypeId, from: TypeId) -> Result<(), ResolutionError> {
    if from == declaring && to == declaring {
        return Err(ResolutionError::ConversionSameType);
    }
    if from != declaring && to != declaring {
        return Err(ResolutionError::ConversionEnclosing);
    }
    let object = registry.object_type();
    if Some(from) == object || Some(to) == object {
        return Err(ResolutionError::ConversionObject);
    }
    if registry.get(from).is_interface() || registry.get(to).is_interface() {
        return Err(ResolutionError::ConversionInterface);
    }
    if registry.is_subclass_of(from, to) || registry.is_subclass_of(to, from) {
        return Err(ResolutionError::ConversionDerived);
    }
    Ok(())
}

fn check_unary(
    registry: &TypeRegistry,
    declaring: TypeId,
    operator: OperatorKind,
    return_type: TypeId,
    operand: TypeId,
) -> Result<(), ResolutionError> {
    if operand != declaring {
        return Err(ResolutionError::UnaryOperand);
    }
    match operator {
        OperatorKind::Increment | OperatorKind::Decrement if return_type != declaring => {
            Err(ResolutionError::IncrementDecrementType)
        }
        OperatorKind::True | OperatorKind::False if Some(return_type) != registry.bool_type() => {
            Err(ResolutionError::TrueFalseReturnType)
        }
        _ => Ok(()),
    }
}
