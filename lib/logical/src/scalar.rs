//! The operators of [Expression] whose value only depends on the values of their operands.
//!
//! Both the evaluator and the constant folding of the optimizer go through this module, such that
//! a folded expression always yields what the evaluator would have computed.

use crate::Expression;
use rdf_algebra_functions::comparison::{
    EqualSparqlOp, GreaterOrEqualSparqlOp, GreaterThanSparqlOp, LessOrEqualSparqlOp,
    LessThanSparqlOp, NotEqualSparqlOp, SameTermSparqlOp,
};
use rdf_algebra_functions::numeric::{
    AddSparqlOp, DivSparqlOp, MulSparqlOp, SubSparqlOp, UnaryMinusSparqlOp, UnaryPlusSparqlOp,
};
use rdf_algebra_functions::{
    dispatch_binary, dispatch_unary, evaluate_function, FunctionContext, FunctionName,
};
use rdf_algebra_model::{EvalResult, Literal, Term, TypedValue};

/// Applies a strict operator to its evaluated operands.
///
/// Returns [None] if `expression` is not strict, i.e., if it has to see its operands unevaluated
/// (`||`, `&&`, `if`, `coalesce`, `in`, `bound`, `exists`) or has no operands at all.
pub fn apply_strict(
    expression: &Expression,
    args: &[Term],
    context: &FunctionContext,
) -> Option<EvalResult<Term>> {
    Some(match expression {
        Expression::Not(_) => match args {
            [arg] => effective_boolean_value(arg).map(|value| Literal::from(!value).into()),
            _ => return None,
        },
        Expression::Equal(..) => dispatch_binary(&EqualSparqlOp, args),
        Expression::NotEqual(..) => dispatch_binary(&NotEqualSparqlOp, args),
        Expression::SameTerm(..) => dispatch_binary(&SameTermSparqlOp, args),
        Expression::Greater(..) => dispatch_binary(&GreaterThanSparqlOp, args),
        Expression::GreaterOrEqual(..) => dispatch_binary(&GreaterOrEqualSparqlOp, args),
        Expression::Less(..) => dispatch_binary(&LessThanSparqlOp, args),
        Expression::LessOrEqual(..) => dispatch_binary(&LessOrEqualSparqlOp, args),
        Expression::Add(..) => dispatch_binary(&AddSparqlOp, args),
        Expression::Subtract(..) => dispatch_binary(&SubSparqlOp, args),
        Expression::Multiply(..) => dispatch_binary(&MulSparqlOp, args),
        Expression::Divide(..) => dispatch_binary(&DivSparqlOp, args),
        Expression::UnaryPlus(_) => dispatch_unary(&UnaryPlusSparqlOp, args),
        Expression::UnaryMinus(_) => dispatch_unary(&UnaryMinusSparqlOp, args),
        Expression::FunctionCall(name, _) => evaluate_function(name, args, context),
        _ => return None,
    })
}

/// Whether evaluating the expression twice may yield different results.
pub fn is_volatile(expression: &Expression) -> bool {
    matches!(
        expression,
        Expression::FunctionCall(FunctionName::Builtin(builtin), _) if builtin.is_volatile()
    )
}

/// The effective boolean value of a term. Non-literals are an error.
pub fn effective_boolean_value(term: &Term) -> EvalResult<bool> {
    TypedValue::from(term).effective_boolean_value()
}

/// The SPARQL `&&`: `false` wins over an error.
pub fn and(lhs: EvalResult<bool>, rhs: EvalResult<bool>) -> EvalResult<bool> {
    match (lhs, rhs) {
        (Ok(false), _) | (_, Ok(false)) => Ok(false),
        (Ok(true), Ok(true)) => Ok(true),
        (Err(error), _) | (_, Err(error)) => Err(error),
    }
}

/// The SPARQL `||`: `true` wins over an error.
pub fn or(lhs: EvalResult<bool>, rhs: EvalResult<bool>) -> EvalResult<bool> {
    match (lhs, rhs) {
        (Ok(true), _) | (_, Ok(true)) => Ok(true),
        (Ok(false), Ok(false)) => Ok(false),
        (Err(error), _) | (_, Err(error)) => Err(error),
    }
}
