use crate::UnarySparqlOp;
use rdf_algebra_model::{EvalResult, Term, TypedValue};

#[derive(Debug, Default)]
pub struct IsIriSparqlOp;

impl UnarySparqlOp for IsIriSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.is_named_node())
    }
}

#[derive(Debug, Default)]
pub struct IsBlankSparqlOp;

impl UnarySparqlOp for IsBlankSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.is_blank_node())
    }
}

#[derive(Debug, Default)]
pub struct IsLiteralSparqlOp;

impl UnarySparqlOp for IsLiteralSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.is_literal())
    }
}

/// `isNumeric`: ill-typed numeric literals are not numeric.
#[derive(Debug, Default)]
pub struct IsNumericSparqlOp;

impl UnarySparqlOp for IsNumericSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(matches!(value, TypedValue::NumericLiteral(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::vocab::xsd;
    use rdf_algebra_model::Literal;

    #[test]
    fn ill_typed_integer_is_not_numeric() {
        let term = Term::from(Literal::new_typed_literal("abc", xsd::INTEGER));
        assert_eq!(IsNumericSparqlOp.evaluate(TypedValue::from(&term)), Ok(false));
        assert_eq!(IsLiteralSparqlOp.evaluate(&term), Ok(true));
    }
}
