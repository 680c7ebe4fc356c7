use crate::BinarySparqlOp;
use rdf_algebra_model::{EvalError, EvalResult, Term, TypedValue};
use std::cmp::Ordering;

/// The SPARQL `=` operator.
#[derive(Debug, Default)]
pub struct EqualSparqlOp;

impl BinarySparqlOp for EqualSparqlOp {
    type ArgLhs<'data> = TypedValue;
    type ArgRhs<'data> = TypedValue;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        lhs.sparql_eq(&rhs).ok_or(EvalError {})
    }
}

/// The SPARQL `!=` operator.
#[derive(Debug, Default)]
pub struct NotEqualSparqlOp;

impl BinarySparqlOp for NotEqualSparqlOp {
    type ArgLhs<'data> = TypedValue;
    type ArgRhs<'data> = TypedValue;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        lhs.sparql_eq(&rhs).map(|eq| !eq).ok_or(EvalError {})
    }
}

macro_rules! create_binary_cmp_op {
    ($STRUCT: ident, $ORDERINGS: expr) => {
        #[derive(Debug, Default)]
        pub struct $STRUCT;

        impl BinarySparqlOp for $STRUCT {
            type ArgLhs<'data> = TypedValue;
            type ArgRhs<'data> = TypedValue;
            type Result = bool;

            fn evaluate<'data>(
                &self,
                lhs: Self::ArgLhs<'data>,
                rhs: Self::ArgRhs<'data>,
            ) -> EvalResult<Self::Result> {
                lhs.partial_cmp_values(&rhs)
                    .map(|o| $ORDERINGS.contains(&o))
                    .ok_or(EvalError {})
            }
        }
    };
}

create_binary_cmp_op!(GreaterThanSparqlOp, [Ordering::Greater]);
create_binary_cmp_op!(GreaterOrEqualSparqlOp, [Ordering::Equal, Ordering::Greater]);
create_binary_cmp_op!(LessThanSparqlOp, [Ordering::Less]);
create_binary_cmp_op!(LessOrEqualSparqlOp, [Ordering::Less, Ordering::Equal]);

/// `sameTerm`: syntactic equality of two RDF terms.
#[derive(Debug, Default)]
pub struct SameTermSparqlOp;

impl BinarySparqlOp for SameTermSparqlOp {
    type ArgLhs<'data> = &'data Term;
    type ArgRhs<'data> = &'data Term;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        Ok(lhs == rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::{Literal, Numeric};

    #[test]
    fn less_than_integer_with_double() {
        let result = LessThanSparqlOp
            .evaluate(
                TypedValue::NumericLiteral(Numeric::from(5_i64)),
                TypedValue::NumericLiteral(Numeric::Double(10.0.into())),
            )
            .unwrap();
        assert!(result);
    }

    #[test]
    fn strings_and_numbers_are_not_comparable() {
        let result = LessThanSparqlOp.evaluate(
            TypedValue::SimpleLiteral("a".to_owned()),
            TypedValue::NumericLiteral(Numeric::from(5_i64)),
        );
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn same_term_distinguishes_lexical_forms() {
        let one = Term::from(Literal::new_typed_literal(
            "1",
            rdf_algebra_model::vocab::xsd::INTEGER,
        ));
        let zero_one = Term::from(Literal::new_typed_literal(
            "01",
            rdf_algebra_model::vocab::xsd::INTEGER,
        ));
        assert_eq!(SameTermSparqlOp.evaluate(&one, &zero_one), Ok(false));
        assert_eq!(
            EqualSparqlOp.evaluate(TypedValue::from(&one), TypedValue::from(&zero_one)),
            Ok(true)
        );
    }
}
