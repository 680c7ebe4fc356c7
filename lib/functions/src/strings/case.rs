use crate::UnarySparqlOp;
use rdf_algebra_model::{EvalResult, Literal, StringLiteralRef};

#[derive(Debug, Default)]
pub struct UCaseSparqlOp;

impl UnarySparqlOp for UCaseSparqlOp {
    type Arg<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.with_value(value.value.to_uppercase()))
    }
}

#[derive(Debug, Default)]
pub struct LCaseSparqlOp;

impl UnarySparqlOp for LCaseSparqlOp {
    type Arg<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.with_value(value.value.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ucase_keeps_language() {
        let result = UCaseSparqlOp
            .evaluate(StringLiteralRef::new("foo", Some("en")))
            .unwrap();
        assert_eq!(
            result,
            Literal::new_language_tagged_literal_unchecked("FOO", "en")
        );
    }
}
