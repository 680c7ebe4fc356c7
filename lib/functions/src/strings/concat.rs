use crate::NarySparqlOp;
use rdf_algebra_model::{EvalResult, Literal, StringLiteralRef};

/// `CONCAT`: the result keeps the language tag only if all arguments share it.
#[derive(Debug, Default)]
pub struct ConcatSparqlOp;

impl NarySparqlOp for ConcatSparqlOp {
    type Args<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(&self, args: &[Self::Args<'data>]) -> EvalResult<Self::Result> {
        let mut result = String::new();
        let mut language = None;

        for arg in args {
            if let Some(lang) = &language {
                if *lang != arg.language {
                    language = Some(None);
                }
            } else {
                language = Some(arg.language);
            }
            result.push_str(arg.value);
        }

        Ok(StringLiteralRef::new("", language.flatten()).with_value(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_languages_yield_a_simple_literal() {
        let result = ConcatSparqlOp
            .evaluate(&[
                StringLiteralRef::new("foo", Some("en")),
                StringLiteralRef::new("bar", Some("fr")),
            ])
            .unwrap();
        assert_eq!(result, Literal::new_simple_literal("foobar"));
    }

    #[test]
    fn shared_language_is_kept() {
        let result = ConcatSparqlOp
            .evaluate(&[
                StringLiteralRef::new("foo", Some("en")),
                StringLiteralRef::new("bar", Some("en")),
            ])
            .unwrap();
        assert_eq!(
            result,
            Literal::new_language_tagged_literal_unchecked("foobar", "en")
        );
    }

    #[test]
    fn no_arguments() {
        assert_eq!(
            ConcatSparqlOp.evaluate(&[]),
            Ok(Literal::new_simple_literal(""))
        );
    }
}
