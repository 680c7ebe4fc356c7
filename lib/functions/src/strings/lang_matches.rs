use crate::BinarySparqlOp;
use itertools::{EitherOrBoth, Itertools};
use rdf_algebra_model::{EvalResult, SimpleLiteralRef};

/// `langMatches` with the basic filtering scheme of RFC 4647.
#[derive(Debug, Default)]
pub struct LangMatchesSparqlOp;

impl BinarySparqlOp for LangMatchesSparqlOp {
    type ArgLhs<'data> = SimpleLiteralRef<'data>;
    type ArgRhs<'data> = SimpleLiteralRef<'data>;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        if rhs.value == "*" {
            return Ok(!lhs.value.is_empty());
        }

        let matches = rhs
            .value
            .split('-')
            .zip_longest(lhs.value.split('-'))
            .all(|parts| match parts {
                EitherOrBoth::Both(range_subtag, language_subtag) => {
                    range_subtag.eq_ignore_ascii_case(language_subtag)
                }
                EitherOrBoth::Left(_) => false,
                EitherOrBoth::Right(_) => true,
            });
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang_matches(tag: &str, range: &str) -> bool {
        LangMatchesSparqlOp
            .evaluate(SimpleLiteralRef::new(tag), SimpleLiteralRef::new(range))
            .unwrap()
    }

    #[test]
    fn prefix_range_matches() {
        assert!(lang_matches("en-GB", "en"));
        assert!(lang_matches("EN-gb", "en-GB"));
    }

    #[test]
    fn different_language_does_not_match() {
        assert!(!lang_matches("fr", "en"));
        assert!(!lang_matches("en", "en-GB"));
    }

    #[test]
    fn wildcard_requires_a_language() {
        assert!(!lang_matches("", "*"));
        assert!(lang_matches("de", "*"));
    }
}
