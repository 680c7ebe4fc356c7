use crate::UnarySparqlOp;
use rdf_algebra_model::{EvalError, EvalResult, Literal, NamedNode, Term};

/// `STR`: the lexical form of a literal or the string of an IRI.
#[derive(Debug, Default)]
pub struct StrSparqlOp;

impl UnarySparqlOp for StrSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Term::NamedNode(node) => Ok(Literal::new_simple_literal(node.as_str())),
            Term::Literal(literal) => Ok(Literal::new_simple_literal(literal.value())),
            _ => EvalError::expected(),
        }
    }
}

/// `LANG`: the language tag of a literal, or the empty string.
#[derive(Debug, Default)]
pub struct LangSparqlOp;

impl UnarySparqlOp for LangSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Term::Literal(literal) => Ok(Literal::new_simple_literal(
                literal.language().unwrap_or_default(),
            )),
            _ => EvalError::expected(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DatatypeSparqlOp;

impl UnarySparqlOp for DatatypeSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = NamedNode;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Term::Literal(literal) => Ok(literal.datatype().into_owned()),
            _ => EvalError::expected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::vocab::rdf;

    #[test]
    fn datatype_of_language_string() {
        let term = Term::from(Literal::new_language_tagged_literal_unchecked("a", "en"));
        assert_eq!(
            DatatypeSparqlOp.evaluate(&term),
            Ok(rdf::LANG_STRING.into_owned())
        );
        assert_eq!(
            LangSparqlOp.evaluate(&term),
            Ok(Literal::new_simple_literal("en"))
        );
    }

    #[test]
    fn str_of_blank_node_is_an_error() {
        let term = Term::from(rdf_algebra_model::BlankNode::default());
        assert_eq!(StrSparqlOp.evaluate(&term), EvalError::expected());
    }
}
