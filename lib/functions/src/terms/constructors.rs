use crate::{BinarySparqlOp, NullarySparqlOp, UnarySparqlOp};
use rdf_algebra_model::{
    BlankNode, EvalError, EvalResult, Iri, Literal, NamedNode, NamedNodeRef, SimpleLiteralRef, Term,
};
use sha2::{Digest, Sha256};

#[derive(Debug)]
pub struct IriSparqlOp {
    base_iri: Option<Iri<String>>,
}

impl IriSparqlOp {
    pub fn new(base_iri: Option<Iri<String>>) -> Self {
        Self { base_iri }
    }
}

impl UnarySparqlOp for IriSparqlOp {
    type Arg<'data> = &'data Term;
    type Result = NamedNode;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let value = match value {
            Term::NamedNode(named_node) => return Ok(named_node.clone()),
            term => SimpleLiteralRef::from_term(term)?.value,
        };
        let resolved = if let Some(base_iri) = &self.base_iri {
            base_iri.resolve(value)?
        } else {
            Iri::parse(value.to_owned())?
        };
        Ok(NamedNode::from(resolved))
    }
}

/// `BNODE`. Without argument every call yields a fresh blank node. With a string argument the
/// label is derived from the string, so equal strings yield equal blank nodes within a query.
#[derive(Debug, Default)]
pub struct BNodeSparqlOp;

impl NullarySparqlOp for BNodeSparqlOp {
    type Result = BlankNode;

    fn evaluate(&self) -> EvalResult<Self::Result> {
        Ok(BlankNode::default())
    }
}

impl UnarySparqlOp for BNodeSparqlOp {
    type Arg<'data> = SimpleLiteralRef<'data>;
    type Result = BlankNode;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let digest = Sha256::new().chain_update(value.value).finalize();
        Ok(BlankNode::new(format!("b{}", hex::encode(&digest[..16])))?)
    }
}

#[derive(Debug, Default)]
pub struct StrDtSparqlOp;

impl BinarySparqlOp for StrDtSparqlOp {
    type ArgLhs<'data> = SimpleLiteralRef<'data>;
    type ArgRhs<'data> = NamedNodeRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        Ok(Literal::new_typed_literal(lhs.value, rhs))
    }
}

#[derive(Debug, Default)]
pub struct StrLangSparqlOp;

impl BinarySparqlOp for StrLangSparqlOp {
    type ArgLhs<'data> = SimpleLiteralRef<'data>;
    type ArgRhs<'data> = SimpleLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        Literal::new_language_tagged_literal(lhs.value, rhs.value).map_err(|_| EvalError {})
    }
}

/// `UUID`: a fresh `urn:uuid:` IRI.
#[derive(Debug, Default)]
pub struct UuidSparqlOp;

impl NullarySparqlOp for UuidSparqlOp {
    type Result = NamedNode;

    fn evaluate(&self) -> EvalResult<Self::Result> {
        let formatted = format!("urn:uuid:{}", uuid::Uuid::new_v4());
        Ok(NamedNode::new_unchecked(formatted))
    }
}

#[derive(Debug, Default)]
pub struct StrUuidSparqlOp;

impl NullarySparqlOp for StrUuidSparqlOp {
    type Result = Literal;

    fn evaluate(&self) -> EvalResult<Self::Result> {
        Ok(Literal::new_simple_literal(uuid::Uuid::new_v4().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_resolves_against_base() {
        let op = IriSparqlOp::new(Some(Iri::parse("http://example.com/a/".to_owned()).unwrap()));
        let result = op.evaluate(&Term::from(Literal::new_simple_literal("b")));
        assert_eq!(result, Ok(NamedNode::new_unchecked("http://example.com/a/b")));
    }

    #[test]
    fn iri_of_relative_string_without_base_is_an_error() {
        let op = IriSparqlOp::new(None);
        let result = op.evaluate(&Term::from(Literal::new_simple_literal("b")));
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn bnode_with_label_is_deterministic() {
        let a = UnarySparqlOp::evaluate(&BNodeSparqlOp, SimpleLiteralRef::new("x")).unwrap();
        let b = UnarySparqlOp::evaluate(&BNodeSparqlOp, SimpleLiteralRef::new("x")).unwrap();
        let c = UnarySparqlOp::evaluate(&BNodeSparqlOp, SimpleLiteralRef::new("y")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn strlang_rejects_invalid_tags() {
        let result = StrLangSparqlOp.evaluate(
            SimpleLiteralRef::new("chat"),
            SimpleLiteralRef::new("not a tag"),
        );
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn uuid_iri_shape() {
        let uuid = UuidSparqlOp.evaluate().unwrap();
        assert!(uuid.as_str().starts_with("urn:uuid:"));
        assert_eq!(uuid.as_str().len(), 45);
    }
}
