use rdf_algebra_model::vocab::xsd;
use rdf_algebra_model::{
    BlankNode, Boolean, DateTime, DayTimeDuration, Decimal, Double, EvalError, EvalResult,
    Integer, Literal, NamedNode, NamedNodeRef, Numeric, SimpleLiteralRef, StringLiteralRef, Term,
    TypedValue,
};

/// A typed argument of a SPARQL function, extracted from an RDF term.
///
/// Extraction fails with an [EvalError] if the term has the wrong kind or datatype.
pub trait RdfTermValueArg<'data>: Sized {
    fn try_from_term(term: &'data Term) -> EvalResult<Self>;
}

impl<'data> RdfTermValueArg<'data> for &'data Term {
    fn try_from_term(term: &'data Term) -> EvalResult<Self> {
        Ok(term)
    }
}

impl RdfTermValueArg<'_> for TypedValue {
    fn try_from_term(term: &Term) -> EvalResult<Self> {
        Ok(TypedValue::from(term))
    }
}

impl<'data> RdfTermValueArg<'data> for NamedNodeRef<'data> {
    fn try_from_term(term: &'data Term) -> EvalResult<Self> {
        match term {
            Term::NamedNode(inner) => Ok(inner.as_ref()),
            _ => EvalError::expected(),
        }
    }
}

impl RdfTermValueArg<'_> for Boolean {
    fn try_from_term(term: &Term) -> EvalResult<Self> {
        match TypedValue::from(term) {
            TypedValue::BooleanLiteral(inner) => Ok(inner),
            _ => EvalError::expected(),
        }
    }
}

impl RdfTermValueArg<'_> for Numeric {
    fn try_from_term(term: &Term) -> EvalResult<Self> {
        match term {
            Term::Literal(literal) if is_numeric_literal(literal) => {
                match TypedValue::from_literal(literal.clone()) {
                    TypedValue::NumericLiteral(inner) => Ok(inner),
                    _ => EvalError::expected(),
                }
            }
            _ => EvalError::expected(),
        }
    }
}

impl RdfTermValueArg<'_> for Integer {
    fn try_from_term(term: &Term) -> EvalResult<Self> {
        match Numeric::try_from_term(term)? {
            Numeric::Integer(inner) => Ok(inner),
            _ => EvalError::expected(),
        }
    }
}

impl RdfTermValueArg<'_> for DateTime {
    fn try_from_term(term: &Term) -> EvalResult<Self> {
        match term {
            Term::Literal(literal) if literal.datatype() == xsd::DATE_TIME => {
                Ok(literal.value().parse()?)
            }
            _ => EvalError::expected(),
        }
    }
}

impl<'data> RdfTermValueArg<'data> for SimpleLiteralRef<'data> {
    fn try_from_term(term: &'data Term) -> EvalResult<Self> {
        SimpleLiteralRef::from_term(term)
    }
}

impl<'data> RdfTermValueArg<'data> for StringLiteralRef<'data> {
    fn try_from_term(term: &'data Term) -> EvalResult<Self> {
        StringLiteralRef::from_term(term)
    }
}

fn is_numeric_literal(literal: &Literal) -> bool {
    rdf_algebra_model::is_numeric_datatype(literal.datatype()) && literal.language().is_none()
}

/// A function result that can be encoded as an RDF term.
pub trait IntoTerm {
    fn into_term(self) -> Term;
}

impl IntoTerm for Term {
    fn into_term(self) -> Term {
        self
    }
}

impl IntoTerm for bool {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for Numeric {
    fn into_term(self) -> Term {
        self.into_literal().into()
    }
}

impl IntoTerm for Integer {
    fn into_term(self) -> Term {
        Numeric::Integer(self).into_term()
    }
}

impl IntoTerm for Decimal {
    fn into_term(self) -> Term {
        Numeric::Decimal(self).into_term()
    }
}

impl IntoTerm for Double {
    fn into_term(self) -> Term {
        Numeric::Double(self).into_term()
    }
}

impl IntoTerm for DateTime {
    fn into_term(self) -> Term {
        TypedValue::DateTimeLiteral(self).into_term()
    }
}

impl IntoTerm for DayTimeDuration {
    fn into_term(self) -> Term {
        TypedValue::DayTimeDurationLiteral(self).into_term()
    }
}

impl IntoTerm for Literal {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for NamedNode {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for BlankNode {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for TypedValue {
    fn into_term(self) -> Term {
        TypedValue::into_term(self)
    }
}
