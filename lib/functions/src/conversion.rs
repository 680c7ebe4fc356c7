//! Casts to the XSD datatypes (`xsd:integer(?x)`, ...).

use crate::UnarySparqlOp;
use rdf_algebra_model::vocab::xsd;
use rdf_algebra_model::{
    Boolean, DateTime, Decimal, Double, EvalError, EvalResult, Float, Integer, Literal,
    NamedNodeRef, Numeric, Term, TypedValue,
};

/// Returns whether `iri` names one of the supported casts.
pub fn is_cast_function(iri: NamedNodeRef<'_>) -> bool {
    [
        xsd::STRING,
        xsd::BOOLEAN,
        xsd::INTEGER,
        xsd::DECIMAL,
        xsd::FLOAT,
        xsd::DOUBLE,
        xsd::DATE_TIME,
    ]
    .contains(&iri)
}

#[derive(Debug, Default)]
pub struct AsStringSparqlOp;

impl UnarySparqlOp for AsStringSparqlOp {
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

#[derive(Debug, Default)]
pub struct AsBooleanSparqlOp;

impl UnarySparqlOp for AsBooleanSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(v) => v,
            TypedValue::SimpleLiteral(v) => v.parse::<Boolean>()?,
            TypedValue::NumericLiteral(v) => Boolean::from(v.as_boolean()),
            _ => return EvalError::expected(),
        };
        Ok(converted.into())
    }
}

#[derive(Debug, Default)]
pub struct AsIntegerSparqlOp;

impl UnarySparqlOp for AsIntegerSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = Integer;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(v) => Integer::from(v),
            TypedValue::SimpleLiteral(v) => v.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(v) => v,
                Numeric::Decimal(v) => Integer::try_from(v)?,
                Numeric::Float(v) => Integer::try_from(v)?,
                Numeric::Double(v) => Integer::try_from(v)?,
            },
            _ => return EvalError::expected(),
        };
        Ok(converted)
    }
}

#[derive(Debug, Default)]
pub struct AsDecimalSparqlOp;

impl UnarySparqlOp for AsDecimalSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = Decimal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(v) => Decimal::from(v),
            TypedValue::SimpleLiteral(v) => v.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(v) => Decimal::from(v),
                Numeric::Decimal(v) => v,
                Numeric::Float(v) => Decimal::try_from(v)?,
                Numeric::Double(v) => Decimal::try_from(v)?,
            },
            _ => return EvalError::expected(),
        };
        Ok(converted)
    }
}

#[derive(Debug, Default)]
pub struct AsFloatSparqlOp;

impl UnarySparqlOp for AsFloatSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(v) => Float::from(v),
            TypedValue::SimpleLiteral(v) => v.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(v) => Float::from(v),
                Numeric::Decimal(v) => Float::from(v),
                Numeric::Float(v) => v,
                Numeric::Double(v) => Float::from(v),
            },
            _ => return EvalError::expected(),
        };
        Ok(Numeric::Float(converted))
    }
}

#[derive(Debug, Default)]
pub struct AsDoubleSparqlOp;

impl UnarySparqlOp for AsDoubleSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = Double;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(v) => Double::from(v),
            TypedValue::SimpleLiteral(v) => v.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(v) => Double::from(v),
                Numeric::Decimal(v) => Double::from(v),
                Numeric::Float(v) => Double::from(v),
                Numeric::Double(v) => v,
            },
            _ => return EvalError::expected(),
        };
        Ok(converted)
    }
}

#[derive(Debug, Default)]
pub struct AsDateTimeSparqlOp;

impl UnarySparqlOp for AsDateTimeSparqlOp {
    type Arg<'data> = TypedValue;
    type Result = DateTime;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            TypedValue::DateTimeLiteral(v) => Ok(v),
            TypedValue::SimpleLiteral(v) => Ok(v.parse()?),
            _ => EvalError::expected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_to_integer_truncates() {
        let value = TypedValue::NumericLiteral(Numeric::Double(3.7.into()));
        assert_eq!(AsIntegerSparqlOp.evaluate(value), Ok(Integer::from(3_i64)));
    }

    #[test]
    fn string_to_integer() {
        assert_eq!(
            AsIntegerSparqlOp.evaluate(TypedValue::SimpleLiteral("42".to_owned())),
            Ok(Integer::from(42_i64))
        );
        assert_eq!(
            AsIntegerSparqlOp.evaluate(TypedValue::SimpleLiteral("4.2".to_owned())),
            EvalError::expected()
        );
    }

    #[test]
    fn numbers_to_boolean() {
        assert_eq!(
            AsBooleanSparqlOp.evaluate(TypedValue::NumericLiteral(Numeric::from(0_i64))),
            Ok(false)
        );
        assert_eq!(
            AsBooleanSparqlOp.evaluate(TypedValue::SimpleLiteral("1".to_owned())),
            Ok(true)
        );
    }

    #[test]
    fn iri_to_string() {
        let term = Term::from(rdf_algebra_model::NamedNode::new_unchecked("http://e.org/"));
        assert_eq!(
            AsStringSparqlOp.evaluate(&term),
            Ok(Literal::new_simple_literal("http://e.org/"))
        );
    }
}
