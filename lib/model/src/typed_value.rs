use crate::{EvalError, EvalResult, Numeric, StringLiteralRef};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, Integer, Time,
    YearMonthDuration,
};
use std::cmp::Ordering;
use std::str::FromStr;

/// A decoded RDF term on which SPARQL functions operate.
///
/// Literals of a known datatype carry their parsed value. Literals of an unknown datatype and
/// ill-typed literals (e.g., `"abc"^^xsd:integer`) are kept as [TypedValue::OtherLiteral].
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    BooleanLiteral(Boolean),
    NumericLiteral(Numeric),
    SimpleLiteral(String),
    LanguageStringLiteral { value: String, language: String },
    DateTimeLiteral(DateTime),
    TimeLiteral(Time),
    DateLiteral(Date),
    DurationLiteral(Duration),
    YearMonthDurationLiteral(YearMonthDuration),
    DayTimeDurationLiteral(DayTimeDuration),
    OtherLiteral(Literal),
}

/// Checks if the datatype is one of the integer datatypes derived from `xsd:integer`.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    static INTEGER_DATATYPES: &[NamedNodeRef<'_>; 13] = &[
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is a numeric datatype.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
}

impl TypedValue {
    /// Decodes a literal.
    pub fn from_literal(literal: Literal) -> Self {
        let (value, datatype, language) = literal.destruct();
        if let Some(language) = language {
            return TypedValue::LanguageStringLiteral { value, language };
        }
        let Some(datatype) = datatype else {
            return TypedValue::SimpleLiteral(value);
        };

        let decoded = Self::decode_typed(&value, datatype.as_ref());
        decoded.unwrap_or_else(|_| {
            TypedValue::OtherLiteral(Literal::new_typed_literal(value, datatype))
        })
    }

    fn decode_typed(value: &str, datatype: NamedNodeRef<'_>) -> EvalResult<Self> {
        Ok(match datatype {
            xsd::STRING => TypedValue::SimpleLiteral(value.to_owned()),
            xsd::BOOLEAN => TypedValue::BooleanLiteral(Boolean::from_str(value)?),
            xsd::DECIMAL => TypedValue::NumericLiteral(Numeric::Decimal(Decimal::from_str(value)?)),
            xsd::FLOAT => TypedValue::NumericLiteral(Numeric::Float(Float::from_str(value)?)),
            xsd::DOUBLE => TypedValue::NumericLiteral(Numeric::Double(Double::from_str(value)?)),
            xsd::DATE_TIME => TypedValue::DateTimeLiteral(DateTime::from_str(value)?),
            xsd::TIME => TypedValue::TimeLiteral(Time::from_str(value)?),
            xsd::DATE => TypedValue::DateLiteral(Date::from_str(value)?),
            xsd::DURATION => {
                TypedValue::DurationLiteral(Duration::from_str(value).map_err(|_| EvalError {})?)
            }
            xsd::YEAR_MONTH_DURATION => TypedValue::YearMonthDurationLiteral(
                YearMonthDuration::from_str(value).map_err(|_| EvalError {})?,
            ),
            xsd::DAY_TIME_DURATION => TypedValue::DayTimeDurationLiteral(
                DayTimeDuration::from_str(value).map_err(|_| EvalError {})?,
            ),
            datatype if is_integer_datatype(datatype) => {
                TypedValue::NumericLiteral(Numeric::Integer(Integer::from_str(value)?))
            }
            _ => return EvalError::expected(),
        })
    }

    /// Encodes the value as an RDF term.
    pub fn into_term(self) -> Term {
        match self {
            TypedValue::NamedNode(value) => value.into(),
            TypedValue::BlankNode(value) => value.into(),
            TypedValue::BooleanLiteral(value) => Literal::from(bool::from(value)).into(),
            TypedValue::NumericLiteral(value) => value.into_literal().into(),
            TypedValue::SimpleLiteral(value) => Literal::new_simple_literal(value).into(),
            TypedValue::LanguageStringLiteral { value, language } => {
                Literal::new_language_tagged_literal_unchecked(value, language).into()
            }
            TypedValue::DateTimeLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::DATE_TIME).into()
            }
            TypedValue::TimeLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::TIME).into()
            }
            TypedValue::DateLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::DATE).into()
            }
            TypedValue::DurationLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::DURATION).into()
            }
            TypedValue::YearMonthDurationLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::YEAR_MONTH_DURATION).into()
            }
            TypedValue::DayTimeDurationLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::DAY_TIME_DURATION).into()
            }
            TypedValue::OtherLiteral(value) => value.into(),
        }
    }

    /// Returns the datatype of a literal value. Returns an error for IRIs and blank nodes.
    pub fn datatype(&self) -> EvalResult<NamedNode> {
        let datatype = match self {
            TypedValue::NamedNode(_) | TypedValue::BlankNode(_) => return EvalError::expected(),
            TypedValue::BooleanLiteral(_) => xsd::BOOLEAN,
            TypedValue::NumericLiteral(Numeric::Integer(_)) => xsd::INTEGER,
            TypedValue::NumericLiteral(Numeric::Decimal(_)) => xsd::DECIMAL,
            TypedValue::NumericLiteral(Numeric::Float(_)) => xsd::FLOAT,
            TypedValue::NumericLiteral(Numeric::Double(_)) => xsd::DOUBLE,
            TypedValue::SimpleLiteral(_) => xsd::STRING,
            TypedValue::LanguageStringLiteral { .. } => rdf::LANG_STRING,
            TypedValue::DateTimeLiteral(_) => xsd::DATE_TIME,
            TypedValue::TimeLiteral(_) => xsd::TIME,
            TypedValue::DateLiteral(_) => xsd::DATE,
            TypedValue::DurationLiteral(_) => xsd::DURATION,
            TypedValue::YearMonthDurationLiteral(_) => xsd::YEAR_MONTH_DURATION,
            TypedValue::DayTimeDurationLiteral(_) => xsd::DAY_TIME_DURATION,
            TypedValue::OtherLiteral(literal) => return Ok(literal.datatype().into_owned()),
        };
        Ok(datatype.into_owned())
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self, TypedValue::NamedNode(_) | TypedValue::BlankNode(_))
    }

    /// Returns the string value of a string literal (simple or language-tagged).
    pub fn as_string_literal(&self) -> Option<StringLiteralRef<'_>> {
        match self {
            TypedValue::SimpleLiteral(value) => Some(StringLiteralRef::new(value, None)),
            TypedValue::LanguageStringLiteral { value, language } => {
                Some(StringLiteralRef::new(value, Some(language)))
            }
            _ => None,
        }
    }

    /// Computes the effective boolean value.
    ///
    /// Ill-typed boolean and numeric literals are `false`, other literals and non-literals are an
    /// error.
    pub fn effective_boolean_value(&self) -> EvalResult<bool> {
        match self {
            TypedValue::BooleanLiteral(value) => Ok(bool::from(*value)),
            TypedValue::NumericLiteral(value) => Ok(value.as_boolean()),
            TypedValue::SimpleLiteral(value) => Ok(!value.is_empty()),
            TypedValue::OtherLiteral(literal)
                if literal.datatype() == xsd::BOOLEAN
                    || is_numeric_datatype(literal.datatype()) =>
            {
                Ok(false)
            }
            _ => EvalError::expected(),
        }
    }

    /// The SPARQL `=` operator.
    ///
    /// Returns [None] if the equality cannot be decided, e.g. for two different literals of an
    /// unknown datatype.
    pub fn sparql_eq(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (TypedValue::NamedNode(a), TypedValue::NamedNode(b)) => Some(a == b),
            (TypedValue::BlankNode(a), TypedValue::BlankNode(b)) => Some(a == b),
            (TypedValue::NamedNode(_) | TypedValue::BlankNode(_), _)
            | (_, TypedValue::NamedNode(_) | TypedValue::BlankNode(_)) => Some(false),
            (TypedValue::OtherLiteral(a), TypedValue::OtherLiteral(b)) if a == b => Some(true),
            (TypedValue::OtherLiteral(_), _) | (_, TypedValue::OtherLiteral(_)) => None,
            (TypedValue::NumericLiteral(a), TypedValue::NumericLiteral(b)) => {
                Some(a.partial_cmp(b) == Some(Ordering::Equal))
            }
            (TypedValue::DurationLiteral(_), _)
            | (TypedValue::YearMonthDurationLiteral(_), _)
            | (TypedValue::DayTimeDurationLiteral(_), _) => {
                self.partial_cmp_values(other).map(Ordering::is_eq).or(Some(false))
            }
            _ => Some(self == other),
        }
    }

    /// Compares two values with the SPARQL `<` / `>` operators.
    ///
    /// Returns [None] for values that cannot be compared.
    pub fn partial_cmp_values(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::BooleanLiteral(a), TypedValue::BooleanLiteral(b)) => a.partial_cmp(b),
            (TypedValue::NumericLiteral(a), TypedValue::NumericLiteral(b)) => a.partial_cmp(b),
            (TypedValue::SimpleLiteral(a), TypedValue::SimpleLiteral(b)) => a.partial_cmp(b),
            (
                TypedValue::LanguageStringLiteral {
                    value: va,
                    language: la,
                },
                TypedValue::LanguageStringLiteral {
                    value: vb,
                    language: lb,
                },
            ) if la == lb => va.partial_cmp(vb),
            (TypedValue::DateTimeLiteral(a), TypedValue::DateTimeLiteral(b)) => a.partial_cmp(b),
            (TypedValue::TimeLiteral(a), TypedValue::TimeLiteral(b)) => a.partial_cmp(b),
            (TypedValue::DateLiteral(a), TypedValue::DateLiteral(b)) => a.partial_cmp(b),
            (TypedValue::DurationLiteral(a), TypedValue::DurationLiteral(b)) => a.partial_cmp(b),
            (TypedValue::DurationLiteral(a), TypedValue::YearMonthDurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            (TypedValue::DurationLiteral(a), TypedValue::DayTimeDurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            (TypedValue::YearMonthDurationLiteral(a), TypedValue::DurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            (TypedValue::YearMonthDurationLiteral(a), TypedValue::YearMonthDurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            (TypedValue::DayTimeDurationLiteral(a), TypedValue::DurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            (TypedValue::DayTimeDurationLiteral(a), TypedValue::DayTimeDurationLiteral(b)) => {
                a.partial_cmp(b)
            }
            _ => None,
        }
    }
}

impl From<Term> for TypedValue {
    fn from(term: Term) -> Self {
        match term {
            Term::NamedNode(node) => TypedValue::NamedNode(node),
            Term::BlankNode(node) => TypedValue::BlankNode(node),
            Term::Literal(literal) => TypedValue::from_literal(literal),
        }
    }
}

impl From<&Term> for TypedValue {
    fn from(term: &Term) -> Self {
        Self::from(term.clone())
    }
}

impl From<TypedValue> for Term {
    fn from(value: TypedValue) -> Self {
        value.into_term()
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::BooleanLiteral(value.into())
    }
}

impl From<Literal> for TypedValue {
    fn from(value: Literal) -> Self {
        TypedValue::from_literal(value)
    }
}

impl From<Numeric> for TypedValue {
    fn from(value: Numeric) -> Self {
        TypedValue::NumericLiteral(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_derived_integer_types() {
        let value = TypedValue::from(Term::from(Literal::from(5_i32)));
        assert_eq!(value, TypedValue::NumericLiteral(Numeric::from(5_i64)));
    }

    #[test]
    fn keeps_ill_typed_literals() {
        let literal = Literal::new_typed_literal("abc", xsd::INTEGER);
        let value = TypedValue::from_literal(literal.clone());
        assert_eq!(value, TypedValue::OtherLiteral(literal));
        assert_eq!(value.effective_boolean_value(), Ok(false));
    }

    #[test]
    fn effective_boolean_value_of_strings() {
        assert_eq!(
            TypedValue::SimpleLiteral(String::new()).effective_boolean_value(),
            Ok(false)
        );
        assert_eq!(
            TypedValue::SimpleLiteral("a".to_owned()).effective_boolean_value(),
            Ok(true)
        );
        assert!(TypedValue::LanguageStringLiteral {
            value: "a".to_owned(),
            language: "en".to_owned()
        }
        .effective_boolean_value()
        .is_err());
    }

    #[test]
    fn numeric_equality_crosses_types() {
        let integer = TypedValue::from(Numeric::from(1_i64));
        let double = TypedValue::from(Numeric::Double(1.0.into()));
        assert_eq!(integer.sparql_eq(&double), Some(true));
    }

    #[test]
    fn unknown_literals_are_not_comparable() {
        let a = TypedValue::OtherLiteral(Literal::new_typed_literal(
            "a",
            NamedNode::new_unchecked("http://example.com/dt"),
        ));
        let b = TypedValue::OtherLiteral(Literal::new_typed_literal(
            "b",
            NamedNode::new_unchecked("http://example.com/dt"),
        ));
        assert_eq!(a.sparql_eq(&b), None);
        assert_eq!(a.sparql_eq(&a), Some(true));
    }
}
