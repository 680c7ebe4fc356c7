use crate::{EvalError, EvalResult};
use oxrdf::vocab::xsd;
use oxrdf::Literal;
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use std::cmp::Ordering;

/// A value of one of the four numeric types SPARQL operates on.
///
/// Literals of the derived integer types (`xsd:int`, `xsd:byte`, ...) are represented as
/// [Numeric::Integer].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

impl Numeric {
    /// Returns the effective boolean value of the number.
    pub fn as_boolean(self) -> bool {
        let value = match self {
            Numeric::Integer(value) => Boolean::from(value),
            Numeric::Decimal(value) => Boolean::from(value),
            Numeric::Float(value) => Boolean::from(value),
            Numeric::Double(value) => Boolean::from(value),
        };
        value.into()
    }

    pub fn into_literal(self) -> Literal {
        match self {
            Numeric::Integer(value) => Literal::new_typed_literal(value.to_string(), xsd::INTEGER),
            Numeric::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Numeric::Float(value) => Literal::new_typed_literal(value.to_string(), xsd::FLOAT),
            Numeric::Double(value) => Literal::new_typed_literal(value.to_string(), xsd::DOUBLE),
        }
    }

    pub fn checked_neg(self) -> EvalResult<Self> {
        Ok(match self {
            Numeric::Integer(value) => Numeric::Integer(value.checked_neg().ok_or(EvalError {})?),
            Numeric::Decimal(value) => Numeric::Decimal(value.checked_neg().ok_or(EvalError {})?),
            Numeric::Float(value) => Numeric::Float(-value),
            Numeric::Double(value) => Numeric::Double(-value),
        })
    }

    pub fn checked_abs(self) -> EvalResult<Self> {
        Ok(match self {
            Numeric::Integer(value) => Numeric::Integer(value.checked_abs().ok_or(EvalError {})?),
            Numeric::Decimal(value) => Numeric::Decimal(value.checked_abs().ok_or(EvalError {})?),
            Numeric::Float(value) => Numeric::Float(value.abs()),
            Numeric::Double(value) => Numeric::Double(value.abs()),
        })
    }
}

impl From<Integer> for Numeric {
    fn from(value: Integer) -> Self {
        Numeric::Integer(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Integer(value.into())
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match NumericPair::with_casts_from(*self, *other) {
            NumericPair::Integer(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Decimal(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }
}

/// Two numbers promoted to a common type, following the SPARQL operator mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Float(Float, Float),
    Double(Double, Double),
}

impl NumericPair {
    /// Promotes both operands to the "larger" of the two types
    /// (integer < decimal < float < double).
    pub fn with_casts_from(lhs: Numeric, rhs: Numeric) -> NumericPair {
        match (lhs, rhs) {
            (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
            (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs.into(), rhs),
            (Numeric::Integer(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Integer(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),
            (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => NumericPair::Decimal(lhs, rhs.into()),
            (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
            (Numeric::Decimal(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Decimal(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),
            (Numeric::Float(lhs), Numeric::Integer(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Decimal(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs, rhs),
            (Numeric::Float(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),
            (Numeric::Double(lhs), Numeric::Integer(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Decimal(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Float(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs, rhs),
        }
    }

    pub fn checked_add(self) -> EvalResult<Numeric> {
        Ok(match self {
            NumericPair::Integer(lhs, rhs) => {
                Numeric::Integer(lhs.checked_add(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Decimal(lhs, rhs) => {
                Numeric::Decimal(lhs.checked_add(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Float(lhs, rhs) => Numeric::Float(lhs + rhs),
            NumericPair::Double(lhs, rhs) => Numeric::Double(lhs + rhs),
        })
    }

    pub fn checked_sub(self) -> EvalResult<Numeric> {
        Ok(match self {
            NumericPair::Integer(lhs, rhs) => {
                Numeric::Integer(lhs.checked_sub(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Decimal(lhs, rhs) => {
                Numeric::Decimal(lhs.checked_sub(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Float(lhs, rhs) => Numeric::Float(lhs - rhs),
            NumericPair::Double(lhs, rhs) => Numeric::Double(lhs - rhs),
        })
    }

    pub fn checked_mul(self) -> EvalResult<Numeric> {
        Ok(match self {
            NumericPair::Integer(lhs, rhs) => {
                Numeric::Integer(lhs.checked_mul(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Decimal(lhs, rhs) => {
                Numeric::Decimal(lhs.checked_mul(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Float(lhs, rhs) => Numeric::Float(lhs * rhs),
            NumericPair::Double(lhs, rhs) => Numeric::Double(lhs * rhs),
        })
    }

    /// Division of two integers yields a decimal. Division by zero is an error for integers and
    /// decimals.
    pub fn checked_div(self) -> EvalResult<Numeric> {
        Ok(match self {
            NumericPair::Integer(lhs, rhs) => Numeric::Decimal(
                Decimal::from(lhs)
                    .checked_div(rhs)
                    .ok_or(EvalError {})?,
            ),
            NumericPair::Decimal(lhs, rhs) => {
                Numeric::Decimal(lhs.checked_div(rhs).ok_or(EvalError {})?)
            }
            NumericPair::Float(lhs, rhs) => Numeric::Float(lhs / rhs),
            NumericPair::Double(lhs, rhs) => Numeric::Double(lhs / rhs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_decimal_promote_to_decimal() {
        let pair = NumericPair::with_casts_from(
            Numeric::from(1_i64),
            Numeric::Decimal(Decimal::from(2)),
        );
        assert!(matches!(pair, NumericPair::Decimal(_, _)));
    }

    #[test]
    fn integer_division_yields_decimal() {
        let result = NumericPair::with_casts_from(Numeric::from(3_i64), Numeric::from(2_i64))
            .checked_div()
            .unwrap();
        assert_eq!(result, Numeric::Decimal("1.5".parse().unwrap()));
    }

    #[test]
    fn integer_division_by_zero_is_an_error() {
        let result =
            NumericPair::with_casts_from(Numeric::from(3_i64), Numeric::from(0_i64)).checked_div();
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn comparison_across_types() {
        assert_eq!(
            Numeric::from(1_i64).partial_cmp(&Numeric::Double(1.5.into())),
            Some(Ordering::Less)
        );
    }
}
