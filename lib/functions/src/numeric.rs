use crate::{BinarySparqlOp, NullarySparqlOp, UnarySparqlOp};
use rdf_algebra_model::{Double, EvalError, EvalResult, Numeric, NumericPair};
use rand::random;

macro_rules! create_binary_arithmetic_op {
    ($STRUCT: ident, $METHOD: ident) => {
        #[derive(Debug, Default)]
        pub struct $STRUCT;

        impl BinarySparqlOp for $STRUCT {
            type ArgLhs<'data> = Numeric;
            type ArgRhs<'data> = Numeric;
            type Result = Numeric;

            fn evaluate<'data>(
                &self,
                lhs: Self::ArgLhs<'data>,
                rhs: Self::ArgRhs<'data>,
            ) -> EvalResult<Self::Result> {
                NumericPair::with_casts_from(lhs, rhs).$METHOD()
            }
        }
    };
}

create_binary_arithmetic_op!(AddSparqlOp, checked_add);
create_binary_arithmetic_op!(SubSparqlOp, checked_sub);
create_binary_arithmetic_op!(MulSparqlOp, checked_mul);
create_binary_arithmetic_op!(DivSparqlOp, checked_div);

#[derive(Debug, Default)]
pub struct UnaryPlusSparqlOp;

impl UnarySparqlOp for UnaryPlusSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value)
    }
}

#[derive(Debug, Default)]
pub struct UnaryMinusSparqlOp;

impl UnarySparqlOp for UnaryMinusSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        value.checked_neg()
    }
}

#[derive(Debug, Default)]
pub struct AbsSparqlOp;

impl UnarySparqlOp for AbsSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        value.checked_abs()
    }
}

#[derive(Debug, Default)]
pub struct CeilSparqlOp;

impl UnarySparqlOp for CeilSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Numeric::Float(value) => Ok(Numeric::Float(value.ceil())),
            Numeric::Double(value) => Ok(Numeric::Double(value.ceil())),
            Numeric::Decimal(value) => value
                .checked_ceil()
                .map(Numeric::Decimal)
                .ok_or(EvalError {}),
            Numeric::Integer(_) => Ok(value),
        }
    }
}

#[derive(Debug, Default)]
pub struct FloorSparqlOp;

impl UnarySparqlOp for FloorSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Numeric::Float(value) => Ok(Numeric::Float(value.floor())),
            Numeric::Double(value) => Ok(Numeric::Double(value.floor())),
            Numeric::Decimal(value) => value
                .checked_floor()
                .map(Numeric::Decimal)
                .ok_or(EvalError {}),
            Numeric::Integer(_) => Ok(value),
        }
    }
}

#[derive(Debug, Default)]
pub struct RoundSparqlOp;

impl UnarySparqlOp for RoundSparqlOp {
    type Arg<'data> = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        match value {
            Numeric::Float(value) => Ok(Numeric::Float(value.round())),
            Numeric::Double(value) => Ok(Numeric::Double(value.round())),
            Numeric::Decimal(value) => value
                .checked_round()
                .map(Numeric::Decimal)
                .ok_or(EvalError {}),
            Numeric::Integer(_) => Ok(value),
        }
    }
}

/// `RAND`: a pseudo-random double in `[0, 1)`.
#[derive(Debug, Default)]
pub struct RandSparqlOp;

impl NullarySparqlOp for RandSparqlOp {
    type Result = Double;

    fn evaluate(&self) -> EvalResult<Self::Result> {
        Ok(random::<f64>().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::Decimal;

    #[test]
    fn add_promotes_to_the_larger_type() {
        let result = AddSparqlOp
            .evaluate(Numeric::from(1_i64), Numeric::Double(0.5.into()))
            .unwrap();
        assert_eq!(result, Numeric::Double(1.5.into()));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let result = MulSparqlOp.evaluate(Numeric::from(i64::MAX), Numeric::from(2_i64));
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn round_decimal() {
        let value = Numeric::Decimal("2.5".parse::<Decimal>().unwrap());
        assert_eq!(
            RoundSparqlOp.evaluate(value),
            Ok(Numeric::Decimal(Decimal::from(3)))
        );
    }

    #[test]
    fn rand_is_in_unit_interval() {
        let value = f64::from(RandSparqlOp.evaluate().unwrap());
        assert!((0.0..1.0).contains(&value));
    }
}
