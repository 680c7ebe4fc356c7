use crate::{NullarySparqlOp, UnarySparqlOp};
use rdf_algebra_model::{
    DateTime, DayTimeDuration, Decimal, EvalError, EvalResult, Integer, Literal,
};

macro_rules! create_date_time_component_op {
    ($STRUCT: ident, $COMPONENT: ident) => {
        #[derive(Debug, Default)]
        pub struct $STRUCT;

        impl UnarySparqlOp for $STRUCT {
            type Arg<'data> = DateTime;
            type Result = Integer;

            fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
                Ok(Integer::from(i64::from(value.$COMPONENT())))
            }
        }
    };
}

create_date_time_component_op!(YearSparqlOp, year);
create_date_time_component_op!(MonthSparqlOp, month);
create_date_time_component_op!(DaySparqlOp, day);
create_date_time_component_op!(HoursSparqlOp, hour);
create_date_time_component_op!(MinutesSparqlOp, minute);

#[derive(Debug, Default)]
pub struct SecondsSparqlOp;

impl UnarySparqlOp for SecondsSparqlOp {
    type Arg<'data> = DateTime;
    type Result = Decimal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        Ok(value.second())
    }
}

/// `TIMEZONE`: the offset as a `xsd:dayTimeDuration`. A value without timezone is an error.
#[derive(Debug, Default)]
pub struct TimezoneSparqlOp;

impl UnarySparqlOp for TimezoneSparqlOp {
    type Arg<'data> = DateTime;
    type Result = DayTimeDuration;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        value.timezone().ok_or(EvalError {})
    }
}

/// `TZ`: the offset in its lexical form (`Z`, `-05:00`), or the empty string.
#[derive(Debug, Default)]
pub struct TzSparqlOp;

impl UnarySparqlOp for TzSparqlOp {
    type Arg<'data> = DateTime;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let result = value
            .timezone_offset()
            .map(|offset| offset.to_string())
            .unwrap_or_default();
        Ok(Literal::new_simple_literal(result))
    }
}

/// `NOW`: the same instant for every call within a query.
#[derive(Debug)]
pub struct NowSparqlOp {
    now: Option<DateTime>,
}

impl NowSparqlOp {
    pub fn new(now: Option<DateTime>) -> Self {
        Self { now }
    }
}

impl NullarySparqlOp for NowSparqlOp {
    type Result = DateTime;

    fn evaluate(&self) -> EvalResult<Self::Result> {
        self.now.ok_or(EvalError {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_time(value: &str) -> DateTime {
        value.parse().unwrap()
    }

    #[test]
    fn components() {
        let value = date_time("2011-01-10T14:45:13.815-05:00");
        assert_eq!(YearSparqlOp.evaluate(value), Ok(Integer::from(2011_i64)));
        assert_eq!(MonthSparqlOp.evaluate(value), Ok(Integer::from(1_i64)));
        assert_eq!(HoursSparqlOp.evaluate(value), Ok(Integer::from(14_i64)));
        assert_eq!(
            SecondsSparqlOp.evaluate(value),
            Ok("13.815".parse::<Decimal>().unwrap())
        );
    }

    #[test]
    fn timezone_and_tz() {
        let value = date_time("2011-01-10T14:45:13.815-05:00");
        assert_eq!(
            TimezoneSparqlOp.evaluate(value),
            Ok("-PT5H".parse::<DayTimeDuration>().unwrap())
        );
        assert_eq!(
            TzSparqlOp.evaluate(value),
            Ok(Literal::new_simple_literal("-05:00"))
        );
    }

    #[test]
    fn missing_timezone() {
        let value = date_time("2011-01-10T14:45:13");
        assert_eq!(TimezoneSparqlOp.evaluate(value), EvalError::expected());
        assert_eq!(TzSparqlOp.evaluate(value), Ok(Literal::new_simple_literal("")));
    }
}
