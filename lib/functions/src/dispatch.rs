use crate::conversion::{
    AsBooleanSparqlOp, AsDateTimeSparqlOp, AsDecimalSparqlOp, AsDoubleSparqlOp,
    AsFloatSparqlOp, AsIntegerSparqlOp, AsStringSparqlOp,
};
use crate::dates_and_times::{
    DaySparqlOp, HoursSparqlOp, MinutesSparqlOp, MonthSparqlOp, NowSparqlOp, SecondsSparqlOp,
    TimezoneSparqlOp, TzSparqlOp, YearSparqlOp,
};
use crate::hash::{Md5SparqlOp, Sha1SparqlOp, Sha256SparqlOp, Sha384SparqlOp, Sha512SparqlOp};
use crate::numeric::{AbsSparqlOp, CeilSparqlOp, FloorSparqlOp, RandSparqlOp, RoundSparqlOp};
use crate::strings::{
    ConcatSparqlOp, ContainsSparqlOp, EncodeForUriSparqlOp, LCaseSparqlOp, LangMatchesSparqlOp,
    RegexSparqlOp, ReplaceSparqlOp, StrAfterSparqlOp, StrBeforeSparqlOp, StrEndsSparqlOp,
    StrLenSparqlOp, StrStartsSparqlOp, SubStrSparqlOp, UCaseSparqlOp,
};
use crate::terms::{
    BNodeSparqlOp, DatatypeSparqlOp, IriSparqlOp, IsBlankSparqlOp, IsIriSparqlOp,
    IsLiteralSparqlOp, IsNumericSparqlOp, LangSparqlOp, StrDtSparqlOp, StrLangSparqlOp,
    StrSparqlOp, StrUuidSparqlOp, UuidSparqlOp,
};
use crate::{
    BinarySparqlOp, BuiltinName, FunctionName, IntoTerm, NarySparqlOp, NullarySparqlOp,
    QuaternarySparqlOp, RdfTermValueArg, TernarySparqlOp, UnarySparqlOp,
};
use rdf_algebra_model::vocab::xsd;
use rdf_algebra_model::{DateTime, EvalError, EvalResult, Iri, Term};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Query-wide state of the function catalog.
///
/// `NOW` must return the same value for the whole query, and `IRI` resolves against the base IRI
/// of the query.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    base_iri: Option<Iri<String>>,
    now: Option<DateTime>,
}

impl FunctionContext {
    /// Creates a context that captures the current time.
    pub fn new(base_iri: Option<Iri<String>>) -> Self {
        Self::with_now(base_iri, current_date_time())
    }

    pub fn with_now(base_iri: Option<Iri<String>>, now: Option<DateTime>) -> Self {
        Self { base_iri, now }
    }

    pub fn base_iri(&self) -> Option<&Iri<String>> {
        self.base_iri.as_ref()
    }

    pub fn now(&self) -> Option<DateTime> {
        self.now
    }
}

impl Default for FunctionContext {
    fn default() -> Self {
        Self::new(None)
    }
}

fn current_date_time() -> Option<DateTime> {
    let formatted = OffsetDateTime::now_utc().format(&Rfc3339).ok()?;
    formatted.parse().ok()
}

/// Evaluates the function `name` on already evaluated arguments.
///
/// A wrong number of arguments, an argument of the wrong type and an unknown function all yield
/// an [EvalError].
pub fn evaluate_function(
    name: &FunctionName,
    args: &[Term],
    context: &FunctionContext,
) -> EvalResult<Term> {
    match name {
        FunctionName::Builtin(builtin) => evaluate_builtin(*builtin, args, context),
        FunctionName::Custom(iri) => match iri.as_ref() {
            xsd::STRING => dispatch_unary(&AsStringSparqlOp, args),
            xsd::BOOLEAN => dispatch_unary(&AsBooleanSparqlOp, args),
            xsd::INTEGER => dispatch_unary(&AsIntegerSparqlOp, args),
            xsd::DECIMAL => dispatch_unary(&AsDecimalSparqlOp, args),
            xsd::FLOAT => dispatch_unary(&AsFloatSparqlOp, args),
            xsd::DOUBLE => dispatch_unary(&AsDoubleSparqlOp, args),
            xsd::DATE_TIME => dispatch_unary(&AsDateTimeSparqlOp, args),
            _ => EvalError::expected(),
        },
    }
}

fn evaluate_builtin(
    builtin: BuiltinName,
    args: &[Term],
    context: &FunctionContext,
) -> EvalResult<Term> {
    match builtin {
        BuiltinName::Str => dispatch_unary(&StrSparqlOp, args),
        BuiltinName::Lang => dispatch_unary(&LangSparqlOp, args),
        BuiltinName::LangMatches => dispatch_binary(&LangMatchesSparqlOp, args),
        BuiltinName::Datatype => dispatch_unary(&DatatypeSparqlOp, args),
        BuiltinName::Iri => dispatch_unary(&IriSparqlOp::new(context.base_iri.clone()), args),
        BuiltinName::BNode => match args {
            [] => dispatch_nullary(&BNodeSparqlOp, args),
            _ => dispatch_unary(&BNodeSparqlOp, args),
        },
        BuiltinName::Rand => dispatch_nullary(&RandSparqlOp, args),
        BuiltinName::Abs => dispatch_unary(&AbsSparqlOp, args),
        BuiltinName::Ceil => dispatch_unary(&CeilSparqlOp, args),
        BuiltinName::Floor => dispatch_unary(&FloorSparqlOp, args),
        BuiltinName::Round => dispatch_unary(&RoundSparqlOp, args),
        BuiltinName::Concat => dispatch_nary(&ConcatSparqlOp, args),
        BuiltinName::SubStr => match args {
            [_, _] => dispatch_binary(&SubStrSparqlOp, args),
            _ => dispatch_ternary(&SubStrSparqlOp, args),
        },
        BuiltinName::StrLen => dispatch_unary(&StrLenSparqlOp, args),
        BuiltinName::Replace => match args {
            [_, _, _] => dispatch_ternary(&ReplaceSparqlOp, args),
            _ => dispatch_quaternary(&ReplaceSparqlOp, args),
        },
        BuiltinName::UCase => dispatch_unary(&UCaseSparqlOp, args),
        BuiltinName::LCase => dispatch_unary(&LCaseSparqlOp, args),
        BuiltinName::EncodeForUri => dispatch_unary(&EncodeForUriSparqlOp, args),
        BuiltinName::Contains => dispatch_binary(&ContainsSparqlOp, args),
        BuiltinName::StrStarts => dispatch_binary(&StrStartsSparqlOp, args),
        BuiltinName::StrEnds => dispatch_binary(&StrEndsSparqlOp, args),
        BuiltinName::StrBefore => dispatch_binary(&StrBeforeSparqlOp, args),
        BuiltinName::StrAfter => dispatch_binary(&StrAfterSparqlOp, args),
        BuiltinName::Year => dispatch_unary(&YearSparqlOp, args),
        BuiltinName::Month => dispatch_unary(&MonthSparqlOp, args),
        BuiltinName::Day => dispatch_unary(&DaySparqlOp, args),
        BuiltinName::Hours => dispatch_unary(&HoursSparqlOp, args),
        BuiltinName::Minutes => dispatch_unary(&MinutesSparqlOp, args),
        BuiltinName::Seconds => dispatch_unary(&SecondsSparqlOp, args),
        BuiltinName::Timezone => dispatch_unary(&TimezoneSparqlOp, args),
        BuiltinName::Tz => dispatch_unary(&TzSparqlOp, args),
        BuiltinName::Now => dispatch_nullary(&NowSparqlOp::new(context.now), args),
        BuiltinName::Uuid => dispatch_nullary(&UuidSparqlOp, args),
        BuiltinName::StrUuid => dispatch_nullary(&StrUuidSparqlOp, args),
        BuiltinName::Md5 => dispatch_unary(&Md5SparqlOp, args),
        BuiltinName::Sha1 => dispatch_unary(&Sha1SparqlOp, args),
        BuiltinName::Sha256 => dispatch_unary(&Sha256SparqlOp, args),
        BuiltinName::Sha384 => dispatch_unary(&Sha384SparqlOp, args),
        BuiltinName::Sha512 => dispatch_unary(&Sha512SparqlOp, args),
        BuiltinName::StrLang => dispatch_binary(&StrLangSparqlOp, args),
        BuiltinName::StrDt => dispatch_binary(&StrDtSparqlOp, args),
        BuiltinName::IsIri => dispatch_unary(&IsIriSparqlOp, args),
        BuiltinName::IsBlank => dispatch_unary(&IsBlankSparqlOp, args),
        BuiltinName::IsLiteral => dispatch_unary(&IsLiteralSparqlOp, args),
        BuiltinName::IsNumeric => dispatch_unary(&IsNumericSparqlOp, args),
        BuiltinName::Regex => match args {
            [_, _] => dispatch_binary(&RegexSparqlOp, args),
            _ => dispatch_ternary(&RegexSparqlOp, args),
        },
    }
}

/// Evaluates `op` on `args` after checking the number of arguments and converting them.
pub fn dispatch_nullary<Op: NullarySparqlOp>(op: &Op, args: &[Term]) -> EvalResult<Term> {
    if !args.is_empty() {
        return EvalError::expected();
    }
    Ok(op.evaluate()?.into_term())
}

pub fn dispatch_unary<'data, Op: UnarySparqlOp>(
    op: &Op,
    args: &'data [Term],
) -> EvalResult<Term> {
    let [arg] = args else {
        return EvalError::expected();
    };
    let arg = <Op::Arg<'data> as RdfTermValueArg<'data>>::try_from_term(arg)?;
    Ok(op.evaluate(arg)?.into_term())
}

pub fn dispatch_binary<'data, Op: BinarySparqlOp>(
    op: &Op,
    args: &'data [Term],
) -> EvalResult<Term> {
    let [lhs, rhs] = args else {
        return EvalError::expected();
    };
    let lhs = <Op::ArgLhs<'data> as RdfTermValueArg<'data>>::try_from_term(lhs)?;
    let rhs = <Op::ArgRhs<'data> as RdfTermValueArg<'data>>::try_from_term(rhs)?;
    Ok(op.evaluate(lhs, rhs)?.into_term())
}

pub fn dispatch_ternary<'data, Op: TernarySparqlOp>(
    op: &Op,
    args: &'data [Term],
) -> EvalResult<Term> {
    let [arg0, arg1, arg2] = args else {
        return EvalError::expected();
    };
    let arg0 = <Op::Arg0<'data> as RdfTermValueArg<'data>>::try_from_term(arg0)?;
    let arg1 = <Op::Arg1<'data> as RdfTermValueArg<'data>>::try_from_term(arg1)?;
    let arg2 = <Op::Arg2<'data> as RdfTermValueArg<'data>>::try_from_term(arg2)?;
    Ok(op.evaluate(arg0, arg1, arg2)?.into_term())
}

pub fn dispatch_quaternary<'data, Op: QuaternarySparqlOp>(
    op: &Op,
    args: &'data [Term],
) -> EvalResult<Term> {
    let [arg0, arg1, arg2, arg3] = args else {
        return EvalError::expected();
    };
    let arg0 = <Op::Arg0<'data> as RdfTermValueArg<'data>>::try_from_term(arg0)?;
    let arg1 = <Op::Arg1<'data> as RdfTermValueArg<'data>>::try_from_term(arg1)?;
    let arg2 = <Op::Arg2<'data> as RdfTermValueArg<'data>>::try_from_term(arg2)?;
    let arg3 = <Op::Arg3<'data> as RdfTermValueArg<'data>>::try_from_term(arg3)?;
    Ok(op.evaluate(arg0, arg1, arg2, arg3)?.into_term())
}

pub fn dispatch_nary<'data, Op: NarySparqlOp>(
    op: &Op,
    args: &'data [Term],
) -> EvalResult<Term> {
    let args = args
        .iter()
        .map(<Op::Args<'data> as RdfTermValueArg<'data>>::try_from_term)
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(op.evaluate(&args)?.into_term())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::{Literal, NamedNode};

    fn call(builtin: BuiltinName, args: &[Term]) -> EvalResult<Term> {
        evaluate_function(
            &FunctionName::Builtin(builtin),
            args,
            &FunctionContext::default(),
        )
    }

    fn string(value: &str) -> Term {
        Literal::new_simple_literal(value).into()
    }

    #[test]
    fn lang_matches() {
        let t = Ok(Term::from(Literal::from(true)));
        let f = Ok(Term::from(Literal::from(false)));
        assert_eq!(
            call(BuiltinName::LangMatches, &[string("en-GB"), string("en")]),
            t
        );
        assert_eq!(call(BuiltinName::LangMatches, &[string("fr"), string("en")]), f);
        assert_eq!(call(BuiltinName::LangMatches, &[string(""), string("*")]), f);
    }

    #[test]
    fn wrong_arity_is_an_error() {
        assert_eq!(
            call(BuiltinName::StrLen, &[string("a"), string("b")]),
            EvalError::expected()
        );
    }

    #[test]
    fn wrong_argument_type_is_an_error() {
        let number = Term::from(Literal::from(1_i64));
        assert_eq!(call(BuiltinName::StrLen, &[number]), EvalError::expected());
    }

    #[test]
    fn substr_with_two_and_three_arguments() {
        let two = Term::from(Literal::from(2_i64));
        assert_eq!(
            call(BuiltinName::SubStr, &[string("abc"), two.clone()]),
            Ok(string("bc"))
        );
        assert_eq!(
            call(BuiltinName::SubStr, &[string("abc"), two.clone(), two]),
            Ok(string("bc"))
        );
    }

    #[test]
    fn now_is_constant_within_a_context() {
        let context = FunctionContext::default();
        let name = FunctionName::Builtin(BuiltinName::Now);
        let first = evaluate_function(&name, &[], &context).unwrap();
        let second = evaluate_function(&name, &[], &context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cast_by_iri() {
        let name = FunctionName::Custom(xsd::INTEGER.into_owned());
        let result = evaluate_function(&name, &[string("12")], &FunctionContext::default());
        assert_eq!(result, Ok(Literal::from(12_i64).into()));
    }

    #[test]
    fn unknown_iri_function_is_an_error() {
        let name = FunctionName::Custom(NamedNode::new_unchecked("http://example.com/f"));
        let result = evaluate_function(&name, &[], &FunctionContext::default());
        assert_eq!(result, EvalError::expected());
    }
}
