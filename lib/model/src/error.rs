use oxiri::IriParseError;
use oxrdf::BlankNodeIdParseError;
use oxsdatatypes::{
    ParseDateTimeError, ParseDecimalError, TooLargeForDecimalError, TooLargeForIntegerError,
};
use std::fmt::{Debug, Display, Formatter};
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The result of evaluating a SPARQL expression.
pub type EvalResult<T> = Result<T, EvalError>;

/// An error that indicates an *expected* failure while evaluating a SPARQL expression.
///
/// In SPARQL, many operations can fail. For example, because the input value had a different data
/// type or a variable is unbound. These errors are part of the query semantics: a filter treats
/// them as `false`, an extension leaves its variable unbound. As all of them are handled equally,
/// no reason is stored.
#[derive(Clone, Copy, Debug, Default, Error, PartialEq, Eq)]
pub struct EvalError {}

impl EvalError {
    /// Creates a result with an [EvalError].
    pub fn expected<T>() -> EvalResult<T> {
        Err(EvalError::default())
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("An expected error occurred.")
    }
}

macro_rules! implement_from {
    ($t:ty) => {
        impl From<$t> for EvalError {
            fn from(_: $t) -> Self {
                EvalError::default()
            }
        }
    };
}

implement_from!(TooLargeForDecimalError);
implement_from!(TooLargeForIntegerError);
implement_from!(ParseBoolError);
implement_from!(ParseIntError);
implement_from!(ParseFloatError);
implement_from!(ParseDecimalError);
implement_from!(ParseDateTimeError);
implement_from!(BlankNodeIdParseError);
implement_from!(IriParseError);
implement_from!(TryFromIntError);
