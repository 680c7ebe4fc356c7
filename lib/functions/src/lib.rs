//! The catalog of SPARQL built-in functions and aggregates.
//!
//! Every function is a small struct implementing one of the arity traits below. The arguments are
//! extracted from RDF terms via [RdfTermValueArg]. A failed extraction (e.g., a number passed to
//! `STRLEN`) yields an [EvalError](rdf_algebra_model::EvalError) without calling the function.
//! [evaluate_function] maps a [FunctionName] to the matching implementation.

pub mod aggregates;
mod args;
pub mod comparison;
pub mod conversion;
pub mod dates_and_times;
mod dispatch;
pub mod hash;
mod name;
pub mod numeric;
pub mod strings;
pub mod terms;

pub use args::{IntoTerm, RdfTermValueArg};
pub use dispatch::{
    dispatch_binary, dispatch_nary, dispatch_nullary, dispatch_quaternary, dispatch_ternary,
    dispatch_unary, evaluate_function, FunctionContext,
};
pub use name::{BuiltinName, FunctionName, UnknownFunctionError};

use rdf_algebra_model::EvalResult;

pub trait NullarySparqlOp {
    type Result: IntoTerm;

    fn evaluate(&self) -> EvalResult<Self::Result>;
}

pub trait UnarySparqlOp {
    type Arg<'data>: RdfTermValueArg<'data>;
    type Result: IntoTerm;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result>;
}

pub trait BinarySparqlOp {
    type ArgLhs<'data>: RdfTermValueArg<'data>;
    type ArgRhs<'data>: RdfTermValueArg<'data>;
    type Result: IntoTerm;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result>;
}

pub trait TernarySparqlOp {
    type Arg0<'data>: RdfTermValueArg<'data>;
    type Arg1<'data>: RdfTermValueArg<'data>;
    type Arg2<'data>: RdfTermValueArg<'data>;
    type Result: IntoTerm;

    fn evaluate<'data>(
        &self,
        arg0: Self::Arg0<'data>,
        arg1: Self::Arg1<'data>,
        arg2: Self::Arg2<'data>,
    ) -> EvalResult<Self::Result>;
}

pub trait QuaternarySparqlOp {
    type Arg0<'data>: RdfTermValueArg<'data>;
    type Arg1<'data>: RdfTermValueArg<'data>;
    type Arg2<'data>: RdfTermValueArg<'data>;
    type Arg3<'data>: RdfTermValueArg<'data>;
    type Result: IntoTerm;

    fn evaluate<'data>(
        &self,
        arg0: Self::Arg0<'data>,
        arg1: Self::Arg1<'data>,
        arg2: Self::Arg2<'data>,
        arg3: Self::Arg3<'data>,
    ) -> EvalResult<Self::Result>;
}

pub trait NarySparqlOp {
    type Args<'data>: RdfTermValueArg<'data>;
    type Result: IntoTerm;

    fn evaluate<'data>(&self, args: &[Self::Args<'data>]) -> EvalResult<Self::Result>;
}
