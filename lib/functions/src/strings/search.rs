use crate::BinarySparqlOp;
use rdf_algebra_model::{CompatibleStringArgs, EvalResult, Literal, StringLiteralRef};

macro_rules! create_string_predicate_op {
    ($STRUCT: ident, $METHOD: ident) => {
        #[derive(Debug, Default)]
        pub struct $STRUCT;

        impl BinarySparqlOp for $STRUCT {
            type ArgLhs<'data> = StringLiteralRef<'data>;
            type ArgRhs<'data> = StringLiteralRef<'data>;
            type Result = bool;

            fn evaluate<'data>(
                &self,
                lhs: Self::ArgLhs<'data>,
                rhs: Self::ArgRhs<'data>,
            ) -> EvalResult<Self::Result> {
                let args = CompatibleStringArgs::try_from(lhs, rhs)?;
                Ok(args.lhs.$METHOD(args.rhs))
            }
        }
    };
}

create_string_predicate_op!(ContainsSparqlOp, contains);
create_string_predicate_op!(StrStartsSparqlOp, starts_with);
create_string_predicate_op!(StrEndsSparqlOp, ends_with);

/// `STRBEFORE`. A missing match yields the empty simple literal.
#[derive(Debug, Default)]
pub struct StrBeforeSparqlOp;

impl BinarySparqlOp for StrBeforeSparqlOp {
    type ArgLhs<'data> = StringLiteralRef<'data>;
    type ArgRhs<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        let args = CompatibleStringArgs::try_from(lhs, rhs)?;
        Ok(match args.lhs.find(args.rhs) {
            Some(position) => args.result(&args.lhs[..position]),
            None => Literal::new_simple_literal(""),
        })
    }
}

/// `STRAFTER`. A missing match yields the empty simple literal.
#[derive(Debug, Default)]
pub struct StrAfterSparqlOp;

impl BinarySparqlOp for StrAfterSparqlOp {
    type ArgLhs<'data> = StringLiteralRef<'data>;
    type ArgRhs<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        let args = CompatibleStringArgs::try_from(lhs, rhs)?;
        Ok(match args.lhs.find(args.rhs) {
            Some(position) => args.result(&args.lhs[position + args.rhs.len()..]),
            None => Literal::new_simple_literal(""),
        })
    }
}
