use crate::UnarySparqlOp;
use md5::Md5;
use rdf_algebra_model::{EvalResult, Literal, SimpleLiteralRef};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

macro_rules! create_hash_op {
    ($STRUCT: ident, $HASHER: ty) => {
        #[derive(Debug, Default)]
        pub struct $STRUCT;

        impl UnarySparqlOp for $STRUCT {
            type Arg<'data> = SimpleLiteralRef<'data>;
            type Result = Literal;

            fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
                let hash = hex::encode(<$HASHER>::new().chain_update(value.value).finalize());
                Ok(Literal::new_simple_literal(hash))
            }
        }
    };
}

create_hash_op!(Md5SparqlOp, Md5);
create_hash_op!(Sha1SparqlOp, Sha1);
create_hash_op!(Sha256SparqlOp, Sha256);
create_hash_op!(Sha384SparqlOp, Sha384);
create_hash_op!(Sha512SparqlOp, Sha512);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_of_abc() {
        assert_eq!(
            Md5SparqlOp.evaluate(SimpleLiteralRef::new("abc")),
            Ok(Literal::new_simple_literal(
                "900150983cd24fb0d6963f7d28e17f72"
            ))
        );
    }

    #[test]
    fn sha1_of_abc() {
        assert_eq!(
            Sha1SparqlOp.evaluate(SimpleLiteralRef::new("abc")),
            Ok(Literal::new_simple_literal(
                "a9993e364706816aba3e25717850c26c9cd0d89d"
            ))
        );
    }
}
