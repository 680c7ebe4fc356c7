use crate::UnarySparqlOp;
use rdf_algebra_model::{EvalResult, Literal, StringLiteralRef};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct EncodeForUriSparqlOp;

impl UnarySparqlOp for EncodeForUriSparqlOp {
    type Arg<'data> = StringLiteralRef<'data>;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let mut result = String::with_capacity(value.value.len());
        for c in value.value.bytes() {
            match c {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    result.push(char::from(c));
                }
                _ => {
                    // Writing into a String never fails.
                    let _ = write!(result, "%{c:02X}");
                }
            }
        }
        Ok(Literal::new_simple_literal(result))
    }
}
