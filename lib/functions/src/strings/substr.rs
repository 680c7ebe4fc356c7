use crate::{BinarySparqlOp, TernarySparqlOp, UnarySparqlOp};
use rdf_algebra_model::{EvalResult, Integer, Literal, StringLiteralRef};

#[derive(Debug, Default)]
pub struct StrLenSparqlOp;

impl UnarySparqlOp for StrLenSparqlOp {
    type Arg<'data> = StringLiteralRef<'data>;
    type Result = Integer;

    fn evaluate(&self, value: Self::Arg<'_>) -> EvalResult<Self::Result> {
        let length = i64::try_from(value.value.chars().count())?;
        Ok(Integer::from(length))
    }
}

/// `SUBSTR` with the character positions of `fn:substring` (1-based, start and length may reach
/// outside the string).
#[derive(Debug, Default)]
pub struct SubStrSparqlOp;

impl BinarySparqlOp for SubStrSparqlOp {
    type ArgLhs<'data> = StringLiteralRef<'data>;
    type ArgRhs<'data> = Integer;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        lhs: Self::ArgLhs<'data>,
        rhs: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        Ok(evaluate_substr(lhs, rhs, None))
    }
}

impl TernarySparqlOp for SubStrSparqlOp {
    type Arg0<'data> = StringLiteralRef<'data>;
    type Arg1<'data> = Integer;
    type Arg2<'data> = Integer;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        arg0: Self::Arg0<'data>,
        arg1: Self::Arg1<'data>,
        arg2: Self::Arg2<'data>,
    ) -> EvalResult<Self::Result> {
        Ok(evaluate_substr(arg0, arg1, Some(arg2)))
    }
}

fn evaluate_substr(
    source: StringLiteralRef<'_>,
    starting_loc: Integer,
    length: Option<Integer>,
) -> Literal {
    let start = i64::from_be_bytes(starting_loc.to_be_bytes());
    let end = length.map(|length| start.saturating_add(i64::from_be_bytes(length.to_be_bytes())));

    // Positions are counted in characters, not bytes.
    let result = source
        .value
        .chars()
        .zip(1_i64..)
        .filter(|(_, position)| *position >= start && end.map_or(true, |end| *position < end))
        .map(|(c, _)| c)
        .collect::<String>();
    source.with_value(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substr(value: &str, start: i64, length: Option<i64>) -> Literal {
        evaluate_substr(
            StringLiteralRef::new(value, None),
            start.into(),
            length.map(Integer::from),
        )
    }

    #[test]
    fn substr_uses_character_positions() {
        assert_eq!(substr("bär", 2, Some(1)), Literal::new_simple_literal("ä"));
        assert_eq!(substr("foobar", 4, None), Literal::new_simple_literal("bar"));
    }

    #[test]
    fn substr_with_start_before_the_string() {
        assert_eq!(substr("12345", 0, Some(3)), Literal::new_simple_literal("12"));
        assert_eq!(substr("12345", -3, Some(5)), Literal::new_simple_literal("1"));
    }

    #[test]
    fn strlen_counts_characters() {
        let result = StrLenSparqlOp
            .evaluate(StringLiteralRef::new("chat😀", Some("fr")))
            .unwrap();
        assert_eq!(result, Integer::from(5_i64));
    }
}
