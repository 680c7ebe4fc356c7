use crate::{BinarySparqlOp, QuaternarySparqlOp, TernarySparqlOp};
use regex::{Regex, RegexBuilder};
use rdf_algebra_model::{EvalError, EvalResult, Literal, SimpleLiteralRef, StringLiteralRef};
use std::borrow::Cow;

const REGEX_SIZE_LIMIT: usize = 1_000_000;

#[derive(Debug, Default)]
pub struct RegexSparqlOp;

impl BinarySparqlOp for RegexSparqlOp {
    type ArgLhs<'data> = StringLiteralRef<'data>;
    type ArgRhs<'data> = SimpleLiteralRef<'data>;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        text: Self::ArgLhs<'data>,
        pattern: Self::ArgRhs<'data>,
    ) -> EvalResult<Self::Result> {
        let regex = compile_pattern(pattern.value, None)?;
        Ok(regex.is_match(text.value))
    }
}

impl TernarySparqlOp for RegexSparqlOp {
    type Arg0<'data> = StringLiteralRef<'data>;
    type Arg1<'data> = SimpleLiteralRef<'data>;
    type Arg2<'data> = SimpleLiteralRef<'data>;
    type Result = bool;

    fn evaluate<'data>(
        &self,
        text: Self::Arg0<'data>,
        pattern: Self::Arg1<'data>,
        flags: Self::Arg2<'data>,
    ) -> EvalResult<Self::Result> {
        let regex = compile_pattern(pattern.value, Some(flags.value))?;
        Ok(regex.is_match(text.value))
    }
}

/// `REPLACE`: the result keeps the language tag of the input.
#[derive(Debug, Default)]
pub struct ReplaceSparqlOp;

impl TernarySparqlOp for ReplaceSparqlOp {
    type Arg0<'data> = StringLiteralRef<'data>;
    type Arg1<'data> = SimpleLiteralRef<'data>;
    type Arg2<'data> = SimpleLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        text: Self::Arg0<'data>,
        pattern: Self::Arg1<'data>,
        replacement: Self::Arg2<'data>,
    ) -> EvalResult<Self::Result> {
        replace(text, pattern, replacement, None)
    }
}

impl QuaternarySparqlOp for ReplaceSparqlOp {
    type Arg0<'data> = StringLiteralRef<'data>;
    type Arg1<'data> = SimpleLiteralRef<'data>;
    type Arg2<'data> = SimpleLiteralRef<'data>;
    type Arg3<'data> = SimpleLiteralRef<'data>;
    type Result = Literal;

    fn evaluate<'data>(
        &self,
        text: Self::Arg0<'data>,
        pattern: Self::Arg1<'data>,
        replacement: Self::Arg2<'data>,
        flags: Self::Arg3<'data>,
    ) -> EvalResult<Self::Result> {
        replace(text, pattern, replacement, Some(flags.value))
    }
}

fn replace(
    text: StringLiteralRef<'_>,
    pattern: SimpleLiteralRef<'_>,
    replacement: SimpleLiteralRef<'_>,
    flags: Option<&str>,
) -> EvalResult<Literal> {
    let regex = compile_pattern(pattern.value, flags)?;
    let result = match regex.replace_all(text.value, replacement.value) {
        Cow::Owned(replaced) => replaced,
        Cow::Borrowed(_) => text.value.to_owned(),
    };
    Ok(text.with_value(result))
}

/// Compiles a pattern with the XPath flags `s`, `m`, `i`, `x` and `q`. Unknown flags are an error.
pub(crate) fn compile_pattern(pattern: &str, flags: Option<&str>) -> EvalResult<Regex> {
    let mut pattern = Cow::Borrowed(pattern);
    let flags = flags.unwrap_or_default();
    if flags.contains('q') {
        pattern = regex::escape(&pattern).into();
    }
    let mut regex_builder = RegexBuilder::new(&pattern);
    regex_builder.size_limit(REGEX_SIZE_LIMIT);
    for flag in flags.chars() {
        match flag {
            's' => {
                regex_builder.dot_matches_new_line(true);
            }
            'm' => {
                regex_builder.multi_line(true);
            }
            'i' => {
                regex_builder.case_insensitive(true);
            }
            'x' => {
                regex_builder.ignore_whitespace(true);
            }
            'q' => (),
            _ => return EvalError::expected(),
        }
    }
    regex_builder.build().map_err(|_| EvalError {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_with_case_insensitive_flag() {
        let result = TernarySparqlOp::evaluate(
            &RegexSparqlOp,
            StringLiteralRef::new("Alice", None),
            SimpleLiteralRef::new("^ali"),
            SimpleLiteralRef::new("i"),
        );
        assert_eq!(result, Ok(true));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let result = TernarySparqlOp::evaluate(
            &RegexSparqlOp,
            StringLiteralRef::new("Alice", None),
            SimpleLiteralRef::new("^ali"),
            SimpleLiteralRef::new("z"),
        );
        assert_eq!(result, EvalError::expected());
    }

    #[test]
    fn replace_with_group_reference() {
        let result = TernarySparqlOp::evaluate(
            &ReplaceSparqlOp,
            StringLiteralRef::new("abcd", Some("en")),
            SimpleLiteralRef::new("(b)(c)"),
            SimpleLiteralRef::new("$2$1"),
        );
        assert_eq!(
            result,
            Ok(Literal::new_language_tagged_literal_unchecked("acbd", "en"))
        );
    }

    #[test]
    fn quoted_pattern_is_literal() {
        let result = TernarySparqlOp::evaluate(
            &RegexSparqlOp,
            StringLiteralRef::new("a.c", None),
            SimpleLiteralRef::new("."),
            SimpleLiteralRef::new("q"),
        );
        assert_eq!(result, Ok(true));
    }
}
