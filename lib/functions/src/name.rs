use rdf_algebra_model::NamedNode;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Identifier for a function. Either it is a SPARQL builtin or a function identified by an IRI
/// (e.g., an XSD cast such as `xsd:integer`).
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum FunctionName {
    /// A SPARQL builtin function.
    Builtin(BuiltinName),
    /// A function identified by an IRI.
    Custom(NamedNode),
}

impl Display for FunctionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionName::Builtin(builtin) => builtin.fmt(f),
            FunctionName::Custom(name) => name.fmt(f),
        }
    }
}

/// The SPARQL builtin functions that are called by name.
///
/// Operators (`=`, `+`, `&&`, ...) and functional forms (`BOUND`, `IF`, `COALESCE`, ...) are
/// separate expression kinds and not listed here.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BuiltinName {
    Str,
    Lang,
    LangMatches,
    Datatype,
    Iri,
    BNode,
    Rand,
    Abs,
    Ceil,
    Floor,
    Round,
    Concat,
    SubStr,
    StrLen,
    Replace,
    UCase,
    LCase,
    EncodeForUri,
    Contains,
    StrStarts,
    StrEnds,
    StrBefore,
    StrAfter,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,
    Now,
    Uuid,
    StrUuid,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    StrLang,
    StrDt,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Regex,
}

const ALL_BUILTINS: [BuiltinName; 46] = [
    BuiltinName::Str,
    BuiltinName::Lang,
    BuiltinName::LangMatches,
    BuiltinName::Datatype,
    BuiltinName::Iri,
    BuiltinName::BNode,
    BuiltinName::Rand,
    BuiltinName::Abs,
    BuiltinName::Ceil,
    BuiltinName::Floor,
    BuiltinName::Round,
    BuiltinName::Concat,
    BuiltinName::SubStr,
    BuiltinName::StrLen,
    BuiltinName::Replace,
    BuiltinName::UCase,
    BuiltinName::LCase,
    BuiltinName::EncodeForUri,
    BuiltinName::Contains,
    BuiltinName::StrStarts,
    BuiltinName::StrEnds,
    BuiltinName::StrBefore,
    BuiltinName::StrAfter,
    BuiltinName::Year,
    BuiltinName::Month,
    BuiltinName::Day,
    BuiltinName::Hours,
    BuiltinName::Minutes,
    BuiltinName::Seconds,
    BuiltinName::Timezone,
    BuiltinName::Tz,
    BuiltinName::Now,
    BuiltinName::Uuid,
    BuiltinName::StrUuid,
    BuiltinName::Md5,
    BuiltinName::Sha1,
    BuiltinName::Sha256,
    BuiltinName::Sha384,
    BuiltinName::Sha512,
    BuiltinName::StrLang,
    BuiltinName::StrDt,
    BuiltinName::IsIri,
    BuiltinName::IsBlank,
    BuiltinName::IsLiteral,
    BuiltinName::IsNumeric,
    BuiltinName::Regex,
];

impl BuiltinName {
    /// The name used in the textual form of the algebra.
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinName::Str => "str",
            BuiltinName::Lang => "lang",
            BuiltinName::LangMatches => "langMatches",
            BuiltinName::Datatype => "datatype",
            BuiltinName::Iri => "iri",
            BuiltinName::BNode => "bnode",
            BuiltinName::Rand => "rand",
            BuiltinName::Abs => "abs",
            BuiltinName::Ceil => "ceil",
            BuiltinName::Floor => "floor",
            BuiltinName::Round => "round",
            BuiltinName::Concat => "concat",
            BuiltinName::SubStr => "substr",
            BuiltinName::StrLen => "strlen",
            BuiltinName::Replace => "replace",
            BuiltinName::UCase => "ucase",
            BuiltinName::LCase => "lcase",
            BuiltinName::EncodeForUri => "encode_for_uri",
            BuiltinName::Contains => "contains",
            BuiltinName::StrStarts => "strstarts",
            BuiltinName::StrEnds => "strends",
            BuiltinName::StrBefore => "strbefore",
            BuiltinName::StrAfter => "strafter",
            BuiltinName::Year => "year",
            BuiltinName::Month => "month",
            BuiltinName::Day => "day",
            BuiltinName::Hours => "hours",
            BuiltinName::Minutes => "minutes",
            BuiltinName::Seconds => "seconds",
            BuiltinName::Timezone => "timezone",
            BuiltinName::Tz => "tz",
            BuiltinName::Now => "now",
            BuiltinName::Uuid => "uuid",
            BuiltinName::StrUuid => "struuid",
            BuiltinName::Md5 => "md5",
            BuiltinName::Sha1 => "sha1",
            BuiltinName::Sha256 => "sha256",
            BuiltinName::Sha384 => "sha384",
            BuiltinName::Sha512 => "sha512",
            BuiltinName::StrLang => "strlang",
            BuiltinName::StrDt => "strdt",
            BuiltinName::IsIri => "isIRI",
            BuiltinName::IsBlank => "isBlank",
            BuiltinName::IsLiteral => "isLiteral",
            BuiltinName::IsNumeric => "isNumeric",
            BuiltinName::Regex => "regex",
        }
    }

    /// The minimum and maximum number of arguments. [None] means unbounded.
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            BuiltinName::Rand | BuiltinName::Now | BuiltinName::Uuid | BuiltinName::StrUuid => {
                (0, Some(0))
            }
            BuiltinName::BNode => (0, Some(1)),
            BuiltinName::Concat => (0, None),
            BuiltinName::LangMatches
            | BuiltinName::Contains
            | BuiltinName::StrStarts
            | BuiltinName::StrEnds
            | BuiltinName::StrBefore
            | BuiltinName::StrAfter
            | BuiltinName::StrLang
            | BuiltinName::StrDt => (2, Some(2)),
            BuiltinName::SubStr | BuiltinName::Regex => (2, Some(3)),
            BuiltinName::Replace => (3, Some(4)),
            _ => (1, Some(1)),
        }
    }

    /// Whether two calls with the same arguments may yield different results.
    pub fn is_volatile(self) -> bool {
        matches!(
            self,
            BuiltinName::Rand
                | BuiltinName::Now
                | BuiltinName::Uuid
                | BuiltinName::StrUuid
                | BuiltinName::BNode
        )
    }
}

impl Display for BuiltinName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing the name of an unknown builtin.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown builtin function '{0}'")]
pub struct UnknownFunctionError(pub String);

impl FromStr for BuiltinName {
    type Err = UnknownFunctionError;

    /// Parses a builtin name. Case-insensitive, `uri` and `isURI` are accepted as aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowercase = name.to_ascii_lowercase();
        match lowercase.as_str() {
            "uri" => return Ok(BuiltinName::Iri),
            "isuri" => return Ok(BuiltinName::IsIri),
            _ => {}
        }
        ALL_BUILTINS
            .into_iter()
            .find(|builtin| builtin.as_str().eq_ignore_ascii_case(&lowercase))
            .ok_or_else(|| UnknownFunctionError(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for builtin in ALL_BUILTINS {
            assert_eq!(builtin.as_str().parse::<BuiltinName>(), Ok(builtin));
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("LANGMATCHES".parse(), Ok(BuiltinName::LangMatches));
        assert_eq!("isUri".parse(), Ok(BuiltinName::IsIri));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("frobnicate".parse::<BuiltinName>().is_err());
    }
}
