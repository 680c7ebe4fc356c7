use crate::{EvalError, EvalResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, Term};

/// A borrowed simple literal (`xsd:string` without a language tag).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SimpleLiteralRef<'data> {
    pub value: &'data str,
}

impl<'data> SimpleLiteralRef<'data> {
    pub fn new(value: &'data str) -> Self {
        Self { value }
    }

    /// Extracts a simple literal from a term.
    pub fn from_term(term: &'data Term) -> EvalResult<Self> {
        match term {
            Term::Literal(literal)
                if literal.language().is_none() && literal.datatype() == xsd::STRING =>
            {
                Ok(Self::new(literal.value()))
            }
            _ => EvalError::expected(),
        }
    }
}

/// A borrowed string literal: a simple literal or a language-tagged string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringLiteralRef<'data> {
    pub value: &'data str,
    pub language: Option<&'data str>,
}

impl<'data> StringLiteralRef<'data> {
    pub fn new(value: &'data str, language: Option<&'data str>) -> Self {
        Self { value, language }
    }

    /// Extracts a string literal from a term.
    pub fn from_term(term: &'data Term) -> EvalResult<Self> {
        match term {
            Term::Literal(literal) => match literal.language() {
                Some(language) => Ok(Self::new(literal.value(), Some(language))),
                None if literal.datatype() == xsd::STRING => Ok(Self::new(literal.value(), None)),
                None => EvalError::expected(),
            },
            _ => EvalError::expected(),
        }
    }

    /// Creates a new literal with the same language tag and a different value.
    pub fn with_value(self, value: impl Into<String>) -> Literal {
        match self.language {
            Some(language) => Literal::new_language_tagged_literal_unchecked(value, language),
            None => Literal::new_simple_literal(value),
        }
    }
}

/// Arguments of the binary string functions (`STRSTARTS`, `CONTAINS`, `STRBEFORE`, ...) that
/// passed the argument compatibility rules.
///
/// Two arguments are compatible if both are simple literals, if both have the same language tag,
/// or if the first one has a language tag and the second one is a simple literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompatibleStringArgs<'data> {
    pub lhs: &'data str,
    pub rhs: &'data str,
    pub language: Option<&'data str>,
}

impl<'data> CompatibleStringArgs<'data> {
    pub fn try_from(
        lhs: StringLiteralRef<'data>,
        rhs: StringLiteralRef<'data>,
    ) -> EvalResult<Self> {
        let is_compatible = match (lhs.language, rhs.language) {
            (None | Some(_), None) => true,
            (Some(lhs), Some(rhs)) => lhs == rhs,
            (None, Some(_)) => false,
        };

        if !is_compatible {
            return EvalError::expected();
        }

        Ok(Self {
            lhs: lhs.value,
            rhs: rhs.value,
            language: lhs.language,
        })
    }

    /// Creates a literal carrying the language tag of the arguments.
    pub fn result(&self, value: impl Into<String>) -> Literal {
        StringLiteralRef::new(self.lhs, self.language).with_value(value)
    }
}
