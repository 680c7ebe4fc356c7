use rdf_algebra_model::NamedNode;
use std::fmt::{Display, Formatter};

/// A property path expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    Link(NamedNode),
    Inverse(Box<PropertyPath>),
    Sequence(Box<PropertyPath>, Box<PropertyPath>),
    Alternative(Box<PropertyPath>, Box<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
    /// Matches any link whose predicate is not one of the forward members and any reversed link
    /// whose predicate is not one of the inverse members.
    NegatedPropertySet(Vec<NegatedMember>),
}

impl PropertyPath {
    pub fn inverse(inner: PropertyPath) -> Self {
        Self::Inverse(Box::new(inner))
    }

    pub fn sequence(lhs: PropertyPath, rhs: PropertyPath) -> Self {
        Self::Sequence(Box::new(lhs), Box::new(rhs))
    }

    pub fn alternative(lhs: PropertyPath, rhs: PropertyPath) -> Self {
        Self::Alternative(Box::new(lhs), Box::new(rhs))
    }
}

impl From<NamedNode> for PropertyPath {
    fn from(value: NamedNode) -> Self {
        Self::Link(value)
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyPath::Link(node) => node.fmt(f),
            PropertyPath::Inverse(inner) => write!(f, "(reverse {inner})"),
            PropertyPath::Sequence(lhs, rhs) => write!(f, "(seq {lhs} {rhs})"),
            PropertyPath::Alternative(lhs, rhs) => write!(f, "(alt {lhs} {rhs})"),
            PropertyPath::ZeroOrMore(inner) => write!(f, "(path* {inner})"),
            PropertyPath::OneOrMore(inner) => write!(f, "(path+ {inner})"),
            PropertyPath::ZeroOrOne(inner) => write!(f, "(path? {inner})"),
            PropertyPath::NegatedPropertySet(members) => {
                f.write_str("(notoneof")?;
                for member in members {
                    write!(f, " {member}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A member of a negated property set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NegatedMember {
    Forward(NamedNode),
    Inverse(NamedNode),
}

impl Display for NegatedMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NegatedMember::Forward(node) => node.fmt(f),
            NegatedMember::Inverse(node) => write!(f, "(reverse {node})"),
        }
    }
}
