use crate::pattern::write_term;
use crate::Algebra;
use rdf_algebra_functions::FunctionName;
use rdf_algebra_model::{Literal, NamedNode, Term, Variable};
use std::fmt::{Display, Formatter};

/// An expression of a filter, an extension, an aggregate or an ordering key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    Variable(Variable),
    Term(Term),
    Or(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    SameTerm(Box<Expression>, Box<Expression>),
    Greater(Box<Expression>, Box<Expression>),
    GreaterOrEqual(Box<Expression>, Box<Expression>),
    Less(Box<Expression>, Box<Expression>),
    LessOrEqual(Box<Expression>, Box<Expression>),
    In(Box<Expression>, Vec<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    UnaryPlus(Box<Expression>),
    UnaryMinus(Box<Expression>),
    Bound(Variable),
    If(Box<Expression>, Box<Expression>, Box<Expression>),
    Coalesce(Vec<Expression>),
    /// Evaluates the pattern with the current solution as pre-bound bindings.
    Exists(Box<Algebra>),
    FunctionCall(FunctionName, Vec<Expression>),
}

impl Expression {
    pub fn and(lhs: Expression, rhs: Expression) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn not(inner: Expression) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Returns the constant value of the expression, if it is a constant.
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Expression::Term(term) => Some(term),
            _ => None,
        }
    }

    /// Returns the direct subexpressions.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Variable(_)
            | Expression::Term(_)
            | Expression::Bound(_)
            | Expression::Exists(_) => Vec::new(),
            Expression::Not(inner)
            | Expression::UnaryPlus(inner)
            | Expression::UnaryMinus(inner) => {
                vec![inner.as_ref()]
            }
            Expression::Or(lhs, rhs)
            | Expression::And(lhs, rhs)
            | Expression::Equal(lhs, rhs)
            | Expression::NotEqual(lhs, rhs)
            | Expression::SameTerm(lhs, rhs)
            | Expression::Greater(lhs, rhs)
            | Expression::GreaterOrEqual(lhs, rhs)
            | Expression::Less(lhs, rhs)
            | Expression::LessOrEqual(lhs, rhs)
            | Expression::Add(lhs, rhs)
            | Expression::Subtract(lhs, rhs)
            | Expression::Multiply(lhs, rhs)
            | Expression::Divide(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Expression::In(lhs, list) => std::iter::once(lhs.as_ref()).chain(list).collect(),
            Expression::If(test, if_true, if_false) => {
                vec![test.as_ref(), if_true.as_ref(), if_false.as_ref()]
            }
            Expression::Coalesce(args) | Expression::FunctionCall(_, args) => args.iter().collect(),
        }
    }
}

impl From<Variable> for Expression {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Term> for Expression {
    fn from(value: Term) -> Self {
        Self::Term(value)
    }
}

impl From<NamedNode> for Expression {
    fn from(value: NamedNode) -> Self {
        Self::Term(value.into())
    }
}

impl From<Literal> for Expression {
    fn from(value: Literal) -> Self {
        Self::Term(value.into())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Variable(variable) => variable.fmt(f),
            Expression::Term(term) => write_term(f, term),
            Expression::Or(lhs, rhs) => write!(f, "(|| {lhs} {rhs})"),
            Expression::And(lhs, rhs) => write!(f, "(&& {lhs} {rhs})"),
            Expression::Not(inner) => match inner.as_ref() {
                Expression::In(lhs, list) => write_call(f, "notin", Some(lhs.as_ref()), list),
                Expression::Exists(pattern) => write!(f, "(notexists {})", Inline(pattern)),
                inner => write!(f, "(! {inner})"),
            },
            Expression::Equal(lhs, rhs) => write!(f, "(= {lhs} {rhs})"),
            Expression::NotEqual(lhs, rhs) => write!(f, "(!= {lhs} {rhs})"),
            Expression::SameTerm(lhs, rhs) => write!(f, "(sameTerm {lhs} {rhs})"),
            Expression::Greater(lhs, rhs) => write!(f, "(> {lhs} {rhs})"),
            Expression::GreaterOrEqual(lhs, rhs) => write!(f, "(>= {lhs} {rhs})"),
            Expression::Less(lhs, rhs) => write!(f, "(< {lhs} {rhs})"),
            Expression::LessOrEqual(lhs, rhs) => write!(f, "(<= {lhs} {rhs})"),
            Expression::In(lhs, list) => write_call(f, "in", Some(lhs.as_ref()), list),
            Expression::Add(lhs, rhs) => write!(f, "(+ {lhs} {rhs})"),
            Expression::Subtract(lhs, rhs) => write!(f, "(- {lhs} {rhs})"),
            Expression::Multiply(lhs, rhs) => write!(f, "(* {lhs} {rhs})"),
            Expression::Divide(lhs, rhs) => write!(f, "(/ {lhs} {rhs})"),
            Expression::UnaryPlus(inner) => write!(f, "(+ {inner})"),
            Expression::UnaryMinus(inner) => write!(f, "(- {inner})"),
            Expression::Bound(variable) => write!(f, "(bound {variable})"),
            Expression::If(test, if_true, if_false) => {
                write!(f, "(if {test} {if_true} {if_false})")
            }
            Expression::Coalesce(args) => write_call(f, "coalesce", None, args),
            Expression::Exists(pattern) => write!(f, "(exists {})", Inline(pattern)),
            Expression::FunctionCall(name, args) => write_call(f, &name.to_string(), None, args),
        }
    }
}

fn write_call(
    f: &mut Formatter<'_>,
    name: &str,
    first: Option<&Expression>,
    args: &[Expression],
) -> std::fmt::Result {
    write!(f, "({name}")?;
    for arg in first.into_iter().chain(args) {
        write!(f, " {arg}")?;
    }
    f.write_str(")")
}

/// Writes a pattern inside an expression on a single line.
struct Inline<'a>(&'a Algebra);

impl Display for Inline<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::sse::write_algebra(f, self.0, None)
    }
}
