use rdf_algebra_model::vocab::xsd;
use rdf_algebra_model::{BlankNode, GraphName, Literal, NamedNode, Subject, Term, Variable};
use std::fmt::{Display, Formatter};

/// Returns the non-distinguished variable that stands for a blank node of a pattern.
///
/// Blank nodes in patterns behave like variables whose bindings are not reported. The label is
/// kept in the name so that two occurrences of the same label join.
pub fn blank_node_variable(node: &BlankNode) -> Variable {
    Variable::non_distinguished(format!("_:{}", node.as_str()))
}

/// A subject or object position of a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermPattern {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
}

impl TermPattern {
    /// Returns the variable of this position. Blank nodes yield their non-distinguished
    /// variable.
    pub fn to_variable(&self) -> Option<Variable> {
        match self {
            TermPattern::Variable(variable) => Some(variable.clone()),
            TermPattern::BlankNode(node) => Some(blank_node_variable(node)),
            TermPattern::NamedNode(_) | TermPattern::Literal(_) => None,
        }
    }

    /// Returns the constant term of this position, if any.
    pub fn to_term(&self) -> Option<Term> {
        match self {
            TermPattern::NamedNode(node) => Some(node.clone().into()),
            TermPattern::Literal(literal) => Some(literal.clone().into()),
            TermPattern::BlankNode(_) | TermPattern::Variable(_) => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, TermPattern::NamedNode(_) | TermPattern::Literal(_))
    }
}

impl From<NamedNode> for TermPattern {
    fn from(value: NamedNode) -> Self {
        Self::NamedNode(value)
    }
}

impl From<BlankNode> for TermPattern {
    fn from(value: BlankNode) -> Self {
        Self::BlankNode(value)
    }
}

impl From<Literal> for TermPattern {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Variable> for TermPattern {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Subject> for TermPattern {
    fn from(value: Subject) -> Self {
        match value {
            Subject::NamedNode(node) => node.into(),
            Subject::BlankNode(node) => node.into(),
        }
    }
}

impl From<Term> for TermPattern {
    fn from(value: Term) -> Self {
        match value {
            Term::NamedNode(node) => node.into(),
            Term::BlankNode(node) => node.into(),
            Term::Literal(literal) => literal.into(),
        }
    }
}

impl Display for TermPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TermPattern::NamedNode(node) => node.fmt(f),
            TermPattern::BlankNode(node) => node.fmt(f),
            TermPattern::Literal(literal) => write_literal(f, literal),
            TermPattern::Variable(variable) => variable.fmt(f),
        }
    }
}

/// The predicate position of a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamedNodePattern {
    NamedNode(NamedNode),
    Variable(Variable),
}

impl NamedNodePattern {
    pub fn is_constant(&self) -> bool {
        matches!(self, NamedNodePattern::NamedNode(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            NamedNodePattern::Variable(variable) => Some(variable),
            NamedNodePattern::NamedNode(_) => None,
        }
    }
}

impl From<NamedNode> for NamedNodePattern {
    fn from(value: NamedNode) -> Self {
        Self::NamedNode(value)
    }
}

impl From<Variable> for NamedNodePattern {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl Display for NamedNodePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NamedNodePattern::NamedNode(node) => node.fmt(f),
            NamedNodePattern::Variable(variable) => variable.fmt(f),
        }
    }
}

/// A triple pattern of a basic graph pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: NamedNodePattern,
    pub object: TermPattern,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<TermPattern>,
        predicate: impl Into<NamedNodePattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns the variables of the pattern, including the ones standing for blank nodes.
    pub fn variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        for variable in [
            self.subject.to_variable(),
            self.predicate.as_variable().cloned(),
            self.object.to_variable(),
        ]
        .into_iter()
        .flatten()
        {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }
        result
    }

    /// Returns the blank nodes of the pattern.
    pub fn blank_nodes(&self) -> impl Iterator<Item = &BlankNode> {
        [&self.subject, &self.object]
            .into_iter()
            .filter_map(|position| match position {
                TermPattern::BlankNode(node) => Some(node),
                _ => None,
            })
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(triple {} {} {})", self.subject, self.predicate, self.object)
    }
}

/// The graph position of an update template.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphNamePattern {
    DefaultGraph,
    NamedNode(NamedNode),
    Variable(Variable),
}

impl From<GraphName> for GraphNamePattern {
    fn from(value: GraphName) -> Self {
        match value {
            GraphName::NamedNode(node) => Self::NamedNode(node),
            GraphName::BlankNode(node) => Self::Variable(blank_node_variable(&node)),
            GraphName::DefaultGraph => Self::DefaultGraph,
        }
    }
}

/// A quad template of an update operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuadPattern {
    pub subject: TermPattern,
    pub predicate: NamedNodePattern,
    pub object: TermPattern,
    pub graph_name: GraphNamePattern,
}

impl QuadPattern {
    pub fn in_default_graph(triple: TriplePattern) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            graph_name: GraphNamePattern::DefaultGraph,
        }
    }
}

impl Display for QuadPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.graph_name {
            GraphNamePattern::DefaultGraph => write!(
                f,
                "(triple {} {} {})",
                self.subject, self.predicate, self.object
            ),
            GraphNamePattern::NamedNode(node) => write!(
                f,
                "(quad {node} {} {} {})",
                self.subject, self.predicate, self.object
            ),
            GraphNamePattern::Variable(variable) => write!(
                f,
                "(quad {variable} {} {} {})",
                self.subject, self.predicate, self.object
            ),
        }
    }
}

/// Writes a term in SSE notation. Numbers and booleans in their canonical form are written
/// without quotes.
pub(crate) fn write_term(f: &mut Formatter<'_>, term: &Term) -> std::fmt::Result {
    match term {
        Term::Literal(literal) => write_literal(f, literal),
        other => other.fmt(f),
    }
}

fn write_literal(f: &mut Formatter<'_>, literal: &Literal) -> std::fmt::Result {
    if is_bare_literal(literal) {
        f.write_str(literal.value())
    } else {
        literal.fmt(f)
    }
}

fn is_bare_literal(literal: &Literal) -> bool {
    let value = literal.value();
    let datatype = literal.datatype();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if datatype == xsd::BOOLEAN {
        return value == "true" || value == "false";
    }
    if digits.is_empty() {
        return false;
    }
    if datatype == xsd::INTEGER {
        digits.bytes().all(|b| b.is_ascii_digit())
    } else if datatype == xsd::DECIMAL {
        match digits.split_once('.') {
            Some((int, frac)) => {
                !frac.is_empty()
                    && int.bytes().all(|b| b.is_ascii_digit())
                    && frac.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        }
    } else if datatype == xsd::DOUBLE {
        digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && digits.contains(['e', 'E'])
            && value.parse::<f64>().is_ok()
    } else {
        false
    }
}
