use crate::pattern::{TermPattern, TriplePattern};
use crate::Algebra;
use rdf_algebra_model::{GraphName, Iri, NamedOrBlankNode};
use std::fmt::{Display, Formatter};

/// A query: an operator tree together with the form of its result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Returns the solutions of the pattern.
    Select {
        dataset: Option<QueryDataset>,
        pattern: Algebra,
        base_iri: Option<Iri<String>>,
    },
    /// Instantiates the template once per solution.
    Construct {
        template: Vec<TriplePattern>,
        dataset: Option<QueryDataset>,
        pattern: Algebra,
        base_iri: Option<Iri<String>>,
    },
    /// Returns the triples whose subject is one of the resources. Variables among the resources
    /// are replaced by their bindings. Without resources, every term bound by a solution is
    /// described.
    Describe {
        resources: Vec<TermPattern>,
        dataset: Option<QueryDataset>,
        pattern: Algebra,
        base_iri: Option<Iri<String>>,
    },
    /// Returns whether the pattern has a solution.
    Ask {
        dataset: Option<QueryDataset>,
        pattern: Algebra,
        base_iri: Option<Iri<String>>,
    },
}

impl Query {
    pub fn select(pattern: Algebra) -> Self {
        Self::Select {
            dataset: None,
            pattern,
            base_iri: None,
        }
    }

    pub fn pattern(&self) -> &Algebra {
        match self {
            Query::Select { pattern, .. }
            | Query::Construct { pattern, .. }
            | Query::Describe { pattern, .. }
            | Query::Ask { pattern, .. } => pattern,
        }
    }

    pub fn pattern_mut(&mut self) -> &mut Algebra {
        match self {
            Query::Select { pattern, .. }
            | Query::Construct { pattern, .. }
            | Query::Describe { pattern, .. }
            | Query::Ask { pattern, .. } => pattern,
        }
    }

    pub fn dataset(&self) -> Option<&QueryDataset> {
        match self {
            Query::Select { dataset, .. }
            | Query::Construct { dataset, .. }
            | Query::Describe { dataset, .. }
            | Query::Ask { dataset, .. } => dataset.as_ref(),
        }
    }

    pub fn base_iri(&self) -> Option<&Iri<String>> {
        match self {
            Query::Select { base_iri, .. }
            | Query::Construct { base_iri, .. }
            | Query::Describe { base_iri, .. }
            | Query::Ask { base_iri, .. } => base_iri.as_ref(),
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(base_iri) = self.base_iri() {
            write!(f, "(base <{base_iri}> ")?;
        }
        match self {
            Query::Select { pattern, .. } => pattern.fmt(f)?,
            Query::Ask { pattern, .. } => write!(f, "(ask\n{})", Indented(pattern))?,
            Query::Construct {
                template, pattern, ..
            } => {
                f.write_str("(construct (")?;
                for (i, triple) in template.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    triple.fmt(f)?;
                }
                write!(f, ")\n{})", Indented(pattern))?;
            }
            Query::Describe {
                resources, pattern, ..
            } => {
                f.write_str("(describe (")?;
                for (i, resource) in resources.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    resource.fmt(f)?;
                }
                write!(f, ")\n{})", Indented(pattern))?;
            }
        }
        if self.base_iri().is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

struct Indented<'a>(&'a Algebra);

impl Display for Indented<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("  ")?;
        crate::sse::write_algebra(f, self.0, Some(1))
    }
}

/// The RDF dataset of a query (`FROM` and `FROM NAMED`) or of an update (`USING`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryDataset {
    /// The graphs whose union is the default graph.
    pub default: Vec<GraphName>,
    /// The graphs available to `GRAPH` patterns. [None] means all named graphs of the store.
    pub named: Option<Vec<NamedOrBlankNode>>,
}

impl QueryDataset {
    /// A dataset whose default graph is the given graph and that leaves the named graphs
    /// untouched.
    pub fn with_default_graph(graph: GraphName) -> Self {
        Self {
            default: vec![graph],
            named: None,
        }
    }
}
