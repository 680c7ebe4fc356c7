use crate::pattern::QuadPattern;
use crate::query::QueryDataset;
use crate::Algebra;
use rdf_algebra_model::{GraphName, Iri, NamedNode, Quad};
use std::fmt::{Display, Formatter};

/// A sequence of update operations, executed in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub operations: Vec<UpdateOperation>,
    pub base_iri: Option<Iri<String>>,
}

impl Display for Update {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(base_iri) = &self.base_iri {
            write!(f, "(base <{base_iri}> ")?;
        }
        f.write_str("(update")?;
        for operation in &self.operations {
            write!(f, "\n  {operation}")?;
        }
        f.write_str(")")?;
        if self.base_iri.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A single update operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOperation {
    /// Fetches a document and inserts its triples into `destination`.
    Load {
        silent: bool,
        source: NamedNode,
        destination: GraphName,
    },
    Clear {
        silent: bool,
        graph: GraphTarget,
    },
    Create {
        silent: bool,
        graph: NamedNode,
    },
    Drop {
        silent: bool,
        graph: GraphTarget,
    },
    /// Inserts all triples of `from` into `to`.
    Add {
        silent: bool,
        from: GraphName,
        to: GraphName,
    },
    /// Replaces the content of `to` by the content of `from` and removes `from`.
    Move {
        silent: bool,
        from: GraphName,
        to: GraphName,
    },
    /// Replaces the content of `to` by the content of `from`.
    Copy {
        silent: bool,
        from: GraphName,
        to: GraphName,
    },
    InsertData {
        data: Vec<Quad>,
    },
    DeleteData {
        data: Vec<Quad>,
    },
    /// Evaluates `pattern` and, for each solution, removes the instantiated `delete` templates
    /// before adding the instantiated `insert` templates.
    DeleteInsert {
        delete: Vec<QuadPattern>,
        insert: Vec<QuadPattern>,
        pattern: Box<Algebra>,
    },
    /// Makes `graph` the default graph of the inner operation, for its templates and its
    /// pattern.
    With {
        graph: NamedNode,
        operation: Box<UpdateOperation>,
    },
    /// Evaluates the pattern of the inner operation against `dataset`.
    Using {
        dataset: QueryDataset,
        operation: Box<UpdateOperation>,
    },
}

impl UpdateOperation {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateOperation::Load { .. } => "load",
            UpdateOperation::Clear { .. } => "clear",
            UpdateOperation::Create { .. } => "create",
            UpdateOperation::Drop { .. } => "drop",
            UpdateOperation::Add { .. } => "add",
            UpdateOperation::Move { .. } => "move",
            UpdateOperation::Copy { .. } => "copy",
            UpdateOperation::InsertData { .. } => "insertData",
            UpdateOperation::DeleteData { .. } => "deleteData",
            UpdateOperation::DeleteInsert { .. } => "modify",
            UpdateOperation::With { .. } => "with",
            UpdateOperation::Using { .. } => "using",
        }
    }
}

impl Display for UpdateOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.name())?;
        match self {
            UpdateOperation::Load {
                silent,
                source,
                destination,
            } => {
                write_silent(f, *silent)?;
                write!(f, " {source}")?;
                if let GraphName::NamedNode(destination) = destination {
                    write!(f, " {destination}")?;
                }
            }
            UpdateOperation::Clear { silent, graph } | UpdateOperation::Drop { silent, graph } => {
                write_silent(f, *silent)?;
                write!(f, " {graph}")?;
            }
            UpdateOperation::Create { silent, graph } => {
                write_silent(f, *silent)?;
                write!(f, " {graph}")?;
            }
            UpdateOperation::Add { silent, from, to }
            | UpdateOperation::Move { silent, from, to }
            | UpdateOperation::Copy { silent, from, to } => {
                write_silent(f, *silent)?;
                write!(f, " {} {}", GraphArg(from), GraphArg(to))?;
            }
            UpdateOperation::InsertData { data } | UpdateOperation::DeleteData { data } => {
                for quad in data {
                    let quad = QuadPattern {
                        subject: quad.subject.clone().into(),
                        predicate: quad.predicate.clone().into(),
                        object: quad.object.clone().into(),
                        graph_name: quad.graph_name.clone().into(),
                    };
                    write!(f, " {quad}")?;
                }
            }
            UpdateOperation::DeleteInsert {
                delete,
                insert,
                pattern,
            } => {
                for (name, templates) in [("delete", delete), ("insert", insert)] {
                    if templates.is_empty() {
                        continue;
                    }
                    write!(f, " ({name}")?;
                    for template in templates {
                        write!(f, " {template}")?;
                    }
                    f.write_str(")")?;
                }
                f.write_str("\n    ")?;
                crate::sse::write_algebra(f, pattern, Some(2))?;
            }
            UpdateOperation::With { graph, operation } => {
                write!(f, " {graph} {operation}")?;
            }
            UpdateOperation::Using { dataset, operation } => {
                f.write_str(" (")?;
                for (i, graph) in dataset.default.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", GraphArg(graph))?;
                }
                f.write_str(")")?;
                if let Some(named) = &dataset.named {
                    f.write_str(" (named")?;
                    for graph in named {
                        write!(f, " {graph}")?;
                    }
                    f.write_str(")")?;
                }
                write!(f, " {operation}")?;
            }
        }
        f.write_str(")")
    }
}

fn write_silent(f: &mut Formatter<'_>, silent: bool) -> std::fmt::Result {
    if silent {
        f.write_str(" silent")?;
    }
    Ok(())
}

struct GraphArg<'a>(&'a GraphName);

impl Display for GraphArg<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            GraphName::DefaultGraph => f.write_str("default"),
            other => other.fmt(f),
        }
    }
}

/// The graphs affected by `CLEAR` and `DROP`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphTarget {
    NamedNode(NamedNode),
    DefaultGraph,
    NamedGraphs,
    AllGraphs,
}

impl Display for GraphTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphTarget::NamedNode(node) => node.fmt(f),
            GraphTarget::DefaultGraph => f.write_str("default"),
            GraphTarget::NamedGraphs => f.write_str("named"),
            GraphTarget::AllGraphs => f.write_str("all"),
        }
    }
}
