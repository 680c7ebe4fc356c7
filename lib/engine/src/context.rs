use crate::error::QueryEvaluationError;
use rdf_algebra_logical::QueryDataset;
use rdf_algebra_model::{GraphName, NamedOrBlankNode, Solution};
use std::fmt::Display;

/// The active graph defines which graphs partake in the pattern matching process.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveGraph {
    /// Only the default graph forms the active graph.
    #[default]
    DefaultGraph,
    /// A single named graph, e.g., inside a `GRAPH` pattern.
    NamedGraph(NamedOrBlankNode),
    /// The merge of a set of graphs (`FROM`). A triple contained in several of them is matched
    /// once.
    Union(Vec<GraphName>),
    /// The merge of all graphs of the store, including the default graph.
    AllGraphs,
}

impl Display for ActiveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveGraph::DefaultGraph => write!(f, "Default Graph"),
            ActiveGraph::NamedGraph(graph) => write!(f, "Named Graph {graph}"),
            ActiveGraph::Union(graphs) => write!(f, "Union of {graphs:?}"),
            ActiveGraph::AllGraphs => write!(f, "All Graphs"),
        }
    }
}

/// The RDF dataset a query is evaluated against.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DatasetView {
    /// The graph matched outside of `GRAPH` patterns.
    pub default_graph: ActiveGraph,
    /// The graphs `GRAPH` patterns may match. [None] means all named graphs of the store.
    pub named_graphs: Option<Vec<NamedOrBlankNode>>,
}

impl DatasetView {
    /// Builds the view of a `FROM`/`FROM NAMED` (or `USING`) clause. Without such a clause, the
    /// default graph of the store is used, or the union of all graphs if
    /// `default_graph_as_union` is set.
    pub fn new(dataset: Option<&QueryDataset>, default_graph_as_union: bool) -> Self {
        let Some(dataset) = dataset else {
            return Self {
                default_graph: if default_graph_as_union {
                    ActiveGraph::AllGraphs
                } else {
                    ActiveGraph::DefaultGraph
                },
                named_graphs: None,
            };
        };
        let default_graph = match dataset.default.as_slice() {
            [GraphName::DefaultGraph] => ActiveGraph::DefaultGraph,
            [GraphName::NamedNode(node)] => ActiveGraph::NamedGraph(node.clone().into()),
            [GraphName::BlankNode(node)] => ActiveGraph::NamedGraph(node.clone().into()),
            graphs => ActiveGraph::Union(graphs.to_vec()),
        };
        Self {
            default_graph,
            named_graphs: dataset.named.clone(),
        }
    }

    /// Whether `GRAPH <graph>` may match anything.
    pub fn allows_named_graph(&self, graph: &NamedOrBlankNode) -> bool {
        self.named_graphs
            .as_ref()
            .map_or(true, |graphs| graphs.contains(graph))
    }
}

/// The state of the evaluation of one operator.
///
/// A child context is created for every nested operator with [ExecutionContext::descend].
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    depth: usize,
    max_depth: usize,
    bindings: Solution,
    active_graph: ActiveGraph,
}

impl ExecutionContext {
    /// Creates the context of the root operator.
    pub fn new(max_depth: usize, bindings: Solution, active_graph: ActiveGraph) -> Self {
        Self {
            depth: 0,
            max_depth,
            bindings,
            active_graph,
        }
    }

    /// The number of operators above the current one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The bindings every produced solution must be compatible with. They are injected into the
    /// leaves of the tree (`EXISTS` correlation and initial bindings).
    pub fn bindings(&self) -> &Solution {
        &self.bindings
    }

    pub fn active_graph(&self) -> &ActiveGraph {
        &self.active_graph
    }

    /// Creates the context of a child operator.
    pub fn descend(&self) -> Result<Self, QueryEvaluationError> {
        if self.depth >= self.max_depth {
            return Err(QueryEvaluationError::RecursionLimit(self.max_depth));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn with_bindings(&self, bindings: Solution) -> Self {
        Self {
            bindings,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_active_graph(&self, active_graph: ActiveGraph) -> Self {
        Self {
            active_graph,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::NamedNode;

    #[test]
    fn descend_fails_past_the_maximum_depth() {
        let context = ExecutionContext::new(1, Solution::new(), ActiveGraph::DefaultGraph);
        let child = context.descend().unwrap();
        assert_eq!(child.depth(), 1);
        assert!(matches!(
            child.descend(),
            Err(QueryEvaluationError::RecursionLimit(1))
        ));
    }

    #[test]
    fn dataset_views() {
        assert_eq!(
            DatasetView::new(None, true).default_graph,
            ActiveGraph::AllGraphs
        );
        let graph = NamedNode::new_unchecked("http://e/g");
        let view = DatasetView::new(
            Some(&QueryDataset {
                default: vec![graph.clone().into()],
                named: Some(Vec::new()),
            }),
            true,
        );
        assert_eq!(
            view.default_graph,
            ActiveGraph::NamedGraph(graph.clone().into())
        );
        assert!(!view.allows_named_graph(&graph.into()));
    }
}
