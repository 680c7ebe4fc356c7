use super::{Evaluator, Solutions};
use crate::context::{ActiveGraph, ExecutionContext};
use crate::error::QueryEvaluationError;
use rdf_algebra_common::Queryable;
use rdf_algebra_logical::pattern::{
    blank_node_variable, NamedNodePattern, TermPattern, TriplePattern,
};
use rdf_algebra_model::{
    GraphNameRef, NamedNodeRef, Solution, SubjectRef, Term, Triple, Variable,
};
use rustc_hash::FxHashSet;

/// A position of a pattern after the bindings of the current solution have been applied.
#[derive(Debug, Clone)]
pub(super) enum Position {
    Term(Term),
    Variable(Variable),
}

impl Position {
    pub(super) fn of(pattern: &TermPattern, solution: &Solution) -> Self {
        match pattern {
            TermPattern::NamedNode(node) => Self::Term(node.clone().into()),
            TermPattern::Literal(literal) => Self::Term(literal.clone().into()),
            TermPattern::BlankNode(node) => {
                Self::bound_or_free(blank_node_variable(node), solution)
            }
            TermPattern::Variable(variable) => Self::bound_or_free(variable.clone(), solution),
        }
    }

    fn of_predicate(pattern: &NamedNodePattern, solution: &Solution) -> Self {
        match pattern {
            NamedNodePattern::NamedNode(node) => Self::Term(node.clone().into()),
            NamedNodePattern::Variable(variable) => Self::bound_or_free(variable.clone(), solution),
        }
    }

    fn bound_or_free(variable: Variable, solution: &Solution) -> Self {
        match solution.get(&variable) {
            Some(term) => Self::Term(term.clone()),
            None => Self::Variable(variable),
        }
    }

    pub(super) fn term(&self) -> Option<&Term> {
        match self {
            Self::Term(term) => Some(term),
            Self::Variable(_) => None,
        }
    }

    /// Binds the position to `term`. Fails if the position is a different term or if the
    /// variable is already bound to a different term in `solution`.
    pub(super) fn bind(&self, solution: &mut Solution, term: &Term) -> bool {
        match self {
            Self::Term(expected) => expected == term,
            Self::Variable(variable) => solution.unify(variable, term),
        }
    }
}

/// Binds both ends of a matched edge. Returns [None] if they are not compatible, e.g., if both
/// ends are the same variable but the edge is not a loop.
pub(super) fn bind_ends(
    subject: &Position,
    start: &Term,
    object: &Position,
    end: &Term,
) -> Option<Solution> {
    let mut solution = Solution::new();
    (subject.bind(&mut solution, start) && object.bind(&mut solution, end)).then_some(solution)
}

impl<Q: Queryable + ?Sized> Evaluator<'_, Q> {
    /// Matches the patterns one after another, in pattern order. Blank nodes and other
    /// non-distinguished variables are removed from the result.
    pub(super) fn evaluate_bgp(
        &self,
        patterns: &[TriplePattern],
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let mut solutions = vec![context.bindings().clone()];
        for pattern in patterns {
            let mut next = Vec::new();
            for solution in &solutions {
                self.match_triple_pattern(pattern, solution, context.active_graph(), &mut next)?;
            }
            solutions = next;
            if solutions.is_empty() {
                break;
            }
        }
        for solution in &mut solutions {
            solution.remove_non_distinguished();
        }
        Ok(solutions)
    }

    fn match_triple_pattern(
        &self,
        pattern: &TriplePattern,
        solution: &Solution,
        graph: &ActiveGraph,
        output: &mut Solutions,
    ) -> Result<(), QueryEvaluationError> {
        let subject = Position::of(&pattern.subject, solution);
        let predicate = Position::of_predicate(&pattern.predicate, solution);
        let object = Position::of(&pattern.object, solution);
        let predicate_term = match predicate.term() {
            Some(Term::NamedNode(node)) => Some(node.as_ref()),
            Some(_) => return Ok(()),
            None => None,
        };

        let triples =
            self.triples_for_pattern(subject.term(), predicate_term, object.term(), graph)?;
        for triple in triples {
            let mut candidate = solution.clone();
            if subject.bind(&mut candidate, &triple.subject.into())
                && predicate.bind(&mut candidate, &triple.predicate.into())
                && object.bind(&mut candidate, &triple.object)
            {
                output.push(candidate);
            }
        }
        Ok(())
    }

    /// Returns the triples of the active graph that match the pattern. If the active graph is
    /// made of several graphs, a triple that is contained in more than one of them is returned
    /// once.
    pub(crate) fn triples_for_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        graph: &ActiveGraph,
    ) -> Result<Vec<Triple>, QueryEvaluationError> {
        let subject = match subject {
            None => None,
            Some(Term::NamedNode(node)) => Some(SubjectRef::from(node)),
            Some(Term::BlankNode(node)) => Some(SubjectRef::from(node)),
            // Literals never occur in subject position.
            Some(_) => return Ok(Vec::new()),
        };
        let object = object.map(Term::as_ref);
        let quads = |graph_name: Option<GraphNameRef<'_>>| {
            self.queryable
                .quads_for_pattern(subject, predicate, object, graph_name)
        };

        let triples = match graph {
            ActiveGraph::DefaultGraph => quads(Some(GraphNameRef::DefaultGraph))?
                .into_iter()
                .map(Triple::from)
                .collect(),
            ActiveGraph::NamedGraph(graph) => quads(Some(graph.as_ref().into()))?
                .into_iter()
                .map(Triple::from)
                .collect(),
            ActiveGraph::Union(graphs) => {
                let mut triples = Vec::new();
                for graph in graphs {
                    triples.extend(quads(Some(graph.as_ref()))?.into_iter().map(Triple::from));
                }
                deduplicate(triples)
            }
            ActiveGraph::AllGraphs => {
                deduplicate(quads(None)?.into_iter().map(Triple::from).collect())
            }
        };
        Ok(triples)
    }

    /// Returns the subjects and objects of the active graph in the order of their first
    /// occurrence.
    pub(super) fn graph_nodes(
        &self,
        graph: &ActiveGraph,
    ) -> Result<Vec<Term>, QueryEvaluationError> {
        let mut seen = FxHashSet::default();
        let mut nodes = Vec::new();
        for triple in self.triples_for_pattern(None, None, None, graph)? {
            for node in [Term::from(triple.subject), triple.object] {
                if seen.insert(node.clone()) {
                    nodes.push(node);
                }
            }
        }
        Ok(nodes)
    }
}

fn deduplicate(triples: Vec<Triple>) -> Vec<Triple> {
    let mut seen = FxHashSet::default();
    triples
        .into_iter()
        .filter(|triple| seen.insert(triple.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DatasetView;
    use rdf_algebra_common::QueryableMut;
    use rdf_algebra_functions::FunctionContext;
    use rdf_algebra_logical::parse_algebra;
    use rdf_algebra_model::{GraphName, NamedNode, Quad};
    use rdf_algebra_storage::MemoryStore;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://e/{name}"))
    }

    #[test]
    fn union_of_graphs_matches_shared_triples_once() {
        let store = MemoryStore::new();
        for graph in [GraphName::DefaultGraph, ex("g").into()] {
            let quad = Quad::new(ex("s"), ex("p"), ex("o"), graph);
            store.insert(quad.as_ref()).unwrap();
        }
        let evaluator = Evaluator::new(
            &store,
            DatasetView::new(None, true),
            FunctionContext::default(),
        );
        let context = evaluator.root_context(16, Solution::new());
        let algebra = parse_algebra("(bgp (triple ?s ?p ?o))").unwrap();
        assert_eq!(evaluator.execute(&algebra, &context).unwrap().len(), 1);
    }

    #[test]
    fn repeated_variables_must_bind_the_same_term() {
        let store = MemoryStore::new();
        for (s, o) in [("a", "a"), ("a", "b")] {
            let quad = Quad::new(ex(s), ex("p"), ex(o), GraphName::DefaultGraph);
            store.insert(quad.as_ref()).unwrap();
        }
        let evaluator = Evaluator::new(&store, DatasetView::default(), FunctionContext::default());
        let context = evaluator.root_context(16, Solution::new());
        let algebra = parse_algebra("(bgp (triple ?x <http://e/p> ?x))").unwrap();
        let result = evaluator.execute(&algebra, &context).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get(&Variable::new("x")), Some(&ex("a").into()));
    }

    #[test]
    fn initial_bindings_restrict_the_matches() {
        let store = MemoryStore::new();
        for s in ["a", "b"] {
            let quad = Quad::new(ex(s), ex("p"), ex("o"), GraphName::DefaultGraph);
            store.insert(quad.as_ref()).unwrap();
        }
        let evaluator = Evaluator::new(&store, DatasetView::default(), FunctionContext::default());
        let bindings = [(Variable::new("s"), Term::from(ex("b")))].into_iter().collect();
        let context = evaluator.root_context(16, bindings);
        let algebra = parse_algebra("(bgp (triple ?s <http://e/p> ?o))").unwrap();
        let result = evaluator.execute(&algebra, &context).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get(&Variable::new("s")), Some(&ex("b").into()));
    }
}
