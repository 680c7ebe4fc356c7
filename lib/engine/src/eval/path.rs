//! Evaluation of property paths.
//!
//! A path is evaluated between two [Position]s. The produced solutions only bind the variables of
//! these two positions. Closures (`*` and `+`) are computed by a breadth-first search with a set
//! of visited nodes, so they terminate on cyclic data and report every reachable node once per
//! start node.

use super::bgp::{bind_ends, Position};
use super::{Evaluator, Solutions};
use crate::context::{ActiveGraph, ExecutionContext};
use crate::error::QueryEvaluationError;
use rdf_algebra_common::Queryable;
use rdf_algebra_logical::pattern::TermPattern;
use rdf_algebra_logical::{NegatedMember, PropertyPath};
use rdf_algebra_model::{NamedNode, Solution, Term};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

impl<Q: Queryable + ?Sized> Evaluator<'_, Q> {
    pub(super) fn evaluate_path(
        &self,
        subject: &TermPattern,
        path: &PropertyPath,
        object: &TermPattern,
        context: &ExecutionContext,
    ) -> Result<Solutions, QueryEvaluationError> {
        let bindings = context.bindings();
        let subject = Position::of(subject, bindings);
        let object = Position::of(object, bindings);
        let mut solutions = Vec::new();
        for solution in self.path_solutions(path, &subject, &object, context.active_graph())? {
            if let Some(mut merged) = bindings.merge(&solution) {
                merged.remove_non_distinguished();
                solutions.push(merged);
            }
        }
        Ok(solutions)
    }

    fn path_solutions(
        &self,
        path: &PropertyPath,
        subject: &Position,
        object: &Position,
        graph: &ActiveGraph,
    ) -> Result<Solutions, QueryEvaluationError> {
        match path {
            PropertyPath::Link(predicate) => Ok(self
                .triples_for_pattern(
                    subject.term(),
                    Some(predicate.as_ref()),
                    object.term(),
                    graph,
                )?
                .into_iter()
                .filter_map(|triple| {
                    bind_ends(subject, &triple.subject.into(), object, &triple.object)
                })
                .collect()),
            PropertyPath::Inverse(inner) => self.path_solutions(inner, object, subject, graph),
            PropertyPath::Sequence(lhs, rhs) => self.sequence(lhs, rhs, subject, object, graph),
            PropertyPath::Alternative(lhs, rhs) => {
                let mut solutions = self.path_solutions(lhs, subject, object, graph)?;
                solutions.extend(self.path_solutions(rhs, subject, object, graph)?);
                Ok(solutions)
            }
            PropertyPath::ZeroOrOne(inner) => {
                let mut solutions = self.zero_length(subject, object, graph)?;
                solutions.extend(self.path_solutions(inner, subject, object, graph)?);
                // Endpoint pairs that are both zero and one step apart are reported once.
                let mut seen = FxHashSet::default();
                solutions.retain(|solution| seen.insert(solution.clone()));
                Ok(solutions)
            }
            PropertyPath::ZeroOrMore(inner) => self.closure(inner, subject, object, graph, true),
            PropertyPath::OneOrMore(inner) => self.closure(inner, subject, object, graph, false),
            PropertyPath::NegatedPropertySet(members) => {
                self.negated_property_set(members, subject, object, graph)
            }
        }
    }

    /// Joins `lhs` and `rhs` on a fresh non-distinguished variable. For every distinct value of
    /// the join variable, `rhs` is evaluated once with that value as its start.
    fn sequence(
        &self,
        lhs: &PropertyPath,
        rhs: &PropertyPath,
        subject: &Position,
        object: &Position,
        graph: &ActiveGraph,
    ) -> Result<Solutions, QueryEvaluationError> {
        let variable = self.fresh_variable();
        let middle = Position::Variable(variable.clone());
        let left = self.path_solutions(lhs, subject, &middle, graph)?;

        let mut right_by_middle: FxHashMap<Term, Solutions> = FxHashMap::default();
        let mut solutions = Vec::new();
        for l in left {
            let Some(value) = l.get(&variable).cloned() else {
                return QueryEvaluationError::internal(
                    "The join variable of a path sequence is unbound",
                );
            };
            if !right_by_middle.contains_key(&value) {
                let middle = Position::Term(value.clone());
                let right = self.path_solutions(rhs, &middle, object, graph)?;
                right_by_middle.insert(value.clone(), right);
            }
            for r in right_by_middle.get(&value).into_iter().flatten() {
                if let Some(mut merged) = l.merge(r) {
                    merged.remove(&variable);
                    solutions.push(merged);
                }
            }
        }
        Ok(solutions)
    }

    /// The solutions of a path of length zero: both ends are the same node.
    fn zero_length(
        &self,
        subject: &Position,
        object: &Position,
        graph: &ActiveGraph,
    ) -> Result<Solutions, QueryEvaluationError> {
        let nodes = match (subject.term(), object.term()) {
            (Some(node), _) | (None, Some(node)) => vec![node.clone()],
            (None, None) => self.graph_nodes(graph)?,
        };
        Ok(nodes
            .iter()
            .filter_map(|node| bind_ends(subject, node, object, node))
            .collect())
    }

    fn closure(
        &self,
        inner: &PropertyPath,
        subject: &Position,
        object: &Position,
        graph: &ActiveGraph,
        reflexive: bool,
    ) -> Result<Solutions, QueryEvaluationError> {
        let mut solutions = Vec::new();
        match (subject.term(), object.term()) {
            (Some(start), _) => {
                for end in self.reachable(inner, start, graph, reflexive, true)? {
                    solutions.extend(bind_ends(subject, start, object, &end));
                }
            }
            (None, Some(end)) => {
                for start in self.reachable(inner, end, graph, reflexive, false)? {
                    solutions.extend(bind_ends(subject, &start, object, end));
                }
            }
            (None, None) => {
                for start in self.graph_nodes(graph)? {
                    for end in self.reachable(inner, &start, graph, reflexive, true)? {
                        solutions.extend(bind_ends(subject, &start, object, &end));
                    }
                }
            }
        }
        Ok(solutions)
    }

    /// Returns the nodes reachable from `start` by one or more steps of `inner` (and `start`
    /// itself if `reflexive`). With `forward` set to `false`, the steps are followed backwards.
    fn reachable(
        &self,
        inner: &PropertyPath,
        start: &Term,
        graph: &ActiveGraph,
        reflexive: bool,
        forward: bool,
    ) -> Result<Vec<Term>, QueryEvaluationError> {
        let mut visited = FxHashSet::default();
        let mut reached = Vec::new();
        if reflexive {
            visited.insert(start.clone());
            reached.push(start.clone());
        }
        let mut queue = VecDeque::from([start.clone()]);
        while let Some(node) = queue.pop_front() {
            for next in self.step(inner, &node, graph, forward)? {
                if visited.insert(next.clone()) {
                    reached.push(next.clone());
                    queue.push_back(next);
                }
            }
        }
        tracing::trace!(
            start = %start,
            reached = reached.len(),
            "Computed path closure"
        );
        Ok(reached)
    }

    /// The distinct nodes one step of `inner` away from `node`.
    fn step(
        &self,
        inner: &PropertyPath,
        node: &Term,
        graph: &ActiveGraph,
        forward: bool,
    ) -> Result<Vec<Term>, QueryEvaluationError> {
        let variable = self.fresh_variable();
        let free = Position::Variable(variable.clone());
        let bound = Position::Term(node.clone());
        let solutions = if forward {
            self.path_solutions(inner, &bound, &free, graph)?
        } else {
            self.path_solutions(inner, &free, &bound, graph)?
        };
        let mut seen = FxHashSet::default();
        Ok(solutions
            .iter()
            .filter_map(|solution| solution.get(&variable))
            .filter(|term| seen.insert(*term))
            .cloned()
            .collect())
    }

    /// `!(p1|...|^q1|...)`: forward edges whose predicate is none of the forward members and
    /// reversed edges whose predicate is none of the inverse members. A set without inverse
    /// members only matches forward edges and vice versa.
    fn negated_property_set(
        &self,
        members: &[NegatedMember],
        subject: &Position,
        object: &Position,
        graph: &ActiveGraph,
    ) -> Result<Solutions, QueryEvaluationError> {
        let mut forward = Vec::<&NamedNode>::new();
        let mut inverse = Vec::<&NamedNode>::new();
        for member in members {
            match member {
                NegatedMember::Forward(predicate) => forward.push(predicate),
                NegatedMember::Inverse(predicate) => inverse.push(predicate),
            }
        }

        let mut solutions = Vec::new();
        if !forward.is_empty() || inverse.is_empty() {
            for triple in self.triples_for_pattern(subject.term(), None, object.term(), graph)? {
                if !forward.contains(&&triple.predicate) {
                    solutions.extend(bind_ends(
                        subject,
                        &triple.subject.into(),
                        object,
                        &triple.object,
                    ));
                }
            }
        }
        if !inverse.is_empty() {
            for triple in self.triples_for_pattern(object.term(), None, subject.term(), graph)? {
                if !inverse.contains(&&triple.predicate) {
                    solutions.extend(bind_ends(
                        subject,
                        &triple.object,
                        object,
                        &triple.subject.into(),
                    ));
                }
            }
        }
        Ok(solutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DatasetView;
    use rdf_algebra_common::QueryableMut;
    use rdf_algebra_functions::FunctionContext;
    use rdf_algebra_logical::parse_algebra;
    use rdf_algebra_model::{GraphName, Quad, Variable};
    use rdf_algebra_storage::MemoryStore;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://e/{name}"))
    }

    fn store(edges: &[(&str, &str, &str)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (s, p, o) in edges {
            let quad = Quad::new(ex(s), ex(p), ex(o), GraphName::DefaultGraph);
            store.insert(quad.as_ref()).unwrap();
        }
        store
    }

    fn evaluate(store: &MemoryStore, sse: &str) -> Solutions {
        let evaluator = Evaluator::new(store, DatasetView::default(), FunctionContext::default());
        let context = evaluator.root_context(64, Solution::new());
        evaluator
            .execute(&parse_algebra(sse).unwrap(), &context)
            .unwrap()
    }

    fn binds(solution: &Solution, name: &str) -> Option<Term> {
        solution.get(&Variable::new(name)).cloned()
    }

    fn objects(solutions: &Solutions) -> Vec<Term> {
        solutions.iter().filter_map(|s| binds(s, "o")).collect()
    }

    #[test]
    fn closures_terminate_on_cycles() {
        let store = store(&[("a", "p", "b"), ("b", "p", "c"), ("c", "p", "a")]);
        let plus = evaluate(&store, "(path <http://e/a> (path+ <http://e/p>) ?o)");
        assert_eq!(
            objects(&plus),
            vec![ex("b").into(), ex("c").into(), ex("a").into()]
        );
        let star = evaluate(&store, "(path <http://e/a> (path* <http://e/p>) ?o)");
        assert_eq!(
            objects(&star),
            vec![ex("a").into(), ex("b").into(), ex("c").into()]
        );
        let all = evaluate(&store, "(path ?s (path+ <http://e/p>) ?o)");
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn closures_walk_backwards_from_a_bound_object() {
        let store = store(&[("a", "p", "b"), ("b", "p", "c")]);
        let result = evaluate(&store, "(path ?s (path+ <http://e/p>) <http://e/c>)");
        let subjects = result
            .iter()
            .filter_map(|s| binds(s, "s"))
            .collect::<Vec<_>>();
        assert_eq!(subjects, vec![ex("b").into(), ex("a").into()]);
    }

    #[test]
    fn zero_length_paths_include_constant_nodes() {
        let store = store(&[("a", "p", "b")]);
        let result = evaluate(&store, "(path <http://e/z> (path* <http://e/p>) ?o)");
        assert_eq!(objects(&result), vec![ex("z").into()]);
        let result = evaluate(&store, "(path <http://e/a> (path? <http://e/p>) ?o)");
        assert_eq!(objects(&result), vec![ex("a").into(), ex("b").into()]);
    }

    #[test]
    fn zero_or_one_reports_endpoint_pairs_once() {
        let store = store(&[("a", "p", "a")]);
        let result = evaluate(&store, "(path <http://e/a> (path? <http://e/p>) ?o)");
        assert_eq!(objects(&result), vec![ex("a").into()]);
    }

    #[test]
    fn sequences_drop_the_join_variable() {
        let store = store(&[("a", "p", "b"), ("b", "q", "c"), ("b", "q", "d")]);
        let result = evaluate(
            &store,
            "(path <http://e/a> (seq <http://e/p> <http://e/q>) ?o)",
        );
        assert_eq!(objects(&result), vec![ex("c").into(), ex("d").into()]);
        assert!(result.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn alternatives_and_inverses() {
        let store = store(&[("a", "p", "b"), ("c", "q", "a")]);
        let result = evaluate(
            &store,
            "(path <http://e/a> (alt <http://e/p> (reverse <http://e/q>)) ?o)",
        );
        assert_eq!(objects(&result), vec![ex("b").into(), ex("c").into()]);
    }

    #[test]
    fn negated_property_sets() {
        let store = store(&[("a", "p", "b"), ("a", "q", "c"), ("d", "r", "a")]);
        let forward = evaluate(&store, "(path <http://e/a> (notoneof <http://e/p>) ?o)");
        assert_eq!(objects(&forward), vec![ex("c").into()]);
        let inverse = evaluate(
            &store,
            "(path <http://e/a> (notoneof (reverse <http://e/q>)) ?o)",
        );
        assert_eq!(objects(&inverse), vec![ex("d").into()]);
    }

    #[test]
    fn sequence_join_variables_do_not_clash_with_query_variables() {
        let store = store(&[("a", "p", "b"), ("b", "q", "c")]);
        let result = evaluate(
            &store,
            "(path ??_path0 (seq <http://e/p> <http://e/q>) ?o)",
        );
        assert_eq!(objects(&result), vec![Term::from(ex("c"))]);
    }
}
