use crate::context::DatasetView;
use crate::error::QueryEvaluationError;
use crate::eval::Evaluator;
use crate::explanation::QueryExplanation;
use crate::options::QueryOptions;
use crate::planner::QueryPlanner;
use crate::results::{QueryResults, QuerySolutions};
use rdf_algebra_common::Queryable;
use rdf_algebra_functions::FunctionContext;
use rdf_algebra_logical::pattern::{NamedNodePattern, TermPattern, TriplePattern};
use rdf_algebra_logical::Query;
use rdf_algebra_model::{BlankNode, Solution, Subject, Term, Triple};
use rustc_hash::{FxHashMap, FxHashSet};

/// Evaluates a query against `queryable`.
///
/// The pattern of the query is validated and, unless disabled in `options`, optimized before it
/// is evaluated.
pub fn evaluate_query<Q: Queryable + ?Sized>(
    queryable: &Q,
    query: &Query,
    options: &QueryOptions,
) -> Result<(QueryResults, QueryExplanation), QueryEvaluationError> {
    let explanation = QueryPlanner::default().plan(query.pattern(), options.optimize)?;
    let dataset = DatasetView::new(query.dataset(), options.default_graph_as_union);
    let base_iri = query.base_iri().cloned().or_else(|| options.base_iri.clone());
    let evaluator = Evaluator::new(queryable, dataset, FunctionContext::new(base_iri));
    let context = evaluator.root_context(options.max_depth, options.bindings.clone());
    let solutions = evaluator.execute(&explanation.optimized_algebra, &context)?;

    let results = match query {
        Query::Select { .. } => {
            let variables = explanation
                .initial_algebra
                .in_scope_variables()
                .into_iter()
                .filter(|variable| variable.is_distinguished())
                .collect();
            QueryResults::Solutions(QuerySolutions::new(variables, solutions))
        }
        Query::Ask { .. } => QueryResults::Boolean(!solutions.is_empty()),
        Query::Construct { template, .. } => {
            QueryResults::Graph(construct_triples(template, &solutions))
        }
        Query::Describe { resources, .. } => {
            let mut triples = Vec::new();
            let mut seen = FxHashSet::default();
            for resource in described_resources(resources, &solutions) {
                let graph = evaluator.dataset().default_graph.clone();
                for triple in evaluator.triples_for_pattern(Some(&resource), None, None, &graph)? {
                    if seen.insert(triple.clone()) {
                        triples.push(triple);
                    }
                }
            }
            QueryResults::Graph(triples)
        }
    };
    Ok((results, explanation))
}

/// Instantiates the template once per solution. Blank nodes of the template are replaced by
/// fresh blank nodes for every solution. Triples with unbound or invalid positions (e.g., a
/// literal subject) are skipped.
fn construct_triples(template: &[TriplePattern], solutions: &[Solution]) -> Vec<Triple> {
    let mut triples = Vec::new();
    let mut seen = FxHashSet::default();
    for solution in solutions {
        let mut blank_nodes = FxHashMap::default();
        for pattern in template {
            let subject = match instantiate(&pattern.subject, solution, &mut blank_nodes) {
                Some(Term::NamedNode(node)) => Subject::from(node),
                Some(Term::BlankNode(node)) => Subject::from(node),
                _ => continue,
            };
            let predicate = match &pattern.predicate {
                NamedNodePattern::NamedNode(node) => node.clone(),
                NamedNodePattern::Variable(variable) => match solution.get(variable) {
                    Some(Term::NamedNode(node)) => node.clone(),
                    _ => continue,
                },
            };
            let Some(object) = instantiate(&pattern.object, solution, &mut blank_nodes) else {
                continue;
            };
            let triple = Triple::new(subject, predicate, object);
            if seen.insert(triple.clone()) {
                triples.push(triple);
            }
        }
    }
    triples
}

fn instantiate(
    pattern: &TermPattern,
    solution: &Solution,
    blank_nodes: &mut FxHashMap<BlankNode, BlankNode>,
) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::BlankNode(node) => Some(
            blank_nodes
                .entry(node.clone())
                .or_insert_with(BlankNode::default)
                .clone()
                .into(),
        ),
        TermPattern::Variable(variable) => solution.get(variable).cloned(),
    }
}

/// The IRIs and blank nodes to describe, in the order of their first occurrence. Without
/// explicit resources, every IRI or blank node bound by a solution is described.
fn described_resources(resources: &[TermPattern], solutions: &[Solution]) -> Vec<Term> {
    let mut result = Vec::new();
    let mut add = |term: &Term| {
        if matches!(term, Term::NamedNode(_) | Term::BlankNode(_)) && !result.contains(term) {
            result.push(term.clone());
        }
    };
    if resources.is_empty() {
        for solution in solutions {
            solution.iter().for_each(|(_, term)| add(term));
        }
        return result;
    }
    for resource in resources {
        match resource {
            TermPattern::Variable(variable) => solutions
                .iter()
                .filter_map(|solution| solution.get(variable))
                .for_each(&mut add),
            TermPattern::NamedNode(node) => add(&Term::from(node.clone())),
            TermPattern::BlankNode(_) | TermPattern::Literal(_) => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_common::QueryableMut;
    use rdf_algebra_logical::parse_query;
    use rdf_algebra_model::{GraphName, Literal, NamedNode, Quad, Variable};
    use rdf_algebra_storage::MemoryStore;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://e/{name}"))
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        for (s, p, o) in [
            ("alice", "knows", Term::from(ex("bob"))),
            ("bob", "knows", Term::from(ex("carol"))),
            ("alice", "age", Term::from(Literal::from(42))),
        ] {
            let quad = Quad::new(ex(s), ex(p), o, GraphName::DefaultGraph);
            store.insert(quad.as_ref()).unwrap();
        }
        store
    }

    fn run(store: &MemoryStore, sse: &str) -> QueryResults {
        let query = parse_query(sse).unwrap();
        evaluate_query(store, &query, &QueryOptions::default())
            .unwrap()
            .0
    }

    #[test]
    fn select_reports_the_projected_variables() {
        let QueryResults::Solutions(solutions) = run(
            &store(),
            "(project (?o) (bgp (triple <http://e/alice> <http://e/knows> ?o)))",
        ) else {
            panic!("expected solutions")
        };
        assert_eq!(solutions.variables(), [Variable::new("o")]);
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn ask_is_true_iff_there_is_a_solution() {
        let store = store();
        assert_eq!(
            run(&store, "(ask (bgp (triple <http://e/alice> <http://e/age> 42)))"),
            QueryResults::Boolean(true)
        );
        assert_eq!(
            run(&store, "(ask (bgp (triple <http://e/alice> <http://e/age> 43)))"),
            QueryResults::Boolean(false)
        );
    }

    #[test]
    fn construct_skips_invalid_triples_and_renames_blank_nodes() {
        let QueryResults::Graph(triples) = run(
            &store(),
            "(construct ((triple ?o <http://e/knownBy> ?s) (triple _:b <http://e/of> ?s))
               (bgp (triple ?s ?p ?o)))",
        ) else {
            panic!("expected a graph")
        };
        // The literal 42 cannot be a subject.
        assert_eq!(
            triples
                .iter()
                .filter(|t| t.predicate == ex("knownBy"))
                .count(),
            2
        );
        let blank_nodes = triples
            .iter()
            .filter(|t| t.predicate == ex("of"))
            .map(|t| t.subject.clone())
            .collect::<FxHashSet<_>>();
        assert_eq!(blank_nodes.len(), 3);
    }

    #[test]
    fn describe_returns_the_triples_of_the_bound_resources() {
        let QueryResults::Graph(triples) = run(
            &store(),
            "(describe (?s) (bgp (triple ?s <http://e/age> ?a)))",
        ) else {
            panic!("expected a graph")
        };
        assert_eq!(triples.len(), 2);
        assert!(triples.iter().all(|t| t.subject == Subject::from(ex("alice"))));
    }

    #[test]
    fn explanations_keep_both_trees() {
        let query = parse_query(
            "(join (bgp (triple ?s <http://e/knows> ?o)) (bgp (triple ?o <http://e/knows> ?z)))",
        )
        .unwrap();
        let (results, explanation) =
            evaluate_query(&store(), &query, &QueryOptions::default()).unwrap();
        assert_ne!(explanation.initial_algebra, explanation.optimized_algebra);
        let QueryResults::Solutions(solutions) = results else {
            panic!("expected solutions")
        };
        assert_eq!(solutions.len(), 1);
    }
}
