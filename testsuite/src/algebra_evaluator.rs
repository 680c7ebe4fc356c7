use crate::manifest::Test;
use crate::report::{dataset_diff, format_diff};
use anyhow::{bail, ensure, Context, Result};
use rdf_algebra::io::RdfFormat;
use rdf_algebra::logical::{validate_query, validate_update, Algebra};
use rdf_algebra::model::{
    BlankNode, CanonicalizationAlgorithm, Dataset, Graph, GraphName, Term, Triple, Variable,
};
use rdf_algebra::sparql::{QueryResults, QueryResultsFormat};
use rdf_algebra::{QueryLanguage, Store};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

pub fn evaluate_query_test(test: &Test) -> Result<()> {
    let store = load_store(test.data.as_deref())?;
    let query_text = read_file_to_string(&test.action)?;
    let query = QueryLanguage::Sse
        .parse_query(&query_text, None)
        .context("Failure to parse query")?;

    // We check the SSE roundtrip
    QueryLanguage::Sse
        .parse_query(&query.to_string(), None)
        .with_context(|| format!("Failure to deserialize \"{query}\""))?;

    let result_file = test.result.as_deref().context("No result found")?;
    let expected = load_expected_results(result_file)?;
    let ordered = is_ordered(query.pattern());
    let actual = StaticQueryResults::from_query_results(
        store.query(&query).context("Failure to execute query")?,
        ordered,
    );
    ensure!(
        are_query_results_isomorphic(&expected, &actual),
        "Not isomorphic results.\n{}\nParsed query:\n{}\n",
        results_diff(expected, actual),
        query
    );
    Ok(())
}

pub fn evaluate_update_test(test: &Test) -> Result<()> {
    let store = load_store(test.data.as_deref())?;
    let result_store = load_store(test.result.as_deref())?;
    let update_text = read_file_to_string(&test.action)?;
    let update = QueryLanguage::Sse
        .parse_update(&update_text, None)
        .context("Failure to parse update")?;

    // We check the SSE roundtrip
    QueryLanguage::Sse
        .parse_update(&update.to_string(), None)
        .with_context(|| format!("Failure to deserialize \"{update}\""))?;

    store.update(&update).context("Failure to execute update")?;
    let actual = canonical_dataset(&store)?;
    let expected = canonical_dataset(&result_store)?;
    ensure!(
        actual == expected,
        "Not isomorphic result dataset.\nDiff:\n{}\nParsed update:\n{}\n",
        dataset_diff(&expected, &actual),
        update,
    );
    Ok(())
}

/// The action must be rejected either by the SSE reader or by the structural validation, as a
/// query and as an update.
pub fn evaluate_negative_syntax_test(test: &Test) -> Result<()> {
    let text = read_file_to_string(&test.action)?;
    let accepted_as_query = QueryLanguage::Sse
        .parse_query(&text, None)
        .ok()
        .is_some_and(|query| validate_query(&query).is_ok());
    let accepted_as_update = QueryLanguage::Sse
        .parse_update(&text, None)
        .ok()
        .is_some_and(|update| validate_update(&update).is_ok());
    ensure!(
        !accepted_as_query && !accepted_as_update,
        "The input is accepted even if it should not."
    );
    Ok(())
}

/// Whether the solutions of the pattern are sorted, i.e. an `order` is only wrapped by
/// modifiers that keep the order.
fn is_ordered(algebra: &Algebra) -> bool {
    match algebra {
        Algebra::OrderBy { .. } => true,
        Algebra::Project { inner, .. }
        | Algebra::Distinct { inner }
        | Algebra::Reduced { inner }
        | Algebra::Slice { inner, .. } => is_ordered(inner),
        _ => false,
    }
}

fn load_store(file: Option<&Path>) -> Result<Store> {
    let store = Store::new();
    if let Some(file) = file {
        store
            .load_from_reader(guess_rdf_format(file)?, BufReader::new(File::open(file)?))
            .with_context(|| format!("Unable to load {}", file.display()))?;
    }
    Ok(store)
}

fn canonical_dataset(store: &Store) -> Result<Dataset> {
    let mut dataset = store
        .quads_for_pattern(None, None, None, None)?
        .into_iter()
        .collect::<Dataset>();
    dataset.canonicalize(CanonicalizationAlgorithm::Unstable);
    Ok(dataset)
}

fn load_expected_results(file: &Path) -> Result<StaticQueryResults> {
    if file.extension().is_some_and(|extension| extension == "srj") {
        let reader = BufReader::new(File::open(file)?);
        let results = QueryResults::read(reader, QueryResultsFormat::Json)
            .with_context(|| format!("Unable to parse {}", file.display()))?;
        return Ok(StaticQueryResults::from_query_results(results, true));
    }
    let store = load_store(Some(file))?;
    let triples = store
        .quads_for_pattern(None, None, None, None)?
        .into_iter()
        .map(Triple::from)
        .collect();
    Ok(StaticQueryResults::from_query_results(
        QueryResults::Graph(triples),
        false,
    ))
}

fn read_file_to_string(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Unable to read {}", file.display()))
}

fn guess_rdf_format(file: &Path) -> Result<RdfFormat> {
    let Some(format) = file
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(RdfFormat::from_extension)
    else {
        bail!("Unable to guess the RDF format of {}", file.display())
    };
    Ok(format)
}

#[allow(clippy::large_enum_variant)]
enum StaticQueryResults {
    Graph(Graph),
    Solutions {
        variables: Vec<Variable>,
        solutions: Vec<Vec<(Variable, Term)>>,
        ordered: bool,
    },
    Boolean(bool),
}

impl StaticQueryResults {
    fn from_query_results(results: QueryResults, ordered: bool) -> Self {
        match results {
            QueryResults::Boolean(value) => Self::Boolean(value),
            QueryResults::Graph(triples) => {
                let mut graph = triples.into_iter().collect::<Graph>();
                graph.canonicalize(CanonicalizationAlgorithm::Unstable);
                Self::Graph(graph)
            }
            QueryResults::Solutions(solutions) => {
                let mut variables = solutions.variables().to_vec();
                variables.sort_by(|a, b| a.name().cmp(b.name()));
                let solutions = solutions
                    .iter()
                    .map(|solution| {
                        let mut bindings = solution
                            .iter()
                            .map(|(variable, value)| (variable.clone(), value.clone()))
                            .collect::<Vec<_>>();
                        bindings.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
                        bindings
                    })
                    .collect();
                Self::Solutions {
                    variables,
                    solutions,
                    ordered,
                }
            }
        }
    }
}

fn are_query_results_isomorphic(
    expected: &StaticQueryResults,
    actual: &StaticQueryResults,
) -> bool {
    match (expected, actual) {
        (
            StaticQueryResults::Solutions {
                variables: expected_variables,
                solutions: expected_solutions,
                ..
            },
            StaticQueryResults::Solutions {
                variables: actual_variables,
                solutions: actual_solutions,
                ordered,
            },
        ) => {
            expected_variables == actual_variables
                && expected_solutions.len() == actual_solutions.len()
                && if *ordered {
                    expected_solutions.iter().zip(actual_solutions).all(
                        |(expected_solution, actual_solution)| {
                            compare_solutions(expected_solution, actual_solution)
                        },
                    )
                } else {
                    is_permutation(expected_solutions, actual_solutions)
                }
        }
        (StaticQueryResults::Boolean(expected), StaticQueryResults::Boolean(actual)) => {
            expected == actual
        }
        (StaticQueryResults::Graph(expected), StaticQueryResults::Graph(actual)) => {
            expected == actual
        }
        _ => false,
    }
}

/// Checks that every expected solution is matched by a distinct actual solution.
fn is_permutation(expected: &[Vec<(Variable, Term)>], actual: &[Vec<(Variable, Term)>]) -> bool {
    let mut used = vec![false; actual.len()];
    expected.iter().all(|expected_solution| {
        let found = actual.iter().enumerate().position(|(i, actual_solution)| {
            !used[i] && compare_solutions(expected_solution, actual_solution)
        });
        if let Some(i) = found {
            used[i] = true;
        }
        found.is_some()
    })
}

fn compare_solutions(expected: &[(Variable, Term)], actual: &[(Variable, Term)]) -> bool {
    let mut bnode_map = HashMap::new();
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(
            move |((expected_variable, expected_value), (actual_variable, actual_value))| {
                expected_variable == actual_variable
                    && compare_terms(expected_value, actual_value, &mut bnode_map)
            },
        )
}

fn compare_terms<'a>(
    expected: &'a Term,
    actual: &'a Term,
    bnode_map: &mut HashMap<&'a BlankNode, &'a BlankNode>,
) -> bool {
    match (expected, actual) {
        (Term::BlankNode(expected), Term::BlankNode(actual)) => {
            expected == *bnode_map.entry(actual).or_insert(expected)
        }
        (expected, actual) => expected == actual,
    }
}

fn results_diff(expected: StaticQueryResults, actual: StaticQueryResults) -> String {
    match (expected, actual) {
        (
            StaticQueryResults::Solutions {
                variables: expected_variables,
                solutions: expected_solutions,
                ..
            },
            StaticQueryResults::Solutions {
                variables: actual_variables,
                solutions: actual_solutions,
                ordered,
            },
        ) => {
            let mut out = String::new();
            if expected_variables != actual_variables {
                out.push_str("Variables diff:\n");
                out.push_str(&format_diff(
                    &variables_to_string(&expected_variables),
                    &variables_to_string(&actual_variables),
                    "variables",
                ));
            }
            out.push_str("Solutions diff:\n");
            out.push_str(&format_diff(
                &solutions_to_string(expected_solutions, ordered),
                &solutions_to_string(actual_solutions, ordered),
                "solutions",
            ));
            out
        }
        (StaticQueryResults::Graph(expected), StaticQueryResults::Graph(actual)) => {
            let expected = expected
                .iter()
                .map(|t| t.in_graph(GraphName::DefaultGraph.as_ref()))
                .collect();
            let actual = actual
                .iter()
                .map(|t| t.in_graph(GraphName::DefaultGraph.as_ref()))
                .collect();
            dataset_diff(&expected, &actual)
        }
        (StaticQueryResults::Boolean(expected), StaticQueryResults::Boolean(actual)) => {
            format!("Expecting {expected} but found {actual}")
        }
        (StaticQueryResults::Solutions { .. }, _) => "Expecting solutions".into(),
        (StaticQueryResults::Graph(_), _) => "Expecting a graph".into(),
        (StaticQueryResults::Boolean(expected), _) => format!("Expecting the boolean {expected}"),
    }
}

fn variables_to_string(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn solutions_to_string(solutions: Vec<Vec<(Variable, Term)>>, ordered: bool) -> String {
    let mut lines = solutions
        .into_iter()
        .map(|solution| {
            let bindings = solution
                .iter()
                .map(|(variable, value)| format!("{variable} = {value}"))
                .collect::<Vec<_>>();
            format!("{{{}}}", bindings.join(" "))
        })
        .collect::<Vec<_>>();
    if !ordered {
        lines.sort_unstable();
    }
    lines.join("\n")
}
