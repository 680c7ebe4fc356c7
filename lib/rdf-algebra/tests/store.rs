#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use rdf_algebra::io::RdfFormat;
use rdf_algebra::model::vocab::{rdf, xsd};
use rdf_algebra::model::{
    GraphNameRef, Literal, LiteralRef, NamedNode, NamedNodeRef, QuadRef, Term, Variable,
};
use rdf_algebra::sparql::{QueryOptions, QueryResults, QuerySolutions};
use rdf_algebra::{QueryLanguage, Store};
use std::error::Error;

#[allow(clippy::non_ascii_literal)]
const DATA: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

wd:Q90 a schema:City ;
    schema:name "Paris"@fr , "la ville lumière"@fr ;
    schema:country wd:Q142 ;
    schema:population 2000000 ;
    schema:startDate "-300"^^xsd:gYear ;
    schema:url "https://www.paris.fr/"^^xsd:anyURI ;
    schema:postalCode "75001" .
"#;

#[allow(clippy::non_ascii_literal)]
const GRAPH_DATA: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

GRAPH <http://www.wikidata.org/wiki/Special:EntityData/Q90> {
    wd:Q90 a schema:City ;
        schema:name "Paris"@fr , "la ville lumière"@fr ;
        schema:country wd:Q142 ;
        schema:population 2000000 ;
        schema:startDate "-300"^^xsd:gYear ;
        schema:url "https://www.paris.fr/"^^xsd:anyURI ;
        schema:postalCode "75001" .
}
"#;
const NUMBER_OF_TRIPLES: usize = 8;

fn quads(graph_name: impl Into<GraphNameRef<'static>>) -> Vec<QuadRef<'static>> {
    let graph_name = graph_name.into();
    let paris = NamedNodeRef::new_unchecked("http://www.wikidata.org/entity/Q90");
    let france = NamedNodeRef::new_unchecked("http://www.wikidata.org/entity/Q142");
    let city = NamedNodeRef::new_unchecked("http://schema.org/City");
    let name = NamedNodeRef::new_unchecked("http://schema.org/name");
    let country = NamedNodeRef::new_unchecked("http://schema.org/country");
    let population = NamedNodeRef::new_unchecked("http://schema.org/population");
    let start_date = NamedNodeRef::new_unchecked("http://schema.org/startDate");
    let url = NamedNodeRef::new_unchecked("http://schema.org/url");
    let postal_code = NamedNodeRef::new_unchecked("http://schema.org/postalCode");
    vec![
        QuadRef::new(paris, rdf::TYPE, city, graph_name),
        QuadRef::new(
            paris,
            name,
            LiteralRef::new_language_tagged_literal_unchecked("Paris", "fr"),
            graph_name,
        ),
        QuadRef::new(
            paris,
            name,
            LiteralRef::new_language_tagged_literal_unchecked("la ville lumi\u{E8}re", "fr"),
            graph_name,
        ),
        QuadRef::new(paris, country, france, graph_name),
        QuadRef::new(
            paris,
            population,
            LiteralRef::new_typed_literal("2000000", xsd::INTEGER),
            graph_name,
        ),
        QuadRef::new(
            paris,
            start_date,
            LiteralRef::new_typed_literal("-300", xsd::G_YEAR),
            graph_name,
        ),
        QuadRef::new(
            paris,
            url,
            LiteralRef::new_typed_literal("https://www.paris.fr/", xsd::ANY_URI),
            graph_name,
        ),
        QuadRef::new(
            paris,
            postal_code,
            LiteralRef::new_simple_literal("75001"),
            graph_name,
        ),
    ]
}

fn solutions(results: QueryResults) -> QuerySolutions {
    match results {
        QueryResults::Solutions(solutions) => solutions,
        other => panic!("expected solutions, got {other:?}"),
    }
}

#[test]
fn test_load_graph() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes())?;
    for q in quads(GraphNameRef::DefaultGraph) {
        assert!(store.contains(q)?);
    }
    Ok(())
}

#[test]
fn test_load_dataset() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::TriG, GRAPH_DATA.as_bytes())?;
    for q in quads(NamedNodeRef::new_unchecked(
        "http://www.wikidata.org/wiki/Special:EntityData/Q90",
    )) {
        assert!(store.contains(q)?);
    }
    Ok(())
}

#[test]
fn test_load_graph_generates_new_blank_nodes() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for _ in 0..2 {
        store.load_from_reader(
            RdfFormat::NTriples,
            "_:a <http://example.com/p> <http://example.com/p> .".as_bytes(),
        )?;
    }
    assert_eq!(store.len()?, 2);
    Ok(())
}

#[test]
fn test_dump_graph() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for q in quads(GraphNameRef::DefaultGraph) {
        store.insert(q)?;
    }

    let buffer =
        store.dump_graph_to_writer(GraphNameRef::DefaultGraph, RdfFormat::NTriples, Vec::new())?;
    assert_eq!(
        buffer.into_iter().filter(|c| *c == b'\n').count(),
        NUMBER_OF_TRIPLES
    );
    Ok(())
}

#[test]
fn test_dump_dataset() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for q in quads(GraphNameRef::DefaultGraph) {
        store.insert(q)?;
    }

    let buffer = store.dump_to_writer(RdfFormat::NQuads, Vec::new())?;
    assert_eq!(
        buffer.into_iter().filter(|c| *c == b'\n').count(),
        NUMBER_OF_TRIPLES
    );
    assert!(store.dump_to_writer(RdfFormat::Turtle, Vec::new()).is_err());
    Ok(())
}

#[test]
fn test_ask_matches_integer_literals() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(
        RdfFormat::NTriples,
        r#"<http://e/x> <http://e/p> "1"^^<http://www.w3.org/2001/XMLSchema#integer> ."#.as_bytes(),
    )?;

    let results = store.query_sse("(ask (bgp (triple <http://e/x> <http://e/p> 1)))")?;

    assert_eq!(results, QueryResults::Boolean(true));
    Ok(())
}

#[test]
fn test_left_join_keeps_unmatched_solutions() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(
        RdfFormat::NTriples,
        "<http://e/x> <http://e/p> <http://e/v1> .".as_bytes(),
    )?;

    let results = solutions(store.query_sse(
        "(leftjoin (bgp (triple <http://e/x> <http://e/p> ?v)) (bgp (triple ?v <http://e/q> ?w)))",
    )?);

    assert_eq!(results.len(), 1);
    let solution = results.iter().next().ok_or("no solution")?;
    assert_eq!(
        solution.get(&Variable::new("v")),
        Some(&Term::from(NamedNode::new("http://e/v1")?))
    );
    assert_eq!(solution.get(&Variable::new("w")), None);
    Ok(())
}

#[test]
fn test_lang_matches() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for (tag, range, expected) in [("en-GB", "en", true), ("fr", "en", false), ("", "*", false)] {
        let query = format!(r#"(ask (filter (langMatches "{tag}" "{range}") (table unit)))"#);
        assert_eq!(
            store.query_sse(&query)?,
            QueryResults::Boolean(expected),
            "langMatches({tag:?}, {range:?})"
        );
    }
    Ok(())
}

#[test]
fn test_slice_skips_in_match_order() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for i in 0..5 {
        store.insert(QuadRef::new(
            NamedNodeRef::new_unchecked("http://e/s"),
            NamedNodeRef::new_unchecked("http://e/p"),
            &Literal::from(i),
            GraphNameRef::DefaultGraph,
        ))?;
    }

    let results = solutions(store.query_sse("(slice 1 2 (bgp (triple ?s ?p ?o)))")?);

    let objects = results
        .iter()
        .filter_map(|solution| solution.get(&Variable::new("o")).cloned())
        .collect::<Vec<_>>();
    assert_eq!(
        objects,
        [Term::from(Literal::from(1)), Term::from(Literal::from(2))]
    );
    Ok(())
}

#[test]
fn test_explanations_expose_the_optimized_tree() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    let query = QueryLanguage::Sse.parse_query(
        "(join (bgp (triple ?s <http://e/p> ?o)) (bgp (triple ?o <http://e/p> ?z)))",
        None,
    )?;

    let (_, explanation) = store.explain_query_opt(&query, &QueryOptions::default())?;
    let (_, unoptimized) =
        store.explain_query_opt(&query, &QueryOptions::default().without_optimizations())?;

    assert_eq!(explanation.optimized_algebra.name(), "bgp");
    assert_eq!(unoptimized.optimized_algebra, unoptimized.initial_algebra);
    Ok(())
}

#[test]
fn test_sparql_update_and_query() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.update_sparql(
        "PREFIX ex: <http://e/>
         INSERT DATA { ex:a ex:knows ex:b . ex:b ex:knows ex:c . ex:c ex:knows ex:a }",
    )?;

    let results = solutions(
        store.query_sparql("SELECT ?x WHERE { <http://e/a> <http://e/knows>+ ?x }")?,
    );

    assert_eq!(results.len(), 3);
    Ok(())
}

#[test]
fn test_blank_node_shared_by_a_path_and_a_triple() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(
        RdfFormat::NTriples,
        "<http://e/a> <http://e/p> <http://e/b> .
         <http://e/a> <http://e/r> <http://e/c> ."
            .as_bytes(),
    )?;

    let results = solutions(store.query_sparql(
        "SELECT ?x ?y WHERE { _:b <http://e/p>+ ?x . _:b <http://e/r> ?y }",
    )?);

    assert_eq!(results.variables(), [Variable::new("x"), Variable::new("y")]);
    assert_eq!(results.len(), 1);
    let solution = results.iter().next().ok_or("no solution")?;
    assert_eq!(
        solution.get(&Variable::new("x")),
        Some(&Term::from(NamedNode::new("http://e/b")?))
    );
    assert_eq!(
        solution.get(&Variable::new("y")),
        Some(&Term::from(NamedNode::new("http://e/c")?))
    );
    Ok(())
}

#[test]
fn test_exists_binding_an_outer_variable() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.update_sparql(
        "PREFIX ex: <http://e/>
         INSERT DATA { ex:a ex:p 1 . ex:a ex:r 1 . ex:b ex:p 2 . ex:b ex:r 3 }",
    )?;

    let results = solutions(store.query_sparql(
        "SELECT ?s ?o {
           ?s <http://e/p> ?o
           FILTER EXISTS { ?s <http://e/r> ?z BIND(?z AS ?o) }
         }",
    )?);

    assert_eq!(results.len(), 1);
    let solution = results.iter().next().ok_or("no solution")?;
    assert_eq!(
        solution.get(&Variable::new("s")),
        Some(&Term::from(NamedNode::new("http://e/a")?))
    );
    assert_eq!(solution.get(&Variable::new("o")), Some(&Term::from(Literal::from(1))));
    Ok(())
}

#[test]
fn test_slice_results_do_not_depend_on_optimizations() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(
        RdfFormat::NTriples,
        r#"<http://e/a> <http://e/p> "0"^^<http://www.w3.org/2001/XMLSchema#integer> .
           <http://e/b> <http://e/q> "1"^^<http://www.w3.org/2001/XMLSchema#integer> .
           <http://e/a> <http://e/q> "2"^^<http://www.w3.org/2001/XMLSchema#integer> ."#
            .as_bytes(),
    )?;
    let query = QueryLanguage::Sse.parse_query(
        "(slice _ 1 (bgp (triple ?s ?p ?o) (triple ?s <http://e/q> ?z)))",
        None,
    )?;

    let optimized = store.query_opt(&query, &QueryOptions::default())?;
    let unoptimized = store.query_opt(&query, &QueryOptions::default().without_optimizations())?;

    assert_eq!(optimized, unoptimized);
    Ok(())
}
