use assert_fs::prelude::*;
use rdf_algebra_common::{Queryable, QueryableMut, StorageError};
use rdf_algebra_model::{
    GraphName, GraphNameRef, Literal, NamedNode, NamedOrBlankNode, Quad, Subject, Term,
};
use rdf_algebra_storage::MemoryStore;

#[test]
fn test_insert_quad() {
    let store = MemoryStore::new();

    let inserted = store.extend(vec![example_quad()]).unwrap();
    assert_eq!(inserted, 1);

    let len = store.len().unwrap();
    assert_eq!(len, 1);
}

#[test]
fn test_insert_duplicate_quads_no_effect() {
    let store = MemoryStore::new();

    store.extend(vec![example_quad()]).unwrap();

    let inserted = store.insert(example_quad().as_ref()).unwrap();
    assert!(!inserted);
}

#[test]
fn test_insert_duplicate_quads_in_same_operation_quads() {
    let store = MemoryStore::new();

    let inserted = store.extend(vec![example_quad(), example_quad()]).unwrap();

    assert_eq!(inserted, 1);
}

#[test]
fn test_named_graph_insertion_and_query() {
    let store = MemoryStore::new();
    let graph = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/graph").unwrap());

    let inserted = store.create_named_graph(graph.as_ref()).unwrap();
    assert!(inserted);
    assert!(!store.create_named_graph(graph.as_ref()).unwrap());

    let exists = store.contains_named_graph(graph.as_ref()).unwrap();
    assert!(exists);

    let graphs = store.named_graphs().unwrap();
    assert_eq!(graphs, [graph]);
}

#[test]
fn test_inserting_into_a_graph_creates_it() {
    let store = MemoryStore::new();

    store
        .insert(example_quad_in_graph("http://example.com/g").as_ref())
        .unwrap();

    let graphs = store.named_graphs().unwrap();
    assert_eq!(
        graphs,
        [NamedOrBlankNode::from(
            NamedNode::new("http://example.com/g").unwrap()
        )]
    );
}

#[test]
fn test_remove_quad() {
    let store = MemoryStore::new();
    let quad = example_quad_in_graph("http://example.com/g");

    store.extend(vec![quad.clone()]).unwrap();
    let removed = store.remove(quad.as_ref()).unwrap();
    assert!(removed);
    assert!(!store.remove(quad.as_ref()).unwrap());

    let len = store.len().unwrap();
    assert_eq!(len, 0);
    // Removing the last quad keeps the graph.
    assert_eq!(store.named_graphs().unwrap().len(), 1);
}

#[test]
fn test_clear_graph() {
    let store = MemoryStore::new();

    let g1 = "http://example.com/g1";
    let g2 = "http://example.com/g2";

    store
        .extend(vec![example_quad_in_graph(g1), example_quad_in_graph(g2)])
        .unwrap();

    store
        .clear_graph(GraphNameRef::NamedNode(NamedNode::new(g1).unwrap().as_ref()))
        .unwrap();

    let len = store.len().unwrap();
    assert_eq!(len, 1);
    assert_eq!(store.named_graphs().unwrap().len(), 2);
}

#[test]
fn test_clear_unknown_graph_is_a_no_op() {
    let store = MemoryStore::new();
    store.extend(vec![example_quad()]).unwrap();

    let unknown = NamedNode::new("http://example.com/unknown").unwrap();
    store.clear_graph(unknown.as_ref().into()).unwrap();

    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_remove_named_graph() {
    let store = MemoryStore::new();
    let graph = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/graph").unwrap());

    store
        .extend(vec![example_quad(), example_quad_in_graph("http://example.com/graph")])
        .unwrap();
    let removed = store.drop_named_graph(graph.as_ref()).unwrap();
    assert!(removed);
    assert!(!store.drop_named_graph(graph.as_ref()).unwrap());

    let exists = store.contains_named_graph(graph.as_ref()).unwrap();
    assert!(!exists);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_pattern_scans_keep_insertion_order() {
    let store = MemoryStore::new();
    let predicate = NamedNode::new("http://example.com/predicate").unwrap();
    for name in ["c", "a", "b"] {
        store
            .insert(
                Quad::new(
                    NamedNode::new(format!("http://example.com/{name}")).unwrap(),
                    predicate.clone(),
                    Literal::new_simple_literal(name),
                    GraphName::DefaultGraph,
                )
                .as_ref(),
            )
            .unwrap();
    }
    store.extend(vec![example_quad_in_graph("http://example.com/g")]).unwrap();

    let quads = store
        .quads_for_pattern(None, Some(predicate.as_ref()), None, None)
        .unwrap();
    let lines = quads.iter().map(ToString::to_string).collect::<Vec<_>>();
    insta::assert_snapshot!(lines.join("\n"), @r#"
    <http://example.com/c> <http://example.com/predicate> "c"
    <http://example.com/a> <http://example.com/predicate> "a"
    <http://example.com/b> <http://example.com/predicate> "b"
    <http://example.com/subject> <http://example.com/predicate> "value" <http://example.com/g>
    "#);

    let default_graph = store
        .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        .unwrap();
    assert_eq!(default_graph.len(), 3);
}

#[test]
fn test_load_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("data.ttl");
    file.write_str("<http://example.com/s> <http://example.com/p> 1, 2 .")
        .unwrap();
    let iri = NamedNode::new(format!("file://{}", file.path().display())).unwrap();
    let graph = NamedNode::new("http://example.com/g").unwrap();

    let store = MemoryStore::new();
    let count = store.load(iri.as_ref(), graph.as_ref().into()).unwrap();

    assert_eq!(count, 2);
    let quads = store
        .quads_for_pattern(None, None, None, Some(graph.as_ref().into()))
        .unwrap();
    assert_eq!(quads.len(), 2);
    assert!(quads
        .iter()
        .all(|q| q.subject == Subject::from(NamedNode::new("http://example.com/s").unwrap())));
}

#[test]
fn test_load_missing_file() {
    let store = MemoryStore::new();
    let iri = NamedNode::new("file:///does/not/exist.ttl").unwrap();

    let result = store.load(iri.as_ref(), GraphNameRef::DefaultGraph);

    assert!(matches!(result, Err(StorageError::Io(_))));
}

fn example_quad() -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::DefaultGraph,
    )
}

fn example_quad_in_graph(graph: &str) -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::NamedNode(NamedNode::new(graph).unwrap()),
    )
}
