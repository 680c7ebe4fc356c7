#![allow(clippy::panic)]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rdf_algebra::logical::parse_query;
use rdf_algebra::model::{GraphName, NamedNode, Quad};
use rdf_algebra::Store;

const NODES: usize = 2_000;

fn path_closure(c: &mut Criterion) {
    let chain = Store::new();
    chain.extend(generate_chain(NODES)).unwrap();
    let random = Store::new();
    random.extend(generate_random_graph(NODES, 4)).unwrap();

    let one_or_more =
        parse_query("(path <http://example.com/node0> (path+ <http://example.com/next>) ?o)")
            .unwrap();
    let zero_or_more_unbound =
        parse_query("(path ?s (path* <http://example.com/next>) <http://example.com/node0>)")
            .unwrap();

    c.bench_function("path+ over a cycle", |b| {
        b.iter(|| chain.query(&one_or_more).unwrap());
    });
    c.bench_function("path+ over a random graph", |b| {
        b.iter(|| random.query(&one_or_more).unwrap());
    });
    c.bench_function("path* towards a fixed object", |b| {
        b.iter(|| random.query(&zero_or_more_unbound).unwrap());
    });
}

criterion_group!(paths, path_closure);
criterion_main!(paths);

fn node(i: usize) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/node{i}"))
}

fn edge(from: usize, to: usize) -> Quad {
    Quad::new(
        node(from),
        NamedNode::new_unchecked("http://example.com/next"),
        node(to),
        GraphName::DefaultGraph,
    )
}

/// A single cycle through all nodes.
fn generate_chain(count: usize) -> impl Iterator<Item = Quad> {
    (0..count).map(move |i| edge(i, (i + 1) % count))
}

fn generate_random_graph(count: usize, degree: usize) -> Vec<Quad> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .flat_map(|i| (0..degree).map(move |_| i))
        .map(|i| edge(i, rng.random_range(0..count)))
        .collect()
}
