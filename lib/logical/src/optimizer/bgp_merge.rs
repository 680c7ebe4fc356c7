use crate::optimizer::OptimizerRule;
use crate::pattern::TriplePattern;
use crate::transform::Transformed;
use crate::Algebra;

/// Merges the join of two basic graph patterns into a single basic graph pattern.
///
/// Only applies if the two patterns do not share a blank node, as a blank node is scoped to its
/// basic graph pattern.
#[derive(Debug, Default)]
pub struct BgpMergeRule;

impl BgpMergeRule {
    pub fn new() -> Self {
        Self
    }
}

impl OptimizerRule for BgpMergeRule {
    fn name(&self) -> &str {
        "bgp-merge"
    }

    fn rewrite(&self, algebra: Algebra) -> Transformed<Algebra> {
        algebra.transform_up(&mut |algebra| match algebra {
            Algebra::Join { left, right } => match (*left, *right) {
                (Algebra::Bgp { patterns: mut left }, Algebra::Bgp { patterns: right })
                    if shares_no_blank_node(&left, &right) =>
                {
                    left.extend(right);
                    Transformed::yes(Algebra::Bgp { patterns: left })
                }
                (left, right) => Transformed::no(Algebra::join(left, right)),
            },
            other => Transformed::no(other),
        })
    }
}

fn shares_no_blank_node(left: &[TriplePattern], right: &[TriplePattern]) -> bool {
    left.iter()
        .flat_map(TriplePattern::blank_nodes)
        .all(|node| !right.iter().flat_map(TriplePattern::blank_nodes).any(|other| other == node))
}
