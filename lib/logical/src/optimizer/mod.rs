//! Semantics-preserving rewrites of operator trees.
//!
//! Each rule rewrites the whole tree and reports whether it changed anything. The [Optimizer]
//! runs its rules once, in order.

mod bgp_merge;
mod constant_folding;
mod join_reordering;

pub use bgp_merge::BgpMergeRule;
pub use constant_folding::ConstantFoldingRule;
pub use join_reordering::JoinReorderingRule;

use crate::transform::Transformed;
use crate::{Algebra, Query};
use std::fmt::Debug;

/// A rewrite of an operator tree.
pub trait OptimizerRule: Debug + Send + Sync {
    /// A unique, kebab-case name.
    fn name(&self) -> &str;

    fn rewrite(&self, algebra: Algebra) -> Transformed<Algebra>;
}

/// Runs a list of [OptimizerRule]s.
#[derive(Debug)]
pub struct Optimizer {
    rules: Vec<Box<dyn OptimizerRule>>,
}

impl Optimizer {
    /// Creates an optimizer without any rule.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl OptimizerRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn OptimizerRule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    pub fn optimize(&self, algebra: Algebra) -> Algebra {
        self.rules.iter().fold(algebra, |algebra, rule| {
            let result = rule.rewrite(algebra);
            tracing::debug!(
                rule = rule.name(),
                transformed = result.transformed,
                "Applied optimizer rule"
            );
            result.data
        })
    }

    /// Optimizes the pattern of a query.
    pub fn optimize_query(&self, mut query: Query) -> Query {
        let pattern = std::mem::replace(query.pattern_mut(), Algebra::unit());
        *query.pattern_mut() = self.optimize(pattern);
        query
    }
}

impl Default for Optimizer {
    /// Merges basic graph patterns, folds constants and then reorders joins.
    fn default() -> Self {
        Self::empty()
            .with_rule(BgpMergeRule::new())
            .with_rule(ConstantFoldingRule::new())
            .with_rule(JoinReorderingRule::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::parse_algebra;
    use insta::assert_snapshot;

    #[test]
    fn default_rules_run_in_order() {
        let optimizer = Optimizer::default();
        let names = optimizer.rules().map(|rule| rule.name().to_owned()).collect::<Vec<_>>();
        assert_eq!(names, ["bgp-merge", "constant-folding", "join-reordering"]);
    }

    #[test]
    fn optimize_combines_all_rules() {
        let algebra = parse_algebra(
            "(filter (= 1 1)
               (join
                 (bgp (triple ?s ?p ?o))
                 (bgp (triple ?s <http://e/p> <http://e/o>))))",
        )
        .unwrap();
        let optimized = Optimizer::default().optimize(algebra);
        assert_snapshot!(optimized, @"(bgp (triple ?s <http://e/p> <http://e/o>) (triple ?s ?p ?o))");
    }

    #[test]
    fn empty_optimizer_keeps_the_tree() {
        let algebra = parse_algebra("(filter (= 1 1) (table unit))").unwrap();
        assert_eq!(Optimizer::empty().optimize(algebra.clone()), algebra);
    }
}
