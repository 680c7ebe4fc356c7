use crate::error::QueryEvaluationError;
use crate::explanation::QueryExplanation;
use rdf_algebra_logical::{validate, Algebra, Optimizer};
use std::time::Instant;

/// Prepares operator trees for evaluation: validates them and, if enabled, runs the optimizer.
#[derive(Debug, Default)]
pub struct QueryPlanner {
    optimizer: Optimizer,
}

impl QueryPlanner {
    pub fn new(optimizer: Optimizer) -> Self {
        Self { optimizer }
    }

    /// Returns the tree to evaluate together with the explanation of how it was obtained.
    pub fn plan(
        &self,
        algebra: &Algebra,
        optimize: bool,
    ) -> Result<QueryExplanation, QueryEvaluationError> {
        let start = Instant::now();
        validate(algebra)?;
        let optimized_algebra = if optimize {
            self.optimizer.optimize(algebra.clone())
        } else {
            algebra.clone()
        };
        let planning_time = start.elapsed();
        tracing::debug!(?planning_time, optimize, "Planned query");
        Ok(QueryExplanation {
            planning_time,
            initial_algebra: algebra.clone(),
            optimized_algebra,
        })
    }
}
