use rdf_algebra_logical::Algebra;
use std::time::Duration;

/// Describes how a query has been planned.
#[derive(Debug, Clone)]
pub struct QueryExplanation {
    /// The time spent validating and optimizing the query.
    pub planning_time: Duration,
    /// The operator tree as written in the query.
    pub initial_algebra: Algebra,
    /// The operator tree that was actually evaluated.
    pub optimized_algebra: Algebra,
}
