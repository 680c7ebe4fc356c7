//! Evaluation of SPARQL algebra trees against a [Queryable](rdf_algebra_common::Queryable).
//!
//! The [Evaluator] materializes the solutions of every operator bottom-up. [evaluate_query]
//! wraps it with validation, optimization and the query forms, [execute_update] runs update
//! operations against a [QueryableMut](rdf_algebra_common::QueryableMut).

mod context;
mod error;
mod eval;
mod explanation;
mod options;
mod planner;
mod query;
mod results;
mod update;

pub use context::{ActiveGraph, DatasetView, ExecutionContext};
pub use error::QueryEvaluationError;
pub use eval::{Evaluator, ExpressionEvaluator, Solutions};
pub use explanation::QueryExplanation;
pub use options::{QueryOptions, UpdateOptions};
pub use planner::QueryPlanner;
pub use query::evaluate_query;
pub use results::{QueryResults, QuerySolutions};
pub use update::execute_update;
