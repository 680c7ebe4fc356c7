use rdf_algebra_common::StorageError;
use rdf_algebra_logical::ValidationError;
use rdf_algebra_model::{AlreadyBoundError, NamedNode, Variable};
use std::convert::Infallible;

/// An error that aborts the evaluation of a query or an update.
///
/// Errors of single expressions (e.g., a type error in a `FILTER`) are not reported through this
/// type. The operators turn them into `false` or unbound values.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// An error from the storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The operator tree is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// `EXTEND` tried to bind a variable that is already bound.
    #[error("The variable {0} is already bound")]
    AlreadyBound(Variable),
    /// The operator tree is nested deeper than the configured maximum.
    #[error("The maximum evaluation depth of {0} has been exceeded")]
    RecursionLimit(usize),
    /// The given `SERVICE` is not supported.
    #[error("The service {0} is not supported")]
    UnsupportedService(String),
    /// Error when `CREATE` tries to create an already existing graph
    #[error("The graph {0} already exists")]
    GraphAlreadyExists(NamedNode),
    /// Error when `DROP` or `CLEAR` tries to remove a not existing graph
    #[error("The graph {0} does not exist")]
    GraphDoesNotExist(NamedNode),
    /// Error when writing the results.
    #[error(transparent)]
    ResultsSerialization(std::io::Error),
    /// A graph serialization was requested for solutions or a boolean.
    #[error("The query results are not an RDF graph")]
    NotAGraph,
    #[error("An internal error that likely indicates towards a bug in the engine: {0}")]
    InternalError(String),
}

impl QueryEvaluationError {
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::InternalError(cause.into()))
    }
}

impl From<AlreadyBoundError> for QueryEvaluationError {
    fn from(error: AlreadyBoundError) -> Self {
        Self::AlreadyBound(error.0)
    }
}

impl From<Infallible> for QueryEvaluationError {
    #[inline]
    fn from(error: Infallible) -> Self {
        match error {}
    }
}
