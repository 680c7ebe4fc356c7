use oxrdfio::RdfFormat;
use rdf_algebra_common::StorageError;
use rdf_algebra_engine::QueryEvaluationError;
use rdf_algebra_logical::{SseParseError, ValidationError};
use spargebra::SparqlSyntaxError;
use std::io;

/// An error raised while parsing and executing a query or an update given as text.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The SSE notation could not be read.
    #[error(transparent)]
    Sse(#[from] SseParseError),
    /// The SPARQL syntax is invalid.
    #[error(transparent)]
    Sparql(#[from] SparqlSyntaxError),
    /// The SPARQL query uses a construct that has no counterpart in the algebra.
    #[error(transparent)]
    Translation(#[from] ValidationError),
    /// An error raised during the evaluation.
    #[error(transparent)]
    Evaluation(#[from] QueryEvaluationError),
}

/// An error raised while writing the content of a [`Store`](crate::Store).
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    /// An error raised while writing the content.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error raised while reading the quads of the store.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A format compatible with
    /// [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) is required.
    #[error("A RDF format supporting datasets was expected, {0} found")]
    DatasetFormatExpected(RdfFormat),
}
