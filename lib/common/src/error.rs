use oxrdfio::RdfParseError;
use std::error::Error;
use std::io;

/// An error related to storage operations (reads, writes, loading documents).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error from the OS I/O layer.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The loaded document could not be parsed.
    #[error(transparent)]
    Parse(#[from] RdfParseError),
    /// The RDF format of a document could not be determined.
    #[error("Unable to determine the RDF format of {0}")]
    UnsupportedFormat(String),
    /// The document cannot be fetched from the given IRI.
    #[error("Unable to fetch documents from {0}")]
    UnsupportedIri(String),
    /// A named graph was expected to exist.
    #[error("The graph {0} does not exist")]
    GraphDoesNotExist(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StorageError {
    /// Builds an error from any other error.
    pub fn other(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(error) => error,
            StorageError::Parse(error) => Self::new(io::ErrorKind::InvalidData, error),
            other => Self::other(other),
        }
    }
}
