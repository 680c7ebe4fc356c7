use crate::error::StorageError;
use rdf_algebra_model::{
    GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, SubjectRef,
    TermRef,
};

/// Read access to a quad store.
///
/// The algebra engine never assumes any indexing strategy. It only relies on the returned quads
/// matching every bound component of the requested pattern.
pub trait Queryable {
    /// Returns all quads that match the given pattern. A component that is [None] matches
    /// anything.
    ///
    /// The quads must be returned in a deterministic order for an unchanged store.
    fn quads_for_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Result<Vec<Quad>, StorageError>;

    /// Returns the list of named graphs in the store.
    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Returns whether `graph_name` is a named graph in the store.
    fn contains_named_graph(&self, graph_name: NamedOrBlankNodeRef<'_>)
        -> Result<bool, StorageError>;
}

/// Write access to a quad store, used by the update operators.
///
/// The methods take `&self`. Implementations are responsible for their own synchronization.
pub trait QueryableMut: Queryable {
    /// Inserts a quad. Returns `true` if the quad was not present before.
    fn insert(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;

    /// Removes a quad. Returns `true` if the quad was present.
    fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;

    /// Creates an empty named graph. Returns `false` if the graph already existed.
    fn create_named_graph(&self, graph_name: NamedOrBlankNodeRef<'_>)
        -> Result<bool, StorageError>;

    /// Removes a named graph and all its quads. Returns `false` if the graph did not exist.
    fn drop_named_graph(&self, graph_name: NamedOrBlankNodeRef<'_>)
        -> Result<bool, StorageError>;

    /// Removes all quads of a graph. The graph itself stays in the store.
    fn clear_graph(&self, graph_name: GraphNameRef<'_>) -> Result<(), StorageError>;

    /// Fetches the RDF document identified by `iri` and inserts its triples into `graph_name`.
    ///
    /// Returns the number of loaded triples.
    fn load(
        &self,
        iri: NamedNodeRef<'_>,
        graph_name: GraphNameRef<'_>,
    ) -> Result<usize, StorageError>;
}
