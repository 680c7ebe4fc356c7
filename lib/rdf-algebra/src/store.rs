//! API to evaluate the SPARQL algebra over an in-memory
//! [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
//!
//! The entry point of the module is the [`Store`] struct.
//!
//! Usage example:
//! ```
//! use rdf_algebra::model::*;
//! use rdf_algebra::sparql::QueryResults;
//! use rdf_algebra::Store;
//!
//! let store = Store::new();
//!
//! // insertion
//! let ex = NamedNode::new("http://example.com")?;
//! let quad = Quad::new(ex.clone(), ex.clone(), ex.clone(), GraphName::DefaultGraph);
//! store.insert(&quad)?;
//!
//! // quad filter
//! let results = store.quads_for_pattern(None, None, None, None)?;
//! assert_eq!(vec![quad], results);
//!
//! // algebra query
//! if let QueryResults::Solutions(solutions) = store.query_sse("(bgp (triple ?s ?p ?o))")? {
//!     let s = Variable::new("s");
//!     assert_eq!(solutions.iter().next().and_then(|solution| solution.get(&s)), Some(&ex.into()));
//! }
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::{QueryError, SerializerError};
use oxrdfio::{RdfFormat, RdfSerializer};
use rdf_algebra_common::{Queryable, QueryableMut, StorageError};
use rdf_algebra_engine::{
    evaluate_query, execute_update, QueryEvaluationError, QueryExplanation, QueryOptions,
    QueryResults, UpdateOptions,
};
use rdf_algebra_logical::{parse_query, parse_update, Query, Update};
use rdf_algebra_model::{
    GraphNameRef, NamedNodeRef, NamedOrBlankNode, Quad, QuadRef, SubjectRef, TermRef,
};
use rdf_algebra_storage::MemoryStore;
use std::io::{Read, Write};
use std::sync::Arc;

/// The notation of a query or an update given as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryLanguage {
    /// The SSE notation of the algebra, e.g. `(bgp (triple ?s ?p ?o))`.
    #[default]
    Sse,
    /// SPARQL 1.1, translated into the algebra.
    Sparql,
}

impl QueryLanguage {
    /// Parses a query. `base_iri` is only used by SPARQL; SSE uses `(base <iri> ...)`.
    pub fn parse_query(self, query: &str, base_iri: Option<&str>) -> Result<Query, QueryError> {
        Ok(match self {
            Self::Sse => parse_query(query)?,
            Self::Sparql => Query::try_from(&spargebra::Query::parse(query, base_iri)?)?,
        })
    }

    /// Parses an update. `base_iri` is only used by SPARQL.
    pub fn parse_update(self, update: &str, base_iri: Option<&str>) -> Result<Update, QueryError> {
        Ok(match self {
            Self::Sse => parse_update(update)?,
            Self::Sparql => Update::try_from(&spargebra::Update::parse(update, base_iri)?)?,
        })
    }
}

/// An in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) store that
/// evaluates algebra queries and updates.
///
/// Cloning a [Store] is cheap. All clones share the same quads.
#[derive(Debug, Clone, Default)]
pub struct Store {
    storage: Arc<MemoryStore>,
}

impl Store {
    /// Creates an empty [Store].
    pub fn new() -> Store {
        Self::default()
    }

    /// Returns the backing storage. It implements [Queryable] and [QueryableMut].
    pub fn storage(&self) -> &MemoryStore {
        &self.storage
    }

    /// Executes a query in the SSE notation, e.g. `(ask (bgp (triple ?s ?p ?o)))`.
    pub fn query_sse(&self, query: &str) -> Result<QueryResults, QueryError> {
        let query = QueryLanguage::Sse.parse_query(query, None)?;
        Ok(self.query(&query)?)
    }

    /// Executes a [SPARQL 1.1 query](https://www.w3.org/TR/sparql11-query/).
    ///
    /// ```
    /// use rdf_algebra::sparql::QueryResults;
    /// use rdf_algebra::Store;
    ///
    /// let store = Store::new();
    /// let results = store.query_sparql("ASK { FILTER(1 < 2) }")?;
    /// assert_eq!(results, QueryResults::Boolean(true));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn query_sparql(&self, query: &str) -> Result<QueryResults, QueryError> {
        let query = QueryLanguage::Sparql.parse_query(query, None)?;
        Ok(self.query(&query)?)
    }

    pub fn query(&self, query: &Query) -> Result<QueryResults, QueryEvaluationError> {
        self.query_opt(query, &QueryOptions::default())
    }

    /// Executes a query with some options.
    pub fn query_opt(
        &self,
        query: &Query,
        options: &QueryOptions,
    ) -> Result<QueryResults, QueryEvaluationError> {
        self.explain_query_opt(query, options)
            .map(|(results, _)| results)
    }

    /// Executes a query and returns an explanation with the operator tree before and after the
    /// optimization.
    pub fn explain_query_opt(
        &self,
        query: &Query,
        options: &QueryOptions,
    ) -> Result<(QueryResults, QueryExplanation), QueryEvaluationError> {
        evaluate_query(self.storage.as_ref(), query, options)
    }

    /// Executes an update in the SSE notation, e.g. `(insertData (triple <s> <p> <o>))`.
    pub fn update_sse(&self, update: &str) -> Result<(), QueryError> {
        let update = QueryLanguage::Sse.parse_update(update, None)?;
        Ok(self.update(&update)?)
    }

    /// Executes a [SPARQL 1.1 update](https://www.w3.org/TR/sparql11-update/).
    ///
    /// ```
    /// use rdf_algebra::model::*;
    /// use rdf_algebra::Store;
    ///
    /// let store = Store::new();
    /// store.update_sparql(
    ///     "INSERT DATA { <http://example.com> <http://example.com> <http://example.com> }",
    /// )?;
    ///
    /// let ex = NamedNodeRef::new("http://example.com")?;
    /// assert!(store.contains(QuadRef::new(ex, ex, ex, GraphNameRef::DefaultGraph))?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn update_sparql(&self, update: &str) -> Result<(), QueryError> {
        let update = QueryLanguage::Sparql.parse_update(update, None)?;
        Ok(self.update(&update)?)
    }

    pub fn update(&self, update: &Update) -> Result<(), QueryEvaluationError> {
        self.update_opt(update, &UpdateOptions::default())
    }

    /// Executes an update with some options.
    ///
    /// The operations are applied in order. Operations applied before a failing one are kept.
    pub fn update_opt(
        &self,
        update: &Update,
        options: &UpdateOptions,
    ) -> Result<(), QueryEvaluationError> {
        execute_update(self.storage.as_ref(), update, options)
    }

    /// Retrieves quads with a filter on each quad component.
    pub fn quads_for_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Result<Vec<Quad>, StorageError> {
        self.storage
            .quads_for_pattern(subject, predicate, object, graph_name)
    }

    /// Checks if this store contains a given quad.
    pub fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        let quad = quad.into();
        Ok(!self
            .storage
            .quads_for_pattern(
                Some(quad.subject),
                Some(quad.predicate),
                Some(quad.object),
                Some(quad.graph_name),
            )?
            .is_empty())
    }

    /// Returns the number of quads in the store.
    pub fn len(&self) -> Result<usize, StorageError> {
        self.storage.len()
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.storage.is_empty()
    }

    /// Returns the named graphs in the order of their creation.
    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.storage.named_graphs()
    }

    /// Adds a quad to this store. Returns `true` if the quad was not already in the store.
    pub fn insert<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.storage.insert(quad.into())
    }

    /// Adds atomically a set of quads to this store. Returns the number of new quads.
    pub fn extend(&self, quads: impl IntoIterator<Item = Quad>) -> Result<usize, StorageError> {
        self.storage.extend(quads)
    }

    /// Removes a quad from this store. Returns `true` if the quad was in the store.
    pub fn remove<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.storage.remove(quad.into())
    }

    /// Loads an RDF document into the store. The graphs of the document are kept.
    ///
    /// ```
    /// use rdf_algebra::io::RdfFormat;
    /// use rdf_algebra::Store;
    ///
    /// let store = Store::new();
    /// let count = store.load_from_reader(
    ///     RdfFormat::NQuads,
    ///     "<http://e/s> <http://e/p> <http://e/o> <http://e/g> .".as_bytes(),
    /// )?;
    /// assert_eq!(count, 1);
    /// assert_eq!(store.named_graphs()?.len(), 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn load_from_reader(
        &self,
        format: RdfFormat,
        reader: impl Read,
    ) -> Result<usize, StorageError> {
        self.storage.load_from_reader(format, reader, None, None)
    }

    /// Loads an RDF document into a single graph of the store.
    pub fn load_graph(
        &self,
        format: RdfFormat,
        reader: impl Read,
        graph_name: GraphNameRef<'_>,
        base_iri: Option<&str>,
    ) -> Result<usize, StorageError> {
        self.storage
            .load_from_reader(format, reader, base_iri, Some(graph_name))
    }

    /// Dumps the store into a file. The format must support datasets.
    pub fn dump_to_writer<W: Write>(
        &self,
        format: RdfFormat,
        writer: W,
    ) -> Result<W, SerializerError> {
        if !format.supports_datasets() {
            return Err(SerializerError::DatasetFormatExpected(format));
        }
        let mut serializer = RdfSerializer::from_format(format).for_writer(writer);
        for quad in self.quads_for_pattern(None, None, None, None)? {
            serializer.serialize_quad(&quad)?;
        }
        Ok(serializer.finish()?)
    }

    /// Dumps a graph of the store into a file.
    pub fn dump_graph_to_writer<W: Write>(
        &self,
        graph_name: GraphNameRef<'_>,
        format: RdfFormat,
        writer: W,
    ) -> Result<W, SerializerError> {
        let mut serializer = RdfSerializer::from_format(format).for_writer(writer);
        for quad in self.quads_for_pattern(None, None, None, Some(graph_name))? {
            serializer.serialize_triple(quad.as_ref())?;
        }
        Ok(serializer.finish()?)
    }
}
