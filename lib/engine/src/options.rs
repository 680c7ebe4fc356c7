use rdf_algebra_model::{Iri, Solution};

/// Options for query evaluation.
///
/// ```
/// use rdf_algebra_engine::QueryOptions;
///
/// let options = QueryOptions::default().without_optimizations().with_max_depth(64);
/// assert!(!options.optimize);
/// ```
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Whether the optimizer rewrites the operator tree before evaluation.
    pub optimize: bool,
    /// The maximal nesting depth of evaluated operators (including `EXISTS` patterns).
    pub max_depth: usize,
    /// The base IRI used by `IRI(...)` if the query has none.
    pub base_iri: Option<Iri<String>>,
    /// Bindings that every solution of the query must be compatible with.
    pub bindings: Solution,
    /// Whether the default graph is the union of all graphs of the store when the query has no
    /// `FROM` clause.
    pub default_graph_as_union: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            max_depth: 256,
            base_iri: None,
            bindings: Solution::new(),
            default_graph_as_union: false,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn without_optimizations(mut self) -> Self {
        self.optimize = false;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_base_iri(mut self, base_iri: Iri<String>) -> Self {
        self.base_iri = Some(base_iri);
        self
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: Solution) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_default_graph_as_union(mut self) -> Self {
        self.default_graph_as_union = true;
        self
    }
}

/// Options for update evaluation.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// The options used to evaluate the `WHERE` patterns.
    pub query_options: QueryOptions,
}

impl UpdateOptions {
    /// The base IRI used by `IRI(...)` if the update has none.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: Iri<String>) -> Self {
        self.query_options.base_iri = Some(base_iri);
        self
    }
}

impl From<QueryOptions> for UpdateOptions {
    #[inline]
    fn from(query_options: QueryOptions) -> Self {
        Self { query_options }
    }
}
