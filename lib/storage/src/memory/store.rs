use crate::loader::open_document;
use crate::memory::object_id::{EncodedObjectId, ObjectIdQuad};
use crate::memory::object_id_mapping::ObjectIdMapping;
use crate::memory::quad_index::{QuadIndex, ScanInstructions};
use oxrdfio::{RdfFormat, RdfParser};
use rdf_algebra_common::{Queryable, QueryableMut, StorageError};
use rdf_algebra_model::{
    GraphName, GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef,
    SubjectRef, Term, TermRef,
};
use rustc_hash::FxHashSet;
use std::io::Read;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An in-memory quad store.
///
/// Terms are interned into [EncodedObjectId]s and quads are kept in insertion order, so pattern
/// scans over an unchanged store are deterministic. All methods take `&self`; a single
/// [RwLock] serializes writers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    object_ids: ObjectIdMapping,
    quads: QuadIndex,
    /// Named graphs in the order of their creation.
    named_graphs: Vec<EncodedObjectId>,
    named_graph_set: FxHashSet<EncodedObjectId>,
}

impl MemoryStore {
    /// Creates a new empty [MemoryStore].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of quads in the store.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.quads.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.read()?.quads.is_empty())
    }

    /// Inserts every quad of `quads`. Returns the number of newly inserted quads.
    pub fn extend(
        &self,
        quads: impl IntoIterator<Item = Quad>,
    ) -> Result<usize, StorageError> {
        let mut state = self.write()?;
        let mut count = 0;
        for quad in quads {
            if state.insert(quad.as_ref())? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Parses an RDF document and inserts its quads.
    ///
    /// If `graph_name` is given, all quads are put into that graph. Otherwise, the graphs of the
    /// document are kept. Returns the number of parsed quads.
    pub fn load_from_reader(
        &self,
        format: RdfFormat,
        reader: impl Read,
        base_iri: Option<&str>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Result<usize, StorageError> {
        let mut parser = RdfParser::from_format(format).rename_blank_nodes();
        if let Some(base_iri) = base_iri {
            parser = parser.with_base_iri(base_iri).map_err(StorageError::other)?;
        }
        let mut quads = Vec::new();
        for quad in parser.for_reader(reader) {
            let quad = quad?;
            quads.push(match graph_name {
                Some(graph_name) => Quad::new(
                    quad.subject,
                    quad.predicate,
                    quad.object,
                    graph_name.into_owned(),
                ),
                None => quad,
            });
        }
        let count = quads.len();
        let inserted = self.extend(quads)?;
        tracing::debug!(format = %format, count, inserted, "Loaded RDF document");
        Ok(count)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StorageError> {
        self.state
            .read()
            .map_err(|_| StorageError::other("The store lock is poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StorageError> {
        self.state
            .write()
            .map_err(|_| StorageError::other("The store lock is poisoned"))
    }
}

impl MemoryState {
    fn insert(&mut self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        let encoded = self.object_ids.encode_quad(quad)?;
        if let Some(graph) = encoded.graph_name.try_as_encoded_object_id() {
            self.register_named_graph(graph);
        }
        Ok(self.quads.insert(encoded))
    }

    fn register_named_graph(&mut self, graph: EncodedObjectId) -> bool {
        if !self.named_graph_set.insert(graph) {
            return false;
        }
        self.named_graphs.push(graph);
        true
    }

    fn encode_named_graph(
        &mut self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<EncodedObjectId, StorageError> {
        match graph_name {
            NamedOrBlankNodeRef::NamedNode(node) => self.object_ids.encode_term(node),
            NamedOrBlankNodeRef::BlankNode(node) => self.object_ids.encode_term(node),
        }
    }

    fn contains_named_graph(&self, graph_name: NamedOrBlankNodeRef<'_>) -> bool {
        self.object_ids
            .try_get_graph_id(graph_name.into())
            .and_then(|id| id.try_as_encoded_object_id())
            .is_some_and(|id| self.named_graph_set.contains(&id))
    }

    /// Builds the scan instructions for a pattern. Returns [None] if a bound term has never been
    /// stored, in which case nothing can match.
    fn scan_instructions(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Option<ScanInstructions> {
        let graph_name = match graph_name {
            Some(g) => Some(self.object_ids.try_get_graph_id(g)?),
            None => None,
        };
        let subject = match subject {
            Some(s) => Some(self.object_ids.try_get_object_id(TermRef::from(s))?),
            None => None,
        };
        let predicate = match predicate {
            Some(p) => Some(self.object_ids.try_get_object_id(p)?),
            None => None,
        };
        let object = match object {
            Some(o) => Some(self.object_ids.try_get_object_id(o)?),
            None => None,
        };
        Some(ScanInstructions {
            graph_name,
            subject,
            predicate,
            object,
        })
    }

    fn decode_quads(&self, quads: &[ObjectIdQuad]) -> Result<Vec<Quad>, StorageError> {
        quads
            .iter()
            .map(|quad| self.object_ids.decode_quad(quad))
            .collect()
    }
}

impl Queryable for MemoryStore {
    fn quads_for_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Result<Vec<Quad>, StorageError> {
        let state = self.read()?;
        let Some(instructions) = state.scan_instructions(subject, predicate, object, graph_name)
        else {
            return Ok(Vec::new());
        };
        state.decode_quads(&state.quads.scan(&instructions))
    }

    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        let state = self.read()?;
        state
            .named_graphs
            .iter()
            .map(|id| match state.object_ids.decode_term(*id)? {
                Term::NamedNode(node) => Ok(node.clone().into()),
                Term::BlankNode(node) => Ok(node.clone().into()),
                Term::Literal(_) => Err(StorageError::other("A literal is stored as graph name")),
            })
            .collect()
    }

    fn contains_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        Ok(self.read()?.contains_named_graph(graph_name))
    }
}

impl QueryableMut for MemoryStore {
    fn insert(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        self.write()?.insert(quad)
    }

    fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        let mut state = self.write()?;
        let Some(encoded) = state.object_ids.try_get_quad(quad) else {
            return Ok(false);
        };
        Ok(state.quads.remove(&encoded))
    }

    fn create_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        let mut state = self.write()?;
        let id = state.encode_named_graph(graph_name)?;
        Ok(state.register_named_graph(id))
    }

    fn drop_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        let mut state = self.write()?;
        if !state.contains_named_graph(graph_name) {
            return Ok(false);
        }
        let id = state.encode_named_graph(graph_name)?;
        let removed = state
            .quads
            .remove_matching(&ScanInstructions::for_graph(id.into()));
        state.named_graph_set.remove(&id);
        state.named_graphs.retain(|graph| *graph != id);
        tracing::debug!(graph = %graph_name, removed, "Dropped named graph");
        Ok(true)
    }

    fn clear_graph(&self, graph_name: GraphNameRef<'_>) -> Result<(), StorageError> {
        let mut state = self.write()?;
        if let Some(id) = state.object_ids.try_get_graph_id(graph_name) {
            let removed = state.quads.remove_matching(&ScanInstructions::for_graph(id));
            tracing::debug!(graph = %graph_name, removed, "Cleared graph");
        }
        Ok(())
    }

    fn load(
        &self,
        iri: NamedNodeRef<'_>,
        graph_name: GraphNameRef<'_>,
    ) -> Result<usize, StorageError> {
        let (format, reader) = open_document(iri.as_str())?;
        let count = self.load_from_reader(format, reader, Some(iri.as_str()), Some(graph_name))?;
        // An empty document still creates the target graph.
        match graph_name {
            GraphNameRef::NamedNode(node) => self.create_named_graph(node.into())?,
            GraphNameRef::BlankNode(node) => self.create_named_graph(node.into())?,
            GraphNameRef::DefaultGraph => false,
        };
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::{Literal, NamedNode};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://e/{name}"))
    }

    #[test]
    fn unknown_terms_match_nothing() {
        let store = MemoryStore::new();
        store
            .insert(QuadRef::new(
                ex("s").as_ref(),
                ex("p").as_ref(),
                Literal::from(1).as_ref(),
                GraphNameRef::DefaultGraph,
            ))
            .unwrap();
        let unknown = ex("unknown");
        assert!(store
            .quads_for_pattern(Some(unknown.as_ref().into()), None, None, None)
            .unwrap()
            .is_empty());
        assert_eq!(store.quads_for_pattern(None, None, None, None).unwrap().len(), 1);
    }

    #[test]
    fn reading_turtle_into_a_graph() {
        let store = MemoryStore::new();
        let graph = ex("g");
        let count = store
            .load_from_reader(
                RdfFormat::Turtle,
                "<s> <p> <o> , _:b .".as_bytes(),
                Some("http://e/"),
                Some(graph.as_ref().into()),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            store.named_graphs().unwrap(),
            [NamedOrBlankNode::from(graph.clone())]
        );
        let quads = store
            .quads_for_pattern(None, None, Some(ex("o").as_ref().into()), None)
            .unwrap();
        assert_eq!(
            quads,
            [Quad::new(ex("s"), ex("p"), ex("o"), GraphName::from(graph))]
        );
    }
}
