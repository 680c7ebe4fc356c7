use crate::memory::object_id::{
    EncodedGraphObjectId, EncodedObjectId, ObjectIdQuad, DEFAULT_GRAPH_ID,
};
use rdf_algebra_common::StorageError;
use rdf_algebra_model::{GraphName, GraphNameRef, NamedNode, Quad, QuadRef, Subject, Term, TermRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// A term whose strings have been interned.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
enum EncodedTerm {
    NamedNode(Arc<str>),
    BlankNode(Arc<str>),
    /// The value and the datatype.
    TypedLiteral(Arc<str>, Arc<str>),
    /// The value and the language.
    LangString(Arc<str>, Arc<str>),
}

/// Assigns a stable [EncodedObjectId] to every term stored in a [MemoryStore](crate::MemoryStore).
///
/// Ids are never reused. Terms stay in the mapping after their last quad has been removed.
#[derive(Debug)]
pub struct ObjectIdMapping {
    next_id: EncodedObjectId,
    str_interning: FxHashSet<Arc<str>>,
    id2term: Vec<Term>,
    term2id: FxHashMap<EncodedTerm, EncodedObjectId>,
}

impl Default for ObjectIdMapping {
    fn default() -> Self {
        Self {
            next_id: EncodedObjectId::MIN_TERM,
            str_interning: FxHashSet::default(),
            id2term: Vec::new(),
            term2id: FxHashMap::default(),
        }
    }
}

impl ObjectIdMapping {
    /// The number of distinct terms.
    pub fn len(&self) -> usize {
        self.id2term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2term.is_empty()
    }

    /// Returns the id of `term`, assigning a new one if the term is unknown.
    pub fn encode_term<'a>(
        &mut self,
        term: impl Into<TermRef<'a>>,
    ) -> Result<EncodedObjectId, StorageError> {
        let term = term.into();
        let encoded_term = self.obtain_encoded_term(term);
        if let Some(id) = self.term2id.get(&encoded_term) {
            return Ok(*id);
        }
        let id = self.next_id;
        self.next_id = id
            .next()
            .ok_or_else(|| StorageError::other("The store ran out of object ids"))?;
        self.id2term.push(term.into_owned());
        self.term2id.insert(encoded_term, id);
        Ok(id)
    }

    pub fn encode_quad(&mut self, quad: QuadRef<'_>) -> Result<ObjectIdQuad, StorageError> {
        let graph_name = match quad.graph_name {
            GraphNameRef::NamedNode(node) => self.encode_term(node)?.into(),
            GraphNameRef::BlankNode(node) => self.encode_term(node)?.into(),
            GraphNameRef::DefaultGraph => DEFAULT_GRAPH_ID,
        };
        Ok(ObjectIdQuad {
            graph_name,
            subject: self.encode_term(quad.subject)?,
            predicate: self.encode_term(quad.predicate)?,
            object: self.encode_term(quad.object)?,
        })
    }

    /// Returns the id of `term` if the term has ever been stored.
    pub fn try_get_object_id<'a>(&self, term: impl Into<TermRef<'a>>) -> Option<EncodedObjectId> {
        self.try_get_encoded_term(term.into())
            .and_then(|term| self.term2id.get(&term).copied())
    }

    pub fn try_get_graph_id(&self, graph_name: GraphNameRef<'_>) -> Option<EncodedGraphObjectId> {
        match graph_name {
            GraphNameRef::NamedNode(node) => self.try_get_object_id(node).map(Into::into),
            GraphNameRef::BlankNode(node) => self.try_get_object_id(node).map(Into::into),
            GraphNameRef::DefaultGraph => Some(DEFAULT_GRAPH_ID),
        }
    }

    pub fn try_get_quad(&self, quad: QuadRef<'_>) -> Option<ObjectIdQuad> {
        Some(ObjectIdQuad {
            graph_name: self.try_get_graph_id(quad.graph_name)?,
            subject: self.try_get_object_id(quad.subject)?,
            predicate: self.try_get_object_id(quad.predicate)?,
            object: self.try_get_object_id(quad.object)?,
        })
    }

    pub fn decode_term(&self, id: EncodedObjectId) -> Result<&Term, StorageError> {
        id.as_u32()
            .checked_sub(EncodedObjectId::MIN_TERM.as_u32())
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.id2term.get(index))
            .ok_or_else(|| StorageError::other(format!("Unknown object id {id}")))
    }

    pub fn decode_quad(&self, quad: &ObjectIdQuad) -> Result<Quad, StorageError> {
        let subject = match self.decode_term(quad.subject)? {
            Term::NamedNode(node) => Subject::from(node.clone()),
            Term::BlankNode(node) => Subject::from(node.clone()),
            Term::Literal(_) => return Err(StorageError::other("A literal is stored as subject")),
        };
        let predicate = match self.decode_term(quad.predicate)? {
            Term::NamedNode(node) => NamedNode::clone(node),
            _ => return Err(StorageError::other("A non-IRI is stored as predicate")),
        };
        let graph_name = match quad.graph_name.try_as_encoded_object_id() {
            None => GraphName::DefaultGraph,
            Some(id) => match self.decode_term(id)? {
                Term::NamedNode(node) => node.clone().into(),
                Term::BlankNode(node) => node.clone().into(),
                Term::Literal(_) => {
                    return Err(StorageError::other("A literal is stored as graph name"))
                }
            },
        };
        Ok(Quad::new(
            subject,
            predicate,
            self.decode_term(quad.object)?.clone(),
            graph_name,
        ))
    }

    fn intern_str(&mut self, value: &str) -> Arc<str> {
        if let Some(found) = self.str_interning.get(value) {
            return Arc::clone(found);
        }
        let result = Arc::<str>::from(value);
        self.str_interning.insert(Arc::clone(&result));
        result
    }

    fn obtain_encoded_term(&mut self, term: TermRef<'_>) -> EncodedTerm {
        match term {
            TermRef::NamedNode(nn) => EncodedTerm::NamedNode(self.intern_str(nn.as_str())),
            TermRef::BlankNode(bnode) => EncodedTerm::BlankNode(self.intern_str(bnode.as_str())),
            TermRef::Literal(lit) => {
                let value = self.intern_str(lit.value());
                if let Some(language) = lit.language() {
                    EncodedTerm::LangString(value, self.intern_str(language))
                } else {
                    EncodedTerm::TypedLiteral(value, self.intern_str(lit.datatype().as_str()))
                }
            }
        }
    }

    fn try_get_encoded_term(&self, term: TermRef<'_>) -> Option<EncodedTerm> {
        let interned = |value: &str| self.str_interning.get(value).cloned();
        Some(match term {
            TermRef::NamedNode(nn) => EncodedTerm::NamedNode(interned(nn.as_str())?),
            TermRef::BlankNode(bnode) => EncodedTerm::BlankNode(interned(bnode.as_str())?),
            TermRef::Literal(lit) => match lit.language() {
                Some(language) => {
                    EncodedTerm::LangString(interned(lit.value())?, interned(language)?)
                }
                None => EncodedTerm::TypedLiteral(
                    interned(lit.value())?,
                    interned(lit.datatype().as_str())?,
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::Literal;

    #[test]
    fn equal_terms_share_an_id() {
        let mut mapping = ObjectIdMapping::default();
        let node = NamedNode::new_unchecked("http://e/a");
        let first = mapping.encode_term(node.as_ref()).unwrap();
        let second = mapping.encode_term(node.as_ref()).unwrap();
        assert_eq!(first, second);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.decode_term(first).unwrap(), &Term::from(node));
    }

    #[test]
    fn literals_with_the_same_lexical_form_differ() {
        let mut mapping = ObjectIdMapping::default();
        let plain = mapping.encode_term(Literal::new_simple_literal("1").as_ref()).unwrap();
        let integer = mapping.encode_term(Literal::from(1).as_ref()).unwrap();
        let english = mapping
            .encode_term(Literal::new_language_tagged_literal_unchecked("1", "en").as_ref())
            .unwrap();
        assert_ne!(plain, integer);
        assert_ne!(plain, english);
        assert_eq!(
            mapping.try_get_object_id(Literal::new_simple_literal("2").as_ref()),
            None
        );
    }

    #[test]
    fn quads_round_trip_through_ids() {
        let mut mapping = ObjectIdMapping::default();
        let node = NamedNode::new_unchecked("http://e/a");
        let quad = Quad::new(node.clone(), node.clone(), Literal::from(1), GraphName::from(node));
        let encoded = mapping.encode_quad(quad.as_ref()).unwrap();
        assert_eq!(mapping.try_get_quad(quad.as_ref()), Some(encoded));
        assert_eq!(mapping.decode_quad(&encoded).unwrap(), quad);
    }
}
