use std::fmt::{Display, Formatter};

/// The id of a term in the [ObjectIdMapping](super::ObjectIdMapping) of a store.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct EncodedObjectId(u32);

impl EncodedObjectId {
    /// The smallest id that is assigned to a term. Smaller ids are reserved.
    pub const MIN_TERM: EncodedObjectId = EncodedObjectId(1);

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Option<EncodedObjectId> {
        self.0.checked_add(1).map(EncodedObjectId)
    }
}

impl Display for EncodedObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The id of the default graph.
pub const DEFAULT_GRAPH_ID: EncodedGraphObjectId = EncodedGraphObjectId(EncodedObjectId(0));

/// Wraps an [EncodedObjectId] to indicate that the id may represent the default graph.
///
/// The [DEFAULT_GRAPH_ID] is used for identifying the default graph.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct EncodedGraphObjectId(pub EncodedObjectId);

impl EncodedGraphObjectId {
    /// Returns true if this id represents the default graph.
    pub fn is_default_graph(self) -> bool {
        self == DEFAULT_GRAPH_ID
    }

    /// Returns the graph id as an [EncodedObjectId] if it is a named graph. Otherwise, returns
    /// [None].
    pub fn try_as_encoded_object_id(self) -> Option<EncodedObjectId> {
        if self.is_default_graph() {
            return None;
        }
        Some(self.0)
    }
}

impl From<EncodedObjectId> for EncodedGraphObjectId {
    fn from(value: EncodedObjectId) -> Self {
        EncodedGraphObjectId(value)
    }
}

/// A quad whose terms have been replaced by their ids.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct ObjectIdQuad {
    pub graph_name: EncodedGraphObjectId,
    pub subject: EncodedObjectId,
    pub predicate: EncodedObjectId,
    pub object: EncodedObjectId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_ids_never_denote_the_default_graph() {
        assert!(!EncodedGraphObjectId::from(EncodedObjectId::MIN_TERM).is_default_graph());
        assert_eq!(DEFAULT_GRAPH_ID.try_as_encoded_object_id(), None);
        assert_eq!(
            EncodedObjectId::MIN_TERM.next().map(EncodedObjectId::as_u32),
            Some(2)
        );
    }
}
