//! An index over [ObjectIdQuad]s that preserves the insertion order.
//!
//! Quads are appended to a log. Removing a quad leaves a tombstone behind. For every component
//! (graph name, subject, predicate, object), a posting list maps each id to the log positions of
//! the quads containing it. A scan walks the shortest posting list of the bound components and
//! checks the remaining components, so the result is always in insertion order.

use crate::memory::object_id::{EncodedGraphObjectId, EncodedObjectId, ObjectIdQuad};
use rustc_hash::FxHashMap;

/// One component of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexComponent {
    GraphName,
    Subject,
    Predicate,
    Object,
}

/// The bound components of a quad pattern. [None] matches anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanInstructions {
    pub graph_name: Option<EncodedGraphObjectId>,
    pub subject: Option<EncodedObjectId>,
    pub predicate: Option<EncodedObjectId>,
    pub object: Option<EncodedObjectId>,
}

impl ScanInstructions {
    pub fn for_graph(graph_name: EncodedGraphObjectId) -> Self {
        Self {
            graph_name: Some(graph_name),
            ..Self::default()
        }
    }

    fn bound_components(&self) -> impl Iterator<Item = (IndexComponent, EncodedObjectId)> {
        [
            (IndexComponent::GraphName, self.graph_name.map(|g| g.0)),
            (IndexComponent::Subject, self.subject),
            (IndexComponent::Predicate, self.predicate),
            (IndexComponent::Object, self.object),
        ]
        .into_iter()
        .filter_map(|(component, id)| Some((component, id?)))
    }

    fn matches(&self, quad: &ObjectIdQuad) -> bool {
        self.graph_name.map_or(true, |g| g == quad.graph_name)
            && self.subject.map_or(true, |s| s == quad.subject)
            && self.predicate.map_or(true, |p| p == quad.predicate)
            && self.object.map_or(true, |o| o == quad.object)
    }
}

#[derive(Debug, Default)]
pub struct QuadIndex {
    log: Vec<Option<ObjectIdQuad>>,
    positions: FxHashMap<ObjectIdQuad, usize>,
    postings: FxHashMap<(IndexComponent, EncodedObjectId), Vec<usize>>,
}

impl QuadIndex {
    /// Returns the number of quads.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, quad: &ObjectIdQuad) -> bool {
        self.positions.contains_key(quad)
    }

    /// Inserts a quad. Returns `false` if the quad was already contained.
    pub fn insert(&mut self, quad: ObjectIdQuad) -> bool {
        if self.positions.contains_key(&quad) {
            return false;
        }
        let position = self.log.len();
        self.log.push(Some(quad));
        self.positions.insert(quad, position);
        for key in [
            (IndexComponent::GraphName, quad.graph_name.0),
            (IndexComponent::Subject, quad.subject),
            (IndexComponent::Predicate, quad.predicate),
            (IndexComponent::Object, quad.object),
        ] {
            self.postings.entry(key).or_default().push(position);
        }
        true
    }

    /// Removes a quad. Returns `false` if the quad was not contained.
    pub fn remove(&mut self, quad: &ObjectIdQuad) -> bool {
        let Some(position) = self.positions.remove(quad) else {
            return false;
        };
        self.log[position] = None;
        true
    }

    /// Removes all quads matching `instructions` and returns how many were removed.
    pub fn remove_matching(&mut self, instructions: &ScanInstructions) -> usize {
        let quads = self.scan(instructions);
        quads.iter().filter(|quad| self.remove(quad)).count()
    }

    /// Returns the quads matching `instructions` in insertion order.
    pub fn scan(&self, instructions: &ScanInstructions) -> Vec<ObjectIdQuad> {
        let shortest = instructions
            .bound_components()
            .map(|key| self.postings.get(&key).map_or(&[][..], Vec::as_slice))
            .min_by_key(|positions| positions.len());
        let quads: Box<dyn Iterator<Item = &ObjectIdQuad>> = match shortest {
            Some(positions) => Box::new(
                positions
                    .iter()
                    .filter_map(|position| self.log.get(*position)?.as_ref()),
            ),
            None => Box::new(self.log.iter().flatten()),
        };
        quads
            .filter(|quad| instructions.matches(quad))
            .copied()
            .collect()
    }
}
