//! The in-memory quad store.

mod object_id;
mod object_id_mapping;
mod quad_index;
mod store;

pub use object_id::{EncodedGraphObjectId, EncodedObjectId, ObjectIdQuad, DEFAULT_GRAPH_ID};
pub use object_id_mapping::ObjectIdMapping;
pub use store::MemoryStore;
