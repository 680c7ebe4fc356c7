#![doc(test(attr(deny(warnings))))]

//! Contains the storage layer of RDF Algebra: an in-memory quad store that implements
//! [Queryable](rdf_algebra_common::Queryable) and
//! [QueryableMut](rdf_algebra_common::QueryableMut), and the resolution of documents for `LOAD`.

mod loader;
pub mod memory;

pub use memory::MemoryStore;
