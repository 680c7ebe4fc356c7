pub mod error;
mod queryable;

pub use error::StorageError;
pub use queryable::{Queryable, QueryableMut};
