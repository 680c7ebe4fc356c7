//! The SPARQL algebra: operator trees, their SSE notation, structural validation and
//! optimization.

mod algebra;
mod error;
mod expression;
pub mod optimizer;
mod path;
pub mod pattern;
mod query;
pub mod scalar;
pub mod sparql;
pub mod sse;
mod transform;
mod update;
mod validate;

pub use algebra::{AggregateExpression, Algebra, OrderExpression};
pub use error::{SseParseError, ValidationError};
pub use expression::Expression;
pub use optimizer::{Optimizer, OptimizerRule};
pub use path::{NegatedMember, PropertyPath};
pub use query::{Query, QueryDataset};
pub use sse::{parse_algebra, parse_expression, parse_query, parse_update};
pub use transform::{to_binary, Transformed};
pub use update::{GraphTarget, Update, UpdateOperation};
pub use validate::{validate, validate_query, validate_update};
