mod error;
mod numeric;
mod order;
mod solution;
mod string_literal;
mod typed_value;
mod variable;

pub use error::*;
pub use numeric::*;
pub use order::*;
pub use solution::*;
pub use string_literal::*;
pub use typed_value::*;
pub use variable::*;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::dataset::CanonicalizationAlgorithm;
pub use oxrdf::vocab;
pub use oxrdf::Variable as OxVariable;
pub use oxrdf::{
    BlankNode, BlankNodeRef, Dataset, Graph, GraphName, GraphNameRef, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef,
};

// Re-export the XSD value types.
pub use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, Integer, Time,
    YearMonthDuration,
};
