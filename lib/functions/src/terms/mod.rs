mod accessors;
mod constructors;
mod predicates;

pub use accessors::{DatatypeSparqlOp, LangSparqlOp, StrSparqlOp};
pub use constructors::{
    BNodeSparqlOp, IriSparqlOp, StrDtSparqlOp, StrLangSparqlOp, StrUuidSparqlOp, UuidSparqlOp,
};
pub use predicates::{IsBlankSparqlOp, IsIriSparqlOp, IsLiteralSparqlOp, IsNumericSparqlOp};
