#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
mod store;

pub use store::{QueryLanguage, Store};

pub mod model {
    pub use rdf_algebra_model::*;
}

pub mod logical {
    pub use rdf_algebra_logical::*;
}

pub mod storage {
    pub use rdf_algebra_common::{Queryable, QueryableMut, StorageError};
    pub use rdf_algebra_storage::*;
}

/// Evaluation entry points, options and results.
pub mod sparql {
    pub use rdf_algebra_engine::{
        evaluate_query, execute_update, ExpressionEvaluator, QueryEvaluationError,
        QueryExplanation, QueryOptions, QueryPlanner, QueryResults, QuerySolutions,
        UpdateOptions,
    };
    pub use rdf_algebra_logical::{Query, QueryDataset, Update};
    pub use sparesults::QueryResultsFormat;
}

pub mod io {
    pub use oxrdfio::RdfFormat;
}
