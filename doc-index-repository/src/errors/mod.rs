//! Error types for the document index repository.

mod doc_index_error;
mod engine_error;

pub use doc_index_error::DocIndexError;
pub use engine_error::EngineError;
