//! # Document Index Shared
//!
//! Plain data types passed between the document index client and its callers:
//! records, opaque query and sort descriptors, search result shapes, and the
//! outward result envelope.

mod document;
mod envelope;
mod query;
mod results;

pub use document::{is_valid_json, parse_record, DocumentRecord};
pub use envelope::ResultEnvelope;
pub use query::{BoolQuery, QueryDescriptor, SortDescriptor, SortOrder, DEFAULT_SORT_FIELD};
pub use results::{PagedSearchResult, SearchHits, ShardFailure};
