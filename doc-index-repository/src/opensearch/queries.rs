//! OpenSearch request body builders.
//!
//! Pure functions from the engine contract types to the JSON the OpenSearch REST
//! API expects, kept apart from the transport so they can be tested directly.

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::interfaces::{
    BulkAction, BulkOperation, CreateIndexBody, DocKey, SearchRequest, UpdateChange,
};

/// Render a duration as an OpenSearch time unit string.
pub fn time_value(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}ms", millis)
    }
}

/// Body for `PUT /{index}`. Sections left unset are omitted.
pub fn build_create_index_body(body: &CreateIndexBody) -> Value {
    let mut object = Map::new();
    if let Some(settings) = &body.settings {
        object.insert("settings".to_string(), settings.clone());
    }
    if let Some(mappings) = &body.mappings {
        object.insert("mappings".to_string(), mappings.clone());
    }
    Value::Object(object)
}

/// Body for `POST /{index}/_update/{id}`.
pub fn build_update_body(change: &UpdateChange) -> Value {
    match change {
        // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
        UpdateChange::Merge { doc, upsert } => json!({
            "doc": doc,
            "doc_as_upsert": upsert
        }),
        UpdateChange::Script(source) => json!({
            "script": {
                "source": source,
                "lang": "painless"
            }
        }),
    }
}

/// NDJSON lines for `POST /_bulk`: one action line per operation, followed by a
/// source line for create and update.
pub fn build_bulk_lines(operations: &[BulkOperation]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(operations.len() * 2);
    for operation in operations {
        let target = json!({ "_index": operation.index, "_id": operation.id });
        lines.push(json!({ operation.action.name(): target }));
        match &operation.action {
            BulkAction::Create { source } => lines.push(Value::Object(source.clone())),
            BulkAction::Update { doc, upsert } => lines.push(json!({
                "doc": doc,
                "doc_as_upsert": upsert
            })),
            BulkAction::Delete => {}
        }
    }
    lines
}

/// Body for `POST /_mget`.
pub fn build_mget_body(docs: &[DocKey]) -> Value {
    let docs: Vec<Value> = docs
        .iter()
        .map(|key| json!({ "_index": key.index, "_id": key.id }))
        .collect();
    json!({ "docs": docs })
}

/// Body for `POST /{index}/_search`.
///
/// `from` and `size` are only sent when set so an unpaged search keeps the
/// engine's default window.
pub fn build_search_body(request: &SearchRequest) -> Value {
    let sort: Vec<Value> = request.sort.iter().map(|sort| sort.to_value()).collect();
    let mut body = json!({
        "query": request.query.as_value(),
        "sort": sort,
        "timeout": time_value(request.timeout)
    });

    if let Some(from) = request.from {
        body["from"] = json!(from);
    }
    if let Some(size) = request.size {
        body["size"] = json!(size);
    }
    if request.track_total_hits {
        body["track_total_hits"] = json!(true);
    }
    body
}
