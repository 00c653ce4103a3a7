//! OpenSearch response parsers.
//!
//! Turn response bodies into the engine contract types. Missing optional fields
//! fall back to their empty values; missing identity fields are parse errors.

use serde_json::Value;

use doc_index_shared::{DocumentRecord, ShardFailure};

use crate::errors::EngineError;
use crate::interfaces::{
    Acknowledgement, BulkItemResponse, BulkResponse, DocKey, FailureKind, GetResponse,
    ItemFailure, MultiGetItem, MultiGetResponse, SearchResponse, ShardInfo, WriteResponse,
    WriteResult,
};

const ALREADY_EXISTS_TYPES: [&str; 2] = [
    "resource_already_exists_exception",
    "index_already_exists_exception",
];

/// Map a non-success status and its body to an engine error.
pub fn error_from_status(status: u16, body: &Value) -> EngineError {
    let reason = error_reason(body);
    match status {
        404 => EngineError::not_found(reason),
        409 => EngineError::conflict(reason),
        400 if ALREADY_EXISTS_TYPES.contains(&error_type(body).unwrap_or_default()) => {
            EngineError::already_exists(reason)
        }
        _ => EngineError::status(status, reason),
    }
}

/// `error.type` of an error body, when present.
fn error_type(body: &Value) -> Option<&str> {
    body.get("error")?.get("type")?.as_str()
}

/// Human readable reason from an error body, or the body itself.
pub fn error_reason(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(reason)) => reason.clone(),
        Some(error) => error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

pub fn parse_acknowledgement(body: &Value) -> Acknowledgement {
    Acknowledgement::new(
        body.get("acknowledged")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        body.get("shards_acknowledged")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    )
}

fn parse_shard_failure(failure: &Value) -> ShardFailure {
    let reason = match failure.get("reason") {
        Some(Value::String(reason)) => reason.clone(),
        Some(reason) => reason
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| reason.to_string()),
        None => failure.to_string(),
    };
    ShardFailure {
        index: failure
            .get("index")
            .or_else(|| failure.get("_index"))
            .and_then(Value::as_str)
            .map(str::to_string),
        shard: failure
            .get("shard")
            .or_else(|| failure.get("_shard"))
            .and_then(Value::as_u64)
            .and_then(|shard| u32::try_from(shard).ok()),
        reason,
    }
}

fn parse_shard_failures(shards: &Value) -> Vec<ShardFailure> {
    shards
        .get("failures")
        .and_then(Value::as_array)
        .map(|failures| failures.iter().map(parse_shard_failure).collect())
        .unwrap_or_default()
}

fn count(value: &Value, field: &str) -> u32 {
    value
        .get(field)
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0)
}

/// Parse a `_shards` section.
pub fn parse_shard_info(shards: &Value) -> ShardInfo {
    ShardInfo {
        total: count(shards, "total"),
        successful: count(shards, "successful"),
        failed: count(shards, "failed"),
        failures: parse_shard_failures(shards),
    }
}

fn string_field(body: &Value, field: &str) -> Result<String, EngineError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| EngineError::parse(format!("missing `{}` in response", field)))
}

fn parse_result(body: &Value) -> Result<WriteResult, EngineError> {
    let result = string_field(body, "result")?;
    WriteResult::parse(&result)
        .ok_or_else(|| EngineError::parse(format!("unknown write result `{}`", result)))
}

/// Parse the response to an index, update or delete of one document.
pub fn parse_write(body: &Value) -> Result<WriteResponse, EngineError> {
    Ok(WriteResponse {
        index: string_field(body, "_index")?,
        id: string_field(body, "_id")?,
        result: parse_result(body)?,
        shards: body
            .get("_shards")
            .map(parse_shard_info)
            .unwrap_or_default(),
    })
}

/// `_source` of a hit or document. Sources disabled in the mapping, or excluded
/// by the request, read as an empty record so the document still counts.
fn source(body: &Value) -> DocumentRecord {
    body.get("_source")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn found(body: &Value) -> bool {
    body.get("found").and_then(Value::as_bool).unwrap_or(false)
}

pub fn parse_get(body: &Value) -> Result<GetResponse, EngineError> {
    let found = found(body);
    Ok(GetResponse {
        index: string_field(body, "_index")?,
        id: string_field(body, "_id")?,
        found,
        source: found.then(|| source(body)),
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse a single-document get reply.
///
/// A missing document answers 404 with `found: false`; a missing index answers
/// 404 with an error body and becomes `NotFound`.
pub fn parse_get_reply(status: u16, body: &Value) -> Result<GetResponse, EngineError> {
    if is_success(status) || (status == 404 && body.get("found").is_some()) {
        parse_get(body)
    } else {
        Err(error_from_status(status, body))
    }
}

/// Parse a single-document delete reply.
///
/// 404 with a `result` is a missing document, not a missing index.
pub fn parse_delete_reply(status: u16, body: &Value) -> Result<WriteResponse, EngineError> {
    if is_success(status) || (status == 404 && body.get("result").is_some()) {
        parse_write(body)
    } else {
        Err(error_from_status(status, body))
    }
}

fn item_failure(error: &Value, status: u16) -> ItemFailure {
    let kind = match error.get("type").and_then(Value::as_str) {
        Some(kind) if ALREADY_EXISTS_TYPES.contains(&kind) => FailureKind::AlreadyExists,
        Some("version_conflict_engine_exception") => FailureKind::VersionConflict,
        Some("index_not_found_exception") | Some("document_missing_exception") => {
            FailureKind::NotFound
        }
        _ => FailureKind::from_status(status),
    };
    let reason = error
        .get("reason")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    ItemFailure::new(kind, reason)
}

fn parse_bulk_item(item: &Value) -> Result<BulkItemResponse, EngineError> {
    let (action, detail) = item
        .as_object()
        .and_then(|object| object.iter().next())
        .ok_or_else(|| EngineError::parse("empty bulk item"))?;

    let status = detail
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|status| u16::try_from(status).ok())
        .ok_or_else(|| EngineError::parse("missing `status` in bulk item"))?;

    Ok(BulkItemResponse {
        action: action.clone(),
        index: string_field(detail, "_index")?,
        id: string_field(detail, "_id")?,
        status,
        result: detail
            .get("result")
            .and_then(Value::as_str)
            .and_then(WriteResult::parse),
        failure: detail.get("error").map(|error| item_failure(error, status)),
    })
}

/// Parse a `_bulk` response. Items keep request order.
pub fn parse_bulk(body: &Value) -> Result<BulkResponse, EngineError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::parse("missing `items` in bulk response"))?
        .iter()
        .map(parse_bulk_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkResponse {
        has_failures: body.get("errors").and_then(Value::as_bool).unwrap_or(false),
        items,
    })
}

fn parse_mget_item(doc: &Value) -> Result<MultiGetItem, EngineError> {
    let key = DocKey::new(string_field(doc, "_index")?, string_field(doc, "_id")?);

    if let Some(error) = doc.get("error") {
        return Ok(MultiGetItem::Failed {
            key,
            failure: item_failure(error, 500),
        });
    }
    if found(doc) {
        Ok(MultiGetItem::Found {
            key,
            source: source(doc),
        })
    } else {
        Ok(MultiGetItem::Missing { key })
    }
}

/// Parse a `_mget` response. Items keep request order.
pub fn parse_mget(body: &Value) -> Result<MultiGetResponse, EngineError> {
    let items = body
        .get("docs")
        .and_then(Value::as_array)
        .ok_or_else(|| EngineError::parse("missing `docs` in mget response"))?
        .iter()
        .map(parse_mget_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiGetResponse { items })
}

/// Parse a `_search` response into hit sources, total and shard failures.
pub fn parse_search(body: &Value) -> Result<SearchResponse, EngineError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| EngineError::parse("missing `hits` in search response"))?;

    // `hits.total` is an object on current engines and a bare number on old ones.
    let total = match hits.get("total") {
        Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        Some(total) => total.as_u64().unwrap_or(0),
        None => 0,
    };

    let records = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|hits| hits.iter().map(source).collect())
        .unwrap_or_default();

    let shards = body.get("_shards").cloned().unwrap_or(Value::Null);
    Ok(SearchResponse {
        hits: records,
        total,
        failed_shards: count(&shards, "failed"),
        shard_failures: parse_shard_failures(&shards),
    })
}

/// Health status of a `_cluster/health` response; green and yellow are usable.
pub fn parse_health(body: &Value) -> bool {
    matches!(
        body.get("status").and_then(Value::as_str),
        Some("green") | Some("yellow")
    )
}
