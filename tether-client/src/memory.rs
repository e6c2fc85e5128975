//! In-process object store.
//!
//! Honours the same wire conventions as the HTTP backend: creates assign
//! `"{collection}-{n}"` ids and stamp `created`/`lastModified`, searches page
//! through `pageResults`/`nextToken`. Every request is recorded so callers
//! can assert on exactly what was sent.

use crate::{ApiRequest, Client, Method, RequestBody};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use tether_types::{ApiError, ApiResult, DateRange, EntityId, FieldViolation};
use tokio::sync::Mutex;
use tracing::debug;

const PAGE_SIZE_KEY: &str = "pageSize";
const PAGING_TOKEN_KEY: &str = "pagingToken";
const RANGE_KEYS: [&str; 2] = ["created", "lastModified"];
const IGNORED_KEYS: [&str; 1] = ["locationRange"];
const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Default)]
struct Collection {
    next_id: u64,
    objects: Vec<(String, Map<String, Value>)>,
}

impl Collection {
    fn position(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|(oid, _)| oid == id)
    }
}

#[derive(Debug)]
struct InjectedFailure {
    method: Method,
    path_prefix: String,
    error: ApiError,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Collection>,
    required_on_update: HashMap<String, Vec<String>>,
    failures: VecDeque<InjectedFailure>,
    requests: Vec<ApiRequest>,
}

impl State {
    fn insert(&mut self, coll: &str, mut object: Map<String, Value>) -> Map<String, Value> {
        let collection = self.collections.entry(coll.to_string()).or_default();
        collection.next_id += 1;
        let id = format!("{coll}-{}", collection.next_id);
        let now = Value::String(now_stamp());
        object.insert("id".into(), Value::String(id.clone()));
        object.entry("created").or_insert_with(|| now.clone());
        object.entry("lastModified").or_insert(now);
        collection.objects.push((id, object.clone()));
        object
    }

    fn take_failure(&mut self, request: &ApiRequest) -> Option<ApiError> {
        let index = self.failures.iter().position(|f| {
            f.method == request.method && request.path.starts_with(&f.path_prefix)
        })?;
        self.failures.remove(index).map(|f| f.error)
    }
}

/// [`Client`] backed by in-memory collections.
#[derive(Debug, Default)]
pub struct MemoryClient {
    state: Mutex<State>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every PATCH to `collection` that lacks `wire_field` fail validation.
    pub async fn require_on_update(&self, collection: &str, wire_field: &str) {
        self.state
            .lock()
            .await
            .required_on_update
            .entry(collection.trim_start_matches('/').to_string())
            .or_default()
            .push(wire_field.to_string());
    }

    /// Queues a one-shot failure for the next request with `method` whose
    /// path starts with `path_prefix`.
    pub async fn fail_next(&self, method: Method, path_prefix: &str, error: ApiError) {
        self.state.lock().await.failures.push_back(InjectedFailure {
            method,
            path_prefix: path_prefix.to_string(),
            error,
        });
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn clear_requests(&self) {
        self.state.lock().await.requests.clear();
    }

    /// Stores `object` directly, as if another client had created it.
    ///
    /// # Panics
    ///
    /// Panics if `object` is not a JSON object.
    pub async fn seed(&self, collection: &str, object: Value) -> EntityId {
        let Value::Object(object) = object else {
            panic!("seed expects a JSON object, got {object}");
        };
        let coll = collection.trim_start_matches('/');
        let stored = self.state.lock().await.insert(coll, object);
        let id = stored.get("id").and_then(Value::as_str).unwrap_or_default();
        EntityId::parse(id).unwrap_or_else(|e| panic!("generated id {id:?} rejected: {e}"))
    }

    /// Number of objects stored in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .await
            .collections
            .get(collection.trim_start_matches('/'))
            .map_or(0, |c| c.objects.len())
    }
}

#[async_trait]
impl Client for MemoryClient {
    async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        let mut state = self.state.lock().await;
        debug!("memory backend: {request}");
        state.requests.push(request.clone());

        if let Some(error) = state.take_failure(&request) {
            return Err(error);
        }

        let mut segments = request.path.trim_start_matches('/').split('/');
        let coll = segments.next().filter(|s| !s.is_empty()).map(str::to_string);
        let id = segments.next().map(str::to_string);
        let (Some(coll), None) = (coll, segments.next()) else {
            return Err(ApiError::NotFound(request.path.clone()));
        };

        match (request.method, id) {
            (Method::Post, None) => create(&mut state, &coll, request.body),
            (Method::Get, None) => search(&state, &coll, &request),
            (Method::Get, Some(id)) => {
                let collection = state
                    .collections
                    .get(&coll)
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;
                let index = collection
                    .position(&id)
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;
                Ok(Value::Object(collection.objects[index].1.clone()))
            }
            (Method::Patch, Some(id)) => update(&mut state, &coll, &id, &request),
            (Method::Delete, Some(id)) => {
                let collection = state
                    .collections
                    .get_mut(&coll)
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;
                let index = collection
                    .position(&id)
                    .ok_or_else(|| ApiError::NotFound(request.path.clone()))?;
                collection.objects.remove(index);
                Ok(Value::Null)
            }
            (method, _) => Err(ApiError::Unknown {
                status: Some(405),
                message: format!("{method} not allowed on {}", request.path),
            }),
        }
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn create(state: &mut State, coll: &str, body: Option<RequestBody>) -> ApiResult<Value> {
    let (object, is_file) = match body {
        Some(RequestBody::Json(Value::Object(map))) => (map, false),
        Some(RequestBody::File(upload)) => {
            let mut map = upload.metadata;
            map.insert("contentType".into(), Value::String(upload.content_type));
            map.insert("size".into(), Value::from(upload.data.len()));
            (map, true)
        }
        None => (Map::new(), false),
        Some(RequestBody::Json(other)) => {
            return Err(ApiError::validation(format!("create body must be an object, got {other}")));
        }
    };
    let mut stored = state.insert(coll, object);
    if is_file {
        let id = stored.get("id").and_then(Value::as_str).unwrap_or_default();
        let url = Value::String(format!("memory://{coll}/{id}"));
        stored.insert("signedUrl".into(), url.clone());
        if let Some((_, object)) = state
            .collections
            .get_mut(coll)
            .and_then(|c| c.objects.last_mut())
        {
            object.insert("signedUrl".into(), url);
        }
    }
    Ok(Value::Object(stored))
}

fn update(state: &mut State, coll: &str, id: &str, request: &ApiRequest) -> ApiResult<Value> {
    let Some(Value::Object(changes)) = request.json_body() else {
        return Err(ApiError::validation("update body must be a JSON object"));
    };

    if let Some(required) = state.required_on_update.get(coll) {
        let violations: Vec<FieldViolation> = required
            .iter()
            .filter(|field| !changes.contains_key(field.as_str()))
            .map(|field| FieldViolation {
                field: field.clone(),
                message: "required on every update".into(),
            })
            .collect();
        if !violations.is_empty() {
            return Err(ApiError::Validation {
                message: format!("missing required fields on {}", request.path),
                violations,
            });
        }
    }

    let Some(collection) = state.collections.get_mut(coll) else {
        return Err(ApiError::NotFound(request.path.clone()));
    };
    let Some(index) = collection.position(id) else {
        return Err(ApiError::NotFound(request.path.clone()));
    };
    let object = &mut collection.objects[index].1;

    for (key, value) in changes {
        if key == "id" {
            continue;
        }
        if value.is_null() {
            object.remove(key);
        } else {
            object.insert(key.clone(), value.clone());
        }
    }
    object.insert("lastModified".into(), Value::String(now_stamp()));
    Ok(Value::Object(object.clone()))
}

fn search(state: &State, coll: &str, request: &ApiRequest) -> ApiResult<Value> {
    let query = &request.query;
    let page_size = match query.get(PAGE_SIZE_KEY) {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ApiError::validation(format!("invalid {PAGE_SIZE_KEY} {raw:?}")))?,
        None => DEFAULT_PAGE_SIZE,
    };
    let offset = match query.get(PAGING_TOKEN_KEY) {
        Some(token) => decode_token(token)
            .ok_or_else(|| ApiError::validation(format!("invalid {PAGING_TOKEN_KEY} {token:?}")))?,
        None => 0,
    };

    let mut ranges = Vec::new();
    for key in RANGE_KEYS {
        if let Some(raw) = query.get(key) {
            let range = DateRange::from_param(raw)
                .ok_or_else(|| ApiError::validation(format!("invalid {key} range {raw:?}")))?;
            ranges.push((key, range));
        }
    }

    let matches: Vec<&Map<String, Value>> = state
        .collections
        .get(coll)
        .map(|c| c.objects.iter().map(|(_, o)| o).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .filter(|object| {
            query
                .iter()
                .filter(|(k, _)| {
                    *k != PAGE_SIZE_KEY
                        && *k != PAGING_TOKEN_KEY
                        && !RANGE_KEYS.contains(k)
                        && !IGNORED_KEYS.contains(k)
                })
                .all(|(k, v)| object.get(k).is_some_and(|stored| string_form(stored) == v))
        })
        .filter(|object| {
            ranges.iter().all(|(key, range)| {
                object
                    .get(*key)
                    .and_then(Value::as_str)
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .is_some_and(|t| range.contains(t.with_timezone(&Utc)))
            })
        })
        .collect();

    let page: Vec<Value> = matches
        .iter()
        .skip(offset)
        .take(page_size)
        .map(|o| Value::Object((*o).clone()))
        .collect();
    let end = offset + page.len();

    let mut result = Map::new();
    result.insert("pageResults".into(), Value::Array(page));
    if end < matches.len() {
        result.insert("nextToken".into(), Value::String(encode_token(end)));
    }
    Ok(Value::Object(result))
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode_token(offset: usize) -> String {
    format!("p{offset:x}")
}

fn decode_token(token: &str) -> Option<usize> {
    usize::from_str_radix(token.strip_prefix('p')?, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        assert_eq!(decode_token(&encode_token(250)), Some(250));
        assert_eq!(decode_token("garbage"), None);
    }

    #[test]
    fn string_form_of_values() {
        assert_eq!(string_form(&Value::String("x".into())), "x");
        assert_eq!(string_form(&Value::from(3)), "3");
        assert_eq!(string_form(&Value::Bool(true)), "true");
    }
}
