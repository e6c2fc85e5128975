use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters, ordered by key.
///
/// Absent values are never stored: the backend reads an omitted parameter
/// as "no constraint", which an empty value would not mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Inserts `value` when present; does nothing for `None`.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    /// Merges `other` in; its values win on key collisions.
    pub fn extend(&mut self, other: Parameters) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A binary payload sent when creating a file-backed object (e.g. a picture).
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    /// Field values of the object being created, keyed by wire name.
    pub metadata: Map<String, Value>,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    File(FileUpload),
}

/// One request to the object store.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Resource path such as `/albums` or `/albums/{id}`.
    pub path: String,
    pub query: Parameters,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<RequestBody>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Parameters::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Map<String, Value>) -> Self {
        Self::new(Method::Post, path, Some(RequestBody::Json(Value::Object(body))))
    }

    pub fn patch(path: impl Into<String>, body: Map<String, Value>) -> Self {
        Self::new(Method::Patch, path, Some(RequestBody::Json(Value::Object(body))))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, None)
    }

    /// A create carrying file content alongside the object's fields.
    pub fn upload(path: impl Into<String>, upload: FileUpload) -> Self {
        Self::new(Method::Post, path, Some(RequestBody::File(upload)))
    }

    #[must_use]
    pub fn with_query(mut self, query: Parameters) -> Self {
        self.query = query;
        self
    }

    /// The JSON body, if this request carries one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
