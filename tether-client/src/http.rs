//! HTTP transport over reqwest.
//!
//! Response envelope: successful bodies look like `{"status": 200, "result": X}`
//! and unwrap to `X`. Failing bodies carry `message` (or `error`) and, for
//! validation failures, a `violations` array of `{field, message}`.

use crate::{ApiRequest, Client, ClientConfig, Method, RequestBody};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tether_types::{ApiError, ApiResult, FieldViolation};
use tracing::{debug, warn};

const MULTIPART_BOUNDARY: &str = "tether_upload_boundary";

/// [`Client`] backed by a single pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn builder(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Patch => self.http.patch(url),
            Method::Delete => self.http.delete(url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }
        match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::File(upload)) => {
                let metadata = Value::Object(upload.metadata.clone());
                let mut body = Vec::with_capacity(upload.data.len() + 256);
                body.extend_from_slice(
                    format!(
                        "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"metadata\"\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"; filename=\"data\"\r\nContent-Type: {}\r\n\r\n",
                        upload.content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&upload.data);
                body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
                builder
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
                    )
                    .body(body)
            }
            None => builder,
        }
    }
}

#[async_trait]
impl Client for HttpClient {
    async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        debug!("{} {} ({} query params)", request.method, request.path, request.query.len());

        let response = self
            .builder(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{request} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("{request}: reading body failed: {e}")))?;

        if status.is_success() {
            return parse_success(status, &text);
        }

        let error = parse_failure(status, &text);
        warn!("{request} returned {}: {error}", status.as_u16());
        Err(error)
    }
}

fn parse_success(status: StatusCode, text: &str) -> ApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let body: Value = serde_json::from_str(text).map_err(|e| ApiError::Unknown {
        status: Some(status.as_u16()),
        message: format!("unparsable response body: {e}"),
    })?;
    Ok(unwrap_envelope(body))
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("status") && map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn parse_failure(status: StatusCode, text: &str) -> ApiError {
    let body: Option<Value> = serde_json::from_str(text).ok();

    let message = body
        .as_ref()
        .and_then(|b| {
            ["message", "error"]
                .iter()
                .find_map(|key| b.get(key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    let violations = body
        .as_ref()
        .and_then(|b| b.get("violations"))
        .and_then(|v| serde_json::from_value::<Vec<FieldViolation>>(v.clone()).ok())
        .unwrap_or_default();

    ApiError::from_status(status.as_u16(), message, violations)
}
