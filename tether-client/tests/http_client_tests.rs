use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use tether_client::{ApiRequest, Client, ClientConfig, FileUpload, HttpClient, Parameters};
use tether_types::{ApiError, ErrorKind, FieldViolation};
use wiremock::matchers::{bearer_token, body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(mock_config(server)).unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_default() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.timeout_secs, 30);
    assert!(cfg.access_token.is_none());
    assert!(cfg.user_agent.starts_with("tether/"));
}

#[test]
fn config_from_vars_overlays_defaults() {
    let cfg = ClientConfig::from_vars(|key| match key {
        "TETHER_BASE_URL" => Some("https://api.example.com".into()),
        "TETHER_TIMEOUT_SECS" => Some(" 12 ".into()),
        "TETHER_ACCESS_TOKEN" => Some("tok".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.base_url, "https://api.example.com");
    assert_eq!(cfg.timeout_secs, 12);
    assert_eq!(cfg.access_token.as_deref(), Some("tok"));
}

#[test]
fn config_from_vars_empty_token_ignored() {
    let cfg = ClientConfig::from_vars(|key| (key == "TETHER_ACCESS_TOKEN").then(String::new)).unwrap();
    assert!(cfg.access_token.is_none());
}

#[test]
fn config_bad_timeout_is_validation() {
    let err = ClientConfig::from_vars(|key| (key == "TETHER_TIMEOUT_SECS").then(|| "soon".to_string()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
}

#[test]
fn config_serde_roundtrip() {
    let cfg = ClientConfig::default().with_access_token("abc");
    let json = serde_json::to_string(&cfg).unwrap();
    let back: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.access_token.as_deref(), Some("abc"));
    assert_eq!(back.base_url, cfg.base_url);
}

// ── Success bodies ──────────────────────────────────────────────

#[tokio::test]
async fn get_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/albums/albums-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "result": {"id": "albums-1", "name": "Trip"}
        })))
        .mount(&server)
        .await;

    let value = client(&server)
        .request(ApiRequest::get("/albums/albums-1"))
        .await
        .unwrap();
    assert_eq!(value, json!({"id": "albums-1", "name": "Trip"}));
}

#[tokio::test]
async fn empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/albums/albums-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client(&server)
        .request(ApiRequest::delete("/albums/albums-1"))
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn unparsable_success_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .request(ApiRequest::get("/albums"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unknown { status: Some(200), .. }));
}

// ── Request shape ───────────────────────────────────────────────

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/albums"))
        .and(body_json(json!({"name": "Trip"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "albums-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let value = client(&server)
        .request(ApiRequest::post("/albums", object(json!({"name": "Trip"}))))
        .await
        .unwrap();
    assert_eq!(value["id"], "albums-1");
}

#[tokio::test]
async fn patch_sends_only_given_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/users/users-3"))
        .and(body_json(json!({"firstName": "Ada", "userName": "ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .request(ApiRequest::patch(
            "/users/users-3",
            object(json!({"firstName": "Ada", "userName": "ada"})),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn search_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/albums"))
        .and(query_param("name", "Trip"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "result": {"pageResults": [], "nextToken": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = Parameters::new();
    query.insert("name", "Trip");
    query.insert_opt("pageSize", Some(10));
    query.insert_opt::<String>("ownerUserId", None);

    let value = client(&server)
        .request(ApiRequest::get("/albums").with_query(query))
        .await
        .unwrap();
    assert_eq!(value["pageResults"], json!([]));
}

#[tokio::test]
async fn access_token_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(bearer_token("secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(mock_config(&server).with_access_token("secret")).unwrap();
    client.request(ApiRequest::get("/users/users-1")).await.unwrap();
}

#[tokio::test]
async fn upload_sends_multipart_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pictures"))
        .and(body_string_contains("name=\"metadata\""))
        .and(body_string_contains("\"caption\":\"sunset\""))
        .and(body_string_contains("Content-Type: image/png"))
        .and(body_string_contains("PNGDATA"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pictures-1",
            "signedUrl": "https://cdn/p1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = FileUpload {
        metadata: object(json!({"caption": "sunset"})),
        data: b"PNGDATA".to_vec(),
        content_type: "image/png".into(),
    };
    let value = client(&server)
        .request(ApiRequest::upload("/pictures", upload))
        .await
        .unwrap();
    assert_eq!(value["signedUrl"], "https://cdn/p1");
}

// ── Failure classification ──────────────────────────────────────

#[tokio::test]
async fn not_found_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such user"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .request(ApiRequest::get("/users/nobody"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound("no such user".into()));
}

#[tokio::test]
async fn validation_carries_violations() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "bad update",
            "violations": [{"field": "userName", "message": "required"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .request(ApiRequest::patch("/users/users-1", Map::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert_eq!(
        err.violations(),
        &[FieldViolation {
            field: "userName".into(),
            message: "required".into(),
        }]
    );
}

#[tokio::test]
async fn permission_and_conflict_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "not owner"})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.request(ApiRequest::delete("/albums/a")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    let err = client
        .request(ApiRequest::patch("/albums/a", Map::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn server_error_is_retryable_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client(&server).request(ApiRequest::get("/albums")).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Unknown {
            status: Some(503),
            message: "overloaded".into(),
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    let err = HttpClient::new(config)
        .unwrap()
        .request(ApiRequest::get("/albums"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}
