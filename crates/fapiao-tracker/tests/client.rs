//! Client round trips against a local axum server standing in for the tracker.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::routing::{get, post};
use axum::Router;
use fapiao_tracker::{IssueFields, TrackerClient, TrackerConfig, TrackerError};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// One request as the server saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    uri: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

impl Seen {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Answers every request with a fixed status and body and records it.
struct FakeTracker {
    status: StatusCode,
    body: &'static str,
    seen: Mutex<Vec<Seen>>,
}

async fn record(
    State(tracker): State<Arc<FakeTracker>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    tracker.seen.lock().unwrap().push(Seen {
        method,
        uri: uri.to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });
    (
        tracker.status,
        [(header::CONTENT_TYPE, "application/json")],
        tracker.body,
    )
}

/// Start a tracker on an ephemeral port, returning its base URL.
async fn start(status: StatusCode, body: &'static str) -> (String, Arc<FakeTracker>) {
    let tracker = Arc::new(FakeTracker {
        status,
        body,
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/rest/api/2/issue", post(record))
        .route("/rest/api/2/issue/:key", get(record).put(record))
        .with_state(tracker.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base, tracker)
}

fn client(base: &str) -> TrackerClient {
    TrackerClient::new(&TrackerConfig::new(base, "alice", "secret")).unwrap()
}

fn only_request(tracker: &FakeTracker) -> Seen {
    let seen = tracker.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    seen[0].clone()
}

fn fields() -> IssueFields {
    IssueFields {
        components: vec!["101".into()],
        project: "10000".into(),
        issuetype: "3".into(),
        summary: "Reimburse receipts".into(),
        description: "May".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_issue_posts_fields() {
    let (base, tracker) = start(
        StatusCode::CREATED,
        r#"{"id":"10042","key":"FIN-42","self":"http://x/10042"}"#,
    )
    .await;

    let created = client(&base).create_issue(&fields()).await.unwrap();
    assert_eq!(created.key, "FIN-42");

    let request = only_request(&tracker);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.uri, "/rest/api/2/issue");
    assert!(request.authorization.as_ref().unwrap().starts_with("Basic "));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.json()["fields"]["project"], json!({ "id": "10000" }));
    assert_eq!(request.json()["fields"]["components"], json!([{ "id": "101" }]));
}

#[tokio::test]
async fn test_create_issue_requires_201() {
    let (base, _tracker) = start(StatusCode::OK, r#"{"id":"1","key":"FIN-1","self":"x"}"#).await;

    let err = client(&base).create_issue(&fields()).await.unwrap_err();
    assert!(matches!(err, TrackerError::Status { status: 200, .. }));
}

#[tokio::test]
async fn test_create_issue_reports_error_body() {
    let (base, _tracker) =
        start(StatusCode::BAD_REQUEST, r#"{"errors":{"project":"required"}}"#).await;

    match client(&base).create_issue(&fields()).await.unwrap_err() {
        TrackerError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("required"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_get_issue_expands_all_fields() {
    let (base, tracker) = start(StatusCode::OK, r#"{"key":"FIN-7","fields":{"summary":"s"}}"#).await;

    let issue = client(&base).get_issue("FIN-7").await.unwrap();
    assert_eq!(issue["fields"]["summary"], "s");

    let request = only_request(&tracker);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.uri, "/rest/api/2/issue/FIN-7?*all");
}

#[tokio::test]
async fn test_update_issue_puts_body() {
    let (base, tracker) = start(StatusCode::NO_CONTENT, "").await;

    let data = json!({ "fields": { "summary": "renamed" } });
    client(&base).update_issue("FIN-7", &data).await.unwrap();

    let request = only_request(&tracker);
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.uri, "/rest/api/2/issue/FIN-7");
    assert_eq!(request.json(), data);
}

#[tokio::test]
async fn test_update_issue_failure() {
    let (base, _tracker) = start(StatusCode::NOT_FOUND, r#"{"errorMessages":["nope"]}"#).await;

    let err = client(&base)
        .update_issue("FIN-404", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Status { status: 404, .. }));
}
