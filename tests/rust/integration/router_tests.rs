//! End-to-end request handling through the axum router

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use socialgraph::{
    config::ServerConfig,
    server::{
        build_router,
        executor::{ExecutionError, StatementExecutor},
        AppState,
    },
};
use tower::ServiceExt;

/// Executor that records every statement and replays canned answers.
#[derive(Default)]
struct RecordingExecutor {
    documents: Vec<Value>,
    write_error: Option<ExecutionError>,
    statements: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    fn with_documents(documents: Vec<Value>) -> Self {
        RecordingExecutor {
            documents,
            ..Default::default()
        }
    }

    fn record(&self, statement: &str) {
        self.statements.lock().unwrap().push(statement.to_string());
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatementExecutor for RecordingExecutor {
    async fn fetch(&self, statement: &str) -> Result<Vec<Value>, ExecutionError> {
        self.record(statement);
        Ok(self.documents.clone())
    }

    async fn fetch_one(&self, statement: &str) -> Result<Option<Value>, ExecutionError> {
        self.record(statement);
        Ok(self.documents.first().cloned())
    }

    async fn write(&self, statement: &str) -> Result<(), ExecutionError> {
        self.record(statement);
        match &self.write_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn router(executor: Arc<RecordingExecutor>) -> Router {
    build_router(AppState {
        executor,
        config: ServerConfig::default(),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn group_body() -> Value {
    json!({
        "groupId": "g1",
        "name": "Readers",
        "bio": "Books",
        "isActive": true,
        "tags": [],
        "profilePicture": null,
        "pageVisibility": "public",
        "postVisibility": "public"
    })
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(router(Arc::default()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_page_profile_is_normalized() {
    let friends: Vec<String> = (1..=9).map(|i| format!("f{}", i)).collect();
    let executor = Arc::new(RecordingExecutor::with_documents(vec![json!({
        "id": "p1",
        "type": "person",
        "friends": friends,
        "numberOfFriends": 12,
        "location": [
            { "placeName": "France", "placeId": "fr", "parentName": "Europe", "parentId": "eu" },
            { "placeName": "Paris", "placeId": "paris", "parentName": "France", "parentId": "fr" }
        ]
    })]));

    let (status, body) = send(router(executor.clone()), get("/api/user/p1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friends"].as_array().unwrap().len(), 9);
    assert_eq!(body["numberOfFriends"], 12);
    assert_eq!(body["location"][0]["placeId"], "paris");
    assert_eq!(body["location"][1]["placeId"], "fr");

    let statements = executor.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].contains("$page has page-id \"p1\";"));
}

#[tokio::test]
async fn test_missing_page_is_null() {
    let (status, body) = send(router(Arc::default()), get("/api/organisation/nobody")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_page_list_reports_unknown_type() {
    let executor = Arc::new(RecordingExecutor::with_documents(vec![
        json!({ "id": "p1", "type": "group" }),
        json!({ "id": "p2", "type": null }),
    ]));
    let (status, body) = send(router(executor), get("/api/pages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["type"], "group");
    assert_eq!(body[1]["type"], "unknown");
}

#[tokio::test]
async fn test_posts_without_author_type_report_unknown() {
    let executor = Arc::new(RecordingExecutor::with_documents(vec![
        json!({ "postId": "x1", "authorType": "organization" }),
        json!({ "postId": "x2" }),
    ]));
    let (status, body) = send(router(executor), get("/api/posts?pageId=p1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["authorType"], "organization");
    assert_eq!(body[1]["authorType"], "unknown");
    assert!(body[1].get("type").is_none());
}

#[tokio::test]
async fn test_posts_require_page_id() {
    let (status, body) = send(router(Arc::default()), get("/api/posts")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "pageId");

    let executor = Arc::new(RecordingExecutor::default());
    let (status, _) = send(router(executor.clone()), get("/api/posts?pageId=p1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(executor.statements()[0].contains("isa posting"));
}

#[tokio::test]
async fn test_comments_accept_snake_case_parameter() {
    let executor = Arc::new(RecordingExecutor::default());
    let (status, _) = send(router(executor.clone()), get("/api/comments?post_id=x1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(executor.statements()[0].contains("$post has post-id \"x1\";"));
}

#[tokio::test]
async fn test_location_pages_are_normalized() {
    let executor = Arc::new(RecordingExecutor::with_documents(vec![json!({
        "placeName": "France",
        "placeId": "fr",
        "pages": [
            { "id": "alice", "type": "person" },
            { "id": "acme", "type": null }
        ]
    })]));
    let (status, body) = send(router(executor.clone()), get("/api/location/fr")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["pages"][1]["type"], "unknown");
    assert!(executor.statements()[0].contains("located_in_transitive"));
}

#[tokio::test]
async fn test_create_group_commits_insert() {
    let executor = Arc::new(RecordingExecutor::default());
    let (status, body) = send(
        router(executor.clone()),
        post_json("/api/create-group", group_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let statements = executor.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].starts_with("insert $group isa group"));
    assert!(!statements[0].contains("has tag"));
    assert!(!statements[0].contains("profile-picture"));
}

#[tokio::test]
async fn test_create_with_missing_field_is_rejected_before_execution() {
    let executor = Arc::new(RecordingExecutor::default());
    let mut body = group_body();
    body.as_object_mut().unwrap().remove("postVisibility");

    let (status, response) = send(router(executor.clone()), post_json("/api/create-group", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["field"], "postVisibility");
    assert!(executor.statements().is_empty());
}

#[tokio::test]
async fn test_write_failure_message_is_verbatim() {
    let executor = Arc::new(RecordingExecutor {
        write_error: Some(ExecutionError::Query("[CNT9] key constraint violated".into())),
        ..Default::default()
    });
    let (status, body) = send(router(executor), post_json("/api/create-group", group_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "[CNT9] key constraint violated");
}

#[tokio::test]
async fn test_compile_returns_statement_without_executing() {
    let executor = Arc::new(RecordingExecutor::default());
    let (status, body) = send(
        router(executor.clone()),
        post_json(
            "/api/compile",
            json!({ "operation": "create", "kind": "group", "payload": group_body() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["statement"].as_str().unwrap().starts_with("insert $group isa group"));

    let (status, body) = send(
        router(executor.clone()),
        post_json("/api/compile", json!({ "operation": "page", "id": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["statement"].as_str().unwrap().contains("\"numberOfFollowers\": ("));
    assert!(executor.statements().is_empty());
}

#[tokio::test]
async fn test_compile_unknown_attribute_is_schema_mismatch() {
    let (status, _) = send(
        router(Arc::default()),
        post_json(
            "/api/compile",
            json!({ "operation": "create", "kind": "group", "payload": { "email": "a@b.c" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
