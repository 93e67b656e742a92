use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use todo_api::{app_router, auth::JwtVerifier, build_state, config::Config};
use todo_application::context::Subject;
use todo_domain::persist::InMemoryTodoStore;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    store: Arc<InMemoryTodoStore>,
    verifier: JwtVerifier,
}

impl TestApp {
    fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "TODO_JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let store = Arc::new(InMemoryTodoStore::new());
        let state = build_state(&config, store.clone()).unwrap();

        Self {
            router: app_router(state),
            store,
            verifier: JwtVerifier::new(&config.jwt),
        }
    }

    fn token_for(&self, subject: Subject) -> String {
        self.verifier.issue(&subject, Duration::from_secs(600)).unwrap()
    }

    fn user_token(&self) -> String {
        self.token_for(Subject::new("user-1"))
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(response: Response) -> Value {
    serde_json::from_str(&text(response).await).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();

    let response = app.call(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn todo_routes_require_a_valid_token() {
    let app = TestApp::new();

    let response = app.call(Method::GET, "/api/todolists", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(text(response).await, "Unauthorized");

    let response = app
        .call(Method::POST, "/api/todolists", Some("not-a-jwt"), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // 认证失败时未触达调度器
    assert_eq!(app.store.commit_count(), 0);

    let token = app.user_token();
    let response = app.call(Method::GET, "/api/todolists", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn item_lifecycle_over_http() {
    let app = TestApp::new();
    let token = app.user_token();

    let response = app
        .call(Method::POST, "/api/todolists", Some(&token), Some(json!({ "title": "Shopping" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let list_id = json_body(response).await.as_i64().unwrap();
    assert!(list_id > 0);

    let items_uri = format!("/api/todolists/{list_id}/items");
    let response = app
        .call(Method::POST, &items_uri, Some(&token), Some(json!({ "title": "Buy milk" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let item_id = json_body(response).await.as_i64().unwrap();
    assert!(item_id > 0);

    let item_uri = format!("/api/todoitems/{item_id}");
    let response = app
        .call(
            Method::PUT,
            &item_uri,
            Some(&token),
            Some(json!({ "id": item_id, "title": "Buy oat milk", "done": true })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .call(Method::GET, &format!("{items_uri}?pageNumber=1&pageSize=5"), Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["items"][0]["title"], "Buy oat milk");
    assert_eq!(page["items"][0]["done"], true);

    let response = app.call(Method::DELETE, &item_uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.call(Method::DELETE, &item_uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(text(response).await.contains(&item_id.to_string()));
}

#[tokio::test]
async fn validation_failures_return_problem_details() {
    let app = TestApp::new();
    let token = app.user_token();

    let response = app
        .call(Method::POST, "/api/todolists", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["title"], "One or more validation errors occurred.");
    assert_eq!(body["errors"]["title"][0], "Title is required.");

    let response = app
        .call(Method::GET, "/api/todolists/1/items?pageNumber=0&pageSize=0", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let errors = json_body(response).await["errors"].clone();
    assert!(errors.get("pageNumber").is_some());
    assert!(errors.get("pageSize").is_some());
}

#[tokio::test]
async fn malformed_body_and_mismatched_id_are_bad_requests() {
    let app = TestApp::new();
    let token = app.user_token();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/todolists")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .call(Method::PUT, "/api/todolists/3", Some(&token), Some(json!({ "id": 4, "title": "x" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["errors"].get("id").is_some());
}

#[tokio::test]
async fn malformed_path_and_query_are_validation_problems() {
    let app = TestApp::new();
    let token = app.user_token();

    let response = app.call(Method::GET, "/api/todolists/abc", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["title"], "One or more validation errors occurred.");
    assert!(body["errors"].get("id").is_some());

    let response = app
        .call(Method::DELETE, "/api/todoitems/not-a-number", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["errors"].get("id").is_some());

    let response = app
        .call(Method::GET, "/api/todolists/1/items?pageNumber=-1", Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["title"], "One or more validation errors occurred.");
    assert!(body["errors"].get("query").is_some());
    assert_eq!(app.store.commit_count(), 0);
}

#[tokio::test]
async fn missing_list_is_not_found() {
    let app = TestApp::new();
    let token = app.user_token();

    let response = app.call(Method::GET, "/api/todolists/42", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purge_requires_administrator_role() {
    let app = TestApp::new();
    let user = app.user_token();
    let admin = app.token_for(Subject::new("admin-1").with_role("Administrator"));

    let response = app
        .call(Method::POST, "/api/todolists", Some(&user), Some(json!({ "title": "Chores" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.call(Method::DELETE, "/api/todolists", Some(&user), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.store.list_count().unwrap(), 1);

    let response = app.call(Method::DELETE, "/api/todolists", Some(&admin), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.store.list_count().unwrap(), 0);
}

#[tokio::test]
async fn storage_failure_hides_internal_detail() {
    let app = TestApp::new();
    let token = app.user_token();
    app.store.fail_next_commit();

    let response = app
        .call(Method::POST, "/api/todolists", Some(&token), Some(json!({ "title": "Doomed" })))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(response).await, "An unexpected error occurred.");
    assert_eq!(app.store.list_count().unwrap(), 0);
}

#[tokio::test]
async fn item_detail_rejects_unknown_priority() {
    let app = TestApp::new();
    let token = app.user_token();

    let response = app
        .call(
            Method::PUT,
            "/api/todoitems/1/detail",
            Some(&token),
            Some(json!({ "listId": 1, "priority": 9, "note": null })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["errors"].get("priority").is_some());
}
