//! Integration tests for the HTTP surface.
//!
//! Requests go through the full axum router with in-memory adapters, checking
//! identity extraction, status codes and the JSON error contract.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use whisper_engine::adapters::ai::{MockAIProvider, MockError};
use whisper_engine::adapters::http::middleware::{ACCOUNT_ID_HEADER, ACCOUNT_ROLE_HEADER};
use whisper_engine::adapters::http::{app_router, AppState};
use whisper_engine::adapters::memory::{
    InMemoryAccountRepository, InMemoryQuestionRepository, InMemoryResponseRepository,
    InMemorySessionReportRepository,
};
use whisper_engine::adapters::notifications::BroadcastNotificationBus;
use whisper_engine::application::{Engine, EnginePolicy, EnginePorts};
use whisper_engine::domain::account::Account;
use whisper_engine::domain::foundation::AccountId;
use whisper_engine::ports::AccountRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SAFE: &str =
    r#"{"isSafe": true, "rejectionType": null, "reason": "ok", "category": "Relationship"}"#;
const HARASSMENT: &str = r#"{"isSafe": false, "rejectionType": "Harassment", "reason": "insults", "category": "General"}"#;

struct TestApp {
    router: Router,
    accounts: Arc<InMemoryAccountRepository>,
    feed: BroadcastNotificationBus,
}

impl TestApp {
    fn new(classifier: MockAIProvider) -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let feed = BroadcastNotificationBus::new(16);
        let ports = EnginePorts {
            accounts: accounts.clone(),
            directory: accounts.clone(),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            responses: Arc::new(InMemoryResponseRepository::new()),
            reports: Arc::new(InMemorySessionReportRepository::new()),
            classifier: Arc::new(classifier),
            assistant: Arc::new(MockAIProvider::new()),
            bus: Arc::new(feed.clone()),
        };
        let engine = Engine::new(ports, EnginePolicy::default());
        Self {
            router: app_router(AppState::new(engine, feed.clone())),
            accounts,
            feed,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn register_asker(&self) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/accounts",
                None,
                json!({"displayName": "anon", "role": "asker"}),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn seed_admin(&self) -> String {
        let admin = Account::new_admin(AccountId::new(), "Ops");
        self.accounts.save(&admin).await.unwrap();
        admin.id.to_string()
    }
}

fn json_request(method: &str, uri: &str, actor: Option<(&str, &str)>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some((id, role)) = actor {
        builder = builder
            .header(ACCOUNT_ID_HEADER, id)
            .header(ACCOUNT_ROLE_HEADER, role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, actor: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some((id, role)) = actor {
        builder = builder
            .header(ACCOUNT_ID_HEADER, id)
            .header(ACCOUNT_ROLE_HEADER, role);
    }
    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let (status, body) = app.send(get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submitting_without_identity_is_unauthorized() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/questions",
            None,
            json!({"content": "hello"}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn safe_question_is_created_and_broadcast() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let mut events = app.feed.subscribe();
    let asker = app.register_asker().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/questions",
            Some((&asker, "asker")),
            json!({"content": "How do I rebuild trust?"}),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["question"]["category"], "Relationship");
    assert_eq!(body["question"]["status"], "Pending");
    assert_eq!(body["question"]["isFlagged"], false);

    let event = serde_json::to_value(events.recv().await.unwrap()).unwrap();
    assert_eq!(event["event"], "new_question");
    assert_eq!(event["payload"]["questionId"], body["question"]["id"]);
}

#[tokio::test]
async fn unsafe_question_returns_strike_notice() {
    let app = TestApp::new(MockAIProvider::new().always_respond(HARASSMENT));
    let asker = app.register_asker().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/questions",
            Some((&asker, "asker")),
            json!({"content": "you are all idiots"}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "POLICY_VIOLATION");
    assert_eq!(body["details"]["flagCount"], 1);
    assert_eq!(body["details"]["isFlagged"], false);
    assert!(body["details"]["quarantinedQuestion"].is_string());
}

#[tokio::test]
async fn classifier_outage_is_retryable() {
    let app = TestApp::new(MockAIProvider::new().always_error(MockError::Timeout {
        timeout_secs: 30,
    }));
    let asker = app.register_asker().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/questions",
            Some((&asker, "asker")),
            json!({"content": "Is it normal to feel this way?"}),
        ))
        .await;

    assert_eq!(status, StatusCode::FAILED_DEPENDENCY);
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn admin_views_require_admin_role() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let asker = app.register_asker().await;
    let admin = app.seed_admin().await;

    let (status, body) = app
        .send(get("/api/admin/dashboard", Some((&asker, "asker"))))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = app
        .send(get("/api/admin/dashboard", Some((&admin, "admin"))))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["askers"], 1);
}

#[tokio::test]
async fn malformed_path_ids_are_bad_requests() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let asker = app.register_asker().await;

    let (status, _) = app
        .send(get("/api/questions/not-a-uuid", Some((&asker, "asker"))))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expert_application_flows_through_admin_verification() {
    let app = TestApp::new(MockAIProvider::new().always_respond(SAFE));
    let admin = app.seed_admin().await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/accounts",
            None,
            json!({"displayName": "Sam", "role": "expert", "category": "Relationship"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["expert"]["status"], "pending");
    let expert = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(get(&format!("/api/accounts/{}/access", expert), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], false);

    let (status, body) = app
        .send(json_request(
            "POST",
            &format!("/api/admin/experts/{}/verify", expert),
            Some((&admin, "admin")),
            json!({"decision": "approve"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expert"]["status"], "approved");

    let (status, body) = app
        .send(json_request(
            "PUT",
            "/api/expert/status",
            Some((&expert, "expert")),
            json!({"isOnline": true}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expert"]["isOnline"], true);
}
