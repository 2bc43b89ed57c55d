//! Router configuration and server setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/sessions/:id/start", post(handlers::start_session))
        .route("/api/sessions/:id/messages", post(handlers::send_message))
        .route("/api/sessions/:id/end", post(handlers::end_session))
        .route("/api/sessions/:id/memory", get(handlers::get_memory))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use songbird_agent::testing::ScriptedModel;
    use songbird_agent::{DataEntryWorker, ModelConfig, Receptionist};
    use songbird_booking::{MockBookingApi, ToolGateway};
    use songbird_memory::{InMemoryStore, SummaryArchive, TranscriptSummarizer};
    use songbird_orchestrator::Orchestrator;
    use tempfile::tempdir;

    fn make_server(model: Arc<ScriptedModel>, store: InMemoryStore) -> TestServer {
        let orchestrator = Orchestrator::new(
            Arc::new(store),
            Receptionist::new(
                model.clone(),
                ModelConfig::receptionist("test-model"),
                "The Hungry Unicorn",
            ),
            DataEntryWorker::new(
                model,
                ModelConfig::data_entry("test-model"),
                ToolGateway::new(Arc::new(MockBookingApi::new())),
            ),
            Arc::new(TranscriptSummarizer),
        );
        let state = AppState::new(ApiConfig::default(), Arc::new(orchestrator));
        TestServer::new(create_router(state)).unwrap()
    }

    fn to_user(message: &str) -> String {
        json!({"channel": "to_user", "message": message}).to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = make_server(Arc::new(ScriptedModel::default()), InMemoryStore::new());

        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap().is_empty());
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_conversation_lifecycle() {
        let model = Arc::new(ScriptedModel::new([to_user("Of course, for how many?")]));
        let server = make_server(model, InMemoryStore::new());

        let response = server.post("/api/sessions/guest-1/start").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Welcome to The Hungry Unicorn! How can I help you today?"
        );

        let response = server
            .post("/api/sessions/guest-1/messages")
            .json(&json!({"message": "I'd like a table"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["response"], "Of course, for how many?");
        assert_eq!(body["closed"], false);

        let response = server.get("/api/sessions/guest-1/memory").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["kind"], "recent");
        assert_eq!(body["turns"].as_array().unwrap().len(), 3);

        let response = server.post("/api/sessions/guest-1/end").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "session closed");
        assert!(body["summary"]["text"]
            .as_str()
            .unwrap()
            .contains("I'd like a table"));

        let response = server.get("/api/sessions/guest-1/memory").await;
        let body: Value = response.json();
        assert_eq!(body["kind"], "summary");
    }

    #[tokio::test]
    async fn test_done_message_closes() {
        let server = make_server(Arc::new(ScriptedModel::default()), InMemoryStore::new());

        let response = server
            .post("/api/sessions/guest-1/messages")
            .json(&json!({"message": "That's all"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["closed"], true);
        assert!(body["summary"].is_object());

        let response = server.post("/api/sessions/guest-1/end").await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("already closed"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let server = make_server(Arc::new(ScriptedModel::default()), InMemoryStore::strict());

        let response = server.post("/api/sessions/nobody/end").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("not found"));

        server
            .get("/api/sessions/nobody/memory")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let server = make_server(Arc::new(ScriptedModel::default()), InMemoryStore::new());

        let response = server
            .post("/api/sessions/guest-1/messages")
            .json(&json!({"message": "   "}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_returning_guest_after_restart() {
        let dir = tempdir().unwrap();

        let first = make_server(
            Arc::new(ScriptedModel::default()),
            InMemoryStore::new().with_archive(SummaryArchive::new(dir.path()).unwrap()),
        );
        first
            .post("/api/sessions/guest-1/messages")
            .json(&json!({"message": "bye"}))
            .await
            .assert_status_ok();

        let second = make_server(
            Arc::new(ScriptedModel::default()),
            InMemoryStore::new().with_archive(SummaryArchive::new(dir.path()).unwrap()),
        );
        let response = second.get("/api/sessions/guest-1/memory").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["kind"], "summary");

        let response = second.post("/api/sessions/guest-1/start").await;
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Welcome back!"));
    }
}
