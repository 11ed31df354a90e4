//! API endpoint handlers
//!
//! HTTP surface used by the storefront: the chat-bot advisor, product
//! description generation, and the operational endpoints (root info, health,
//! connectivity test).

use crate::core::config::Config;
use crate::core::constants::message;
use crate::core::orchestrator::{ChatError, Orchestrator};
use crate::core::prompts::{ChatContext, Prompt};
use crate::models::chat::{ChatRequest, ChatResponse, DescriptionRequest, DescriptionResponse};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<Orchestrator>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/chat", post(chat))
        .route("/api/generate-description", post(generate_description))
        .route("/health", get(health_check))
        .route("/test-connection", get(test_connection))
        .with_state(state)
}

fn chat_failure(status: StatusCode, message: &str, error: Option<String>) -> Response {
    let body = ChatResponse {
        success: false,
        response: None,
        message: Some(message.to_string()),
        error,
    };
    (status, Json(body)).into_response()
}

fn description_failure(status: StatusCode, message: &str, error: Option<String>) -> Response {
    let body = DescriptionResponse {
        success: false,
        description: None,
        message: Some(message.to_string()),
        error,
    };
    (status, Json(body)).into_response()
}

/// POST /api/chat - Reply to a chat-bot message
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            return chat_failure(StatusCode::BAD_REQUEST, message::MESSAGE_REQUIRED, None);
        }
    };

    let request_id = uuid::Uuid::new_v4();
    let context = ChatContext::from_label(request.context.as_deref());
    let span = info_span!("chat", %request_id, context = context.as_str());

    async move {
        info!(chars = request.message.chars().count(), "Incoming chat request");

        match state
            .orchestrator
            .get_reply(&request.message, request.context.as_deref())
            .await
        {
            Ok(reply) => {
                info!(source = %reply.source_provider, "Chat reply sent");
                Json(ChatResponse {
                    success: true,
                    response: Some(reply.text),
                    message: None,
                    error: None,
                })
                .into_response()
            }
            Err(ChatError::Validation(reason)) => {
                warn!("Invalid chat request: {}", reason);
                chat_failure(StatusCode::BAD_REQUEST, message::MESSAGE_REQUIRED, None)
            }
            Err(ChatError::UpstreamUnavailable(detail)) => {
                error!("Chat failed on every provider: {}", detail);
                let exposed = state.config.expose_upstream_errors.then_some(detail);
                chat_failure(StatusCode::INTERNAL_SERVER_ERROR, message::CHAT_FAILED, exposed)
            }
        }
    }
    .instrument(span)
    .await
}

/// POST /api/generate-description - Write marketing copy for a product
async fn generate_description(
    State(state): State<AppState>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected description body: {}", rejection.body_text());
            return description_failure(
                StatusCode::BAD_REQUEST,
                message::PRODUCT_NAME_REQUIRED,
                None,
            );
        }
    };

    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("generate_description", %request_id);

    async move {
        info!(product = %request.product_name, "Incoming description request");

        match state.orchestrator.describe_product(&request).await {
            Ok(reply) => {
                info!(source = %reply.source_provider, "Description generated");
                Json(DescriptionResponse {
                    success: true,
                    description: Some(reply.text),
                    message: None,
                    error: None,
                })
                .into_response()
            }
            Err(ChatError::Validation(reason)) => {
                warn!("Invalid description request: {}", reason);
                description_failure(
                    StatusCode::BAD_REQUEST,
                    message::PRODUCT_NAME_REQUIRED,
                    None,
                )
            }
            Err(ChatError::UpstreamUnavailable(detail)) => {
                error!("Description failed on every provider: {}", detail);
                let exposed = state.config.expose_upstream_errors.then_some(detail);
                description_failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message::DESCRIPTION_FAILED,
                    exposed,
                )
            }
        }
    }
    .instrument(span)
    .await
}

fn provider_names(state: &AppState) -> Vec<String> {
    state
        .orchestrator
        .providers()
        .iter()
        .map(|p| p.provider_name().to_string())
        .collect()
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("Aharyas Assist v{}", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "config": {
            "providers": provider_names(&state),
            "request_timeout_secs": state.config.request_timeout,
        },
        "endpoints": {
            "chat": "/api/chat",
            "generate_description": "/api/generate-description",
            "health": "/health",
            "test_connection": "/test-connection",
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "providers": provider_names(&state),
    }))
}

/// GET /test-connection - Probe every provider individually
///
/// Unlike the chat path this does not fall back: each provider is asked once
/// so an operator can see which link of the chain is broken.
async fn test_connection(State(state): State<AppState>) -> Response {
    let probe = Prompt {
        system: String::new(),
        user: "Reply with the single word: ok".to_string(),
    };

    let mut results = Vec::new();
    let mut all_ok = true;

    for provider in state.orchestrator.providers() {
        match provider.attempt(&probe).await {
            Ok(_) => results.push(json!({
                "provider": provider.provider_name(),
                "status": "success",
            })),
            Err(e) => {
                error!("Connectivity test failed for {}: {}", provider.provider_name(), e);
                all_ok = false;
                results.push(json!({
                    "provider": provider.provider_name(),
                    "status": "failed",
                    "message": e.to_string(),
                }));
            }
        }
    }

    let status = if all_ok && !results.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "success" } else { "failed" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "providers": results,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::{Provider, ProviderError};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct FixedProvider {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for FixedProvider {
        async fn attempt(&self, _prompt: &Prompt) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| ProviderError::Unexpected(format!("{} unreachable", self.name)))
        }

        fn provider_name(&self) -> &str {
            self.name
        }
    }

    fn fixed(name: &'static str, reply: Option<&'static str>) -> Arc<FixedProvider> {
        Arc::new(FixedProvider {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn app(providers: Vec<Arc<FixedProvider>>, expose_errors: bool) -> Router {
        let mut config = Config::from_toml_str("", |_| Some("test-key".to_string())).unwrap();
        config.expose_upstream_errors = expose_errors;

        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn Provider>)
            .collect();

        create_router(AppState {
            config: Arc::new(config),
            orchestrator: Arc::new(Orchestrator::new(providers)),
        })
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_success() {
        let primary = fixed("primary", Some("Namaste! How can I help?"));
        let (status, body) = post_json(
            app(vec![primary.clone()], false),
            "/api/chat",
            r#"{"message":"Hello","context":"general"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "response": "Namaste! How can I help?"})
        );
    }

    #[tokio::test]
    async fn test_chat_falls_back_to_secondary() {
        let primary = fixed("primary", None);
        let secondary = fixed("secondary", Some("We use Ikkat and Kalamkari cotton."));
        let (status, body) = post_json(
            app(vec![primary.clone(), secondary.clone()], false),
            "/api/chat",
            r#"{"message":"What fabrics do you use?","context":"fashion"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "We use Ikkat and Kalamkari cotton.");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_missing_message() {
        let primary = fixed("primary", Some("unused"));
        for body in [r#"{}"#, r#"{"message":"   ","context":"support"}"#, "not json"] {
            let (status, response) =
                post_json(app(vec![primary.clone()], false), "/api/chat", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                response,
                json!({"success": false, "message": "Message is required"})
            );
        }
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_all_providers_down_hides_detail() {
        let (status, body) = post_json(
            app(vec![fixed("primary", None), fixed("secondary", None)], false),
            "/api/chat",
            r#"{"message":"Hello"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Failed to get AI response"})
        );
    }

    #[tokio::test]
    async fn test_chat_all_providers_down_exposes_detail_when_enabled() {
        let (status, body) = post_json(
            app(vec![fixed("primary", None), fixed("secondary", None)], true),
            "/api/chat",
            r#"{"message":"Hello"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("secondary unreachable")
        );
    }

    #[tokio::test]
    async fn test_generate_description() {
        let primary = fixed("primary", Some("Woven by hand in Pochampally."));
        let (status, body) = post_json(
            app(vec![primary], false),
            "/api/generate-description",
            r#"{"productName":"Ikkat Dupatta","features":["cotton","double ikat"],"category":"Dupattas","heritage":"Telangana"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "description": "Woven by hand in Pochampally."})
        );
    }

    #[tokio::test]
    async fn test_generate_description_failures() {
        let (status, body) = post_json(
            app(vec![fixed("primary", Some("unused"))], false),
            "/api/generate-description",
            r#"{"features":"silk"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Product name is required");

        let (status, body) = post_json(
            app(vec![fixed("primary", None)], false),
            "/api/generate-description",
            r#"{"productName":"Kalamkari Stole"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to generate description");
    }

    #[tokio::test]
    async fn test_health_lists_providers() {
        let (status, body) = get_json(
            app(vec![fixed("Gemini", Some("ok")), fixed("OpenAI", Some("ok"))], false),
            "/health",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["providers"], json!(["Gemini", "OpenAI"]));
    }

    #[tokio::test]
    async fn test_connection_probes_every_provider() {
        let primary = fixed("Gemini", None);
        let secondary = fixed("OpenAI", Some("ok"));
        let (status, body) = get_json(
            app(vec![primary.clone(), secondary.clone()], false),
            "/test-connection",
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["providers"][0]["status"], "failed");
        assert_eq!(body["providers"][1]["status"], "success");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }
}
