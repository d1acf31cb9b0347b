pub mod chat;
pub mod health;
pub mod knowledge;
pub mod pricing;
pub mod sessions;

use axum::http::{header, HeaderName, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::{api_key_auth, request_logger, REQUEST_ID};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.config.cors.allowed_origins);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID)]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_v1_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat_handler))
        .route("/chat/jobs/{job_id}", get(chat::get_job_status))
        .route(
            "/sessions/{session_id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/pricing/quote", post(pricing::quote))
        .route("/pricing/services", get(pricing::list_services))
        .route("/knowledge", post(knowledge::upload_document))
        .route("/knowledge/search", post(knowledge::search))
        .route("/knowledge/{document_id}", delete(knowledge::delete_document))
        .layer(from_fn_with_state(state, api_key_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::application::QuotationEngine;
    use crate::domain::{ports::SessionStore, Session};
    use crate::infrastructure::{create_pool, AppConfig, InMemorySessionStore};

    fn state_with(config: AppConfig, sessions: Arc<InMemorySessionStore>) -> AppState {
        // the pool connects lazily; these routes never touch Redis
        let pool = create_pool("redis://127.0.0.1:6379").unwrap();
        AppState::new(pool, QuotationEngine::standard(), config).with_session_store(sessions)
    }

    fn app() -> Router {
        create_router(state_with(
            AppConfig::default(),
            Arc::new(InMemorySessionStore::new()),
        ))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_banner() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID));

        let response = app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["endpoints"]["quote"], "/api/v1/pricing/quote");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID, "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID], "req-42");
    }

    #[tokio::test]
    async fn test_quote_endpoint() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/pricing/quote",
                json!({ "service_type": "carpet_cleaning", "postcode": "2500", "area_size": 20 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["available"], true);
        assert_eq!(body["region"], "NSW");
        assert_eq!(body["final_price"], 250.0);
        assert_eq!(body["currency"], "AUD");
    }

    #[tokio::test]
    async fn test_unavailable_quote_is_still_ok() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/pricing/quote",
                json!({ "service_type": "tile_cleaning", "postcode": "6000" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "available": false,
                "region": "WA",
                "error": "Service 'tile_cleaning' is not available in WA"
            })
        );
    }

    #[tokio::test]
    async fn test_services_in_declaration_order() {
        let response = app().oneshot(get("/api/v1/pricing/services")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["service_type"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["carpet_cleaning", "upholstery_cleaning", "tile_cleaning"]
        );
    }

    #[tokio::test]
    async fn test_api_key_required_when_configured() {
        let mut config = AppConfig::default();
        config.config.auth.api_keys = vec!["secret".to_string()];
        let app = create_router(state_with(config, Arc::new(InMemorySessionStore::new())));

        let response = app
            .clone()
            .oneshot(get("/api/v1/pricing/services"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let with_header = Request::builder()
            .uri("/api/v1/pricing/services")
            .header("X-API-Key", "secret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(with_header).await.unwrap().status(),
            StatusCode::OK
        );

        let with_bearer = Request::builder()
            .uri("/api/v1/pricing/services")
            .header("Authorization", "Bearer secret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(with_bearer).await.unwrap().status(),
            StatusCode::OK
        );

        let wrong = Request::builder()
            .uri("/api/v1/pricing/services")
            .header("X-API-Key", "nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(wrong).await.unwrap().status(),
            StatusCode::UNAUTHORIZED
        );

        // health stays open
        assert_eq!(
            app.oneshot(get("/health")).await.unwrap().status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_session_get_and_delete() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let mut session = Session::new(Uuid::new_v4(), "helpdesk-assistant");
        session.record_run("price for carpet?", "Which postcode?");
        sessions.save(&session).await.unwrap();
        let app = create_router(state_with(AppConfig::default(), sessions));

        let uri = format!("/api/v1/sessions/{}", session.id);
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);

        let delete = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(delete).await.unwrap().status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            app.oneshot(get(&uri)).await.unwrap().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_chat_rejects_bad_input_before_queueing() {
        let response = app()
            .oneshot(post_json("/api/v1/chat", json!({ "message": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(post_json(
                "/api/v1/chat",
                json!({ "message": "hi", "agent_id": "sales-bot" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_knowledge_routes_need_an_index() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/knowledge/search",
                json!({ "query": "refunds" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
