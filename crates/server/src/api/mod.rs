use crate::config::AppState;
use anyhow::{Context, Result};
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the HTTP server
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("MCP HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}

/// Create the router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(handlers::handle_mcp))
        .route("/api/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": ctgov_mcp::server::SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ctgov_core::Settings;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with_base(base_url: &str) -> Router {
        let settings = Settings::default().with_base_url_override(Some(base_url.to_string()));
        create_router(AppState::new(&settings).unwrap())
    }

    async fn post_mcp(app: Router, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serve_fails_when_port_taken() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let settings =
            Settings::default().with_base_url_override(Some("http://127.0.0.1:9".to_string()));
        let err = serve(&addr, AppState::new(&settings).unwrap())
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains(&format!("Failed to bind {}", addr)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app_with_base("http://127.0.0.1:9");
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["service"], json!("ctgov-mcp"));
    }

    #[tokio::test]
    async fn test_tools_list_over_http() {
        let app = app_with_base("http://127.0.0.1:9");
        let (status, body) =
            post_mcp(app, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let app = app_with_base("http://127.0.0.1:9");
        let (status, body) =
            post_mcp(app, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_over_http() {
        let app = app_with_base("http://127.0.0.1:9");
        let (status, body) = post_mcp(app, "not json").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"]["code"], json!(-32700));
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_tool_text() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/studies"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad filter"))
            .mount(&upstream)
            .await;

        let app = app_with_base(&upstream.uri());
        let (status, body) = post_mcp(
            app,
            r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"list_studies","arguments":{"cond":"flu","overallStatus":"NOPE"}}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert!(body.get("error").is_none());
        assert_eq!(
            body["result"]["content"][0]["text"],
            json!("ClinicalTrials.gov API error: 400 Bad Request\nbad filter")
        );
    }
}
