mod product;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

pub use self::product::{DELETED_MESSAGE, NOT_FOUND_MESSAGE, SAVED_MESSAGE, product_routes};

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();

    if let Err(e) = encode(&mut buffer, &state.registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

pub struct AppRouter;

impl AppRouter {
    pub fn build(app_state: AppState) -> Router {
        let shared_state = Arc::new(app_state);

        Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .merge(product_routes(shared_state))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
            .layer(TraceLayer::new_for_http())
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server terminated unexpectedly")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::product::repository::ProductCommandRepositoryTrait,
        di::DependenciesInjectDeps,
        domain::requests::product::SaveProductRequest,
        repository::memory::InMemoryProductRepository,
        service::command::DUPLICATE_CODE_MESSAGE,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{
            Request, Response,
            header::{COOKIE, LOCATION, SET_COOKIE},
        },
    };
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    async fn seeded() -> (Arc<InMemoryProductRepository>, Router) {
        let repo = Arc::new(InMemoryProductRepository::new());
        for (code, name, cents, category) in [
            ("P001", "Widget", 999, "Tools"),
            ("P002", "Blue widget", 2500, "Tools"),
            ("P003", "Gadget", 500, "Electronics"),
        ] {
            repo.create_product(&SaveProductRequest {
                id: None,
                product_code: code.into(),
                name: name.into(),
                price: Decimal::new(cents, 2),
                quantity: 3,
                category: category.into(),
                description: None,
            })
            .await
            .unwrap();
        }

        let state = AppState::with_deps(DependenciesInjectDeps {
            query_repo: repo.clone(),
            command_repo: repo.clone(),
        })
        .unwrap();

        (repo, AppRouter::build(state))
    }

    async fn send_get(app: &Router, uri: &str) -> Response<Body> {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
        app.clone()
            .oneshot(
                Request::get(uri)
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_form(app: &Router, body: &str) -> Response<Body> {
        app.clone()
            .oneshot(
                Request::post("/products/save")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    /// The `name=value` pair of the flash cookie set by a response.
    fn flash_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("flash="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
            .expect("flash cookie")
    }

    #[tokio::test]
    async fn root_redirects_to_products() {
        let (_, app) = seeded().await;
        let response = send_get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/products");
    }

    #[tokio::test]
    async fn list_shows_products_and_categories() {
        let (_, app) = seeded().await;
        let response = send_get(&app, "/products").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Widget"));
        assert!(html.contains("Gadget"));
        assert!(html.contains(r#"<option value="Electronics">"#));
    }

    #[tokio::test]
    async fn list_filters_by_category_and_keeps_selection() {
        let (_, app) = seeded().await;
        let html = body_text(send_get(&app, "/products?category=Electronics").await).await;
        assert!(html.contains("Gadget"));
        assert!(!html.contains("Blue widget"));
        assert!(html.contains(r#"<option value="Electronics" selected>"#));
    }

    #[tokio::test]
    async fn advanced_search_combines_criteria() {
        let (_, app) = seeded().await;
        let uri = "/products/advanced-search?name=widget&category=Tools&minPrice=10&maxPrice=";
        let html = body_text(send_get(&app, uri).await).await;
        assert!(html.contains("Blue widget"));
        assert!(!html.contains("P001"));
        assert!(html.contains(r#"name="minPrice" placeholder="Min price" value="10""#));
    }

    #[tokio::test]
    async fn advanced_search_with_all_blank_inputs_lists_everything() {
        let (_, app) = seeded().await;
        let html = body_text(
            send_get(&app, "/products/advanced-search?name=&category=&minPrice=&maxPrice=").await,
        )
        .await;
        for code in ["P001", "P002", "P003"] {
            assert!(html.contains(code));
        }
    }

    #[tokio::test]
    async fn malformed_price_is_a_json_bad_request() {
        let (_, app) = seeded().await;
        let response = send_get(&app, "/products/advanced-search?minPrice=cheap").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn keyword_search_is_paginated() {
        let (_, app) = seeded().await;
        let uri = "/products/search?keyword=widget&page=0&size=1";
        let html = body_text(send_get(&app, uri).await).await;
        assert!(html.contains("P001"));
        assert!(!html.contains("P002"));
        assert!(html.contains("Page 1 of 2"));

        let response = send_get(&app, "/products/search?keyword=widget&size=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn new_form_is_blank() {
        let (_, app) = seeded().await;
        let response = send_get(&app, "/products/new").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Add New Product"));
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let (_, app) = seeded().await;
        let html = body_text(send_get(&app, "/products/edit/3").await).await;
        assert!(html.contains("Edit Product"));
        assert!(html.contains(r#"value="Gadget""#));
    }

    #[tokio::test]
    async fn edit_of_unknown_id_redirects_with_error_flash() {
        let (_, app) = seeded().await;
        let response = send_get(&app, "/products/edit/999").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/products");

        let cookie = flash_cookie(&response);
        let html = body_text(get_with_cookie(&app, "/products", &cookie).await).await;
        assert!(html.contains(NOT_FOUND_MESSAGE));
        assert!(html.contains("alert-error"));
    }

    #[tokio::test]
    async fn valid_save_creates_and_flashes_once() {
        let (repo, app) = seeded().await;
        let response = post_form(
            &app,
            "id=&productCode=P010&name=Hammer&price=12.50&quantity=4&category=Tools&description=",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(repo.len(), 4);

        let cookie = flash_cookie(&response);
        let listed = get_with_cookie(&app, "/products", &cookie).await;
        let cleared = listed
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("flash=;") || v.starts_with("flash=\"\""));
        assert!(cleared);

        let html = body_text(listed).await;
        assert!(html.contains(SAVED_MESSAGE));
        assert!(html.contains("Hammer"));
    }

    #[tokio::test]
    async fn invalid_save_re_renders_form_with_messages() {
        let (repo, app) = seeded().await;
        let response = post_form(
            &app,
            "productCode=&name=&price=0&quantity=-1&category=Tools",
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(repo.len(), 3);

        let html = body_text(response).await;
        assert!(html.contains("Product code is required"));
        assert!(html.contains("Product name is required"));
        assert!(html.contains("Quantity cannot be negative"));
    }

    #[tokio::test]
    async fn duplicate_code_re_renders_form() {
        let (repo, app) = seeded().await;
        let response = post_form(
            &app,
            "productCode=P001&name=Copy&price=1.00&quantity=1&category=Tools",
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(repo.len(), 3);
        assert!(body_text(response).await.contains(DUPLICATE_CODE_MESSAGE));
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let (repo, app) = seeded().await;
        let response = post_form(
            &app,
            "id=1&productCode=P001&name=Widget+Pro&price=10.00&quantity=9&category=Tools",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(repo.len(), 3);

        let html = body_text(send_get(&app, "/products/edit/1").await).await;
        assert!(html.contains("Widget Pro"));
    }

    #[tokio::test]
    async fn delete_flashes_success_then_error_for_missing() {
        let (repo, app) = seeded().await;

        let response = send_get(&app, "/products/delete/2").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(repo.len(), 2);
        let cookie = flash_cookie(&response);
        let html = body_text(get_with_cookie(&app, "/products", &cookie).await).await;
        assert!(html.contains(DELETED_MESSAGE));

        let response = send_get(&app, "/products/delete/2").await;
        let cookie = flash_cookie(&response);
        let html = body_text(get_with_cookie(&app, "/products", &cookie).await).await;
        assert!(html.contains("Error deleting product"));
    }

    #[tokio::test]
    async fn failing_reads_render_list_page_with_error() {
        let (repo, app) = seeded().await;
        repo.fail_reads();

        for uri in [
            "/products",
            "/products?category=Tools",
            "/products/advanced-search?name=x",
            "/products/search?keyword=x",
        ] {
            let response = send_get(&app, uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert!(
                response.headers()[CONTENT_TYPE]
                    .to_str()
                    .unwrap()
                    .starts_with("text/html"),
                "{uri}"
            );

            let html = body_text(response).await;
            assert!(html.contains("alert-error"), "{uri}");
            assert!(html.contains("Error: "), "{uri}");
            assert!(html.contains("No products found"), "{uri}");
            assert!(html.contains(r#"href="/products/new""#), "{uri}");
        }
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_service_counters() {
        let (_, app) = seeded().await;
        send_get(&app, "/products").await;

        let response = send_get(&app, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("product_query_service_requests"));
    }
}
