//! # HTTP Server
//!
//! JSON API over the extraction pipeline:
//!
//! - `GET /`: liveness message
//! - `GET /v1/scraper/health`: health check
//! - `POST /v1/scraper/crawl`: run the pipeline for a [`ScrapeRequest`](crate::pipeline::ScrapeRequest)

mod error;
mod routes;

pub use error::ApiError;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::Pipeline;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root_handler))
        .route("/v1/scraper/health", get(routes::health_handler))
        .route("/v1/scraper/crawl", post(routes::crawl_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on `addr` until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AggregationLimits;
    use crate::crawler::Page;
    use crate::crawler::mock::MockCrawler;
    use crate::extraction::ExtractionClient;
    use crate::extraction::mock::MockGenerator;
    use crate::schema::ExtractionContract;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(crawler: MockCrawler, generator: MockGenerator) -> Router {
        let extraction = ExtractionClient::new(
            Arc::new(generator),
            ExtractionContract::current().unwrap(),
            AggregationLimits::default(),
        );
        build_router(AppState::new(Pipeline::new(Arc::new(crawler), extraction)))
    }

    fn site() -> MockCrawler {
        MockCrawler::with_pages(vec![
            Page::new("https://vet.example/", "Happy Paws Veterinary Clinic"),
            Page::new("https://vet.example/hours", "Mon-Fri 08:00-18:00"),
        ])
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn crawl_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/scraper/crawl")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (status, body) = send(
            app(site(), MockGenerator::default()),
            Request::get("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "siteprofile API is running"}));

        let (status, body) = send(
            app(site(), MockGenerator::default()),
            Request::get("/v1/scraper/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "scraper"}));
    }

    #[tokio::test]
    async fn test_crawl_success() {
        let generator = MockGenerator::returning(json!({"name": "Happy Paws"}));
        let request = crawl_request(r#"{"url": "https://vet.example/", "max_pages": 5}"#);

        let (status, body) = send(app(site(), generator), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["pages_crawled"], json!(2));
        assert_eq!(body["data"]["name"], json!("Happy Paws"));
        assert_eq!(body["data"]["phones"], json!([]));
        assert_eq!(body["error"], json!(null));
    }

    #[tokio::test]
    async fn test_crawl_partial_failure_is_ok_status() {
        let request = crawl_request(r#"{"url": "https://vet.example/"}"#);

        let (status, body) = send(
            app(MockCrawler::with_pages(Vec::new()), MockGenerator::default()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["pages_crawled"], json!(0));
        assert_eq!(body["data"], json!(null));
        assert_eq!(body["error"], json!("No content found on the website"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let crawler = site();
        let request = crawl_request(r#"{"url": "not-a-url"}"#);

        let (status, body) = send(app(crawler.clone(), MockGenerator::default()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("not-a-url"));
        assert_eq!(crawler.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = crawl_request(r#"{"url": "https://vet.example/", "max_depth": -1}"#);

        let (status, body) = send(app(site(), MockGenerator::default()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_missing_configuration_is_server_error() {
        let crawler = site();
        let request = crawl_request(r#"{"url": "https://vet.example/"}"#);

        let (status, body) = send(
            app(crawler.clone(), MockGenerator::unconfigured("GEMINI_API_KEY is not set")),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("GEMINI_API_KEY"));
        assert_eq!(crawler.call_count(), 0);
    }
}
