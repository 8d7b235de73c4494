//! HTTP server for the GrubDash API.
//!
//! Routes every collection endpoint to its handler, answers unsupported
//! methods with 405 and unknown paths with 404, and wraps the whole router in
//! tracing, CORS, body-size and timeout layers.

use crate::apis::{dishes, orders};
use axum::{
	extract::{DefaultBodyLimit, OriginalUri},
	http::{header, HeaderValue, Method, StatusCode},
	middleware,
	response::{IntoResponse, Json, Response},
	routing::{get, MethodRouter},
	Router,
};
use grub_config::{ApiConfig, Config};
use grub_core::GrubEngine;
use grub_types::{ApiError, ErrorResponse};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Engine owning the dishes and orders collections.
	pub engine: Arc<GrubEngine>,
}

/// Builds the application router with all routes and middleware.
pub fn build_router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route("/health", get(health))
		.route(
			"/dishes",
			collection(get(dishes::list_dishes).post(dishes::create_dish)),
		)
		.route(
			"/dishes/{dishId}",
			collection(get(dishes::read_dish).put(dishes::update_dish)),
		)
		.route(
			"/orders",
			collection(get(orders::list_orders).post(orders::create_order)),
		)
		.route(
			"/orders/{orderId}",
			collection(
				get(orders::read_order)
					.put(orders::update_order)
					.delete(orders::delete_order),
			),
		)
		.fallback(path_not_found)
		.layer(DefaultBodyLimit::max(api_config.max_request_size))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(cors_layer(api_config))
				.layer(middleware::map_response(json_error_body))
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				))),
		)
		.with_state(state)
}

/// Answers any method a collection route does not register with 405.
fn collection(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
	router.fallback(method_not_allowed)
}

/// Builds the CORS layer. Any origin is allowed unless origins are configured.
fn cors_layer(api_config: &ApiConfig) -> CorsLayer {
	let Some(cors) = &api_config.cors else {
		return CorsLayer::permissive();
	};
	let origins: Vec<HeaderValue> = cors
		.allowed_origins
		.iter()
		.filter_map(|origin| match origin.parse() {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
				None
			},
		})
		.collect();
	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods(Any)
		.allow_headers(Any)
}

/// Handles GET /health.
async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
	tracing::warn!(%method, path = %uri.path(), "Method not allowed");
	ApiError::MethodNotAllowed(format!("{} not allowed for {}", method, uri.path()))
}

/// Gives error responses built outside the handlers, such as an oversized
/// body or a timeout, the same `{ "error": ... }` body as handler errors.
async fn json_error_body(response: Response) -> Response {
	let status = response.status();
	let is_json = response
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("application/json"));
	if is_json || !(status.is_client_error() || status.is_server_error()) {
		return response;
	}

	let error = match status {
		StatusCode::PAYLOAD_TOO_LARGE => "Request body is too large".to_string(),
		StatusCode::REQUEST_TIMEOUT => "Request timed out".to_string(),
		other => other.canonical_reason().unwrap_or("Request failed").to_string(),
	};
	tracing::warn!(%status, error = %error, "Request rejected");
	(status, Json(ErrorResponse { error })).into_response()
}

async fn path_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
	tracing::warn!(path = %uri.path(), "Path not found");
	ApiError::not_found(format!("Path not found: {}", uri.path()))
}

/// Starts the HTTP server for the API.
///
/// Serves until Ctrl+C is received, then drains in-flight requests.
pub async fn start_server(
	config: &Config,
	engine: Arc<GrubEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { engine }, &config.api);

	let bind_address = config.bind_address();
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("GrubDash API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}
