//! API types for the GrubDash HTTP API.
//!
//! Every request and response body wraps its payload in a `data` envelope,
//! and every rejected request yields a single `{ "error": ... }` object.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned for internal faults; the underlying cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Envelope carrying a payload under the `data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
	pub data: T,
}

impl<T> DataEnvelope<T> {
	pub fn new(data: T) -> Self {
		Self { data }
	}
}

/// API error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description
	pub error: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
	/// Client payload is malformed (400).
	#[error("{0}")]
	BadRequest(String),
	/// Referenced record or path does not exist (404).
	#[error("{0}")]
	NotFound(String),
	/// Route exists but not for this method (405).
	#[error("{0}")]
	MethodNotAllowed(String),
	/// Unexpected fault (500). The message is never sent to the client.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl ApiError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		ApiError::BadRequest(message.into())
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		ApiError::NotFound(message.into())
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let error = match self {
			ApiError::BadRequest(message)
			| ApiError::NotFound(message)
			| ApiError::MethodNotAllowed(message) => message.clone(),
			ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
		};
		ErrorResponse { error }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status_code(), Json(self.to_error_response())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_codes() {
		assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
		assert_eq!(
			ApiError::MethodNotAllowed("x".into()).status_code(),
			StatusCode::METHOD_NOT_ALLOWED
		);
		assert_eq!(
			ApiError::Internal("x".into()).status_code(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn test_internal_error_hides_details() {
		let err = ApiError::Internal("lock poisoned at store.rs:42".into());
		assert_eq!(err.to_error_response().error, INTERNAL_ERROR_MESSAGE);
		assert!(err.to_string().contains("lock poisoned"));
	}

	#[test]
	fn test_error_response_shape() {
		let body = serde_json::to_value(
			ApiError::bad_request("Dish must include a name").to_error_response(),
		)
		.unwrap();
		assert_eq!(body, serde_json::json!({ "error": "Dish must include a name" }));
	}
}
