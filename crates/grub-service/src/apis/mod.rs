//! Route handlers for the dishes and orders collections.

use axum::body::Bytes;
use grub_types::ApiError;
use serde_json::Value;

pub mod dishes;
pub mod orders;

/// Parses a request body leniently.
///
/// An empty body is treated as `null` so the validation chain reports the
/// missing fields; malformed JSON is rejected outright.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}
	serde_json::from_slice(body)
		.map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Logs a failed request; internal details never reach the client.
pub(crate) fn log_failure(operation: &str, err: &ApiError) {
	match err {
		ApiError::Internal(detail) => {
			tracing::error!(operation, error = %detail, "Request failed")
		},
		other => tracing::warn!(operation, error = %other, "Request rejected"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_body_is_null() {
		assert_eq!(parse_body(&Bytes::new()).unwrap(), Value::Null);
		assert_eq!(parse_body(&Bytes::from_static(b"  \n")).unwrap(), Value::Null);
	}

	#[test]
	fn test_malformed_body_rejected() {
		let err = parse_body(&Bytes::from_static(b"{\"data\":")).unwrap_err();
		assert!(matches!(err, ApiError::BadRequest(ref m) if m.starts_with("Invalid JSON body")));
	}

	#[test]
	fn test_valid_body_parsed() {
		let value = parse_body(&Bytes::from_static(br#"{"data":{"name":"Taco"}}"#)).unwrap();
		assert_eq!(value["data"]["name"], "Taco");
	}
}
