//! Orders endpoints.

use super::{log_failure, parse_body};
use crate::server::AppState;
use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	response::Json,
};
use grub_types::{ApiError, DataEnvelope, Order};

/// Handles GET /orders.
pub async fn list_orders(
	State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<Order>>>, ApiError> {
	match state.engine.orders().list().await {
		Ok(orders) => Ok(Json(DataEnvelope::new(orders))),
		Err(e) => {
			log_failure("list_orders", &e);
			Err(e)
		},
	}
}

/// Handles GET /orders/{orderId}.
pub async fn read_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Order>>, ApiError> {
	match state.engine.orders().read(&order_id).await {
		Ok(order) => Ok(Json(DataEnvelope::new(order))),
		Err(e) => {
			log_failure("read_order", &e);
			Err(e)
		},
	}
}

/// Handles POST /orders.
///
/// The new order is `pending` unless the body supplies a valid status.
pub async fn create_order(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<(StatusCode, Json<DataEnvelope<Order>>), ApiError> {
	let result = match parse_body(&body) {
		Ok(body) => state.engine.orders().create(&body).await,
		Err(e) => Err(e),
	};
	match result {
		Ok(order) => Ok((StatusCode::CREATED, Json(DataEnvelope::new(order)))),
		Err(e) => {
			log_failure("create_order", &e);
			Err(e)
		},
	}
}

/// Handles PUT /orders/{orderId}.
pub async fn update_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<DataEnvelope<Order>>, ApiError> {
	let result = match parse_body(&body) {
		Ok(body) => state.engine.orders().update(&order_id, &body).await,
		Err(e) => Err(e),
	};
	match result {
		Ok(order) => Ok(Json(DataEnvelope::new(order))),
		Err(e) => {
			log_failure("update_order", &e);
			Err(e)
		},
	}
}

/// Handles DELETE /orders/{orderId}. Only pending orders may be deleted.
pub async fn delete_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
	match state.engine.orders().delete(&order_id).await {
		Ok(()) => Ok(StatusCode::NO_CONTENT),
		Err(e) => {
			log_failure("delete_order", &e);
			Err(e)
		},
	}
}
