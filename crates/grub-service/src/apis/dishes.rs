//! Dishes endpoints.

use super::{log_failure, parse_body};
use crate::server::AppState;
use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	response::Json,
};
use grub_types::{ApiError, DataEnvelope, Dish};

/// Handles GET /dishes.
pub async fn list_dishes(
	State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<Dish>>>, ApiError> {
	match state.engine.dishes().list().await {
		Ok(dishes) => Ok(Json(DataEnvelope::new(dishes))),
		Err(e) => {
			log_failure("list_dishes", &e);
			Err(e)
		},
	}
}

/// Handles GET /dishes/{dishId}.
pub async fn read_dish(
	Path(dish_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Dish>>, ApiError> {
	match state.engine.dishes().read(&dish_id).await {
		Ok(dish) => Ok(Json(DataEnvelope::new(dish))),
		Err(e) => {
			log_failure("read_dish", &e);
			Err(e)
		},
	}
}

/// Handles POST /dishes.
pub async fn create_dish(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<(StatusCode, Json<DataEnvelope<Dish>>), ApiError> {
	let result = match parse_body(&body) {
		Ok(body) => state.engine.dishes().create(&body).await,
		Err(e) => Err(e),
	};
	match result {
		Ok(dish) => Ok((StatusCode::CREATED, Json(DataEnvelope::new(dish)))),
		Err(e) => {
			log_failure("create_dish", &e);
			Err(e)
		},
	}
}

/// Handles PUT /dishes/{dishId}.
pub async fn update_dish(
	Path(dish_id): Path<String>,
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<DataEnvelope<Dish>>, ApiError> {
	let result = match parse_body(&body) {
		Ok(body) => state.engine.dishes().update(&dish_id, &body).await,
		Err(e) => Err(e),
	};
	match result {
		Ok(dish) => Ok(Json(DataEnvelope::new(dish))),
		Err(e) => {
			log_failure("update_dish", &e);
			Err(e)
		},
	}
}
