//! Order status machine.
//!
//! Orders move through `pending -> preparing -> out-for-delivery -> delivered`.
//! Any of the four statuses may be requested at any time; the only transition
//! that is refused is leaving `delivered`, which also freezes every other
//! field. Deletion is reserved for orders that are still `pending`.

use crate::validation::{is_truthy, RequestContext};
use grub_types::{ApiError, Order, OrderStatus};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Message listing the accepted status values.
static INVALID_STATUS_MESSAGE: Lazy<String> = Lazy::new(|| {
	let names: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
	format!("Order must have a status of {}", names.join(", "))
});

/// Parses a required status field.
///
/// Fails with "Order must have a status" when the value is missing or falsy,
/// and with the list of accepted values when it is not one of them.
pub fn parse_status(value: Option<&Value>) -> Result<OrderStatus, ApiError> {
	let value = match value {
		Some(value) if is_truthy(value) => value,
		_ => return Err(ApiError::bad_request("Order must have a status")),
	};
	value
		.as_str()
		.and_then(|s| s.parse().ok())
		.ok_or_else(|| ApiError::bad_request(INVALID_STATUS_MESSAGE.as_str()))
}

/// Status for a new order: `pending` unless a valid status is supplied.
pub fn initial_status(value: Option<&Value>) -> Result<OrderStatus, ApiError> {
	match value {
		Some(value) if is_truthy(value) => parse_status(Some(value)),
		_ => Ok(OrderStatus::default()),
	}
}

/// Refuses any change to an order that has reached a terminal status.
pub fn ensure_changeable(current: OrderStatus) -> Result<(), ApiError> {
	if current.is_terminal() {
		return Err(ApiError::bad_request("A delivered order cannot be changed"));
	}
	Ok(())
}

/// Refuses deletion unless the order is still pending.
pub fn ensure_deletable(order: &Order) -> Result<(), ApiError> {
	if !order.status.is_deletable() {
		return Err(ApiError::bad_request(
			"An order cannot be deleted unless it is pending",
		));
	}
	Ok(())
}

/// Validation step for order updates.
///
/// Checks the requested status first, then that the stored order may still
/// change.
pub fn status_update_allowed(ctx: &RequestContext<Order>) -> Result<(), ApiError> {
	parse_status(ctx.field("status"))?;
	if let Some(current) = ctx.record() {
		ensure_changeable(current.status)?;
	}
	Ok(())
}

/// Validation step for order creation: a supplied status must be valid.
pub fn initial_status_allowed(ctx: &RequestContext<Order>) -> Result<(), ApiError> {
	initial_status(ctx.field("status")).map(|_| ())
}
