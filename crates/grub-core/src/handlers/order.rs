//! Order handler: list, read, create, update and delete.

use crate::state::order::{
	ensure_deletable, initial_status, initial_status_allowed, parse_status, status_update_allowed,
};
use crate::utils::{truncate_id, IdGenerator};
use crate::validation::{
	is_truthy, positive_integer, resolve, run_chain, text_field, RequestContext, Resource, Step,
};
use grub_storage::StorageService;
use grub_types::{ApiError, Order, OrderFields, OrderLine, OrderStatus, StorageKey};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

impl Resource for Order {
	const NAME: &'static str = "Order";
	const KEY: StorageKey = StorageKey::Orders;

	fn not_found(id: &str) -> ApiError {
		ApiError::not_found(format!("Order not found: {}", id))
	}
}

/// Checks for placing an order.
pub const CREATE_CHAIN: &[Step<Order>] = &[
	Step::Require("deliverTo"),
	Step::Require("mobileNumber"),
	Step::Check(dishes_are_valid),
	Step::Check(initial_status_allowed),
];

/// Checks for updating an order; runs after the route id has resolved.
pub const UPDATE_CHAIN: &[Step<Order>] = &[
	Step::MatchRouteId,
	Step::Require("deliverTo"),
	Step::Require("mobileNumber"),
	Step::Check(dishes_are_valid),
	Step::Check(status_update_allowed),
];

/// The `dishes` field must be a non-empty array whose every element carries a
/// positive integer `quantity`.
pub fn dishes_are_valid(ctx: &RequestContext<Order>) -> Result<(), ApiError> {
	order_lines(ctx).map(|_| ())
}

fn order_lines(ctx: &RequestContext<Order>) -> Result<Vec<OrderLine>, ApiError> {
	let dishes = match ctx.field("dishes") {
		Some(value) if is_truthy(value) => value,
		_ => return Err(ApiError::bad_request("Order must include a dish")),
	};
	let dishes = match dishes.as_array() {
		Some(dishes) if !dishes.is_empty() => dishes,
		_ => return Err(ApiError::bad_request("Order must include at least one dish")),
	};

	dishes
		.iter()
		.enumerate()
		.map(|(index, dish)| {
			order_line(dish).ok_or_else(|| {
				ApiError::bad_request(format!(
					"Dish {} must have a quantity that is an integer greater than 0",
					index
				))
			})
		})
		.collect()
}

/// Splits `quantity` off a submitted dish; the other fields are kept as-is.
fn order_line(dish: &Value) -> Option<OrderLine> {
	let mut fields: Map<String, Value> = dish.as_object()?.clone();
	let quantity = positive_integer(&fields.remove("quantity")?)?;
	Some(OrderLine {
		dish: fields,
		quantity,
	})
}

fn order_fields(ctx: &RequestContext<Order>, status: OrderStatus) -> Result<OrderFields, ApiError> {
	Ok(OrderFields {
		deliver_to: text_field(ctx, "deliverTo"),
		mobile_number: text_field(ctx, "mobileNumber"),
		status,
		dishes: order_lines(ctx)?,
	})
}

/// Handler for the orders collection.
pub struct OrderHandler {
	storage: Arc<StorageService>,
	next_id: IdGenerator,
}

impl OrderHandler {
	pub fn new(storage: Arc<StorageService>, next_id: IdGenerator) -> Self {
		Self { storage, next_id }
	}

	/// Returns every order in insertion order.
	pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
		let orders: Vec<Order> = self.storage.list(StorageKey::Orders).await?;
		debug!(count = orders.len(), "Listed orders");
		Ok(orders)
	}

	/// Returns the order with the given id.
	#[instrument(skip(self), fields(order_id = %truncate_id(id)))]
	pub async fn read(&self, id: &str) -> Result<Order, ApiError> {
		resolve(&self.storage, id).await
	}

	/// Validates the body and appends a new order.
	///
	/// The order starts as `pending` unless the body names a valid status.
	#[instrument(skip_all)]
	pub async fn create(&self, body: &Value) -> Result<Order, ApiError> {
		let ctx = RequestContext::from_body(body);
		run_chain(&ctx, CREATE_CHAIN)?;

		let status = initial_status(ctx.field("status"))?;
		let order = Order::new((self.next_id)(), order_fields(&ctx, status)?);
		self.storage
			.insert(StorageKey::Orders, &order.id, &order)
			.await?;

		info!(
			order_id = %order.id,
			status = %order.status,
			dishes = order.dishes.len(),
			"Order created"
		);
		Ok(order)
	}

	/// Validates the body and replaces every mutable field of the order.
	#[instrument(skip(self, body), fields(order_id = %truncate_id(id)))]
	pub async fn update(&self, id: &str, body: &Value) -> Result<Order, ApiError> {
		let order: Order = resolve(&self.storage, id).await?;
		let previous = order.status;
		let ctx = RequestContext::from_body(body).with_record(id, order);
		run_chain(&ctx, UPDATE_CHAIN)?;

		let fields = order_fields(&ctx, parse_status(ctx.field("status"))?)?;
		let Some(mut order) = ctx.record().cloned() else {
			return Err(Order::not_found(id));
		};
		order.replace_fields(fields);
		self.storage.update(StorageKey::Orders, id, &order).await?;

		if previous != order.status {
			info!(from = %previous, to = %order.status, "Order status changed");
		} else {
			info!("Order updated");
		}
		Ok(order)
	}

	/// Removes a pending order.
	#[instrument(skip(self), fields(order_id = %truncate_id(id)))]
	pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
		let order: Order = resolve(&self.storage, id).await?;
		ensure_deletable(&order)?;
		self.storage.remove(StorageKey::Orders, id).await?;

		info!("Order deleted");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grub_storage::implementations::memory::MemoryStorage;
	use serde_json::json;
	use std::sync::atomic::{AtomicU64, Ordering};

	fn handler() -> OrderHandler {
		let counter = Arc::new(AtomicU64::new(1));
		let next_id: IdGenerator =
			Arc::new(move || format!("order_{}", counter.fetch_add(1, Ordering::SeqCst)));
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		OrderHandler::new(storage, next_id)
	}

	fn body(status: Option<&str>) -> Value {
		let mut data = json!({
			"deliverTo": "1 Main St",
			"mobileNumber": "555-0100",
			"dishes": [{ "id": "d1", "name": "Taco", "price": 5, "quantity": 2 }]
		});
		if let Some(status) = status {
			data["status"] = json!(status);
		}
		json!({ "data": data })
	}

	fn with_field(mut body: Value, field: &str, value: Value) -> Value {
		body["data"][field] = value;
		body
	}

	async fn order_with_status(handler: &OrderHandler, status: &str) -> Order {
		let order = handler.create(&body(None)).await.unwrap();
		handler.update(&order.id, &body(Some(status))).await.unwrap()
	}

	#[tokio::test]
	async fn test_create_defaults_to_pending() {
		let handler = handler();
		let order = handler.create(&body(None)).await.unwrap();

		assert_eq!(order.id, "order_1");
		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.dishes.len(), 1);
		assert_eq!(order.dishes[0].quantity, 2);
		assert_eq!(order.dishes[0].dish.get("name"), Some(&json!("Taco")));
		assert!(!order.dishes[0].dish.contains_key("quantity"));
	}

	#[tokio::test]
	async fn test_create_keeps_valid_status_and_rejects_unknown() {
		let handler = handler();
		let order = handler.create(&body(Some("preparing"))).await.unwrap();
		assert_eq!(order.status, OrderStatus::Preparing);

		let err = handler.create(&body(Some("lost"))).await.unwrap_err();
		assert_eq!(
			err,
			ApiError::bad_request(
				"Order must have a status of pending, preparing, out-for-delivery, delivered"
			)
		);
		assert_eq!(handler.list().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_create_requires_contact_fields() {
		let handler = handler();
		let err = handler
			.create(&with_field(body(None), "deliverTo", json!("")))
			.await
			.unwrap_err();
		assert_eq!(err, ApiError::bad_request("Order must include a deliverTo"));

		let err = handler
			.create(&with_field(body(None), "mobileNumber", json!(null)))
			.await
			.unwrap_err();
		assert_eq!(err, ApiError::bad_request("Order must include a mobileNumber"));
	}

	#[tokio::test]
	async fn test_contact_fields_must_be_strings() {
		let handler = handler();
		let err = handler
			.create(&with_field(body(None), "deliverTo", json!({ "street": "1 Main" })))
			.await
			.unwrap_err();
		assert_eq!(err, ApiError::bad_request("Order deliverTo must be a string"));

		let err = handler
			.create(&with_field(body(None), "mobileNumber", json!(5550100)))
			.await
			.unwrap_err();
		assert_eq!(err, ApiError::bad_request("Order mobileNumber must be a string"));
		assert!(handler.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_dishes_validation() {
		let handler = handler();
		let cases = [
			(json!(null), "Order must include a dish"),
			(json!(0), "Order must include a dish"),
			(json!([]), "Order must include at least one dish"),
			(json!("taco"), "Order must include at least one dish"),
			(json!({ "quantity": 1 }), "Order must include at least one dish"),
			(
				json!([{ "quantity": 1 }, { "quantity": 0 }]),
				"Dish 1 must have a quantity that is an integer greater than 0",
			),
			(
				json!([{ "name": "Taco" }]),
				"Dish 0 must have a quantity that is an integer greater than 0",
			),
			(
				json!([{ "quantity": "2" }]),
				"Dish 0 must have a quantity that is an integer greater than 0",
			),
			(
				json!([{ "quantity": 1.5 }]),
				"Dish 0 must have a quantity that is an integer greater than 0",
			),
			(
				json!([7]),
				"Dish 0 must have a quantity that is an integer greater than 0",
			),
		];
		for (dishes, message) in cases {
			let err = handler
				.create(&with_field(body(None), "dishes", dishes.clone()))
				.await
				.unwrap_err();
			assert_eq!(err, ApiError::bad_request(message), "dishes {:?}", dishes);
		}
		assert!(handler.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_read_missing_order() {
		let err = handler().read("nope").await.unwrap_err();
		assert_eq!(err, ApiError::not_found("Order not found: nope"));
	}

	#[tokio::test]
	async fn test_update_requires_status() {
		let handler = handler();
		let order = handler.create(&body(None)).await.unwrap();

		let err = handler.update(&order.id, &body(None)).await.unwrap_err();
		assert_eq!(err, ApiError::bad_request("Order must have a status"));
	}

	#[tokio::test]
	async fn test_update_replaces_fields() {
		let handler = handler();
		let order = handler.create(&body(None)).await.unwrap();

		let update = with_field(
			with_field(body(Some("out-for-delivery")), "deliverTo", json!("2 Elm St")),
			"id",
			json!(order.id),
		);
		let updated = handler.update(&order.id, &update).await.unwrap();

		assert_eq!(updated.id, order.id);
		assert_eq!(updated.deliver_to, "2 Elm St");
		assert_eq!(updated.status, OrderStatus::OutForDelivery);
		assert_eq!(handler.read(&order.id).await.unwrap(), updated);
	}

	#[tokio::test]
	async fn test_update_id_mismatch() {
		let handler = handler();
		let order = handler.create(&body(None)).await.unwrap();

		let err = handler
			.update(&order.id, &with_field(body(Some("pending")), "id", json!("x")))
			.await
			.unwrap_err();
		assert_eq!(
			err,
			ApiError::bad_request("Order id does not match route id. Order: x, Route: order_1")
		);
	}

	#[tokio::test]
	async fn test_delivered_order_is_frozen() {
		let handler = handler();
		let order = order_with_status(&handler, "delivered").await;

		let err = handler
			.update(&order.id, &body(Some("pending")))
			.await
			.unwrap_err();
		assert_eq!(err, ApiError::bad_request("A delivered order cannot be changed"));
		assert_eq!(handler.read(&order.id).await.unwrap(), order);
	}

	#[tokio::test]
	async fn test_delete_only_pending() {
		let handler = handler();
		let pending = handler.create(&body(None)).await.unwrap();
		let preparing = order_with_status(&handler, "preparing").await;

		let err = handler.delete(&preparing.id).await.unwrap_err();
		assert_eq!(
			err,
			ApiError::bad_request("An order cannot be deleted unless it is pending")
		);

		handler.delete(&pending.id).await.unwrap();
		let err = handler.read(&pending.id).await.unwrap_err();
		assert_eq!(err, ApiError::not_found(format!("Order not found: {}", pending.id)));
		assert_eq!(handler.list().await.unwrap(), vec![preparing]);
	}

	#[tokio::test]
	async fn test_delete_missing_order() {
		let err = handler().delete("nope").await.unwrap_err();
		assert_eq!(err, ApiError::not_found("Order not found: nope"));
	}
}
