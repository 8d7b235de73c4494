//! Dish handler: list, read, create and update.
//!
//! Dishes are never deleted.

use crate::utils::{truncate_id, IdGenerator};
use crate::validation::{
	positive_integer, resolve, run_chain, text_field, RequestContext, Resource, Step,
};
use grub_storage::StorageService;
use grub_types::{ApiError, Dish, DishFields, StorageKey};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

impl Resource for Dish {
	const NAME: &'static str = "Dish";
	const KEY: StorageKey = StorageKey::Dishes;

	fn not_found(id: &str) -> ApiError {
		ApiError::not_found(format!("Dish does not exist: {}", id))
	}
}

const INVALID_PRICE: &str = "Dish must have a price that is an integer greater than 0";

/// Checks for creating a dish.
pub const CREATE_CHAIN: &[Step<Dish>] = &[
	Step::Require("name"),
	Step::Require("description"),
	Step::Check(price_is_valid),
	Step::Require("image_url"),
];

/// Checks for updating a dish; runs after the route id has resolved.
pub const UPDATE_CHAIN: &[Step<Dish>] = &[
	Step::MatchRouteId,
	Step::Require("name"),
	Step::Require("description"),
	Step::Check(price_is_valid),
	Step::Require("image_url"),
];

/// Price must be present, and a number that is an integer greater than zero.
///
/// An explicit `null` counts as present but invalid.
pub fn price_is_valid(ctx: &RequestContext<Dish>) -> Result<(), ApiError> {
	price(ctx).map(|_| ())
}

fn price(ctx: &RequestContext<Dish>) -> Result<u64, ApiError> {
	let value = ctx
		.field("price")
		.ok_or_else(|| ApiError::bad_request("Dish must include a price"))?;
	positive_integer(value).ok_or_else(|| ApiError::bad_request(INVALID_PRICE))
}

fn dish_fields(ctx: &RequestContext<Dish>) -> Result<DishFields, ApiError> {
	Ok(DishFields {
		name: text_field(ctx, "name"),
		description: text_field(ctx, "description"),
		price: price(ctx)?,
		image_url: text_field(ctx, "image_url"),
	})
}

/// Handler for the dishes collection.
pub struct DishHandler {
	storage: Arc<StorageService>,
	next_id: IdGenerator,
}

impl DishHandler {
	pub fn new(storage: Arc<StorageService>, next_id: IdGenerator) -> Self {
		Self { storage, next_id }
	}

	/// Returns every dish in insertion order.
	pub async fn list(&self) -> Result<Vec<Dish>, ApiError> {
		let dishes: Vec<Dish> = self.storage.list(StorageKey::Dishes).await?;
		debug!(count = dishes.len(), "Listed dishes");
		Ok(dishes)
	}

	/// Returns the dish with the given id.
	#[instrument(skip(self), fields(dish_id = %truncate_id(id)))]
	pub async fn read(&self, id: &str) -> Result<Dish, ApiError> {
		resolve(&self.storage, id).await
	}

	/// Validates the body and appends a new dish with a fresh id.
	#[instrument(skip_all)]
	pub async fn create(&self, body: &Value) -> Result<Dish, ApiError> {
		let ctx = RequestContext::from_body(body);
		run_chain(&ctx, CREATE_CHAIN)?;

		let dish = Dish::new((self.next_id)(), dish_fields(&ctx)?);
		self.storage
			.insert(StorageKey::Dishes, &dish.id, &dish)
			.await?;

		info!(dish_id = %dish.id, name = %dish.name, "Dish created");
		Ok(dish)
	}

	/// Validates the body and replaces every mutable field of the dish.
	#[instrument(skip(self, body), fields(dish_id = %truncate_id(id)))]
	pub async fn update(&self, id: &str, body: &Value) -> Result<Dish, ApiError> {
		let dish: Dish = resolve(&self.storage, id).await?;
		let ctx = RequestContext::from_body(body).with_record(id, dish);
		run_chain(&ctx, UPDATE_CHAIN)?;

		let fields = dish_fields(&ctx)?;
		let Some(mut dish) = ctx.record().cloned() else {
			return Err(Dish::not_found(id));
		};
		dish.replace_fields(fields);
		self.storage.update(StorageKey::Dishes, id, &dish).await?;

		info!("Dish updated");
		Ok(dish)
	}
}
