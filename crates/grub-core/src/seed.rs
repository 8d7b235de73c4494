//! Initial records loaded into the store at startup.
//!
//! The seed file is JSON with optional `dishes` and `orders` arrays holding
//! records in their wire shape. Records keep the ids they were given.

use crate::EngineError;
use grub_storage::StorageService;
use grub_types::{Dish, Order, StorageKey};
use serde::Deserialize;
use std::path::Path;

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
	#[serde(default)]
	pub dishes: Vec<Dish>,
	#[serde(default)]
	pub orders: Vec<Order>,
}

impl SeedData {
	/// Reads and validates a seed file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path)
			.await
			.map_err(|e| EngineError::Seed(format!("{}: {}", path.display(), e)))?;
		content.parse()
	}

	/// Applies the same rules the handlers enforce on submitted records.
	pub fn validate(&self) -> Result<(), EngineError> {
		for dish in &self.dishes {
			if dish.id.is_empty() {
				return Err(EngineError::Seed("dish with an empty id".into()));
			}
			if dish.price == 0 {
				return Err(EngineError::Seed(format!(
					"dish {} must have a price greater than 0",
					dish.id
				)));
			}
		}
		for order in &self.orders {
			if order.id.is_empty() {
				return Err(EngineError::Seed("order with an empty id".into()));
			}
			if order.dishes.is_empty() {
				return Err(EngineError::Seed(format!(
					"order {} must include at least one dish",
					order.id
				)));
			}
			if let Some(index) = order.dishes.iter().position(|line| line.quantity == 0) {
				return Err(EngineError::Seed(format!(
					"order {} dish {} must have a quantity greater than 0",
					order.id, index
				)));
			}
		}
		Ok(())
	}

	/// Inserts every record, in file order.
	pub async fn load_into(&self, storage: &StorageService) -> Result<(), EngineError> {
		for dish in &self.dishes {
			storage.insert(StorageKey::Dishes, &dish.id, dish).await?;
		}
		for order in &self.orders {
			storage.insert(StorageKey::Orders, &order.id, order).await?;
		}
		tracing::info!(
			dishes = self.dishes.len(),
			orders = self.orders.len(),
			"Loaded seed data"
		);
		Ok(())
	}
}

impl std::str::FromStr for SeedData {
	type Err = EngineError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let seed: SeedData =
			serde_json::from_str(s).map_err(|e| EngineError::Seed(e.to_string()))?;
		seed.validate()?;
		Ok(seed)
	}
}
