//! Dish records.

use serde::{Deserialize, Serialize};

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
	/// Unique identifier, immutable after creation.
	pub id: String,
	pub name: String,
	pub description: String,
	/// Price in whole currency units, always greater than zero.
	///
	/// Bounded by `u64`: submitted prices of 2^64 or more are rejected.
	pub price: u64,
	pub image_url: String,
}

/// Mutable fields of a dish, as submitted on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct DishFields {
	pub name: String,
	pub description: String,
	pub price: u64,
	pub image_url: String,
}

impl Dish {
	pub fn new(id: impl Into<String>, fields: DishFields) -> Self {
		Self {
			id: id.into(),
			name: fields.name,
			description: fields.description,
			price: fields.price,
			image_url: fields.image_url,
		}
	}

	/// Overwrites every mutable field; the id is kept.
	pub fn replace_fields(&mut self, fields: DishFields) {
		self.name = fields.name;
		self.description = fields.description;
		self.price = fields.price;
		self.image_url = fields.image_url;
	}
}
