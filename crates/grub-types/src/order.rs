//! Order records and the order status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier, immutable after creation.
	pub id: String,
	/// Delivery address.
	#[serde(rename = "deliverTo")]
	pub deliver_to: String,
	/// Contact number for the delivery.
	#[serde(rename = "mobileNumber")]
	pub mobile_number: String,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Ordered dishes; never empty.
	pub dishes: Vec<OrderLine>,
}

/// One dish within an order.
///
/// Only `quantity` is interpreted; every other field submitted for the dish
/// (id, name, price, ...) is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
	#[serde(flatten)]
	pub dish: serde_json::Map<String, serde_json::Value>,
	/// Number of portions, always greater than zero and below 2^64.
	pub quantity: u64,
}

/// Mutable fields of an order, as submitted on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFields {
	pub deliver_to: String,
	pub mobile_number: String,
	pub status: OrderStatus,
	pub dishes: Vec<OrderLine>,
}

impl Order {
	pub fn new(id: impl Into<String>, fields: OrderFields) -> Self {
		Self {
			id: id.into(),
			deliver_to: fields.deliver_to,
			mobile_number: fields.mobile_number,
			status: fields.status,
			dishes: fields.dishes,
		}
	}

	/// Overwrites every mutable field; the id is kept.
	pub fn replace_fields(&mut self, fields: OrderFields) {
		self.deliver_to = fields.deliver_to;
		self.mobile_number = fields.mobile_number;
		self.status = fields.status;
		self.dishes = fields.dishes;
	}
}

/// Status of an order.
///
/// The lifecycle reads `pending -> preparing -> out-for-delivery -> delivered`,
/// but only `delivered` is enforced: it is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
	#[default]
	Pending,
	Preparing,
	OutForDelivery,
	Delivered,
}

/// Error returned when parsing an unrecognized status string.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
	/// Every status, in lifecycle order.
	pub const ALL: [OrderStatus; 4] = [
		OrderStatus::Pending,
		OrderStatus::Preparing,
		OrderStatus::OutForDelivery,
		OrderStatus::Delivered,
	];

	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Preparing => "preparing",
			OrderStatus::OutForDelivery => "out-for-delivery",
			OrderStatus::Delivered => "delivered",
		}
	}

	/// A terminal order accepts no further changes.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Delivered)
	}

	/// Only pending orders may be deleted.
	pub fn is_deletable(&self) -> bool {
		matches!(self, OrderStatus::Pending)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = UnknownStatus;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		OrderStatus::ALL
			.into_iter()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| UnknownStatus(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_status_round_trips_through_str() {
		for status in OrderStatus::ALL {
			assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
		}
		assert!("shipped".parse::<OrderStatus>().is_err());
		assert!("Pending".parse::<OrderStatus>().is_err());
	}

	#[test]
	fn test_status_serde_matches_as_str() {
		let value = serde_json::to_value(OrderStatus::OutForDelivery).unwrap();
		assert_eq!(value, json!("out-for-delivery"));
	}

	#[test]
	fn test_terminal_and_deletable() {
		assert!(OrderStatus::Delivered.is_terminal());
		assert!(!OrderStatus::OutForDelivery.is_terminal());
		assert!(OrderStatus::Pending.is_deletable());
		assert!(!OrderStatus::Preparing.is_deletable());
	}

	#[test]
	fn test_order_line_keeps_extra_fields() {
		let line: OrderLine =
			serde_json::from_value(json!({ "id": "d1", "name": "Taco", "quantity": 2 })).unwrap();
		assert_eq!(line.quantity, 2);
		assert_eq!(line.dish["name"], "Taco");

		let back = serde_json::to_value(&line).unwrap();
		assert_eq!(back, json!({ "id": "d1", "name": "Taco", "quantity": 2 }));
	}

	#[test]
	fn test_order_wire_field_names() {
		let order = Order::new(
			"o1",
			OrderFields {
				deliver_to: "1 Main St".into(),
				mobile_number: "555".into(),
				status: OrderStatus::default(),
				dishes: vec![],
			},
		);
		let value = serde_json::to_value(&order).unwrap();
		assert_eq!(value["deliverTo"], "1 Main St");
		assert_eq!(value["mobileNumber"], "555");
		assert_eq!(value["status"], "pending");
	}
}
