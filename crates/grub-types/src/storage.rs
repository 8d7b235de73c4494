//! Storage-related types for the GrubDash service.

/// Storage keys for the record collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Key for the dishes collection
	Dishes,
	/// Key for the orders collection
	Orders,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Dishes => "dishes",
			StorageKey::Orders => "orders",
		}
	}
}
