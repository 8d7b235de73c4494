//! Storage module for the GrubDash service.
//!
//! This module provides the store abstraction the record services are built
//! on. Backends implement [`StorageInterface`], a namespaced and ordered
//! key-value store over raw bytes; [`StorageService`] layers typed JSON
//! operations on top so callers work with records directly.

use async_trait::async_trait;
use grub_types::{ApiError, ImplementationRegistry, StorageKey};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs when inserting an id that is already taken.
	#[error("Already exists: {0}")]
	AlreadyExists(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// A missing record surfaces as 404; every other storage fault is internal.
impl From<StorageError> for ApiError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound => ApiError::not_found("Not found"),
			other => ApiError::Internal(other.to_string()),
		}
	}
}

/// Trait defining the low-level interface for storage backends.
///
/// Each namespace is an ordered collection: `list_bytes` returns entries in
/// insertion order, and updates keep an entry's position.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves every value in a namespace, in insertion order.
	async fn list_bytes(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError>;

	/// Retrieves raw bytes for the given id.
	async fn get_bytes(&self, namespace: &str, id: &str) -> Result<Vec<u8>, StorageError>;

	/// Appends a new entry. Fails with `AlreadyExists` if the id is taken.
	async fn insert_bytes(
		&self,
		namespace: &str,
		id: &str,
		value: Vec<u8>,
	) -> Result<(), StorageError>;

	/// Replaces an existing entry in place. Fails with `NotFound` if absent.
	async fn update_bytes(
		&self,
		namespace: &str,
		id: &str,
		value: Vec<u8>,
	) -> Result<(), StorageError>;

	/// Removes an entry. Fails with `NotFound` if absent.
	async fn delete(&self, namespace: &str, id: &str) -> Result<(), StorageError>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}

/// Creates the backend registered under `name` from its configuration.
pub fn create_backend(
	name: &str,
	config: &toml::Value,
) -> Result<Box<dyn StorageInterface>, StorageError> {
	let factory = get_all_implementations()
		.into_iter()
		.find(|(registered, _)| *registered == name)
		.map(|(_, factory)| factory)
		.ok_or_else(|| {
			StorageError::Configuration(format!("Unknown storage implementation '{}'", name))
		})?;
	tracing::debug!(implementation = name, "Creating storage backend");
	factory(config)
}

/// High-level storage service that provides typed operations.
///
/// Records are serialized to JSON before they reach the backend, and each
/// collection lives under its own [`StorageKey`] namespace.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Retrieves every record of a collection, in insertion order.
	pub async fn list<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Vec<T>, StorageError> {
		self.backend
			.list_bytes(key.as_str())
			.await?
			.iter()
			.map(|bytes| {
				serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
			})
			.collect()
	}

	/// Retrieves and deserializes a record.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		key: StorageKey,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(key.as_str(), id).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Retrieves a record, mapping a missing id to `None`.
	pub async fn find<T: DeserializeOwned>(
		&self,
		key: StorageKey,
		id: &str,
	) -> Result<Option<T>, StorageError> {
		match self.retrieve(key, id).await {
			Ok(record) => Ok(Some(record)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Appends a new record to a collection.
	pub async fn insert<T: Serialize>(
		&self,
		key: StorageKey,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.insert_bytes(key.as_str(), id, bytes).await
	}

	/// Replaces an existing record in place.
	///
	/// Returns an error if the id doesn't exist, unlike `insert` which
	/// requires that it doesn't.
	pub async fn update<T: Serialize>(
		&self,
		key: StorageKey,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.update_bytes(key.as_str(), id, bytes).await
	}

	/// Removes a record from a collection.
	pub async fn remove(&self, key: StorageKey, id: &str) -> Result<(), StorageError> {
		self.backend.delete(key.as_str(), id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStorage;
	use serde::Deserialize;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Record {
		id: String,
		value: u32,
	}

	fn record(id: &str, value: u32) -> Record {
		Record {
			id: id.to_string(),
			value,
		}
	}

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_typed_round_trip() {
		let storage = service();
		storage
			.insert(StorageKey::Dishes, "a", &record("a", 1))
			.await
			.unwrap();

		let found: Record = storage.retrieve(StorageKey::Dishes, "a").await.unwrap();
		assert_eq!(found, record("a", 1));

		storage
			.update(StorageKey::Dishes, "a", &record("a", 2))
			.await
			.unwrap();
		let found: Option<Record> = storage.find(StorageKey::Dishes, "a").await.unwrap();
		assert_eq!(found, Some(record("a", 2)));
	}

	#[tokio::test]
	async fn test_list_keeps_insertion_order() {
		let storage = service();
		for (id, value) in [("z", 1), ("a", 2), ("m", 3)] {
			storage
				.insert(StorageKey::Orders, id, &record(id, value))
				.await
				.unwrap();
		}
		storage
			.update(StorageKey::Orders, "a", &record("a", 20))
			.await
			.unwrap();

		let all: Vec<Record> = storage.list(StorageKey::Orders).await.unwrap();
		let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, vec!["z", "a", "m"]);
		assert_eq!(all[1].value, 20);
	}

	#[tokio::test]
	async fn test_namespaces_are_isolated() {
		let storage = service();
		storage
			.insert(StorageKey::Dishes, "same", &record("same", 1))
			.await
			.unwrap();

		let found: Option<Record> = storage.find(StorageKey::Dishes, "same").await.unwrap();
		assert!(found.is_some());
		let missing: Option<Record> = storage.find(StorageKey::Orders, "same").await.unwrap();
		assert!(missing.is_none());
	}

	#[tokio::test]
	async fn test_update_and_remove_missing_fail() {
		let storage = service();
		let result = storage
			.update(StorageKey::Dishes, "nope", &record("nope", 1))
			.await;
		assert!(matches!(result, Err(StorageError::NotFound)));

		let result = storage.remove(StorageKey::Dishes, "nope").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[test]
	fn test_storage_error_to_api_error() {
		assert!(matches!(ApiError::from(StorageError::NotFound), ApiError::NotFound(_)));
		assert!(matches!(
			ApiError::from(StorageError::Backend("disk".into())),
			ApiError::Internal(_)
		));
	}

	#[test]
	fn test_create_backend_by_name() {
		let config = toml::Value::Table(toml::map::Map::new());
		assert!(create_backend("memory", &config).is_ok());

		let result = create_backend("redis", &config);
		assert!(matches!(result, Err(StorageError::Configuration(_))));
	}
}
