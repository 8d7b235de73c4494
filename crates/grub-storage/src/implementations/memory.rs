//! In-memory storage backend implementation.
//!
//! Records live for the lifetime of the process. Each namespace is a vector of
//! `(id, bytes)` pairs so listing preserves insertion order.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use grub_types::ImplementationRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection = Vec<(String, Vec<u8>)>;

/// In-memory storage implementation.
pub struct MemoryStorage {
	/// Namespaced collections protected by a read-write lock.
	store: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStorage {
	/// Creates a new MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			store: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

fn position(collection: &Collection, id: &str) -> Option<usize> {
	collection.iter().position(|(entry_id, _)| entry_id == id)
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn list_bytes(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let store = self.store.read().await;
		Ok(store
			.get(namespace)
			.map(|collection| collection.iter().map(|(_, bytes)| bytes.clone()).collect())
			.unwrap_or_default())
	}

	async fn get_bytes(&self, namespace: &str, id: &str) -> Result<Vec<u8>, StorageError> {
		let store = self.store.read().await;
		store
			.get(namespace)
			.and_then(|collection| {
				collection
					.iter()
					.find(|(entry_id, _)| entry_id == id)
					.map(|(_, bytes)| bytes.clone())
			})
			.ok_or(StorageError::NotFound)
	}

	async fn insert_bytes(
		&self,
		namespace: &str,
		id: &str,
		value: Vec<u8>,
	) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		let collection = store.entry(namespace.to_string()).or_default();
		if position(collection, id).is_some() {
			return Err(StorageError::AlreadyExists(id.to_string()));
		}
		collection.push((id.to_string(), value));
		Ok(())
	}

	async fn update_bytes(
		&self,
		namespace: &str,
		id: &str,
		value: Vec<u8>,
	) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		let collection = store.get_mut(namespace).ok_or(StorageError::NotFound)?;
		let index = position(collection, id).ok_or(StorageError::NotFound)?;
		collection[index].1 = value;
		Ok(())
	}

	async fn delete(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		let collection = store.get_mut(namespace).ok_or(StorageError::NotFound)?;
		let index = position(collection, id).ok_or(StorageError::NotFound)?;
		collection.remove(index);
		Ok(())
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None; any table is accepted
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	if !config.is_table() {
		return Err(StorageError::Configuration(format!(
			"memory storage expects a table, got {}",
			config.type_str()
		)));
	}
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
