//! Core engine for the GrubDash service.
//!
//! The engine owns the record store and the two collection handlers. Every
//! request runs its validation chain against the store before anything is
//! written, so a rejected request leaves the collections untouched.

use grub_config::Config;
use grub_storage::{StorageError, StorageService};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

pub mod handlers;
pub mod seed;
pub mod state;
pub mod utils;
pub mod validation;

use handlers::{DishHandler, OrderHandler};
use seed::SeedData;
use utils::{default_id_generator, IdGenerator};

/// Errors that can occur while building the engine.
#[derive(Debug, Error)]
pub enum EngineError {
	/// Error related to configuration issues.
	#[error("Configuration error: {0}")]
	Config(String),
	/// Error from the storage backend.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
	/// Error reading or validating seed data.
	#[error("Seed error: {0}")]
	Seed(String),
}

/// The dishes and orders collections over one shared store.
pub struct GrubEngine {
	/// Storage service shared by both handlers.
	storage: Arc<StorageService>,
	dishes: DishHandler,
	orders: OrderHandler,
}

impl GrubEngine {
	/// Creates an engine over the given store with random ids.
	pub fn new(storage: StorageService) -> Self {
		Self::with_id_generator(storage, default_id_generator())
	}

	/// Creates an engine that takes new record ids from `next_id`.
	pub fn with_id_generator(storage: StorageService, next_id: IdGenerator) -> Self {
		let storage = Arc::new(storage);
		Self {
			dishes: DishHandler::new(storage.clone(), next_id.clone()),
			orders: OrderHandler::new(storage.clone(), next_id),
			storage,
		}
	}

	/// Builds the configured backend and loads the seed file, if any.
	#[instrument(skip_all, fields(service_id = %config.service.id))]
	pub async fn from_config(config: &Config) -> Result<Self, EngineError> {
		let backend_config = config.storage.primary_config().ok_or_else(|| {
			EngineError::Config(format!(
				"Primary storage '{}' is not configured",
				config.storage.primary
			))
		})?;
		let backend = grub_storage::create_backend(&config.storage.primary, backend_config)?;
		let engine = Self::new(StorageService::new(backend));

		if let Some(seed) = &config.seed {
			SeedData::from_file(&seed.path)
				.await?
				.load_into(&engine.storage)
				.await?;
		}

		tracing::info!(storage = %config.storage.primary, "Engine ready");
		Ok(engine)
	}

	pub fn dishes(&self) -> &DishHandler {
		&self.dishes
	}

	pub fn orders(&self) -> &OrderHandler {
		&self.orders
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grub_config::SeedConfig;
	use serde_json::json;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[tokio::test]
	async fn test_from_default_config() {
		let engine = GrubEngine::from_config(&Config::default()).await.unwrap();
		assert!(engine.dishes().list().await.unwrap().is_empty());
		assert!(engine.orders().list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_from_config_loads_seed() {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(
			br#"{ "dishes": [
				{ "id": "d1", "name": "Taco", "description": "x", "price": 5, "image_url": "x" }
			] }"#,
		)
		.unwrap();

		let mut config = Config::default();
		config.seed = Some(SeedConfig {
			path: file.path().to_path_buf(),
		});
		let engine = GrubEngine::from_config(&config).await.unwrap();

		let dish = engine.dishes().read("d1").await.unwrap();
		assert_eq!(dish.name, "Taco");
	}

	#[tokio::test]
	async fn test_unconfigured_primary_storage() {
		let mut config = Config::default();
		config.storage.primary = "redis".into();
		let result = GrubEngine::from_config(&config).await;
		assert!(matches!(result, Err(EngineError::Config(_))));
	}

	#[tokio::test]
	async fn test_handlers_share_one_store() {
		let engine = GrubEngine::new(StorageService::new(Box::new(
			grub_storage::implementations::memory::MemoryStorage::new(),
		)));
		let dish = engine
			.dishes()
			.create(&json!({ "data": {
				"name": "Taco", "description": "x", "price": 3, "image_url": "x"
			}}))
			.await
			.unwrap();

		let stored: Option<grub_types::Dish> = engine
			.storage
			.find(grub_types::StorageKey::Dishes, &dish.id)
			.await
			.unwrap();
		assert_eq!(stored, Some(dish));
	}
}
