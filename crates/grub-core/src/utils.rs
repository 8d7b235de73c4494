//! Small helpers shared by the handlers.

use std::sync::Arc;
use uuid::Uuid;

/// Produces ids for new records. Must never repeat within a process.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Generates a random 32-character hex id.
pub fn new_id() -> String {
	Uuid::new_v4().simple().to_string()
}

/// The default generator, backed by [`new_id`].
pub fn default_id_generator() -> IdGenerator {
	Arc::new(new_id)
}

/// Truncates an id for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((end, _)) => format!("{}..", &id[..end]),
		None => id.to_string(),
	}
}
