//! Request validation chain.
//!
//! A request is checked by an ordered slice of [`Step`]s over a
//! [`RequestContext`]. Steps are plain functions: the first failing step
//! short-circuits the chain and its error becomes the response, so nothing is
//! written to the store unless every step passes.

use grub_storage::StorageService;
use grub_types::{ApiError, StorageKey};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// A record type managed by one collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
	/// Name used in error messages, e.g. "Dish".
	const NAME: &'static str;
	/// Collection holding the records.
	const KEY: StorageKey;

	/// Error reported when `id` does not resolve to a record.
	fn not_found(id: &str) -> ApiError;
}

/// Everything a validation step may look at for one request.
///
/// Holds the route id, the `data` object of the body and, once resolved, the
/// stored record the request targets.
#[derive(Debug, Clone)]
pub struct RequestContext<T> {
	route_id: Option<String>,
	data: Map<String, Value>,
	record: Option<T>,
}

impl<T> RequestContext<T> {
	/// Builds a context from a request body.
	///
	/// A missing body, a missing `data` key or a non-object `data` all
	/// behave as an empty object.
	pub fn from_body(body: &Value) -> Self {
		let data = body
			.get("data")
			.and_then(Value::as_object)
			.cloned()
			.unwrap_or_default();
		Self {
			route_id: None,
			data,
			record: None,
		}
	}

	/// Attaches the record the route id resolved to.
	pub fn with_record(mut self, route_id: impl Into<String>, record: T) -> Self {
		self.route_id = Some(route_id.into());
		self.record = Some(record);
		self
	}

	pub fn route_id(&self) -> Option<&str> {
		self.route_id.as_deref()
	}

	/// Returns a field of the body's `data` object.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.data.get(name)
	}

	/// Returns the resolved record, if any.
	pub fn record(&self) -> Option<&T> {
		self.record.as_ref()
	}
}

/// Signature of a custom validation step.
pub type Validator<T> = fn(&RequestContext<T>) -> Result<(), ApiError>;

/// One link of a validation chain.
#[derive(Clone, Copy)]
pub enum Step<T> {
	/// The named `data` field must be a non-empty string.
	Require(&'static str),
	/// A non-empty `data.id` must equal the route id.
	MatchRouteId,
	/// Any other check.
	Check(Validator<T>),
}

impl<T: Resource> Step<T> {
	fn apply(&self, ctx: &RequestContext<T>) -> Result<(), ApiError> {
		match self {
			Step::Require(field) => require_field(ctx, field),
			Step::MatchRouteId => id_matches_route(ctx),
			Step::Check(validator) => validator(ctx),
		}
	}
}

/// Runs every step in order and stops at the first failure.
pub fn run_chain<T: Resource>(ctx: &RequestContext<T>, chain: &[Step<T>]) -> Result<(), ApiError> {
	chain.iter().try_for_each(|step| step.apply(ctx))
}

/// Fails with "<Entity> must include a <field>" when the field is falsy, and
/// with "<Entity> <field> must be a string" for any other non-string value.
pub fn require_field<T: Resource>(ctx: &RequestContext<T>, field: &str) -> Result<(), ApiError> {
	match ctx.field(field) {
		Some(Value::String(s)) if !s.is_empty() => Ok(()),
		Some(value) if is_truthy(value) => Err(ApiError::bad_request(format!(
			"{} {} must be a string",
			T::NAME,
			field
		))),
		_ => Err(ApiError::bad_request(format!(
			"{} must include a {}",
			T::NAME,
			field
		))),
	}
}

/// Fails when the body names a different record than the route.
///
/// An absent or falsy `data.id` passes, so clients may omit it. A non-string
/// id never equals the route id.
pub fn id_matches_route<T: Resource>(ctx: &RequestContext<T>) -> Result<(), ApiError> {
	let Some(route_id) = ctx.route_id() else {
		return Ok(());
	};
	match ctx.field("id") {
		Some(id) if is_truthy(id) && id.as_str() != Some(route_id) => {
			Err(ApiError::bad_request(format!(
				"{name} id does not match route id. {name}: {}, Route: {}",
				text_value(id),
				route_id,
				name = T::NAME,
			)))
		},
		_ => Ok(()),
	}
}

/// Looks a record up by exact id, failing with the resource's not-found error.
pub async fn resolve<T: Resource>(storage: &StorageService, id: &str) -> Result<T, ApiError> {
	storage
		.find::<T>(T::KEY, id)
		.await?
		.ok_or_else(|| T::not_found(id))
}

/// JSON truthiness: null, false, 0 and "" are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Returns the value as an integer greater than zero.
///
/// Accepts integral floats such as `5.0`; rejects strings, fractions,
/// non-positive numbers and anything beyond `u64`.
pub fn positive_integer(value: &Value) -> Option<u64> {
	let Value::Number(number) = value else {
		return None;
	};
	if let Some(n) = number.as_u64() {
		return (n > 0).then_some(n);
	}
	if number.is_i64() {
		return None;
	}
	let f = number.as_f64()?;
	// 2^64 is exactly representable; anything at or above it overflows u64
	if f.is_finite() && f.fract() == 0.0 && f > 0.0 && f < 18_446_744_073_709_551_616.0 {
		Some(f as u64)
	} else {
		None
	}
}

/// Renders a field as text: strings verbatim, anything else as JSON.
pub fn text_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Returns a string field, empty when absent or not a string.
///
/// Only read after `Require` has passed for the same field.
pub fn text_field<T>(ctx: &RequestContext<T>, name: &str) -> String {
	ctx.field(name)
		.and_then(Value::as_str)
		.map(str::to_owned)
		.unwrap_or_default()
}
