//! Request handlers for the two record collections.
//!
//! Each handler resolves the targeted record, runs its validation chain and
//! only then touches the store.

pub mod dish;
pub mod order;

pub use dish::DishHandler;
pub use order::OrderHandler;
