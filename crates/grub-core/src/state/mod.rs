//! Record lifecycle rules.

pub mod order;

pub use order::*;
