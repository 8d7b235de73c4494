//! HTTP surface of the GrubDash service.
//!
//! Exposes the router so it can be driven in-process as well as served by
//! the `grubdash` binary.

pub mod apis;
pub mod server;

pub use server::{build_router, start_server, AppState};
