//! Shared types between the dashboard frontend (wasm) and the backend.
//!
//! Everything here must compile for both targets: no I/O, no async.

pub mod domain;
pub mod shared;
