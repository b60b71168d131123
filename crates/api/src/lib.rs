//! HTTP API layer for kidvid.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: One router module per resource
//! - **Response**: The `{code, message, data}` envelope and page wrapper
//! - **State**: Shared service handles
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
