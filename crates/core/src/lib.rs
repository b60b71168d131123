//! Business logic layer for kidvid.

pub mod services;

pub use services::*;
