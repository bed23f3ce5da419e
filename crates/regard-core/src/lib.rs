//! regard-core library.
//!
//! Aggregates engagement notifications into per-user records, classifies and
//! ranks them, binds thank-you comments, and merges the result into a
//! JSON-backed store with a retention window.

pub mod aggregate;
pub mod classify;
pub mod comment;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod store;
