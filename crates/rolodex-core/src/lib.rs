//! Core types and decision logic for the Rolodex contact directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actions;
pub mod contact;
pub mod error;
pub mod policy;
pub mod query;
pub mod store;
pub mod validate;

pub use actions::Directory;
pub use error::ActionError;
