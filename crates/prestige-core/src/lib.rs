//! Core types and trait definitions for Prestige business cards.
//!
//! This crate is deliberately free of HTTP, database and async-runtime
//! dependencies. Storage backends, generation backends and the workflow all
//! depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod color;
pub mod error;
pub mod memory;
pub mod model;
pub mod presets;
pub mod proposal;
pub mod render;
pub mod store;

pub use error::{Error, Result};
