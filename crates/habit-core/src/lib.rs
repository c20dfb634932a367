//! Core types, the store trait, and the statistics engine for the habit
//! tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The statistics engine in [`stats`] is pure: every function takes `today`
//! as a parameter instead of reading a clock.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod completion;
pub mod error;
pub mod habit;
pub mod stats;
pub mod store;
pub mod user;

pub use error::{Error, Result};
