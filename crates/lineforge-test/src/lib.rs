//! Shared test fixtures for LineForge crates.
//!
//! This crate provides deterministic player pools for testing. Salaries and
//! scores are derived from fixed tables, never from a random source, so every
//! test sees the same pool on every run.
//!
//! - [`player`] - single-player constructor and a small pool builder
//! - [`showdown`] - single-game pools, including infeasible and scarce ones
//! - [`main_slate`] - multi-team pools for the classic roster
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! lineforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use lineforge_test::showdown::{showdown_pool, scarce_showdown_pool};
//! use lineforge_test::main_slate::main_slate_pool;
//! ```

pub mod main_slate;
pub mod player;
pub mod showdown;

pub use main_slate::main_slate_pool;
pub use player::{player, PoolBuilder};
pub use showdown::{expensive_showdown_pool, scarce_showdown_pool, showdown_pool};
