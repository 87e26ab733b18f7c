//! # shvar Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared collaborators of the expansion engine, used by the command handlers
//! in `commands::` and by `core::templating`.
//!
//! - **`pathlist`**: Split, join, add to and remove from `PATH`-style variables.
//! - **`platform`**: Host platform detection (default syntax, path-list rules).
//! - **`store`**: The `VarStore` key/value contract with in-memory and
//!   process-environment implementations, and the `StoreScope` adapter that
//!   hands a store to the engine.
//!

/// Helpers for `PATH`-style list variables.
pub mod pathlist;
/// Host platform detection.
pub mod platform;
/// Variable stores and their adapter to the expansion engine.
pub mod store;
