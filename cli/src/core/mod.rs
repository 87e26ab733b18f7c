//! # shvar Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the core components of shvar:
//! - `expand`: The variable expansion engine
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `templating`: Rendering of whole template directories through the engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, ShvarError}; // For error handling
//! use crate::core::expand::{self, ExpandOptions}; // The engine itself
//! ```
//!
pub mod config;
pub mod error;
pub mod expand;
pub mod templating;
