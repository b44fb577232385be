//! Core types and utilities for the triangular arbitrage scanner
//!
//! This crate provides shared types used across all components:
//! - Currency, pair and pair catalog definitions
//! - Order book snapshots
//! - Directional rates and cycle evaluations
//! - Configuration and error types

pub mod types;
pub mod pairs;
pub mod books;
pub mod quotes;
pub mod opportunities;
pub mod config;
pub mod errors;

pub use types::*;
pub use pairs::*;
pub use books::*;
pub use quotes::*;
pub use opportunities::*;
pub use config::*;
pub use errors::*;
