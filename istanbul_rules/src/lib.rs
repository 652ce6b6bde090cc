//! # Istanbul Rules
//!
//! Content definitions and pure rules for Still Here Istanbul characters:
//! stat blocks and their derived values, item and ability definitions, slot
//! compatibility, and the catalogs and configuration they are loaded from.
//! Nothing in this crate holds per-character mutable state.

pub mod catalog;
pub mod config;
pub mod entities;
pub mod mechanics;

pub use catalog::*;
pub use config::*;
pub use entities::*;
pub use mechanics::*;
