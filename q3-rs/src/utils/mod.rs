//! Shared utilities for the q3-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
