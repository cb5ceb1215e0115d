//! Console reporting.
//!
//! Text rendering of the exploration tables and the key insight sentences.

pub mod console;
pub mod insights;

pub use console::*;
pub use insights::key_insights;
