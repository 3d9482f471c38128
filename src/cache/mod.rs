//! Cache Module
//!
//! The entity cache engine and the capability trait entities implement.

mod cachable;
mod engine;


// Re-export public types
pub use cachable::Cachable;
pub use engine::Cache;
