//! Record persistence.
//!
//! - [`memory`] - The [`RecordStore`] trait and [`MemoryStore`]
//! - [`file`] - JSON file load/save of a [`MemoryStore`]

mod file;
mod memory;

// Re-export public types and functions
pub use file::{load_store, save_store};
pub use memory::{MemoryStore, RecordStore};
