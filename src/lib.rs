//! Registry of IP addresses, CIDR blocks and ranges handed out to students.
//!
//! - [`processing`] - classify, expand, policy and overlap logic
//! - [`registry`] - record management on top of a [`store::RecordStore`]
//! - [`cli`] - command parsing and dispatch used by the binary

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod registry;
pub mod store;

pub use config::Config;
pub use error::{RegistryError, Result};
pub use models::{AddressFamily, AddressKind, AddressRecord, RecordView, Student};
pub use processing::{classify, is_assignable, Expander, Expansion};
pub use registry::{AddressRegistry, ValidationReport};
pub use store::{load_store, save_store, MemoryStore, RecordStore};
