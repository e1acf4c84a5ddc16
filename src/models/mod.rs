//! Domain models for the address registry.
//!
//! This module contains the core data structures used throughout the application:
//! - [`AddressKind`] and [`AddressFamily`] - Classification of address input
//! - [`Ipv4Cidr`] and [`Ipv4Range`] - IPv4 block notation
//! - [`AddressRecord`], [`RecordView`] and [`Student`] - Registry records

mod ipv4;
mod kind;
mod record;

// Re-export public types
pub use ipv4::{
    broadcast_addr, cut_addr, get_cidr_mask, num_hosts, Ipv4Cidr, Ipv4Range, MAX_LENGTH,
};
pub use kind::{AddressFamily, AddressKind};
pub use record::{AddressRecord, RecordState, RecordView, Student};
