//! Address input processing.
//!
//! This module contains the pure address logic:
//! - [`classify`] - Classification of free-text input
//! - [`expand`] - Enumeration of IPv4 CIDRs and ranges
//! - [`policy`] - Assignability rules and containment in registered blocks
//! - [`overlap`] - Interval checks between IPv4 blocks

pub mod classify;
pub mod expand;
pub mod overlap;
pub mod policy;

// Re-export public functions
pub use classify::{
    canonical_address, classify, is_valid_input, is_valid_ipv4, is_valid_ipv4_cidr,
    is_valid_ipv4_range, is_valid_ipv6, is_valid_ipv6_cidr, is_valid_ipv6_range, parse_input,
};
pub use expand::{ip_to_long, long_to_ip, Expander, Expansion, DEFAULT_EXPANSION_CAP};
pub use overlap::{find_overlapping_blocks, Ipv4Span};
pub use policy::{
    check_assignable, find_covering_block, is_assignable, is_in_existing_ranges, is_ip_in_block,
    Rejection,
};
