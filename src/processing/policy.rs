//! Assignability rules and containment checks against registered blocks.
//!
//! The literal tables below decide which real-world addresses are rejected.
//! The `.0`/`.255` boundary check is a suffix heuristic, not a mask-aware
//! computation; it rejects these suffixes regardless of the actual subnet.

use super::classify::classify;
use crate::models::{AddressKind, Ipv4Cidr, Ipv4Range};
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const RESERVED_IPV4: [&str; 6] = [
    "0.0.0.0",
    "127.0.0.0",
    "169.254.0.0",
    "224.0.0.0",
    "240.0.0.0",
    "255.255.255.255",
];
pub const PRIVATE_IPV4_BLOCKS: [&str; 3] = ["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"];
pub const PRIVATE_BOUNDARY_SUFFIXES: [&str; 2] = [".0", ".255"];
pub const SUBNET_BOUNDARY_SUFFIXES: [&str; 4] = [".0", ".255", ".0.0", ".255.255"];
pub const LOOPBACK_IPV4_PREFIX: &str = "127.";
pub const LINK_LOCAL_IPV4_PREFIX: &str = "169.254.";
pub const MULTICAST_IPV4_FIRST_OCTETS: RangeInclusive<u8> = 224..=239;
pub const RESERVED_IPV4_FIRST_OCTETS: RangeInclusive<u8> = 240..=255;

pub const RESERVED_IPV6: [&str; 2] = ["::", "::1"];
pub const LINK_LOCAL_IPV6_PREFIX: &str = "fe80:";
pub const MULTICAST_IPV6_PREFIX: &str = "ff";
pub const UNIQUE_LOCAL_IPV6_PREFIXES: [&str; 2] = ["fc", "fd"];
pub const DOCUMENTATION_IPV6_PREFIX: &str = "2001:db8:";

/// Why an address may not be handed out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("reserved address")]
    Reserved,
    #[error("loopback address")]
    Loopback,
    #[error("link-local address")]
    LinkLocal,
    #[error("multicast address")]
    Multicast,
    #[error("reserved address space")]
    ReservedSpace,
    #[error("network or broadcast address of a private block")]
    PrivateBoundary,
    #[error("subnet boundary address")]
    SubnetBoundary,
    #[error("unique-local address")]
    UniqueLocal,
    #[error("documentation address")]
    Documentation,
    #[error("not a single address")]
    NotSingle,
}

/// True when the address is a single unicast address that may be assigned to a student.
pub fn is_assignable(address: &str) -> bool {
    check_assignable(address).is_ok()
}

/// Same verdict as [`is_assignable`], with the reason for a rejection.
pub fn check_assignable(address: &str) -> Result<(), Rejection> {
    let address = address.trim();
    let verdict = match classify(address) {
        AddressKind::SingleV4 => check_ipv4(address),
        AddressKind::SingleV6 => check_ipv6(address),
        _ => Err(Rejection::NotSingle),
    };
    if let Err(reason) = verdict {
        log::debug!("{address} not assignable: {reason}");
    }
    verdict
}

fn check_ipv4(ip: &str) -> Result<(), Rejection> {
    let addr: Ipv4Addr = ip.parse().map_err(|_| Rejection::NotSingle)?;
    let first_octet = addr.octets()[0];

    if RESERVED_IPV4.contains(&ip) {
        return Err(Rejection::Reserved);
    }
    if ip.starts_with(LOOPBACK_IPV4_PREFIX) {
        return Err(Rejection::Loopback);
    }
    if ip.starts_with(LINK_LOCAL_IPV4_PREFIX) {
        return Err(Rejection::LinkLocal);
    }
    if MULTICAST_IPV4_FIRST_OCTETS.contains(&first_octet) {
        return Err(Rejection::Multicast);
    }
    if RESERVED_IPV4_FIRST_OCTETS.contains(&first_octet) {
        return Err(Rejection::ReservedSpace);
    }
    let in_private_block = PRIVATE_IPV4_BLOCKS
        .iter()
        .filter_map(|block| Ipv4Cidr::new(block).ok())
        .any(|block| block.contains(addr));
    if in_private_block && PRIVATE_BOUNDARY_SUFFIXES.iter().any(|s| ip.ends_with(s)) {
        return Err(Rejection::PrivateBoundary);
    }
    if SUBNET_BOUNDARY_SUFFIXES.iter().any(|s| ip.ends_with(s)) {
        return Err(Rejection::SubnetBoundary);
    }
    Ok(())
}

fn check_ipv6(ip: &str) -> Result<(), Rejection> {
    let ip = ip.to_lowercase();
    if RESERVED_IPV6.contains(&ip.as_str()) {
        return Err(Rejection::Reserved);
    }
    if ip.starts_with(LINK_LOCAL_IPV6_PREFIX) {
        return Err(Rejection::LinkLocal);
    }
    if ip.starts_with(MULTICAST_IPV6_PREFIX) {
        return Err(Rejection::Multicast);
    }
    if UNIQUE_LOCAL_IPV6_PREFIXES.iter().any(|p| ip.starts_with(p)) {
        return Err(Rejection::UniqueLocal);
    }
    if ip.starts_with(DOCUMENTATION_IPV6_PREFIX) {
        return Err(Rejection::Documentation);
    }
    Ok(())
}

/// True when a single address falls inside any of the registered CIDRs or ranges.
pub fn is_in_existing_ranges<S: AsRef<str>>(address: &str, existing: &[S]) -> bool {
    find_covering_block(address, existing).is_some()
}

/// First registered CIDR or range containing the address.
pub fn find_covering_block<'a, S: AsRef<str>>(address: &str, existing: &'a [S]) -> Option<&'a str> {
    existing
        .iter()
        .map(|block| block.as_ref())
        .find(|block| is_ip_in_block(address, block))
}

/// Containment of a single address in one CIDR or range.
///
/// IPv4 uses mask and bound arithmetic. IPv6 falls back to a case-insensitive
/// prefix match for CIDRs and an endpoint match for ranges.
pub fn is_ip_in_block(address: &str, block: &str) -> bool {
    let address = address.trim();
    let block = block.trim();
    match (classify(address), classify(block)) {
        (AddressKind::SingleV4, AddressKind::CidrV4) => {
            match (address.parse::<Ipv4Addr>(), Ipv4Cidr::new(block)) {
                (Ok(ip), Ok(cidr)) => cidr.contains(ip),
                _ => false,
            }
        }
        (AddressKind::SingleV4, AddressKind::RangeV4) => {
            match (address.parse::<Ipv4Addr>(), Ipv4Range::new(block)) {
                (Ok(ip), Ok(range)) => range.contains(ip),
                _ => false,
            }
        }
        (AddressKind::SingleV6, AddressKind::CidrV6) => ipv6_prefix_match(address, block),
        (AddressKind::SingleV6, AddressKind::RangeV6) => ipv6_endpoint_match(address, block),
        _ => false,
    }
}

fn ipv6_prefix_match(address: &str, cidr: &str) -> bool {
    let network = cidr.split('/').next().unwrap_or_default().to_lowercase();
    let prefix = network.trim_end_matches(':');
    if prefix.is_empty() {
        return true;
    }
    address.to_lowercase().starts_with(&format!("{prefix}:"))
        || address.eq_ignore_ascii_case(&network)
}

fn ipv6_endpoint_match(address: &str, range: &str) -> bool {
    range
        .split('-')
        .any(|endpoint| endpoint.trim().eq_ignore_ascii_case(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_special_ipv4() {
        for ip in [
            "127.0.0.1",
            "169.254.1.1",
            "224.0.0.1",
            "239.255.255.250",
            "240.1.2.3",
            "255.255.255.255",
            "192.168.1.0",
            "192.168.1.255",
            "0.0.0.0",
        ] {
            assert!(!is_assignable(ip), "{ip} should not be assignable");
        }
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(check_assignable("0.0.0.0"), Err(Rejection::Reserved));
        assert_eq!(check_assignable("127.0.0.1"), Err(Rejection::Loopback));
        assert_eq!(check_assignable("169.254.1.1"), Err(Rejection::LinkLocal));
        assert_eq!(check_assignable("224.0.0.1"), Err(Rejection::Multicast));
        assert_eq!(check_assignable("250.0.0.1"), Err(Rejection::ReservedSpace));
        assert_eq!(
            check_assignable("172.20.3.255"),
            Err(Rejection::PrivateBoundary)
        );
        assert_eq!(check_assignable("8.8.8.0"), Err(Rejection::SubnetBoundary));
        assert_eq!(check_assignable("10.0.0.0/24"), Err(Rejection::NotSingle));
        assert_eq!(check_assignable("garbage"), Err(Rejection::NotSingle));
    }

    #[test]
    fn test_accepts_ordinary_ipv4() {
        for ip in ["10.0.0.1", "10.0.0.2", "192.168.1.10", "8.8.8.8", "172.32.0.1"] {
            assert!(is_assignable(ip), "{ip} should be assignable");
        }
    }

    #[test]
    fn test_ipv6_rules() {
        assert_eq!(check_assignable("::"), Err(Rejection::Reserved));
        assert_eq!(check_assignable("::1"), Err(Rejection::Reserved));
        assert_eq!(check_assignable("FE80::1"), Err(Rejection::LinkLocal));
        assert_eq!(check_assignable("ff02::1"), Err(Rejection::Multicast));
        assert_eq!(check_assignable("fd00::1"), Err(Rejection::UniqueLocal));
        assert_eq!(check_assignable("fc00::1"), Err(Rejection::UniqueLocal));
        assert_eq!(
            check_assignable("2001:db8::1"),
            Err(Rejection::Documentation)
        );
        assert!(is_assignable("2001:4860:4860::8888"));
    }

    #[test]
    fn test_overlap_with_cidr() {
        let existing = vec!["10.0.0.0/24".to_string()];
        assert!(is_in_existing_ranges("10.0.0.5", &existing));
        assert!(!is_in_existing_ranges("10.0.1.5", &existing));
    }

    #[test]
    fn test_overlap_with_range_and_singles() {
        let existing = ["192.168.5.10-192.168.5.20", "10.1.1.1"];
        assert!(is_in_existing_ranges("192.168.5.10", &existing));
        assert!(is_in_existing_ranges("192.168.5.20", &existing));
        assert!(!is_in_existing_ranges("192.168.5.21", &existing));
        // singles are matched by the duplicate check, not here
        assert!(!is_in_existing_ranges("10.1.1.1", &existing));
        assert_eq!(
            find_covering_block("192.168.5.15", &existing),
            Some("192.168.5.10-192.168.5.20")
        );
    }

    #[test]
    fn test_overlap_ipv6_string_rules() {
        let existing = ["2001:DB8::/32", "2a00:1450::1-2a00:1450::ff"];
        assert!(is_in_existing_ranges("2001:db8::5", &existing));
        assert!(!is_in_existing_ranges("2001:db80::5", &existing));
        assert!(is_in_existing_ranges("2A00:1450::1", &existing));
        // only endpoints are compared for IPv6 ranges
        assert!(!is_in_existing_ranges("2a00:1450::5", &existing));
    }

    #[test]
    fn test_families_do_not_mix() {
        assert!(!is_ip_in_block("10.0.0.1", "2001:db8::/32"));
        assert!(!is_ip_in_block("2001:db8::1", "10.0.0.0/8"));
        assert!(!is_ip_in_block("10.0.0.0/24", "10.0.0.0/8"));
    }
}
