//! Classification of free-text address input.
//!
//! Syntactic checks decide the [`AddressKind`]; [`is_valid_input`] adds the
//! logical checks (network address for CIDRs, ordering for ranges).

use crate::models::{AddressKind, Ipv4Cidr, Ipv4Range};
use ipnet::Ipv6Net;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv6Addr;

const OCTET: &str = r"(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";

lazy_static! {
    static ref IPV4_RE: Regex =
        Regex::new(&format!(r"^({OCTET}\.){{3}}{OCTET}$")).expect("Invalid Regex?");
    static ref IPV4_CIDR_RE: Regex =
        Regex::new(&format!(r"^({OCTET}\.){{3}}{OCTET}/(3[0-2]|[12]?[0-9])$"))
            .expect("Invalid Regex?");
    static ref IPV4_RANGE_RE: Regex = Regex::new(&format!(
        r"^({OCTET}\.){{3}}{OCTET}-({OCTET}\.){{3}}{OCTET}$"
    ))
    .expect("Invalid Regex?");
    static ref IPV6_PREFIX_RE: Regex =
        Regex::new(r"^(12[0-8]|1[01][0-9]|[1-9]?[0-9])$").expect("Invalid Regex?");
}

/// Group count of a full, uncompressed IPv6 address.
const IPV6_GROUPS: usize = 8;

/// Classify a raw token. Precedence: single, CIDR, range; IPv4 before IPv6.
pub fn classify(input: &str) -> AddressKind {
    let input = input.trim();
    if input.is_empty() {
        return AddressKind::Invalid;
    }
    let kind = if is_valid_ipv4(input) {
        AddressKind::SingleV4
    } else if is_valid_ipv6(input) {
        AddressKind::SingleV6
    } else if is_valid_ipv4_cidr(input) {
        AddressKind::CidrV4
    } else if is_valid_ipv6_cidr(input) {
        AddressKind::CidrV6
    } else if is_valid_ipv4_range(input) {
        AddressKind::RangeV4
    } else if is_valid_ipv6_range(input) {
        AddressKind::RangeV6
    } else {
        AddressKind::Invalid
    };
    log::trace!("classify({input}) = {kind}");
    kind
}

pub fn is_valid_ipv4(ip: &str) -> bool {
    IPV4_RE.is_match(ip.trim())
}

pub fn is_valid_ipv4_cidr(cidr: &str) -> bool {
    IPV4_CIDR_RE.is_match(cidr.trim())
}

/// Syntactic range check only, see [`is_valid_input`] for ordering.
pub fn is_valid_ipv4_range(range: &str) -> bool {
    IPV4_RANGE_RE.is_match(range.trim())
}

/// Eight hex groups, or a single `::` compression with at most seven explicit groups.
pub fn is_valid_ipv6(ip: &str) -> bool {
    let ip = ip.trim();
    if ip == "::" || ip == "::1" {
        return true;
    }
    match ip.split_once("::") {
        Some((left, right)) => {
            if right.contains("::") {
                return false;
            }
            match (hex_groups(left), hex_groups(right)) {
                (Some(l), Some(r)) => l + r < IPV6_GROUPS,
                _ => false,
            }
        }
        None => hex_groups(ip) == Some(IPV6_GROUPS),
    }
}

pub fn is_valid_ipv6_cidr(cidr: &str) -> bool {
    match cidr.trim().split_once('/') {
        Some((addr, prefix)) => is_valid_ipv6(addr) && IPV6_PREFIX_RE.is_match(prefix),
        None => false,
    }
}

/// Syntactic range check only, see [`is_valid_input`] for ordering.
pub fn is_valid_ipv6_range(range: &str) -> bool {
    match range.trim().split_once('-') {
        Some((start, end)) => is_valid_ipv6(start) && is_valid_ipv6(end),
        None => false,
    }
}

/// Count colon separated hex groups; `None` if any group is malformed.
fn hex_groups(side: &str) -> Option<usize> {
    if side.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in side.split(':') {
        let well_formed =
            (1..=4).contains(&group.len()) && group.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return None;
        }
        count += 1;
    }
    Some(count)
}

/// Syntactic classification plus logical validity.
///
/// CIDRs must be written as their network address, ranges must satisfy `start <= end`.
pub fn is_valid_input(input: &str) -> bool {
    let input = input.trim();
    match classify(input) {
        AddressKind::SingleV4 | AddressKind::SingleV6 => true,
        AddressKind::CidrV4 => match Ipv4Cidr::new(input) {
            Ok(cidr) => cidr.is_network_address(),
            Err(e) => {
                log::debug!("CIDR {input} rejected: {e}");
                false
            }
        },
        AddressKind::RangeV4 => match Ipv4Range::new(input) {
            Ok(range) => range.is_ordered(),
            Err(e) => {
                log::debug!("Range {input} rejected: {e}");
                false
            }
        },
        AddressKind::CidrV6 => is_ipv6_network_address(input),
        AddressKind::RangeV6 => is_ipv6_range_ordered(input),
        AddressKind::Invalid => false,
    }
}

/// Parse input into the list of tokens to store. Blocks are kept unexpanded.
pub fn parse_input(input: &str) -> Vec<String> {
    let input = input.trim();
    if classify(input).is_valid() {
        vec![input.to_string()]
    } else {
        vec![]
    }
}

/// Single spelling of a token, used for storage and duplicate checks.
///
/// IPv6 parts are lowercased and zero-compressed, prefix lengths are kept.
/// IPv4 and invalid tokens are only trimmed.
pub fn canonical_address(input: &str) -> String {
    let input = input.trim();
    match classify(input) {
        AddressKind::SingleV6 => canonical_ipv6(input),
        AddressKind::CidrV6 => match input.split_once('/') {
            Some((addr, prefix)) => format!("{}/{prefix}", canonical_ipv6(addr)),
            None => input.to_string(),
        },
        AddressKind::RangeV6 => match input.split_once('-') {
            Some((start, end)) => format!("{}-{}", canonical_ipv6(start), canonical_ipv6(end)),
            None => input.to_string(),
        },
        _ => input.to_string(),
    }
}

fn canonical_ipv6(ip: &str) -> String {
    let ip = ip.trim();
    match ip.parse::<Ipv6Addr>() {
        Ok(addr) => {
            let compressed = addr.to_string();
            // Display writes IPv4-mapped tails in dotted form, which classify rejects
            if compressed.contains('.') {
                addr.segments().iter().map(|s| format!("{s:x}")).join(":")
            } else {
                compressed
            }
        }
        Err(_) => ip.to_lowercase(),
    }
}

/// Numeric value of a syntactically valid IPv6 address.
pub fn ipv6_to_u128(ip: &str) -> Option<u128> {
    ip.trim().parse::<Ipv6Addr>().ok().map(u128::from)
}

fn is_ipv6_network_address(cidr: &str) -> bool {
    let Some((addr, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(addr), Ok(prefix)) = (addr.parse::<Ipv6Addr>(), prefix.parse::<u8>()) else {
        return false;
    };
    Ipv6Net::new(addr, prefix).is_ok_and(|net| net.trunc().addr() == addr)
}

fn is_ipv6_range_ordered(range: &str) -> bool {
    let Some((start, end)) = range.split_once('-') else {
        return false;
    };
    match (ipv6_to_u128(start), ipv6_to_u128(end)) {
        (Some(start), Some(end)) => start <= end,
        _ => false,
    }
}
