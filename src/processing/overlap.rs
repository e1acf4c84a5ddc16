//! Interval arithmetic over IPv4 blocks.
//!
//! Detects registered CIDRs and ranges that share addresses with a new block.

use super::classify::classify;
use crate::models::{AddressKind, Ipv4Cidr, Ipv4Range};
use std::fmt;

/// Inclusive span of IPv4 addresses as unsigned integers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Span {
    pub start: u32,
    pub end: u32,
}

impl Ipv4Span {
    /// Full subnet including network and broadcast addresses.
    pub fn from_cidr(cidr: &Ipv4Cidr) -> Ipv4Span {
        Ipv4Span {
            start: u32::from(cidr.lo()),
            end: u32::from(cidr.hi()),
        }
    }

    /// `None` for ranges with start after end.
    pub fn from_range(range: &Ipv4Range) -> Option<Ipv4Span> {
        range.is_ordered().then(|| Ipv4Span {
            start: u32::from(range.start),
            end: u32::from(range.end),
        })
    }

    /// Span of an IPv4 single address, CIDR or range token.
    pub fn from_token(token: &str) -> Option<Ipv4Span> {
        let token = token.trim();
        match classify(token) {
            AddressKind::SingleV4 => token.parse::<std::net::Ipv4Addr>().ok().map(|ip| {
                let ip = u32::from(ip);
                Ipv4Span { start: ip, end: ip }
            }),
            AddressKind::CidrV4 => Ipv4Cidr::new(token).ok().map(|c| Ipv4Span::from_cidr(&c)),
            AddressKind::RangeV4 => Ipv4Range::new(token)
                .ok()
                .and_then(|r| Ipv4Span::from_range(&r)),
            _ => None,
        }
    }

    /// True when the two spans share at least one address.
    pub fn overlaps(&self, other: &Ipv4Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Ipv4Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            std::net::Ipv4Addr::from(self.start),
            std::net::Ipv4Addr::from(self.end)
        )
    }
}

/// Registered IPv4 CIDRs and ranges sharing at least one address with `block`.
///
/// Single address records are ignored; a block may cover registered singles.
pub fn find_overlapping_blocks<S: AsRef<str>>(block: &str, existing: &[S]) -> Vec<String> {
    let Some(span) = Ipv4Span::from_token(block) else {
        return vec![];
    };
    existing
        .iter()
        .map(|other| other.as_ref().trim())
        .filter(|other| matches!(classify(other), AddressKind::CidrV4 | AddressKind::RangeV4))
        .filter(|other| match Ipv4Span::from_token(other) {
            Some(other_span) if other_span.overlaps(&span) => {
                log::debug!("{block} ({span}) overlaps {other} ({other_span})");
                true
            }
            _ => false,
        })
        .map(|other| other.to_string())
        .collect()
}
