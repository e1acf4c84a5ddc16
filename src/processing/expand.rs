//! Expansion of IPv4 CIDRs and ranges into concrete host addresses.
//!
//! IPv6 blocks are never enumerated,
//! see [`crate::models::AddressFamily::supports_enumeration`].

use super::classify::classify;
use crate::models::{num_hosts, AddressKind, Ipv4Cidr, Ipv4Range};
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

/// Default ceiling on the number of addresses produced by one expansion.
pub const DEFAULT_EXPANSION_CAP: usize = 1000;

/// Dotted-quad to unsigned 32-bit integer.
pub fn ip_to_long(ip: &str) -> Option<u32> {
    ip.trim().parse::<Ipv4Addr>().ok().map(u32::from)
}

/// Unsigned 32-bit integer to dotted-quad.
pub fn long_to_ip(ip: u32) -> String {
    Ipv4Addr::from(ip).to_string()
}

/// Result of expanding a classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Host addresses of an IPv4 CIDR or range, ascending.
    Hosts(Vec<String>),
    /// The token is already a single address.
    Single(String),
    /// A block of a family that does not support enumeration.
    Symbolic(String),
    /// Invalid input.
    Nothing,
}

impl Expansion {
    /// Concrete addresses, empty for symbolic blocks and invalid input.
    pub fn addresses(&self) -> Vec<String> {
        match self {
            Expansion::Hosts(hosts) => hosts.clone(),
            Expansion::Single(ip) => vec![ip.clone()],
            Expansion::Symbolic(_) | Expansion::Nothing => vec![],
        }
    }
}

/// Enumerates IPv4 blocks, producing at most `cap` addresses per call.
#[derive(Debug, Clone, Copy)]
pub struct Expander {
    pub cap: usize,
}

impl Default for Expander {
    fn default() -> Self {
        Expander {
            cap: DEFAULT_EXPANSION_CAP,
        }
    }
}

impl Expander {
    pub fn new(cap: usize) -> Expander {
        Expander { cap }
    }

    /// Host addresses strictly between network and broadcast, ascending.
    pub fn expand_v4_cidr(&self, cidr: &str) -> Vec<String> {
        self.collect(cidr_hosts(cidr), |_| true)
    }

    /// Every address from start to end inclusive, ascending.
    pub fn expand_v4_range(&self, range: &str) -> Vec<String> {
        self.collect(range_addresses(range), |_| true)
    }

    /// Addresses of an IPv4 CIDR or range accepted by `keep`, up to `cap` of them.
    ///
    /// The filter runs before the cap, so taken addresses at the start of a
    /// large block don't hide the free ones after it.
    pub fn expand_v4_where<F>(&self, block: &str, keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let span = match classify(block) {
            AddressKind::CidrV4 => cidr_hosts(block),
            AddressKind::RangeV4 => range_addresses(block),
            kind => {
                log::debug!("{block} ({kind}) is not an IPv4 block");
                None
            }
        };
        self.collect(span, keep)
    }

    /// Classify and expand a token.
    pub fn expand(&self, input: &str) -> Expansion {
        let input = input.trim();
        match classify(input) {
            kind if kind.is_block()
                && !kind.family().is_some_and(|f| f.supports_enumeration()) =>
            {
                Expansion::Symbolic(input.to_string())
            }
            AddressKind::CidrV4 => Expansion::Hosts(self.expand_v4_cidr(input)),
            AddressKind::RangeV4 => Expansion::Hosts(self.expand_v4_range(input)),
            kind if kind.is_single() => Expansion::Single(input.to_string()),
            _ => Expansion::Nothing,
        }
    }

    fn collect<F>(&self, span: Option<RangeInclusive<u32>>, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let Some(span) = span else {
            return vec![];
        };
        let total = (*span.end() - *span.start()) as u64 + 1;
        let addresses: Vec<String> = span
            .map(long_to_ip)
            .filter(|ip| keep(ip))
            .take(self.cap)
            .collect();
        if total > self.cap as u64 && addresses.len() == self.cap {
            log::warn!("Expansion of {} addresses capped to {}", total, self.cap);
        }
        addresses
    }
}

/// Host span of a CIDR, `None` when it has no hosts or does not parse.
fn cidr_hosts(cidr: &str) -> Option<RangeInclusive<u32>> {
    let cidr = match Ipv4Cidr::new(cidr) {
        Ok(cidr) => cidr,
        Err(e) => {
            log::error!("CIDR parse error {cidr}: {e}");
            return None;
        }
    };
    if num_hosts(cidr.mask).unwrap_or(0) == 0 {
        log::debug!("CIDR {cidr} has no host addresses");
        return None;
    }
    Some(u32::from(cidr.lo()) + 1..=u32::from(cidr.hi()) - 1)
}

/// Inclusive span of a range, `None` when unordered or unparsable.
fn range_addresses(range: &str) -> Option<RangeInclusive<u32>> {
    let range = match Ipv4Range::new(range) {
        Ok(range) => range,
        Err(e) => {
            log::error!("IP range parse error {range}: {e}");
            return None;
        }
    };
    if !range.is_ordered() {
        log::error!("IP range {range} has start after end");
        return None;
    }
    Some(u32::from(range.start)..=u32::from(range.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_long_round_trip() {
        for ip in ["0.0.0.0", "10.0.0.1", "192.168.1.255", "255.255.255.255"] {
            assert_eq!(long_to_ip(ip_to_long(ip).unwrap()), ip);
        }
        assert_eq!(ip_to_long("10.0.0.1"), Some(0x0A000001));
        assert_eq!(ip_to_long("10.0.0"), None);
    }

    #[test]
    fn test_expand_cidr_excludes_network_and_broadcast() {
        let hosts = Expander::default().expand_v4_cidr("192.168.1.0/24");
        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts.first().unwrap(), "192.168.1.1");
        assert_eq!(hosts.last().unwrap(), "192.168.1.254");
        assert!(!hosts.contains(&"192.168.1.0".to_string()));
        assert!(!hosts.contains(&"192.168.1.255".to_string()));
    }

    #[test]
    fn test_expand_small_cidrs() {
        let expander = Expander::default();
        assert_eq!(
            expander.expand_v4_cidr("10.0.0.0/30"),
            vec!["10.0.0.1", "10.0.0.2"]
        );
        assert!(expander.expand_v4_cidr("10.0.0.0/31").is_empty());
        assert!(expander.expand_v4_cidr("10.0.0.7/32").is_empty());
    }

    #[test]
    fn test_expand_cidr_uses_network_of_written_address() {
        assert_eq!(
            Expander::default().expand_v4_cidr("10.0.0.2/30"),
            vec!["10.0.0.1", "10.0.0.2"]
        );
    }

    #[test]
    fn test_expand_cidr_is_capped() {
        let hosts = Expander::default().expand_v4_cidr("10.0.0.0/8");
        assert_eq!(hosts.len(), DEFAULT_EXPANSION_CAP);
        assert_eq!(hosts[0], "10.0.0.1");
        assert_eq!(Expander::new(3).expand_v4_cidr("0.0.0.0/0").len(), 3);
    }

    #[test]
    fn test_expand_range_inclusive_ascending() {
        assert_eq!(
            Expander::default().expand_v4_range("192.168.1.5-192.168.1.8"),
            vec!["192.168.1.5", "192.168.1.6", "192.168.1.7", "192.168.1.8"]
        );
        assert_eq!(
            Expander::default().expand_v4_range("10.0.0.255-10.0.1.1"),
            vec!["10.0.0.255", "10.0.1.0", "10.0.1.1"]
        );
    }

    #[test]
    fn test_expand_range_at_top_of_space() {
        assert_eq!(
            Expander::default().expand_v4_range("255.255.255.254-255.255.255.255"),
            vec!["255.255.255.254", "255.255.255.255"]
        );
    }

    #[test]
    fn test_expand_malformed_is_empty() {
        let expander = Expander::default();
        assert!(expander.expand_v4_range("10.0.0.5-10.0.0.1").is_empty());
        assert!(expander.expand_v4_range("garbage").is_empty());
        assert!(expander.expand_v4_cidr("10.0.0.0/40").is_empty());
        assert!(expander.expand_v4_cidr("10.0.0.0").is_empty());
    }

    #[test]
    fn test_expand_dispatch() {
        let expander = Expander::default();
        assert_eq!(
            expander.expand("10.0.0.0/30"),
            Expansion::Hosts(vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()])
        );
        assert_eq!(
            expander.expand("10.0.0.9"),
            Expansion::Single("10.0.0.9".to_string())
        );
        assert_eq!(
            expander.expand("2001:db8::/32"),
            Expansion::Symbolic("2001:db8::/32".to_string())
        );
        assert_eq!(expander.expand("nope"), Expansion::Nothing);
        assert!(expander.expand("2001:db8::/32").addresses().is_empty());
    }

    #[test]
    fn test_expand_where_filters_before_cap() {
        let expander = Expander::new(2);
        let taken = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"];
        assert_eq!(
            expander.expand_v4_where("10.0.0.0/24", |ip| !taken.contains(&ip)),
            vec!["10.0.0.5", "10.0.0.6"]
        );
        assert_eq!(
            expander.expand_v4_where("10.0.0.1-10.0.0.9", |ip| ip.ends_with('9')),
            vec!["10.0.0.9"]
        );
        assert!(expander.expand_v4_where("2001:db8::/64", |_| true).is_empty());
        assert!(expander.expand_v4_where("10.0.0.1", |_| true).is_empty());
    }
}
