//! IPv4 CIDR and range notation utilities.
//!
//! Provides [`Ipv4Cidr`] and [`Ipv4Range`] for representing IPv4 blocks,
//! along with the mask arithmetic used by expansion and overlap checks.

use std::error::Error;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use student_ip_registry::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Ok(Ipv4Addr::from(network_bits | !mask))
}

/// Number of host addresses strictly between network and broadcast.
pub fn num_hosts(len: u8) -> Result<u64, Box<dyn Error>> {
    if len > MAX_LENGTH {
        return Err("Network length is too long".into());
    }
    let total = 1u64 << (MAX_LENGTH - len);
    Ok(total.saturating_sub(2))
}

/// IPv4 block in CIDR notation, e.g. `10.0.0.0/24`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4Cidr {
    /// The address as written (not necessarily the network address).
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Ipv4Cidr {
    /// Create a new [`Ipv4Cidr`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4Cidr, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| format!("Invalid address/mask {addr_cidr}"))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("Invalid address {addr}"))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| format!("Invalid subnet mask {mask}"))?;
        if mask > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(Ipv4Cidr { addr, mask })
    }

    /// Subnet mask as u32.
    pub fn netmask(&self) -> u32 {
        // mask <= MAX_LENGTH is guaranteed by the constructors
        get_cidr_mask(self.mask).unwrap_or(u32::MAX)
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        cut_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// True when the written address has no host bits set.
    pub fn is_network_address(&self) -> bool {
        self.addr == self.lo()
    }

    /// Check if an IP address is contained within this subnet.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = self.netmask();
        (u32::from(ip) & mask) == (u32::from(self.addr) & mask)
    }
}

impl std::fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// Inclusive IPv4 address range, e.g. `192.168.1.5-192.168.1.8`.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct Ipv4Range {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl Ipv4Range {
    /// Parse `start-end`. Does not require `start <= end`, see [`Ipv4Range::is_ordered`].
    pub fn new(range: &str) -> Result<Ipv4Range, Box<dyn Error>> {
        let range = range.trim();
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("Invalid range {range}"))?;
        let start: Ipv4Addr = start
            .trim()
            .parse()
            .map_err(|_| format!("Invalid start address {start}"))?;
        let end: Ipv4Addr = end
            .trim()
            .parse()
            .map_err(|_| format!("Invalid end address {end}"))?;
        Ok(Ipv4Range { start, end })
    }

    pub fn is_ordered(&self) -> bool {
        u32::from(self.start) <= u32::from(self.end)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let ip = u32::from(ip);
        u32::from(self.start) <= ip && ip <= u32::from(self.end)
    }
}

impl std::fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(12).unwrap(), 0xFFF00000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(cut_addr(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(cut_addr(ip, 16).unwrap(), Ipv4Addr::new(192, 168, 0, 0));
        assert_eq!(cut_addr(ip, 32).unwrap(), Ipv4Addr::new(192, 168, 1, 42));
        assert!(cut_addr(ip, 33).is_err());
    }

    #[test]
    fn test_broadcast_addr() {
        let ip = Ipv4Addr::new(10, 0, 0, 0);
        assert_eq!(broadcast_addr(ip, 30).unwrap(), Ipv4Addr::new(10, 0, 0, 3));
        assert_eq!(
            broadcast_addr(ip, 8).unwrap(),
            Ipv4Addr::new(10, 255, 255, 255)
        );
        assert_eq!(broadcast_addr(ip, 32).unwrap(), ip);
    }

    #[test]
    fn test_num_hosts() {
        assert_eq!(num_hosts(24).unwrap(), 254);
        assert_eq!(num_hosts(30).unwrap(), 2);
        assert_eq!(num_hosts(31).unwrap(), 0);
        assert_eq!(num_hosts(32).unwrap(), 0);
        assert_eq!(num_hosts(0).unwrap(), 4294967294);
        assert!(num_hosts(33).is_err());
    }

    #[test]
    fn test_cidr_lo_hi_contains() {
        let net = Ipv4Cidr::new("172.16.0.0/12").unwrap();
        assert_eq!(net.lo(), Ipv4Addr::new(172, 16, 0, 0));
        assert_eq!(net.hi(), Ipv4Addr::new(172, 31, 255, 255));
        assert!(net.contains(Ipv4Addr::new(172, 20, 1, 1)));
        assert!(!net.contains(Ipv4Addr::new(172, 32, 0, 1)));
        assert!(net.is_network_address());
        assert!(!Ipv4Cidr::new("10.0.0.1/24").unwrap().is_network_address());
    }

    #[test]
    fn test_cidr_parse_errors() {
        assert!(Ipv4Cidr::new("10.0.0.0").is_err());
        assert!(Ipv4Cidr::new("10.0.0.0/33").is_err());
        assert!(Ipv4Cidr::new("10.0.0/8").is_err());
        assert_eq!(
            Ipv4Cidr::new(" 10.0.0.0/8 ").unwrap().to_string(),
            "10.0.0.0/8"
        );
    }

    #[test]
    fn test_range() {
        let range = Ipv4Range::new("10.0.0.5-10.0.0.9").unwrap();
        assert!(range.is_ordered());
        assert!(range.contains(Ipv4Addr::new(10, 0, 0, 5)));
        assert!(range.contains(Ipv4Addr::new(10, 0, 0, 9)));
        assert!(!range.contains(Ipv4Addr::new(10, 0, 0, 10)));
        assert!(!Ipv4Range::new("10.0.0.5-10.0.0.1").unwrap().is_ordered());
        assert!(Ipv4Range::new("10.0.0.5").is_err());
    }
}
