//! Address input classification types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address family of a classified input.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Whether blocks of this family can be enumerated into host addresses.
    ///
    /// IPv6 CIDRs and ranges are kept as symbolic tokens.
    pub fn supports_enumeration(&self) -> bool {
        match self {
            AddressFamily::V4 => true,
            AddressFamily::V6 => false,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Category of a raw address token. Every input maps to exactly one kind.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressKind {
    #[serde(rename = "SINGLE_IPV4")]
    SingleV4,
    #[serde(rename = "SINGLE_IPV6")]
    SingleV6,
    #[serde(rename = "CIDR_IPV4")]
    CidrV4,
    #[serde(rename = "CIDR_IPV6")]
    CidrV6,
    #[serde(rename = "IP_RANGE_IPV4")]
    RangeV4,
    #[serde(rename = "IP_RANGE_IPV6")]
    RangeV6,
    #[serde(rename = "INVALID")]
    Invalid,
}

impl AddressKind {
    pub fn family(&self) -> Option<AddressFamily> {
        match self {
            AddressKind::SingleV4 | AddressKind::CidrV4 | AddressKind::RangeV4 => {
                Some(AddressFamily::V4)
            }
            AddressKind::SingleV6 | AddressKind::CidrV6 | AddressKind::RangeV6 => {
                Some(AddressFamily::V6)
            }
            AddressKind::Invalid => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, AddressKind::SingleV4 | AddressKind::SingleV6)
    }

    /// CIDR subnet or address range of either family.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            AddressKind::CidrV4 | AddressKind::CidrV6 | AddressKind::RangeV4 | AddressKind::RangeV6
        )
    }

    pub fn is_valid(&self) -> bool {
        *self != AddressKind::Invalid
    }

    /// Short human readable name of the format.
    pub fn label(&self) -> &'static str {
        match self {
            AddressKind::SingleV4 => "Single IPv4 Address",
            AddressKind::SingleV6 => "Single IPv6 Address",
            AddressKind::CidrV4 => "IPv4 CIDR Subnet",
            AddressKind::CidrV6 => "IPv6 CIDR Subnet",
            AddressKind::RangeV4 => "IPv4 Range",
            AddressKind::RangeV6 => "IPv6 Range",
            AddressKind::Invalid => "Unknown Format",
        }
    }

    /// Description of an input of this kind, used as a default record description.
    pub fn describe(&self, input: &str) -> String {
        match self {
            AddressKind::SingleV4 => format!("Single IPv4 address: {input}"),
            AddressKind::SingleV6 => format!("Single IPv6 address: {input}"),
            AddressKind::CidrV4 => format!("IPv4 CIDR subnet: {input}"),
            AddressKind::CidrV6 => format!("IPv6 CIDR subnet: {input}"),
            AddressKind::RangeV4 => format!("IPv4 range: {input}"),
            AddressKind::RangeV6 => format!("IPv6 range: {input}"),
            AddressKind::Invalid => format!("Invalid IP format: {input}"),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressKind::SingleV4 => "SINGLE_IPV4",
            AddressKind::SingleV6 => "SINGLE_IPV6",
            AddressKind::CidrV4 => "CIDR_IPV4",
            AddressKind::CidrV6 => "CIDR_IPV6",
            AddressKind::RangeV4 => "IP_RANGE_IPV4",
            AddressKind::RangeV6 => "IP_RANGE_IPV6",
            AddressKind::Invalid => "INVALID",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_capability() {
        assert!(AddressKind::CidrV4.family().unwrap().supports_enumeration());
        assert!(!AddressKind::RangeV6.family().unwrap().supports_enumeration());
        assert_eq!(AddressKind::Invalid.family(), None);
    }

    #[test]
    fn test_single_and_block_are_exclusive() {
        let all = [
            AddressKind::SingleV4,
            AddressKind::SingleV6,
            AddressKind::CidrV4,
            AddressKind::CidrV6,
            AddressKind::RangeV4,
            AddressKind::RangeV6,
            AddressKind::Invalid,
        ];
        for kind in all {
            assert!(!(kind.is_single() && kind.is_block()), "{kind}");
            assert_eq!(kind.is_valid(), kind.is_single() || kind.is_block());
        }
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&AddressKind::RangeV4).unwrap();
        assert_eq!(json, "\"IP_RANGE_IPV4\"");
        assert_eq!(AddressKind::RangeV4.to_string(), "IP_RANGE_IPV4");
        assert_eq!(
            AddressKind::CidrV4.describe("10.0.0.0/8"),
            "IPv4 CIDR subnet: 10.0.0.0/8"
        );
    }
}
