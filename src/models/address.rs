//! Dual-family address value and its fixed-width integer arithmetic.
//!
//! [`AddressValue`] holds either a 32-bit or a 128-bit unsigned integer in
//! host order. Octets in network order only appear at the boundary
//! ([`AddressValue::from_octets`], [`AddressValue::octets`], `Display`, `FromStr`).

use crate::error::CalcError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::Not;
use std::str::FromStr;

/// Address family of an [`AddressValue`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Width of an address of this family in bits.
    pub const fn width(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Number of 32-bit words in an address of this family.
    pub const fn words(self) -> usize {
        match self {
            Family::V4 => 1,
            Family::V6 => 4,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// One IPv4 or IPv6 address treated as a fixed-width unsigned integer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressValue {
    V4(u32),
    V6(u128),
}

impl AddressValue {
    pub const fn family(&self) -> Family {
        match self {
            AddressValue::V4(_) => Family::V4,
            AddressValue::V6(_) => Family::V6,
        }
    }

    pub const fn is_ipv4(&self) -> bool {
        matches!(self, AddressValue::V4(_))
    }

    /// The all-zero address of a family.
    pub const fn zero(family: Family) -> AddressValue {
        match family {
            Family::V4 => AddressValue::V4(0),
            Family::V6 => AddressValue::V6(0),
        }
    }

    /// The all-ones address of a family.
    pub const fn all_ones(family: Family) -> AddressValue {
        match family {
            Family::V4 => AddressValue::V4(u32::MAX),
            Family::V6 => AddressValue::V6(u128::MAX),
        }
    }

    /// Build a value from raw bits; bits above the family width are dropped.
    pub const fn from_bits(family: Family, bits: u128) -> AddressValue {
        match family {
            Family::V4 => AddressValue::V4(bits as u32),
            Family::V6 => AddressValue::V6(bits),
        }
    }

    /// Raw magnitude, zero-extended to 128 bits.
    pub const fn bits(&self) -> u128 {
        match *self {
            AddressValue::V4(a) => a as u128,
            AddressValue::V6(a) => a,
        }
    }

    /// Build a value from network-order octets (4 for IPv4, 16 for IPv6).
    pub fn from_octets(octets: &[u8]) -> Result<AddressValue, CalcError> {
        if let Ok(v4) = <[u8; 4]>::try_from(octets) {
            Ok(AddressValue::V4(u32::from_be_bytes(v4)))
        } else if let Ok(v6) = <[u8; 16]>::try_from(octets) {
            Ok(AddressValue::V6(u128::from_be_bytes(v6)))
        } else {
            Err(CalcError::UnsupportedFamily(format!(
                "{} byte address",
                octets.len()
            )))
        }
    }

    /// Network-order octets; only the first 4 are meaningful for IPv4.
    pub fn octets(&self) -> ([u8; 16], usize) {
        let mut out = [0u8; 16];
        match *self {
            AddressValue::V4(a) => {
                out[..4].copy_from_slice(&a.to_be_bytes());
                (out, 4)
            }
            AddressValue::V6(a) => (a.to_be_bytes(), 16),
        }
    }

    /// The 32-bit words of the address, most significant first.
    pub fn words(&self) -> impl Iterator<Item = u32> {
        let family = self.family();
        let bits = self.bits();
        (0..family.words()).rev().map(move |i| (bits >> (32 * i)) as u32)
    }

    /// The 16-bit segments of the address, most significant first.
    pub fn segments(&self) -> impl Iterator<Item = u16> {
        let count = self.family().width() as u32 / 16;
        let bits = self.bits();
        (0..count).rev().map(move |i| (bits >> (16 * i)) as u16)
    }

    pub fn to_ip_addr(&self) -> IpAddr {
        match *self {
            AddressValue::V4(a) => IpAddr::V4(Ipv4Addr::from(a)),
            AddressValue::V6(a) => IpAddr::V6(Ipv6Addr::from(a)),
        }
    }

    fn same_family(&self, other: &AddressValue) -> Result<(), CalcError> {
        if self.family() == other.family() {
            Ok(())
        } else {
            Err(CalcError::FamilyMismatch {
                left: self.family(),
                right: other.family(),
            })
        }
    }

    /// Bitwise AND of two addresses of the same family.
    pub fn and(&self, other: &AddressValue) -> Result<AddressValue, CalcError> {
        self.same_family(other)?;
        Ok(AddressValue::from_bits(
            self.family(),
            self.bits() & other.bits(),
        ))
    }

    /// Bitwise OR of two addresses of the same family.
    pub fn or(&self, other: &AddressValue) -> Result<AddressValue, CalcError> {
        self.same_family(other)?;
        Ok(AddressValue::from_bits(
            self.family(),
            self.bits() | other.bits(),
        ))
    }

    /// Add `n`, carrying across the whole width. Wraps at the top of the
    /// address space.
    pub fn add(&self, n: u32) -> AddressValue {
        match *self {
            AddressValue::V4(a) => AddressValue::V4(a.wrapping_add(n)),
            AddressValue::V6(a) => AddressValue::V6(a.wrapping_add(n as u128)),
        }
    }

    /// Subtract `n`, borrowing across the whole width. Wraps below zero.
    pub fn sub(&self, n: u32) -> AddressValue {
        match *self {
            AddressValue::V4(a) => AddressValue::V4(a.wrapping_sub(n)),
            AddressValue::V6(a) => AddressValue::V6(a.wrapping_sub(n as u128)),
        }
    }

    /// Family-checked equality.
    pub fn equals(&self, other: &AddressValue) -> Result<bool, CalcError> {
        self.same_family(other)?;
        Ok(self.bits() == other.bits())
    }
}

impl Not for AddressValue {
    type Output = AddressValue;

    fn not(self) -> AddressValue {
        match self {
            AddressValue::V4(a) => AddressValue::V4(!a),
            AddressValue::V6(a) => AddressValue::V6(!a),
        }
    }
}

impl From<IpAddr> for AddressValue {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => AddressValue::V4(u32::from(v4)),
            IpAddr::V6(v6) => AddressValue::V6(u128::from(v6)),
        }
    }
}

impl From<Ipv4Addr> for AddressValue {
    fn from(ip: Ipv4Addr) -> Self {
        AddressValue::V4(u32::from(ip))
    }
}

impl From<Ipv6Addr> for AddressValue {
    fn from(ip: Ipv6Addr) -> Self {
        AddressValue::V6(u128::from(ip))
    }
}

impl FromStr for AddressValue {
    type Err = CalcError;

    /// Parse a plain dotted-quad or colon-hex literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        IpAddr::from_str(s)
            .map(AddressValue::from)
            .map_err(|_| CalcError::BadAddress(s.to_string()))
    }
}

impl std::fmt::Display for AddressValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_ip_addr())
    }
}

impl Serialize for AddressValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressValue {
    fn deserialize<D>(deserializer: D) -> Result<AddressValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressValue::from_str(&s)
            .map_err(|_| de::Error::custom(format!("invalid IP address: {}", s)))
    }
}
