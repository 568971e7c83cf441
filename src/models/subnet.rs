//! Subnet derived from one address and its netmask.

use super::address::{AddressValue, Family};
use super::prefix::netmask_to_prefix;
use crate::error::CalcError;
use serde::Serialize;

/// Host bits above which the host count is only reported symbolically.
pub const MAX_COUNTED_HOST_BITS: u8 = 64;

/// Everything derived from an address and its netmask.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Subnet {
    pub address: AddressValue,
    pub netmask: AddressValue,
    pub prefix: u8,
    pub network: AddressValue,
    /// All host bits set. Only an actual broadcast address for IPv4.
    pub broadcast: AddressValue,
    pub wildcard: AddressValue,
    pub host_bits: u8,
    pub reserved_hosts: u8,
    pub first_host: AddressValue,
    pub last_host: AddressValue,
}

impl Subnet {
    /// Derive the subnet of `address` under `netmask`.
    ///
    /// Fails if the families differ or the netmask is not contiguous.
    pub fn new(address: AddressValue, netmask: AddressValue) -> Result<Subnet, CalcError> {
        let prefix = netmask_to_prefix(&netmask)?;
        let network = address.and(&netmask)?;
        let wildcard = !netmask;
        let broadcast = network.or(&wildcard)?;

        let width = address.family().width();
        let (host_bits, reserved_hosts, first_host, last_host) = match address.family() {
            // Point-to-point links (/31) and host routes (/32) reserve nothing.
            Family::V4 if prefix >= 31 => (width - prefix, 0, network, broadcast),
            Family::V4 => (width - prefix, 2, network.add(1), broadcast.sub(1)),
            Family::V6 if prefix == width => (0, 0, network, network),
            Family::V6 => (width - prefix, 1, network.add(1), broadcast),
        };

        log::debug!(
            "subnet {network}/{prefix}: host_bits={host_bits} reserved={reserved_hosts} range={first_host}-{last_host}"
        );

        Ok(Subnet {
            address,
            netmask,
            prefix,
            network,
            broadcast,
            wildcard,
            host_bits,
            reserved_hosts,
            first_host,
            last_host,
        })
    }

    pub fn family(&self) -> Family {
        self.address.family()
    }

    /// Whether a distinct broadcast address exists (IPv4 with reserved hosts).
    pub fn has_broadcast(&self) -> bool {
        self.address.is_ipv4() && self.reserved_hosts == 2
    }

    /// Number of usable hosts, or `None` when there are too many host bits to
    /// report a count.
    pub fn max_hosts(&self) -> Option<u128> {
        if self.host_bits > MAX_COUNTED_HOST_BITS {
            None
        } else {
            Some((1u128 << self.host_bits) - self.reserved_hosts as u128)
        }
    }
}
