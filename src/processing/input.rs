//! Turning command-line text into address values.
//!
//! Only literal addresses are accepted; host names are never resolved.

use crate::error::CalcError;
use crate::models::{parse_prefix_or_netmask, prefix_to_netmask, AddressValue, Family};
use regex::Regex;
use std::sync::OnceLock;

/// Regex splitting `address/mask`; the mask part is optional.
static ADDRESS_MASK_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_address_mask_regex() -> &'static Regex {
    ADDRESS_MASK_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<addr>[^/]+)(?:/(?P<mask>.*))?$").expect("Invalid Regex")
    })
}

/// A parsed literal address and its optional IPv6 zone (`%eth0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddress {
    pub value: AddressValue,
    pub zone: Option<String>,
}

/// Address, prefix and netmask as given by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub address: HostAddress,
    pub prefix: u8,
    pub netmask: AddressValue,
}

/// Where the random bits of a generated unique-local address come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RandomSource {
    ThreadRng,
    OsRng,
}

impl std::fmt::Display for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RandomSource::ThreadRng => write!(f, "thread RNG"),
            RandomSource::OsRng => write!(f, "operating system RNG"),
        }
    }
}

/// Parse a literal address, accepting `[v6]` brackets (with an optional
/// trailing `:port`, which is ignored) and a `%zone` suffix on IPv6.
pub fn parse_address(text: &str) -> Result<HostAddress, CalcError> {
    let text = text.trim();
    let bad = || CalcError::BadAddress(text.to_string());

    let host = match text.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map(|(host, _port)| host).ok_or_else(bad)?,
        None => text,
    };
    let (host, zone) = match host.split_once('%') {
        Some((host, zone)) if !zone.is_empty() => (host, Some(zone.to_string())),
        Some(_) => return Err(bad()),
        None => (host, None),
    };

    let value: AddressValue = host.parse().map_err(|_| bad())?;
    if zone.is_some() && value.is_ipv4() {
        return Err(bad());
    }
    Ok(HostAddress { value, zone })
}

/// Parse the `address[/prefix-or-netmask]` argument plus an optional separate
/// prefix-or-netmask argument. Without any mask the host prefix is used.
pub fn parse_request(address_arg: &str, mask_arg: Option<&str>) -> Result<Request, CalcError> {
    let address_arg = address_arg.trim();
    let caps = get_address_mask_regex()
        .captures(address_arg)
        .ok_or_else(|| CalcError::BadAddress(address_arg.to_string()))?;
    let address = parse_address(&caps["addr"])?;

    let mask_text = match (caps.name("mask"), mask_arg) {
        (Some(_), Some(extra)) => {
            log::warn!("Netmask given twice: {address_arg} and {extra}");
            return Err(CalcError::BadNetmask(extra.to_string()));
        }
        (Some(mask), None) => Some(mask.as_str()),
        (None, mask) => mask,
    };

    let (prefix, netmask) = match mask_text {
        Some(text) => parse_prefix_or_netmask(text, &address.value)?,
        None => {
            let family = address.value.family();
            let width = family.width();
            (width, prefix_to_netmask(width as u32, family)?)
        }
    };
    log::debug!("request address={} prefix=/{prefix}", address.value);

    Ok(Request {
        address,
        prefix,
        netmask,
    })
}

/// Replace the first 48 bits of an IPv6 address with `fd` followed by the
/// given 40-bit global ID.
pub fn with_unique_local_prefix(
    address: &AddressValue,
    global_id: [u8; 5],
) -> Result<AddressValue, CalcError> {
    match address {
        AddressValue::V6(a) => {
            let mut octets = a.to_be_bytes();
            octets[0] = 0xfd;
            octets[1..6].copy_from_slice(&global_id);
            Ok(AddressValue::V6(u128::from_be_bytes(octets)))
        }
        AddressValue::V4(_) => Err(CalcError::UniqueLocalRequiresIpv6),
    }
}

/// Generate a random unique-local address keeping the low 80 bits of `address`.
pub fn generate_unique_local(
    address: &AddressValue,
    source: RandomSource,
) -> Result<AddressValue, CalcError> {
    if address.family() != Family::V6 {
        return Err(CalcError::UniqueLocalRequiresIpv6);
    }
    let mut global_id = [0u8; 5];
    match source {
        RandomSource::ThreadRng => {
            use rand::Rng;
            rand::rng().fill(&mut global_id);
        }
        RandomSource::OsRng => {
            use rand::TryRngCore;
            rand::rngs::OsRng
                .try_fill_bytes(&mut global_id)
                .map_err(|e| CalcError::Random(e.to_string()))?;
        }
    }
    log::info!("Generating Unique Local IPv6 address (using {source})");
    with_unique_local_prefix(address, global_id)
}
