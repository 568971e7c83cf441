//! Prefix length and netmask conversion.

use super::address::{AddressValue, Family};
use crate::error::CalcError;

/// Convert a prefix length to a netmask of the given family.
///
/// # Examples
/// ```
/// use subnetcalc::models::{prefix_to_netmask, AddressValue, Family};
/// assert_eq!(prefix_to_netmask(24, Family::V4).unwrap(), AddressValue::V4(0xFFFFFF00));
/// ```
pub fn prefix_to_netmask(prefix: u32, family: Family) -> Result<AddressValue, CalcError> {
    let width = family.width();
    if prefix > width as u32 {
        return Err(CalcError::PrefixOutOfRange {
            prefix,
            family,
            max: width,
        });
    }
    let right_len = width as u32 - prefix;
    let mask = match family {
        Family::V4 => {
            let all_bits = u32::MAX as u64;
            AddressValue::V4(((all_bits >> right_len) << right_len) as u32)
        }
        Family::V6 => AddressValue::V6(u128::MAX.checked_shl(right_len).unwrap_or(0)),
    };
    Ok(mask)
}

/// Count the leading 1 bits of a netmask.
///
/// Any 1 bit after the first 0 bit makes the mask invalid, wherever it sits.
pub fn netmask_to_prefix(netmask: &AddressValue) -> Result<u8, CalcError> {
    let width = netmask.family().width() as u32;
    // Left-align so that IPv4 masks are scanned from their own MSB.
    let aligned = netmask.bits() << (128 - width);
    let prefix = aligned.leading_ones();
    let rest = aligned.checked_shl(prefix).unwrap_or(0);
    if rest != 0 {
        log::warn!("Netmask {netmask} has a 1 bit after a 0 bit");
        return Err(CalcError::InvalidNetmask(netmask.to_string()));
    }
    Ok(prefix as u8)
}

/// Interpret `text` either as a decimal prefix length or as a literal netmask
/// of the same family as `reference`.
///
/// Returns the prefix length together with the netmask.
pub fn parse_prefix_or_netmask(
    text: &str,
    reference: &AddressValue,
) -> Result<(u8, AddressValue), CalcError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CalcError::BadNetmask(text.to_string()));
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        // Saturate so that absurdly long digit strings report as out of range.
        let prefix = text.parse::<u32>().unwrap_or(u32::MAX);
        let netmask = prefix_to_netmask(prefix, reference.family())?;
        log::debug!("prefix /{prefix} -> netmask {netmask}");
        return Ok((prefix as u8, netmask));
    }
    let netmask: AddressValue = text
        .parse()
        .map_err(|_| CalcError::BadNetmask(text.to_string()))?;
    if netmask.family() != reference.family() {
        return Err(CalcError::FamilyMismatch {
            left: reference.family(),
            right: netmask.family(),
        });
    }
    let prefix = netmask_to_prefix(&netmask)?;
    log::debug!("netmask {netmask} -> prefix /{prefix}");
    Ok((prefix, netmask))
}
