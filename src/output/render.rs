//! Address to text rendering.

use crate::models::AddressValue;
use crate::processing::has_translation_prefix;
use colored::Colorize;
use itertools::Itertools;
use std::net::Ipv6Addr;

/// How addresses are turned into text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colours.
    pub color: bool,
    /// Never append an IPv6 zone (`%eth0`). On by default.
    pub hide_scope: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            color: true,
            hide_scope: true,
        }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        RenderOptions {
            color: false,
            ..RenderOptions::default()
        }
    }
}

/// Canonical text of an address.
///
/// NAT64 addresses show their embedded IPv4 address in dotted-quad form, and
/// link-local unicast or multicast addresses carry their zone unless
/// `hide_scope` is set.
pub fn render_address(address: &AddressValue, zone: Option<&str>, opts: &RenderOptions) -> String {
    let AddressValue::V6(a) = *address else {
        return address.to_string();
    };

    let mut text = if has_translation_prefix(a) {
        render_embedded_ipv4(a)
    } else {
        Ipv6Addr::from(a).to_string()
    };

    if let Some(zone) = zone {
        if !opts.hide_scope && is_link_scoped(a) {
            text.push('%');
            text.push_str(zone);
        }
    }
    text
}

fn render_embedded_ipv4(a: u128) -> String {
    // Format with a predictable suffix, then swap it for the IPv4 address.
    let with_suffix = Ipv6Addr::from(a | 0xffff_ffff).to_string();
    let ipv4 = std::net::Ipv4Addr::from(a as u32);
    match with_suffix.strip_suffix("ffff:ffff") {
        Some(prefix) => format!("{prefix}{ipv4}"),
        None => Ipv6Addr::from(a).to_string(),
    }
}

fn is_link_scoped(a: u128) -> bool {
    let first = (a >> 112) as u16;
    first & 0xffc0 == 0xfe80 || first & 0xff0f == 0xff02
}

fn paint_bit(bit: bool, in_network: bool, opts: &RenderOptions) -> String {
    let digit = if bit { "1" } else { "0" };
    match (opts.color, in_network) {
        (false, _) => digit.to_string(),
        (true, true) => digit.yellow().to_string(),
        (true, false) => digit.blue().to_string(),
    }
}

/// Render `count` bits starting at bit index `start` (0 is the MSB).
fn paint_bits(address: &AddressValue, start: u8, count: u8, prefix: u8, opts: &RenderOptions) -> String {
    let width = address.family().width();
    let bits = address.bits();
    (start..start + count)
        .map(|i| {
            let bit = (bits >> (width - 1 - i)) & 1 == 1;
            paint_bit(bit, i < prefix, opts)
        })
        .collect()
}

/// Bit-level dump of an address, one line for IPv4 and one line per 16-bit
/// group for IPv6. Network bits are yellow and host bits blue.
pub fn render_binary(address: &AddressValue, prefix: u8, opts: &RenderOptions) -> Vec<String> {
    match address {
        AddressValue::V4(_) => {
            let line = (0..4u8)
                .map(|octet| paint_bits(address, octet * 8, 8, prefix, opts))
                .join(" . ");
            vec![line]
        }
        AddressValue::V6(_) => (0..8u8)
            .zip(address.segments())
            .map(|(group, segment)| {
                let halves = (0..2u8)
                    .map(|half| paint_bits(address, group * 16 + half * 8, 8, prefix, opts))
                    .join(" ");
                format!("{segment:04x} = {halves}")
            })
            .collect(),
    }
}
