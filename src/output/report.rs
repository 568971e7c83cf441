//! The subnet report printed by the binary.

use super::render::{render_address, render_binary, RenderOptions};
use super::terminal::{continuation_indent, format_field};
use crate::error::CalcError;
use crate::models::{AddressValue, Subnet};
use crate::processing::{
    classify, is_multicast, Classification, Ipv4Class, Property, Request, Role, UnicastParts,
};
use colored::Colorize;
use serde::Serialize;

/// Everything known about one address/netmask pair.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    pub subnet: Subnet,
    pub max_hosts: Option<u128>,
    pub classification: Classification,
}

impl Report {
    pub fn new(request: &Request) -> Result<Report, CalcError> {
        let subnet = Subnet::new(request.address.value, request.netmask)?;
        let classification = classify(&subnet);
        Ok(Report {
            zone: request.address.zone.clone(),
            max_hosts: subnet.max_hosts(),
            subnet,
            classification,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn addr(&self, address: &AddressValue, opts: &RenderOptions) -> String {
        render_address(address, self.zone.as_deref(), opts)
    }

    /// The report as lines of text.
    pub fn render_lines(&self, opts: &RenderOptions) -> Vec<String> {
        let s = &self.subnet;
        let mut lines = Vec::new();

        lines.push(format_field("Address", self.addr(&s.address, opts)));
        let indent = continuation_indent();
        for row in render_binary(&s.address, s.prefix, opts) {
            lines.push(format!("{indent}{row}"));
        }
        lines.push(format_field(
            "Network",
            format!("{} / {}", self.addr(&s.network, opts), s.prefix),
        ));
        lines.push(format_field("Netmask", self.addr(&s.netmask, opts)));
        if s.address.is_ipv4() {
            if s.has_broadcast() {
                lines.push(format_field("Broadcast", self.addr(&s.broadcast, opts)));
            } else {
                lines.push(format_field(
                    "Broadcast",
                    "not needed on Point-to-Point links",
                ));
            }
        }
        lines.push(format_field("Wildcard Mask", self.addr(&s.wildcard, opts)));
        lines.push(format_field("Hosts Bits", s.host_bits));
        if !is_multicast(&s.address) {
            let max_hosts = match self.max_hosts {
                Some(n) if n > 0 => {
                    format!("{n}   (2^{} - {})", s.host_bits, s.reserved_hosts)
                }
                _ => format!("2^{} - {}", s.host_bits, s.reserved_hosts),
            };
            lines.push(format_field("Max. Hosts", max_hosts));
            lines.push(format_field(
                "Host Range",
                format!(
                    "{{ {} - {} }}",
                    self.addr(&s.first_host, opts),
                    self.addr(&s.last_host, opts)
                ),
            ));
        }

        lines.push("Properties    =".to_string());
        lines.push(self.role_line(opts));
        for property in &self.classification.properties {
            self.property_lines(property, opts, &mut lines);
        }
        lines
    }

    /// The report as one string.
    pub fn render_text(&self, opts: &RenderOptions) -> String {
        let mut text = self.render_lines(opts).join("\n");
        text.push('\n');
        text
    }

    fn role_line(&self, opts: &RenderOptions) -> String {
        let s = &self.subnet;
        let address = self.addr(&s.address, opts);
        let network = format!("{}/{}", self.addr(&s.network, opts), s.prefix);
        match self.classification.role {
            Role::Multicast => format!("   - {address} is a MULTICAST address"),
            Role::Network => format!("   - {address} is a NETWORK address"),
            Role::Broadcast => format!("   - {address} is the BROADCAST address of {network}"),
            Role::Host => format!("   - {address} is a HOST address in {network}"),
        }
    }

    fn property_lines(&self, property: &Property, opts: &RenderOptions, lines: &mut Vec<String>) {
        let v4 = self.subnet.address.is_ipv4();
        match property {
            Property::Class { class } => lines.push(match class {
                Ipv4Class::A => "   - Class A".to_string(),
                Ipv4Class::B => "   - Class B".to_string(),
                Ipv4Class::C => "   - Class C".to_string(),
                Ipv4Class::D => "   - Class D (Multicast)".to_string(),
                Ipv4Class::Invalid => "   - Invalid (not in class A, B, C or D)".to_string(),
            }),
            Property::Loopback => lines.push("   - Loopback address".to_string()),
            Property::InLoopbackNetwork => lines.push("   - In loopback network".to_string()),
            Property::Private => lines.push("   - Private".to_string()),
            Property::LinkLocal => lines.push("   - Link-local address".to_string()),
            Property::MulticastScope { scope } => {
                if !v4 {
                    lines.push("   - Multicast Properties".to_string());
                }
                lines.push(format!("      + Scope: {scope}"));
            }
            Property::TemporaryMulticast => {
                lines.push("      + Temporary-allocated address".to_string())
            }
            Property::MulticastMac { mac } => {
                lines.push(format!("      + Corresponding multicast MAC address: {mac}"))
            }
            Property::SourceSpecificMulticast => {
                lines.push("      + Source-specific multicast".to_string())
            }
            Property::SolicitedNodeMulticast { target_low_bits } => lines.push(format!(
                "      + Address is solicited node multicast address for xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xx{:02x}:{:04x}",
                target_low_bits >> 16,
                target_low_bits & 0xffff
            )),
            Property::Unspecified => lines.push("   - Unspecified address".to_string()),
            Property::Ipv4Compatible { ipv4 } => {
                lines.push("   - IPv4-compatible IPv6 address".to_string());
                lines.push(format!("      + Embedded IPv4 = {ipv4}"));
            }
            Property::Ipv4Mapped { ipv4 } => {
                lines.push("   - IPv4-mapped IPv6 address".to_string());
                lines.push(format!("      + Embedded IPv4 = {ipv4}"));
            }
            Property::Nat64 { ipv4 } => {
                lines.push("   - NAT64 address (IPv4/IPv6 translation prefix)".to_string());
                lines.push(format!("      + Embedded IPv4 = {ipv4}"));
            }
            Property::LinkLocalUnicast { unicast } => {
                lines.push("   - Link-Local Unicast Properties:".to_string());
                unicast_lines(unicast, opts, lines);
            }
            Property::SiteLocalUnicast { unicast } => {
                lines.push("   - Site-Local Unicast Properties:".to_string());
                unicast_lines(unicast, opts, lines);
            }
            Property::UniqueLocalUnicast {
                locally_chosen,
                unicast,
            } => {
                lines.push("   - Unique Local Unicast Properties:".to_string());
                if *locally_chosen {
                    lines.push("      + Locally chosen".to_string());
                } else {
                    lines.push("      + Assigned by global instance".to_string());
                }
                unicast_lines(unicast, opts, lines);
            }
            Property::GlobalUnicast { unicast } => {
                lines.push("   - Global Unicast Properties:".to_string());
                unicast_lines(unicast, opts, lines);
            }
            Property::SixToFour { ipv4 } => lines.push(format!("      + 6to4 address = {ipv4}")),
        }
    }
}

fn unicast_lines(unicast: &UnicastParts, opts: &RenderOptions, lines: &mut Vec<String>) {
    if let Some(global_id) = unicast.global_id_string() {
        lines.push(format!("      + Global ID    = {global_id}"));
    }
    if let Some(subnet_id) = unicast.subnet_id_string() {
        lines.push(format!("      + Subnet ID    = {subnet_id}"));
    }
    let interface_id = unicast.interface_id_string();
    if opts.color {
        lines.push(format!("      + Interface ID = {}", interface_id.cyan()));
    } else {
        lines.push(format!("      + Interface ID = {interface_id}"));
    }
    if let Some(mac) = unicast.mac {
        lines.push(format!("      + MAC address  = {mac}"));
    }
    let solicited = render_address(&unicast.solicited_node, None, opts);
    if opts.color {
        lines.push(format!("      + Sol. Node MC = {}", solicited.green()));
    } else {
        lines.push(format!("      + Sol. Node MC = {solicited}"));
    }
}
