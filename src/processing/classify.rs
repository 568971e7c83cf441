//! Address classification.
//!
//! Maps a [`Subnet`] to its [`Role`] and an ordered list of [`Property`]
//! values. Classification never fails: every well-formed address gets a role,
//! and addresses in no known block simply yield fewer properties.

use crate::models::{AddressValue, Subnet};
use serde::Serialize;

/// `ff02::1:ff00:0/104`, the solicited-node multicast block.
pub const SOLICITED_NODE_PREFIX: u128 = 0xff02_0000_0000_0000_0000_0001_ff00_0000;
const LOW_24_BITS: u128 = 0x00ff_ffff;

/// What the address is inside its subnet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Multicast,
    Network,
    Broadcast,
    Host,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Ipv4Class {
    A,
    B,
    C,
    D,
    /// Not in class A, B, C or D.
    Invalid,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MulticastScope {
    NodeLocal,
    LinkLocal,
    SiteLocal,
    OrganizationLocal,
    Global,
    Unknown,
}

impl std::fmt::Display for MulticastScope {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            MulticastScope::NodeLocal => "node-local",
            MulticastScope::LinkLocal => "link-local",
            MulticastScope::SiteLocal => "site-local",
            MulticastScope::OrganizationLocal => "organization-local",
            MulticastScope::Global => "global",
            MulticastScope::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// MAC-48 address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Decomposition of an IPv6 unicast address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct UnicastParts {
    /// 40-bit global ID, unique-local addresses only.
    pub global_id: Option<u64>,
    pub subnet_id: Option<u16>,
    pub interface_id: u64,
    /// MAC recovered from a modified EUI-64 interface ID.
    pub mac: Option<MacAddress>,
    pub solicited_node: AddressValue,
}

impl UnicastParts {
    fn new(address: u128, has_subnet_id: bool, has_global_id: bool) -> UnicastParts {
        let interface_id = address as u64;
        UnicastParts {
            global_id: has_global_id.then_some(((address >> 80) as u64) & 0xff_ffff_ffff),
            subnet_id: has_subnet_id.then_some((address >> 64) as u16),
            interface_id,
            mac: eui64_mac(interface_id),
            solicited_node: solicited_node_address(address),
        }
    }

    pub fn global_id_string(&self) -> Option<String> {
        self.global_id.map(|id| format!("{id:010x}"))
    }

    pub fn subnet_id_string(&self) -> Option<String> {
        self.subnet_id.map(|id| format!("{id:04x}"))
    }

    pub fn interface_id_string(&self) -> String {
        let iid = self.interface_id;
        format!(
            "{:04x}:{:04x}:{:04x}:{:04x}",
            (iid >> 48) as u16,
            (iid >> 32) as u16,
            (iid >> 16) as u16,
            iid as u16
        )
    }
}

/// One classification result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Property {
    Class { class: Ipv4Class },
    /// The canonical loopback address `127.0.0.1` or `::1`.
    Loopback,
    InLoopbackNetwork,
    Private,
    LinkLocal,
    MulticastScope { scope: MulticastScope },
    MulticastMac { mac: MacAddress },
    SourceSpecificMulticast,
    TemporaryMulticast,
    /// Solicited-node multicast address for targets ending in these 24 bits.
    SolicitedNodeMulticast { target_low_bits: u32 },
    Unspecified,
    Ipv4Compatible { ipv4: AddressValue },
    Ipv4Mapped { ipv4: AddressValue },
    Nat64 { ipv4: AddressValue },
    LinkLocalUnicast { unicast: UnicastParts },
    SiteLocalUnicast { unicast: UnicastParts },
    UniqueLocalUnicast { locally_chosen: bool, unicast: UnicastParts },
    GlobalUnicast { unicast: UnicastParts },
    SixToFour { ipv4: AddressValue },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub role: Role,
    pub properties: Vec<Property>,
}

impl Classification {
    pub fn contains(&self, property: &Property) -> bool {
        self.properties.contains(property)
    }
}

/// Classify the address of a subnet.
pub fn classify(subnet: &Subnet) -> Classification {
    classify_parts(subnet.address, subnet.network, subnet.broadcast, subnet.prefix)
}

/// Classify from loose values. `network` and `broadcast` only decide the
/// role; `prefix` is used for logging.
pub fn classify_parts(
    address: AddressValue,
    network: AddressValue,
    broadcast: AddressValue,
    prefix: u8,
) -> Classification {
    let role = if is_multicast(&address) {
        Role::Multicast
    } else if address == network {
        Role::Network
    } else if address.is_ipv4() && address == broadcast {
        Role::Broadcast
    } else {
        Role::Host
    };

    let properties = match address {
        AddressValue::V4(a) => classify_v4(a),
        AddressValue::V6(a) => classify_v6(a),
    };
    log::debug!("{address}/{prefix}: {role:?} {properties:?}");

    Classification { role, properties }
}

pub fn is_multicast(address: &AddressValue) -> bool {
    match *address {
        AddressValue::V4(a) => a & 0xF000_0000 == 0xE000_0000,
        AddressValue::V6(a) => a >> 120 == 0xff,
    }
}

/// Solicited-node multicast address of any IPv6 address.
pub fn solicited_node_address(address: u128) -> AddressValue {
    AddressValue::V6(SOLICITED_NODE_PREFIX | (address & LOW_24_BITS))
}

fn eui64_mac(interface_id: u64) -> Option<MacAddress> {
    let b = interface_id.to_be_bytes();
    if b[3] == 0xff && b[4] == 0xfe {
        Some(MacAddress([b[0] ^ 0x02, b[1], b[2], b[5], b[6], b[7]]))
    } else {
        None
    }
}

fn classify_v4(a: u32) -> Vec<Property> {
    let first = a >> 24;
    let second = (a >> 16) & 0xff;
    let mut props = Vec::new();

    if a & 0x8000_0000 == 0 {
        props.push(Property::Class {
            class: Ipv4Class::A,
        });
        if a == u32::from(std::net::Ipv4Addr::LOCALHOST) {
            props.push(Property::Loopback);
        } else if first == 127 {
            props.push(Property::InLoopbackNetwork);
        } else if first == 10 {
            props.push(Property::Private);
        }
    } else if a & 0xC000_0000 == 0x8000_0000 {
        props.push(Property::Class {
            class: Ipv4Class::B,
        });
        if first == 172 && (16..=31).contains(&second) {
            props.push(Property::Private);
        } else if first == 169 && second == 254 {
            props.push(Property::LinkLocal);
        }
    } else if a & 0xE000_0000 == 0xC000_0000 {
        props.push(Property::Class {
            class: Ipv4Class::C,
        });
        if first == 192 && second == 168 {
            props.push(Property::Private);
        }
    } else if a & 0xF000_0000 == 0xE000_0000 {
        props.push(Property::Class {
            class: Ipv4Class::D,
        });
        let scope = match (first, second) {
            (224, _) => MulticastScope::LinkLocal,
            (239, 192..=251) => MulticastScope::OrganizationLocal,
            (239, 252..=255) => MulticastScope::SiteLocal,
            _ => MulticastScope::Global,
        };
        props.push(Property::MulticastScope { scope });
        let low = (a & 0x007f_ffff).to_be_bytes();
        props.push(Property::MulticastMac {
            mac: MacAddress([0x01, 0x00, 0x5e, low[1], low[2], low[3]]),
        });
        if first == 232 {
            props.push(Property::SourceSpecificMulticast);
        }
    } else {
        props.push(Property::Class {
            class: Ipv4Class::Invalid,
        });
    }
    props
}

/// 16-bit group `i` (0 = most significant).
fn segment(a: u128, i: u32) -> u16 {
    (a >> (112 - 16 * i)) as u16
}

fn classify_v6(a: u128) -> Vec<Property> {
    let first = segment(a, 0);
    let mut props = Vec::new();

    if a == 1 {
        props.push(Property::Loopback);
    } else if a == 0 {
        props.push(Property::Unspecified);
    } else if a >> 32 == 0 && (a as u32) > 1 {
        props.push(Property::Ipv4Compatible {
            ipv4: AddressValue::V4(a as u32),
        });
    } else if a >> 32 == 0xffff {
        props.push(Property::Ipv4Mapped {
            ipv4: AddressValue::V4(a as u32),
        });
    } else if has_translation_prefix(a) {
        props.push(Property::Nat64 {
            ipv4: AddressValue::V4(a as u32),
        });
    } else if a >> 120 == 0xff {
        let flags_scope = (a >> 112) as u8;
        let scope = match flags_scope & 0x0f {
            0x1 => MulticastScope::NodeLocal,
            0x2 => MulticastScope::LinkLocal,
            0x5 => MulticastScope::SiteLocal,
            0x8 => MulticastScope::OrganizationLocal,
            0xe => MulticastScope::Global,
            _ => MulticastScope::Unknown,
        };
        props.push(Property::MulticastScope { scope });
        if flags_scope >> 4 == 0x1 {
            props.push(Property::TemporaryMulticast);
        }
        let low = (a as u32).to_be_bytes();
        props.push(Property::MulticastMac {
            mac: MacAddress([0x33, 0x33, low[0], low[1], low[2], low[3]]),
        });
        if first & 0xfff0 == 0xff30 && segment(a, 1) == 0 {
            props.push(Property::SourceSpecificMulticast);
        }
        if a & !LOW_24_BITS == SOLICITED_NODE_PREFIX {
            props.push(Property::SolicitedNodeMulticast {
                target_low_bits: (a & LOW_24_BITS) as u32,
            });
        }
    } else if first & 0xffc0 == 0xfe80 {
        props.push(Property::LinkLocalUnicast {
            unicast: UnicastParts::new(a, false, false),
        });
    } else if first & 0xffc0 == 0xfec0 {
        props.push(Property::SiteLocalUnicast {
            unicast: UnicastParts::new(a, true, false),
        });
    } else if first & 0xfe00 == 0xfc00 {
        props.push(Property::UniqueLocalUnicast {
            locally_chosen: first & 0x0100 != 0,
            unicast: UnicastParts::new(a, true, true),
        });
    } else if first & 0xe000 == 0x2000 {
        props.push(Property::GlobalUnicast {
            unicast: UnicastParts::new(a, false, false),
        });
        if first == 0x2002 {
            props.push(Property::SixToFour {
                ipv4: AddressValue::V4((a >> 80) as u32),
            });
        }
    }
    props
}

/// `64:ff9b::/96` and the local-use `64:ff9b:1::/48`.
pub fn has_translation_prefix(a: u128) -> bool {
    segment(a, 0) == 0x0064 && segment(a, 1) == 0xff9b && segment(a, 2) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prefix_to_netmask;

    fn classify_str(addr: &str, prefix: u32) -> Classification {
        let address: AddressValue = addr.parse().unwrap();
        let netmask = prefix_to_netmask(prefix, address.family()).unwrap();
        classify(&Subnet::new(address, netmask).unwrap())
    }

    fn a(s: &str) -> AddressValue {
        s.parse().unwrap()
    }

    fn unicast_of(c: &Classification) -> UnicastParts {
        c.properties
            .iter()
            .find_map(|p| match p {
                Property::LinkLocalUnicast { unicast }
                | Property::SiteLocalUnicast { unicast }
                | Property::UniqueLocalUnicast { unicast, .. }
                | Property::GlobalUnicast { unicast } => Some(*unicast),
                _ => None,
            })
            .expect("no unicast property")
    }

    #[test]
    fn test_role() {
        assert_eq!(classify_str("192.168.1.10", 24).role, Role::Host);
        assert_eq!(classify_str("192.168.1.0", 24).role, Role::Network);
        assert_eq!(classify_str("192.168.1.255", 24).role, Role::Broadcast);
        assert_eq!(classify_str("224.0.0.1", 32).role, Role::Multicast);
        assert_eq!(classify_str("2001:db8::", 64).role, Role::Network);
        assert_eq!(classify_str("2001:db8::1", 64).role, Role::Host);
        // No broadcast concept for IPv6.
        assert_eq!(
            classify_str("2001:db8::ffff:ffff:ffff:ffff", 64).role,
            Role::Host
        );
        assert_eq!(classify_str("ff02::1", 128).role, Role::Multicast);
    }

    #[test]
    fn test_classify_parts_matches_subnet() {
        let c = classify_parts(a("10.0.0.255"), a("10.0.0.0"), a("10.0.0.255"), 24);
        assert_eq!(c, classify_str("10.0.0.255", 24));
        assert_eq!(c.role, Role::Broadcast);
        let broadcast = a("febf:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
        let c = classify_parts(a("fe80::"), a("fe80::"), broadcast, 10);
        assert_eq!(c.role, Role::Network);
        assert!(matches!(c.properties[0], Property::LinkLocalUnicast { .. }));
    }

    #[test]
    fn test_v4_private_class_c() {
        let c = classify_str("192.168.1.10", 24);
        assert_eq!(
            c.properties,
            vec![
                Property::Class {
                    class: Ipv4Class::C
                },
                Property::Private
            ]
        );
    }

    #[test]
    fn test_v4_class_a() {
        let c = classify_str("127.0.0.1", 8);
        assert!(c.contains(&Property::Loopback));
        let c = classify_str("127.1.2.3", 8);
        assert!(c.contains(&Property::InLoopbackNetwork));
        assert!(!c.contains(&Property::Loopback));
        let c = classify_str("10.9.8.7", 8);
        assert!(c.contains(&Property::Private));
        let c = classify_str("8.8.8.8", 24);
        assert_eq!(
            c.properties,
            vec![Property::Class {
                class: Ipv4Class::A
            }]
        );
    }

    #[test]
    fn test_v4_class_b() {
        assert!(classify_str("172.16.0.1", 12).contains(&Property::Private));
        assert!(classify_str("172.31.255.1", 12).contains(&Property::Private));
        assert!(!classify_str("172.32.0.1", 12).contains(&Property::Private));
        let c = classify_str("169.254.1.1", 16);
        assert_eq!(
            c.properties,
            vec![
                Property::Class {
                    class: Ipv4Class::B
                },
                Property::LinkLocal
            ]
        );
    }

    #[test]
    fn test_v4_multicast() {
        let c = classify_str("224.0.0.1", 32);
        assert_eq!(
            c.properties,
            vec![
                Property::Class {
                    class: Ipv4Class::D
                },
                Property::MulticastScope {
                    scope: MulticastScope::LinkLocal
                },
                Property::MulticastMac {
                    mac: MacAddress([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01])
                },
            ]
        );
    }

    #[test]
    fn test_v4_multicast_scopes_and_ssm() {
        let scope_of = |addr: &str| {
            classify_str(addr, 32)
                .properties
                .iter()
                .find_map(|p| match p {
                    Property::MulticastScope { scope } => Some(*scope),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(scope_of("239.192.0.1"), MulticastScope::OrganizationLocal);
        assert_eq!(scope_of("239.251.0.1"), MulticastScope::OrganizationLocal);
        assert_eq!(scope_of("239.252.0.1"), MulticastScope::SiteLocal);
        assert_eq!(scope_of("239.255.255.250"), MulticastScope::SiteLocal);
        assert_eq!(scope_of("239.1.0.1"), MulticastScope::Global);
        assert_eq!(scope_of("225.0.0.1"), MulticastScope::Global);

        let c = classify_str("232.129.2.3", 32);
        assert!(c.contains(&Property::SourceSpecificMulticast));
        // Only the low 23 bits reach the MAC.
        assert!(c.contains(&Property::MulticastMac {
            mac: MacAddress([0x01, 0x00, 0x5e, 0x01, 0x02, 0x03])
        }));
    }

    #[test]
    fn test_v4_class_e_is_invalid() {
        let c = classify_str("240.0.0.1", 8);
        assert_eq!(
            c.properties,
            vec![Property::Class {
                class: Ipv4Class::Invalid
            }]
        );
    }

    #[test]
    fn test_v6_special() {
        assert_eq!(classify_str("::1", 128).properties, vec![Property::Loopback]);
        assert_eq!(
            classify_str("::", 0).properties,
            vec![Property::Unspecified]
        );
        assert_eq!(
            classify_str("::192.0.2.1", 96).properties,
            vec![Property::Ipv4Compatible {
                ipv4: a("192.0.2.1")
            }]
        );
        assert_eq!(
            classify_str("::ffff:192.0.2.1", 96).properties,
            vec![Property::Ipv4Mapped {
                ipv4: a("192.0.2.1")
            }]
        );
    }

    #[test]
    fn test_v6_nat64() {
        assert_eq!(
            classify_str("64:ff9b::192.0.2.33", 96).properties,
            vec![Property::Nat64 {
                ipv4: a("192.0.2.33")
            }]
        );
        assert_eq!(
            classify_str("64:ff9b:1::a00:1", 48).properties,
            vec![Property::Nat64 {
                ipv4: a("10.0.0.1")
            }]
        );
        assert!(!has_translation_prefix(0x0064_ff9b_0002_0000_0000_0000_0000_0001));
    }

    #[test]
    fn test_v6_multicast() {
        let c = classify_str("ff02::1", 128);
        assert_eq!(
            c.properties,
            vec![
                Property::MulticastScope {
                    scope: MulticastScope::LinkLocal
                },
                Property::MulticastMac {
                    mac: MacAddress([0x33, 0x33, 0x00, 0x00, 0x00, 0x01])
                },
            ]
        );

        let c = classify_str("ff15::1234", 128);
        assert!(c.contains(&Property::MulticastScope {
            scope: MulticastScope::SiteLocal
        }));
        assert!(c.contains(&Property::TemporaryMulticast));

        assert!(classify_str("ff01::1", 128).contains(&Property::MulticastScope {
            scope: MulticastScope::NodeLocal
        }));
        assert!(classify_str("ff08::1", 128).contains(&Property::MulticastScope {
            scope: MulticastScope::OrganizationLocal
        }));
        assert!(classify_str("ff0e::1", 128).contains(&Property::MulticastScope {
            scope: MulticastScope::Global
        }));
        assert!(classify_str("ff04::1", 128).contains(&Property::MulticastScope {
            scope: MulticastScope::Unknown
        }));
    }

    #[test]
    fn test_v6_ssm() {
        assert!(classify_str("ff3e::8000:1", 128).contains(&Property::SourceSpecificMulticast));
        assert!(!classify_str("ff3e:1::8000:1", 128).contains(&Property::SourceSpecificMulticast));
        assert!(!classify_str("ff1e::8000:1", 128).contains(&Property::SourceSpecificMulticast));
    }

    #[test]
    fn test_v6_solicited_node_detection() {
        let c = classify_str("ff02::1:ff12:3456", 128);
        assert!(c.contains(&Property::SolicitedNodeMulticast {
            target_low_bits: 0x12_3456
        }));
        assert!(!classify_str("ff02::2:ff12:3456", 128)
            .properties
            .iter()
            .any(|p| matches!(p, Property::SolicitedNodeMulticast { .. })));
    }

    #[test]
    fn test_v6_link_local() {
        let c = classify_str("fe80::1", 10);
        assert_eq!(c.properties.len(), 1);
        let u = unicast_of(&c);
        assert!(matches!(c.properties[0], Property::LinkLocalUnicast { .. }));
        assert_eq!(u.global_id, None);
        assert_eq!(u.subnet_id, None);
        assert_eq!(u.interface_id_string(), "0000:0000:0000:0001");
        assert_eq!(u.mac, None);
        assert_eq!(u.solicited_node, a("ff02::1:ff00:1"));
    }

    #[test]
    fn test_v6_eui64_mac() {
        let c = classify_str("fe80::21a:2bff:fe3c:4d5e", 64);
        let u = unicast_of(&c);
        assert_eq!(u.interface_id_string(), "021a:2bff:fe3c:4d5e");
        assert_eq!(u.mac.unwrap().to_string(), "00:1a:2b:3c:4d:5e");
        assert_eq!(u.solicited_node, a("ff02::1:ff3c:4d5e"));
    }

    #[test]
    fn test_v6_site_local() {
        let c = classify_str("fec0::1:0:0:0:2", 64);
        assert!(matches!(c.properties[0], Property::SiteLocalUnicast { .. }));
        let u = unicast_of(&c);
        assert_eq!(u.subnet_id_string().unwrap(), "0001");
        assert_eq!(u.global_id, None);
    }

    #[test]
    fn test_v6_unique_local() {
        let c = classify_str("fd12:3456:789a:1::1", 64);
        match c.properties[0] {
            Property::UniqueLocalUnicast {
                locally_chosen,
                unicast,
            } => {
                assert!(locally_chosen);
                assert_eq!(unicast.global_id_string().unwrap(), "123456789a");
                assert_eq!(unicast.subnet_id_string().unwrap(), "0001");
                assert_eq!(unicast.solicited_node, a("ff02::1:ff00:1"));
            }
            ref other => panic!("unexpected {other:?}"),
        }
        let c = classify_str("fc00::1", 64);
        assert!(matches!(
            c.properties[0],
            Property::UniqueLocalUnicast {
                locally_chosen: false,
                ..
            }
        ));
        // fe00::/9 lies outside fc00::/7.
        assert!(classify_str("fe00::1", 64).properties.is_empty());
    }

    #[test]
    fn test_v6_global_unicast() {
        let c = classify_str("2001:db8::1", 64);
        assert_eq!(c.properties.len(), 1);
        assert_eq!(unicast_of(&c).solicited_node, a("ff02::1:ff00:1"));
    }

    #[test]
    fn test_v6_six_to_four() {
        let c = classify_str("2002:c000:0204::1", 48);
        assert!(c.contains(&Property::SixToFour {
            ipv4: a("192.0.2.4")
        }));
        assert!(!classify_str("2003::1", 64)
            .properties
            .iter()
            .any(|p| matches!(p, Property::SixToFour { .. })));
    }

    #[test]
    fn test_solicited_node_address() {
        assert_eq!(
            solicited_node_address(u128::from(
                "2001:db8::aabb:ccdd".parse::<std::net::Ipv6Addr>().unwrap()
            )),
            a("ff02::1:ffbb:ccdd")
        );
    }

    #[test]
    fn test_serialize_property() {
        let json = serde_json::to_string(&Property::MulticastScope {
            scope: MulticastScope::OrganizationLocal,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"kind":"multicast_scope","scope":"organization-local"}"#
        );
    }
}
