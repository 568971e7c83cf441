//! Address value model.
//!
//! - [`AddressValue`] - IPv4 or IPv6 address as a fixed-width integer
//! - [`prefix_to_netmask`], [`netmask_to_prefix`], [`parse_prefix_or_netmask`] - prefix handling
//! - [`Subnet`] - network, broadcast and host range derived from address and netmask

mod address;
mod prefix;
mod subnet;

// Re-export public types
pub use address::{AddressValue, Family};
pub use prefix::{netmask_to_prefix, parse_prefix_or_netmask, prefix_to_netmask};
pub use subnet::{Subnet, MAX_COUNTED_HOST_BITS};
