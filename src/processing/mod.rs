//! Address processing logic.
//!
//! This module contains the logic between raw input and output:
//! - [`input`] - Parsing command-line text into a [`Request`]
//! - [`classify`] - Role and property classification of an address

mod classify;
mod input;

// Re-export public types and functions
pub use classify::{
    classify, classify_parts, has_translation_prefix, is_multicast, solicited_node_address,
    Classification, Ipv4Class, MacAddress, MulticastScope, Property, Role, UnicastParts,
    SOLICITED_NODE_PREFIX,
};
pub use input::{
    generate_unique_local, parse_address, parse_request, with_unique_local_prefix, HostAddress,
    RandomSource, Request,
};
