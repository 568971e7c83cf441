//! Error type shared by the address model, the parsers and the binary.

use crate::models::Family;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Incompatible address families: {left} and {right}")]
    FamilyMismatch { left: Family, right: Family },
    #[error("Prefix length {prefix} is out of range for {family} (max {max})")]
    PrefixOutOfRange { prefix: u32, family: Family, max: u8 },
    #[error("Invalid netmask {0}")]
    InvalidNetmask(String),
    #[error("Unsupported address family: {0}")]
    UnsupportedFamily(String),
    #[error("Bad address {0}")]
    BadAddress(String),
    #[error("Bad netmask {0}")]
    BadNetmask(String),
    #[error("An IPv6 address must be given to generate a unique local address")]
    UniqueLocalRequiresIpv6,
    #[error("Unable to read random bytes: {0}")]
    Random(String),
}
