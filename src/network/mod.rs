//! Packet and header models
//!
//! This module contains the data side of the crate:
//! - IPv6: fixed header view with field access and address mutation
//! - Packet: protocol, truncation flag, optional header and payload

pub mod ipv6;
pub mod packet;

// Re-export commonly used items
pub use ipv6::{Ipv6Header, IPV6_ADDR_LEN, IPV6_HEADER_LEN};
pub use packet::{ethertype, Packet};
