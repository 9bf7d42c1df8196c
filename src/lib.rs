//! Portable TUN/TAP packet interfaces
//!
//! This library lets you attach to TUN/TAP virtual network interfaces and
//! exchange packets with them:
//! - Layer 3 (TUN) and layer 2 (TAP) interfaces
//! - Optional 4-byte flags/protocol metadata prefix
//! - IPv6 fixed header views with field access and address mutation
//! - Pluggable device platforms (kernel TUN/TAP, in-memory loopback)
//!
//! It does not configure interfaces (addresses, routes, MTU); that is left to
//! external tooling.

pub mod device;
pub mod error;
pub mod iface;
pub mod network;

// Re-export commonly used types
pub use device::{DevKind, Device, Loopback, LoopbackPlatform, Platform, TunTapDevice, TunTapPlatform};
pub use error::{Result, TunTapError};
pub use iface::{FrameCodec, Framing, Interface, InterfaceConfig};
pub use network::{ethertype, Ipv6Header, Packet};
