//! Device layer
//!
//! The framing core only needs a byte stream that reads and writes whole frames,
//! plus a way to create or attach to a named interface. Both are expressed as
//! traits so the kernel-backed implementation and the in-memory loopback are
//! interchangeable:
//! - `Device`: one open handle to a TUN/TAP character device
//! - `Platform`: opens devices and binds them to an interface name
//!
//! Interface configuration (addresses, routes, MTU) is left to the caller.

pub mod loopback;
pub mod tuntap;

use std::io;

pub use loopback::{Loopback, LoopbackPlatform};
pub use tuntap::{TunTapDevice, TunTapPlatform};

/// Kind of virtual interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevKind {
    /// Routable layer 3 packets (IPv4, IPv6...). Link-local multicast is not
    /// delivered on this kind of interface.
    Tun,
    /// Ethernet II frames, including broadcast and multicast traffic.
    Tap,
}

/// An open device stream
///
/// Each `recv` returns at most one frame and each `send` writes at most one.
pub trait Device {
    /// Read a single frame into `buf`, returning the number of bytes read
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write a single frame, returning the number of bytes accepted
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Release the device
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

/// Creates devices and attaches them to named interfaces
pub trait Platform {
    type Device: Device;

    /// Open a fresh device handle
    fn open_device(&self, pattern: &str) -> io::Result<Self::Device>;

    /// Bind `device` to the interface named by `pattern`, returning the name
    /// the platform actually assigned
    ///
    /// `pattern` is either an exact name ("tun42") or contains one `%d`
    /// placeholder ("tun%d") for the platform to fill in.
    fn create_interface(
        &self,
        device: &mut Self::Device,
        pattern: &str,
        kind: DevKind,
        meta: bool,
    ) -> io::Result<String>;
}
