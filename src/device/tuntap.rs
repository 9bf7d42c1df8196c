//! Kernel TUN/TAP devices backed by the `tun-tap` crate
//!
//! `tun-tap` opens `/dev/net/tun` and attaches it to an interface in a single
//! call, so `open_device` hands out an unattached handle and the real work
//! happens in `create_interface`. Root (or CAP_NET_ADMIN) is required.

use std::io;

use tun_tap::{Iface, Mode};

use super::{DevKind, Device, Platform};

/// Handle to a kernel TUN/TAP device
pub struct TunTapDevice {
    iface: Option<Iface>,
}

impl TunTapDevice {
    /// Underlying `tun-tap` interface, once attached
    pub fn iface(&self) -> Option<&Iface> {
        self.iface.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.iface.is_some()
    }

    fn attached(&self) -> io::Result<&Iface> {
        self.iface.as_ref().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                "device is not attached to an interface",
            )
        })
    }
}

impl Device for TunTapDevice {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.attached()?.recv(buf)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.attached()?.send(buf)
    }
}

/// Platform creating interfaces through the Linux TUN/TAP driver
#[derive(Debug, Clone, Copy, Default)]
pub struct TunTapPlatform;

impl Platform for TunTapPlatform {
    type Device = TunTapDevice;

    fn open_device(&self, _pattern: &str) -> io::Result<TunTapDevice> {
        Ok(TunTapDevice { iface: None })
    }

    fn create_interface(
        &self,
        device: &mut TunTapDevice,
        pattern: &str,
        kind: DevKind,
        meta: bool,
    ) -> io::Result<String> {
        let mode = match kind {
            DevKind::Tun => Mode::Tun,
            DevKind::Tap => Mode::Tap,
        };

        // Packet info is the kernel's 4-byte flags/protocol prefix
        let iface = if meta {
            Iface::new(pattern, mode)?
        } else {
            Iface::without_packet_info(pattern, mode)?
        };

        let name = iface.name().to_string();
        device.iface = Some(iface);
        Ok(name)
    }
}
