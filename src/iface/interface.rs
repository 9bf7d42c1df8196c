//! TUN/TAP interface handle
//!
//! An `Interface` owns one open device and the name the platform resolved for
//! it. It provides:
//! - Opening through a `Platform` (kernel TUN/TAP by default)
//! - Blocking packet reads and writes through the frame codec
//! - Explicit, single close
//!
//! Reads and writes take `&mut self`, so sharing a handle between threads needs
//! external synchronisation. `close` consumes the handle and cannot overlap
//! with I/O.

use crate::device::{DevKind, Device, Platform, TunTapDevice, TunTapPlatform};
use crate::error::{Result, TunTapError};
use crate::iface::codec::{FrameCodec, Framing};
use crate::iface::config::InterfaceConfig;
use crate::network::packet::Packet;

/// An open TUN/TAP interface
pub struct Interface<D: Device = TunTapDevice> {
    name: String,
    kind: DevKind,
    device: D,
    codec: FrameCodec,
    /// Reused for every read
    read_buf: Vec<u8>,
}

impl Interface<TunTapDevice> {
    /// Connect to the kernel interface named by `pattern`
    ///
    /// If the interface was configured as persistent this looks like a "cable
    /// connected" event to its observers; otherwise it is created on the spot.
    /// `pattern` may be an exact name ("tun42") or contain one `%d` ("tun%d"),
    /// in which case the kernel picks a free name, available from `name()`.
    ///
    /// `meta` selects whether frames carry the flags/protocol prefix.
    pub fn open(pattern: &str, kind: DevKind, meta: bool) -> Result<Self> {
        let config = InterfaceConfig::new(pattern)
            .with_kind(kind)
            .with_meta(meta);
        Self::open_with(&TunTapPlatform, config)
    }
}

impl<D: Device> Interface<D> {
    /// Open an interface through an arbitrary platform
    ///
    /// If the platform fails to create the interface, the device it opened is
    /// closed and the platform's error is returned unchanged.
    pub fn open_with<P>(platform: &P, config: InterfaceConfig) -> Result<Self>
    where
        P: Platform<Device = D>,
    {
        let mut device = platform.open_device(&config.name)?;

        let name =
            match platform.create_interface(&mut device, &config.name, config.kind, config.meta) {
                Ok(name) => name,
                Err(e) => {
                    if let Err(close_err) = device.close() {
                        log::warn!("Failed to close device for {}: {}", config.name, close_err);
                    }
                    return Err(TunTapError::Io(e));
                }
            };

        log::debug!(
            "Opened {:?} interface {} (meta: {}, framing: {:?})",
            config.kind,
            name,
            config.meta,
            config.framing
        );
        Ok(Self::from_device(device, name, &config))
    }

    /// Wrap a device that is already attached to `name`
    pub fn from_device(device: D, name: impl Into<String>, config: &InterfaceConfig) -> Self {
        Interface {
            name: name.into(),
            kind: config.kind,
            device,
            codec: FrameCodec::new(config.meta, config.framing),
            read_buf: vec![0u8; config.read_buffer_size],
        }
    }

    /// Resolved interface name; may differ from the pattern given to `open`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DevKind {
        self.kind
    }

    pub fn meta(&self) -> bool {
        self.codec.meta()
    }

    pub fn framing(&self) -> Framing {
        self.codec.framing()
    }

    /// Underlying device, for callers that need the raw handle
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Read a single packet, blocking until the device delivers a frame
    pub fn read_packet(&mut self) -> Result<Packet> {
        let nbytes = self.device.recv(&mut self.read_buf)?;

        match self.codec.decode(&self.read_buf[..nbytes]) {
            Ok(packet) => Ok(packet),
            Err(e) => {
                log::debug!("Dropping frame on {} ({} bytes): {}", self.name, nbytes, e);
                Err(e)
            }
        }
    }

    /// Write a single packet
    ///
    /// A device accepting fewer bytes than the encoded frame yields
    /// `ShortWrite`; the partial write is not retried. Packets that cannot be
    /// encoded are rejected before anything reaches the device.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let frame = self.codec.encode(packet)?;
        let written = self.device.send(&frame)?;

        if written != frame.len() {
            return Err(TunTapError::ShortWrite {
                written,
                expected: frame.len(),
            });
        }
        Ok(())
    }

    /// Disconnect from the interface
    ///
    /// Non-persistent interfaces are destroyed by the kernel at this point.
    pub fn close(self) -> Result<()> {
        log::debug!("Closing interface {}", self.name);
        self.device.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Loopback, LoopbackPlatform};
    use crate::network::packet::ethertype;
    use std::io;

    fn open_loopback(config: InterfaceConfig) -> (Interface<Loopback>, Loopback) {
        let platform = LoopbackPlatform::default();
        let handle = platform.device().clone();
        let iface = Interface::open_with(&platform, config).unwrap();
        (iface, handle)
    }

    #[test]
    fn test_open_resolves_name() {
        let (iface, _) = open_loopback(InterfaceConfig::new("tap%d").with_kind(DevKind::Tap));
        assert_eq!(iface.name(), "tap0");
        assert_eq!(iface.kind(), DevKind::Tap);
        assert!(!iface.meta());
        assert_eq!(iface.framing(), Framing::Metadata);
    }

    #[test]
    fn test_open_failure_closes_device() {
        let device = Loopback::new();
        let platform = LoopbackPlatform::new(device.clone())
            .with_create_failure(io::ErrorKind::PermissionDenied);

        let result = Interface::open_with(&platform, InterfaceConfig::new("tun0"));
        match result {
            Err(TunTapError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("expected an IO error"),
        }
        assert_eq!(device.close_count(), 1);
    }

    #[test]
    fn test_open_device_failure() {
        let device = Loopback::new();
        let platform =
            LoopbackPlatform::new(device.clone()).with_open_failure(io::ErrorKind::NotFound);

        let result = Interface::open_with(&platform, InterfaceConfig::new("tun0"));
        assert!(matches!(result, Err(TunTapError::Io(ref e)) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(device.close_count(), 0);
    }

    #[test]
    fn test_short_write() {
        let (mut iface, handle) = open_loopback(InterfaceConfig::new("tun0").with_meta(true));
        handle.set_write_limit(Some(5));

        let result = iface.write_packet(&Packet::new(ethertype::IPV6, vec![0u8; 10]));
        assert!(matches!(
            result,
            Err(TunTapError::ShortWrite { written: 5, expected: 14 })
        ));
    }

    #[test]
    fn test_read_error_propagates() {
        let (mut iface, _) = open_loopback(InterfaceConfig::new("tun0"));
        match iface.read_packet() {
            Err(TunTapError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::WouldBlock),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_buffer_limits_frame() {
        let (mut iface, handle) =
            open_loopback(InterfaceConfig::new("tun0").with_read_buffer_size(16));
        handle.inject_frame(vec![1u8; 100]);

        let packet = iface.read_packet().unwrap();
        assert_eq!(packet.payload.len(), 16);
    }

    #[test]
    fn test_close_once() {
        let (iface, handle) = open_loopback(InterfaceConfig::default());
        iface.close().unwrap();
        assert_eq!(handle.close_count(), 1);
    }
}
