//! Packet representation exchanged with a TUN/TAP interface
//!
//! A packet is plain data. Turning it into wire bytes (and back) is the job of
//! the framing codec in `iface::codec`.

use crate::error::{Result, TunTapError};
use crate::network::ipv6::Ipv6Header;

/// Ethernet types commonly carried in the metadata prefix
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const IPV6: u16 = 0x86dd;
}

/// A single packet read from or written to an interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    /// Protocol identifier: the Ethernet type from the metadata prefix, or the
    /// IP version when the frame was decoded with a validated header
    pub protocol: u16,
    /// True if the kernel reported the frame as too large for its buffer
    pub truncated: bool,
    /// Fixed header, present only for header-validated framing
    pub header: Option<Ipv6Header<Vec<u8>>>,
    /// Bytes following the metadata prefix (and header, if any). For TUN this
    /// is the IP packet, for TAP the full Ethernet frame.
    pub payload: Vec<u8>,
}

impl Packet {
    /// Create a header-less packet
    pub fn new(protocol: u16, payload: Vec<u8>) -> Self {
        Packet {
            protocol,
            payload,
            ..Default::default()
        }
    }

    /// Create a packet carrying a fixed header
    ///
    /// The header's payload length is rewritten to match `payload`, and the
    /// protocol is taken from the header's version field. Fails with
    /// `SizeMismatch` if the payload does not fit the 16-bit length field.
    pub fn with_header(mut header: Ipv6Header<Vec<u8>>, payload: Vec<u8>) -> Result<Self> {
        let payload_len =
            u16::try_from(payload.len()).map_err(|_| TunTapError::SizeMismatch {
                expected: u16::MAX as usize,
                got: payload.len(),
            })?;
        header.set_payload_len(payload_len);

        Ok(Packet {
            protocol: header.version() as u16,
            truncated: false,
            header: Some(header),
            payload,
        })
    }

    /// Length of the packet body on the wire, excluding any metadata prefix
    pub fn wire_len(&self) -> usize {
        let header_len = self.header.as_ref().map_or(0, |h| h.as_bytes().len());
        header_len + self.payload.len()
    }
}
