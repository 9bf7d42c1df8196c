//! Frame codec
//!
//! Converts between the raw bytes exchanged with a TUN/TAP device and
//! [`Packet`]s. Two settings, both fixed when the interface is opened, control
//! the wire format:
//!
//! - `meta`: a 4-byte prefix precedes every frame. Bytes 0..2 hold the kernel's
//!   packet flags (host byte order) and bytes 2..4 the big-endian Ethernet type.
//! - [`Framing`]: how the bytes after the prefix are interpreted.
//!
//! ```text
//!  0      2      4                              4+40
//!  +------+------+------------------------------+---------------
//!  |flags |proto | IPv6 fixed header (validated) | payload ...
//!  +------+------+------------------------------+---------------
//!  `--- meta ---'`------- HeaderValidated only -'
//! ```

use crate::error::{Result, TunTapError};
use crate::network::ipv6::{Ipv6Header, IPV6_HEADER_LEN};
use crate::network::packet::Packet;
use byteorder::{BigEndian, ByteOrder, NativeEndian};

/// Largest frame read from a device in one call
pub const MAX_FRAME_SIZE: usize = 10000;
/// Length of the metadata prefix
pub const META_PREFIX_LEN: usize = 4;
/// Packet-info flag set by the kernel when the frame did not fit its buffer
pub const TUN_PKT_STRIP: u16 = 0x0001;

/// Interpretation of the bytes following the metadata prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Framing {
    /// Everything after the prefix is payload; the protocol comes from the
    /// prefix, or is 0 when there is no prefix
    #[default]
    Metadata,
    /// The next 40 bytes are an IPv6 fixed header whose payload length must
    /// match the bytes that follow; the protocol is the header's version
    HeaderValidated,
}

/// Encoder/decoder bound to one interface's wire settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    meta: bool,
    framing: Framing,
}

impl FrameCodec {
    pub fn new(meta: bool, framing: Framing) -> Self {
        FrameCodec { meta, framing }
    }

    pub fn meta(&self) -> bool {
        self.meta
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Bytes of metadata prefix on each frame (0 or 4)
    pub fn prefix_len(&self) -> usize {
        if self.meta {
            META_PREFIX_LEN
        } else {
            0
        }
    }

    /// Smallest frame `decode` accepts
    pub fn min_frame_len(&self) -> usize {
        match self.framing {
            Framing::Metadata => self.prefix_len(),
            Framing::HeaderValidated => self.prefix_len() + IPV6_HEADER_LEN,
        }
    }

    /// Decode one frame as read from the device
    pub fn decode(&self, frame: &[u8]) -> Result<Packet> {
        let needed = self.min_frame_len();
        if frame.len() < needed {
            return Err(TunTapError::ShortFrame {
                needed,
                got: frame.len(),
            });
        }

        let (prefix, body) = frame.split_at(self.prefix_len());
        let truncated = self.meta && NativeEndian::read_u16(&prefix[0..2]) & TUN_PKT_STRIP != 0;

        let packet = match self.framing {
            Framing::Metadata => Packet {
                protocol: if self.meta {
                    BigEndian::read_u16(&prefix[2..4])
                } else {
                    0
                },
                truncated,
                header: None,
                payload: body.to_vec(),
            },
            Framing::HeaderValidated => {
                let (header, payload) = body.split_at(IPV6_HEADER_LEN);
                let header = Ipv6Header::new_checked(header)?;

                let declared = header.payload_len() as usize;
                if declared != payload.len() {
                    return Err(TunTapError::MalformedHeader {
                        declared,
                        actual: payload.len(),
                    });
                }

                Packet {
                    protocol: header.version() as u16,
                    truncated,
                    header: Some(header.to_owned_header()),
                    payload: payload.to_vec(),
                }
            }
        };

        log::trace!(
            "Decoded frame: {} bytes, protocol {:#06x}, payload {} bytes",
            frame.len(),
            packet.protocol,
            packet.payload.len()
        );
        Ok(packet)
    }

    /// Encode a packet into the bytes to write to the device
    ///
    /// The header, when present, is written as-is ahead of the payload; keeping
    /// its payload length consistent is up to the caller (see
    /// [`Packet::with_header`]). Flag bytes of the prefix are always zero.
    ///
    /// Header-validated framing fails with `MissingHeader` for a packet without
    /// a header, since the result could not be decoded again.
    pub fn encode(&self, packet: &Packet) -> Result<Vec<u8>> {
        if self.framing == Framing::HeaderValidated && packet.header.is_none() {
            return Err(TunTapError::MissingHeader);
        }

        let mut frame = Vec::with_capacity(self.prefix_len() + packet.wire_len());

        if self.meta {
            let mut prefix = [0u8; META_PREFIX_LEN];
            BigEndian::write_u16(&mut prefix[2..4], packet.protocol);
            frame.extend_from_slice(&prefix);
        }
        if let Some(header) = &packet.header {
            frame.extend_from_slice(header.as_bytes());
        }
        frame.extend_from_slice(&packet.payload);

        log::trace!(
            "Encoded frame: {} bytes, protocol {:#06x}",
            frame.len(),
            packet.protocol
        );
        Ok(frame)
    }
}
