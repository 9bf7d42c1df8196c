//! IPv6 fixed header view
//!
//! This module provides a bounds-checked view over the 40-byte IPv6 fixed header
//! as defined in RFC 8200. The view borrows or owns its buffer and reads every
//! field straight from the bytes, so nothing is cached and nothing is copied
//! unless the caller asks for an owned header.
//!
//! Layout:
//! - byte 0 (high nibble): version
//! - bytes 4..6: payload length (big-endian)
//! - byte 6: next header
//! - byte 7: hop limit
//! - bytes 8..24: source address
//! - bytes 24..40: destination address

use std::net::Ipv6Addr;

use crate::error::{Result, TunTapError};
use byteorder::{BigEndian, ByteOrder};

/// IPv6 fixed header length in bytes
pub const IPV6_HEADER_LEN: usize = 40;
/// IPv6 address length in bytes
pub const IPV6_ADDR_LEN: usize = 16;

const IPV6_VERSION: u8 = 6;
const DEFAULT_HOP_LIMIT: u8 = 64;

mod field {
    use std::ops::Range;

    pub const VERSION: usize = 0;
    pub const PAYLOAD_LEN: Range<usize> = 4..6;
    pub const NEXT_HEADER: usize = 6;
    pub const HOP_LIMIT: usize = 7;
    pub const SRC_ADDR: Range<usize> = 8..24;
    pub const DST_ADDR: Range<usize> = 24..40;
}

/// View over an IPv6 fixed header
///
/// The wrapped buffer is always exactly [`IPV6_HEADER_LEN`] bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Header<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Ipv6Header<T> {
    /// Wrap a buffer holding exactly one fixed header
    ///
    /// Fails with `SizeMismatch` if the buffer is not 40 bytes long.
    pub fn new_checked(buffer: T) -> Result<Self> {
        let len = buffer.as_ref().len();
        if len != IPV6_HEADER_LEN {
            return Err(TunTapError::SizeMismatch {
                expected: IPV6_HEADER_LEN,
                got: len,
            });
        }
        Ok(Ipv6Header { buffer })
    }

    /// IP version (top four bits of byte 0)
    pub fn version(&self) -> u8 {
        self.buffer.as_ref()[field::VERSION] >> 4
    }

    /// Declared payload length in bytes
    pub fn payload_len(&self) -> u16 {
        BigEndian::read_u16(&self.buffer.as_ref()[field::PAYLOAD_LEN])
    }

    pub fn next_header(&self) -> u8 {
        self.buffer.as_ref()[field::NEXT_HEADER]
    }

    pub fn hop_limit(&self) -> u8 {
        self.buffer.as_ref()[field::HOP_LIMIT]
    }

    /// Source address bytes (16 bytes)
    pub fn src_addr(&self) -> &[u8] {
        &self.buffer.as_ref()[field::SRC_ADDR]
    }

    /// Destination address bytes (16 bytes)
    pub fn dst_addr(&self) -> &[u8] {
        &self.buffer.as_ref()[field::DST_ADDR]
    }

    pub fn src_ip(&self) -> Ipv6Addr {
        to_ipv6(self.src_addr())
    }

    pub fn dst_ip(&self) -> Ipv6Addr {
        to_ipv6(self.dst_addr())
    }

    /// Raw header bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Copy the header into an owned buffer
    pub fn to_owned_header(&self) -> Ipv6Header<Vec<u8>> {
        Ipv6Header {
            buffer: self.buffer.as_ref().to_vec(),
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv6Header<T> {
    pub fn set_payload_len(&mut self, len: u16) {
        BigEndian::write_u16(&mut self.buffer.as_mut()[field::PAYLOAD_LEN], len);
    }

    pub fn set_next_header(&mut self, next_header: u8) {
        self.buffer.as_mut()[field::NEXT_HEADER] = next_header;
    }

    pub fn set_hop_limit(&mut self, hop_limit: u8) {
        self.buffer.as_mut()[field::HOP_LIMIT] = hop_limit;
    }

    /// Replace the source address
    ///
    /// Fails with `SizeMismatch` unless `addr` is exactly 16 bytes; the header
    /// is left untouched on failure.
    pub fn set_src_addr(&mut self, addr: &[u8]) -> Result<()> {
        check_addr_len(addr)?;
        self.buffer.as_mut()[field::SRC_ADDR].copy_from_slice(addr);
        Ok(())
    }

    /// Replace the destination address
    ///
    /// Fails with `SizeMismatch` unless `addr` is exactly 16 bytes; the header
    /// is left untouched on failure.
    pub fn set_dst_addr(&mut self, addr: &[u8]) -> Result<()> {
        check_addr_len(addr)?;
        self.buffer.as_mut()[field::DST_ADDR].copy_from_slice(addr);
        Ok(())
    }
}

impl Ipv6Header<Vec<u8>> {
    /// Build an owned header with version 6 and zero traffic class / flow label
    pub fn new(payload_len: u16, next_header: u8, src_addr: [u8; 16], dst_addr: [u8; 16]) -> Self {
        let mut buffer = vec![0u8; IPV6_HEADER_LEN];
        buffer[field::VERSION] = IPV6_VERSION << 4;
        BigEndian::write_u16(&mut buffer[field::PAYLOAD_LEN], payload_len);
        buffer[field::NEXT_HEADER] = next_header;
        buffer[field::HOP_LIMIT] = DEFAULT_HOP_LIMIT;
        buffer[field::SRC_ADDR].copy_from_slice(&src_addr);
        buffer[field::DST_ADDR].copy_from_slice(&dst_addr);

        Ipv6Header { buffer }
    }
}

fn check_addr_len(addr: &[u8]) -> Result<()> {
    if addr.len() != IPV6_ADDR_LEN {
        return Err(TunTapError::SizeMismatch {
            expected: IPV6_ADDR_LEN,
            got: addr.len(),
        });
    }
    Ok(())
}

fn to_ipv6(bytes: &[u8]) -> Ipv6Addr {
    let mut octets = [0u8; IPV6_ADDR_LEN];
    octets.copy_from_slice(bytes);
    Ipv6Addr::from(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: [u8; 16] = [0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
    const DST: [u8; 16] = [0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2];

    fn sample_bytes() -> Vec<u8> {
        let mut bytes: Vec<u8> = (0..IPV6_HEADER_LEN as u8).collect();
        bytes[0] = 0x60;
        bytes
    }

    #[test]
    fn test_field_access() {
        let header = Ipv6Header::new(8, 17, SRC, DST);
        assert_eq!(header.version(), 6);
        assert_eq!(header.payload_len(), 8);
        assert_eq!(header.next_header(), 17);
        assert_eq!(header.hop_limit(), 64);
        assert_eq!(header.src_addr(), &SRC);
        assert_eq!(header.dst_addr(), &DST);
        assert_eq!(header.src_ip(), "fe80::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(header.dst_ip(), "fe80::2".parse::<Ipv6Addr>().unwrap());
    }

    #[test]
    fn test_borrowed_view() {
        let bytes = sample_bytes();
        let header = Ipv6Header::new_checked(&bytes[..]).unwrap();
        assert_eq!(header.version(), 6);
        assert_eq!(header.payload_len(), 0x0405);
        assert_eq!(header.src_addr(), &bytes[8..24]);
        assert_eq!(header.dst_addr(), &bytes[24..40]);
    }

    #[test]
    fn test_wrong_buffer_length() {
        for len in [0usize, 39, 41] {
            let bytes = vec![0u8; len];
            assert!(matches!(
                Ipv6Header::new_checked(&bytes[..]),
                Err(TunTapError::SizeMismatch { expected: 40, got }) if got == len
            ));
        }
    }

    #[test]
    fn test_set_src_addr_preserves_tail() {
        let original = sample_bytes();
        let mut header = Ipv6Header::new_checked(original.clone()).unwrap();
        header.set_src_addr(&DST).unwrap();

        let bytes = header.as_bytes();
        assert_eq!(&bytes[..8], &original[..8]);
        assert_eq!(&bytes[8..24], &DST);
        assert_eq!(&bytes[24..], &original[24..]);
    }

    #[test]
    fn test_set_dst_addr_keeps_source() {
        let mut header = Ipv6Header::new(0, 58, SRC, DST);
        header.set_dst_addr(&SRC).unwrap();
        assert_eq!(header.dst_addr(), &SRC);
        assert_eq!(header.src_addr(), &SRC);
        assert_eq!(header.version(), 6);
    }

    #[test]
    fn test_set_addr_rejects_wrong_sizes() {
        let mut header = Ipv6Header::new(12, 6, SRC, DST);
        let before = header.clone();

        for len in [0usize, 1, 15, 17, 32] {
            let addr = vec![0xaa; len];
            assert!(matches!(
                header.set_src_addr(&addr),
                Err(TunTapError::SizeMismatch { expected: 16, got }) if got == len
            ));
            assert!(matches!(
                header.set_dst_addr(&addr),
                Err(TunTapError::SizeMismatch { expected: 16, got }) if got == len
            ));
            assert_eq!(header, before);
        }
    }

    #[test]
    fn test_set_payload_len() {
        let mut header = Ipv6Header::new(0, 6, SRC, DST);
        header.set_payload_len(1280);
        assert_eq!(header.payload_len(), 1280);
        assert_eq!(&header.as_bytes()[4..6], &[0x05, 0x00]);
    }

    #[test]
    fn test_mutable_borrowed_view() {
        let mut bytes = sample_bytes();
        {
            let mut header = Ipv6Header::new_checked(&mut bytes[..]).unwrap();
            header.set_hop_limit(1);
            header.set_next_header(58);
        }
        assert_eq!(bytes[6], 58);
        assert_eq!(bytes[7], 1);
    }
}
