//! In-memory loopback device
//!
//! Every frame sent to a `Loopback` is queued and handed back by the next
//! `recv`, which makes it possible to drive the whole read/write path without a
//! kernel device. Clones share the same queues, so a test can keep one clone
//! while an `Interface` owns the other.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{DevKind, Device, Platform};

/// Loopback device for tests and demos
#[derive(Clone, Default)]
pub struct Loopback {
    inner: Arc<LoopbackInner>,
}

#[derive(Default)]
struct LoopbackInner {
    /// Frames waiting to be read
    queue: Mutex<VecDeque<Vec<u8>>>,
    /// Every frame accepted by `send`, in order
    sent: Mutex<Vec<Vec<u8>>>,
    /// Maximum bytes accepted per `send`
    write_limit: Mutex<Option<usize>>,
    closed: Mutex<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw frame for the next `recv`
    pub fn inject_frame(&self, frame: Vec<u8>) {
        lock(&self.inner.queue).push_back(frame);
    }

    /// Frames accepted by `send` so far
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        lock(&self.inner.sent).clone()
    }

    pub fn pending_frames(&self) -> usize {
        lock(&self.inner.queue).len()
    }

    /// Accept at most `limit` bytes per `send`, simulating short writes
    pub fn set_write_limit(&self, limit: Option<usize>) {
        *lock(&self.inner.write_limit) = limit;
    }

    /// Number of times a handle to this loopback was closed
    pub fn close_count(&self) -> usize {
        *lock(&self.inner.closed)
    }
}

impl Device for Loopback {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let frame = lock(&self.inner.queue)
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "no frame queued"))?;

        // Oversized frames are cut to the buffer, as the kernel does
        let len = frame.len().min(buf.len());
        buf[..len].copy_from_slice(&frame[..len]);
        Ok(len)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = match *lock(&self.inner.write_limit) {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };

        let frame = buf[..accepted].to_vec();
        lock(&self.inner.sent).push(frame.clone());
        lock(&self.inner.queue).push_back(frame);
        Ok(accepted)
    }

    fn close(self) -> io::Result<()> {
        *lock(&self.inner.closed) += 1;
        Ok(())
    }
}

/// Platform handing out a shared `Loopback`
///
/// `%d` in a name pattern resolves to `0`. Failures of either step can be
/// injected to exercise error paths.
#[derive(Clone, Default)]
pub struct LoopbackPlatform {
    device: Loopback,
    fail_open: Option<io::ErrorKind>,
    fail_create: Option<io::ErrorKind>,
}

impl LoopbackPlatform {
    pub fn new(device: Loopback) -> Self {
        LoopbackPlatform {
            device,
            ..Default::default()
        }
    }

    pub fn with_open_failure(mut self, kind: io::ErrorKind) -> Self {
        self.fail_open = Some(kind);
        self
    }

    pub fn with_create_failure(mut self, kind: io::ErrorKind) -> Self {
        self.fail_create = Some(kind);
        self
    }

    pub fn device(&self) -> &Loopback {
        &self.device
    }
}

impl Platform for LoopbackPlatform {
    type Device = Loopback;

    fn open_device(&self, _pattern: &str) -> io::Result<Loopback> {
        if let Some(kind) = self.fail_open {
            return Err(io::Error::new(kind, "loopback open failed"));
        }
        Ok(self.device.clone())
    }

    fn create_interface(
        &self,
        _device: &mut Loopback,
        pattern: &str,
        _kind: DevKind,
        _meta: bool,
    ) -> io::Result<String> {
        if let Some(kind) = self.fail_create {
            return Err(io::Error::new(kind, "loopback create failed"));
        }
        Ok(pattern.replacen("%d", "0", 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_send_then_recv() {
        let mut device = Loopback::new();
        let frame = vec![0x60, 0x00, 0x00, 0x00];
        assert_eq!(device.send(&frame).unwrap(), 4);
        assert_eq!(device.pending_frames(), 1);

        let mut buf = [0u8; 64];
        let n = device.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], &frame[..]);
        assert_eq!(device.sent_frames(), vec![frame]);
    }

    #[test]
    fn test_loopback_empty_recv_would_block() {
        let mut device = Loopback::new();
        let mut buf = [0u8; 16];
        let err = device.recv(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_loopback_cuts_oversized_frame() {
        let mut device = Loopback::new();
        device.inject_frame(vec![7u8; 32]);

        let mut buf = [0u8; 10];
        assert_eq!(device.recv(&mut buf).unwrap(), 10);
        assert_eq!(buf, [7u8; 10]);
    }

    #[test]
    fn test_loopback_write_limit() {
        let mut device = Loopback::new();
        device.set_write_limit(Some(3));
        assert_eq!(device.send(&[1, 2, 3, 4, 5]).unwrap(), 3);
        assert_eq!(device.sent_frames(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_clones_share_state() {
        let device = Loopback::new();
        let handle = device.clone();
        device.close().unwrap();
        assert_eq!(handle.close_count(), 1);
    }

    #[test]
    fn test_platform_resolves_pattern() {
        let platform = LoopbackPlatform::default();
        let mut device = platform.open_device("tap%d").unwrap();
        let name = platform
            .create_interface(&mut device, "tap%d", DevKind::Tap, true)
            .unwrap();
        assert_eq!(name, "tap0");

        let name = platform
            .create_interface(&mut device, "tun42", DevKind::Tun, false)
            .unwrap();
        assert_eq!(name, "tun42");
    }
}
