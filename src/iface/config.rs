use crate::device::DevKind;
use crate::iface::codec::{Framing, MAX_FRAME_SIZE};

/// Settings fixed when an interface is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Exact interface name ("tun42") or a pattern with one `%d` ("tun%d")
    pub name: String,
    pub kind: DevKind,
    /// Whether frames carry the 4-byte flags/protocol prefix
    pub meta: bool,
    pub framing: Framing,
    /// Size of the buffer handed to each device read
    pub read_buffer_size: usize,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            name: "tun%d".to_string(),
            kind: DevKind::Tun,
            meta: false,
            framing: Framing::default(),
            read_buffer_size: MAX_FRAME_SIZE,
        }
    }
}

impl InterfaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: DevKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }
}
