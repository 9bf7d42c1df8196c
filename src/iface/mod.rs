//! Interface layer
//!
//! This module ties devices and packets together:
//! - Frame codec: metadata prefix handling and header-validated framing
//! - Interface configuration
//! - Interface handle with packet read/write

pub mod codec;
pub mod config;
pub mod interface;

// Re-export commonly used items
pub use codec::{FrameCodec, Framing, MAX_FRAME_SIZE, META_PREFIX_LEN, TUN_PKT_STRIP};
pub use config::InterfaceConfig;
pub use interface::Interface;
