//! Utility functions for the demos
//!
//! Interface configuration is outside the library, so the demos shell out to
//! `ip` to bring their interface up.

pub mod network;

pub use network::*;
