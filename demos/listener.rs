//! A TUN/TAP packet listener
//!
//! Opens a TUN interface with the metadata prefix enabled, brings it up and logs
//! every packet the kernel routes to it: protocol, truncation flag and, for
//! IPv6 traffic, the source and destination addresses.
//!
//! To run this example:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example listener [tun|tap] [pattern]
//! ```
//!
//! Note: Root/sudo privileges are required to create the device. Assign an
//! address to the interface (e.g. `ip -6 addr add fd00::1/64 dev tun0`) to see
//! traffic.

use tuntap_frame::network::{ethertype, Ipv6Header, IPV6_HEADER_LEN};
use tuntap_frame::{DevKind, Interface, TunTapError};

mod utils;
use utils::network::bring_up;

fn main() -> Result<(), TunTapError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let kind = match args.next().as_deref() {
        Some("tap") => DevKind::Tap,
        _ => DevKind::Tun,
    };
    let pattern = args.next().unwrap_or_else(|| "tun%d".to_string());

    let mut iface = Interface::open(&pattern, kind, true)?;
    log::info!("{:?} device created: {}", kind, iface.name());
    bring_up(iface.name())?;

    let mut packet_count = 0u64;
    loop {
        let packet = match iface.read_packet() {
            Ok(packet) => packet,
            Err(TunTapError::Io(e)) => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                continue;
            }
        };
        packet_count += 1;

        log::info!(
            "[Packet #{}] protocol {:#06x}, {} bytes{}",
            packet_count,
            packet.protocol,
            packet.payload.len(),
            if packet.truncated { " (truncated)" } else { "" }
        );

        if kind == DevKind::Tun
            && packet.protocol == ethertype::IPV6
            && packet.payload.len() >= IPV6_HEADER_LEN
        {
            let header = Ipv6Header::new_checked(&packet.payload[..IPV6_HEADER_LEN])?;
            log::info!(
                "  {} -> {} (next header {}, payload {} bytes)",
                header.src_ip(),
                header.dst_ip(),
                header.next_header(),
                header.payload_len()
            );
        }
    }
}
