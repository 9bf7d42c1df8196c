use std::io;
use std::process::Command;

/// Bring an interface up: `ip link set up dev <iface_name>`
pub fn bring_up(iface_name: &str) -> io::Result<()> {
    let status = Command::new("ip")
        .arg("link")
        .arg("set")
        .arg("up")
        .arg("dev")
        .arg(iface_name)
        .status()?;

    if !status.success() {
        return Err(io::Error::other(format!(
            "failed to bring up interface {}",
            iface_name
        )));
    }

    log::info!("Interface {} is up", iface_name);
    Ok(())
}
