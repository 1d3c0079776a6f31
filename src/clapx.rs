use std::path::PathBuf;

use crate::device::DevicePath;

pub fn ensure_existing_dir(p: PathBuf) -> anyhow::Result<PathBuf> {
    if !p.exists() {anyhow::bail!("Path does not exist")} else
    if !p.is_dir() {anyhow::bail!("Path is not a directory")} else
    {Ok(p)}
}

/// Parses `NAME=DIR`, e.g. `mass=/media/usb` or `mc0=./cards/0`.
pub fn mount_value_parser(value: String) -> anyhow::Result<(String, PathBuf)> {
    let Some((device, dir)) = value.split_once('=') else {
        anyhow::bail!("expected NAME=DIR, got {value}")
    };
    let device = device.trim().trim_end_matches(':');
    if device.is_empty() || !device.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("invalid device name {device:?}")
    }
    Ok((device.to_owned(), ensure_existing_dir(PathBuf::from(dir.trim()))?))
}

pub fn device_path_value_parser(value: String) -> anyhow::Result<DevicePath> {
    Ok(value.parse()?)
}
