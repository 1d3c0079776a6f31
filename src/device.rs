//! Console-style device paths (`mass0:/DVD/game.iso`, `mc1:/SYS-CONF`,
//! `rom0:ROMVER`) and their mapping onto host directories.

use std::{collections::BTreeMap, fmt, path::PathBuf, str::FromStr};

use thiserror::Error;

/// Longest device path the console file APIs accept.
pub const MAX_PATH_LEN: usize = 255;

const CONFIG_DIR: &str = "/config";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("device path has no device prefix: {0}")]
    NoDevice(String),
    #[error("device path is longer than {MAX_PATH_LEN} bytes: {0}")]
    TooLong(String),
    #[error("device {0} is not mounted")]
    NotMounted(String),
    #[error("device path component is unsafe: {0}")]
    Unsafe(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DevicePath {
    device: String,
    path: String,
}

impl DevicePath {
    pub fn new(device: &str, path: &str) -> Result<Self, PathError> {
        let full = format!("{device}:{path}");
        if device.is_empty() || !device.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PathError::NoDevice(full));
        }
        if full.len() > MAX_PATH_LEN {
            return Err(PathError::TooLong(full));
        }
        Ok(Self { device: device.to_owned(), path: path.to_owned() })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path component, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Appends `name` as a child, adding the `/` separator when missing.
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        let sep = if self.path.ends_with('/') || name.starts_with('/') { "" } else { "/" };
        Self::new(&self.device, &format!("{}{sep}{name}", self.path))
    }

    /// Config directory on the same device as this path.
    pub fn config_dir(&self) -> Result<Self, PathError> {
        Self::new(&self.device, CONFIG_DIR)
    }
}

impl FromStr for DevicePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device, path) = s.split_once(':').ok_or_else(|| PathError::NoDevice(s.to_owned()))?;
        Self::new(device, path)
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.path)
    }
}

/// Host directories standing in for console devices.
#[derive(Clone, Debug, Default)]
pub struct Mounts {
    roots: BTreeMap<String, PathBuf>,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, device: impl Into<String>, root: impl Into<PathBuf>) {
        self.roots.insert(device.into(), root.into());
    }

    pub fn is_mounted(&self, device: &str) -> bool {
        self.roots.contains_key(device)
    }

    pub fn resolve(&self, path: &DevicePath) -> Result<PathBuf, PathError> {
        let root = self.roots.get(path.device())
            .ok_or_else(|| PathError::NotMounted(path.device().to_owned()))?;
        let mut host = root.clone();
        for part in path.path().split('/').filter(|part| !part.is_empty() && *part != ".") {
            if part == ".." || part.contains('\\') {
                return Err(PathError::Unsafe(path.to_string()));
            }
            host.push(part);
        }
        Ok(host)
    }
}
