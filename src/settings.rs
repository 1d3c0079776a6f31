use std::{fmt, fs, path::{Path, PathBuf}};

use log::{info, warn};

use crate::{
    device::{DevicePath, Mounts, PathError},
    history::HISTORY_CAPACITY,
    options::{load_argument_list, Argument, ArgumentList},
};

/// Launcher options file, looked up next to the launcher ELF.
pub const OPTIONS_FILE: &str = "nhddl.yaml";

const OPTION_480P: &str = "480p";
const OPTION_MODE: &str = "mode";
const OPTION_UDPBD_IP: &str = "udpbd_ip";

const IPCONFIG_PATH: &str = "/SYS-CONF/IPCONFIG.DAT";
const MAX_IP_LEN: usize = 15;

/// Block device backend the titles are stored on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Ata,
    Mx4sio,
    Udpbd,
    Usb,
}

impl Mode {
    /// Value passed to the loader as `-bsd=`.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ata => "ata",
            Mode::Mx4sio => "mx4sio",
            Mode::Udpbd => "udpbd",
            Mode::Usb => "usb",
        }
    }

    /// Unknown values fall back to ATA.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "mx4sio" => Mode::Mx4sio,
            "udpbd" => Mode::Udpbd,
            "usb" => Mode::Usb,
            _ => Mode::Ata,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub mode: Mode,
    /// Video mode and network address are consumed by the module loader
    /// and the menu, not by the launch flow itself.
    pub video_480p: bool,
    pub udpbd_ip: Option<String>,
    pub mounts: Mounts,
    /// Device holding the titles and the `config` directory.
    pub storage_device: String,
    /// Memory cards carrying the system history, in update order.
    pub memory_cards: Vec<String>,
    pub elf_dir: PathBuf,
    pub history_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            video_480p: false,
            udpbd_ip: None,
            mounts: Mounts::new(),
            storage_device: "mass".to_owned(),
            memory_cards: vec!["mc0".to_owned(), "mc1".to_owned()],
            elf_dir: PathBuf::from("."),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl Settings {
    /// Reads the options file from `elf_dir`, keeping defaults for anything
    /// missing. A missing or unreadable file is not an error.
    pub fn load(mounts: Mounts, elf_dir: &Path) -> Self {
        let mut settings = Self {
            mounts,
            elf_dir: elf_dir.to_owned(),
            ..Self::default()
        };

        match load_argument_list(&elf_dir.join(OPTIONS_FILE)) {
            Ok(options) => {
                for arg in options.iter().filter(|arg| !arg.disabled) {
                    match arg.name.as_str() {
                        OPTION_480P => settings.video_480p = true,
                        OPTION_MODE => settings.mode = Mode::parse(&arg.value),
                        OPTION_UDPBD_IP if !arg.value.is_empty() => {
                            settings.udpbd_ip = Some(arg.value.clone())
                        }
                        _ => {}
                    }
                }
            }
            Err(err) => info!("Can't load options file, will use defaults: {err}"),
        }

        if settings.mode == Mode::Udpbd && settings.udpbd_ip.is_none() {
            settings.udpbd_ip = settings.read_ipconfig();
            if settings.udpbd_ip.is_none() {
                warn!("Failed to get IP address from IPCONFIG.DAT");
            }
        }
        settings
    }

    /// Launcher options in options file form. `480p` is written disabled
    /// when off, the address only when known.
    pub fn options(&self) -> ArgumentList {
        let mut list = ArgumentList::new();
        list.append(Argument::new(OPTION_MODE, self.mode.as_str()));
        list.append(if self.video_480p {
            Argument::new(OPTION_480P, "")
        } else {
            Argument::disabled(OPTION_480P, "")
        });
        if let Some(ip) = &self.udpbd_ip {
            list.append(Argument::new(OPTION_UDPBD_IP, ip.as_str()));
        }
        list
    }

    /// Root of the storage device, e.g. `mass:/`.
    pub fn storage_root(&self) -> Result<DevicePath, PathError> {
        DevicePath::new(&self.storage_device, "/")
    }

    pub fn resolve(&self, path: &DevicePath) -> Result<PathBuf, PathError> {
        self.mounts.resolve(path)
    }

    /// First address found in `SYS-CONF/IPCONFIG.DAT` on the memory cards.
    fn read_ipconfig(&self) -> Option<String> {
        for card in &self.memory_cards {
            let Ok(path) = DevicePath::new(card, IPCONFIG_PATH) else { continue };
            let Ok(host) = self.resolve(&path) else { continue };
            let Ok(data) = fs::read(&host) else { continue };
            if data.len() < MAX_IP_LEN {
                return None;
            }
            let ip: String = data[..MAX_IP_LEN].iter()
                .take_while(|b| !b.is_ascii_whitespace() && **b != 0)
                .map(|b| *b as char)
                .collect();
            return Some(ip).filter(|ip| !ip.is_empty());
        }
        None
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arg in &self.options() {
            writeln!(f, "{arg}")?;
        }
        Ok(())
    }
}
