//! Compatibility mode flags and their single-character string encoding.
//!
//! The compat argument (`gc`) carries its modes as a short string such as
//! `"13"`. Decoding ORs in the bit of every recognised character, encoding
//! emits the code of every set bit in table order.

use crate::bitflags;

/// Name of the reserved compat-mode argument.
pub const COMPAT_MODES_ARG: &str = "gc";

bitflags! {
    pub CompatModes [
        DISABLE_BUILTIN_MODES,
        IOP_ACCURATE_READS,
        IOP_SYNC_READS,
        EE_UNHOOK_SYSCALLS,
        IOP_EMULATE_DVD_DL
    ]
}

pub struct CompatModeEntry {
    pub mode: CompatModes,
    pub code: char,
    pub label: &'static str,
}

/// All known compatibility modes, in encoding order.
pub const COMPAT_MODE_MAP: [CompatModeEntry; CompatModes::COUNT] = [
    CompatModeEntry { mode: CompatModes::DISABLE_BUILTIN_MODES, code: '0', label: "Disable built-in compat flags" },
    CompatModeEntry { mode: CompatModes::IOP_ACCURATE_READS, code: '1', label: "IOP: Accurate reads" },
    CompatModeEntry { mode: CompatModes::IOP_SYNC_READS, code: '2', label: "IOP: Sync reads" },
    CompatModeEntry { mode: CompatModes::EE_UNHOOK_SYSCALLS, code: '3', label: "EE : Unhook syscalls" },
    CompatModeEntry { mode: CompatModes::IOP_EMULATE_DVD_DL, code: '5', label: "IOP: Emulate DVD-DL" },
];

/// Longest string `encode` can produce.
pub const MAX_ENCODED_LEN: usize = COMPAT_MODE_MAP.len();

pub fn decode(value: &str) -> CompatModes {
    let mut modes = CompatModes::EMPTY;
    for c in value.chars() {
        if let Some(entry) = COMPAT_MODE_MAP.iter().find(|entry| entry.code == c) {
            modes.insert(entry.mode);
        }
    }
    modes
}

pub fn encode(modes: CompatModes) -> String {
    let mut value = String::with_capacity(MAX_ENCODED_LEN + 1);
    for entry in COMPAT_MODE_MAP.iter() {
        if modes.contains(entry.mode) {
            value.push(entry.code);
        }
    }
    value
}

impl CompatModes {
    /// Labels of the active modes, in table order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        COMPAT_MODE_MAP.iter()
            .filter(move |entry| self.contains(entry.mode))
            .map(|entry| entry.label)
    }
}
