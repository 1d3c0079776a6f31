use std::fmt;

use crate::compat::{self, CompatModes, COMPAT_MODES_ARG};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: String,
    pub disabled: bool,
    /// Contributed by the global config rather than the title config.
    pub global: bool,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            disabled: false,
            global: false,
        }
    }

    pub fn disabled(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { disabled: true, ..Self::new(name, value) }
    }

    /// Builds the compat argument for `modes`. An empty set is stored disabled.
    pub fn compat(modes: CompatModes) -> Self {
        let mut arg = Self::new(COMPAT_MODES_ARG, String::new());
        arg.store_compat_modes(modes);
        arg
    }

    pub fn is_compat(&self) -> bool {
        self.name == COMPAT_MODES_ARG
    }

    pub fn compat_modes(&self) -> CompatModes {
        compat::decode(&self.value)
    }

    pub(crate) fn store_compat_modes(&mut self, modes: CompatModes) {
        self.value = compat::encode(modes);
        self.disabled = modes.is_empty();
    }

    /// The `-name` / `-name=value` launcher token.
    pub fn to_token(&self) -> String {
        if self.value.is_empty() {
            format!("-{}", self.name)
        } else {
            format!("-{}={}", self.name, self.value)
        }
    }
}

/// Config file form of the argument, without the trailing newline.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.disabled { "$" } else { "" };
        write!(f, "{marker}{}: {}", self.name, self.value)
    }
}
