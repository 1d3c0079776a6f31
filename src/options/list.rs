use std::slice;

use log::debug;

use crate::compat::CompatModes;

use super::argument::Argument;

/// Ordered launch arguments. When present, the compat argument is always at
/// index 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentList {
    args: Vec<Argument>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.args.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Argument> {
        self.args.get_mut(index)
    }

    pub fn find(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|arg| arg.name == name)
    }

    pub fn iter(&self) -> slice::Iter<'_, Argument> {
        self.args.iter()
    }

    /// Appends `arg` at the tail; the compat argument goes to the head instead.
    /// Callers must not insert the compat argument twice.
    pub fn append(&mut self, arg: Argument) {
        if arg.is_compat() {
            self.args.insert(0, arg);
        } else {
            self.args.push(arg);
        }
    }

    pub fn compat(&self) -> Option<&Argument> {
        self.args.first().filter(|arg| arg.is_compat())
    }

    /// Puts a compat argument carrying `modes` at the head unless the list
    /// already has one.
    pub fn ensure_compat_mode(&mut self, modes: CompatModes) {
        if self.compat().is_none() {
            self.args.insert(0, Argument::compat(modes));
        }
    }

    pub fn compat_modes(&self) -> CompatModes {
        self.compat().map(Argument::compat_modes).unwrap_or_default()
    }

    /// Re-encodes the compat argument. Once edited it belongs to the title,
    /// so it is no longer marked global.
    pub fn set_compat_modes(&mut self, modes: CompatModes) {
        self.ensure_compat_mode(modes);
        let head = &mut self.args[0];
        head.store_compat_modes(modes);
        head.global = false;
    }

    /// Flips the disabled flag of the argument at `index`.
    /// Returns the new disabled state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let arg = self.args.get_mut(index)?;
        arg.disabled = !arg.disabled;
        Some(arg.disabled)
    }

    pub fn mark_global(&mut self) {
        for arg in self.args.iter_mut() {
            arg.global = true;
        }
    }

    /// Merges `secondary` into this list. Names already present here win,
    /// except a disabled, valueless entry which takes the secondary's
    /// argument and stays disabled. This is how a title config switches off
    /// a global argument.
    pub fn merge(&mut self, secondary: &ArgumentList) {
        for other in secondary.iter() {
            match self.args.iter().position(|arg| arg.name == other.name) {
                None => self.append(other.clone()),
                Some(index) => {
                    let existing = &mut self.args[index];
                    if !existing.is_compat() && existing.disabled && existing.value.is_empty() {
                        debug!("{} is disabled, taking global value", other.name);
                        *existing = other.clone();
                        existing.disabled = true;
                    }
                }
            }
        }
    }

    /// Launcher argv for the enabled arguments, in list order.
    /// An empty compat argument produces no token.
    pub fn flatten(&self) -> Vec<String> {
        self.args.iter()
            .filter(|arg| !arg.disabled)
            .filter(|arg| !(arg.is_compat() && arg.value.is_empty()))
            .map(Argument::to_token)
            .collect()
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Argument;
    type IntoIter = slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

impl FromIterator<Argument> for ArgumentList {
    fn from_iter<T: IntoIterator<Item = Argument>>(iter: T) -> Self {
        let mut list = ArgumentList::new();
        for arg in iter {
            list.append(arg);
        }
        list
    }
}
