use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{error, info};
use rand::Rng;

use crate::{
    history::{self, Clock},
    options::{files, Argument, ArgumentList},
    settings::Settings,
    title::Title,
};

pub const LOADER_ELF: &str = "neutrino.elf";

const BSD_ARG: &str = "bsd";
const ISO_ARG: &str = "dvd";

/// Hands control over to the loader. Only returns on failure.
pub trait Launcher {
    fn launch(&mut self, elf: &Path, argv: &[String]) -> Result<()>;
}

/// Loader argv for `title`: the resolved arguments plus the block device
/// backend and the image path.
pub fn assemble_argv(settings: &Settings, title: &Title, mut arguments: ArgumentList) -> Vec<String> {
    arguments.append(Argument::new(BSD_ARG, settings.mode.as_str()));
    arguments.append(Argument::new(ISO_ARG, title.path.to_string()));
    arguments.flatten()
}

pub fn loader_path(settings: &Settings) -> PathBuf {
    settings.elf_dir.join(LOADER_ELF)
}

/// Launches `title` with `arguments`.
///
/// The last launched title and the memory card history are updated before
/// the hand-off; failures there are logged and do not stop the launch.
pub fn launch_title<L, R, C>(
    settings: &Settings,
    title: &Title,
    arguments: ArgumentList,
    launcher: &mut L,
    rng: &mut R,
    clock: &C,
) -> Result<()>
where
    L: Launcher,
    R: Rng,
    C: Clock,
{
    let argv = assemble_argv(settings, title, arguments);

    info!("Launching {} ({}) with arguments:", title.name, title.id);
    for (i, arg) in argv.iter().enumerate() {
        info!("{}: {arg}", i + 1);
    }

    if let Err(err) = files::update_last_launched_title(settings, &title.path) {
        error!("Failed to update last launched title: {err}");
    }
    if let Err(err) = history::record_launch(settings, &title.id, rng, clock) {
        error!("Failed to update history: {err}");
    }

    launcher.launch(&loader_path(settings), &argv)
}
