use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::{
    history::{store::load_table, TitleId},
    launcher::{self, Launcher},
    options::{files, Argument, ArgumentList},
    settings::Mode,
    title::Title,
};

use super::{clock, rng, Console};

#[derive(Default)]
struct Recorder {
    calls: Vec<(PathBuf, Vec<String>)>,
    fail: bool,
}

impl Launcher for Recorder {
    fn launch(&mut self, elf: &Path, argv: &[String]) -> Result<()> {
        self.calls.push((elf.to_owned(), argv.to_vec()));
        if self.fail {
            bail!("loader missing");
        }
        Ok(())
    }
}

fn game() -> Title {
    Title::from_path("SLUS_209.46", "mass:/DVD/Game.iso".parse().unwrap())
}

#[test]
fn argv_ends_with_backend_and_image() {
    let mut console = Console::new();
    console.settings.mode = Mode::Mx4sio;
    let arguments: ArgumentList = [Argument::new("logo", ""), Argument::new("gc", "2")].into_iter().collect();

    let argv = launcher::assemble_argv(&console.settings, &game(), arguments);

    assert_eq!(argv, ["-gc=2", "-logo", "-bsd=mx4sio", "-dvd=mass:/DVD/Game.iso"]);
}

#[test]
fn launch_updates_last_title_and_history() {
    let console = Console::new().with_history();
    console.write("mass", "config/global.yaml", "logo:\n");
    let title = game();
    let arguments = files::load_launch_arguments(&console.settings, &title);
    let mut recorder = Recorder::default();

    launcher::launch_title(&console.settings, &title, arguments, &mut recorder, &mut rng(), &clock(2024, 3, 9)).unwrap();

    assert_eq!(recorder.calls.len(), 1);
    let (elf, argv) = &recorder.calls[0];
    assert_eq!(elf, &console.settings.elf_dir.join("neutrino.elf"));
    assert_eq!(argv, &["-logo", "-bsd=ata", "-dvd=mass:/DVD/Game.iso"]);

    assert_eq!(files::last_launched_title(&console.settings).unwrap(), Some(title.path.clone()));
    let id = TitleId::new("SLUS_209.46").unwrap();
    for card in ["mc0", "mc1"] {
        let table = load_table(&console.settings, card).unwrap();
        assert_eq!(table.find(&id).map(|r| r.launch_count), Some(1));
    }
}

#[test]
fn missing_history_does_not_block_launch() {
    let console = Console::new();
    let mut recorder = Recorder::default();

    launcher::launch_title(&console.settings, &game(), ArgumentList::new(), &mut recorder, &mut rng(), &clock(2024, 3, 9)).unwrap();

    assert_eq!(recorder.calls.len(), 1);
    assert!(files::last_launched_title(&console.settings).unwrap().is_some());
}

#[test]
fn loader_failure_is_returned() {
    let console = Console::new();
    let mut recorder = Recorder { fail: true, ..Recorder::default() };

    let err = launcher::launch_title(&console.settings, &game(), ArgumentList::new(), &mut recorder, &mut rng(), &clock(2024, 3, 9)).unwrap_err();

    assert_eq!(err.to_string(), "loader missing");
}
