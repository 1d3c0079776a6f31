use std::{io::Write, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use clap::{builder::{PathBufValueParser, StringValueParser, TypedValueParser}, Parser, Subcommand};
use log::LevelFilter;
use nhcore::{
    clapx::{device_path_value_parser, ensure_existing_dir, mount_value_parser},
    compat::{self, COMPAT_MODE_MAP},
    device::{DevicePath, Mounts},
    history::{self, store::load_table, SystemClock, TableUpdate},
    launcher::{self, Launcher},
    options::files,
    settings::Settings,
    title::Title,
};
use rand::{rngs::StdRng, SeedableRng};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

#[derive(Parser)]
#[command(version = env!("GIT_VERSION"), about = "Resolves launch arguments and keeps the launch history")]
struct Args {
    /// Maps a device to a host directory, e.g. `mass=/media/usb`
    #[arg(short = 'm', long = "mount", value_parser = StringValueParser::new().try_map(mount_value_parser))]
    mounts: Vec<(String, PathBuf)>,

    /// Directory holding the loader ELF and the options file
    #[arg(long, default_value = ".", value_parser = PathBufValueParser::new().try_map(ensure_existing_dir))]
    elf_dir: PathBuf,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the resolved loader argv for a title
    Args(TitleArgs),
    /// Runs the full launch flow, printing the loader hand-off
    Launch(TitleArgs),
    /// Sets the compat modes of a title and saves its config
    Compat {
        #[command(flatten)]
        title: TitleArgs,
        /// Mode codes, e.g. `13`; empty clears all modes
        modes: String,
    },
    /// Counts a launch in the memory card history
    Record { id: String },
    /// Dumps the history table of a memory card
    History {
        #[arg(long, default_value = "mc0")]
        card: String,
    },
    /// Prints the last launched title
    Last,
    /// Prints the launcher options in effect
    Settings,
}

#[derive(clap::Args)]
struct TitleArgs {
    /// Image path, e.g. `mass:/DVD/Game.iso`
    #[arg(value_parser = StringValueParser::new().try_map(device_path_value_parser))]
    path: DevicePath,

    /// Disc serial, e.g. `SLUS_209.46`
    #[arg(long)]
    id: String,
}

impl TitleArgs {
    fn title(&self) -> Title {
        Title::from_path(&self.id, self.path.clone())
    }
}

/// Prints the hand-off instead of loading the ELF.
struct DryRun;

impl Launcher for DryRun {
    fn launch(&mut self, elf: &Path, argv: &[String]) -> Result<()> {
        println!("{}", elf.display());
        for arg in argv {
            println!("  {arg}");
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    color_backtrace::install();
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    let mut mounts = Mounts::new();
    for (device, dir) in &args.mounts {
        mounts.mount(device.clone(), dir.clone());
    }
    let settings = Settings::load(mounts, &args.elf_dir);

    let mut rng = StdRng::from_entropy();
    let clock = SystemClock;

    match &args.command {
        Command::Args(title_args) => {
            let title = title_args.title();
            let arguments = files::load_launch_arguments(&settings, &title);
            for token in launcher::assemble_argv(&settings, &title, arguments) {
                println!("{token}");
            }
        }
        Command::Launch(title_args) => {
            let title = title_args.title();
            let arguments = files::load_launch_arguments(&settings, &title);
            launcher::launch_title(&settings, &title, arguments, &mut DryRun, &mut rng, &clock)?;
        }
        Command::Compat { title: title_args, modes } => {
            let title = title_args.title();
            let mut arguments = files::load_launch_arguments(&settings, &title);
            let modes = compat::decode(modes);
            arguments.set_compat_modes(modes);
            files::save_title_arguments(&settings, &title, &arguments)
                .with_context(|| format!("failed to save config for {}", title.name))?;
            print_compat_modes(modes)?;
        }
        Command::Record { id } => {
            for outcome in history::record_launch(&settings, id, &mut rng, &clock)? {
                match outcome.result {
                    Ok(TableUpdate::Replaced { slot, evicted }) => {
                        println!("{}: slot {slot}, evicted {}", outcome.card, evicted.title_id)
                    }
                    Ok(update) => println!("{}: {update:?}", outcome.card),
                    Err(err) => println!("{}: failed: {err}", outcome.card),
                }
            }
        }
        Command::History { card } => {
            let table = load_table(&settings, card)
                .with_context(|| format!("failed to read history from {card}"))?;
            for (slot, record) in table.records().iter().enumerate() {
                println!("{slot:2}: {record}");
            }
        }
        Command::Last => match files::last_launched_title(&settings)? {
            Some(path) => println!("{path}"),
            None => println!("no title launched yet"),
        },
        Command::Settings => print!("{settings}"),
    }

    Ok(())
}

/// Checklist of every compat mode, active ones highlighted.
fn print_compat_modes(modes: compat::CompatModes) -> Result<()> {
    let stdout = BufferWriter::stdout(ColorChoice::Auto);
    let mut buff = stdout.buffer();
    for entry in COMPAT_MODE_MAP.iter() {
        if modes.contains(entry.mode) {
            buff.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(&mut buff, "[x]")?;
            buff.reset()?;
        } else {
            write!(&mut buff, "[ ]")?;
        }
        writeln!(&mut buff, " {}", entry.label)?;
    }
    stdout.print(&buff)?;
    Ok(())
}
