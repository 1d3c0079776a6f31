//! Global and per-title config files, and the last launched title marker.

use std::{fs, io::Write, path::{Path, PathBuf}};

use log::{debug, info, warn};

use crate::{
    compat::CompatModes,
    device::DevicePath,
    settings::Settings,
    title::Title,
};

use super::{load_argument_list, ArgumentList, ConfigError};

pub const GLOBAL_OPTIONS_FILE: &str = "global.yaml";
pub const TITLE_OPTIONS_EXT: &str = ".yaml";
pub const LAST_TITLE_FILE: &str = "lastTitle.txt";

/// Arguments from the global config, all marked global.
pub fn global_arguments(settings: &Settings) -> Result<ArgumentList, ConfigError> {
    let path = settings.storage_root()?.config_dir()?.join(GLOBAL_OPTIONS_FILE)?;
    let mut list = load_argument_list(&settings.resolve(&path)?)?;
    list.mark_global();
    Ok(list)
}

/// Finds the title config in the config directory of the title's device.
/// A file named after the title wins over one named after the title id.
pub fn find_title_config(settings: &Settings, title: &Title) -> Result<Option<PathBuf>, ConfigError> {
    let dir = settings.resolve(&title.path.config_dir()?)?;
    let entries = fs::read_dir(&dir).map_err(|_| ConfigError::NotFound(dir.clone()))?;

    let mut found = None;
    for entry in entries.flatten() {
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !title.name.is_empty() && file_name.starts_with(&title.name) {
            found = Some(entry.path());
            break;
        } else if !title.id.is_empty() && file_name.starts_with(&title.id) {
            found = Some(entry.path());
        }
    }
    Ok(found)
}

/// Arguments from the title config. No config file yields an empty list.
pub fn title_arguments(settings: &Settings, title: &Title) -> Result<ArgumentList, ConfigError> {
    info!("Looking for title-specific config for {} ({})", title.name, title.id);
    let Some(path) = find_title_config(settings, title)? else {
        info!("Title-specific config not found");
        return Ok(ArgumentList::new());
    };
    info!("Loading title-specific config from {}", path.display());
    load_argument_list(&path)
}

/// Resolves the arguments a title launches with: the title config with the
/// global config merged under it, or just the global config when the title
/// has none. The result always starts with the compat argument.
pub fn load_launch_arguments(settings: &Settings, title: &Title) -> ArgumentList {
    let global = global_arguments(settings).unwrap_or_else(|err| {
        warn!("Failed to load global launch arguments: {err}");
        ArgumentList::new()
    });
    let title_args = title_arguments(settings, title).unwrap_or_else(|err| {
        warn!("Failed to load title arguments: {err}");
        ArgumentList::new()
    });

    let mut result = if title_args.is_empty() {
        global
    } else {
        let mut merged = title_args;
        merged.merge(&global);
        merged
    };
    result.ensure_compat_mode(CompatModes::EMPTY);
    result
}

/// Writes the title config. Enabled global arguments are left to the
/// global config; disabled ones are written as `$name:` so they stay off.
pub fn save_title_arguments(settings: &Settings, title: &Title, list: &ArgumentList) -> Result<(), ConfigError> {
    let config_dir = title.path.config_dir()?;
    let path = config_dir.join(&format!("{}{TITLE_OPTIONS_EXT}", title.name))?;
    let host = settings.resolve(&path)?;
    info!("Saving title-specific config to {path}");

    let mut data = String::new();
    for arg in list.iter() {
        if !arg.global {
            data.push_str(&format!("{arg}\n"));
        } else if arg.disabled {
            data.push_str(&format!("${}:\n", arg.name));
        }
    }

    write_file(&settings.resolve(&config_dir)?, &host, data.as_bytes())
}

/// Path of the last launched title, if one was recorded.
pub fn last_launched_title(settings: &Settings) -> Result<Option<DevicePath>, ConfigError> {
    debug!("Reading last launched title");
    let path = settings.storage_root()?.config_dir()?.join(LAST_TITLE_FILE)?;
    let host = settings.resolve(&path)?;
    let data = match fs::read(&host) {
        Ok(data) => data,
        Err(_) => return Ok(None),
    };
    let text = String::from_utf8_lossy(&data);
    let text = text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    Ok(text.parse().ok())
}

/// Records `title_path` as last launched, in the config directory of the
/// title's own device.
pub fn update_last_launched_title(settings: &Settings, title_path: &DevicePath) -> Result<(), ConfigError> {
    info!("Writing last launched title as {title_path}");
    let config_dir = title_path.config_dir()?;
    let host = settings.resolve(&config_dir.join(LAST_TITLE_FILE)?)?;
    write_file(&settings.resolve(&config_dir)?, &host, title_path.to_string().as_bytes())
}

fn write_file(dir: &Path, path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io { path: path.to_owned(), source };
    if !dir.exists() {
        info!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(data).map_err(io_err)
}
