use std::{fs, io, path::{Path, PathBuf}};

use thiserror::Error;

use crate::device::PathError;

pub mod argument;
pub mod files;
pub mod list;
pub mod parser;

pub use argument::Argument;
pub use list::ArgumentList;
pub use parser::parse_options;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Parses the config file at `path`. Anything parsed before a read error is
/// dropped.
pub fn load_argument_list(path: &Path) -> Result<ArgumentList, ConfigError> {
    let file = fs::File::open(path).map_err(|_| ConfigError::NotFound(path.to_owned()))?;
    parse_options(io::BufReader::new(file)).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })
}
