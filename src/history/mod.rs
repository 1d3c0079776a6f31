//! System launch history kept on the memory cards.
//!
//! The browser of the console reads a fixed table of records from
//! `mcN:/B?DATA-SYSTEM/history`. Records pushed out of a full table are
//! appended to `history.old` next to it.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::device::PathError;

pub mod date;
pub mod record;
pub mod store;
pub mod table;

pub use date::{Clock, FixedClock, SystemClock};
pub use record::{HistoryRecord, LaunchCounter, TitleId};
pub use store::{record_launch, CardOutcome, Region};
pub use table::{HistoryTable, TableUpdate};

/// Records per history file.
pub const HISTORY_CAPACITY: usize = 21;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid title id {0:?}")]
    InvalidTitleId(String),
    #[error("history file is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
}
