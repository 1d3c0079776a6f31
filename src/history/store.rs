use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use rand::Rng;

use crate::{device::{DevicePath, PathError}, settings::Settings};

use super::{
    date::{pack_date, Clock},
    record::{HistoryRecord, TitleId},
    table::{HistoryTable, TableUpdate},
    HistoryError,
};

const ROMVER_PATH: &str = "rom0:ROMVER";
const OVERFLOW_SUFFIX: &str = ".old";

/// Console region; selects the `B?DATA-SYSTEM` directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Japan,
    Usa,
    Europe,
    China,
}

impl Region {
    /// Region from the contents of `rom0:ROMVER`, e.g. `0160EC20010704`.
    /// Asia shares the US directory and anything unknown is treated as Japan.
    pub fn from_romver(romver: &[u8]) -> Self {
        match romver.get(4) {
            Some(b'C') => Region::China,
            Some(b'E') => Region::Europe,
            Some(b'A') | Some(b'H') => Region::Usa,
            _ => Region::Japan,
        }
    }

    pub fn detect(settings: &Settings) -> Result<Self, HistoryError> {
        let path: DevicePath = ROMVER_PATH.parse()?;
        let romver = settings.resolve(&path)
            .ok()
            .and_then(|host| fs::read(host).ok())
            .ok_or_else(|| HistoryError::NotFound(ROMVER_PATH.to_owned()))?;
        Ok(Self::from_romver(&romver))
    }

    pub fn letter(self) -> char {
        match self {
            Region::Japan => 'I',
            Region::Usa => 'A',
            Region::Europe => 'E',
            Region::China => 'C',
        }
    }

    /// History file location on `card`.
    pub fn history_path(self, card: &str) -> Result<DevicePath, PathError> {
        DevicePath::new(card, &format!("/B{}DATA-SYSTEM/history", self.letter()))
    }
}

/// Result of updating the history copy on one memory card.
#[derive(Debug)]
pub struct CardOutcome {
    pub card: String,
    pub result: Result<TableUpdate, HistoryError>,
}

/// Counts a launch of `title_id` in the history file of every memory card
/// that has one.
///
/// Cards are updated independently: a failure on one card is logged and
/// reported in its outcome, and does not affect the other.
pub fn record_launch<R: Rng, C: Clock>(
    settings: &Settings,
    title_id: &str,
    rng: &mut R,
    clock: &C,
) -> Result<Vec<CardOutcome>, HistoryError> {
    let id = TitleId::new(title_id)?;
    let region = Region::detect(settings)?;
    let timestamp = pack_date(clock.today());

    let mut outcomes = Vec::new();
    for card in &settings.memory_cards {
        if !settings.mounts.is_mounted(card) {
            debug!("Memory card {card} is not present");
            continue;
        }
        let path = region.history_path(card)?;
        let host = settings.resolve(&path)?;
        if !host.exists() {
            debug!("No history file at {path}");
            continue;
        }

        info!("Updating history file at {path}");
        let result = update_copy(&host, &id, timestamp, settings.history_capacity, rng);
        if let Err(err) = &result {
            error!("Failed to update {path}: {err}");
        }
        outcomes.push(CardOutcome { card: card.clone(), result });
    }
    Ok(outcomes)
}

/// Loads the history table from `card`.
pub fn load_table(settings: &Settings, card: &str) -> Result<HistoryTable, HistoryError> {
    let region = Region::detect(settings)?;
    let host = settings.resolve(&region.history_path(card)?)?;
    read_table(&host, settings.history_capacity)
}

fn update_copy<R: Rng>(
    host: &Path,
    id: &TitleId,
    timestamp: u16,
    capacity: usize,
    rng: &mut R,
) -> Result<TableUpdate, HistoryError> {
    let mut table = read_table(host, capacity).unwrap_or_else(|err| {
        warn!("Failed to load the history file, reinitializing: {err}");
        HistoryTable::zeroed(capacity)
    });

    let update = table.record_launch(id, timestamp, rng);
    if let TableUpdate::Replaced { evicted, .. } = &update {
        info!("Evicting {} into history.old", evicted.title_id);
        if let Err(err) = append_overflow(&overflow_path(host), evicted) {
            error!("Failed to append to history.old: {err}");
        }
    }

    fs::write(host, table.to_bytes()).map_err(|source| HistoryError::Io {
        path: host.to_owned(),
        source,
    })?;
    Ok(update)
}

fn read_table(host: &Path, capacity: usize) -> Result<HistoryTable, HistoryError> {
    let data = fs::read(host).map_err(|source| HistoryError::Io { path: host.to_owned(), source })?;
    HistoryTable::from_bytes(&data, capacity)
}

/// The overflow log sits next to the history file.
pub fn overflow_path(host: &Path) -> PathBuf {
    let mut path = OsString::from(host.as_os_str());
    path.push(OVERFLOW_SUFFIX);
    PathBuf::from(path)
}

fn append_overflow(path: &Path, record: &HistoryRecord) -> Result<(), HistoryError> {
    let io_err = |source| HistoryError::Io { path: path.to_owned(), source };
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    file.write_all(&record.to_bytes()).map_err(io_err)
}
