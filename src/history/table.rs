use log::debug;
use rand::Rng;

use super::{
    record::{HistoryRecord, TitleId, RECORD_SIZE},
    HistoryError,
};

/// What a launch did to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableUpdate {
    /// The title already had a record at `slot`.
    Updated { slot: usize },
    /// A fresh record went into the blank `slot`.
    Inserted { slot: usize },
    /// The table was full; `evicted` was the least used record at `slot`.
    Replaced { slot: usize, evicted: HistoryRecord },
    /// The table has no slots at all.
    NoSpace,
}

/// Fixed-capacity record table, stored on the card as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryTable {
    records: Vec<HistoryRecord>,
}

impl HistoryTable {
    pub fn zeroed(capacity: usize) -> Self {
        Self { records: vec![HistoryRecord::default(); capacity] }
    }

    pub fn file_size(capacity: usize) -> usize {
        capacity * RECORD_SIZE
    }

    /// Decodes a full table. Anything but exactly `capacity` records is rejected.
    pub fn from_bytes(bytes: &[u8], capacity: usize) -> Result<Self, HistoryError> {
        let expected = Self::file_size(capacity);
        if bytes.len() != expected {
            return Err(HistoryError::SizeMismatch { expected, actual: bytes.len() });
        }
        let records = bytes.chunks_exact(RECORD_SIZE)
            .map(|chunk| {
                let mut raw = [0u8; RECORD_SIZE];
                raw.copy_from_slice(chunk);
                HistoryRecord::from_bytes(&raw)
            })
            .collect();
        Ok(Self { records })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.records.iter().flat_map(|record| record.to_bytes()).collect()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn find(&self, title_id: &TitleId) -> Option<&HistoryRecord> {
        self.records.iter().find(|record| !record.is_blank() && record.title_id.matches(title_id))
    }

    /// Counts a launch of `title_id` on the packed date `timestamp`.
    ///
    /// A known title is updated in place. A new one goes to a random blank
    /// slot, or, when the table is full, replaces the record with the fewest
    /// launches (the oldest of those on a tie). The replaced record is
    /// returned so the caller can log it.
    pub fn record_launch<R: Rng>(&mut self, title_id: &TitleId, timestamp: u16, rng: &mut R) -> TableUpdate {
        let mut blank_slots = Vec::new();
        let mut least_used: Option<usize> = None;
        let mut matched = None;

        for (slot, record) in self.records.iter().enumerate() {
            if record.is_blank() {
                blank_slots.push(slot);
                continue;
            }
            let is_less_used = match least_used {
                None => true,
                Some(least) => {
                    let least = &self.records[least];
                    (record.launch_count, record.timestamp) < (least.launch_count, least.timestamp)
                }
            };
            if is_less_used {
                least_used = Some(slot);
            }
            if matched.is_none() && record.title_id.matches(title_id) {
                matched = Some(slot);
            }
        }

        if let Some(slot) = matched {
            debug!("Updating entry at slot {slot}");
            self.records[slot].record_launch(timestamp, rng);
            return TableUpdate::Updated { slot };
        }

        let fresh = HistoryRecord::new(*title_id, timestamp);
        if !blank_slots.is_empty() {
            let slot = blank_slots[rng.gen_range(0..blank_slots.len())];
            debug!("Inserting entry to slot {slot}");
            self.records[slot] = fresh;
            return TableUpdate::Inserted { slot };
        }

        let Some(slot) = least_used else {
            return TableUpdate::NoSpace;
        };
        let evicted = std::mem::replace(&mut self.records[slot], fresh);
        debug!("Replacing {} at slot {slot}", evicted.title_id);
        TableUpdate::Replaced { slot, evicted }
    }
}
