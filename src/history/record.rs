use std::fmt;

use rand::Rng;

use super::{date, HistoryError};

pub const TITLE_ID_LEN: usize = 16;
/// On-card size of one record: id, count, bitmask, shift, padding, date.
pub const RECORD_SIZE: usize = TITLE_ID_LEN + 6;

/// Number of wear slots tracked in the low bits of `bitmask`.
pub const WEAR_SLOTS: u8 = 6;
pub const WEAR_MASK: u8 = (1 << WEAR_SLOTS) - 1;
pub const MAX_LAUNCH_COUNT: u8 = 0x7F;
/// First launch count that claims a wear slot, then every `ROTATION_INTERVAL` after.
pub const ROTATION_START: u8 = 14;
pub const ROTATION_INTERVAL: u8 = 10;
/// `shift_amount` once the exhausted counter has saturated.
pub const WRAPPED_SHIFT: u8 = 7;

/// NUL padded title id as stored on the card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TitleId([u8; TITLE_ID_LEN]);

impl TitleId {
    /// Ids keep a terminating NUL, so at most 15 bytes fit.
    pub fn new(id: &str) -> Result<Self, HistoryError> {
        let bytes = id.as_bytes();
        if bytes.is_empty() || bytes.len() >= TITLE_ID_LEN || bytes.contains(&0) {
            return Err(HistoryError::InvalidTitleId(id.to_owned()));
        }
        let mut raw = [0u8; TITLE_ID_LEN];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(raw))
    }

    pub fn from_raw(raw: [u8; TITLE_ID_LEN]) -> Self {
        Self(raw)
    }

    pub fn is_blank(&self) -> bool {
        self.0[0] == 0
    }

    pub fn as_bytes(&self) -> &[u8; TITLE_ID_LEN] {
        &self.0
    }

    /// Bytes before the terminating NUL.
    pub fn significant(&self) -> &[u8] {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(TITLE_ID_LEN);
        &self.0[..len]
    }

    /// Compares ids up to their terminators; bytes past the NUL are ignored.
    pub fn matches(&self, other: &TitleId) -> bool {
        self.significant() == other.significant()
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.significant()))
    }
}

impl fmt::Debug for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TitleId({self})")
    }
}

/// The two ways a record counts launches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchCounter {
    /// Some wear slots are still free. `used` holds the claimed slot bits.
    Rotating { count: u8, used: u8 },
    /// Every wear slot is claimed; the count runs up to `WEAR_MASK` and stays.
    Exhausted { count: u8 },
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct HistoryRecord {
    pub title_id: TitleId,
    pub launch_count: u8,
    /// Low `WEAR_SLOTS` bits mark claimed wear slots, the rest is reserved.
    pub bitmask: u8,
    pub shift_amount: u8,
    pub padding: u8,
    /// See [`date::pack_date`].
    pub timestamp: u16,
}

impl HistoryRecord {
    pub fn new(title_id: TitleId, timestamp: u16) -> Self {
        Self {
            title_id,
            launch_count: 1,
            bitmask: 1,
            shift_amount: 0,
            padding: 0,
            timestamp,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.title_id.is_blank()
    }

    pub fn counter(&self) -> LaunchCounter {
        if self.bitmask & WEAR_MASK == WEAR_MASK {
            LaunchCounter::Exhausted { count: self.launch_count }
        } else {
            LaunchCounter::Rotating { count: self.launch_count, used: self.bitmask & WEAR_MASK }
        }
    }

    /// Counts one more launch on `timestamp`.
    ///
    /// Every tenth launch from the fourteenth on moves the record to a
    /// randomly chosen unused wear slot, so repeated writes of a popular
    /// title don't keep flipping the same bits on the card.
    pub fn record_launch<R: Rng>(&mut self, timestamp: u16, rng: &mut R) {
        self.timestamp = timestamp;
        match self.counter() {
            LaunchCounter::Rotating { count, used } => {
                let count = count.saturating_add(1).min(MAX_LAUNCH_COUNT);
                if count >= ROTATION_START && (count - ROTATION_START) % ROTATION_INTERVAL == 0 {
                    let slot = pick_free_slot(used, rng);
                    self.bitmask |= 1 << slot;
                    self.shift_amount = slot;
                }
                self.launch_count = count;
            }
            LaunchCounter::Exhausted { count } => {
                if count < WEAR_MASK {
                    self.launch_count = count + 1;
                } else {
                    self.launch_count = self.bitmask & WEAR_MASK;
                    self.shift_amount = WRAPPED_SHIFT;
                }
            }
        }
    }

    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut raw_id = [0u8; TITLE_ID_LEN];
        raw_id.copy_from_slice(&bytes[..TITLE_ID_LEN]);
        let rest = &bytes[TITLE_ID_LEN..];
        Self {
            title_id: TitleId::from_raw(raw_id),
            launch_count: rest[0],
            bitmask: rest[1],
            shift_amount: rest[2],
            padding: rest[3],
            timestamp: u16::from_le_bytes([rest[4], rest[5]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[..TITLE_ID_LEN].copy_from_slice(self.title_id.as_bytes());
        let rest = &mut bytes[TITLE_ID_LEN..];
        rest[0] = self.launch_count;
        rest[1] = self.bitmask;
        rest[2] = self.shift_amount;
        rest[3] = self.padding;
        rest[4..6].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return f.write_str("<blank>");
        }
        let (year, month, day) = date::unpack_date(self.timestamp);
        write!(f, "{:<15} launches: {:3}  slots: {:06b}  shift: {}  last: {:02}-{:02}-{:02}",
            self.title_id.to_string(), self.launch_count, self.bitmask & WEAR_MASK,
            self.shift_amount, year, month, day)
    }
}

/// Uniformly picks one of the slots not set in `used`.
/// `used` must leave at least one slot free.
fn pick_free_slot<R: Rng>(used: u8, rng: &mut R) -> u8 {
    let free: Vec<u8> = (0..WEAR_SLOTS).filter(|slot| used & (1 << slot) == 0).collect();
    free[rng.gen_range(0..free.len())]
}
