use chrono::{Datelike, Local, NaiveDate};

/// Source of the date stamped on history records.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Packs a date as `yyyyyyy mmmm ddddd` with a two-digit year.
pub fn pack_date(date: NaiveDate) -> u16 {
    let year = date.year().rem_euclid(100) as u16;
    ((year & 0x7F) << 9) | ((date.month() as u16 & 0xF) << 5) | (date.day() as u16 & 0x1F)
}

/// Splits a packed date into two-digit year, month and day.
pub fn unpack_date(packed: u16) -> (u16, u16, u16) {
    ((packed >> 9) & 0x7F, (packed >> 5) & 0xF, packed & 0x1F)
}
