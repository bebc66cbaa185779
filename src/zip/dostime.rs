//! Packed DOS date/time handling.
//!
//! ZIP headers store modification times as two little-endian 16-bit words,
//! date then time, with no timezone and 2-second resolution:
//!
//! ```text
//! bits 31..25  year - 1980   (0..=127)
//! bits 24..21  month         (1..=12)
//! bits 20..16  day           (1..=31)
//! bits 15..11  hour          (0..=23)
//! bits 10..5   minute        (0..=59)
//! bits  4..0   second / 2    (0..=29)
//! ```
//!
//! [`TimeCodec`] converts between epoch milliseconds and [`DosDateTime`]
//! under a chosen [`Calendar`]. Encoding never fails: instants before 1980
//! clamp to [`DosDateTime::MIN`] and instants after 2107 clamp to
//! [`DosDateTime::MAX`].

use chrono::{
    DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc,
};
use log::debug;

const FIRST_YEAR: i32 = 1980;
const LAST_YEAR: i32 = FIRST_YEAR + 0x7F;

/// Civil form of [`DosDateTime::MIN`].
const FIRST_CIVIL: NaiveDateTime = match NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1) {
    Some(date) => date.and_time(NaiveTime::MIN),
    None => NaiveDateTime::MIN,
};

/// Civil calendar used to interpret packed values.
///
/// The packed format has no timezone field. Archives written by most tools
/// use host-local time, so that is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    #[default]
    Local,
    Utc,
}

/// A packed 32-bit DOS date/time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime(u32);

impl DosDateTime {
    /// 1980-01-01 00:00:00, the earliest representable moment.
    pub const MIN: DosDateTime = DosDateTime::pack(1980, 1, 1, 0, 0, 0);

    /// 2107-12-31 23:59:58, the latest representable moment.
    pub const MAX: DosDateTime = DosDateTime::pack(2107, 12, 31, 23, 59, 58);

    const fn pack(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DosDateTime {
        DosDateTime(
            (year - FIRST_YEAR as u32) << 25
                | month << 21
                | day << 16
                | hour << 11
                | minute << 5
                | second >> 1,
        )
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Join the header's date and time words.
    pub const fn from_parts(date: u16, time: u16) -> Self {
        Self((date as u32) << 16 | time as u32)
    }

    /// The date word as stored in a header.
    pub const fn date(&self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// The time word as stored in a header.
    pub const fn time(&self) -> u16 {
        self.0 as u16
    }

    pub fn year(&self) -> u16 {
        ((self.0 >> 25) & 0x7F) as u16 + FIRST_YEAR as u16
    }

    pub fn month(&self) -> u8 {
        ((self.0 >> 21) & 0x0F) as u8
    }

    pub fn day(&self) -> u8 {
        ((self.0 >> 16) & 0x1F) as u8
    }

    pub fn hour(&self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    pub fn minute(&self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    pub fn second(&self) -> u8 {
        ((self.0 & 0x1F) * 2) as u8
    }

    /// Rebuild the civil date/time, rolling out-of-range fields over into
    /// the neighbouring unit (month 0 is December of the previous year,
    /// day 0 the last day of the previous month, and so on).
    fn to_civil(self) -> Option<NaiveDateTime> {
        let first_of_year = NaiveDate::from_ymd_opt(i32::from(self.year()), 1, 1)?.and_hms_opt(0, 0, 0)?;
        let month = u32::from(self.month());
        let month_start = if month == 0 {
            first_of_year.checked_sub_months(Months::new(1))?
        } else {
            first_of_year.checked_add_months(Months::new(month - 1))?
        };
        let offset = (i64::from(self.day()) - 1) * 86_400
            + i64::from(self.hour()) * 3_600
            + i64::from(self.minute()) * 60
            + i64::from(self.second());
        month_start.checked_add_signed(TimeDelta::try_seconds(offset)?)
    }
}

impl std::fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Converts epoch milliseconds to and from [`DosDateTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeCodec {
    calendar: Calendar,
}

impl TimeCodec {
    pub const fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub const fn local() -> Self {
        Self::new(Calendar::Local)
    }

    pub const fn utc() -> Self {
        Self::new(Calendar::Utc)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Pack an instant. Seconds are truncated to an even value.
    pub fn encode(&self, epoch_millis: i64) -> DosDateTime {
        let Some(instant) = DateTime::<Utc>::from_timestamp_millis(epoch_millis) else {
            debug!("timestamp {} outside calendar range, clamping", epoch_millis);
            return if epoch_millis < 0 {
                DosDateTime::MIN
            } else {
                DosDateTime::MAX
            };
        };

        let civil = match self.calendar {
            Calendar::Local => instant.with_timezone(&Local).naive_local(),
            Calendar::Utc => instant.naive_utc(),
        };

        let year = civil.year();
        if year < FIRST_YEAR {
            debug!("timestamp {} is before {}, clamping", epoch_millis, FIRST_YEAR);
            return DosDateTime::MIN;
        }
        if year > LAST_YEAR {
            debug!("timestamp {} is after {}, clamping", epoch_millis, LAST_YEAR);
            return DosDateTime::MAX;
        }

        DosDateTime::pack(
            year as u32,
            civil.month(),
            civil.day(),
            civil.hour(),
            civil.minute(),
            civil.second(),
        )
    }

    /// Unpack to epoch milliseconds under this codec's calendar.
    pub fn decode(&self, packed: DosDateTime) -> i64 {
        // Years 1980..=2107 plus at most 15 months and 32 days of offset stay
        // inside chrono's range, so the floor is never reached in practice.
        let civil = packed.to_civil().unwrap_or(FIRST_CIVIL);

        match self.calendar {
            Calendar::Utc => Utc.from_utc_datetime(&civil).timestamp_millis(),
            Calendar::Local => local_millis(civil),
        }
    }
}

/// Resolve a local civil time. Ambiguous times (clocks turned back) take the
/// earlier instant; times skipped by a forward jump move one hour later.
fn local_millis(civil: NaiveDateTime) -> i64 {
    if let Some(instant) = Local.from_local_datetime(&civil).earliest() {
        return instant.timestamp_millis();
    }

    TimeDelta::try_hours(1)
        .and_then(|hour| civil.checked_add_signed(hour))
        .and_then(|shifted| Local.from_local_datetime(&shifted).earliest())
        .map(|instant| instant.timestamp_millis())
        .unwrap_or_else(|| Utc.from_utc_datetime(&civil).timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp_millis()
    }

    #[test]
    fn packs_fields_in_header_layout() {
        let packed = TimeCodec::utc().encode(utc_millis(2024, 3, 15, 13, 45, 27));
        let expected = (44 << 25) | (3 << 21) | (15 << 16) | (13 << 11) | (45 << 5) | 13;
        assert_eq!(packed.bits(), expected);
        assert_eq!(packed.year(), 2024);
        assert_eq!(packed.month(), 3);
        assert_eq!(packed.day(), 15);
        assert_eq!(packed.hour(), 13);
        assert_eq!(packed.minute(), 45);
        assert_eq!(packed.second(), 26);
        assert_eq!(packed.to_string(), "2024-03-15 13:45:26");
    }

    #[test]
    fn decode_truncates_to_even_second() {
        let codec = TimeCodec::utc();
        let t = utc_millis(2001, 9, 9, 1, 46, 41) + 999;
        assert_eq!(codec.decode(codec.encode(t)), utc_millis(2001, 9, 9, 1, 46, 40));
    }

    #[test]
    fn clamps_before_1980() {
        let codec = TimeCodec::utc();
        assert_eq!(codec.encode(0), DosDateTime::MIN);
        assert_eq!(codec.encode(utc_millis(1979, 12, 31, 23, 59, 59)), DosDateTime::MIN);
        assert_eq!(codec.encode(i64::MIN), DosDateTime::MIN);
        assert_eq!(DosDateTime::MIN.bits(), (1 << 21) | (1 << 16));
        assert_eq!(codec.decode(DosDateTime::MIN), utc_millis(1980, 1, 1, 0, 0, 0));
    }

    #[test]
    fn clamps_after_2107() {
        let codec = TimeCodec::utc();
        assert_eq!(codec.encode(utc_millis(2108, 1, 1, 0, 0, 0)), DosDateTime::MAX);
        assert_eq!(codec.encode(i64::MAX), DosDateTime::MAX);
        assert_eq!(codec.encode(utc_millis(2107, 12, 31, 23, 59, 59)), DosDateTime::MAX);
        assert_eq!(codec.decode(DosDateTime::MAX), utc_millis(2107, 12, 31, 23, 59, 58));
    }

    #[test]
    fn date_and_time_words() {
        let packed = DosDateTime::from_parts(0x5870, 0x6D4D);
        assert_eq!(packed.bits(), 0x5870_6D4D);
        assert_eq!(packed.date(), 0x5870);
        assert_eq!(packed.time(), 0x6D4D);
    }

    #[test]
    fn decode_rolls_over_out_of_range_fields() {
        let codec = TimeCodec::utc();
        // month 0, day 0 of 1980
        assert_eq!(codec.decode(DosDateTime::from_bits(0)), utc_millis(1979, 11, 30, 0, 0, 0));
        // February 31st
        let feb31 = DosDateTime::pack(2023, 2, 31, 0, 0, 0);
        assert_eq!(codec.decode(feb31), utc_millis(2023, 3, 3, 0, 0, 0));
    }

    #[test]
    fn every_packed_value_has_a_civil_form() {
        for bits in [0, u32::MAX, DosDateTime::MIN.bits(), DosDateTime::MAX.bits(), 0x0000_FFFF, 0xFFFF_0000] {
            assert!(DosDateTime::from_bits(bits).to_civil().is_some(), "{bits:#010x}");
        }
        assert_eq!(DosDateTime::MIN.to_civil(), Some(FIRST_CIVIL));
    }

    #[test]
    fn local_round_trip() {
        let codec = TimeCodec::local();
        let t = utc_millis(2021, 7, 14, 12, 0, 0);
        assert_eq!(codec.decode(codec.encode(t)), t);
    }
}
