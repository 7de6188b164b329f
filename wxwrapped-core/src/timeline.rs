//! Reference timezone and half-open time windows.
//!
//! All bucketing happens in one fixed-offset zone (China Standard Time by
//! default) so that "January" means the same thing no matter where the
//! report is generated.

use chrono::{DateTime, Datelike, FixedOffset, Months, Offset, TimeZone, Timelike, Utc};

use crate::error::{Error, Result};

/// Offset of China Standard Time from UTC, in hours.
pub const CHINA_STANDARD_TIME_HOURS: i32 = 8;

/// Fixed-offset zone used to cut windows and read local clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone {
    offset: FixedOffset,
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::from_hours(CHINA_STANDARD_TIME_HOURS).unwrap_or(Self { offset: Utc.fix() })
    }
}

impl ReferenceZone {
    /// Zone `hours` east of UTC.
    pub fn from_hours(hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(hours * 3600)
            .ok_or_else(|| Error::Config(format!("invalid UTC offset: {} hours", hours)))?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Midnight on `year-month-day` in this zone.
    pub fn midnight(&self, year: i32, month: u32, day: u32) -> Result<DateTime<FixedOffset>> {
        self.offset
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .ok_or_else(|| Error::Parse(format!("invalid date: {}-{:02}-{:02}", year, month, day)))
    }

    /// Express a UTC timestamp in this zone.
    pub fn localize(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    /// Zero-based day of the year in this zone (Jan 1 is 0).
    pub fn day_of_year(&self, ts: DateTime<Utc>) -> u32 {
        self.localize(ts).ordinal0()
    }

    /// Clock time as fractional hours in this zone, rounded to two decimals.
    pub fn hour_of_day(&self, ts: DateTime<Utc>) -> f64 {
        let local = self.localize(ts);
        let hours = local.hour() as f64 + local.minute() as f64 / 60.0;
        (hours * 100.0).round() / 100.0
    }
}

/// A half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Window {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// The calendar year `year` in `zone`.
    pub fn year(year: i32, zone: &ReferenceZone) -> Result<Self> {
        Ok(Self {
            start: zone.midnight(year, 1, 1)?,
            end: zone.midnight(year + 1, 1, 1)?,
        })
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// Whether `ts` falls inside the window. The end is exclusive.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start_utc() && ts < self.end_utc()
    }

    /// Axis label for the window start (e.g., "2015-03").
    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

/// Twelve contiguous monthly windows covering `year` in `zone`.
///
/// Built by adding one calendar month to the start until the next year
/// boundary, so each window ends exactly where the next begins.
pub fn monthly_windows(year: i32, zone: &ReferenceZone) -> Result<Vec<Window>> {
    let year_window = Window::year(year, zone)?;
    let mut windows = Vec::with_capacity(12);
    let mut rolling = year_window.start;

    while rolling < year_window.end {
        let next = rolling
            .checked_add_months(Months::new(1))
            .ok_or_else(|| Error::Parse(format!("date out of range after {}", rolling)))?;
        windows.push(Window::new(rolling, next));
        rolling = next;
    }

    Ok(windows)
}
