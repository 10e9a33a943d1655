//! Fixed-offset calendar arithmetic.
//!
//! Every calendar boundary in the system (day columns, week and month ranges,
//! minute offsets inside a day) is computed against one fixed UTC offset with
//! no daylight-saving transitions. The host timezone is never consulted.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, TimeZone, Timelike,
    Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Calendar date in the business timezone, rendered as `YYYY-MM-DD`
pub type DayKey = NaiveDate;

pub const MINUTES_PER_DAY: u32 = 1440;

static DAY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid day key pattern"));

static INSTANT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d{1,3})?)?(Z|[+\-]\d{2}:\d{2})$")
        .expect("valid instant pattern")
});

/// First day of a calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Calendar view granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum ViewMode {
    #[serde(rename = "day")]
    Day,
    #[default]
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "2week", alias = "2weeks")]
    TwoWeeks,
    #[serde(rename = "month")]
    Month,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::TwoWeeks => "2week",
            ViewMode::Month => "month",
        }
    }

    /// Anchor reached by one step backward (`forward = false`) or forward.
    pub fn step(&self, anchor: DayKey, forward: bool) -> DayKey {
        let days = match self {
            ViewMode::Day => 1,
            ViewMode::Week => 7,
            ViewMode::TwoWeeks => 14,
            ViewMode::Month => {
                let moved = if forward {
                    anchor.checked_add_months(Months::new(1))
                } else {
                    anchor.checked_sub_months(Months::new(1))
                };
                return moved.unwrap_or(anchor);
            }
        };
        if forward {
            anchor + Duration::days(days)
        } else {
            anchor - Duration::days(days)
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "2week" | "2weeks" => Ok(ViewMode::TwoWeeks),
            "month" => Ok(ViewMode::Month),
            other => Err(AppError::Validation(format!("Invalid calendar mode: {}", other))),
        }
    }
}

/// Calendar arithmetic anchored at a fixed offset
#[derive(Debug, Clone, Copy)]
pub struct CalendarClock {
    offset: FixedOffset,
    week_start: WeekStart,
}

impl CalendarClock {
    pub fn new(offset: FixedOffset, week_start: WeekStart) -> Self {
        Self { offset, week_start }
    }

    /// Build from an offset expressed in minutes east of UTC
    pub fn from_offset_minutes(minutes: i32, week_start: WeekStart) -> AppResult<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::Validation(format!("Invalid UTC offset: {} minutes", minutes))
            })?;
        Ok(Self::new(offset, week_start))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Calendar date containing `instant`
    pub fn day_key(&self, instant: DateTime<Utc>) -> DayKey {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Instant of 00:00 on `day`
    pub fn day_start(&self, day: DayKey) -> DateTime<Utc> {
        let local_midnight = day.and_time(NaiveTime::MIN);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local_midnight - shift))
    }

    /// Whole minutes elapsed since local midnight, truncating seconds
    pub fn minute_of_day(&self, instant: DateTime<Utc>) -> u32 {
        let local = instant.with_timezone(&self.offset);
        local.hour() * 60 + local.minute()
    }

    pub fn add_days(&self, day: DayKey, n: i64) -> DayKey {
        day + Duration::days(n)
    }

    /// Position of `day` within its week, 0 being the configured first day
    pub fn weekday_index(&self, day: DayKey) -> u32 {
        match self.week_start {
            WeekStart::Monday => day.weekday().num_days_from_monday(),
            WeekStart::Sunday => day.weekday().num_days_from_sunday(),
        }
    }

    pub fn week_start_of(&self, day: DayKey) -> DayKey {
        self.add_days(day, -i64::from(self.weekday_index(day)))
    }

    /// First visible day and number of visible days for a view
    pub fn range_for_mode(&self, mode: ViewMode, anchor: DayKey) -> (DayKey, u32) {
        match mode {
            ViewMode::Day => (anchor, 1),
            ViewMode::Week => (self.week_start_of(anchor), 7),
            ViewMode::TwoWeeks => (self.week_start_of(anchor), 14),
            ViewMode::Month => {
                let first = self.add_days(anchor, -i64::from(anchor.day0()));
                (first, days_in_month(anchor))
            }
        }
    }

    pub fn visible_days(&self, mode: ViewMode, anchor: DayKey) -> Vec<DayKey> {
        let (start, count) = self.range_for_mode(mode, anchor);
        (0..count)
            .map(|i| self.add_days(start, i64::from(i)))
            .collect()
    }
}

fn days_in_month(day: NaiveDate) -> u32 {
    match day.month() {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(day.year(), 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

/// Parse a strict `YYYY-MM-DD` day key
pub fn parse_day_key(s: &str) -> AppResult<DayKey> {
    let s = s.trim();
    if !DAY_KEY_RE.is_match(s) {
        return Err(AppError::Validation(format!("Invalid date (use YYYY-MM-DD): {}", s)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", s)))
}

/// Parse a timezone-qualified ISO-8601 instant.
///
/// Seconds and milliseconds are optional; the offset (`Z` or `±HH:MM`) is
/// not. Naive strings are rejected rather than read in some ambient zone.
pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    let s = s.trim();
    let caps = INSTANT_RE.captures(s).ok_or_else(|| {
        AppError::Validation(format!(
            "Instant must be ISO-8601 with a timezone (Z or ±HH:MM): {}",
            s
        ))
    })?;

    let normalized = if caps.get(1).is_none() {
        // "HH:MM" lacks seconds, which RFC 3339 requires
        let tz_start = caps.get(3).map(|m| m.start()).unwrap_or(s.len());
        format!("{}:00{}", &s[..tz_start], &s[tz_start..])
    } else {
        s.to_string()
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("Unparseable instant: {}", s)))
}
