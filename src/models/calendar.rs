//! Calendar view models: navigation state, day segments and rendered blocks

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::project::ProjectStatus;
use crate::{
    engine::clock::{parse_day_key, DayKey, ViewMode, MINUTES_PER_DAY},
    error::AppResult,
};

/// Portion of a booking visible on one calendar day, in local minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub project_id: i32,
    pub title: String,
    pub status: ProjectStatus,
    pub color_key: Option<i16>,
    pub shortage: bool,
    pub day: DayKey,
    /// Inclusive, 0..1440
    pub start_minute: u32,
    /// Exclusive, 0..=1440
    pub end_minute: u32,
}

/// A segment with its horizontal slot inside the day column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub segment: Segment,
    pub column: u32,
    /// Column count shared by the segment's overlap cluster
    pub columns: u32,
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Immutable description of what the calendar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub anchor: DayKey,
}

impl ViewState {
    pub fn new(mode: ViewMode, anchor: DayKey) -> Self {
        Self { mode, anchor }
    }

    /// Build from query parameters; missing values fall back to week view on `today`
    pub fn from_query(query: &CalendarQuery, today: DayKey) -> AppResult<Self> {
        let mode = match query.mode.as_deref() {
            Some(raw) => raw.parse()?,
            None => ViewMode::default(),
        };
        let anchor = match query.date.as_deref() {
            Some(raw) => parse_day_key(raw)?,
            None => today,
        };
        Ok(Self::new(mode, anchor))
    }

    pub fn navigate(&self, direction: Direction) -> Self {
        let forward = direction == Direction::Next;
        Self::new(self.mode, self.mode.step(self.anchor, forward))
    }

    pub fn with_mode(&self, mode: ViewMode) -> Self {
        Self::new(mode, self.anchor)
    }
}

/// Query parameters for the calendar view
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    /// day, week, 2week or month (default week)
    pub mode: Option<String>,
    /// Anchor date YYYY-MM-DD (default today)
    pub date: Option<String>,
}

/// One positioned booking block, as fractions of the day column
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarBlock {
    pub id: i32,
    pub title: String,
    pub status: ProjectStatus,
    pub color_tag: Option<i16>,
    pub shortage: bool,
    pub top_fraction: f64,
    pub height_fraction: f64,
    pub left_fraction: f64,
    pub width_fraction: f64,
}

impl From<LayoutEntry> for CalendarBlock {
    fn from(entry: LayoutEntry) -> Self {
        let day = f64::from(MINUTES_PER_DAY);
        let columns = f64::from(entry.columns.max(1));
        let seg = entry.segment;
        Self {
            id: seg.project_id,
            title: seg.title,
            status: seg.status,
            color_tag: seg.color_key,
            shortage: seg.shortage,
            top_fraction: f64::from(seg.start_minute) / day,
            height_fraction: f64::from(seg.end_minute - seg.start_minute) / day,
            left_fraction: f64::from(entry.column) / columns,
            width_fraction: 1.0 / columns,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    #[schema(value_type = String, format = Date)]
    pub day: DayKey,
    /// Short weekday name (Mon, Tue, ...)
    pub weekday: String,
    pub blocks: Vec<CalendarBlock>,
}

impl CalendarDay {
    pub fn new(day: DayKey, blocks: Vec<CalendarBlock>) -> Self {
        Self {
            day,
            weekday: day.weekday().to_string(),
            blocks,
        }
    }
}

/// Fully laid-out calendar view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarView {
    pub mode: ViewMode,
    #[schema(value_type = String, format = Date)]
    pub anchor: DayKey,
    /// First visible day
    #[schema(value_type = String, format = Date)]
    pub start: DayKey,
    pub days: Vec<CalendarDay>,
    /// Anchor of the previous page
    #[schema(value_type = String, format = Date)]
    pub previous: DayKey,
    /// Anchor of the next page
    #[schema(value_type = String, format = Date)]
    pub next: DayKey,
    /// Horizontal gap to leave around each block, in pixels
    pub gutter_px: u32,
    /// False when shortage flags could not be fetched and are all reported false
    pub shortages_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_view_state_from_query_defaults() {
        let today = date(2024, 3, 10);
        let state = ViewState::from_query(&CalendarQuery::default(), today).unwrap();
        assert_eq!(state, ViewState::new(ViewMode::Week, today));

        let query = CalendarQuery {
            mode: Some("2week".into()),
            date: Some("2024-01-31".into()),
        };
        let state = ViewState::from_query(&query, today).unwrap();
        assert_eq!(state, ViewState::new(ViewMode::TwoWeeks, date(2024, 1, 31)));
    }

    #[test]
    fn test_view_state_rejects_malformed_query() {
        let query = CalendarQuery {
            mode: None,
            date: Some("31/01/2024".into()),
        };
        assert!(ViewState::from_query(&query, date(2024, 1, 1)).is_err());

        let query = CalendarQuery {
            mode: Some("decade".into()),
            date: None,
        };
        assert!(ViewState::from_query(&query, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_navigation_produces_new_states() {
        let state = ViewState::new(ViewMode::Month, date(2024, 1, 31));
        let next = state.navigate(Direction::Next);
        assert_eq!(next.anchor, date(2024, 2, 29));
        assert_eq!(state.anchor, date(2024, 1, 31));
        assert_eq!(next.navigate(Direction::Previous).anchor, date(2024, 1, 29));
        assert_eq!(state.with_mode(ViewMode::Day).mode, ViewMode::Day);
    }

    #[test]
    fn test_block_fractions() {
        let entry = LayoutEntry {
            segment: Segment {
                project_id: 5,
                title: "Expo".into(),
                status: ProjectStatus::Confirmed,
                color_key: Some(4),
                shortage: true,
                day: date(2024, 1, 1),
                start_minute: 360,
                end_minute: 720,
            },
            column: 1,
            columns: 4,
        };
        let block = CalendarBlock::from(entry);
        assert_eq!(block.top_fraction, 0.25);
        assert_eq!(block.height_fraction, 0.25);
        assert_eq!(block.left_fraction, 0.25);
        assert_eq!(block.width_fraction, 0.25);

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["colorTag"], 4);
        assert_eq!(json["topFraction"], 0.25);
        assert_eq!(json["status"], "confirmed");
    }
}
