//! Calendar render driver.
//!
//! Computes the visible range, fetches bookings and shortage flags
//! concurrently, then segments each booking per day and lays out every day
//! column. A failing shortage fetch degrades to all-false flags; a failing
//! booking fetch fails the render.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    config::CalendarConfig,
    engine::{clock::MINUTES_PER_DAY, layout_day, split_into_days, CalendarClock, DayKey},
    error::{AppError, AppResult},
    models::{
        calendar::{CalendarBlock, CalendarDay, CalendarView, Direction, Segment, ViewState},
        project::Project,
        shortage::{ProjectShortage, ShortageScope},
    },
    repository::Repository,
    services::shortages::ShortagesService,
};

/// Where the calendar reads bookings and shortage flags from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Bookings overlapping `[from, to)`
    async fn bookings(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Project>>;

    /// Shortage status of the bookings overlapping `[from, to)`
    async fn shortages(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ProjectShortage>>;
}

/// Reads straight from this server's database
#[derive(Clone)]
pub struct LocalCalendarSource {
    repository: Repository,
    shortages: ShortagesService,
}

impl LocalCalendarSource {
    pub fn new(repository: Repository, shortages: ShortagesService) -> Self {
        Self {
            repository,
            shortages,
        }
    }
}

#[async_trait]
impl CalendarSource for LocalCalendarSource {
    async fn bookings(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Project>> {
        self.repository
            .projects
            .list_overlapping(Some(from), Some(to))
            .await
    }

    async fn shortages(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ProjectShortage>> {
        self.shortages
            .report(ShortageScope::Range {
                from: Some(from),
                to: Some(to),
            })
            .await
    }
}

#[derive(Clone)]
pub struct CalendarService {
    source: Arc<dyn CalendarSource>,
    clock: CalendarClock,
    min_block_minutes: u32,
    gutter_px: u32,
}

impl CalendarService {
    pub fn new(source: Arc<dyn CalendarSource>, config: &CalendarConfig) -> AppResult<Self> {
        if config.min_block_minutes > MINUTES_PER_DAY {
            return Err(AppError::Validation(format!(
                "calendar.min_block_minutes must be at most {}, got {}",
                MINUTES_PER_DAY, config.min_block_minutes
            )));
        }
        Ok(Self {
            source,
            clock: CalendarClock::from_offset_minutes(config.utc_offset_minutes, config.week_start)?,
            min_block_minutes: config.min_block_minutes,
            gutter_px: config.gutter_px,
        })
    }

    /// Today in the calendar's timezone
    pub fn today(&self) -> DayKey {
        self.clock.day_key(Utc::now())
    }

    /// Render one page of the calendar
    pub async fn render(&self, state: ViewState) -> AppResult<CalendarView> {
        let days = self.clock.visible_days(state.mode, state.anchor);
        let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
            return Err(AppError::Internal("empty calendar range".to_string()));
        };
        let from = self.clock.day_start(first);
        let to = self.clock.day_start(self.clock.add_days(last, 1));

        let (bookings, shortages) =
            tokio::join!(self.source.bookings(from, to), self.source.shortages(from, to));
        let bookings = bookings?;
        for project in &bookings {
            project.check_window()?;
        }
        let (short_ids, shortages_available) = match shortages {
            Ok(report) => (
                report
                    .into_iter()
                    .filter(|s| s.shortage)
                    .map(|s| s.project_id)
                    .collect::<HashSet<i32>>(),
                true,
            ),
            Err(e) => {
                tracing::warn!(error = %e, "shortage flags unavailable; rendering without them");
                (HashSet::new(), false)
            }
        };

        let visible: BTreeSet<DayKey> = days.iter().copied().collect();
        let mut by_day: BTreeMap<DayKey, Vec<Segment>> =
            days.iter().map(|d| (*d, Vec::new())).collect();
        for project in &bookings {
            let short = short_ids.contains(&project.id);
            for segment in
                split_into_days(&self.clock, project, short, &visible, self.min_block_minutes)
            {
                by_day.entry(segment.day).or_default().push(segment);
            }
        }

        let days: Vec<CalendarDay> = by_day
            .into_iter()
            .map(|(day, segments)| {
                let blocks = layout_day(segments)
                    .into_iter()
                    .map(CalendarBlock::from)
                    .collect();
                CalendarDay::new(day, blocks)
            })
            .collect();

        tracing::info!(
            mode = %state.mode,
            anchor = %state.anchor,
            days = days.len(),
            bookings = bookings.len(),
            "calendar rendered"
        );

        Ok(CalendarView {
            mode: state.mode,
            anchor: state.anchor,
            start: first,
            days,
            previous: state.navigate(Direction::Previous).anchor,
            next: state.navigate(Direction::Next).anchor,
            gutter_px: self.gutter_px,
            shortages_available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ViewMode;
    use chrono::NaiveDate;
    use tokio_test::{assert_err, assert_ok};

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: i32, start: &str, end: &str) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Project {}", id),
            "client_name": null,
            "venue": null,
            "person_in_charge": null,
            "status": "confirmed",
            "shipping_type": null,
            "shipping_date": null,
            "usage_start": start,
            "usage_end": end,
            "arrival_date": null,
            "color_key": 3,
            "created_at": null,
        }))
        .unwrap()
    }

    fn service(source: MockCalendarSource) -> CalendarService {
        CalendarService::new(Arc::new(source), &CalendarConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_render_week_with_shortages() {
        let mut source = MockCalendarSource::new();
        source
            .expect_bookings()
            .withf(|from, to| {
                from.to_rfc3339() == "2023-12-31T15:00:00+00:00"
                    && to.to_rfc3339() == "2024-01-07T15:00:00+00:00"
            })
            .times(1)
            .returning(|_, _| Ok(vec![project(1, "2024-01-01T22:00:00Z", "2024-01-02T02:00:00Z")]));
        source
            .expect_shortages()
            .times(1)
            .returning(|_, _| {
                Ok(vec![ProjectShortage {
                    project_id: 1,
                    shortage: true,
                    shortage_details: vec![],
                }])
            });

        let view = assert_ok!(
            service(source)
                .render(ViewState::new(ViewMode::Week, date(2024, 1, 3)))
                .await
        );

        assert!(view.shortages_available);
        assert_eq!(view.start, date(2024, 1, 1));
        assert_eq!(view.previous, date(2023, 12, 27));
        assert_eq!(view.next, date(2024, 1, 10));
        assert_eq!(view.days.len(), 7);
        assert!(view.days[0].blocks.is_empty());
        assert_eq!(view.days[1].weekday, "Tue");

        let block = &view.days[1].blocks[0];
        assert_eq!(block.id, 1);
        assert!(block.shortage);
        assert_eq!(block.top_fraction, 420.0 / 1440.0);
        assert_eq!(block.height_fraction, 240.0 / 1440.0);
        assert_eq!(block.width_fraction, 1.0);
    }

    #[tokio::test]
    async fn test_render_degrades_when_shortages_fail() {
        let mut source = MockCalendarSource::new();
        source.expect_bookings().returning(|_, _| {
            Ok(vec![
                project(1, "2024-01-02T00:00:00Z", "2024-01-02T03:00:00Z"),
                project(2, "2024-01-02T01:00:00Z", "2024-01-02T04:00:00Z"),
            ])
        });
        source
            .expect_shortages()
            .returning(|_, _| Err(AppError::Upstream("connection refused".to_string())));

        let view = assert_ok!(
            service(source)
                .render(ViewState::new(ViewMode::Day, date(2024, 1, 2)))
                .await
        );

        assert!(!view.shortages_available);
        assert_eq!(view.days.len(), 1);
        let blocks = &view.days[0].blocks;
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| !b.shortage));
        assert_eq!(blocks[0].left_fraction, 0.0);
        assert_eq!(blocks[1].left_fraction, 0.5);
        assert!(blocks.iter().all(|b| b.width_fraction == 0.5));
    }

    #[tokio::test]
    async fn test_render_fails_when_bookings_fail() {
        let mut source = MockCalendarSource::new();
        source
            .expect_bookings()
            .returning(|_, _| Err(AppError::Upstream("timeout".to_string())));
        source.expect_shortages().returning(|_, _| Ok(vec![]));

        let result = service(source)
            .render(ViewState::new(ViewMode::Month, date(2024, 2, 10)))
            .await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn test_render_rejects_reversed_booking() {
        let mut source = MockCalendarSource::new();
        source.expect_bookings().returning(|_, _| {
            Ok(vec![
                project(1, "2024-01-02T00:00:00Z", "2024-01-02T03:00:00Z"),
                project(9, "2024-01-02T05:00:00Z", "2024-01-02T01:00:00Z"),
            ])
        });
        source.expect_shortages().returning(|_, _| Ok(vec![]));

        let result = service(source)
            .render(ViewState::new(ViewMode::Day, date(2024, 1, 2)))
            .await;
        match assert_err!(result) {
            AppError::Validation(msg) => assert!(msg.contains("Project 9")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_settings() {
        let config = CalendarConfig {
            min_block_minutes: u32::MAX,
            ..CalendarConfig::default()
        };
        let result = CalendarService::new(Arc::new(MockCalendarSource::new()), &config);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let config = CalendarConfig {
            utc_offset_minutes: i32::MAX,
            ..CalendarConfig::default()
        };
        let result = CalendarService::new(Arc::new(MockCalendarSource::new()), &config);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let config = CalendarConfig {
            min_block_minutes: MINUTES_PER_DAY,
            ..CalendarConfig::default()
        };
        assert!(CalendarService::new(Arc::new(MockCalendarSource::new()), &config).is_ok());
    }

    #[tokio::test]
    async fn test_month_view_covers_whole_month() {
        let mut source = MockCalendarSource::new();
        source.expect_bookings().returning(|_, _| {
            Ok(vec![project(7, "2024-02-28T10:00:00Z", "2024-03-01T10:00:00Z")])
        });
        source.expect_shortages().returning(|_, _| Ok(vec![]));

        let view = assert_ok!(
            service(source)
                .render(ViewState::new(ViewMode::Month, date(2024, 2, 10)))
                .await
        );

        assert_eq!(view.days.len(), 29);
        assert_eq!(view.start, date(2024, 2, 1));
        assert_eq!(view.next, date(2024, 3, 10));
        // 2024-02-28T19:00 local to 2024-03-01T19:00 local, clipped to February
        let with_blocks: Vec<_> = view
            .days
            .iter()
            .filter(|d| !d.blocks.is_empty())
            .map(|d| d.day)
            .collect();
        assert_eq!(with_blocks, vec![date(2024, 2, 28), date(2024, 2, 29)]);
        assert_eq!(view.days[28].blocks[0].top_fraction, 0.0);
        assert_eq!(view.days[28].blocks[0].height_fraction, 1.0);
    }
}
