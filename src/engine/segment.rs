//! Splitting bookings into per-day segments.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use super::clock::{CalendarClock, DayKey, MINUTES_PER_DAY};
use crate::models::{calendar::Segment, project::Project};

/// Produce one segment per visible calendar day touched by `project`.
///
/// Each segment is the booking clipped to `[day start, day start + 24h)` and
/// expressed in local minutes. A booking that starts and ends on the same day
/// but whose minutes collapse (end <= start after truncation) is widened to
/// `min_block_minutes`, capped at midnight. Segments never merge across days.
pub fn split_into_days(
    clock: &CalendarClock,
    project: &Project,
    shortage: bool,
    visible: &BTreeSet<DayKey>,
    min_block_minutes: u32,
) -> Vec<Segment> {
    let (start, end) = (project.usage_start, project.usage_end);
    if end <= start {
        return Vec::new();
    }
    let (Some(first_visible), Some(last_visible)) = (visible.first(), visible.last()) else {
        return Vec::new();
    };

    let first_day = clock.day_key(start);
    let last_day = clock.day_key(end - Duration::milliseconds(1));
    let single_day = first_day == last_day;

    let mut segments = Vec::new();
    let mut day = first_day.max(*first_visible);
    let stop = last_day.min(*last_visible);

    while day <= stop {
        if visible.contains(&day) {
            let day_start = clock.day_start(day);
            let day_end = day_start + Duration::days(1);

            let start_minute = clock.minute_of_day(start.max(day_start));
            let mut end_minute = end_minute_within(clock, end, day_end);

            if single_day && end_minute <= start_minute {
                end_minute = start_minute
                    .saturating_add(min_block_minutes)
                    .min(MINUTES_PER_DAY);
            }

            if end_minute > start_minute {
                segments.push(Segment {
                    project_id: project.id,
                    title: project.display_title(),
                    status: project.status,
                    color_key: project.color_key,
                    shortage,
                    day,
                    start_minute,
                    end_minute,
                });
            }
        }
        day = clock.add_days(day, 1);
    }

    segments
}

fn end_minute_within(clock: &CalendarClock, end: DateTime<Utc>, day_end: DateTime<Utc>) -> u32 {
    if end >= day_end {
        MINUTES_PER_DAY
    } else {
        clock.minute_of_day(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::{parse_instant, WeekStart};
    use crate::models::project::ProjectStatus;
    use chrono::NaiveDate;

    fn clock() -> CalendarClock {
        CalendarClock::from_offset_minutes(540, WeekStart::Monday).unwrap()
    }

    fn project(start: &str, end: &str) -> Project {
        Project {
            id: 1,
            title: Some("Concert".to_string()),
            client_name: None,
            venue: None,
            person_in_charge: None,
            status: ProjectStatus::Confirmed,
            shipping_type: None,
            shipping_date: None,
            usage_start: parse_instant(start).unwrap(),
            usage_end: parse_instant(end).unwrap(),
            arrival_date: None,
            color_key: Some(3),
            created_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(from: DayKey, count: i64) -> BTreeSet<DayKey> {
        (0..count).map(|i| from + Duration::days(i)).collect()
    }

    #[test]
    fn test_utc_range_lands_on_next_local_day() {
        let p = project("2024-01-01T22:00:00Z", "2024-01-02T02:00:00Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 7), 30);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].day, date(2024, 1, 2));
        assert_eq!(segs[0].start_minute, 7 * 60);
        assert_eq!(segs[0].end_minute, 11 * 60);
        assert_eq!(segs[0].color_key, Some(3));
    }

    #[test]
    fn test_multi_day_booking_splits_at_midnight() {
        // 2024-01-01 20:00 JST to 2024-01-03 09:30 JST
        let p = project("2024-01-01T11:00:00Z", "2024-01-03T00:30:00Z");
        let segs = split_into_days(&clock(), &p, true, &days(date(2024, 1, 1), 7), 30);
        let spans: Vec<_> = segs
            .iter()
            .map(|s| (s.day, s.start_minute, s.end_minute, s.shortage))
            .collect();
        assert_eq!(
            spans,
            vec![
                (date(2024, 1, 1), 1200, 1440, true),
                (date(2024, 1, 2), 0, 1440, true),
                (date(2024, 1, 3), 0, 570, true),
            ]
        );
    }

    #[test]
    fn test_ending_at_midnight_does_not_touch_next_day() {
        // 2024-01-01 22:00 JST to 2024-01-02 00:00 JST
        let p = project("2024-01-01T13:00:00Z", "2024-01-01T15:00:00Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 2), 30);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].start_minute, segs[0].end_minute), (1320, 1440));
    }

    #[test]
    fn test_only_visible_days_are_emitted() {
        let p = project("2024-01-01T11:00:00Z", "2024-01-03T00:30:00Z");
        let visible: BTreeSet<_> = [date(2024, 1, 2)].into_iter().collect();
        let segs = split_into_days(&clock(), &p, false, &visible, 30);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].day, date(2024, 1, 2));

        let none = split_into_days(&clock(), &p, false, &days(date(2024, 2, 1), 7), 30);
        assert!(none.is_empty());
    }

    #[test]
    fn test_collapsed_block_is_widened_and_capped() {
        // 23:50:00 to 23:50:40 JST: both truncate to minute 1430
        let p = project("2024-01-01T14:50:00Z", "2024-01-01T14:50:40Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 1), 30);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].start_minute, segs[0].end_minute), (1430, 1440));

        // 10:00:00 to 10:00:30 JST widens to the full block
        let p = project("2024-01-01T01:00:00Z", "2024-01-01T01:00:30Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 1), 30);
        assert_eq!((segs[0].start_minute, segs[0].end_minute), (600, 630));
    }

    #[test]
    fn test_huge_min_block_saturates_at_midnight() {
        let p = project("2024-01-01T01:00:00Z", "2024-01-01T01:00:30Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 1), u32::MAX);
        assert_eq!((segs[0].start_minute, segs[0].end_minute), (600, 1440));
    }

    #[test]
    fn test_collapsed_tail_on_later_day_is_dropped() {
        // 23:00 JST to 00:00:20 JST next day: the second day truncates to 0..0
        let p = project("2024-01-01T14:00:00Z", "2024-01-01T15:00:20Z");
        let segs = split_into_days(&clock(), &p, false, &days(date(2024, 1, 1), 2), 30);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].day, date(2024, 1, 1));
    }
}
