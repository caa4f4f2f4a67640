//! Fixed one-year calendar window and the daily commit map built over it.
//!
//! All dates are UTC calendar dates. A week is anchored to the UTC date of its epoch instant and its
//! days are whole-day steps from that date.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use derive_more::Constructor;
use serde::Serialize;

use crate::api::WeeklyActivityBucket;

/// Inclusive range of UTC dates `[end - DAYS_BACK, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl CalendarWindow {
    pub const DAYS_BACK: i64 = 365;

    pub fn ending_on(today: NaiveDate) -> Self {
        CalendarWindow {
            start: today - Duration::days(Self::DAYS_BACK),
            end: today,
        }
    }

    /// Window ending on the current UTC date.
    pub fn current() -> Self {
        Self::ending_on(Utc::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Commits of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor, Serialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub commits: u32,
}

/// Commit count for every day of a [`CalendarWindow`]. Serializes as `{"YYYY-MM-DD": count}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailyCommitMap {
    #[serde(skip)]
    window: CalendarWindow,
    days: BTreeMap<NaiveDate, u32>,
}

impl DailyCommitMap {
    /// Every day of `window` present with zero commits.
    pub fn zeroed(window: CalendarWindow) -> Self {
        let days = window.days().map(|day| (day, 0)).collect();
        DailyCommitMap { window, days }
    }

    /// Zeroed map for `window` with every bucket of every repository activity added.
    pub fn merge<I>(window: CalendarWindow, activities: I) -> Self
    where
        I: IntoIterator<Item = Vec<WeeklyActivityBucket>>,
    {
        let mut map = Self::zeroed(window);
        for bucket in activities.into_iter().flatten() {
            map.add_bucket(&bucket);
        }
        map
    }

    /// Adds the days of `bucket` falling inside the window, discarding the rest.
    /// Returns the number of commits that landed in the window.
    pub fn add_bucket(&mut self, bucket: &WeeklyActivityBucket) -> u32 {
        let week_start = match DateTime::<Utc>::from_timestamp(bucket.week, 0) {
            Some(instant) => instant.date_naive(),
            None => return 0,
        };
        let mut added: u32 = 0;
        for (offset, count) in bucket.days.iter().enumerate() {
            let day = match week_start.checked_add_signed(Duration::days(offset as i64)) {
                Some(day) => day,
                None => continue,
            };
            if !self.window.contains(day) {
                continue;
            }
            if let Some(value) = self.days.get_mut(&day) {
                *value = value.saturating_add(*count);
                added = added.saturating_add(*count);
            }
        }
        added
    }

    pub fn window(&self) -> CalendarWindow {
        self.window
    }

    pub fn get(&self, day: NaiveDate) -> Option<u32> {
        self.days.get(&day).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.days.iter().map(|(day, count)| (*day, *count))
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|count| *count as u64).sum()
    }

    pub fn active_days(&self) -> usize {
        self.days.values().filter(|count| **count > 0).count()
    }

    /// Day with most commits, the earliest one on ties. `None` when there were no commits.
    pub fn busiest_day(&self) -> Option<(NaiveDate, u32)> {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .fold(None, |best, (day, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((day, count)),
            })
    }

    /// Per-month totals in chronological order, including months without commits.
    pub fn monthly_totals(&self) -> Vec<MonthTotal> {
        let mut totals: Vec<MonthTotal> = Vec::new();
        for (day, count) in self.iter() {
            match totals.last_mut() {
                Some(last) if last.year == day.year() && last.month == day.month() => {
                    last.commits = last.commits.saturating_add(count);
                }
                _ => totals.push(MonthTotal::new(day.year(), day.month(), count)),
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week_of(day: NaiveDate) -> i64 {
        day.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp()
    }

    #[test]
    fn window_has_366_days() {
        for today in [date(2023, 6, 15), date(2024, 3, 1), date(2024, 12, 31), date(2025, 1, 1)] {
            let map = DailyCommitMap::zeroed(CalendarWindow::ending_on(today));
            assert_eq!(map.len(), 366, "window ending on {}", today);
            assert_eq!(map.total(), 0);
            assert_eq!(map.window().end(), today);
        }
    }

    #[test]
    fn window_over_leap_day_starts_one_day_later() {
        let window = CalendarWindow::ending_on(date(2024, 3, 1));
        assert_eq!(window.start(), date(2023, 3, 2));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2023, 3, 1)));
        assert!(!window.contains(date(2024, 3, 2)));
    }

    #[test]
    fn bucket_expands_to_consecutive_days() {
        let today = date(2024, 1, 10);
        let mut map = DailyCommitMap::zeroed(CalendarWindow::ending_on(today));
        let bucket = WeeklyActivityBucket::new(week_of(date(2023, 12, 31)), [1, 2, 3, 4, 5, 6, 7]);

        assert_eq!(map.add_bucket(&bucket), 28);
        assert_eq!(map.get(date(2023, 12, 31)), Some(1));
        assert_eq!(map.get(date(2024, 1, 1)), Some(2));
        assert_eq!(map.get(date(2024, 1, 6)), Some(7));
        assert_eq!(map.get(date(2024, 1, 7)), Some(0));
    }

    #[test]
    fn bucket_before_window_contributes_only_its_last_day() {
        let window = CalendarWindow::ending_on(date(2024, 6, 1));
        let week = window.start() - Duration::days(6);
        let mut map = DailyCommitMap::zeroed(window);

        let added = map.add_bucket(&WeeklyActivityBucket::new(week_of(week), [9, 9, 9, 9, 9, 9, 4]));

        assert_eq!(added, 4);
        assert_eq!(map.total(), 4);
        assert_eq!(map.get(window.start()), Some(4));
    }

    #[test]
    fn days_after_today_are_discarded() {
        let today = date(2024, 6, 5);
        let mut map = DailyCommitMap::zeroed(CalendarWindow::ending_on(today));
        let added = map.add_bucket(&WeeklyActivityBucket::new(week_of(date(2024, 6, 2)), [1; 7]));
        assert_eq!(added, 4);
        assert_eq!(map.total(), 4);
        assert_eq!(map.len(), 366);
    }

    #[test]
    fn merge_sums_overlapping_unsorted_buckets() {
        let today = date(2024, 6, 5);
        let window = CalendarWindow::ending_on(today);
        let first = vec![
            WeeklyActivityBucket::new(week_of(date(2024, 5, 26)), [0, 1, 0, 0, 0, 0, 0]),
            WeeklyActivityBucket::new(week_of(date(2024, 5, 19)), [2, 0, 0, 0, 0, 0, 0]),
        ];
        let second = vec![WeeklyActivityBucket::new(week_of(date(2024, 5, 26)), [0, 3, 0, 0, 0, 0, 0])];
        let outside = vec![WeeklyActivityBucket::new(week_of(date(2022, 1, 2)), [5; 7])];

        let map = DailyCommitMap::merge(window, vec![first, second, outside, Vec::new()]);

        assert_eq!(map.get(date(2024, 5, 27)), Some(4));
        assert_eq!(map.get(date(2024, 5, 19)), Some(2));
        assert_eq!(map.total(), 6);
        assert_eq!(map.active_days(), 2);
        assert_eq!(map.busiest_day(), Some((date(2024, 5, 27), 4)));
    }

    #[test]
    fn monthly_totals_cover_every_month() {
        let today = date(2024, 6, 5);
        let mut map = DailyCommitMap::zeroed(CalendarWindow::ending_on(today));
        map.add_bucket(&WeeklyActivityBucket::new(week_of(date(2024, 5, 26)), [1; 7]));

        let months = map.monthly_totals();

        assert_eq!(months.len(), 13);
        assert_eq!(months[0], MonthTotal::new(2023, 6, 0));
        assert_eq!(months[11], MonthTotal::new(2024, 5, 6));
        assert_eq!(months[12], MonthTotal::new(2024, 6, 1));
    }

    #[test]
    fn busiest_day_is_none_without_commits() {
        let map = DailyCommitMap::zeroed(CalendarWindow::ending_on(date(2024, 6, 5)));
        assert_eq!(map.busiest_day(), None);
        assert_eq!(map.active_days(), 0);
    }
}
