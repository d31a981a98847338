//! Date range and week padding calculator

use super::calendar::{shift_day, Calendar, CanonicalDate};
use crate::types::{HeatmapOptions, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const DAYS_IN_WEEK: u32 = 7;

/// Range length used when neither `num_days` nor `start_date` is given
pub const DEFAULT_NUM_DAYS: u32 = 200;

/// Which option determined the range length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeSource {
    /// Deprecated `num_days`
    NumDays,
    StartDate,
    Default,
}

/// Position of `date` within a week starting on `week_start_day` (0 = Sunday)
pub fn weekday_position(date: NaiveDate, week_start_day: u32) -> u32 {
    (date.weekday().num_days_from_sunday() + DAYS_IN_WEEK - week_start_day % DAYS_IN_WEEK)
        % DAYS_IN_WEEK
}

/// Inclusive date range widened to whole weeks.
///
/// Day indices count from `padded_start`; index `empty_days_at_start` is
/// `start` and index `empty_days_at_start + day_count - 1` is `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub padded_start: NaiveDate,
    pub padded_end: NaiveDate,
    pub day_count: u32,
    pub empty_days_at_start: u32,
    pub empty_days_at_end: u32,
    pub week_start_day: u32,
    pub source: RangeSource,
}

/// `num_days` when set to a positive count; zero means unset
fn explicit_num_days(options: &HeatmapOptions) -> Option<u32> {
    options.num_days.filter(|&n| n > 0)
}

/// Log the `num_days` deprecation, plus the precedence conflict with
/// `start_date` when both are set. Returns whether anything was logged.
pub fn warn_deprecated(options: &HeatmapOptions) -> bool {
    let Some(num_days) = explicit_num_days(options) else {
        return false;
    };
    log::warn!(
        "numDays is deprecated and will be removed in the next release; use startDate instead"
    );
    if options.start_date.is_some() {
        log::warn!(
            "both numDays ({}) and startDate are set; numDays takes precedence",
            num_days
        );
    }
    true
}

impl PaddedRange {
    /// Resolve the range described by `options`, with `now` standing in
    /// for a missing end date.
    ///
    /// Using `num_days` logs the deprecation warnings of [`warn_deprecated`].
    pub fn resolve(
        options: &HeatmapOptions,
        calendar: &Calendar,
        now: CanonicalDate,
    ) -> Result<Self> {
        warn_deprecated(options);
        Self::resolve_quiet(options, calendar, now)
    }

    /// [`resolve`](Self::resolve) without logging
    pub fn resolve_quiet(
        options: &HeatmapOptions,
        calendar: &Calendar,
        now: CanonicalDate,
    ) -> Result<Self> {
        let end_instant = match &options.end_date {
            Some(end) => calendar.normalize(end)?,
            None => now,
        };
        let (day_count, source) = Self::day_count(options, calendar, end_instant)?;
        Self::ending_at(
            calendar.local_date(end_instant),
            day_count,
            options.week_start_day,
            source,
        )
    }

    fn day_count(
        options: &HeatmapOptions,
        calendar: &Calendar,
        end: CanonicalDate,
    ) -> Result<(u32, RangeSource)> {
        if let Some(num_days) = explicit_num_days(options) {
            return Ok((num_days, RangeSource::NumDays));
        }

        match &options.start_date {
            Some(start) => {
                let start = calendar.normalize(start)?;
                // start after end collapses to an empty range
                let days = calendar.days_between_inclusive(start, end).max(0);
                Ok((
                    u32::try_from(days).unwrap_or(u32::MAX),
                    RangeSource::StartDate,
                ))
            }
            None => Ok((DEFAULT_NUM_DAYS, RangeSource::Default)),
        }
    }

    /// Range of `day_count` days ending on `end` (inclusive).
    ///
    /// A zero-day range still spans one padded week.
    pub fn ending_at(
        end: NaiveDate,
        day_count: u32,
        week_start_day: u32,
        source: RangeSource,
    ) -> Result<Self> {
        let start = shift_day(end, 1 - i64::from(day_count))?;
        let empty_days_at_start = weekday_position(start, week_start_day);

        let filled = (u64::from(day_count) + u64::from(empty_days_at_start))
            % u64::from(DAYS_IN_WEEK);
        let mut empty_days_at_end = (DAYS_IN_WEEK - filled as u32) % DAYS_IN_WEEK;
        if day_count == 0 && empty_days_at_start == 0 {
            empty_days_at_end = DAYS_IN_WEEK;
        }

        Ok(Self {
            start,
            end,
            padded_start: shift_day(start, -i64::from(empty_days_at_start))?,
            padded_end: shift_day(end, i64::from(empty_days_at_end))?,
            day_count,
            empty_days_at_start,
            empty_days_at_end,
            week_start_day: week_start_day % DAYS_IN_WEEK,
            source,
        })
    }

    /// Total cells including padding, always a multiple of seven
    pub fn padded_day_count(&self) -> u64 {
        u64::from(self.day_count)
            + u64::from(self.empty_days_at_start)
            + u64::from(self.empty_days_at_end)
    }

    pub fn week_count(&self) -> u32 {
        self.padded_day_count().div_ceil(u64::from(DAYS_IN_WEEK)) as u32
    }

    /// Whether a day index falls inside `[start, end]` rather than padding
    pub fn is_in_range(&self, index: i64) -> bool {
        let first = i64::from(self.empty_days_at_start);
        index >= first && index < first + i64::from(self.day_count)
    }

    /// Day index of a local calendar date, negative before the padded start
    pub fn index_of(&self, date: NaiveDate) -> i64 {
        (date - self.padded_start).num_days()
    }

    pub fn date_for_index(&self, index: i64) -> Option<NaiveDate> {
        Duration::try_days(index).and_then(|delta| self.padded_start.checked_add_signed(delta))
    }
}
