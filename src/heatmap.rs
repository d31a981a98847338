//! Heatmap facade: options, values, derivations and the cached index table

use crate::services::calendar::{Calendar, CanonicalDate};
use crate::services::derive::{Derivations, TooltipAttrs};
use crate::services::events::{CellEventKind, EventHandlers};
use crate::services::geometry::Geometry;
use crate::services::range::{self, PaddedRange, DAYS_IN_WEEK};
use crate::services::value_cache::{CacheKey, ValueCache};
use crate::types::{
    HeatmapOptions, HeatmapValue, Layout, LegendEntry, MonthLabel, Result, Square, SummarySquare,
    Week, WeekdayLabel,
};
use chrono::{Datelike, Utc};
use std::cell::{Cell, RefCell};

/// A calendar heatmap over caller-owned values.
///
/// The value index is built lazily on the first layout and reused until the
/// values, a derivation function, the padded range start or the zone change.
pub struct Heatmap<V> {
    options: HeatmapOptions,
    values: Vec<V>,
    derivations: Derivations<V>,
    handlers: EventHandlers<V>,
    /// Bumped on every change to values or derivations
    revision: u64,
    cache: RefCell<Option<ValueCache>>,
    cache_builds: Cell<u64>,
    /// Set once the `num_days` deprecation has been logged
    deprecation_logged: Cell<bool>,
}

impl<V> Heatmap<V> {
    pub fn new(options: HeatmapOptions) -> Self {
        Self {
            options,
            values: Vec::new(),
            derivations: Derivations::default(),
            handlers: EventHandlers::default(),
            revision: 0,
            cache: RefCell::new(None),
            cache_builds: Cell::new(0),
            deprecation_logged: Cell::new(false),
        }
    }

    pub fn with_values(mut self, values: Vec<V>) -> Self {
        self.set_values(values);
        self
    }

    pub fn with_class_for_value(mut self, f: impl Fn(Option<&V>) -> String + 'static) -> Self {
        self.derivations = self.derivations.with_class_for_value(f);
        self.revision += 1;
        self
    }

    pub fn with_title_for_value(
        mut self,
        f: impl Fn(Option<&V>) -> Option<String> + 'static,
    ) -> Self {
        self.derivations = self.derivations.with_title_for_value(f);
        self.revision += 1;
        self
    }

    pub fn with_tooltip_attrs(mut self, attrs: TooltipAttrs<V>) -> Self {
        self.derivations = self.derivations.with_tooltip_attrs(attrs);
        self.revision += 1;
        self
    }

    /// Class of the weekly summary square, from the week's in-range values
    pub fn with_summary_class(mut self, f: impl Fn(&[&V]) -> String + 'static) -> Self {
        self.derivations = self.derivations.with_summary_class(f);
        self.revision += 1;
        self
    }

    pub fn on_click(mut self, f: impl Fn(Option<&V>) + 'static) -> Self {
        self.handlers.set(CellEventKind::Click, f);
        self
    }

    pub fn on_mouse_over(mut self, f: impl Fn(Option<&V>) + 'static) -> Self {
        self.handlers.set(CellEventKind::MouseOver, f);
        self
    }

    pub fn on_mouse_leave(mut self, f: impl Fn(Option<&V>) + 'static) -> Self {
        self.handlers.set(CellEventKind::MouseLeave, f);
        self
    }

    pub fn set_values(&mut self, values: Vec<V>) {
        self.values = values;
        self.revision += 1;
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: HeatmapOptions) {
        self.options = options;
        self.deprecation_logged.set(false);
    }

    /// Range and zone edits are picked up by the cache key on the next layout
    pub fn options_mut(&mut self) -> &mut HeatmapOptions {
        &mut self.options
    }

    /// Forward a cell event to the registered handler, if any
    pub fn emit(&self, kind: CellEventKind, value: Option<&V>) -> bool {
        self.handlers.emit(kind, value)
    }

    /// Number of times the value index has been (re)built
    pub fn cache_builds(&self) -> u64 {
        self.cache_builds.get()
    }
}

impl<V: HeatmapValue> Heatmap<V> {
    pub fn range(&self) -> Result<PaddedRange> {
        self.range_at(Utc::now())
    }

    /// Range resolved with `now` standing in for a missing end date.
    ///
    /// The `num_days` deprecation is logged once per heatmap, not per call.
    pub fn range_at(&self, now: CanonicalDate) -> Result<PaddedRange> {
        self.options.validate()?;
        if !self.deprecation_logged.get() {
            self.deprecation_logged.set(range::warn_deprecated(&self.options));
        }
        PaddedRange::resolve_quiet(&self.options, &Calendar::new(self.options.zone), now)
    }

    pub fn layout(&self) -> Result<Layout<'_, V>> {
        self.layout_at(Utc::now())
    }

    pub fn layout_at(&self, now: CanonicalDate) -> Result<Layout<'_, V>> {
        let range = self.range_at(now)?;
        let calendar = Calendar::new(self.options.zone);
        let key = CacheKey {
            revision: self.revision,
            padded_start: range.padded_start,
            zone: calendar.zone(),
        };

        let mut slot = self.cache.borrow_mut();
        let cache = match slot.take() {
            Some(cache) if cache.key() == key => cache,
            _ => {
                self.cache_builds.set(self.cache_builds.get() + 1);
                ValueCache::build(
                    &self.values,
                    &range,
                    &calendar,
                    &self.derivations,
                    self.revision,
                )?
            }
        };
        let layout = build_layout(&self.options, &self.values, &self.derivations, &range, &cache);
        *slot = Some(cache);
        Ok(layout)
    }
}

/// One-shot layout without keeping a cache around
pub fn compute_layout<'a, V: HeatmapValue>(
    options: &HeatmapOptions,
    values: &'a [V],
    derivations: &Derivations<V>,
    now: CanonicalDate,
) -> Result<Layout<'a, V>> {
    options.validate()?;
    let calendar = Calendar::new(options.zone);
    let range = PaddedRange::resolve(options, &calendar, now)?;
    let cache = ValueCache::build(values, &range, &calendar, derivations, 0)?;
    Ok(build_layout(options, values, derivations, &range, &cache))
}

fn build_layout<'a, V: HeatmapValue>(
    options: &HeatmapOptions,
    values: &'a [V],
    derivations: &Derivations<V>,
    range: &PaddedRange,
    cache: &ValueCache,
) -> Layout<'a, V> {
    let geometry = Geometry::new(options, range.week_count());

    let weeks = (0..range.week_count())
        .map(|week| build_week(week, options, values, derivations, range, cache, &geometry))
        .collect();

    Layout {
        view_width: geometry.view_width(),
        view_height: geometry.view_height(),
        square_size: geometry.square_size,
        gutter_size: geometry.gutter_size,
        weeks_transform: geometry.weeks_transform(),
        month_labels_transform: geometry.month_labels_transform(),
        weekday_labels_transform: geometry.weekday_labels_transform(),
        legend_transform: geometry.legend_transform(),
        weeks,
        month_labels: month_labels(options, range, &geometry),
        weekday_labels: weekday_labels(options, &geometry),
        legend: options
            .legend
            .iter()
            .enumerate()
            .map(|(row, key)| {
                let (square, text) = geometry.legend_key_coordinates(row);
                LegendEntry {
                    square,
                    text,
                    class_name: key.class_name.clone(),
                    label: key.label.clone(),
                }
            })
            .collect(),
    }
}

fn build_week<'a, V: HeatmapValue>(
    week: u32,
    options: &HeatmapOptions,
    values: &'a [V],
    derivations: &Derivations<V>,
    range: &PaddedRange,
    cache: &ValueCache,
    geometry: &Geometry,
) -> Week<'a, V> {
    let mut squares = Vec::with_capacity(DAYS_IN_WEEK as usize);
    let mut week_values: Vec<&V> = Vec::new();

    for slot in 0..DAYS_IN_WEEK {
        let index = i64::from(week * DAYS_IN_WEEK + slot);
        let in_range = range.is_in_range(index);
        if !in_range && !options.show_out_of_range_days {
            continue;
        }
        let Some(date) = range.date_for_index(index) else {
            continue;
        };

        let value = cache.position(index).and_then(|p| values.get(p));
        if in_range {
            week_values.extend(value);
        }
        let display = cache.display(index);
        let origin = geometry.square_coordinates(slot);
        squares.push(Square {
            x: origin.x,
            y: origin.y,
            index,
            date,
            slot,
            value,
            class_name: display.class_name.clone(),
            title: display.title.clone(),
            tooltip_attrs: display.tooltip_attrs.clone(),
            in_range,
        });
    }

    let summary = geometry.summary_slot().map(|slot| {
        let origin = geometry.square_coordinates(slot);
        SummarySquare {
            x: origin.x,
            y: origin.y,
            class_name: derivations.summary_class_for(&week_values),
            value_count: week_values.len(),
        }
    });

    Week {
        index: week,
        transform: geometry.week_transform(week),
        squares,
        summary,
    }
}

/// A label marks the first week whose last day falls in the first seven
/// days of a month. The final week never gets one since it would be clipped.
fn month_labels(options: &HeatmapOptions, range: &PaddedRange, geometry: &Geometry) -> Vec<MonthLabel> {
    if !options.show_month_labels {
        return Vec::new();
    }

    (0..range.week_count().saturating_sub(1))
        .filter_map(|week| {
            let end_of_week = range.date_for_index(i64::from((week + 1) * DAYS_IN_WEEK))?;
            if end_of_week.day() > DAYS_IN_WEEK {
                return None;
            }
            let text = options.month_labels.get(end_of_week.month0() as usize)?;
            let anchor = geometry.month_label_coordinates(week);
            Some(MonthLabel {
                x: anchor.x,
                y: anchor.y,
                text: text.clone(),
                week,
            })
        })
        .collect()
}

fn weekday_labels(options: &HeatmapOptions, geometry: &Geometry) -> Vec<WeekdayLabel> {
    if !options.show_weekday_labels {
        return Vec::new();
    }

    (0..DAYS_IN_WEEK)
        .filter(|&position| options.weekday_label_visibility.is_visible(position))
        .filter_map(|position| {
            let weekday = (position + options.week_start_day) % DAYS_IN_WEEK;
            let text = options.weekday_labels.get(weekday as usize)?;
            let anchor = geometry.weekday_label_coordinates(position);
            Some(WeekdayLabel {
                x: anchor.x,
                y: anchor.y,
                text: text.clone(),
                position,
            })
        })
        .collect()
}
