use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::time::{
    FirstDayOfWeek, IntervalUnit, add_interval, day_difference, floor_to_month, floor_to_week,
    start_of_day,
};

/// The resolved visible time window, end exclusive.
///
/// Produced by [`IntervalQuery::resolve`]; immutable once produced and
/// replaced wholesale on recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DisplayInterval {
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the window in whole days.
    #[must_use]
    pub fn duration_days(self) -> i64 {
        day_difference(self.start.date(), self.end.date())
    }
}

/// Outcome of a resolution compared against the previously displayed window.
///
/// `Unchanged` signals the caller to restore its last-valid date inputs and
/// skip any interval-change notification, preventing feedback loops when an
/// input change does not actually move the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalChange {
    Unchanged,
    Changed {
        old: Option<DisplayInterval>,
        new: DisplayInterval,
    },
}

/// Inputs from which the displayed time interval is derived.
///
/// Either `reference_date` (single-date mode) or the `start_date`/`end_date`
/// pair (range mode) drives the resolution; the reference date takes priority
/// when both are present. `end_date` is inclusive, matching calendar-widget
/// convention. All inputs are lenient: out-of-range values are coerced to
/// documented defaults, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IntervalQuery {
    #[serde(default)]
    pub reference_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub unit: IntervalUnit,
    #[serde(default = "default_steps")]
    pub steps: i64,
    #[serde(default)]
    pub first_day_of_week: FirstDayOfWeek,
    #[serde(default)]
    pub min_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub max_date: Option<NaiveDateTime>,
}

fn default_steps() -> i64 {
    1
}

impl IntervalQuery {
    /// Resolves the displayed window using the current local day for any
    /// missing range endpoint.
    #[must_use]
    pub fn resolve(&self) -> DisplayInterval {
        self.resolve_at(chrono::Local::now().date_naive())
    }

    /// Resolves the displayed window, using `today` wherever a range endpoint
    /// is missing. Pure: equal inputs always produce equal windows.
    #[must_use]
    pub fn resolve_at(&self, today: NaiveDate) -> DisplayInterval {
        let q = self.coerced();

        match q.reference_date {
            Some(reference) => q.resolve_single_date(reference.date()),
            None => q.resolve_range(today),
        }
    }

    /// Resolves and compares against the previously displayed window.
    #[must_use]
    pub fn resolve_change(
        &self,
        previous: Option<&DisplayInterval>,
        today: NaiveDate,
    ) -> IntervalChange {
        let new = self.resolve_at(today);
        match previous {
            Some(old) if *old == new => IntervalChange::Unchanged,
            old => IntervalChange::Changed {
                old: old.copied(),
                new,
            },
        }
    }

    /// Applies the lenient coercion rules: non-positive steps fall back to 1
    /// and inverted min/max bounds are swapped.
    #[must_use]
    pub fn coerced(&self) -> Self {
        let mut q = *self;
        if q.steps <= 0 {
            q.steps = 1;
        }
        if let (Some(min), Some(max)) = (q.min_date, q.max_date) {
            if min > max {
                q.min_date = Some(max);
                q.max_date = Some(min);
            }
        }
        q
    }

    /// The interval of the configured unit/steps containing `date`.
    #[must_use]
    pub fn interval_containing(&self, date: NaiveDate) -> DisplayInterval {
        let start = match self.unit {
            IntervalUnit::Day => date,
            IntervalUnit::Week => floor_to_week(date, self.first_day_of_week),
            IntervalUnit::Month => floor_to_month(date),
        };
        let end = add_interval(start, self.unit, self.steps.max(1));
        DisplayInterval::new(start_of_day(start), start_of_day(end))
    }

    fn resolve_single_date(&self, reference: NaiveDate) -> DisplayInterval {
        let interval = self.interval_containing(reference);

        let min_fired = self
            .min_date
            .map(|min| self.interval_containing(min.date()))
            .filter(|iv| iv.start > interval.start);
        let max_fired = self
            .max_date
            .map(|max| self.interval_containing(max.date()))
            .filter(|iv| iv.end < interval.end);

        match (min_fired, max_fired) {
            // Both bounds pull in opposite directions: widen to the
            // min-anchored start and max-anchored end rather than invert.
            (Some(min_iv), Some(max_iv)) => DisplayInterval::new(min_iv.start, max_iv.end),
            (Some(min_iv), None) => min_iv,
            (None, Some(max_iv)) => max_iv,
            (None, None) => interval,
        }
    }

    fn resolve_range(&self, today: NaiveDate) -> DisplayInterval {
        let start_date = self.start_date.map_or(today, |s| s.date());
        let end_date = self.end_date.map_or(today, |e| e.date());

        let mut start = start_date;
        // The inclusive end date becomes an exclusive bound one day later;
        // an inverted pair collapses to a one-day window first.
        let end_inclusive = if start > end_date {
            start + Days::new(1)
        } else {
            end_date
        };
        let mut end = end_inclusive + Days::new(1);

        let duration = day_difference(start, end);
        let min = self.min_date.map(|m| m.date());
        let max = self.max_date.map(|m| m.date());

        if let Some(min) = min {
            if min > start {
                start = min;
                end = add_interval(start, IntervalUnit::Day, duration);
            }
        }
        if let Some(max) = max {
            if max < end {
                end = max;
                start = add_interval(end, IntervalUnit::Day, -duration);
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > start {
                // Shifting cannot satisfy both bounds: collapse to them.
                start = min;
                end = max;
            }
        }

        DisplayInterval::new(start_of_day(start), start_of_day(end.max(start)))
    }

    /// Whether the query is in single-date mode.
    #[must_use]
    pub fn uses_reference_date(&self) -> bool {
        self.reference_date.is_some()
    }
}

/// Convenience for building a single-date query the way widget callers do.
impl IntervalQuery {
    #[must_use]
    pub fn for_reference_date(
        reference: NaiveDateTime,
        unit: IntervalUnit,
        steps: i64,
    ) -> Self {
        Self {
            reference_date: Some(reference),
            unit,
            steps,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_range(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }
}
