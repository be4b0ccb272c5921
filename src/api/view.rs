use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::interval::{DisplayInterval, IntervalQuery};
use crate::core::time::{
    FirstDayOfWeek, IntervalUnit, add_interval, day_difference, floor_to_day, floor_to_week,
    start_of_day,
};

/// Which view displays the resolved interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    /// One day per column, up to a week.
    Columns,
    /// A matrix of day cells, one week per row.
    Matrix,
}

/// Time-range properties pushed to the active view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ViewConfiguration {
    Columns {
        start_date: NaiveDate,
        column_count: u32,
    },
    Matrix {
        start_date: NaiveDate,
        column_count: u32,
        row_count: u32,
        /// The interval of interest when the grid shows more days than were
        /// asked for (whole-week padding); cells outside it are flagged
        /// disabled for styling.
        ref_interval: Option<DisplayInterval>,
    },
}

impl ViewConfiguration {
    #[must_use]
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Columns { .. } => ViewKind::Columns,
            Self::Matrix { .. } => ViewKind::Matrix,
        }
    }
}

/// Selects the view for an interval: up to seven days fit the column view,
/// anything longer goes to the matrix.
#[must_use]
pub fn select_view(interval: DisplayInterval) -> ViewKind {
    if interval.duration_days() > 7 {
        ViewKind::Matrix
    } else {
        ViewKind::Columns
    }
}

/// Computes the time-range configuration of the active view.
///
/// Matrix intervals longer than a week show only whole weeks: the window is
/// widened to week boundaries and the original interval is kept as the
/// reference range.
#[must_use]
pub fn configure_view(
    interval: DisplayInterval,
    first_day_of_week: FirstDayOfWeek,
) -> ViewConfiguration {
    let duration = interval.duration_days().max(1);

    match select_view(interval) {
        ViewKind::Columns => ViewConfiguration::Columns {
            start_date: interval.start.date(),
            column_count: duration as u32,
        },
        ViewKind::Matrix => {
            let start = floor_to_week(interval.start.date(), first_day_of_week);
            let mut end = floor_to_week(interval.end.date(), first_day_of_week);
            if start_of_day(end) != floor_to_day(interval.end) {
                end = end + Days::new(7);
            }
            let days = day_difference(start, end).max(7);
            let configuration = ViewConfiguration::Matrix {
                start_date: start,
                column_count: 7,
                row_count: ((days + 6) / 7) as u32,
                ref_interval: Some(interval),
            };
            debug!(days, "configured matrix view");
            configuration
        }
    }
}

/// Moves the query one step towards the future.
///
/// Reference-date mode advances by `steps × unit`; range mode slides the
/// window past its own end, keeping the duration.
#[must_use]
pub fn next_range(query: &IntervalQuery) -> IntervalQuery {
    navigate(query, 1)
}

/// Moves the query one step towards the past.
#[must_use]
pub fn previous_range(query: &IntervalQuery) -> IntervalQuery {
    navigate(query, -1)
}

fn navigate(query: &IntervalQuery, direction: i64) -> IntervalQuery {
    let q = query.coerced();
    let mut next = q;

    match q.reference_date {
        Some(reference) => {
            let moved = add_interval(reference.date(), q.unit, direction * q.steps);
            next.reference_date = Some(start_of_day(moved));
        }
        None => {
            let (Some(start), Some(end)) = (q.start_date, q.end_date) else {
                return next;
            };
            let duration = day_difference(start.date(), end.date()).max(0);
            if direction >= 0 {
                let new_start = end.date() + Days::new(1);
                next.start_date = Some(start_of_day(new_start));
                next.end_date = Some(start_of_day(
                    add_interval(new_start, IntervalUnit::Day, duration),
                ));
            } else {
                let new_end = add_interval(start.date(), IntervalUnit::Day, -1);
                next.start_date = Some(start_of_day(
                    add_interval(new_end, IntervalUnit::Day, -duration),
                ));
                next.end_date = Some(start_of_day(new_end));
            }
        }
    }
    next
}

/// Rewrites the query to show the current day: reference date mode, one-day
/// unit, single step.
#[must_use]
pub fn go_to_day(query: &IntervalQuery, day: NaiveDate) -> IntervalQuery {
    IntervalQuery {
        reference_date: Some(start_of_day(day)),
        start_date: None,
        end_date: None,
        unit: IntervalUnit::Day,
        steps: 1,
        ..*query
    }
}
