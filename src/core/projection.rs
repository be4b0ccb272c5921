use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::time::start_of_day;
use crate::core::types::TimeRange;
use crate::error::{CalendarError, CalendarResult};

/// Linear projection between a time range and a pixel extent.
///
/// Direction-agnostic: right-to-left display flips the pixel axis at the call
/// site, never in here. The inverse mapping is unsnapped for rendering
/// positions; interaction code resolving a click to a time goes through
/// [`TimeProjection::pixel_to_time_snapped`] instead. Reversing the two
/// causes render jitter in one direction and imprecise editing in the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeProjection {
    range: TimeRange,
    pixel_extent: f64,
}

impl TimeProjection {
    pub fn new(range: TimeRange, pixel_extent: f64) -> CalendarResult<Self> {
        if range.is_empty() {
            return Err(CalendarError::InvalidData(
                "projection range must not be empty".to_owned(),
            ));
        }
        if !pixel_extent.is_finite() || pixel_extent <= 0.0 {
            return Err(CalendarError::InvalidSheetExtent(pixel_extent));
        }
        Ok(Self {
            range,
            pixel_extent,
        })
    }

    /// Projection over one date's displayed hour window, the mapping used by
    /// column sheets.
    pub fn for_day_window(
        day: NaiveDate,
        min_hours: u32,
        max_hours: u32,
        sheet_height: f64,
    ) -> CalendarResult<Self> {
        let midnight = start_of_day(day);
        let range = TimeRange::new(
            midnight + Duration::hours(i64::from(min_hours)),
            midnight + Duration::hours(i64::from(max_hours)),
        );
        Self::new(range, sheet_height)
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    #[must_use]
    pub fn pixel_extent(&self) -> f64 {
        self.pixel_extent
    }

    /// Maps a time to a pixel offset, clamped to `[0, pixel_extent]`.
    #[must_use]
    pub fn time_to_pixel(&self, time: NaiveDateTime) -> f64 {
        let span = span_millis(self.range);
        let offset = (time - self.range.start).num_milliseconds() as f64;
        ((offset / span) * self.pixel_extent).clamp(0.0, self.pixel_extent)
    }

    /// Maps a pixel offset back to a continuous time (rendering use; never
    /// snapped).
    #[must_use]
    pub fn pixel_to_time(&self, pixel: f64) -> NaiveDateTime {
        let ratio = (pixel / self.pixel_extent).clamp(0.0, 1.0);
        let offset = (ratio * span_millis(self.range)).round() as i64;
        self.range.start + Duration::milliseconds(offset)
    }

    /// Maps a pixel offset to a time snapped to the nearest grid unit
    /// (interaction use: click-to-time, drag editing).
    ///
    /// The snap grid is anchored at the range start. `snap_minutes == 0`
    /// leaves the time unsnapped.
    #[must_use]
    pub fn pixel_to_time_snapped(&self, pixel: f64, snap_minutes: u32) -> NaiveDateTime {
        let continuous = self.pixel_to_time(pixel);
        if snap_minutes == 0 {
            return continuous;
        }
        let grid = f64::from(snap_minutes) * 60_000.0;
        let offset = (continuous - self.range.start).num_milliseconds() as f64;
        let snapped = (offset / grid).round() * grid;
        self.range.start + Duration::milliseconds(snapped as i64)
    }
}

fn span_millis(range: TimeRange) -> f64 {
    (range.end - range.start).num_milliseconds() as f64
}

/// A wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
}

impl TimeOfDay {
    #[must_use]
    pub const fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    #[must_use]
    pub const fn total_minutes(self) -> u32 {
        self.hours * 60 + self.minutes
    }

    #[must_use]
    pub const fn from_total_minutes(total: u32) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

/// Time of day at a vertical offset within a column sheet displaying
/// `[min_hours, max_hours]` over `sheet_height` pixels.
#[must_use]
pub fn time_of_day_at(
    pos: f64,
    min_hours: u32,
    max_hours: u32,
    sheet_height: f64,
) -> TimeOfDay {
    if sheet_height <= 0.0 || max_hours <= min_hours {
        return TimeOfDay::new(min_hours, 0);
    }
    let min_minutes = f64::from(min_hours) * 60.0;
    let max_minutes = f64::from(max_hours) * 60.0;
    let pos = pos.clamp(0.0, sheet_height);
    let minutes = min_minutes + pos * (max_minutes - min_minutes) / sheet_height;
    TimeOfDay {
        hours: (minutes / 60.0).floor() as u32,
        minutes: (minutes % 60.0).floor() as u32,
    }
}

/// Vertical offset of a time of day within the displayed hour window,
/// clamped into the window.
#[must_use]
pub fn pixel_for_time_of_day(
    time: TimeOfDay,
    min_hours: u32,
    max_hours: u32,
    sheet_height: f64,
) -> f64 {
    if sheet_height <= 0.0 || max_hours <= min_hours {
        return 0.0;
    }
    let min_minutes = f64::from(min_hours) * 60.0;
    let max_minutes = f64::from(max_hours) * 60.0;
    let minutes = f64::from(time.total_minutes()).clamp(min_minutes, max_minutes);
    (minutes - min_minutes) * sheet_height / (max_minutes - min_minutes)
}

/// Column index and minutes-of-day at a horizontal offset within a matrix
/// row, where each of `column_count` cells spans one 1440-minute day.
#[must_use]
pub fn matrix_position_at(x: f64, width: f64, column_count: usize) -> (usize, u32) {
    if width <= 0.0 || column_count == 0 {
        return (0, 0);
    }
    let x = x.clamp(0.0, width - 1.0);
    let column_width = width / column_count as f64;
    let column = ((x / column_width).floor() as usize).min(column_count - 1);
    let minutes = ((x - column as f64 * column_width) * 1440.0 / column_width).floor();
    (column, minutes.clamp(0.0, 1439.0) as u32)
}
