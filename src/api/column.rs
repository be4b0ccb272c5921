use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::config::ResolvedColumnConfig;
use crate::core::overlap::{LayoutProfile, LayoutSpan, OverlapLayout};
use crate::core::projection::{self, TimeOfDay, TimeProjection};
use crate::core::types::{ItemId, RenderItem};
use crate::error::CalendarResult;

/// Geometry of one vertical item renderer inside a day column.
///
/// Horizontal placement is expressed in percent of the (sub-)column width so
/// the caller can apply it without knowing the column's pixel width; vertical
/// placement is in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnItemGeometry {
    pub item_id: ItemId,
    pub sub_column: usize,
    pub lane: usize,
    pub extent: u32,
    pub top: f64,
    pub height: f64,
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Layout of all vertical items of one day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnDayLayout {
    pub items: Vec<ColumnItemGeometry>,
    pub num_lanes: usize,
}

/// Lays out the items of one day column (all sub-columns).
///
/// Items are clipped to the day's displayed hour window before projection;
/// anything collapsing to an empty span is dropped silently. Malformed items
/// (`end <= start`) are excluded, not errors.
pub fn layout_day(
    config: &ResolvedColumnConfig,
    date: NaiveDate,
    items: &[RenderItem],
) -> CalendarResult<ColumnDayLayout> {
    let projection = TimeProjection::for_day_window(
        date,
        config.min_hours,
        config.max_hours,
        config.sheet_height,
    )?;

    let sub_count = config.sub_column_count();
    let mut layout = ColumnDayLayout::default();

    for sub_index in 0..sub_count {
        let sub_layout = layout_sub_column(config, &projection, items, sub_index);
        layout.num_lanes = layout.num_lanes.max(sub_layout.num_lanes);
        layout.items.extend(sub_layout.items);
    }

    trace!(
        date = %date,
        items = layout.items.len(),
        lanes = layout.num_lanes,
        "column day layout"
    );
    Ok(layout)
}

fn layout_sub_column(
    config: &ResolvedColumnConfig,
    projection: &TimeProjection,
    items: &[RenderItem],
    sub_index: usize,
) -> ColumnDayLayout {
    let sub_name = config
        .sub_columns
        .as_ref()
        .and_then(|names| names.get(sub_index));

    let mut spans = Vec::new();
    for item in items {
        if !item.is_renderable() {
            continue;
        }
        // With sub-columns active, items carry the sub-column they belong to;
        // unmatched items belong to another sheet.
        if config.sub_column_count() > 1 && item.sub_column.as_ref() != sub_name {
            continue;
        }
        if !is_item_in_hour_window(item, config.min_hours, config.max_hours) {
            continue;
        }
        let Some(clipped) = item.time_range().clip(projection.range()) else {
            continue;
        };
        let top = projection.time_to_pixel(clipped.start);
        let bottom = projection.time_to_pixel(clipped.end);
        if bottom > top {
            spans.push(LayoutSpan::new(item.id, top, bottom));
        }
    }

    let overlap = OverlapLayout::compute(&spans, LayoutProfile::columns());
    let num_lanes = overlap.num_lanes();
    let h_overlap = config.percent_overlap / 100.0;

    let items = spans
        .iter()
        .filter_map(|span| {
            let placement = overlap.placement(span.id)?;
            let extent = placement.extent.lanes();
            let (left, width) =
                horizontal_placement(num_lanes, placement.lane, extent, h_overlap);
            Some(ColumnItemGeometry {
                item_id: span.id,
                sub_column: sub_index,
                lane: placement.lane,
                extent,
                top: span.span.start,
                height: span.span.length() + 1.0,
                left_percent: left,
                width_percent: width,
            })
        })
        .collect();

    ColumnDayLayout { items, num_lanes }
}

/// Percent-of-column placement for a lane/extent pair.
///
/// With overlap, lanes shingle over each other; with a negative overlap the
/// lanes spread apart and leave a gap.
#[must_use]
pub fn horizontal_placement(
    num_lanes: usize,
    lane: usize,
    extent: u32,
    h_overlap: f64,
) -> (f64, f64) {
    let lanes = num_lanes.max(1) as f64;
    let width = if num_lanes <= 1 {
        100.0
    } else {
        100.0 / (lanes - (lanes - 1.0) * h_overlap)
    };
    let left = lane as f64 * (width - h_overlap * width);
    let item_width = if extent <= 1 {
        width
    } else {
        let extent = f64::from(extent);
        width * (extent - (extent - 1.0) * h_overlap)
    };
    (left, item_width)
}

/// Whether the item shows up in a sheet displaying `[min_hours, max_hours]`.
///
/// Items longer than the hidden `[max_hours, next-day min_hours]` band are
/// always visible. Shorter items are excluded as soon as either endpoint's
/// time of day falls strictly inside the hidden band; midnight endpoints are
/// exempt.
#[must_use]
pub fn is_item_in_hour_window(item: &RenderItem, min_hours: u32, max_hours: u32) -> bool {
    let length_minutes = (item.end_time - item.start_time).num_minutes();
    let hidden_minutes = (24 - i64::from(max_hours) + i64::from(min_hours)) * 60;
    // Items longer than the hidden band always show somewhere.
    if length_minutes > hidden_minutes {
        return true;
    }

    let window_start = i64::from(min_hours) * 60;
    let window_end = i64::from(max_hours) * 60;
    let start_minutes = minutes_of_day(item.start_time);
    let end_minutes = minutes_of_day(item.end_time);

    let outside = |minutes: i64| {
        (minutes > 0 && minutes < window_start) || (minutes > window_end && minutes <= 1440)
    };
    !(outside(start_minutes) || outside(end_minutes))
}

fn minutes_of_day(time: chrono::NaiveDateTime) -> i64 {
    use chrono::Timelike;
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Target of an `ensure_visibility` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityTarget {
    Start,
    End,
    Both,
}

/// First time of day visible at the given scroll offset.
#[must_use]
pub fn first_visible_time_of_day(config: &ResolvedColumnConfig, scroll_top: f64) -> TimeOfDay {
    projection::time_of_day_at(
        scroll_top,
        config.min_hours,
        config.max_hours,
        config.sheet_height,
    )
}

/// Last time of day visible at the given scroll offset.
#[must_use]
pub fn last_visible_time_of_day(
    config: &ResolvedColumnConfig,
    scroll_top: f64,
    viewport_height: f64,
) -> TimeOfDay {
    projection::time_of_day_at(
        scroll_top + viewport_height,
        config.min_hours,
        config.max_hours,
        config.sheet_height,
    )
}

/// Scroll offset that brings `time` to the top of the viewport, clamped so
/// the sheet never over-scrolls.
#[must_use]
pub fn scroll_position_for(
    config: &ResolvedColumnConfig,
    time: TimeOfDay,
    viewport_height: f64,
) -> f64 {
    let position = projection::pixel_for_time_of_day(
        time,
        config.min_hours,
        config.max_hours,
        config.sheet_height,
    );
    position.min((config.sheet_height - viewport_height).max(0.0))
}

/// Scroll target making `[start, end]` visible, or `None` when the range
/// already is.
///
/// `margin_minutes` pads the range; the returned time of day is meant to be
/// fed into [`scroll_position_for`].
#[must_use]
pub fn ensure_visibility(
    config: &ResolvedColumnConfig,
    start: TimeOfDay,
    end: TimeOfDay,
    target: VisibilityTarget,
    margin_minutes: u32,
    scroll_top: f64,
    viewport_height: f64,
) -> Option<TimeOfDay> {
    let s = i64::from(start.total_minutes()) - i64::from(margin_minutes);
    let e = i64::from(end.total_minutes()) + i64::from(margin_minutes);

    let view_start = i64::from(first_visible_time_of_day(config, scroll_top).total_minutes());
    let view_end = i64::from(
        last_visible_time_of_day(config, scroll_top, viewport_height).total_minutes(),
    );

    let (visible, target_minutes) = match target {
        VisibilityTarget::Start => (s >= view_start && s <= view_end, s),
        VisibilityTarget::End => (e >= view_start && e <= view_end, e - (view_end - view_start)),
        VisibilityTarget::Both => (s >= view_start && e <= view_end, s),
    };

    if visible {
        None
    } else {
        Some(TimeOfDay::from_total_minutes(
            target_minutes.clamp(0, 36 * 60) as u32,
        ))
    }
}

/// Scroll offset after stepping one time slot up or down.
#[must_use]
pub fn scroll_step(
    config: &ResolvedColumnConfig,
    scroll_top: f64,
    viewport_height: f64,
    direction: i32,
) -> f64 {
    let current = first_visible_time_of_day(config, scroll_top);
    let minutes = i64::from(current.total_minutes())
        + i64::from(direction) * i64::from(config.time_slot_duration);
    let target = TimeOfDay::from_total_minutes(minutes.clamp(0, 36 * 60) as u32);
    scroll_position_for(config, target, viewport_height)
}

/// Lays out several day columns in one call.
///
/// `days` pairs each date with the items intersecting it. With the
/// `parallel-layout` feature the columns are laid out on the rayon pool.
pub fn layout_days(
    config: &ResolvedColumnConfig,
    days: &[(NaiveDate, Vec<RenderItem>)],
) -> CalendarResult<Vec<ColumnDayLayout>> {
    #[cfg(feature = "parallel-layout")]
    {
        use rayon::prelude::*;
        return days
            .par_iter()
            .map(|(date, items)| layout_day(config, *date, items))
            .collect();
    }

    #[cfg(not(feature = "parallel-layout"))]
    {
        days.iter()
            .map(|(date, items)| layout_day(config, *date, items))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::ColumnViewConfig;
    use crate::core::time::start_of_day;
    use chrono::Duration;

    fn config() -> ResolvedColumnConfig {
        ColumnViewConfig {
            min_hours: 8,
            max_hours: 18,
            hour_size: 100.0,
            ..ColumnViewConfig::default()
        }
        .resolve()
    }

    fn item(id: u64, date: NaiveDate, start_h: i64, start_m: i64, end_h: i64, end_m: i64) -> RenderItem {
        let midnight = start_of_day(date);
        RenderItem::new(
            ItemId::new(id),
            midnight + Duration::minutes(start_h * 60 + start_m),
            midnight + Duration::minutes(end_h * 60 + end_m),
        )
    }

    #[test]
    fn canonical_three_item_lane_assignment() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");
        // A[09:00,10:00) B[09:30,11:00) C[10:30,11:30): C reuses lane 0.
        let layout = layout_day(
            &config(),
            date,
            &[
                item(1, date, 9, 0, 10, 0),
                item(2, date, 9, 30, 11, 0),
                item(3, date, 10, 30, 11, 30),
            ],
        )
        .expect("layout");

        let lane_of = |id: u64| {
            layout
                .items
                .iter()
                .find(|geometry| geometry.item_id == ItemId::new(id))
                .map(|geometry| geometry.lane)
        };
        assert_eq!(lane_of(1), Some(0));
        assert_eq!(lane_of(2), Some(1));
        assert_eq!(lane_of(3), Some(0));
        assert_eq!(layout.num_lanes, 2);
    }

    #[test]
    fn hidden_band_items_are_excluded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");
        let layout = layout_day(&config(), date, &[item(1, date, 19, 0, 20, 0)])
            .expect("layout");
        assert!(layout.items.is_empty());
    }

    #[test]
    fn overlap_placement_shingles_lanes() {
        let (left0, width) = horizontal_placement(2, 0, 1, 0.7);
        let (left1, _) = horizontal_placement(2, 1, 1, 0.7);
        // Two lanes at 70% overlap: each takes ~76.9% and lane 1 starts at
        // ~23.1%.
        approx::assert_abs_diff_eq!(width, 100.0 / 1.3, epsilon = 1e-9);
        assert_eq!(left0, 0.0);
        approx::assert_abs_diff_eq!(left1, width * 0.3, epsilon = 1e-9);
    }
}
