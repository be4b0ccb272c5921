use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::config::ResolvedMatrixConfig;
use crate::core::overlap::{LayoutProfile, LayoutSpan, OverlapLayout, PixelSpan};
use crate::core::projection::matrix_position_at;
use crate::core::rows::{self, RowHeightPlan};
use crate::core::time::{day_difference, floor_to_day, is_start_of_day, start_of_day};
use crate::core::types::{ItemId, RenderItem, TimeRange};

/// Renderer kind of a matrix item.
///
/// Items spanning at least a whole day render as horizontal bars across the
/// cells; shorter items render as one-line labels inside their day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixItemKind {
    Horizontal,
    Label,
}

/// Kind an item renders as, by duration.
#[must_use]
pub fn item_kind(item: &RenderItem) -> MatrixItemKind {
    let minutes = (item.end_time - item.start_time).num_minutes().abs();
    if minutes >= 1440 {
        MatrixItemKind::Horizontal
    } else {
        MatrixItemKind::Label
    }
}

/// Geometry of one matrix item renderer, in row-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixItemGeometry {
    pub item_id: ItemId,
    pub kind: MatrixItemKind,
    /// Lane assigned by the overlap layout; labels stack per cell instead.
    pub lane: Option<usize>,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Placement of one expand/collapse affordance at the bottom of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpandSlot {
    pub column: usize,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Layout of one matrix row (a week of day cells).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatrixRowLayout {
    pub items: Vec<MatrixItemGeometry>,
    /// Items that did not fit, per column; they surface through the expand
    /// affordance instead of rendering.
    pub hidden: Vec<Vec<ItemId>>,
    /// Lanes needed to display every item visible from each column.
    pub lanes_per_column: Vec<usize>,
    /// Height needed to display all item renderers of this row.
    pub natural_height: f64,
    pub expand_slots: Vec<ExpandSlot>,
}

/// Lays out one matrix row.
///
/// `row_start` is the first day of the row, `row_width`/`row_height` the
/// pixel size of its item container. Items should intersect the row's range;
/// anything outside is clipped away silently. While a row is expanded the
/// caller lays out only that row.
#[must_use]
pub fn layout_row(
    config: &ResolvedMatrixConfig,
    row_start: NaiveDate,
    row_width: f64,
    row_height: f64,
    items: &[RenderItem],
) -> MatrixRowLayout {
    let column_count = config.column_count;
    let mut layout = MatrixRowLayout {
        hidden: vec![Vec::new(); column_count],
        lanes_per_column: vec![0; column_count],
        ..MatrixRowLayout::default()
    };
    if row_width <= 0.0 || column_count == 0 {
        return layout;
    }

    let row_range = TimeRange::new(
        start_of_day(row_start),
        start_of_day(row_start + Days::new(column_count as u64)),
    );
    let column_width = row_width / column_count as f64;

    let mut horizontal = Vec::new();
    let mut labels = Vec::new();
    for item in items {
        if !item.is_renderable() {
            continue;
        }
        match item_kind(item) {
            MatrixItemKind::Horizontal => horizontal.push(item),
            MatrixItemKind::Label => labels.push(item),
        }
    }

    let spans = project_horizontal_spans(config, &horizontal, row_range, row_start, column_width, row_width);
    let overlap = OverlapLayout::compute(
        &spans.iter().map(|projected| projected.span).collect::<Vec<_>>(),
        LayoutProfile::matrix(),
    );

    let columns: Vec<PixelSpan> = (0..column_count)
        .map(|column| {
            PixelSpan::new(
                column as f64 * column_width,
                (column as f64 + 1.0) * column_width,
            )
        })
        .collect();
    let lanes_per_column = overlap.lanes_by_column(&columns);

    let horizontal_offsets = horizontal_offsets(config, &lanes_per_column);
    let label_columns = stack_labels(&labels, row_range, row_start, column_count);
    let label_offsets: Vec<f64> = label_columns
        .iter()
        .map(|list| list.len() as f64 * (config.label_height + config.vertical_gap))
        .collect();

    let mut has_hidden = vec![false; column_count];
    let mut natural_height = 0.0f64;
    for column in 0..column_count {
        let height = horizontal_offsets[column] + label_offsets[column];
        natural_height = natural_height.max(height);
        has_hidden[column] = height > row_height;
    }
    layout.natural_height = natural_height;

    place_horizontal_items(
        config,
        &spans,
        &overlap,
        row_height,
        &has_hidden,
        &mut layout,
    );
    place_label_items(
        config,
        &label_columns,
        &horizontal_offsets,
        &lanes_per_column,
        column_width,
        row_height,
        &has_hidden,
        &mut layout,
    );
    layout.lanes_per_column = lanes_per_column;

    for (column, _) in has_hidden.iter().enumerate().filter(|(_, hidden)| **hidden) {
        layout.expand_slots.push(ExpandSlot {
            column,
            top: row_height - config.expand_height - 1.0,
            left: column as f64 * column_width,
            width: column_width,
            height: config.expand_height,
        });
    }

    trace!(
        row_start = %row_start,
        items = layout.items.len(),
        natural_height = layout.natural_height,
        "matrix row layout"
    );
    layout
}

struct ProjectedSpan {
    span: LayoutSpan,
    /// Inclusive range of day cells the pixel span touches.
    first_column: usize,
    last_column: usize,
}

fn project_horizontal_spans(
    config: &ResolvedMatrixConfig,
    items: &[&RenderItem],
    row_range: TimeRange,
    row_start: NaiveDate,
    column_width: f64,
    row_width: f64,
) -> Vec<ProjectedSpan> {
    let column_count = config.column_count;
    let mut spans = Vec::with_capacity(items.len());

    for item in items {
        let Some(overlap) = item.time_range().clip(row_range) else {
            continue;
        };

        let start_offset = day_difference(row_start, overlap.start.date()).max(0) as usize;
        let mut start = start_offset as f64 * column_width;
        if !config.round_to_day && !item.all_day {
            start += day_fraction(overlap.start) * column_width;
        }
        let start = start.ceil();

        let end_offset = day_difference(row_start, overlap.end.date()).max(0) as usize;
        let end = if end_offset > column_count - 1 {
            row_width
        } else {
            let mut end = end_offset as f64 * column_width;
            if config.round_to_day {
                if !is_start_of_day(overlap.end) {
                    end += column_width;
                }
            } else {
                end += day_fraction(overlap.end) * column_width;
            }
            end
        };
        let end = end.floor();

        if end > start {
            let first_column = ((start / column_width).floor() as usize).min(column_count - 1);
            let last_column = ((end / column_width).ceil() as usize)
                .saturating_sub(1)
                .clamp(first_column, column_count - 1);
            spans.push(ProjectedSpan {
                span: LayoutSpan::new(item.id, start, end),
                first_column,
                last_column,
            });
        }
    }
    spans
}

fn day_fraction(time: NaiveDateTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / 86_400.0
}

/// Vertical space consumed in each column by the horizontal lanes, including
/// the cell's top padding.
fn horizontal_offsets(config: &ResolvedMatrixConfig, lanes_per_column: &[usize]) -> Vec<f64> {
    let v_overlap = config.percent_overlap / 100.0;
    let item_height = config.item_height;

    lanes_per_column
        .iter()
        .map(|&lanes| {
            let lanes_f = lanes as f64;
            let stacked = if lanes == 0 {
                0.0
            } else if v_overlap == 0.0 {
                if lanes == 1 {
                    item_height
                } else {
                    item_height + (lanes_f - 1.0) * (item_height + config.vertical_gap)
                }
            } else {
                lanes_f * item_height - (lanes_f - 1.0) * (v_overlap * item_height)
                    + config.vertical_gap
            };
            stacked + config.cell_padding_top
        })
        .collect()
}

/// One stacked label entry: the item clipped to its day cell.
fn stack_labels(
    items: &[&RenderItem],
    row_range: TimeRange,
    row_start: NaiveDate,
    column_count: usize,
) -> Vec<Vec<(ItemId, TimeRange)>> {
    let mut columns: Vec<Vec<(ItemId, TimeRange)>> = vec![Vec::new(); column_count];

    for item in items {
        let mut day = floor_to_day(item.start_time);
        // One entry per day cell the item touches inside this row.
        while day < item.end_time && day < row_range.end {
            let day_end = start_of_day(day.date() + Days::new(1));
            let cell = TimeRange::new(day, day_end);
            if let Some(overlap) = item.time_range().clip(cell) {
                let offset = day_difference(row_start, overlap.start.date());
                if offset >= column_count as i64 {
                    break;
                }
                if offset >= 0 {
                    columns[offset as usize].push((item.id, overlap));
                }
            }
            day = day_end;
        }
    }

    for column in &mut columns {
        column.sort_by_key(|(_, range)| range.start);
    }
    columns
}

fn place_horizontal_items(
    config: &ResolvedMatrixConfig,
    spans: &[ProjectedSpan],
    overlap: &OverlapLayout,
    row_height: f64,
    has_hidden: &[bool],
    layout: &mut MatrixRowLayout,
) {
    let v_overlap = config.percent_overlap / 100.0;
    let item_height = config.item_height;

    for projected in spans {
        let Some(placement) = overlap.placement(projected.span.id) else {
            continue;
        };
        let lane = placement.lane as f64;
        let top = config.cell_padding_top
            + if v_overlap == 0.0 {
                lane * (item_height + config.vertical_gap)
            } else {
                lane * (item_height - v_overlap * item_height)
            };

        let needs_expand = has_hidden[projected.first_column..=projected.last_column]
            .iter()
            .any(|&hidden| hidden);
        let max_height = if needs_expand {
            row_height - config.expand_height
        } else {
            row_height
        };

        if top + item_height <= max_height {
            layout.items.push(MatrixItemGeometry {
                item_id: projected.span.id,
                kind: MatrixItemKind::Horizontal,
                lane: Some(placement.lane),
                top,
                left: projected.span.span.start,
                width: projected.span.span.length(),
                height: item_height,
            });
        } else {
            for column in projected.first_column..=projected.last_column {
                layout.hidden[column].push(projected.span.id);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn place_label_items(
    config: &ResolvedMatrixConfig,
    label_columns: &[Vec<(ItemId, TimeRange)>],
    horizontal_offsets: &[f64],
    lanes_per_column: &[usize],
    column_width: f64,
    row_height: f64,
    has_hidden: &[bool],
    layout: &mut MatrixRowLayout,
) {
    for (column, list) in label_columns.iter().enumerate() {
        if list.is_empty() {
            continue;
        }
        let max_height = if has_hidden[column] {
            row_height - config.expand_height
        } else {
            row_height
        };
        let mut top = if lanes_per_column[column] > 0 {
            horizontal_offsets[column] + config.vertical_gap
        } else {
            config.cell_padding_top
        };

        let mut placed = 0;
        for (item_id, _) in list {
            if top + config.label_height + config.vertical_gap > max_height {
                break;
            }
            layout.items.push(MatrixItemGeometry {
                item_id: *item_id,
                kind: MatrixItemKind::Label,
                lane: None,
                top,
                left: column as f64 * column_width,
                width: column_width,
                height: config.label_height,
            });
            top += config.label_height + config.vertical_gap;
            placed += 1;
        }
        for (item_id, _) in &list[placed..] {
            layout.hidden[column].push(*item_id);
        }
    }
}

/// Expand/collapse toggle decision for a row-header or affordance click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowToggleAction {
    Expand(usize),
    Collapse,
    /// Another row is expanded: collapse it first, then expand the clicked
    /// row when the collapse animation ends.
    CollapseThenExpand { collapse: usize, expand: usize },
}

/// Resolves a click on `clicked` against the currently expanded row.
#[must_use]
pub fn toggle_row(expanded: Option<usize>, clicked: usize) -> RowToggleAction {
    match expanded {
        Some(current) if current == clicked => RowToggleAction::Collapse,
        Some(current) => RowToggleAction::CollapseThenExpand {
            collapse: current,
            expand: clicked,
        },
        None => RowToggleAction::Expand(clicked),
    }
}

/// A pure expand or collapse transition of one row.
///
/// The external animation clock drives [`ExpandAnimation::frame`] with a
/// progress in `[0, 1]`; every frame's heights sum to `total_height - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpandAnimation {
    pub row: usize,
    pub from: f64,
    pub to: f64,
    pub total_height: f64,
    pub row_count: usize,
}

impl ExpandAnimation {
    /// Transition expanding `row` from its collapsed height to the
    /// fill-remaining-space target.
    #[must_use]
    pub fn expanding(
        config: &ResolvedMatrixConfig,
        total_height: f64,
        row: usize,
    ) -> Self {
        let collapsed = RowHeightPlan::distribute(total_height, config.row_count, None);
        Self {
            row,
            from: collapsed.height_of(row),
            to: rows::expanded_target_height(total_height, config.row_count, config.cell_padding_top),
            total_height,
            row_count: config.row_count,
        }
    }

    /// Transition collapsing `row` from its current expanded height back to
    /// its collapsed height.
    #[must_use]
    pub fn collapsing(
        config: &ResolvedMatrixConfig,
        total_height: f64,
        row: usize,
        expanded_height: f64,
    ) -> Self {
        let collapsed = RowHeightPlan::distribute(total_height, config.row_count, None);
        Self {
            row,
            from: expanded_height,
            to: collapsed.height_of(row),
            total_height,
            row_count: config.row_count,
        }
    }

    /// Row heights at `progress`.
    #[must_use]
    pub fn frame(&self, progress: f64) -> RowHeightPlan {
        rows::animation_frame(
            self.total_height,
            self.row_count,
            self.row,
            self.from,
            self.to,
            progress,
        )
    }
}

/// Resolves a point in the matrix item container to the date/time it shows.
///
/// Hit-testing uses uniform row heights; while a row is expanded only that
/// row is addressable, matching the interactive behavior of the grid.
#[must_use]
pub fn time_at(
    config: &ResolvedMatrixConfig,
    grid_start: NaiveDate,
    width: f64,
    height: f64,
    expanded_row: Option<usize>,
    x: f64,
    y: f64,
) -> Option<NaiveDateTime> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let row = match expanded_row {
        Some(row) => row.min(config.row_count - 1),
        None => {
            let row_height = height / config.row_count as f64;
            ((y.clamp(0.0, height - 1.0) / row_height).floor() as usize)
                .min(config.row_count - 1)
        }
    };
    let (column, minutes) = matrix_position_at(x, width, config.column_count);
    let day = grid_start + Days::new((row * config.column_count + column) as u64);
    Some(start_of_day(day) + chrono::Duration::minutes(i64::from(minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::MatrixViewConfig;
    use crate::core::time::start_of_day;
    use chrono::Duration;

    fn config() -> ResolvedMatrixConfig {
        MatrixViewConfig::default().resolve()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn all_day(id: u64, start: NaiveDate, days: u64) -> RenderItem {
        let mut item = RenderItem::new(
            ItemId::new(id),
            start_of_day(start),
            start_of_day(start + Days::new(days)),
        );
        item.all_day = true;
        item
    }

    #[test]
    fn multi_day_item_spans_cells() {
        // Monday-start row, item covering Tue..Thu.
        let row_start = date(2024, 3, 11);
        let layout = layout_row(
            &config(),
            row_start,
            700.0,
            120.0,
            &[all_day(1, date(2024, 3, 12), 3)],
        );
        assert_eq!(layout.items.len(), 1);
        let geometry = layout.items[0];
        assert_eq!(geometry.left, 100.0);
        assert_eq!(geometry.width, 300.0);
        assert_eq!(geometry.top, 16.0);
        assert_eq!(layout.lanes_per_column, vec![0, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn short_items_become_labels() {
        let row_start = date(2024, 3, 11);
        let start = start_of_day(date(2024, 3, 13)) + Duration::hours(9);
        let item = RenderItem::new(ItemId::new(7), start, start + Duration::hours(2));
        let layout = layout_row(&config(), row_start, 700.0, 120.0, &[item]);
        assert_eq!(layout.items.len(), 1);
        let geometry = layout.items[0];
        assert_eq!(geometry.kind, MatrixItemKind::Label);
        assert_eq!(geometry.left, 200.0);
        assert_eq!(geometry.width, 100.0);
        assert_eq!(geometry.top, 16.0);
    }

    #[test]
    fn overflow_collects_hidden_items_and_expand_slots() {
        let row_start = date(2024, 3, 11);
        // Row height fits one lane (padding 16 + 17 = 33 < 40, two lanes
        // need 52): the second overlapping item goes hidden.
        let items: Vec<RenderItem> = (0..3)
            .map(|i| all_day(i, date(2024, 3, 12), 2))
            .collect();
        let layout = layout_row(&config(), row_start, 700.0, 40.0, &items);
        assert!(!layout.hidden[1].is_empty());
        assert!(layout.expand_slots.iter().any(|slot| slot.column == 1));
        assert!(layout.natural_height > 40.0);
    }

    #[test]
    fn toggle_follows_single_expansion_policy() {
        assert_eq!(toggle_row(None, 2), RowToggleAction::Expand(2));
        assert_eq!(toggle_row(Some(2), 2), RowToggleAction::Collapse);
        assert_eq!(
            toggle_row(Some(1), 3),
            RowToggleAction::CollapseThenExpand {
                collapse: 1,
                expand: 3
            }
        );
    }

    #[test]
    fn hit_test_resolves_cell_dates() {
        let grid_start = date(2024, 3, 11);
        let time = time_at(&config(), grid_start, 700.0, 500.0, None, 350.0, 250.0)
            .expect("time resolved");
        // Row 2, column 3 → 2024-03-28 at noon.
        assert_eq!(time.date(), date(2024, 3, 28));
        assert_eq!(time.hour(), 12);
    }
}
