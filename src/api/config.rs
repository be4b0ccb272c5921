use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column-view configuration as supplied by the embedding widget.
///
/// Serializable so hosts can persist calendar setup without inventing an
/// ad-hoc format. All values are lenient: out-of-range inputs coerce to the
/// documented defaults during [`ColumnViewConfig::resolve`], because a wrong
/// value must never leave the calendar in a broken visual state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnViewConfig {
    /// Number of day columns displayed from the start date.
    #[serde(default = "default_column_count")]
    pub column_count: usize,
    /// First displayed hour, in `[0, 23]`.
    #[serde(default = "default_min_hours")]
    pub min_hours: i32,
    /// Last displayed hour, in `[1, 36]` (past-midnight windows allowed).
    #[serde(default = "default_max_hours")]
    pub max_hours: i32,
    /// Desired on-screen size of one hour, in pixels.
    #[serde(default = "default_hour_size")]
    pub hour_size: f64,
    /// Time slot duration in minutes; must divide 60.
    #[serde(default = "default_time_slot_duration")]
    pub time_slot_duration: u32,
    /// Percentage of renderer width overlapping between concurrent items.
    /// Negative values leave a gap instead.
    #[serde(default = "default_column_percent_overlap")]
    pub percent_overlap: f64,
    /// Snap grid in minutes for click-to-time resolution.
    #[serde(default = "default_time_slot_duration")]
    pub snap_minutes: u32,
    /// Sub-column names (e.g. one per resource sharing a day column).
    #[serde(default)]
    pub sub_columns: Option<Vec<String>>,
}

fn default_column_count() -> usize {
    7
}
fn default_min_hours() -> i32 {
    8
}
fn default_max_hours() -> i32 {
    18
}
fn default_hour_size() -> f64 {
    100.0
}
fn default_time_slot_duration() -> u32 {
    15
}
fn default_column_percent_overlap() -> f64 {
    70.0
}

impl Default for ColumnViewConfig {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            hour_size: default_hour_size(),
            time_slot_duration: default_time_slot_duration(),
            percent_overlap: default_column_percent_overlap(),
            snap_minutes: default_time_slot_duration(),
            sub_columns: None,
        }
    }
}

/// Column-view configuration after coercion, with the derived sheet metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumnConfig {
    pub column_count: usize,
    pub min_hours: u32,
    pub max_hours: u32,
    pub hour_count: u32,
    /// Effective hour size after rounding to whole-pixel slots.
    pub hour_size: f64,
    pub time_slot_duration: u32,
    /// Height of one time slot, in whole pixels.
    pub slot_size: f64,
    /// Total sheet height: `hour_size * hour_count`.
    pub sheet_height: f64,
    pub percent_overlap: f64,
    pub snap_minutes: u32,
    pub sub_columns: Option<Vec<String>>,
}

impl ResolvedColumnConfig {
    #[must_use]
    pub fn sub_column_count(&self) -> usize {
        self.sub_columns.as_ref().map_or(1, |cols| cols.len().max(1))
    }
}

impl ColumnViewConfig {
    /// Applies the coercion rules and derives the sheet metrics.
    #[must_use]
    pub fn resolve(&self) -> ResolvedColumnConfig {
        let mut min_hours = if (0..=23).contains(&self.min_hours) {
            self.min_hours
        } else {
            0
        };
        let mut max_hours = if (1..=36).contains(&self.max_hours) {
            self.max_hours
        } else {
            36
        };
        if min_hours > max_hours {
            std::mem::swap(&mut min_hours, &mut max_hours);
        }
        if max_hours - min_hours < 1 {
            min_hours = 0;
            max_hours = 24;
        }

        let column_count = self.column_count.max(1);
        let percent_overlap = if self.percent_overlap.is_finite()
            && (-100.0..=100.0).contains(&self.percent_overlap)
        {
            self.percent_overlap
        } else {
            default_column_percent_overlap()
        };
        let hour_size = if self.hour_size.is_finite() && self.hour_size >= 5.0 {
            self.hour_size
        } else {
            10.0
        };
        let time_slot_duration = if (1..=60).contains(&self.time_slot_duration) {
            self.time_slot_duration
        } else {
            default_time_slot_duration()
        };

        let min_hours = min_hours as u32;
        let max_hours = max_hours as u32;
        let hour_count = max_hours - min_hours;
        let slots_per_hour = 60.0 / f64::from(time_slot_duration);
        // The slot size must be a whole pixel; the hour size follows it.
        let slot_size = (hour_size / slots_per_hour).ceil();
        let hour_size = slot_size * slots_per_hour;
        let sheet_height = hour_size * f64::from(hour_count);

        let resolved = ResolvedColumnConfig {
            column_count,
            min_hours,
            max_hours,
            hour_count,
            hour_size,
            time_slot_duration,
            slot_size,
            sheet_height,
            percent_overlap,
            snap_minutes: self.snap_minutes.max(1),
            sub_columns: self.sub_columns.clone(),
        };
        debug!(
            min_hours,
            max_hours,
            sheet_height = resolved.sheet_height,
            "resolved column view config"
        );
        resolved
    }
}

/// Matrix-view configuration as supplied by the embedding widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixViewConfig {
    /// Number of day columns per row.
    #[serde(default = "default_column_count")]
    pub column_count: usize,
    /// Number of week rows.
    #[serde(default = "default_row_count")]
    pub row_count: usize,
    /// Percentage of renderer height overlapping between stacked items;
    /// the matrix variant only accepts `[0, 100]`.
    #[serde(default)]
    pub percent_overlap: f64,
    /// Pixels between stacked item renderers when `percent_overlap` is 0.
    #[serde(default = "default_vertical_gap")]
    pub vertical_gap: f64,
    /// Height of a horizontal item renderer.
    #[serde(default = "default_item_height")]
    pub item_height: f64,
    /// Height of a label renderer.
    #[serde(default = "default_label_height")]
    pub label_height: f64,
    /// Height of the expand/collapse affordance.
    #[serde(default = "default_expand_height")]
    pub expand_height: f64,
    /// Top offset reserved in each cell for the day label.
    #[serde(default = "default_cell_padding_top")]
    pub cell_padding_top: f64,
    /// Whether items not filling whole days still snap to day boundaries.
    #[serde(default = "default_round_to_day")]
    pub round_to_day: bool,
}

fn default_row_count() -> usize {
    5
}
fn default_vertical_gap() -> f64 {
    2.0
}
fn default_item_height() -> f64 {
    17.0
}
fn default_label_height() -> f64 {
    14.0
}
fn default_expand_height() -> f64 {
    15.0
}
fn default_cell_padding_top() -> f64 {
    16.0
}
fn default_round_to_day() -> bool {
    true
}

impl Default for MatrixViewConfig {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            row_count: default_row_count(),
            percent_overlap: 0.0,
            vertical_gap: default_vertical_gap(),
            item_height: default_item_height(),
            label_height: default_label_height(),
            expand_height: default_expand_height(),
            cell_padding_top: default_cell_padding_top(),
            round_to_day: default_round_to_day(),
        }
    }
}

/// Matrix-view configuration after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMatrixConfig {
    pub column_count: usize,
    pub row_count: usize,
    pub percent_overlap: f64,
    pub vertical_gap: f64,
    pub item_height: f64,
    pub label_height: f64,
    pub expand_height: f64,
    pub cell_padding_top: f64,
    pub round_to_day: bool,
}

impl MatrixViewConfig {
    /// Applies the coercion rules.
    #[must_use]
    pub fn resolve(&self) -> ResolvedMatrixConfig {
        let percent_overlap = if self.percent_overlap.is_finite()
            && (0.0..=100.0).contains(&self.percent_overlap)
        {
            self.percent_overlap
        } else {
            0.0
        };
        let resolved = ResolvedMatrixConfig {
            column_count: self.column_count.max(1),
            row_count: self.row_count.max(1),
            percent_overlap,
            vertical_gap: coerce_min(self.vertical_gap, 0.0, default_vertical_gap()),
            item_height: coerce_min(self.item_height, 1.0, default_item_height()),
            label_height: coerce_min(self.label_height, 1.0, default_label_height()),
            expand_height: coerce_min(self.expand_height, 1.0, default_expand_height()),
            cell_padding_top: coerce_min(self.cell_padding_top, 0.0, default_cell_padding_top()),
            round_to_day: self.round_to_day,
        };
        debug!(
            rows = resolved.row_count,
            columns = resolved.column_count,
            "resolved matrix view config"
        );
        resolved
    }
}

fn coerce_min(value: f64, min: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= min {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_window_coercion() {
        let config = ColumnViewConfig {
            min_hours: -3,
            max_hours: 99,
            ..ColumnViewConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!(resolved.min_hours, 0);
        assert_eq!(resolved.max_hours, 36);

        let config = ColumnViewConfig {
            min_hours: 12,
            max_hours: 12,
            ..ColumnViewConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!((resolved.min_hours, resolved.max_hours), (0, 24));
    }

    #[test]
    fn slot_rounding_drives_hour_size() {
        let config = ColumnViewConfig {
            hour_size: 50.0,
            time_slot_duration: 15,
            ..ColumnViewConfig::default()
        };
        let resolved = config.resolve();
        // 50 / 4 = 12.5 rounds up to 13px slots, so an hour is 52px.
        assert_eq!(resolved.slot_size, 13.0);
        assert_eq!(resolved.hour_size, 52.0);
        assert_eq!(
            resolved.sheet_height,
            52.0 * f64::from(resolved.hour_count)
        );
    }

    #[test]
    fn matrix_overlap_rejects_negative_values() {
        let config = MatrixViewConfig {
            percent_overlap: -25.0,
            ..MatrixViewConfig::default()
        };
        assert_eq!(config.resolve().percent_overlap, 0.0);
    }
}
