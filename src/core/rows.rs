use serde::{Deserialize, Serialize};

/// Explicit height override for the expanded row.
///
/// The expanded height is a caller-chosen target (typically "fill remaining
/// space"); the distributor only sizes the collapsed rows around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpandedRow {
    pub index: usize,
    pub height: f64,
}

/// Per-row pixel heights for one layout pass.
///
/// One pixel of the available height is reserved for the sheet border, so
/// `sum(heights) == total - 1` whenever the geometry is distributable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHeightPlan {
    heights: Vec<f64>,
}

impl RowHeightPlan {
    /// Distributes `total_height` pixels over `row_count` rows.
    ///
    /// Rounding error goes to the first and last rows only, keeping all
    /// interior rows pixel-identical: the first row absorbs `ceil(diff / 2)`
    /// of the adjustment and the last row the rest. With an expanded row the
    /// distribution runs over the collapsed rows and the expanded row keeps
    /// its explicit height. Non-positive totals yield all-zero heights rather
    /// than a division error.
    #[must_use]
    pub fn distribute(total_height: f64, row_count: usize, expanded: Option<ExpandedRow>) -> Self {
        if row_count == 0 {
            return Self {
                heights: Vec::new(),
            };
        }
        if !total_height.is_finite() || total_height <= 0.0 {
            return Self {
                heights: vec![0.0; row_count],
            };
        }

        let total = total_height.floor();
        let expanded = expanded.filter(|row| row.index < row_count);

        if row_count == 1 {
            let height = match expanded {
                Some(row) => row.height,
                None => total - 1.0,
            };
            return Self {
                heights: vec![height],
            };
        }

        let (budget, count) = match expanded {
            Some(row) => ((total - row.height).max(0.0), row_count - 1),
            None => (total, row_count),
        };

        let usable = (budget.floor() - 1.0).max(0.0);
        let base = usable / count as f64;

        let floor_height = base.floor();
        let diff_floor = usable - floor_height * count as f64;
        let ceil_height = base.ceil();
        let diff_ceil = (usable - ceil_height * count as f64).abs();

        let (row_height, diff, sign) = if diff_floor < diff_ceil {
            (floor_height, diff_floor, 1.0)
        } else {
            (ceil_height, diff_ceil, -1.0)
        };

        let first_adjust = (diff / 2.0).ceil();
        let first = row_height + sign * first_adjust;
        let last = row_height + sign * (diff - first_adjust);

        // When the first or last row is the expanded one, its edge adjustment
        // shifts to the nearest collapsed neighbour.
        let first_slot = match expanded {
            Some(row) if row.index == 0 => 1,
            _ => 0,
        };
        let last_slot = match expanded {
            Some(row) if row.index == row_count - 1 => row_count - 2,
            _ => row_count - 1,
        };

        let heights = (0..row_count)
            .map(|index| match expanded {
                Some(row) if row.index == index => row.height,
                _ if index == first_slot => first,
                _ if index == last_slot => last,
                _ => row_height,
            })
            .collect();

        Self { heights }
    }

    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    #[must_use]
    pub fn height_of(&self, index: usize) -> f64 {
        self.heights.get(index).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.heights.iter().sum()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.heights.len()
    }
}

/// Conventional "fill remaining space" target height for an expanded row.
#[must_use]
pub fn expanded_target_height(total_height: f64, row_count: usize, cell_padding_top: f64) -> f64 {
    let reserved = (cell_padding_top * row_count.saturating_sub(1) as f64).ceil();
    (total_height - reserved).max(0.0)
}

/// Animated height at `progress`, floored to a whole pixel each tick.
#[must_use]
pub fn interpolate(old_height: f64, new_height: f64, progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    (old_height + progress * (new_height - old_height)).floor()
}

/// One frame of an expand/collapse animation.
///
/// The collapsed rows are re-distributed around the animated height, so the
/// full plan sums to `total_height - 1` at every tick.
#[must_use]
pub fn animation_frame(
    total_height: f64,
    row_count: usize,
    expanded_index: usize,
    old_height: f64,
    new_height: f64,
    progress: f64,
) -> RowHeightPlan {
    let animated = interpolate(old_height, new_height, progress);
    RowHeightPlan::distribute(
        total_height,
        row_count,
        Some(ExpandedRow {
            index: expanded_index,
            height: animated,
        }),
    )
}
