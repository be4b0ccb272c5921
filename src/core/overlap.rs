use std::cmp::Ordering;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::types::ItemId;

/// Axis along which an item's span extends inside a cell.
///
/// Column views project items vertically (lanes sit side by side); matrix
/// views project items horizontally (lanes stack downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

/// Capabilities of a view variant.
///
/// A single engine parameterized by this profile replaces per-view layout
/// subclasses: the algorithm is shared, only the optional passes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub axis: LayoutAxis,
    pub supports_extent: bool,
    pub supports_sub_columns: bool,
}

impl LayoutProfile {
    /// Day/column views: vertical spans, per-item extents, sub-columns.
    #[must_use]
    pub const fn columns() -> Self {
        Self {
            axis: LayoutAxis::Vertical,
            supports_extent: true,
            supports_sub_columns: true,
        }
    }

    /// Matrix views: horizontal spans; cells are too narrow for extents.
    #[must_use]
    pub const fn matrix() -> Self {
        Self {
            axis: LayoutAxis::Horizontal,
            supports_extent: false,
            supports_sub_columns: false,
        }
    }
}

/// A span of pixels along the lane axis, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub start: f64,
    pub end: f64,
}

impl PixelSpan {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An item projected onto the lane axis.
///
/// The span is always derived from the item's range *clipped* to the display
/// window, never from its unclipped range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpan {
    pub id: ItemId,
    pub span: PixelSpan,
}

impl LayoutSpan {
    #[must_use]
    pub const fn new(id: ItemId, start: f64, end: f64) -> Self {
        Self {
            id,
            span: PixelSpan::new(start, end),
        }
    }
}

/// How many lanes an item may visually occupy.
///
/// `Unresolved` means no overlapping neighbour was ever found and no extent
/// pass has run; consumers treat it as a single lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Extent {
    #[default]
    Unresolved,
    Lanes(u32),
}

impl Extent {
    /// Resolved lane count, treating `Unresolved` as a single lane.
    #[must_use]
    pub fn lanes(self) -> u32 {
        match self {
            Self::Unresolved => 1,
            Self::Lanes(n) => n.max(1),
        }
    }
}

/// Lane index and extent assigned to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanePlacement {
    pub lane: usize,
    pub extent: Extent,
}

/// Result of the overlap layout over one column/row.
///
/// Invariant: two items whose spans overlap never receive intersecting
/// `[lane, lane + extent)` ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapLayout {
    lanes: Vec<Vec<LayoutSpan>>,
    per_item: IndexMap<ItemId, LanePlacement>,
}

/// Default ordering: start ascending, ties broken by *descending* end so that
/// longer items claim lower lanes first. This ordering is load-bearing for
/// deterministic lane numbers, not cosmetic.
#[must_use]
pub fn default_span_order(a: &LayoutSpan, b: &LayoutSpan) -> Ordering {
    OrderedFloat(a.span.start)
        .cmp(&OrderedFloat(b.span.start))
        .then_with(|| OrderedFloat(b.span.end).cmp(&OrderedFloat(a.span.end)))
}

struct Lane {
    horizon: f64,
    members: Vec<usize>,
}

impl OverlapLayout {
    /// Lays out spans with the default ordering.
    #[must_use]
    pub fn compute(spans: &[LayoutSpan], profile: LayoutProfile) -> Self {
        Self::compute_with(spans, profile, default_span_order)
    }

    /// Lays out spans with a caller-supplied ordering.
    ///
    /// A panic inside `comparator` propagates unchanged: ordering bugs are
    /// caller programming errors the engine must not mask.
    #[must_use]
    pub fn compute_with<F>(spans: &[LayoutSpan], profile: LayoutProfile, comparator: F) -> Self
    where
        F: FnMut(&LayoutSpan, &LayoutSpan) -> Ordering,
    {
        // Zero-width or non-finite spans are excluded, not errors.
        let mut sorted: Vec<LayoutSpan> = spans
            .iter()
            .copied()
            .filter(|item| {
                item.span.start.is_finite()
                    && item.span.end.is_finite()
                    && item.span.end > item.span.start
            })
            .collect();
        sorted.sort_by(comparator);

        let mut placements: Vec<LanePlacement> = Vec::with_capacity(sorted.len());
        let mut lanes: SmallVec<[Lane; 8]> = SmallVec::new();

        for (index, item) in sorted.iter().enumerate() {
            let mut assigned = None;
            for (lane_index, lane) in lanes.iter_mut().enumerate() {
                // Fast path: nothing in this lane reaches the new span.
                if lane.horizon <= item.span.start {
                    assigned = Some(lane_index);
                    break;
                }
                let mut contested = None;
                for &member in &lane.members {
                    if sorted[member].span.overlaps(item.span) {
                        contested = Some(member);
                        break;
                    }
                }
                match contested {
                    Some(member) => {
                        // The blocked neighbour can never widen past this item.
                        placements[member].extent = Extent::Lanes(1);
                    }
                    None => {
                        assigned = Some(lane_index);
                        break;
                    }
                }
            }

            let lane_index = match assigned {
                Some(lane_index) => lane_index,
                None => {
                    lanes.push(Lane {
                        horizon: f64::NEG_INFINITY,
                        members: Vec::new(),
                    });
                    lanes.len() - 1
                }
            };
            let lane = &mut lanes[lane_index];
            lane.horizon = lane.horizon.max(item.span.end);
            lane.members.push(index);
            placements.push(LanePlacement {
                lane: lane_index,
                extent: Extent::Unresolved,
            });
        }

        if profile.supports_extent {
            resolve_extents(&sorted, &lanes, &mut placements);
        }

        let lanes_out = lanes
            .iter()
            .map(|lane| lane.members.iter().map(|&member| sorted[member]).collect())
            .collect();
        let per_item = sorted
            .iter()
            .zip(&placements)
            .map(|(item, placement)| (item.id, *placement))
            .collect();

        Self {
            lanes: lanes_out,
            per_item,
        }
    }

    #[must_use]
    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Spans grouped by lane, each lane in placement order.
    #[must_use]
    pub fn lanes(&self) -> &[Vec<LayoutSpan>] {
        &self.lanes
    }

    /// Placement per item id, in lane-assignment order.
    #[must_use]
    pub fn per_item(&self) -> &IndexMap<ItemId, LanePlacement> {
        &self.per_item
    }

    #[must_use]
    pub fn placement(&self, id: ItemId) -> Option<LanePlacement> {
        self.per_item.get(&id).copied()
    }

    /// Matrix variant of the extent pass: for each column span, the number of
    /// lanes needed to display every item visible from that column.
    ///
    /// Scans lanes from the highest downwards and reports `lane + 1` for the
    /// first lane containing an item intersecting the column, or 0 when the
    /// column is empty.
    #[must_use]
    pub fn lanes_by_column(&self, columns: &[PixelSpan]) -> Vec<usize> {
        columns
            .iter()
            .map(|column| {
                for lane_index in (0..self.lanes.len()).rev() {
                    let hit = self.lanes[lane_index]
                        .iter()
                        .any(|item| item.span.overlaps(*column));
                    if hit {
                        return lane_index + 1;
                    }
                }
                0
            })
            .collect()
    }
}

/// Second pass for column views: widen uncontested items over subsequent free
/// lanes.
///
/// Last-lane items have no room to widen. An earlier item still `Unresolved`
/// takes one extra lane per consecutive subsequent lane free of overlaps,
/// stopping at the first lane where an overlap occurs. Greedy by construction:
/// lane numbers are user-visible, so no re-packing happens here.
fn resolve_extents(items: &[LayoutSpan], lanes: &[Lane], placements: &mut [LanePlacement]) {
    let Some(last) = lanes.last() else {
        return;
    };
    for &member in &last.members {
        placements[member].extent = Extent::Lanes(1);
    }

    for (lane_index, lane) in lanes[..lanes.len() - 1].iter().enumerate() {
        for &member in &lane.members {
            if placements[member].extent != Extent::Unresolved {
                continue;
            }
            let mut space = 0u32;
            'outward: for next in &lanes[lane_index + 1..] {
                for &other in &next.members {
                    if items[other].span.overlaps(items[member].span) {
                        break 'outward;
                    }
                }
                space += 1;
            }
            placements[member].extent = Extent::Lanes(1 + space);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(id: u64, start: f64, end: f64) -> LayoutSpan {
        LayoutSpan::new(ItemId::new(id), start, end)
    }

    #[test]
    fn non_overlapping_items_share_lane_zero() {
        let layout = OverlapLayout::compute(
            &[span(1, 0.0, 10.0), span(2, 10.0, 20.0), span(3, 25.0, 30.0)],
            LayoutProfile::columns(),
        );
        assert_eq!(layout.num_lanes(), 1);
        for placement in layout.per_item().values() {
            assert_eq!(placement.lane, 0);
        }
    }

    #[test]
    fn lane_reuse_after_horizon_passes() {
        // A[0,10) B[5,20) C[12,18): C reuses lane 0 once A is out of the way.
        let layout = OverlapLayout::compute(
            &[span(1, 0.0, 10.0), span(2, 5.0, 20.0), span(3, 12.0, 18.0)],
            LayoutProfile::columns(),
        );
        assert_eq!(layout.num_lanes(), 2);
        assert_eq!(layout.placement(ItemId::new(1)).map(|p| p.lane), Some(0));
        assert_eq!(layout.placement(ItemId::new(2)).map(|p| p.lane), Some(1));
        assert_eq!(layout.placement(ItemId::new(3)).map(|p| p.lane), Some(0));
    }

    #[test]
    fn empty_spans_are_dropped() {
        let layout = OverlapLayout::compute(
            &[span(1, 5.0, 5.0), span(2, 9.0, 3.0), span(3, 0.0, 1.0)],
            LayoutProfile::columns(),
        );
        assert_eq!(layout.per_item().len(), 1);
        assert!(layout.placement(ItemId::new(3)).is_some());
    }

    #[test]
    fn uncontested_item_widens_over_free_lanes() {
        // A[0,4) and B[0,4) overlap and fill lanes 0/1; C[6,9) lands in lane 0
        // with lane 1 free next to it.
        let layout = OverlapLayout::compute(
            &[span(1, 0.0, 4.0), span(2, 0.0, 4.0), span(3, 6.0, 9.0)],
            LayoutProfile::columns(),
        );
        assert_eq!(layout.num_lanes(), 2);
        let c = layout.placement(ItemId::new(3)).expect("C placed");
        assert_eq!(c.lane, 0);
        assert_eq!(c.extent, Extent::Lanes(2));
    }
}
