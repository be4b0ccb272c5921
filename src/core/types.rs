use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identity of a render item within one layout pass.
///
/// Items are created fresh by the caller for every pass; the id only needs to
/// be unique within that pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A half-open time range (`end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Zero-length ranges are valid point-in-time markers but never renderable.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection with `bounds`, or `None` when the ranges are disjoint.
    #[must_use]
    pub fn clip(self, bounds: Self) -> Option<Self> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        if end <= start { None } else { Some(Self { start, end }) }
    }
}

/// A time-ranged item handed to the layout engine.
///
/// `source_ref` is an opaque back-reference into caller data; the engine never
/// dereferences it. The engine lays out copies of these values and never
/// mutates the caller's originals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: ItemId,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub sub_column: Option<String>,
    #[serde(default)]
    pub source_ref: u64,
}

impl RenderItem {
    #[must_use]
    pub fn new(id: ItemId, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            id,
            start_time,
            end_time,
            all_day: false,
            sub_column: None,
            source_ref: 0,
        }
    }

    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Items whose range collapses to zero or negative length are dropped by
    /// the layout passes rather than rendered.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.time_range().is_empty()
    }
}
