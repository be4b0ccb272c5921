pub mod interval;
pub mod overlap;
pub mod projection;
pub mod rows;
pub mod time;
pub mod types;

pub use interval::{DisplayInterval, IntervalChange, IntervalQuery};
pub use overlap::{Extent, LanePlacement, LayoutProfile, LayoutSpan, OverlapLayout, PixelSpan};
pub use projection::{TimeOfDay, TimeProjection};
pub use rows::{ExpandedRow, RowHeightPlan};
pub use time::{FirstDayOfWeek, IntervalUnit};
pub use types::{ItemId, RenderItem, TimeRange};
